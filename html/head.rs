use crate::*;

/// Renders into a `<head>` tag with builder-like interface
pub struct Head<'a> {
    title: &'a str,
    stylesheets: Vec<&'a str>,
    scripts: Vec<&'a str>,
    module_snippets: Vec<&'a str>,
    favicon: Option<&'a str>,
    viewport: Option<&'a str>,
    other: Option<Markup>,
}

impl<'a> Head<'a> {
    pub fn with(mut self, other: Markup) -> Self {
        self.other = Some(other);
        self
    }
    pub fn title(mut self, title: &'a str) -> Self {
        self.title = title;
        self
    }
    pub fn css(mut self, path: &'a str) -> Self {
        self.stylesheets.push(path);
        self
    }
    pub fn script(mut self, path: &'a str) -> Self {
        self.scripts.push(path);
        self
    }
    pub fn module(mut self, snippet: &'a str) -> Self {
        self.module_snippets.push(snippet);
        self
    }
}

impl<'a> Default for Head<'a> {
    fn default() -> Self {
        Self {
            title: "borgden",
            stylesheets: vec![html::COREUI_CSS, "/assets/borgden.css"],
            scripts: vec![html::COREUI_JS],
            module_snippets: vec![html::LOADER_SNIPPET],
            favicon: Some("/assets/favicon.svg"),
            viewport: Some("width=device-width, initial-scale=1.0"),
            other: None,
        }
    }
}

impl<'a> Render for Head<'a> {
    fn render(&self) -> Markup {
        html!(
            head {
                title {(self.title)}
                @if let Some(href) = self.favicon { link rel="icon" href=(href) {} }
                @if let Some(viewport) = self.viewport { meta name="viewport" content=(viewport); }
                @for stylesheet in &self.stylesheets {
                    link href=(stylesheet) rel="stylesheet" {}
                }
                @for script in &self.scripts {
                    script src=(script) defer {}
                }
                @for snippet in &self.module_snippets {
                    script type="module" {(PreEscaped(*snippet))}
                }
                @if let Some(markup) = &self.other {(markup.clone())}
            }
        )
    }
}
