use crate::*;
use crate::html::Head;

/// Wraps a fragment into the full document: head, nav, the modal skeleton
/// that the content loader fills, and the fragment as the main content.
pub fn page(content: Markup) -> Markup {
    html! {(DOCTYPE) html {
        (Head::default())
        body {
            header {
                nav .navbar {
                    a .navbar-brand href="/" { "borgden" }
                    ul .navbar-nav {
                        li .nav-item { a .nav-link href="/" { "Repositories" } }
                        li .nav-item { a .nav-link href="/notifications" { "Notifications" } }
                    }
                }
            }
            main .container { (content) }
            (modal_skeleton())
        }
    }}
}

pub fn not_found_page() -> Markup {
    page(html! {
        article .error-page {
            h1 { "404" }
            p { "This page does not exist." }
            a href="/" { "Back to repositories" }
        }
    })
}

pub fn internal_error_page() -> Markup {
    page(html! {
        article .error-page {
            h1 { "500" }
            p { "Something went wrong on our side." }
            a href="/" { "Back to repositories" }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_carries_the_modal_skeleton() {
        let markup = page(html! { p { "content" } }).into_string();
        assert!(markup.starts_with("<!DOCTYPE html>"));
        assert!(markup.contains("id=\"modal\""));
        assert!(markup.contains("class=\"modal-content\""));
        assert!(markup.contains("<p>content</p>"));
    }

    #[test]
    fn error_pages_are_full_documents() {
        assert!(not_found_page().into_string().contains("404"));
        assert!(internal_error_page().into_string().contains("500"));
    }
}
