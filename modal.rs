use crate::*;

/// Id of the page's single modal element
pub const MODAL_ID: &str = "modal";
/// Class of the container whose inner markup is replaced with fetched fragments
pub const MODAL_CONTENT_CLASS: &str = "modal-content";
/// Pre-show lifecycle event fired by the modal toolkit, carries the trigger as `relatedTarget`
pub const MODAL_SHOW_EVENT: &str = "show.coreui.modal";
/// Fallback attribute on triggers that aren't links
pub const DATA_URL_ATTR: &str = "data-url";
/// Marks fragment requests so the host returns a partial instead of a full page
pub const XHR_HEADER: (&str, &str) = ("X-Requested-With", "XMLHttpRequest");

/// Picks the fragment URL for a modal trigger: the trigger's link target wins,
/// `data-url` is the fallback. Absent and empty values are treated the same
/// since a trigger without an `href` attribute exposes an empty link target.
pub fn resolve_url(link_target: Option<&str>, data_url: Option<&str>) -> Option<String> {
    match link_target {
        Some(href) if !href.is_empty() => Some(href.to_owned()),
        _ => match data_url {
            Some(url) if !url.is_empty() => Some(url.to_owned()),
            _ => None,
        },
    }
}

/// Renders a modal trigger button carrying the fragment URL
pub fn modal_trigger(url: &str, label: &str) -> Markup {
    html! {
        button type="button" data-coreui-toggle="modal" data-coreui-target=(format!("#{MODAL_ID}")) data-url=(url) {
            (label)
        }
    }
}

/// Empty modal skeleton rendered once per page, filled by the content loader
pub fn modal_skeleton() -> Markup {
    html! {
        div id=(MODAL_ID) class="modal" tabindex="-1" {
            div class="modal-dialog" {
                div class=(MODAL_CONTENT_CLASS) {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_target_wins() {
        let url = resolve_url(Some("/repositories/1"), Some("/other"));
        assert_eq!(url.as_deref(), Some("/repositories/1"));
    }

    #[test]
    fn data_url_is_the_fallback() {
        let url = resolve_url(None, Some("/notifications/email/new"));
        assert_eq!(url.as_deref(), Some("/notifications/email/new"));
        // anchors without an href attribute expose an empty link target
        let url = resolve_url(Some(""), Some("/notifications/email/new"));
        assert_eq!(url.as_deref(), Some("/notifications/email/new"));
    }

    #[test]
    fn no_sources_no_url() {
        assert_eq!(resolve_url(None, None), None);
        assert_eq!(resolve_url(Some(""), None), None);
    }

    #[test]
    fn trigger_markup_carries_the_url() {
        let markup = modal_trigger("/repositories/1", "Details").into_string();
        assert!(markup.contains("data-url=\"/repositories/1\""));
        assert!(markup.contains("data-coreui-target=\"#modal\""));
    }
}
