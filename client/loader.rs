use crate::*;

use js_sys::Reflect;
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{console, Element, Event, Headers, Request, RequestInit, Response};

/// Wires the modal's pre-show lifecycle event to remote fragments: the URL is
/// resolved from the triggering element, fetched as an XHR-style request and
/// the returned markup replaces the container's content verbatim.
///
/// Each invocation is an independent one-shot sequence. In-flight fetches are
/// not cancelled when the modal is reopened, so a rapid re-trigger settles on
/// whichever response resolves last.
pub fn attach_content_loader(
    modal: &web_sys::EventTarget,
    container: Element,
) -> Result<(), JsValue> {
    let handler = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
        console::log_1(event.as_ref());
        let url = resolve_from_event(&event);
        let container = container.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let Some(url) = url else {
                console::warn_1(&JsValue::from_str(
                    "modal trigger carries neither a link target nor a data-url attribute",
                ));
                return;
            };
            if let Err(error) = load_fragment(&url, &container).await {
                console::warn_1(&error);
            }
        });
    });
    modal.add_event_listener_with_callback(MODAL_SHOW_EVENT, handler.as_ref().unchecked_ref())?;
    // the listener lives as long as the page does
    handler.forget();
    Ok(())
}

/// Reads the toolkit's `relatedTarget` expando off the lifecycle event and
/// applies the URL resolution policy: link target first, `data-url` second.
fn resolve_from_event(event: &Event) -> Option<String> {
    let trigger = Reflect::get(event.as_ref(), &JsValue::from_str("relatedTarget")).ok()?;
    let trigger: Element = trigger.dyn_into().ok()?;
    let link_target = Reflect::get(trigger.as_ref(), &JsValue::from_str("href"))
        .ok()
        .and_then(|value| value.as_string());
    let data_url = trigger.get_attribute(DATA_URL_ATTR);
    resolve_url(link_target.as_deref(), data_url.as_deref())
}

/// Fetches the URL marked as an XHR request so the host answers with a bare
/// fragment, then injects the body text as the container's inner markup. The
/// response status is deliberately not inspected and the markup is trusted
/// verbatim: fragments come from the same origin.
async fn load_fragment(url: &str, container: &Element) -> Result<(), JsValue> {
    let headers = Headers::new()?;
    headers.set(XHR_HEADER.0, XHR_HEADER.1)?;
    let mut init = RequestInit::new();
    init.method("GET");
    init.headers(headers.as_ref());
    let request = Request::new_with_str_and_init(url, &init)?;

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let response: Response = JsFuture::from(window.fetch_with_request(&request))
        .await?
        .dyn_into()?;
    let text = JsFuture::from(response.text()?).await?;
    container.set_inner_html(&text.as_string().unwrap_or_default());
    Ok(())
}
