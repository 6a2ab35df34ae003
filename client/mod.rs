use crate::*;

mod loader;
pub use loader::*;

pub use console_error_panic_hook::set_once as set_panic_hook;
use wasm_bindgen::prelude::wasm_bindgen;
use wasm_bindgen::JsValue;

/// Page entry point: locates the modal element and its content container
/// once, then wires the content loader to the modal's pre-show event.
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    set_panic_hook();
    init_tracing();

    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| JsValue::from_str("no document to attach to"))?;

    let Some(modal) = document.get_element_by_id(MODAL_ID) else {
        debug!("no #{MODAL_ID} element on this page, content loader not attached");
        return Ok(());
    };
    let Some(container) = document
        .get_elements_by_class_name(MODAL_CONTENT_CLASS)
        .item(0)
    else {
        warn!("#{MODAL_ID} is present but no .{MODAL_CONTENT_CLASS} container found");
        return Ok(());
    };

    attach_content_loader(&modal, container)?;
    debug!("modal content loader attached");
    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::fmt::{format::Pretty, time::UtcTime};
    use tracing_subscriber::prelude::*;
    use tracing_web::{performance_layer, MakeWebConsoleWriter};

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false) // Only partially supported across browsers
        .with_timer(UtcTime::rfc_3339())
        .with_writer(MakeWebConsoleWriter::new().with_pretty_level())
        .with_level(false);
    let perf_layer = performance_layer().with_details_from_fields(Pretty::default());

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(perf_layer)
        .init();
}
