use crate::*;

mod head;
pub use head::*;

mod layout;
pub use layout::*;

/// Module script that boots the wasm modal content loader
pub const LOADER_SNIPPET: &str =
    "import init from '/assets/borgden.js'; init().catch(console.warn);";

pub const COREUI_CSS: &str =
    "https://cdn.jsdelivr.net/npm/@coreui/coreui@4.2/dist/css/coreui.min.css";
pub const COREUI_JS: &str =
    "https://cdn.jsdelivr.net/npm/@coreui/coreui@4.2/dist/js/coreui.bundle.min.js";
