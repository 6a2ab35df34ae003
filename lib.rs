//! Web UI for machines that host BorgBackup repositories: pages and HTML
//! fragments are rendered on the host, detail and form views are pulled into
//! a generic modal dialog by a small wasm module.
#![allow(dead_code, unused_imports)]

/// Macro that simplifies lazy globals by reducing boilerplate and allowing the `?` operator
#[macro_export]
macro_rules! state {
    ($(($v:tt))? $struct_name:ident: $type:ty = $init:block) => {
        pub$(($v))? static $struct_name: $crate::Lazy<$type> = $crate::Lazy::new(|| {
            fn init() -> $crate::Result<$type> {
                let v = { $init };
                Ok(v)
            }
            init().expect("Initialization must finish successfully")
        });
    };
}

mod domain;
mod modal;
mod result;

pub mod html;

pub use domain::*;
pub use modal::*;
pub use result::*;

#[cfg(not(target_arch = "wasm32"))]
mod config;
#[cfg(not(target_arch = "wasm32"))]
pub use config::*;

#[cfg(not(target_arch = "wasm32"))]
mod host;
#[cfg(not(target_arch = "wasm32"))]
pub use host::*;

#[cfg(target_arch = "wasm32")]
mod client;
#[cfg(target_arch = "wasm32")]
pub use client::*;

pub use anyhow::{anyhow, bail};
pub use chrono::{DateTime, Utc};
pub use maud::{html, Markup, PreEscaped, Render, DOCTYPE};
pub use once_cell::sync::Lazy;
pub use serde::{Deserialize, Serialize};
pub use serde_json::json;
pub use std::{env, sync::Arc};
pub use tracing::{debug, error, info, trace, warn};
pub use uuid::Uuid;

pub fn generate_uuid() -> Uuid {
    Uuid::new_v4()
}
