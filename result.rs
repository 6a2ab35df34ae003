use crate::*;

/// Basic Result alias with [`enum@Error`]
pub type Result<T = (), E = Error> = std::result::Result<T, E>;

/// Utility for type inference that allows using `?` operator in closure handlers
pub const OK: Result<(), Error> = Result::Ok(());

/// Utility for type inference that allows using `?` operator in closure handlers
#[cfg(not(target_arch = "wasm32"))]
pub const fn ok<T: axum::response::IntoResponse>(resp: T) -> Result<T, Error> {
    Ok(resp)
}

use thiserror::Error;
/// Error type used across the codebase
#[derive(Error, Debug)]
pub enum Error {
    #[error("Not found")]
    NotFound,
    #[error("{0}")]
    Config(String),
    #[error(transparent)]
    Env(#[from] std::env::VarError),
    #[error(transparent)]
    UuidParse(#[from] uuid::Error),
    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),
    #[error(transparent)]
    TomlParse(#[from] toml::de::Error),
    #[error(transparent)]
    IO(#[from] std::io::Error),
    #[cfg(not(target_arch = "wasm32"))]
    #[error(transparent)]
    Http(#[from] axum::http::Error),
    #[cfg(not(target_arch = "wasm32"))]
    #[error(transparent)]
    Sled(#[from] sled::Error),
    #[cfg(not(target_arch = "wasm32"))]
    #[error(transparent)]
    Bincode(#[from] bincode::Error),
    #[cfg(not(target_arch = "wasm32"))]
    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),
    #[error("{0:?}")]
    Any(AnyError),
}

#[cfg(not(target_arch = "wasm32"))]
impl axum::response::IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        use axum::http::StatusCode;
        use axum::response::IntoResponse;
        match self {
            Error::NotFound => {
                (StatusCode::NOT_FOUND, crate::html::not_found_page()).into_response()
            }
            _ => {
                error!("{self}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    crate::html::internal_error_page(),
                )
                    .into_response()
            }
        }
    }
}

/// Provides shorthand to map errs into [`enum@Error`] using `.somehow()`
#[doc(hidden)]
pub trait _Somehow<T, E> {
    fn somehow(self) -> Result<T, Error>;
}

impl<T, E> _Somehow<T, E> for Result<T, E>
where
    E: std::fmt::Display,
{
    fn somehow(self) -> Result<T, Error> {
        self.map_err(|e| Error::Any(AnyError(format!("{e}"))))
    }
}

#[derive(Debug)]
#[doc(hidden)]
pub struct AnyError(pub String);
