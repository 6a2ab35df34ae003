use crate::*;

mod shutdown;
pub use shutdown::*;

mod schedule;
pub use schedule::*;

mod traces;
pub use traces::*;

mod fragment;
pub use fragment::*;

mod assets;
pub use assets::*;

mod store;
pub use store::*;

mod watcher;
pub use watcher::*;

mod alerts;
pub use alerts::*;

mod routes;
pub use routes::*;

pub use axum::{
    self,
    body::Body,
    extract::{Form, Path, Query, Request, State},
    http::{self, header, HeaderMap, HeaderValue, Method, StatusCode, Uri},
    response::{IntoResponse, Redirect, Response},
    routing::{any, delete, get, patch, post, put},
    Router,
};
pub use tokio::{
    runtime::{Builder as RuntimeBuilder, Handle as RuntimeHandle, Runtime, RuntimeFlavor},
    sync::{Mutex, OnceCell, RwLock},
    task::block_in_place,
};
pub use tower::{BoxError, Layer, Service, ServiceBuilder};

use std::net::SocketAddr;

/// Utility trait to use Router as the host
pub trait HostUtils {
    /// Adds utility routes, tracing and layers, then starts the server
    fn run(self) -> impl std::future::Future<Output = Result>;
    fn serve(self) -> impl std::future::Future<Output = Result>;
    fn add_tracing(self) -> Self;
    fn add_utility_layers(self) -> Self;
}

impl HostUtils for Router {
    async fn run(self) -> Result {
        self.route("/health", get(|| async { StatusCode::OK }))
            .add_tracing()
            .add_utility_layers()
            .serve()
            .await
    }

    async fn serve(self) -> Result {
        let port = APP_CONFIG.port;
        let addr = SocketAddr::from(([0, 0, 0, 0], port));
        info!(target: "server", "Starting serving {} at http://localhost:{port}", APP_CONFIG.name);
        tokio::spawn(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                SHUTDOWN.initiate();
            }
        });
        axum_server::bind(addr)
            .handle(SHUTDOWN.new_server_handle())
            .serve(self.into_make_service())
            .await?;
        OK
    }

    fn add_tracing(self) -> Self {
        init_tracing();
        self.layer(tower_http::trace::TraceLayer::new_for_http())
    }

    fn add_utility_layers(self) -> Self {
        use tower_http::catch_panic::CatchPanicLayer;
        let host_services = ServiceBuilder::new().layer(CatchPanicLayer::custom(handle_panic));
        #[cfg(debug_assertions)]
        let host_services = host_services.layer(
            tower_livereload::LiveReloadLayer::new().request_predicate(not_fragment_predicate),
        );
        #[cfg(not(debug_assertions))]
        let host_services = host_services
            .layer(tower_http::compression::CompressionLayer::new())
            .layer(tower_http::limit::RequestBodyLimitLayer::new(
                DEFAULT_REQUEST_BODY_LIMIT,
            ));
        self.layer(host_services)
    }
}

fn handle_panic(err: Box<dyn std::any::Any + Send + 'static>) -> Response {
    let details = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unknown panic message".to_string()
    };

    error!("Panic occured: {details}");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        crate::html::internal_error_page(),
    )
        .into_response()
}

const DEFAULT_REQUEST_BODY_LIMIT: usize = 1_000_000;

#[allow(dead_code)]
fn not_fragment_predicate<Body>(req: &http::Request<Body>) -> bool {
    !req.headers().contains_key("hx-request") && !req.headers().contains_key("x-requested-with")
}
