use crate::*;

mod errors;
pub use errors::*;

mod notifications;
mod repositories;

pub type AppState = Arc<Store>;

/// All routes of the app: pages served both as bare fragments (for the modal
/// content loader) and as full documents, embedded assets, the 404 fallback
pub fn router(store: AppState) -> Router {
    let pages = Router::new()
        .route("/", get(repositories::list))
        .route("/repositories/:id", get(repositories::detail))
        .route("/notifications", get(notifications::list))
        .route(
            "/notifications/preference",
            post(notifications::save_preference),
        )
        .route("/notifications/email/new", get(notifications::email_form))
        .route(
            "/notifications/email/:id/edit",
            get(notifications::edit_email_form),
        )
        .route("/notifications/email", post(notifications::save_email))
        .route(
            "/notifications/email/:id/delete",
            post(notifications::delete_email),
        )
        .route(
            "/notifications/pushover/new",
            get(notifications::pushover_form),
        )
        .route(
            "/notifications/pushover/:id/edit",
            get(notifications::edit_pushover_form),
        )
        .route("/notifications/pushover", post(notifications::save_pushover))
        .route(
            "/notifications/pushover/:id/delete",
            post(notifications::delete_pushover),
        )
        .route_layer(Fragmentify::wrap(crate::html::page));

    Router::new()
        .merge(pages)
        .route("/assets/*path", get(static_handler))
        .fallback(errors::not_found)
        .with_state(store)
}
