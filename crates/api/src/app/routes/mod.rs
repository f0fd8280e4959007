use axum::{
    Router,
    routing::{delete, get, post},
};

pub mod sessions;
pub mod system;

/// Router for all session-scoped endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/sessions", post(sessions::open_session))
        .route("/sessions/:id", delete(sessions::close_session))
        .route(
            "/sessions/:id/items",
            get(sessions::snapshot).post(sessions::add_item),
        )
        .route("/sessions/:id/items/:name", delete(sessions::remove_all))
        .route("/sessions/:id/items/:name/remove", post(sessions::remove_item))
        .route("/sessions/:id/history", get(sessions::history))
}
