use std::sync::Arc;

use axum::{
    Json,
    extract::{
        Extension, Path, Query,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::IntoResponse,
};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub async fn open_session(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.sessions().open() {
        Ok(handle) => (
            StatusCode::CREATED,
            Json(serde_json::json!({
                "session_id": handle.id().to_string(),
                "max_amount": services.max_amount(),
            })),
        )
            .into_response(),
        Err(e) => errors::session_error_to_response(e),
    }
}

pub async fn close_session(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let session = match services.session(&id) {
        Ok(s) => s,
        Err(resp) => return resp,
    };

    match services.sessions().close(session.id()) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::session_error_to_response(e),
    }
}

pub async fn add_item(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    payload: Result<Json<dto::AddItemRequest>, JsonRejection>,
) -> axum::response::Response {
    let session = match services.session(&id) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let Json(body) = match payload {
        Ok(body) => body,
        Err(rejection) => return errors::rejection_to_response(rejection),
    };
    if let Err(resp) = services.check_amount(body.amount) {
        return resp;
    }

    match session.add(&body.name, body.amount) {
        Ok(quantity) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "name": body.name.trim(),
                "quantity": quantity,
            })),
        )
            .into_response(),
        Err(e) => errors::session_error_to_response(e),
    }
}

pub async fn remove_item(
    Extension(services): Extension<Arc<AppServices>>,
    Path((id, name)): Path<(String, String)>,
    payload: Result<Json<dto::RemoveItemRequest>, JsonRejection>,
) -> axum::response::Response {
    let session = match services.session(&id) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let Json(body) = match payload {
        Ok(body) => body,
        Err(rejection) => return errors::rejection_to_response(rejection),
    };
    if let Err(resp) = services.check_amount(body.amount) {
        return resp;
    }

    match session.remove(&name, body.amount) {
        Ok(outcome) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "name": name.trim(),
                "quantity": outcome.quantity,
                "deleted": outcome.deleted,
            })),
        )
            .into_response(),
        Err(e) => errors::session_error_to_response(e),
    }
}

pub async fn remove_all(
    Extension(services): Extension<Arc<AppServices>>,
    Path((id, name)): Path<(String, String)>,
) -> axum::response::Response {
    let session = match services.session(&id) {
        Ok(s) => s,
        Err(resp) => return resp,
    };

    match session.remove_all(&name) {
        Ok(removed) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "name": name.trim(),
                "removed": removed,
            })),
        )
            .into_response(),
        Err(e) => errors::session_error_to_response(e),
    }
}

pub async fn snapshot(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let session = match services.session(&id) {
        Ok(s) => s,
        Err(resp) => return resp,
    };

    match session.snapshot() {
        Ok(snap) => (StatusCode::OK, Json(dto::snapshot_to_json(&snap))).into_response(),
        Err(e) => errors::session_error_to_response(e),
    }
}

pub async fn history(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    query: Result<Query<dto::HistoryQuery>, QueryRejection>,
) -> axum::response::Response {
    let session = match services.session(&id) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return errors::rejection_to_response(rejection),
    };

    match session.history(query.limit) {
        Ok(entries) => (StatusCode::OK, Json(dto::history_to_json(&entries))).into_response(),
        Err(e) => errors::session_error_to_response(e),
    }
}
