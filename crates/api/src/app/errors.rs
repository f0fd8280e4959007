use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use stockroom_core::LedgerError;
use stockroom_infra::SessionError;

pub fn session_error_to_response(err: SessionError) -> axum::response::Response {
    match err {
        SessionError::UnknownSession(id) => {
            json_error(StatusCode::NOT_FOUND, "not_found", format!("unknown session {id}"))
        }
        SessionError::Poisoned => json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "session_poisoned",
            "session state is unavailable",
        ),
        SessionError::Ledger(e) => ledger_error_to_response(e),
    }
}

pub fn ledger_error_to_response(err: LedgerError) -> axum::response::Response {
    match &err {
        LedgerError::InvalidInput(msg) => json_error(StatusCode::BAD_REQUEST, err.code(), msg.clone()),
        LedgerError::NotFound { .. } => json_error(StatusCode::NOT_FOUND, err.code(), err.to_string()),
        LedgerError::InsufficientStock { name, current, requested } => (
            StatusCode::CONFLICT,
            axum::Json(json!({
                "error": err.code(),
                "message": err.to_string(),
                "item": name,
                "current": current,
                "requested": requested,
            })),
        )
            .into_response(),
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

/// Extractor rejections (malformed body, bad query string) use the same
/// `invalid_input` shape as ledger validation failures.
pub fn rejection_to_response(rejection: impl std::fmt::Display) -> axum::response::Response {
    json_error(StatusCode::BAD_REQUEST, "invalid_input", rejection.to_string())
}
