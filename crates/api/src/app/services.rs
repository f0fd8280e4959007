use axum::http::StatusCode;

use stockroom_core::SessionId;
use stockroom_infra::{SessionHandle, SessionRegistry};

use crate::app::errors;

/// Shared application state.
#[derive(Debug)]
pub struct AppServices {
    sessions: SessionRegistry,
    max_amount: i64,
}

impl AppServices {
    pub fn new(max_amount: i64) -> Self {
        Self {
            sessions: SessionRegistry::new(),
            max_amount,
        }
    }

    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }

    pub fn max_amount(&self) -> i64 {
        self.max_amount
    }

    /// Resolve a session from its path segment.
    pub fn session(&self, raw_id: &str) -> Result<SessionHandle, axum::response::Response> {
        let id: SessionId = raw_id.parse().map_err(|_| {
            errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid session id")
        })?;
        self.sessions
            .get(id)
            .map_err(errors::session_error_to_response)
    }

    /// Enforce the per-request amount ceiling. Non-positive amounts are left to
    /// the ledger, which rejects them itself.
    pub fn check_amount(&self, amount: i64) -> Result<(), axum::response::Response> {
        if amount > self.max_amount {
            return Err(errors::json_error(
                StatusCode::BAD_REQUEST,
                "invalid_input",
                format!("amount must be between 1 and {}", self.max_amount),
            ));
        }
        Ok(())
    }
}
