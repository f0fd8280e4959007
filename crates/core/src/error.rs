//! Ledger error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Domain-level ledger error.
///
/// Every variant is a local, recoverable condition: the rejected operation had
/// no effect and nothing was written to the audit trail. Storage failures are
/// not represented here; persistence-backed ledgers report them separately.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Empty item name or a non-positive amount.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The targeted item is not present in the ledger.
    #[error("item not found: {name}")]
    NotFound { name: String },

    /// A removal asked for more units than are currently held.
    #[error("insufficient stock for {name}: requested {requested}, current {current}")]
    InsufficientStock {
        name: String,
        current: i64,
        requested: i64,
    },
}

impl LedgerError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }

    pub fn insufficient_stock(name: impl Into<String>, current: i64, requested: i64) -> Self {
        Self::InsufficientStock {
            name: name.into(),
            current,
            requested,
        }
    }

    /// Stable machine-readable code (used by presentation layers).
    pub fn code(&self) -> &'static str {
        match self {
            LedgerError::InvalidInput(_) => "invalid_input",
            LedgerError::NotFound { .. } => "not_found",
            LedgerError::InsufficientStock { .. } => "insufficient_stock",
        }
    }
}
