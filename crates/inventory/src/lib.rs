//! Inventory ledger (event-sourced, in-memory).
//!
//! This crate contains the stock rules for one session's ledger, implemented
//! purely as deterministic domain logic (no IO, no HTTP, no storage).

pub mod audit;
pub mod ledger;
pub mod snapshot;

pub use audit::{AuditEntry, AuditKind};
pub use ledger::{
    AddStock, ItemRemoved, Ledger, LedgerCommand, LedgerEvent, RemoveAll, RemoveOutcome,
    RemoveStock, StockAdded, StockRemoved,
};
pub use snapshot::{Snapshot, StockEntry};
