//! `stockroom-events` — events, the append-only journal, and command execution.

pub mod event;
pub mod handler;
pub mod journal;

pub use event::Event;
pub use handler::execute;
pub use journal::{History, Journal};
