//! Infrastructure layer: session ownership and external storage adapters.

pub mod persistence;
pub mod sessions;

pub use sessions::{SessionError, SessionHandle, SessionRegistry};
