//! HTTP API: per-session stock ledgers over JSON.

pub mod app;
pub mod config;
