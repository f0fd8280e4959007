//! Durable ledger variant backed by an external structured-storage service.

pub mod in_memory;
pub mod ledger;
pub mod store;

pub use in_memory::InMemoryStockStore;
pub use ledger::{PersistenceError, PersistentLedger};
pub use store::{CategoryRecord, ProductRecord, StockStore, StoreError};
