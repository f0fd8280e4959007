use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use stockroom_core::{CategoryId, ItemName};

/// Row of the products table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub name: ItemName,
    pub quantity: i64,
    /// Foreign key into the categories table.
    pub category_id: Option<CategoryId>,
}

/// Row of the categories table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRecord {
    pub id: CategoryId,
    pub name: String,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The backing service could not be reached or refused the call.
    #[error("store unreachable: {0}")]
    Unavailable(String),

    /// A product referenced a category that does not exist.
    #[error("foreign key violation: {0}")]
    ForeignKey(String),

    #[error("duplicate key: {0}")]
    Duplicate(String),

    #[error("row not found: {0}")]
    Missing(String),
}

/// Structured-storage collaborator backing a durable ledger.
///
/// Mirrors a hosted two-table service: products keyed by unique name, and
/// categories referenced by foreign key. Implementations are expected to be
/// reliable; callers do not retry.
pub trait StockStore: Send + Sync {
    fn select_products(&self) -> Result<Vec<ProductRecord>, StoreError>;
    fn find_product(&self, name: &ItemName) -> Result<Option<ProductRecord>, StoreError>;
    fn insert_product(&self, record: ProductRecord) -> Result<(), StoreError>;
    fn update_quantity(&self, name: &ItemName, quantity: i64) -> Result<(), StoreError>;
    fn delete_product(&self, name: &ItemName) -> Result<(), StoreError>;

    fn select_categories(&self) -> Result<Vec<CategoryRecord>, StoreError>;
    fn insert_category(&self, record: CategoryRecord) -> Result<(), StoreError>;
}

impl<S> StockStore for Arc<S>
where
    S: StockStore + ?Sized,
{
    fn select_products(&self) -> Result<Vec<ProductRecord>, StoreError> {
        (**self).select_products()
    }

    fn find_product(&self, name: &ItemName) -> Result<Option<ProductRecord>, StoreError> {
        (**self).find_product(name)
    }

    fn insert_product(&self, record: ProductRecord) -> Result<(), StoreError> {
        (**self).insert_product(record)
    }

    fn update_quantity(&self, name: &ItemName, quantity: i64) -> Result<(), StoreError> {
        (**self).update_quantity(name, quantity)
    }

    fn delete_product(&self, name: &ItemName) -> Result<(), StoreError> {
        (**self).delete_product(name)
    }

    fn select_categories(&self) -> Result<Vec<CategoryRecord>, StoreError> {
        (**self).select_categories()
    }

    fn insert_category(&self, record: CategoryRecord) -> Result<(), StoreError> {
        (**self).insert_category(record)
    }
}
