use chrono::Utc;
use thiserror::Error;

use stockroom_core::{Amount, CategoryId, ItemName, LedgerError};
use stockroom_events::{History, Journal};
use stockroom_inventory::{AuditEntry, AuditKind, RemoveOutcome, Snapshot, StockEntry};

use super::store::{CategoryRecord, ProductRecord, StockStore, StoreError};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// The storage collaborator failed; reported apart from ledger rule violations.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(StoreError),
}

impl From<StoreError> for PersistenceError {
    fn from(err: StoreError) -> Self {
        match err {
            // Referencing a missing category is bad input, not a storage outage.
            StoreError::ForeignKey(msg) => {
                PersistenceError::Ledger(LedgerError::invalid_input(msg))
            }
            other => {
                tracing::warn!(error = %other, "stock store call failed");
                PersistenceError::StorageUnavailable(other)
            }
        }
    }
}

/// Ledger whose entries live in an external [`StockStore`].
///
/// Honours the same contract as the in-memory ledger. The audit trail stays in
/// process and only grows once the store has accepted a mutation.
#[derive(Debug)]
pub struct PersistentLedger<S: StockStore> {
    store: S,
    audit: Journal<AuditEntry>,
}

impl<S: StockStore> PersistentLedger<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            audit: Journal::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Add units of `name`. Returns the new quantity.
    pub fn add(&mut self, name: &str, amount: i64) -> Result<i64, PersistenceError> {
        self.add_in_category(name, amount, None)
    }

    /// Add units of `name`, filing a newly created product under `category`.
    ///
    /// The category only applies when the product row is created; topping up
    /// an existing product keeps its category.
    pub fn add_in_category(
        &mut self,
        name: &str,
        amount: i64,
        category: Option<CategoryId>,
    ) -> Result<i64, PersistenceError> {
        let item = ItemName::parse(name)?;
        let amount = Amount::new(amount)?;

        let quantity = match self.store.find_product(&item)? {
            Some(row) => {
                let quantity = row
                    .quantity
                    .checked_add(amount.get())
                    .ok_or_else(|| LedgerError::invalid_input("quantity would overflow"))?;
                self.store.update_quantity(&item, quantity)?;
                quantity
            }
            None => {
                self.store.insert_product(ProductRecord {
                    name: item.clone(),
                    quantity: amount.get(),
                    category_id: category,
                })?;
                amount.get()
            }
        };

        self.record(AuditKind::Add, item, amount.get(), quantity);
        Ok(quantity)
    }

    pub fn remove(&mut self, name: &str, amount: i64) -> Result<RemoveOutcome, PersistenceError> {
        let item = ItemName::parse(name)?;
        let amount = Amount::new(amount)?;

        let held = self.held(&item)?;
        if amount.get() > held {
            return Err(LedgerError::insufficient_stock(item.into_inner(), held, amount.get()).into());
        }

        let quantity = held - amount.get();
        if quantity == 0 {
            self.store.delete_product(&item)?;
        } else {
            self.store.update_quantity(&item, quantity)?;
        }

        self.record(AuditKind::Remove, item, amount.get(), quantity);
        Ok(RemoveOutcome {
            quantity,
            deleted: quantity == 0,
        })
    }

    /// Delete `name` regardless of quantity. Returns the quantity that was held.
    pub fn remove_all(&mut self, name: &str) -> Result<i64, PersistenceError> {
        let item = ItemName::parse(name)?;
        let held = self.held(&item)?;

        self.store.delete_product(&item)?;

        self.record(AuditKind::RemoveAll, item, held, 0);
        Ok(held)
    }

    /// Current products, ordered by name.
    pub fn snapshot(&self) -> Result<Snapshot, PersistenceError> {
        let mut entries: Vec<StockEntry> = self
            .store
            .select_products()?
            .into_iter()
            .filter(|row| row.quantity > 0)
            .map(|row| StockEntry {
                name: row.name,
                quantity: row.quantity,
            })
            .collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(Snapshot::new(entries))
    }

    pub fn history(&self, limit: Option<usize>) -> History<'_, AuditEntry> {
        self.audit.history(limit)
    }

    /// Product rows with their category foreign keys, ordered by name.
    pub fn products(&self) -> Result<Vec<ProductRecord>, PersistenceError> {
        let mut rows = self.store.select_products()?;
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows)
    }

    /// Register a category. Names are trimmed and must be unique.
    pub fn add_category(&mut self, name: &str) -> Result<CategoryId, PersistenceError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LedgerError::invalid_input("category name cannot be empty").into());
        }
        if self.store.select_categories()?.iter().any(|c| c.name == name) {
            return Err(LedgerError::invalid_input(format!("category {name} already exists")).into());
        }

        let id = CategoryId::new();
        self.store.insert_category(CategoryRecord {
            id,
            name: name.to_string(),
        })?;
        tracing::info!(category = %id, name, "category registered");
        Ok(id)
    }

    pub fn categories(&self) -> Result<Vec<CategoryRecord>, PersistenceError> {
        let mut rows = self.store.select_categories()?;
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows)
    }

    fn held(&self, item: &ItemName) -> Result<i64, PersistenceError> {
        match self.store.find_product(item)? {
            Some(row) if row.quantity > 0 => Ok(row.quantity),
            _ => Err(LedgerError::not_found(item.as_str()).into()),
        }
    }

    fn record(&mut self, kind: AuditKind, item: ItemName, delta: i64, resulting_quantity: i64) {
        tracing::info!(
            kind = %kind,
            item = %item,
            delta,
            quantity = resulting_quantity,
            "persisted ledger mutation applied"
        );
        let sequence = self.audit.len() as u64 + 1;
        self.audit.append(AuditEntry {
            sequence,
            occurred_at: Utc::now(),
            kind,
            item,
            delta,
            resulting_quantity,
        });
    }
}
