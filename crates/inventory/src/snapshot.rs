use serde::{Deserialize, Serialize};

use stockroom_core::{Entity, ItemName};

/// One (name, quantity) pair currently held by a ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockEntry {
    pub name: ItemName,
    pub quantity: i64,
}

impl Entity for StockEntry {
    type Id = ItemName;

    fn id(&self) -> &Self::Id {
        &self.name
    }
}

/// Point-in-time read-only view of all entries, ordered by name.
///
/// Aggregate metrics are derived on demand and never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    entries: Vec<StockEntry>,
}

impl Snapshot {
    pub fn new(entries: Vec<StockEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[StockEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of distinct items held.
    pub fn distinct_items(&self) -> usize {
        self.entries.len()
    }

    /// Sum of units across all items.
    ///
    /// Widened to `i128`: each quantity fits in `i64`, their sum may not.
    pub fn total_units(&self) -> i128 {
        self.entries.iter().map(|e| i128::from(e.quantity)).sum()
    }

    pub fn quantity_of(&self, name: &str) -> Option<i64> {
        self.entries
            .iter()
            .find(|e| e.name.as_str() == name)
            .map(|e| e.quantity)
    }

    /// Plain `(name, quantity)` pairs, in snapshot order.
    pub fn pairs(&self) -> Vec<(String, i64)> {
        self.entries
            .iter()
            .map(|e| (e.name.to_string(), e.quantity))
            .collect()
    }
}

impl IntoIterator for Snapshot {
    type Item = StockEntry;
    type IntoIter = std::vec::IntoIter<StockEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a Snapshot {
    type Item = &'a StockEntry;
    type IntoIter = core::slice::Iter<'a, StockEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
