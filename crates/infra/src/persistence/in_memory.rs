use std::collections::BTreeMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

use stockroom_core::{CategoryId, ItemName};

use super::store::{CategoryRecord, ProductRecord, StockStore, StoreError};

#[derive(Debug, Default)]
struct Tables {
    products: BTreeMap<ItemName, ProductRecord>,
    categories: BTreeMap<CategoryId, CategoryRecord>,
}

/// In-memory stock store for tests/dev.
///
/// Can be taken offline to simulate an unreachable service: every call then
/// fails with [`StoreError::Unavailable`] and leaves the tables untouched.
#[derive(Debug)]
pub struct InMemoryStockStore {
    tables: RwLock<Tables>,
    online: AtomicBool,
}

impl InMemoryStockStore {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
            online: AtomicBool::new(true),
        }
    }

    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }

    fn ensure_online(&self) -> Result<(), StoreError> {
        if self.online.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::Unavailable("store is offline".to_string()))
        }
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Tables>, StoreError> {
        self.ensure_online()?;
        self.tables
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Tables>, StoreError> {
        self.ensure_online()?;
        self.tables
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))
    }
}

impl Default for InMemoryStockStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StockStore for InMemoryStockStore {
    fn select_products(&self) -> Result<Vec<ProductRecord>, StoreError> {
        Ok(self.read()?.products.values().cloned().collect())
    }

    fn find_product(&self, name: &ItemName) -> Result<Option<ProductRecord>, StoreError> {
        Ok(self.read()?.products.get(name).cloned())
    }

    fn insert_product(&self, record: ProductRecord) -> Result<(), StoreError> {
        let mut tables = self.write()?;

        if let Some(category_id) = record.category_id {
            if !tables.categories.contains_key(&category_id) {
                return Err(StoreError::ForeignKey(format!(
                    "category {category_id} does not exist"
                )));
            }
        }
        if tables.products.contains_key(&record.name) {
            return Err(StoreError::Duplicate(record.name.to_string()));
        }

        tables.products.insert(record.name.clone(), record);
        Ok(())
    }

    fn update_quantity(&self, name: &ItemName, quantity: i64) -> Result<(), StoreError> {
        let mut tables = self.write()?;
        let row = tables
            .products
            .get_mut(name)
            .ok_or_else(|| StoreError::Missing(name.to_string()))?;
        row.quantity = quantity;
        Ok(())
    }

    fn delete_product(&self, name: &ItemName) -> Result<(), StoreError> {
        let mut tables = self.write()?;
        tables
            .products
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| StoreError::Missing(name.to_string()))
    }

    fn select_categories(&self) -> Result<Vec<CategoryRecord>, StoreError> {
        Ok(self.read()?.categories.values().cloned().collect())
    }

    fn insert_category(&self, record: CategoryRecord) -> Result<(), StoreError> {
        let mut tables = self.write()?;
        if tables.categories.contains_key(&record.id) {
            return Err(StoreError::Duplicate(record.id.to_string()));
        }
        tables.categories.insert(record.id, record);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(raw: &str) -> ItemName {
        ItemName::parse(raw).unwrap()
    }

    #[test]
    fn product_with_unknown_category_violates_foreign_key() {
        let store = InMemoryStockStore::new();
        let err = store
            .insert_product(ProductRecord {
                name: name("widget"),
                quantity: 1,
                category_id: Some(CategoryId::new()),
            })
            .unwrap_err();
        assert!(matches!(err, StoreError::ForeignKey(_)));
        assert!(store.select_products().unwrap().is_empty());
    }

    #[test]
    fn offline_store_rejects_every_call() {
        let store = InMemoryStockStore::new();
        store.set_online(false);
        assert!(matches!(store.select_products(), Err(StoreError::Unavailable(_))));
        assert!(matches!(
            store.delete_product(&name("widget")),
            Err(StoreError::Unavailable(_))
        ));

        store.set_online(true);
        assert!(store.select_products().unwrap().is_empty());
    }

    #[test]
    fn update_and_delete_require_existing_rows() {
        let store = InMemoryStockStore::new();
        assert!(matches!(
            store.update_quantity(&name("widget"), 3),
            Err(StoreError::Missing(_))
        ));
        assert!(matches!(
            store.delete_product(&name("widget")),
            Err(StoreError::Missing(_))
        ));
    }
}
