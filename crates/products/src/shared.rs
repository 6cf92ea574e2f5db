//! Thread-safe handle around [`ProductStore`].

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use stockbook_core::{DomainError, DomainResult};

use crate::query::{ProductFilter, SortKey};
use crate::record::{NewProduct, ProductPatch, ProductRecord};
use crate::store::ProductStore;

/// Cloneable, lock-protected product store.
///
/// Mutations hold the write lock for the whole check-then-write, so the
/// uniqueness and non-negative quantity checks cannot race. Reads share the
/// read lock and return owned copies, never a view into a record that could be
/// mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct SharedProductStore {
    inner: Arc<RwLock<ProductStore>>,
}

impl SharedProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_store(store: ProductStore) -> Self {
        Self {
            inner: Arc::new(RwLock::new(store)),
        }
    }

    fn read(&self) -> DomainResult<RwLockReadGuard<'_, ProductStore>> {
        self.inner
            .read()
            .map_err(|_| DomainError::unavailable("lock poisoned"))
    }

    fn write(&self) -> DomainResult<RwLockWriteGuard<'_, ProductStore>> {
        self.inner
            .write()
            .map_err(|_| DomainError::unavailable("lock poisoned"))
    }

    pub fn len(&self) -> DomainResult<usize> {
        Ok(self.read()?.len())
    }

    pub fn insert(&self, new: NewProduct) -> DomainResult<()> {
        self.write()?.insert(new)
    }

    pub fn find(&self, code: &str) -> DomainResult<ProductRecord> {
        self.read()?.find(code).cloned()
    }

    pub fn update(&self, code: &str, patch: ProductPatch) -> DomainResult<()> {
        self.write()?.update(code, patch)
    }

    pub fn delete(&self, code: &str) -> DomainResult<ProductRecord> {
        self.write()?.delete(code)
    }

    pub fn adjust_quantity(&self, code: &str, delta: i64) -> DomainResult<u64> {
        self.write()?.adjust_quantity(code, delta)
    }

    pub fn list(&self) -> DomainResult<Vec<ProductRecord>> {
        Ok(self.read()?.list())
    }

    pub fn sort(&self, key: SortKey) -> DomainResult<Vec<ProductRecord>> {
        Ok(self.read()?.sort(key))
    }

    pub fn sort_by_name(&self, key: &str) -> DomainResult<Vec<ProductRecord>> {
        self.read()?.sort_by_name(key)
    }

    pub fn filter(&self, filter: &ProductFilter) -> DomainResult<Vec<ProductRecord>> {
        Ok(self.read()?.filter(filter))
    }
}
