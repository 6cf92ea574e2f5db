use indexmap::IndexMap;

use stockbook_core::{DomainError, DomainResult, Entity, ProductCode};

use crate::query::{ProductFilter, SortKey};
use crate::record::{NewProduct, ProductPatch, ProductRecord};

/// In-memory product store.
///
/// Records are kept in insertion order ("canonical order") and keyed by code.
/// Only this type can create, change or remove a record; every read hands out
/// either a shared borrow or a clone.
///
/// Invariants:
/// - at most one record per code
/// - quantities never go below zero
/// - `sort` and `filter` never reorder the canonical collection
///
/// Single-threaded; see [`crate::SharedProductStore`] for concurrent use.
#[derive(Debug, Clone, Default)]
pub struct ProductStore {
    records: IndexMap<ProductCode, ProductRecord>,
}

impl ProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, code: &str) -> bool {
        self.records.contains_key(code)
    }

    /// Append a new record.
    ///
    /// Fails with `DuplicateCode` if the code is taken, or `Validation` for a
    /// blank name/category or an invalid price. The store is unchanged on
    /// failure.
    pub fn insert(&mut self, new: NewProduct) -> DomainResult<()> {
        if self.records.contains_key(&new.code) {
            tracing::warn!(code = %new.code, "rejected insert: duplicate code");
            return Err(DomainError::duplicate_code(new.code.into_inner()));
        }

        let record = ProductRecord::new(new)?;
        tracing::debug!(code = %record.code(), "product inserted");
        self.records.insert(record.id().clone(), record);
        Ok(())
    }

    pub fn find(&self, code: &str) -> DomainResult<&ProductRecord> {
        self.records
            .get(code)
            .ok_or_else(|| DomainError::not_found(code))
    }

    /// Overwrite the fields supplied in `patch`; absent fields are kept.
    pub fn update(&mut self, code: &str, patch: ProductPatch) -> DomainResult<()> {
        let record = self.find_mut(code)?;
        record.apply_patch(patch)?;
        tracing::debug!(code, "product updated");
        Ok(())
    }

    /// Remove a record, keeping the relative order of the others.
    pub fn delete(&mut self, code: &str) -> DomainResult<ProductRecord> {
        let removed = self
            .records
            .shift_remove(code)
            .ok_or_else(|| DomainError::not_found(code))?;
        tracing::debug!(code, "product deleted");
        Ok(removed)
    }

    /// Apply a signed stock movement and return the new quantity.
    ///
    /// Positive deltas are stock-in, negative ones stock-out. A movement that
    /// would take the quantity below zero fails with `InsufficientQuantity` and
    /// leaves the record as it was.
    pub fn adjust_quantity(&mut self, code: &str, delta: i64) -> DomainResult<u64> {
        let record = self.find_mut(code)?;
        let current = record.quantity();

        let Some(next) = current.checked_add_signed(delta) else {
            if delta < 0 {
                tracing::warn!(code, current, delta, "rejected stock-out: insufficient quantity");
                return Err(DomainError::insufficient_quantity(
                    code,
                    current,
                    delta.unsigned_abs(),
                ));
            }
            return Err(DomainError::validation(format!(
                "quantity overflow for {code} (current: {current}, delta: {delta})"
            )));
        };

        record.set_quantity(next);
        tracing::debug!(code, delta, quantity = next, "quantity adjusted");
        Ok(next)
    }

    /// All records in canonical order.
    pub fn list(&self) -> Vec<ProductRecord> {
        self.records.values().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProductRecord> {
        self.records.values()
    }

    /// Records ordered by `key`, ascending. Ties keep canonical order.
    pub fn sort(&self, key: SortKey) -> Vec<ProductRecord> {
        let mut records = self.list();
        key.sort(&mut records);
        records
    }

    /// Like [`Self::sort`], but takes the criterion by name and rejects
    /// unknown ones with `InvalidSortKey`.
    pub fn sort_by_name(&self, key: &str) -> DomainResult<Vec<ProductRecord>> {
        let key: SortKey = key.parse()?;
        Ok(self.sort(key))
    }

    /// Records matching every constraint of `filter`, in canonical order.
    pub fn filter(&self, filter: &ProductFilter) -> Vec<ProductRecord> {
        if filter.is_unconstrained() {
            return self.list();
        }
        self.records
            .values()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect()
    }

    fn find_mut(&mut self, code: &str) -> DomainResult<&mut ProductRecord> {
        self.records
            .get_mut(code)
            .ok_or_else(|| DomainError::not_found(code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(s: &str) -> ProductCode {
        ProductCode::new(s).unwrap()
    }

    fn product(c: &str, name: &str, category: &str, price: f64, quantity: u64) -> NewProduct {
        NewProduct::new(code(c), name, category, price, quantity)
    }

    fn names(records: &[ProductRecord]) -> Vec<&str> {
        records.iter().map(|r| r.name()).collect()
    }

    fn codes(records: &[ProductRecord]) -> Vec<&str> {
        records.iter().map(|r| r.code().as_str()).collect()
    }

    fn school_supplies() -> ProductStore {
        let mut store = ProductStore::new();
        store.insert(product("1", "Lápiz", "Escritura", 0.50, 100)).unwrap();
        store.insert(product("2", "Lapicero", "Escritura", 1.20, 40)).unwrap();
        store.insert(product("3", "Cuaderno", "Papel", 2.75, 30)).unwrap();
        store
    }

    #[test]
    fn insert_appends_in_order() {
        let store = school_supplies();
        assert_eq!(store.len(), 3);
        assert_eq!(codes(&store.list()), ["1", "2", "3"]);
    }

    #[test]
    fn insert_rejects_duplicate_code_and_leaves_store_unchanged() {
        let mut store = school_supplies();
        let before = store.list();

        let err = store
            .insert(product("2", "Otro", "Varios", 9.0, 1))
            .unwrap_err();

        assert_eq!(err, DomainError::duplicate_code("2"));
        assert_eq!(store.list(), before);
    }

    #[test]
    fn insert_rejects_invalid_fields_without_side_effects() {
        let mut store = school_supplies();
        let err = store.insert(product("9", "Goma", "Escritura", -1.0, 1)).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert!(!store.contains("9"));
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn find_reports_missing_code() {
        let store = school_supplies();
        assert_eq!(store.find("2").unwrap().name(), "Lapicero");
        assert_eq!(store.find("42").unwrap_err(), DomainError::not_found("42"));
    }

    #[test]
    fn update_is_a_partial_patch() {
        let mut store = school_supplies();
        store.update("3", ProductPatch::new().price(9.99)).unwrap();

        let record = store.find("3").unwrap();
        assert_eq!(record.price(), 9.99);
        assert_eq!(record.name(), "Cuaderno");
        assert_eq!(record.category(), "Papel");
        assert_eq!(record.quantity(), 30);
    }

    #[test]
    fn update_missing_code_is_not_found() {
        let mut store = school_supplies();
        let err = store.update("7", ProductPatch::new().name("X")).unwrap_err();
        assert_eq!(err, DomainError::not_found("7"));
    }

    #[test]
    fn update_with_empty_patch_changes_nothing() {
        let mut store = school_supplies();
        let before = store.list();
        store.update("1", ProductPatch::new()).unwrap();
        assert_eq!(store.list(), before);
    }

    #[test]
    fn update_does_not_move_the_record() {
        let mut store = school_supplies();
        store.update("1", ProductPatch::new().name("Zapato")).unwrap();
        assert_eq!(codes(&store.list()), ["1", "2", "3"]);
    }

    #[test]
    fn delete_preserves_relative_order() {
        let mut store = school_supplies();
        let removed = store.delete("2").unwrap();

        assert_eq!(removed.name(), "Lapicero");
        assert_eq!(codes(&store.list()), ["1", "3"]);
        assert_eq!(store.find("2").unwrap_err(), DomainError::not_found("2"));
    }

    #[test]
    fn delete_missing_code_leaves_store_unchanged() {
        let mut store = school_supplies();
        assert_eq!(store.delete("9").unwrap_err(), DomainError::not_found("9"));
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn deleted_code_can_be_reused() {
        let mut store = school_supplies();
        store.delete("1").unwrap();
        store.insert(product("1", "Lápiz HB", "Escritura", 0.6, 5)).unwrap();
        assert_eq!(codes(&store.list()), ["2", "3", "1"]);
    }

    #[test]
    fn adjust_quantity_applies_signed_delta() {
        let mut store = school_supplies();
        assert_eq!(store.adjust_quantity("3", 5).unwrap(), 35);
        assert_eq!(store.adjust_quantity("3", -35).unwrap(), 0);
        assert_eq!(store.find("3").unwrap().quantity(), 0);
    }

    #[test]
    fn adjust_quantity_rejects_going_negative() {
        let mut store = school_supplies();
        let err = store.adjust_quantity("2", -41).unwrap_err();

        assert_eq!(err, DomainError::insufficient_quantity("2", 40, 41));
        assert_eq!(store.find("2").unwrap().quantity(), 40);
    }

    #[test]
    fn adjust_quantity_handles_extreme_deltas() {
        let mut store = school_supplies();
        let err = store.adjust_quantity("1", i64::MIN).unwrap_err();
        assert_eq!(
            err,
            DomainError::insufficient_quantity("1", 100, i64::MIN.unsigned_abs())
        );

        store.update("1", ProductPatch::new().quantity(u64::MAX)).unwrap();
        let err = store.adjust_quantity("1", 1).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(store.find("1").unwrap().quantity(), u64::MAX);
    }

    #[test]
    fn adjust_quantity_missing_code_is_not_found() {
        let mut store = school_supplies();
        assert_eq!(
            store.adjust_quantity("x", 1).unwrap_err(),
            DomainError::not_found("x")
        );
    }

    #[test]
    fn sort_by_name_is_case_insensitive() {
        let mut store = ProductStore::new();
        store.insert(product("1", "borrador", "Varios", 1.0, 1)).unwrap();
        store.insert(product("2", "Agenda", "Papel", 1.0, 1)).unwrap();
        store.insert(product("3", "Cinta", "Varios", 1.0, 1)).unwrap();

        assert_eq!(names(&store.sort(SortKey::Name)), ["Agenda", "borrador", "Cinta"]);
    }

    #[test]
    fn sort_by_price_is_stable() {
        let mut store = ProductStore::new();
        store.insert(product("1", "B", "X", 1.0, 0)).unwrap();
        store.insert(product("2", "A", "X", 2.0, 0)).unwrap();
        store.insert(product("3", "A", "X", 1.0, 0)).unwrap();

        let sorted = store.sort(SortKey::Price);
        assert_eq!(codes(&sorted), ["1", "3", "2"]);
        assert_eq!(names(&sorted), ["B", "A", "A"]);
    }

    #[test]
    fn zero_and_negative_zero_prices_tie() {
        let mut store = ProductStore::new();
        store.insert(product("1", "Goma", "Borrado", 0.0, 5)).unwrap();
        store.insert(product("2", "Goma blanda", "Borrado", -0.0, 5)).unwrap();

        assert_eq!(codes(&store.sort(SortKey::Price)), ["1", "2"]);
        assert!(store.find("2").unwrap().price().is_sign_positive());
    }

    #[test]
    fn sort_by_name_folds_accents() {
        let mut store = ProductStore::new();
        store.insert(product("1", "Borrador", "Útiles", 1.0, 1)).unwrap();
        store.insert(product("2", "Ábaco", "Matemáticas", 1.0, 1)).unwrap();
        store.insert(product("3", "abaco", "Arte", 1.0, 1)).unwrap();

        assert_eq!(names(&store.sort(SortKey::Name)), ["Ábaco", "abaco", "Borrador"]);
        assert_eq!(codes(&store.sort(SortKey::Category)), ["3", "2", "1"]);
    }

    #[test]
    fn sort_by_category_then_quantity() {
        let store = school_supplies();
        assert_eq!(codes(&store.sort(SortKey::Category)), ["1", "2", "3"]);
        assert_eq!(codes(&store.sort(SortKey::Quantity)), ["3", "2", "1"]);
    }

    #[test]
    fn sort_does_not_touch_canonical_order() {
        let store = school_supplies();
        let _ = store.sort(SortKey::Price);
        assert_eq!(codes(&store.list()), ["1", "2", "3"]);
    }

    #[test]
    fn sort_by_name_rejects_unknown_key() {
        let store = school_supplies();
        assert_eq!(
            store.sort_by_name("color").unwrap_err(),
            DomainError::invalid_sort_key("color")
        );
        assert_eq!(codes(&store.sort_by_name("stock").unwrap()), ["3", "2", "1"]);
    }

    #[test]
    fn filter_is_a_conjunction() {
        let store = school_supplies();
        let found = store.filter(&ProductFilter::new().name("lap").category("escritura"));
        assert_eq!(names(&found), ["Lápiz", "Lapicero"]);

        let found = store.filter(&ProductFilter::new().name("lap").category("papel"));
        assert!(found.is_empty());
    }

    #[test]
    fn filter_by_code_substring() {
        let mut store = school_supplies();
        store.insert(product("12", "Regla", "Geometría", 1.5, 20)).unwrap();
        let found = store.filter(&ProductFilter::new().code("1"));
        assert_eq!(codes(&found), ["1", "12"]);
    }

    #[test]
    fn unconstrained_filter_returns_everything() {
        let store = school_supplies();
        assert_eq!(store.filter(&ProductFilter::new()), store.list());
    }

    #[test]
    fn empty_store_views_are_empty() {
        let store = ProductStore::new();
        assert!(store.is_empty());
        assert!(store.list().is_empty());
        assert!(store.sort(SortKey::Name).is_empty());
        assert!(store.filter(&ProductFilter::new().name("a")).is_empty());
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        #[derive(Debug, Clone)]
        enum Op {
            Insert { code: u8, name: String, price: u16, quantity: u16 },
            Delete { code: u8 },
            Adjust { code: u8, delta: i32 },
        }

        fn op() -> impl Strategy<Value = Op> {
            prop_oneof![
                (0u8..16, "[A-Za-z]{1,8}", any::<u16>(), any::<u16>()).prop_map(
                    |(code, name, price, quantity)| Op::Insert { code, name, price, quantity }
                ),
                (0u8..16).prop_map(|code| Op::Delete { code }),
                (0u8..16, -500i32..500).prop_map(|(code, delta)| Op::Adjust { code, delta }),
            ]
        }

        fn run(store: &mut ProductStore, op: &Op) {
            match op {
                Op::Insert { code, name, price, quantity } => {
                    let _ = store.insert(product(
                        &code.to_string(),
                        name,
                        "Varios",
                        f64::from(*price) / 100.0,
                        u64::from(*quantity),
                    ));
                }
                Op::Delete { code } => {
                    let _ = store.delete(&code.to_string());
                }
                Op::Adjust { code, delta } => {
                    let _ = store.adjust_quantity(&code.to_string(), i64::from(*delta));
                }
            }
        }

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 256,
                ..ProptestConfig::default()
            })]

            /// Property: codes stay unique whatever sequence of operations runs.
            #[test]
            fn codes_stay_unique(ops in prop::collection::vec(op(), 0..64)) {
                let mut store = ProductStore::new();
                for op in &ops {
                    run(&mut store, op);
                }

                let mut seen: Vec<String> = store.iter().map(|r| r.code().to_string()).collect();
                let total = seen.len();
                seen.sort();
                seen.dedup();
                prop_assert_eq!(seen.len(), total);
            }

            /// Property: a failed adjustment never changes the quantity.
            #[test]
            fn failed_adjustment_is_a_no_op(start in 0u64..1000, delta in -2000i64..2000) {
                let mut store = ProductStore::new();
                store.insert(product("1", "Regla", "Geometría", 1.5, start)).unwrap();

                match store.adjust_quantity("1", delta) {
                    Ok(next) => {
                        prop_assert!(i128::from(start) + i128::from(delta) >= 0);
                        prop_assert_eq!(i128::from(next), i128::from(start) + i128::from(delta));
                    }
                    Err(err) => {
                        prop_assert_eq!(err.kind(), "insufficient_quantity");
                        prop_assert_eq!(store.find("1").unwrap().quantity(), start);
                    }
                }
            }

            /// Property: every sort is a stable permutation of the canonical list.
            #[test]
            fn sorts_are_stable_permutations(
                rows in prop::collection::vec(("[a-cA-C]{1,2}", 0u8..4, 0u64..4), 0..32)
            ) {
                let mut store = ProductStore::new();
                for (idx, (name, price, quantity)) in rows.iter().enumerate() {
                    store
                        .insert(product(&idx.to_string(), name, name, f64::from(*price), *quantity))
                        .unwrap();
                }

                for key in SortKey::ALL {
                    let sorted = store.sort(key);
                    prop_assert_eq!(sorted.len(), store.len());

                    let position = |r: &ProductRecord| store.records.get_index_of(r.code()).unwrap();
                    for pair in sorted.windows(2) {
                        let (a, b) = (&pair[0], &pair[1]);
                        let order = match key {
                            SortKey::Name => crate::query::fold(a.name()).cmp(&crate::query::fold(b.name())),
                            SortKey::Category => crate::query::fold(a.category()).cmp(&crate::query::fold(b.category())),
                            SortKey::Price => a.price().total_cmp(&b.price()),
                            SortKey::Quantity => a.quantity().cmp(&b.quantity()),
                        };
                        prop_assert!(order.is_le());
                        if order.is_eq() {
                            prop_assert!(position(a) < position(b));
                        }
                    }
                }
            }

            /// Property: a filter result is the ordered subsequence of `list()` it matches.
            #[test]
            fn filter_is_an_ordered_subsequence(
                names in prop::collection::vec("[a-dA-D]{1,4}", 0..24),
                needle in "[a-d]{0,2}"
            ) {
                let mut store = ProductStore::new();
                for (idx, name) in names.iter().enumerate() {
                    store.insert(product(&idx.to_string(), name, "Varios", 1.0, 1)).unwrap();
                }

                let filter = ProductFilter::new().name(&needle);
                let expected: Vec<ProductRecord> =
                    store.list().into_iter().filter(|r| filter.matches(r)).collect();
                prop_assert_eq!(store.filter(&filter), expected);
            }
        }
    }
}
