//! Derived views over the store: sort keys and substring filters.

use core::cmp::Ordering;
use core::str::FromStr;

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use stockbook_core::{DomainError, ValueObject};

use crate::record::ProductRecord;

/// Criterion for [`crate::ProductStore::sort`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKey {
    Name,
    Price,
    Category,
    Quantity,
}

impl ValueObject for SortKey {}

impl SortKey {
    pub const ALL: [SortKey; 4] = [
        SortKey::Name,
        SortKey::Price,
        SortKey::Category,
        SortKey::Quantity,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Name => "name",
            SortKey::Price => "price",
            SortKey::Category => "category",
            SortKey::Quantity => "quantity",
        }
    }

    /// Sort `records` in place, ascending. The sort is stable.
    pub(crate) fn sort(self, records: &mut [ProductRecord]) {
        match self {
            SortKey::Name => records.sort_by_cached_key(|r| fold(r.name())),
            SortKey::Category => records.sort_by_cached_key(|r| fold(r.category())),
            SortKey::Price => records.sort_by(|a, b| compare_price(a.price(), b.price())),
            SortKey::Quantity => records.sort_by_key(|r| r.quantity()),
        }
    }
}

impl core::fmt::Display for SortKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "name" => Ok(SortKey::Name),
            "price" => Ok(SortKey::Price),
            "category" => Ok(SortKey::Category),
            // "stock" is the name older front-ends used for the quantity column.
            "quantity" | "stock" => Ok(SortKey::Quantity),
            _ => Err(DomainError::invalid_sort_key(s)),
        }
    }
}

fn compare_price(a: f64, b: f64) -> Ordering {
    a.total_cmp(&b)
}

/// Conjunction of substring predicates over code, name and category.
///
/// An empty substring places no constraint on its field, so the default filter
/// matches every record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    code: String,
    name: String,
    category: String,
}

impl ValueObject for ProductFilter {}

impl ProductFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn code(mut self, needle: impl AsRef<str>) -> Self {
        self.code = fold(needle.as_ref());
        self
    }

    pub fn name(mut self, needle: impl AsRef<str>) -> Self {
        self.name = fold(needle.as_ref());
        self
    }

    pub fn category(mut self, needle: impl AsRef<str>) -> Self {
        self.category = fold(needle.as_ref());
        self
    }

    /// True when no field is constrained.
    pub fn is_unconstrained(&self) -> bool {
        self.code.is_empty() && self.name.is_empty() && self.category.is_empty()
    }

    pub fn matches(&self, record: &ProductRecord) -> bool {
        contains_folded(record.code().as_str(), &self.code)
            && contains_folded(record.name(), &self.name)
            && contains_folded(record.category(), &self.category)
    }
}

fn contains_folded(haystack: &str, folded_needle: &str) -> bool {
    folded_needle.is_empty() || fold(haystack).contains(folded_needle)
}

/// Case- and accent-insensitive form of `s`: canonical decomposition with
/// combining marks dropped, then lowercased. `"Lápiz"` folds to `"lapiz"`.
pub fn fold(s: &str) -> String {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}
