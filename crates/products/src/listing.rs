//! Text rendering of store results for terminal front-ends.

use core::fmt;

use stockbook_core::DomainError;

use crate::record::ProductRecord;

/// Shown instead of a listing when there is nothing to list.
pub const EMPTY_LISTING: &str = "No products.";

impl fmt::Display for ProductRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Code: {} | Name: {} | Category: {} | Price: ${:.2} | Quantity: {}",
            self.code(),
            self.name(),
            self.category(),
            self.price(),
            self.quantity()
        )
    }
}

/// One line per record, in the order given.
pub fn render_listing(records: &[ProductRecord]) -> String {
    if records.is_empty() {
        return EMPTY_LISTING.to_string();
    }
    records
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// User-facing message for a rejected operation.
pub fn describe_error(err: &DomainError) -> String {
    match err {
        DomainError::DuplicateCode(code) => {
            format!("A product with code {code} already exists.")
        }
        DomainError::NotFound(code) => format!("Product {code} not found."),
        DomainError::InsufficientQuantity {
            code,
            available,
            requested,
        } => format!(
            "Not enough stock for product {code}: {available} available, {requested} requested."
        ),
        DomainError::InvalidSortKey(key) => format!(
            "Cannot sort by {key:?}; use name, price, category or quantity."
        ),
        DomainError::Validation(msg) => format!("Invalid input: {msg}."),
        DomainError::Unavailable(msg) => format!("Inventory is unavailable ({msg})."),
    }
}
