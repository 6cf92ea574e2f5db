//! Products domain module: the in-memory product store.
//!
//! This crate contains the product record model and the store that owns it,
//! implemented as deterministic domain logic (no IO, no storage). Front-end
//! helpers for parsing form input and rendering listings live alongside it.

pub mod input;
pub mod listing;
pub mod query;
pub mod record;
pub mod shared;
pub mod store;

pub use input::{CodePolicy, StockDirection};
pub use listing::{describe_error, render_listing};
pub use query::{ProductFilter, SortKey};
pub use record::{NewProduct, ProductPatch, ProductRecord};
pub use shared::SharedProductStore;
pub use store::ProductStore;
