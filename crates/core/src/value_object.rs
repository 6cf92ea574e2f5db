//! Value object trait: equality by value, not identity.
//!
//! Value objects have **no identity**: they are defined entirely by their
//! attribute values. In this workspace the typical examples are update patches
//! and query descriptions (a filter, a sort key).

/// Marker trait for value objects.
///
/// ## Value Object vs Entity
///
/// - **Value Object**: no identity (two patches with the same fields are equal)
/// - **Entity**: has identity (two product records with the same code are the
///   same product)
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq)]
/// struct Patch {
///     price: Option<f64>,
/// }
///
/// impl ValueObject for Patch {}
///
/// assert_eq!(Patch { price: Some(1.5) }, Patch { price: Some(1.5) });
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
