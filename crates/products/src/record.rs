use serde::{Deserialize, Serialize};

use stockbook_core::{DomainError, DomainResult, Entity, ProductCode, ValueObject};

/// One inventory entry, keyed by its unique code.
///
/// Records are owned by [`crate::ProductStore`]; callers only ever see clones or
/// shared borrows, so the fields are read through accessors.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductRecord {
    code: ProductCode,
    name: String,
    category: String,
    price: f64,
    quantity: u64,
}

impl ProductRecord {
    /// Build a record from an insert payload, validating every field.
    pub fn new(new: NewProduct) -> DomainResult<Self> {
        validate_text("name", &new.name)?;
        validate_text("category", &new.category)?;
        validate_price(new.price)?;

        Ok(Self {
            code: new.code,
            name: new.name,
            category: new.category,
            price: normalize_price(new.price),
            quantity: new.quantity,
        })
    }

    pub fn code(&self) -> &ProductCode {
        &self.code
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn quantity(&self) -> u64 {
        self.quantity
    }

    /// Apply a partial update.
    ///
    /// All supplied fields are validated before any of them is written, so a
    /// rejected patch leaves the record untouched.
    pub(crate) fn apply_patch(&mut self, patch: ProductPatch) -> DomainResult<()> {
        patch.validate()?;

        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(price) = patch.price {
            self.price = normalize_price(price);
        }
        if let Some(quantity) = patch.quantity {
            self.quantity = quantity;
        }
        Ok(())
    }

    pub(crate) fn set_quantity(&mut self, quantity: u64) {
        self.quantity = quantity;
    }
}

impl Entity for ProductRecord {
    type Id = ProductCode;

    fn id(&self) -> &Self::Id {
        &self.code
    }
}

/// Insert payload for [`crate::ProductStore::insert`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub code: ProductCode,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub quantity: u64,
}

impl NewProduct {
    pub fn new(
        code: ProductCode,
        name: impl Into<String>,
        category: impl Into<String>,
        price: f64,
        quantity: u64,
    ) -> Self {
        Self {
            code,
            name: name.into(),
            category: category.into(),
            price,
            quantity,
        }
    }
}

/// Partial update: `None` fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub quantity: Option<u64>,
}

impl ValueObject for ProductPatch {}

impl ProductPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    pub fn quantity(mut self, quantity: u64) -> Self {
        self.quantity = Some(quantity);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.category.is_none()
            && self.price.is_none()
            && self.quantity.is_none()
    }

    fn validate(&self) -> DomainResult<()> {
        if let Some(name) = &self.name {
            validate_text("name", name)?;
        }
        if let Some(category) = &self.category {
            validate_text("category", category)?;
        }
        if let Some(price) = self.price {
            validate_price(price)?;
        }
        Ok(())
    }
}

fn validate_text(field: &str, value: &str) -> DomainResult<()> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Maps `-0.0` to `0.0` so equal prices compare and print the same.
fn normalize_price(price: f64) -> f64 {
    price + 0.0
}

fn validate_price(price: f64) -> DomainResult<()> {
    if !price.is_finite() || price < 0.0 {
        return Err(DomainError::validation(format!(
            "price must be a non-negative number (got {price})"
        )));
    }
    Ok(())
}
