//! Parsing of raw, user-typed field values into typed store inputs.
//!
//! The store assumes well-typed inputs. Front-ends run their text fields
//! through these helpers first, which reproduce the checks the inventory forms
//! performed: every field required on insert, digit-only codes, a decimal
//! price and a whole-number quantity.

use core::str::FromStr;

use stockbook_core::{DomainError, DomainResult, ProductCode};

use crate::record::{NewProduct, ProductPatch};

/// Accepted format for product codes typed by a user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CodePolicy {
    /// ASCII digits only (e.g. `"001"`).
    #[default]
    Digits,
    /// Any non-blank text.
    Opaque,
}

impl CodePolicy {
    pub fn parse_code(self, raw: &str) -> DomainResult<ProductCode> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(DomainError::validation("code is required"));
        }
        if self == CodePolicy::Digits && !is_digits(raw) {
            return Err(DomainError::validation(format!(
                "code must contain digits only (got {raw:?})"
            )));
        }
        ProductCode::new(raw)
    }
}

impl FromStr for CodePolicy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "digits" => Ok(CodePolicy::Digits),
            "opaque" => Ok(CodePolicy::Opaque),
            other => Err(DomainError::validation(format!("unknown code policy: {other}"))),
        }
    }
}

/// Direction of a stock movement form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockDirection {
    In,
    Out,
}

/// Parse an insert form. All five fields are required.
pub fn parse_new_product(
    policy: CodePolicy,
    code: &str,
    name: &str,
    category: &str,
    price: &str,
    quantity: &str,
) -> DomainResult<NewProduct> {
    let fields = [code, name, category, price, quantity];
    if fields.iter().any(|f| f.trim().is_empty()) {
        return Err(DomainError::validation("all fields are required"));
    }

    Ok(NewProduct {
        code: policy.parse_code(code)?,
        name: name.trim().to_string(),
        category: category.trim().to_string(),
        price: parse_price(price)?,
        quantity: parse_quantity(quantity)?,
    })
}

/// Parse an edit form. Blank fields mean "leave unchanged".
pub fn parse_patch(
    name: &str,
    category: &str,
    price: &str,
    quantity: &str,
) -> DomainResult<ProductPatch> {
    Ok(ProductPatch {
        name: non_blank(name).map(str::to_string),
        category: non_blank(category).map(str::to_string),
        price: non_blank(price).map(parse_price).transpose()?,
        quantity: non_blank(quantity).map(parse_quantity).transpose()?,
    })
}

/// Parse a stock-in / stock-out form into a signed delta.
pub fn parse_movement(direction: StockDirection, amount: &str) -> DomainResult<i64> {
    let amount = amount.trim();
    if !is_digits(amount) {
        return Err(DomainError::validation(format!(
            "amount must be a whole number (got {amount:?})"
        )));
    }
    let amount: i64 = amount
        .parse()
        .map_err(|_| DomainError::validation(format!("amount is too large: {amount}")))?;
    if amount == 0 {
        return Err(DomainError::validation("amount must be greater than zero"));
    }

    Ok(match direction {
        StockDirection::In => amount,
        StockDirection::Out => -amount,
    })
}

pub fn parse_price(raw: &str) -> DomainResult<f64> {
    let raw = raw.trim();
    let price: f64 = raw
        .parse()
        .map_err(|_| DomainError::validation(format!("invalid price: {raw:?}")))?;
    if !price.is_finite() || price < 0.0 {
        return Err(DomainError::validation(format!(
            "price must be a non-negative number (got {raw:?})"
        )));
    }
    // "-0" parses to negative zero.
    Ok(price + 0.0)
}

pub fn parse_quantity(raw: &str) -> DomainResult<u64> {
    let raw = raw.trim();
    if !is_digits(raw) {
        return Err(DomainError::validation(format!(
            "quantity must be a whole number (got {raw:?})"
        )));
    }
    raw.parse()
        .map_err(|_| DomainError::validation(format!("quantity is too large: {raw}")))
}

fn non_blank(raw: &str) -> Option<&str> {
    let raw = raw.trim();
    (!raw.is_empty()).then_some(raw)
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}
