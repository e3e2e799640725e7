//! Client-side validation of the edit form.
//!
//! Checks run in a fixed order and the first failure is reported:
//!
//! 1. quantity, minimum and maximum stock are whole numbers `>= 0`
//! 2. minimum stock `<=` maximum stock
//! 3. product, category, color name and color code are filled in
//! 4. discount lies within `0..=100`
//!
//! A form that passes every check is turned into the [`ItemUpdate`] body.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::form::FormState;
use crate::types::{ItemUpdate, parse_number};

/// Why a form was rejected. The display text is shown to the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A stock figure is not a whole number.
    #[error("Quantity, minimum stock and maximum stock must be whole numbers")]
    InvalidStockNumber,

    /// A stock figure is negative.
    #[error("Quantity, minimum stock and maximum stock cannot be negative")]
    NegativeStock,

    /// Minimum stock exceeds maximum stock.
    #[error("Minimum stock cannot be greater than maximum stock")]
    MinAboveMax,

    /// A required field is blank.
    #[error("Please complete all required fields")]
    MissingRequired,

    /// Discount is not a number in `0..=100`.
    #[error("Discount percentage must be between 0 and 100")]
    DiscountOutOfRange,
}

/// Validate the form and build the update body.
///
/// # Errors
///
/// Returns the first [`ValidationError`] in check order.
pub fn validate(form: &FormState) -> Result<ItemUpdate, ValidationError> {
    let quantity = parse_whole(&form.quantity)?;
    let min_stock = parse_whole(&form.min_stock)?;
    let max_stock = parse_whole(&form.max_stock)?;

    if quantity < 0 || min_stock < 0 || max_stock < 0 {
        return Err(ValidationError::NegativeStock);
    }

    if min_stock > max_stock {
        return Err(ValidationError::MinAboveMax);
    }

    if form.product_id.is_empty()
        || is_blank(&form.category)
        || is_blank(&form.color)
        || is_blank(&form.color_code)
    {
        return Err(ValidationError::MissingRequired);
    }

    let discount_percentage = parse_number(&form.discount_percentage)
        .filter(|d| (Decimal::ZERO..=Decimal::ONE_HUNDRED).contains(d))
        .ok_or(ValidationError::DiscountOutOfRange)?;

    Ok(ItemUpdate {
        product_id: form.product_id.clone(),
        quantity: to_count(quantity)?,
        barcode: optional(&form.barcode),
        shelf: optional(&form.shelf),
        min_stock: to_count(min_stock)?,
        max_stock: to_count(max_stock)?,
        color: form.color.clone(),
        color_code: form.color_code.clone(),
        category: form.category.clone(),
        discount_percentage: discount_percentage.normalize(),
    })
}

fn parse_whole(input: &str) -> Result<i64, ValidationError> {
    input
        .trim()
        .parse::<i64>()
        .map_err(|_| ValidationError::InvalidStockNumber)
}

fn to_count(value: i64) -> Result<u32, ValidationError> {
    u32::try_from(value).map_err(|_| ValidationError::InvalidStockNumber)
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn optional(value: &str) -> Option<String> {
    (!is_blank(value)).then(|| value.to_string())
}
