//! Sale price derivation using decimal arithmetic.
//!
//! The sale price is never stored. It is derived from the product's retail
//! price and the item's discount percentage every time either changes:
//!
//! ```text
//! sale = retail - retail * discount / 100
//! ```
//!
//! and displayed with exactly two fractional digits.
//!
//! # Example
//!
//! ```rust
//! use stockroom_core::sale_price;
//!
//! assert_eq!(sale_price("1000", "10"), "900.00");
//! assert_eq!(sale_price("19.99", "0"), "19.99");
//! assert_eq!(sale_price("abc", "10"), "");
//! ```

use core::fmt;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Number of fractional digits shown for prices.
pub const PRICE_DECIMAL_PLACES: u32 = 2;

/// A derived, display-only sale price rounded to two decimal places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SalePrice(Decimal);

impl SalePrice {
    /// Derive the sale price from a retail price and a discount percentage.
    ///
    /// Returns `None` if the arithmetic overflows.
    #[must_use]
    pub fn derive(retail: Decimal, discount_percentage: Decimal) -> Option<Self> {
        let reduction = retail
            .checked_mul(discount_percentage)?
            .checked_div(Decimal::ONE_HUNDRED)?;
        let mut amount = retail
            .checked_sub(reduction)?
            .round_dp_with_strategy(PRICE_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero);
        amount.rescale(PRICE_DECIMAL_PLACES);
        Some(Self(amount))
    }

    /// Derive the sale price from raw form input.
    ///
    /// Returns `None` when either input is not a finite number.
    #[must_use]
    pub fn from_inputs(retail: &str, discount_percentage: &str) -> Option<Self> {
        Self::derive(parse_number(retail)?, parse_number(discount_percentage)?)
    }

    /// The rounded amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for SalePrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Sale price as display text, empty when the inputs are not numbers.
#[must_use]
pub fn sale_price(retail: &str, discount_percentage: &str) -> String {
    SalePrice::from_inputs(retail, discount_percentage)
        .map(|price| price.to_string())
        .unwrap_or_default()
}

/// Parse a user-entered number.
///
/// Accepts plain decimals (`"12.5"`, `"-3"`) and scientific notation
/// (`"1e3"`). Blank input, `NaN` and infinities are rejected.
///
/// Values are held as [`Decimal`], so magnitudes above [`Decimal::MAX`]
/// (about `7.9e28`) are rejected too. Finite values too small to represent
/// (`"1e-40"`) parse as zero.
#[must_use]
pub fn parse_number(input: &str) -> Option<Decimal> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .ok()
        .or_else(|| underflow_to_zero(trimmed))
}

/// Zero for finite inputs below one that `Decimal` cannot hold.
fn underflow_to_zero(input: &str) -> Option<Decimal> {
    let value = input.parse::<f64>().ok().filter(|v| v.is_finite())?;
    (value.abs() < 1.0).then_some(Decimal::ZERO)
}
