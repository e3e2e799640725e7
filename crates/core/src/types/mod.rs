//! Core types for the stockroom client.
//!
//! This module provides type-safe wrappers for the inventory domain.

pub mod catalog;
pub mod id;
pub mod item;
pub mod price;

pub use catalog::{Catalog, Color, Product, categories_for_name, distinct_product_names, find_product};
pub use id::*;
pub use item::{InventoryItem, ItemUpdate, ProductRef};
pub use price::{SalePrice, parse_number, sale_price};

use serde::{Deserialize, Deserializer};

/// Deserialize `null` as the type's default value.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}
