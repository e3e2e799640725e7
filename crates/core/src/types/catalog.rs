//! Reference data: the product and color catalogs.
//!
//! Both catalogs are read-only from the client's point of view.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{ColorId, ProductId};
use super::null_as_default;

/// A catalog product referenced by inventory items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Backend identifier.
    #[serde(rename = "_id")]
    pub id: ProductId,
    /// Display name. Several products may share a name, one per category.
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Category this product is sold under.
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,
    /// Retail price before any item discount.
    #[serde(default)]
    pub retail_price: Option<Decimal>,
}

/// A named, hex-coded color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Color {
    /// Backend identifier.
    #[serde(rename = "_id")]
    pub id: ColorId,
    /// Human readable name, e.g. "Crimson Red".
    #[serde(default, deserialize_with = "null_as_default")]
    pub color_name: String,
    /// Color code, e.g. "#DC143C".
    #[serde(default, deserialize_with = "null_as_default")]
    pub color_code: String,
}

/// Reference data the edit form resolves against.
///
/// Holds both catalogs plus the distinct product-name list derived from the
/// product catalog for the name search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    products: Vec<Product>,
    colors: Vec<Color>,
    product_names: Vec<String>,
}

impl Catalog {
    /// Build a catalog, deriving the distinct product names.
    #[must_use]
    pub fn new(products: Vec<Product>, colors: Vec<Color>) -> Self {
        let product_names = distinct_product_names(&products);
        Self {
            products,
            colors,
            product_names,
        }
    }

    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    /// Distinct product names in first-seen order.
    #[must_use]
    pub fn product_names(&self) -> &[String] {
        &self.product_names
    }

    /// Categories offered for `name`.
    #[must_use]
    pub fn categories_for(&self, name: &str) -> Vec<String> {
        categories_for_name(&self.products, name)
    }

    /// Look up a product by id.
    #[must_use]
    pub fn product(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }

    /// The product sold under `name` in `category`.
    #[must_use]
    pub fn product_in(&self, name: &str, category: &str) -> Option<&Product> {
        find_product(&self.products, name, category)
    }
}

/// Distinct product names in first-seen order.
#[must_use]
pub fn distinct_product_names(products: &[Product]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for product in products {
        if !product.name.is_empty() && !names.contains(&product.name) {
            names.push(product.name.clone());
        }
    }
    names
}

/// Categories offered for every product carrying `name`, in catalog order.
#[must_use]
pub fn categories_for_name(products: &[Product], name: &str) -> Vec<String> {
    let mut categories: Vec<String> = Vec::new();
    for product in products.iter().filter(|p| p.name == name) {
        if !product.category.is_empty() && !categories.contains(&product.category) {
            categories.push(product.category.clone());
        }
    }
    categories
}

/// The product sold under `name` in `category`, if any.
#[must_use]
pub fn find_product<'a>(products: &'a [Product], name: &str, category: &str) -> Option<&'a Product> {
    products
        .iter()
        .find(|p| p.name == name && p.category == category)
}
