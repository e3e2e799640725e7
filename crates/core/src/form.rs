//! Edit-form state for a single inventory item.
//!
//! The form is one immutable value. Every user edit is expressed as a
//! [`FormAction`] and applied with [`FormState::apply`], which returns the
//! next state. Text fields are kept exactly as typed; coercion into wire
//! types happens in [`crate::validation`].

use rust_decimal::Decimal;

use crate::search::FuzzyMatcher;
use crate::types::{Catalog, Color, InventoryItem, ItemId, Product, ProductId, ProductRef, sale_price};

/// Quantity shown when the item has none recorded.
pub const DEFAULT_QUANTITY: &str = "0";
/// Minimum stock threshold shown when the item has none recorded.
pub const DEFAULT_MIN_STOCK: u32 = 5;
/// Maximum stock threshold shown when the item has none recorded.
pub const DEFAULT_MAX_STOCK: u32 = 50;
/// Discount shown when the item has none recorded.
pub const DEFAULT_DISCOUNT: &str = "0";

/// A single edit to the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormAction {
    SetQuantity(String),
    SetBarcode(String),
    SetShelf(String),
    SetMinStock(String),
    SetMaxStock(String),
    SetDiscount(String),
    /// Pick a product name; recomputes the category options.
    SelectProductName(String),
    /// Pick a category; resolves the product for the current name.
    SelectCategory(String),
    /// Type into the color search box; opens the result list.
    SearchColors(String),
    /// Pick a color; sets name and code together and closes the list.
    SelectColor(Color),
    /// Dismiss the color list without changing the selection.
    CloseColorList,
}

/// Editable and derived fields of the item edit form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    pub item_id: ItemId,
    pub product_id: ProductId,
    pub product_name: String,
    pub category: String,
    /// Categories available for `product_name`.
    pub categories: Vec<String>,
    /// Retail price of the selected product, as display text.
    pub retail_price: String,
    pub quantity: String,
    pub barcode: String,
    pub shelf: String,
    pub min_stock: String,
    pub max_stock: String,
    pub color: String,
    pub color_code: String,
    pub discount_percentage: String,
    pub color_query: String,
    pub color_list_open: bool,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            item_id: ItemId::default(),
            product_id: ProductId::default(),
            product_name: String::new(),
            category: String::new(),
            categories: Vec::new(),
            retail_price: String::new(),
            quantity: DEFAULT_QUANTITY.to_string(),
            barcode: String::new(),
            shelf: String::new(),
            min_stock: DEFAULT_MIN_STOCK.to_string(),
            max_stock: DEFAULT_MAX_STOCK.to_string(),
            color: String::new(),
            color_code: String::new(),
            discount_percentage: DEFAULT_DISCOUNT.to_string(),
            color_query: String::new(),
            color_list_open: false,
        }
    }
}

impl FormState {
    /// Populate the form from a loaded item, filling defaults for missing fields.
    ///
    /// The product is taken from the populated reference when present and
    /// otherwise looked up in the catalog by id.
    #[must_use]
    pub fn from_item(item: &InventoryItem, catalog: &Catalog) -> Self {
        let product: Option<&Product> = match &item.product {
            Some(ProductRef::Populated(product)) => Some(product),
            Some(ProductRef::Id(id)) => catalog.product(id),
            None => None,
        };
        let product_id = item
            .product
            .as_ref()
            .map(|p| p.id().clone())
            .unwrap_or_default();
        let product_name = product.map(|p| p.name.clone()).unwrap_or_default();
        let color = item.color.clone().unwrap_or_default();

        Self {
            item_id: item.id.clone(),
            product_id,
            categories: catalog.categories_for(&product_name),
            product_name,
            category: item.category.clone().unwrap_or_default(),
            retail_price: product
                .and_then(|p| p.retail_price)
                .map(|price| price.to_string())
                .unwrap_or_default(),
            quantity: item
                .quantity
                .map_or_else(|| DEFAULT_QUANTITY.to_string(), |q| q.to_string()),
            barcode: item.barcode.clone().unwrap_or_default(),
            shelf: item.shelf.clone().unwrap_or_default(),
            min_stock: item
                .min_stock
                .unwrap_or(i64::from(DEFAULT_MIN_STOCK))
                .to_string(),
            max_stock: item
                .max_stock
                .unwrap_or(i64::from(DEFAULT_MAX_STOCK))
                .to_string(),
            color_query: color.clone(),
            color,
            color_code: item.color_code.clone().unwrap_or_default(),
            discount_percentage: item
                .discount_percentage
                .map_or_else(|| DEFAULT_DISCOUNT.to_string(), |d| d.normalize().to_string()),
            color_list_open: false,
        }
    }

    /// Apply one edit and return the next state.
    #[must_use]
    pub fn apply(self, action: FormAction, catalog: &Catalog) -> Self {
        match action {
            FormAction::SetQuantity(quantity) => Self { quantity, ..self },
            FormAction::SetBarcode(barcode) => Self { barcode, ..self },
            FormAction::SetShelf(shelf) => Self { shelf, ..self },
            FormAction::SetMinStock(min_stock) => Self { min_stock, ..self },
            FormAction::SetMaxStock(max_stock) => Self { max_stock, ..self },
            FormAction::SetDiscount(discount_percentage) => Self {
                discount_percentage,
                ..self
            },
            FormAction::SelectProductName(product_name) => {
                let categories = catalog.categories_for(&product_name);
                let keep_category = categories.contains(&self.category);
                let next = Self {
                    product_name,
                    categories,
                    ..self
                };
                if keep_category {
                    next.resolve_product(catalog)
                } else {
                    Self {
                        category: String::new(),
                        product_id: ProductId::default(),
                        retail_price: String::new(),
                        ..next
                    }
                }
            }
            FormAction::SelectCategory(category) => Self { category, ..self }.resolve_product(catalog),
            FormAction::SearchColors(color_query) => Self {
                color_query,
                color_list_open: true,
                ..self
            },
            FormAction::SelectColor(color) => Self {
                color_query: color.color_name.clone(),
                color: color.color_name,
                color_code: color.color_code,
                color_list_open: false,
                ..self
            },
            FormAction::CloseColorList => Self {
                color_list_open: false,
                ..self
            },
        }
    }

    /// Point `product_id` and `retail_price` at the product for the current
    /// name and category, clearing them when no such product exists.
    fn resolve_product(self, catalog: &Catalog) -> Self {
        match catalog.product_in(&self.product_name, &self.category) {
            Some(product) => Self {
                product_id: product.id.clone(),
                retail_price: product
                    .retail_price
                    .map(|price| price.to_string())
                    .unwrap_or_default(),
                ..self
            },
            None => Self {
                product_id: ProductId::default(),
                retail_price: String::new(),
                ..self
            },
        }
    }

    /// Sale price derived from the current retail price and discount.
    ///
    /// Empty when either is not a number.
    #[must_use]
    pub fn sale_price(&self) -> String {
        sale_price(&self.retail_price, &self.discount_percentage)
    }

    /// Colors to show under the search box; empty while the list is closed.
    #[must_use]
    pub fn color_options<'a>(&self, catalog: &'a Catalog, matcher: &FuzzyMatcher) -> Vec<&'a Color> {
        if !self.color_list_open {
            return Vec::new();
        }
        matcher.colors(catalog.colors(), &self.color_query)
    }

    /// Product names matching `query`.
    #[must_use]
    pub fn product_name_options<'a>(
        catalog: &'a Catalog,
        matcher: &FuzzyMatcher,
        query: &str,
    ) -> Vec<&'a String> {
        matcher.names(catalog.product_names(), query)
    }

    /// Discount as a decimal, if it parses.
    #[must_use]
    pub fn discount(&self) -> Option<Decimal> {
        crate::types::parse_number(&self.discount_percentage)
    }
}
