//! Inventory item records as read from and written to the backend.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::catalog::Product;
use super::id::{ItemId, ProductId};

/// The `productId` field of an item: populated with the product, or a bare id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProductRef {
    /// The backend populated the reference.
    Populated(Product),
    /// Only the identifier was returned.
    Id(ProductId),
}

impl ProductRef {
    /// Identifier of the referenced product.
    #[must_use]
    pub const fn id(&self) -> &ProductId {
        match self {
            Self::Populated(product) => &product.id,
            Self::Id(id) => id,
        }
    }
}

/// A stock-keeping record as returned by `GET /items/{id}`.
///
/// Every attribute is optional on the wire; the edit form fills in defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    #[serde(rename = "_id")]
    pub id: ItemId,
    #[serde(rename = "productId", default)]
    pub product: Option<ProductRef>,
    #[serde(default)]
    pub quantity: Option<i64>,
    #[serde(default)]
    pub barcode: Option<String>,
    #[serde(default)]
    pub shelf: Option<String>,
    #[serde(default)]
    pub min_stock: Option<i64>,
    #[serde(default)]
    pub max_stock: Option<i64>,
    /// Color name.
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub color_code: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub discount_percentage: Option<Decimal>,
}

/// Body of `PUT /items/{id}`.
///
/// Built only by the validator, so the stock figures are non-negative and the
/// discount lies within `0..=100`. Empty optional text is sent as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemUpdate {
    pub product_id: ProductId,
    pub quantity: u32,
    pub barcode: Option<String>,
    pub shelf: Option<String>,
    pub min_stock: u32,
    pub max_stock: u32,
    /// Color name.
    pub color: String,
    pub color_code: String,
    pub category: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub discount_percentage: Decimal,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_item_with_populated_product() {
        let item: InventoryItem = serde_json::from_value(json!({
            "_id": "42",
            "productId": {"_id": "p1", "name": "Chair", "category": "Wood", "retailPrice": 1000},
            "quantity": 3,
            "discountPercentage": 10
        }))
        .unwrap();

        let product = item.product.unwrap();
        assert_eq!(product.id().as_str(), "p1");
        assert!(matches!(product, ProductRef::Populated(_)));
        assert_eq!(item.quantity, Some(3));
        assert_eq!(item.discount_percentage, Some(Decimal::TEN));
        assert!(item.min_stock.is_none());
    }

    #[test]
    fn test_item_with_bare_product_id() {
        let item: InventoryItem =
            serde_json::from_value(json!({"_id": "42", "productId": "p1", "barcode": null}))
                .unwrap();
        assert!(matches!(item.product, Some(ProductRef::Id(ref id)) if id.as_str() == "p1"));
        assert!(item.barcode.is_none());
    }

    #[test]
    fn test_update_serializes_numbers_and_nulls() {
        let update = ItemUpdate {
            product_id: ProductId::new("p1"),
            quantity: 4,
            barcode: None,
            shelf: Some("B2".to_string()),
            min_stock: 5,
            max_stock: 50,
            color: "Blue".to_string(),
            color_code: "#0000FF".to_string(),
            category: "Wood".to_string(),
            discount_percentage: Decimal::new(125, 1),
        };

        let value = serde_json::to_value(&update).unwrap();
        assert_eq!(
            value,
            json!({
                "productId": "p1",
                "quantity": 4,
                "barcode": null,
                "shelf": "B2",
                "minStock": 5,
                "maxStock": 50,
                "color": "Blue",
                "colorCode": "#0000FF",
                "category": "Wood",
                "discountPercentage": 12.5
            })
        );
    }
}
