//! Response envelopes of the inventory backend.
//!
//! The backend is not consistent about wrapping: products always come under
//! `products`, colors and items may or may not be wrapped.

use serde::Deserialize;
use stockroom_core::{Color, InventoryItem, Product};

/// `GET /product`
#[derive(Debug, Deserialize)]
pub(crate) struct ProductsResponse {
    #[serde(default)]
    pub products: Vec<Product>,
}

/// `GET /colors/allcolors`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ColorsResponse {
    List(Vec<Color>),
    Wrapped { colors: Vec<Color> },
}

impl ColorsResponse {
    pub fn into_colors(self) -> Vec<Color> {
        match self {
            Self::List(colors) | Self::Wrapped { colors } => colors,
        }
    }
}

/// `GET /items/{id}`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ItemResponse {
    Wrapped { item: InventoryItem },
    Bare(InventoryItem),
}

impl ItemResponse {
    pub fn into_item(self) -> InventoryItem {
        match self {
            Self::Wrapped { item } | Self::Bare(item) => item,
        }
    }
}

/// `GET /items/check`
#[derive(Debug, Deserialize)]
pub(crate) struct ExistsResponse {
    pub exists: bool,
}

/// Error payload; either key may carry the message.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorBody {
    pub fn into_message(self) -> Option<String> {
        self.message
            .or(self.error)
            .filter(|m| !m.trim().is_empty())
    }
}
