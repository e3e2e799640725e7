//! Inventory item commands.
//!
//! # Usage
//!
//! ```bash
//! # Print the loaded form
//! stockroom item show 42
//!
//! # Change stock levels and pick a color by approximate name
//! stockroom item edit 42 --quantity 12 --min-stock 2 --color crimsn
//!
//! # Move the item to another product and category
//! stockroom item edit 42 --product "Oak Table" --category Wood
//! ```
//!
//! # Environment Variables
//!
//! - `STOCKROOM_API_URL` - Backend base URL
//! - `STOCKROOM_TOKEN` - Bearer token (otherwise read from the session file)

use clap::Args;
use stockroom_client::{ClientConfig, EditItemPage, InventoryApi, Session};
use stockroom_core::{FormAction, ItemId};

use super::CliError;
use crate::output;

/// Field edits for `item edit`. Omitted flags leave the field unchanged.
#[derive(Debug, Default, Args)]
pub struct ItemEdits {
    /// Units on hand
    #[arg(long, allow_hyphen_values = true)]
    pub quantity: Option<String>,

    #[arg(long)]
    pub barcode: Option<String>,

    /// Shelf location
    #[arg(long)]
    pub shelf: Option<String>,

    /// Minimum stock threshold
    #[arg(long, allow_hyphen_values = true)]
    pub min_stock: Option<String>,

    /// Maximum stock threshold
    #[arg(long, allow_hyphen_values = true)]
    pub max_stock: Option<String>,

    /// Product name; the closest catalog name is used
    #[arg(long)]
    pub product: Option<String>,

    /// Category for the product
    #[arg(long)]
    pub category: Option<String>,

    /// Color name or code; the closest catalog color is used
    #[arg(long)]
    pub color: Option<String>,

    /// Discount percentage (0-100)
    #[arg(long, allow_hyphen_values = true)]
    pub discount: Option<String>,
}

impl ItemEdits {
    /// Actions for the plain text fields, in form order.
    #[must_use]
    pub fn field_actions(&self) -> Vec<FormAction> {
        let fields: [(Option<&String>, fn(String) -> FormAction); 6] = [
            (self.quantity.as_ref(), FormAction::SetQuantity),
            (self.barcode.as_ref(), FormAction::SetBarcode),
            (self.shelf.as_ref(), FormAction::SetShelf),
            (self.min_stock.as_ref(), FormAction::SetMinStock),
            (self.max_stock.as_ref(), FormAction::SetMaxStock),
            (self.discount.as_ref(), FormAction::SetDiscount),
        ];
        fields
            .into_iter()
            .filter_map(|(value, action)| value.cloned().map(action))
            .collect()
    }
}

/// Load an item and print its form.
///
/// # Errors
///
/// Returns error if the operator is signed out or loading fails.
pub async fn show(id: &str) -> Result<(), CliError> {
    let page = open(id).await?;
    output::print(&output::render_form(page.form(), &page.sale_price()));
    Ok(())
}

/// Load an item, apply `edits`, and save.
///
/// # Errors
///
/// Returns error if loading fails, a search flag matches nothing, the form
/// is invalid, a duplicate exists, or the update is rejected.
pub async fn edit(id: &str, edits: &ItemEdits) -> Result<(), CliError> {
    let mut page = open(id).await?;
    apply_edits(&mut page, edits)?;

    let submitted = page.submit().await?;
    tracing::info!(item_id = %page.item_id(), route = submitted.route.path(), "Item saved");
    output::print(&output::render_form(page.form(), &page.sale_price()));
    output::print(submitted.toast.message());
    Ok(())
}

async fn open(id: &str) -> Result<EditItemPage<stockroom_client::InventoryClient>, CliError> {
    let config = ClientConfig::from_env()?;
    let session = Session::resolve(&config)?;
    let mut page = EditItemPage::open(&config, session.as_ref(), ItemId::new(id))?;
    page.load().await?;
    Ok(page)
}

/// Apply `edits` to a loaded page the way an operator would in the form.
///
/// The product name is chosen before the category because changing the
/// name can clear it.
fn apply_edits<A: InventoryApi>(page: &mut EditItemPage<A>, edits: &ItemEdits) -> Result<(), CliError> {
    for action in edits.field_actions() {
        page.dispatch(action);
    }

    if let Some(query) = &edits.product {
        let name = page
            .product_name_options(query)
            .first()
            .map(|name| (*name).clone())
            .ok_or_else(|| CliError::NoMatch {
                kind: "product",
                query: query.clone(),
            })?;
        page.dispatch(FormAction::SelectProductName(name));
    }

    if let Some(category) = &edits.category {
        page.dispatch(FormAction::SelectCategory(category.clone()));
    }

    if let Some(query) = &edits.color {
        page.dispatch(FormAction::SearchColors(query.clone()));
        let color = page.color_options().first().map(|color| (*color).clone());
        match color {
            Some(color) => page.dispatch(FormAction::SelectColor(color)),
            None => {
                page.dispatch(FormAction::CloseColorList);
                return Err(CliError::NoMatch {
                    kind: "color",
                    query: query.clone(),
                });
            }
        }
    }

    Ok(())
}
