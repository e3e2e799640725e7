//! Loading an item into the edit form.

use stockroom_core::{Catalog, FormState, ItemId};
use tracing::instrument;

use crate::api::{ApiError, InventoryApi};

/// Fetch both catalogs concurrently, then the item, and build the form.
///
/// The item is fetched only after both catalogs arrived because category
/// options are derived from the product catalog. The first failure aborts
/// the load; no partial result is returned.
///
/// # Errors
///
/// Returns the first `ApiError` raised by any of the three requests.
#[instrument(skip(api), fields(item_id = %item_id))]
pub async fn load_item<A: InventoryApi>(
    api: &A,
    item_id: &ItemId,
) -> Result<(Catalog, FormState), ApiError> {
    let (products, colors) = tokio::try_join!(api.products(), api.colors())?;
    let catalog = Catalog::new(products, colors);

    let item = api.item(item_id).await?;
    let form = FormState::from_item(&item, &catalog);

    tracing::debug!(
        products = catalog.products().len(),
        colors = catalog.colors().len(),
        categories = form.categories.len(),
        "Item loaded"
    );
    Ok((catalog, form))
}
