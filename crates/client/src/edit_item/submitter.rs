//! Persisting a validated form.

use stockroom_core::{ItemId, ItemUpdate};
use tracing::instrument;

use crate::api::InventoryApi;
use crate::error::EditError;

/// Run the duplicate precheck, then write the update.
///
/// The two requests are not atomic: another client may create a duplicate
/// between the check and the write.
///
/// # Errors
///
/// Returns `EditError::Conflict` if another item already uses the product and
/// category (no write is issued), or `EditError::Save` if either request fails.
#[instrument(skip(api, update), fields(item_id = %item_id, product_id = %update.product_id))]
pub async fn submit_update<A: InventoryApi>(
    api: &A,
    item_id: &ItemId,
    update: &ItemUpdate,
) -> Result<(), EditError> {
    let exists = api
        .item_exists(&update.product_id, &update.category, item_id)
        .await
        .map_err(EditError::save)?;

    if exists {
        tracing::info!(category = %update.category, "Duplicate item, update skipped");
        return Err(EditError::Conflict);
    }

    api.update_item(item_id, update)
        .await
        .map_err(EditError::save)
}
