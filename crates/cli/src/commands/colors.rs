//! Color catalog search.
//!
//! # Usage
//!
//! ```bash
//! stockroom colors          # every color
//! stockroom colors crimsn   # approximate match on name or code
//! ```

use stockroom_client::edit_item::connect;
use stockroom_client::{ClientConfig, InventoryApi, Session};
use stockroom_core::FuzzyMatcher;

use super::CliError;
use crate::output;

/// Print the colors matching `query`, best first.
///
/// # Errors
///
/// Returns error if the operator is signed out or the catalog request fails.
pub async fn search(query: &str) -> Result<(), CliError> {
    let config = ClientConfig::from_env()?;
    let session = Session::resolve(&config)?;
    let api = connect(&config, session.as_ref())?;

    let colors = api.colors().await?;
    let matcher = FuzzyMatcher::new(config.color_threshold);
    let matches = matcher.colors(&colors, query);

    tracing::debug!(query, total = colors.len(), matched = matches.len(), "Color search");
    output::print(&output::render_colors(&matches));
    Ok(())
}
