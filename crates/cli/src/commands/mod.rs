//! CLI command implementations.

pub mod colors;
pub mod item;
pub mod session;

use stockroom_client::{ApiError, ConfigError, EditError, SessionError};
use thiserror::Error;

use crate::output;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Environment configuration is missing or invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The session could not be read or written.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// A step of the item edit workflow failed.
    #[error(transparent)]
    Edit(#[from] EditError),

    /// A backend request outside the edit workflow failed.
    #[error("{}", .0.user_message("Request failed"))]
    Api(#[from] ApiError),

    /// Nothing in the catalog matched a `--product` or `--color` search.
    #[error("No {kind} matches '{query}'")]
    NoMatch { kind: &'static str, query: String },

    /// Sale price inputs were not numbers.
    #[error("Retail price and discount must be numbers")]
    InvalidPrice,
}

/// Print the sale price for `retail` discounted by `discount` percent.
///
/// # Errors
///
/// Returns `CliError::InvalidPrice` if either input is not a number.
pub fn sale_price(retail: &str, discount: &str) -> Result<(), CliError> {
    let price = stockroom_core::sale_price(retail, discount);
    if price.is_empty() {
        return Err(CliError::InvalidPrice);
    }
    output::print(&price);
    Ok(())
}
