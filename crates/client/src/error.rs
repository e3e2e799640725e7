//! Error taxonomy of the item edit workflow.
//!
//! Every failure is recovered at the page level. Each variant maps to what
//! the presentation layer should do: show a toast, redirect, or nothing.

use stockroom_core::ValidationError;
use thiserror::Error;

use crate::api::ApiError;

/// Toast shown when loading fails without a server message.
pub const LOAD_FAILED: &str = "Failed to load item data";
/// Toast shown when saving fails without a server message.
pub const SAVE_FAILED: &str = "Failed to update item";

/// Where the presentation layer should navigate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// The sign-in flow.
    SignIn,
    /// The inventory item list.
    ItemList,
}

impl Route {
    /// Path of the route in the web client.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::SignIn => "/signin",
            Self::ItemList => "/items",
        }
    }
}

/// A one-line notification for the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Toast {
    Success(String),
    Error(String),
}

impl Toast {
    /// The notification text.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Success(message) | Self::Error(message) => message,
        }
    }
}

/// Failure of a workflow step.
#[derive(Debug, Error)]
pub enum EditError {
    /// No session; redirect to sign-in without a toast.
    #[error("Sign in required")]
    SignInRequired,

    /// One of the load requests failed.
    #[error("{message}")]
    Load {
        message: String,
        #[source]
        source: ApiError,
    },

    /// The form failed a local check; nothing was sent.
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    /// Another item already uses this product and category.
    #[error("An item with this product and category already exists")]
    Conflict,

    /// The precheck or the update request failed.
    #[error("{message}")]
    Save {
        message: String,
        #[source]
        source: ApiError,
    },

    /// Submit was attempted before the item finished loading.
    #[error("Item has not finished loading")]
    NotReady,

    /// The page was closed while a request was in flight.
    #[error("Item page was closed")]
    Closed,
}

impl EditError {
    pub(crate) fn load(source: ApiError) -> Self {
        Self::Load {
            message: source.user_message(LOAD_FAILED),
            source,
        }
    }

    pub(crate) fn save(source: ApiError) -> Self {
        Self::Save {
            message: source.user_message(SAVE_FAILED),
            source,
        }
    }

    /// Toast to show for this error, if any.
    #[must_use]
    pub fn toast(&self) -> Option<Toast> {
        match self {
            Self::SignInRequired | Self::Closed => None,
            _ => Some(Toast::Error(self.to_string())),
        }
    }

    /// Navigation this error calls for, if any.
    #[must_use]
    pub const fn route(&self) -> Option<Route> {
        match self {
            Self::SignInRequired => Some(Route::SignIn),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_in_redirects_without_toast() {
        let err = EditError::SignInRequired;
        assert_eq!(err.route(), Some(Route::SignIn));
        assert!(err.toast().is_none());
    }

    #[test]
    fn test_load_error_uses_server_message() {
        let err = EditError::load(ApiError::NotFound {
            path: "/items/9".to_string(),
            message: Some("Item not found".to_string()),
        });
        assert_eq!(err.toast(), Some(Toast::Error("Item not found".to_string())));
        assert!(err.route().is_none());
    }

    #[test]
    fn test_save_error_falls_back_to_generic_message() {
        let err = EditError::save(ApiError::Parse("truncated body".to_string()));
        assert_eq!(err.to_string(), SAVE_FAILED);
    }

    #[test]
    fn test_validation_error_passes_through() {
        let err = EditError::from(ValidationError::MissingRequired);
        assert_eq!(
            err.toast().map(|t| t.message().to_string()),
            Some("Please complete all required fields".to_string())
        );
    }

    #[test]
    fn test_route_paths() {
        assert_eq!(Route::SignIn.path(), "/signin");
        assert_eq!(Route::ItemList.path(), "/items");
    }
}
