//! Stockroom Client - talks to the inventory REST backend.
//!
//! # Architecture
//!
//! - [`config`] - Environment configuration (`STOCKROOM_*`)
//! - [`session`] - Explicit operator session carrying the bearer token
//! - [`api`] - `reqwest` client behind the [`api::InventoryApi`] trait
//! - [`edit_item`] - The load → edit → validate → precheck → save workflow
//! - [`error`] - Workflow errors, toasts and navigation targets
//!
//! All pure domain logic lives in `stockroom-core`.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod edit_item;
pub mod error;
pub mod session;

pub use api::{ApiError, InventoryApi, InventoryClient};
pub use config::{ClientConfig, ConfigError};
pub use edit_item::{EditItemPage, PageHandle, PageState, SubmitState, Submitted};
pub use error::{EditError, Route, Toast};
pub use session::{Session, SessionError};
