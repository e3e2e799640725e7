//! Stockroom Core - domain logic for the inventory item editor.
//!
//! This crate provides everything about editing an inventory item that does
//! not touch the network:
//! - reference data (products, colors) and item records as the backend sends them
//! - the derived sale price
//! - the edit form as an immutable value with a reducer
//! - the validator that gates submission
//! - fuzzy search over colors and product names
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no async. The `stockroom-client` crate drives these types against
//! the REST backend.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, catalog and item records, sale price derivation
//! - [`form`] - Form state and [`FormAction`] reducer
//! - [`validation`] - Ordered submission checks
//! - [`search`] - Approximate substring matching

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod form;
pub mod search;
pub mod types;
pub mod validation;

pub use form::{FormAction, FormState};
pub use search::FuzzyMatcher;
pub use types::*;
pub use validation::{ValidationError, validate};
