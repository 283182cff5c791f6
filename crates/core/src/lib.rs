//! Frontier Core - Shared domain types.
//!
//! This crate provides the types used by the Frontier Estate Services site:
//! - `site` - Public marketing pages and the admin panel
//! - `integration-tests` - End-to-end tests against the running router
//!
//! # Architecture
//!
//! The core crate contains only types and pure helpers - no I/O, no HTTP
//! clients. Rows coming back from the remote data service deserialize
//! straight into these types.
//!
//! # Modules
//!
//! - [`types`] - Entities, type-safe IDs, emails, and sale statuses
//! - [`pagination`] - Fixed-size page arithmetic for list views

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod pagination;
pub mod types;

pub use pagination::{MESSAGES_PER_PAGE, Pagination};
pub use types::*;
