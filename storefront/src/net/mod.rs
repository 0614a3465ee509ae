//! HTTP access to the storefront backend.
//!
//! - [`client`] attaches the stored bearer token and normalizes responses
//! - [`types`] holds the backend's JSON shapes
//! - [`api`] wraps each backend endpoint in a typed call

pub mod api;
pub mod client;
pub mod types;

pub use api::Storefront;
pub use client::{ApiClient, ApiError, RequestOptions};
