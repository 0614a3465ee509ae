//! # storefront
//!
//! Client-state layer for the ISDStore hardware shop. All business logic
//! (inventory, pricing, orders, authentication) lives in the backend API;
//! this crate keeps the session tokens, reads advisory claims out of them,
//! and wraps HTTP calls with the bearer token attached.
//!
//! The crate is target-independent. Native front ends persist the session
//! with [`storage::FileStorage`]; browser builds enable the `web` feature and
//! use [`storage::LocalStorage`].

pub mod config;
pub mod net;
pub mod session;
pub mod state;
pub mod storage;
pub mod util;
