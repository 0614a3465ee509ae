//! View-model helpers shared by storefront front ends.
//!
//! DESIGN
//! ======
//! Pages hold no session state of their own. They read a snapshot with
//! [`auth::AuthState::read`], gate with the `require_*` helpers, and re-read
//! when the session's change subscription fires.

pub mod auth;
pub mod product_form;
