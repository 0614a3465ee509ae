//! JSON shapes exchanged with the storefront backend.
//!
//! Field names follow the backend's camelCase DTOs. Money is always integer
//! cents.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Body of `POST /api/auth/login` and `POST /api/auth/register`.
#[derive(Serialize)]
pub struct AuthRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

impl std::fmt::Debug for AuthRequest<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthRequest").field("email", &self.email).field("password", &"<redacted>").finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price_cents: i64,
    #[serde(default)]
    pub image: Option<String>,
    pub stock: i64,
}

/// Body of `POST /api/admin/products` and `PUT /api/admin/products/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub title: String,
    pub description: String,
    pub price_cents: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub stock: i64,
}

/// Body of `POST /api/cart/items`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_id: Uuid,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    #[serde(default)]
    pub items: Vec<CartViewItem>,
    #[serde(default)]
    pub total_cents: i64,
}

impl CartView {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartViewItem {
    pub product: Product,
    pub quantity: u32,
    pub item_total_cents: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    /// `null` for orders whose user account no longer exists.
    #[serde(default)]
    pub user_id: Option<Uuid>,
    #[serde(default)]
    pub user_email: Option<String>,
    #[serde(default)]
    pub items: Vec<OrderItemView>,
    pub total_cents: i64,
    pub status: String,
    /// ISO-8601 timestamp as sent by the backend.
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OrderItemView {
    pub title: String,
    pub quantity: u32,
}

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;
