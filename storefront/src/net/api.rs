//! Typed wrappers around the storefront backend endpoints.
//!
//! Login and registration go out without a bearer token. Every other call
//! attaches the stored token when one exists; the catalogue endpoints also
//! work anonymously.

use serde::de::DeserializeOwned;
use uuid::Uuid;

use super::client::{ApiClient, ApiError, RequestOptions};
use super::types::{AuthRequest, CartItem, CartView, NewProduct, Order, Product};
use crate::session::{Profile, Session, TokenPair};
use crate::storage::Storage;

pub struct Storefront<S> {
    client: ApiClient<S>,
}

impl<S> Clone for Storefront<S> {
    fn clone(&self) -> Self {
        Self { client: self.client.clone() }
    }
}

impl<S: Storage> Storefront<S> {
    pub fn new(client: ApiClient<S>) -> Self {
        Self { client }
    }

    #[must_use]
    pub fn client(&self) -> &ApiClient<S> {
        &self.client
    }

    #[must_use]
    pub fn session(&self) -> &Session<S> {
        self.client.session()
    }

    // =========================================================================
    // AUTH
    // =========================================================================

    /// Exchange credentials for a token pair and persist it together with
    /// the profile `{email}`.
    ///
    /// # Errors
    ///
    /// Returns the backend rejection (401 on bad credentials), a transport
    /// error, or a storage error if the session could not be written.
    pub async fn login(&self, email: &str, password: &str) -> Result<TokenPair, ApiError> {
        let options = RequestOptions::post().anonymous().json(&AuthRequest { email, password })?;
        let tokens: TokenPair = self.expect_json("/api/auth/login", options).await?;
        self.session().save(&tokens)?;
        self.session().save_profile(&Profile { email: email.to_owned() })?;
        tracing::info!("signed in");
        Ok(tokens)
    }

    /// Create an account. Does not sign in; the backend answers with text.
    ///
    /// # Errors
    ///
    /// Returns the backend rejection (e.g. `Email already in use`) or a
    /// transport error.
    pub async fn register(&self, email: &str, password: &str) -> Result<String, ApiError> {
        let options = RequestOptions::post().anonymous().json(&AuthRequest { email, password })?;
        self.client.request_text("/api/auth/register", options).await
    }

    /// Forget the local session. The backend holds no session state to end.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend rejects the removal.
    pub fn logout(&self) -> Result<(), ApiError> {
        self.session().clear()?;
        tracing::info!("signed out");
        Ok(())
    }

    // =========================================================================
    // CATALOGUE
    // =========================================================================

    /// # Errors
    ///
    /// Returns request or transport errors.
    pub async fn products(&self) -> Result<Vec<Product>, ApiError> {
        Ok(self.client.request_json("/api/products", RequestOptions::get()).await?.unwrap_or_default())
    }

    /// # Errors
    ///
    /// Returns `ApiError::Request` with status 404 for an unknown id.
    pub async fn product(&self, id: Uuid) -> Result<Product, ApiError> {
        self.expect_json(&format!("/api/products/{id}"), RequestOptions::get()).await
    }

    // =========================================================================
    // CART & ORDERS
    // =========================================================================

    /// # Errors
    ///
    /// Returns request or transport errors.
    pub async fn cart(&self) -> Result<CartView, ApiError> {
        self.expect_json("/api/cart", RequestOptions::get()).await
    }

    /// Add `quantity` of a product; returns the updated cart.
    ///
    /// # Errors
    ///
    /// Returns request or transport errors.
    pub async fn add_to_cart(&self, product_id: Uuid, quantity: u32) -> Result<CartView, ApiError> {
        let options = RequestOptions::post().json(&CartItem { product_id, quantity })?;
        self.expect_json("/api/cart/items", options).await
    }

    /// # Errors
    ///
    /// Returns request or transport errors.
    pub async fn remove_from_cart(&self, product_id: Uuid) -> Result<CartView, ApiError> {
        self.expect_json(&format!("/api/cart/items/{product_id}"), RequestOptions::delete()).await
    }

    /// Turn the cart into an order. The backend empties the cart.
    ///
    /// # Errors
    ///
    /// Returns `Cart is empty` (400) and other request or transport errors.
    pub async fn checkout(&self) -> Result<Order, ApiError> {
        self.expect_json("/api/checkout", RequestOptions::post()).await
    }

    /// # Errors
    ///
    /// Returns request or transport errors.
    pub async fn orders(&self) -> Result<Vec<Order>, ApiError> {
        Ok(self.client.request_json("/api/orders", RequestOptions::get()).await?.unwrap_or_default())
    }

    // =========================================================================
    // ADMIN
    // =========================================================================

    /// # Errors
    ///
    /// Returns 403 for non-admin bearers, and other request or transport errors.
    pub async fn admin_orders(&self) -> Result<Vec<Order>, ApiError> {
        Ok(self.client.request_json("/api/admin/orders", RequestOptions::get()).await?.unwrap_or_default())
    }

    /// # Errors
    ///
    /// Returns the backend's validation text (400) or 403 for non-admins.
    pub async fn create_product(&self, product: &NewProduct) -> Result<Product, ApiError> {
        self.expect_json("/api/admin/products", RequestOptions::post().json(product)?).await
    }

    /// # Errors
    ///
    /// Returns 404 for an unknown id, and other request or transport errors.
    pub async fn update_product(&self, id: Uuid, product: &NewProduct) -> Result<Product, ApiError> {
        self.expect_json(&format!("/api/admin/products/{id}"), RequestOptions::put().json(product)?).await
    }

    /// # Errors
    ///
    /// Returns 404 for an unknown id, and other request or transport errors.
    pub async fn delete_product(&self, id: Uuid) -> Result<(), ApiError> {
        self.client
            .request_json::<serde_json::Value>(&format!("/api/admin/products/{id}"), RequestOptions::delete())
            .await?;
        Ok(())
    }

    async fn expect_json<T: DeserializeOwned>(&self, path: &str, options: RequestOptions) -> Result<T, ApiError> {
        self.client
            .request_json(path, options)
            .await?
            .ok_or_else(|| ApiError::EmptyResponse { path: path.to_owned() })
    }
}

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;
