//! Command handlers.
//!
//! DESIGN
//! ======
//! Each handler follows the page convention of the screen it stands in for:
//!
//! - Reads of session-scoped data (cart, orders, admin orders) gate on the
//!   stored token, and any failure clears the session and asks for a new
//!   login.
//! - Mutations (add, remove, checkout, admin product forms) report the
//!   backend's message and leave the session alone.
//! - Admin commands check the role claim first. That check only hides the
//!   command; the backend enforces the role.
//!
//! Handlers return the text to print so they can be driven without a
//! terminal.

use storefront::net::types::CartView;
use storefront::net::{ApiError, Storefront};
use storefront::state::auth::{AuthState, invalidate_on_failure, require_admin, require_session};
use storefront::state::product_form::ProductForm;
use storefront::storage::Storage;
use uuid::Uuid;

use crate::cli::{AdminSubcommand, Command, Credentials};
use crate::error::CliError;
use crate::render;

/// # Errors
///
/// Returns the failure the matching screen would show.
pub async fn run<S: Storage>(store: &Storefront<S>, command: Command) -> Result<String, CliError> {
    match command {
        Command::Login(creds) => login(store, creds).await,
        Command::Register(creds) => register(store, creds).await,
        Command::Logout => {
            store.logout()?;
            Ok("signed out".to_owned())
        }
        Command::Whoami => Ok(render::whoami(&AuthState::read(store.session()))),
        Command::Products => Ok(render::products(&store.products().await?)),
        Command::Product { id } => Ok(render::product(&store.product(id).await?)),
        Command::Cart => {
            require_session(store.session())?;
            let cart = invalidate_on_failure(store.session(), store.cart().await).map_err(expired)?;
            Ok(render::cart(&cart))
        }
        Command::Add { id, quantity } => {
            require_session(store.session())?;
            let cart = store.add_to_cart(id, quantity).await.map_err(inline)?;
            Ok(updated_cart("Added to cart", &cart))
        }
        Command::Remove { id } => {
            require_session(store.session())?;
            let cart = store.remove_from_cart(id).await.map_err(inline)?;
            Ok(updated_cart("Removed from cart", &cart))
        }
        Command::Checkout => {
            require_session(store.session())?;
            let order = store.checkout().await.map_err(inline)?;
            Ok(format!("Order placed\n{}", render::order(&order)))
        }
        Command::Orders => {
            require_session(store.session())?;
            let orders = invalidate_on_failure(store.session(), store.orders().await).map_err(expired)?;
            Ok(render::orders(&orders))
        }
        Command::Admin(admin) => run_admin(store, admin.command).await,
    }
}

async fn run_admin<S: Storage>(store: &Storefront<S>, command: AdminSubcommand) -> Result<String, CliError> {
    require_admin(store.session())?;
    match command {
        AdminSubcommand::Orders => {
            let orders = invalidate_on_failure(store.session(), store.admin_orders().await).map_err(expired)?;
            Ok(render::orders(&orders))
        }
        AdminSubcommand::CreateProduct(args) => {
            let product = ProductForm::from(args).validate()?;
            let created = store.create_product(&product).await.map_err(inline)?;
            Ok(format!("Product created\n{}", render::product(&created)))
        }
        AdminSubcommand::UpdateProduct { id, product } => {
            let product = ProductForm::from(product).validate()?;
            let updated = store.update_product(id, &product).await.map_err(inline)?;
            Ok(format!("Product updated\n{}", render::product(&updated)))
        }
        AdminSubcommand::DeleteProduct { id } => {
            store.delete_product(id).await.map_err(inline)?;
            Ok(format!("Product {id} deleted"))
        }
    }
}

async fn login<S: Storage>(store: &Storefront<S>, creds: Credentials) -> Result<String, CliError> {
    match store.login(&creds.email, &creds.password).await {
        Ok(_) => Ok(render::whoami(&AuthState::read(store.session()))),
        Err(ApiError::Network(e)) => {
            tracing::warn!(error = %e, "login could not reach the backend");
            Err(CliError::NetworkError)
        }
        Err(ApiError::Storage(e)) => Err(CliError::Storage(e)),
        Err(e) => {
            tracing::debug!(error = %e, "login rejected");
            Err(CliError::InvalidCredentials)
        }
    }
}

async fn register<S: Storage>(store: &Storefront<S>, creds: Credentials) -> Result<String, CliError> {
    match store.register(&creds.email, &creds.password).await {
        Ok(text) if text.trim().is_empty() => Ok("Registered; you can now log in".to_owned()),
        Ok(text) => Ok(text),
        Err(ApiError::Network(e)) => {
            tracing::warn!(error = %e, "register could not reach the backend");
            Err(CliError::NetworkError)
        }
        Err(e) => Err(CliError::Message(e.server_text().unwrap_or("Registration failed").to_owned())),
    }
}

fn updated_cart(headline: &str, cart: &CartView) -> String {
    format!("{headline}\n{}", render::cart(cart))
}

/// A failed session-scoped read already cleared the session.
fn expired<R>(_: R) -> CliError {
    CliError::SessionExpired
}

/// Mutations show the backend's message and keep the session.
fn inline(e: ApiError) -> CliError {
    match e {
        ApiError::Request { message, .. } => CliError::Message(message),
        other => CliError::Api(other),
    }
}

#[cfg(test)]
#[path = "commands_test.rs"]
mod commands_test;
