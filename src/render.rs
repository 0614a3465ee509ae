//! Plain-text views of backend data.

use std::fmt::Write as _;

use storefront::net::types::{CartView, Order, Product};
use storefront::state::auth::AuthState;
use storefront::util::format::{availability, format_cents};

pub fn whoami(state: &AuthState) -> String {
    if !state.signed_in {
        return "not signed in".to_owned();
    }
    let name = state.username().unwrap_or("unknown user");
    let mut out = format!("signed in as {name}");
    if let Some(email) = &state.email {
        let _ = write!(out, " <{email}>");
    }
    if state.is_admin() {
        out.push_str(" (admin)");
    }
    out
}

pub fn products(products: &[Product]) -> String {
    if products.is_empty() {
        return "no products".to_owned();
    }
    let mut out = String::new();
    for p in products {
        let price = format_cents(p.price_cents);
        let _ = writeln!(out, "{}  {:<32} {price:>12}  {}", p.id, p.title, availability(p.stock).label());
    }
    out
}

pub fn product(p: &Product) -> String {
    let stock = availability(p.stock);
    let mut out = format!("{}\n{}\n", p.title, format_cents(p.price_cents));
    let _ = writeln!(out, "{}", stock.label());
    if let Some(description) = p.description.as_deref().filter(|d| !d.is_empty()) {
        let _ = writeln!(out, "\n{description}");
    }
    if let Some(image) = &p.image {
        let _ = writeln!(out, "image: {image}");
    }
    if !stock.can_purchase() {
        out.push_str("not available for purchase\n");
    }
    let _ = writeln!(out, "id: {}", p.id);
    out
}

pub fn cart(cart: &CartView) -> String {
    if cart.is_empty() {
        return "your cart is empty".to_owned();
    }
    let mut out = String::new();
    for item in &cart.items {
        let _ = writeln!(
            out,
            "{} x{}  {}  ({})",
            item.product.title,
            item.quantity,
            format_cents(item.item_total_cents),
            item.product.id,
        );
    }
    let _ = write!(out, "total: {}", format_cents(cart.total_cents));
    out
}

pub fn order(order: &Order) -> String {
    let total = format_cents(order.total_cents);
    let mut out = format!("order {}  {}  {total}  {}", order.id, order.status, order.created_at);
    if let Some(email) = &order.user_email {
        let _ = write!(out, "  {email}");
    }
    out.push('\n');
    for item in &order.items {
        let _ = writeln!(out, "  {} x{}", item.title, item.quantity);
    }
    out
}

pub fn orders(orders: &[Order]) -> String {
    if orders.is_empty() {
        return "no orders".to_owned();
    }
    orders.iter().map(order).collect()
}

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;
