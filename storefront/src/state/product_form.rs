//! Admin "Add Product" form: raw field text in, [`NewProduct`] out.
//!
//! Checks mirror the backend's own validation so most mistakes are caught
//! before a round trip; the backend still has the final word.

use crate::net::types::NewProduct;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ProductFormError {
    #[error("Title is required")]
    MissingTitle,
    #[error("Description is required")]
    MissingDescription,
    #[error("Price (cents) must be a non-negative number")]
    InvalidPrice,
    #[error("Stock must be a non-negative number")]
    InvalidStock,
}

/// Unvalidated form input, exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductForm {
    pub title: String,
    pub description: String,
    pub price_cents: String,
    pub image: String,
    pub stock: String,
}

impl ProductForm {
    /// Validate and convert.
    ///
    /// Title and description are trimmed and must be non-empty. Blank price
    /// or stock counts as 0. A blank image URL is omitted from the request.
    ///
    /// # Errors
    ///
    /// Returns the first failing check, in field order.
    pub fn validate(&self) -> Result<NewProduct, ProductFormError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ProductFormError::MissingTitle);
        }
        let description = self.description.trim();
        if description.is_empty() {
            return Err(ProductFormError::MissingDescription);
        }
        let price_cents = parse_non_negative(&self.price_cents).ok_or(ProductFormError::InvalidPrice)?;
        let stock = parse_non_negative(&self.stock).ok_or(ProductFormError::InvalidStock)?;
        let image = Some(self.image.trim()).filter(|s| !s.is_empty()).map(str::to_owned);

        Ok(NewProduct { title: title.to_owned(), description: description.to_owned(), price_cents, image, stock })
    }
}

fn parse_non_negative(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Some(0);
    }
    raw.parse::<i64>().ok().filter(|n| *n >= 0)
}

#[cfg(test)]
#[path = "product_form_test.rs"]
mod product_form_test;
