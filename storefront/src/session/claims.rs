//! Unverified access-token claim reader.
//!
//! SECURITY
//! ========
//! Nothing here verifies a signature, an issuer, or an expiry, and nothing
//! here can: the client never holds the signing key. Anyone can hand-craft a
//! token whose payload says `"role": "admin"`. Decoded claims are therefore
//! display hints only (show or hide the admin link, pick a greeting). They
//! are never an authorization decision; the backend re-checks the bearer
//! token on every request.

use base64::Engine as _;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use serde_json::{Map, Value};

/// URL-safe alphabet that accepts padded or unpadded input and
/// non-canonical trailing bits, matching what browsers' `atob` tolerates.
const LENIENT_URL_SAFE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Loosely typed claims map read from a token payload.
///
/// Advisory only; see the module docs.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DecodedClaims {
    claims: Map<String, Value>,
}

impl DecodedClaims {
    /// The `role` claim, when present and a string.
    #[must_use]
    pub fn role(&self) -> Option<&str> {
        self.str_claim("role")
    }

    /// The `sub` claim (user id on this backend).
    #[must_use]
    pub fn subject(&self) -> Option<&str> {
        self.str_claim("sub")
    }

    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.str_claim("email")
    }

    /// Raw access to any other claim.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.claims.get(name)
    }

    /// Whether the role claim names an administrator (`admin` or `ADMIN`).
    ///
    /// A UI affordance, not an access check.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        is_admin_role(self.role())
    }

    fn str_claim(&self, name: &str) -> Option<&str> {
        self.claims.get(name).and_then(Value::as_str)
    }
}

/// The exact role spellings the storefront gates admin views on.
#[must_use]
pub fn is_admin_role(role: Option<&str>) -> bool {
    matches!(role, Some("admin" | "ADMIN"))
}

/// Decode the payload segment of a compact `header.payload.signature` token.
///
/// Returns `None` for an absent token and for any malformed input: missing
/// segment, bad base64, non-UTF-8 bytes, or a payload that is not a JSON
/// object. Never panics.
#[must_use]
pub fn decode(token: Option<&str>) -> Option<DecodedClaims> {
    let payload = token?.split('.').nth(1)?;
    // Standard-alphabet characters are folded into the URL-safe ones.
    let payload = payload.replace('+', "-").replace('/', "_");
    let bytes = LENIENT_URL_SAFE.decode(payload).ok()?;
    let text = String::from_utf8(bytes).ok()?;
    match serde_json::from_str(&text) {
        Ok(Value::Object(claims)) => Some(DecodedClaims { claims }),
        Ok(_) => None,
        Err(e) => {
            tracing::debug!(error = %e, "token payload is not JSON");
            None
        }
    }
}

#[cfg(test)]
#[path = "claims_test.rs"]
mod claims_test;
