//! Backend address configuration parsed from environment variables.

pub const API_BASE_URL_ENV: &str = "ISDSTORE_API_BASE_URL";
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorefrontConfig {
    /// Backend origin without a trailing `/`, e.g. `http://localhost:8080`.
    pub api_base_url: String,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self::with_base_url(DEFAULT_API_BASE_URL)
    }
}

impl StorefrontConfig {
    /// Build config from the environment.
    ///
    /// Optional:
    /// - `ISDSTORE_API_BASE_URL`: backend origin, default `http://localhost:8080`
    ///
    /// An empty or whitespace-only value falls back to the default.
    #[must_use]
    pub fn from_env() -> Self {
        std::env::var(API_BASE_URL_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map_or_else(Self::default, |v| Self::with_base_url(v.trim()))
    }

    #[must_use]
    pub fn with_base_url(base_url: &str) -> Self {
        Self { api_base_url: base_url.trim_end_matches('/').to_owned() }
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
