//! Provider connection and pacing configuration.

use std::time::Duration;

/// Configuration for the provider client, loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Base HTTP URL of the provider API.
    pub base_url: String,
    /// API account name.
    pub username: String,
    /// API account password.
    pub password: String,
    /// Rows requested per bulk export page (default: `2000`).
    pub page_size: usize,
    /// Hard ceiling on pages fetched in one run (default: `500`).
    pub max_pages: usize,
    /// Delay between page requests (default: `500` ms).
    pub page_delay: Duration,
}

impl ProviderConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                  | Default |
    /// |--------------------------|---------|
    /// | `PROVIDER_BASE_URL`      | —       |
    /// | `PROVIDER_USERNAME`      | —       |
    /// | `PROVIDER_PASSWORD`      | —       |
    /// | `PROVIDER_PAGE_SIZE`     | `2000`  |
    /// | `PROVIDER_MAX_PAGES`     | `500`   |
    /// | `PROVIDER_PAGE_DELAY_MS` | `500`   |
    ///
    /// The three credential variables have no defaults; startup fails fast
    /// when they are missing.
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("PROVIDER_BASE_URL").expect("PROVIDER_BASE_URL must be set");
        let username =
            std::env::var("PROVIDER_USERNAME").expect("PROVIDER_USERNAME must be set");
        let password =
            std::env::var("PROVIDER_PASSWORD").expect("PROVIDER_PASSWORD must be set");

        let page_size: usize = std::env::var("PROVIDER_PAGE_SIZE")
            .unwrap_or_else(|_| "2000".into())
            .parse()
            .expect("PROVIDER_PAGE_SIZE must be a valid usize");

        let max_pages: usize = std::env::var("PROVIDER_MAX_PAGES")
            .unwrap_or_else(|_| "500".into())
            .parse()
            .expect("PROVIDER_MAX_PAGES must be a valid usize");

        let page_delay_ms: u64 = std::env::var("PROVIDER_PAGE_DELAY_MS")
            .unwrap_or_else(|_| "500".into())
            .parse()
            .expect("PROVIDER_PAGE_DELAY_MS must be a valid u64");

        Self {
            base_url,
            username,
            password,
            page_size,
            max_pages,
            page_delay: Duration::from_millis(page_delay_ms),
        }
    }

    /// Config for exercising the client against a local mock server.
    pub fn for_tests(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            username: "test-account".into(),
            password: "test-password".into(),
            page_size: 2000,
            max_pages: 500,
            page_delay: Duration::from_millis(0),
        }
    }
}
