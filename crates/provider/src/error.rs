//! Error taxonomy for the provider client.

/// Errors from the provider client layer.
///
/// `Auth` is always pipeline-fatal. `Request`/`Api`/`Malformed` are fatal
/// when raised during pagination and isolated (category treated as absent)
/// when raised during per-aircraft enrichment — that policy lives in the
/// sync layer, not here.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// Login failed or the returned tokens failed shape validation.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider returned a non-2xx status code.
    #[error("Provider API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The response body did not have the expected shape.
    #[error("Malformed provider response: {0}")]
    Malformed(String),

    /// The operation was cancelled before completion.
    #[error("Operation cancelled")]
    Cancelled,
}
