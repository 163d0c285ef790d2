//! Credential session lifecycle.
//!
//! The provider issues a short-lived bearer token plus a longer-lived
//! security token at login. [`AuthManager`] owns the cached session for one
//! credential set and refreshes it lazily: the first caller to observe an
//! expired (or nearly expired) session performs the login while concurrent
//! callers wait on the same lock and then reuse the fresh session — exactly
//! one login per expiry, never a refresh storm.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tokio::sync::Mutex;

use fleetiq_core::types::Timestamp;

use crate::api::ProviderApi;
use crate::config::ProviderConfig;
use crate::error::ProviderError;

/// Minimum plausible bearer token length; anything shorter is a corrupted
/// login response, not a usable token.
pub const MIN_BEARER_TOKEN_LEN: usize = 50;

/// Minimum plausible security token length.
pub const MIN_SECURITY_TOKEN_LEN: usize = 20;

/// Refresh this long before the provider-reported expiry to keep in-flight
/// requests from straddling the boundary.
const EXPIRY_SAFETY_MARGIN: Duration = Duration::seconds(60);

/// An authenticated provider session.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub bearer_token: String,
    pub security_token: String,
    pub issued_at: Timestamp,
    pub expires_at: Timestamp,
}

impl AuthSession {
    /// Whether the session is still comfortably inside its lifetime.
    pub fn is_fresh(&self) -> bool {
        Utc::now() < self.expires_at - EXPIRY_SAFETY_MARGIN
    }
}

/// Owns the cached session for one credential set.
///
/// Cheap to share: hold it in an `Arc` and clone the handle wherever
/// outbound calls are made. There are no ambient globals — the pipeline
/// injects its `AuthManager` everywhere one is needed.
pub struct AuthManager {
    api: Arc<ProviderApi>,
    username: String,
    password: String,
    /// Cached session. Holding this lock across the login await is what
    /// makes refresh single-flight.
    session: Mutex<Option<AuthSession>>,
}

impl AuthManager {
    pub fn new(api: Arc<ProviderApi>, config: &ProviderConfig) -> Self {
        Self {
            api,
            username: config.username.clone(),
            password: config.password.clone(),
            session: Mutex::new(None),
        }
    }

    /// Return a valid session, logging in if the cached one is missing or
    /// near expiry.
    ///
    /// Concurrent callers serialize on the session lock: whichever caller
    /// finds the session stale performs the login, and the rest observe
    /// the refreshed session when they acquire the lock. No background
    /// refresh — expiry is detected lazily by the next caller.
    pub async fn get_session(&self) -> Result<AuthSession, ProviderError> {
        let mut guard = self.session.lock().await;
        if let Some(session) = guard.as_ref() {
            if session.is_fresh() {
                return Ok(session.clone());
            }
        }

        let session = self.login().await?;
        *guard = Some(session.clone());
        Ok(session)
    }

    /// Drop the cached session so the next caller logs in again.
    ///
    /// Used when the provider rejects a token before its reported expiry.
    pub async fn invalidate(&self) {
        *self.session.lock().await = None;
    }

    /// Perform the login call and validate the token shapes.
    async fn login(&self) -> Result<AuthSession, ProviderError> {
        let response = self
            .api
            .login(&self.username, &self.password)
            .await
            .map_err(|e| match e {
                // Login transport/API failures are authentication failures
                // from the pipeline's point of view.
                ProviderError::Auth(msg) => ProviderError::Auth(msg),
                other => ProviderError::Auth(other.to_string()),
            })?;

        if response.bearer_token.len() < MIN_BEARER_TOKEN_LEN {
            return Err(ProviderError::Auth(format!(
                "bearer token too short ({} chars) — corrupted login response",
                response.bearer_token.len()
            )));
        }
        if response.security_token.len() < MIN_SECURITY_TOKEN_LEN {
            return Err(ProviderError::Auth(format!(
                "security token too short ({} chars) — corrupted login response",
                response.security_token.len()
            )));
        }

        let issued_at = Utc::now();
        let expires_at = issued_at + Duration::seconds(response.expires_in.max(0));

        tracing::info!(
            expires_in = response.expires_in,
            "Provider session established"
        );

        Ok(AuthSession {
            bearer_token: response.bearer_token,
            security_token: response.security_token,
            issued_at,
            expires_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(expires_in_secs: i64) -> AuthSession {
        let now = Utc::now();
        AuthSession {
            bearer_token: "b".repeat(MIN_BEARER_TOKEN_LEN),
            security_token: "s".repeat(MIN_SECURITY_TOKEN_LEN),
            issued_at: now,
            expires_at: now + Duration::seconds(expires_in_secs),
        }
    }

    #[test]
    fn session_well_inside_lifetime_is_fresh() {
        assert!(session(3600).is_fresh());
    }

    #[test]
    fn session_inside_safety_margin_is_stale() {
        assert!(!session(30).is_fresh());
    }

    #[test]
    fn expired_session_is_stale() {
        assert!(!session(-10).is_fresh());
    }
}
