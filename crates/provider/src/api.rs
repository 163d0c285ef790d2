//! REST API client for the provider's HTTP endpoints.
//!
//! Wraps the provider API (login, bulk aircraft export, per-aircraft
//! category sub-resources, images) using [`reqwest`]. All authenticated
//! endpoints carry the bearer token as an `Authorization` header; the
//! provider additionally requires the security token as a path parameter.

use serde::Deserialize;
use serde_json::Value;

use crate::auth::AuthSession;
use crate::error::ProviderError;

/// HTTP client for the provider API.
pub struct ProviderApi {
    client: reqwest::Client,
    base_url: String,
}

/// Response returned by the provider's login endpoint.
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    #[serde(rename = "bearerToken")]
    pub bearer_token: String,
    #[serde(rename = "securityToken")]
    pub security_token: String,
    /// Seconds until the bearer token expires.
    #[serde(rename = "expiresIn")]
    pub expires_in: i64,
}

impl ProviderApi {
    /// Create a new API client.
    ///
    /// * `base_url` - Base HTTP URL, e.g. `https://customer.provider.example`.
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    /// Create an API client reusing an existing [`reqwest::Client`]
    /// (useful for connection pooling across call sites).
    pub fn with_client(client: reqwest::Client, base_url: String) -> Self {
        Self { client, base_url }
    }

    /// Authenticate with the provider.
    ///
    /// Sends a `POST /api/auth/login` request with the account
    /// credentials. Token shape validation happens in the auth layer.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<LoginResponse, ProviderError> {
        let body = serde_json::json!({
            "emailaddress": username,
            "password": password,
        });

        let response = self
            .client
            .post(format!("{}/api/auth/login", self.base_url))
            .json(&body)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Fetch one page of the bulk aircraft export.
    ///
    /// Sends a `POST /api/aircraft/exportlist/{security_token}` request.
    /// The provider returns either a bare JSON array or an object wrapping
    /// one (`{"aircraft": [...]}` / `{"data": [...]}`); both shapes are
    /// tolerated.
    pub async fn fetch_export_page(
        &self,
        session: &AuthSession,
        page: usize,
        page_size: usize,
        filters: &Value,
    ) -> Result<Vec<Value>, ProviderError> {
        let mut body = serde_json::json!({
            "page": page,
            "pagesize": page_size,
        });
        if let (Value::Object(target), Value::Object(extra)) = (&mut body, filters) {
            for (k, v) in extra {
                target.insert(k.clone(), v.clone());
            }
        }

        let response = self
            .client
            .post(format!(
                "{}/api/aircraft/exportlist/{}",
                self.base_url, session.security_token
            ))
            .bearer_auth(&session.bearer_token)
            .json(&body)
            .send()
            .await?;

        let payload: Value = Self::parse_response(response).await?;
        unwrap_record_array(payload)
    }

    /// Fetch one category sub-resource for an aircraft.
    ///
    /// Sends a `GET /api/aircraft/{category}/{aircraft_id}/{security_token}`
    /// request. Returns `None` when the provider has nothing for this
    /// category (404 or an empty body) — that is a data statement, not an
    /// error.
    pub async fn fetch_category(
        &self,
        session: &AuthSession,
        aircraft_id: &str,
        category: &str,
    ) -> Result<Option<Value>, ProviderError> {
        let response = self
            .client
            .get(format!(
                "{}/api/aircraft/{}/{}/{}",
                self.base_url, category, aircraft_id, session.security_token
            ))
            .bearer_auth(&session.bearer_token)
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = Self::ensure_success(response).await?;
        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(None);
        }
        let value: Value = serde_json::from_str(&text)
            .map_err(|e| ProviderError::Malformed(format!("{category} payload: {e}")))?;
        if value.is_null() {
            return Ok(None);
        }
        Ok(Some(value))
    }

    /// Fetch the image list for an aircraft.
    ///
    /// Sends a `GET /api/aircraft/images/{aircraft_id}/{security_token}`
    /// request. A missing or empty gallery is an empty vec.
    pub async fn fetch_images(
        &self,
        session: &AuthSession,
        aircraft_id: &str,
    ) -> Result<Vec<Value>, ProviderError> {
        match self.fetch_category(session, aircraft_id, "images").await? {
            Some(value) => unwrap_record_array(value),
            None => Ok(Vec::new()),
        }
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code. Returns the
    /// response unchanged on success, or a [`ProviderError::Api`]
    /// containing the status and body text on failure.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, ProviderError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ProviderError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ProviderError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}

/// Accept both bulk-export wire shapes: a bare array, or an object
/// wrapping one under `aircraft` or `data`.
fn unwrap_record_array(payload: Value) -> Result<Vec<Value>, ProviderError> {
    match payload {
        Value::Array(records) => Ok(records),
        Value::Object(mut map) => {
            for key in ["aircraft", "data", "images"] {
                if let Some(Value::Array(records)) = map.remove(key) {
                    return Ok(records);
                }
            }
            Err(ProviderError::Malformed(
                "expected a record array or a wrapping object".into(),
            ))
        }
        Value::Null => Ok(Vec::new()),
        other => Err(ProviderError::Malformed(format!(
            "expected a record array, got {}",
            type_name(&other)
        ))),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
