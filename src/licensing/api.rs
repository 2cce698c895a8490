use crate::licensing::config::{ClientConfig, Endpoint, HttpMethod, BASIC_AUTH_PREFIX};
use crate::licensing::types::{
    ActivationId, LicenseError, LicenseResult, Params, UpdateInfo, VersionInfo,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};

// ============================================================================
// Common Response Types (Server uses consistent format)
// ============================================================================

/// Error object returned by the server
#[derive(Deserialize, Debug, Clone)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

/// Envelope wrapping every API response
#[derive(Deserialize, Debug)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(default)]
    pub body: Option<Value>,
    /// Only meaningful when `success` is false; decoded lazily
    #[serde(default)]
    pub error: Option<Value>,
}

impl ApiResponse {
    /// Body on success, structured error otherwise
    pub fn into_result(self) -> LicenseResult<Value> {
        if self.success {
            return Ok(self.body.unwrap_or(Value::Null));
        }

        let error = self.error.ok_or_else(|| {
            LicenseError::Decode("error response is missing the error object".to_string())
        })?;
        let error: ApiError = decode(error, "error")?;

        Err(LicenseError::Api {
            code: error.code,
            message: error.message,
        })
    }
}

// ============================================================================
// Activate
// ============================================================================

/// Data returned on successful activation
#[derive(Deserialize, Debug)]
struct ActivationRecord {
    #[serde(deserialize_with = "activation_id")]
    id: ActivationId,
}

fn activation_id<'de, D>(deserializer: D) -> Result<ActivationId, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(ActivationId),
        Str(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Int(id) => Ok(id),
        Raw::Str(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

// ============================================================================
// Version
// ============================================================================

/// Version listing keyed by product id, optionally wrapped in `list`
#[derive(Deserialize, Debug)]
#[serde(untagged)]
enum VersionListing {
    Wrapped { list: HashMap<String, Value> },
    Bare(HashMap<String, Value>),
}

impl VersionListing {
    fn into_entries(self) -> HashMap<String, Value> {
        match self {
            VersionListing::Wrapped { list } => list,
            VersionListing::Bare(entries) => entries,
        }
    }
}

fn decode<T: for<'de> Deserialize<'de>>(body: Value, what: &str) -> LicenseResult<T> {
    serde_json::from_value(body)
        .map_err(|e| LicenseError::Decode(format!("unexpected {} payload: {}", what, e)))
}

/// Parameters from `defaults` overridden by anything in `supplied`
pub fn merge_params(mut defaults: Params, supplied: Params) -> Params {
    defaults.extend(supplied);
    defaults
}

/// HTTP Basic credentials with the license key as username and an empty password
pub fn basic_auth_header(key: &str) -> String {
    format!("{}{}", BASIC_AUTH_PREFIX, STANDARD.encode(format!("{}:", key)))
}

// ============================================================================
// HTTP Client
// ============================================================================

/// HTTP client for the licensing API
#[derive(Debug, Clone)]
pub struct LicenseApiClient {
    config: ClientConfig,
    client: reqwest::Client,
}

impl LicenseApiClient {
    pub fn new(config: ClientConfig) -> LicenseResult<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(LicenseError::HttpClient)?;

        Ok(Self { config, client })
    }

    /// Use a preconfigured transport (proxies, TLS roots, connection pool)
    pub fn with_http_client(config: ClientConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Activate a license key for the site identified by `location`.
    ///
    /// `extra` is merged over the default parameters. Returns the activation
    /// record id, which the caller keeps for [`deactivate`](Self::deactivate).
    pub async fn activate(
        &self,
        key: Option<&str>,
        location: &str,
        extra: Params,
    ) -> LicenseResult<ActivationId> {
        let key = self.config.resolve_key(key).ok_or(LicenseError::MissingKey)?;

        let defaults = Params::from([("location".to_string(), location.to_string())]);
        let params = merge_params(defaults, extra);

        let body = self
            .call(Endpoint::Activate, HttpMethod::Post, Some(key), params)
            .await?;
        let record: ActivationRecord = decode(body, "activation")?;

        Ok(record.id)
    }

    /// Deactivate the license key on the site bound to `activation_id`
    pub async fn deactivate(
        &self,
        key: Option<&str>,
        activation_id: ActivationId,
    ) -> LicenseResult<bool> {
        let params = Params::from([("location_id".to_string(), activation_id.to_string())]);

        self.call(Endpoint::Deactivate, HttpMethod::Post, key, params)
            .await?;

        Ok(true)
    }

    /// Latest version info for the configured product
    pub async fn get_latest_version(&self, key: Option<&str>) -> LicenseResult<VersionInfo> {
        let body = self
            .call(Endpoint::Version, HttpMethod::Get, key, Params::new())
            .await?;

        let listing: VersionListing = decode(body, "version")?;
        let product_id = self.config.product_id();

        match listing.into_entries().remove(&product_id.to_string()) {
            Some(entry) => decode(entry, "version info"),
            None => {
                warn!(product_id, "Version listing has no entry for the configured product");
                Err(LicenseError::ProductKeyMismatch { product_id })
            }
        }
    }

    /// Compare the latest published version against the client version
    pub async fn check_for_update(&self, key: Option<&str>) -> LicenseResult<UpdateInfo> {
        let latest = self.get_latest_version(key).await?;
        Ok(UpdateInfo::new(self.config.client_version(), latest))
    }

    /// Make a call to the API.
    ///
    /// Prefer the convenience methods above; this is for endpoints they don't
    /// cover. `method` must be `GET` or `POST`. Returns the raw response body.
    pub async fn call_api(
        &self,
        endpoint: Endpoint,
        method: &str,
        key: Option<&str>,
        params: Params,
    ) -> LicenseResult<Value> {
        self.call_api_with_timeout(endpoint, method, key, params, None)
            .await
    }

    /// Same as [`call_api`](Self::call_api), with a transport timeout for this
    /// request only. `None` falls back to the configured timeout, if any.
    pub async fn call_api_with_timeout(
        &self,
        endpoint: Endpoint,
        method: &str,
        key: Option<&str>,
        params: Params,
        timeout: Option<Duration>,
    ) -> LicenseResult<Value> {
        let method: HttpMethod = method.parse()?;
        self.send(endpoint, method, key, params, timeout).await
    }

    async fn call(
        &self,
        endpoint: Endpoint,
        method: HttpMethod,
        key: Option<&str>,
        params: Params,
    ) -> LicenseResult<Value> {
        self.send(endpoint, method, key, params, None).await
    }

    async fn send(
        &self,
        endpoint: Endpoint,
        method: HttpMethod,
        key: Option<&str>,
        params: Params,
        timeout: Option<Duration>,
    ) -> LicenseResult<Value> {
        let url = self.config.endpoint_url(endpoint);

        let mut request = match method {
            HttpMethod::Get => self.client.get(&url).query(&params),
            HttpMethod::Post => self.client.post(&url).form(&params),
        };

        let key = self.config.resolve_key(key);
        if let Some(key) = key {
            request = request.header(reqwest::header::AUTHORIZATION, basic_auth_header(key));
        }

        if let Some(timeout) = timeout.or(self.config.timeout()) {
            request = request.timeout(timeout);
        }

        debug!(%endpoint, %method, authenticated = key.is_some(), "Calling licensing API");

        // Transport failures propagate as-is; no body to parse
        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        // Parse regardless of status code (server returns JSON errors)
        let envelope: ApiResponse = serde_json::from_str(&text)
            .map_err(|e| LicenseError::Decode(format!("{} (HTTP {})", e, status)))?;

        debug!(%endpoint, success = envelope.success, %status, "Licensing API responded");

        envelope.into_result()
    }
}
