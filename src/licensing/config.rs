use crate::licensing::types::{optional_string_or_number, LicenseError, LicenseResult};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Path segment under the store URL where the licensing API is mounted
pub const API_NAMESPACE: &str = "itelic-api";

/// Prefix of the Authorization header value
pub const BASIC_AUTH_PREFIX: &str = "Basic ";

/// Endpoints exposed by the licensing API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Activate,   // Activate the site
    Deactivate, // Deactivate the site
    Info,       // Info about the license key
    Version,    // Latest version of each product
    Download,   // Plugin package download
    Product,    // Info about the product
}

impl Endpoint {
    pub const ALL: [Endpoint; 6] = [
        Endpoint::Activate,
        Endpoint::Deactivate,
        Endpoint::Info,
        Endpoint::Version,
        Endpoint::Download,
        Endpoint::Product,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Endpoint::Activate => "activate",
            Endpoint::Deactivate => "deactivate",
            Endpoint::Info => "info",
            Endpoint::Version => "version",
            Endpoint::Download => "download",
            Endpoint::Product => "product",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Endpoint {
    type Err = LicenseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Endpoint::ALL
            .into_iter()
            .find(|endpoint| endpoint.as_str() == s)
            .ok_or_else(|| LicenseError::UnknownEndpoint(s.to_string()))
    }
}

/// HTTP methods the API accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = LicenseError;

    /// Exact, case-sensitive match on `GET` / `POST`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            other => Err(LicenseError::InvalidMethod(other.to_string())),
        }
    }
}

/// Optional construction arguments supplied by the host
#[derive(Deserialize, Clone, Debug, Default)]
#[serde(default)]
pub struct ClientOptions {
    /// Version of the calling application (required)
    #[serde(deserialize_with = "optional_string_or_number")]
    pub version: Option<String>,
    /// Default license key used when a call doesn't pass one
    pub key: Option<String>,
    /// Per-request timeout handed to the HTTP transport
    pub timeout_secs: Option<u64>,
}

/// Connection settings for the licensing API, fixed for the client's lifetime
#[derive(Clone)]
pub struct ClientConfig {
    base_url: String,
    product_id: u64,
    client_version: String,
    license_key: Option<String>,
    timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn new(
        base_url: impl AsRef<str>,
        product_id: u64,
        options: ClientOptions,
    ) -> LicenseResult<Self> {
        let client_version = options
            .version
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or(LicenseError::VersionRequired)?;

        Ok(Self {
            base_url: normalize_base_url(base_url.as_ref()),
            product_id,
            client_version,
            license_key: options.key.filter(|k| !k.is_empty()),
            timeout: options.timeout_secs.map(Duration::from_secs),
        })
    }

    pub fn with_license_key(mut self, key: impl Into<String>) -> Self {
        let key = key.into();
        self.license_key = (!key.is_empty()).then_some(key);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn product_id(&self) -> u64 {
        self.product_id
    }

    pub fn client_version(&self) -> &str {
        &self.client_version
    }

    pub fn license_key(&self) -> Option<&str> {
        self.license_key.as_deref()
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Full URL of an endpoint: `{base_url}itelic-api/{endpoint}/`
    pub fn endpoint_url(&self, endpoint: Endpoint) -> String {
        format!("{}{}/{}/", self.base_url, API_NAMESPACE, endpoint)
    }

    /// Key passed to the call, falling back to the configured default
    pub fn resolve_key<'a>(&'a self, key: Option<&'a str>) -> Option<&'a str> {
        key.filter(|k| !k.is_empty())
            .or(self.license_key.as_deref())
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("product_id", &self.product_id)
            .field("client_version", &self.client_version)
            .field("license_key", &self.license_key.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Strip trailing slashes (and backslashes) then append exactly one
pub fn normalize_base_url(url: &str) -> String {
    let trimmed = url.trim().trim_end_matches(['/', '\\']);
    format!("{}/", trimmed)
}
