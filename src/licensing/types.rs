use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Request parameters sent with an API call (query string for GET, form body for POST)
pub type Params = BTreeMap<String, String>;

/// Activation record identifier handed out by the server on activation
pub type ActivationId = u64;

/// Result type for licensing operations
pub type LicenseResult<T> = Result<T, LicenseError>;

/// Version metadata for a single product, as listed by the `version` endpoint
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct VersionInfo {
    #[serde(deserialize_with = "string_or_number")]
    pub version: String,
    /// Download URL of the release package
    #[serde(default)]
    pub package: Option<String>,
    /// Any additional fields the server sends along
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Update information
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct UpdateInfo {
    pub current_version: String,
    pub latest_version: String,
    pub update_available: bool,
    pub download_url: Option<String>,
}

/// Error types for licensing operations
#[derive(thiserror::Error, Debug)]
pub enum LicenseError {
    #[error("Version required")]
    VersionRequired,

    #[error("Failed to create HTTP client: {0}")]
    HttpClient(reqwest::Error),

    #[error("License key required")]
    MissingKey,

    #[error("Unknown API endpoint: {0}")]
    UnknownEndpoint(String),

    #[error("Invalid HTTP method: {0}")]
    InvalidMethod(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("{message}")]
    Api { code: String, message: String },

    #[error("Product ID and license key don't match (product {product_id})")]
    ProductKeyMismatch { product_id: u64 },

    #[error("Failed to decode response: {0}")]
    Decode(String),
}

impl LicenseError {
    /// Error code reported by the licensing server, if this is an API error
    pub fn code(&self) -> Option<&str> {
        match self {
            LicenseError::Api { code, .. } => Some(code),
            _ => None,
        }
    }

    /// True when the request never produced a response
    pub fn is_transport(&self) -> bool {
        matches!(self, LicenseError::Network(_))
    }
}

impl Serialize for LicenseError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    Str(String),
    Num(serde_json::Number),
}

impl From<StringOrNumber> for String {
    fn from(raw: StringOrNumber) -> Self {
        match raw {
            StringOrNumber::Str(s) => s,
            StringOrNumber::Num(n) => n.to_string(),
        }
    }
}

/// Accepts `"2.0"` as well as `2.0`; some stores emit numeric versions.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(StringOrNumber::deserialize(deserializer)?.into())
}

/// Optional variant of `string_or_number`; `null` stays `None`.
pub(crate) fn optional_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<StringOrNumber>::deserialize(deserializer)?.map(String::from))
}
