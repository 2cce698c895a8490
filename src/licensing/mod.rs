// Licensing API client
// Activation, deactivation and version lookups against the store's itelic-api

pub mod types;
pub mod config;
pub mod api;
pub mod update;

pub use types::*;
pub use config::*;
pub use api::{basic_auth_header, merge_params, ApiError, ApiResponse, LicenseApiClient};
pub use update::compare_versions;
