//! Client for the iThemes Exchange licensing API.
//!
//! Authenticates a license key against a store, activates and deactivates a
//! site's use of that key, and fetches version metadata for update checks.
//!
//! The client is stateless apart from its [`ClientConfig`]. Construct one
//! [`LicenseApiClient`] per host session and hand it to whatever needs it.
//!
//! ```no_run
//! use itelic_updater::{ClientConfig, ClientOptions, LicenseApiClient, Params};
//!
//! # async fn run() -> itelic_updater::LicenseResult<()> {
//! let options = ClientOptions {
//!     version: Some("0.9".to_string()),
//!     ..Default::default()
//! };
//! let config = ClientConfig::new("http://www.itelic.dev", 19, options)?;
//! let client = LicenseApiClient::new(config)?;
//!
//! let activation = client
//!     .activate(Some("ATAZ-espg-6769"), "https://my-site.test", Params::new())
//!     .await?;
//! let update = client.check_for_update(Some("ATAZ-espg-6769")).await?;
//! if update.update_available {
//!     println!("{} -> {}", update.current_version, update.latest_version);
//! }
//! client.deactivate(Some("ATAZ-espg-6769"), activation).await?;
//! # Ok(())
//! # }
//! ```

pub mod licensing;

pub use licensing::*;
