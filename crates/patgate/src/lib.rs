//! # patgate
//!
//! Settings for a web application that signs users in against Microsoft
//! Entra ID and calls the Azure DevOps REST API on their behalf.
//!
//! The settings are loaded once at startup with [`AppSettings::load`],
//! validated, and then passed explicitly to the session layer, the OAuth
//! client and the API caller. Nothing here performs network I/O.

pub mod config;
pub mod error;

pub use config::{AppSettings, ClientSecret, OAuthClientConfig, SecretPolicy, SessionType};
pub use error::{Error, Result};
pub use patgate_common::ConfigurationError;

/// Version of the patgate crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
