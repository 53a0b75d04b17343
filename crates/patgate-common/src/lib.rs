//! Core shared pieces for patgate crates: the configuration error taxonomy,
//! the loader trait implemented by settings types, and unified logging.

pub mod config;
pub mod error;
pub mod logging;

pub use config::ConfigLoader;
pub use error::ConfigurationError;
