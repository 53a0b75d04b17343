//! Loader trait shared by settings types

use crate::error::ConfigurationError;
use std::path::{Path, PathBuf};

/// Layered settings loading.
///
/// Implementors merge compiled-in defaults, an optional TOML file and the
/// process environment, then validate the result.
pub trait ConfigLoader<T> {
    /// Load settings, reading `path` when given or the implementor's default
    /// file name when it exists.
    fn load(path: Option<PathBuf>) -> Result<T, ConfigurationError>;

    /// Load settings from a file that must exist.
    fn load_from_file(path: &Path) -> Result<T, ConfigurationError>;
}
