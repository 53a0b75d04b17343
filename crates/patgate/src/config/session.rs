//! Server-side session storage selection

use serde::{Deserialize, Serialize};
use std::fmt;

/// Backend the web framework persists per-user session state in.
///
/// The token cache lives in the session, so this also decides where
/// acquired tokens are kept between requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionType {
    /// Files under the server's session directory
    #[default]
    Filesystem,
    Redis,
    Memcached,
    /// Process memory, lost on restart
    Memory,
}

impl SessionType {
    #[cfg(test)]
    pub(crate) const ALL: [SessionType; 4] = [
        SessionType::Filesystem,
        SessionType::Redis,
        SessionType::Memcached,
        SessionType::Memory,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionType::Filesystem => "filesystem",
            SessionType::Redis => "redis",
            SessionType::Memcached => "memcached",
            SessionType::Memory => "memory",
        }
    }

    /// Whether sessions survive a process restart
    pub fn is_persistent(&self) -> bool {
        !matches!(self, SessionType::Memory)
    }
}

impl fmt::Display for SessionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
