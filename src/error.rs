//! Storage error types

use std::fmt;

/// Errors surfaced by the cookie session storage.
///
/// Only two situations are fatal: an invalid configuration (detected once,
/// when the storage is constructed) and an encoded payload that no cookie
/// can carry (detected at write time). A cookie that fails verification or
/// decryption on read is *not* an error; it decodes to empty session data.
#[derive(Debug)]
pub enum StorageError {
    /// Invalid storage configuration (blank secret, unknown cipher, ...)
    Configuration(String),
    /// Encoded session data exceeds the 4096-byte cookie ceiling
    CookieTooLarge {
        /// Actual size of the encoded payload in bytes
        size: usize,
    },
    /// The cookie transport refused to set or expire a cookie
    Transport(String),
    /// Error during session data serialization/deserialization
    Serialization(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Configuration(msg) => {
                write!(f, "Session storage configuration error: {}", msg)
            }
            StorageError::CookieTooLarge { size } => write!(
                f,
                "Cookie based session storage cannot store more than 4096 bytes of data (you provided {})",
                size
            ),
            StorageError::Transport(msg) => write!(f, "Cookie transport error: {}", msg),
            StorageError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}
