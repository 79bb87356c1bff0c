//! Storage configuration

use crate::crypt::{CryptAlgorithm, CryptMode};
use crate::error::StorageError;
use crate::signature::DigestAlgorithm;

/// Configuration for the cookie session storage.
///
/// The configuration is validated once, when the storage is constructed,
/// and is immutable afterwards.
#[derive(Clone, Debug)]
pub struct StorageConfig {
    /// Secret key phrase; all signing and encryption key material is derived
    /// from it. Must be non-blank.
    pub secret: String,

    /// Name of the session data cookie (default: None - the session id is
    /// used as the cookie name). A fixed name lets one cookie always carry
    /// the session regardless of rotating ids.
    pub cookie_name: Option<String>,

    /// Whether to deflate-compress the encoded session data (default: false)
    pub use_compression: bool,

    /// Whether to encrypt session data instead of signing it (default: false)
    pub use_crypt: bool,

    /// Cipher used when `use_crypt` is enabled (default: TripleDes)
    pub crypt_algorithm: CryptAlgorithm,

    /// Block cipher mode (default: Ecb)
    pub crypt_mode: CryptMode,

    /// Initialization vector; must match the cipher's IV size.
    /// Defaults to an all-zero vector. Unused by ECB mode, but the slot is
    /// kept configurable for other modes.
    pub crypt_iv: Option<Vec<u8>>,

    /// Whether to base64-wrap the plaintext before signing (default: true).
    /// When disabled, the signed segment is the raw plaintext, which must
    /// then be valid UTF-8 and must not contain `--`.
    pub use_encoding: bool,

    /// Hash used by the signature digest (default: Sha1, the historical
    /// on-wire format)
    pub digest_algorithm: DigestAlgorithm,

    /// Cookie path (default: "/")
    pub cookie_path: String,

    /// Cookie domain (default: None - current domain only)
    pub cookie_domain: Option<String>,

    /// Secure flag for the cookie (default: false)
    pub cookie_secure: bool,

    /// HttpOnly flag for the cookie (default: true)
    pub cookie_http_only: bool,

    /// Cookie lifetime in seconds (default: None = session cookie).
    /// When set, the cookie expires at `now + lifetime`; when None or zero,
    /// the cookie expires when the browser closes.
    pub cookie_lifetime: Option<u64>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            cookie_name: None,
            use_compression: false,
            use_crypt: false,
            crypt_algorithm: CryptAlgorithm::TripleDes,
            crypt_mode: CryptMode::Ecb,
            crypt_iv: None,
            use_encoding: true,
            digest_algorithm: DigestAlgorithm::Sha1,
            cookie_path: "/".to_string(),
            cookie_domain: None,
            cookie_secure: false,
            cookie_http_only: true,
            cookie_lifetime: None,
        }
    }
}

impl StorageConfig {
    /// Create a new configuration with the given secret
    pub fn new<S: Into<String>>(secret: S) -> Self {
        Self {
            secret: secret.into(),
            ..Default::default()
        }
    }

    /// Set a fixed cookie name (default: the session id)
    pub fn with_cookie_name<S: Into<String>>(mut self, name: S) -> Self {
        self.cookie_name = Some(name.into());
        self
    }

    /// Enable or disable compression of the encoded payload (default: false)
    pub fn with_compression(mut self, use_compression: bool) -> Self {
        self.use_compression = use_compression;
        self
    }

    /// Select encryption instead of signing (default: false)
    pub fn with_crypt(mut self, use_crypt: bool) -> Self {
        self.use_crypt = use_crypt;
        self
    }

    /// Set the cipher algorithm (default: TripleDes)
    pub fn with_crypt_algorithm(mut self, algorithm: CryptAlgorithm) -> Self {
        self.crypt_algorithm = algorithm;
        self
    }

    /// Set the block cipher mode (default: Ecb)
    pub fn with_crypt_mode(mut self, mode: CryptMode) -> Self {
        self.crypt_mode = mode;
        self
    }

    /// Set the initialization vector; its length must match the cipher's
    /// IV size
    pub fn with_crypt_iv<V: Into<Vec<u8>>>(mut self, iv: V) -> Self {
        self.crypt_iv = Some(iv.into());
        self
    }

    /// Control base64-wrapping of the signed plaintext (default: true)
    pub fn with_encoding(mut self, use_encoding: bool) -> Self {
        self.use_encoding = use_encoding;
        self
    }

    /// Set the digest hash (default: Sha1)
    pub fn with_digest_algorithm(mut self, algorithm: DigestAlgorithm) -> Self {
        self.digest_algorithm = algorithm;
        self
    }

    /// Set the cookie path (default: "/")
    pub fn with_cookie_path<S: Into<String>>(mut self, path: S) -> Self {
        self.cookie_path = path.into();
        self
    }

    /// Set the cookie domain
    pub fn with_cookie_domain<S: Into<String>>(mut self, domain: S) -> Self {
        self.cookie_domain = Some(domain.into());
        self
    }

    /// Set the Secure flag (default: false)
    pub fn with_secure(mut self, secure: bool) -> Self {
        self.cookie_secure = secure;
        self
    }

    /// Set the HttpOnly flag (default: true)
    pub fn with_http_only(mut self, http_only: bool) -> Self {
        self.cookie_http_only = http_only;
        self
    }

    /// Set the cookie lifetime in seconds.
    /// Pass None (or zero) for a session cookie that expires when the
    /// browser closes.
    pub fn with_lifetime(mut self, lifetime: impl Into<Option<u64>>) -> Self {
        self.cookie_lifetime = lifetime.into();
        self
    }

    /// Validate the configuration.
    ///
    /// Called once at storage construction; encode/decode never re-validate.
    pub fn validate(&self) -> Result<(), StorageError> {
        if self.secret.trim().is_empty() {
            return Err(StorageError::Configuration(
                "you must define a non-blank `secret` key in order to use the cookie based \
                 session storage"
                    .to_string(),
            ));
        }
        Ok(())
    }

    /// The cookie name used for the given session id
    pub fn cookie_name_for<'a>(&'a self, id: &'a str) -> &'a str {
        self.cookie_name.as_deref().unwrap_or(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StorageConfig::new("s3cr3t");
        assert!(!config.use_compression);
        assert!(!config.use_crypt);
        assert!(config.use_encoding);
        assert_eq!(config.crypt_algorithm, CryptAlgorithm::TripleDes);
        assert_eq!(config.crypt_mode, CryptMode::Ecb);
        assert_eq!(config.cookie_path, "/");
        assert!(config.cookie_http_only);
        assert!(config.cookie_lifetime.is_none());
    }

    #[test]
    fn test_blank_secret_rejected() {
        assert!(StorageConfig::new("").validate().is_err());
        assert!(StorageConfig::new("   \t ").validate().is_err());
        assert!(StorageConfig::new("s3cr3t").validate().is_ok());
    }

    #[test]
    fn test_cookie_name_fallback() {
        let config = StorageConfig::new("s3cr3t");
        assert_eq!(config.cookie_name_for("abc123"), "abc123");

        let config = config.with_cookie_name("sessiondata");
        assert_eq!(config.cookie_name_for("abc123"), "sessiondata");
    }
}
