//! Cookie transport trait
//!
//! The storage never touches HTTP itself; it reads and writes exactly one
//! cookie per session through this interface. Implementations own the
//! actual transport semantics (headers, percent-encoding, browser
//! behavior) and their own concurrency discipline.

use chrono::{DateTime, Utc};

use crate::error::StorageError;

/// The (name, value) cookie written to the client for one session, plus
/// its transport attributes.
#[derive(Clone, Debug)]
pub struct CookieSlot {
    /// Cookie name: the configured fixed name or the session id
    pub name: String,
    /// Encoded session payload; at most 4096 bytes
    pub value: Vec<u8>,
    /// Expiry time; None means a session cookie that expires when the
    /// browser closes
    pub expires: Option<DateTime<Utc>>,
    /// Cookie path
    pub path: String,
    /// Cookie domain
    pub domain: Option<String>,
    /// Secure flag
    pub secure: bool,
    /// HttpOnly flag
    pub http_only: bool,
}

/// Trait for cookie transport backends.
///
/// `get_cookie` must return the raw value bytes, with any transport-level
/// percent-encoding already undone.
pub trait CookieTransport: Send + Sync + 'static {
    /// Read the named cookie's value, if the client sent one
    fn get_cookie(&self, name: &str) -> Option<Vec<u8>>;

    /// Hand a cookie to the client
    fn set_cookie(&self, cookie: CookieSlot) -> Result<(), StorageError>;

    /// Expire the named cookie immediately (an already-past expiry)
    fn expire_cookie(&self, name: &str) -> Result<(), StorageError>;
}

/// Percent-encode a cookie value for transports that carry it through an
/// HTTP header. Compressed payloads are arbitrary bytes and need this.
pub fn encode_cookie_value(value: &[u8]) -> String {
    urlencoding::encode_binary(value).into_owned()
}

/// Undo percent-encoding on an incoming cookie value
pub fn decode_cookie_value(value: &str) -> Vec<u8> {
    urlencoding::decode_binary(value.as_bytes()).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_value_encoding_roundtrip() {
        let value = b"dXNlcl9pZD00Mg==--82f6";
        let encoded = encode_cookie_value(value);
        assert_eq!(decode_cookie_value(&encoded), value);
    }

    #[test]
    fn test_binary_value_encoding_roundtrip() {
        // deflated payloads can contain any byte, including '%' sequences
        let value: Vec<u8> = vec![0x25, 0x34, 0x32, 0x00, 0xff, b'%'];
        let encoded = encode_cookie_value(&value);
        assert!(encoded.is_ascii());
        assert_eq!(decode_cookie_value(&encoded), value);
    }
}
