//! In-memory cookie transport
//!
//! This is primarily for development and testing: it models one client's
//! cookie jar in process. Values are stored percent-encoded, the way an
//! HTTP transport would carry them.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use super::traits::{decode_cookie_value, encode_cookie_value, CookieSlot, CookieTransport};
use crate::error::StorageError;

struct StoredCookie {
    value: String,
    expires: Option<DateTime<Utc>>,
}

/// In-memory cookie jar.
///
/// Cloning shares the jar, so a storage and a test can observe the same
/// cookies.
pub struct MemoryTransport {
    cookies: Arc<RwLock<HashMap<String, StoredCookie>>>,
}

impl MemoryTransport {
    /// Create an empty cookie jar
    pub fn new() -> Self {
        Self {
            cookies: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Number of unexpired cookies in the jar
    pub fn len(&self) -> usize {
        let now = Utc::now();
        self.cookies
            .read()
            .values()
            .filter(|stored| stored.expires.map_or(true, |exp| exp > now))
            .count()
    }

    /// Whether the jar holds no unexpired cookies
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop expired cookies from the jar
    pub fn cleanup_expired(&self) {
        let now = Utc::now();
        self.cookies
            .write()
            .retain(|_, stored| stored.expires.map_or(true, |exp| exp > now));
    }
}

impl Default for MemoryTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for MemoryTransport {
    fn clone(&self) -> Self {
        Self {
            cookies: Arc::clone(&self.cookies),
        }
    }
}

impl CookieTransport for MemoryTransport {
    fn get_cookie(&self, name: &str) -> Option<Vec<u8>> {
        let cookies = self.cookies.read();
        let stored = cookies.get(name)?;

        if let Some(exp) = stored.expires {
            if exp <= Utc::now() {
                return None;
            }
        }
        Some(decode_cookie_value(&stored.value))
    }

    fn set_cookie(&self, cookie: CookieSlot) -> Result<(), StorageError> {
        let stored = StoredCookie {
            value: encode_cookie_value(&cookie.value),
            expires: cookie.expires,
        };
        self.cookies.write().insert(cookie.name, stored);
        Ok(())
    }

    fn expire_cookie(&self, name: &str) -> Result<(), StorageError> {
        // an immediately-past expiry makes the client drop the cookie; the
        // jar models that by removing the slot
        self.cookies.write().remove(name);
        Ok(())
    }
}
