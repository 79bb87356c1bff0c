//! Session storage lifecycle
//!
//! The save-handler surface a session framework plugs into: read, write,
//! and destroy against a single named cookie, plus the no-op open/close/gc
//! hooks this storage has no server-side resources for.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::codec::Codec;
use crate::config::StorageConfig;
use crate::error::StorageError;
use crate::transport::{CookieSlot, CookieTransport};

/// Session save-handler lifecycle.
///
/// `open`, `close`, and `gc` default to no-ops; a purely client-side
/// storage has nothing to open and nothing to collect.
#[async_trait]
pub trait SessionStorage: Send + Sync + 'static {
    /// Called when the session framework starts a session
    async fn open(&self) -> Result<(), StorageError> {
        Ok(())
    }

    /// Called when the session framework shuts the session down
    async fn close(&self) -> Result<(), StorageError> {
        Ok(())
    }

    /// Read session data. Absent, malformed, or tampered cookies all read
    /// as empty data; this never fails.
    async fn read(&self, id: &str) -> Vec<u8>;

    /// Encode and persist session data.
    ///
    /// Fails when the encoded payload exceeds the cookie size ceiling or
    /// the transport refuses the cookie.
    async fn write(&self, id: &str, data: &[u8]) -> Result<(), StorageError>;

    /// Remove the session by expiring its cookie immediately
    async fn destroy(&self, id: &str) -> Result<(), StorageError>;

    /// Garbage collection hook; there is no server-side state to collect
    async fn gc(&self, _max_lifetime: u64) -> Result<(), StorageError> {
        Ok(())
    }
}

/// Cookie-backed session storage: session data lives entirely in a signed
/// or encrypted cookie on the client, with no server-side state.
pub struct CookieSessionStorage<T: CookieTransport> {
    transport: T,
    codec: Codec,
    config: StorageConfig,
}

impl<T: CookieTransport> CookieSessionStorage<T> {
    /// Build the storage over a cookie transport.
    ///
    /// Validates the configuration and constructs the codec; every
    /// configuration problem (blank secret, unsupported cipher, bad IV)
    /// surfaces here, never during read/write.
    pub fn new(transport: T, config: StorageConfig) -> Result<Self, StorageError> {
        config.validate()?;
        let codec = Codec::from_config(&config)?;

        Ok(Self {
            transport,
            codec,
            config,
        })
    }

    /// Generate a fresh session id
    pub fn generate_id() -> String {
        Uuid::new_v4().to_string()
    }

    /// The frozen storage configuration
    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    fn cookie_expiry(&self) -> Option<DateTime<Utc>> {
        match self.config.cookie_lifetime {
            Some(secs) if secs > 0 => Some(Utc::now() + Duration::seconds(secs as i64)),
            _ => None,
        }
    }
}

#[async_trait]
impl<T: CookieTransport> SessionStorage for CookieSessionStorage<T> {
    async fn read(&self, id: &str) -> Vec<u8> {
        let name = self.config.cookie_name_for(id);
        match self.transport.get_cookie(name) {
            Some(value) => self.codec.decode(&value, id),
            None => Vec::new(),
        }
    }

    async fn write(&self, id: &str, data: &[u8]) -> Result<(), StorageError> {
        let value = self.codec.encode(data, id)?;

        let cookie = CookieSlot {
            name: self.config.cookie_name_for(id).to_string(),
            value,
            expires: self.cookie_expiry(),
            path: self.config.cookie_path.clone(),
            domain: self.config.cookie_domain.clone(),
            secure: self.config.cookie_secure,
            http_only: self.config.cookie_http_only,
        };

        self.transport.set_cookie(cookie)
    }

    async fn destroy(&self, id: &str) -> Result<(), StorageError> {
        self.transport.expire_cookie(self.config.cookie_name_for(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::MemoryTransport;

    fn make_storage(
        config: StorageConfig,
    ) -> (MemoryTransport, CookieSessionStorage<MemoryTransport>) {
        let transport = MemoryTransport::new();
        let storage =
            CookieSessionStorage::new(transport.clone(), config).expect("storage builds");
        (transport, storage)
    }

    #[tokio::test]
    async fn test_lifecycle_noops() {
        let (_, storage) = make_storage(StorageConfig::new("s3cr3t"));
        assert!(storage.open().await.is_ok());
        assert!(storage.close().await.is_ok());
        assert!(storage.gc(1440).await.is_ok());
    }

    #[tokio::test]
    async fn test_write_read_roundtrip() {
        let (_, storage) = make_storage(StorageConfig::new("s3cr3t"));
        storage.write("sess1", b"user_id=42").await.unwrap();
        assert_eq!(storage.read("sess1").await, b"user_id=42");
    }

    #[tokio::test]
    async fn test_absent_cookie_reads_empty() {
        let (_, storage) = make_storage(StorageConfig::new("s3cr3t"));
        assert_eq!(storage.read("sess1").await, b"");
    }

    #[tokio::test]
    async fn test_destroy_removes_the_session() {
        let (_, storage) = make_storage(StorageConfig::new("s3cr3t"));
        storage.write("sess1", b"user_id=42").await.unwrap();
        storage.destroy("sess1").await.unwrap();
        assert_eq!(storage.read("sess1").await, b"");
    }

    #[tokio::test]
    async fn test_cookie_named_after_session_id() {
        let (transport, storage) = make_storage(StorageConfig::new("s3cr3t"));
        storage.write("sess1", b"user_id=42").await.unwrap();
        assert!(transport.get_cookie("sess1").is_some());
        assert!(transport.get_cookie("sess2").is_none());
    }

    #[tokio::test]
    async fn test_fixed_cookie_name_spans_ids() {
        let config = StorageConfig::new("s3cr3t").with_cookie_name("sessiondata");
        let (transport, storage) = make_storage(config);

        storage.write("sess1", b"user_id=42").await.unwrap();
        assert!(transport.get_cookie("sessiondata").is_some());
        // a rotated id still reads the same cookie
        assert_eq!(storage.read("sess2").await, b"user_id=42");
    }

    #[tokio::test]
    async fn test_oversized_write_propagates() {
        let (transport, storage) = make_storage(StorageConfig::new("s3cr3t"));
        let result = storage.write("sess1", &vec![b'a'; 4096]).await;
        assert!(matches!(
            result,
            Err(StorageError::CookieTooLarge { size }) if size > 4096
        ));
        // no cookie is written on failure
        assert!(transport.get_cookie("sess1").is_none());
    }

    #[tokio::test]
    async fn test_tampered_cookie_reads_empty() {
        let (transport, storage) = make_storage(StorageConfig::new("s3cr3t"));
        storage.write("sess1", b"user_id=42").await.unwrap();

        let mut value = transport.get_cookie("sess1").unwrap();
        let last = value.len() - 1;
        value[last] = if value[last] == b'0' { b'1' } else { b'0' };
        transport
            .set_cookie(CookieSlot {
                name: "sess1".to_string(),
                value,
                expires: None,
                path: "/".to_string(),
                domain: None,
                secure: false,
                http_only: true,
            })
            .unwrap();

        assert_eq!(storage.read("sess1").await, b"");
    }

    #[tokio::test]
    async fn test_crypted_and_compressed_roundtrip() {
        let config = StorageConfig::new("s3cr3t")
            .with_crypt(true)
            .with_compression(true);
        let (_, storage) = make_storage(config);

        let data = vec![b'a'; 1000];
        storage.write("sess1", &data).await.unwrap();
        assert_eq!(storage.read("sess1").await, data);
    }

    #[test]
    fn test_construction_rejects_bad_config() {
        let transport = MemoryTransport::new();
        assert!(matches!(
            CookieSessionStorage::new(transport.clone(), StorageConfig::new("  ")),
            Err(StorageError::Configuration(_))
        ));

        let config = StorageConfig::new("s3cr3t")
            .with_crypt(true)
            .with_crypt_iv(vec![0u8; 3]);
        assert!(matches!(
            CookieSessionStorage::new(transport, config),
            Err(StorageError::Configuration(_))
        ));
    }

    #[test]
    fn test_cookie_expiry_follows_lifetime() {
        let (_, storage) = make_storage(StorageConfig::new("s3cr3t"));
        assert!(storage.cookie_expiry().is_none());

        let (_, storage) = make_storage(StorageConfig::new("s3cr3t").with_lifetime(3600));
        let expires = storage.cookie_expiry().expect("lifetime sets an expiry");
        let delta = expires - Utc::now();
        assert!((delta.num_seconds() - 3600).abs() <= 1);

        let (_, storage) = make_storage(StorageConfig::new("s3cr3t").with_lifetime(0));
        assert!(storage.cookie_expiry().is_none());
    }

    #[test]
    fn test_generate_id() {
        let a = CookieSessionStorage::<MemoryTransport>::generate_id();
        let b = CookieSessionStorage::<MemoryTransport>::generate_id();
        assert_eq!(a.len(), 36);
        assert_ne!(a, b);
    }
}
