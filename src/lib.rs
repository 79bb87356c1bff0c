//! # cookie-session-storage
//!
//! Client-side cookie session storage: session data is stored directly in
//! a cookie on the client, signed or encrypted so the client cannot forge
//! or silently corrupt it, with no persistent session state on the server
//! side.
//!
//! ## Features
//!
//! - **Signed payloads**: `base64(data)--digest` with a secret-keyed double
//!   hash; tampering degrades to an empty session, never an error
//! - **Encrypted payloads**: Triple DES or AES in ECB mode with the secret
//!   as key material, base64-wrapped for cookie transport
//! - **Optional deflate compression** of the encoded value
//! - **Hard 4096-byte ceiling**: oversized session data fails the write
//!   with the actual size, instead of silently truncating
//! - **Pluggable cookie transport**: the storage never touches HTTP itself
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use cookie_session_storage::{
//!     CookieSessionStorage, MemoryTransport, SessionData, SessionStorage, StorageConfig,
//! };
//!
//! #[tokio::main]
//! async fn main() {
//!     let transport = MemoryTransport::new();
//!     let config = StorageConfig::new("your-secret-key")
//!         .with_cookie_name("sessiondata")
//!         .with_compression(true)
//!         .with_lifetime(3600);
//!
//!     let storage = CookieSessionStorage::new(transport, config).unwrap();
//!     let id = CookieSessionStorage::<MemoryTransport>::generate_id();
//!
//!     let mut session = SessionData::new();
//!     session.set("user", "alice");
//!     storage.write(&id, &session.to_bytes().unwrap()).await.unwrap();
//!
//!     let session = SessionData::from_bytes(&storage.read(&id).await).unwrap();
//!     assert_eq!(session.get::<String>("user"), Some("alice".to_string()));
//! }
//! ```

pub mod codec;
pub mod compress;
pub mod config;
pub mod crypt;
pub mod error;
pub mod session;
pub mod signature;
pub mod storage;
pub mod transport;

pub use codec::{Codec, Strategy, MAX_COOKIE_BYTES};
pub use compress::Compressor;
pub use config::StorageConfig;
pub use crypt::{Cipher, CryptAlgorithm, CryptMode};
pub use error::StorageError;
pub use session::SessionData;
pub use signature::{DigestAlgorithm, Signer};
pub use storage::{CookieSessionStorage, SessionStorage};
pub use transport::{CookieSlot, CookieTransport, MemoryTransport};
