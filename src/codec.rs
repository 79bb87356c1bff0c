//! Encode/decode pipeline for cookie session payloads
//!
//! Encoding runs plaintext -> sign-or-encrypt -> compress and enforces the
//! cookie size ceiling; decoding runs the inverse order. The signing and
//! encryption strategies are mutually exclusive and chosen once, from the
//! configuration.
//!
//! Decoding is fail-closed: the cookie is client-held and client-writable,
//! so any structural or integrity failure (missing separator, digest
//! mismatch, undecryptable or undecompressable value) yields empty session
//! data rather than an error. A tampered cookie is observably identical to
//! an absent one.

use crate::compress::Compressor;
use crate::config::StorageConfig;
use crate::crypt::Cipher;
use crate::error::StorageError;
use crate::signature::Signer;

/// Hard ceiling on the encoded cookie value, in bytes
pub const MAX_COOKIE_BYTES: usize = 4096;

/// Payload protection strategy, chosen once at construction.
#[derive(Debug)]
pub enum Strategy {
    /// base64-wrapped plaintext with an appended keyed digest
    Signed(Signer),
    /// raw plaintext with an appended keyed digest (no base64 wrapping)
    PlainWithDigest(Signer),
    /// opaque symmetric encryption, base64-wrapped
    Crypted(Cipher),
}

/// The session payload codec.
///
/// Stateless per call: every operation is a pure function of the payload
/// and the frozen configuration.
#[derive(Debug)]
pub struct Codec {
    strategy: Strategy,
    compressor: Compressor,
}

impl Codec {
    /// Build the codec from a validated configuration.
    ///
    /// Cipher construction errors (bad IV length) surface here, once;
    /// encode and decode cannot fail on cipher state afterwards.
    pub fn from_config(config: &StorageConfig) -> Result<Self, StorageError> {
        let strategy = if config.use_crypt {
            Strategy::Crypted(Cipher::new(
                &config.secret,
                config.crypt_algorithm,
                config.crypt_mode,
                config.crypt_iv.as_deref(),
            )?)
        } else {
            let signer = Signer::new(
                config.secret.clone(),
                config.digest_algorithm,
                config.use_encoding,
            );
            if config.use_encoding {
                Strategy::Signed(signer)
            } else {
                Strategy::PlainWithDigest(signer)
            }
        };

        Ok(Self {
            strategy,
            compressor: Compressor::new(config.use_compression),
        })
    }

    /// Encode session data into the cookie value.
    ///
    /// The session id is part of the codec contract for signature-binding
    /// extensions; it is not currently mixed into the digest.
    ///
    /// Fails only when the encoded value exceeds [`MAX_COOKIE_BYTES`]; the
    /// error carries the actual size so callers can shed data and retry.
    pub fn encode(&self, data: &[u8], _id: &str) -> Result<Vec<u8>, StorageError> {
        let inner = match &self.strategy {
            Strategy::Signed(signer) | Strategy::PlainWithDigest(signer) => signer.sign(data),
            Strategy::Crypted(cipher) => cipher.encrypt(data),
        };

        if inner.is_empty() {
            return Ok(Vec::new());
        }

        let value = self.compressor.compress(inner.as_bytes());
        if value.len() > MAX_COOKIE_BYTES {
            return Err(StorageError::CookieTooLarge { size: value.len() });
        }

        Ok(value)
    }

    /// Decode a cookie value back into session data.
    ///
    /// Never fails: a value that cannot be decompressed, verified, or
    /// decrypted decodes to empty session data.
    pub fn decode(&self, value: &[u8], id: &str) -> Vec<u8> {
        match self.try_decode(value) {
            Some(data) => data,
            None => {
                tracing::debug!(session_id = id, "discarding undecodable session cookie");
                Vec::new()
            }
        }
    }

    fn try_decode(&self, value: &[u8]) -> Option<Vec<u8>> {
        let inner = self.compressor.decompress(value)?;
        let inner = String::from_utf8(inner).ok()?;
        match &self.strategy {
            Strategy::Signed(signer) | Strategy::PlainWithDigest(signer) => signer.unsign(&inner),
            Strategy::Crypted(cipher) => cipher.decrypt(&inner),
        }
    }
}
