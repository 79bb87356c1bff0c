//! Symmetric encryption of session payloads
//!
//! Block-cipher encryption in ECB mode with the secret used directly as key
//! material: a secret longer than the cipher's key size is truncated, a
//! shorter one is zero-padded. This is deliberately *not* a KDF; it
//! preserves the historical key handling of the cookie format.
//!
//! Plaintext is zero-padded up to the block size on encryption and trailing
//! NUL bytes are stripped after decryption, so session data must not
//! legitimately end in NUL bytes. Ciphertext is base64-encoded for cookie
//! transport.

use std::str::FromStr;

use aes::cipher::{generic_array::GenericArray, BlockDecrypt, BlockEncrypt, KeyInit};
use aes::{Aes128, Aes256};
use base64::{engine::general_purpose::STANDARD, Engine};
use des::TdesEde3;

use crate::error::StorageError;

/// Block cipher selection
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CryptAlgorithm {
    /// Three-key Triple DES, 24-byte key, 8-byte blocks (default, on-wire
    /// compatible)
    TripleDes,
    /// AES with a 16-byte key, 16-byte blocks
    Aes128,
    /// AES with a 32-byte key, 16-byte blocks
    Aes256,
}

impl CryptAlgorithm {
    /// Key size in bytes; the secret is truncated or zero-padded to this
    pub fn key_size(&self) -> usize {
        match self {
            CryptAlgorithm::TripleDes => 24,
            CryptAlgorithm::Aes128 => 16,
            CryptAlgorithm::Aes256 => 32,
        }
    }

    /// Cipher block size in bytes; also the IV size
    pub fn block_size(&self) -> usize {
        match self {
            CryptAlgorithm::TripleDes => 8,
            CryptAlgorithm::Aes128 | CryptAlgorithm::Aes256 => 16,
        }
    }
}

impl FromStr for CryptAlgorithm {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tripledes" | "3des" => Ok(CryptAlgorithm::TripleDes),
            "aes-128" | "aes128" => Ok(CryptAlgorithm::Aes128),
            "aes-256" | "aes256" => Ok(CryptAlgorithm::Aes256),
            other => Err(StorageError::Configuration(format!(
                "unsupported cipher algorithm `{}`",
                other
            ))),
        }
    }
}

/// Block cipher mode of operation.
///
/// Only electronic codebook is supported; the mode is still configured
/// explicitly so that an unsupported name fails at initialization rather
/// than producing a cookie nothing can read back.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CryptMode {
    /// Electronic codebook: each block encrypted independently, no IV
    /// chaining
    Ecb,
}

impl FromStr for CryptMode {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ecb" => Ok(CryptMode::Ecb),
            other => Err(StorageError::Configuration(format!(
                "unsupported cipher mode `{}`",
                other
            ))),
        }
    }
}

enum CipherKind {
    TripleDes(TdesEde3),
    Aes128(Aes128),
    Aes256(Aes256),
}

impl std::fmt::Debug for CipherKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CipherKind::TripleDes(_) => f.write_str("TripleDes"),
            CipherKind::Aes128(_) => f.write_str("Aes128"),
            CipherKind::Aes256(_) => f.write_str("Aes256"),
        }
    }
}

/// Deterministic symmetric cipher over session payloads.
///
/// The key is derived from the secret once, at construction; encryption and
/// decryption are pure functions afterwards. Construction is the only place
/// a cipher error can surface.
#[derive(Debug)]
pub struct Cipher {
    kind: CipherKind,
    mode: CryptMode,
    iv: Vec<u8>,
}

impl Cipher {
    /// Build a cipher from the secret and cipher selection.
    ///
    /// The secret is truncated to the cipher's key size when longer and
    /// zero-padded when shorter. A configured IV must match the cipher's IV
    /// size; when absent, an all-zero IV is provisioned. ECB ignores the IV
    /// but the slot is kept for other modes.
    pub fn new(
        secret: &str,
        algorithm: CryptAlgorithm,
        mode: CryptMode,
        iv: Option<&[u8]>,
    ) -> Result<Self, StorageError> {
        let mut key = secret.as_bytes().to_vec();
        key.resize(algorithm.key_size(), 0);

        let iv = match iv {
            Some(iv) => {
                if iv.len() != algorithm.block_size() {
                    return Err(StorageError::Configuration(format!(
                        "crypt_iv must be {} bytes for {:?} (got {})",
                        algorithm.block_size(),
                        algorithm,
                        iv.len()
                    )));
                }
                iv.to_vec()
            }
            None => vec![0u8; algorithm.block_size()],
        };

        let kind = match algorithm {
            CryptAlgorithm::TripleDes => TdesEde3::new_from_slice(&key)
                .map(CipherKind::TripleDes)
                .map_err(|err| StorageError::Configuration(err.to_string()))?,
            CryptAlgorithm::Aes128 => Aes128::new_from_slice(&key)
                .map(CipherKind::Aes128)
                .map_err(|err| StorageError::Configuration(err.to_string()))?,
            CryptAlgorithm::Aes256 => Aes256::new_from_slice(&key)
                .map(CipherKind::Aes256)
                .map_err(|err| StorageError::Configuration(err.to_string()))?,
        };

        Ok(Self { kind, mode, iv })
    }

    /// The provisioned initialization vector
    pub fn iv(&self) -> &[u8] {
        &self.iv
    }

    /// Encrypt a payload and base64-encode the ciphertext.
    /// Empty input produces an empty string.
    pub fn encrypt(&self, data: &[u8]) -> String {
        let ciphertext = match self.mode {
            CryptMode::Ecb => match &self.kind {
                CipherKind::TripleDes(cipher) => ecb_encrypt(cipher, data),
                CipherKind::Aes128(cipher) => ecb_encrypt(cipher, data),
                CipherKind::Aes256(cipher) => ecb_encrypt(cipher, data),
            },
        };
        STANDARD.encode(ciphertext)
    }

    /// Base64-decode and decrypt a payload, stripping trailing NUL padding.
    ///
    /// Returns None when the payload is not valid base64 or the ciphertext
    /// is not a whole number of blocks.
    pub fn decrypt(&self, payload: &str) -> Option<Vec<u8>> {
        let ciphertext = STANDARD.decode(payload).ok()?;
        let mut data = match self.mode {
            CryptMode::Ecb => match &self.kind {
                CipherKind::TripleDes(cipher) => ecb_decrypt(cipher, &ciphertext)?,
                CipherKind::Aes128(cipher) => ecb_decrypt(cipher, &ciphertext)?,
                CipherKind::Aes256(cipher) => ecb_decrypt(cipher, &ciphertext)?,
            },
        };
        while data.last() == Some(&0) {
            data.pop();
        }
        Some(data)
    }
}

/// Zero-pad to a whole number of blocks and encrypt each block in place
fn ecb_encrypt<C: BlockEncrypt>(cipher: &C, data: &[u8]) -> Vec<u8> {
    if data.is_empty() {
        return Vec::new();
    }

    let block_size = C::block_size();
    let mut buf = data.to_vec();
    let rem = buf.len() % block_size;
    if rem != 0 {
        buf.resize(buf.len() + block_size - rem, 0);
    }

    for block in buf.chunks_exact_mut(block_size) {
        cipher.encrypt_block(GenericArray::from_mut_slice(block));
    }
    buf
}

/// Decrypt whole blocks in place; ciphertext of a partial block is rejected
fn ecb_decrypt<C: BlockDecrypt>(cipher: &C, data: &[u8]) -> Option<Vec<u8>> {
    if data.is_empty() {
        return Some(Vec::new());
    }

    let block_size = C::block_size();
    if data.len() % block_size != 0 {
        return None;
    }

    let mut buf = data.to_vec();
    for block in buf.chunks_exact_mut(block_size) {
        cipher.decrypt_block(GenericArray::from_mut_slice(block));
    }
    Some(buf)
}
