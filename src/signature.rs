//! Keyed digest signing of session payloads
//!
//! This module implements the signed cookie payload format:
//! `base64(data)` + `--` + hex-digest, where the digest is a double
//! application of the configured hash over the transmitted segment and the
//! secret:
//!
//! ```text
//! tag = hex(H(hex(H(segment + secret))))
//! ```
//!
//! The inner digest is hashed in its ASCII hex form, which is what the
//! historical on-wire format pins down. Verification recomputes the tag over
//! whichever segment representation was actually transmitted; a missing
//! separator or a mismatched tag degrades to "no session data" rather than
//! an error.

use std::str::FromStr;

use base64::{engine::general_purpose::STANDARD, Engine};
use sha1::{Digest, Sha1};
use sha2::Sha256;

use crate::error::StorageError;

/// Separator between the payload segment and its digest
const DIGEST_SEPARATOR: &str = "--";

/// Hash function used by the payload digest.
///
/// The double-application structure is fixed; only the hash itself is a
/// configuration point. Sha1 is the historical default.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DigestAlgorithm {
    /// SHA-1, 160-bit digest (default, on-wire compatible)
    Sha1,
    /// SHA-256
    Sha256,
}

impl FromStr for DigestAlgorithm {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sha1" => Ok(DigestAlgorithm::Sha1),
            "sha256" => Ok(DigestAlgorithm::Sha256),
            other => Err(StorageError::Configuration(format!(
                "unsupported digest algorithm `{}`",
                other
            ))),
        }
    }
}

/// Signs session payloads with a secret-keyed digest and verifies them on
/// the way back.
#[derive(Clone, Debug)]
pub struct Signer {
    secret: String,
    algorithm: DigestAlgorithm,
    encode_payload: bool,
}

impl Signer {
    /// Create a signer.
    ///
    /// `encode_payload` controls whether the plaintext is base64-wrapped
    /// before signing; when disabled, the payload must be valid UTF-8 and
    /// must not contain the `--` separator.
    pub fn new<S: Into<String>>(
        secret: S,
        algorithm: DigestAlgorithm,
        encode_payload: bool,
    ) -> Self {
        Self {
            secret: secret.into(),
            algorithm,
            encode_payload,
        }
    }

    /// Sign a payload.
    /// Returns: segment + `--` + digest, where segment is `base64(data)` or
    /// the raw data depending on the encoding setting.
    pub fn sign(&self, data: &[u8]) -> String {
        let segment = if self.encode_payload {
            STANDARD.encode(data)
        } else {
            String::from_utf8_lossy(data).into_owned()
        };
        let digest = self.digest(&segment);
        format!("{}{}{}", segment, DIGEST_SEPARATOR, digest)
    }

    /// Verify a signed payload and extract the original data.
    ///
    /// Splits on the first `--`, recomputes the digest over the left
    /// segment, and returns None if the separator is missing, the digest
    /// mismatches, or the segment fails to decode.
    pub fn unsign(&self, payload: &str) -> Option<Vec<u8>> {
        let (segment, tag) = payload.split_once(DIGEST_SEPARATOR)?;

        let expected = self.digest(segment);
        if !constant_time_compare(&expected, tag) {
            return None;
        }

        if self.encode_payload {
            STANDARD.decode(segment).ok()
        } else {
            Some(segment.as_bytes().to_vec())
        }
    }

    /// Generate the keyed message digest for a payload segment
    fn digest(&self, segment: &str) -> String {
        match self.algorithm {
            DigestAlgorithm::Sha1 => double_hex_digest::<Sha1>(segment, &self.secret),
            DigestAlgorithm::Sha256 => double_hex_digest::<Sha256>(segment, &self.secret),
        }
    }
}

/// hex(H(hex(H(segment + secret)))) - the inner digest is re-hashed in its
/// ASCII hex form
fn double_hex_digest<D: Digest>(segment: &str, secret: &str) -> String {
    let mut inner = D::new();
    inner.update(segment.as_bytes());
    inner.update(secret.as_bytes());
    let inner_hex = hex::encode(inner.finalize());

    let mut outer = D::new();
    outer.update(inner_hex.as_bytes());
    hex::encode(outer.finalize())
}

/// Constant-time string comparison to prevent timing attacks
fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }
    result == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signer() -> Signer {
        Signer::new("s3cr3t", DigestAlgorithm::Sha1, true)
    }

    #[test]
    fn test_sign_and_unsign() {
        let signed = signer().sign(b"user_id=42");
        assert_eq!(signer().unsign(&signed), Some(b"user_id=42".to_vec()));
    }

    #[test]
    fn test_reference_vector() {
        // Pinned on-wire format: base64("user_id=42") followed by the
        // double-sha1 digest of that segment and the secret
        let signed = signer().sign(b"user_id=42");
        assert_eq!(
            signed,
            "dXNlcl9pZD00Mg==--82f6e4cc3eee364cd9b06e73c7ed9d75e839d619"
        );
    }

    #[test]
    fn test_empty_data_still_signs() {
        let signed = signer().sign(b"");
        assert_eq!(signed, "--1d90cc5a56d217a34fdab72b69cefaeaa97a8c13");
        assert_eq!(signer().unsign(&signed), Some(Vec::new()));
    }

    #[test]
    fn test_tampered_digest() {
        let mut signed = signer().sign(b"user_id=42");
        signed.pop();
        signed.push('0');
        assert_eq!(signer().unsign(&signed), None);
    }

    #[test]
    fn test_tampered_segment() {
        let signed = signer().sign(b"user_id=42");
        let tampered = signed.replacen("dXNl", "dXNh", 1);
        assert_eq!(signer().unsign(&tampered), None);
    }

    #[test]
    fn test_missing_separator() {
        assert_eq!(signer().unsign("dXNlcl9pZD00Mg=="), None);
    }

    #[test]
    fn test_wrong_secret() {
        let signed = signer().sign(b"user_id=42");
        let other = Signer::new("wrong", DigestAlgorithm::Sha1, true);
        assert_eq!(other.unsign(&signed), None);
    }

    #[test]
    fn test_raw_segment() {
        let raw = Signer::new("s3cr3t", DigestAlgorithm::Sha1, false);
        let signed = raw.sign(b"user_id=42");
        assert_eq!(
            signed,
            "user_id=42--5f66af14c9f2b87435f31f383dc57da13a6e8162"
        );
        assert_eq!(raw.unsign(&signed), Some(b"user_id=42".to_vec()));
    }

    #[test]
    fn test_sha256_digest() {
        let signer = Signer::new("s3cr3t", DigestAlgorithm::Sha256, true);
        let signed = signer.sign(b"user_id=42");
        assert_eq!(
            signed,
            "dXNlcl9pZD00Mg==--cf92928bbe8c575a567819e37b5ce1673b0eb3d044772546c9b8d92b231daf2a"
        );
        assert_eq!(signer.unsign(&signed), Some(b"user_id=42".to_vec()));
    }

    #[test]
    fn test_algorithm_from_str() {
        assert_eq!(
            "sha1".parse::<DigestAlgorithm>().unwrap(),
            DigestAlgorithm::Sha1
        );
        assert_eq!(
            "sha256".parse::<DigestAlgorithm>().unwrap(),
            DigestAlgorithm::Sha256
        );
        assert!("md5".parse::<DigestAlgorithm>().is_err());
    }

    #[test]
    fn test_constant_time_compare() {
        assert!(constant_time_compare("abc", "abc"));
        assert!(!constant_time_compare("abc", "abd"));
        assert!(!constant_time_compare("abc", "abcd"));
    }
}
