//! Optional deflate compression of the encoded payload
//!
//! Compression wraps the *outer* transport layer: it is applied to the
//! already signed or encrypted value on write and undone before
//! verification or decryption on read. Raw deflate at maximum level, for
//! parity with the historical cookie format.

use std::io::{Read, Write};

use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;
use flate2::Compression;

/// Compresses and decompresses encoded payloads; an identity pass-through
/// when compression is disabled.
#[derive(Clone, Copy, Debug)]
pub struct Compressor {
    enabled: bool,
}

impl Compressor {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Deflate the payload at maximum compression.
    /// Empty input short-circuits to an empty result.
    pub fn compress(&self, data: &[u8]) -> Vec<u8> {
        if !self.enabled || data.is_empty() {
            return data.to_vec();
        }

        let mut encoder = DeflateEncoder::new(Vec::new(), Compression::best());
        encoder
            .write_all(data)
            .expect("deflate into a Vec cannot fail");
        encoder.finish().expect("deflate into a Vec cannot fail")
    }

    /// Inflate the payload; returns None when the input is not valid
    /// deflate data.
    pub fn decompress(&self, data: &[u8]) -> Option<Vec<u8>> {
        if !self.enabled || data.is_empty() {
            return Some(data.to_vec());
        }

        let mut out = Vec::new();
        DeflateDecoder::new(data).read_to_end(&mut out).ok()?;
        Some(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_is_identity() {
        let compressor = Compressor::new(false);
        assert_eq!(compressor.compress(b"hello"), b"hello");
        assert_eq!(compressor.decompress(b"hello"), Some(b"hello".to_vec()));
    }

    #[test]
    fn test_empty_input_identity() {
        let compressor = Compressor::new(true);
        assert_eq!(compressor.compress(b""), b"");
        assert_eq!(compressor.decompress(b""), Some(Vec::new()));
    }

    #[test]
    fn test_roundtrip() {
        let compressor = Compressor::new(true);
        let data = b"user_id=42;cart=1,2,3";
        let packed = compressor.compress(data);
        assert_eq!(compressor.decompress(&packed), Some(data.to_vec()));
    }

    #[test]
    fn test_repetitive_data_shrinks() {
        let compressor = Compressor::new(true);
        let data = vec![b'a'; 1000];
        let packed = compressor.compress(&data);
        assert!(packed.len() < data.len());
        assert_eq!(compressor.decompress(&packed), Some(data));
    }

    #[test]
    fn test_corrupt_data_rejected() {
        let compressor = Compressor::new(true);
        assert_eq!(compressor.decompress(b"\xff\xfe\xfd not deflate"), None);
    }
}
