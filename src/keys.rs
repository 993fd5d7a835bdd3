//! VAPID key material decoding.
//!
//! The backend hands out its VAPID public key (RFC 8292) as base64url text,
//! usually without padding. The push manager wants raw bytes, so the key is
//! converted here before a registration is created.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use thiserror::Error;

use crate::constants::UNCOMPRESSED_P256_LEN;

/// Errors from decoding or validating key material.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyError {
    /// The text is not valid base64url.
    #[error("Invalid base64url key: {0}")]
    Decode(String),
    /// The decoded bytes are not a 65-byte uncompressed point.
    #[error("Key must be a 65-byte uncompressed P-256 point, got {len} bytes")]
    NotUncompressedPoint {
        /// Decoded length in bytes.
        len: usize,
    },
    /// The point is not on the P-256 curve.
    #[error("Key is not a valid P-256 public key: {0}")]
    InvalidPoint(String),
}

/// Rewrite base64url text as padded standard base64.
///
/// Pads with `=` up to a multiple of four characters and maps `-` to `+`
/// and `_` to `/`. Input that already carries padding is left padded.
pub fn to_standard_base64(input: &str) -> String {
    let padding = (4 - input.len() % 4) % 4;
    let mut out = String::with_capacity(input.len() + padding);
    out.extend(input.chars().map(|c| match c {
        '-' => '+',
        '_' => '/',
        other => other,
    }));
    out.push_str(&"=".repeat(padding));
    out
}

/// Decode a base64url string (padding optional) into raw bytes.
pub fn url_base64_to_bytes(input: &str) -> Result<Vec<u8>, KeyError> {
    BASE64
        .decode(to_standard_base64(input))
        .map_err(|e| KeyError::Decode(e.to_string()))
}

/// Decoded VAPID public key, ready to pass as `applicationServerKey`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationServerKey(Vec<u8>);

impl ApplicationServerKey {
    /// Decode a base64url-encoded key.
    pub fn from_base64url(input: &str) -> Result<Self, KeyError> {
        url_base64_to_bytes(input).map(Self)
    }

    /// Raw key bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consume the key, returning its bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    /// Check that the bytes form an uncompressed P-256 point on the curve.
    ///
    /// Push services only accept uncompressed points; a key that fails here
    /// would make `PushManager.subscribe()` reject without much detail.
    pub fn validate_p256(&self) -> Result<(), KeyError> {
        if self.0.len() != UNCOMPRESSED_P256_LEN || self.0[0] != 0x04 {
            return Err(KeyError::NotUncompressedPoint { len: self.0.len() });
        }
        p256::PublicKey::from_sec1_bytes(&self.0)
            .map_err(|e| KeyError::InvalidPoint(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD as BASE64URL;

    /// Uncompressed P-256 generator point, a valid public key.
    const GENERATOR: [u8; 65] = [
        0x04, 0x6b, 0x17, 0xd1, 0xf2, 0xe1, 0x2c, 0x42, 0x47, 0xf8, 0xbc, 0xe6, 0xe5, 0x63, 0xa4,
        0x40, 0xf2, 0x77, 0x03, 0x7d, 0x81, 0x2d, 0xeb, 0x33, 0xa0, 0xf4, 0xa1, 0x39, 0x45, 0xd8,
        0x98, 0xc2, 0x96, 0x4f, 0xe3, 0x42, 0xe2, 0xfe, 0x1a, 0x7f, 0x9b, 0x8e, 0xe7, 0xeb, 0x4a,
        0x7c, 0x0f, 0x9e, 0x16, 0x2b, 0xce, 0x33, 0x57, 0x6b, 0x31, 0x5e, 0xce, 0xcb, 0xb6, 0x40,
        0x68, 0x37, 0xbf, 0x51, 0xf5,
    ];

    #[test]
    fn test_padding_reaches_multiple_of_four() {
        let source = "abcdefghijklmnopqrstuvwxyz0123456789-_ABCDEFG";
        for len in 0..source.len() {
            let padded = to_standard_base64(&source[..len]);
            assert_eq!(padded.len() % 4, 0, "length {len} padded to {}", padded.len());
            assert!(!padded.contains('-') && !padded.contains('_'));
        }
    }

    #[test]
    fn test_decodes_already_padded_input() {
        assert_eq!(to_standard_base64("FFFF"), "FFFF");
        let bytes = url_base64_to_bytes("FFFF").expect("decode");
        assert_eq!(bytes, BASE64.decode("FFFF").expect("reference"));
        assert_eq!(bytes, vec![0x14, 0x51, 0x45]);
    }

    #[test]
    fn test_url_safe_alphabet_matches_standard() {
        let url_safe = "-_-_ab-_";
        let standard = "+/+/ab+/";
        assert_eq!(
            url_base64_to_bytes(url_safe).expect("url-safe"),
            BASE64.decode(standard).expect("standard"),
        );
    }

    #[test]
    fn test_matches_unpadded_base64url_decoding() {
        // Every remainder class: 0, 2 and 3 trailing characters
        for len in [30usize, 31, 32, 33, 65] {
            let data: Vec<u8> = (0..len).map(|i| (i * 37 % 256) as u8).collect();
            let encoded = BASE64URL.encode(&data);
            assert_eq!(url_base64_to_bytes(&encoded).expect("decode"), data);
        }
    }

    #[test]
    fn test_rejects_invalid_input() {
        assert!(url_base64_to_bytes("a").is_err());
        assert!(url_base64_to_bytes("not base64!").is_err());
    }

    #[test]
    fn test_validates_generator_point() {
        let key = ApplicationServerKey::from_base64url(&BASE64URL.encode(GENERATOR))
            .expect("decode");
        assert_eq!(key.as_bytes().len(), 65);
        assert!(key.validate_p256().is_ok());
    }

    #[test]
    fn test_rejects_short_key() {
        let key = ApplicationServerKey::from_base64url("FFFF").expect("decode");
        assert_eq!(
            key.validate_p256(),
            Err(KeyError::NotUncompressedPoint { len: 3 })
        );
    }

    #[test]
    fn test_rejects_point_off_curve() {
        let mut bytes = GENERATOR;
        bytes[64] ^= 0x01;
        let key = ApplicationServerKey::from_base64url(&BASE64URL.encode(bytes)).expect("decode");
        assert!(matches!(key.validate_p256(), Err(KeyError::InvalidPoint(_))));
    }
}
