//! Helpers for handing packed bytes to text-only transports (QR payloads, clipboard).

use base64::{engine::general_purpose::STANDARD as BASE64_STANDARD, Engine as _};

use crate::bit_buffer::BitBufferError;

/// One char per byte, code points U+0000..=U+00FF.
pub fn bytes_to_binary_string(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

/// Inverse of [`bytes_to_binary_string`]; rejects chars above U+00FF.
pub fn binary_string_to_bytes(text: &str) -> Result<Vec<u8>, BitBufferError> {
    text.chars()
        .enumerate()
        .map(|(i, c)| u8::try_from(u32::from(c)).map_err(|_| BitBufferError::NotAByte(c, i)))
        .collect()
}

pub fn encode_base64(bytes: &[u8]) -> String {
    BASE64_STANDARD.encode(bytes)
}

/// Surrounding whitespace is ignored so blobs pasted from files decode cleanly.
pub fn decode_base64(text: &str) -> Result<Vec<u8>, BitBufferError> {
    BASE64_STANDARD
        .decode(text.trim())
        .map_err(|e| BitBufferError::Base64(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binary_string_covers_latin1() {
        let bytes = vec![0x00, 0x41, 0xEC, 0xFF];
        let text = bytes_to_binary_string(&bytes);
        assert_eq!(text.chars().count(), 4);
        assert_eq!(binary_string_to_bytes(&text).unwrap(), bytes);
    }

    #[test]
    fn binary_string_rejects_wide_chars() {
        assert_eq!(
            binary_string_to_bytes("a\u{263A}"),
            Err(BitBufferError::NotAByte('\u{263A}', 1))
        );
    }

    #[test]
    fn base64_trims_whitespace() {
        assert_eq!(decode_base64("  QUJD\n").unwrap(), b"ABC".to_vec());
        assert!(decode_base64("not base64!").is_err());
    }
}
