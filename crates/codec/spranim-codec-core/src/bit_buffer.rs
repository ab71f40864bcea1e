//! Append-only bit buffer with a separate read cursor.
//!
//! Model:
//! - Writes append `n` bits of an unsigned value; values that do not fit are rejected,
//!   never truncated, and leave the buffer untouched.
//! - Reads consume `n` bits from the read cursor in the same field order they were
//!   written. The cursor is independent of the write end; `rewind` restarts it.
//! - `BitOrder` is a field-level property. Byte packing (`to_byte_array`) is always
//!   most-significant-bit first per byte.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Widest field a single read or write may address.
pub const READ_BITS_MAX: u32 = 32;

/// Bit order of a multi-bit field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BitOrder {
    /// Most significant bit first.
    #[default]
    Big,
    /// Least significant bit first.
    Little,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BitBufferError {
    #[error("value {value} does not fit in {bits} bits")]
    ValueTooLarge { bits: u32, value: u64 },
    #[error("field width {bits} exceeds the {}-bit maximum", READ_BITS_MAX)]
    FieldTooWide { bits: u32 },
    #[error("field width must be at least one bit")]
    ZeroWidth,
    #[error("requested {requested} bits but only {remaining} remain")]
    OutOfBits { requested: u32, remaining: usize },
    #[error("base64 decode error: {0}")]
    Base64(String),
    #[error("character {0:?} at offset {1} is not a byte")]
    NotAByte(char, usize),
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BitBuffer {
    order: BitOrder,
    bits: Vec<bool>,
    read_pos: usize,
}

impl BitBuffer {
    /// Empty buffer with big-endian fields.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_order(order: BitOrder) -> Self {
        Self {
            order,
            bits: Vec::new(),
            read_pos: 0,
        }
    }

    /// Rebuild a buffer from packed bytes. Every byte contributes eight bits, high bit
    /// first, matching `to_byte_array`; trailing pad bits are kept.
    pub fn from_bytes(bytes: &[u8], order: BitOrder) -> Self {
        let mut bits = Vec::with_capacity(bytes.len() * 8);
        for byte in bytes {
            for shift in (0..8).rev() {
                bits.push((byte >> shift) & 1 == 1);
            }
        }
        Self {
            order,
            bits,
            read_pos: 0,
        }
    }

    #[inline]
    pub fn bit_order(&self) -> BitOrder {
        self.order
    }

    /// Total number of bits written.
    #[inline]
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    #[inline]
    pub fn read_position(&self) -> usize {
        self.read_pos
    }

    /// Bits left between the read cursor and the write end.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.bits.len().saturating_sub(self.read_pos)
    }

    /// Append `n_bits` bits of `value`.
    pub fn write_bits(&mut self, n_bits: u32, value: u32) -> Result<(), BitBufferError> {
        check_width(n_bits)?;
        if u64::from(value) >= 1u64 << n_bits {
            return Err(BitBufferError::ValueTooLarge {
                bits: n_bits,
                value: u64::from(value),
            });
        }

        self.bits.reserve(n_bits as usize);
        match self.order {
            BitOrder::Big => {
                for shift in (0..n_bits).rev() {
                    self.bits.push((value >> shift) & 1 == 1);
                }
            }
            BitOrder::Little => {
                for shift in 0..n_bits {
                    self.bits.push((value >> shift) & 1 == 1);
                }
            }
        }
        Ok(())
    }

    /// Read the next `n_bits`-wide field and advance the read cursor.
    /// On error the cursor does not move.
    pub fn read_bits(&mut self, n_bits: u32) -> Result<u32, BitBufferError> {
        check_width(n_bits)?;
        let remaining = self.remaining();
        if (n_bits as usize) > remaining {
            return Err(BitBufferError::OutOfBits {
                requested: n_bits,
                remaining,
            });
        }

        let field = &self.bits[self.read_pos..self.read_pos + n_bits as usize];
        let value = match self.order {
            BitOrder::Big => field
                .iter()
                .fold(0u64, |acc, &bit| (acc << 1) | u64::from(bit)),
            BitOrder::Little => field
                .iter()
                .enumerate()
                .fold(0u64, |acc, (i, &bit)| acc | (u64::from(bit) << i)),
        };
        self.read_pos += n_bits as usize;
        Ok(value as u32)
    }

    /// Reset the read cursor to the start without touching the contents.
    #[inline]
    pub fn rewind(&mut self) {
        self.read_pos = 0;
    }

    /// Pack the bit sequence into bytes, high bit first, zero-padding the last byte.
    pub fn to_byte_array(&self) -> Vec<u8> {
        self.bits
            .chunks(8)
            .map(|chunk| {
                chunk
                    .iter()
                    .enumerate()
                    .fold(0u8, |byte, (i, &bit)| byte | (u8::from(bit) << (7 - i)))
            })
            .collect()
    }

    /// Packed bytes rendered as a one-char-per-byte string (U+0000..=U+00FF).
    pub fn to_binary_string(&self) -> String {
        crate::transport::bytes_to_binary_string(&self.to_byte_array())
    }

    pub fn to_base64(&self) -> String {
        crate::transport::encode_base64(&self.to_byte_array())
    }

    pub fn from_base64(text: &str, order: BitOrder) -> Result<Self, BitBufferError> {
        let bytes = crate::transport::decode_base64(text)?;
        Ok(Self::from_bytes(&bytes, order))
    }
}

impl fmt::Display for BitBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in &self.bits {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

fn check_width(n_bits: u32) -> Result<(), BitBufferError> {
    match n_bits {
        0 => Err(BitBufferError::ZeroWidth),
        1..=READ_BITS_MAX => Ok(()),
        _ => Err(BitBufferError::FieldTooWide { bits: n_bits }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn big_endian_fields_are_msb_first() {
        let mut buf = BitBuffer::new();
        buf.write_bits(4, 0b1010).unwrap();
        buf.write_bits(3, 0b011).unwrap();
        assert_eq!(buf.to_string(), "1010011");
        assert_eq!(buf.to_byte_array(), vec![0b1010_0110]);
    }

    #[test]
    fn little_endian_fields_are_lsb_first_but_bytes_stay_msb_first() {
        let mut buf = BitBuffer::with_order(BitOrder::Little);
        buf.write_bits(4, 0b0001).unwrap();
        assert_eq!(buf.to_string(), "1000");
        assert_eq!(buf.to_byte_array(), vec![0b1000_0000]);
        assert_eq!(buf.read_bits(4).unwrap(), 1);
    }

    #[test]
    fn overflow_is_rejected_without_mutation() {
        let mut buf = BitBuffer::new();
        buf.write_bits(2, 3).unwrap();
        let err = buf.write_bits(2, 4).unwrap_err();
        assert_eq!(err, BitBufferError::ValueTooLarge { bits: 2, value: 4 });
        assert_eq!(buf.len(), 2);
    }

    #[test]
    fn full_width_fields() {
        let mut buf = BitBuffer::new();
        buf.write_bits(32, u32::MAX).unwrap();
        assert_eq!(buf.read_bits(32).unwrap(), u32::MAX);
        assert!(matches!(
            buf.read_bits(33),
            Err(BitBufferError::FieldTooWide { bits: 33 })
        ));
        assert!(matches!(
            buf.write_bits(33, 0),
            Err(BitBufferError::FieldTooWide { bits: 33 })
        ));
    }

    #[test]
    fn reading_past_the_end_keeps_the_cursor() {
        let mut buf = BitBuffer::new();
        buf.write_bits(3, 5).unwrap();
        assert_eq!(
            buf.read_bits(4),
            Err(BitBufferError::OutOfBits {
                requested: 4,
                remaining: 3
            })
        );
        assert_eq!(buf.read_position(), 0);
        assert_eq!(buf.read_bits(3).unwrap(), 5);
    }

    #[test]
    fn zero_width_fields_are_rejected() {
        let mut buf = BitBuffer::new();
        assert_eq!(buf.write_bits(0, 0), Err(BitBufferError::ZeroWidth));
        assert!(buf.is_empty());
        buf.write_bits(1, 1).unwrap();
        assert_eq!(buf.read_bits(0), Err(BitBufferError::ZeroWidth));
        assert_eq!(buf.read_position(), 0);
        assert_eq!(buf.read_bits(1).unwrap(), 1);
    }
}
