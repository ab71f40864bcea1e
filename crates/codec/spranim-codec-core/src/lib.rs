//! spranim-codec-core: bit-granular buffer backing the animation wire format.
//!
//! Fields are written with an arbitrary width (1..=32 bits) and read back in the
//! same order through an independent read cursor. Packing into bytes always
//! places bit 0 of the sequence at the high bit of the first byte.

pub mod bit_buffer;
pub mod transport;

pub use bit_buffer::{BitBuffer, BitBufferError, BitOrder, READ_BITS_MAX};
pub use transport::{
    binary_string_to_bytes, bytes_to_binary_string, decode_base64, encode_base64,
};
