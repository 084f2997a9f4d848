//! hamming-sim-core: Hamming(8,4) line code over a noisy byte channel
//!
//! This library provides the core components for a system that:
//! - Encodes each 4-bit nibble into one self-contained Hamming(8,4) byte
//! - Corrects any single-bit error per encoded byte
//! - Frames data into checksummed packets behind a fixed sync header
//! - Simulates a noisy channel (bit flips, byte drops) with seeded randomness
//! - Recovers packets from a damaged stream with a sliding window
//!
//! # Architecture
//!
//! - `bits`: bit helpers and the fixed encoded-byte layout
//! - `buffer`: fixed-capacity byte buffer used for codec I/O
//! - `hamming`: nibble and buffer encode/decode
//! - `packet`: packet format, validation and stream scanning
//! - `channel`: channel simulator with seeded randomness
//! - `metrics`: observable run behavior
//!
//! # Example
//! ```
//! use hamming_sim_core::buffer::Buffer;
//! use hamming_sim_core::hamming::{decode_buffer, encode_buffer};
//!
//! let data = Buffer::from_bytes(b"hi".to_vec());
//! let mut encoded = Buffer::for_encoding(&data);
//! encode_buffer(&data, &mut encoded).unwrap();
//! assert_eq!(encoded.len(), 4);
//!
//! // flip one bit in every encoded byte
//! for byte in encoded.as_mut_slice() {
//!     *byte ^= 0b0010_0000;
//! }
//!
//! let mut decoded = Buffer::for_decoding(&encoded);
//! decode_buffer(&encoded, &mut decoded).unwrap();
//! assert_eq!(decoded.as_slice(), b"hi");
//! ```

pub mod bits;
pub mod buffer;
pub mod channel;
pub mod error;
pub mod hamming;
pub mod metrics;
pub mod packet;

// Re-export commonly used types
pub use buffer::Buffer;
pub use error::{Error, Result};
pub use hamming::Nibble;
