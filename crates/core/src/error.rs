//! Error types for the hamming-sim system.
//!
//! Precondition violations (bad nibble values, undersized buffers) come back
//! as structured errors instead of panics, so a caller that sized a buffer
//! wrong gets told by how much.
//!
//! Uncorrectable channel corruption is NOT an error: the decoder always
//! produces a value, and detection is left to the packet checksum or to
//! [`crate::hamming::check_byte`].

use thiserror::Error;

/// Top-level error type for all operations in the system.
///
/// Each variant corresponds to a specific failure domain:
/// - Codec: nibble range and buffer capacity preconditions
/// - Packet: framing parameters and packet lengths
/// - Channel: simulator configuration
/// - I/O: artifact dumps
#[derive(Debug, Error)]
pub enum Error {
    /// Hamming codec precondition violated
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    /// Packet framing error
    #[error("packet error: {0}")]
    Packet(#[from] PacketError),

    /// Channel simulator misconfigured
    #[error("channel error: {0}")]
    Channel(#[from] ChannelError),

    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

/// Codec precondition violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CodecError {
    /// A nibble must fit in four bits
    #[error("invalid nibble value {value}: must be <= 15")]
    InvalidNibble { value: u8 },

    /// Output buffer cannot hold the guaranteed expansion/contraction
    #[error("insufficient output capacity: need {required} bytes, buffer holds {capacity}")]
    InsufficientCapacity { required: usize, capacity: usize },

    /// Append into a buffer that is already full
    #[error("buffer overflow: capacity {capacity} reached")]
    Overflow { capacity: usize },
}

/// Packet framing errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PacketError {
    /// Data segment must hold at least one byte
    #[error("invalid data segment length {0}")]
    InvalidSegmentLength(usize),

    /// Slice handed to a packet operation has the wrong size
    #[error("wrong length: expected {expected} bytes, got {actual}")]
    WrongLength { expected: usize, actual: usize },
}

/// Channel simulator configuration errors.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ChannelError {
    /// Probabilities live in [0.0, 1.0]
    #[error("{name} must be within [0.0, 1.0], got {value}")]
    InvalidProbability { name: &'static str, value: f64 },
}

/// Type alias for Result with our Error type
pub type Result<T> = std::result::Result<T, Error>;
