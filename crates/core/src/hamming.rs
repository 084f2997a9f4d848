//! Hamming(8,4) line code: one encoded byte per 4-bit nibble.
//!
//! Positions 1..=7 of an encoded byte form a (7,4) Hamming code that
//! corrects any single flipped bit among them. Position 0 carries an overall
//! even-parity bit (`p0`) over the whole byte. The core decoder ignores `p0`;
//! [`check_byte`] uses it to tell corrected single errors from suspected
//! double errors without changing the decoded value.
//!
//! # Stream Layout
//!
//! Each data byte becomes two encoded bytes, high nibble first:
//!
//! ```text
//! data:     0x43
//!            |  \
//! encoded:  E(4) E(3)
//! ```
//!
//! An encoded byte at an even stream index always carries a high nibble. The
//! decoder relies on that alignment.

use crate::bits::{
    self, DATA_POSITIONS, P0_POS, P1_POS, P2_POS, P3_POS, POSITION_CODES, SYNDROME_POSITIONS,
};
use crate::buffer::{decoded_capacity, encoded_len, Buffer};
use crate::error::{CodecError, Result};
use std::fmt;

/// A 4-bit data value in `[0, 15]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Nibble(u8);

impl Nibble {
    /// Largest value a nibble can hold.
    pub const MAX: u8 = 0x0F;

    /// Create a nibble from a raw value.
    ///
    /// # Errors
    /// Returns `CodecError::InvalidNibble` if `value > 15`.
    pub fn new(value: u8) -> Result<Self> {
        if value > Self::MAX {
            return Err(CodecError::InvalidNibble { value }.into());
        }
        Ok(Self(value))
    }

    /// High nibble (bits 7..=4) of a byte.
    pub fn high(byte: u8) -> Self {
        Self(byte >> 4)
    }

    /// Low nibble (bits 3..=0) of a byte.
    pub fn low(byte: u8) -> Self {
        Self(byte & Self::MAX)
    }

    /// Raw value.
    pub fn value(self) -> u8 {
        self.0
    }

    /// Join a high and a low nibble into one byte.
    pub fn join(high: Self, low: Self) -> u8 {
        (high.0 << 4) | low.0
    }
}

impl fmt::Display for Nibble {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#06b}", self.0)
    }
}

/// Encode one nibble into its Hamming(8,4) byte.
pub fn encode_nibble(nibble: Nibble) -> u8 {
    let value = nibble.value();
    let mut byte = 0u8;
    let mut parity = 0u8;

    // DATA_POSITIONS and POSITION_CODES are ordered a, b, c, d (MSB first)
    for (i, (&position, &code)) in DATA_POSITIONS.iter().zip(POSITION_CODES.iter()).enumerate() {
        if (value >> (3 - i)) & 1 == 1 {
            byte |= 1 << position;
            parity ^= code;
        }
    }

    byte = bits::with_bit(byte, P3_POS, parity & 0b100 != 0);
    byte = bits::with_bit(byte, P2_POS, parity & 0b010 != 0);
    byte = bits::with_bit(byte, P1_POS, parity & 0b001 != 0);

    // p0 last: bit 0 is still clear, so this is the parity of bits 1..=7
    bits::with_bit(byte, P0_POS, bits::parity(byte))
}

/// Encode a raw nibble value and append the result to `output`.
///
/// # Errors
/// - `CodecError::InvalidNibble` if `value > 15`
/// - `CodecError::Overflow` if `output` is full
pub fn encode_nibble_into(output: &mut Buffer, value: u8) -> Result<()> {
    let nibble = Nibble::new(value)?;
    output.push(encode_nibble(nibble))
}

/// Encode every byte of `input` into `output`, high nibble first.
///
/// `output` is reset before writing and ends with exactly `2 * input.len()`
/// bytes. `input` is not modified.
///
/// # Errors
/// Returns `CodecError::InsufficientCapacity` if `output` cannot hold
/// `2 * input.len()` bytes. Nothing is written in that case.
pub fn encode_buffer(input: &Buffer, output: &mut Buffer) -> Result<()> {
    output.ensure_capacity(encoded_len(input.len()))?;
    output.clear();

    for &byte in input.as_slice() {
        output.push(encode_nibble(Nibble::high(byte)))?;
        output.push(encode_nibble(Nibble::low(byte)))?;
    }

    Ok(())
}

/// XOR of the positions (1..=7) of every set bit in `byte`.
///
/// Zero for a valid codeword. After a single flip in positions 1..=7 it
/// equals the flipped position. `p0` does not participate.
pub fn syndrome(byte: u8) -> u8 {
    SYNDROME_POSITIONS
        .filter(|&position| bits::bit(byte, position))
        .fold(0, |acc, position| acc ^ position)
}

/// Decode one encoded byte, silently correcting a single-bit error.
///
/// Two or more flipped bits among positions 1..=7 produce a wrong value
/// with no indication. See [`check_byte`] for a variant that flags them.
pub fn decode_nibble(byte: u8) -> Nibble {
    let syndrome = syndrome(byte);
    let corrected = if syndrome != 0 {
        bits::flip(byte, syndrome)
    } else {
        byte
    };

    let value = DATA_POSITIONS
        .iter()
        .fold(0u8, |acc, &position| (acc << 1) | bits::bit(corrected, position) as u8);

    Nibble(value)
}

/// What the overall parity bit says about an encoded byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Valid codeword
    Clean,
    /// Single-bit error at `position` (1..=7), corrected
    Corrected { position: u8 },
    /// Only `p0` was wrong; data unaffected
    ParityBitError,
    /// Non-zero syndrome with even overall parity: two bits flipped.
    /// The returned nibble is probably wrong.
    DoubleError,
}

impl Status {
    /// True unless a double error is suspected.
    pub fn is_trusted(self) -> bool {
        !matches!(self, Self::DoubleError)
    }
}

/// Result of [`check_byte`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decoded {
    /// Same value [`decode_nibble`] returns
    pub nibble: Nibble,
    /// Error classification
    pub status: Status,
}

/// Decode one encoded byte and classify the error using `p0`.
///
/// The decoded nibble is always identical to [`decode_nibble`]. Three or
/// more flipped bits can masquerade as [`Status::Corrected`].
pub fn check_byte(byte: u8) -> Decoded {
    let syndrome = syndrome(byte);
    let overall_odd = bits::parity(byte);

    let status = match (syndrome, overall_odd) {
        (0, false) => Status::Clean,
        (0, true) => Status::ParityBitError,
        (position, true) => Status::Corrected { position },
        (_, false) => Status::DoubleError,
    };

    Decoded {
        nibble: decode_nibble(byte),
        status,
    }
}

/// Per-call statistics from [`decode_buffer`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeReport {
    /// Encoded bytes consumed
    pub bytes_in: usize,
    /// Single-bit errors corrected in positions 1..=7
    pub corrected: usize,
    /// Bytes whose only error was in `p0`
    pub parity_bit_errors: usize,
    /// Bytes flagged as double errors
    pub double_errors: usize,
    /// Trailing high nibble of an odd-length input. Not written to output.
    pub dangling: Option<Nibble>,
}

impl DecodeReport {
    /// Check if every byte decoded without a suspected double error.
    pub fn is_trusted(&self) -> bool {
        self.double_errors == 0
    }
}

/// Decode `input` into `output`, pairing nibbles back into bytes.
///
/// `output` is reset before writing. The nibble at an even index becomes
/// the high half of a new byte, the following odd-index nibble completes it.
/// For an odd-length input the last high nibble is reported in
/// [`DecodeReport::dangling`] and does not count toward `output.len()`.
///
/// # Errors
/// Returns `CodecError::InsufficientCapacity` if `output` cannot hold
/// `ceil(input.len() / 2)` bytes.
pub fn decode_buffer(input: &Buffer, output: &mut Buffer) -> Result<DecodeReport> {
    output.ensure_capacity(decoded_capacity(input.len()))?;
    output.clear();

    let mut report = DecodeReport {
        bytes_in: input.len(),
        ..DecodeReport::default()
    };
    let mut high: Option<Nibble> = None;

    for (index, &byte) in input.as_slice().iter().enumerate() {
        let decoded = check_byte(byte);

        match decoded.status {
            Status::Clean => {}
            Status::Corrected { .. } => report.corrected += 1,
            Status::ParityBitError => report.parity_bit_errors += 1,
            Status::DoubleError => {
                report.double_errors += 1;
                tracing::trace!(index, byte, "double error suspected");
            }
        }

        match high.take() {
            None => high = Some(decoded.nibble),
            Some(h) => output.push(Nibble::join(h, decoded.nibble))?,
        }
    }

    report.dangling = high;
    Ok(report)
}

/// Encode a byte slice into a freshly allocated vector.
pub fn encode(data: &[u8]) -> Vec<u8> {
    data.iter()
        .flat_map(|&byte| {
            [
                encode_nibble(Nibble::high(byte)),
                encode_nibble(Nibble::low(byte)),
            ]
        })
        .collect()
}

/// Decode an encoded byte slice into a freshly allocated vector.
///
/// A trailing odd byte is dropped, as in [`decode_buffer`].
pub fn decode(encoded: &[u8]) -> Vec<u8> {
    encoded
        .chunks_exact(2)
        .map(|pair| Nibble::join(decode_nibble(pair[0]), decode_nibble(pair[1])))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    /// Hand-derived encodings of 0..=15.
    const MAPPINGS: [u8; 16] = [
        0b00000000, 0b00001111, 0b00110011, 0b00111100, 0b01010101, 0b01011010, 0b01100110,
        0b01101001, 0b10010110, 0b10011001, 0b10100101, 0b10101010, 0b11000011, 0b11001100,
        0b11110000, 0b11111111,
    ];

    fn nibble(value: u8) -> Nibble {
        Nibble::new(value).unwrap()
    }

    #[test]
    fn test_encode_table() {
        for value in 0..16u8 {
            assert_eq!(
                encode_nibble(nibble(value)),
                MAPPINGS[value as usize],
                "nibble {value}"
            );
        }
    }

    #[test]
    fn test_encode_single_data_bits() {
        // a alone: parity code 0b111 sets p3, p2, p1; four bits set so p0 = 0
        assert_eq!(encode_nibble(nibble(0b1000)), 0b1001_0110);
        // a and d: 0b111 ^ 0b011 = 0b100 sets p3 only; p0 = 1
        assert_eq!(encode_nibble(nibble(0b1001)), 0b1001_1001);
    }

    #[test]
    fn test_encoded_bytes_have_even_parity() {
        for value in 0..16u8 {
            let byte = encode_nibble(nibble(value));
            assert!(!bits::parity(byte));
            assert_eq!(syndrome(byte), 0);
        }
    }

    #[test]
    fn test_invalid_nibble() {
        assert!(Nibble::new(15).is_ok());
        assert!(matches!(
            Nibble::new(16),
            Err(Error::Codec(CodecError::InvalidNibble { value: 16 }))
        ));

        let mut out = Buffer::with_capacity(4);
        assert!(encode_nibble_into(&mut out, 200).is_err());
        assert!(out.is_empty());
    }

    #[test]
    fn test_encode_nibble_into_appends() {
        let mut out = Buffer::with_capacity(32);

        for round in 0..2 {
            for value in 0..16u8 {
                encode_nibble_into(&mut out, value).unwrap();
                assert_eq!(out.len(), round * 16 + value as usize + 1);
                assert_eq!(out.as_slice()[out.len() - 1], MAPPINGS[value as usize]);
            }
        }
    }

    #[test]
    fn test_encode_buffer_order() {
        let input = Buffer::from_bytes(vec![0x43, 0x2B]);
        let mut out = Buffer::for_encoding(&input);

        encode_buffer(&input, &mut out).unwrap();

        assert_eq!(
            out.as_slice(),
            &[MAPPINGS[4], MAPPINGS[3], MAPPINGS[2], MAPPINGS[11]]
        );
    }

    #[test]
    fn test_encode_buffer_resets_output() {
        let input = Buffer::from_bytes(vec![0xFF]);
        let mut out = Buffer::with_capacity(8);
        out.push(0x11).unwrap();
        out.push(0x22).unwrap();

        encode_buffer(&input, &mut out).unwrap();

        assert_eq!(out.as_slice(), &[MAPPINGS[15], MAPPINGS[15]]);
    }

    #[test]
    fn test_encode_buffer_insufficient_capacity() {
        let input = Buffer::from_bytes(vec![1, 2, 3]);
        let mut out = Buffer::with_capacity(5);
        out.push(0x99).unwrap();

        let result = encode_buffer(&input, &mut out);
        assert!(matches!(
            result,
            Err(Error::Codec(CodecError::InsufficientCapacity {
                required: 6,
                capacity: 5
            }))
        ));
        // rejected before touching the output
        assert_eq!(out.as_slice(), &[0x99]);
    }

    #[test]
    fn test_decode_clean_table() {
        for value in 0..16u8 {
            assert_eq!(decode_nibble(MAPPINGS[value as usize]).value(), value);
        }
    }

    #[test]
    fn test_single_bit_correction() {
        for value in 0..16u8 {
            let encoded = MAPPINGS[value as usize];
            for position in 0..8 {
                let corrupted = bits::flip(encoded, position);
                assert_eq!(
                    decode_nibble(corrupted).value(),
                    value,
                    "nibble {value}, flipped bit {position}"
                );
            }
        }
    }

    #[test]
    fn test_flip_bit_three_of_seven() {
        let corrupted = bits::flip(MAPPINGS[7], 3);
        assert_eq!(syndrome(corrupted), 3);
        assert_eq!(decode_nibble(corrupted).value(), 7);
    }

    #[test]
    fn test_double_flip_miscorrects() {
        // positions 1 and 2 together look like a single error at position 3 (d)
        let corrupted = bits::flip(bits::flip(MAPPINGS[0], 1), 2);
        assert_eq!(syndrome(corrupted), 3);
        assert_eq!(decode_nibble(corrupted).value(), 1);
    }

    #[test]
    fn test_check_byte_classification() {
        let clean = check_byte(MAPPINGS[5]);
        assert_eq!(clean.status, Status::Clean);
        assert_eq!(clean.nibble.value(), 5);

        let p0 = check_byte(bits::flip(MAPPINGS[5], 0));
        assert_eq!(p0.status, Status::ParityBitError);
        assert_eq!(p0.nibble.value(), 5);

        for position in 1..8 {
            let single = check_byte(bits::flip(MAPPINGS[5], position));
            assert_eq!(single.status, Status::Corrected { position });
            assert_eq!(single.nibble.value(), 5);
        }
    }

    #[test]
    fn test_check_byte_flags_every_double_error() {
        for value in 0..16u8 {
            let encoded = MAPPINGS[value as usize];
            for first in 0..8 {
                for second in (first + 1)..8 {
                    let corrupted = bits::flip(bits::flip(encoded, first), second);
                    let decoded = check_byte(corrupted);
                    assert_eq!(decoded.status, Status::DoubleError);
                    assert!(!decoded.status.is_trusted());
                    assert_eq!(decoded.nibble, decode_nibble(corrupted));
                }
            }
        }
    }

    #[test]
    fn test_decode_buffer_round_trip() {
        let input = Buffer::from_bytes((0..=255u8).collect::<Vec<_>>());
        let mut encoded = Buffer::for_encoding(&input);
        encode_buffer(&input, &mut encoded).unwrap();

        let mut decoded = Buffer::for_decoding(&encoded);
        let report = decode_buffer(&encoded, &mut decoded).unwrap();

        assert_eq!(decoded.as_slice(), input.as_slice());
        assert_eq!(report.bytes_in, 512);
        assert_eq!(report.corrected, 0);
        assert!(report.is_trusted());
        assert!(report.dangling.is_none());
    }

    #[test]
    fn test_decode_buffer_odd_length() {
        let encoded = Buffer::from_bytes(vec![MAPPINGS[4], MAPPINGS[3], MAPPINGS[9]]);
        let mut decoded = Buffer::for_decoding(&encoded);
        assert_eq!(decoded.capacity(), 2);

        let report = decode_buffer(&encoded, &mut decoded).unwrap();

        assert_eq!(decoded.as_slice(), &[0x43]);
        assert_eq!(report.dangling, Some(nibble(9)));
    }

    #[test]
    fn test_decode_buffer_counts_errors() {
        let mut bytes = encode(&[0xA5, 0x3C]);
        bytes[0] = bits::flip(bytes[0], 6);
        bytes[1] = bits::flip(bytes[1], 0);
        bytes[3] = bits::flip(bits::flip(bytes[3], 2), 5);

        let encoded = Buffer::from_bytes(bytes);
        let mut decoded = Buffer::for_decoding(&encoded);
        let report = decode_buffer(&encoded, &mut decoded).unwrap();

        assert_eq!(report.corrected, 1);
        assert_eq!(report.parity_bit_errors, 1);
        assert_eq!(report.double_errors, 1);
        assert_eq!(decoded.as_slice()[0], 0xA5);
    }

    #[test]
    fn test_decode_buffer_insufficient_capacity() {
        let encoded = Buffer::from_bytes(vec![0; 5]);
        let mut decoded = Buffer::with_capacity(2);

        assert!(matches!(
            decode_buffer(&encoded, &mut decoded),
            Err(Error::Codec(CodecError::InsufficientCapacity {
                required: 3,
                capacity: 2
            }))
        ));
    }

    #[test]
    fn test_slice_helpers_agree_with_buffers() {
        let data = b"nibble pairs".to_vec();
        let input = Buffer::from_bytes(data.clone());
        let mut out = Buffer::for_encoding(&input);
        encode_buffer(&input, &mut out).unwrap();

        assert_eq!(encode(&data), out.as_slice());
        assert_eq!(decode(out.as_slice()), data);
    }

    #[test]
    fn test_nibble_split_join() {
        assert_eq!(Nibble::high(0x9C).value(), 0x9);
        assert_eq!(Nibble::low(0x9C).value(), 0xC);
        assert_eq!(Nibble::join(Nibble::high(0x9C), Nibble::low(0x9C)), 0x9C);
        assert_eq!(nibble(5).to_string(), "0b0101");
    }
}
