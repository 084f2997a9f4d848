//! Bit-level helpers and the fixed bit layout of an encoded byte.
//!
//! Positions are numbered from the LSB (position 0) to the MSB (position 7).
//! An encoded byte is laid out, from bit 7 down to bit 0, as:
//!
//! ```text
//!  7   6   5   4    3   2    1    0
//! +---+---+---+----+---+----+----+----+
//! | a | b | c | p3 | d | p2 | p1 | p0 |
//! +---+---+---+----+---+----+----+----+
//! ```
//!
//! Data bits sit at positions whose binary index has two or more bits set;
//! parity bits sit at powers of two. `p0` covers the whole byte and is never
//! part of the syndrome.

/// Position of data bit `a` (nibble MSB)
pub const A_POS: u8 = 7;
/// Position of data bit `b`
pub const B_POS: u8 = 6;
/// Position of data bit `c`
pub const C_POS: u8 = 5;
/// Position of parity bit `p3`
pub const P3_POS: u8 = 4;
/// Position of data bit `d` (nibble LSB)
pub const D_POS: u8 = 3;
/// Position of parity bit `p2`
pub const P2_POS: u8 = 2;
/// Position of parity bit `p1`
pub const P1_POS: u8 = 1;
/// Position of the overall parity bit `p0`
pub const P0_POS: u8 = 0;

/// Byte positions of the nibble's data bits, most significant first.
pub const DATA_POSITIONS: [u8; 4] = [A_POS, B_POS, C_POS, D_POS];

/// Position codes XOR-ed into the Hamming parity accumulator for each set
/// data bit, in the same order as [`DATA_POSITIONS`]. Each code is the
/// bit's own position, so the accumulator's bits 2, 1, 0 are `p3, p2, p1`.
pub const POSITION_CODES: [u8; 4] = [0b111, 0b110, 0b101, 0b011];

/// Byte positions covered by the syndrome (everything except `p0`).
pub const SYNDROME_POSITIONS: std::ops::RangeInclusive<u8> = 1..=7;

/// Return whether the bit at `position` is set.
#[inline]
pub fn bit(byte: u8, position: u8) -> bool {
    debug_assert!(position < 8);
    (byte >> position) & 1 == 1
}

/// Return `byte` with the bit at `position` inverted.
#[inline]
pub fn flip(byte: u8, position: u8) -> u8 {
    debug_assert!(position < 8);
    byte ^ (1 << position)
}

/// Return `byte` with the bit at `position` forced to `value`.
#[inline]
pub fn with_bit(byte: u8, position: u8, value: bool) -> u8 {
    debug_assert!(position < 8);
    (byte & !(1 << position)) | ((value as u8) << position)
}

/// Odd parity of `byte`: true when an odd number of bits are set.
#[inline]
pub fn parity(byte: u8) -> bool {
    byte.count_ones() & 1 == 1
}
