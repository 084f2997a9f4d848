//! Noisy byte-channel simulator with bit flips and byte drops.
//!
//! This module corrupts a transmitted byte stream deterministically using
//! seeded randomness. Given the same seed and inputs, outputs are
//! bit-identical.
//!
//! # Simulated Effects
//!
//! - **Bit flips**: every transmitted bit is inverted independently with
//!   probability `bit_error_rate`
//! - **Byte drops**: every transmitted byte is discarded independently with
//!   probability `byte_drop_rate`
//!
//! # Determinism
//!
//! All randomness comes from a seeded ChaCha8 RNG. Each call draws from the
//! same generator, so the order of calls matters.

use crate::error::{ChannelError, Result};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Configuration for channel simulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelConfig {
    /// Per-bit flip probability [0.0, 1.0]
    pub bit_error_rate: f64,

    /// Per-byte drop probability [0.0, 1.0]
    pub byte_drop_rate: f64,

    /// Random seed for determinism
    pub seed: u64,
}

impl ChannelConfig {
    /// Create a configuration with no impairments (perfect channel).
    pub fn perfect(seed: u64) -> Self {
        Self {
            bit_error_rate: 0.0,
            byte_drop_rate: 0.0,
            seed,
        }
    }

    /// Create a default configuration: 1% bit errors, 1% byte drops.
    pub fn default_with_seed(seed: u64) -> Self {
        Self {
            bit_error_rate: 0.01,
            byte_drop_rate: 0.01,
            seed,
        }
    }

    /// Check both rates are valid probabilities.
    ///
    /// # Errors
    /// Returns `ChannelError::InvalidProbability` naming the bad field.
    pub fn validate(&self) -> Result<()> {
        check_probability("bit_error_rate", self.bit_error_rate)?;
        check_probability("byte_drop_rate", self.byte_drop_rate)?;
        Ok(())
    }
}

fn check_probability(name: &'static str, value: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ChannelError::InvalidProbability { name, value }.into());
    }
    Ok(())
}

/// ChaCha stream used for channel noise.
///
/// Data generators seeded with the same value run on stream 0, so the noise
/// never replays their keystream.
pub const NOISE_STREAM: u64 = 1;

/// Channel simulator implementing bit flips and byte drops.
///
/// # Thread Safety
/// Not thread-safe; use one instance per thread or synchronize externally.
pub struct ChannelSimulator {
    config: ChannelConfig,
    rng: ChaCha8Rng,

    // Statistics
    flip_bytes_in: u64,
    drop_bytes_in: u64,
    bits_flipped: u64,
    bytes_dropped: u64,
}

impl ChannelSimulator {
    /// Create a new channel simulator with the given configuration.
    ///
    /// The RNG is seeded with `config.seed` on [`NOISE_STREAM`].
    ///
    /// # Errors
    /// Returns an error if the configuration fails [`ChannelConfig::validate`].
    pub fn new(config: ChannelConfig) -> Result<Self> {
        config.validate()?;

        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        rng.set_stream(NOISE_STREAM);

        Ok(Self {
            config,
            rng,
            flip_bytes_in: 0,
            drop_bytes_in: 0,
            bits_flipped: 0,
            bytes_dropped: 0,
        })
    }

    /// Return a copy of `data` with each bit flipped independently.
    ///
    /// The output has the same length as the input.
    pub fn flip_bits(&mut self, data: &[u8]) -> Vec<u8> {
        self.flip_bytes_in += data.len() as u64;

        if self.config.bit_error_rate == 0.0 {
            return data.to_vec();
        }

        data.iter()
            .map(|&byte| {
                let mut mask = 0u8;
                for position in (0..8).rev() {
                    let roll: f64 = self.rng.gen();
                    if roll < self.config.bit_error_rate {
                        mask |= 1 << position;
                    }
                }
                self.bits_flipped += mask.count_ones() as u64;
                byte ^ mask
            })
            .collect()
    }

    /// Return a copy of `data` with each byte dropped independently.
    pub fn drop_bytes(&mut self, data: &[u8]) -> Vec<u8> {
        self.drop_bytes_in += data.len() as u64;

        if self.config.byte_drop_rate == 0.0 {
            return data.to_vec();
        }

        let mut kept = Vec::with_capacity(data.len());
        for &byte in data {
            let roll: f64 = self.rng.gen();
            if roll < self.config.byte_drop_rate {
                self.bytes_dropped += 1;
                continue;
            }
            kept.push(byte);
        }
        kept
    }

    /// Flip bits, then drop bytes.
    pub fn transmit(&mut self, data: &[u8]) -> Vec<u8> {
        let flipped = self.flip_bits(data);
        self.drop_bytes(&flipped)
    }

    /// Get statistics about channel behavior.
    pub fn stats(&self) -> ChannelStats {
        ChannelStats {
            flip_bytes_in: self.flip_bytes_in,
            drop_bytes_in: self.drop_bytes_in,
            bits_flipped: self.bits_flipped,
            bytes_dropped: self.bytes_dropped,
        }
    }
}

/// Statistics about channel simulator behavior.
///
/// Each stage counts its own input, so a [`ChannelSimulator::transmit`] of
/// N bytes adds N to both `flip_bytes_in` and `drop_bytes_in`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChannelStats {
    /// Bytes passed through [`ChannelSimulator::flip_bits`]
    pub flip_bytes_in: u64,

    /// Bytes passed through [`ChannelSimulator::drop_bytes`]
    pub drop_bytes_in: u64,

    /// Total bits inverted
    pub bits_flipped: u64,

    /// Total bytes discarded
    pub bytes_dropped: u64,
}

impl ChannelStats {
    /// Observed bit error rate (flipped / bits seen).
    pub fn bit_error_rate(&self) -> f64 {
        if self.flip_bytes_in == 0 {
            0.0
        } else {
            self.bits_flipped as f64 / (self.flip_bytes_in * 8) as f64
        }
    }

    /// Observed byte drop rate (dropped / bytes seen).
    pub fn drop_rate(&self) -> f64 {
        if self.drop_bytes_in == 0 {
            0.0
        } else {
            self.bytes_dropped as f64 / self.drop_bytes_in as f64
        }
    }
}
