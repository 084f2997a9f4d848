//! Metrics collection and reporting for a simulation run.
//!
//! This module provides observable insights into codec behavior:
//! - Volume (data bytes, encoded bytes, received bytes)
//! - Channel damage (bits flipped, bytes dropped)
//! - Codec work (corrections, suspected double errors)
//! - Residual damage after decoding
//! - Packet recovery through the scanner
//!
//! # Thread Safety
//!
//! The `Metrics` struct is NOT thread-safe. Collect per thread and merge.

use crate::channel::ChannelStats;
use crate::hamming::DecodeReport;
use crate::packet::ScanReport;
use std::time::{Duration, Instant};

/// Counters for one generate → encode → corrupt → decode run.
#[derive(Debug, Clone)]
pub struct Metrics {
    // === Timing ===
    /// When the run started
    pub start_time: Instant,

    /// When the run ended (set on completion)
    pub end_time: Option<Instant>,

    // === Volume ===
    /// Unencoded bytes generated
    pub data_bytes: u64,

    /// Bytes after Hamming encoding
    pub encoded_bytes: u64,

    // === Channel ===
    /// Bits inverted by the channel
    pub bits_flipped: u64,

    /// Bytes discarded by the channel
    pub bytes_dropped: u64,

    // === Aligned decode (bit errors only) ===
    /// Single-bit errors corrected
    pub bits_corrected: u64,

    /// Bytes whose only error was the overall parity bit
    pub parity_bit_errors: u64,

    /// Encoded bytes flagged as double errors
    pub double_errors: u64,

    /// Decoded bytes that still differ from the original
    pub residual_byte_errors: u64,

    // === Packet recovery (bit errors and byte drops) ===
    /// Packets sent
    pub packets_sent: u64,

    /// Packets recovered by the scanner
    pub packets_recovered: u64,

    /// Scanner windows with a bad checksum
    pub checksum_failures: u64,

    /// Recovered packets whose segment differs from what was sent
    pub packets_miscorrected: u64,
}

impl Metrics {
    /// Create new metrics with start time set to now.
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            end_time: None,
            data_bytes: 0,
            encoded_bytes: 0,
            bits_flipped: 0,
            bytes_dropped: 0,
            bits_corrected: 0,
            parity_bit_errors: 0,
            double_errors: 0,
            residual_byte_errors: 0,
            packets_sent: 0,
            packets_recovered: 0,
            checksum_failures: 0,
            packets_miscorrected: 0,
        }
    }

    /// Mark the run as complete.
    pub fn complete(&mut self) {
        self.end_time = Some(Instant::now());
    }

    /// Get total duration (or current elapsed if not complete).
    pub fn duration(&self) -> Duration {
        match self.end_time {
            Some(end) => end.duration_since(self.start_time),
            None => self.start_time.elapsed(),
        }
    }

    /// Fold in channel counters.
    pub fn record_channel(&mut self, stats: &ChannelStats) {
        self.bits_flipped = stats.bits_flipped;
        self.bytes_dropped = stats.bytes_dropped;
    }

    /// Fold in an aligned decode and compare it against the original data.
    pub fn record_decode(&mut self, report: &DecodeReport, original: &[u8], decoded: &[u8]) {
        self.bits_corrected += report.corrected as u64;
        self.parity_bit_errors += report.parity_bit_errors as u64;
        self.double_errors += report.double_errors as u64;
        self.residual_byte_errors += original
            .iter()
            .zip(decoded)
            .filter(|(a, b)| a != b)
            .count() as u64;
    }

    /// Fold in scanner counters.
    pub fn record_scan(&mut self, report: &ScanReport) {
        self.packets_recovered = report.packets_recovered;
        self.checksum_failures = report.checksum_failures;
    }

    /// Expansion ratio (encoded / data). Always 2.0 for a non-empty run.
    pub fn expansion_ratio(&self) -> f64 {
        if self.data_bytes == 0 {
            0.0
        } else {
            self.encoded_bytes as f64 / self.data_bytes as f64
        }
    }

    /// Residual byte error rate after aligned decoding.
    pub fn residual_error_rate(&self) -> f64 {
        if self.data_bytes == 0 {
            0.0
        } else {
            self.residual_byte_errors as f64 / self.data_bytes as f64
        }
    }

    /// Packet recovery rate (recovered / sent).
    pub fn recovery_rate(&self) -> f64 {
        if self.packets_sent == 0 {
            0.0
        } else {
            self.packets_recovered as f64 / self.packets_sent as f64
        }
    }

    /// Print a human-readable summary to stdout.
    pub fn print_summary(&self) {
        println!("\n=== Run Summary ===");
        println!("Duration: {} ms", self.duration().as_millis());
        println!();

        println!("=== Volume ===");
        println!("Data:    {} bytes", self.data_bytes);
        println!("Encoded: {} bytes (x{:.1})", self.encoded_bytes, self.expansion_ratio());
        println!();

        println!("=== Channel ===");
        println!("Bits flipped:  {}", self.bits_flipped);
        println!("Bytes dropped: {}", self.bytes_dropped);
        println!();

        println!("=== Aligned Decode ===");
        println!("Bits corrected:     {}", self.bits_corrected);
        println!("Parity bit errors:  {}", self.parity_bit_errors);
        println!("Double errors:      {}", self.double_errors);
        println!(
            "Residual errors:    {} bytes ({:.3}%)",
            self.residual_byte_errors,
            self.residual_error_rate() * 100.0
        );
        println!();

        println!("=== Packet Recovery ===");
        println!("Packets sent:        {}", self.packets_sent);
        println!(
            "Packets recovered:   {} ({:.2}%)",
            self.packets_recovered,
            self.recovery_rate() * 100.0
        );
        println!("Checksum failures:   {}", self.checksum_failures);
        println!("Miscorrected:        {}", self.packets_miscorrected);
        println!();
    }

    /// Export metrics as a simple text format (for parsing/testing).
    pub fn export_text(&self) -> String {
        format!(
            "duration_ms={}\n\
             data_bytes={}\n\
             encoded_bytes={}\n\
             bits_flipped={}\n\
             bytes_dropped={}\n\
             bits_corrected={}\n\
             parity_bit_errors={}\n\
             double_errors={}\n\
             residual_byte_errors={}\n\
             packets_sent={}\n\
             packets_recovered={}\n\
             checksum_failures={}\n\
             packets_miscorrected={}\n",
            self.duration().as_millis(),
            self.data_bytes,
            self.encoded_bytes,
            self.bits_flipped,
            self.bytes_dropped,
            self.bits_corrected,
            self.parity_bit_errors,
            self.double_errors,
            self.residual_byte_errors,
            self.packets_sent,
            self.packets_recovered,
            self.checksum_failures,
            self.packets_miscorrected,
        )
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
