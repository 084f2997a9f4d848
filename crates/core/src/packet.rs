//! Packet framing around the codec and a sliding-window packet scanner.
//!
//! # Packet Format
//!
//! ```text
//! +--------------------+
//! | Header (2 bytes)   |  0xAA 0xAA
//! +--------------------+
//! | Data segment       |  segment_len bytes (default 12)
//! +--------------------+
//! | Checksum (1 byte)  |  XOR of all data segment bytes
//! +--------------------+
//! ```
//!
//! Packets are concatenated with no separators and the whole stream is
//! Hamming encoded, so one packet occupies `2 * packet_len` bytes on the wire.
//!
//! # Recovery
//!
//! [`PacketScanner`] slides a window of `encoded_len` bytes over the received
//! stream one byte at a time. A window that decodes to a packet with the
//! right header and checksum is emitted and the window restarts empty;
//! anything else drops the oldest byte. Because every encoded byte stands
//! alone, a dropped byte costs at most the packet it belonged to.

use crate::buffer::Buffer;
use crate::error::{PacketError, Result};
use crate::hamming::{self, DecodeReport};
use std::collections::VecDeque;

/// Fixed sync pattern at the start of every packet
pub const HEADER: [u8; 2] = [0xAA, 0xAA];

/// Size of the packet header in bytes
pub const HEADER_SIZE: usize = HEADER.len();

/// Size of the trailing checksum in bytes
pub const CHECKSUM_SIZE: usize = 1;

/// Data segment length used when none is configured
pub const DEFAULT_SEGMENT_LEN: usize = 12;

/// Sizes of a packet for a given data segment length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacketLayout {
    segment_len: usize,
}

impl PacketLayout {
    /// Create a layout.
    ///
    /// # Errors
    /// Returns `PacketError::InvalidSegmentLength` if `segment_len` is zero.
    pub fn new(segment_len: usize) -> Result<Self> {
        if segment_len == 0 {
            return Err(PacketError::InvalidSegmentLength(segment_len).into());
        }
        Ok(Self { segment_len })
    }

    /// Data bytes per packet.
    pub fn segment_len(&self) -> usize {
        self.segment_len
    }

    /// Unencoded packet size: header + segment + checksum.
    pub fn packet_len(&self) -> usize {
        HEADER_SIZE + self.segment_len + CHECKSUM_SIZE
    }

    /// Packet size after Hamming encoding.
    pub fn encoded_len(&self) -> usize {
        crate::buffer::encoded_len(self.packet_len())
    }
}

impl Default for PacketLayout {
    fn default() -> Self {
        Self {
            segment_len: DEFAULT_SEGMENT_LEN,
        }
    }
}

/// XOR of all bytes in `segment`.
pub fn checksum(segment: &[u8]) -> u8 {
    segment.iter().fold(0, |acc, &byte| acc ^ byte)
}

/// Wrap a data segment into a packet.
///
/// # Errors
/// Returns `PacketError::WrongLength` if `segment` is not exactly
/// `layout.segment_len()` bytes.
pub fn build_packet(layout: PacketLayout, segment: &[u8]) -> Result<Vec<u8>> {
    if segment.len() != layout.segment_len() {
        return Err(PacketError::WrongLength {
            expected: layout.segment_len(),
            actual: segment.len(),
        }
        .into());
    }

    let mut packet = Vec::with_capacity(layout.packet_len());
    packet.extend_from_slice(&HEADER);
    packet.extend_from_slice(segment);
    packet.push(checksum(segment));

    Ok(packet)
}

/// The data segment of a packet. Header and checksum are not checked.
///
/// # Errors
/// Returns `PacketError::WrongLength` if `packet` is not exactly
/// `layout.packet_len()` bytes.
pub fn segment(layout: PacketLayout, packet: &[u8]) -> Result<&[u8]> {
    check_len(layout, packet)?;
    Ok(segment_of(layout, packet))
}

// Caller guarantees `packet.len() == layout.packet_len()`.
fn segment_of(layout: PacketLayout, packet: &[u8]) -> &[u8] {
    &packet[HEADER_SIZE..HEADER_SIZE + layout.segment_len()]
}

fn check_len(layout: PacketLayout, packet: &[u8]) -> Result<()> {
    if packet.len() != layout.packet_len() {
        return Err(PacketError::WrongLength {
            expected: layout.packet_len(),
            actual: packet.len(),
        }
        .into());
    }
    Ok(())
}

/// Outcome of checking a decoded packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Header pattern missing
    NoSync,
    /// Header present but the checksum disagrees with the segment
    WrongChecksum,
    /// Header and checksum both match
    Good,
}

/// Check header and checksum of a decoded packet.
///
/// # Errors
/// Returns `PacketError::WrongLength` if `packet` is not exactly
/// `layout.packet_len()` bytes.
pub fn validate(layout: PacketLayout, packet: &[u8]) -> Result<Verdict> {
    check_len(layout, packet)?;
    Ok(classify(layout, packet))
}

fn classify(layout: PacketLayout, packet: &[u8]) -> Verdict {
    if packet[..HEADER_SIZE] != HEADER {
        return Verdict::NoSync;
    }

    if checksum(segment_of(layout, packet)) != packet[layout.packet_len() - 1] {
        return Verdict::WrongChecksum;
    }

    Verdict::Good
}

/// Counters accumulated by a [`PacketScanner`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanReport {
    /// Encoded bytes fed to the scanner
    pub bytes_in: u64,
    /// Packets that decoded with a valid header and checksum
    pub packets_recovered: u64,
    /// Windows with a valid header but a bad checksum
    pub checksum_failures: u64,
    /// Bytes discarded while searching for sync
    pub bytes_skipped: u64,
    /// Bytes left in the window when the scan finished
    pub bytes_unconsumed: u64,
    /// Single-bit corrections inside recovered packets
    pub bits_corrected: u64,
    /// Suspected double errors inside recovered packets
    pub double_errors: u64,
}

/// Recovers packets from an encoded stream that may have lost bytes.
#[derive(Debug, Clone)]
pub struct PacketScanner {
    layout: PacketLayout,
    window: VecDeque<u8>,
    /// Stream offset of `window[0]`
    offset: u64,
    report: ScanReport,
}

impl PacketScanner {
    /// Create a scanner for packets of the given layout.
    pub fn new(layout: PacketLayout) -> Self {
        Self {
            layout,
            window: VecDeque::with_capacity(layout.encoded_len()),
            offset: 0,
            report: ScanReport::default(),
        }
    }

    /// Feed one received byte.
    ///
    /// # Returns
    /// - `Some(segment)` when the window now holds a valid packet
    /// - `None` otherwise
    ///
    /// # Errors
    /// Only on an internal sizing bug; a corrupt stream never errors.
    pub fn push(&mut self, byte: u8) -> Result<Option<Vec<u8>>> {
        self.report.bytes_in += 1;
        self.window.push_back(byte);

        if self.window.len() < self.layout.encoded_len() {
            return Ok(None);
        }

        let (packet, decode_report) = self.decode_window()?;

        match classify(self.layout, packet.as_slice()) {
            Verdict::Good => {
                tracing::trace!(offset = self.offset, "packet recovered");
                self.report.packets_recovered += 1;
                self.report.bits_corrected += decode_report.corrected as u64;
                self.report.double_errors += decode_report.double_errors as u64;
                self.offset += self.window.len() as u64;
                self.window.clear();
                Ok(Some(segment(self.layout, packet.as_slice())?.to_vec()))
            }
            Verdict::WrongChecksum => {
                tracing::debug!(offset = self.offset, "corrupted packet");
                self.report.checksum_failures += 1;
                self.slide();
                Ok(None)
            }
            Verdict::NoSync => {
                self.slide();
                Ok(None)
            }
        }
    }

    /// Feed a run of received bytes, collecting every recovered segment.
    pub fn push_all(&mut self, bytes: &[u8]) -> Result<Vec<Vec<u8>>> {
        let mut segments = Vec::new();
        for &byte in bytes {
            if let Some(segment) = self.push(byte)? {
                segments.push(segment);
            }
        }
        Ok(segments)
    }

    /// Counters so far.
    pub fn report(&self) -> ScanReport {
        self.report
    }

    /// Stop scanning and return the final counters.
    pub fn finish(mut self) -> ScanReport {
        self.report.bytes_unconsumed = self.window.len() as u64;
        self.report
    }

    fn slide(&mut self) {
        self.window.pop_front();
        self.offset += 1;
        self.report.bytes_skipped += 1;
    }

    fn decode_window(&mut self) -> Result<(Buffer, DecodeReport)> {
        let encoded = Buffer::from_bytes(self.window.make_contiguous().to_vec());
        let mut packet = Buffer::for_decoding(&encoded);
        let report = hamming::decode_buffer(&encoded, &mut packet)?;
        Ok((packet, report))
    }
}

/// Scan a whole received stream.
pub fn scan(layout: PacketLayout, encoded: &[u8]) -> Result<(Vec<Vec<u8>>, ScanReport)> {
    let mut scanner = PacketScanner::new(layout);
    let segments = scanner.push_all(encoded)?;
    Ok((segments, scanner.finish()))
}
