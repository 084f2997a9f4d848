//! Packet stream generation for simulation runs.
//!
//! Every packet gets a random data segment from a seeded ChaCha8 RNG, so a
//! given seed always yields the same stream.

use hamming_sim_core::packet::{build_packet, PacketLayout};
use hamming_sim_core::Result;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::io::Write;
use std::path::Path;

/// Generate `count` random data segments.
pub fn generate_segments(seed: u64, layout: PacketLayout, count: usize) -> Vec<Vec<u8>> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    (0..count)
        .map(|_| {
            let mut segment = vec![0u8; layout.segment_len()];
            rng.fill(segment.as_mut_slice());
            segment
        })
        .collect()
}

/// Frame segments into one concatenated packet stream.
///
/// # Errors
/// Returns `PacketError::WrongLength` if a segment doesn't match `layout`.
pub fn packet_stream(layout: PacketLayout, segments: &[Vec<u8>]) -> Result<Vec<u8>> {
    let mut stream = Vec::with_capacity(layout.packet_len() * segments.len());
    for segment in segments {
        stream.extend(build_packet(layout, segment)?);
    }
    Ok(stream)
}

/// Write a raw byte dump (no header, no length prefix).
pub fn write_dump(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    file.write_all(bytes)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hamming_sim_core::packet::{validate, Verdict, HEADER};

    #[test]
    fn test_generate_segments() {
        let layout = PacketLayout::default();
        let segments = generate_segments(42, layout, 100);

        assert_eq!(segments.len(), 100);
        assert!(segments.iter().all(|s| s.len() == 12));
    }

    #[test]
    fn test_determinism() {
        let layout = PacketLayout::default();
        assert_eq!(
            generate_segments(12345, layout, 50),
            generate_segments(12345, layout, 50)
        );
    }

    #[test]
    fn test_different_seeds() {
        let layout = PacketLayout::default();
        assert_ne!(generate_segments(1, layout, 10), generate_segments(2, layout, 10));
    }

    #[test]
    fn test_packet_stream_layout() {
        let layout = PacketLayout::new(5).unwrap();
        let segments = generate_segments(7, layout, 3);
        let stream = packet_stream(layout, &segments).unwrap();

        assert_eq!(stream.len(), 3 * layout.packet_len());
        for packet in stream.chunks(layout.packet_len()) {
            assert_eq!(packet[..2], HEADER);
            assert_eq!(validate(layout, packet).unwrap(), Verdict::Good);
        }
    }

    #[test]
    fn test_write_dump() {
        let path = std::env::temp_dir().join(format!("hamming-sim-dump-{}.bin", std::process::id()));
        write_dump(&path, &[1, 2, 3]).unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), vec![1, 2, 3]);
        std::fs::remove_file(&path).unwrap();
    }
}
