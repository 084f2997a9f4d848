//! Property tests for the Hamming(8,4) codec.

use hamming_sim_core::{
    bits,
    buffer::Buffer,
    hamming::{check_byte, decode, decode_buffer, decode_nibble, encode, encode_buffer, Status},
    packet::{build_packet, scan, PacketLayout},
};
use proptest::prelude::*;

proptest! {
    #[test]
    fn prop_round_trip(data in proptest::collection::vec(any::<u8>(), 0..512)) {
        prop_assert_eq!(decode(&encode(&data)), data);
    }

    #[test]
    fn prop_any_single_flip_is_corrected(
        data in proptest::collection::vec(any::<u8>(), 1..64),
        index in any::<prop::sample::Index>(),
        position in 0u8..8,
    ) {
        let mut encoded = encode(&data);
        let i = index.index(encoded.len());
        encoded[i] = bits::flip(encoded[i], position);

        prop_assert_eq!(decode(&encoded), data);
    }

    #[test]
    fn prop_one_flip_per_byte_is_corrected(
        data in proptest::collection::vec(any::<u8>(), 1..64),
        positions in proptest::collection::vec(0u8..8, 128),
    ) {
        let encoded: Vec<u8> = encode(&data)
            .iter()
            .zip(&positions)
            .map(|(&byte, &position)| bits::flip(byte, position))
            .collect();

        prop_assert_eq!(decode(&encoded), data);
    }

    #[test]
    fn prop_buffer_ratios(data in proptest::collection::vec(any::<u8>(), 0..256), extra in 0usize..4) {
        let input = Buffer::from_bytes(data.clone());
        let mut encoded = Buffer::with_capacity(2 * data.len() + extra);
        encode_buffer(&input, &mut encoded).unwrap();
        prop_assert_eq!(encoded.len(), 2 * data.len());

        // drop `extra % 2` bytes from the end to exercise odd lengths
        let keep = encoded.len().saturating_sub(extra % 2);
        let received = Buffer::from_bytes(encoded.as_slice()[..keep].to_vec());
        let mut decoded = Buffer::for_decoding(&received);
        let report = decode_buffer(&received, &mut decoded).unwrap();

        prop_assert_eq!(decoded.len(), keep / 2);
        prop_assert_eq!(report.dangling.is_some(), keep % 2 == 1);
        prop_assert_eq!(decoded.as_slice(), &data[..keep / 2]);
    }

    #[test]
    fn prop_check_byte_agrees_with_decode(byte in any::<u8>()) {
        let checked = check_byte(byte);
        prop_assert_eq!(checked.nibble, decode_nibble(byte));
        if checked.status == Status::Clean {
            prop_assert_eq!(encode(&[checked.nibble.value()])[1], byte);
        }
    }

    #[test]
    fn prop_scan_recovers_clean_packets(
        segments in proptest::collection::vec(proptest::collection::vec(any::<u8>(), 12), 1..20),
    ) {
        let layout = PacketLayout::default();
        let plain: Vec<u8> = segments
            .iter()
            .flat_map(|s| build_packet(layout, s).unwrap())
            .collect();

        let (recovered, _) = scan(layout, &encode(&plain)).unwrap();
        prop_assert_eq!(recovered, segments);
    }
}
