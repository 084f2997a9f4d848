//! hamming-sim: generate packets, Hamming encode them, corrupt the stream
//! and see what the decoder gets back.

mod config;
mod input_gen;

use anyhow::Context;
use clap::Parser;
use config::{Args, Config};
use hamming_sim_core::{
    buffer::Buffer,
    channel::ChannelSimulator,
    hamming::{decode_buffer, encode_buffer},
    metrics::Metrics,
    packet::PacketScanner,
};
use std::collections::HashSet;
use std::path::Path;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{}=info", env!("CARGO_CRATE_NAME")).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_args(Args::parse()).context("invalid configuration")?;

    if config.print_config {
        config.print();
    }

    let metrics = run(&config)?;

    if config.print_metrics {
        metrics.print_summary();
    }

    Ok(())
}

fn run(config: &Config) -> anyhow::Result<Metrics> {
    let mut metrics = Metrics::new();
    let layout = config.layout;

    let segments = input_gen::generate_segments(config.seed(), layout, config.packet_count);
    let original = Buffer::from_bytes(input_gen::packet_stream(layout, &segments)?);
    metrics.packets_sent = segments.len() as u64;
    metrics.data_bytes = original.len() as u64;
    tracing::info!(
        packets = segments.len(),
        bytes = original.len(),
        "generated packet stream"
    );

    let mut encoded = Buffer::for_encoding(&original);
    encode_buffer(&original, &mut encoded).context("encoding failed")?;
    metrics.encoded_bytes = encoded.len() as u64;

    let mut channel = ChannelSimulator::new(config.channel)?;
    let bit_error = Buffer::from_bytes(channel.flip_bits(encoded.as_slice()));
    let byte_drop = channel.drop_bytes(bit_error.as_slice());
    metrics.record_channel(&channel.stats());
    tracing::info!(
        bits_flipped = channel.stats().bits_flipped,
        bytes_dropped = channel.stats().bytes_dropped,
        "stream corrupted"
    );

    // Bit errors only: every byte is still at its original index
    let mut decoded = Buffer::for_decoding(&bit_error);
    let report = decode_buffer(&bit_error, &mut decoded).context("decoding failed")?;
    metrics.record_decode(&report, original.as_slice(), decoded.as_slice());
    tracing::info!(
        corrected = report.corrected,
        double_errors = report.double_errors,
        residual = metrics.residual_byte_errors,
        "aligned decode finished"
    );

    // Bit errors and drops: recover packets by scanning for sync
    let mut scanner = PacketScanner::new(layout);
    let recovered = scanner.push_all(&byte_drop)?;
    let scan_report = scanner.finish();
    metrics.record_scan(&scan_report);

    let sent: HashSet<&[u8]> = segments.iter().map(Vec::as_slice).collect();
    metrics.packets_miscorrected = recovered
        .iter()
        .filter(|segment| !sent.contains(segment.as_slice()))
        .count() as u64;
    if metrics.packets_miscorrected > 0 {
        tracing::warn!(
            count = metrics.packets_miscorrected,
            "recovered packets passed the checksum but differ from every sent packet"
        );
    }
    tracing::info!(
        recovered = scan_report.packets_recovered,
        sent = metrics.packets_sent,
        checksum_failures = scan_report.checksum_failures,
        "packet scan finished"
    );

    if let Some(dir) = &config.out_dir {
        let recovered_bytes: Vec<u8> = recovered.concat();
        write_artifacts(
            dir,
            &[
                ("original.bin", original.as_slice()),
                ("encoded.bin", encoded.as_slice()),
                ("bit_error.bin", bit_error.as_slice()),
                ("byte_drop.bin", byte_drop.as_slice()),
                ("decoded.bin", decoded.as_slice()),
                ("recovered.bin", recovered_bytes.as_slice()),
            ],
        )?;
    }

    metrics.complete();
    Ok(metrics)
}

fn write_artifacts(dir: &Path, artifacts: &[(&str, &[u8])]) -> anyhow::Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create {}", dir.display()))?;

    for (name, bytes) in artifacts {
        let path = dir.join(name);
        input_gen::write_dump(&path, bytes)
            .with_context(|| format!("failed to write {}", path.display()))?;
        tracing::debug!(path = %path.display(), bytes = bytes.len(), "wrote artifact");
    }

    tracing::info!(dir = %dir.display(), count = artifacts.len(), "artifacts written");
    Ok(())
}
