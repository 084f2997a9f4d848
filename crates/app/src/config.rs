//! Configuration for the hamming-sim application.
//!
//! Command-line arguments are parsed with clap and validated into a
//! [`Config`] before anything runs. Defaults reproduce the reference
//! scenario: seed 0, 2000 packets of 12 data bytes, 1% bit errors and
//! 1% byte drops.

use clap::Parser;
use hamming_sim_core::channel::ChannelConfig;
use hamming_sim_core::packet::{PacketLayout, DEFAULT_SEGMENT_LEN};
use hamming_sim_core::{Error, Result};
use std::path::PathBuf;

/// Push random packets through a noisy byte channel protected by Hamming(8,4)
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Random seed for data generation and channel noise
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Number of packets to generate
    #[arg(long, default_value_t = 2000)]
    pub packets: usize,

    /// Data bytes per packet
    #[arg(long, default_value_t = DEFAULT_SEGMENT_LEN)]
    pub segment_len: usize,

    /// Probability of flipping each transmitted bit
    #[arg(long, default_value_t = 0.01)]
    pub bit_error_rate: f64,

    /// Probability of dropping each transmitted byte
    #[arg(long, default_value_t = 0.01)]
    pub byte_drop_rate: f64,

    /// Write raw stream dumps into this directory
    #[arg(long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Print resolved configuration
    #[arg(long)]
    pub print_config: bool,

    /// Don't print metrics summary
    #[arg(long)]
    pub no_metrics: bool,
}

/// Complete configuration for a simulation run.
#[derive(Debug, Clone)]
pub struct Config {
    // === Data ===
    /// Number of packets to generate
    pub packet_count: usize,

    /// Packet sizes
    pub layout: PacketLayout,

    // === Channel ===
    /// Channel simulation config (also carries the seed)
    pub channel: ChannelConfig,

    // === Output ===
    /// Directory for artifact dumps (None = don't write)
    pub out_dir: Option<PathBuf>,

    /// Whether to print detailed config
    pub print_config: bool,

    /// Whether to print detailed metrics summary
    pub print_metrics: bool,
}

impl Config {
    /// Validate parsed arguments into a configuration.
    ///
    /// # Errors
    /// - `Error::Config` if `packets` is zero
    /// - `PacketError::InvalidSegmentLength` if `segment_len` is zero
    /// - `ChannelError::InvalidProbability` if a rate is outside [0, 1]
    pub fn from_args(args: Args) -> Result<Self> {
        if args.packets == 0 {
            return Err(Error::Config("--packets must be at least 1".to_string()));
        }

        let layout = PacketLayout::new(args.segment_len)?;

        let channel = ChannelConfig {
            bit_error_rate: args.bit_error_rate,
            byte_drop_rate: args.byte_drop_rate,
            seed: args.seed,
        };
        channel.validate()?;

        Ok(Self {
            packet_count: args.packets,
            layout,
            channel,
            out_dir: args.out_dir,
            print_config: args.print_config,
            print_metrics: !args.no_metrics,
        })
    }

    /// Seed for data generation and the channel. The channel draws from its
    /// own ChaCha stream, so the two stay independent.
    pub fn seed(&self) -> u64 {
        self.channel.seed
    }

    /// Print the configuration in human-readable form.
    pub fn print(&self) {
        println!("=== Configuration ===");
        println!("Seed: {}", self.seed());
        println!(
            "Packets: {} x {} bytes ({} data bytes each)",
            self.packet_count,
            self.layout.packet_len(),
            self.layout.segment_len()
        );
        println!(
            "Output dir: {}",
            self.out_dir
                .as_ref()
                .map_or_else(|| "(none)".to_string(), |p| p.display().to_string())
        );
        println!();
        println!("=== Channel ===");
        println!("Bit error rate: {:.3}%", self.channel.bit_error_rate * 100.0);
        println!("Byte drop rate: {:.3}%", self.channel.byte_drop_rate * 100.0);
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hamming_sim_core::error::{ChannelError, PacketError};

    fn parse(args: &[&str]) -> Result<Config> {
        let args = Args::try_parse_from(std::iter::once("hamming-sim").chain(args.iter().copied()))
            .map_err(|e| Error::Config(e.to_string()))?;
        Config::from_args(args)
    }

    #[test]
    fn test_defaults() {
        let config = parse(&[]).unwrap();

        assert_eq!(config.seed(), 0);
        assert_eq!(config.packet_count, 2000);
        assert_eq!(config.layout.segment_len(), 12);
        assert_eq!(config.channel.bit_error_rate, 0.01);
        assert_eq!(config.channel.byte_drop_rate, 0.01);
        assert!(config.out_dir.is_none());
        assert!(config.print_metrics);
        assert!(!config.print_config);
    }

    #[test]
    fn test_overrides() {
        let config = parse(&[
            "--seed",
            "42",
            "--packets",
            "10",
            "--segment-len",
            "4",
            "--bit-error-rate",
            "0",
            "--out-dir",
            "/tmp/dumps",
            "--no-metrics",
        ])
        .unwrap();

        assert_eq!(config.seed(), 42);
        assert_eq!(config.packet_count, 10);
        assert_eq!(config.layout.packet_len(), 7);
        assert_eq!(config.channel.bit_error_rate, 0.0);
        assert_eq!(config.out_dir, Some(PathBuf::from("/tmp/dumps")));
        assert!(!config.print_metrics);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(parse(&["--packets", "0"]), Err(Error::Config(_))));
        assert!(matches!(
            parse(&["--segment-len", "0"]),
            Err(Error::Packet(PacketError::InvalidSegmentLength(0)))
        ));
        assert!(matches!(
            parse(&["--byte-drop-rate", "2"]),
            Err(Error::Channel(ChannelError::InvalidProbability { .. }))
        ));
        assert!(parse(&["--unknown"]).is_err());
    }
}
