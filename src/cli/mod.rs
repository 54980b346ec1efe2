//! CLI Module
//!
//! Command-line interface for the Triband equalizer.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Triband - three-band WAV equalizer
#[derive(Parser, Debug)]
#[command(name = "triband")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Equalize a WAV file and write a 16-bit mono WAV
    #[command(name = "process")]
    Process {
        /// Input WAV file
        input: PathBuf,

        /// Output WAV file
        #[arg(short, long)]
        output: PathBuf,

        /// Bass gain in dB (60-250 Hz by default)
        #[arg(long, allow_hyphen_values = true)]
        low: Option<f64>,

        /// Mid gain in dB (250-4000 Hz by default)
        #[arg(long, allow_hyphen_values = true)]
        mid: Option<f64>,

        /// Treble gain in dB (4000-12000 Hz by default)
        #[arg(long, allow_hyphen_values = true)]
        high: Option<f64>,

        /// Built-in gain preset (flat, bass-boost, vocal, treble-boost)
        #[arg(short, long)]
        preset: Option<String>,

        /// JSON config with band layout and gains
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Print level, spectrum and band energy of a WAV file
    #[command(name = "analyze")]
    Analyze {
        /// Input WAV file
        input: PathBuf,

        /// JSON config whose band layout is used for the energy split
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Print the band layout in use
    #[command(name = "bands")]
    Bands {
        /// JSON config to read the layout from
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Write a default JSON config
    #[command(name = "init-config")]
    InitConfig {
        /// Destination path
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_process_with_negative_gain() {
        let cli = Cli::try_parse_from([
            "triband", "process", "in.wav", "-o", "out.wav", "--low", "-6", "--mid", "3.5",
        ])
        .unwrap();
        match cli.command {
            Commands::Process {
                low, mid, high, ..
            } => {
                assert_eq!(low, Some(-6.0));
                assert_eq!(mid, Some(3.5));
                assert_eq!(high, None);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_verbose_is_global() {
        let cli = Cli::try_parse_from(["triband", "bands", "--verbose"]).unwrap();
        assert!(cli.verbose);
    }

    #[test]
    fn test_output_required() {
        assert!(Cli::try_parse_from(["triband", "process", "in.wav"]).is_err());
    }
}
