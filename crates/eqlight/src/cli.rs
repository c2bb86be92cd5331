//! Command-line argument parsing.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Per-cycle output on stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DumpFormat {
    /// No dump
    Off,
    /// Tab-separated byte levels, one line per cycle
    Tsv,
    /// One JSON snapshot per cycle
    Json,
}

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "eqlight")]
#[command(about = "Seven-band spectrum analyzer with auto gain and beat detection")]
pub struct Args {
    /// TOML configuration file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Stop after this many frames (0 runs forever)
    #[arg(long, value_name = "N", default_value = "0")]
    pub cycles: u64,

    /// Render frame period
    #[arg(long, value_name = "MS", default_value = "20")]
    pub frame_ms: u64,

    /// Dump every completed cycle to stdout
    #[arg(long, value_enum, default_value = "off")]
    pub dump: DumpFormat,

    /// Draw a terminal spectrum meter
    #[arg(long)]
    pub meter: bool,

    /// Override the configured log level
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Seed for the simulated signal
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    pub print_config: bool,
}
