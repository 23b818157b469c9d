//! nasfw binary entry point.
//!
//! A thin wrapper around nasfw-formats that:
//! 1. Parses command-line arguments
//! 2. Initializes logging
//! 3. Reads the firmware file and dispatches to a subcommand
//!
//! All format logic lives in the nasfw-formats crate.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "nasfw",
    about = "Inspect, extract and repack BRCM NAS firmware files",
    version,
    long_about = "Decodes the BRCM section container used by CFE based NAS devices and the TRX images in its FLASH and DISK sections, extracts the kernel and cramfs images, and rebuilds a valid firmware file from modified images."
)]
struct Cli {
    /// Set the logging level (overridden by RUST_LOG)
    #[arg(short, long, value_enum, global = true, default_value = "info")]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    const fn as_filter(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Show the section table, TRX headers and inferred partition lengths
    Info {
        /// Firmware file
        input: PathBuf,
    },

    /// Write the kernel and filesystem images to files
    Extract {
        /// Firmware file
        input: PathBuf,

        /// Directory for the extracted files
        #[arg(short, long, env = "NASFW_OUTPUT_DIR", default_value = ".")]
        output_dir: PathBuf,

        /// Fail when a stored CRC32 does not match the partitions
        #[arg(long)]
        verify_crc: bool,
    },

    /// Replace partitions and write a new firmware file
    Repack {
        /// Original firmware file
        input: PathBuf,

        /// Path of the new firmware file
        #[arg(short, long)]
        output: PathBuf,

        /// Replacement kernel image (FLASH slot 0)
        #[arg(long)]
        kernel: Option<PathBuf>,

        /// Replacement boot filesystem image (FLASH slot 1)
        #[arg(long)]
        primary_fs: Option<PathBuf>,

        /// Replacement main filesystem image (DISK slot 0)
        #[arg(long)]
        secondary_fs: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(cli.log_level.as_filter())),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Info { input } => commands::info::handle(&input),
        Commands::Extract {
            input,
            output_dir,
            verify_crc,
        } => commands::extract::handle(&input, &output_dir, verify_crc),
        Commands::Repack {
            input,
            output,
            kernel,
            primary_fs,
            secondary_fs,
        } => commands::repack::handle(
            &input,
            &output,
            &commands::repack::ReplacementPaths {
                kernel,
                primary_fs,
                secondary_fs,
            },
        ),
    }
}
