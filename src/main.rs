//! Serial Logger
//!
//! Reads newline-delimited text from a serial device, echoes every line to
//! stdout and saves it to `serial_data_<YYYYMMDD_HHMMSS>.txt` in the current
//! directory. One file per run; stop with Ctrl+C.
//!
//! # Usage
//!
//! ```bash
//! serial-logger /dev/ttyUSB0
//! serial-logger COM3
//!
//! # More diagnostics on stderr
//! serial-logger -v /dev/ttyACM0
//! ```

mod config;
mod error;
mod interrupt;
mod output;
mod serial;
mod session;
#[cfg(test)]
mod testutil;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;

use config::{DecodePolicy, LoggerConfig};
use serial::port::{PortConfig, DEFAULT_BAUD_RATE, DEFAULT_READ_TIMEOUT};

/// Read data from a serial port and save it to a file
#[derive(Parser, Debug)]
#[command(name = "serial-logger")]
#[command(author = "Prasanna Gautam")]
#[command(version = "0.1.0")]
#[command(about = "Read data from a serial port and save it to a file")]
struct Cli {
    /// The serial port to read data from (e.g., COM1 or /dev/ttyUSB0)
    serial_port: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let port = PortConfig::new(&cli.serial_port)
        .with_baud_rate(DEFAULT_BAUD_RATE)
        .with_timeout(DEFAULT_READ_TIMEOUT);
    let output_dir = std::env::current_dir().context("Failed to resolve working directory")?;
    let config = LoggerConfig::new(port)
        .with_output_dir(output_dir)
        .with_decode_policy(DecodePolicy::Strict);

    let cancel = interrupt::install()?;

    let summary = session::run(&config, cancel)
        .with_context(|| format!("Logging from {} failed", cli.serial_port))?;

    eprintln!(
        "\n{} {} lines saved to {}",
        "[OK]".green().bold(),
        summary.lines,
        summary.path.display().to_string().white()
    );
    log::debug!(
        "session started {} ended with {} read timeouts",
        summary.started.format("%Y-%m-%d %H:%M:%S"),
        summary.timeouts
    );

    Ok(())
}
