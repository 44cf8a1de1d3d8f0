//! Session configuration
//!
//! Nothing here is exposed on the command line except the port path; the
//! values are still passed explicitly so the session never reads globals.

use crate::serial::PortConfig;
use std::path::PathBuf;

/// How to treat a line that is not valid UTF-8
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodePolicy {
    /// Fail the session with [`crate::error::LoggerError::Decode`]
    #[default]
    Strict,
    /// Replace invalid sequences with U+FFFD and keep going
    Lossy,
}

#[derive(Debug, Clone)]
pub struct LoggerConfig {
    /// Serial port settings (path, baud rate, framing, read timeout)
    pub port: PortConfig,
    /// Directory the output file is created in
    pub output_dir: PathBuf,
    pub decode: DecodePolicy,
}

impl LoggerConfig {
    /// Log from `port` into the current directory with strict decoding
    pub fn new(port: PortConfig) -> Self {
        Self {
            port,
            output_dir: PathBuf::from("."),
            decode: DecodePolicy::default(),
        }
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn with_decode_policy(mut self, decode: DecodePolicy) -> Self {
        self.decode = decode;
        self
    }
}
