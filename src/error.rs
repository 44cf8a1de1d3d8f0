//! Error type for a logging session
//!
//! Every variant except [`LoggerError::UserCancelled`] is fatal and ends the
//! process with a non-zero exit code.

use std::io;
use std::path::PathBuf;
use std::string::FromUtf8Error;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoggerError {
    /// Device not found, busy, or permission denied when opening
    #[error("failed to open serial port {port}")]
    Open {
        port: String,
        #[source]
        source: serialport::Error,
    },

    /// The device went away or a read failed mid-session
    #[error("serial connection lost")]
    ConnectionLost(#[source] io::Error),

    /// Received bytes that are not valid UTF-8 (strict decoding only)
    #[error("received a line that is not valid UTF-8")]
    Decode(#[from] FromUtf8Error),

    #[error("failed to write output file {}", path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write to the console")]
    Console(#[source] io::Error),

    #[error("failed to install interrupt handler")]
    Signal(#[source] io::Error),

    /// Ctrl+C or SIGTERM was received; the session stops cleanly
    #[error("session cancelled by user")]
    UserCancelled,
}

impl LoggerError {
    /// Whether this error represents a requested stop rather than a failure
    pub fn is_cancelled(&self) -> bool {
        matches!(self, LoggerError::UserCancelled)
    }
}

pub type Result<T> = std::result::Result<T, LoggerError>;
