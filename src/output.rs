//! Output file for one logging session
//!
//! Files are named `serial_data_<YYYYMMDD_HHMMSS>.txt` after the local time
//! they were created and hold one received line per `\n`-terminated line.

use crate::error::{LoggerError, Result};
use chrono::{DateTime, Local};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub const FILE_PREFIX: &str = "serial_data_";
pub const FILE_EXTENSION: &str = "txt";
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// File name for a session started at `at`
pub fn file_name(at: &DateTime<Local>) -> String {
    format!("{}{}.{}", FILE_PREFIX, at.format(TIMESTAMP_FORMAT), FILE_EXTENSION)
}

pub struct OutputFile {
    path: PathBuf,
    writer: BufWriter<File>,
    lines: usize,
}

impl OutputFile {
    /// Create the session file in `dir`. Fails if a file with the same name
    /// already exists rather than overwriting it.
    pub fn create(dir: &Path, at: &DateTime<Local>) -> Result<Self> {
        let path = dir.join(file_name(at));
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|source| LoggerError::Output {
                path: path.clone(),
                source,
            })?;

        log::info!("writing to {}", path.display());

        Ok(Self {
            path,
            writer: BufWriter::new(file),
            lines: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Lines written so far
    pub fn lines(&self) -> usize {
        self.lines
    }

    /// Append `line` and a newline, flushing so an abrupt stop never leaves
    /// a partial line behind.
    pub fn write_line(&mut self, line: &str) -> Result<()> {
        writeln!(self.writer, "{}", line)
            .and_then(|_| self.writer.flush())
            .map_err(|source| LoggerError::Output {
                path: self.path.clone(),
                source,
            })?;
        self.lines += 1;
        Ok(())
    }

    /// Flush and close the file, returning its path
    pub fn finish(mut self) -> Result<PathBuf> {
        self.writer.flush().map_err(|source| LoggerError::Output {
            path: self.path.clone(),
            source,
        })?;
        Ok(self.path)
    }
}
