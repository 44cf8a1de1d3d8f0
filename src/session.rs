//! The logging session: one serial connection, one output file
//!
//! Each received line is trimmed, echoed to the console and appended to the
//! session file, in that order. The loop only ends through the cancel flag
//! (clean stop) or a fatal error.

use crate::config::LoggerConfig;
use crate::error::{LoggerError, Result};
use crate::output::OutputFile;
use crate::serial::{LineReader, SerialConnection};
use chrono::{DateTime, Local};
use colored::Colorize;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// Log a progress line at debug level every this many captured lines
const PROGRESS_INTERVAL: usize = 1000;

/// What a cleanly stopped session produced
#[derive(Debug, Clone)]
pub struct SessionSummary {
    pub path: PathBuf,
    pub lines: usize,
    pub started: DateTime<Local>,
    /// Reads that expired without a newline
    pub timeouts: u64,
}

pub struct Session<R> {
    reader: LineReader<R>,
    output: OutputFile,
    started: DateTime<Local>,
}

impl<R: Read> Session<R> {
    /// Open the session file in `output_dir`, named after the current time
    pub fn start(reader: LineReader<R>, output_dir: &Path) -> Result<Self> {
        let started = Local::now();
        let output = OutputFile::create(output_dir, &started)?;
        Ok(Self {
            reader,
            output,
            started,
        })
    }

    pub fn output_path(&self) -> &Path {
        self.output.path()
    }

    /// Read lines until cancelled. Returns `Ok` only for a user stop; the
    /// file is flushed and closed on every exit path.
    pub fn run<W: Write>(mut self, console: &mut W) -> Result<SessionSummary> {
        loop {
            let line = match self.reader.read_line() {
                Ok(line) => line,
                Err(e) if e.is_cancelled() => break,
                Err(e) => {
                    log::error!(
                        "session aborted after {} lines: {}",
                        self.output.lines(),
                        e
                    );
                    return Err(e);
                }
            };
            let line = line.trim();

            writeln!(console, "{}", line).map_err(LoggerError::Console)?;
            self.output.write_line(line)?;

            if self.output.lines() % PROGRESS_INTERVAL == 0 {
                log::debug!(
                    "{} lines captured ({} read timeouts)",
                    self.output.lines(),
                    self.reader.timeouts()
                );
            }
        }

        let lines = self.output.lines();
        let timeouts = self.reader.timeouts();
        let path = self.output.finish()?;

        log::info!("stopped after {} lines ({} read timeouts)", lines, timeouts);

        Ok(SessionSummary {
            path,
            lines,
            started: self.started,
            timeouts,
        })
    }
}

/// Log `config.port` to a new file in `config.output_dir` until `cancel` is set
pub fn run(config: &LoggerConfig, cancel: Arc<AtomicBool>) -> Result<SessionSummary> {
    let connection = SerialConnection::open(config.port.clone())?;

    eprintln!(
        "{} Connected to {} at {} baud",
        "[OK]".green().bold(),
        connection.config().port_path.white().bold(),
        connection.config().baud_rate
    );

    let reader = LineReader::new(connection, cancel).with_decode_policy(config.decode);
    let session = Session::start(reader, &config.output_dir)?;

    eprintln!(
        "{} Logging to: {}",
        "[LOG]".cyan().bold(),
        session.output_path().display().to_string().white()
    );
    eprintln!("{}", "Press Ctrl+C to stop\n".yellow());

    let stdout = io::stdout();
    let mut console = stdout.lock();
    session.run(&mut console)
}
