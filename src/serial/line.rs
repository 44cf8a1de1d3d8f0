//! Newline framing over a byte stream with a read timeout
//!
//! A line ends at `\n`. If the device stays quiet for a whole read timeout
//! the bytes gathered so far are returned as the line, which is the empty
//! string when nothing arrived at all. A read that reports data but returns
//! none means the device went away.

use crate::config::DecodePolicy;
use crate::error::{LoggerError, Result};
use std::io::{ErrorKind, Read};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub struct LineReader<R> {
    inner: R,
    cancel: Arc<AtomicBool>,
    decode: DecodePolicy,
    timeouts: u64,
}

impl<R: Read> LineReader<R> {
    /// `cancel` is polled before every read; once set, [`read_line`](Self::read_line)
    /// returns [`LoggerError::UserCancelled`].
    pub fn new(inner: R, cancel: Arc<AtomicBool>) -> Self {
        Self {
            inner,
            cancel,
            decode: DecodePolicy::default(),
            timeouts: 0,
        }
    }

    pub fn with_decode_policy(mut self, decode: DecodePolicy) -> Self {
        self.decode = decode;
        self
    }

    /// Number of reads that ended because the timeout expired
    pub fn timeouts(&self) -> u64 {
        self.timeouts
    }

    /// Read the next line, without its trailing `\n`.
    ///
    /// Bytes of a line that was still incomplete when the cancel flag was
    /// raised are discarded.
    pub fn read_line(&mut self) -> Result<String> {
        let mut buffer = Vec::new();
        let mut byte = [0u8; 1];

        loop {
            if self.cancel.load(Ordering::SeqCst) {
                if !buffer.is_empty() {
                    log::debug!("dropping {} bytes of an unterminated line", buffer.len());
                }
                return Err(LoggerError::UserCancelled);
            }

            match self.inner.read(&mut byte) {
                Ok(0) => {
                    return Err(LoggerError::ConnectionLost(ErrorKind::UnexpectedEof.into()));
                }
                Ok(_) => {
                    if byte[0] == b'\n' {
                        break;
                    }
                    buffer.push(byte[0]);
                }
                Err(ref e) if e.kind() == ErrorKind::TimedOut => {
                    self.timeouts += 1;
                    log::trace!("read timed out with {} bytes pending", buffer.len());
                    break;
                }
                Err(ref e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(LoggerError::ConnectionLost(e)),
            }
        }

        self.decode_line(buffer)
    }

    fn decode_line(&self, buffer: Vec<u8>) -> Result<String> {
        match self.decode {
            DecodePolicy::Strict => Ok(String::from_utf8(buffer)?),
            DecodePolicy::Lossy => match String::from_utf8(buffer) {
                Ok(line) => Ok(line),
                Err(e) => {
                    log::warn!("replacing invalid UTF-8 in received line");
                    Ok(String::from_utf8_lossy(e.as_bytes()).into_owned())
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{Script, Step};

    fn reader(steps: Vec<Step>) -> LineReader<Script> {
        let cancel = Arc::new(AtomicBool::new(false));
        LineReader::new(Script::new(steps, Arc::clone(&cancel)), cancel)
    }

    #[test]
    fn test_lines_keep_carriage_return() {
        let mut lines = reader(vec![Step::bytes("HELLO\r\nWORLD\r\n")]);
        assert_eq!(lines.read_line().unwrap(), "HELLO\r");
        assert_eq!(lines.read_line().unwrap(), "WORLD\r");
        assert!(lines.read_line().unwrap_err().is_cancelled());
    }

    #[test]
    fn test_line_split_across_reads() {
        let mut lines = reader(vec![Step::bytes("ab"), Step::bytes("c"), Step::bytes("d\n")]);
        assert_eq!(lines.read_line().unwrap(), "abcd");
    }

    #[test]
    fn test_quiet_timeout_yields_empty_line() {
        let mut lines = reader(vec![Step::Timeout, Step::bytes("next\n")]);
        assert_eq!(lines.read_line().unwrap(), "");
        assert_eq!(lines.read_line().unwrap(), "next");
        assert_eq!(lines.timeouts(), 1);
    }

    #[test]
    fn test_timeout_flushes_partial_line() {
        let mut lines = reader(vec![Step::bytes("partial"), Step::Timeout, Step::bytes("rest\n")]);
        assert_eq!(lines.read_line().unwrap(), "partial");
        assert_eq!(lines.read_line().unwrap(), "rest");
    }

    #[test]
    fn test_interrupted_read_is_retried() {
        let mut lines = reader(vec![Step::bytes("AB"), Step::Interrupted, Step::bytes("C\n")]);
        assert_eq!(lines.read_line().unwrap(), "ABC");
    }

    #[test]
    fn test_cancel_discards_unterminated_line() {
        let mut lines = reader(vec![Step::bytes("done\nhalf"), Step::Cancel, Step::bytes("-line\n")]);
        assert_eq!(lines.read_line().unwrap(), "done");
        assert!(lines.read_line().unwrap_err().is_cancelled());
    }

    #[test]
    fn test_disconnect_is_connection_lost() {
        let mut lines = reader(vec![Step::bytes("x"), Step::Fail(ErrorKind::BrokenPipe)]);
        match lines.read_line() {
            Err(LoggerError::ConnectionLost(e)) => assert_eq!(e.kind(), ErrorKind::BrokenPipe),
            other => panic!("expected ConnectionLost, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_read_is_connection_lost() {
        let mut lines = reader(vec![Step::Bytes(Vec::new()), Step::bytes("never\n")]);
        match lines.read_line() {
            Err(LoggerError::ConnectionLost(e)) => assert_eq!(e.kind(), ErrorKind::UnexpectedEof),
            other => panic!("expected ConnectionLost, got {other:?}"),
        }
        assert_eq!(lines.timeouts(), 0);
    }

    #[test]
    fn test_empty_read_mid_line_is_connection_lost() {
        let mut lines = reader(vec![Step::bytes("ok\npart"), Step::Bytes(Vec::new())]);
        assert_eq!(lines.read_line().unwrap(), "ok");
        assert!(matches!(lines.read_line(), Err(LoggerError::ConnectionLost(_))));
    }

    #[test]
    fn test_strict_decode_rejects_invalid_utf8() {
        let mut lines = reader(vec![Step::Bytes(vec![b'o', b'k', 0xff, b'\n'])]);
        assert!(matches!(lines.read_line(), Err(LoggerError::Decode(_))));
    }

    #[test]
    fn test_lossy_decode_replaces_invalid_utf8() {
        let mut lines = reader(vec![Step::Bytes(vec![b'o', b'k', 0xff, b'\n'])])
            .with_decode_policy(DecodePolicy::Lossy);
        assert_eq!(lines.read_line().unwrap(), "ok\u{FFFD}");
    }
}
