//! Scripted stand-in for a serial port

use std::collections::VecDeque;
use std::io::{self, ErrorKind, Read};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub enum Step {
    /// Data the device sends; handed out across as many reads as needed
    Bytes(Vec<u8>),
    /// One read that expires without data
    Timeout,
    /// One read interrupted by a signal that did not ask to stop
    Interrupted,
    /// Ctrl+C arrives while the read is blocked
    Cancel,
    Fail(ErrorKind),
}

impl Step {
    pub fn bytes(s: &str) -> Self {
        Step::Bytes(s.as_bytes().to_vec())
    }
}

/// Plays back `steps`, then behaves as if the user pressed Ctrl+C.
pub struct Script {
    steps: VecDeque<Step>,
    cancel: Arc<AtomicBool>,
}

impl Script {
    pub fn new(steps: Vec<Step>, cancel: Arc<AtomicBool>) -> Self {
        Self {
            steps: steps.into(),
            cancel,
        }
    }
}

impl Read for Script {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let Some(step) = self.steps.front_mut() else {
            self.cancel.store(true, Ordering::SeqCst);
            return Err(ErrorKind::Interrupted.into());
        };

        match step {
            Step::Bytes(data) => {
                let n = buf.len().min(data.len());
                buf[..n].copy_from_slice(&data[..n]);
                data.drain(..n);
                if data.is_empty() {
                    self.steps.pop_front();
                }
                Ok(n)
            }
            Step::Timeout => {
                self.steps.pop_front();
                Err(ErrorKind::TimedOut.into())
            }
            Step::Interrupted => {
                self.steps.pop_front();
                Err(ErrorKind::Interrupted.into())
            }
            Step::Cancel => {
                self.steps.pop_front();
                self.cancel.store(true, Ordering::SeqCst);
                Err(ErrorKind::Interrupted.into())
            }
            Step::Fail(kind) => {
                let kind = *kind;
                self.steps.pop_front();
                Err(kind.into())
            }
        }
    }
}
