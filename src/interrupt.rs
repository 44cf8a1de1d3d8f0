//! Ctrl+C handling
//!
//! The first SIGINT (or SIGTERM on Unix) only raises a flag that the read
//! loop polls between reads. A second one, arriving while the flag is still
//! set, exits the process at once with [`FORCED_EXIT_CODE`].

use crate::error::{LoggerError, Result};
use signal_hook::consts::SIGINT;
use signal_hook::flag;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// Exit code used when a second interrupt arrives before cleanup finished
pub const FORCED_EXIT_CODE: i32 = 130;

/// Install the handlers and return the flag they set
pub fn install() -> Result<Arc<AtomicBool>> {
    let cancel = Arc::new(AtomicBool::new(false));
    register(SIGINT, &cancel)?;
    #[cfg(unix)]
    register(signal_hook::consts::SIGTERM, &cancel)?;
    Ok(cancel)
}

fn register(signal: i32, cancel: &Arc<AtomicBool>) -> Result<()> {
    // Order matters: the shutdown hook must see the flag before it is set.
    flag::register_conditional_shutdown(signal, FORCED_EXIT_CODE, Arc::clone(cancel))
        .map_err(LoggerError::Signal)?;
    flag::register(signal, Arc::clone(cancel)).map_err(LoggerError::Signal)?;
    Ok(())
}
