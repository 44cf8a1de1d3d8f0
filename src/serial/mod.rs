//! Serial input for the logger
//!
//! - `port`: opening the device with the configured baud rate and timeout
//! - `line`: splitting the byte stream into text lines

pub mod line;
pub mod port;

pub use line::LineReader;
pub use port::{PortConfig, SerialConnection};
