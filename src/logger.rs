//! Error reporting sink.

use std::fmt;

/// Receives errors that the client absorbs instead of returning: failed
/// refreshes and exhausted proxy selection.
pub trait Logger: Send + Sync {
    fn error(&self, err: &dyn fmt::Display);
}

/// Default sink, prints every error on its own line to standard output.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutLogger;

impl StdoutLogger {
    pub fn new() -> Self {
        Self
    }
}

impl Logger for StdoutLogger {
    fn error(&self, err: &dyn fmt::Display) {
        println!("{}", err);
    }
}
