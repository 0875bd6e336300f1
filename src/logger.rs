use log::Level;
use std::{
    fmt::{self, Debug, Formatter},
    io::{self, Write},
    sync::{Arc, Mutex},
};

/// Reference-counted logging handle passed through a pipeline to its stages.
///
/// The handle carries a severity threshold and an output sink.  The pipeline
/// itself never logs through it; it only hands a clone to every stage, which
/// may use [`log`](Self::log) for stage-level diagnostics or ignore the
/// handle entirely.  [`disabled`](Self::disabled) is the do-nothing default.
///
/// Sink failures are swallowed: logging must never fail the data plane.
#[derive(Clone)]
pub struct LoggerHandle(Arc<LoggerInner>);

struct LoggerInner {
    // `None` disables the handle outright.
    level: Option<Level>,
    sink: Mutex<Box<dyn Write + Send>>,
}

impl LoggerHandle {
    /// Creates a handle that writes messages at `level` and above (more
    /// severe) to `sink`.
    pub fn new(level: Level, sink: Box<dyn Write + Send>) -> Self {
        Self(Arc::new(LoggerInner {
            level: Some(level),
            sink: Mutex::new(sink),
        }))
    }

    /// A handle that drops every message.
    pub fn disabled() -> Self {
        Self(Arc::new(LoggerInner {
            level: None,
            sink: Mutex::new(Box::new(io::sink())),
        }))
    }

    /// The threshold this handle was created with, or `None` if disabled.
    pub fn level(&self) -> Option<Level> {
        self.0.level
    }

    /// Whether a message at `level` would be written.
    pub fn enabled(&self, level: Level) -> bool {
        // `log::Level` orders Error lowest, so "at least as severe as the
        // threshold" is `level <= max`.
        self.0.level.is_some_and(|max| level <= max)
    }

    /// Writes `message` to the sink if `level` passes the threshold.
    pub fn log(&self, level: Level, message: &str) {
        if !self.enabled(level) {
            return;
        }
        let mut sink = self.0.sink.lock().unwrap();
        let _ = writeln!(sink, "{level:<5} {message}");
    }
}

impl Default for LoggerHandle {
    fn default() -> Self {
        Self::disabled()
    }
}

impl Debug for LoggerHandle {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggerHandle")
            .field("level", &self.0.level)
            .finish_non_exhaustive()
    }
}
