//! Progress reporting for import runs.

use std::fmt;

/// Severity attached to every import message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// Routine progress.
    Info,
    /// A step finished.
    Success,
    /// A skipped line or a rolled-back batch.
    Warning,
    /// The run failed.
    Error,
}

impl Severity {
    /// Lower-case label.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Receives human-readable progress messages from an import run.
///
/// Any `Fn(&str, Severity)` closure is a sink.
///
/// # Examples
/// ```
/// use std::cell::RefCell;
/// use zipfinder_data::{ImportSink, Severity};
///
/// let seen = RefCell::new(Vec::new());
/// let sink = |message: &str, severity: Severity| {
///     seen.borrow_mut().push(format!("{severity}: {message}"));
/// };
/// sink.emit("Importing districts", Severity::Info);
/// assert_eq!(seen.borrow().as_slice(), ["info: Importing districts"]);
/// ```
pub trait ImportSink {
    /// Handle one message.
    fn emit(&self, message: &str, severity: Severity);
}

impl<F> ImportSink for F
where
    F: Fn(&str, Severity),
{
    fn emit(&self, message: &str, severity: Severity) {
        self(message, severity);
    }
}

/// Forwards import messages to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl ImportSink for LogSink {
    fn emit(&self, message: &str, severity: Severity) {
        match severity {
            Severity::Info | Severity::Success => log::info!("{message}"),
            Severity::Warning => log::warn!("{message}"),
            Severity::Error => log::error!("{message}"),
        }
    }
}
