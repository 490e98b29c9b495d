//! Console rendering of import progress messages.

use std::{
    cell::RefCell,
    io::{self, Write},
};

use zipfinder_data::{ImportSink, Severity};

use crate::CliError;

/// Writes import messages to a terminal-like stream.
///
/// Success, warning and error messages carry a bracketed prefix; info lines are
/// written plain. The first write failure is kept and reported by
/// [`ConsoleSink::finish`].
pub(crate) struct ConsoleSink<W: Write> {
    out: RefCell<W>,
    failure: RefCell<Option<io::Error>>,
}

impl<W: Write> ConsoleSink<W> {
    pub(crate) fn new(out: W) -> Self {
        Self {
            out: RefCell::new(out),
            failure: RefCell::new(None),
        }
    }

    /// Flush the stream and surface any write error seen while emitting.
    pub(crate) fn finish(self) -> Result<W, CliError> {
        if let Some(err) = self.failure.into_inner() {
            return Err(CliError::WriteOutput(err));
        }
        let mut out = self.out.into_inner();
        out.flush().map_err(CliError::WriteOutput)?;
        Ok(out)
    }
}

pub(crate) const fn prefix(severity: Severity) -> &'static str {
    match severity {
        Severity::Info => "",
        Severity::Success => "[OK] ",
        Severity::Warning => "[WARNING] ",
        Severity::Error => "[ERROR] ",
    }
}

impl<W: Write> ImportSink for ConsoleSink<W> {
    fn emit(&self, message: &str, severity: Severity) {
        if self.failure.borrow().is_some() {
            return;
        }
        let written = writeln!(self.out.borrow_mut(), "{}{message}", prefix(severity));
        if let Err(err) = written {
            self.failure.replace(Some(err));
        }
    }
}
