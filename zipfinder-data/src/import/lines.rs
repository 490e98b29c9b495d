//! Streaming line reader over a source file.

use std::io::{BufRead, BufReader};

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::fs_utf8::File;

use super::ImportError;

/// Reads a source file one raw line at a time, reusing a single buffer.
pub(crate) struct SourceLines {
    reader: BufReader<File>,
    buffer: Vec<u8>,
    line_number: usize,
    path: Utf8PathBuf,
}

impl SourceLines {
    pub(crate) fn open(path: &Utf8Path) -> Result<Self, ImportError> {
        let file = zipfinder_fs::open_utf8_file(path).map_err(|source| ImportError::OpenSource {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            reader: BufReader::new(file),
            buffer: Vec::new(),
            line_number: 0,
            path: path.to_path_buf(),
        })
    }

    /// Next line without its terminator, or `None` at end of file.
    pub(crate) fn next_line(&mut self) -> Result<Option<&[u8]>, ImportError> {
        self.buffer.clear();
        let read = self
            .reader
            .read_until(b'\n', &mut self.buffer)
            .map_err(|source| ImportError::ReadSource {
                path: self.path.clone(),
                line: self.line_number + 1,
                source,
            })?;
        if read == 0 {
            return Ok(None);
        }
        self.line_number += 1;
        let line = self.buffer.strip_suffix(b"\n").unwrap_or(&self.buffer);
        Ok(Some(line.strip_suffix(b"\r").unwrap_or(line)))
    }

    /// One-based number of the line most recently returned.
    pub(crate) const fn line_number(&self) -> usize {
        self.line_number
    }

    pub(crate) fn path(&self) -> &Utf8Path {
        &self.path
    }
}
