//! The document: an ordered sequence of rows
//!
//! Rows are stored in file order with no gaps. Loading replaces the whole
//! row store; a failed load leaves the document empty and reports the error
//! to the caller, who decides whether that is fatal.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::row::Row;

/// The in-memory model of the file being edited
#[derive(Debug)]
pub struct Document {
    rows: Vec<Row>,
    filename: Option<PathBuf>,
    tab_stop: usize,
}

impl Document {
    /// Create an empty, unnamed document
    pub fn new(tab_stop: usize) -> Self {
        Self {
            rows: Vec::new(),
            filename: None,
            tab_stop,
        }
    }

    /// Read a file into the document, replacing all rows
    ///
    /// Lines are split on LF; a trailing CR per line is stripped so CRLF
    /// files load cleanly. Row contents carry no terminators. On error the
    /// document keeps its previous (empty) row store.
    pub fn open(&mut self, path: &Path) -> io::Result<()> {
        let bytes = fs::read(path)?;
        self.filename = Some(path.to_path_buf());
        self.load_lines(split_lines(&bytes));
        tracing::debug!("loaded {} rows from {}", self.rows.len(), path.display());
        Ok(())
    }

    /// Replace all rows with the given lines, in order
    pub fn load_lines<I>(&mut self, lines: I)
    where
        I: IntoIterator<Item = Vec<u8>>,
    {
        let tab_stop = self.tab_stop;
        self.rows = lines
            .into_iter()
            .map(|line| Row::new(line, tab_stop))
            .collect();
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Get a row by index
    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    /// Insert a row at `index`, shifting later rows down
    pub fn insert_row(&mut self, index: usize, content: Vec<u8>) {
        let index = index.min(self.rows.len());
        self.rows.insert(index, Row::new(content, self.tab_stop));
    }

    /// Replace the content of an existing row
    pub fn set_row(&mut self, index: usize, content: Vec<u8>) {
        if let Some(row) = self.rows.get_mut(index) {
            row.set_content(content, self.tab_stop);
        }
    }

    /// Remove a row, shifting later rows up
    pub fn remove_row(&mut self, index: usize) {
        if index < self.rows.len() {
            self.rows.remove(index);
        }
    }

    /// Iterate over raw row contents, for a collaborator that persists them
    pub fn lines(&self) -> impl Iterator<Item = &[u8]> {
        self.rows.iter().map(|row| row.content())
    }

    pub fn filename(&self) -> Option<&Path> {
        self.filename.as_deref()
    }

    pub fn tab_stop(&self) -> usize {
        self.tab_stop
    }
}

/// Split file bytes into lines on LF, stripping a trailing CR per line
///
/// A trailing newline does not produce an extra empty row, matching the
/// "one row per terminated line" reading of a text file.
fn split_lines(bytes: &[u8]) -> Vec<Vec<u8>> {
    let mut lines: Vec<Vec<u8>> = bytes
        .split(|&b| b == b'\n')
        .map(|line| line.strip_suffix(b"\r").unwrap_or(line).to_vec())
        .collect();
    if bytes.is_empty() || bytes.ends_with(b"\n") {
        lines.pop();
    }
    lines
}
