//! Cursor position
//!
//! `y` indexes document rows and may sit one past the last row; `x` indexes
//! the raw content of the current row and is clamped to its length by the
//! editor after every move. The render column is always derived from `x`
//! and the row contents, never stored.

/// Cursor position in document coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    /// Content column within row `y`
    pub x: usize,
    /// Document row, `0..=row_count`
    pub y: usize,
}

impl Cursor {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}
