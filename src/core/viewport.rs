//! Viewport offsets
//!
//! Tracks the top-left visible cell in document/render coordinates and
//! keeps the cursor inside the visible window. Offsets jump directly to
//! the clamp value; there is no smooth scrolling.

/// Top-left visible cell of the viewport
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewport {
    /// First visible document row
    pub row_off: usize,
    /// First visible render column
    pub col_off: usize,
}

impl Viewport {
    /// Clamp the offsets so the cursor's render position is visible
    ///
    /// Four independent clamps, one per edge. Calling this again with the
    /// same arguments is a no-op (the offsets are a fixed point).
    pub fn scroll(&mut self, cy: usize, rx: usize, content_rows: usize, cols: usize) {
        if cy < self.row_off {
            self.row_off = cy;
        }
        if content_rows > 0 && cy >= self.row_off + content_rows {
            self.row_off = cy + 1 - content_rows;
        }
        if rx < self.col_off {
            self.col_off = rx;
        }
        if cols > 0 && rx >= self.col_off + cols {
            self.col_off = rx + 1 - cols;
        }
    }
}
