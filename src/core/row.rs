//! Document rows
//!
//! A row stores one line of the file without its terminator, together with
//! a derived render form in which each tab is expanded to spaces up to the
//! next tab stop. The render form is a pure function of the content and the
//! tab stop; it is recomputed eagerly on every content change so it can
//! never go stale.

/// One line of the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// Raw line content, no trailing newline
    content: Vec<u8>,
    /// Tab-expanded form used for display
    rendered: Vec<u8>,
}

impl Row {
    pub fn new(content: Vec<u8>, tab_stop: usize) -> Self {
        let rendered = expand_tabs(&content, tab_stop);
        Self { content, rendered }
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    pub fn rendered(&self) -> &[u8] {
        &self.rendered
    }

    /// Length of the raw content in bytes
    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Replace the content, recomputing the render form
    pub fn set_content(&mut self, content: Vec<u8>, tab_stop: usize) {
        self.rendered = expand_tabs(&content, tab_stop);
        self.content = content;
    }

    /// Map a content column to its render column
    ///
    /// Walks the raw content up to `cx`, counting one render column per
    /// ordinary byte and advancing to the next tab-stop multiple for each
    /// tab. Must agree exactly with [`expand_tabs`] or the cursor desyncs
    /// from the displayed text.
    pub fn render_col(&self, cx: usize, tab_stop: usize) -> usize {
        let mut rx = 0;
        for &byte in self.content.iter().take(cx) {
            if byte == b'\t' {
                rx += tab_stop - (rx % tab_stop);
            } else {
                rx += 1;
            }
        }
        rx
    }
}

/// Expand tabs to spaces up to the next multiple of `tab_stop`
fn expand_tabs(content: &[u8], tab_stop: usize) -> Vec<u8> {
    let mut rendered = Vec::with_capacity(content.len());
    for &byte in content {
        if byte == b'\t' {
            rendered.push(b' ');
            while rendered.len() % tab_stop != 0 {
                rendered.push(b' ');
            }
        } else {
            rendered.push(byte);
        }
    }
    rendered
}
