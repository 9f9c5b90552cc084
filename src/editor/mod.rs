//! Editor controller
//!
//! Owns the document, cursor, viewport, and status message, and runs the
//! read-decode-mutate-render loop. The loop is single-threaded: the only
//! suspension point is the bounded-wait key read, so no locking is needed
//! anywhere in the model.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::core::{Cursor, Document, Viewport};
use crate::input::{ctrl, InputError, Key, KeyDecoder, TtyInput};
use crate::render;
use crate::term::{probe_window_size, window_size, RawMode, TermError, WindowSize};

/// The key that ends the session
const QUIT_KEY: Key = Key::Byte(ctrl(b'q'));

/// Error type for the editor session
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error("Terminal error: {0}")]
    Term(#[from] TermError),

    #[error("Input error: {0}")]
    Input(#[from] InputError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Result of processing one key event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Keep running the loop
    Continue,
    /// Restore the terminal and exit
    Quit,
}

/// A transient status message with a soft TTL
///
/// The TTL is evaluated lazily at render time; no timer is involved.
#[derive(Debug)]
pub struct StatusMessage {
    text: String,
    time: Instant,
}

impl StatusMessage {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            time: Instant::now(),
        }
    }

    /// The message text, or `None` once the TTL has elapsed
    pub fn text_if_fresh(&self, ttl: Duration) -> Option<&str> {
        (self.time.elapsed() < ttl).then_some(self.text.as_str())
    }
}

/// Editor state and key dispatch
pub struct Editor {
    doc: Document,
    cursor: Cursor,
    view: Viewport,
    size: WindowSize,
    status: Option<StatusMessage>,
    message_ttl: Duration,
}

impl Editor {
    pub fn new(config: &Config, size: WindowSize) -> Self {
        Self {
            doc: Document::new(config.tab_stop),
            cursor: Cursor::default(),
            view: Viewport::default(),
            size,
            status: None,
            message_ttl: Duration::from_secs(config.message_timeout_secs),
        }
    }

    /// Load a file into the document
    ///
    /// A failed load is absorbed: the editor keeps its empty document and
    /// shows the error in the message bar, so the user can still quit
    /// cleanly.
    pub fn open(&mut self, path: &Path) {
        if let Err(e) = self.doc.open(path) {
            tracing::warn!("failed to open {}: {}", path.display(), e);
            self.set_status(format!("Can't open {}: {}", path.display(), e));
        }
    }

    /// Replace the document wholesale, resetting cursor and viewport
    pub fn load(&mut self, doc: Document) {
        self.doc = doc;
        self.cursor = Cursor::default();
        self.view = Viewport::default();
    }

    pub fn set_status(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage::new(text));
    }

    /// Adopt newly probed terminal dimensions
    pub fn resize(&mut self, size: WindowSize) {
        self.size = size;
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn viewport(&self) -> Viewport {
        self.view
    }

    /// Rows available for document content (two are reserved for the bars)
    fn content_rows(&self) -> usize {
        self.size.rows.saturating_sub(render::BAR_ROWS) as usize
    }

    /// Length of the row under `y`, zero past the last row
    fn row_len(&self, y: usize) -> usize {
        self.doc.row(y).map(|r| r.len()).unwrap_or(0)
    }

    /// Apply one key event
    pub fn process_key(&mut self, key: Key) -> Step {
        match key {
            QUIT_KEY => return Step::Quit,
            Key::ArrowUp | Key::ArrowDown | Key::ArrowLeft | Key::ArrowRight => {
                self.move_cursor(key);
            }
            Key::Home => self.cursor.x = 0,
            Key::End => self.cursor.x = self.row_len(self.cursor.y),
            Key::PageUp | Key::PageDown => self.page(key),
            // Deletion is not part of the minimal core; the key is inert.
            Key::Delete => {}
            // Unrecognized bytes are inert.
            Key::Byte(_) => {}
        }
        Step::Continue
    }

    /// Single-step cursor movement with row-wrap at line boundaries
    fn move_cursor(&mut self, key: Key) {
        match key {
            Key::ArrowUp => {
                self.cursor.y = self.cursor.y.saturating_sub(1);
            }
            Key::ArrowDown => {
                // One past the last row is a valid resting place.
                if self.cursor.y < self.doc.row_count() {
                    self.cursor.y += 1;
                }
            }
            Key::ArrowLeft => {
                if self.cursor.x > 0 {
                    self.cursor.x -= 1;
                } else if self.cursor.y > 0 {
                    self.cursor.y -= 1;
                    self.cursor.x = self.row_len(self.cursor.y);
                }
            }
            Key::ArrowRight => {
                let len = self.row_len(self.cursor.y);
                if self.cursor.x < len {
                    self.cursor.x += 1;
                } else if self.cursor.x == len
                    && self.doc.row(self.cursor.y).is_some()
                    && self.cursor.y + 1 < self.doc.row_count()
                {
                    self.cursor.y += 1;
                    self.cursor.x = 0;
                }
            }
            _ => {}
        }
        self.snap_column();
    }

    /// Jump by one screenful, then snap the column to the landing row
    fn page(&mut self, key: Key) {
        let jump = self.content_rows();
        match key {
            Key::PageUp => self.cursor.y = self.cursor.y.saturating_sub(jump),
            Key::PageDown => {
                self.cursor.y = (self.cursor.y + jump).min(self.doc.row_count());
            }
            _ => {}
        }
        self.snap_column();
    }

    /// Clamp the column to the landing row after a vertical move
    fn snap_column(&mut self) {
        let len = self.row_len(self.cursor.y);
        if self.cursor.x > len {
            self.cursor.x = len;
        }
    }

    /// Recompute scrolling and compose the next frame
    pub fn frame(&mut self) -> Vec<u8> {
        let rx = self
            .doc
            .row(self.cursor.y)
            .map(|row| row.render_col(self.cursor.x, self.doc.tab_stop()))
            .unwrap_or(0);
        self.view
            .scroll(self.cursor.y, rx, self.content_rows(), self.size.cols as usize);

        let message = self
            .status
            .as_ref()
            .and_then(|m| m.text_if_fresh(self.message_ttl));
        render::compose(&self.doc, self.cursor, rx, self.view, self.size, message)
    }
}

/// Run an editing session on the controlling terminal
///
/// Raw mode is held by a scoped guard, so the terminal is restored on every
/// exit path, including propagated errors. Only raw-mode acquisition and
/// the initial size probe are fatal; everything later falls back or is
/// absorbed.
pub fn run(path: Option<PathBuf>, config: Config) -> Result<(), EditorError> {
    let _raw = RawMode::enable()?;
    let size = probe_window_size()?;

    let mut editor = Editor::new(&config, size);
    if let Some(path) = path {
        editor.open(&path);
    }
    editor.set_status("HELP: Ctrl-Q = quit");

    let mut keys = KeyDecoder::new(TtyInput::new());
    let mut stdout = io::stdout();

    loop {
        // Dimensions are re-probed each frame; a failed probe keeps the
        // previous dimensions rather than aborting the session.
        if let Ok(size) = window_size() {
            editor.resize(size);
        }

        let frame = editor.frame();
        stdout.write_all(&frame)?;
        stdout.flush()?;

        match keys.read_key()? {
            // Timeout with no key; repaint and wait again.
            None => continue,
            Some(key) => {
                if editor.process_key(key) == Step::Quit {
                    break;
                }
            }
        }
    }

    stdout.write_all(render::CLEAR_SCREEN)?;
    stdout.write_all(render::CURSOR_HOME)?;
    stdout.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn editor_with_lines(lines: Vec<&[u8]>, rows: u16, cols: u16) -> Editor {
        let mut editor = Editor::new(&Config::default(), WindowSize::new(rows, cols));
        editor
            .doc
            .load_lines(lines.into_iter().map(|l| l.to_vec()));
        editor
    }

    #[test]
    fn test_quit_key() {
        let mut editor = editor_with_lines(vec![], 24, 80);
        assert_eq!(editor.process_key(Key::Byte(ctrl(b'q'))), Step::Quit);
        assert_eq!(editor.process_key(Key::Byte(b'q')), Step::Continue);
    }

    #[test]
    fn test_left_at_column_zero_wraps_to_previous_row_end() {
        let mut editor = editor_with_lines(vec![b"abc", b"xy"], 24, 80);
        editor.cursor = Cursor::new(0, 1);
        editor.process_key(Key::ArrowLeft);
        assert_eq!(editor.cursor(), Cursor::new(3, 0));
    }

    #[test]
    fn test_left_at_origin_is_suppressed() {
        let mut editor = editor_with_lines(vec![b"abc"], 24, 80);
        editor.process_key(Key::ArrowLeft);
        assert_eq!(editor.cursor(), Cursor::new(0, 0));
    }

    #[test]
    fn test_right_at_row_end_wraps_to_next_row_start() {
        let mut editor = editor_with_lines(vec![b"ab", b"xy"], 24, 80);
        editor.cursor = Cursor::new(2, 0);
        editor.process_key(Key::ArrowRight);
        assert_eq!(editor.cursor(), Cursor::new(0, 1));
    }

    #[test]
    fn test_right_at_last_row_end_is_suppressed() {
        let mut editor = editor_with_lines(vec![b"ab", b"xy"], 24, 80);
        editor.cursor = Cursor::new(2, 1);
        editor.process_key(Key::ArrowRight);
        assert_eq!(editor.cursor(), Cursor::new(2, 1));
    }

    #[test]
    fn test_vertical_move_snaps_column() {
        let mut editor = editor_with_lines(vec![b"a long line", b"x"], 24, 80);
        editor.cursor = Cursor::new(11, 0);
        editor.process_key(Key::ArrowDown);
        assert_eq!(editor.cursor(), Cursor::new(1, 1));
    }

    #[test]
    fn test_down_allows_one_past_last_row() {
        let mut editor = editor_with_lines(vec![b"only"], 24, 80);
        editor.cursor = Cursor::new(0, 0);
        editor.process_key(Key::ArrowDown);
        assert_eq!(editor.cursor(), Cursor::new(0, 1));
        editor.process_key(Key::ArrowDown);
        assert_eq!(editor.cursor(), Cursor::new(0, 1));
    }

    #[test]
    fn test_home_and_end() {
        let mut editor = editor_with_lines(vec![b"abcdef"], 24, 80);
        editor.cursor = Cursor::new(3, 0);
        editor.process_key(Key::End);
        assert_eq!(editor.cursor().x, 6);
        editor.process_key(Key::Home);
        assert_eq!(editor.cursor().x, 0);
    }

    #[test]
    fn test_page_jump_by_one_screenful() {
        let lines: Vec<Vec<u8>> = (0..100).map(|i| format!("{}", i).into_bytes()).collect();
        let mut editor = Editor::new(&Config::default(), WindowSize::new(22, 80));
        editor.doc.load_lines(lines);

        editor.process_key(Key::PageDown);
        assert_eq!(editor.cursor().y, 20);
        editor.process_key(Key::PageUp);
        assert_eq!(editor.cursor().y, 0);

        // Clamped at the document end.
        for _ in 0..10 {
            editor.process_key(Key::PageDown);
        }
        assert_eq!(editor.cursor().y, 100);
    }

    #[test]
    fn test_scroll_keeps_cursor_on_last_visible_line() {
        // 100 rows, 20 content rows: cursor at row 50 scrolls to offset 31.
        let lines: Vec<Vec<u8>> = (0..100).map(|_| b"x".to_vec()).collect();
        let mut editor = Editor::new(&Config::default(), WindowSize::new(22, 80));
        editor.doc.load_lines(lines);

        for _ in 0..50 {
            editor.process_key(Key::ArrowDown);
        }
        let _ = editor.frame();
        assert_eq!(editor.viewport().row_off, 31);
        assert_eq!(editor.cursor().y, 50);
    }

    #[test]
    fn test_status_message_ttl() {
        let message = StatusMessage::new("hello");
        assert_eq!(message.text_if_fresh(Duration::from_secs(5)), Some("hello"));
        assert_eq!(message.text_if_fresh(Duration::ZERO), None);
    }

    #[test]
    fn test_open_missing_file_sets_status() {
        let mut editor = Editor::new(&Config::default(), WindowSize::new(24, 80));
        editor.open(Path::new("/nonexistent/mote-test-file"));
        assert_eq!(editor.document().row_count(), 0);
        let frame = editor.frame();
        assert!(String::from_utf8_lossy(&frame).contains("Can't open"));
    }

    #[test]
    fn test_frame_tracks_tab_cursor() {
        let mut editor = editor_with_lines(vec![b"a\tb"], 24, 80);
        editor.cursor = Cursor::new(2, 0);
        let frame = editor.frame();
        let text = String::from_utf8_lossy(&frame);
        // cx 2 maps to render column 4, screen column 5.
        assert!(text.ends_with("\x1b[1;5H\x1b[?25h"));
    }
}
