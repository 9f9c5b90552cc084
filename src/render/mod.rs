//! Frame composition
//!
//! Builds one escape-sequence-laden byte buffer per frame: content rows,
//! status bar, message bar, and the final cursor placement. The caller
//! flushes the buffer to the terminal with a single write, so the display
//! never tears from interleaved partial writes.

use crate::core::{Cursor, Document, Viewport};
use crate::term::WindowSize;

/// Editor version shown in the welcome banner
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const HIDE_CURSOR: &[u8] = b"\x1b[?25l";
pub const SHOW_CURSOR: &[u8] = b"\x1b[?25h";
pub const CURSOR_HOME: &[u8] = b"\x1b[H";
pub const CLEAR_LINE: &[u8] = b"\x1b[K";
/// Full clear, used only on the quit path; frames clear line by line
pub const CLEAR_SCREEN: &[u8] = b"\x1b[2J";
pub const INVERT_ON: &[u8] = b"\x1b[7m";
pub const INVERT_OFF: &[u8] = b"\x1b[m";

/// Rows reserved at the bottom for the status and message bars
pub const BAR_ROWS: u16 = 2;

/// Compose one full frame
///
/// `rx` is the cursor's render column, already mapped through the current
/// row's tab expansion. The message is passed only while it should still be
/// displayed; TTL filtering is the caller's job.
pub fn compose(
    doc: &Document,
    cursor: Cursor,
    rx: usize,
    view: Viewport,
    size: WindowSize,
    message: Option<&str>,
) -> Vec<u8> {
    let cols = size.cols as usize;
    let content_rows = size.rows.saturating_sub(BAR_ROWS) as usize;

    let mut buf = Vec::with_capacity((cols + 8) * size.rows as usize + 32);
    buf.extend_from_slice(HIDE_CURSOR);
    buf.extend_from_slice(CURSOR_HOME);

    draw_rows(&mut buf, doc, view, content_rows, cols);
    draw_status_bar(&mut buf, doc, cursor, cols);
    draw_message_bar(&mut buf, message, cols);

    // Reposition to the cursor's screen-relative cell (1-based).
    move_to(
        &mut buf,
        cursor.y - view.row_off + 1,
        rx - view.col_off + 1,
    );
    buf.extend_from_slice(SHOW_CURSOR);
    buf
}

/// Append a 1-based cursor position escape
fn move_to(buf: &mut Vec<u8>, row: usize, col: usize) {
    buf.extend_from_slice(format!("\x1b[{};{}H", row, col).as_bytes());
}

/// Draw the content viewport: visible row slices or `~` filler lines
fn draw_rows(buf: &mut Vec<u8>, doc: &Document, view: Viewport, content_rows: usize, cols: usize) {
    for y in 0..content_rows {
        let file_row = y + view.row_off;
        if file_row >= doc.row_count() {
            if doc.is_empty() && y == content_rows / 3 {
                draw_banner(buf, cols);
            } else {
                buf.push(b'~');
            }
        } else {
            let rendered = doc.row(file_row).map(|r| r.rendered()).unwrap_or(b"");
            if view.col_off < rendered.len() {
                let end = rendered.len().min(view.col_off + cols);
                buf.extend_from_slice(&rendered[view.col_off..end]);
            }
        }
        buf.extend_from_slice(CLEAR_LINE);
        buf.extend_from_slice(b"\r\n");
    }
}

/// Draw the centered welcome banner shown on empty documents
fn draw_banner(buf: &mut Vec<u8>, cols: usize) {
    let mut banner = format!("Mote editor -- version {}", VERSION);
    banner.truncate(cols);

    let mut padding = cols.saturating_sub(banner.len()) / 2;
    if padding > 0 {
        buf.push(b'~');
        padding -= 1;
    }
    buf.extend(std::iter::repeat(b' ').take(padding));
    buf.extend_from_slice(banner.as_bytes());
}

/// Draw the inverse-video status bar: filename, line count, row indicator
fn draw_status_bar(buf: &mut Vec<u8>, doc: &Document, cursor: Cursor, cols: usize) {
    buf.extend_from_slice(INVERT_ON);

    let name = doc
        .filename()
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_else(|| String::from("[No Name]"));
    let mut left = format!("{:.20} - {} lines", name, doc.row_count());
    truncate_to_cols(&mut left, cols);
    let right = format!("{}/{}", cursor.y + 1, doc.row_count());

    buf.extend_from_slice(left.as_bytes());
    let mut used = left.len();
    while used < cols {
        if cols - used == right.len() {
            buf.extend_from_slice(right.as_bytes());
            break;
        }
        buf.push(b' ');
        used += 1;
    }

    buf.extend_from_slice(INVERT_OFF);
    buf.extend_from_slice(b"\r\n");
}

/// Draw the transient message bar (blank when no fresh message)
fn draw_message_bar(buf: &mut Vec<u8>, message: Option<&str>, cols: usize) {
    buf.extend_from_slice(CLEAR_LINE);
    if let Some(message) = message {
        let mut message = message.to_string();
        truncate_to_cols(&mut message, cols);
        buf.extend_from_slice(message.as_bytes());
    }
}

/// Truncate a string to at most `cols` bytes on a char boundary
fn truncate_to_cols(text: &mut String, cols: usize) {
    while text.len() > cols {
        text.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame_lines(frame: &[u8]) -> Vec<String> {
        let text = String::from_utf8_lossy(frame).into_owned();
        let body = text
            .strip_prefix("\x1b[?25l\x1b[H")
            .expect("frame must hide the cursor and home before drawing");
        body.split("\r\n").map(|s| s.to_string()).collect()
    }

    fn compose_default(doc: &Document) -> Vec<u8> {
        compose(
            doc,
            Cursor::default(),
            0,
            Viewport::default(),
            WindowSize::new(24, 80),
            None,
        )
    }

    #[test]
    fn test_empty_document_frame() {
        let doc = Document::new(4);
        let frame = compose_default(&doc);
        let text = String::from_utf8_lossy(&frame);

        assert!(text.starts_with("\x1b[?25l\x1b[H"));
        assert!(text.ends_with("\x1b[1;1H\x1b[?25h"));
        assert!(text.contains("[No Name] - 0 lines"));

        // 22 content rows; the banner replaces the filler on row 22/3 = 7.
        let lines = frame_lines(&frame);
        let banner = format!("Mote editor -- version {}", VERSION);
        assert!(lines[7].contains(&banner));
        let tilde_lines = lines[..22]
            .iter()
            .filter(|l| l.starts_with('~') && !l.contains("Mote"))
            .count();
        assert_eq!(tilde_lines, 21);
    }

    #[test]
    fn test_banner_is_centered() {
        let doc = Document::new(4);
        let frame = compose_default(&doc);
        let lines = frame_lines(&frame);

        let banner = format!("Mote editor -- version {}", VERSION);
        let expected_padding = (80 - banner.len()) / 2;
        let line = &lines[7];
        assert!(line.starts_with('~'));
        let spaces = line[1..].chars().take_while(|&c| c == ' ').count();
        assert_eq!(spaces, expected_padding - 1);
    }

    #[test]
    fn test_no_banner_when_document_has_rows() {
        let mut doc = Document::new(4);
        doc.load_lines(vec![b"hello".to_vec()]);
        let frame = compose_default(&doc);
        assert!(!String::from_utf8_lossy(&frame).contains("Mote editor"));
    }

    #[test]
    fn test_erase_line_after_every_content_row() {
        let doc = Document::new(4);
        let frame = compose_default(&doc);
        let text = String::from_utf8_lossy(&frame);
        // 22 content rows plus the message bar all end in erase-to-eol.
        assert_eq!(text.matches("\x1b[K").count(), 23);
    }

    #[test]
    fn test_status_bar_contents() {
        let mut doc = Document::new(4);
        doc.load_lines(vec![b"a".to_vec(), b"b".to_vec(), b"c".to_vec()]);
        let frame = compose(
            &doc,
            Cursor::new(0, 1),
            0,
            Viewport::default(),
            WindowSize::new(24, 80),
            None,
        );
        let text = String::from_utf8_lossy(&frame);

        assert!(text.contains("\x1b[7m"));
        assert!(text.contains("[No Name] - 3 lines"));
        let status_start = text.find("\x1b[7m").unwrap() + 4;
        let status_end = text.find("\x1b[m").unwrap();
        let status = &text[status_start..status_end];
        assert_eq!(status.len(), 80);
        assert!(status.ends_with("2/3"));
    }

    #[test]
    fn test_message_bar_shows_and_hides() {
        let doc = Document::new(4);
        let with_message = compose(
            &doc,
            Cursor::default(),
            0,
            Viewport::default(),
            WindowSize::new(24, 80),
            Some("HELP: Ctrl-Q = quit"),
        );
        assert!(String::from_utf8_lossy(&with_message).contains("HELP: Ctrl-Q = quit"));

        let without = compose_default(&doc);
        assert!(!String::from_utf8_lossy(&without).contains("HELP"));
    }

    #[test]
    fn test_visible_slice_clamped_by_offsets() {
        let mut doc = Document::new(4);
        doc.load_lines(vec![b"0123456789".to_vec()]);
        let frame = compose(
            &doc,
            Cursor::new(8, 0),
            8,
            Viewport {
                row_off: 0,
                col_off: 4,
            },
            WindowSize::new(24, 5),
            None,
        );
        let lines = frame_lines(&frame);
        assert!(lines[0].starts_with("45678"));
        assert!(!lines[0].contains('9'));
    }

    #[test]
    fn test_column_offset_past_row_end_draws_blank() {
        let mut doc = Document::new(4);
        doc.load_lines(vec![b"ab".to_vec()]);
        let frame = compose(
            &doc,
            Cursor::new(0, 0),
            10,
            Viewport {
                row_off: 0,
                col_off: 10,
            },
            WindowSize::new(24, 80),
            None,
        );
        let lines = frame_lines(&frame);
        assert_eq!(lines[0], "\x1b[K");
    }

    #[test]
    fn test_cursor_position_is_screen_relative() {
        let mut doc = Document::new(4);
        doc.load_lines((0..50).map(|i| format!("line {}", i).into_bytes()));
        let frame = compose(
            &doc,
            Cursor::new(2, 40),
            2,
            Viewport {
                row_off: 30,
                col_off: 0,
            },
            WindowSize::new(24, 80),
            None,
        );
        let text = String::from_utf8_lossy(&frame);
        assert!(text.ends_with("\x1b[11;3H\x1b[?25h"));
    }
}
