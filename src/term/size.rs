//! Window size probing
//!
//! The terminal size is queried with `TIOCGWINSZ`. Some terminals report a
//! zero-column size or reject the ioctl entirely; in that case the size is
//! inferred by parking the cursor at the bottom-right corner and asking the
//! terminal where it ended up (`ESC[6n`, answered with `ESC[<row>;<col>R`).
//! The fallback requires raw mode to be active, since the report arrives on
//! stdin as ordinary input bytes.

use std::io::{self, Write};

use nix::libc::{self, STDIN_FILENO, STDOUT_FILENO};
use nix::unistd::read;

use super::{TermError, TermResult};

/// Maximum length of a cursor position report (`ESC [ rrr ; ccc R`)
const MAX_REPORT_LEN: usize = 32;

/// Terminal dimensions in character cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSize {
    pub rows: u16,
    pub cols: u16,
}

impl WindowSize {
    pub fn new(rows: u16, cols: u16) -> Self {
        Self { rows, cols }
    }
}

impl Default for WindowSize {
    fn default() -> Self {
        Self::new(24, 80)
    }
}

/// Query the window size via ioctl
///
/// Cheap enough to call once per frame. A zero-column answer is treated as
/// a failure, matching terminals that fill in garbage on this path.
pub fn window_size() -> TermResult<WindowSize> {
    let mut ws = libc::winsize {
        ws_row: 0,
        ws_col: 0,
        ws_xpixel: 0,
        ws_ypixel: 0,
    };

    // SAFETY: TIOCGWINSZ is a valid ioctl for querying terminal size
    let result = unsafe { libc::ioctl(STDOUT_FILENO, libc::TIOCGWINSZ, &mut ws) };

    if result < 0 || ws.ws_col == 0 {
        Err(TermError::WinsizeIoctl(nix::errno::Errno::last()))
    } else {
        Ok(WindowSize::new(ws.ws_row, ws.ws_col))
    }
}

/// Query the window size, falling back to the cursor position probe
///
/// Used once at startup; failure here is fatal to the editing session.
pub fn probe_window_size() -> TermResult<WindowSize> {
    match window_size() {
        Ok(size) => Ok(size),
        Err(e) => {
            tracing::debug!("TIOCGWINSZ failed ({}), probing via cursor report", e);
            cursor_position_probe()
        }
    }
}

/// Infer the window size by moving the cursor to the bottom-right corner
/// and requesting a cursor position report
fn cursor_position_probe() -> TermResult<WindowSize> {
    let mut stdout = io::stdout();
    // 999 exceeds any real terminal; C and B stop at the screen edge.
    stdout.write_all(b"\x1b[999C\x1b[999B\x1b[6n")?;
    stdout.flush()?;

    // The report arrives byte-at-a-time on stdin and ends with 'R'. A read
    // returning zero bytes means the timeout expired without a reply.
    let mut buf = [0u8; MAX_REPORT_LEN];
    let mut len = 0;
    while len < buf.len() {
        match read(STDIN_FILENO, &mut buf[len..len + 1]) {
            Ok(0) => break,
            Ok(_) => {
                if buf[len] == b'R' {
                    len += 1;
                    break;
                }
                len += 1;
            }
            Err(nix::errno::Errno::EAGAIN) => break,
            Err(e) => return Err(TermError::ReadReport(e)),
        }
    }

    parse_cursor_report(&buf[..len])
}

/// Parse a cursor position report of the form `ESC [ <rows> ; <cols> R`
///
/// The trailing `R` is optional so a truncated-but-complete report still
/// parses. Anything else is a malformed report, surfaced as a recoverable
/// error so the caller can fall back to a default size.
fn parse_cursor_report(report: &[u8]) -> TermResult<WindowSize> {
    let body = report
        .strip_prefix(b"\x1b[")
        .ok_or(TermError::MalformedReport)?;
    let body = body.strip_suffix(b"R").unwrap_or(body);

    let text = std::str::from_utf8(body).map_err(|_| TermError::MalformedReport)?;
    let (rows, cols) = text.split_once(';').ok_or(TermError::MalformedReport)?;
    let rows: u16 = rows.parse().map_err(|_| TermError::MalformedReport)?;
    let cols: u16 = cols.parse().map_err(|_| TermError::MalformedReport)?;

    if rows == 0 || cols == 0 {
        return Err(TermError::MalformedReport);
    }
    Ok(WindowSize::new(rows, cols))
}
