//! Raw mode configuration
//!
//! Switches the controlling terminal into raw mode: no echo, no line
//! buffering, no signal keys, no output post-processing, and bounded
//! byte-at-a-time reads. The prior attributes are captured on entry and
//! restored when the guard is dropped, so raw mode cannot outlive the
//! process on any exit path.

use std::io;

use nix::sys::termios::{
    tcgetattr, tcsetattr, ControlFlags, InputFlags, LocalFlags, OutputFlags, SetArg,
    SpecialCharacterIndices, Termios,
};

use super::{TermError, TermResult};

/// Scoped raw-mode guard for the controlling terminal
///
/// While a `RawMode` value is alive, stdin delivers unechoed, unbuffered
/// bytes and reads return after at most ~100ms with zero bytes when no key
/// was pressed. Dropping the guard restores the captured attributes.
pub struct RawMode {
    /// The terminal attributes in effect before raw mode was enabled
    saved: Termios,
}

impl RawMode {
    /// Enable raw mode on stdin, capturing the current attributes
    ///
    /// Fails if the attributes cannot be read or written, in which case the
    /// terminal is left untouched.
    pub fn enable() -> TermResult<Self> {
        let stdin = io::stdin();
        let saved = tcgetattr(&stdin).map_err(TermError::GetAttr)?;

        let mut raw = saved.clone();
        // Input: no break-to-SIGINT, no CR->NL translation, no parity
        // checking, no high-bit stripping, no software flow control.
        raw.input_flags.remove(
            InputFlags::BRKINT
                | InputFlags::ICRNL
                | InputFlags::INPCK
                | InputFlags::ISTRIP
                | InputFlags::IXON,
        );
        // Output: no post-processing; the editor emits \r\n itself.
        raw.output_flags.remove(OutputFlags::OPOST);
        // 8-bit characters.
        raw.control_flags.insert(ControlFlags::CS8);
        // Local: no echo, no canonical line buffering, no signal keys
        // (Ctrl-C/Ctrl-Z arrive as ordinary bytes), no extended input.
        raw.local_flags.remove(
            LocalFlags::ECHO | LocalFlags::ICANON | LocalFlags::IEXTEN | LocalFlags::ISIG,
        );
        // Reads require no minimum byte count and wait at most one decisecond.
        raw.control_chars[SpecialCharacterIndices::VMIN as usize] = 0;
        raw.control_chars[SpecialCharacterIndices::VTIME as usize] = 1;

        tcsetattr(&stdin, SetArg::TCSAFLUSH, &raw).map_err(TermError::SetAttr)?;

        tracing::debug!("raw mode enabled");
        Ok(Self { saved })
    }

    /// Restore the attributes captured by [`RawMode::enable`]
    ///
    /// Idempotent; also invoked by `Drop`.
    pub fn disable(&self) -> TermResult<()> {
        tcsetattr(&io::stdin(), SetArg::TCSAFLUSH, &self.saved).map_err(TermError::SetAttr)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        if let Err(e) = self.disable() {
            // Nothing more can be done here; the terminal may be left raw
            // if the device itself has gone away.
            tracing::warn!("failed to restore terminal attributes: {}", e);
        } else {
            tracing::debug!("raw mode disabled");
        }
    }
}
