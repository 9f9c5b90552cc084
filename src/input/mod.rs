//! Input Decoding Module
//!
//! Turns the raw byte stream delivered by a raw-mode terminal into logical
//! key events. Ordinary bytes pass through unchanged; multi-byte escape
//! sequences for arrow and navigation keys are decoded by a small state
//! machine.
//!
//! # Escape disambiguation
//!
//! A lone Escape keypress and the first byte of an arrow-key sequence are
//! the same byte on the wire. The two are only distinguishable by timing:
//! if no continuation byte arrives before the bounded read times out, the
//! escape was a literal keypress. The byte source therefore reports "no
//! input yet" explicitly as `Ok(None)` rather than blocking forever.

use nix::libc::STDIN_FILENO;
use nix::unistd::read;

/// The escape byte that introduces every control sequence
pub const ESC: u8 = 0x1b;

/// Map a letter to its control-key byte (Ctrl-Q -> 0x11)
pub const fn ctrl(c: u8) -> u8 {
    c & 0x1f
}

/// Error type for input operations
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("Failed to read from terminal: {0}")]
    Read(#[source] nix::Error),
}

/// Result type for input operations
pub type InputResult<T> = Result<T, InputError>;

/// A decoded key event
///
/// Literal bytes and named navigation keys live in separate variants, so a
/// named key can never collide with a byte value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// An ordinary or control byte, including a literal Escape
    Byte(u8),
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Home,
    End,
    Delete,
    PageUp,
    PageDown,
}

/// A source of input bytes with a bounded-wait read
///
/// `Ok(None)` means the read timeout expired with no byte available; it is
/// distinct from every valid byte value and is never an error.
pub trait ByteSource {
    fn next_byte(&mut self) -> InputResult<Option<u8>>;
}

/// Byte source backed by the raw-mode stdin of the controlling terminal
///
/// With `VMIN=0`/`VTIME=1` in effect, a read returns after at most ~100ms
/// with zero bytes when no key was pressed.
#[derive(Debug, Default)]
pub struct TtyInput;

impl TtyInput {
    pub fn new() -> Self {
        Self
    }
}

impl ByteSource for TtyInput {
    fn next_byte(&mut self) -> InputResult<Option<u8>> {
        let mut buf = [0u8; 1];
        match read(STDIN_FILENO, &mut buf) {
            Ok(0) => Ok(None),
            Ok(_) => Ok(Some(buf[0])),
            // EAGAIN and EWOULDBLOCK are the same value on Linux
            Err(nix::errno::Errno::EAGAIN) => Ok(None),
            Err(e) => Err(InputError::Read(e)),
        }
    }
}

/// Byte source that replays a recorded script
///
/// `None` entries model read timeouts, which makes the escape-timing
/// behavior of the decoder reproducible. Once the script is exhausted every
/// read times out.
#[derive(Debug, Default)]
pub struct ScriptedInput {
    script: std::collections::VecDeque<Option<u8>>,
}

impl ScriptedInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a script from raw bytes with no timeouts in between
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            script: bytes.iter().map(|&b| Some(b)).collect(),
        }
    }

    /// Append a byte to the script
    pub fn push_byte(&mut self, byte: u8) {
        self.script.push_back(Some(byte));
    }

    /// Append a read timeout to the script
    pub fn push_timeout(&mut self) {
        self.script.push_back(None);
    }
}

impl ByteSource for ScriptedInput {
    fn next_byte(&mut self) -> InputResult<Option<u8>> {
        Ok(self.script.pop_front().flatten())
    }
}

/// Decoder that assembles key events from a byte source
///
/// Unrecognized sequences are inert: the decoder degrades to reporting a
/// literal escape byte and never returns an error for them. Every escape
/// sequence read is bounded at three continuation bytes.
#[derive(Debug)]
pub struct KeyDecoder<S> {
    source: S,
}

impl<S: ByteSource> KeyDecoder<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Read one key event, or `Ok(None)` when the timeout expires first
    pub fn read_key(&mut self) -> InputResult<Option<Key>> {
        let Some(byte) = self.source.next_byte()? else {
            return Ok(None);
        };

        if byte != ESC {
            return Ok(Some(Key::Byte(byte)));
        }

        // A timeout after the escape byte means it was a literal keypress.
        let Some(b1) = self.source.next_byte()? else {
            return Ok(Some(Key::Byte(ESC)));
        };

        let key = match b1 {
            b'[' => self.decode_csi()?,
            b'O' => self.decode_ss3()?,
            _ => Key::Byte(ESC),
        };
        Ok(Some(key))
    }

    /// Decode the remainder of a `ESC [` sequence
    fn decode_csi(&mut self) -> InputResult<Key> {
        let Some(b2) = self.source.next_byte()? else {
            return Ok(Key::Byte(ESC));
        };

        let key = match b2 {
            b'A' => Key::ArrowUp,
            b'B' => Key::ArrowDown,
            b'C' => Key::ArrowRight,
            b'D' => Key::ArrowLeft,
            b'H' => Key::Home,
            b'F' => Key::End,
            b'0'..=b'9' => {
                let Some(b3) = self.source.next_byte()? else {
                    return Ok(Key::Byte(ESC));
                };
                if b3 != b'~' {
                    return Ok(Key::Byte(ESC));
                }
                match b2 {
                    b'1' | b'7' => Key::Home,
                    b'3' => Key::Delete,
                    b'4' | b'8' => Key::End,
                    b'5' => Key::PageUp,
                    b'6' => Key::PageDown,
                    _ => Key::Byte(ESC),
                }
            }
            _ => Key::Byte(ESC),
        };
        Ok(key)
    }

    /// Decode the remainder of a `ESC O` sequence (alternate home/end
    /// encoding used by some terminals)
    fn decode_ss3(&mut self) -> InputResult<Key> {
        let Some(b2) = self.source.next_byte()? else {
            return Ok(Key::Byte(ESC));
        };
        let key = match b2 {
            b'H' => Key::Home,
            b'F' => Key::End,
            _ => Key::Byte(ESC),
        };
        Ok(key)
    }
}
