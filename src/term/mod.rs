//! Terminal control for the controlling TTY
//!
//! This module provides raw-mode configuration of the controlling terminal
//! and window size probing. Raw mode is modeled as a scoped guard so the
//! original attributes are restored on every exit path.

mod raw;
mod size;

pub use raw::RawMode;
pub use size::{probe_window_size, window_size, WindowSize};

/// Error type for terminal operations
#[derive(Debug, thiserror::Error)]
pub enum TermError {
    #[error("Failed to read terminal attributes: {0}")]
    GetAttr(#[source] nix::Error),

    #[error("Failed to set terminal attributes: {0}")]
    SetAttr(#[source] nix::Error),

    #[error("Failed to query window size: {0}")]
    WinsizeIoctl(#[source] nix::Error),

    #[error("Failed to read cursor position report: {0}")]
    ReadReport(#[source] nix::Error),

    #[error("Malformed cursor position report")]
    MalformedReport,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for terminal operations
pub type TermResult<T> = Result<T, TermError>;
