//! Mote Text Editor Library
//!
//! A minimal terminal text editor built from scratch without any terminal
//! manipulation libraries. This crate provides:
//!
//! - `term`: raw-mode terminal configuration and window size probing
//! - `input`: decoding of the raw keyboard byte stream into key events
//! - `core`: document model (rows, tab expansion, cursor, viewport)
//! - `render`: per-frame screen buffer composition
//! - `editor`: the read-decode-mutate-render loop
//! - `config`: on-disk configuration

pub mod config;
pub mod core;
pub mod editor;
pub mod input;
pub mod render;
pub mod term;
