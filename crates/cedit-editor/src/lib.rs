//! # cedit-editor: Editor core for cedit
//!
//! This crate contains everything between a key event and a painted frame:
//!
//! - **[`position`]**: `Position` (line, col), 0-indexed char offsets
//! - **[`buffer`]**: `LineStore`, the line-oriented text store with
//!   capacity limits, split/merge and file persistence
//! - **[`cursor`]**: `Cursor`, a clamped position with no sticky column
//! - **[`highlight`]**: the C token scanner and its block-comment replay
//! - **[`session`]**: `Session`, the owned editor state that applies
//!   abstract edit events
//! - **[`view`]**: scrolling and painting into a `cedit-term` frame buffer
//! - **[`config`]**: TOML configuration
//! - **[`error`]**: `EditError` and `ConfigError`

pub mod buffer;
pub mod config;
pub mod cursor;
pub mod error;
pub mod highlight;
pub mod position;
pub mod session;
pub mod view;
