//! Error types for editing, persistence and configuration.
//!
//! Every mutation on a [`LineStore`](crate::buffer::LineStore) either
//! succeeds completely or leaves the store untouched and returns an
//! [`EditError`]. Nothing is silently truncated.

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::position::Position;

/// Which configured limit an edit ran into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capacity {
    /// The line would grow past `max` characters.
    LineLength { max: usize },
    /// The buffer would grow past `max` lines.
    LineCount { max: usize },
}

impl fmt::Display for Capacity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LineLength { max } => write!(f, "line would exceed {max} characters"),
            Self::LineCount { max } => write!(f, "buffer would exceed {max} lines"),
        }
    }
}

/// Failure of an edit or a load/save.
#[derive(Debug, Error)]
pub enum EditError {
    #[error("{0}")]
    CapacityExceeded(Capacity),

    /// Caller passed a position outside the buffer.
    #[error("position {0} is outside the buffer")]
    OutOfBounds(Position),

    /// Line terminators never enter a line; breaks go through `split_line`.
    #[error("cannot insert {0:?} into a line")]
    InvalidChar(char),

    #[error("{}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },
}

impl EditError {
    /// Whether this is a capacity rejection (as opposed to a bug or I/O).
    #[must_use]
    pub const fn is_capacity(&self) -> bool {
        matches!(self, Self::CapacityExceeded(_))
    }
}

/// Failure to load or validate the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("invalid config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
