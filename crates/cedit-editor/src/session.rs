//! Session: the owned state of one editing session.
//!
//! A `Session` bundles the line store, the cursor and the file the store is
//! bound to. Input reaches it as abstract [`EditEvent`]s, independent of
//! any key encoding, and each event is applied completely or not at all:
//! a rejected edit leaves both the store and the cursor as they were.

use std::path::{Path, PathBuf};

use crate::buffer::{LineStore, LoadReport};
use crate::config::Config;
use crate::cursor::Cursor;
use crate::error::EditError;
use crate::position::Position;

// ---------------------------------------------------------------------------
// Events and outcomes
// ---------------------------------------------------------------------------

/// One editing command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditEvent {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    LineStart,
    LineEnd,
    Insert(char),
    SplitLine,
    DeleteBefore,
    Save,
    Quit,
}

impl EditEvent {
    /// True for events that can change the store.
    #[must_use]
    pub const fn is_edit(self) -> bool {
        matches!(self, Self::Insert(_) | Self::SplitLine | Self::DeleteBefore)
    }
}

/// What applying an event did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The cursor moved, or stayed at an edge. Nothing was edited.
    Moved,
    /// The store was edited.
    Edited,
    /// The store was written to `path`.
    Saved { path: PathBuf, lines: usize, bytes: usize },
    /// The session is over.
    Quit,
    /// Quit refused because of unsaved changes; quitting again confirms.
    QuitBlocked,
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// Store, cursor and backing file of one editing session.
#[derive(Debug, Clone)]
pub struct Session {
    store: LineStore,
    cursor: Cursor,
    path: PathBuf,
    quit_armed: bool,
}

impl Session {
    /// An empty session bound to the configured default file.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self::with_store(LineStore::new(config.limits), config.default_file.clone())
    }

    /// A session over an existing store.
    #[must_use]
    pub fn with_store(store: LineStore, path: PathBuf) -> Self {
        Self {
            store,
            cursor: Cursor::new(),
            path,
            quit_armed: false,
        }
    }

    /// Load `path` into a new session. A missing file gives an empty store
    /// that the first save creates.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::Io`] if the file exists but can't be read.
    pub fn open(path: &Path, config: &Config) -> Result<(Self, LoadReport), EditError> {
        let (store, report) = LineStore::load(path, config.limits)?;
        Ok((Self::with_store(store, path.to_path_buf()), report))
    }

    // -- Accessors ----------------------------------------------------------

    #[inline]
    #[must_use]
    pub const fn store(&self) -> &LineStore {
        &self.store
    }

    #[inline]
    #[must_use]
    pub const fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    /// The file this session saves to.
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Short name for the status line: the path as given.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.path.display().to_string()
    }

    #[inline]
    #[must_use]
    pub const fn is_modified(&self) -> bool {
        self.store.is_modified()
    }

    // -- Applying events ----------------------------------------------------

    /// Apply one event.
    ///
    /// # Errors
    ///
    /// Edits fail with the store's error (capacity, invalid char); `Save`
    /// fails with [`EditError::Io`]. On error nothing changed.
    pub fn apply(&mut self, event: EditEvent) -> Result<Outcome, EditError> {
        if event != EditEvent::Quit {
            self.quit_armed = false;
        }

        let result = self.dispatch(event);
        if let Err(err) = &result {
            tracing::debug!(?event, at = %self.cursor.position(), %err, "event rejected");
        }
        result
    }

    fn dispatch(&mut self, event: EditEvent) -> Result<Outcome, EditError> {
        let store = &mut self.store;
        let cursor = &mut self.cursor;

        match event {
            EditEvent::MoveUp => cursor.move_up(store),
            EditEvent::MoveDown => cursor.move_down(store),
            EditEvent::MoveLeft => cursor.move_left(),
            EditEvent::MoveRight => cursor.move_right(store),
            EditEvent::LineStart => cursor.move_to_line_start(),
            EditEvent::LineEnd => cursor.move_to_line_end(store),

            EditEvent::Insert(ch) => {
                store.insert_char(cursor.position(), ch)?;
                cursor.move_right(store);
                return Ok(Outcome::Edited);
            }
            EditEvent::SplitLine => {
                let pos = cursor.position();
                store.split_line(pos)?;
                cursor.move_down(store);
                cursor.move_to_line_start();
                return Ok(Outcome::Edited);
            }
            EditEvent::DeleteBefore => {
                if cursor.position() == Position::ZERO {
                    return Ok(Outcome::Moved);
                }
                let pos = store.delete_char_before(cursor.position())?;
                cursor.set_position(pos, store);
                return Ok(Outcome::Edited);
            }

            EditEvent::Save => {
                let report = store.save(&self.path)?;
                return Ok(Outcome::Saved {
                    path: self.path.clone(),
                    lines: report.lines,
                    bytes: report.bytes,
                });
            }
            EditEvent::Quit => {
                if store.is_modified() && !self.quit_armed {
                    self.quit_armed = true;
                    return Ok(Outcome::QuitBlocked);
                }
                return Ok(Outcome::Quit);
            }
        }
        Ok(Outcome::Moved)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
