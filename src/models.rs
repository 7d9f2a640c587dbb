//! Domain model shared between the store and the TUI. The type stays a
//! light-weight data holder so the other layers can focus on persistence and
//! presentation logic.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
/// One CD in the inventory, mirroring a single line of the persisted file.
pub struct Cd {
    /// Identifier assigned by the program, never typed in by the user. Unique
    /// within the store for the duration of a run; delete flows bubble it back
    /// to the store to locate the record.
    pub id: i64,
    /// Album title as entered. May legally be any text, though an embedded
    /// comma will not survive the persisted format (see `store::file`).
    pub title: String,
    /// Artist name as entered. May be blank.
    pub artist: String,
}

impl Cd {
    pub fn new(id: i64, title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            artist: artist.into(),
        }
    }

    /// Compose a `Title - Artist` string that gracefully omits the hyphen when
    /// the artist is blank. Status messages and dialogs rely on this
    /// ready-to-use formatting.
    pub fn display_label(&self) -> String {
        if self.artist.trim().is_empty() {
            self.title.clone()
        } else {
            format!("{} - {}", self.title, self.artist)
        }
    }
}

impl fmt::Display for Cd {
    /// Write the display label to any formatter so the type plays nicely with
    /// widgets that consume strings implicitly.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_label())
    }
}
