use anyhow::{anyhow, Result};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

/// Form state for adding a CD. The id is assigned by the store, so the form
/// only collects the two free-form fields. Note that the persisted format
/// cannot represent an embedded comma; the form still accepts one, matching
/// the documented-but-unenforced constraint of the file format.
#[derive(Default, Clone)]
pub(crate) struct CdForm {
    pub(crate) title: String,
    pub(crate) artist: String,
    pub(crate) active: CdField,
    pub(crate) error: Option<String>,
}

/// Fields available within the add-CD form.
#[derive(Copy, Clone, PartialEq, Eq)]
pub(crate) enum CdField {
    Title,
    Artist,
}

impl Default for CdField {
    fn default() -> Self {
        CdField::Title
    }
}

impl CdForm {
    /// Swap focus between the title and artist fields.
    pub(crate) fn toggle_field(&mut self) {
        self.active = match self.active {
            CdField::Title => CdField::Artist,
            CdField::Artist => CdField::Title,
        };
    }

    /// Append a character to the active field, filtering control input.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        match self.active {
            CdField::Title => self.title.push(ch),
            CdField::Artist => self.artist.push(ch),
        }
        true
    }

    /// Remove the last character from the active field.
    pub(crate) fn backspace(&mut self) {
        match self.active {
            CdField::Title => {
                self.title.pop();
            }
            CdField::Artist => {
                self.artist.pop();
            }
        }
    }

    /// Validate and normalize the inputs. The title is required; the artist
    /// may stay blank.
    pub(crate) fn parse_inputs(&self) -> Result<(String, String)> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(anyhow!("A CD title is required."));
        }
        Ok((title.to_string(), self.artist.trim().to_string()))
    }

    /// Render a styled line for the modal form.
    pub(crate) fn build_line(&self, field_name: &str, field: CdField) -> Line<'static> {
        let (value, is_active) = match field {
            CdField::Title => (&self.title, self.active == CdField::Title),
            CdField::Artist => (&self.artist, self.active == CdField::Artist),
        };

        let placeholder = match field {
            CdField::Title => "<required>",
            CdField::Artist => "<optional>",
        };

        let display = if value.is_empty() {
            placeholder.to_string()
        } else {
            value.clone()
        };

        let style = if is_active {
            Style::default().fg(Color::Yellow)
        } else if value.is_empty() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        Line::from(vec![
            Span::raw(format!("{field_name}: ")),
            Span::styled(display, style),
        ])
    }

    /// Return the character count for the requested field.
    pub(crate) fn value_len(&self, field: CdField) -> usize {
        match field {
            CdField::Title => self.title.chars().count(),
            CdField::Artist => self.artist.chars().count(),
        }
    }
}

/// Form state for the delete prompt: a digit-only id entry.
#[derive(Default, Clone)]
pub(crate) struct DeleteForm {
    pub(crate) id: String,
    pub(crate) error: Option<String>,
}

impl DeleteForm {
    /// Append a digit to the id entry; anything else is rejected.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_ascii_digit() {
            self.id.push(ch);
            true
        } else {
            false
        }
    }

    pub(crate) fn backspace(&mut self) {
        self.id.pop();
    }

    /// Validate the entry and return the target id.
    pub(crate) fn parse_id(&self) -> Result<i64> {
        let raw = self.id.trim();
        if raw.is_empty() {
            return Err(anyhow!("An ID is required."));
        }
        raw.parse::<i64>()
            .map_err(|_| anyhow!("'{raw}' is not a valid ID."))
    }

    /// Render the single entry line for the modal form.
    pub(crate) fn build_line(&self) -> Line<'static> {
        let display = if self.id.is_empty() {
            "<required>".to_string()
        } else {
            self.id.clone()
        };

        let style = if self.id.is_empty() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default().fg(Color::Yellow)
        };

        Line::from(vec![
            Span::raw("ID: ".to_string()),
            Span::styled(display, style),
        ])
    }

    pub(crate) fn value_len(&self) -> usize {
        self.id.chars().count()
    }
}

/// Marker state for the destructive-reload confirmation.
#[derive(Clone, Copy)]
pub(crate) struct ConfirmReload;

/// Confirmation state for writing the inventory to disk; remembers how many
/// records the write will cover so the dialog can say so.
#[derive(Clone, Copy)]
pub(crate) struct ConfirmSave {
    pub(crate) record_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a_blank_title_is_rejected() {
        let form = CdForm {
            title: "   ".to_string(),
            artist: "The Beatles".to_string(),
            ..CdForm::default()
        };
        assert!(form.parse_inputs().is_err());
    }

    #[test]
    fn inputs_are_trimmed_and_a_blank_artist_is_allowed() {
        let form = CdForm {
            title: "  Abbey Road ".to_string(),
            artist: String::new(),
            ..CdForm::default()
        };
        let (title, artist) = form.parse_inputs().expect("title is present");
        assert_eq!(title, "Abbey Road");
        assert_eq!(artist, "");
    }

    #[test]
    fn control_characters_never_enter_a_field() {
        let mut form = CdForm::default();
        assert!(!form.push_char('\u{7}'));
        assert!(form.push_char('A'));
        assert_eq!(form.title, "A");
    }

    #[test]
    fn the_delete_form_only_accepts_digits() {
        let mut form = DeleteForm::default();
        assert!(!form.push_char('x'));
        assert!(form.push_char('4'));
        assert!(form.push_char('2'));
        assert_eq!(form.parse_id().expect("digits entered"), 42);
    }

    #[test]
    fn an_empty_delete_entry_does_not_parse() {
        let form = DeleteForm::default();
        assert!(form.parse_id().is_err());
    }
}
