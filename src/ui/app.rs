use std::mem;
use std::path::PathBuf;

use anyhow::Result;
use crossterm::event::KeyCode;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;

use crate::store::{load_records, save_records, Inventory};

use super::forms::{CdField, CdForm, ConfirmReload, ConfirmSave, DeleteForm};
use super::helpers::{header_row, inventory_row, popup_area};

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Banner shown on the inventory table's border.
const APP_TITLE: &str = "The Magic CD Inventory";

/// Modal states layered over the always-visible inventory table. The normal
/// mode is the command menu; every other mode captures keys until it resolves
/// back to normal.
enum Mode {
    Normal,
    AddingCd(CdForm),
    DeletingCd(DeleteForm),
    ConfirmReload(ConfirmReload),
    ConfirmSave(ConfirmSave),
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state: the inventory, where it persists, and the
/// current modal mode. There are no process-wide singletons; the session's
/// file name, id counter, and pending input all live here.
pub struct App {
    inventory: Inventory,
    file_path: PathBuf,
    selected: usize,
    mode: Mode,
    status: Option<StatusMessage>,
}

impl App {
    /// A fresh session with an empty inventory. Call [`App::load_initial`]
    /// before the event loop to hydrate it from the persisted file.
    pub fn new(file_path: PathBuf) -> Self {
        Self {
            inventory: Inventory::new(),
            file_path,
            selected: 0,
            mode: Mode::Normal,
            status: None,
        }
    }

    /// Attempt the startup load. Every outcome lands in the status footer: a
    /// missing file is simply an empty inventory, and a malformed or
    /// unreadable file leaves the inventory empty with the failure reported.
    /// Nothing here ends the session.
    pub fn load_initial(&mut self) {
        match load_records(&self.file_path) {
            Ok(Some(records)) => {
                let count = records.len();
                self.inventory.replace_all(records);
                self.set_status(
                    format!("Loaded {} from {}.", count_label(count), self.file_label()),
                    StatusKind::Info,
                );
            }
            Ok(None) => {
                self.set_status(
                    "No saved inventory found. Press 'A' to add your first CD.",
                    StatusKind::Info,
                );
            }
            Err(err) => {
                self.set_status(format!("Could not load inventory: {err}"), StatusKind::Error);
            }
        }
    }

    /// Route one key press to the handler for the current mode. Returns `true`
    /// when the session should end.
    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mut mode = mem::replace(&mut self.mode, Mode::Normal);

        mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit)?,
            Mode::AddingCd(form) => self.handle_add_cd(code, form)?,
            Mode::DeletingCd(form) => self.handle_delete_cd(code, form)?,
            Mode::ConfirmReload(confirm) => self.handle_confirm_reload(code, confirm)?,
            Mode::ConfirmSave(confirm) => self.handle_confirm_save(code, confirm)?,
        };

        self.mode = mode;
        Ok(exit)
    }

    /// The command menu. Choices are case-insensitive; keys outside the menu
    /// and the navigation set are dropped here and never reach an operation.
    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        match code {
            KeyCode::Char('x') | KeyCode::Char('X') => {
                // Exit does not prompt; unsaved changes are dropped.
                *exit = true;
            }
            KeyCode::Char('l') | KeyCode::Char('L') => {
                self.clear_status();
                return Ok(Mode::ConfirmReload(ConfirmReload));
            }
            KeyCode::Char('a') | KeyCode::Char('A') => {
                self.clear_status();
                return Ok(Mode::AddingCd(CdForm::default()));
            }
            KeyCode::Char('i') | KeyCode::Char('I') => {
                // The table is always on screen; inspect clears stale status.
                self.clear_status();
            }
            KeyCode::Char('d') | KeyCode::Char('D') => {
                if self.inventory.is_empty() {
                    self.set_status("No CDs to delete.", StatusKind::Error);
                } else {
                    self.clear_status();
                    return Ok(Mode::DeletingCd(DeleteForm::default()));
                }
            }
            KeyCode::Char('s') | KeyCode::Char('S') => {
                self.clear_status();
                return Ok(Mode::ConfirmSave(ConfirmSave {
                    record_count: self.inventory.len(),
                }));
            }
            KeyCode::Up => self.move_selection(-1),
            KeyCode::Down => self.move_selection(1),
            KeyCode::PageUp => self.move_selection(-5),
            KeyCode::PageDown => self.move_selection(5),
            KeyCode::Home => self.select_first(),
            KeyCode::End => self.select_last(),
            _ => {}
        }
        Ok(Mode::Normal)
    }

    fn handle_add_cd(&mut self, code: KeyCode, mut form: CdForm) -> Result<Mode> {
        let mut keep_open = true;
        match code {
            KeyCode::Esc => {
                self.set_status("Add cancelled.", StatusKind::Info);
                keep_open = false;
            }
            KeyCode::Tab | KeyCode::BackTab => form.toggle_field(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => match form.parse_inputs() {
                Ok((title, artist)) => {
                    let record = self.inventory.add(title, artist);
                    self.selected = self.inventory.len() - 1;
                    self.set_status(
                        format!("CD #{} added ({}).", record.id, record.display_label()),
                        StatusKind::Info,
                    );
                    keep_open = false;
                }
                Err(err) => {
                    let message = err.root_cause().to_string();
                    form.error = Some(message.clone());
                    self.set_status(message, StatusKind::Error);
                }
            },
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }

        if keep_open {
            Ok(Mode::AddingCd(form))
        } else {
            Ok(Mode::Normal)
        }
    }

    fn handle_delete_cd(&mut self, code: KeyCode, mut form: DeleteForm) -> Result<Mode> {
        let mut keep_open = true;
        match code {
            KeyCode::Esc => {
                self.set_status("Delete cancelled.", StatusKind::Info);
                keep_open = false;
            }
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => match form.parse_id() {
                Ok(id) => {
                    match self.inventory.remove(id) {
                        Some(removed) => {
                            self.clamp_selection();
                            self.set_status(
                                format!("CD #{id} ({}) deleted.", removed.display_label()),
                                StatusKind::Info,
                            );
                        }
                        None => {
                            self.set_status(format!("CD #{id} not found."), StatusKind::Error);
                        }
                    }
                    keep_open = false;
                }
                Err(err) => {
                    let message = err.root_cause().to_string();
                    form.error = Some(message.clone());
                    self.set_status(message, StatusKind::Error);
                }
            },
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }

        if keep_open {
            Ok(Mode::DeletingCd(form))
        } else {
            Ok(Mode::Normal)
        }
    }

    fn handle_confirm_reload(&mut self, code: KeyCode, confirm: ConfirmReload) -> Result<Mode> {
        match code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.set_status("Reload cancelled. Inventory NOT reloaded.", StatusKind::Info);
                Ok(Mode::Normal)
            }
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                self.reload_from_disk();
                Ok(Mode::Normal)
            }
            _ => Ok(Mode::ConfirmReload(confirm)),
        }
    }

    fn handle_confirm_save(&mut self, code: KeyCode, confirm: ConfirmSave) -> Result<Mode> {
        match code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.set_status("Inventory NOT saved to file.", StatusKind::Info);
                Ok(Mode::Normal)
            }
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                match save_records(&self.file_path, self.inventory.records()) {
                    Ok(()) => {
                        self.set_status(
                            format!(
                                "Inventory saved to {} ({}).",
                                self.file_label(),
                                count_label(self.inventory.len())
                            ),
                            StatusKind::Info,
                        );
                        Ok(Mode::Normal)
                    }
                    Err(err) => {
                        self.set_status(err.root_cause().to_string(), StatusKind::Error);
                        Ok(Mode::ConfirmSave(confirm))
                    }
                }
            }
            _ => Ok(Mode::ConfirmSave(confirm)),
        }
    }

    /// Re-populate the store from the persisted file, overwriting unsaved
    /// in-memory changes. A failed load aborts the reload and keeps the prior
    /// state intact; a missing file is "no prior data" and also leaves the
    /// store untouched.
    fn reload_from_disk(&mut self) {
        match load_records(&self.file_path) {
            Ok(Some(records)) => {
                let count = records.len();
                self.inventory.replace_all(records);
                self.clamp_selection();
                self.set_status(
                    format!("Inventory reloaded from file ({}).", count_label(count)),
                    StatusKind::Info,
                );
            }
            Ok(None) => {
                self.set_status(
                    "No saved inventory file found. Inventory unchanged.",
                    StatusKind::Info,
                );
            }
            Err(err) => {
                self.set_status(
                    format!("Reload failed, inventory unchanged: {err}"),
                    StatusKind::Error,
                );
            }
        }
    }

    fn move_selection(&mut self, offset: isize) {
        if self.inventory.is_empty() {
            return;
        }
        let len = self.inventory.len() as isize;
        let mut new = self.selected as isize + offset;
        if new < 0 {
            new = 0;
        }
        if new >= len {
            new = len - 1;
        }
        self.selected = new as usize;
    }

    fn select_first(&mut self) {
        if !self.inventory.is_empty() {
            self.selected = 0;
        }
    }

    fn select_last(&mut self) {
        if !self.inventory.is_empty() {
            self.selected = self.inventory.len() - 1;
        }
    }

    fn clamp_selection(&mut self) {
        if self.inventory.is_empty() {
            self.selected = 0;
        } else if self.selected >= self.inventory.len() {
            self.selected = self.inventory.len() - 1;
        }
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    /// Short name of the persisted file for status messages.
    fn file_label(&self) -> String {
        self.file_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.file_path.display().to_string())
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let footer_height = FOOTER_HEIGHT.min(area.height);

        let (content_area, footer_area) = if area.height > footer_height {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(footer_height)])
                .split(area);
            (chunks[0], chunks[1])
        } else {
            (area, area)
        };

        self.draw_inventory(frame, content_area);

        if area.height >= footer_height {
            self.draw_footer(frame, footer_area);
        }

        match &self.mode {
            Mode::AddingCd(form) => self.draw_cd_form(frame, area, form),
            Mode::DeletingCd(form) => self.draw_delete_form(frame, area, form),
            Mode::ConfirmReload(_) => self.draw_confirm_reload(frame, area),
            Mode::ConfirmSave(confirm) => self.draw_confirm_save(frame, area, confirm),
            Mode::Normal => {}
        }
    }

    fn draw_inventory(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().title(APP_TITLE).borders(Borders::ALL);

        if self.inventory.is_empty() {
            let message = Paragraph::new("No CDs in the inventory yet. Press 'A' to add one.")
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(message, area);
            return;
        }

        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);
        if inner.height == 0 {
            return;
        }

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0)])
            .split(inner);

        // Two leading spaces keep the header aligned with the rows, which the
        // list indents to make room for the selection marker.
        let header = Paragraph::new(Line::from(Span::styled(
            format!("  {}", header_row()),
            Style::default().add_modifier(Modifier::BOLD),
        )));
        frame.render_widget(header, chunks[0]);

        let items: Vec<ListItem> = self
            .inventory
            .records()
            .iter()
            .map(|cd| ListItem::new(inventory_row(cd)))
            .collect();

        let list = List::new(items)
            .highlight_style(Style::default().fg(Color::Yellow))
            .highlight_symbol("▶ ");

        let mut list_state = ListState::default();
        list_state.select(Some(self.selected));
        frame.render_stateful_widget(list, chunks[1], &mut list_state);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let instructions = self.footer_instructions();

        let paragraph = Paragraph::new(vec![status_line, instructions]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        match &self.mode {
            Mode::AddingCd(_) => Line::from(vec![
                Span::styled("[Enter]", key_style),
                Span::raw(" Add   "),
                Span::styled("[Tab]", key_style),
                Span::raw(" Switch Field   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Cancel"),
            ]),
            Mode::DeletingCd(_) => Line::from(vec![
                Span::styled("[Enter]", key_style),
                Span::raw(" Delete   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Cancel"),
            ]),
            Mode::ConfirmReload(_) | Mode::ConfirmSave(_) => Line::from(vec![
                Span::styled("[Y]", key_style),
                Span::raw(" Confirm   "),
                Span::styled("[N/Esc]", key_style),
                Span::raw(" Cancel"),
            ]),
            Mode::Normal => Line::from(vec![
                Span::styled("[L]", key_style),
                Span::raw(" Load   "),
                Span::styled("[A]", key_style),
                Span::raw(" Add CD   "),
                Span::styled("[I]", key_style),
                Span::raw(" Inventory   "),
                Span::styled("[D]", key_style),
                Span::raw(" Delete   "),
                Span::styled("[S]", key_style),
                Span::raw(" Save   "),
                Span::styled("[X]", key_style),
                Span::raw(" Exit   "),
                Span::styled("[↑↓]", key_style),
                Span::raw(" Select"),
            ]),
        }
    }

    fn draw_cd_form(&self, frame: &mut Frame, area: Rect, form: &CdForm) {
        let popup = popup_area(area, 60, 40);
        frame.render_widget(Clear, popup);

        let block = Block::default().title("Add CD").borders(Borders::ALL);
        frame.render_widget(block.clone(), popup);
        let inner = block.inner(popup);

        let id_line = Line::from(Span::styled(
            format!("ID: {} (assigned automatically)", self.inventory.peek_next_id()),
            Style::default().fg(Color::DarkGray),
        ));
        let title_line = form.build_line("Title", CdField::Title);
        let artist_line = form.build_line("Artist", CdField::Artist);

        let mut lines = vec![id_line, title_line, artist_line, Line::from("")];

        if let Some(error) = &form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Enter to add • Tab to switch • Esc to cancel",
                Style::default().fg(Color::Gray),
            )));
        }

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        let (cursor_x, cursor_y) = match form.active {
            CdField::Title => {
                let prefix = "Title: ".len() as u16;
                (
                    inner.x + prefix + form.value_len(CdField::Title) as u16,
                    inner.y + 1,
                )
            }
            CdField::Artist => {
                let prefix = "Artist: ".len() as u16;
                (
                    inner.x + prefix + form.value_len(CdField::Artist) as u16,
                    inner.y + 2,
                )
            }
        };
        frame.set_cursor_position((cursor_x, cursor_y));
    }

    fn draw_delete_form(&self, frame: &mut Frame, area: Rect, form: &DeleteForm) {
        let popup = popup_area(area, 60, 30);
        frame.render_widget(Clear, popup);

        let block = Block::default().title("Delete CD").borders(Borders::ALL);
        frame.render_widget(block.clone(), popup);
        let inner = block.inner(popup);

        let mut lines = vec![
            Line::from("Which ID would you like to delete?"),
            form.build_line(),
            Line::from(""),
        ];

        if let Some(error) = &form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Enter to delete • Esc to cancel",
                Style::default().fg(Color::Gray),
            )));
        }

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        let cursor_x = inner.x + "ID: ".len() as u16 + form.value_len() as u16;
        let cursor_y = inner.y + 1;
        frame.set_cursor_position((cursor_x, cursor_y));
    }

    fn draw_confirm_reload(&self, frame: &mut Frame, area: Rect) {
        let popup = popup_area(area, 60, 30);
        frame.render_widget(Clear, popup);

        let block = Block::default()
            .title("Reload Inventory")
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup);
        let inner = block.inner(popup);

        let lines = vec![
            Line::from(format!("Reload the inventory from {}?", self.file_label())),
            Line::from("WARNING: all unsaved changes will be lost."),
            Line::from(""),
            Line::from(Span::styled(
                "Press Y to confirm or N / Esc to cancel.",
                Style::default().fg(Color::Gray),
            )),
        ];

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn draw_confirm_save(&self, frame: &mut Frame, area: Rect, confirm: &ConfirmSave) {
        let popup = popup_area(area, 60, 30);
        frame.render_widget(Clear, popup);

        let block = Block::default()
            .title("Save Inventory")
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup);
        let inner = block.inner(popup);

        let lines = vec![
            Line::from(format!(
                "Save {} to {}?",
                count_label(confirm.record_count),
                self.file_label()
            )),
            Line::from("This overwrites the previous file contents."),
            Line::from(""),
            Line::from(Span::styled(
                "Press Y to confirm or N / Esc to cancel.",
                Style::default().fg(Color::Gray),
            )),
        ];

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }
}

/// `"1 CD"` / `"n CDs"` for status and dialog text.
fn count_label(count: usize) -> String {
    if count == 1 {
        "1 CD".to_string()
    } else {
        format!("{count} CDs")
    }
}
