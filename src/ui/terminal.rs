use std::io::{self, Stdout};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use super::app::App;

/// How long one poll for input waits before the screen is redrawn anyway.
const TICK: Duration = Duration::from_millis(250);

/// Run the interactive session. The terminal is switched into raw mode on the
/// alternate screen for the duration; once the session is open, the guard
/// restores the terminal on every exit path, error returns from the loop
/// included.
pub fn run_app(app: &mut App) -> Result<()> {
    let mut session = TerminalSession::open()?;
    session.event_loop(app)
}

/// Owns the live Ratatui handle and the raw-mode/alternate-screen state that
/// comes with it.
struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalSession {
    fn open() -> Result<Self> {
        enable_raw_mode().context("could not switch the terminal into raw mode")?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).context("could not enter the alternate screen")?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))
            .context("could not initialize the terminal backend")?;
        Ok(Self { terminal })
    }

    /// Draw, wait up to one tick for input, dispatch, repeat until the app
    /// asks to exit.
    fn event_loop(&mut self, app: &mut App) -> Result<()> {
        loop {
            self.terminal
                .draw(|frame| app.draw(frame))
                .context("drawing the screen failed")?;

            if !event::poll(TICK).context("polling for input failed")? {
                continue;
            }

            match event::read().context("reading input failed")? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if app.handle_key(key.code)? {
                        return Ok(());
                    }
                }
                _ => {}
            }
        }
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        // Best effort; the session is over either way.
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}
