//! Binary entry point that glues the record store to the TUI: resolve where
//! the inventory persists, attempt the startup load, and drive the Ratatui
//! event loop until the user exits.

use cd_inventory_manager::{inventory_file_path, run_app, App};

/// Returning a `Result` bubbles up fatal initialization problems (an
/// unresolvable working directory, a terminal that cannot enter raw mode) to
/// the shell with a diagnostic. Everything else, including a missing or
/// malformed inventory file, is reported inside the running application.
fn main() -> anyhow::Result<()> {
    let path = inventory_file_path()?;

    let mut app = App::new(path);
    app.load_initial();
    run_app(&mut app)
}
