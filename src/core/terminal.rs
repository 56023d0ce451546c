//! Terminal session and event loop for dirnav.
//!
//! [TerminalSession] owns the raw-mode/alternate-screen terminal for the lifetime of the app
//! and restores it on drop. External programs run inside a [Suspended] scope which hands the
//! screen back to the shell and re-acquires it on every exit path.

use crate::app::{AppState, KeypressResult};
use crate::core::error::OpError;
use crate::core::proc::{ExternalCommand, run_foreground};
use crate::ui;

use crossterm::{
    cursor::{Hide, Show},
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::{debug, warn};

use std::io::{self, Stdout};
use std::process::ExitStatus;

type Term = Terminal<CrosstermBackend<Stdout>>;

/// The single owned terminal handle.
pub struct TerminalSession {
    terminal: Term,
}

impl TerminalSession {
    /// Enters raw mode and the alternate screen.
    ///
    /// On a partial failure the terminal is restored before the error is returned.
    pub fn start() -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen, Hide) {
            restore_terminal();
            return Err(e);
        }
        match Terminal::new(CrosstermBackend::new(stdout)) {
            Ok(terminal) => Ok(TerminalSession { terminal }),
            Err(e) => {
                restore_terminal();
                Err(e)
            }
        }
    }

    /// Draws, reads one key, dispatches it, and repeats until the app quits.
    pub fn run(&mut self, app: &mut AppState) -> io::Result<()> {
        self.draw(app)?;
        loop {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    match app.handle_keypress(key) {
                        KeypressResult::Quit => break,
                        KeypressResult::Launch(cmd) => {
                            let outcome = self.launch(&cmd);
                            app.finish_launch(&cmd, outcome);
                        }
                        KeypressResult::Continue | KeypressResult::Consumed => {}
                    }
                    self.draw(app)?;
                }
                Event::Resize(w, h) => {
                    debug!(w, h, "resize");
                    self.draw(app)?;
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn draw(&mut self, app: &mut AppState) -> io::Result<()> {
        self.terminal.draw(|f| ui::render(f, app))?;
        Ok(())
    }

    /// Runs an external program with the terminal released.
    fn launch(&mut self, cmd: &ExternalCommand) -> Result<ExitStatus, OpError> {
        let _suspended = Suspended::enter(&mut self.terminal).map_err(|e| {
            warn!(error = %e, "could not release terminal");
            OpError::IoError(e)
        })?;
        run_foreground(cmd)
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        restore_terminal();
    }
}

/// Scoped release of the terminal. Dropping it takes the screen back.
struct Suspended<'a> {
    terminal: &'a mut Term,
}

impl<'a> Suspended<'a> {
    fn enter(terminal: &'a mut Term) -> io::Result<Self> {
        // Built first so a failure halfway still re-acquires on drop.
        let guard = Suspended { terminal };
        disable_raw_mode()?;
        execute!(io::stdout(), LeaveAlternateScreen, Show)?;
        Ok(guard)
    }
}

impl Drop for Suspended<'_> {
    fn drop(&mut self) {
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen, Hide) {
            warn!(error = %e, "could not re-enter alternate screen");
        }
        if let Err(e) = enable_raw_mode() {
            warn!(error = %e, "could not re-enable raw mode");
        }
        // Force a full repaint: the child scribbled over the screen buffer.
        if let Err(e) = self.terminal.clear() {
            warn!(error = %e, "could not clear terminal");
        }
    }
}

/// Leaves raw mode and the alternate screen, ignoring errors.
///
/// Safe to call more than once. Used by drop and by the panic hook.
pub fn restore_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen, Show);
}
