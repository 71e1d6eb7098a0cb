//! Interactive terminal shell around the mind map.

mod app;
mod help_text;
pub mod map_layout;
pub mod theme;
mod ui;
pub mod view;
mod watcher;

pub use app::{App, AppMode};
pub use theme::Theme;
pub use view::{TerminalView, ViewSettings};
pub use watcher::FileWatcher;

use color_eyre::Result;
use crossterm::ExecutableCommand;
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::DefaultTerminal;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::io::{self, stdout};
use std::time::Duration;
use tracing::{debug, warn};

/// Put the terminal into raw mode on the alternate screen, run the app, and
/// restore the terminal whatever the outcome.
pub fn run_app(app: App) -> Result<()> {
    let _guard = TerminalGuard::enter()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    run(&mut terminal, app)
}

/// Raw mode and the alternate screen, left again on drop.
struct TerminalGuard {
    restore: fn(),
}

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        Self::enter_with(
            enable_raw_mode,
            || stdout().execute(EnterAlternateScreen).map(|_| ()),
            restore_terminal,
        )
    }

    /// The guard exists as soon as raw mode is on, so a failure entering
    /// the alternate screen still restores the terminal.
    fn enter_with(
        raw_mode: impl FnOnce() -> io::Result<()>,
        alternate_screen: impl FnOnce() -> io::Result<()>,
        restore: fn(),
    ) -> io::Result<Self> {
        raw_mode()?;
        let guard = Self { restore };
        alternate_screen()?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        (self.restore)();
    }
}

fn restore_terminal() {
    if let Err(e) = stdout().execute(LeaveAlternateScreen) {
        warn!("cannot leave alternate screen: {e}");
    }
    if let Err(e) = disable_raw_mode() {
        warn!("cannot disable raw mode: {e}");
    }
}

/// Run the TUI event loop until the user quits.
///
/// Draws, then waits up to 100 ms for a key. Idle ticks drain the file
/// watcher and reload the open document when it changed on disk.
pub fn run(terminal: &mut DefaultTerminal, mut app: App) -> Result<()> {
    let mut file_watcher = match FileWatcher::new() {
        Ok(watcher) => Some(watcher),
        Err(e) => {
            warn!("live reload disabled: {e}");
            None
        }
    };

    loop {
        app.clear_expired_status_message();
        terminal.draw(|frame| ui::render(frame, &mut app))?;

        if app.should_quit {
            break;
        }

        if app.document_changed {
            app.document_changed = false;
            if let (Some(watcher), Some(path)) = (file_watcher.as_mut(), app.current_path())
                && let Err(e) = watcher.watch(path)
            {
                warn!(path = %path.display(), "cannot watch document: {e}");
            }
        }

        if !event::poll(Duration::from_millis(100))? {
            if let Some(watcher) = file_watcher.as_mut()
                && watcher.check_for_changes()
            {
                debug!("document changed on disk");
                app.reload();
            }
            continue;
        }

        // resizes need nothing here: the next draw picks up the new size
        if let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            app.handle_key(key);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    static RESTORED: AtomicUsize = AtomicUsize::new(0);

    fn count_restore() {
        RESTORED.fetch_add(1, Ordering::SeqCst);
    }

    #[test]
    fn test_terminal_guard_restores_on_every_path() {
        let guard = TerminalGuard::enter_with(|| Ok(()), || Ok(()), count_restore).unwrap();
        assert_eq!(RESTORED.load(Ordering::SeqCst), 0);
        drop(guard);
        assert_eq!(RESTORED.load(Ordering::SeqCst), 1);

        // alternate screen fails after raw mode is on
        let result = TerminalGuard::enter_with(
            || Ok(()),
            || Err(io::Error::other("no alternate screen")),
            count_restore,
        );
        assert!(result.is_err());
        assert_eq!(RESTORED.load(Ordering::SeqCst), 2);

        // raw mode never turned on: nothing to restore
        let result = TerminalGuard::enter_with(
            || Err(io::Error::other("not a tty")),
            || Ok(()),
            count_restore,
        );
        assert!(result.is_err());
        assert_eq!(RESTORED.load(Ordering::SeqCst), 2);
    }
}
