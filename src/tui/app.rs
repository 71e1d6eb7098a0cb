use crate::config::Config;
use crate::keybindings::{Action, KeybindingMode, Keybindings};
use crate::mindmap::command::Command;
use crate::session::Visualization;
use crate::source::{DocumentEntry, read_document};
use crate::tui::theme::Theme;
use crate::tui::view::{TerminalView, ViewSettings};
use crossterm::event::KeyEvent;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Status messages disappear after this long
const STATUS_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Normal,
    Help,
    Picker,
}

impl AppMode {
    fn keybinding_mode(self) -> KeybindingMode {
        match self {
            AppMode::Normal => KeybindingMode::Normal,
            AppMode::Help => KeybindingMode::Help,
            AppMode::Picker => KeybindingMode::Picker,
        }
    }
}

pub struct App {
    pub config: Config,
    pub theme: Theme,
    pub keybindings: Keybindings,
    pub documents: Vec<DocumentEntry>,
    /// Index of the open document
    pub current: usize,
    /// The mounted document; commands only ever reach this one
    pub session: Option<Visualization<TerminalView>>,
    pub mode: AppMode,
    pub picker_index: usize,
    pub help_scroll: u16,
    pub status_message: Option<String>,
    status_set_at: Option<Instant>,
    pub should_quit: bool,
    /// Set when another document was opened, so the watcher can follow
    pub document_changed: bool,
    viewport: (u16, u16),
    settings: ViewSettings,
}

impl App {
    /// Build the app and mount `documents[initial]`.
    pub fn new(
        config: Config,
        keybindings: Keybindings,
        documents: Vec<DocumentEntry>,
        initial: usize,
    ) -> Self {
        let theme = Theme::default().with_custom_colors(&config.theme);
        let settings = ViewSettings::from(&config.ui);
        let mut app = Self {
            config,
            theme,
            keybindings,
            documents,
            current: 0,
            session: None,
            mode: AppMode::Normal,
            picker_index: 0,
            help_scroll: 0,
            status_message: None,
            status_set_at: None,
            should_quit: false,
            document_changed: false,
            viewport: (0, 0),
            settings,
        };
        app.open_document(initial);
        app
    }

    pub fn current_document(&self) -> Option<&DocumentEntry> {
        self.documents.get(self.current)
    }

    pub fn current_path(&self) -> Option<&Path> {
        self.current_document().map(|entry| entry.path.as_path())
    }

    fn new_view(&self) -> TerminalView {
        TerminalView::new(self.settings, self.viewport)
    }

    /// Swap to another document. The old session is dropped before the new
    /// one mounts; an unreadable document leaves an empty session and a
    /// status message.
    pub fn open_document(&mut self, index: usize) {
        let Some(entry) = self.documents.get(index).cloned() else {
            return;
        };
        self.current = index;
        self.document_changed = true;
        self.session = None;

        let text = match read_document(&entry) {
            Ok(text) => Some(text),
            Err(e) => {
                warn!(document = %entry.name, "cannot open document: {e}");
                self.set_status(format!("✗ {e}"));
                None
            }
        };
        self.session = Some(Visualization::mount(
            entry.name.clone(),
            text.as_deref(),
            self.new_view(),
        ));
    }

    /// Re-read the open document and rebuild its tree from scratch.
    ///
    /// On a read failure the current map stays up.
    pub fn reload(&mut self) {
        let Some(entry) = self.current_document().cloned() else {
            return;
        };
        match read_document(&entry) {
            Ok(text) => {
                self.session = None;
                self.session = Some(Visualization::mount(
                    entry.name.clone(),
                    Some(&text),
                    self.new_view(),
                ));
                info!(document = %entry.name, "reloaded");
                self.set_status(format!("✓ Reloaded {}", entry.name));
            }
            Err(e) => {
                warn!(document = %entry.name, "reload failed: {e}");
                self.set_status(format!("✗ Reload failed: {e}"));
            }
        }
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
        self.status_set_at = Some(Instant::now());
    }

    pub fn clear_expired_status_message(&mut self) {
        if self
            .status_set_at
            .is_some_and(|at| at.elapsed() >= STATUS_TIMEOUT)
        {
            self.status_message = None;
            self.status_set_at = None;
        }
    }

    /// Record the map area's size; the mounted view refits if it was waiting.
    pub fn set_viewport(&mut self, width: u16, height: u16) {
        self.viewport = (width, height);
        if let Some(session) = self.session.as_mut() {
            session.view_mut().set_viewport(width, height);
        }
    }

    /// Route a key press. In the map view the fixed command keys win over
    /// configurable bindings.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if self.mode == AppMode::Normal
            && let Some(command) = Command::from_key_event(&key)
        {
            self.keybindings.reset_sequences();
            if let Some(session) = self.session.as_mut() {
                session.handle_command(command);
            }
            return;
        }

        if let Some(action) = self.keybindings.dispatch(self.mode.keybinding_mode(), key) {
            self.handle_action(action);
        }
    }

    pub fn handle_action(&mut self, action: Action) {
        debug!(?action, mode = ?self.mode, "action");
        match action {
            Action::Quit => self.should_quit = true,
            Action::Reload => self.reload(),

            Action::ToggleHelp => {
                self.mode = if self.mode == AppMode::Help {
                    AppMode::Normal
                } else {
                    AppMode::Help
                };
                self.help_scroll = 0;
                self.keybindings.reset_sequences();
            }
            Action::HelpScrollDown => self.help_scroll = self.help_scroll.saturating_add(1),
            Action::HelpScrollUp => self.help_scroll = self.help_scroll.saturating_sub(1),

            Action::PanLeft => self.pan(-1, 0),
            Action::PanRight => self.pan(1, 0),
            Action::PanUp => self.pan(0, -1),
            Action::PanDown => self.pan(0, 1),

            Action::OpenPicker => {
                self.mode = AppMode::Picker;
                self.picker_index = self.current;
                self.keybindings.reset_sequences();
            }
            Action::PickerNext => {
                self.picker_index = wrap_next(self.picker_index, self.documents.len());
            }
            Action::PickerPrevious => {
                self.picker_index = wrap_previous(self.picker_index, self.documents.len());
            }
            Action::PickerSelect => {
                self.mode = AppMode::Normal;
                if self.picker_index != self.current {
                    self.open_document(self.picker_index);
                }
            }
            Action::ClosePicker => self.mode = AppMode::Normal,

            Action::NextDocument => self.step_document(wrap_next),
            Action::PreviousDocument => self.step_document(wrap_previous),
        }
    }

    fn pan(&mut self, dx: i32, dy: i32) {
        let step = self.config.ui.pan_step as i32;
        if let Some(session) = self.session.as_mut() {
            session.view_mut().pan_by(dx * step, dy * step);
        }
    }

    fn step_document(&mut self, step: fn(usize, usize) -> usize) {
        if self.documents.len() < 2 {
            self.set_status("Only one document");
            return;
        }
        self.open_document(step(self.current, self.documents.len()));
    }
}

fn wrap_next(index: usize, len: usize) -> usize {
    if len == 0 { 0 } else { (index + 1) % len }
}

fn wrap_previous(index: usize, len: usize) -> usize {
    if len == 0 {
        0
    } else {
        (index + len - 1) % len
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SourceConfig;
    use crate::source::DocumentSource;
    use crossterm::event::{KeyCode, KeyEventKind, KeyEventState, KeyModifiers};
    use std::fs;

    fn key(c: char) -> KeyEvent {
        KeyEvent {
            code: KeyCode::Char(c),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn code(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn app_for(dir: &Path) -> App {
        let documents = DocumentSource::open(dir)
            .unwrap()
            .documents(&SourceConfig::default())
            .unwrap();
        let mut app = App::new(Config::default(), Keybindings::default(), documents, 0);
        app.set_viewport(80, 24);
        app
    }

    fn notes() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("a.md"),
            "# A\n## one\n- x\n  - y\n## two\n",
        )
        .unwrap();
        fs::write(dir.path().join("b.md"), "- only\n").unwrap();
        dir
    }

    fn visible(app: &App) -> usize {
        app.session
            .as_ref()
            .and_then(|s| s.map())
            .map(|m| m.visible_count())
            .unwrap_or(0)
    }

    fn nodes(app: &App) -> usize {
        app.session
            .as_ref()
            .and_then(|s| s.map())
            .map(|m| m.node_count())
            .unwrap_or(0)
    }

    #[test]
    fn test_command_keys_fold_the_map() {
        let dir = notes();
        let mut app = app_for(dir.path());
        // headings arrive folded
        assert_eq!(visible(&app), 1);

        app.handle_key(key(','));
        assert_eq!(visible(&app), 5);

        app.handle_key(key('1'));
        assert_eq!(visible(&app), 1);

        app.handle_key(key(','));
        assert_eq!(visible(&app), 5);

        app.handle_key(key('3'));
        assert_eq!(visible(&app), 4);
    }

    #[test]
    fn test_zoom_keys_rescale_the_view() {
        let dir = notes();
        let mut app = app_for(dir.path());
        let fitted = app.session.as_ref().unwrap().view().scale();

        app.handle_key(key('-'));
        let zoomed = app.session.as_ref().unwrap().view().scale();
        assert!(zoomed < fitted);

        app.handle_key(key(' '));
        assert_eq!(app.session.as_ref().unwrap().view().scale(), fitted);
    }

    #[test]
    fn test_pan_keys_move_the_camera() {
        let dir = notes();
        let mut app = app_for(dir.path());
        let (x, y) = app.session.as_ref().unwrap().view().center();

        app.handle_key(key('l'));
        app.handle_key(key('j'));
        let (nx, ny) = app.session.as_ref().unwrap().view().center();
        assert!(nx > x);
        assert!(ny > y);
    }

    #[test]
    fn test_document_switching() {
        let dir = notes();
        let mut app = app_for(dir.path());
        assert_eq!(app.current_document().unwrap().name, "a.md");

        app.handle_key(key('n'));
        assert_eq!(app.current_document().unwrap().name, "b.md");
        assert_eq!(visible(&app), 1);
        assert!(app.document_changed);

        app.handle_key(key('n'));
        assert_eq!(app.current_document().unwrap().name, "a.md");
        app.handle_key(key('p'));
        assert_eq!(app.current_document().unwrap().name, "b.md");
    }

    #[test]
    fn test_picker_flow() {
        let dir = notes();
        let mut app = app_for(dir.path());
        app.handle_key(key(','));

        app.handle_key(key('o'));
        assert_eq!(app.mode, AppMode::Picker);
        assert_eq!(app.picker_index, 0);

        // command keys are not active while the picker is open
        app.handle_key(key('1'));
        assert_eq!(visible(&app), 5);

        app.handle_key(key('j'));
        app.handle_key(code(KeyCode::Enter));
        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.current, 1);

        app.handle_key(key('o'));
        app.handle_key(code(KeyCode::Esc));
        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.current, 1);
    }

    #[test]
    fn test_help_toggle_and_scroll() {
        let dir = notes();
        let mut app = app_for(dir.path());

        app.handle_key(key('?'));
        assert_eq!(app.mode, AppMode::Help);
        app.handle_key(key('j'));
        app.handle_key(key('j'));
        app.handle_key(key('k'));
        assert_eq!(app.help_scroll, 1);

        app.handle_key(code(KeyCode::Esc));
        assert_eq!(app.mode, AppMode::Normal);
        assert!(!app.should_quit);

        app.handle_key(key('q'));
        assert!(app.should_quit);
    }

    #[test]
    fn test_reload_rebuilds_from_disk() {
        let dir = notes();
        let mut app = app_for(dir.path());
        app.handle_key(key(','));
        assert_eq!(visible(&app), 5);

        fs::write(dir.path().join("a.md"), "# A\n## one\n## two\n## three\n").unwrap();
        app.handle_key(key('r'));
        assert_eq!(nodes(&app), 4);
        assert_eq!(visible(&app), 1);
        assert!(app.status_message.as_deref().unwrap().contains("Reloaded"));
    }

    #[test]
    fn test_unreadable_document_is_a_status_message() {
        let dir = notes();
        let mut app = app_for(dir.path());
        fs::remove_file(dir.path().join("b.md")).unwrap();

        app.handle_key(key('n'));
        assert_eq!(app.current, 1);
        assert!(app.session.as_ref().unwrap().map().is_none());
        assert!(app.status_message.as_deref().unwrap().starts_with('✗'));

        // commands on an empty session do nothing
        app.handle_key(key('1'));
        assert!(!app.should_quit);
    }

    #[test]
    fn test_reload_failure_keeps_current_map() {
        let dir = notes();
        let mut app = app_for(dir.path());
        fs::remove_file(dir.path().join("a.md")).unwrap();

        app.reload();
        assert_eq!(nodes(&app), 5);
        assert!(app.status_message.as_deref().unwrap().contains("Reload failed"));
    }

    #[test]
    fn test_single_document_cannot_step() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("solo.md"), "- a\n").unwrap();
        let mut app = app_for(dir.path());
        app.handle_key(key('n'));
        assert_eq!(app.current, 0);
        assert_eq!(app.status_message.as_deref(), Some("Only one document"));
    }

    #[test]
    fn test_wrapping() {
        assert_eq!(wrap_next(2, 3), 0);
        assert_eq!(wrap_previous(0, 3), 2);
        assert_eq!(wrap_next(0, 0), 0);
        assert_eq!(wrap_previous(0, 0), 0);
    }
}
