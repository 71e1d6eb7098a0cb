//! Customizable keybindings for foldmap
//!
//! Shell actions (quit, pan, help, document switching) are bound per mode
//! and can be overridden from the config file. The fold and zoom command keys
//! are a fixed table checked before these bindings in normal mode.
//!
//! # Architecture
//!
//! - [`Action`] - All bindable actions in the application
//! - [`KeybindingMode`] - Different modes with their own keybinding sets
//! - [`Keybindings`] - The complete keybinding configuration (backed by keybinds-rs)
//!
//! # Configuration
//!
//! ```toml
//! [keybindings.Normal]
//! "a" = "PanLeft"
//! "Ctrl+q" = "Quit"
//!
//! [keybindings.Picker]
//! "Space" = "PickerSelect"
//! ```

mod action;
mod defaults;

pub use action::Action;

use crate::error::{Error, Result};
use crossterm::event::KeyEvent;
use keybinds::Keybinds;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Application modes that have their own keybinding sets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum KeybindingMode {
    /// Mind map is shown
    Normal,
    /// Help popup is shown
    Help,
    /// Document picker is shown
    Picker,
}

impl KeybindingMode {
    pub fn display_name(&self) -> &'static str {
        match self {
            KeybindingMode::Normal => "Normal",
            KeybindingMode::Help => "Help",
            KeybindingMode::Picker => "Documents",
        }
    }
}

/// Complete keybinding configuration
///
/// Wraps keybinds-rs dispatchers with mode-based organization.
#[derive(Debug)]
pub struct Keybindings {
    bindings: HashMap<KeybindingMode, Keybinds<Action>>,
    /// Key strings already bound, per mode
    bound: HashSet<(KeybindingMode, String)>,
}

impl Default for Keybindings {
    fn default() -> Self {
        defaults::default_keybindings()
    }
}

impl Keybindings {
    /// Create empty keybindings
    pub fn new() -> Self {
        Self {
            bindings: HashMap::new(),
            bound: HashSet::new(),
        }
    }

    /// Whether `key_sequence` already has an action in `mode`
    pub fn is_bound(&self, mode: KeybindingMode, key_sequence: &str) -> bool {
        self.bound.contains(&(mode, key_sequence.to_string()))
    }

    /// Get the action for a key event in a specific mode
    pub fn dispatch(&mut self, mode: KeybindingMode, event: KeyEvent) -> Option<Action> {
        self.bindings
            .get_mut(&mode)
            .and_then(|kb| kb.dispatch(event).copied())
    }

    /// Reset any in-progress key sequences (call when switching modes)
    pub fn reset_sequences(&mut self) {
        for kb in self.bindings.values_mut() {
            kb.reset();
        }
    }

    /// Bind a key sequence to an action in a mode
    pub fn bind(
        &mut self,
        mode: KeybindingMode,
        key_sequence: &str,
        action: Action,
    ) -> std::result::Result<(), keybinds::Error> {
        self.bindings
            .entry(mode)
            .or_default()
            .bind(key_sequence, action)?;
        self.bound.insert((mode, key_sequence.to_string()));
        Ok(())
    }

    /// Get all keys bound to an action in a mode
    pub fn keys_for_action(&self, mode: KeybindingMode, action: Action) -> Vec<String> {
        self.bindings
            .get(&mode)
            .map(|kb| {
                kb.as_slice()
                    .iter()
                    .filter(|bind| bind.action == action)
                    .map(|bind| format_key_sequence(&bind.seq))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Generate help entries for a mode (action -> keys), grouped by category
    pub fn help_entries(&self, mode: KeybindingMode) -> Vec<(Action, Vec<String>)> {
        let mut action_keys: HashMap<Action, Vec<String>> = HashMap::new();

        if let Some(kb) = self.bindings.get(&mode) {
            for bind in kb.as_slice() {
                action_keys
                    .entry(bind.action)
                    .or_default()
                    .push(format_key_sequence(&bind.seq));
            }
        }

        let mut entries: Vec<_> = action_keys.into_iter().collect();
        entries.sort_by(|a, b| {
            a.0.category()
                .cmp(b.0.category())
                .then(a.0.description().cmp(b.0.description()))
        });
        entries
    }

    /// Bind every entry of a user config.
    pub fn merge(&mut self, other: &KeybindingsConfig) -> Result<()> {
        for (mode, mode_bindings) in &other.0 {
            for (key_str, action) in mode_bindings {
                self.bind(*mode, key_str, *action)
                    .map_err(|e| Error::Keybinding {
                        key: key_str.clone(),
                        action: action.to_string(),
                        message: e.to_string(),
                    })?;
            }
        }
        Ok(())
    }
}

/// Format a key sequence for display
fn format_key_sequence(seq: &keybinds::KeySeq) -> String {
    seq.as_slice()
        .iter()
        .map(format_key_input)
        .collect::<Vec<_>>()
        .join(" ")
}

fn format_key_input(input: &keybinds::KeyInput) -> String {
    let mut parts = Vec::new();

    let mods = input.mods();
    if mods.contains(keybinds::Mods::CTRL) {
        parts.push("C");
    }
    if mods.contains(keybinds::Mods::ALT) {
        parts.push("A");
    }

    let key_str = format_key(input.key());
    parts.push(&key_str);

    if parts.len() == 1 {
        key_str
    } else {
        parts.join("-")
    }
}

fn format_key(key: keybinds::Key) -> String {
    use keybinds::Key;
    match key {
        Key::Char(' ') => "Spc".to_string(),
        Key::Char(c) => c.to_string(),
        Key::Enter => "Ret".to_string(),
        Key::Esc => "Esc".to_string(),
        Key::Tab => "Tab".to_string(),
        Key::Backspace => "BS".to_string(),
        Key::Up => "↑".to_string(),
        Key::Down => "↓".to_string(),
        Key::Left => "←".to_string(),
        Key::Right => "→".to_string(),
        Key::PageUp => "PgU".to_string(),
        Key::PageDown => "PgD".to_string(),
        Key::Home => "Home".to_string(),
        Key::End => "End".to_string(),
        _ => "?".to_string(),
    }
}

/// Configuration format for keybindings (uses string keys for TOML compatibility)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KeybindingsConfig(pub HashMap<KeybindingMode, HashMap<String, Action>>);

impl KeybindingsConfig {
    /// Defaults with the user's overrides applied.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Keybinding`] for the first key string keybinds-rs
    /// cannot parse.
    pub fn to_keybindings(&self) -> Result<Keybindings> {
        // user keys go in first; defaults then skip every key already taken
        let mut keybindings = Keybindings::new();
        keybindings.merge(self)?;
        defaults::add_defaults(&mut keybindings);
        Ok(keybindings)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
