//! Default keybindings for foldmap
//!
//! Uses keybinds-rs key string syntax. None of these keys overlap the fixed
//! fold/zoom command keys (`,` `.` `0`-`9` `=` `+` `-` and space).

use super::{Action, KeybindingMode, Keybindings};

/// Create the default keybindings configuration
pub fn default_keybindings() -> Keybindings {
    let mut kb = Keybindings::new();
    add_defaults(&mut kb);
    kb
}

/// Add every default binding whose key is still free.
pub(super) fn add_defaults(kb: &mut Keybindings) {
    add_normal_mode(kb);
    add_help_mode(kb);
    add_picker_mode(kb);
}

/// Bind a key, panicking on invalid key syntax (only used for built-in defaults)
fn bind(kb: &mut Keybindings, mode: KeybindingMode, key: &str, action: Action) {
    if kb.is_bound(mode, key) {
        return;
    }
    kb.bind(mode, key, action)
        .unwrap_or_else(|e| panic!("Invalid default keybinding '{}': {}", key, e));
}

fn add_normal_mode(kb: &mut Keybindings) {
    use Action::*;
    use KeybindingMode::Normal;

    // Viewport
    bind(kb, Normal, "h", PanLeft);
    bind(kb, Normal, "Left", PanLeft);
    bind(kb, Normal, "l", PanRight);
    bind(kb, Normal, "Right", PanRight);
    bind(kb, Normal, "k", PanUp);
    bind(kb, Normal, "Up", PanUp);
    bind(kb, Normal, "j", PanDown);
    bind(kb, Normal, "Down", PanDown);

    // Documents
    bind(kb, Normal, "o", OpenPicker);
    bind(kb, Normal, "Tab", OpenPicker);
    bind(kb, Normal, "n", NextDocument);
    bind(kb, Normal, "N", PreviousDocument);
    bind(kb, Normal, "p", PreviousDocument);
    bind(kb, Normal, "r", Reload);

    bind(kb, Normal, "?", ToggleHelp);

    bind(kb, Normal, "q", Quit);
    bind(kb, Normal, "Escape", Quit);
    bind(kb, Normal, "Ctrl+c", Quit);
}

fn add_help_mode(kb: &mut Keybindings) {
    use Action::*;
    use KeybindingMode::Help;

    bind(kb, Help, "j", HelpScrollDown);
    bind(kb, Help, "Down", HelpScrollDown);
    bind(kb, Help, "k", HelpScrollUp);
    bind(kb, Help, "Up", HelpScrollUp);

    bind(kb, Help, "?", ToggleHelp);
    bind(kb, Help, "Escape", ToggleHelp);
    bind(kb, Help, "q", ToggleHelp);

    bind(kb, Help, "Ctrl+c", Quit);
}

fn add_picker_mode(kb: &mut Keybindings) {
    use Action::*;
    use KeybindingMode::Picker;

    bind(kb, Picker, "j", PickerNext);
    bind(kb, Picker, "Down", PickerNext);
    bind(kb, Picker, "k", PickerPrevious);
    bind(kb, Picker, "Up", PickerPrevious);
    bind(kb, Picker, "Enter", PickerSelect);

    bind(kb, Picker, "Escape", ClosePicker);
    bind(kb, Picker, "q", ClosePicker);
    bind(kb, Picker, "o", ClosePicker);

    bind(kb, Picker, "Ctrl+c", Quit);
}
