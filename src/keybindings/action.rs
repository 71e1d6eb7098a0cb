//! Action definitions for keybindings
//!
//! Shell actions only. Fold, level and zoom commands are fixed single keys
//! handled by [`crate::mindmap::command::Command`].

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// All bindable actions in foldmap
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[serde(rename_all = "PascalCase")]
#[strum(serialize_all = "PascalCase")]
pub enum Action {
    // === Application ===
    /// Quit the application
    Quit,
    /// Re-read the current document from disk
    Reload,

    // === Help ===
    /// Toggle help popup
    ToggleHelp,
    /// Scroll help popup down
    HelpScrollDown,
    /// Scroll help popup up
    HelpScrollUp,

    // === Viewport ===
    PanLeft,
    PanRight,
    PanUp,
    PanDown,

    // === Documents ===
    /// Open the document picker
    OpenPicker,
    /// Move to next document in picker
    PickerNext,
    /// Move to previous document in picker
    PickerPrevious,
    /// Open the selected document
    PickerSelect,
    /// Close the picker without switching
    ClosePicker,
    /// Switch to the next document of the source
    NextDocument,
    /// Switch to the previous document of the source
    PreviousDocument,
}

impl Action {
    /// Get a human-readable description of the action
    pub fn description(&self) -> &'static str {
        match self {
            Action::Quit => "Quit",
            Action::Reload => "Reload document",

            Action::ToggleHelp => "Toggle help",
            Action::HelpScrollDown => "Scroll help down",
            Action::HelpScrollUp => "Scroll help up",

            Action::PanLeft => "Pan left",
            Action::PanRight => "Pan right",
            Action::PanUp => "Pan up",
            Action::PanDown => "Pan down",

            Action::OpenPicker => "Open document picker",
            Action::PickerNext => "Next document in list",
            Action::PickerPrevious => "Previous document in list",
            Action::PickerSelect => "Open selected document",
            Action::ClosePicker => "Close picker",
            Action::NextDocument => "Next document",
            Action::PreviousDocument => "Previous document",
        }
    }

    /// Get the category for grouping in help display
    pub fn category(&self) -> &'static str {
        match self {
            Action::Quit | Action::Reload => "Application",

            Action::ToggleHelp | Action::HelpScrollDown | Action::HelpScrollUp => "Help",

            Action::PanLeft | Action::PanRight | Action::PanUp | Action::PanDown => "Viewport",

            Action::OpenPicker
            | Action::PickerNext
            | Action::PickerPrevious
            | Action::PickerSelect
            | Action::ClosePicker
            | Action::NextDocument
            | Action::PreviousDocument => "Documents",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_action_names_round_trip() {
        for action in Action::iter() {
            let name = action.to_string();
            assert_eq!(Action::from_str(&name), Ok(action));
        }
    }

    #[test]
    fn test_every_action_is_described() {
        for action in Action::iter() {
            assert!(!action.description().is_empty(), "{action}");
            assert!(!action.category().is_empty(), "{action}");
        }
    }

    #[test]
    fn test_serde_uses_pascal_case() {
        #[derive(Deserialize)]
        struct Binding {
            action: Action,
        }

        let binding: Binding = toml::from_str("action = \"PanLeft\"").unwrap();
        assert_eq!(binding.action, Action::PanLeft);
    }
}
