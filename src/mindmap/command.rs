//! Single-key command language over a mind map.
//!
//! [`Command::from_key_event`] is the complete key table; [`dispatch`]
//! applies a command to the current tree and drives the [`View`].

use super::MindMap;
use super::visibility::{fold_recursive, show_to_depth, toggle_root_fold, unfold_recursive};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::debug;

/// Zoom factor applied by [`Command::ZoomIn`]
pub const ZOOM_IN_FACTOR: f64 = 1.25;
/// Zoom factor applied by [`Command::ZoomOut`]
pub const ZOOM_OUT_FACTOR: f64 = 0.8;

/// Render boundary consumed by the dispatcher.
///
/// Implementations paint a tree, change zoom, and fit the visible tree into
/// their viewport. Return values are never needed.
pub trait View {
    /// Recompute layout from the tree's current fold state and repaint.
    fn render_data(&mut self, map: &MindMap);

    /// Multiply the current zoom by `factor`, keeping the viewport center.
    fn rescale(&mut self, factor: f64);

    /// Pan and zoom so the visible tree fills the viewport.
    fn fit(&mut self);

    /// Release resources held for the current document.
    fn destroy(&mut self) {}
}

/// Commands reachable from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// `,` unfold the whole tree
    UnfoldAll,
    /// `1` or `.` fold the whole tree
    FoldAll,
    /// `2`-`7` fold everything, then reveal down to the given level
    ShowLevel(u8),
    /// `=` or `+`
    ZoomIn,
    /// `-`
    ZoomOut,
    /// `9` hide or show everything below the root
    ToggleRoot,
    /// `0` or space
    Fit,
}

impl Command {
    /// Map a typed character to its command.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            ',' => Some(Command::UnfoldAll),
            '1' | '.' => Some(Command::FoldAll),
            '2'..='7' => c.to_digit(10).map(|level| Command::ShowLevel(level as u8)),
            '=' | '+' => Some(Command::ZoomIn),
            '-' => Some(Command::ZoomOut),
            '9' => Some(Command::ToggleRoot),
            '0' | ' ' => Some(Command::Fit),
            _ => None,
        }
    }

    /// Map a key event to its command.
    ///
    /// Keys held with Ctrl, Alt or Super are never commands. Shift is
    /// accepted since most terminals report `+` as a shifted key.
    pub fn from_key_event(key: &KeyEvent) -> Option<Self> {
        if !key.modifiers.difference(KeyModifiers::SHIFT).is_empty() {
            return None;
        }
        match key.code {
            KeyCode::Char(c) => Self::from_char(c),
            _ => None,
        }
    }

    /// Whether the dispatcher finishes this command with render + fit.
    /// Zoom only rescales.
    pub fn rerenders(&self) -> bool {
        !matches!(self, Command::ZoomIn | Command::ZoomOut)
    }
}

/// Apply `command` to the current tree.
///
/// Returns `false` without touching the view when there is no tree.
/// Every command except zoom ends with exactly one [`View::render_data`]
/// followed by one [`View::fit`]; zoom only rescales.
pub fn dispatch<V: View + ?Sized>(
    command: Command,
    map: Option<&mut MindMap>,
    view: &mut V,
) -> bool {
    let Some(map) = map else {
        debug!(?command, "no mind map loaded, ignoring command");
        return false;
    };
    debug!(?command, "dispatching command");

    match command {
        Command::UnfoldAll => unfold_recursive(map.root_mut()),
        Command::FoldAll => fold_recursive(map.root_mut()),
        Command::ShowLevel(level) => {
            fold_recursive(map.root_mut());
            show_to_depth(map.root_mut(), level as usize);
        }
        Command::ZoomIn => view.rescale(ZOOM_IN_FACTOR),
        Command::ZoomOut => view.rescale(ZOOM_OUT_FACTOR),
        Command::ToggleRoot => {
            let folded = toggle_root_fold(map);
            debug!(folded, "root fold toggled");
        }
        Command::Fit => view.fit(),
    }

    if command.rerenders() {
        view.render_data(map);
        view.fit();
    }
    true
}

/// A view that paints nothing, for headless runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct DetachedView;

impl View for DetachedView {
    fn render_data(&mut self, _: &MindMap) {}

    fn rescale(&mut self, _: f64) {}

    fn fit(&mut self) {}
}

/// Apply the command keys of `keys` in order, skipping other characters.
/// Returns how many commands ran.
pub fn replay<V: View + ?Sized>(keys: &str, map: &mut MindMap, view: &mut V) -> usize {
    keys.chars()
        .filter_map(Command::from_char)
        .filter(|command| dispatch(*command, Some(&mut *map), view))
        .count()
}
