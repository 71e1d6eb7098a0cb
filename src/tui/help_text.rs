use crate::keybindings::{KeybindingMode, Keybindings};
use crate::tui::theme::Theme;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use std::borrow::Cow;

/// Key column width for keybindings
const KEY_COLUMN_WIDTH: usize = 11;

#[derive(Debug, Clone)]
pub enum HelpLine {
    Title(&'static str),
    Description(&'static str),
    SectionHeader(&'static str),
    KeyBinding {
        key: Cow<'static, str>,
        desc: Cow<'static, str>,
    },
    Note(&'static str),
    Blank,
}

impl HelpLine {
    /// Convert this help line to a styled ratatui Line
    pub fn to_line(&self, theme: &Theme) -> Line<'static> {
        match self {
            HelpLine::Title(text) => Line::from(vec![Span::styled(
                text.to_string(),
                Style::default()
                    .fg(theme.modal_title())
                    .add_modifier(Modifier::BOLD),
            )]),
            HelpLine::Description(text) => Line::from(vec![Span::styled(
                text.to_string(),
                Style::default()
                    .fg(theme.modal_description())
                    .add_modifier(Modifier::ITALIC),
            )]),
            HelpLine::SectionHeader(text) => Line::from(vec![Span::styled(
                text.to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            )]),
            HelpLine::KeyBinding { key, desc } => {
                let formatted_key = format!("  {:<width$}", key, width = KEY_COLUMN_WIDTH);
                Line::from(vec![
                    Span::styled(formatted_key, Style::default().fg(theme.modal_key_fg())),
                    Span::raw(desc.to_string()),
                ])
            }
            HelpLine::Note(text) => Line::from(vec![
                Span::styled(
                    "Note: ".to_string(),
                    Style::default()
                        .fg(theme.modal_selected_marker())
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    text.to_string(),
                    Style::default().fg(theme.modal_description()),
                ),
            ]),
            HelpLine::Blank => Line::from(""),
        }
    }
}

const fn title(text: &'static str) -> HelpLine {
    HelpLine::Title(text)
}

const fn description(text: &'static str) -> HelpLine {
    HelpLine::Description(text)
}

const fn section(text: &'static str) -> HelpLine {
    HelpLine::SectionHeader(text)
}

const fn keybinding(key: &'static str, desc: &'static str) -> HelpLine {
    HelpLine::KeyBinding {
        key: Cow::Borrowed(key),
        desc: Cow::Borrowed(desc),
    }
}

const fn note(text: &'static str) -> HelpLine {
    HelpLine::Note(text)
}

const fn blank() -> HelpLine {
    HelpLine::Blank
}

/// Fixed fold and zoom keys, always checked first in the map view
pub const COMMAND_LINES: &[HelpLine] = &[
    title("foldmap - Keyboard Shortcuts"),
    description("Use j/k or ↓/↑ to scroll | Press Esc or ? to close"),
    blank(),
    section("Fold & Zoom"),
    keybinding(",", "Unfold everything"),
    keybinding("1 .", "Fold everything"),
    keybinding("2-7", "Show levels above the digit (3: levels 1-2)"),
    keybinding("9", "Hide/show everything below the root"),
    keybinding("= +", "Zoom in"),
    keybinding("-", "Zoom out"),
    keybinding("0 Spc", "Fit map to window"),
    blank(),
];

const FOOTER_LINES: &[HelpLine] = &[
    note("Fold keys are fixed; the other keys can be changed under [keybindings] in config.toml"),
    blank(),
    description("Use j/k or ↓/↑ to scroll | Press Esc or ? to close"),
];

/// Help lines for the keys currently bound in `mode`.
fn binding_lines(keybindings: &Keybindings, mode: KeybindingMode) -> Vec<HelpLine> {
    let mut lines = vec![section(mode.display_name())];
    lines.extend(
        keybindings
            .help_entries(mode)
            .into_iter()
            .map(|(action, keys)| HelpLine::KeyBinding {
                key: Cow::Owned(keys.join(" ")),
                desc: Cow::Borrowed(action.description()),
            }),
    );
    lines.push(blank());
    lines
}

/// Build the help text with theme colors applied
pub fn build_help_text(theme: &Theme, keybindings: &Keybindings) -> Vec<Line<'static>> {
    let mut lines: Vec<HelpLine> = COMMAND_LINES.to_vec();
    for mode in [KeybindingMode::Normal, KeybindingMode::Picker] {
        lines.extend(binding_lines(keybindings, mode));
    }
    lines.extend(FOOTER_LINES.iter().cloned());
    lines.iter().map(|line| line.to_line(theme)).collect()
}
