//! Color palette for the mind map and its popups.

use crate::config::{ColorValue, CustomThemeConfig};
use crate::mindmap::InlineStyle;
use ratatui::style::{Color, Modifier, Style};

/// Depth colors cycle after this many levels
pub const DEPTH_COLORS: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub background: Color,
    pub foreground: Color,
    pub depth: [Color; DEPTH_COLORS],
    pub connector: Color,
    pub fold_marker: Color,
    pub highlight_bg: Color,
    pub highlight_fg: Color,
    pub inline_code_fg: Color,
    pub link_fg: Color,
    pub title_bar_fg: Color,
    pub status_bar_bg: Color,
    pub status_bar_fg: Color,
    pub popup_border: Color,
    pub selection_bg: Color,
    pub selection_fg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Color::Reset,
            foreground: Color::Rgb(220, 223, 228),
            depth: [
                Color::Rgb(97, 175, 239),
                Color::Rgb(152, 195, 121),
                Color::Rgb(229, 192, 123),
                Color::Rgb(198, 120, 221),
                Color::Rgb(86, 182, 194),
            ],
            connector: Color::Rgb(92, 99, 112),
            fold_marker: Color::Rgb(224, 108, 117),
            highlight_bg: Color::Rgb(229, 192, 123),
            highlight_fg: Color::Black,
            inline_code_fg: Color::Rgb(209, 154, 102),
            link_fg: Color::Rgb(97, 175, 239),
            title_bar_fg: Color::Rgb(97, 175, 239),
            status_bar_bg: Color::Rgb(40, 44, 52),
            status_bar_fg: Color::Rgb(171, 178, 191),
            popup_border: Color::Rgb(97, 175, 239),
            selection_bg: Color::Rgb(62, 68, 81),
            selection_fg: Color::White,
        }
    }
}

impl Theme {
    /// Default palette with the config's overrides applied.
    ///
    /// Color names that do not parse leave the default in place.
    pub fn with_custom_colors(mut self, custom: &CustomThemeConfig) -> Self {
        fn apply(slot: &mut Color, value: &Option<ColorValue>) {
            if let Some(color) = value.as_ref().and_then(ColorValue::to_color) {
                *slot = color;
            }
        }

        apply(&mut self.background, &custom.background);
        apply(&mut self.foreground, &custom.foreground);
        for (slot, value) in self.depth.iter_mut().zip([
            &custom.depth_1,
            &custom.depth_2,
            &custom.depth_3,
            &custom.depth_4,
            &custom.depth_5,
        ]) {
            apply(slot, value);
        }
        apply(&mut self.connector, &custom.connector);
        apply(&mut self.fold_marker, &custom.fold_marker);
        apply(&mut self.highlight_bg, &custom.highlight_bg);
        apply(&mut self.highlight_fg, &custom.highlight_fg);
        apply(&mut self.inline_code_fg, &custom.inline_code_fg);
        apply(&mut self.link_fg, &custom.link_fg);
        apply(&mut self.title_bar_fg, &custom.title_bar_fg);
        apply(&mut self.status_bar_bg, &custom.status_bar_bg);
        apply(&mut self.status_bar_fg, &custom.status_bar_fg);
        apply(&mut self.popup_border, &custom.popup_border);
        apply(&mut self.selection_bg, &custom.selection_bg);
        apply(&mut self.selection_fg, &custom.selection_fg);
        self
    }

    /// Label color for a node `depth` levels below the root (root is 0).
    pub fn depth_color(&self, depth: usize) -> Color {
        self.depth[depth % DEPTH_COLORS]
    }

    /// Style of one label span on top of the node's base style.
    pub fn span_style(&self, style: InlineStyle, base: Style) -> Style {
        let mut out = base;
        if style.strong {
            out = out.add_modifier(Modifier::BOLD);
        }
        if style.emphasis {
            out = out.add_modifier(Modifier::ITALIC);
        }
        if style.strikethrough {
            out = out.add_modifier(Modifier::CROSSED_OUT);
        }
        if style.code {
            out = out.fg(self.inline_code_fg);
        }
        if style.link {
            out = out.fg(self.link_fg).add_modifier(Modifier::UNDERLINED);
        }
        if style.highlight {
            out = out.fg(self.highlight_fg).bg(self.highlight_bg);
        }
        out
    }

    pub fn connector_style(&self) -> Style {
        Style::default().fg(self.connector)
    }

    pub fn fold_marker_style(&self) -> Style {
        Style::default()
            .fg(self.fold_marker)
            .add_modifier(Modifier::BOLD)
    }

    pub fn status_bar_style(&self) -> Style {
        Style::default().bg(self.status_bar_bg).fg(self.status_bar_fg)
    }

    pub fn selection_style(&self) -> Style {
        Style::default()
            .bg(self.selection_bg)
            .fg(self.selection_fg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn modal_border(&self) -> Color {
        self.popup_border
    }

    pub fn modal_title(&self) -> Color {
        self.title_bar_fg
    }

    pub fn modal_description(&self) -> Color {
        self.status_bar_fg
    }

    pub fn modal_key_fg(&self) -> Color {
        self.depth[2]
    }

    pub fn modal_selected_marker(&self) -> Color {
        self.fold_marker
    }
}
