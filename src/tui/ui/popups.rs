//! Popup rendering for the TUI: help and the document picker.

use crate::tui::app::App;
use crate::tui::help_text;
use ratatui::Frame;
use ratatui::layout::{Margin, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, Borders, Clear, List, ListItem, ListState, Paragraph, Scrollbar, ScrollbarOrientation,
    ScrollbarState, Wrap,
};

use super::util::popup_area;

/// Render the help popup with keyboard shortcuts
pub fn render_help_popup(frame: &mut Frame, app: &mut App, area: Rect) {
    // Min 40 cols for readability, min 10 rows for usable scroll area
    let popup_area = popup_area(area, 70, 80, 40, 10);
    let theme = &app.theme;

    frame.render_widget(Clear, popup_area);

    let help_lines = help_text::build_help_text(theme, &app.keybindings);
    let help_text_len = help_lines.len();
    app.help_scroll = app
        .help_scroll
        .min(help_text_len.saturating_sub(1) as u16);

    let paragraph = Paragraph::new(help_lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.modal_border()))
                .title(" Help ")
                .style(Style::default().bg(theme.background)),
        )
        .wrap(Wrap { trim: false })
        .scroll((app.help_scroll, 0));

    frame.render_widget(paragraph, popup_area);

    let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
        .begin_symbol(Some("↑"))
        .end_symbol(Some("↓"))
        .style(Style::default().fg(theme.modal_border()));

    let mut scrollbar_state = ScrollbarState::new(help_text_len).position(app.help_scroll as usize);

    frame.render_stateful_widget(
        scrollbar,
        popup_area.inner(Margin {
            vertical: 1,
            horizontal: 0,
        }),
        &mut scrollbar_state,
    );
}

/// Render the document picker
pub fn render_picker_popup(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    // Min 30 cols for document names, min 8 rows for a few entries
    let popup_area = popup_area(area, 60, 70, 30, 8);

    frame.render_widget(Clear, popup_area);

    let items: Vec<ListItem> = app
        .documents
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let marker = if index == app.current { "● " } else { "  " };
            let mut spans = vec![Span::styled(
                marker,
                Style::default().fg(theme.modal_selected_marker()),
            )];
            if let Some(group) = &entry.group {
                spans.push(Span::styled(
                    format!("{group}/"),
                    Style::default().fg(theme.modal_description()),
                ));
                let file = entry
                    .name
                    .strip_prefix(&format!("{group}/"))
                    .unwrap_or(&entry.name);
                spans.push(Span::raw(file.to_string()));
            } else {
                spans.push(Span::raw(entry.name.clone()));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let title = format!(" Documents ({}) ", app.documents.len());
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.modal_border()))
                .title(Span::styled(
                    title,
                    Style::default()
                        .fg(theme.modal_title())
                        .add_modifier(Modifier::BOLD),
                ))
                .title_bottom(" j/k: move  Enter: open  Esc: close ")
                .style(Style::default().bg(theme.background)),
        )
        .highlight_style(theme.selection_style())
        .highlight_symbol("▶ ");

    let mut state = ListState::default().with_selected(Some(app.picker_index));
    frame.render_stateful_widget(list, popup_area, &mut state);
}
