//! Frame rendering: title bar, mind map, status bar and popups.

mod layout;
mod map;
mod popups;
mod util;

use layout::{DynamicLayout, Section};
use map::MindMapWidget;

use crate::tui::app::{App, AppMode};
use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    let main_layout = DynamicLayout::vertical(area)
        .section(Section::Title, Constraint::Length(2))
        .section(Section::Map, Constraint::Min(0))
        .section_if(
            app.config.ui.show_status_bar,
            Section::Status,
            Constraint::Length(1),
        )
        .build();

    let map_area = main_layout.require(Section::Map);
    app.set_viewport(map_area.width, map_area.height);

    render_title_bar(frame, app, main_layout.require(Section::Title));
    render_map(frame, app, map_area);

    if let Some(status_area) = main_layout.get(Section::Status) {
        render_status_bar(frame, app, status_area);
    }

    match app.mode {
        AppMode::Help => popups::render_help_popup(frame, app, area),
        AppMode::Picker => popups::render_picker_popup(frame, app, area),
        AppMode::Normal => {}
    }
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let name = app
        .current_document()
        .map(|entry| entry.name.as_str())
        .unwrap_or("-");
    let title_text = if app.documents.len() > 1 {
        format!(
            "foldmap - {} ({}/{})",
            name,
            app.current + 1,
            app.documents.len()
        )
    } else {
        format!("foldmap - {}", name)
    };

    let title = Paragraph::new(title_text)
        .style(
            Style::default()
                .fg(app.theme.title_bar_fg)
                .add_modifier(Modifier::BOLD),
        )
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(title, area);
}

fn render_map(frame: &mut Frame, app: &App, area: Rect) {
    let Some(session) = app.session.as_ref().filter(|s| s.map().is_some()) else {
        let message = Paragraph::new("Nothing to show in this document")
            .style(Style::default().fg(app.theme.status_bar_fg))
            .centered();
        let [line_area] = Layout::vertical([Constraint::Length(1)])
            .flex(Flex::Center)
            .areas(area);
        frame.render_widget(message, line_area);
        return;
    };

    frame.render_widget(MindMapWidget::new(session.view(), &app.theme), area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    if let Some(ref msg) = app.status_message {
        let status = Paragraph::new(format!(" {msg}")).style(
            app.theme
                .status_bar_style()
                .add_modifier(Modifier::BOLD),
        );
        frame.render_widget(status, area);
        return;
    }

    let summary = match app.session.as_ref().and_then(|s| s.map().map(|m| (s, m))) {
        Some((session, map)) => format!(
            " {}/{} nodes • depth {} • zoom {}%",
            map.visible_count(),
            map.node_count(),
            map.max_depth(),
            session.view().zoom_percent()
        ),
        None => " no outline".to_string(),
    };

    let line = Line::from(vec![
        Span::raw(summary),
        Span::raw(" • "),
        Span::styled(
            "?",
            Style::default()
                .fg(app.theme.modal_key_fg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" help"),
    ]);
    frame.render_widget(Paragraph::new(line).style(app.theme.status_bar_style()), area);
}
