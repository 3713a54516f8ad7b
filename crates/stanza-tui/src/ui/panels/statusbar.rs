use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::app::{App, Mode};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(20),    // filter / transient message
            Constraint::Length(36), // counters
            Constraint::Length(16), // sort
            Constraint::Length(8),  // mode
        ])
        .split(area);

    render_left_zone(frame, app, chunks[0]);
    render_counters_zone(frame, app, chunks[1]);
    render_sort_zone(frame, app, chunks[2]);
    render_mode_zone(frame, app, chunks[3]);
}

fn render_left_zone(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let text = if app.status_message.is_empty() {
        app.filter_label()
    } else {
        app.status_message.clone()
    };

    let content = Line::from(vec![
        Span::styled(
            " stanza ",
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
        ),
        Span::styled("› ", Style::default().fg(theme.muted)),
        Span::styled(text, Style::default().fg(theme.fg)),
    ]);

    frame.render_widget(
        Paragraph::new(content).style(Style::default().bg(theme.bg_row)),
        area,
    );
}

fn render_counters_zone(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let text = format!(
        "{}/{} books · {} read · avg {}",
        app.visible.len(),
        app.stats.total,
        app.stats.read_count,
        app.stats.average_display(),
    );
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(text, Style::default().fg(theme.muted))))
            .style(Style::default().bg(theme.bg_row))
            .alignment(Alignment::Center),
        area,
    );
}

fn render_sort_zone(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let text = format!("sort: {}", app.sort_label());
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(text, Style::default().fg(theme.fg))))
            .style(Style::default().bg(theme.bg_row))
            .alignment(Alignment::Center),
        area,
    );
}

fn render_mode_zone(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let (label, bg, fg) = match app.mode {
        Mode::Normal => (" NORMAL ", theme.border, theme.fg_bright),
        Mode::Search => (" SEARCH ", theme.star, theme.bg),
    };
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            label,
            Style::default().fg(fg).bg(bg).add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center),
        area,
    );
}
