use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use stanza_core::StatusFilter;

use crate::app::{ActivePanel, App, SidebarItem};
use crate::theme::Theme;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let focused = app.active_panel == ActivePanel::Sidebar;

    let border = if focused { theme.border_active } else { theme.border };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(Span::styled(
            " Filters ",
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let visible_height = inner.height as usize;
    let scroll = if app.sidebar_selected >= visible_height {
        app.sidebar_selected - visible_height + 1
    } else {
        0
    };

    let lines: Vec<Line> = app
        .sidebar_items
        .iter()
        .enumerate()
        .skip(scroll)
        .take(visible_height)
        .map(|(idx, item)| item_line(app, idx, item, focused))
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}

fn item_line(app: &App, idx: usize, item: &SidebarItem, focused: bool) -> Line<'static> {
    let theme = &app.theme;
    let selected = focused && idx == app.sidebar_selected;
    let active = app.sidebar_item_active(item);

    match item {
        SidebarItem::GenreHeader => header(theme, "GENRES"),
        SidebarItem::ThemeHeader => header(theme, "THEMES"),
        SidebarItem::AllBooks { count } => row(theme, selected, active, "All books", *count),
        SidebarItem::Status { status, count } => {
            let label = match status {
                StatusFilter::Read => "Read",
                StatusFilter::Unread => "Unread",
                StatusFilter::Any => "Any",
            };
            row(theme, selected, active, label, *count)
        }
        SidebarItem::Genre { name, count } => row(theme, selected, active, name, *count),
        SidebarItem::Theme { name, count } => row(theme, selected, active, name, *count),
    }
}

fn header(theme: &Theme, text: &str) -> Line<'static> {
    Line::from(Span::styled(
        format!(" {text}"),
        Style::default().fg(theme.muted).add_modifier(Modifier::BOLD),
    ))
}

fn row(theme: &Theme, selected: bool, active: bool, name: &str, count: usize) -> Line<'static> {
    let marker = if selected { "▶ " } else { "  " };
    let name_style = if active {
        Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.fg)
    };

    let mut line = Line::from(vec![
        Span::styled(marker.to_string(), Style::default().fg(theme.accent)),
        Span::styled(name.to_string(), name_style),
        Span::styled(format!(" ({count})"), Style::default().fg(theme.muted)),
    ]);
    if selected {
        line = line.style(Style::default().bg(theme.bg_row));
    }
    line
}
