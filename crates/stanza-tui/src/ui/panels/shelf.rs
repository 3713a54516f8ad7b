use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use stanza_core::Book;

use crate::app::{ActivePanel, App};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let focused = app.active_panel == ActivePanel::Shelf;

    let border = if focused { theme.border_active } else { theme.border };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(Span::styled(
            format!(" Shelf ({}/{}) ", app.visible.len(), app.catalog.len()),
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if app.visible.is_empty() {
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                " No books match the current filters.",
                Style::default().fg(theme.muted),
            ))),
            inner,
        );
        return;
    }

    let visible_height = inner.height as usize;
    let scroll = if app.shelf_selected >= visible_height {
        app.shelf_selected - visible_height + 1
    } else {
        0
    };

    let lines: Vec<Line> = app
        .visible
        .iter()
        .enumerate()
        .skip(scroll)
        .take(visible_height)
        .map(|(idx, book)| book_line(app, idx, book, focused, inner.width))
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}

fn book_line(app: &App, idx: usize, book: &Book, focused: bool, width: u16) -> Line<'static> {
    let theme = &app.theme;
    let ann = app.store.get(book.id);
    let selected = idx == app.shelf_selected;

    let marker = if selected && focused { "▶ " } else { "  " };
    let read_mark = if ann.read { "✓ " } else { "  " };
    let stars = "★".repeat(ann.rating as usize);

    // Title takes whatever the fixed columns leave over.
    let title_width = (width as usize).saturating_sub(32).max(10);

    let mut line = Line::from(vec![
        Span::styled(marker.to_string(), Style::default().fg(theme.accent)),
        Span::styled(read_mark.to_string(), Style::default().fg(theme.read)),
        Span::styled(
            format!("{:<title_width$}", truncate(&book.title, title_width)),
            Style::default().fg(theme.fg_bright),
        ),
        Span::styled(
            format!(" {:<16}", truncate(&book.author, 15)),
            Style::default().fg(theme.fg),
        ),
        Span::styled(format!("{:>5}", book.year), Style::default().fg(theme.muted)),
        Span::styled(format!("  {stars}"), Style::default().fg(theme.star)),
    ]);
    if selected {
        line = line.style(Style::default().bg(theme.bg_row));
    }
    line
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}
