use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::app::App;
use crate::theme::Theme;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border))
        .title(Span::styled(
            " Book ",
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(book) = app.detail_book() else {
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                " Nothing selected.",
                Style::default().fg(theme.muted),
            ))),
            inner,
        );
        return;
    };
    let ann = app.store.get(book.id);

    let mut lines = vec![
        Line::from(Span::styled(
            book.title.clone(),
            Style::default().fg(theme.fg_bright).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("{}, {}", book.author, book.year),
            Style::default().fg(theme.muted),
        )),
        Line::default(),
    ];

    for verse in book.haiku.lines() {
        lines.push(Line::from(Span::styled(
            verse.to_string(),
            Style::default().fg(theme.fg).add_modifier(Modifier::ITALIC),
        )));
    }
    if !book.haiku.is_empty() {
        lines.push(Line::default());
    }

    lines.push(labels_line(theme, "Genres", &book.genres));
    lines.push(labels_line(theme, "Themes", &book.themes));
    lines.push(Line::default());

    if ann.is_rated() {
        let stars = format!(
            "{}{}",
            "★".repeat(ann.rating as usize),
            "☆".repeat(5 - ann.rating.min(5) as usize)
        );
        lines.push(Line::from(Span::styled(stars, Style::default().fg(theme.star))));
    } else {
        lines.push(Line::from(Span::styled(
            "not rated yet",
            Style::default().fg(theme.muted),
        )));
    }

    if ann.read {
        lines.push(Line::from(Span::styled("✓ read", Style::default().fg(theme.read))));
    } else {
        lines.push(Line::from(Span::styled("○ unread", Style::default().fg(theme.muted))));
    }

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

fn labels_line(theme: &Theme, label: &str, values: &[String]) -> Line<'static> {
    let text = if values.is_empty() { "-".to_string() } else { values.join(", ") };
    Line::from(vec![
        Span::styled(format!("{label}: "), Style::default().fg(theme.muted)),
        Span::styled(text, Style::default().fg(theme.fg)),
    ])
}
