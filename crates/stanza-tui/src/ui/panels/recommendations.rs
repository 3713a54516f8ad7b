use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::{ActivePanel, App};

/// Bottom strip listing tag-affinity picks. Only rendered while the
/// engine has something to show.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let focused = app.active_panel == ActivePanel::Recommendations;

    let border = if focused { theme.border_active } else { theme.border };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(Span::styled(
            " Recommended for you ",
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines: Vec<Line> = app
        .recommendations
        .iter()
        .enumerate()
        .take(inner.height as usize)
        .map(|(idx, rec)| {
            let selected = focused && idx == app.rec_selected;
            let marker = if selected { "▶ " } else { "  " };
            let mut line = Line::from(vec![
                Span::styled(marker.to_string(), Style::default().fg(theme.accent)),
                Span::styled(
                    format!("{:>3}% match  ", rec.score),
                    Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    rec.book.title.clone(),
                    Style::default().fg(theme.fg_bright),
                ),
                Span::styled(
                    format!("  {}", rec.book.author),
                    Style::default().fg(theme.muted),
                ),
            ]);
            if selected {
                line = line.style(Style::default().bg(theme.bg_row));
            }
            line
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}
