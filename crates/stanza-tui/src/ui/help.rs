use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::app::App;
use crate::ui::centered_rect;

const ENTRIES: &[(&str, &str)] = &[
    ("j / k", "move down / up"),
    ("g / G", "jump to top / bottom"),
    ("Tab", "cycle panel focus"),
    ("h / l", "focus sidebar / shelf"),
    ("Enter", "apply or clear the selected filter"),
    ("/", "search titles and authors"),
    ("s", "cycle sort order"),
    ("R", "reset filters, back to title order"),
    ("x / Space", "toggle read"),
    ("1-5", "rate the selected book"),
    ("0", "clear the rating"),
    ("?", "show this help"),
    ("q", "quit"),
];

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let popup = centered_rect(50, 70, area);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border_active))
        .title(Span::styled(
            " Keys ",
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let mut lines = vec![Line::default()];
    for (key, what) in ENTRIES {
        lines.push(Line::from(vec![
            Span::styled(
                format!("  {key:>9}  "),
                Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
            ),
            Span::styled((*what).to_string(), Style::default().fg(theme.fg)),
        ]));
    }
    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        "  press any key to close",
        Style::default().fg(theme.muted).add_modifier(Modifier::ITALIC),
    )));

    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(theme.bg)), inner);
}
