use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::app::App;

/// One-line input row shown while search mode is active.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let content = Line::from(vec![
        Span::styled(" /", Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)),
        Span::styled(app.criteria.search.clone(), Style::default().fg(theme.fg_bright)),
        Span::styled("█", Style::default().fg(theme.accent)),
    ]);
    frame.render_widget(Paragraph::new(content), area);
}
