pub(crate) mod help;
pub(crate) mod panels;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};

use crate::app::{App, Mode};

/// Render the entire UI.
pub fn render(frame: &mut Frame, app: &App) {
    let size = frame.area();

    // Vertical stack: body, optional recommendation strip, status bar,
    // search line while typing.
    let show_searchline = app.mode == Mode::Search;
    let show_recs = !app.recommendations.is_empty();

    let mut constraints = vec![Constraint::Min(3)];
    if show_recs {
        constraints.push(Constraint::Length(app.recommendations.len() as u16 + 2));
    }
    constraints.push(Constraint::Length(1));
    if show_searchline {
        constraints.push(Constraint::Length(1));
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(size);

    render_body(frame, app, rows[0]);

    let mut next = 1;
    if show_recs {
        panels::recommendations::render(frame, app, rows[next]);
        next += 1;
    }
    panels::statusbar::render(frame, app, rows[next]);
    if show_searchline {
        panels::searchline::render(frame, app, rows[next + 1]);
    }

    if app.show_help {
        help::render(frame, app, size);
    }
}

/// Three columns: filter sidebar, shelf, detail card.
fn render_body(frame: &mut Frame, app: &App, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(24),
            Constraint::Min(40),
            Constraint::Percentage(34),
        ])
        .split(area);

    panels::sidebar::render(frame, app, columns[0]);
    panels::shelf::render(frame, app, columns[1]);
    panels::detail::render(frame, app, columns[2]);
}

/// Centered sub-rect used by overlays.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
