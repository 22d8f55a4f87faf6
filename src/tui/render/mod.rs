pub mod grid_view;
pub mod notice_popup;
pub mod status_row;
#[cfg(test)]
pub mod test_helpers;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::widgets::Block;

use crate::model::activity::MAX_LANES;

use super::app::App;

/// Draw one frame: grid, status row, then any notice on top
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Background fill
    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    // Layout: month header + lanes | filler | status row (1 row)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(MAX_LANES as u16 + 1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    grid_view::render_grid(frame, app, chunks[0]);
    status_row::render_status_row(frame, app, chunks[2]);

    // Notice popup (rendered on top of everything)
    if app.notice.is_some() {
        notice_popup::render_notice_popup(frame, app, area);
    }
}
