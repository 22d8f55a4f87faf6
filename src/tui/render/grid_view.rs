use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::activity::MAX_LANES;
use crate::model::month::YearMonth;
use crate::ops::timeline::{CellState, resolve_cell};
use crate::tui::app::App;
use crate::tui::theme::Theme;
use crate::util::unicode::{display_width, fit_to_width};

/// Width of the lane number gutter
pub const LANE_GUTTER_W: u16 = 4;
/// Width of one month column, including its right-hand separator
pub const MONTH_COL_W: u16 = 16;
const CELL_W: usize = MONTH_COL_W as usize - 1;

const FINISH_MARKER: &str = "Finish";
const COMPLETED_MARKER: &str = "\u{2713}";
const SEPARATOR: &str = "\u{2502}";

/// How many month columns fit in `width` cells
pub fn visible_month_count(width: u16) -> usize {
    (width.saturating_sub(LANE_GUTTER_W) / MONTH_COL_W) as usize
}

/// Render the month header and one row per lane
pub fn render_grid(frame: &mut Frame, app: &mut App, area: Rect) {
    app.fit_columns(visible_month_count(area.width));

    let now = app.now();
    let current = YearMonth::of(&now);
    let theme = &app.theme;
    let months: Vec<YearMonth> = app
        .months
        .iter()
        .skip(app.scroll)
        .take(app.visible_months)
        .copied()
        .collect();
    let separator = Span::styled(SEPARATOR, Style::default().fg(theme.dim).bg(theme.background));

    let mut lines: Vec<Line> = Vec::with_capacity(MAX_LANES as usize + 1);

    let mut header = vec![Span::styled(
        " ".repeat(LANE_GUTTER_W as usize),
        Style::default().bg(theme.background),
    )];
    for month in &months {
        let style = if *month == current {
            Style::default()
                .fg(theme.highlight)
                .bg(theme.current_month_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.text_bright).bg(theme.background)
        };
        header.push(Span::styled(format!("{:^width$}", month.to_string(), width = CELL_W), style));
        header.push(separator.clone());
    }
    lines.push(Line::from(header));

    for lane in 1..=MAX_LANES {
        let gutter_style = if lane == app.selected_lane {
            Style::default()
                .fg(theme.highlight)
                .bg(theme.background)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.dim).bg(theme.background)
        };
        let mut spans = vec![Span::styled(format!("{lane:>2}  "), gutter_style)];
        for month in &months {
            let cell = resolve_cell(lane, *month, app.tracker.activities(), &now);
            spans.extend(cell_spans(theme, &cell, *month == current));
            spans.push(separator.clone());
        }
        lines.push(Line::from(spans));
    }

    let paragraph = Paragraph::new(lines).style(Style::default().bg(theme.background));
    frame.render_widget(paragraph, area);
}

/// Spans for one cell, exactly `CELL_W` cells wide
fn cell_spans(theme: &Theme, cell: &CellState, is_current: bool) -> Vec<Span<'static>> {
    let Some(activity) = cell.occupant else {
        let bg = if is_current {
            theme.current_month_bg
        } else {
            theme.background
        };
        return vec![Span::styled(" ".repeat(CELL_W), Style::default().bg(bg))];
    };

    let bar = Style::default()
        .fg(theme.bar_text)
        .bg(theme.activity_color(&activity.color));
    let (marker, marker_style) = if cell.show_finish {
        (FINISH_MARKER, bar.fg(theme.highlight).add_modifier(Modifier::BOLD))
    } else if cell.show_completed {
        (COMPLETED_MARKER, bar.fg(theme.green).add_modifier(Modifier::BOLD))
    } else {
        ("", bar)
    };

    // one cell of padding on each side, one between label and marker
    let marker_w = display_width(marker);
    let label_w = CELL_W - 2 - marker_w - usize::from(marker_w > 0);
    let label = if cell.show_label {
        activity.label.as_str()
    } else {
        ""
    };

    let mut spans = vec![Span::styled(format!(" {}", fit_to_width(label, label_w)), bar)];
    if marker_w > 0 {
        spans.push(Span::styled(" ", bar));
        spans.push(Span::styled(marker, marker_style));
    }
    spans.push(Span::styled(" ", bar));
    spans
}
