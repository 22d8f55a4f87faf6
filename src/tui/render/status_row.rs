use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, Mode};
use crate::util::unicode::display_width;

const NAVIGATE_HINT: &str = "a add  f finish  \u{2190}\u{2192} scroll  t today  q quit";
const PROMPT_HINT: &str = "Enter add  Esc cancel";

/// Render the status row (bottom of screen)
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    let mut spans = Vec::new();
    let hint = match app.mode {
        Mode::Prompt => {
            spans.push(Span::styled(
                " New activity: ",
                Style::default().fg(app.theme.text).bg(bg),
            ));
            spans.push(Span::styled(
                app.input.clone(),
                Style::default().fg(app.theme.text_bright).bg(bg),
            ));
            spans.push(Span::styled(
                "\u{258C}",
                Style::default().fg(app.theme.highlight).bg(bg),
            )); // ▌ cursor
            Some(PROMPT_HINT)
        }
        Mode::Navigate => {
            if let Some(status) = &app.status {
                spans.push(Span::styled(
                    format!(" {status}"),
                    Style::default().fg(app.theme.red).bg(bg),
                ));
            } else if app.check_findings > 0 {
                spans.push(Span::styled(
                    format!(" {} stored activities look wrong, see monthlane.log", app.check_findings),
                    Style::default().fg(app.theme.dim).bg(bg),
                ));
            }
            app.show_key_hints.then_some(NAVIGATE_HINT)
        }
    };

    if let Some(hint) = hint {
        push_right_aligned(&mut spans, hint, width, app.theme.dim, bg);
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

/// Pad out to `width` and end with `hint`, if it fits after the existing spans
fn push_right_aligned(spans: &mut Vec<Span<'static>>, hint: &'static str, width: usize, fg: Color, bg: Color) {
    let content_width: usize = spans.iter().map(|s| display_width(&s.content)).sum();
    let hint_width = display_width(hint);
    if content_width + hint_width < width {
        let padding = width - content_width - hint_width;
        spans.push(Span::styled(" ".repeat(padding), Style::default().bg(bg)));
        spans.push(Span::styled(hint, Style::default().fg(fg).bg(bg)));
    }
}
