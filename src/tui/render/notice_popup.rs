use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::app::App;

/// Render the blocking notice (e.g. no free lane) over the grid
pub fn render_notice_popup(frame: &mut Frame, app: &App, area: Rect) {
    let Some(message) = app.notice.as_deref() else {
        return;
    };

    let popup_w: u16 = 40.min(area.width.saturating_sub(2));
    let inner_w = popup_w.saturating_sub(2) as usize;

    let bg = app.theme.background;
    let header_style = Style::default()
        .fg(app.theme.highlight)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let text_style = Style::default().fg(app.theme.text_bright).bg(bg);
    let dim_style = Style::default().fg(app.theme.dim).bg(bg);

    let mut styled_lines: Vec<(String, Style)> = vec![
        (" Notice".into(), header_style),
        (String::new(), text_style),
    ];
    for s in wrap_text(" ", message, inner_w) {
        styled_lines.push((s, text_style));
    }
    styled_lines.push((String::new(), text_style));
    styled_lines.push((" Press any key".into(), dim_style));

    // Dynamic height from content + 2 for borders
    let popup_h = ((styled_lines.len() as u16) + 2).min(area.height.saturating_sub(2));

    let overlay_area = centered_rect_fixed(popup_w, popup_h, area);
    frame.render_widget(Clear, overlay_area);

    let lines: Vec<Line> = styled_lines
        .into_iter()
        .map(|(text, style)| Line::from(Span::styled(text, style)))
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.highlight).bg(bg))
        .style(Style::default().bg(bg));

    frame.render_widget(Paragraph::new(lines).block(block), overlay_area);
}

/// Word-wrap `text` into lines of at most `max_width` characters.
/// Every line (including the first) is prefixed with `indent`.
fn wrap_text(indent: &str, text: &str, max_width: usize) -> Vec<String> {
    let indent_len = indent.len();
    let mut lines = Vec::new();
    let mut current = indent.to_string();

    for word in text.split_whitespace() {
        if current.len() > indent_len && current.len() + 1 + word.len() > max_width {
            lines.push(std::mem::replace(&mut current, indent.to_string()));
        }
        if current.len() > indent_len {
            current.push(' ');
        }
        current.push_str(word);
    }
    if current.len() > indent_len || lines.is_empty() {
        lines.push(current);
    }
    lines
}

fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::app::NO_SLOTS_NOTICE;
    use crate::tui::render::test_helpers::{local, render_to_string, test_app};

    #[test]
    fn wraps_on_word_boundaries() {
        assert_eq!(
            wrap_text(" ", "There are no slots available", 16),
            vec![" There are no", " slots available"]
        );
        assert_eq!(wrap_text(" ", "", 16), vec![" "]);
    }

    #[test]
    fn shows_message_and_dismiss_hint() {
        let mut app = test_app(local(2024, 3, 15));
        app.notice = Some(NO_SLOTS_NOTICE.into());
        let output = render_to_string(60, 12, |frame, area| {
            render_notice_popup(frame, &app, area)
        });
        assert!(output.contains("Notice"));
        assert!(output.contains(NO_SLOTS_NOTICE));
        assert!(output.contains("Press any key"));
    }

    #[test]
    fn nothing_without_a_notice() {
        let app = test_app(local(2024, 3, 15));
        let output = render_to_string(60, 12, |frame, area| {
            render_notice_popup(frame, &app, area)
        });
        assert_eq!(output, "");
    }
}
