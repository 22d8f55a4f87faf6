use ratatui::style::Color;

use crate::model::UiConfig;
use crate::model::color::{ColorSpec, parse_hex};

/// Parsed color theme for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub text_bright: Color,
    pub highlight: Color,
    pub dim: Color,
    pub green: Color,
    pub red: Color,
    /// Column background for the month containing today
    pub current_month_bg: Color,
    /// Text drawn on top of activity bars (bars are pastel)
    pub bar_text: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            background: Color::Rgb(0x0C, 0x00, 0x1B),
            text: Color::Rgb(0xB0, 0xAA, 0xFF),
            text_bright: Color::Rgb(0xFF, 0xFF, 0xFF),
            highlight: Color::Rgb(0xFB, 0x41, 0x96),
            dim: Color::Rgb(0x7D, 0x78, 0xBF),
            green: Color::Rgb(0x1E, 0x7A, 0x3C),
            red: Color::Rgb(0xFF, 0x44, 0x44),
            current_month_bg: Color::Rgb(0x24, 0x14, 0x3A),
            bar_text: Color::Rgb(0x1A, 0x1A, 0x2E),
        }
    }
}

fn hex_color(hex: &str) -> Option<Color> {
    parse_hex(hex).map(|(r, g, b)| Color::Rgb(r, g, b))
}

impl Theme {
    /// Create a theme from the `[ui]` config, falling back to defaults
    pub fn from_config(ui: &UiConfig) -> Self {
        let mut theme = Theme::default();

        for (key, value) in &ui.colors {
            let Some(color) = hex_color(value) else {
                tracing::warn!(slot = %key, value = %value, "ignoring unreadable theme color");
                continue;
            };
            match key.as_str() {
                "background" => theme.background = color,
                "text" => theme.text = color,
                "text_bright" => theme.text_bright = color,
                "highlight" => theme.highlight = color,
                "dim" => theme.dim = color,
                "green" => theme.green = color,
                "red" => theme.red = color,
                "current_month_bg" => theme.current_month_bg = color,
                "bar_text" => theme.bar_text = color,
                _ => tracing::warn!(slot = %key, "unknown theme slot"),
            }
        }

        theme
    }

    /// Bar color for an activity, dim when its stored color is unreadable
    pub fn activity_color(&self, color: &ColorSpec) -> Color {
        color
            .to_rgb()
            .map_or(self.dim, |(r, g, b)| Color::Rgb(r, g, b))
    }
}
