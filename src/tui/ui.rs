//! Common UI styles and layout helpers for the boarding pass TUI

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
};

use crate::models::{Accent, Tone};

/// Spinner frames shown on the submit button while loading
pub const SPINNER_FRAMES: [&str; 8] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧"];

/// Common UI styles
pub struct Styles;

impl Styles {
    pub fn default() -> Style {
        Style::default()
    }

    pub fn selected() -> Style {
        Style::default()
            .bg(Color::Blue)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    }

    pub fn title() -> Style {
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    }

    pub fn error() -> Style {
        Style::default()
            .fg(Color::Red)
    }

    pub fn success() -> Style {
        Style::default()
            .fg(Color::Green)
    }

    pub fn inactive() -> Style {
        Style::default()
            .fg(Color::Gray)
    }

    pub fn disabled() -> Style {
        Style::default()
            .fg(Color::DarkGray)
    }

    pub fn active_border() -> Style {
        Style::default()
            .fg(Color::Yellow)
    }

    pub fn inactive_border() -> Style {
        Style::default()
            .fg(Color::Gray)
    }
}

/// Terminal colour for a named tone
pub fn tone_color(tone: Tone) -> Color {
    match tone {
        Tone::Blue => Color::Blue,
        Tone::Indigo => Color::Indexed(62),
        Tone::Red => Color::Red,
        Tone::Orange => Color::Indexed(208),
        Tone::Yellow => Color::Yellow,
        Tone::Purple => Color::Magenta,
        Tone::Pink => Color::Indexed(205),
    }
}

/// Bold text in the leading tone of the accent
pub fn accent_style(accent: Accent) -> Style {
    Style::default()
        .fg(tone_color(accent.from))
        .add_modifier(Modifier::BOLD)
}

/// Border in the trailing tone of the accent
pub fn accent_border(accent: Accent) -> Style {
    Style::default().fg(tone_color(accent.to))
}

/// Filled button in the accent's leading tone
pub fn accent_button(accent: Accent) -> Style {
    Style::default()
        .bg(tone_color(accent.from))
        .fg(Color::White)
        .add_modifier(Modifier::BOLD)
}

/// Horizontally center a column of at most `width` cells within `r`
pub fn centered_column(width: u16, r: Rect) -> Rect {
    let width = width.min(r.width);
    let side = (r.width - width) / 2;

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(side),
            Constraint::Length(width),
            Constraint::Min(0),
        ])
        .split(r)[1]
}

/// Place a popup of `height` rows directly below `anchor`, clipped to `bounds`
pub fn dropdown_rect(anchor: Rect, height: u16, bounds: Rect) -> Rect {
    let below = Rect::new(anchor.x, anchor.y + anchor.height, anchor.width, height);
    below.intersection(bounds)
}
