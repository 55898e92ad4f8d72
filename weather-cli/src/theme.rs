//! Color palette and style constants for the weather TUI.

use ratatui::style::{Color, Modifier, Style};
use weather_core::Rgb;

// ── Color palette ─────────────────────────────────────────────────────────────

pub const C_TEXT: Color = Color::Rgb(24, 24, 32);
pub const C_TEXT_SOFT: Color = Color::Rgb(70, 70, 88);
pub const C_CARD_BG: Color = Color::Rgb(250, 250, 252);
pub const C_CARD_BORDER: Color = Color::Rgb(120, 100, 200);
pub const C_INPUT_BG: Color = Color::Rgb(255, 255, 255);
pub const C_INPUT_DISABLED_BG: Color = Color::Rgb(220, 220, 226);
pub const C_MUTED: Color = Color::Rgb(130, 130, 148);
pub const C_FOCUS: Color = Color::Rgb(120, 100, 200);
pub const C_HISTORY_BG: Color = Color::Rgb(235, 235, 242);
pub const C_TOAST_INFO: Color = Color::Rgb(80, 160, 220);
pub const C_TOAST_WARNING: Color = Color::Rgb(255, 184, 80);
pub const C_TOAST_ERROR: Color = Color::Rgb(255, 95, 95);
pub const C_TOAST_BG: Color = Color::Rgb(28, 28, 40);

// ── Predefined styles ─────────────────────────────────────────────────────────

pub fn style_default() -> Style {
    Style::default().fg(C_TEXT)
}

pub fn style_soft() -> Style {
    Style::default().fg(C_TEXT_SOFT)
}

pub fn style_muted() -> Style {
    Style::default().fg(C_MUTED)
}

pub fn style_title() -> Style {
    Style::default().fg(C_TEXT).add_modifier(Modifier::BOLD)
}

pub fn style_big() -> Style {
    Style::default().fg(C_TEXT).add_modifier(Modifier::BOLD)
}

pub fn style_focused_border() -> Style {
    Style::default().fg(C_FOCUS)
}

pub fn style_unfocused_border() -> Style {
    Style::default().fg(C_MUTED)
}

pub fn style_history_selected() -> Style {
    Style::default().bg(C_FOCUS).fg(C_CARD_BG).add_modifier(Modifier::BOLD)
}

pub fn to_color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}

/// Mixes `rgb` toward white by `amount` in [0, 1].
pub fn lighten(rgb: Rgb, amount: f64) -> Rgb {
    let amount = amount.clamp(0.0, 1.0);
    let mix = |c: u8| (f64::from(c) + (255.0 - f64::from(c)) * amount).round() as u8;
    Rgb(mix(rgb.0), mix(rgb.1), mix(rgb.2))
}

/// Background row colour for a vertical gradient: the top row is the
/// animated colour, the bottom row is 60% lighter.
pub fn gradient_row(base: Rgb, row: u16, height: u16) -> Color {
    let t = if height <= 1 { 0.0 } else { f64::from(row) / f64::from(height - 1) };
    to_color(lighten(base, 0.6 * t))
}
