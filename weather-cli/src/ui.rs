//! Frame rendering.
//!
//! Layout, top to bottom: header, search row, weather card, history bar and
//! key-hint footer, over a vertical gradient derived from the animated
//! background colour. Toasts are drawn last.

use chrono::Utc;
use ratatui::{
    Frame,
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use weather_core::{
    Rgb,
    controller::{DisplayState, VoiceStatus},
    icon::Bitmap,
    strings::StringKey,
};

use crate::app::{App, Focus};
use crate::theme::{
    C_CARD_BG, C_CARD_BORDER, C_HISTORY_BG, gradient_row, style_big, style_default,
    style_focused_border, style_history_selected, style_muted, style_soft, style_title,
    style_unfocused_border,
};

/// Icon is drawn as `ICON_COLS` x `ICON_COLS` pixels using half blocks.
const ICON_COLS: u16 = 14;
const ICON_ROWS: u16 = ICON_COLS / 2;
/// Terminal rows the glyph/icon block can move up or down.
const BOUNCE_ROWS: i16 = 2;
const CARD_WIDTH: u16 = 56;

pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();
    paint_background(frame.buffer_mut(), area, app.controller.state().background());

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(area);

    draw_header(frame, rows[0], app);
    draw_search_row(frame, rows[1], app);
    draw_card(frame, rows[2], app);
    draw_history(frame, rows[3], app);
    draw_footer(frame, rows[4], app);

    app.toasts.draw(frame, area);
}

fn paint_background(buf: &mut Buffer, area: Rect, base: Rgb) {
    for row in 0..area.height {
        let line = Rect { x: area.x, y: area.y + row, width: area.width, height: 1 };
        buf.set_style(line, Style::default().bg(gradient_row(base, row, area.height)));
    }
}

fn draw_header(frame: &mut Frame, area: Rect, app: &App) {
    let state = app.controller.state();
    let title = Paragraph::new(Line::from(Span::styled(
        format!(" ☁ {}", app.controller.text(StringKey::AppTitle)),
        style_title(),
    )));
    frame.render_widget(title, area);

    let right = Paragraph::new(Line::from(vec![
        Span::styled(state.units.suffix(), style_default()),
        Span::styled(" · ", style_muted()),
        Span::styled(format!("{} ", state.language.display_name()), style_default()),
    ]))
    .alignment(Alignment::Right);
    frame.render_widget(right, area);
}

fn draw_search_row(frame: &mut Frame, area: Rect, app: &App) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(20), Constraint::Length(24)])
        .split(area);

    let state = app.controller.state();
    app.search.draw(
        frame,
        cols[0],
        app.controller.text(StringKey::Search),
        app.controller.text(StringKey::EnterCity),
        app.focus == Focus::Search,
        state.controls_enabled(),
    );

    let status = match state.voice {
        VoiceStatus::Listening => Some(StringKey::Listening),
        VoiceStatus::Recognizing => Some(StringKey::Recognizing),
        VoiceStatus::Idle if state.is_loading() => Some(StringKey::Loading),
        VoiceStatus::Idle => None,
    };
    if let Some(key) = status {
        let status_area = Rect { y: cols[1].y + 1, height: 1, ..cols[1] };
        frame.render_widget(
            Paragraph::new(Span::styled(app.controller.text(key), style_soft())).alignment(Alignment::Center),
            status_area,
        );
    }
}

fn card_rect(area: Rect) -> Rect {
    let width = CARD_WIDTH.min(area.width);
    Rect { x: area.x + (area.width - width) / 2, width, ..area }
}

fn draw_card(frame: &mut Frame, area: Rect, app: &App) {
    let card = card_rect(area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(C_CARD_BORDER))
        .style(Style::default().bg(C_CARD_BG));
    let inner = block.inner(card);
    frame.render_widget(block, card);

    let state = app.controller.state();
    let Some(display) = state.display.as_ref() else {
        let placeholder = Paragraph::new(Span::styled(app.controller.text(StringKey::WeatherInfo), style_soft()))
            .alignment(Alignment::Center);
        let mid = Rect { y: inner.y + inner.height / 2, height: 1, ..inner };
        frame.render_widget(placeholder, mid);
        return;
    };

    let figure_height = ICON_ROWS + 1 + 2 * BOUNCE_ROWS as u16;
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(figure_height),
            Constraint::Min(5),
        ])
        .split(inner);

    if let Some(time) = app.controller.time_info(Utc::now()) {
        let lines = vec![
            Line::from(Span::styled(time.date, style_soft())),
            Line::from(Span::styled(time.time_of_day, style_big())),
            Line::from(Span::styled(display.city.clone(), style_title())),
        ];
        frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), sections[0]);
    }

    draw_figure(frame, sections[1], display, bounce_rows(state.animation.icon_offset()));

    let mut details = vec![
        Line::from(Span::styled(display.temperature.clone(), style_big())),
        Line::from(Span::styled(display.description.clone(), style_default())),
        Line::from(Span::styled(
            format!(
                "{}: {}% | {}: {}",
                app.controller.text(StringKey::Humidity),
                display.humidity_pct,
                app.controller.text(StringKey::Wind),
                display.wind
            ),
            style_soft(),
        )),
    ];
    if let Some(time) = app.controller.time_info(Utc::now()) {
        details.push(Line::from(Span::styled(time.day_name, style_soft())));
    }
    details.push(Line::from(Span::styled(app.controller.text(StringKey::ForecastSoon), style_muted())));
    if display.offers_alternate {
        let label = if state.time_view.showing_alternate() { StringKey::ShowLocal } else { StringKey::ShowIst };
        details.push(Line::from(Span::styled(
            format!("Ctrl+T: {}", app.controller.text(label)),
            style_muted(),
        )));
    }
    frame.render_widget(Paragraph::new(details).alignment(Alignment::Center), sections[2]);
}

/// Maps the animation's pixel offset in [-10, 10] to terminal rows.
pub fn bounce_rows(offset: i16) -> i16 {
    (offset * BOUNCE_ROWS / 10).clamp(-BOUNCE_ROWS, BOUNCE_ROWS)
}

fn draw_figure(frame: &mut Frame, area: Rect, display: &DisplayState, shift: i16) {
    let top = (area.y as i16 + BOUNCE_ROWS + shift).max(area.y as i16) as u16;

    let mut lines = vec![Line::from(Span::raw(display.glyph))];
    if let Some(icon) = display.icon.as_deref() {
        lines.extend(icon_lines(icon, ICON_COLS, C_CARD_BG));
    }
    let height = (lines.len() as u16).min((area.y + area.height).saturating_sub(top));
    let figure = Rect { y: top, height, ..area };
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), figure);
}

fn blend(px: [u8; 4], bg: Color) -> Color {
    let Color::Rgb(br, bgc, bb) = bg else {
        return Color::Rgb(px[0], px[1], px[2]);
    };
    let a = f64::from(px[3]) / 255.0;
    let mix = |c: u8, b: u8| (f64::from(c) * a + f64::from(b) * (1.0 - a)).round() as u8;
    Color::Rgb(mix(px[0], br), mix(px[1], bgc), mix(px[2], bb))
}

/// Downsamples `icon` to `cols` x `cols` pixels, two pixel rows per line
/// (upper half block: fg is the top pixel, bg the bottom one). Transparent
/// pixels blend into `bg`.
pub fn icon_lines(icon: &Bitmap, cols: u16, bg: Color) -> Vec<Line<'static>> {
    let cols = u32::from(cols.max(1));
    let step_x = icon.width() / cols;
    let step_y = icon.height() / cols;
    let sample = |cx: u32, cy: u32| icon.pixel(cx * step_x + step_x / 2, cy * step_y + step_y / 2);

    (0..cols / 2)
        .map(|row| {
            let spans: Vec<Span<'static>> = (0..cols)
                .map(|col| {
                    let top = blend(sample(col, row * 2), bg);
                    let bottom = blend(sample(col, row * 2 + 1), bg);
                    Span::styled("▀", Style::default().fg(top).bg(bottom))
                })
                .collect();
            Line::from(spans)
        })
        .collect()
}

fn draw_history(frame: &mut Frame, area: Rect, app: &App) {
    let focused = app.focus == Focus::History;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(if focused { style_focused_border() } else { style_unfocused_border() })
        .title(format!(" {} ", app.controller.text(StringKey::History)))
        .style(Style::default().bg(C_HISTORY_BG));

    let state = app.controller.state();
    let mut spans = Vec::new();
    for (i, city) in state.history.entries().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" │ ", style_muted()));
        }
        let style = if focused && i == app.history_cursor { style_history_selected() } else { style_default() };
        spans.push(Span::styled(format!(" {city} "), style));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn draw_footer(frame: &mut Frame, area: Rect, app: &App) {
    let mic = app.controller.text(StringKey::Mic);
    let hints = [
        ("Enter", "search"),
        ("Tab", "history"),
        ("^U", "units"),
        ("^L", "language"),
        ("^T", "IST"),
        ("^R", mic),
        ("Esc", "quit"),
    ];
    let mut spans = Vec::new();
    for (key, label) in hints {
        spans.push(Span::styled(format!(" {key} "), style_title()));
        spans.push(Span::styled(format!("{label} "), style_soft()));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
