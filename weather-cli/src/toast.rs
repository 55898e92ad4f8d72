//! Toast notifications: transient notices in the top-right corner.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph},
};
use weather_core::{Notice, Severity};

use crate::theme::{C_TOAST_BG, C_TOAST_ERROR, C_TOAST_INFO, C_TOAST_WARNING};

struct Toast {
    message: String,
    severity: Severity,
    expires: Instant,
}

pub struct ToastManager {
    toasts: VecDeque<Toast>,
    max_visible: usize,
}

fn lifetime(severity: Severity) -> Duration {
    match severity {
        Severity::Info => Duration::from_secs(3),
        Severity::Warning => Duration::from_secs(4),
        Severity::Error => Duration::from_secs(5),
    }
}

impl ToastManager {
    pub fn new() -> Self {
        Self { toasts: VecDeque::new(), max_visible: 4 }
    }

    pub fn push(&mut self, notice: Notice) {
        self.push_at(notice, Instant::now());
    }

    fn push_at(&mut self, notice: Notice, now: Instant) {
        // Repeats replace the older copy.
        self.toasts.retain(|t| t.message != notice.message);
        self.toasts.push_back(Toast {
            expires: now + lifetime(notice.severity),
            message: notice.message,
            severity: notice.severity,
        });
        while self.toasts.len() > self.max_visible * 2 {
            self.toasts.pop_front();
        }
    }

    /// Drops expired toasts. Returns true if anything was removed.
    pub fn tick(&mut self) -> bool {
        self.expire(Instant::now())
    }

    fn expire(&mut self, now: Instant) -> bool {
        let before = self.toasts.len();
        self.toasts.retain(|t| t.expires > now);
        self.toasts.len() != before
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }

    pub fn draw(&self, frame: &mut Frame, area: Rect) {
        if self.is_empty() {
            return;
        }
        let max_width = (area.width / 2).clamp(30, 60).min(area.width);
        let mut y = area.y + 1;

        for toast in self.toasts.iter().rev().take(self.max_visible) {
            let msg_len = toast.message.chars().count() as u16;
            let w = (msg_len + 4).min(max_width);
            let x = area.x + area.width.saturating_sub(w + 1);

            let (color, icon) = match toast.severity {
                Severity::Info => (C_TOAST_INFO, "·"),
                Severity::Warning => (C_TOAST_WARNING, "!"),
                Severity::Error => (C_TOAST_ERROR, "✗"),
            };

            let toast_area = Rect { x, y, width: w, height: 1 };
            frame.render_widget(Clear, toast_area);
            let paragraph = Paragraph::new(Line::from(vec![Span::styled(
                format!(" {} {} ", icon, &toast.message),
                Style::default().fg(color).bg(C_TOAST_BG).add_modifier(Modifier::BOLD),
            )]));
            frame.render_widget(paragraph, toast_area);

            y += 1;
            if y >= area.y + area.height {
                break;
            }
        }
    }
}

impl Default for ToastManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notice(severity: Severity, message: &str) -> Notice {
        Notice { severity, message: message.to_string() }
    }

    #[test]
    fn duplicates_collapse() {
        let mut toasts = ToastManager::new();
        toasts.push(notice(Severity::Info, "Please enter a city name."));
        toasts.push(notice(Severity::Info, "Please enter a city name."));
        assert_eq!(toasts.toasts.len(), 1);
    }

    #[test]
    fn errors_outlive_info() {
        let mut toasts = ToastManager::new();
        let start = Instant::now();
        toasts.push_at(notice(Severity::Info, "info"), start);
        toasts.push_at(notice(Severity::Error, "City not found"), start);

        assert!(toasts.expire(start + Duration::from_millis(3500)));
        assert_eq!(toasts.toasts.len(), 1);
        assert!(toasts.expire(start + Duration::from_secs(6)));
        assert!(toasts.is_empty());
    }

    #[test]
    fn queue_is_capped() {
        let mut toasts = ToastManager::new();
        for i in 0..20 {
            toasts.push(notice(Severity::Warning, &format!("notice {i}")));
        }
        assert_eq!(toasts.toasts.len(), 8);
    }
}
