//! SearchBox: wraps tui-input for the city field.

use ratatui::crossterm::event::{Event, KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use tui_input::{Input, backend::crossterm::EventHandler};

use crate::theme::{
    C_INPUT_BG, C_INPUT_DISABLED_BG, C_MUTED, C_TEXT, style_focused_border, style_unfocused_border,
};

#[derive(Debug, PartialEq, Eq)]
pub enum SearchAction {
    Submit(String),
    Edited,
    None,
}

#[derive(Default)]
pub struct SearchBox {
    input: Input,
}

impl SearchBox {
    pub fn set_value(&mut self, value: &str) {
        self.input = Input::new(value.to_string());
    }

    /// Enter submits the current text. Editing keys go to the input.
    pub fn handle_key(&mut self, key: KeyEvent) -> SearchAction {
        match key.code {
            KeyCode::Enter => SearchAction::Submit(self.input.value().to_string()),
            _ => match self.input.handle_event(&Event::Key(key)) {
                Some(change) if change.value => SearchAction::Edited,
                _ => SearchAction::None,
            },
        }
    }

    pub fn draw(
        &self,
        frame: &mut Frame,
        area: Rect,
        title: &str,
        placeholder: &str,
        focused: bool,
        enabled: bool,
    ) {
        let border = if focused && enabled { style_focused_border() } else { style_unfocused_border() };
        let bg = if enabled { C_INPUT_BG } else { C_INPUT_DISABLED_BG };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(format!(" {title} "))
            .style(Style::default().bg(bg));
        let inner = block.inner(area);

        let scroll = self.input.visual_scroll(inner.width.saturating_sub(1) as usize);
        let value = self.input.value();
        let display = if value.is_empty() {
            Span::styled(placeholder.to_string(), Style::default().fg(C_MUTED))
        } else {
            let visible: String = value.chars().skip(scroll).collect();
            let fg = if enabled { C_TEXT } else { C_MUTED };
            Span::styled(visible, Style::default().fg(fg))
        };

        frame.render_widget(Paragraph::new(Line::from(vec![display])).block(block), area);

        if focused && enabled && inner.width > 0 {
            let cursor = self.input.visual_cursor().saturating_sub(scroll) as u16;
            frame.set_cursor_position((
                (inner.x + cursor).min(inner.x + inner.width - 1),
                inner.y,
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn typing_then_enter_submits() {
        let mut search = SearchBox::default();
        for c in "Pune".chars() {
            assert_eq!(search.handle_key(key(KeyCode::Char(c))), SearchAction::Edited);
        }
        assert_eq!(search.handle_key(key(KeyCode::Enter)), SearchAction::Submit("Pune".into()));
    }

    #[test]
    fn backspace_edits() {
        let mut search = SearchBox::default();
        search.set_value("Paris");
        search.handle_key(key(KeyCode::Backspace));
        assert_eq!(search.handle_key(key(KeyCode::Enter)), SearchAction::Submit("Pari".into()));
    }
}
