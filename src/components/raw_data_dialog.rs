//! Raw data dialog - the last payload as pretty-printed JSON

use crate::action::Action;
use crate::component::Component;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};

/// Scrollable view of the raw payload
pub struct RawDataDialog {
    pub scroll_offset: usize,
    lines: Vec<String>,
    subtitle: String,
}

impl RawDataDialog {
    /// Build the dialog for a payload. `subtitle` names where it came from.
    pub fn new(raw: Option<&serde_json::Value>, subtitle: impl Into<String>) -> Self {
        let lines = match raw {
            Some(value) => serde_json::to_string_pretty(value)
                .unwrap_or_else(|e| format!("<unprintable payload: {}>", e))
                .lines()
                .map(str::to_string)
                .collect(),
            None => vec!["No lunar data loaded yet.".to_string()],
        };

        Self {
            scroll_offset: 0,
            lines,
            subtitle: subtitle.into(),
        }
    }

    /// Colour JSON keys apart from their values
    fn styled_line(line: &str) -> Line<'static> {
        match line.split_once("\": ") {
            Some((key, value)) => Line::from(vec![
                Span::styled(format!("{}\":", key), Style::default().fg(Color::Cyan)),
                Span::raw(" "),
                Span::styled(value.to_string(), Style::default().fg(Color::White)),
            ]),
            None => Line::from(Span::styled(
                line.to_string(),
                Style::default().fg(Color::DarkGray),
            )),
        }
    }
}

impl Component for RawDataDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('d') => Some(Action::CloseModal),
            KeyCode::Char('j') | KeyCode::Down => Some(Action::ModalScroll(1)),
            KeyCode::Char('k') | KeyCode::Up => Some(Action::ModalScroll(-1)),
            KeyCode::PageDown => Some(Action::ModalScroll(10)),
            KeyCode::PageUp => Some(Action::ModalScroll(-10)),
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let dialog_area = area.inner(Margin {
            vertical: 2,
            horizontal: 6,
        });
        frame.render_widget(Clear, dialog_area);

        let total = self.lines.len();
        let visible_height = dialog_area.height.saturating_sub(2) as usize;
        let max_scroll = total.saturating_sub(visible_height);
        if self.scroll_offset > max_scroll {
            self.scroll_offset = max_scroll;
        }

        let content: Vec<Line> = self.lines.iter().map(|l| Self::styled_line(l)).collect();

        let paragraph = Paragraph::new(content)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" Raw Data - {} ", self.subtitle))
                    .title_style(
                        Style::default()
                            .fg(Color::Magenta)
                            .add_modifier(Modifier::BOLD),
                    )
                    .title_bottom(Line::from(" j/k Scroll  q Close ").right_aligned())
                    .border_style(Style::default().fg(Color::Magenta)),
            )
            .scroll((self.scroll_offset as u16, 0));
        frame.render_widget(paragraph, dialog_area);

        if total > visible_height {
            let mut scrollbar_state = ScrollbarState::new(max_scroll).position(self.scroll_offset);
            frame.render_stateful_widget(
                Scrollbar::new(ScrollbarOrientation::VerticalRight),
                dialog_area.inner(Margin {
                    vertical: 1,
                    horizontal: 0,
                }),
                &mut scrollbar_state,
            );
        }

        Ok(())
    }
}
