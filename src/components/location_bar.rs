//! Location input bar
//!
//! Single-line text field for the location plus a fetch hint. The field is
//! only checked cosmetically: short input turns the border red and dims the
//! hint, but never blocks a fetch.

use crate::action::Action;
use crate::component::Component;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Inputs shorter than this (after trimming) are flagged
const MIN_LOCATION_LEN: usize = 2;

/// Location input bar
pub struct LocationBar {
    /// Current input text
    pub input: String,
    /// Whether keys are being typed into the field
    pub editing: bool,
    /// Set once the user has typed; validation is only shown afterwards
    pub touched: bool,
    /// Shown in the empty field
    placeholder: String,
}

impl LocationBar {
    pub fn new(initial: Option<String>, placeholder: impl Into<String>) -> Self {
        Self {
            input: initial.unwrap_or_default(),
            editing: false,
            touched: false,
            placeholder: placeholder.into(),
        }
    }

    /// Whether the input passes the cosmetic length check
    pub fn is_valid(&self) -> bool {
        self.input.trim().chars().count() >= MIN_LOCATION_LEN
    }

    /// Whether the invalid styling should be shown
    pub fn shows_invalid(&self) -> bool {
        self.touched && !self.is_valid()
    }

    pub fn start_editing(&mut self) {
        self.editing = true;
    }

    pub fn stop_editing(&mut self) {
        self.editing = false;
    }

    pub fn push(&mut self, c: char) {
        self.input.push(c);
        self.touched = true;
    }

    pub fn backspace(&mut self) {
        self.input.pop();
        self.touched = true;
    }

    pub fn clear(&mut self) {
        self.input.clear();
        self.touched = true;
    }
}

impl Component for LocationBar {
    /// Keys while the field has focus
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Enter => Some(Action::FetchLunarData),
            KeyCode::Esc => Some(Action::StopEditing),
            KeyCode::Backspace => Some(Action::LocationBackspace),
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Action::LocationClear)
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Action::LocationInput(c))
            }
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            Action::EditLocation => self.start_editing(),
            Action::StopEditing => self.stop_editing(),
            Action::LocationInput(c) => self.push(c),
            Action::LocationBackspace => self.backspace(),
            Action::LocationClear => self.clear(),
            _ => {}
        }
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(10), Constraint::Length(16)])
            .split(area);

        let border_color = if self.shows_invalid() {
            Color::Red
        } else if self.editing {
            Color::Blue
        } else {
            Color::DarkGray
        };

        let mut spans = Vec::new();
        if self.input.is_empty() && !self.editing {
            spans.push(Span::styled(
                self.placeholder.clone(),
                Style::default().fg(Color::DarkGray),
            ));
        } else {
            spans.push(Span::styled(
                self.input.clone(),
                Style::default().fg(Color::White),
            ));
        }
        if self.editing {
            spans.push(Span::styled("_", Style::default().fg(Color::Cyan)));
        }

        let field = Paragraph::new(Line::from(spans)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border_color))
                .title(" Location ")
                .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        );
        frame.render_widget(field, chunks[0]);

        let hint_style = if self.shows_invalid() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
        };
        let hint = Paragraph::new(Line::from(Span::styled(" Enter  Fetch ", hint_style)))
            .alignment(ratatui::layout::Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(hint, chunks[1]);

        Ok(())
    }
}
