//! Splash screen component
//!
//! Displays a moon logo briefly before transitioning to the main app.
//! The first fetch is already running underneath.

use crate::action::Action;
use crate::component::Component;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Clear, Paragraph},
    Frame,
};
use std::time::{Duration, Instant};

const MOONLIGHT: Color = Color::Rgb(232, 228, 200);

/// Splash screen component
pub struct SplashComponent {
    /// When the splash screen was shown
    start_time: Option<Instant>,
    /// Duration to show splash before auto-advancing
    duration: Duration,
}

impl Default for SplashComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl SplashComponent {
    pub fn new() -> Self {
        Self {
            start_time: None,
            duration: Duration::from_millis(1200),
        }
    }

    /// Check if splash duration has elapsed
    pub fn is_complete(&self) -> bool {
        self.start_time
            .map(|t| t.elapsed() >= self.duration)
            .unwrap_or(false)
    }

    /// Crescent moon as ASCII art
    fn get_logo() -> Vec<&'static str> {
        vec![
            "        @@@@@@@         ",
            "     @@@@@@@            ",
            "   @@@@@@@              ",
            "  @@@@@@@          *    ",
            " @@@@@@@@               ",
            " @@@@@@@@        .      ",
            " @@@@@@@@@              ",
            "  @@@@@@@@@        *    ",
            "   @@@@@@@@@@           ",
            "     @@@@@@@@@@@@       ",
            "        @@@@@@@@@       ",
        ]
    }
}

impl Component for SplashComponent {
    fn init(&mut self) -> Result<()> {
        self.start_time = Some(Instant::now());
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        // Any key press skips the splash screen
        match key.code {
            KeyCode::Char('q') => Ok(Some(Action::ForceQuit)),
            _ => Ok(Some(Action::SplashComplete)),
        }
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        if action == Action::Tick && self.is_complete() {
            return Ok(Some(Action::SplashComplete));
        }
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        // True black so the night sky looks the same on every theme
        let bg_black = Color::Rgb(0, 0, 0);

        frame.render_widget(Clear, area);
        frame.render_widget(
            Block::default().style(Style::default().bg(bg_black)),
            area,
        );

        let logo_lines = Self::get_logo();
        let logo_height = logo_lines.len() as u16;
        let logo_width = logo_lines.first().map(|l| l.len()).unwrap_or(0) as u16;

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length((area.height.saturating_sub(logo_height + 4)) / 2),
                Constraint::Length(logo_height),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .split(area);

        let logo_paragraph: Vec<Line> = logo_lines
            .iter()
            .map(|line| {
                let styled_line: Vec<Span> = line
                    .chars()
                    .map(|c| {
                        let style = match c {
                            '@' => Style::default().fg(MOONLIGHT).bg(bg_black),
                            '*' | '.' => Style::default().fg(Color::Yellow).bg(bg_black),
                            _ => Style::default().fg(bg_black).bg(bg_black),
                        };
                        Span::styled(c.to_string(), style)
                    })
                    .collect();
                Line::from(styled_line)
            })
            .collect();

        let centered_x = area.x + (area.width.saturating_sub(logo_width)) / 2;
        let logo_rect = Rect::new(
            centered_x,
            chunks[1].y,
            logo_width.min(area.width),
            chunks[1].height,
        );
        frame.render_widget(Paragraph::new(logo_paragraph), logo_rect);

        let title = Line::from(vec![
            Span::styled(
                "lunar",
                Style::default()
                    .fg(MOONLIGHT)
                    .bg(bg_black)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                "-tui",
                Style::default()
                    .fg(Color::White)
                    .bg(bg_black)
                    .add_modifier(Modifier::BOLD),
            ),
        ]);
        frame.render_widget(
            Paragraph::new(title).alignment(ratatui::layout::Alignment::Center),
            chunks[3],
        );

        let subtitle = Line::from(Span::styled(
            "Phase, position and libration of the Moon",
            Style::default().fg(Color::DarkGray).bg(bg_black),
        ));
        frame.render_widget(
            Paragraph::new(subtitle).alignment(ratatui::layout::Alignment::Center),
            chunks[4],
        );

        Ok(())
    }
}
