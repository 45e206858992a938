//! Moon panel - ASCII moon disc plus the libration narrative

use crate::component::Component;
use crate::model::presentation::{self, MoonCell};
use crate::model::LunarSnapshot;
use anyhow::Result;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Base grey of a lit cell before brightness is applied
const LIT_BASE: f64 = 200.0;

/// Moon image and libration description
pub struct MoonPanel {
    snapshot: Option<LunarSnapshot>,
    enable_color: bool,
}

impl MoonPanel {
    pub fn new(enable_color: bool) -> Self {
        Self {
            snapshot: None,
            enable_color,
        }
    }

    /// Set the snapshot to display
    pub fn set_snapshot(&mut self, snapshot: Option<&LunarSnapshot>) {
        self.snapshot = snapshot.cloned();
    }

    /// Colour for lit cells, scaled by the brightness factor
    fn lit_color(brightness: f64) -> Color {
        let level = (LIT_BASE * brightness).round().clamp(0.0, 255.0) as u8;
        // Slightly warm tint, like moonlight
        Color::Rgb(level, level, level.saturating_sub(12))
    }

    fn moon_lines(&self, snapshot: &LunarSnapshot, width: usize, height: usize) -> Vec<Line<'static>> {
        let cells = presentation::moon_cells(
            snapshot.phase.illumination,
            snapshot.phase.angle,
            presentation::rotation_angle(snapshot.libration.total),
            width,
            height,
        );

        let (lit_glyph, shadow_glyph) = if self.enable_color {
            ("█", "·")
        } else {
            ("#", ".")
        };
        let lit_style = if self.enable_color {
            Style::default().fg(Self::lit_color(presentation::brightness(
                snapshot.phase.illumination,
            )))
        } else {
            Style::default()
        };
        let shadow_style = Style::default().fg(Color::DarkGray);

        cells
            .iter()
            .map(|row| {
                let spans: Vec<Span> = row
                    .iter()
                    .map(|cell| match cell {
                        MoonCell::Space => Span::raw(" "),
                        MoonCell::Shadow => Span::styled(shadow_glyph, shadow_style),
                        MoonCell::Lit => Span::styled(lit_glyph, lit_style),
                    })
                    .collect();
                Line::from(spans)
            })
            .collect()
    }
}

impl Component for MoonPanel {
    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let Some(snapshot) = self.snapshot.as_ref() else {
            return Ok(());
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(5), Constraint::Length(7)])
            .split(area);

        // Moon image
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Blue))
            .title(format!(" {} ", presentation::moon_caption(snapshot)))
            .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
        let inner = block.inner(chunks[0]);
        frame.render_widget(block, chunks[0]);

        // Terminal cells are about twice as tall as wide
        let height = (inner.height as usize).min(inner.width as usize / 2);
        let width = height * 2;
        if height > 0 {
            let x = inner.x + (inner.width.saturating_sub(width as u16)) / 2;
            let y = inner.y + (inner.height.saturating_sub(height as u16)) / 2;
            let disc_area = Rect::new(x, y, width as u16, height as u16);
            let lines = self.moon_lines(snapshot, width, height);
            frame.render_widget(Paragraph::new(lines), disc_area);
        }

        // Libration narrative
        let summary = presentation::libration_summary(snapshot);
        // Highlight the wobble label inside the sentence
        let sentence = match summary.sentence.split_once(summary.label) {
            Some((before, after)) => Line::from(vec![
                Span::raw(before.to_string()),
                Span::styled(
                    summary.label,
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                ),
                Span::raw(after.to_string()),
            ]),
            None => Line::from(summary.sentence.clone()),
        };
        let text = vec![
            sentence,
            Line::from(""),
            Line::from(Span::styled(
                summary.components,
                Style::default().fg(Color::DarkGray),
            )),
        ];

        let paragraph = Paragraph::new(text)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::DarkGray))
                    .title(format!(" {} ", summary.heading))
                    .title_style(Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD)),
            )
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, chunks[1]);

        Ok(())
    }
}
