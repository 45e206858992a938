//! Data panel - the six labeled data sections
//!
//! Sections are laid out in a two-column grid and rebuilt from the snapshot
//! on every draw.

use crate::component::Component;
use crate::model::presentation::{self, DataSection};
use crate::model::LunarSnapshot;
use anyhow::Result;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

const COLUMNS: usize = 2;

/// Border colour per section, in display order
const SECTION_COLORS: [Color; 6] = [
    Color::Yellow,
    Color::Green,
    Color::Cyan,
    Color::Blue,
    Color::Magenta,
    Color::LightRed,
];

/// Grid of data sections
pub struct DataPanel {
    snapshot: Option<LunarSnapshot>,
}

impl Default for DataPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl DataPanel {
    pub fn new() -> Self {
        Self { snapshot: None }
    }

    /// Set the snapshot to display
    pub fn set_snapshot(&mut self, snapshot: Option<&LunarSnapshot>) {
        self.snapshot = snapshot.cloned();
    }

    /// Lines for one section, labels padded to a common width
    fn section_lines(section: &DataSection) -> Vec<Line<'static>> {
        let label_width = section
            .items
            .iter()
            .map(|item| item.label.width() + 1)
            .max()
            .unwrap_or(0);

        section
            .items
            .iter()
            .map(|item| {
                let label = format!("{}:", item.label);
                let padding = " ".repeat(label_width.saturating_sub(label.width()));
                Line::from(vec![
                    Span::styled(label, Style::default().fg(Color::DarkGray)),
                    Span::raw(padding),
                    Span::raw(" "),
                    Span::styled(
                        item.value.clone(),
                        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                    ),
                ])
            })
            .collect()
    }
}

impl Component for DataPanel {
    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let Some(snapshot) = self.snapshot.as_ref() else {
            return Ok(());
        };

        let sections = presentation::data_sections(snapshot);
        let rows = sections.len().div_ceil(COLUMNS);

        let row_areas = Layout::default()
            .direction(Direction::Vertical)
            .constraints(vec![Constraint::Ratio(1, rows as u32); rows])
            .split(area);

        for (index, section) in sections.iter().enumerate() {
            let columns = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                .split(row_areas[index / COLUMNS]);
            let cell = columns[index % COLUMNS];
            let color = SECTION_COLORS[index % SECTION_COLORS.len()];

            let paragraph = Paragraph::new(Self::section_lines(section)).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(color))
                    .title(format!(" {} ", section.title))
                    .title_style(Style::default().fg(color).add_modifier(Modifier::BOLD)),
            );
            frame.render_widget(paragraph, cell);
        }

        Ok(())
    }
}
