//! Home component - Main application screen
//!
//! Displays the location bar, the error banner, the loading indicator or
//! the moon and data panels, and the status and help bars.

use crate::action::Action;
use crate::component::Component;
use crate::components::layout::{calculate_content_layout, calculate_main_layout};
use crate::components::{DataPanel, LocationBar, MoonPanel};
use crate::model::presentation;
use crate::model::{CurrentSnapshot, ViewState};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

const SPINNER: [&str; 8] = ["🌑", "🌒", "🌓", "🌔", "🌕", "🌖", "🌗", "🌘"];

// ═══════════════════════════════════════════════════════════════════════════════
// Home Component
// ═══════════════════════════════════════════════════════════════════════════════

/// Home component for the main application view
#[derive(Default)]
pub struct HomeComponent {
    /// Current frame of the loading spinner
    pub spinner_frame: usize,
}

impl HomeComponent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spinner(&self) -> &'static str {
        SPINNER[self.spinner_frame % SPINNER.len()]
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Component Implementation
// ═══════════════════════════════════════════════════════════════════════════════

impl Component for HomeComponent {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let action = match key.code {
            // Data
            KeyCode::Enter | KeyCode::Char('r') if !ctrl => Some(Action::FetchLunarData),
            KeyCode::Char('d') if !ctrl => Some(Action::OpenRawData),

            // Location
            KeyCode::Char('/') | KeyCode::Char('i') => Some(Action::EditLocation),

            // Modals
            KeyCode::Char('q') => Some(Action::OpenQuitDialog),
            KeyCode::Char('?') => Some(Action::OpenHelp),

            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        if action == Action::Tick {
            self.spinner_frame = self.spinner_frame.wrapping_add(1);
        }
        Ok(None)
    }

    fn draw(&mut self, _frame: &mut Frame, _area: Rect) -> Result<()> {
        // Drawing is done through draw_home_screen which takes full context
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Rendering Functions
// ═══════════════════════════════════════════════════════════════════════════════

/// Context needed for rendering the home screen
pub struct HomeRenderContext<'a> {
    pub view: &'a ViewState,
    pub snapshot: Option<&'a CurrentSnapshot>,
    /// Location of the request in flight, shown while loading
    pub loading_location: Option<&'a str>,
    pub status_message: Option<&'a str>,
}

/// Draw the home screen
pub fn draw_home_screen(
    frame: &mut Frame,
    area: Rect,
    home: &HomeComponent,
    location_bar: &mut LocationBar,
    moon: &mut MoonPanel,
    data_panel: &mut DataPanel,
    ctx: &HomeRenderContext,
) -> Result<()> {
    let layout = calculate_main_layout(area, ctx.view.error_visible());

    location_bar.draw(frame, layout.location)?;

    if let (Some(error_area), Some(message)) = (layout.error, ctx.view.error.as_deref()) {
        render_error_banner(frame, error_area, message);
    }

    if ctx.view.loading {
        render_loading(frame, layout.body, home, ctx.loading_location);
    } else if ctx.view.content {
        let content = calculate_content_layout(layout.body);
        let data = ctx.snapshot.map(|s| &s.data);

        moon.set_snapshot(data);
        moon.draw(frame, content.moon)?;

        data_panel.set_snapshot(data);
        data_panel.draw(frame, content.data)?;
    }

    render_status_bar(frame, layout.status, ctx);
    render_help_bar(frame, layout.help, location_bar.editing);

    Ok(())
}

fn render_error_banner(frame: &mut Frame, area: Rect, message: &str) {
    let paragraph = Paragraph::new(Line::from(Span::styled(
        message.to_string(),
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
    )))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red)),
    )
    .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn render_loading(frame: &mut Frame, area: Rect, home: &HomeComponent, location: Option<&str>) {
    let target = location.unwrap_or("your location");
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            home.spinner().to_string(),
            Style::default().fg(Color::Yellow),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!("Calculating lunar data for {}...", target),
            Style::default().fg(Color::Cyan),
        )),
    ];

    let top = area.y + area.height.saturating_sub(lines.len() as u16) / 2;
    let loading_area = Rect::new(
        area.x,
        top,
        area.width,
        (lines.len() as u16).min(area.height),
    );
    frame.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center),
        loading_area,
    );
}

fn render_status_bar(frame: &mut Frame, area: Rect, ctx: &HomeRenderContext) {
    let mut spans = vec![];

    if let Some(current) = ctx.snapshot {
        spans.push(Span::styled(
            format!(" {} ", current.location),
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw(" "));
        spans.push(Span::styled(
            format!("{} {}", current.data.phase.emoji, current.data.phase.name),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ));
        if let Some(readout) = presentation::observer_readout(&current.data) {
            spans.push(Span::styled(
                format!("  {}", readout),
                Style::default().fg(Color::Gray),
            ));
        }
        spans.push(Span::styled(
            format!(" (updated {})", current.received_at.format("%H:%M:%S")),
            Style::default().fg(Color::DarkGray),
        ));
    }

    if let Some(status) = ctx.status_message {
        spans.push(Span::styled(
            format!(" {} ", status),
            Style::default().fg(Color::Yellow),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_help_bar(frame: &mut Frame, area: Rect, editing: bool) {
    let key = |k: &'static str, color: Color| {
        Span::styled(k, Style::default().fg(color).add_modifier(Modifier::BOLD))
    };

    let help_spans = if editing {
        vec![
            key(" Enter ", Color::Green),
            Span::raw("Fetch  "),
            key(" Esc ", Color::Yellow),
            Span::raw("Done  "),
            key(" Ctrl+u ", Color::Cyan),
            Span::raw("Clear"),
        ]
    } else {
        vec![
            key(" q ", Color::Yellow),
            Span::raw("Quit "),
            key(" r ", Color::Green),
            Span::raw("Fetch "),
            key(" / ", Color::Cyan),
            Span::raw("Location "),
            key(" d ", Color::Magenta),
            Span::raw("Raw "),
            key(" ^e ", Color::Blue),
            Span::raw("JSON "),
            key(" ^s ", Color::Blue),
            Span::raw("CSV "),
            key(" ? ", Color::White),
            Span::raw("Help"),
        ]
    };

    frame.render_widget(Paragraph::new(Line::from(help_spans)), area);
}
