//! Layout calculations for the UI

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Main screen layout areas
pub struct MainLayout {
    pub location: Rect,
    pub error: Option<Rect>,
    pub body: Rect,
    pub status: Rect,
    pub help: Rect,
}

/// Content area split: moon on the left, data sections on the right
pub struct ContentLayout {
    pub moon: Rect,
    pub data: Rect,
}

/// Calculate centered popup area
pub fn centered_popup(area: Rect, width: u16, height: u16) -> Rect {
    let popup_x = area.x + (area.width.saturating_sub(width)) / 2;
    let popup_y = area.y + (area.height.saturating_sub(height)) / 2;

    Rect::new(
        popup_x,
        popup_y,
        width.min(area.width),
        height.min(area.height),
    )
}

/// Calculate main screen layout
///
/// Location bar on top, an optional error banner, the body, then a status
/// line and the help bar.
pub fn calculate_main_layout(area: Rect, has_error: bool) -> MainLayout {
    let error_height = if has_error { 3 } else { 0 };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(error_height),
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

    MainLayout {
        location: chunks[0],
        error: has_error.then_some(chunks[1]),
        body: chunks[2],
        status: chunks[3],
        help: chunks[4],
    }
}

/// Split the body between the moon panel and the data panel
pub fn calculate_content_layout(body: Rect) -> ContentLayout {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(body);

    ContentLayout {
        moon: chunks[0],
        data: chunks[1],
    }
}
