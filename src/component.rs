//! Component trait - Interface for UI components
//!
//! Each component encapsulates its own state, event handling, and rendering logic.
//! Components communicate through Actions rather than direct state mutation.

use crate::action::Action;
use anyhow::Result;
use crossterm::event::KeyEvent;
use ratatui::{layout::Rect, Frame};

/// Trait for UI components
///
/// The pattern follows:
/// 1. `handle_key_event` - Convert key presses to Actions
/// 2. `update` - Process Actions and update state
/// 3. `draw` - Render the component
pub trait Component {
    /// Initialize the component
    ///
    /// Called once before the main loop starts.
    fn init(&mut self) -> Result<()> {
        Ok(())
    }

    /// Handle a key event, returning an optional Action
    ///
    /// Components should only translate keys here and leave state changes
    /// to `update`. Text inputs are the exception.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let _ = key;
        Ok(None)
    }

    /// Update component state based on an Action
    ///
    /// May return a follow-up Action, which the main loop feeds back in.
    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        let _ = action;
        Ok(None)
    }

    /// Draw the component to the frame
    ///
    /// Rendering only - no state changes beyond clamping scroll offsets.
    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()>;
}
