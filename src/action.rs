//! Action enum - All possible application actions
//!
//! Actions are discrete operations that the application can perform.
//! Components emit Actions in response to events, and the App processes
//! them to update state.

use crate::services::ExportFormat;
use std::fmt;

/// All possible actions in the application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // ─────────────────────────────────────────────────────────────────────────
    // App Lifecycle
    // ─────────────────────────────────────────────────────────────────────────
    /// Regular tick for polling and animations
    Tick,
    /// Terminal was resized
    Resize(u16, u16),
    /// Quit without confirmation
    ForceQuit,
    /// Transition from splash to main screen
    SplashComplete,

    // ─────────────────────────────────────────────────────────────────────────
    // Data
    // ─────────────────────────────────────────────────────────────────────────
    /// Request lunar data for the current location input
    FetchLunarData,
    /// Write the current snapshot to disk
    Export(ExportFormat),

    // ─────────────────────────────────────────────────────────────────────────
    // Location Input
    // ─────────────────────────────────────────────────────────────────────────
    /// Start editing the location field
    EditLocation,
    /// Stop editing, keeping the text
    StopEditing,
    /// Append a character to the location
    LocationInput(char),
    /// Remove the last character of the location
    LocationBackspace,
    /// Clear the location field
    LocationClear,

    // ─────────────────────────────────────────────────────────────────────────
    // Modals
    // ─────────────────────────────────────────────────────────────────────────
    /// Open quit confirmation dialog
    OpenQuitDialog,
    /// Open help dialog showing all keyboard shortcuts
    OpenHelp,
    /// Open the raw payload view
    OpenRawData,
    /// Close the current modal
    CloseModal,
    /// Scroll the current modal
    ModalScroll(i16),
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Tick => write!(f, "Tick"),
            Action::Resize(w, h) => write!(f, "Resize({}, {})", w, h),
            Action::ForceQuit => write!(f, "ForceQuit"),
            Action::SplashComplete => write!(f, "SplashComplete"),
            Action::FetchLunarData => write!(f, "FetchLunarData"),
            Action::Export(format) => write!(f, "Export({})", format.label()),
            Action::EditLocation => write!(f, "EditLocation"),
            Action::StopEditing => write!(f, "StopEditing"),
            Action::LocationInput(c) => write!(f, "LocationInput('{}')", c),
            Action::LocationBackspace => write!(f, "LocationBackspace"),
            Action::LocationClear => write!(f, "LocationClear"),
            Action::OpenQuitDialog => write!(f, "OpenQuitDialog"),
            Action::OpenHelp => write!(f, "OpenHelp"),
            Action::OpenRawData => write!(f, "OpenRawData"),
            Action::CloseModal => write!(f, "CloseModal"),
            Action::ModalScroll(delta) => write!(f, "ModalScroll({})", delta),
        }
    }
}
