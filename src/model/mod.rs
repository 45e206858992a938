//! Model layer - centralized state management
//!
//! This module contains all state-related types:
//! - `LunarSnapshot` - the payload served by `/lunar-data`
//! - `ViewState` - loading / content / error visibility
//! - `presentation` - pure mapping from snapshot to display values
//! - `ModalStack` - modal overlay management

pub mod modal;
pub mod presentation;
pub mod snapshot;
pub mod ui;
pub mod view;

// Re-export commonly used types
pub use snapshot::{CurrentSnapshot, LunarSnapshot};
pub use view::ViewState;
