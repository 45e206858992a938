//! UI Components
//!
//! Each component encapsulates its own state, event handling, and rendering logic.
//! Components communicate through Actions rather than direct state mutation.

pub mod data_panel;
pub mod help_dialog;
pub mod home;
pub mod layout;
pub mod location_bar;
pub mod moon;
pub mod quit_dialog;
pub mod raw_data_dialog;
pub mod splash;

pub use data_panel::DataPanel;
pub use help_dialog::HelpDialog;
pub use home::{draw_home_screen, HomeComponent, HomeRenderContext};
pub use layout::centered_popup;
pub use location_bar::LocationBar;
pub use moon::MoonPanel;
pub use quit_dialog::QuitDialog;
pub use raw_data_dialog::RawDataDialog;
pub use splash::SplashComponent;
