//! Root application component
//!
//! The App struct implements the Component trait, acting as the root component
//! that delegates event handling and rendering to child components.
//! It owns the fetch lifecycle: it starts requests, applies the newest result
//! and drives the loading / content / error transitions.

use crate::action::Action;
use crate::component::Component;
use crate::components::{
    draw_home_screen, DataPanel, HelpDialog, HomeComponent, HomeRenderContext, LocationBar,
    MoonPanel, QuitDialog, RawDataDialog, SplashComponent,
};
use crate::config::Config;
use crate::model::modal::{Modal, ModalStack};
use crate::model::presentation;
use crate::model::ui::AppMode;
use crate::model::{CurrentSnapshot, ViewState};
use crate::services::client::resolve_location;
use crate::services::{export_snapshot, ExportFormat, FetchOutcome, FetchRunner, Transport};
use anyhow::Result;
use chrono::{Local, Utc};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{layout::Rect, Frame};
use std::path::PathBuf;
use std::sync::Arc;

// ═══════════════════════════════════════════════════════════════════════════════
// App Struct
// ═══════════════════════════════════════════════════════════════════════════════

/// Main application state - coordinates between components
pub struct App {
    /// Current application mode
    pub mode: AppMode,

    /// Loading / content / error visibility
    pub view: ViewState,

    /// Last successfully fetched snapshot
    pub snapshot: Option<CurrentSnapshot>,

    /// Modal overlay stack
    pub modals: ModalStack,

    /// Background fetches of `/lunar-data`
    pub fetch_runner: FetchRunner,

    /// Effective configuration (file merged with CLI flags)
    pub config: Config,

    /// Flag to indicate the app should quit
    pub should_quit: bool,

    /// Status message to display
    pub status_message: Option<String>,

    /// Window title to apply (set on success, taken by the main loop)
    pub pending_title: Option<String>,

    /// Location of the newest request while it is in flight
    pub loading_location: Option<String>,

    // ─────────────────────────────────────────────────────────────────────────
    // Child Components
    // ─────────────────────────────────────────────────────────────────────────
    pub splash: SplashComponent,
    pub home: HomeComponent,
    pub location_bar: LocationBar,
    pub moon: MoonPanel,
    pub data_panel: DataPanel,
    pub quit_dialog: QuitDialog,
    pub help_dialog: HelpDialog,
    pub raw_data_dialog: RawDataDialog,
}

// ═══════════════════════════════════════════════════════════════════════════════
// App Implementation
// ═══════════════════════════════════════════════════════════════════════════════

impl App {
    /// Create a new App instance
    ///
    /// `initial_location` pre-fills the location field; blank means the
    /// configured default is requested.
    pub fn new(config: Config, transport: Arc<dyn Transport>, initial_location: Option<String>) -> App {
        let fetch_runner = FetchRunner::new(transport, config.base_url.clone());
        let location_bar = LocationBar::new(initial_location, config.default_location.clone());
        let moon = MoonPanel::new(config.enable_color);

        App {
            mode: AppMode::Splash,
            view: ViewState::new(),
            snapshot: None,
            modals: ModalStack::new(),
            fetch_runner,
            config,
            should_quit: false,
            status_message: None,
            pending_title: None,
            loading_location: None,
            splash: SplashComponent::new(),
            home: HomeComponent::new(),
            location_bar,
            moon,
            data_panel: DataPanel::new(),
            quit_dialog: QuitDialog,
            help_dialog: HelpDialog::default(),
            raw_data_dialog: RawDataDialog::new(None, ""),
        }
    }

    /// Start a fetch for the current location input
    fn fetch_lunar_data(&mut self) {
        let location = resolve_location(&self.location_bar.input, &self.config.default_location);

        self.view.begin_fetch();
        let generation = self.fetch_runner.spawn(location.clone());
        tracing::info!(
            generation,
            location = %location,
            base_url = self.fetch_runner.base_url(),
            "Fetching lunar data"
        );

        self.loading_location = Some(location);
        self.status_message = None;
    }

    /// Apply the result of the newest fetch
    fn apply_fetch_outcome(&mut self, outcome: FetchOutcome) {
        self.loading_location = None;

        match outcome.result {
            Ok(payload) => {
                tracing::info!(
                    generation = outcome.generation,
                    location = %outcome.location,
                    elapsed_ms = outcome.elapsed.as_millis() as u64,
                    phase = %payload.data.phase.name,
                    "Lunar data received"
                );

                self.pending_title = Some(presentation::window_title(&payload.data));
                self.snapshot = Some(CurrentSnapshot {
                    data: payload.data,
                    raw: payload.raw,
                    location: outcome.location,
                    received_at: Local::now(),
                });
                self.view.finish_success();
            }
            Err(err) => {
                tracing::warn!(
                    generation = outcome.generation,
                    location = %outcome.location,
                    error = %err,
                    "Lunar data request failed"
                );
                self.view.finish_failure(err.banner());
            }
        }
    }

    /// Write the current snapshot into the export directory
    fn export(&mut self, format: ExportFormat) {
        let Some(current) = self.snapshot.as_ref() else {
            self.status_message = Some("Nothing to export yet".to_string());
            return;
        };

        let dir = PathBuf::from(&self.config.export_dir);
        match export_snapshot(current, &dir, Utc::now().date_naive(), format) {
            Ok(path) => {
                tracing::info!(path = %path.display(), format = format.label(), "Exported snapshot");
                self.status_message =
                    Some(format!("Exported {} to {}", format.label(), path.display()));
            }
            Err(e) => {
                tracing::warn!(error = %format!("{:#}", e), "Export failed");
                self.status_message = Some(format!("Export failed: {:#}", e));
            }
        }
    }

    fn open_raw_data(&mut self) {
        let (raw, source) = match self.snapshot.as_ref() {
            Some(current) => (Some(&current.raw), current.location.clone()),
            None => (None, "empty".to_string()),
        };
        self.raw_data_dialog = RawDataDialog::new(raw, source);
        self.modals.push(Modal::RawData { scroll_offset: 0 });
    }

    fn scroll_modal(&mut self, delta: i16) {
        let apply = |offset: &mut usize| {
            *offset = if delta < 0 {
                offset.saturating_sub(delta.unsigned_abs() as usize)
            } else {
                offset.saturating_add(delta as usize)
            };
        };

        match self.modals.top_mut() {
            Some(Modal::Help { scroll_offset }) => {
                apply(scroll_offset);
                self.help_dialog.scroll_offset = *scroll_offset;
            }
            Some(Modal::RawData { scroll_offset }) => {
                apply(scroll_offset);
                self.raw_data_dialog.scroll_offset = *scroll_offset;
            }
            _ => {}
        }
    }
}

impl Component for App {
    fn init(&mut self) -> Result<()> {
        self.splash.init()?;
        // The first request runs while the splash is showing
        self.fetch_lunar_data();
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        // Global shortcuts
        match key.code {
            KeyCode::Char('c') if ctrl => return Ok(Some(Action::ForceQuit)),
            KeyCode::Char('r') if ctrl && self.mode == AppMode::Running => {
                return Ok(Some(Action::FetchLunarData))
            }
            KeyCode::F(5) if self.mode == AppMode::Running => {
                return Ok(Some(Action::FetchLunarData))
            }
            KeyCode::Char('e') if ctrl && self.mode == AppMode::Running => {
                return Ok(Some(Action::Export(ExportFormat::Json)))
            }
            KeyCode::Char('s') if ctrl && self.mode == AppMode::Running => {
                return Ok(Some(Action::Export(ExportFormat::Csv)))
            }
            _ => {}
        }

        match self.mode {
            AppMode::Splash => self.splash.handle_key_event(key),
            AppMode::Running => {
                if let Some(modal) = self.modals.top().cloned() {
                    self.handle_modal_key_event(&modal, key)
                } else if self.location_bar.editing {
                    self.location_bar.handle_key_event(key)
                } else {
                    self.home.handle_key_event(key)
                }
            }
        }
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            // ─────────────────────────────────────────────────────────────────
            // App Lifecycle
            // ─────────────────────────────────────────────────────────────────
            Action::Tick => {
                self.home.update(Action::Tick)?;
                if let Some(outcome) = self.fetch_runner.poll() {
                    self.apply_fetch_outcome(outcome);
                }
                if self.mode == AppMode::Splash && self.splash.is_complete() {
                    return Ok(Some(Action::SplashComplete));
                }
            }
            Action::SplashComplete => {
                self.mode = AppMode::Running;
            }
            Action::ForceQuit => {
                self.should_quit = true;
            }
            Action::Resize(_, _) => {}

            // ─────────────────────────────────────────────────────────────────
            // Data
            // ─────────────────────────────────────────────────────────────────
            Action::FetchLunarData => {
                self.location_bar.stop_editing();
                self.fetch_lunar_data();
            }
            Action::Export(format) => self.export(format),

            // ─────────────────────────────────────────────────────────────────
            // Location Input (delegate to LocationBar)
            // ─────────────────────────────────────────────────────────────────
            Action::EditLocation
            | Action::StopEditing
            | Action::LocationInput(_)
            | Action::LocationBackspace
            | Action::LocationClear => {
                self.location_bar.update(action)?;
            }

            // ─────────────────────────────────────────────────────────────────
            // Modals
            // ─────────────────────────────────────────────────────────────────
            Action::OpenQuitDialog => {
                self.modals.push(Modal::QuitConfirm);
            }
            Action::OpenHelp => {
                if matches!(self.modals.top(), Some(Modal::Help { .. })) {
                    self.modals.pop();
                } else {
                    self.help_dialog.scroll_offset = 0;
                    self.modals.push(Modal::Help { scroll_offset: 0 });
                }
            }
            Action::OpenRawData => self.open_raw_data(),
            Action::CloseModal => {
                self.modals.pop();
            }
            Action::ModalScroll(delta) => self.scroll_modal(delta),
        }
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        match self.mode {
            AppMode::Splash => self.splash.draw(frame, area)?,
            AppMode::Running => {
                let ctx = HomeRenderContext {
                    view: &self.view,
                    snapshot: self.snapshot.as_ref(),
                    loading_location: self.loading_location.as_deref(),
                    status_message: self.status_message.as_deref(),
                };

                draw_home_screen(
                    frame,
                    area,
                    &self.home,
                    &mut self.location_bar,
                    &mut self.moon,
                    &mut self.data_panel,
                    &ctx,
                )?;

                // Draw modal overlay if active
                if let Some(modal) = self.modals.top().cloned() {
                    self.draw_modal(frame, area, &modal)?;
                }
            }
        }
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Helper Methods
// ═══════════════════════════════════════════════════════════════════════════════

impl App {
    fn handle_modal_key_event(&mut self, modal: &Modal, key: KeyEvent) -> Result<Option<Action>> {
        match modal {
            Modal::QuitConfirm => self.quit_dialog.handle_key_event(key),
            Modal::Help { .. } => self.help_dialog.handle_key_event(key),
            Modal::RawData { .. } => self.raw_data_dialog.handle_key_event(key),
        }
    }

    fn draw_modal(&mut self, frame: &mut Frame, area: Rect, modal: &Modal) -> Result<()> {
        match modal {
            Modal::QuitConfirm => self.quit_dialog.draw(frame, area)?,
            Modal::Help { .. } => {
                self.help_dialog.draw(frame, area)?;
                // Keep the stored offset in line with the clamped one
                if let Some(Modal::Help { scroll_offset }) = self.modals.top_mut() {
                    *scroll_offset = self.help_dialog.scroll_offset;
                }
            }
            Modal::RawData { .. } => {
                self.raw_data_dialog.draw(frame, area)?;
                if let Some(Modal::RawData { scroll_offset }) = self.modals.top_mut() {
                    *scroll_offset = self.raw_data_dialog.scroll_offset;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::snapshot::fixtures::SAMPLE_JSON;
    use crate::services::client::stub::StubTransport;
    use ratatui::{backend::TestBackend, Terminal};
    use std::thread;
    use std::time::{Duration, Instant};

    fn app_with(stub: Arc<StubTransport>, config: Config) -> App {
        let mut app = App::new(config, stub, None);
        app.mode = AppMode::Running;
        app
    }

    /// Tick until the newest fetch has been applied
    fn settle(app: &mut App) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while app.fetch_runner.is_pending() && Instant::now() < deadline {
            app.update(Action::Tick).unwrap();
            thread::sleep(Duration::from_millis(5));
        }
        assert!(!app.fetch_runner.is_pending(), "fetch did not finish");
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    #[test]
    fn test_init_fetches_default_location() {
        let stub = Arc::new(StubTransport::reply(200, SAMPLE_JSON));
        let mut app = App::new(Config::default(), stub.clone(), None);
        app.init().unwrap();

        assert_eq!(app.mode, AppMode::Splash);
        assert!(app.view.loading);
        assert_eq!(app.loading_location.as_deref(), Some("Los Angeles, CA"));
        settle(&mut app);
        assert_eq!(stub.requested_urls().len(), 1);
    }

    #[test]
    fn test_success_shows_content() {
        let stub = Arc::new(StubTransport::reply(200, SAMPLE_JSON));
        let mut app = app_with(stub, Config::default());

        app.update(Action::FetchLunarData).unwrap();
        assert!(app.view.loading);
        assert!(!app.view.content);

        settle(&mut app);
        assert!(!app.view.loading);
        assert!(app.view.content);
        assert!(!app.view.error_visible());
        assert_eq!(
            app.pending_title.as_deref(),
            Some("🌔 Waxing Gibbous - Lunar Phase Calculator")
        );

        let current = app.snapshot.as_ref().unwrap();
        assert_eq!(current.data.phase.illumination, 78.4);
        assert_eq!(current.location, "Los Angeles, CA");
    }

    #[test]
    fn test_not_found_detail_in_banner() {
        let stub = Arc::new(StubTransport::reply(404, r#"{"detail":"not found"}"#));
        let mut app = app_with(stub, Config::default());

        app.update(Action::FetchLunarData).unwrap();
        settle(&mut app);

        assert!(!app.view.loading);
        assert!(!app.view.content);
        assert_eq!(
            app.view.error.as_deref(),
            Some("Failed to fetch lunar data: not found")
        );
        assert!(app.pending_title.is_none());
    }

    #[test]
    fn test_server_error_without_detail() {
        let stub = Arc::new(StubTransport::reply(500, "Internal Server Error"));
        let mut app = app_with(stub, Config::default());

        app.update(Action::FetchLunarData).unwrap();
        settle(&mut app);

        assert!(!app.view.loading);
        assert_eq!(
            app.view.error.as_deref(),
            Some("Failed to fetch lunar data: HTTP error! status: 500")
        );
    }

    #[test]
    fn test_transport_error_in_banner() {
        let stub = Arc::new(StubTransport::failing("connection refused"));
        let mut app = app_with(stub, Config::default());

        app.update(Action::FetchLunarData).unwrap();
        settle(&mut app);

        assert!(!app.view.loading);
        let banner = app.view.error.clone().unwrap();
        assert!(banner.starts_with("Failed to fetch lunar data: "));
        assert!(banner.contains("connection refused"));
    }

    #[test]
    fn test_blank_input_uses_default_location() {
        let stub = Arc::new(StubTransport::reply(200, SAMPLE_JSON));
        let mut app = app_with(stub.clone(), Config::default());
        app.location_bar.input = "   ".to_string();

        app.update(Action::FetchLunarData).unwrap();
        settle(&mut app);

        let urls = stub.requested_urls();
        assert_eq!(urls.len(), 1);
        assert!(urls[0].contains("location=Los+Angeles%2C+CA"), "{}", urls[0]);
    }

    #[test]
    fn test_typed_location_is_requested() {
        let stub = Arc::new(StubTransport::reply(200, SAMPLE_JSON));
        let mut app = app_with(stub.clone(), Config::default());

        app.update(Action::EditLocation).unwrap();
        for c in "Paris".chars() {
            let action = app.handle_key_event(key(KeyCode::Char(c))).unwrap().unwrap();
            app.update(action).unwrap();
        }
        let action = app.handle_key_event(key(KeyCode::Enter)).unwrap();
        assert_eq!(action, Some(Action::FetchLunarData));
        app.update(Action::FetchLunarData).unwrap();
        assert!(!app.location_bar.editing);

        settle(&mut app);
        assert!(stub.requested_urls()[0].ends_with("/lunar-data?location=Paris"));
        assert_eq!(app.snapshot.as_ref().unwrap().location, "Paris");
    }

    #[test]
    fn test_new_fetch_clears_previous_error() {
        let stub = Arc::new(StubTransport::reply(200, SAMPLE_JSON));
        let mut app = app_with(stub, Config::default());
        app.view.finish_failure("Failed to fetch lunar data: old".to_string());

        app.update(Action::FetchLunarData).unwrap();
        assert!(!app.view.error_visible());
        settle(&mut app);
        assert!(app.view.content);
    }

    #[test]
    fn test_overlapping_fetches_apply_latest() {
        let stub =
            Arc::new(StubTransport::reply(200, SAMPLE_JSON).with_delay(Duration::from_millis(20)));
        let mut app = app_with(stub, Config::default());

        app.location_bar.input = "Tokyo".to_string();
        app.update(Action::FetchLunarData).unwrap();
        app.location_bar.input = "Oslo".to_string();
        app.update(Action::FetchLunarData).unwrap();

        settle(&mut app);
        assert!(!app.view.loading);
        assert_eq!(app.snapshot.as_ref().unwrap().location, "Oslo");
    }

    #[test]
    fn test_global_shortcuts() {
        let stub = Arc::new(StubTransport::reply(200, SAMPLE_JSON));
        let mut app = app_with(stub, Config::default());

        assert_eq!(app.handle_key_event(ctrl('r')).unwrap(), Some(Action::FetchLunarData));
        assert_eq!(
            app.handle_key_event(key(KeyCode::F(5))).unwrap(),
            Some(Action::FetchLunarData)
        );
        assert_eq!(app.handle_key_event(ctrl('c')).unwrap(), Some(Action::ForceQuit));

        // Refresh is not available during the splash
        app.mode = AppMode::Splash;
        assert_eq!(app.handle_key_event(ctrl('r')).unwrap(), Some(Action::SplashComplete));
    }

    #[test]
    fn test_export_shortcuts_reach_past_editing_and_modals() {
        let stub = Arc::new(StubTransport::reply(200, SAMPLE_JSON));
        let mut app = app_with(stub, Config::default());

        app.location_bar.editing = true;
        assert_eq!(
            app.handle_key_event(ctrl('e')).unwrap(),
            Some(Action::Export(ExportFormat::Json))
        );
        assert_eq!(app.location_bar.input, "");

        app.location_bar.editing = false;
        app.update(Action::OpenRawData).unwrap();
        assert!(app.modals.top().is_some());
        assert_eq!(
            app.handle_key_event(ctrl('s')).unwrap(),
            Some(Action::Export(ExportFormat::Csv))
        );

        app.update(Action::OpenHelp).unwrap();
        assert_eq!(
            app.handle_key_event(ctrl('e')).unwrap(),
            Some(Action::Export(ExportFormat::Json))
        );
    }

    #[test]
    fn test_quit_dialog_flow() {
        let stub = Arc::new(StubTransport::reply(200, SAMPLE_JSON));
        let mut app = app_with(stub, Config::default());

        let action = app.handle_key_event(key(KeyCode::Char('q'))).unwrap().unwrap();
        app.update(action).unwrap();
        assert_eq!(app.modals.top(), Some(&Modal::QuitConfirm));

        let action = app.handle_key_event(key(KeyCode::Char('n'))).unwrap().unwrap();
        app.update(action).unwrap();
        assert!(app.modals.top().is_none());

        app.update(Action::OpenQuitDialog).unwrap();
        let action = app.handle_key_event(key(KeyCode::Char('y'))).unwrap().unwrap();
        app.update(action).unwrap();
        assert!(app.should_quit);
    }

    #[test]
    fn test_raw_data_modal_scrolls() {
        let stub = Arc::new(StubTransport::reply(200, SAMPLE_JSON));
        let mut app = app_with(stub, Config::default());
        app.update(Action::FetchLunarData).unwrap();
        settle(&mut app);

        app.update(Action::OpenRawData).unwrap();
        app.update(Action::ModalScroll(3)).unwrap();
        app.update(Action::ModalScroll(-1)).unwrap();
        assert_eq!(app.modals.top(), Some(&Modal::RawData { scroll_offset: 2 }));
        assert_eq!(app.raw_data_dialog.scroll_offset, 2);

        app.update(Action::ModalScroll(-10)).unwrap();
        assert_eq!(app.raw_data_dialog.scroll_offset, 0);
    }

    #[test]
    fn test_export_without_snapshot() {
        let stub = Arc::new(StubTransport::reply(200, SAMPLE_JSON));
        let mut app = app_with(stub, Config::default());

        app.update(Action::Export(ExportFormat::Json)).unwrap();
        assert_eq!(app.status_message.as_deref(), Some("Nothing to export yet"));
    }

    #[test]
    fn test_export_writes_dated_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            export_dir: dir.path().to_string_lossy().into_owned(),
            ..Config::default()
        };
        let stub = Arc::new(StubTransport::reply(200, SAMPLE_JSON));
        let mut app = app_with(stub, config);
        app.update(Action::FetchLunarData).unwrap();
        settle(&mut app);

        app.update(Action::Export(ExportFormat::Csv)).unwrap();

        let expected = dir.path().join(format!(
            "lunar-data-{}.csv",
            Utc::now().date_naive().format("%Y-%m-%d")
        ));
        assert!(expected.exists());
        assert!(app.status_message.as_deref().unwrap().starts_with("Exported CSV"));
    }

    #[test]
    fn test_draw_after_success() {
        let stub = Arc::new(StubTransport::reply(200, SAMPLE_JSON));
        let mut app = app_with(stub, Config::default());
        app.update(Action::FetchLunarData).unwrap();
        settle(&mut app);
        app.update(Action::OpenHelp).unwrap();

        let mut terminal = Terminal::new(TestBackend::new(140, 45)).unwrap();
        terminal
            .draw(|frame| {
                app.draw(frame, frame.area()).unwrap();
            })
            .unwrap();

        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("Keyboard Shortcuts"));
    }
}
