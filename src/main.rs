//! lunar-tui - A terminal viewer for the current state of the Moon
//!
//! This is the main entry point for the lunar-tui application.
//! It uses the Component Architecture pattern from ratatui.

mod action;
mod app;
mod component;
mod components;
mod config;
mod logging;
mod model;
mod services;
mod tui;

use crate::action::Action;
use crate::app::App;
use crate::component::Component;
use crate::config::Config;
use crate::services::HttpTransport;
use crate::tui::Tui;
use anyhow::Result;
use clap::Parser;
use crossterm::event::Event;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "lunar-tui")]
#[command(author, version, about = "Phase, position and libration of the Moon", long_about = None)]
struct Args {
    /// Backend serving /lunar-data
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Location to fill in and request at startup
    #[arg(short, long, value_name = "PLACE")]
    location: Option<String>,

    /// Directory for JSON and CSV exports
    #[arg(long, value_name = "DIR")]
    export_dir: Option<PathBuf>,

    /// Draw the moon without colour
    #[arg(long)]
    no_color: bool,

    /// Write the effective settings to the config file
    #[arg(long)]
    save_config: bool,

    /// Verbose logging (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    /// Apply command line overrides on top of the loaded config
    fn merge_into(&self, mut config: Config) -> Config {
        if let Some(ref base_url) = self.base_url {
            config.base_url = base_url.clone();
        }
        if let Some(ref dir) = self.export_dir {
            config.export_dir = dir.to_string_lossy().into_owned();
        }
        if self.no_color {
            config.enable_color = false;
        }
        config
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = args.merge_into(Config::load_or_default());
    if args.save_config {
        let path = config.save()?;
        println!("Saved config to {}", path.display());
    }

    // Logs go to a file; the terminal belongs to the UI
    let log_dir = Config::config_dir().unwrap_or_else(std::env::temp_dir);
    let (_log_guard, log_path) = logging::init(&log_dir, args.verbose)?;
    tracing::info!(
        log = %log_path.display(),
        base_url = %config.base_url,
        "Starting lunar-tui"
    );

    let transport = Arc::new(HttpTransport::new()?);

    tui::install_panic_hook();
    let mut tui = Tui::start(Duration::from_millis(100))?;

    // Create app state
    let mut app = App::new(config, transport, args.location.clone());
    app.init()?;

    // Main event loop
    let result = run_app(&mut tui, &mut app);

    tui.restore()?;

    if let Err(err) = result {
        tracing::error!(error = %format!("{:#}", err), "Exiting after error");
        eprintln!("Error: {:?}", err);
        std::process::exit(1);
    }

    tracing::info!("Goodbye");
    Ok(())
}

/// Run the main application loop
fn run_app(tui: &mut Tui, app: &mut App) -> Result<()> {
    while !app.should_quit {
        // Draw the UI
        tui.draw(|frame| {
            if let Err(e) = app.draw(frame, frame.area()) {
                tracing::error!(error = %e, "Draw error");
            }
        })?;

        // Apply a new window title once per successful fetch
        if let Some(title) = app.pending_title.take() {
            tui.set_title(&title)?;
        }

        // Poll for events
        if let Some(event) = tui.poll_event()? {
            // Convert event to action
            let action = match event {
                Event::Key(key) => app.handle_key_event(key)?,
                Event::Resize(w, h) => Some(Action::Resize(w, h)),
                _ => None,
            };

            // Process the action
            if let Some(action) = action {
                tracing::trace!(%action, "Dispatching action");
                // Action might produce a follow-up action
                let mut current_action = Some(action);
                while let Some(a) = current_action {
                    current_action = app.update(a)?;
                }
            }
        } else {
            // No event - send a tick for time-based updates
            let mut current_action = Some(Action::Tick);
            while let Some(a) = current_action {
                current_action = app.update(a)?;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_defaults() {
        let args = Args::try_parse_from(["lunar-tui"]).unwrap();
        assert!(args.base_url.is_none());
        assert!(!args.no_color);
        assert_eq!(args.verbose, 0);
    }

    #[test]
    fn test_args_override_config() {
        let args = Args::try_parse_from([
            "lunar-tui",
            "--base-url",
            "http://moon.local:9000",
            "--location",
            "Paris",
            "--export-dir",
            "/tmp/exports",
            "--no-color",
            "-vv",
        ])
        .unwrap();

        assert_eq!(args.location.as_deref(), Some("Paris"));
        assert_eq!(args.verbose, 2);

        let config = args.merge_into(Config::default());
        assert_eq!(config.base_url, "http://moon.local:9000");
        assert_eq!(config.export_dir, "/tmp/exports");
        assert!(!config.enable_color);
        assert_eq!(config.default_location, "Los Angeles, CA");
    }
}
