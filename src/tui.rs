//! Terminal session for the lunar viewer
//!
//! Owns the raw-mode alternate screen for as long as the viewer runs and
//! hands the event loop one input at a time.

use anyhow::Result;
use crossterm::{
    cursor,
    event::{self, Event, KeyEventKind},
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use ratatui::{backend::CrosstermBackend, Frame, Terminal};
use std::io::{self, Stdout};
use std::panic;
use std::time::Duration;

pub struct Tui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    /// How long `poll_event` waits before the loop ticks
    tick_rate: Duration,
    active: bool,
}

impl Tui {
    /// Switch the terminal into the viewer's screen
    pub fn start(tick_rate: Duration) -> Result<Self> {
        let terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
        let mut tui = Self {
            terminal,
            tick_rate,
            active: false,
        };
        terminal::enable_raw_mode()?;
        tui.active = true;
        crossterm::execute!(io::stdout(), EnterAlternateScreen, cursor::Hide)?;
        tui.terminal.clear()?;
        Ok(tui)
    }

    /// Give the terminal back to the shell. Safe to call more than once.
    pub fn restore(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        leave_screen()
    }

    /// Window title, updated after each successful fetch
    pub fn set_title(&mut self, title: &str) -> Result<()> {
        crossterm::execute!(io::stdout(), SetTitle(title))?;
        Ok(())
    }

    /// Next input for the event loop, or `None` when the tick elapsed first
    pub fn poll_event(&self) -> Result<Option<Event>> {
        if !event::poll(self.tick_rate)? {
            return Ok(None);
        }
        let event = event::read()?;
        Ok(is_actionable(&event).then_some(event))
    }

    pub fn draw(&mut self, render: impl FnOnce(&mut Frame)) -> Result<()> {
        self.terminal.draw(render)?;
        Ok(())
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        let _ = self.restore();
    }
}

fn leave_screen() -> Result<()> {
    terminal::disable_raw_mode()?;
    crossterm::execute!(io::stdout(), LeaveAlternateScreen, cursor::Show)?;
    Ok(())
}

/// Key releases and repeats reach us on some platforms; only presses count.
fn is_actionable(event: &Event) -> bool {
    match event {
        Event::Key(key) => key.kind == KeyEventKind::Press,
        _ => true,
    }
}

/// Leave the alternate screen before a panic message is printed, then
/// defer to the previous hook.
pub fn install_panic_hook() {
    let previous = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        let _ = leave_screen();
        tracing::error!(target: "panic", "panic: {info}");
        previous(info);
    }));
}
