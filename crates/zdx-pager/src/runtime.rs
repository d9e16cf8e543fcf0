//! Event loop: owns the terminal, feeds crossterm events to the app and
//! executes the effects it returns.

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEventKind};

use crate::app::{App, Effect};
use crate::clipboard;
use crate::terminal::{self, PagerTerminal};

/// Wheel input is coalesced and applied once per frame.
const FRAME_DURATION: Duration = Duration::from_millis(16);

pub struct Runtime {
    terminal: PagerTerminal,
    app: App,
}

impl Runtime {
    /// Takes over the terminal. It is handed back when the runtime drops.
    pub fn new(app: App) -> Result<Self> {
        terminal::install_panic_hook();
        let terminal = terminal::setup().context("Failed to setup terminal")?;
        Ok(Self { terminal, app })
    }

    pub fn run(&mut self) -> Result<()> {
        let mut dirty = true;
        let mut last_frame = Instant::now();

        while !self.app.should_quit() {
            let timeout = FRAME_DURATION.saturating_sub(last_frame.elapsed());
            if event::poll(timeout)? {
                dirty |= self.handle_event(event::read()?);
                while event::poll(Duration::ZERO)? {
                    dirty |= self.handle_event(event::read()?);
                }
            }

            if last_frame.elapsed() >= FRAME_DURATION {
                dirty |= self.app.tick();
                last_frame = Instant::now();
            }

            if dirty {
                self.terminal.draw(|frame| self.app.render(frame))?;
                dirty = false;
            }
        }
        Ok(())
    }

    /// Returns true if the screen needs a redraw.
    fn handle_event(&mut self, event: Event) -> bool {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if let Some(effect) = self.app.handle_key(key) {
                    self.execute(effect);
                }
                true
            }
            Event::Mouse(mouse) => {
                self.app.handle_mouse(mouse);
                true
            }
            Event::Resize(..) => true,
            _ => false,
        }
    }

    fn execute(&mut self, effect: Effect) {
        match effect {
            Effect::CopyToClipboard { text } => match clipboard::copy(&text) {
                Ok(()) => {
                    tracing::debug!(chars = text.chars().count(), "copied highlight");
                    self.app
                        .set_status(format!("copied {} chars", text.chars().count()));
                }
                Err(e) => {
                    tracing::warn!("clipboard copy failed: {e:#}");
                    self.app.set_status("copy failed");
                }
            },
        }
    }
}

impl Drop for Runtime {
    fn drop(&mut self) {
        if let Err(e) = terminal::restore() {
            tracing::warn!("failed to restore terminal: {e:#}");
        }
    }
}
