use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};

use super::Renderer;
use crate::error::GameError;
use crate::game::{Canvas, Hud, Presenter};

/// Presenter that draws every committed tick to the terminal
///
/// Owns raw mode and the alternate screen for as long as it is open; the
/// terminal is restored on [`Presenter::close`] or when dropped.
pub struct TerminalDisplay {
    terminal: Terminal<CrosstermBackend<Stderr>>,
    renderer: Renderer,
    tries: u32,
    active: bool,
}

impl TerminalDisplay {
    pub fn open() -> Result<Self, GameError> {
        enable_raw_mode()?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend)?;
        terminal.hide_cursor()?;
        terminal.clear()?;

        Ok(Self {
            terminal,
            renderer: Renderer::new(),
            tries: 0,
            active: true,
        })
    }

    fn restore(&mut self) -> Result<(), GameError> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

impl Presenter for TerminalDisplay {
    fn present(&mut self, canvas: &Canvas, hud: &Hud<'_>) -> Result<(), GameError> {
        // First tick of a new episode
        if hud.tick == 1 {
            self.tries += 1;
        }
        let tries = self.tries;
        let renderer = &self.renderer;
        self.terminal
            .draw(|frame| renderer.render(frame, canvas, hud, tries))?;
        Ok(())
    }

    fn close(&mut self) -> Result<(), GameError> {
        self.restore()
    }
}

impl Drop for TerminalDisplay {
    fn drop(&mut self) {
        let _ = self.restore();
    }
}
