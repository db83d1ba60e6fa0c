use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use std::time::Duration;

use super::Agent;
use crate::error::GameError;
use crate::game::{Action, Frame};
use crate::input::{InputHandler, KeyAction};

/// Keyboard player
///
/// Keys pressed since the previous tick are drained without blocking; the
/// last movement key wins and no key means [`Action::Stay`]. Needs the
/// terminal display to be active so the terminal is in raw mode.
pub struct HumanAgent {
    input_handler: InputHandler,
}

impl HumanAgent {
    pub fn new() -> Self {
        Self {
            input_handler: InputHandler::new(),
        }
    }

    /// Fold a sequence of key events into the action for this tick
    fn resolve(&self, keys: impl IntoIterator<Item = KeyEvent>) -> Result<Action, GameError> {
        let mut chosen = Action::Stay;
        for key in keys {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match self.input_handler.handle_key_event(key) {
                KeyAction::GameAction(action) => chosen = action,
                KeyAction::Quit => return Err(GameError::Interrupted),
                KeyAction::None => {}
            }
        }
        Ok(chosen)
    }

    fn pending_keys() -> Result<Vec<KeyEvent>, GameError> {
        let mut keys = Vec::new();
        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                keys.push(key);
            }
        }
        Ok(keys)
    }
}

impl Default for HumanAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent for HumanAgent {
    fn name(&self) -> &'static str {
        "Human"
    }

    fn choose_action(&mut self, _frame: &Frame) -> Result<Action, GameError> {
        let keys = Self::pending_keys()?;
        self.resolve(keys)
    }
}
