use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::game::Action;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    GameAction(Action),
    Quit,
    None,
}

pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_key_event(&self, key: KeyEvent) -> KeyAction {
        // Handle Ctrl+C (raw mode swallows SIGINT)
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyAction::Quit;
        }

        match key.code {
            // Movement - Arrow keys
            KeyCode::Up => KeyAction::GameAction(Action::Up),
            KeyCode::Down => KeyAction::GameAction(Action::Down),
            KeyCode::Left => KeyAction::GameAction(Action::Left),
            KeyCode::Right => KeyAction::GameAction(Action::Right),

            // Movement - WASD
            KeyCode::Char('w') | KeyCode::Char('W') => KeyAction::GameAction(Action::Up),
            KeyCode::Char('s') | KeyCode::Char('S') => KeyAction::GameAction(Action::Down),
            KeyCode::Char('a') | KeyCode::Char('A') => KeyAction::GameAction(Action::Left),
            KeyCode::Char('d') | KeyCode::Char('D') => KeyAction::GameAction(Action::Right),

            KeyCode::Char(' ') => KeyAction::GameAction(Action::Stay),

            // Controls
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => KeyAction::Quit,

            _ => KeyAction::None,
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
