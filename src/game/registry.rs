use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{
    action::Action,
    catch::{CATCH_ACTIONS, CatchGame},
    config::GameConfig,
    engine::Game,
    snake::{SNAKE_ACTIONS, SnakeGame},
};
use crate::error::GameError;

/// Every game the harness knows how to build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameKind {
    Catch,
    Snake,
}

impl GameKind {
    pub const ALL: [GameKind; 2] = [GameKind::Catch, GameKind::Snake];

    pub fn name(self) -> &'static str {
        match self {
            GameKind::Catch => "Catch",
            GameKind::Snake => "Snake",
        }
    }

    /// Grid size the game is designed for
    pub fn default_config(self) -> GameConfig {
        match self {
            GameKind::Catch => GameConfig::new(self.name(), 10, 10),
            GameKind::Snake => GameConfig::new(self.name(), 20, 20),
        }
    }

    /// Actions the game executes; its size is the model's output cardinality
    pub fn action_space(self) -> &'static [Action] {
        match self {
            GameKind::Catch => &CATCH_ACTIONS,
            GameKind::Snake => &SNAKE_ACTIONS,
        }
    }

    /// Build the game rules for `config`
    pub fn create(self, config: &GameConfig) -> Box<dyn Game> {
        match self {
            GameKind::Catch => Box::new(CatchGame::new(config)),
            GameKind::Snake => Box::new(SnakeGame::new(config)),
        }
    }
}

impl FromStr for GameKind {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GameKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| GameError::unknown("game", s, "Catch, Snake"))
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
