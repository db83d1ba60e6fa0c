//! Grid games and the engine that runs them
//!
//! This module contains the game logic and the frame capture without any
//! terminal or model dependencies. The engine only talks to the outside world
//! through the [`Presenter`] trait.

pub mod action;
pub mod catch;
pub mod clock;
pub mod config;
pub mod engine;
pub mod frame;
pub mod registry;
pub mod snake;
pub mod state;

// Re-export commonly used types
pub use action::{Action, Direction};
pub use catch::CatchGame;
pub use clock::Pacer;
pub use config::GameConfig;
pub use engine::{
    Game, GameEngine, GameRng, Headless, Hud, Phase, Presenter, StepSnapshot, TickOutcome,
};
pub use frame::{Canvas, Frame, Rgb};
pub use registry::GameKind;
pub use snake::{CollisionType, SnakeGame, SnakeRules};
pub use state::{Grid, Position, Snake};
