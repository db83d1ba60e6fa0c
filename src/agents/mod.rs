//! Agents that pick actions from frames
//!
//! Agents are looked up by [`AgentKind`] and only constructed when a run
//! needs one, so a model file is only read when the neural-network agent is
//! actually selected.

pub mod human;
pub mod neural;
pub mod random;

use anyhow::Result;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::config::{ModelMode, RunConfig};
use crate::error::GameError;
use crate::game::{Action, Frame, GameKind};

pub use human::HumanAgent;
pub use neural::NeuralNetworkAgent;
pub use random::RandomAgent;

/// Random stream reserved for agents
const AGENT_SEED_STREAM: u64 = 2;

pub trait Agent {
    fn name(&self) -> &'static str;

    /// Pick the next action given the last observed frame
    fn choose_action(&mut self, frame: &Frame) -> Result<Action, GameError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentKind {
    Random,
    Human,
    NeuralNetwork,
}

impl AgentKind {
    pub const ALL: [AgentKind; 3] = [AgentKind::Random, AgentKind::Human, AgentKind::NeuralNetwork];

    pub fn name(self) -> &'static str {
        match self {
            AgentKind::Random => "Random",
            AgentKind::Human => "Human",
            AgentKind::NeuralNetwork => "NeuralNetwork",
        }
    }

    pub fn create(self, ctx: &AgentContext) -> Result<Box<dyn Agent>> {
        Ok(match self {
            AgentKind::Random => Box::new(RandomAgent::new(ctx.game.action_space(), ctx.seed)),
            AgentKind::Human => Box::new(HumanAgent::new()),
            AgentKind::NeuralNetwork => Box::new(NeuralNetworkAgent::load(ctx)?),
        })
    }
}

impl FromStr for AgentKind {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AgentKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| GameError::unknown("agent", s, "Random, Human, NeuralNetwork"))
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What an agent may need to know when it is built
#[derive(Debug, Clone)]
pub struct AgentContext {
    pub game: GameKind,
    pub model_dir: PathBuf,
    pub model_mode: Option<ModelMode>,
    pub seed: Option<u64>,
}

impl AgentContext {
    pub fn from_config(config: &RunConfig) -> Self {
        Self {
            game: config.game,
            model_dir: config.model_dir.clone(),
            model_mode: config.model_mode,
            seed: config.derived_seed(AGENT_SEED_STREAM),
        }
    }

    /// Where the trained model for this game is stored
    pub fn model_path(&self) -> Result<PathBuf, GameError> {
        let mode = self.model_mode.ok_or(GameError::MissingSetting("MODEL_MODE"))?;
        Ok(self.model_dir.join(format!(
            "{}_{}",
            self.game.name().to_lowercase(),
            mode.name().to_lowercase()
        )))
    }
}
