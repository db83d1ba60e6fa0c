//! The orchestration loop
//!
//! Runs a number of tries of a (game, agent) pair. Each try resets the
//! engine, then repeatedly hands the agent the last observed frame, steps the
//! engine with its answer and logs the outcome until the episode ends. Every
//! 200th action of a try is replaced by a uniformly random member of the full
//! action vocabulary; the engine cannot tell the difference.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{info, warn};

use super::build_engine;
use crate::agents::{Agent, AgentContext};
use crate::config::RunConfig;
use crate::data::StepRecorder;
use crate::error::GameError;
use crate::game::{Action, GameEngine};
use crate::metrics::PlayTally;

/// Every n-th action of a try is replaced by a random one
pub const EXPLORATION_INTERVAL: u64 = 200;

const ORCHESTRATOR_SEED_STREAM: u64 = 1;

/// Result of a whole play or collect run
#[derive(Debug, Clone, PartialEq)]
pub struct PlaySummary {
    pub tries: u32,
    pub wins: u32,
    pub high_score: u32,
    /// Final score of every finished try, in order
    pub scores: Vec<u32>,
    /// The human player quit before all tries were played
    pub interrupted: bool,
}

impl PlaySummary {
    pub fn win_rate(&self) -> f32 {
        if self.tries == 0 {
            0.0
        } else {
            self.wins as f32 / self.tries as f32
        }
    }
}

pub struct Orchestrator {
    rng: ChaCha8Rng,
}

impl Orchestrator {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self { rng }
    }

    /// Play `num_tries` episodes, feeding every step to `recorder` if given
    pub fn run(
        &mut self,
        engine: &mut GameEngine,
        agent: &mut dyn Agent,
        num_tries: usize,
        mut recorder: Option<&mut (dyn StepRecorder + '_)>,
    ) -> Result<PlaySummary, GameError> {
        info!("----- Starting Execution -----");

        let mut tally = PlayTally::new();
        let mut scores = Vec::with_capacity(num_tries);
        let mut interrupted = false;

        for i in 0..num_tries {
            info!(game = engine.name(), agent = agent.name(), try_index = i, "starting try");

            let score = match self.run_try(engine, agent, recorder.as_deref_mut()) {
                Ok(score) => score,
                Err(GameError::Interrupted) => {
                    info!("interrupted by the player");
                    interrupted = true;
                    break;
                }
                Err(e) => return Err(e),
            };

            tally.on_try_over(score);
            scores.push(score);
            info!(num_games = i + 1, wins = tally.wins, "try finished");
        }

        info!(
            tries = tally.tries,
            wins = tally.wins,
            high_score = tally.high_score,
            elapsed = %tally.format_time(),
            "run finished"
        );

        Ok(PlaySummary {
            tries: tally.tries,
            wins: tally.wins,
            high_score: tally.high_score,
            scores,
            interrupted,
        })
    }

    /// One episode from reset to terminal; returns the final score
    ///
    /// The agent always decides on the current surface, which is the
    /// observation the following `step()` returns and the recorder stores.
    pub fn run_try(
        &mut self,
        engine: &mut GameEngine,
        agent: &mut dyn Agent,
        mut recorder: Option<&mut (dyn StepRecorder + '_)>,
    ) -> Result<u32, GameError> {
        let mut frame = engine.reset();
        let mut num_actions: u64 = 0;

        loop {
            num_actions += 1;
            let action = if num_actions % EXPLORATION_INTERVAL == 0 {
                let action = Action::ALL[self.rng.gen_range(0..Action::ALL.len())];
                warn!(num_actions, %action, "random exploration action");
                action
            } else {
                agent.choose_action(&frame)?
            };

            let snapshot = engine.step(action)?;
            info!(
                action = %snapshot.environment_action,
                reward = snapshot.reward,
                game_over = snapshot.game_over,
                score = snapshot.score,
                "step"
            );

            if let Some(recorder) = recorder.as_deref_mut() {
                recorder.record(
                    &snapshot.frame,
                    snapshot.environment_action,
                    snapshot.reward,
                    snapshot.game_over,
                    snapshot.score,
                );
            }

            if snapshot.game_over {
                return Ok(snapshot.score);
            }
            frame = engine.frame()?;
        }
    }
}

/// PLAY: run the configured tries and report the tally
pub fn play(config: &RunConfig) -> anyhow::Result<PlaySummary> {
    run_games(config, None)
}

/// Build the agent and the engine from `config` and run every try
///
/// The engine is closed (and with it the terminal display) before any error
/// of the run itself is returned.
pub fn run_games(
    config: &RunConfig,
    recorder: Option<&mut dyn StepRecorder>,
) -> anyhow::Result<PlaySummary> {
    let mut agent = config.agent.create(&AgentContext::from_config(config))?;
    let mut engine = build_engine(config)?;
    let mut orchestrator = Orchestrator::new(config.derived_seed(ORCHESTRATOR_SEED_STREAM));

    let result = orchestrator.run(&mut engine, agent.as_mut(), config.num_tries, recorder);
    let closed = engine.close();

    let summary = result?;
    closed?;
    Ok(summary)
}
