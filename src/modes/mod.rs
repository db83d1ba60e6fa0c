//! The four run types
//!
//! PLAY and COLLECT run the orchestration loop, PREPARE and TRAIN work on the
//! files the previous step left behind:
//!
//! ```text
//! COLLECT -> <DATA_DIR>/<game>/raw.bin -> PREPARE -> <DATA_DIR>/<game>/prepared.bin
//!         -> TRAIN -> <MODEL_DIR>/<game>_<model>.mpk -> PLAY with AGENT=NeuralNetwork
//! ```

pub mod collect;
pub mod play;
pub mod prepare;
pub mod train;

pub use collect::collect;
pub use play::{EXPLORATION_INTERVAL, Orchestrator, PlaySummary, play, run_games};
pub use prepare::prepare;
pub use train::train;

use anyhow::{Context, Result};
use tracing::info;

use crate::config::{RunConfig, RunType};
use crate::game::GameEngine;
use crate::render::TerminalDisplay;

/// Engine for the configured game, drawing to the terminal when enabled
pub fn build_engine(config: &RunConfig) -> Result<GameEngine> {
    let game_config = config.game_config();
    let game = config.game.create(&game_config);

    if config.display_enabled() {
        let display = TerminalDisplay::open().context("Failed to open the terminal display")?;
        Ok(GameEngine::with_presenter(game_config, game, Box::new(display)))
    } else {
        Ok(GameEngine::new(game_config, game))
    }
}

/// Dispatch on the run type
pub fn run(config: &RunConfig) -> Result<()> {
    info!(
        run_type = %config.run_type,
        game = %config.game,
        agent = %config.agent,
        "starting run"
    );

    match config.run_type {
        RunType::Play => print_summary(config, &play(config)?),
        RunType::Collect => print_summary(config, &collect(config)?),
        RunType::Prepare => {
            prepare(config)?;
        }
        RunType::Train => {
            train(config)?;
        }
    }

    Ok(())
}

fn print_summary(config: &RunConfig, summary: &PlaySummary) {
    println!("{}", "=".repeat(50));
    println!("{} - {} agent", config.game, config.agent);
    println!("{}", "=".repeat(50));
    println!("Tries:      {}", summary.tries);
    println!(
        "Wins:       {} ({:.1}%)",
        summary.wins,
        summary.win_rate() * 100.0
    );
    println!("High score: {}", summary.high_score);
    if summary.interrupted {
        println!("Stopped early by the player");
    }
}
