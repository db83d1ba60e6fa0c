use anyhow::{Context, Result};
use clap::Parser;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::Level;

use ml_games::agents::AgentKind;
use ml_games::config::{
    ColorMode, ModelMode, OptimizerKind, RunConfig, RunType, TrainingSettings,
};
use ml_games::game::GameKind;
use ml_games::modes;

/// Every flag can also be set through the environment variable of the same
/// name, e.g. `GAME=Snake AGENT=Human ml_games`
#[derive(Parser)]
#[command(name = "ml_games")]
#[command(version, about = "Grid games with pluggable agents and baseline models")]
struct Cli {
    /// Game to run (Catch, Snake)
    #[arg(long, env = "GAME", default_value = "Catch")]
    game: GameKind,

    /// Agent choosing the actions (Random, Human, NeuralNetwork)
    #[arg(long, env = "AGENT", default_value = "Random")]
    agent: AgentKind,

    /// Number of episodes to play
    #[arg(long, env = "NUM_TRIES", default_value_t = 10)]
    num_tries: usize,

    /// Run type (PLAY, COLLECT, PREPARE, TRAIN)
    #[arg(long = "type", env = "TYPE", default_value = "PLAY")]
    run_type: RunType,

    /// Baseline model (MLP, CNN), required by TRAIN and the NeuralNetwork agent
    #[arg(long, env = "MODEL_MODE")]
    model_mode: Option<ModelMode>,

    /// Color mode of the model inputs (GRAYSCALE, RGB)
    #[arg(long, env = "COLOR_MODE")]
    color_mode: Option<ColorMode>,

    /// Height of the model inputs in pixels
    #[arg(long, env = "FRAME_HEIGHT")]
    frame_height: Option<usize>,

    /// Width of the model inputs in pixels
    #[arg(long, env = "FRAME_WIDTH")]
    frame_width: Option<usize>,

    #[arg(long, env = "BATCH_SIZE", default_value_t = 64)]
    batch_size: usize,

    #[arg(long, env = "NUM_EPOCHS", default_value_t = 100)]
    num_epochs: usize,

    /// Share of the prepared samples used for training
    #[arg(long, env = "SPLIT_FRACTION", default_value_t = 0.8)]
    split_fraction: f64,

    /// Optimizer (adam, adamw, sgd)
    #[arg(long, env = "OPTIMIZER_NAME", default_value = "adam")]
    optimizer_name: OptimizerKind,

    /// Defaults to the optimizer's usual learning rate
    #[arg(long, env = "LEARNING_RATE")]
    learning_rate: Option<f64>,

    /// Seed for every random stream; entropy when unset
    #[arg(long, env = "SEED")]
    seed: Option<u64>,

    /// Overrides the game's grid width
    #[arg(long, env = "GRID_WIDTH")]
    grid_width: Option<usize>,

    /// Overrides the game's grid height
    #[arg(long, env = "GRID_HEIGHT")]
    grid_height: Option<usize>,

    /// Pixels per grid cell in the captured frames
    #[arg(long, env = "CELL_SIZE", default_value_t = 10)]
    cell_size: usize,

    /// Ticks per second; unpaced when unset and nothing is displayed
    #[arg(long, env = "FPS")]
    fps: Option<u32>,

    /// Draw the game in the terminal (always on for the Human agent)
    #[arg(long, env = "SHOW_DISPLAY")]
    display: bool,

    #[arg(long, env = "DATA_DIR", default_value = "data")]
    data_dir: PathBuf,

    #[arg(long, env = "MODEL_DIR", default_value = "models")]
    model_dir: PathBuf,

    #[arg(long, env = "LOG_LEVEL", default_value = "INFO")]
    log_level: Level,

    /// Log destination while the terminal display is active
    #[arg(long, env = "LOG_FILE", default_value = "logs/ml_games.log")]
    log_file: PathBuf,
}

impl Cli {
    fn into_config(self) -> RunConfig {
        RunConfig {
            game: self.game,
            agent: self.agent,
            num_tries: self.num_tries,
            run_type: self.run_type,
            model_mode: self.model_mode,
            color_mode: self.color_mode,
            frame_height: self.frame_height,
            frame_width: self.frame_width,
            training: TrainingSettings {
                batch_size: self.batch_size.max(1),
                num_epochs: self.num_epochs,
                split_fraction: self.split_fraction,
                optimizer: self.optimizer_name,
                learning_rate: self
                    .learning_rate
                    .unwrap_or_else(|| self.optimizer_name.default_learning_rate()),
            },
            seed: self.seed,
            grid_width: self.grid_width,
            grid_height: self.grid_height,
            cell_size: self.cell_size.max(1),
            fps: self.fps,
            display: self.display,
            data_dir: self.data_dir,
            model_dir: self.model_dir,
        }
    }
}

/// Log to stdout, or to `log_file` while the terminal belongs to the display
fn init_logging(level: Level, log_file: Option<&Path>) -> Result<()> {
    let builder = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false);

    match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory: {:?}", parent))?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {:?}", path))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        None => builder.init(),
    }

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = cli.log_level;
    let log_file = cli.log_file.clone();
    let config = cli.into_config();

    let log_file = config.display_enabled().then_some(log_file.as_path());
    init_logging(level, log_file)?;

    modes::run(&config)
}
