//! Run configuration
//!
//! Everything a run needs is collected once at startup into an immutable
//! [`RunConfig`] and passed by reference into each mode. The closed
//! vocabularies used by the configuration keys live here as well; all of them
//! parse case-insensitively and reject unknown keys with
//! [`GameError::Unknown`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::agents::AgentKind;
use crate::error::GameError;
use crate::game::{GameConfig, GameKind};

/// Tick rate used when a display is attached and no FPS was given
pub const DISPLAY_FPS: u32 = 10;

/// Find the member of `all` whose name matches `s`, ignoring case
fn parse_closed<T: Copy>(
    all: &[T],
    name: impl Fn(T) -> &'static str,
    s: &str,
    kind: &'static str,
    expected: &'static str,
) -> Result<T, GameError> {
    all.iter()
        .copied()
        .find(|item| name(*item).eq_ignore_ascii_case(s.trim()))
        .ok_or_else(|| GameError::unknown(kind, s, expected))
}

/// What the process does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunType {
    Play,
    Collect,
    Prepare,
    Train,
}

impl RunType {
    pub const ALL: [RunType; 4] = [
        RunType::Play,
        RunType::Collect,
        RunType::Prepare,
        RunType::Train,
    ];

    pub fn name(self) -> &'static str {
        match self {
            RunType::Play => "PLAY",
            RunType::Collect => "COLLECT",
            RunType::Prepare => "PREPARE",
            RunType::Train => "TRAIN",
        }
    }

    /// Whether this run type drives the orchestration loop
    pub fn plays_games(self) -> bool {
        matches!(self, RunType::Play | RunType::Collect)
    }
}

impl FromStr for RunType {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_closed(
            &Self::ALL,
            Self::name,
            s,
            "run type",
            "PLAY, COLLECT, PREPARE, TRAIN",
        )
    }
}

impl fmt::Display for RunType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Pixel format fed to the models
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorMode {
    Grayscale,
    Rgb,
}

impl ColorMode {
    pub const ALL: [ColorMode; 2] = [ColorMode::Grayscale, ColorMode::Rgb];

    pub fn name(self) -> &'static str {
        match self {
            ColorMode::Grayscale => "GRAYSCALE",
            ColorMode::Rgb => "RGB",
        }
    }

    pub fn channels(self) -> usize {
        match self {
            ColorMode::Grayscale => 1,
            ColorMode::Rgb => 3,
        }
    }
}

impl FromStr for ColorMode {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_closed(&Self::ALL, Self::name, s, "color mode", "GRAYSCALE, RGB")
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Baseline model architecture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelMode {
    Mlp,
    Cnn,
}

impl ModelMode {
    pub const ALL: [ModelMode; 2] = [ModelMode::Mlp, ModelMode::Cnn];

    pub fn name(self) -> &'static str {
        match self {
            ModelMode::Mlp => "MLP",
            ModelMode::Cnn => "CNN",
        }
    }
}

impl FromStr for ModelMode {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_closed(&Self::ALL, Self::name, s, "model", "MLP, CNN")
    }
}

impl fmt::Display for ModelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OptimizerKind {
    Adam,
    AdamW,
    Sgd,
}

impl OptimizerKind {
    pub const ALL: [OptimizerKind; 3] = [OptimizerKind::Adam, OptimizerKind::AdamW, OptimizerKind::Sgd];

    pub fn name(self) -> &'static str {
        match self {
            OptimizerKind::Adam => "adam",
            OptimizerKind::AdamW => "adamw",
            OptimizerKind::Sgd => "sgd",
        }
    }

    /// Step size used when none is configured
    pub fn default_learning_rate(self) -> f64 {
        match self {
            OptimizerKind::Adam | OptimizerKind::AdamW => 1e-3,
            OptimizerKind::Sgd => 1e-2,
        }
    }
}

impl FromStr for OptimizerKind {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_closed(&Self::ALL, Self::name, s, "optimizer", "adam, adamw, sgd")
    }
}

impl fmt::Display for OptimizerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How recorded frames are turned into model inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preprocessing {
    pub color_mode: ColorMode,
    pub frame_height: usize,
    pub frame_width: usize,
}

impl Preprocessing {
    /// Values per sample, in channel-height-width order
    pub fn input_len(&self) -> usize {
        self.color_mode.channels() * self.frame_height * self.frame_width
    }

    /// `[channels, height, width]`
    pub fn input_shape(&self) -> [usize; 3] {
        [
            self.color_mode.channels(),
            self.frame_height,
            self.frame_width,
        ]
    }
}

/// Hyperparameters for the supervised baselines
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingSettings {
    pub batch_size: usize,
    pub num_epochs: usize,
    /// Fraction of prepared samples used for training, the rest validates
    pub split_fraction: f64,
    pub optimizer: OptimizerKind,
    pub learning_rate: f64,
}

impl Default for TrainingSettings {
    fn default() -> Self {
        Self {
            batch_size: 64,
            num_epochs: 100,
            split_fraction: 0.8,
            optimizer: OptimizerKind::Adam,
            learning_rate: OptimizerKind::Adam.default_learning_rate(),
        }
    }
}

/// Immutable settings for one process run
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub game: GameKind,
    pub agent: AgentKind,
    pub num_tries: usize,
    pub run_type: RunType,
    pub model_mode: Option<ModelMode>,
    pub color_mode: Option<ColorMode>,
    pub frame_height: Option<usize>,
    pub frame_width: Option<usize>,
    pub training: TrainingSettings,
    pub seed: Option<u64>,
    /// Overrides the game's own grid size
    pub grid_width: Option<usize>,
    pub grid_height: Option<usize>,
    pub cell_size: usize,
    pub fps: Option<u32>,
    pub display: bool,
    pub data_dir: PathBuf,
    pub model_dir: PathBuf,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            game: GameKind::Catch,
            agent: AgentKind::Random,
            num_tries: 10,
            run_type: RunType::Play,
            model_mode: None,
            color_mode: None,
            frame_height: None,
            frame_width: None,
            training: TrainingSettings::default(),
            seed: None,
            grid_width: None,
            grid_height: None,
            cell_size: 10,
            fps: None,
            display: false,
            data_dir: PathBuf::from("data"),
            model_dir: PathBuf::from("models"),
        }
    }
}

impl RunConfig {
    /// The human player needs to see the board
    pub fn display_enabled(&self) -> bool {
        self.display || self.agent == AgentKind::Human
    }

    /// Engine configuration for the selected game
    pub fn game_config(&self) -> GameConfig {
        let mut config = self.game.default_config();
        if let Some(width) = self.grid_width {
            config.grid_width = width.max(1);
        }
        if let Some(height) = self.grid_height {
            config.grid_height = height.max(1);
        }

        let fps = match self.fps {
            Some(fps) => Some(fps),
            None if self.display_enabled() => Some(DISPLAY_FPS),
            None => None,
        };

        config
            .with_cell_size(self.cell_size)
            .with_fps(fps)
            .with_seed(self.seed)
    }

    /// Seed for an independent random stream, offset from the run seed
    pub fn derived_seed(&self, stream: u64) -> Option<u64> {
        self.seed.map(|seed| seed.wrapping_add(stream))
    }

    pub fn require_model_mode(&self) -> Result<ModelMode, GameError> {
        self.model_mode.ok_or(GameError::MissingSetting("MODEL_MODE"))
    }

    /// Color mode and target resolution, all three are required
    pub fn preprocessing(&self) -> Result<Preprocessing, GameError> {
        Ok(Preprocessing {
            color_mode: self.color_mode.ok_or(GameError::MissingSetting("COLOR_MODE"))?,
            frame_height: self
                .frame_height
                .filter(|&h| h > 0)
                .ok_or(GameError::MissingSetting("FRAME_HEIGHT"))?,
            frame_width: self
                .frame_width
                .filter(|&w| w > 0)
                .ok_or(GameError::MissingSetting("FRAME_WIDTH"))?,
        })
    }

    fn game_data_dir(&self) -> PathBuf {
        self.data_dir.join(self.game.name().to_lowercase())
    }

    /// Recorded gameplay written by COLLECT
    pub fn raw_path(&self) -> PathBuf {
        self.game_data_dir().join("raw.bin")
    }

    /// Train/validation split written by PREPARE
    pub fn prepared_path(&self) -> PathBuf {
        self.game_data_dir().join("prepared.bin")
    }

    /// Weights file of the model trained for this game
    pub fn model_path(&self, mode: ModelMode) -> PathBuf {
        self.model_dir.join(format!(
            "{}_{}",
            self.game.name().to_lowercase(),
            mode.name().to_lowercase()
        ))
    }
}
