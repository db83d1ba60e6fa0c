//! TRAIN: fit a baseline model on a prepared dataset
//!
//! Loads the split written by PREPARE, builds the MLP or CNN baseline for the
//! dataset's input shape and the game's action space, trains it with the
//! configured optimizer and saves the weights next to a JSON metadata file.
//!
//! # Example
//!
//! ```rust,ignore
//! use ml_games::config::{ModelMode, RunConfig, RunType};
//! use ml_games::modes::train;
//!
//! let config = RunConfig {
//!     run_type: RunType::Train,
//!     model_mode: Some(ModelMode::Cnn),
//!     ..RunConfig::default()
//! };
//! let metadata = train(&config)?;
//! ```

use anyhow::{Context, Result, ensure};
use burn::module::AutodiffModule;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::path::Path;
use tracing::info;

use crate::config::{ModelMode, RunConfig};
use crate::data::PreparedDataset;
use crate::model::{
    Classifier, CnnConfig, InferenceBackend, MlpConfig, ModelMetadata, TrainingBackend,
    default_device, save_model, train_model,
};

const TRAINING_SEED_STREAM: u64 = 4;

/// Train the configured baseline and return the metadata saved with it
pub fn train(config: &RunConfig) -> Result<ModelMetadata> {
    let mode = config.require_model_mode()?;

    let data_path = config.prepared_path();
    let dataset = PreparedDataset::load(&data_path).with_context(|| {
        format!("No prepared dataset for {}, run PREPARE first", config.game)
    })?;
    ensure!(
        dataset.game == config.game,
        "{:?} was prepared for {}, not {}",
        data_path,
        dataset.game,
        config.game
    );

    let save_path = config.model_path(mode);
    print_header(config, mode, &dataset, &save_path);

    let device = default_device();
    let input_shape = dataset.preprocessing.input_shape();
    let metadata = match mode {
        ModelMode::Mlp => {
            let model =
                MlpConfig::new(input_shape, dataset.num_classes).init::<TrainingBackend>(&device);
            fit_and_save(model, mode, &dataset, config, &save_path)?
        }
        ModelMode::Cnn => {
            let model =
                CnnConfig::new(input_shape, dataset.num_classes).init::<TrainingBackend>(&device);
            fit_and_save(model, mode, &dataset, config, &save_path)?
        }
    };

    Ok(metadata)
}

fn fit_and_save<M>(
    model: M,
    mode: ModelMode,
    dataset: &PreparedDataset,
    config: &RunConfig,
    save_path: &Path,
) -> Result<ModelMetadata>
where
    M: AutodiffModule<TrainingBackend> + Classifier<TrainingBackend>,
    M::InnerModule: Classifier<InferenceBackend>,
{
    let device = default_device();
    let mut rng = match config.derived_seed(TRAINING_SEED_STREAM) {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };

    let (model, stats) =
        train_model::<TrainingBackend, M>(model, dataset, &config.training, &mut rng, &device)?;

    let mut metadata = ModelMetadata::new(
        dataset.game,
        mode,
        dataset.preprocessing,
        dataset.num_classes,
        config.training.optimizer,
    );
    metadata.epochs_trained = stats.epochs();
    metadata.best_accuracy = stats.best_accuracy();

    save_model::<TrainingBackend, M>(&model, &metadata, save_path)
        .with_context(|| format!("Failed to save final model to {:?}", save_path))?;
    info!(path = ?save_path, "model saved");

    println!("\nTraining complete!");
    println!("Final model saved to: {:?}", save_path);
    println!("\nFinal Statistics:");
    println!("{}", stats.format_summary());

    Ok(metadata)
}

/// Print training header information
fn print_header(
    config: &RunConfig,
    mode: ModelMode,
    dataset: &PreparedDataset,
    save_path: &Path,
) {
    let prep = &dataset.preprocessing;
    let settings = &config.training;

    println!("{}", "=".repeat(70));
    println!("{} Training - {}", mode, dataset.game);
    println!("{}", "=".repeat(70));
    println!(
        "Input: {} {}x{}",
        prep.color_mode, prep.frame_height, prep.frame_width
    );
    println!("Classes: {}", dataset.num_classes);
    println!(
        "Samples: {} train, {} validation",
        dataset.train.len(),
        dataset.valid.len()
    );
    println!("Optimizer: {}", settings.optimizer);
    println!("  Learning rate: {}", settings.learning_rate);
    println!("  Batch size: {}", settings.batch_size);
    println!("Epochs: {}", settings.num_epochs);
    println!("Save path: {:?}", save_path);
    println!("{}", "=".repeat(70));
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ColorMode, OptimizerKind, Preprocessing, TrainingSettings};
    use crate::data::{GameplayLog, StepRecorder};
    use crate::error::GameError;
    use crate::game::frame::{COLOR_RED, COLOR_WHITE};
    use crate::game::{Canvas, GameKind};
    use crate::model::load_model;
    use tempfile::TempDir;

    fn config(dir: &TempDir, mode: Option<ModelMode>) -> RunConfig {
        RunConfig {
            seed: Some(21),
            model_mode: mode,
            data_dir: dir.path().join("data"),
            model_dir: dir.path().join("models"),
            training: TrainingSettings {
                batch_size: 4,
                num_epochs: 3,
                ..TrainingSettings::default()
            },
            ..RunConfig::default()
        }
    }

    /// Left when the top-left cell is white, right when it is red
    fn write_dataset(config: &RunConfig, game: GameKind) {
        let mut log = GameplayLog::new(game);
        for i in 0..12 {
            let mut canvas = Canvas::new(4, 4, 1);
            let (color, action) = if i % 2 == 0 {
                (COLOR_WHITE, game.action_space()[0])
            } else {
                (COLOR_RED, game.action_space()[1])
            };
            canvas.fill_cell(0, 0, color);
            log.record(&canvas.capture(), action, 0.0, true, 0);
        }
        log.seal();

        let prep = Preprocessing {
            color_mode: ColorMode::Rgb,
            frame_height: 4,
            frame_width: 4,
        };
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        PreparedDataset::from_log(&log, prep, 0.75, &mut rng)
            .save(&config.prepared_path())
            .unwrap();
    }

    #[test]
    fn test_train_mlp_saves_model() {
        let temp_dir = TempDir::new().unwrap();
        let config = config(&temp_dir, Some(ModelMode::Mlp));
        write_dataset(&config, GameKind::Catch);

        let metadata = train(&config).unwrap();

        assert_eq!(metadata.game, GameKind::Catch);
        assert_eq!(metadata.epochs_trained, 3);
        assert_eq!(metadata.num_classes, 3);
        assert_eq!(metadata.optimizer, OptimizerKind::Adam);
        assert!(metadata.best_accuracy.is_some());

        let device = default_device();
        let (_, loaded) =
            load_model::<InferenceBackend>(&config.model_path(ModelMode::Mlp), &device).unwrap();
        assert_eq!(loaded, metadata);
    }

    #[test]
    fn test_train_cnn_for_snake() {
        let temp_dir = TempDir::new().unwrap();
        let config = RunConfig {
            game: GameKind::Snake,
            ..config(&temp_dir, Some(ModelMode::Cnn))
        };
        write_dataset(&config, GameKind::Snake);

        let metadata = train(&config).unwrap();

        assert_eq!(metadata.model_mode, ModelMode::Cnn);
        assert_eq!(metadata.num_classes, 4);
        assert!(
            config
                .model_path(ModelMode::Cnn)
                .with_extension("meta.json")
                .exists()
        );
    }

    #[test]
    fn test_model_mode_is_required() {
        let temp_dir = TempDir::new().unwrap();
        let config = config(&temp_dir, None);
        write_dataset(&config, GameKind::Catch);

        let err = train(&config).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<GameError>(),
            Some(GameError::MissingSetting("MODEL_MODE"))
        ));
    }

    #[test]
    fn test_dataset_for_other_game_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let catch_config = config(&temp_dir, Some(ModelMode::Mlp));
        write_dataset(&catch_config, GameKind::Catch);

        // Snake config pointed at the Catch dataset file
        let snake_config = RunConfig {
            game: GameKind::Snake,
            ..catch_config.clone()
        };
        std::fs::create_dir_all(snake_config.prepared_path().parent().unwrap()).unwrap();
        std::fs::copy(catch_config.prepared_path(), snake_config.prepared_path()).unwrap();

        assert!(train(&snake_config).is_err());
    }
}
