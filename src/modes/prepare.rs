//! PREPARE: turn recorded gameplay into a train/validation split

use anyhow::{Context, Result, ensure};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::info;

use crate::config::RunConfig;
use crate::data::{GameplayLog, PreparedDataset};

const SHUFFLE_SEED_STREAM: u64 = 3;

pub fn prepare(config: &RunConfig) -> Result<PreparedDataset> {
    let preprocessing = config.preprocessing()?;

    let raw_path = config.raw_path();
    let log = GameplayLog::load(&raw_path).with_context(|| {
        format!("No gameplay recorded for {}, run COLLECT first", config.game)
    })?;
    ensure!(
        log.game == config.game,
        "{:?} holds {} gameplay, not {}",
        raw_path,
        log.game,
        config.game
    );

    let mut rng = match config.derived_seed(SHUFFLE_SEED_STREAM) {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };
    let dataset = PreparedDataset::from_log(
        &log,
        preprocessing,
        config.training.split_fraction,
        &mut rng,
    );

    let path = config.prepared_path();
    dataset.save(&path)?;

    info!(
        path = ?path,
        color_mode = %preprocessing.color_mode,
        frame_height = preprocessing.frame_height,
        frame_width = preprocessing.frame_width,
        train = dataset.train.len(),
        valid = dataset.valid.len(),
        "dataset prepared"
    );

    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ColorMode;
    use crate::data::StepRecorder;
    use crate::error::GameError;
    use crate::game::{Action, Canvas, GameKind};
    use tempfile::TempDir;

    fn config(dir: &TempDir) -> RunConfig {
        RunConfig {
            seed: Some(9),
            data_dir: dir.path().to_path_buf(),
            color_mode: Some(ColorMode::Rgb),
            frame_height: Some(4),
            frame_width: Some(4),
            ..RunConfig::default()
        }
    }

    fn write_log(config: &RunConfig, game: GameKind, steps: usize) {
        let frame = Canvas::new(10, 10, 1).capture();
        let mut log = GameplayLog::new(game);
        for i in 0..steps {
            log.record(&frame, Action::Stay, 0.0, i + 1 == steps, 0);
        }
        log.seal();
        log.save(&config.raw_path()).unwrap();
    }

    #[test]
    fn test_prepare_splits_and_saves() {
        let temp_dir = TempDir::new().unwrap();
        let config = config(&temp_dir);
        write_log(&config, GameKind::Catch, 10);

        let dataset = prepare(&config).unwrap();

        assert_eq!(dataset.train.len(), 8);
        assert_eq!(dataset.valid.len(), 2);
        assert_eq!(dataset.preprocessing.input_shape(), [3, 4, 4]);

        let loaded = PreparedDataset::load(&config.prepared_path()).unwrap();
        assert_eq!(loaded.train.labels(), dataset.train.labels());
        assert_eq!(loaded.num_classes, 3);
    }

    #[test]
    fn test_missing_preprocessing_setting() {
        let temp_dir = TempDir::new().unwrap();
        let config = RunConfig {
            frame_width: None,
            ..config(&temp_dir)
        };
        write_log(&config, GameKind::Catch, 3);

        let err = prepare(&config).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<GameError>(),
            Some(GameError::MissingSetting("FRAME_WIDTH"))
        ));
    }

    #[test]
    fn test_missing_raw_log() {
        let temp_dir = TempDir::new().unwrap();
        assert!(prepare(&config(&temp_dir)).is_err());
    }
}
