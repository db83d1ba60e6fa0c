//! Turning recorded gameplay into a supervised dataset
//!
//! Each recorded frame becomes a flat channel-first `f32` input (color
//! converted, resized, scaled to [0, 1]) and each executed action becomes a
//! class label: its position in the game's action space. The samples are
//! shuffled once with the run seed and split into train and validation sets.

use anyhow::{Context, Result};
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;
use tracing::warn;

use super::record::GameplayLog;
use crate::config::{ColorMode, Preprocessing};
use crate::game::{Action, Frame, GameKind};

/// Model input for one frame, laid out as (channel, row, column)
pub fn preprocess(frame: &Frame, prep: &Preprocessing) -> Vec<f32> {
    let converted = match prep.color_mode {
        ColorMode::Grayscale => frame.to_grayscale(),
        ColorMode::Rgb => frame.clone(),
    };
    converted
        .resized(prep.frame_height, prep.frame_width)
        .to_chw_f32()
}

/// Class index of `action` within `action_space`
pub fn label_for(action: Action, action_space: &[Action]) -> Option<u32> {
    action_space
        .iter()
        .position(|&a| a == action)
        .map(|idx| idx as u32)
}

/// Flat storage for a set of equally shaped samples
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Samples {
    sample_len: usize,
    inputs: Vec<f32>,
    labels: Vec<u32>,
}

impl Samples {
    pub fn new(sample_len: usize) -> Self {
        Self {
            sample_len,
            inputs: Vec::new(),
            labels: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn push(&mut self, input: &[f32], label: u32) {
        debug_assert_eq!(input.len(), self.sample_len);
        self.inputs.extend_from_slice(input);
        self.labels.push(label);
    }

    pub fn input(&self, index: usize) -> &[f32] {
        let start = index * self.sample_len;
        &self.inputs[start..start + self.sample_len]
    }

    pub fn labels(&self) -> &[u32] {
        &self.labels
    }

    /// Concatenated inputs and labels for the given sample indices
    pub fn gather(&self, indices: &[usize]) -> (Vec<f32>, Vec<u32>) {
        let mut inputs = Vec::with_capacity(indices.len() * self.sample_len);
        let mut labels = Vec::with_capacity(indices.len());
        for &i in indices {
            inputs.extend_from_slice(self.input(i));
            labels.push(self.labels[i]);
        }
        (inputs, labels)
    }
}

/// Train/validation split ready for the trainer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreparedDataset {
    pub game: GameKind,
    pub preprocessing: Preprocessing,
    /// Size of the game's action space
    pub num_classes: usize,
    pub train: Samples,
    pub valid: Samples,
}

impl PreparedDataset {
    /// Preprocess, shuffle and split every record of `log`
    pub fn from_log(
        log: &GameplayLog,
        prep: Preprocessing,
        split_fraction: f64,
        rng: &mut ChaCha8Rng,
    ) -> Self {
        let action_space = log.game.action_space();

        let mut pairs: Vec<(Vec<f32>, u32)> = Vec::with_capacity(log.num_steps());
        let mut skipped = 0usize;
        for record in log.records() {
            match label_for(record.action, action_space) {
                Some(label) => pairs.push((preprocess(&record.frame, &prep), label)),
                None => skipped += 1,
            }
        }
        if skipped > 0 {
            warn!(
                skipped,
                game = log.game.name(),
                "records with actions outside the action space were dropped"
            );
        }

        pairs.shuffle(rng);

        let fraction = split_fraction.clamp(0.0, 1.0);
        let num_train = ((pairs.len() as f64) * fraction).round() as usize;

        let mut train = Samples::new(prep.input_len());
        let mut valid = Samples::new(prep.input_len());
        for (i, (input, label)) in pairs.iter().enumerate() {
            if i < num_train {
                train.push(input, *label);
            } else {
                valid.push(input, *label);
            }
        }

        Self {
            game: log.game,
            preprocessing: prep,
            num_classes: action_space.len(),
            train,
            valid,
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }
        let file =
            File::create(path).with_context(|| format!("Failed to create {:?}", path))?;
        bincode::serialize_into(BufWriter::new(file), self)
            .with_context(|| format!("Failed to write dataset to {:?}", path))?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("Failed to open {:?}", path))?;
        bincode::deserialize_from(BufReader::new(file))
            .with_context(|| format!("Failed to read dataset from {:?}", path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::record::StepRecorder;
    use crate::game::frame::{COLOR_GREEN, COLOR_WHITE};
    use crate::game::Canvas;
    use rand::SeedableRng;
    use tempfile::TempDir;

    fn grayscale(height: usize, width: usize) -> Preprocessing {
        Preprocessing {
            color_mode: ColorMode::Grayscale,
            frame_height: height,
            frame_width: width,
        }
    }

    fn catch_log(steps: usize) -> GameplayLog {
        let mut log = GameplayLog::new(GameKind::Catch);
        let mut canvas = Canvas::new(4, 4, 2);
        let actions = [Action::Left, Action::Right, Action::Stay];
        for i in 0..steps {
            canvas.fill_cell((i % 4) as i32, 0, COLOR_WHITE);
            let done = i + 1 == steps;
            log.record(&canvas.capture(), actions[i % 3], 0.0, done, 0);
        }
        log.seal();
        log
    }

    #[test]
    fn test_labels_follow_action_space() {
        let catch = GameKind::Catch.action_space();
        assert_eq!(label_for(Action::Left, catch), Some(0));
        assert_eq!(label_for(Action::Right, catch), Some(1));
        assert_eq!(label_for(Action::Stay, catch), Some(2));
        assert_eq!(label_for(Action::Up, catch), None);

        let snake = GameKind::Snake.action_space();
        assert_eq!(label_for(Action::Right, snake), Some(3));
    }

    #[test]
    fn test_preprocess_shapes() {
        let mut canvas = Canvas::new(4, 4, 5);
        canvas.fill_cell(1, 2, COLOR_GREEN);
        let frame = canvas.capture();

        let gray = preprocess(&frame, &grayscale(10, 8));
        assert_eq!(gray.len(), 10 * 8);
        assert!(gray.iter().all(|v| (0.0..=1.0).contains(v)));

        let rgb = Preprocessing {
            color_mode: ColorMode::Rgb,
            frame_height: 4,
            frame_width: 4,
        };
        assert_eq!(preprocess(&frame, &rgb).len(), 3 * 4 * 4);
    }

    #[test]
    fn test_split_fraction() {
        let log = catch_log(10);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let dataset = PreparedDataset::from_log(&log, grayscale(4, 4), 0.8, &mut rng);

        assert_eq!(dataset.train.len(), 8);
        assert_eq!(dataset.valid.len(), 2);
        assert_eq!(dataset.num_classes, 3);
        assert_eq!(dataset.train.input(0).len(), 16);
    }

    #[test]
    fn test_shuffle_is_seeded() {
        let log = catch_log(30);
        let a = PreparedDataset::from_log(
            &log,
            grayscale(4, 4),
            0.5,
            &mut ChaCha8Rng::seed_from_u64(3),
        );
        let b = PreparedDataset::from_log(
            &log,
            grayscale(4, 4),
            0.5,
            &mut ChaCha8Rng::seed_from_u64(3),
        );
        assert_eq!(a, b);
    }

    #[test]
    fn test_gather() {
        let mut samples = Samples::new(2);
        samples.push(&[0.0, 0.1], 0);
        samples.push(&[1.0, 1.1], 1);
        samples.push(&[2.0, 2.1], 2);

        let (inputs, labels) = samples.gather(&[2, 0]);
        assert_eq!(inputs, vec![2.0, 2.1, 0.0, 0.1]);
        assert_eq!(labels, vec![2, 0]);
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("prepared.bin");

        let log = catch_log(6);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let dataset = PreparedDataset::from_log(&log, grayscale(4, 4), 0.5, &mut rng);
        dataset.save(&path).unwrap();

        assert_eq!(PreparedDataset::load(&path).unwrap(), dataset);
    }
}
