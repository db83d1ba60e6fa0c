//! Recorded gameplay
//!
//! Every step of a collected episode is kept as a [`StepRecord`]. A
//! [`GameplayLog`] groups them by episode and is stored as a single bincode
//! file that is loaded wholesale by the preparation step.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;

use crate::game::{Action, Frame, GameKind};

/// Sink for the `(frame, action, reward, done, score)` tuples of a run
pub trait StepRecorder {
    fn record(&mut self, frame: &Frame, action: Action, reward: f32, done: bool, score: u32);
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    /// Observation the action was chosen from
    pub frame: Frame,
    /// Action the game executed
    pub action: Action,
    pub reward: f32,
    pub done: bool,
    pub score: u32,
}

/// All recorded episodes of one game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameplayLog {
    pub game: GameKind,
    pub episodes: Vec<Vec<StepRecord>>,
}

impl GameplayLog {
    pub fn new(game: GameKind) -> Self {
        Self {
            game,
            episodes: Vec::new(),
        }
    }

    pub fn num_steps(&self) -> usize {
        self.episodes.iter().map(Vec::len).sum()
    }

    pub fn records(&self) -> impl Iterator<Item = &StepRecord> {
        self.episodes.iter().flatten()
    }

    /// Drop trailing episodes that never reached a terminal step
    ///
    /// That is the empty episode opened by the last terminal record, or a try
    /// the player quit half way through.
    pub fn seal(&mut self) {
        while self
            .episodes
            .last()
            .is_some_and(|episode| !episode.last().is_some_and(|r| r.done))
        {
            self.episodes.pop();
        }
    }

    /// Append the episodes of another log of the same game
    pub fn extend(&mut self, other: GameplayLog) {
        self.episodes.extend(other.episodes);
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }
        let file =
            File::create(path).with_context(|| format!("Failed to create {:?}", path))?;
        bincode::serialize_into(BufWriter::new(file), self)
            .with_context(|| format!("Failed to write gameplay log to {:?}", path))?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("Failed to open {:?}", path))?;
        bincode::deserialize_from(BufReader::new(file))
            .with_context(|| format!("Failed to read gameplay log from {:?}", path))
    }
}

impl StepRecorder for GameplayLog {
    fn record(&mut self, frame: &Frame, action: Action, reward: f32, done: bool, score: u32) {
        if self.episodes.is_empty() {
            self.episodes.push(Vec::new());
        }
        if let Some(episode) = self.episodes.last_mut() {
            episode.push(StepRecord {
                frame: frame.clone(),
                action,
                reward,
                done,
                score,
            });
        }
        // Next record opens a new episode
        if done {
            self.episodes.push(Vec::new());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn frame(value: u8) -> Frame {
        Frame::from_raw(2, 2, 3, vec![value; 12]).unwrap()
    }

    #[test]
    fn test_record_splits_episodes_on_done() {
        let mut log = GameplayLog::new(GameKind::Catch);
        log.record(&frame(0), Action::Left, 0.0, false, 0);
        log.record(&frame(1), Action::Stay, 1.0, true, 1);
        log.record(&frame(2), Action::Right, -1.0, true, 0);
        log.seal();

        assert_eq!(log.episodes.len(), 2);
        assert_eq!(log.episodes[0].len(), 2);
        assert_eq!(log.episodes[1][0].action, Action::Right);
        assert_eq!(log.num_steps(), 3);
    }

    #[test]
    fn test_seal_drops_unfinished_episode() {
        let mut log = GameplayLog::new(GameKind::Snake);
        log.record(&frame(0), Action::Up, 0.0, true, 0);
        log.record(&frame(1), Action::Up, 0.0, false, 0);
        log.record(&frame(2), Action::Left, 0.0, false, 0);
        log.seal();

        assert_eq!(log.episodes.len(), 1);
        assert_eq!(log.num_steps(), 1);
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("catch").join("raw.bin");

        let mut log = GameplayLog::new(GameKind::Catch);
        log.record(&frame(7), Action::Left, 0.0, false, 0);
        log.record(&frame(8), Action::Stay, -1.0, true, 0);
        log.seal();
        log.save(&path).unwrap();

        let loaded = GameplayLog::load(&path).unwrap();
        assert_eq!(loaded, log);
    }

    #[test]
    fn test_load_missing_file_fails() {
        let temp_dir = TempDir::new().unwrap();
        assert!(GameplayLog::load(&temp_dir.path().join("nope.bin")).is_err());
    }
}
