//! COLLECT: play like PLAY and record every step
//!
//! Recorded episodes are appended to the game's raw gameplay log, so several
//! collect runs (for example a human session and a random one) accumulate
//! into one dataset.

use anyhow::{Result, ensure};
use std::path::Path;
use tracing::info;

use super::play::{PlaySummary, run_games};
use crate::config::RunConfig;
use crate::data::GameplayLog;

pub fn collect(config: &RunConfig) -> Result<PlaySummary> {
    let mut log = GameplayLog::new(config.game);
    let summary = run_games(config, Some(&mut log))?;
    log.seal();

    let recorded_episodes = log.episodes.len();
    let recorded_steps = log.num_steps();

    let path = config.raw_path();
    let log = append_to_existing(log, &path)?;
    log.save(&path)?;

    info!(
        path = ?path,
        recorded_episodes,
        recorded_steps,
        total_episodes = log.episodes.len(),
        total_steps = log.num_steps(),
        "gameplay saved"
    );

    Ok(summary)
}

fn append_to_existing(log: GameplayLog, path: &Path) -> Result<GameplayLog> {
    if !path.exists() {
        return Ok(log);
    }

    let mut existing = GameplayLog::load(path)?;
    ensure!(
        existing.game == log.game,
        "{:?} holds {} gameplay, not {}",
        path,
        existing.game,
        log.game
    );
    existing.extend(log);
    Ok(existing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameKind;
    use tempfile::TempDir;

    fn config(dir: &TempDir, num_tries: usize) -> RunConfig {
        RunConfig {
            num_tries,
            seed: Some(5),
            cell_size: 1,
            data_dir: dir.path().to_path_buf(),
            ..RunConfig::default()
        }
    }

    #[test]
    fn test_collect_writes_raw_log() {
        let temp_dir = TempDir::new().unwrap();
        let config = config(&temp_dir, 3);

        let summary = collect(&config).unwrap();
        let log = GameplayLog::load(&config.raw_path()).unwrap();

        assert_eq!(log.game, GameKind::Catch);
        assert_eq!(log.episodes.len(), 3);
        let final_scores: Vec<u32> = log
            .episodes
            .iter()
            .map(|e| e.last().unwrap().score)
            .collect();
        assert_eq!(final_scores, summary.scores);
    }

    #[test]
    fn test_collect_appends() {
        let temp_dir = TempDir::new().unwrap();

        collect(&config(&temp_dir, 2)).unwrap();
        collect(&config(&temp_dir, 3)).unwrap();

        let log = GameplayLog::load(&config(&temp_dir, 0).raw_path()).unwrap();
        assert_eq!(log.episodes.len(), 5);
    }

    #[test]
    fn test_mismatched_log_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("raw.bin");
        GameplayLog::new(GameKind::Snake).save(&path).unwrap();

        let result = append_to_existing(GameplayLog::new(GameKind::Catch), &path);
        assert!(result.is_err());
    }
}
