//! Training statistics for the supervised baselines
//!
//! Tracks per-epoch training loss and validation accuracy, with rolling
//! windows for smoothed values and the best accuracy seen so far.

use std::collections::VecDeque;

/// Per-epoch statistics tracker with rolling averages
///
/// # Example
///
/// ```rust
/// use ml_games::metrics::TrainingStats;
///
/// let mut stats = TrainingStats::new(10);
/// stats.record_epoch(0.9, Some(0.55));
/// stats.record_epoch(0.7, Some(0.61));
///
/// assert_eq!(stats.epochs(), 2);
/// println!("{}", stats.format_summary());
/// ```
#[derive(Debug, Clone)]
pub struct TrainingStats {
    /// Mean training loss per epoch (rolling window)
    train_losses: VecDeque<f32>,

    /// Validation accuracy per epoch (rolling window)
    valid_accuracies: VecDeque<f32>,

    last_loss: Option<f32>,
    last_accuracy: Option<f32>,
    best_accuracy: Option<f32>,

    /// Total number of epochs completed
    epochs: usize,

    /// Total number of optimizer steps taken
    total_batches: usize,

    /// Window size for rolling averages
    window_size: usize,
}

impl TrainingStats {
    pub fn new(window_size: usize) -> Self {
        Self {
            train_losses: VecDeque::with_capacity(window_size),
            valid_accuracies: VecDeque::with_capacity(window_size),
            last_loss: None,
            last_accuracy: None,
            best_accuracy: None,
            epochs: 0,
            total_batches: 0,
            window_size,
        }
    }

    /// Record a finished epoch
    ///
    /// `valid_accuracy` is `None` when there is no validation split.
    pub fn record_epoch(&mut self, train_loss: f32, valid_accuracy: Option<f32>) {
        Self::push_deque(&mut self.train_losses, train_loss, self.window_size);
        self.last_loss = Some(train_loss);

        if let Some(accuracy) = valid_accuracy {
            Self::push_deque(&mut self.valid_accuracies, accuracy, self.window_size);
            self.best_accuracy = Some(self.best_accuracy.map_or(accuracy, |b| b.max(accuracy)));
        }
        self.last_accuracy = valid_accuracy;
        self.epochs += 1;
    }

    pub fn record_batches(&mut self, batches: usize) {
        self.total_batches += batches;
    }

    pub fn mean_train_loss(&self) -> f32 {
        Self::mean(&self.train_losses)
    }

    pub fn mean_valid_accuracy(&self) -> f32 {
        Self::mean(&self.valid_accuracies)
    }

    pub fn last_loss(&self) -> Option<f32> {
        self.last_loss
    }

    pub fn last_accuracy(&self) -> Option<f32> {
        self.last_accuracy
    }

    pub fn best_accuracy(&self) -> Option<f32> {
        self.best_accuracy
    }

    pub fn epochs(&self) -> usize {
        self.epochs
    }

    pub fn total_batches(&self) -> usize {
        self.total_batches
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// One-line summary of the current statistics
    pub fn format_summary(&self) -> String {
        let accuracy = self
            .last_accuracy
            .map_or_else(|| "n/a".to_string(), |a| format!("{:.4}", a));
        let best = self
            .best_accuracy
            .map_or_else(|| "n/a".to_string(), |a| format!("{:.4}", a));

        format!(
            "Epochs: {} | Batches: {} | Loss: {:.4} | Avg Loss: {:.4} | Val Acc: {} | Best: {}",
            self.epochs,
            self.total_batches,
            self.last_loss.unwrap_or(0.0),
            self.mean_train_loss(),
            accuracy,
            best,
        )
    }

    fn mean(deque: &VecDeque<f32>) -> f32 {
        if deque.is_empty() {
            0.0
        } else {
            deque.iter().sum::<f32>() / deque.len() as f32
        }
    }

    fn push_deque<T>(deque: &mut VecDeque<T>, value: T, window_size: usize) {
        if deque.len() >= window_size {
            deque.pop_front();
        }
        deque.push_back(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let stats = TrainingStats::new(100);
        assert_eq!(stats.window_size(), 100);
        assert_eq!(stats.epochs(), 0);
        assert_eq!(stats.best_accuracy(), None);
    }

    #[test]
    fn test_record_epoch() {
        let mut stats = TrainingStats::new(100);
        stats.record_epoch(0.5, Some(0.75));

        assert_eq!(stats.epochs(), 1);
        assert!((stats.mean_train_loss() - 0.5).abs() < 1e-5);
        assert!((stats.mean_valid_accuracy() - 0.75).abs() < 1e-5);
        assert_eq!(stats.last_accuracy(), Some(0.75));
    }

    #[test]
    fn test_rolling_average() {
        let mut stats = TrainingStats::new(3);

        stats.record_epoch(1.0, None);
        stats.record_epoch(2.0, None);
        stats.record_epoch(3.0, None);
        assert!((stats.mean_train_loss() - 2.0).abs() < 1e-5);

        // A 4th epoch evicts the first
        stats.record_epoch(4.0, None);
        assert_eq!(stats.epochs(), 4);
        assert!((stats.mean_train_loss() - 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_best_accuracy_never_drops() {
        let mut stats = TrainingStats::new(10);
        stats.record_epoch(1.0, Some(0.4));
        stats.record_epoch(0.8, Some(0.7));
        stats.record_epoch(0.6, Some(0.5));

        assert_eq!(stats.best_accuracy(), Some(0.7));
        assert_eq!(stats.last_accuracy(), Some(0.5));
    }

    #[test]
    fn test_format_summary() {
        let mut stats = TrainingStats::new(100);
        stats.record_batches(12);
        stats.record_epoch(0.25, Some(0.5));

        let summary = stats.format_summary();
        assert!(summary.contains("Epochs: 1"));
        assert!(summary.contains("Batches: 12"));
        assert!(summary.contains("Loss: 0.2500"));
        assert!(summary.contains("Val Acc: 0.5000"));
    }

    #[test]
    fn test_summary_without_validation() {
        let mut stats = TrainingStats::new(5);
        stats.record_epoch(0.3, None);
        assert!(stats.format_summary().contains("Val Acc: n/a"));
    }
}
