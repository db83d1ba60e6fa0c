use std::time::{Duration, Instant};

/// Outcome tally across the tries of a play or collect run
pub struct PlayTally {
    pub start_time: Instant,
    pub elapsed_time: Duration,
    pub tries: u32,
    pub wins: u32,
    pub high_score: u32,
}

impl PlayTally {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            elapsed_time: Duration::ZERO,
            tries: 0,
            wins: 0,
            high_score: 0,
        }
    }

    pub fn update(&mut self) {
        self.elapsed_time = self.start_time.elapsed();
    }

    /// A try is won iff it ended with a positive score
    pub fn is_win(final_score: u32) -> bool {
        final_score > 0
    }

    /// Count a finished try; returns whether it was a win
    pub fn on_try_over(&mut self, final_score: u32) -> bool {
        self.tries += 1;
        if final_score > self.high_score {
            self.high_score = final_score;
        }
        let won = Self::is_win(final_score);
        if won {
            self.wins += 1;
        }
        self.update();
        won
    }

    pub fn win_rate(&self) -> f32 {
        if self.tries == 0 {
            0.0
        } else {
            self.wins as f32 / self.tries as f32
        }
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed_time.as_secs();
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;
        format!("{:02}:{:02}", minutes, seconds)
    }
}

impl Default for PlayTally {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_formatting() {
        let mut tally = PlayTally::new();
        tally.elapsed_time = Duration::from_secs(125);
        assert_eq!(tally.format_time(), "02:05");

        tally.elapsed_time = Duration::from_secs(0);
        assert_eq!(tally.format_time(), "00:00");

        tally.elapsed_time = Duration::from_secs(3661);
        assert_eq!(tally.format_time(), "61:01");
    }

    #[test]
    fn test_win_classification() {
        assert!(PlayTally::is_win(5));
        assert!(PlayTally::is_win(1));
        assert!(!PlayTally::is_win(0));
    }

    #[test]
    fn test_tally_accumulates() {
        let mut tally = PlayTally::new();

        assert!(tally.on_try_over(5));
        assert!(!tally.on_try_over(0));
        assert!(tally.on_try_over(2));

        assert_eq!(tally.tries, 3);
        assert_eq!(tally.wins, 2);
        assert_eq!(tally.high_score, 5); // Should not decrease
        assert!((tally.win_rate() - 2.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_empty_win_rate() {
        assert_eq!(PlayTally::new().win_rate(), 0.0);
    }
}
