pub mod game_metrics;
pub mod training_stats;

pub use game_metrics::PlayTally;
pub use training_stats::TrainingStats;
