//! Gameplay recording and dataset preparation

pub mod dataset;
pub mod record;

pub use dataset::{PreparedDataset, Samples, label_for, preprocess};
pub use record::{GameplayLog, StepRecord, StepRecorder};
