//! Baseline models that predict actions from frames
//!
//! Provides:
//! - Burn backend aliases and batch tensor helpers
//! - MLP and CNN baselines behind the [`Classifier`] trait
//! - The supervised training loop
//! - Saving and loading trained models with their metadata

pub mod backend;
pub mod network;
pub mod persistence;
pub mod trainer;

pub use backend::{InferenceBackend, TrainingBackend, default_device};
pub use network::{Classifier, CnnBaseline, CnnConfig, MlpBaseline, MlpConfig};
pub use persistence::{LoadedModel, ModelMetadata, load_model, save_model};
pub use trainer::train_model;
