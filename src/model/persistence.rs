//! Saving and loading trained baselines
//!
//! A model is stored as two files next to each other:
//! - `<path>.mpk` with the weights (Burn named MessagePack record)
//! - `<path>.meta.json` with everything needed to rebuild the network and
//!   preprocess frames the way the training data was prepared

use anyhow::{Context, Result};
use burn::{
    module::Module,
    record::{FullPrecisionSettings, NamedMpkFileRecorder, Recorder},
    tensor::{Tensor, backend::Backend},
};
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::network::{Classifier, CnnBaseline, CnnConfig, MlpBaseline, MlpConfig};
use crate::config::{ModelMode, OptimizerKind, Preprocessing};
use crate::game::GameKind;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub game: GameKind,
    pub model_mode: ModelMode,
    pub preprocessing: Preprocessing,
    /// Size of the game's action space
    pub num_classes: usize,
    pub optimizer: OptimizerKind,
    pub epochs_trained: usize,
    pub best_accuracy: Option<f32>,
    /// Version identifier for compatibility checking
    pub version: String,
}

impl ModelMetadata {
    pub fn new(
        game: GameKind,
        model_mode: ModelMode,
        preprocessing: Preprocessing,
        num_classes: usize,
        optimizer: OptimizerKind,
    ) -> Self {
        Self {
            game,
            model_mode,
            preprocessing,
            num_classes,
            optimizer,
            epochs_trained: 0,
            best_accuracy: None,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// A baseline restored from disk
#[derive(Debug)]
pub enum LoadedModel<B: Backend> {
    Mlp(MlpBaseline<B>),
    Cnn(CnnBaseline<B>),
}

impl<B: Backend> Classifier<B> for LoadedModel<B> {
    fn forward(&self, input: Tensor<B, 4>) -> Tensor<B, 2> {
        match self {
            LoadedModel::Mlp(model) => model.forward(input),
            LoadedModel::Cnn(model) => model.forward(input),
        }
    }
}

fn metadata_path(path: &Path) -> std::path::PathBuf {
    path.with_extension("meta.json")
}

/// Save weights and metadata, creating parent directories as needed
pub fn save_model<B: Backend, M: Module<B>>(
    model: &M,
    metadata: &ModelMetadata,
    path: &Path,
) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {:?}", parent))?;
    }

    let recorder = NamedMpkFileRecorder::<FullPrecisionSettings>::new();
    recorder
        .record(model.clone().into_record(), path.to_path_buf())
        .context("Failed to save model weights")?;

    let meta_path = metadata_path(path);
    let meta_json =
        serde_json::to_string_pretty(metadata).context("Failed to serialize metadata")?;
    std::fs::write(&meta_path, meta_json)
        .with_context(|| format!("Failed to write metadata to {:?}", meta_path))?;

    Ok(())
}

pub fn load_metadata(path: &Path) -> Result<ModelMetadata> {
    let meta_path = metadata_path(path);
    let meta_json = std::fs::read_to_string(&meta_path)
        .with_context(|| format!("Failed to read metadata from {:?}", meta_path))?;
    serde_json::from_str(&meta_json).context("Failed to deserialize metadata")
}

/// Rebuild the network described by the metadata and load its weights
pub fn load_model<B: Backend>(
    path: &Path,
    device: &B::Device,
) -> Result<(LoadedModel<B>, ModelMetadata)> {
    let metadata = load_metadata(path)?;
    let shape = metadata.preprocessing.input_shape();
    let recorder = NamedMpkFileRecorder::<FullPrecisionSettings>::new();

    let model = match metadata.model_mode {
        ModelMode::Mlp => {
            let network = MlpConfig::new(shape, metadata.num_classes).init::<B>(device);
            let record = recorder
                .load(path.to_path_buf(), device)
                .with_context(|| format!("Failed to load model weights from {:?}", path))?;
            LoadedModel::Mlp(network.load_record(record))
        }
        ModelMode::Cnn => {
            let network = CnnConfig::new(shape, metadata.num_classes).init::<B>(device);
            let record = recorder
                .load(path.to_path_buf(), device)
                .with_context(|| format!("Failed to load model weights from {:?}", path))?;
            LoadedModel::Cnn(network.load_record(record))
        }
    };

    Ok((model, metadata))
}
