use anyhow::{Result, ensure};
use burn::backend::ndarray::NdArrayDevice;
use tracing::info;

use super::{Agent, AgentContext};
use crate::data::preprocess;
use crate::error::GameError;
use crate::game::{Action, Frame};
use crate::model::backend::{argmax_rows, input_batch};
use crate::model::{
    Classifier, InferenceBackend, LoadedModel, ModelMetadata, default_device, load_model,
};

/// Plays with a trained baseline
///
/// Frames are preprocessed exactly as the training data was (color mode and
/// resolution come from the model metadata); the arg-max class is mapped back
/// through the game's action space.
pub struct NeuralNetworkAgent {
    model: LoadedModel<InferenceBackend>,
    metadata: ModelMetadata,
    action_space: &'static [Action],
    device: NdArrayDevice,
}

impl NeuralNetworkAgent {
    pub fn load(ctx: &AgentContext) -> Result<Self> {
        let path = ctx.model_path()?;
        let device = default_device();
        let (model, metadata) = load_model::<InferenceBackend>(&path, &device)?;

        ensure!(
            metadata.game == ctx.game,
            "model {:?} was trained for {}, not {}",
            path,
            metadata.game,
            ctx.game
        );

        info!(
            path = ?path,
            model = %metadata.model_mode,
            color_mode = %metadata.preprocessing.color_mode,
            "loaded model"
        );

        Self::from_model(model, metadata, ctx.game.action_space())
    }

    pub fn from_model(
        model: LoadedModel<InferenceBackend>,
        metadata: ModelMetadata,
        action_space: &'static [Action],
    ) -> Result<Self> {
        ensure!(
            metadata.num_classes == action_space.len(),
            "model predicts {} classes but the game has {} actions",
            metadata.num_classes,
            action_space.len()
        );

        Ok(Self {
            model,
            metadata,
            action_space,
            device: default_device(),
        })
    }
}

impl Agent for NeuralNetworkAgent {
    fn name(&self) -> &'static str {
        "NeuralNetwork"
    }

    fn choose_action(&mut self, frame: &Frame) -> Result<Action, GameError> {
        let prep = &self.metadata.preprocessing;
        let input = input_batch::<InferenceBackend>(
            preprocess(frame, prep),
            1,
            prep.input_shape(),
            &self.device,
        );

        let label = argmax_rows(self.model.forward(input))
            .first()
            .copied()
            .unwrap_or(0);
        Ok(self.action_space.get(label).copied().unwrap_or(Action::Stay))
    }
}
