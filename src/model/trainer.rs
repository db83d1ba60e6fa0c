//! Supervised training loop for the baseline classifiers
//!
//! Mini-batch cross-entropy training with the configured optimizer. After
//! every epoch the model is evaluated on the validation split without
//! autodiff and the epoch is logged.

use anyhow::{Result, bail};
use burn::{
    module::AutodiffModule,
    nn::loss::CrossEntropyLossConfig,
    optim::{AdamConfig, AdamWConfig, GradientsParams, Optimizer, SgdConfig},
    tensor::{ElementConversion, backend::AutodiffBackend, backend::Backend},
};
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use tracing::info;

use super::backend::{argmax_rows, input_batch, label_batch};
use super::network::Classifier;
use crate::config::{OptimizerKind, TrainingSettings};
use crate::data::{PreparedDataset, Samples};
use crate::metrics::TrainingStats;

/// Epochs averaged in the rolling statistics
const STATS_WINDOW: usize = 10;

/// Train `model` on the prepared dataset with the configured optimizer
pub fn train_model<B, M>(
    model: M,
    dataset: &PreparedDataset,
    settings: &TrainingSettings,
    rng: &mut ChaCha8Rng,
    device: &B::Device,
) -> Result<(M, TrainingStats)>
where
    B: AutodiffBackend,
    M: AutodiffModule<B> + Classifier<B>,
    M::InnerModule: Classifier<B::InnerBackend>,
{
    if dataset.train.is_empty() {
        bail!("the prepared dataset has no training samples");
    }

    match settings.optimizer {
        OptimizerKind::Adam => fit(
            model,
            AdamConfig::new().init::<B, M>(),
            dataset,
            settings,
            rng,
            device,
        ),
        OptimizerKind::AdamW => fit(
            model,
            AdamWConfig::new().init::<B, M>(),
            dataset,
            settings,
            rng,
            device,
        ),
        OptimizerKind::Sgd => fit(
            model,
            SgdConfig::new().init::<B, M>(),
            dataset,
            settings,
            rng,
            device,
        ),
    }
}

fn fit<B, M, O>(
    mut model: M,
    mut optim: O,
    dataset: &PreparedDataset,
    settings: &TrainingSettings,
    rng: &mut ChaCha8Rng,
    device: &B::Device,
) -> Result<(M, TrainingStats)>
where
    B: AutodiffBackend,
    M: AutodiffModule<B> + Classifier<B>,
    M::InnerModule: Classifier<B::InnerBackend>,
    O: Optimizer<M, B>,
{
    let loss_fn = CrossEntropyLossConfig::new().init(device);
    let shape = dataset.preprocessing.input_shape();
    let batch_size = settings.batch_size.max(1);
    let mut stats = TrainingStats::new(STATS_WINDOW);
    let mut order: Vec<usize> = (0..dataset.train.len()).collect();

    for epoch in 1..=settings.num_epochs {
        order.shuffle(rng);

        let mut epoch_loss = 0.0;
        let mut batches = 0;
        for indices in order.chunks(batch_size) {
            let (inputs, labels) = dataset.train.gather(indices);
            let input = input_batch::<B>(inputs, indices.len(), shape, device);
            let targets = label_batch::<B>(&labels, device);

            let logits = model.forward(input);
            let loss = loss_fn.forward(logits, targets);
            epoch_loss += loss.clone().into_scalar().elem::<f32>();

            let grads = GradientsParams::from_grads(loss.backward(), &model);
            model = optim.step(settings.learning_rate, model, grads);
            batches += 1;
        }

        let accuracy = evaluate(&model.valid(), &dataset.valid, shape, batch_size, device);
        stats.record_batches(batches);
        stats.record_epoch(epoch_loss / batches.max(1) as f32, accuracy);

        info!(
            epoch,
            num_epochs = settings.num_epochs,
            loss = stats.last_loss().unwrap_or_default(),
            valid_accuracy = ?accuracy,
            "epoch finished"
        );
    }

    Ok((model, stats))
}

/// Fraction of `samples` whose arg-max prediction matches the label
pub fn evaluate<B: Backend, M: Classifier<B>>(
    model: &M,
    samples: &Samples,
    shape: [usize; 3],
    batch_size: usize,
    device: &B::Device,
) -> Option<f32> {
    if samples.is_empty() {
        return None;
    }

    let indices: Vec<usize> = (0..samples.len()).collect();
    let mut correct = 0usize;
    for chunk in indices.chunks(batch_size.max(1)) {
        let (inputs, labels) = samples.gather(chunk);
        let logits = model.forward(input_batch::<B>(inputs, chunk.len(), shape, device));
        correct += argmax_rows(logits)
            .into_iter()
            .zip(labels)
            .filter(|&(predicted, label)| predicted == label as usize)
            .count();
    }

    Some(correct as f32 / samples.len() as f32)
}
