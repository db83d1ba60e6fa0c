//! Burn backends and batch tensor construction
//!
//! Training runs on the autodiff-wrapped NdArray backend, inference (the
//! neural-network agent) on plain NdArray. Frames are small enough that the
//! CPU backend is all the baselines need.

use burn::{
    backend::{
        Autodiff,
        ndarray::{NdArray, NdArrayDevice},
    },
    tensor::{Int, Tensor, TensorData, backend::Backend},
};

pub type TrainingBackend = Autodiff<NdArray<f32>>;

pub type InferenceBackend = NdArray<f32>;

pub fn default_device() -> NdArrayDevice {
    NdArrayDevice::default()
}

/// Stack flat channel-first samples into a `[batch, c, h, w]` tensor
pub fn input_batch<B: Backend>(
    values: Vec<f32>,
    batch: usize,
    [channels, height, width]: [usize; 3],
    device: &B::Device,
) -> Tensor<B, 4> {
    let data = TensorData::new(values, [batch, channels, height, width]);
    Tensor::<B, 4>::from_data(data, device)
}

/// Class indices as a `[batch]` integer tensor
pub fn label_batch<B: Backend>(labels: &[u32], device: &B::Device) -> Tensor<B, 1, Int> {
    let values: Vec<i64> = labels.iter().map(|&l| l as i64).collect();
    let data = TensorData::new(values, [labels.len()]);
    Tensor::<B, 1, Int>::from_data(data, device)
}

/// Index of the largest logit in each row
pub fn argmax_rows<B: Backend>(logits: Tensor<B, 2>) -> Vec<usize> {
    let [_, classes] = logits.dims();
    let values: Vec<f32> = logits.into_data().to_vec().unwrap_or_default();

    values
        .chunks(classes.max(1))
        .map(|row| {
            row.iter()
                .enumerate()
                .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
                .map(|(idx, _)| idx)
                .unwrap_or(0)
        })
        .collect()
}
