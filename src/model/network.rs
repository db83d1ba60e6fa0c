//! Baseline action classifiers
//!
//! Both baselines map a batch of preprocessed frames to one logit per action
//! in the game's action space.
//!
//! ```text
//! MLP:  [batch, C, H, W] → flatten → Linear(C·H·W → 128) + ReLU
//!                                  → Linear(128 → 64) + ReLU → Linear(64 → classes)
//!
//! CNN:  [batch, C, H, W] → Conv2d(C→16, k=3, p=1) + ReLU
//!                        → Conv2d(16→32, k=3, p=1) + ReLU
//!                        → AdaptiveAvgPool(≤8×≤8) → flatten
//!                        → Linear(32·h'·w' → 128) + ReLU → Linear(128 → classes)
//! ```

use burn::{
    module::Module,
    nn::{
        Linear, LinearConfig, PaddingConfig2d,
        conv::{Conv2d, Conv2dConfig},
        pool::{AdaptiveAvgPool2d, AdaptiveAvgPool2dConfig},
    },
    tensor::{Tensor, activation::relu, backend::Backend},
};

/// Largest spatial size the CNN keeps before its dense layers
const CNN_POOLED_SIDE: usize = 8;

/// A model that scores every action for a batch of frames
pub trait Classifier<B: Backend> {
    /// `[batch, C, H, W]` → `[batch, classes]` logits
    fn forward(&self, input: Tensor<B, 4>) -> Tensor<B, 2>;
}

#[derive(Debug, Clone)]
pub struct MlpConfig {
    /// `[channels, height, width]` of one sample
    pub input_shape: [usize; 3],
    pub num_classes: usize,
    pub hidden_dims: [usize; 2],
}

impl MlpConfig {
    pub fn new(input_shape: [usize; 3], num_classes: usize) -> Self {
        Self {
            input_shape,
            num_classes,
            hidden_dims: [128, 64],
        }
    }

    pub fn input_len(&self) -> usize {
        self.input_shape.iter().product()
    }

    pub fn init<B: Backend>(&self, device: &B::Device) -> MlpBaseline<B> {
        MlpBaseline {
            fc1: LinearConfig::new(self.input_len(), self.hidden_dims[0]).init(device),
            fc2: LinearConfig::new(self.hidden_dims[0], self.hidden_dims[1]).init(device),
            output: LinearConfig::new(self.hidden_dims[1], self.num_classes).init(device),
        }
    }
}

#[derive(Module, Debug)]
pub struct MlpBaseline<B: Backend> {
    fc1: Linear<B>,
    fc2: Linear<B>,
    output: Linear<B>,
}

impl<B: Backend> Classifier<B> for MlpBaseline<B> {
    fn forward(&self, input: Tensor<B, 4>) -> Tensor<B, 2> {
        let [batch_size, channels, height, width] = input.dims();
        let x = input.reshape([batch_size, channels * height * width]);

        let x = relu(self.fc1.forward(x));
        let x = relu(self.fc2.forward(x));
        self.output.forward(x)
    }
}

#[derive(Debug, Clone)]
pub struct CnnConfig {
    /// `[channels, height, width]` of one sample
    pub input_shape: [usize; 3],
    pub num_classes: usize,
    pub conv_channels: [usize; 2],
    pub hidden_dim: usize,
}

impl CnnConfig {
    pub fn new(input_shape: [usize; 3], num_classes: usize) -> Self {
        Self {
            input_shape,
            num_classes,
            conv_channels: [16, 32],
            hidden_dim: 128,
        }
    }

    /// Spatial size after pooling; never upsamples small frames
    fn pooled_size(&self) -> [usize; 2] {
        let [_, height, width] = self.input_shape;
        [
            height.clamp(1, CNN_POOLED_SIDE),
            width.clamp(1, CNN_POOLED_SIDE),
        ]
    }

    pub fn init<B: Backend>(&self, device: &B::Device) -> CnnBaseline<B> {
        let [pooled_h, pooled_w] = self.pooled_size();
        let flattened_dim = self.conv_channels[1] * pooled_h * pooled_w;

        CnnBaseline {
            conv1: Conv2dConfig::new([self.input_shape[0], self.conv_channels[0]], [3, 3])
                .with_padding(PaddingConfig2d::Explicit(1, 1))
                .init(device),
            conv2: Conv2dConfig::new([self.conv_channels[0], self.conv_channels[1]], [3, 3])
                .with_padding(PaddingConfig2d::Explicit(1, 1))
                .init(device),
            pool: AdaptiveAvgPool2dConfig::new([pooled_h, pooled_w]).init(),
            fc: LinearConfig::new(flattened_dim, self.hidden_dim).init(device),
            output: LinearConfig::new(self.hidden_dim, self.num_classes).init(device),
        }
    }
}

#[derive(Module, Debug)]
pub struct CnnBaseline<B: Backend> {
    conv1: Conv2d<B>,
    conv2: Conv2d<B>,
    pool: AdaptiveAvgPool2d,
    fc: Linear<B>,
    output: Linear<B>,
}

impl<B: Backend> Classifier<B> for CnnBaseline<B> {
    fn forward(&self, input: Tensor<B, 4>) -> Tensor<B, 2> {
        let x = relu(self.conv1.forward(input));
        let x = relu(self.conv2.forward(x));
        let x = self.pool.forward(x);

        let [batch_size, channels, height, width] = x.dims();
        let x = x.reshape([batch_size, channels * height * width]);

        let x = relu(self.fc.forward(x));
        self.output.forward(x)
    }
}
