use burn::{
    nn::{
        loss::CrossEntropyLossConfig,
        Initializer, Linear, LinearConfig,
    },
    prelude::*,
    tensor::activation::{relu, softmax},
};

use crate::domain::record::NUM_FEATURES;
use crate::domain::weather::NUM_CLASSES;

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize
// internally — do NOT add them again or you get conflicting impls.
#[derive(Config, Debug)]
pub struct WeatherClassifierConfig {
    #[config(default = "NUM_FEATURES")]
    pub input_size:  usize,
    #[config(default = 8)]
    pub hidden_1:    usize,
    #[config(default = 16)]
    pub hidden_2:    usize,
    #[config(default = "NUM_CLASSES")]
    pub num_classes: usize,
}

impl WeatherClassifierConfig {
    /// 4 → 8 (relu) → 16 (relu) → 5 (softmax at inference).
    pub fn init<B: Backend>(&self, device: &B::Device) -> WeatherClassifier<B> {
        WeatherClassifier {
            input:  self.dense(self.input_size, self.hidden_1, device),
            hidden: self.dense(self.hidden_1, self.hidden_2, device),
            output: self.dense(self.hidden_2, self.num_classes, device),
        }
    }

    // Glorot-uniform weights, the usual default for dense layers
    fn dense<B: Backend>(&self, d_in: usize, d_out: usize, device: &B::Device) -> Linear<B> {
        LinearConfig::new(d_in, d_out)
            .with_initializer(Initializer::XavierUniform { gain: 1.0 })
            .init(device)
    }
}

#[derive(Module, Debug)]
pub struct WeatherClassifier<B: Backend> {
    pub input:  Linear<B>,
    pub hidden: Linear<B>,
    pub output: Linear<B>,
}

impl<B: Backend> WeatherClassifier<B> {
    /// features: [batch, 4] → logits: [batch, 5]
    pub fn forward(&self, features: Tensor<B, 2>) -> Tensor<B, 2> {
        let x = relu(self.input.forward(features));
        let x = relu(self.hidden.forward(x));
        self.output.forward(x)
    }

    /// features: [batch, 4] → class probabilities: [batch, 5]
    pub fn probabilities(&self, features: Tensor<B, 2>) -> Tensor<B, 2> {
        softmax(self.forward(features), 1)
    }

    /// Sparse categorical cross-entropy over the logits.
    /// CrossEntropyLoss applies log-softmax itself, so the loss is
    /// computed on raw logits and softmax only appears at inference.
    pub fn forward_classification(
        &self,
        features: Tensor<B, 2>,
        targets:  Tensor<B, 1, Int>,
    ) -> (Tensor<B, 1>, Tensor<B, 2>) {
        let logits = self.forward(features);
        let loss = CrossEntropyLossConfig::new()
            .init(&logits.device())
            .forward(logits.clone(), targets);
        (loss, logits)
    }
}
