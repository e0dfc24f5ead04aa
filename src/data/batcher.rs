// ============================================================
// Layer 4 — Weather Batcher
// ============================================================
// Implements Burn's Batcher trait to stack WeatherSamples into
// tensors for one forward pass:
//
//   Input:  Vec of N WeatherSamples
//   Output: WeatherBatch with
//             features: [N, 4]  (Float)
//             targets:  [N]     (Int, class indices)
//
// Reference: Burn Book §4 (Batcher)

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
};

use crate::data::dataset::WeatherSample;
use crate::domain::record::NUM_FEATURES;

#[derive(Debug, Clone)]
pub struct WeatherBatch<B: Backend> {
    /// Feature rows — shape: [batch_size, 4]
    pub features: Tensor<B, 2>,

    /// Class indices — shape: [batch_size]
    pub targets: Tensor<B, 1, Int>,
}

/// Stateless: the device comes from the DataLoader on each call.
#[derive(Clone, Debug, Default)]
pub struct WeatherBatcher;

impl<B: Backend> Batcher<B, WeatherSample, WeatherBatch<B>> for WeatherBatcher {
    fn batch(&self, items: Vec<WeatherSample>, device: &B::Device) -> WeatherBatch<B> {
        let batch_size = items.len();

        let flat: Vec<f32> = items
            .iter()
            .flat_map(|s| s.features.iter().copied())
            .collect();

        let labels: Vec<i64> = items
            .iter()
            .map(|s| s.label as i64)
            .collect();

        let features = Tensor::<B, 2>::from_data(
            TensorData::new(flat, [batch_size, NUM_FEATURES]),
            device,
        );
        let targets = Tensor::<B, 1, Int>::from_data(
            TensorData::new(labels, [batch_size]),
            device,
        );

        WeatherBatch { features, targets }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestBackend = burn::backend::NdArray;

    #[test]
    fn test_batch_shapes() {
        let device: <TestBackend as Backend>::Device = Default::default();
        let items = vec![
            WeatherSample { features: [1.0, 2.0, 3.0, 4.0], label: 0 },
            WeatherSample { features: [5.0, 6.0, 7.0, 8.0], label: 4 },
            WeatherSample { features: [0.0, 0.0, 0.0, 0.0], label: 2 },
        ];

        let batch: WeatherBatch<TestBackend> = WeatherBatcher.batch(items, &device);
        assert_eq!(batch.features.dims(), [3, 4]);
        assert_eq!(batch.targets.dims(),  [3]);
    }

    #[test]
    fn test_batch_preserves_values() {
        let device: <TestBackend as Backend>::Device = Default::default();
        let items = vec![WeatherSample { features: [1.5, 2.5, 0.0, 3.5], label: 3 }];

        let batch: WeatherBatch<TestBackend> = WeatherBatcher.batch(items, &device);
        let values = batch.features.into_data().to_vec::<f32>().unwrap();
        assert_eq!(values, vec![1.5, 2.5, 0.0, 3.5]);

        let target = batch.targets.into_scalar().elem::<i64>();
        assert_eq!(target, 3);
    }
}
