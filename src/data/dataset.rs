use anyhow::{anyhow, Result};
use burn::data::dataset::Dataset;
use serde::{Deserialize, Serialize};

use crate::domain::record::{WeatherRecord, NUM_FEATURES};

/// One screened training example: model-ordered features and a
/// class index that is guaranteed to be in 0..NUM_CLASSES.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSample {
    pub features: [f32; NUM_FEATURES],
    pub label:    usize,
}

impl TryFrom<&WeatherRecord> for WeatherSample {
    type Error = anyhow::Error;

    fn try_from(record: &WeatherRecord) -> Result<Self> {
        let category = record
            .category()
            .ok_or_else(|| anyhow!("label {} is not a weather class", record.label))?;
        if !record.features.is_numeric() {
            return Err(anyhow!("record has non-numeric features"));
        }
        Ok(Self {
            features: record.features.to_array(),
            label:    category.class_index(),
        })
    }
}

pub struct WeatherDataset {
    samples: Vec<WeatherSample>,
}

impl WeatherDataset {
    pub fn new(samples: Vec<WeatherSample>) -> Self { Self { samples } }

    /// Convert screened records; fails on the first untrainable one.
    pub fn from_records(records: &[WeatherRecord]) -> Result<Self> {
        let samples = records
            .iter()
            .map(WeatherSample::try_from)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(samples))
    }

    pub fn sample_count(&self) -> usize { self.samples.len() }
}

impl Dataset<WeatherSample> for WeatherDataset {
    fn get(&self, index: usize) -> Option<WeatherSample> {
        self.samples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}
