// ============================================================
// Layer 3 — Weather Record Domain Types
// ============================================================
// A WeatherRecord is one day of observations from the dataset.
// The model only ever sees the four numeric features, always
// in this order:
//
//   [temp_min, temp_max, precipitation, wind]
//
// Malformed numbers are kept as NaN and unknown weather strings
// as the -1 label, so a record can describe "bad" rows too.
// Deciding what to do with them is the data layer's job.
//
// Reference: Rust Book §5 (Structs)

use serde::{Deserialize, Serialize};

use crate::domain::weather::{decode_label, WeatherCategory};

/// Number of input features fed to the classifier.
pub const NUM_FEATURES: usize = 4;

/// The four numeric inputs of one prediction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Features {
    pub temp_min:      f32,
    pub temp_max:      f32,
    pub precipitation: f32,
    pub wind:          f32,
}

impl Features {
    pub fn new(temp_min: f32, temp_max: f32, precipitation: f32, wind: f32) -> Self {
        Self { temp_min, temp_max, precipitation, wind }
    }

    /// Feature vector in model input order.
    pub fn to_array(&self) -> [f32; NUM_FEATURES] {
        [self.temp_min, self.temp_max, self.precipitation, self.wind]
    }

    /// True when every feature parsed to a real number.
    pub fn is_numeric(&self) -> bool {
        self.to_array().iter().all(|v| v.is_finite())
    }
}

/// One row of the weather dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecord {
    pub features: Features,
    /// Encoded class label, or -1 for an unrecognised weather string
    pub label:    i64,
}

impl WeatherRecord {
    pub fn new(features: Features, label: i64) -> Self {
        Self { features, label }
    }

    pub fn category(&self) -> Option<WeatherCategory> {
        decode_label(self.label)
    }

    /// A record can be used as a training example only if both
    /// its label and all of its features are valid.
    pub fn is_trainable(&self) -> bool {
        self.category().is_some() && self.features.is_numeric()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::weather::UNKNOWN_LABEL;

    #[test]
    fn test_feature_order() {
        let f = Features::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(f.to_array(), [1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_nan_feature_is_not_numeric() {
        let f = Features::new(1.0, f32::NAN, 0.0, 2.5);
        assert!(!f.is_numeric());
    }

    #[test]
    fn test_trainable_requires_label_and_numbers() {
        let good = WeatherRecord::new(Features::new(5.0, 12.0, 0.0, 3.1), 4);
        let unknown = WeatherRecord::new(Features::new(5.0, 12.0, 0.0, 3.1), UNKNOWN_LABEL);
        let garbled = WeatherRecord::new(Features::new(f32::NAN, 12.0, 0.0, 3.1), 2);

        assert!(good.is_trainable());
        assert!(!unknown.is_trainable());
        assert!(!garbled.is_trainable());
    }
}
