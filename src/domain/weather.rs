// ============================================================
// Layer 3 — Weather Categories and Label Encoding
// ============================================================
// The classifier predicts one of five fixed weather categories.
// Each category has a stable integer class index that matches
// the position of its logit in the 5-way output layer:
//
//   drizzle → 0
//   fog     → 1
//   rain    → 2
//   snow    → 3
//   sun     → 4
//
// Anything else in the dataset encodes to the sentinel -1.
// The sentinel is NOT a WeatherCategory, so it can never reach
// the scene mapping or the output layer by accident.
//
// Reference: Rust Book §6 (Enums and Pattern Matching)

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Label value used for weather strings outside the five categories.
pub const UNKNOWN_LABEL: i64 = -1;

/// Number of classes — must equal the width of the output layer.
pub const NUM_CLASSES: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeatherCategory {
    Drizzle,
    Fog,
    Rain,
    Snow,
    Sun,
}

impl WeatherCategory {
    /// All categories in class-index order.
    pub const ALL: [WeatherCategory; NUM_CLASSES] = [
        WeatherCategory::Drizzle,
        WeatherCategory::Fog,
        WeatherCategory::Rain,
        WeatherCategory::Snow,
        WeatherCategory::Sun,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            WeatherCategory::Drizzle => "drizzle",
            WeatherCategory::Fog     => "fog",
            WeatherCategory::Rain    => "rain",
            WeatherCategory::Snow    => "snow",
            WeatherCategory::Sun     => "sun",
        }
    }

    /// Class index of this category in the output layer.
    pub fn class_index(self) -> usize {
        match self {
            WeatherCategory::Drizzle => 0,
            WeatherCategory::Fog     => 1,
            WeatherCategory::Rain    => 2,
            WeatherCategory::Snow    => 3,
            WeatherCategory::Sun     => 4,
        }
    }

    /// Inverse of `class_index`. Out-of-range indices have no category.
    pub fn from_class_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

impl fmt::Display for WeatherCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WeatherCategory {
    type Err = anyhow::Error;

    /// Exact, case-sensitive match — the dataset uses lowercase names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "drizzle" => Ok(WeatherCategory::Drizzle),
            "fog"     => Ok(WeatherCategory::Fog),
            "rain"    => Ok(WeatherCategory::Rain),
            "snow"    => Ok(WeatherCategory::Snow),
            "sun"     => Ok(WeatherCategory::Sun),
            other     => Err(anyhow::anyhow!("unknown weather category '{other}'")),
        }
    }
}

// ─── Label Encoding ───────────────────────────────────────────────────────────

/// Encode a raw weather string from the dataset into a class label.
/// Unrecognised strings yield `UNKNOWN_LABEL` instead of an error so
/// the loader can keep the row and report it later.
pub fn encode_label(weather: &str) -> i64 {
    weather
        .parse::<WeatherCategory>()
        .map(|c| c.class_index() as i64)
        .unwrap_or(UNKNOWN_LABEL)
}

/// Decode a class label back into a category.
/// Returns `None` for the sentinel and any other out-of-range label.
pub fn decode_label(label: i64) -> Option<WeatherCategory> {
    usize::try_from(label).ok().and_then(WeatherCategory::from_class_index)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_encoding() {
        assert_eq!(encode_label("drizzle"), 0);
        assert_eq!(encode_label("fog"),     1);
        assert_eq!(encode_label("rain"),    2);
        assert_eq!(encode_label("snow"),    3);
        assert_eq!(encode_label("sun"),     4);
    }

    #[test]
    fn test_round_trip_over_all_classes() {
        for i in 0..NUM_CLASSES as i64 {
            let category = decode_label(i).expect("valid class");
            assert_eq!(encode_label(category.as_str()), i);
        }
    }

    #[test]
    fn test_unknown_strings_encode_to_sentinel() {
        assert_eq!(encode_label("hail"), UNKNOWN_LABEL);
        assert_eq!(encode_label(""),     UNKNOWN_LABEL);
        // Matching is case-sensitive like the dataset
        assert_eq!(encode_label("Rain"), UNKNOWN_LABEL);
    }

    #[test]
    fn test_sentinel_does_not_decode() {
        assert_eq!(decode_label(UNKNOWN_LABEL), None);
        assert_eq!(decode_label(NUM_CLASSES as i64), None);
    }

    #[test]
    fn test_serde_uses_lowercase_names() {
        let json = serde_json::to_string(&WeatherCategory::Snow).unwrap();
        assert_eq!(json, "\"snow\"");
    }
}
