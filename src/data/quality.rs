// ============================================================
// Layer 4 — Data-Quality Screening
// ============================================================
// The loader keeps every row, including ones the model cannot
// learn from:
//
//   - label -1   (weather string outside the five categories)
//   - NaN inputs (a numeric field failed to parse)
//
// A -1 target is not a valid index into the 5-way output and a
// NaN input poisons every gradient it touches, so these rows are
// split off here and reported with a warning. Nothing is dropped
// silently: the counts end up in the training summary and in
// the GET /model status.

use serde::{Deserialize, Serialize};

use crate::domain::record::WeatherRecord;

/// How many offending row numbers to quote in a warning.
const MAX_ROWS_IN_WARNING: usize = 10;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataQualityReport {
    pub total_rows:         usize,
    pub usable_rows:        usize,
    pub unknown_label_rows: usize,
    pub non_numeric_rows:   usize,
}

impl DataQualityReport {
    pub fn excluded_rows(&self) -> usize {
        self.total_rows - self.usable_rows
    }

    pub fn is_clean(&self) -> bool {
        self.excluded_rows() == 0
    }
}

/// Split records into trainable rows and a quality report.
/// Row numbers in warnings are 1-based data rows (header excluded).
pub fn screen(records: Vec<WeatherRecord>) -> (Vec<WeatherRecord>, DataQualityReport) {
    let mut report = DataQualityReport {
        total_rows: records.len(),
        ..Default::default()
    };
    let mut unknown_rows  = Vec::new();
    let mut garbled_rows  = Vec::new();
    let mut usable        = Vec::with_capacity(records.len());

    for (i, record) in records.into_iter().enumerate() {
        let row = i + 1;
        let unknown = record.category().is_none();
        let garbled = !record.features.is_numeric();

        // A row can be both; it counts toward each problem it has
        if unknown {
            report.unknown_label_rows += 1;
            unknown_rows.push(row);
        }
        if garbled {
            report.non_numeric_rows += 1;
            garbled_rows.push(row);
        }
        if record.is_trainable() {
            usable.push(record);
        }
    }
    report.usable_rows = usable.len();

    if !unknown_rows.is_empty() {
        tracing::warn!(
            "{} rows have an unrecognised weather label (encoded -1) and are excluded from training; first rows: {:?}",
            unknown_rows.len(),
            &unknown_rows[..unknown_rows.len().min(MAX_ROWS_IN_WARNING)],
        );
    }
    if !garbled_rows.is_empty() {
        tracing::warn!(
            "{} rows have non-numeric features and are excluded from training; first rows: {:?}",
            garbled_rows.len(),
            &garbled_rows[..garbled_rows.len().min(MAX_ROWS_IN_WARNING)],
        );
    }

    if !report.is_clean() {
        tracing::info!(
            "Screening kept {} of {} rows ({} excluded)",
            report.usable_rows,
            report.total_rows,
            report.excluded_rows(),
        );
    }
    (usable, report)
}
