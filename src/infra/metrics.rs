// ============================================================
// Layer 6 — Metrics Logger
// ============================================================
// Records per-epoch training metrics, both in memory (returned
// with the trained model) and optionally as a CSV file.
//
// Metrics recorded per epoch:
//   - run:        start time of the training run (UTC, RFC 3339)
//   - epoch:      the epoch number (1, 2, 3, ...)
//   - train_loss: mean cross-entropy over the training rows
//   - train_acc:  fraction of training rows classified correctly
//   - val_loss:   mean cross-entropy over the held-out rows
//   - val_acc:    fraction of held-out rows classified correctly
//
// Validation numbers are None when the held-out set is empty.
//
// Output file: <checkpoint_dir>/metrics.csv
//
//   run,epoch,train_loss,train_acc,val_loss,val_acc
//   2024-05-01T09:12:44.000Z,1,1.523100,0.412000,1.498800,0.431000
//   2024-05-01T09:12:44.000Z,2,1.301200,0.455000,1.287700,0.449000
//   ...
//
// Every retrain appends below the earlier runs.
//
// Reference: Rust Book §12 (I/O and File Handling)

use anyhow::Result;
use chrono::{DateTime, SecondsFormat, Utc};
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::PathBuf,
};
use serde::{Deserialize, Serialize};

use crate::data::quality::DataQualityReport;

/// One row of metrics data for a single training epoch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochMetrics {
    pub epoch:      usize,
    pub train_loss: f64,
    pub train_acc:  f64,
    pub val_loss:   Option<f64>,
    pub val_acc:    Option<f64>,
}

impl EpochMetrics {
    pub fn new(
        epoch:      usize,
        train_loss: f64,
        train_acc:  f64,
        val_loss:   Option<f64>,
        val_acc:    Option<f64>,
    ) -> Self {
        Self { epoch, train_loss, train_acc, val_loss, val_acc }
    }
}

/// Everything worth knowing about one completed training run.
/// Stored in the model registry and next to checkpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingSummary {
    pub trained_at:   DateTime<Utc>,
    pub epochs:       usize,
    pub train_rows:   usize,
    pub val_rows:     usize,
    pub data_quality: DataQualityReport,
    /// Metrics of the last epoch, if any epoch ran
    pub final_metrics: Option<EpochMetrics>,
}

const HEADER: &str = "run,epoch,train_loss,train_acc,val_loss,val_acc";

/// Logs epoch metrics to a CSV file for later analysis.
pub struct MetricsLogger {
    csv_path: PathBuf,
    run:      String,
}

impl MetricsLogger {
    /// Create a logger for the run that started at `started_at`.
    /// Writes the CSV header if the file doesn't exist yet.
    pub fn new(dir: impl Into<PathBuf>, started_at: DateTime<Utc>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;

        let csv_path = dir.join("metrics.csv");

        // Header only for a new file; later runs append below it
        if !csv_path.exists() {
            let mut f = fs::File::create(&csv_path)?;
            writeln!(f, "{HEADER}")?;
            tracing::debug!("Created metrics CSV: '{}'", csv_path.display());
        }

        let run = started_at.to_rfc3339_opts(SecondsFormat::Millis, true);
        Ok(Self { csv_path, run })
    }

    /// Append one epoch's metrics as a new row in the CSV.
    pub fn log(&self, m: &EpochMetrics) -> Result<()> {
        let mut f = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)?;

        // Missing validation metrics are written as empty cells
        let cell = |v: Option<f64>| v.map(|x| format!("{x:.6}")).unwrap_or_default();
        writeln!(
            f,
            "{},{},{:.6},{:.6},{},{}",
            self.run,
            m.epoch,
            m.train_loss,
            m.train_acc,
            cell(m.val_loss),
            cell(m.val_acc),
        )?;

        tracing::debug!(
            "Logged epoch {} metrics: train_loss={:.4}, val_loss={:?}",
            m.epoch,
            m.train_loss,
            m.val_loss,
        );

        Ok(())
    }

    pub fn csv_path(&self) -> &PathBuf {
        &self.csv_path
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_runs_share_one_header_and_are_labelled() {
        let dir    = tempfile::tempdir().unwrap();
        let first  = Utc.with_ymd_and_hms(2024, 5, 1, 9, 12, 44).unwrap();
        let second = Utc.with_ymd_and_hms(2024, 5, 2, 18, 0, 3).unwrap();

        let logger = MetricsLogger::new(dir.path(), first).unwrap();
        logger.log(&EpochMetrics::new(1, 1.5, 0.3, Some(1.4), Some(0.35))).unwrap();
        logger.log(&EpochMetrics::new(2, 1.4, 0.3, Some(1.3), Some(0.4))).unwrap();

        // The retrain appends under the same header with its own run label
        let logger = MetricsLogger::new(dir.path(), second).unwrap();
        logger.log(&EpochMetrics::new(1, 1.2, 0.4, None, None)).unwrap();

        let text = fs::read_to_string(logger.csv_path()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "run,epoch,train_loss,train_acc,val_loss,val_acc");
        assert!(lines[1].starts_with("2024-05-01T09:12:44.000Z,1,1.500000,"));
        assert!(lines[2].starts_with("2024-05-01T09:12:44.000Z,2,"));
        assert_eq!(lines[3], "2024-05-02T18:00:03.000Z,1,1.200000,0.400000,,");
    }
}
