// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything between the CSV file on disk and tensor batches:
//
//   seattle-weather.csv
//       │
//       ▼
//   CsvWeatherLoader  → WeatherRecords (bad rows kept, -1 / NaN)
//       │
//       ▼
//   quality::screen   → usable rows + DataQualityReport (warns)
//       │
//       ▼
//   splitter          → train rows / validation rows
//       │
//       ▼
//   WeatherDataset    → implements Burn's Dataset trait
//       │
//       ▼
//   WeatherBatcher    → stacks samples into [N, 4] / [N] tensors
//       │
//       ▼
//   DataLoader        → shuffled mini-batches for the trainer
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

/// Reads the weather CSV with the csv crate
pub mod loader;

/// Splits off rows with unknown labels or non-numeric features
pub mod quality;

/// Implements Burn's Dataset trait for weather samples
pub mod dataset;

/// Implements Burn's Batcher trait to create tensor batches
pub mod batcher;

/// Splits data into train/validation sets
pub mod splitter;
