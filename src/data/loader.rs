// ============================================================
// Layer 4 — Weather CSV Loader
// ============================================================
// Loads daily weather rows from a CSV file using the csv crate.
//
// Expected column order (header row is discarded):
//
//   date, precipitation, temp_max, temp_min, wind, weather
//
// Each row becomes a WeatherRecord with features reordered to
// the model's input order [temp_min, temp_max, precipitation,
// wind] and the weather string encoded to a class label.
//
// No schema validation happens here:
//   - a field that isn't a number becomes NaN
//   - an unknown weather string becomes label -1
//   - a short row is read as if the missing fields were empty
// Such rows are kept; data::quality decides what to do with them.
//
// Reference: csv crate documentation
//            Rust Book §9 (Error Handling)

use anyhow::{Context, Result};
use std::{fs::File, io::Read, path::PathBuf};

use crate::domain::record::{Features, WeatherRecord};
use crate::domain::traits::RecordSource;
use crate::domain::weather::encode_label;

// Column positions in the source file
const COL_PRECIPITATION: usize = 1;
const COL_TEMP_MAX:      usize = 2;
const COL_TEMP_MIN:      usize = 3;
const COL_WIND:          usize = 4;
const COL_WEATHER:       usize = 5;

/// Loads the weather dataset from a CSV file on disk.
/// The file is read again on every call to `load_all`.
pub struct CsvWeatherLoader {
    path: PathBuf,
}

impl CsvWeatherLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RecordSource for CsvWeatherLoader {
    fn load_all(&self) -> Result<Vec<WeatherRecord>> {
        let file = File::open(&self.path)
            .with_context(|| format!("Cannot open weather dataset '{}'", self.path.display()))?;

        let records = parse_records(file)
            .with_context(|| format!("Cannot parse weather dataset '{}'", self.path.display()))?;

        tracing::info!(
            "Loaded {} weather rows from '{}'",
            records.len(),
            self.path.display()
        );
        Ok(records)
    }
}

/// Parse CSV text (header + data rows) into weather records.
pub fn parse_records<R: Read>(reader: R) -> Result<Vec<WeatherRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        // Rows with missing trailing columns are read, not rejected
        .flexible(true)
        .from_reader(reader);

    let mut records = Vec::new();

    for (row, result) in rdr.records().enumerate() {
        let raw = result.with_context(|| format!("Malformed CSV at data row {}", row + 1))?;

        let field = |idx: usize| raw.get(idx).unwrap_or("");

        let features = Features::new(
            parse_float(field(COL_TEMP_MIN)),
            parse_float(field(COL_TEMP_MAX)),
            parse_float(field(COL_PRECIPITATION)),
            parse_float(field(COL_WIND)),
        );
        let label = encode_label(field(COL_WEATHER).trim());

        records.push(WeatherRecord::new(features, label));
    }

    Ok(records)
}

/// Lenient float parsing — anything unparseable becomes NaN.
fn parse_float(s: &str) -> f32 {
    s.trim().parse::<f32>().unwrap_or(f32::NAN)
}
