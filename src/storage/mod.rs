// src/storage/mod.rs
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::charts::monthly::MonthlyWinner;
use crate::utils::error::StorageError;
use crate::wiki::models::{ChartConfig, YearRange};

/// One line of an output CSV.
#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    #[serde(rename = "Year")]
    year: i32,
    #[serde(rename = "Month")]
    month: &'static str,
    #[serde(rename = "Song")]
    song: &'a str,
    #[serde(rename = "Artist")]
    artist: &'a str,
}

pub struct StorageManager {
    base_dir: PathBuf,
}

impl StorageManager {
    /// Creates a new StorageManager with the specified base directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self, StorageError> {
        let base_path = base_dir.as_ref().to_path_buf();

        // Create the base directory if it doesn't exist
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(StorageError::IoError)?;
        }

        Ok(Self { base_dir: base_path })
    }

    /// Where raw pages are saved in debug mode.
    pub fn debug_dir(&self) -> PathBuf {
        self.base_dir.join("debug")
    }

    /// Writes a chart's monthly winners as `Year,Month,Song,Artist`.
    pub fn save_chart(
        &self,
        chart: &ChartConfig,
        range: YearRange,
        rows: &[MonthlyWinner],
    ) -> Result<PathBuf, StorageError> {
        let file_path = self.base_dir.join(chart.outfile(range));

        let mut writer = csv::Writer::from_path(&file_path)?;
        for row in rows {
            writer.serialize(CsvRow {
                year: row.year,
                month: row.month_name(),
                song: &row.song,
                artist: &row.artist,
            })?;
        }
        writer.flush().map_err(StorageError::IoError)?;

        tracing::info!("Saved {} rows for {} to {}", rows.len(), chart.key, file_path.display());

        Ok(file_path)
    }

    /// Saves the chart-to-path mapping of a run as pretty JSON and returns the text.
    pub fn save_summary(&self, results: &serde_json::Map<String, serde_json::Value>) -> Result<String, StorageError> {
        let summary = serde_json::to_string_pretty(results)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;

        let file_path = self.base_dir.join("summary.json");
        fs::write(&file_path, &summary).map_err(StorageError::IoError)?;
        tracing::debug!("Saved run summary to {}", file_path.display());

        Ok(summary)
    }
}
