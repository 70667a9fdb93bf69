//! Write joined close approach / NEO results to CSV or JSON.
//!
//! Each result row comes from one [`CloseApproach`] and the NEO linked to it.
//! The output file is created (or truncated) before any rows are written, so
//! it exists after every successful call, even when there are no results.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use metrics::counter;
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::config::{FallbackMode, WriterConfig};
use crate::constants::{CSV_OUTPUT_FIELDS, METRIC_ROWS_WRITTEN};
use crate::error::{EtlError, Result};
use crate::models::CloseApproach;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Csv,
    Json,
}

impl OutputFormat {
    /// Pick a format from the file extension (`.csv` or `.json`, any case).
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("csv") => Ok(Self::Csv),
            Some("json") => Ok(Self::Json),
            _ => Err(EtlError::UnsupportedFormat(path.display().to_string())),
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }
}

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    datetime_utc: String,
    distance_au: f64,
    velocity_km_s: f64,
    designation: &'a str,
    name: &'a str,
    diameter_km: f64,
    potentially_hazardous: &'static str,
}

#[derive(Debug, Serialize)]
struct JsonRow<'a> {
    datetime_utc: String,
    distance_au: f64,
    velocity_km_s: f64,
    neo: JsonNeo<'a>,
}

#[derive(Debug, Serialize)]
struct JsonNeo<'a> {
    designation: &'a str,
    name: &'a str,
    /// `null` when unknown.
    diameter_km: Option<f64>,
    potentially_hazardous: bool,
}

/// NEO-derived columns after applying the fallback policy.
struct NeoColumns<'a> {
    designation: &'a str,
    name: &'a str,
    diameter: Option<f64>,
    hazardous: bool,
}

fn neo_columns(approach: &CloseApproach, mode: FallbackMode) -> NeoColumns<'_> {
    let Some(neo) = approach.neo.as_deref() else {
        return NeoColumns {
            designation: &approach.designation,
            name: "",
            diameter: None,
            hazardous: false,
        };
    };

    match mode {
        FallbackMode::Corrected => NeoColumns {
            designation: &neo.designation,
            name: neo.name.as_deref().unwrap_or(""),
            diameter: neo.diameter,
            hazardous: neo.hazardous,
        },
        FallbackMode::Legacy => NeoColumns {
            designation: &neo.designation,
            name: "",
            diameter: None,
            hazardous: neo.hazardous,
        },
    }
}

/// Writes results using a fixed [`WriterConfig`].
#[derive(Debug, Clone, Default)]
pub struct ResultWriter {
    config: WriterConfig,
}

impl ResultWriter {
    pub fn new(config: WriterConfig) -> Self {
        Self { config }
    }

    pub fn fallback(&self) -> FallbackMode {
        self.config.fallback
    }

    /// Write in the format implied by the extension of `path`.
    pub fn write<'a, I>(&self, results: I, path: impl AsRef<Path>) -> Result<()>
    where
        I: IntoIterator<Item = &'a CloseApproach>,
    {
        let path = path.as_ref();
        match OutputFormat::from_path(path)? {
            OutputFormat::Csv => self.write_csv(results, path),
            OutputFormat::Json => self.write_json(results, path),
        }
    }

    #[instrument(level = "debug", skip_all, fields(path = %path.as_ref().display()))]
    pub fn write_csv<'a, I>(&self, results: I, path: impl AsRef<Path>) -> Result<()>
    where
        I: IntoIterator<Item = &'a CloseApproach>,
    {
        let path = path.as_ref();
        let file = File::create(path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        writer.write_record(CSV_OUTPUT_FIELDS)?;

        let mut rows = 0usize;
        for approach in results {
            let neo = neo_columns(approach, self.config.fallback);
            writer.serialize(CsvRow {
                datetime_utc: approach.time_str(),
                distance_au: approach.distance,
                velocity_km_s: approach.velocity,
                designation: &approach.designation,
                name: neo.name,
                diameter_km: neo.diameter.unwrap_or(f64::NAN),
                potentially_hazardous: if neo.hazardous { "True" } else { "False" },
            })?;
            rows += 1;
        }
        writer.flush()?;

        record_rows_written(OutputFormat::Csv, rows);
        info!("Wrote {} result rows to {}", rows, path.display());
        Ok(())
    }

    #[instrument(level = "debug", skip_all, fields(path = %path.as_ref().display()))]
    pub fn write_json<'a, I>(&self, results: I, path: impl AsRef<Path>) -> Result<()>
    where
        I: IntoIterator<Item = &'a CloseApproach>,
    {
        let path = path.as_ref();
        let file = File::create(path)?;

        let rows: Vec<JsonRow<'a>> = results
            .into_iter()
            .map(|approach| {
                let neo = neo_columns(approach, self.config.fallback);
                JsonRow {
                    datetime_utc: approach.time_str(),
                    distance_au: approach.distance,
                    velocity_km_s: approach.velocity,
                    neo: JsonNeo {
                        designation: neo.designation,
                        name: neo.name,
                        diameter_km: neo.diameter,
                        potentially_hazardous: neo.hazardous,
                    },
                }
            })
            .collect();
        debug!("Serializing {} result objects", rows.len());

        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &rows)?;
        writer.flush()?;

        record_rows_written(OutputFormat::Json, rows.len());
        info!("Wrote {} result objects to {}", rows.len(), path.display());
        Ok(())
    }
}

/// Write results as CSV with the default fallback policy.
pub fn write_to_csv<'a, I>(results: I, path: impl AsRef<Path>) -> Result<()>
where
    I: IntoIterator<Item = &'a CloseApproach>,
{
    ResultWriter::default().write_csv(results, path)
}

/// Write results as a JSON array with the default fallback policy.
pub fn write_to_json<'a, I>(results: I, path: impl AsRef<Path>) -> Result<()>
where
    I: IntoIterator<Item = &'a CloseApproach>,
{
    ResultWriter::default().write_json(results, path)
}

/// Write results as CSV or JSON depending on the extension of `path`.
pub fn write_results<'a, I>(results: I, path: impl AsRef<Path>) -> Result<()>
where
    I: IntoIterator<Item = &'a CloseApproach>,
{
    ResultWriter::default().write(results, path)
}

fn record_rows_written(format: OutputFormat, rows: usize) {
    counter!(METRIC_ROWS_WRITTEN, "format" => format.label()).increment(rows as u64);
}
