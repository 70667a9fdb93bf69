//! Extract NEO records from CSV and close approach records from CAD JSON.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Instant;

use metrics::{counter, histogram};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::constants::{METRIC_LOAD_DURATION, METRIC_RECORDS_LOADED};
use crate::error::{EtlError, Result};
use crate::models::{CloseApproach, FieldMap, NearEarthObject};

/// The close approach document: field names plus positionally aligned rows.
#[derive(Debug, Deserialize)]
pub struct CadDocument {
    pub fields: Vec<String>,
    pub data: Vec<Vec<Value>>,
}

/// Read near-Earth objects from a CSV file with a header row.
///
/// Records are returned in file order, one per data row.
pub fn load_neos(path: impl AsRef<Path>) -> Result<Vec<NearEarthObject>> {
    read_neo_csv(path.as_ref())
}

/// Read close approaches from a CAD JSON document.
///
/// Records are returned in `data` order. A row whose length differs from
/// `fields` is rejected with [`EtlError::FieldCountMismatch`].
pub fn load_approaches(path: impl AsRef<Path>) -> Result<Vec<CloseApproach>> {
    read_cad_json(path.as_ref())
}

#[instrument(level = "debug", skip_all, fields(path = %path.display()))]
fn read_neo_csv(path: &Path) -> Result<Vec<NearEarthObject>> {
    let started = Instant::now();
    let file = File::open(path)?;
    let mut reader = csv::Reader::from_reader(file);
    let headers = reader.headers()?.clone();
    debug!("NEO CSV columns: {:?}", headers);

    let mut neos = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let record = result?;
        let mut fields = FieldMap::new(idx + 1);
        for (name, value) in headers.iter().zip(record.iter()) {
            fields.insert(name, value);
        }
        neos.push(NearEarthObject::from_fields(&fields)?);
    }

    record_load_metrics("neo", neos.len(), started);
    info!("Loaded {} near-Earth objects from {}", neos.len(), path.display());
    Ok(neos)
}

#[instrument(level = "debug", skip_all, fields(path = %path.display()))]
fn read_cad_json(path: &Path) -> Result<Vec<CloseApproach>> {
    let started = Instant::now();
    let file = File::open(path)?;
    let document: CadDocument = serde_json::from_reader(BufReader::new(file))?;
    debug!(
        "CAD document declares {} fields and {} rows",
        document.fields.len(),
        document.data.len()
    );

    let approaches = approaches_from_document(&document)?;

    record_load_metrics("close_approach", approaches.len(), started);
    info!("Loaded {} close approaches from {}", approaches.len(), path.display());
    Ok(approaches)
}

/// Build close approaches from an already parsed document.
pub fn approaches_from_document(document: &CadDocument) -> Result<Vec<CloseApproach>> {
    document
        .data
        .iter()
        .enumerate()
        .map(|(idx, row)| {
            let fields = zip_fields(&document.fields, row, idx + 1)?;
            CloseApproach::from_fields(&fields)
        })
        .collect()
}

/// Pair field names with one data row. `row` is 1-based.
pub fn zip_fields(fields: &[String], values: &[Value], row: usize) -> Result<FieldMap> {
    if fields.len() != values.len() {
        return Err(EtlError::FieldCountMismatch {
            row,
            fields: fields.len(),
            values: values.len(),
        });
    }

    let mut map = FieldMap::new(row);
    for (name, value) in fields.iter().zip(values) {
        map.insert(name.as_str(), value_to_raw(value));
    }
    Ok(map)
}

fn value_to_raw(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn record_load_metrics(kind: &'static str, count: usize, started: Instant) {
    counter!(METRIC_RECORDS_LOADED, "kind" => kind).increment(count as u64);
    histogram!(METRIC_LOAD_DURATION, "kind" => kind).record(started.elapsed().as_secs_f64());
}
