use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing required field '{field}' in row {row}")]
    MissingField { field: &'static str, row: usize },

    #[error("Invalid value {value:?} for field '{field}' in row {row}: {reason}")]
    InvalidField {
        field: &'static str,
        value: String,
        reason: String,
        row: usize,
    },

    #[error("Row {row} has {values} values but {fields} field names were declared")]
    FieldCountMismatch {
        row: usize,
        fields: usize,
        values: usize,
    },

    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),
}

pub type Result<T> = std::result::Result<T, EtlError>;
