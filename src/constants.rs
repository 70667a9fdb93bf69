/// Column names accepted for each NearEarthObject field in the NEO CSV.
/// Columns not listed here are ignored.
pub const NEO_DESIGNATION_COLUMNS: &[&str] = &["designation", "pdes"];
pub const NEO_NAME_COLUMNS: &[&str] = &["name"];
pub const NEO_DIAMETER_COLUMNS: &[&str] = &["diameter", "diameter_km"];
pub const NEO_HAZARDOUS_COLUMNS: &[&str] = &["hazardous", "pha", "potentially_hazardous"];

/// Field names accepted for each CloseApproach field in the CAD JSON `fields` array.
pub const CA_DESIGNATION_FIELDS: &[&str] = &["des", "designation"];
pub const CA_TIME_FIELDS: &[&str] = &["cd", "time"];
pub const CA_DISTANCE_FIELDS: &[&str] = &["dist", "distance"];
pub const CA_VELOCITY_FIELDS: &[&str] = &["v_rel", "velocity"];

/// Header row of written CSV results, in column order.
pub const CSV_OUTPUT_FIELDS: [&str; 7] = [
    "datetime_utc",
    "distance_au",
    "velocity_km_s",
    "designation",
    "name",
    "diameter_km",
    "potentially_hazardous",
];

// Metric names
pub const METRIC_RECORDS_LOADED: &str = "neo_etl_records_loaded_total";
pub const METRIC_LOAD_DURATION: &str = "neo_etl_load_duration_seconds";
pub const METRIC_ROWS_WRITTEN: &str = "neo_etl_rows_written_total";
pub const METRIC_UNLINKED: &str = "neo_etl_unlinked_approaches_total";

/// Config file looked up in the working directory by `Config::load`.
pub const DEFAULT_CONFIG_FILE: &str = "neo_etl.toml";
/// Environment variable overriding the config file path.
pub const CONFIG_PATH_ENV: &str = "NEO_ETL_CONFIG";
