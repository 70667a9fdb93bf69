//! Load near-Earth object (NEO) and close approach data from CSV/JSON and
//! write joined results back out as CSV or JSON.

pub mod config;
pub mod constants;
pub mod error;
pub mod extract;
pub mod link;
pub mod logging;
pub mod models;
pub mod time;
pub mod write;

pub use config::{Config, FallbackMode, LoggingConfig, WriterConfig};
pub use error::{EtlError, Result};
pub use extract::{load_approaches, load_neos, zip_fields};
pub use link::{link_approaches, share_neos, LinkSummary};
pub use models::{CloseApproach, FieldMap, NearEarthObject};
pub use write::{write_results, write_to_csv, write_to_json, OutputFormat, ResultWriter};
