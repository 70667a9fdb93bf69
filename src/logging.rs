use std::fs;

use tracing::Subscriber;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{filter::Directive, fmt, prelude::*, EnvFilter};

use crate::config::LoggingConfig;
use crate::error::{EtlError, Result};

/// Initializes console logging plus optional daily-rolling file output.
///
/// Keep the returned guard alive until exit so buffered file logs are flushed.
/// Returns `Ok(None)` without file output or when a global subscriber is
/// already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let (subscriber, guard) = build_subscriber(config)?;
    let installed = subscriber.try_init().is_ok();
    Ok(if installed { guard } else { None })
}

/// Build the subscriber `init_logging` installs, without installing it.
pub fn build_subscriber(
    config: &LoggingConfig,
) -> Result<(impl Subscriber + Send + Sync + 'static, Option<WorkerGuard>)> {
    let directive: Directive = config
        .directive
        .parse()
        .map_err(|e| EtlError::Config(format!("Invalid log directive '{}': {}", config.directive, e)))?;
    let filter = EnvFilter::from_default_env().add_directive(directive);

    let (file_layer, guard) = match &config.log_dir {
        Some(log_dir) => {
            fs::create_dir_all(log_dir)?;
            let file_appender = tracing_appender::rolling::daily(log_dir, "neo_etl.log");
            let (non_blocking_writer, guard) = tracing_appender::non_blocking(file_appender);

            let layer = if config.json_file {
                fmt::layer().json().with_writer(non_blocking_writer).boxed()
            } else {
                fmt::layer()
                    .with_ansi(false)
                    .with_writer(non_blocking_writer)
                    .boxed()
            };
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(fmt::layer().with_writer(std::io::stderr));

    Ok((subscriber, guard))
}
