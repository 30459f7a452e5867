use anyhow::{Context, Result};
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry,
};

use crate::config::{Config, LogFormat, LoggingConfig};

/// Initialize the tracing subscriber
///
/// `RUST_LOG` takes precedence over the configured level. Fails when a
/// global subscriber is already installed.
pub fn init_telemetry(config: &LoggingConfig) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .context("Invalid log level configuration")?;

    let registry = Registry::default().with(env_filter);

    match config.format {
        LogFormat::Pretty => {
            let fmt_layer = fmt::layer()
                .pretty()
                .with_target(true)
                .with_thread_ids(true)
                .with_thread_names(true)
                .with_file(true)
                .with_line_number(true);

            registry
                .with(fmt_layer)
                .try_init()
                .context("Failed to install tracing subscriber")?;
        }
        LogFormat::Json => {
            let fmt_layer = fmt::layer()
                .json()
                .with_target(true)
                .with_thread_ids(true)
                .with_thread_names(true)
                .with_file(true)
                .with_line_number(true)
                .with_span_list(true)
                .flatten_event(true);

            registry
                .with(fmt_layer)
                .try_init()
                .context("Failed to install tracing subscriber")?;
        }
        LogFormat::Compact => {
            let fmt_layer = fmt::layer()
                .compact()
                .with_target(true)
                .with_thread_ids(false)
                .with_thread_names(false)
                .with_file(false)
                .with_line_number(false);

            registry
                .with(fmt_layer)
                .try_init()
                .context("Failed to install tracing subscriber")?;
        }
    }

    tracing::info!(
        log_level = %config.level,
        log_format = ?config.format,
        "Telemetry initialized"
    );

    Ok(())
}

/// Log the settings the application is about to start with
pub fn log_startup_info(config: &Config) {
    tracing::info!(
        database_url = %config.database_url(),
        max_connections = config.database.max_connections,
        users_table = %config.database.tables.users,
        tasks_table = %config.database.tables.tasks,
        "Task tracker starting up"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_telemetry_only_once() {
        let config = LoggingConfig {
            level: "warn".to_string(),
            format: LogFormat::Compact,
        };

        assert!(init_telemetry(&config).is_ok());
        // A second global subscriber is refused instead of panicking
        assert!(init_telemetry(&config).is_err());
    }
}
