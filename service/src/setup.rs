use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use todo_database::{Database, SqliteTaskRepository, SqliteUserRepository};
use tracing::info;

use crate::config::Config;
use crate::telemetry::log_startup_info;

/// Everything a front end needs: the database and both repositories on its pool
#[derive(Debug, Clone)]
pub struct App {
    pub database: Database,
    pub users: Arc<SqliteUserRepository>,
    pub tasks: Arc<SqliteTaskRepository>,
}

impl App {
    pub async fn shutdown(&self) {
        info!("Closing database connections");
        self.database.close().await;
    }
}

/// Open the configured database, creating its directory when needed
pub async fn create_database(config: &Config) -> Result<Database> {
    let database_url = config.database_url();
    info!("Using database URL: {}", database_url);

    ensure_database_directory(&database_url)?;

    let database = Database::connect_with(&config.database_options())
        .await
        .with_context(|| format!("Failed to connect to database at {database_url}"))?;

    if let Some(path) = database_file(&database_url) {
        if path.exists() {
            set_secure_file_permissions(path)?;
        }
    }

    Ok(database)
}

/// Initialize the complete application
pub async fn initialize_app(config: &Config) -> Result<App> {
    info!("Initializing application");

    config.validate().context("Invalid configuration")?;
    log_startup_info(config);

    let database = create_database(config)
        .await
        .context("Failed to create database")?;

    info!("Creating tables");
    database
        .ensure_schema()
        .await
        .context("Failed to create database schema")?;

    database
        .health_check()
        .await
        .context("Database health check failed")?;

    let app = App {
        users: Arc::new(database.users()),
        tasks: Arc::new(database.tasks()),
        database,
    };

    info!("Application initialized successfully");
    Ok(app)
}

/// File path behind a database URL, `None` for in-memory databases
fn database_file(database_url: &str) -> Option<&Path> {
    if database_url == ":memory:" || database_url == "sqlite::memory:" {
        return None;
    }
    let path = database_url
        .strip_prefix("sqlite://")
        .unwrap_or(database_url);
    (!path.is_empty()).then(|| Path::new(path))
}

/// Ensure the database directory exists, owner-only on Unix
pub fn ensure_database_directory(database_url: &str) -> Result<()> {
    let Some(parent) = database_file(database_url).and_then(Path::parent) else {
        return Ok(());
    };

    if parent.as_os_str().is_empty() || parent.exists() {
        return Ok(());
    }

    info!("Creating database directory: {}", parent.display());
    std::fs::create_dir_all(parent)
        .with_context(|| format!("Failed to create database directory {}", parent.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let permissions = std::fs::Permissions::from_mode(0o700);
        std::fs::set_permissions(parent, permissions)
            .context("Failed to set directory permissions")?;
    }

    Ok(())
}

/// Set owner-only file permissions on Unix
fn set_secure_file_permissions(file_path: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let permissions = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(file_path, permissions)
            .with_context(|| format!("Failed to set permissions for {}", file_path.display()))?;
    }

    #[cfg(not(unix))]
    let _ = file_path;

    Ok(())
}
