use crate::{
    common::sqlx_error_to_todo_error, task_repository::SqliteTaskRepository,
    user_repository::SqliteUserRepository,
};
use serde::{Deserialize, Serialize};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
    SqlitePool,
};
use std::{str::FromStr, sync::Arc, time::Duration};
use todo_core::{
    clock::{Clock, LocalClock},
    error::{Result, TodoError},
    repository::{TaskRepository, UserRepository},
    validation::Validator,
};

/// Names of the two tables
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableNames {
    pub users: String,
    pub tasks: String,
}

impl Default for TableNames {
    fn default() -> Self {
        Self {
            users: "users".to_string(),
            tasks: "tasks".to_string(),
        }
    }
}

impl TableNames {
    /// Both names must be plain identifiers; they end up in SQL text.
    pub fn validate(&self) -> Result<()> {
        Validator::validate_table_name(&self.users)?;
        Validator::validate_table_name(&self.tasks)?;
        if self.users == self.tasks {
            return Err(TodoError::Configuration(
                "users and tasks tables must have different names".to_string(),
            ));
        }
        Ok(())
    }
}

/// Connection settings for [`Database::connect_with`]
#[derive(Debug, Clone)]
pub struct DatabaseOptions {
    /// `:memory:`, `sqlite://path` or a bare file path
    pub url: String,
    pub max_connections: u32,
    pub connection_timeout: Duration,
    pub tables: TableNames,
}

impl DatabaseOptions {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 5,
            connection_timeout: Duration::from_secs(5),
            tables: TableNames::default(),
        }
    }

    pub fn with_tables(mut self, tables: TableNames) -> Self {
        self.tables = tables;
        self
    }
}

/// Shared SQLite pool handing out both repositories
///
/// # Examples
/// ```rust,no_run
/// use todo_database::Database;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// // In-memory database for testing
/// let db = Database::connect(":memory:").await?;
/// db.ensure_schema().await?;
///
/// // File-based database
/// let db = Database::connect("sqlite:///tmp/tasks.db").await?;
/// let tasks = db.tasks();
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
    tables: TableNames,
    clock: Arc<dyn Clock>,
}

impl Database {
    /// Connect with default pool settings and table names
    pub async fn connect(database_url: &str) -> Result<Self> {
        Self::connect_with(&DatabaseOptions::new(database_url)).await
    }

    /// Connect to the database described by `options`
    ///
    /// File databases are created when missing and opened in WAL mode. An
    /// in-memory database lives on a single pooled connection that is never
    /// recycled, so every `connect` gets its own empty store.
    pub async fn connect_with(options: &DatabaseOptions) -> Result<Self> {
        options.tables.validate()?;

        let url = options.url.trim();
        let in_memory = url == ":memory:" || url == "sqlite::memory:";

        let (connect_options, pool_options) = if in_memory {
            let connect_options = SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(sqlx_error_to_todo_error)?
                .foreign_keys(true);
            let pool_options = SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
            (connect_options, pool_options)
        } else {
            let path = url.strip_prefix("sqlite://").unwrap_or(url);
            if path.is_empty() {
                return Err(TodoError::Configuration(
                    "Database URL does not name a file".to_string(),
                ));
            }
            let connect_options = SqliteConnectOptions::new()
                .filename(path)
                .create_if_missing(true)
                .journal_mode(SqliteJournalMode::Wal)
                .busy_timeout(options.connection_timeout)
                .foreign_keys(true);
            let pool_options = SqlitePoolOptions::new()
                .max_connections(options.max_connections.max(1))
                .acquire_timeout(options.connection_timeout);
            (connect_options, pool_options)
        };

        let pool = pool_options
            .connect_with(connect_options)
            .await
            .map_err(sqlx_error_to_todo_error)?;

        tracing::info!(url = %url, in_memory, "Connected to SQLite database");

        Ok(Self {
            pool,
            tables: options.tables.clone(),
            clock: Arc::new(LocalClock),
        })
    }

    /// Use `clock` for the dates stamped by the task repository
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn users(&self) -> SqliteUserRepository {
        SqliteUserRepository::new(self.pool.clone(), &self.tables.users)
    }

    pub fn tasks(&self) -> SqliteTaskRepository {
        SqliteTaskRepository::new(self.pool.clone(), &self.tables.tasks, &self.tables.users)
            .with_clock(self.clock.clone())
    }

    /// Create both tables, users first because tasks reference it
    pub async fn ensure_schema(&self) -> Result<()> {
        self.users().ensure_schema().await?;
        self.tasks().ensure_schema().await?;
        Ok(())
    }

    pub async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map_err(sqlx_error_to_todo_error)?;
        Ok(())
    }

    pub fn tables(&self) -> &TableNames {
        &self.tables
    }

    /// Get access to the underlying database pool for custom operations
    ///
    /// This method is primarily intended for testing scenarios where
    /// direct SQL execution is needed.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_names() {
        let tables = TableNames::default();
        assert_eq!(tables.users, "users");
        assert_eq!(tables.tasks, "tasks");
        assert!(tables.validate().is_ok());
    }

    #[test]
    fn test_invalid_table_names() {
        let tables = TableNames {
            users: "users".to_string(),
            tasks: "tasks WHERE 1=1".to_string(),
        };
        assert!(matches!(tables.validate(), Err(TodoError::Configuration(_))));

        let tables = TableNames {
            users: "same".to_string(),
            tasks: "same".to_string(),
        };
        assert!(tables.validate().is_err());
    }

    #[tokio::test]
    async fn test_connect_rejects_bad_table_names() {
        let options = DatabaseOptions::new(":memory:").with_tables(TableNames {
            users: "1users".to_string(),
            tasks: "tasks".to_string(),
        });
        let err = Database::connect_with(&options).await.unwrap_err();
        assert!(matches!(err, TodoError::Configuration(_)));
    }

    #[tokio::test]
    async fn test_in_memory_databases_are_isolated() {
        let first = Database::connect(":memory:").await.unwrap();
        let second = Database::connect(":memory:").await.unwrap();
        first.ensure_schema().await.unwrap();

        let tables: Vec<(String,)> =
            sqlx::query_as("SELECT name FROM sqlite_master WHERE type = 'table' AND name = 'users'")
                .fetch_all(second.pool())
                .await
                .unwrap();
        assert!(tables.is_empty());
        assert!(first.health_check().await.is_ok());
    }
}
