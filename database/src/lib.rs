//! Database crate for the personal task tracker
//!
//! This crate provides the SQLite implementations of the `UserRepository`
//! and `TaskRepository` traits from `todo-core`. Both repositories share one
//! connection pool owned by [`Database`].
//!
//! # Features
//!
//! - Idempotent schema creation (`CREATE TABLE IF NOT EXISTS`)
//! - Configurable, validated table names
//! - Foreign keys enforced between tasks and users
//! - In-memory databases for tests
//!
//! # Usage
//!
//! ```rust
//! use todo_database::{Database, NewUser, UserRepository};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect(":memory:").await?;
//!     db.ensure_schema().await?;
//!
//!     let users = db.users();
//!     assert_eq!(users.register(NewUser::new("maria", "hash", "salt")).await?, 1);
//!
//!     Ok(())
//! }
//! ```

mod common;
mod sqlite;
mod task_repository;
mod user_repository;

pub use sqlite::{Database, DatabaseOptions, TableNames};
pub use task_repository::SqliteTaskRepository;
pub use user_repository::SqliteUserRepository;

// Re-export commonly used types from todo-core for convenience
pub use todo_core::{
    clock::{Clock, FixedClock, LocalClock},
    error::{Result, TodoError},
    models::{DateField, EditTask, Importance, NewTask, NewUser, Task, TaskStatus, User},
    repository::{TaskRepository, UserRepository},
};
