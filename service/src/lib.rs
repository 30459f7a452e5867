//! Service wiring for the personal task tracker
//!
//! Loads configuration, initializes logging and opens the SQLite database
//! with both repositories ready to use.

pub mod config;
pub mod setup;
pub mod telemetry;

pub use config::Config;
pub use setup::{create_database, ensure_database_directory, initialize_app, App};
pub use telemetry::init_telemetry;
