//! Todo Core Library
//!
//! This crate provides the domain models, error type and repository trait
//! interfaces for the personal task tracker. The storage crates implement the
//! traits defined here.
//!
//! # Architecture
//!
//! - [`clock`] - Where "today" comes from
//! - [`models`] - Users, tasks and their closed value sets
//! - [`error`] - Error type and result alias
//! - [`repository`] - Repository traits for users and tasks
//! - [`validation`] - Input checks run before touching the store
//!
//! # Example
//!
//! ```rust
//! use todo_core::{
//!     models::{Importance, NewTask},
//!     validation::Validator,
//! };
//!
//! let new_task = NewTask::new(1, "Buy milk", Importance::Low);
//! Validator::validate_new_task(&new_task).unwrap();
//! ```

pub mod clock;
pub mod error;
pub mod models;
pub mod repository;
pub mod validation;

pub use clock::{Clock, FixedClock, LocalClock};
pub use error::{Result, TodoError};
pub use models::{DateField, EditTask, Importance, NewTask, NewUser, Task, TaskStatus, User};
pub use repository::{TaskRepository, UserRepository};
pub use validation::Validator;

/// Current version of the core crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Current crate name
pub const CRATE_NAME: &str = env!("CARGO_PKG_NAME");
