//! Mock implementations and test utilities for the task tracker
//!
//! This crate provides testing infrastructure including:
//! - In-memory implementations of both repository traits
//! - Fixtures, builders and random data generators
//! - Custom assertion helpers
//! - Contract tests shared by every repository implementation

pub mod assertions;
pub mod builders;
pub mod contracts;
pub mod fixtures;
pub mod generators;
pub mod repository;

pub use assertions::*;
pub use builders::*;
pub use contracts::*;
pub use fixtures::*;
pub use generators::*;
pub use repository::{MockTaskRepository, MockUserRepository};
