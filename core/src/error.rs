use thiserror::Error;

/// Result type alias for repository operations
pub type Result<T> = std::result::Result<T, TodoError>;

/// Error types for the task tracker's data-access layer.
///
/// Expected outcomes are not errors: a duplicate username comes back as zero
/// rows affected, a missing row as `None`, and an edit of a finished task as
/// zero rows affected. What remains here is bad input and store failures.
///
/// # Examples
///
/// ```rust
/// use todo_core::error::TodoError;
///
/// let error = TodoError::empty_field("description");
/// assert!(error.is_validation());
/// assert_eq!(error.to_string(), "Validation error: Field 'description' cannot be empty");
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TodoError {
    /// Validation error with details
    #[error("Validation error: {0}")]
    Validation(String),

    /// Task refers to a user that does not exist
    #[error("Owner not found: user {0} does not exist")]
    OwnerNotFound(i64),

    /// A column held text that does not decode into the domain type
    #[error("Invalid stored {field}: '{value}'")]
    InvalidStoredValue { field: &'static str, value: String },

    /// Database operation error
    #[error("Database error: {0}")]
    Database(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl TodoError {
    /// Create a validation error for an empty field
    pub fn empty_field(field: &str) -> Self {
        Self::Validation(format!("Field '{field}' cannot be empty"))
    }

    pub fn invalid_stored_value(field: &'static str, value: &str) -> Self {
        Self::InvalidStoredValue {
            field,
            value: value.to_string(),
        }
    }

    /// Check if this error indicates a validation problem
    pub fn is_validation(&self) -> bool {
        matches!(self, TodoError::Validation(_))
    }

    /// Check if this error indicates a database problem
    pub fn is_database(&self) -> bool {
        matches!(
            self,
            TodoError::Database(_) | TodoError::InvalidStoredValue { .. }
        )
    }
}
