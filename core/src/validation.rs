use std::sync::OnceLock;

use regex::Regex;

use crate::{
    error::{Result, TodoError},
    models::{EditTask, NewTask, NewUser},
};

/// Validation utilities applied before anything reaches the store
pub struct Validator;

fn identifier_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z_][A-Za-z0-9_]{0,62}$").expect("identifier pattern is valid")
    })
}

impl Validator {
    /// Reject empty or whitespace-only values
    pub fn require_non_blank(field: &str, value: &str) -> Result<()> {
        if value.trim().is_empty() {
            return Err(TodoError::empty_field(field));
        }
        Ok(())
    }

    /// Validate a task description
    ///
    /// Task descriptions must:
    /// - Not be empty or only whitespace
    /// - Be at most 2000 characters long
    pub fn validate_description(description: &str) -> Result<()> {
        Self::require_non_blank("description", description)?;

        if description.trim().chars().count() > 2000 {
            return Err(TodoError::Validation(
                "Task description must be at most 2000 characters long".to_string(),
            ));
        }

        Ok(())
    }

    pub fn validate_new_user(user: &NewUser) -> Result<()> {
        Self::require_non_blank("username", &user.username)?;
        Self::require_non_blank("password_hash", &user.password_hash)?;
        Self::require_non_blank("salt", &user.salt)?;
        Ok(())
    }

    pub fn validate_new_task(task: &NewTask) -> Result<()> {
        Self::validate_description(&task.description)
    }

    pub fn validate_edit_task(changes: &EditTask) -> Result<()> {
        Self::validate_description(&changes.description)
    }

    /// Validate a table name before it is spliced into SQL text
    ///
    /// Table names must:
    /// - Start with a letter or underscore
    /// - Contain only ASCII letters, digits, and underscores
    /// - Be at most 63 characters long
    pub fn validate_table_name(name: &str) -> Result<()> {
        if identifier_pattern().is_match(name) {
            Ok(())
        } else {
            Err(TodoError::Configuration(format!(
                "Invalid table name: '{name}'"
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Importance;

    #[test]
    fn test_valid_new_user() {
        let user = NewUser::new("maria", "hash", "salt");
        assert!(Validator::validate_new_user(&user).is_ok());
    }

    #[test]
    fn test_invalid_new_user() {
        let err = Validator::validate_new_user(&NewUser::new("", "hash", "salt")).unwrap_err();
        assert_eq!(err, TodoError::empty_field("username"));

        let err = Validator::validate_new_user(&NewUser::new("maria", "  ", "salt")).unwrap_err();
        assert_eq!(err, TodoError::empty_field("password_hash"));

        let err = Validator::validate_new_user(&NewUser::new("maria", "hash", "")).unwrap_err();
        assert_eq!(err, TodoError::empty_field("salt"));
    }

    #[test]
    fn test_descriptions() {
        assert!(Validator::validate_description("Buy milk").is_ok());
        assert!(Validator::validate_description("").is_err());
        assert!(Validator::validate_description("   ").is_err());
        assert!(Validator::validate_description(&"a".repeat(2000)).is_ok());
        assert!(Validator::validate_description(&"a".repeat(2001)).is_err());

        let task = NewTask::new(1, "\t\n", Importance::Low);
        assert!(Validator::validate_new_task(&task).unwrap_err().is_validation());

        let edit = EditTask {
            id: 1,
            description: String::new(),
            importance: Importance::High,
        };
        assert!(Validator::validate_edit_task(&edit).is_err());
    }

    #[test]
    fn test_table_names() {
        assert!(Validator::validate_table_name("users").is_ok());
        assert!(Validator::validate_table_name("_tasks_v2").is_ok());
        assert!(Validator::validate_table_name("Tarefas").is_ok());

        assert!(Validator::validate_table_name("").is_err());
        assert!(Validator::validate_table_name("2tasks").is_err());
        assert!(Validator::validate_table_name("tasks; DROP TABLE users").is_err());
        assert!(Validator::validate_table_name("tasks--").is_err());
        assert!(Validator::validate_table_name(&"t".repeat(64)).is_err());
    }
}
