use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::TodoError;

/// Storage format for every date column (`DD/MM/YYYY`).
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// A registered account.
///
/// The password is never seen by this crate: callers hash and salt it
/// beforehand and hand over the results.
///
/// # Examples
///
/// ```rust
/// use todo_core::models::User;
///
/// let user = User {
///     id: 1,
///     username: "maria".to_string(),
///     password_hash: "5e884898da28".to_string(),
///     salt: "a1b2c3".to_string(),
/// };
/// assert_eq!(user.username, "maria");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    /// Auto-increment primary key
    pub id: i64,
    /// Unique login name
    pub username: String,
    /// Pre-computed credential hash
    pub password_hash: String,
    /// Salt used to compute `password_hash`
    pub salt: String,
}

/// Data transfer object for registering a user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub salt: String,
}

impl NewUser {
    pub fn new(
        username: impl Into<String>,
        password_hash: impl Into<String>,
        salt: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password_hash: password_hash.into(),
            salt: salt.into(),
        }
    }
}

/// A to-do item owned by exactly one user.
///
/// `finished_at` is set if and only if `status` is [`TaskStatus::Finished`].
///
/// # Examples
///
/// ```rust
/// use chrono::NaiveDate;
/// use todo_core::models::{Importance, Task, TaskStatus};
///
/// let task = Task {
///     id: 7,
///     owner_id: 1,
///     description: "Buy milk".to_string(),
///     importance: Importance::Low,
///     status: TaskStatus::Active,
///     created_at: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
///     finished_at: None,
/// };
///
/// assert!(task.is_active());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    /// Auto-increment primary key
    pub id: i64,
    /// Owning user
    pub owner_id: i64,
    pub description: String,
    pub importance: Importance,
    pub status: TaskStatus,
    /// Day the task was added
    pub created_at: NaiveDate,
    /// Day the task was finished
    pub finished_at: Option<NaiveDate>,
}

impl Task {
    pub fn is_active(&self) -> bool {
        self.status == TaskStatus::Active
    }
}

/// Task lifecycle.
///
/// The only transition is `Active` → `Finished`; there is no way back.
#[derive(Debug, Clone, Copy, Hash, Serialize, Deserialize, PartialEq, Eq)]
pub enum TaskStatus {
    /// Open task, stored as `A`
    Active,
    /// Completed task, stored as `F`
    Finished,
}

impl TaskStatus {
    /// Single-letter code kept in the `status` column
    pub fn as_code(self) -> &'static str {
        match self {
            TaskStatus::Active => "A",
            TaskStatus::Finished => "F",
        }
    }

    pub fn can_transition_to(self, next: TaskStatus) -> bool {
        matches!((self, next), (TaskStatus::Active, TaskStatus::Finished))
    }
}

impl FromStr for TaskStatus {
    type Err = TodoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" => Ok(TaskStatus::Active),
            "F" => Ok(TaskStatus::Finished),
            _ => Err(TodoError::invalid_stored_value("status", s)),
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskStatus::Active => write!(f, "Active"),
            TaskStatus::Finished => write!(f, "Finished"),
        }
    }
}

/// How urgent a task is
#[derive(Debug, Clone, Copy, Hash, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    High,
    Medium,
    Low,
}

impl Importance {
    /// Label kept in the `importance` column
    pub fn as_str(self) -> &'static str {
        match self {
            Importance::High => "high",
            Importance::Medium => "medium",
            Importance::Low => "low",
        }
    }
}

impl FromStr for Importance {
    type Err = TodoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "high" => Ok(Importance::High),
            "medium" => Ok(Importance::Medium),
            "low" => Ok(Importance::Low),
            _ => Err(TodoError::invalid_stored_value("importance", s)),
        }
    }
}

impl std::fmt::Display for Importance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which date column a range query filters on.
///
/// Column names cannot be bound as query parameters, so callers pick from
/// this closed set and never pass raw text.
#[derive(Debug, Clone, Copy, Hash, Serialize, Deserialize, PartialEq, Eq)]
pub enum DateField {
    CreatedAt,
    FinishedAt,
}

impl DateField {
    pub fn column(self) -> &'static str {
        match self {
            DateField::CreatedAt => "created_at",
            DateField::FinishedAt => "finished_at",
        }
    }

    /// Read this field from a task
    pub fn value_of(self, task: &Task) -> Option<NaiveDate> {
        match self {
            DateField::CreatedAt => Some(task.created_at),
            DateField::FinishedAt => task.finished_at,
        }
    }
}

/// Data transfer object for adding a task
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewTask {
    pub owner_id: i64,
    pub description: String,
    pub importance: Importance,
}

impl NewTask {
    pub fn new(owner_id: i64, description: impl Into<String>, importance: Importance) -> Self {
        Self {
            owner_id,
            description: description.into(),
            importance,
        }
    }
}

/// New description and importance for an existing task
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EditTask {
    pub id: i64,
    pub description: String,
    pub importance: Importance,
}

/// Render a date the way it is stored.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parse a stored `DD/MM/YYYY` date.
pub fn parse_date(value: &str) -> Result<NaiveDate, TodoError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|_| TodoError::invalid_stored_value("date", value))
}

/// Key that orders stored dates chronologically (`YYYYMMDD`).
///
/// Only meaningful for years 0000 to 9999; see [`storable_range`].
pub fn sortable_date(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

/// Narrow an inclusive query range to the dates the four-digit year format
/// can hold. `None` when no storable date falls inside it.
pub fn storable_range(start: NaiveDate, end: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(0, 1, 1)?;
    let last = NaiveDate::from_ymd_opt(9999, 12, 31)?;

    let start = start.max(first);
    let end = end.min(last);
    (start <= end).then_some((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(TaskStatus::Active.as_code(), "A");
        assert_eq!(TaskStatus::Finished.as_code(), "F");
        assert_eq!("A".parse::<TaskStatus>().unwrap(), TaskStatus::Active);
        assert_eq!("F".parse::<TaskStatus>().unwrap(), TaskStatus::Finished);
        assert!("X".parse::<TaskStatus>().is_err());
        assert!("a".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn test_status_transitions() {
        assert!(TaskStatus::Active.can_transition_to(TaskStatus::Finished));
        assert!(!TaskStatus::Finished.can_transition_to(TaskStatus::Active));
        assert!(!TaskStatus::Active.can_transition_to(TaskStatus::Active));
        assert!(!TaskStatus::Finished.can_transition_to(TaskStatus::Finished));
    }

    #[test]
    fn test_importance_labels() {
        assert_eq!("high".parse::<Importance>().unwrap(), Importance::High);
        assert_eq!("medium".parse::<Importance>().unwrap(), Importance::Medium);
        assert_eq!("low".parse::<Importance>().unwrap(), Importance::Low);
        assert!("urgent".parse::<Importance>().is_err());
        assert_eq!(format!("{}", Importance::Medium), "medium");
    }

    #[test]
    fn test_date_field_columns() {
        assert_eq!(DateField::CreatedAt.column(), "created_at");
        assert_eq!(DateField::FinishedAt.column(), "finished_at");
    }

    #[test]
    fn test_date_field_value_of() {
        let mut task = Task {
            id: 1,
            owner_id: 1,
            description: "Water plants".to_string(),
            importance: Importance::Medium,
            status: TaskStatus::Active,
            created_at: date(2024, 1, 31),
            finished_at: None,
        };
        assert_eq!(DateField::CreatedAt.value_of(&task), Some(date(2024, 1, 31)));
        assert_eq!(DateField::FinishedAt.value_of(&task), None);

        task.status = TaskStatus::Finished;
        task.finished_at = Some(date(2024, 2, 2));
        assert_eq!(DateField::FinishedAt.value_of(&task), Some(date(2024, 2, 2)));
        assert!(!task.is_active());
    }

    #[test]
    fn test_date_storage_format() {
        assert_eq!(format_date(date(2024, 3, 5)), "05/03/2024");
        assert_eq!(parse_date("05/03/2024").unwrap(), date(2024, 3, 5));
        assert!(parse_date("2024-03-05").is_err());
        assert!(parse_date("31/02/2024").is_err());
    }

    #[test]
    fn test_sortable_date_orders_across_years() {
        // Day-first strings sort wrongly; the sortable key does not.
        let late_december = date(2023, 12, 31);
        let early_january = date(2024, 1, 1);
        assert!(format_date(late_december) > format_date(early_january));
        assert!(sortable_date(late_december) < sortable_date(early_january));
    }

    #[test]
    fn test_storable_range_clamps_open_bounds() {
        let (start, end) = storable_range(NaiveDate::MIN, NaiveDate::MAX).unwrap();
        assert_eq!(sortable_date(start), "00000101");
        assert_eq!(sortable_date(end), "99991231");

        let (start, end) = storable_range(date(2024, 1, 1), date(10_000, 1, 1)).unwrap();
        assert_eq!(start, date(2024, 1, 1));
        assert_eq!(end, date(9999, 12, 31));

        assert_eq!(storable_range(date(10_000, 1, 1), NaiveDate::MAX), None);
        assert_eq!(storable_range(date(2024, 2, 1), date(2024, 1, 1)), None);
    }

    #[test]
    fn test_task_serializes_importance_lowercase() {
        let task = Task {
            id: 3,
            owner_id: 2,
            description: "Pay rent".to_string(),
            importance: Importance::High,
            status: TaskStatus::Active,
            created_at: date(2024, 6, 1),
            finished_at: None,
        };
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["importance"], "high");
        assert_eq!(json["status"], "Active");
        assert!(json["finished_at"].is_null());
    }
}
