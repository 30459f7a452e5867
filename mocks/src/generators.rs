//! Random test data generators using the fake crate
//!
//! Provides:
//! - Usernames and task descriptions
//! - Property-based testing strategies for dates and importance

use chrono::NaiveDate;
use fake::faker::internet::en::Username;
use fake::faker::lorem::en::Sentence;
use fake::Fake;
use proptest::prelude::*;
use rand::Rng;
use todo_core::{Importance, NewTask, NewUser};

/// Generate a username that is unlikely to collide with others
pub fn generate_username() -> String {
    let base: String = Username().fake();
    let suffix: u32 = rand::thread_rng().gen_range(1000..100_000);
    format!("{base}{suffix}")
}

pub fn generate_description() -> String {
    Sentence(3..8).fake()
}

pub fn generate_importance() -> Importance {
    match rand::thread_rng().gen_range(0..3) {
        0 => Importance::High,
        1 => Importance::Medium,
        _ => Importance::Low,
    }
}

pub fn generate_new_user() -> NewUser {
    let username = generate_username();
    NewUser::new(
        username.clone(),
        format!("{:x}", rand::thread_rng().gen::<u128>()),
        format!("salt-{username}"),
    )
}

pub fn generate_new_task(owner_id: i64) -> NewTask {
    NewTask::new(owner_id, generate_description(), generate_importance())
}

/// Strategy for calendar dates between 1990 and 2060
pub fn date_strategy() -> impl Strategy<Value = NaiveDate> {
    (0i64..25_567).prop_map(|offset| {
        NaiveDate::from_ymd_opt(1990, 1, 1).unwrap_or_default() + chrono::Days::new(offset as u64)
    })
}

pub fn importance_strategy() -> impl Strategy<Value = Importance> {
    prop_oneof![
        Just(Importance::High),
        Just(Importance::Medium),
        Just(Importance::Low),
    ]
}
