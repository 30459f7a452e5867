use chrono::{Datelike, Local, NaiveDate};
use std::sync::atomic::{AtomicI32, Ordering};

/// Source of "today" for stamping `created_at` and `finished_at`.
pub trait Clock: Send + Sync + std::fmt::Debug {
    fn today(&self) -> NaiveDate;
}

/// The machine's local calendar date
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A settable date, for tests that need tasks spread over several days
#[derive(Debug)]
pub struct FixedClock {
    days_from_ce: AtomicI32,
}

impl FixedClock {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            days_from_ce: AtomicI32::new(date.num_days_from_ce()),
        }
    }

    pub fn set(&self, date: NaiveDate) {
        self.days_from_ce
            .store(date.num_days_from_ce(), Ordering::SeqCst);
    }

    pub fn advance_days(&self, days: i32) {
        self.days_from_ce.fetch_add(days, Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        NaiveDate::from_num_days_from_ce_opt(self.days_from_ce.load(Ordering::SeqCst))
            .unwrap_or_default()
    }
}
