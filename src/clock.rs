use chrono::{Local, NaiveDate};

/// Supplies "today" for the summary header.
pub trait Clock {
    fn current_date(&self) -> NaiveDate;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn current_date(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Always reports the same day.
#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn current_date(&self) -> NaiveDate {
        self.0
    }
}
