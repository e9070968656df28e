//! Task status and the due-date rule it is derived from.

use std::{fmt, str::FromStr};

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

pub const STATUSES: [TaskStatus; 3] = [
    TaskStatus::Pending,
    TaskStatus::InProgress,
    TaskStatus::Completed,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
}

impl TaskStatus {
    /// Past due is `Completed`, due today is `InProgress`, later is `Pending`.
    ///
    /// Only calendar dates are compared, so the time of day never matters.
    pub fn derive(due: NaiveDate, today: NaiveDate) -> Self {
        match due.cmp(&today) {
            std::cmp::Ordering::Less => Self::Completed,
            std::cmp::Ordering::Equal => Self::InProgress,
            std::cmp::Ordering::Greater => Self::Pending,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
        }
    }

    /// Label with the first letter capitalised, e.g. `In-progress`.
    pub fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::InProgress => "In-progress",
            Self::Completed => "Completed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown task status: {0}")]
pub struct UnknownStatus(String);

impl FromStr for TaskStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        STATUSES
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

pub fn derive_status(due: NaiveDate, today: NaiveDate) -> TaskStatus {
    TaskStatus::derive(due, today)
}

/// Source of "today" for status derivation.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// The local calendar date.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Days;
    use rstest::rstest;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
    }

    #[rstest]
    #[case(today(), TaskStatus::InProgress)]
    #[case(today() - Days::new(1), TaskStatus::Completed)]
    #[case(today() + Days::new(1), TaskStatus::Pending)]
    #[case(today() - Days::new(400), TaskStatus::Completed)]
    #[case(today() + Days::new(400), TaskStatus::Pending)]
    fn derives_status_from_due_date(#[case] due: NaiveDate, #[case] expected: TaskStatus) {
        assert_eq!(derive_status(due, today()), expected);
        // same inputs, same answer
        assert_eq!(derive_status(due, today()), expected);
    }

    #[rstest]
    #[case(TaskStatus::Pending, "pending", "Pending")]
    #[case(TaskStatus::InProgress, "in-progress", "In-progress")]
    #[case(TaskStatus::Completed, "completed", "Completed")]
    fn status_strings(#[case] status: TaskStatus, #[case] wire: &str, #[case] label: &str) {
        assert_eq!(status.to_string(), wire);
        assert_eq!(status.label(), label);
        assert_eq!(wire.parse::<TaskStatus>().unwrap(), status);
        assert_eq!(
            serde_json::to_string(&status).unwrap(),
            format!("\"{wire}\"")
        );
    }

    #[test]
    fn rejects_unknown_status() {
        assert!("overdue".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn fixed_clock_reports_its_date() {
        assert_eq!(FixedClock(today()).today(), today());
    }
}
