//! Checks on the home-office days picked by a winner.
//!
//! ```
//! use merit_core::schedule::{status, validate_iso, Rejection, ScheduleCheck};
//!
//! let check = validate_iso(&["2024-06-18", "2024-06-20"])?;
//! assert_eq!(check, ScheduleCheck::Accepted);
//!
//! let check = validate_iso(&["2024-06-18", "2024-06-19"])?;
//! assert_eq!(check, ScheduleCheck::Rejected(Rejection::ConsecutiveDays));
//! assert!(status(2, 2, check.reason()).is_error);
//! # Ok::<(), merit_core::ScheduleErrors>(())
//! ```

use chrono::{Datelike, NaiveDate, Weekday};
use log::debug;
use std::collections::BTreeSet;
use std::fmt::Display;

use crate::config::ScheduleErrors;

/// The reasons for refusing a selection of dates.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum Rejection {
    NoDates,
    Monday,
    ConsecutiveDays,
}

impl Rejection {
    pub fn reason(&self) -> &'static str {
        match self {
            Rejection::NoDates => "select at least one date",
            Rejection::Monday => "Mondays are not allowed",
            Rejection::ConsecutiveDays => "consecutive days are not allowed",
        }
    }
}

impl Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.reason())
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum ScheduleCheck {
    Accepted,
    Rejected(Rejection),
}

impl ScheduleCheck {
    /// The rejection reason, or an empty string when accepted.
    pub fn reason(&self) -> &'static str {
        match self {
            ScheduleCheck::Accepted => "",
            ScheduleCheck::Rejected(r) => r.reason(),
        }
    }
}

/// Validates a set of calendar dates.
///
/// Rules are checked in order and the first one failing is reported:
/// the set must not be empty, no date may be a Monday, no two dates may
/// be one day apart.
pub fn validate(dates: &BTreeSet<NaiveDate>) -> ScheduleCheck {
    if dates.is_empty() {
        return ScheduleCheck::Rejected(Rejection::NoDates);
    }
    if let Some(d) = dates.iter().find(|d| d.weekday() == Weekday::Mon) {
        debug!("validate: {} is a Monday", d);
        return ScheduleCheck::Rejected(Rejection::Monday);
    }
    // The set iterates in chronological order.
    let sorted: Vec<&NaiveDate> = dates.iter().collect();
    for pair in sorted.windows(2) {
        if pair[1].signed_duration_since(*pair[0]).num_days() == 1 {
            debug!("validate: {} and {} are consecutive", pair[0], pair[1]);
            return ScheduleCheck::Rejected(Rejection::ConsecutiveDays);
        }
    }
    ScheduleCheck::Accepted
}

/// Parses ISO dates (`YYYY-MM-DD`). Repeated dates collapse into one.
pub fn parse_dates<S: AsRef<str>>(dates: &[S]) -> Result<BTreeSet<NaiveDate>, ScheduleErrors> {
    let mut res: BTreeSet<NaiveDate> = BTreeSet::new();
    for s in dates.iter() {
        let d = NaiveDate::parse_from_str(s.as_ref(), "%Y-%m-%d")
            .map_err(|_| ScheduleErrors::InvalidDate(s.as_ref().to_string()))?;
        res.insert(d);
    }
    Ok(res)
}

/// Parses then validates a list of ISO dates.
pub fn validate_iso<S: AsRef<str>>(dates: &[S]) -> Result<ScheduleCheck, ScheduleErrors> {
    Ok(validate(&parse_dates(dates)?))
}

/// A status line for the scheduling form.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ScheduleStatus {
    pub message: String,
    pub is_error: bool,
}

/// Derives the status line from the selection progress and the last validation error.
///
/// An empty `last_error` means that there is no pending error.
pub fn status(selected: usize, target: usize, last_error: &str) -> ScheduleStatus {
    if !last_error.is_empty() {
        ScheduleStatus {
            message: last_error.to_string(),
            is_error: true,
        }
    } else if selected == target {
        ScheduleStatus {
            message: "ready to schedule".to_string(),
            is_error: false,
        }
    } else {
        ScheduleStatus {
            message: "select the required number of dates".to_string(),
            is_error: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(dates: &[&str]) -> ScheduleCheck {
        validate_iso(dates).unwrap()
    }

    #[test]
    fn empty_selection() {
        let empty: [&str; 0] = [];
        assert_eq!(check(&empty), ScheduleCheck::Rejected(Rejection::NoDates));
        assert_eq!(check(&empty).reason(), "select at least one date");
    }

    #[test]
    fn monday_rejected() {
        assert_eq!(
            check(&["2024-06-17"]),
            ScheduleCheck::Rejected(Rejection::Monday)
        );
        assert_eq!(check(&["2024-06-17"]).reason(), "Mondays are not allowed");
    }

    #[test]
    fn consecutive_rejected() {
        let c = check(&["2024-06-18", "2024-06-19"]);
        assert_eq!(c, ScheduleCheck::Rejected(Rejection::ConsecutiveDays));
        assert_eq!(c.reason(), "consecutive days are not allowed");
        // Order of input does not matter.
        assert_eq!(check(&["2024-06-19", "2024-06-18"]), c);
    }

    #[test]
    fn spaced_days_accepted() {
        assert_eq!(
            check(&["2024-06-18", "2024-06-20"]),
            ScheduleCheck::Accepted
        );
        assert_eq!(
            check(&["2024-06-20", "2024-06-18", "2024-06-22"]),
            ScheduleCheck::Accepted
        );
    }

    #[test]
    fn monday_wins_over_consecutive() {
        assert_eq!(
            check(&["2024-06-17", "2024-06-18"]),
            ScheduleCheck::Rejected(Rejection::Monday)
        );
    }

    #[test]
    fn consecutive_across_month_and_year() {
        assert_eq!(
            check(&["2024-06-30", "2024-07-01"]),
            // 2024-07-01 is a Monday.
            ScheduleCheck::Rejected(Rejection::Monday)
        );
        assert_eq!(
            check(&["2025-12-31", "2026-01-01"]),
            ScheduleCheck::Rejected(Rejection::ConsecutiveDays)
        );
    }

    #[test]
    fn friday_and_sunday_are_not_consecutive() {
        // Only calendar adjacency counts: Sunday then Tuesday is fine.
        assert_eq!(
            check(&["2024-06-21", "2024-06-23", "2024-06-25"]),
            ScheduleCheck::Accepted
        );
    }

    #[test]
    fn repeated_dates_collapse() {
        assert_eq!(
            check(&["2024-06-18", "2024-06-18"]),
            ScheduleCheck::Accepted
        );
    }

    #[test]
    fn invalid_dates() {
        assert_eq!(
            validate_iso(&["2024-02-30"]),
            Err(ScheduleErrors::InvalidDate("2024-02-30".to_string()))
        );
        assert!(validate_iso(&["June 18"]).is_err());
    }

    #[test]
    fn status_lines() {
        assert_eq!(
            status(2, 3, ""),
            ScheduleStatus {
                message: "select the required number of dates".to_string(),
                is_error: false
            }
        );
        assert_eq!(
            status(3, 3, ""),
            ScheduleStatus {
                message: "ready to schedule".to_string(),
                is_error: false
            }
        );
        assert_eq!(
            status(1, 2, "Mondays are not allowed"),
            ScheduleStatus {
                message: "Mondays are not allowed".to_string(),
                is_error: true
            }
        );
    }
}
