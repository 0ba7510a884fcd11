//! Local list filters: priority and due-date window.

use chrono::{Days, NaiveDate};
use std::fmt;
use std::str::FromStr;

use crate::error::TodoError;
use crate::types::{Priority, TodoItem};

/// Which priorities are shown
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PriorityFilter {
    /// Every priority
    #[default]
    All,
    /// Exactly one priority
    Only(Priority),
}

impl PriorityFilter {
    /// Returns `true` if `item` passes the filter
    #[must_use]
    pub fn matches(self, item: &TodoItem) -> bool {
        match self {
            Self::All => true,
            Self::Only(priority) => item.priority == priority,
        }
    }
}

impl fmt::Display for PriorityFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Only(priority) => priority.fmt(f),
        }
    }
}

impl FromStr for PriorityFilter {
    type Err = TodoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(Self::All)
        } else {
            s.parse().map(Self::Only)
        }
    }
}

/// Which due dates are shown
///
/// `Within { days }` keeps items due between the start of today and the end
/// of today plus `days`, inclusive of whole days. Items without a due date
/// never match a window.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DateFilter {
    /// No date restriction
    #[default]
    All,
    /// Today through today + `days`
    Within {
        /// Number of days after today included in the window
        days: u32,
    },
}

impl DateFilter {
    /// Windows offered by the list view: all, today, 1, 3, 7 and 30 days
    pub const PRESETS: [Self; 6] = [
        Self::All,
        Self::Within { days: 0 },
        Self::Within { days: 1 },
        Self::Within { days: 3 },
        Self::Within { days: 7 },
        Self::Within { days: 30 },
    ];

    /// Parses `s` and accepts only one of [`Self::PRESETS`]
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::Validation`] for anything else.
    pub fn preset(s: &str) -> Result<Self, TodoError> {
        let filter: Self = s.parse()?;
        if Self::PRESETS.contains(&filter) {
            Ok(filter)
        } else {
            Err(TodoError::Validation(format!(
                "date filter must be one of all, 0, 1, 3, 7, 30 (got {filter})"
            )))
        }
    }

    /// First and last calendar day of the window, or `None` for [`Self::All`]
    #[must_use]
    pub fn window(self, today: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
        match self {
            Self::All => None,
            Self::Within { days } => {
                let end = today
                    .checked_add_days(Days::new(u64::from(days)))
                    .unwrap_or(NaiveDate::MAX);
                Some((today, end))
            },
        }
    }

    /// Returns `true` if `item` passes the filter on `today`
    #[must_use]
    pub fn matches(self, item: &TodoItem, today: NaiveDate) -> bool {
        let Some((start, end)) = self.window(today) else {
            return true;
        };
        item.submit_date
            .map(|due| due.date_naive())
            .is_some_and(|due| start <= due && due <= end)
    }
}

impl fmt::Display for DateFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Within { days } => write!(f, "{days}"),
        }
    }
}

impl FromStr for DateFilter {
    type Err = TodoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        s.parse()
            .map(|days| Self::Within { days })
            .map_err(|_| TodoError::Validation(format!("invalid date filter {s:?}")))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::TodoId;
    use chrono::{TimeZone, Utc};

    fn due(id: i32, due: Option<(i32, u32, u32, u32)>, priority: Priority) -> TodoItem {
        TodoItem {
            id: TodoId::new(id),
            content: format!("todo {id}"),
            submit_date: due.map(|(y, m, d, h)| Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()),
            created_at: Utc.timestamp_opt(i64::from(id), 0).unwrap(),
            completed: false,
            priority,
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
    }

    #[test]
    fn priority_filter_parses() {
        assert_eq!("all".parse::<PriorityFilter>().unwrap(), PriorityFilter::All);
        assert_eq!(
            "high".parse::<PriorityFilter>().unwrap(),
            PriorityFilter::Only(Priority::High)
        );
        assert!("nope".parse::<PriorityFilter>().is_err());
    }

    #[test]
    fn priority_filter_matches_exact_priority() {
        let filter = PriorityFilter::Only(Priority::Low);
        assert!(filter.matches(&due(1, None, Priority::Low)));
        assert!(!filter.matches(&due(2, None, Priority::High)));
        assert!(PriorityFilter::All.matches(&due(3, None, Priority::High)));
    }

    #[test]
    fn today_window_covers_whole_day() {
        let filter = DateFilter::Within { days: 0 };
        assert!(filter.matches(&due(1, Some((2025, 1, 1, 0)), Priority::Medium), today()));
        assert!(filter.matches(&due(2, Some((2025, 1, 1, 23)), Priority::Medium), today()));
        assert!(!filter.matches(&due(3, Some((2025, 1, 2, 0)), Priority::Medium), today()));
    }

    #[test]
    fn week_window_is_inclusive() {
        let filter = DateFilter::Within { days: 7 };
        assert!(filter.matches(&due(1, Some((2025, 1, 8, 23)), Priority::Medium), today()));
        assert!(!filter.matches(&due(2, Some((2025, 1, 9, 0)), Priority::Medium), today()));
        assert!(!filter.matches(&due(3, Some((2024, 12, 31, 23)), Priority::Medium), today()));
    }

    #[test]
    fn window_excludes_items_without_due_date() {
        let undated = due(1, None, Priority::Medium);
        assert!(!DateFilter::Within { days: 30 }.matches(&undated, today()));
        assert!(DateFilter::All.matches(&undated, today()));
    }

    #[test]
    fn date_filter_parses() {
        assert_eq!("all".parse::<DateFilter>().unwrap(), DateFilter::All);
        assert_eq!(
            "30".parse::<DateFilter>().unwrap(),
            DateFilter::Within { days: 30 }
        );
        assert!("-1".parse::<DateFilter>().is_err());
        assert!("soon".parse::<DateFilter>().is_err());
    }

    #[test]
    fn preset_accepts_only_offered_windows() {
        assert_eq!(DateFilter::preset("ALL").unwrap(), DateFilter::All);
        assert_eq!(DateFilter::preset("7").unwrap(), DateFilter::Within { days: 7 });
        assert!(matches!(DateFilter::preset("5"), Err(TodoError::Validation(_))));
        for filter in DateFilter::PRESETS {
            assert_eq!(DateFilter::preset(&filter.to_string()).unwrap(), filter);
        }
    }
}
