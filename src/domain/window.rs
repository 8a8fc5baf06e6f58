use chrono::{Datelike, Duration, Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// Date format used for the `date` column and all date-window boundaries.
pub const ISO_DATE: &str = "%Y-%m-%d";

/// Time range applied when listing expenses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterWindow {
    #[default]
    All,
    /// From the most recent Sunday onwards.
    #[serde(rename = "week")]
    ThisWeek,
    /// From the first day of the current month onwards.
    #[serde(rename = "month")]
    ThisMonth,
}

impl FilterWindow {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterWindow::All => "all",
            FilterWindow::ThisWeek => "week",
            FilterWindow::ThisMonth => "month",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "all" => Some(FilterWindow::All),
            "week" | "this-week" | "this_week" => Some(FilterWindow::ThisWeek),
            "month" | "this-month" | "this_month" => Some(FilterWindow::ThisMonth),
            _ => None,
        }
    }

    /// Human-readable label for the window.
    pub fn label(&self) -> &'static str {
        match self {
            FilterWindow::All => "All",
            FilterWindow::ThisWeek => "This Week",
            FilterWindow::ThisMonth => "This Month",
        }
    }

    /// First date included by this window, relative to `today`.
    /// `None` means the window is unbounded.
    pub fn start_date(&self, today: NaiveDate) -> Option<NaiveDate> {
        match self {
            FilterWindow::All => None,
            FilterWindow::ThisWeek => Some(start_of_week(today)),
            FilterWindow::ThisMonth => Some(start_of_month(today)),
        }
    }
}

impl std::fmt::Display for FilterWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Current date on the local calendar.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// The most recent Sunday on or before `today`.
pub fn start_of_week(today: NaiveDate) -> NaiveDate {
    today - Duration::days(today.weekday().num_days_from_sunday() as i64)
}

/// The first day of the month containing `today`.
pub fn start_of_month(today: NaiveDate) -> NaiveDate {
    today - Duration::days(today.day0() as i64)
}

pub fn to_iso(date: NaiveDate) -> String {
    date.format(ISO_DATE).to_string()
}

pub fn parse_iso(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), ISO_DATE).ok()
}

pub fn today_iso() -> String {
    to_iso(today())
}

pub fn start_of_week_iso() -> String {
    to_iso(start_of_week(today()))
}

pub fn start_of_month_iso() -> String {
    to_iso(start_of_month(today()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        parse_iso(s).unwrap()
    }

    #[test]
    fn test_filter_window_roundtrip() {
        for window in [
            FilterWindow::All,
            FilterWindow::ThisWeek,
            FilterWindow::ThisMonth,
        ] {
            assert_eq!(FilterWindow::from_str(window.as_str()), Some(window));
        }
        assert_eq!(FilterWindow::from_str("Week"), Some(FilterWindow::ThisWeek));
        assert_eq!(FilterWindow::from_str("year"), None);
    }

    #[test]
    fn test_start_of_week_is_sunday() {
        // 2026-10-19 is a Monday
        assert_eq!(start_of_week(date("2026-10-19")), date("2026-10-18"));
        // A Sunday is its own week start
        assert_eq!(start_of_week(date("2026-10-18")), date("2026-10-18"));
        // Saturday goes back six days
        assert_eq!(start_of_week(date("2026-10-24")), date("2026-10-18"));
        // Crosses a month and year boundary
        assert_eq!(start_of_week(date("2027-01-02")), date("2026-12-27"));
    }

    #[test]
    fn test_start_of_month() {
        assert_eq!(start_of_month(date("2026-10-19")), date("2026-10-01"));
        assert_eq!(start_of_month(date("2026-10-01")), date("2026-10-01"));
        assert_eq!(start_of_month(date("2024-02-29")), date("2024-02-01"));
    }

    #[test]
    fn test_window_start_dates() {
        let today = date("2026-10-21");
        assert_eq!(
            FilterWindow::ThisWeek.start_date(today),
            Some(date("2026-10-18"))
        );
        assert_eq!(
            FilterWindow::ThisMonth.start_date(today),
            Some(date("2026-10-01"))
        );
        assert_eq!(FilterWindow::All.start_date(today), None);
    }

    #[test]
    fn test_iso_formatting() {
        assert_eq!(to_iso(date("2026-03-05")), "2026-03-05");
        assert_eq!(parse_iso("2026-13-01"), None);
        assert_eq!(today_iso().len(), 10);
        assert!(start_of_month_iso().ends_with("-01"));
        assert!(start_of_week_iso() <= today_iso());
    }
}
