//! Date filters over attendance records
//!
//! All calendar comparisons happen in the display time zone.

use chrono::{DateTime, Datelike, Duration, FixedOffset, Months, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::RecordsError;

/// Time window selected in the filter drop-down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateFilter {
    Today,
    Yesterday,
    Week,
    Month,
    Quarter,
    #[default]
    All,
}

/// How the `Month` filter is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthWindow {
    /// Everything since the same day last month
    Rolling,
    /// The current calendar month only
    Calendar,
}

impl DateFilter {
    pub const ALL: [DateFilter; 6] = [
        DateFilter::Today,
        DateFilter::Yesterday,
        DateFilter::Week,
        DateFilter::Month,
        DateFilter::Quarter,
        DateFilter::All,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DateFilter::Today => "today",
            DateFilter::Yesterday => "yesterday",
            DateFilter::Week => "week",
            DateFilter::Month => "month",
            DateFilter::Quarter => "quarter",
            DateFilter::All => "all",
        }
    }

    /// Whether an instant falls inside this window.
    ///
    /// `now` carries the display zone; `at` is converted into it.
    pub fn matches(
        &self,
        at: DateTime<Utc>,
        now: DateTime<FixedOffset>,
        month: MonthWindow,
    ) -> bool {
        let local = at.with_timezone(&now.timezone());

        match self {
            DateFilter::All => true,
            DateFilter::Today => local.date_naive() == now.date_naive(),
            DateFilter::Yesterday => {
                Some(local.date_naive()) == now.date_naive().pred_opt()
            }
            DateFilter::Week => local >= now - Duration::days(7),
            DateFilter::Month => match month {
                MonthWindow::Rolling => months_before(now, 1).map_or(true, |start| local >= start),
                MonthWindow::Calendar => same_month(local, now),
            },
            DateFilter::Quarter => months_before(now, 3).map_or(true, |start| local >= start),
        }
    }
}

fn months_before(now: DateTime<FixedOffset>, months: u32) -> Option<DateTime<FixedOffset>> {
    now.checked_sub_months(Months::new(months))
}

/// Same calendar month and year
pub(crate) fn same_month(a: DateTime<FixedOffset>, b: DateTime<FixedOffset>) -> bool {
    a.year() == b.year() && a.month() == b.month()
}

impl fmt::Display for DateFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DateFilter {
    type Err = RecordsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        DateFilter::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or(RecordsError::UnknownFilter(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ist() -> FixedOffset {
        FixedOffset::east_opt(330 * 60).unwrap()
    }

    fn now() -> DateTime<FixedOffset> {
        ist().with_ymd_and_hms(2026, 10, 16, 10, 0, 0).unwrap()
    }

    fn local(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        ist().with_ymd_and_hms(y, m, d, h, 0, 0).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn test_parse() {
        assert_eq!("Today".parse::<DateFilter>().unwrap(), DateFilter::Today);
        assert_eq!(" quarter ".parse::<DateFilter>().unwrap(), DateFilter::Quarter);
        assert!(matches!(
            "fortnight".parse::<DateFilter>(),
            Err(RecordsError::UnknownFilter(_))
        ));
    }

    #[test]
    fn test_today_uses_display_zone() {
        // 20:00 UTC on the 15th is 01:30 on the 16th in IST
        let late_utc = Utc.with_ymd_and_hms(2026, 10, 15, 20, 0, 0).unwrap();
        assert!(DateFilter::Today.matches(late_utc, now(), MonthWindow::Rolling));
        assert!(!DateFilter::Yesterday.matches(late_utc, now(), MonthWindow::Rolling));
    }

    #[test]
    fn test_yesterday() {
        assert!(DateFilter::Yesterday.matches(local(2026, 10, 15, 9), now(), MonthWindow::Rolling));
        assert!(!DateFilter::Yesterday.matches(local(2026, 10, 14, 9), now(), MonthWindow::Rolling));
    }

    #[test]
    fn test_week_boundary() {
        assert!(DateFilter::Week.matches(local(2026, 10, 9, 10), now(), MonthWindow::Rolling));
        assert!(!DateFilter::Week.matches(local(2026, 10, 9, 9), now(), MonthWindow::Rolling));
    }

    #[test]
    fn test_month_windows_differ() {
        let last_month = local(2026, 9, 20, 9);
        assert!(DateFilter::Month.matches(last_month, now(), MonthWindow::Rolling));
        assert!(!DateFilter::Month.matches(last_month, now(), MonthWindow::Calendar));

        let this_month = local(2026, 10, 1, 9);
        assert!(DateFilter::Month.matches(this_month, now(), MonthWindow::Calendar));
    }

    #[test]
    fn test_quarter() {
        assert!(DateFilter::Quarter.matches(local(2026, 7, 17, 9), now(), MonthWindow::Calendar));
        assert!(!DateFilter::Quarter.matches(local(2026, 7, 15, 9), now(), MonthWindow::Calendar));
        assert!(DateFilter::All.matches(local(2001, 1, 1, 0), now(), MonthWindow::Calendar));
    }
}
