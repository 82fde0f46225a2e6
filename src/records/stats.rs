//! Aggregate statistics for the record views

use chrono::{DateTime, FixedOffset, NaiveDate, Timelike};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

use super::filter::same_month;
use super::record::AttendanceRecord;

/// Summary cards on the admin view
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AdminStats {
    /// Distinct names
    pub total_users: usize,
    pub today_count: usize,
    /// Rounded mean score
    pub avg_confidence: i64,
    pub total_records: usize,
}

/// Summary cards on the personal view
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PersonalStats {
    /// Distinct calendar days with a record
    pub total_days: usize,
    pub this_month_days: usize,
    /// Average check-in minute of day, if any records
    pub avg_check_in_minutes: Option<u32>,
    /// Percentage of working days attended this month, capped at 100
    pub attendance_rate: u32,
}

impl AdminStats {
    pub fn compute(records: &[AttendanceRecord], now: DateTime<FixedOffset>) -> Self {
        if records.is_empty() {
            return Self::default();
        }

        let total_users = records
            .iter()
            .map(|r| r.name.as_str())
            .collect::<HashSet<_>>()
            .len();

        let today = now.date_naive();
        let today_count = records
            .iter()
            .filter_map(|r| r.instant())
            .filter(|at| at.with_timezone(&now.timezone()).date_naive() == today)
            .count();

        let sum: f64 = records.iter().map(|r| r.score()).sum();
        let avg_confidence = (sum / records.len() as f64).round() as i64;

        Self {
            total_users,
            today_count,
            avg_confidence,
            total_records: records.len(),
        }
    }
}

impl fmt::Display for AdminStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "users={} today={} avg={}% total={}",
            self.total_users, self.today_count, self.avg_confidence, self.total_records
        )
    }
}

impl PersonalStats {
    pub fn compute(
        records: &[AttendanceRecord],
        now: DateTime<FixedOffset>,
        working_days_per_month: u32,
    ) -> Self {
        let zone = now.timezone();
        let local: Vec<DateTime<FixedOffset>> = records
            .iter()
            .filter_map(|r| r.instant())
            .map(|at| at.with_timezone(&zone))
            .collect();

        if local.is_empty() {
            return Self::default();
        }

        let total_days = local
            .iter()
            .map(|dt| dt.date_naive())
            .collect::<HashSet<NaiveDate>>()
            .len();

        let this_month_days = local
            .iter()
            .filter(|dt| same_month(**dt, now))
            .map(|dt| dt.date_naive())
            .collect::<HashSet<NaiveDate>>()
            .len();

        let minutes: u32 = local.iter().map(|dt| dt.hour() * 60 + dt.minute()).sum();
        let avg = (minutes as f64 / local.len() as f64).round() as u32;

        Self {
            total_days,
            this_month_days,
            avg_check_in_minutes: Some(avg),
            attendance_rate: attendance_rate(this_month_days, working_days_per_month),
        }
    }

    /// `HH:MM`, or `--:--` with no records
    pub fn avg_check_in(&self) -> String {
        match self.avg_check_in_minutes {
            Some(m) => format!("{:02}:{:02}", m / 60, m % 60),
            None => "--:--".to_string(),
        }
    }

    pub fn attendance_rate_label(&self) -> String {
        format!("{}%", self.attendance_rate)
    }
}

impl fmt::Display for PersonalStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "days={} this_month={} avg_check_in={} rate={}",
            self.total_days,
            self.this_month_days,
            self.avg_check_in(),
            self.attendance_rate_label()
        )
    }
}

/// `min(100, round(days / working_days * 100))`
pub fn attendance_rate(days: usize, working_days_per_month: u32) -> u32 {
    if working_days_per_month == 0 {
        return 0;
    }
    let rate = (days as f64 / working_days_per_month as f64 * 100.0).round() as u32;
    rate.min(100)
}
