//! Record rendering
//!
//! Turns records into display rows. Ordering is always newest first; the
//! sort is stable so re-rendering the same list never reorders it.

use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;

use super::record::AttendanceRecord;
use super::role::Role;

/// One rendered line of a record list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedRow {
    /// Name (admin) or date (personal)
    pub title: String,
    pub time: String,
    /// Rounded confidence with a trailing `%`
    pub confidence: String,
    pub status: String,
}

/// A rendered list together with its count label
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedList {
    pub rows: Vec<RenderedRow>,
    pub count_label: String,
    /// Heading and detail shown instead of rows when the list is empty
    pub empty: Option<(&'static str, &'static str)>,
}

/// Sort newest first.
///
/// Records with unparseable timestamps go last, in their original order.
pub fn sort_newest_first<'a, I>(records: I) -> Vec<&'a AttendanceRecord>
where
    I: IntoIterator<Item = &'a AttendanceRecord>,
{
    let mut sorted: Vec<(Option<DateTime<Utc>>, &AttendanceRecord)> =
        records.into_iter().map(|r| (r.instant(), r)).collect();
    sorted.sort_by(|(a, _), (b, _)| match (a, b) {
        (Some(a), Some(b)) => b.cmp(a),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
    sorted.into_iter().map(|(_, r)| r).collect()
}

/// Render records for role `R`, sorting them first
pub fn rows<'a, R, I>(records: I, zone: FixedOffset) -> RenderedList
where
    R: Role,
    I: IntoIterator<Item = &'a AttendanceRecord>,
{
    let sorted = sort_newest_first(records);

    if sorted.is_empty() {
        return RenderedList {
            rows: Vec::new(),
            count_label: count_label(0),
            empty: Some(R::EMPTY_STATE),
        };
    }

    RenderedList {
        count_label: count_label(sorted.len()),
        rows: sorted.into_iter().map(|r| R::render_row(r, zone)).collect(),
        empty: None,
    }
}

pub fn count_label(n: usize) -> String {
    if n == 1 {
        "1 record".to_string()
    } else {
        format!("{} records", n)
    }
}

pub fn confidence_label(record: &AttendanceRecord) -> String {
    format!("{}%", record.display_confidence())
}

/// `16/10/2026, 14:05:09`
pub fn format_datetime_24h(dt: DateTime<FixedOffset>) -> String {
    dt.format("%d/%m/%Y, %H:%M:%S").to_string()
}

/// `Fri, 16 Oct 2026`
pub fn format_date_long(dt: DateTime<FixedOffset>) -> String {
    dt.format("%a, %-d %b %Y").to_string()
}

/// `16/10/2026`
pub fn format_date_short(dt: DateTime<FixedOffset>) -> String {
    dt.format("%d/%m/%Y").to_string()
}

/// `02:05 pm`
pub fn format_time_short(dt: DateTime<FixedOffset>) -> String {
    dt.format("%I:%M %P").to_string()
}

/// `2:05:09 pm`
pub fn format_time_long(dt: DateTime<FixedOffset>) -> String {
    dt.format("%-I:%M:%S %P").to_string()
}

/// `Friday`
pub fn weekday_name(dt: DateTime<FixedOffset>) -> String {
    dt.format("%A").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::role::{Admin, Personal};
    use chrono::TimeZone;

    fn ist() -> FixedOffset {
        FixedOffset::east_opt(330 * 60).unwrap()
    }

    fn record(name: &str, y: i32, m: u32, d: u32, h: u32) -> AttendanceRecord {
        AttendanceRecord::new(name, Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap())
    }

    #[test]
    fn test_sort_newest_first_is_stable() {
        let mut bad = record("bad-1", 2026, 1, 1, 0);
        bad.timestamp = "not a date".to_string();
        let mut bad2 = bad.clone();
        bad2.name = "bad-2".to_string();

        let list = vec![
            bad,
            record("old", 2026, 10, 1, 3),
            record("tie-a", 2026, 10, 5, 3),
            bad2,
            record("new", 2026, 10, 9, 3),
            record("tie-b", 2026, 10, 5, 3),
        ];

        let names: Vec<&str> = sort_newest_first(&list).iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["new", "tie-a", "tie-b", "old", "bad-1", "bad-2"]);

        // Same input, same order
        let again: Vec<&str> = sort_newest_first(&list).iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, again);
    }

    #[test]
    fn test_formats() {
        let dt = ist().with_ymd_and_hms(2026, 10, 16, 14, 5, 9).unwrap();
        assert_eq!(format_datetime_24h(dt), "16/10/2026, 14:05:09");
        assert_eq!(format_date_long(dt), "Fri, 16 Oct 2026");
        assert_eq!(format_date_short(dt), "16/10/2026");
        assert_eq!(format_time_short(dt), "02:05 pm");
        assert_eq!(format_time_long(dt), "2:05:09 pm");
        assert_eq!(weekday_name(dt), "Friday");
    }

    #[test]
    fn test_count_label() {
        assert_eq!(count_label(0), "0 records");
        assert_eq!(count_label(1), "1 record");
        assert_eq!(count_label(12), "12 records");
    }

    #[test]
    fn test_admin_rows() {
        let list = vec![
            record("Asha Rao", 2026, 10, 16, 3).employee_id("EMP042").similarity(91.4),
            record("Vikram", 2026, 10, 16, 4).similarity(88.6),
        ];

        let rendered = rows::<Admin, _>(&list, ist());
        assert_eq!(rendered.count_label, "2 records");
        assert_eq!(rendered.rows[0].title, "Vikram");
        assert_eq!(rendered.rows[0].confidence, "89%");
        assert_eq!(rendered.rows[1].title, "Asha Rao (EMP042)");
        assert_eq!(rendered.rows[1].time, "16/10/2026, 08:30:00");
    }

    #[test]
    fn test_admin_row_prefers_server_display_time() {
        let mut r = record("Asha Rao", 2026, 10, 16, 3);
        r.display_time = Some("server-side".to_string());
        let rendered = rows::<Admin, _>([&r], ist());
        assert_eq!(rendered.rows[0].time, "server-side");
    }

    #[test]
    fn test_personal_rows_and_empty_state() {
        let list = vec![record("", 2026, 10, 16, 3).similarity(97.0)];
        let rendered = rows::<Personal, _>(&list, ist());
        assert_eq!(rendered.rows[0].title, "Fri, 16 Oct 2026");
        assert_eq!(rendered.rows[0].time, "08:30 am");
        assert_eq!(rendered.rows[0].status, "Present");

        let none: Vec<AttendanceRecord> = Vec::new();
        let empty = rows::<Personal, _>(&none, ist());
        assert!(empty.rows.is_empty());
        assert_eq!(empty.count_label, "0 records");
        assert_eq!(empty.empty, Some(Personal::EMPTY_STATE));
    }
}
