//! Record view roles
//!
//! The admin view and the personal (self-service) view share one collection
//! type. A role decides how the month filter reads, what a rendered row
//! shows, and the CSV layout.

use chrono::{FixedOffset, NaiveDate};

use super::filter::MonthWindow;
use super::record::AttendanceRecord;
use super::render::{
    confidence_label, format_date_long, format_date_short, format_datetime_24h, format_time_long,
    format_time_short, weekday_name, RenderedRow,
};

/// Status shown on personal rows without one
pub const PERSONAL_ROW_STATUS: &str = "Present";

/// Behaviour that differs between record views
pub trait Role: Send + Sync + 'static {
    const LABEL: &'static str;
    const MONTH_WINDOW: MonthWindow;
    const EMPTY_STATE: (&'static str, &'static str);
    const EXPORT_HEADERS: [&'static str; 6];
    const EMPTY_EXPORT_MESSAGE: &'static str;
    const EXPORT_SUCCESS_MESSAGE: &'static str;

    fn render_row(record: &AttendanceRecord, zone: FixedOffset) -> RenderedRow;

    /// CSV cells for one record; `owner` is the looked-up employee id
    fn export_row(record: &AttendanceRecord, owner: Option<&str>, zone: FixedOffset) -> Vec<String>;

    fn export_file_name(owner: Option<&str>, date: NaiveDate) -> String;

    /// Title shown above a filtered list
    fn filtered_title(count: usize) -> String;
}

/// Administrator view over everyone's records
#[derive(Debug, Clone, Copy, Default)]
pub struct Admin;

/// Self-service view over one employee's records
#[derive(Debug, Clone, Copy, Default)]
pub struct Personal;

impl Role for Admin {
    const LABEL: &'static str = "admin";
    const MONTH_WINDOW: MonthWindow = MonthWindow::Rolling;
    const EMPTY_STATE: (&'static str, &'static str) =
        ("No Records Found", "No attendance records found.");
    const EXPORT_HEADERS: [&'static str; 6] = [
        "Name",
        "Employee ID",
        "Date & Time",
        "Day of Week",
        "Confidence",
        "Status",
    ];
    const EMPTY_EXPORT_MESSAGE: &'static str = "No data to export";
    const EXPORT_SUCCESS_MESSAGE: &'static str = "All attendance data exported successfully";

    fn render_row(record: &AttendanceRecord, zone: FixedOffset) -> RenderedRow {
        let title = match record.employee_id.as_deref() {
            Some(id) if !id.is_empty() => format!("{} ({})", record.name, id),
            _ => record.name.clone(),
        };

        let time = record.display_time.clone().unwrap_or_else(|| {
            record
                .instant()
                .map(|at| format_datetime_24h(at.with_timezone(&zone)))
                .unwrap_or_else(|| record.timestamp.clone())
        });

        RenderedRow {
            title,
            time,
            confidence: confidence_label(record),
            status: record.display_status().to_string(),
        }
    }

    fn export_row(record: &AttendanceRecord, _owner: Option<&str>, zone: FixedOffset) -> Vec<String> {
        let local = record.instant().map(|at| at.with_timezone(&zone));

        vec![
            record.name.clone(),
            record
                .employee_id
                .clone()
                .filter(|id| !id.is_empty())
                .unwrap_or_else(|| "N/A".to_string()),
            local
                .map(format_datetime_24h)
                .unwrap_or_else(|| record.timestamp.clone()),
            local.map(weekday_name).unwrap_or_default(),
            confidence_label(record),
            record.display_status().to_string(),
        ]
    }

    fn export_file_name(_owner: Option<&str>, date: NaiveDate) -> String {
        format!("all_attendance_{}.csv", date.format("%Y-%m-%d"))
    }

    fn filtered_title(count: usize) -> String {
        format!("All Attendance Records ({} filtered)", count)
    }
}

impl Role for Personal {
    const LABEL: &'static str = "personal";
    const MONTH_WINDOW: MonthWindow = MonthWindow::Calendar;
    const EMPTY_STATE: (&'static str, &'static str) = (
        "No Attendance Records Found",
        "You don't have any attendance records yet. Start marking your attendance!",
    );
    const EXPORT_HEADERS: [&'static str; 6] = [
        "Date",
        "Time",
        "Day of Week",
        "Confidence",
        "Status",
        "Employee ID",
    ];
    const EMPTY_EXPORT_MESSAGE: &'static str = "No personal data to export";
    const EXPORT_SUCCESS_MESSAGE: &'static str = "Personal attendance data exported successfully";

    fn render_row(record: &AttendanceRecord, zone: FixedOffset) -> RenderedRow {
        let local = record.instant().map(|at| at.with_timezone(&zone));

        RenderedRow {
            title: local
                .map(format_date_long)
                .unwrap_or_else(|| record.timestamp.clone()),
            time: local.map(format_time_short).unwrap_or_default(),
            confidence: confidence_label(record),
            status: record.status_or(PERSONAL_ROW_STATUS).to_string(),
        }
    }

    fn export_row(record: &AttendanceRecord, owner: Option<&str>, zone: FixedOffset) -> Vec<String> {
        let local = record.instant().map(|at| at.with_timezone(&zone));

        vec![
            local
                .map(format_date_short)
                .unwrap_or_else(|| record.timestamp.clone()),
            local.map(format_time_long).unwrap_or_default(),
            local.map(weekday_name).unwrap_or_default(),
            confidence_label(record),
            record.display_status().to_string(),
            owner
                .or(record.employee_id.as_deref())
                .unwrap_or("N/A")
                .to_string(),
        ]
    }

    fn export_file_name(owner: Option<&str>, date: NaiveDate) -> String {
        format!(
            "my_attendance_{}_{}.csv",
            owner.unwrap_or("unknown"),
            date.format("%Y-%m-%d")
        )
    }

    fn filtered_title(count: usize) -> String {
        format!("My Attendance Records ({} filtered)", count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn ist() -> FixedOffset {
        FixedOffset::east_opt(330 * 60).unwrap()
    }

    #[test]
    fn test_file_names() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        assert_eq!(Admin::export_file_name(None, date), "all_attendance_2026-10-16.csv");
        assert_eq!(
            Personal::export_file_name(Some("EMP042"), date),
            "my_attendance_EMP042_2026-10-16.csv"
        );
    }

    #[test]
    fn test_admin_export_row_defaults() {
        let at = Utc.with_ymd_and_hms(2026, 10, 16, 3, 30, 0).unwrap();
        let record = AttendanceRecord::new("Asha Rao", at).similarity(91.4);
        let row = Admin::export_row(&record, None, ist());
        assert_eq!(
            row,
            vec!["Asha Rao", "N/A", "16/10/2026, 09:00:00", "Friday", "91%", "PRESENT"]
        );
    }

    #[test]
    fn test_personal_export_row_uses_owner() {
        let at = Utc.with_ymd_and_hms(2026, 10, 16, 3, 30, 0).unwrap();
        let record = AttendanceRecord::new("", at).similarity(96.6);
        let row = Personal::export_row(&record, Some("EMP042"), ist());
        assert_eq!(
            row,
            vec!["16/10/2026", "9:00:00 am", "Friday", "97%", "PRESENT", "EMP042"]
        );
    }

    #[test]
    fn test_personal_row_status_default() {
        let at = Utc.with_ymd_and_hms(2026, 10, 16, 3, 30, 0).unwrap();
        let record = AttendanceRecord::new("", at).similarity(90.0);

        assert_eq!(Personal::render_row(&record, ist()).status, "Present");
        assert_eq!(Admin::render_row(&record, ist()).status, "PRESENT");
        assert_eq!(
            Personal::render_row(&record.clone().status("LATE"), ist()).status,
            "LATE"
        );
    }

    #[test]
    fn test_filtered_titles() {
        assert_eq!(Admin::filtered_title(3), "All Attendance Records (3 filtered)");
        assert_eq!(Personal::filtered_title(0), "My Attendance Records (0 filtered)");
    }
}
