//! Demo records
//!
//! Synthetic attendance shown when a records query fails and the demo
//! fallback is enabled. Every record produced here is marked
//! [`Provenance::Demo`](super::Provenance::Demo) by the caller.

use chrono::{DateTime, Datelike, Duration, FixedOffset, Timelike, Utc, Weekday};

use super::record::AttendanceRecord;

const DEMO_PEOPLE: [(&str, &str); 6] = [
    ("John Doe", "EMP001"),
    ("Jane Smith", "EMP002"),
    ("Mike Johnson", "EMP003"),
    ("Sarah Wilson", "EMP004"),
    ("David Brown", "EMP005"),
    ("Lisa Davis", "EMP006"),
];

const ADMIN_RECORD_COUNT: usize = 25;
const ADMIN_DAY_SPAN: i64 = 14;
const PERSONAL_DAY_SPAN: i64 = 30;

/// Records for several people over the last two weeks
pub fn admin_records(rng: &mut fastrand::Rng, now: DateTime<FixedOffset>) -> Vec<AttendanceRecord> {
    (0..ADMIN_RECORD_COUNT)
        .filter_map(|_| {
            let day = now - Duration::days(rng.i64(0..ADMIN_DAY_SPAN));
            let at = at_time(day, rng.u32(8..18), rng.u32(0..60))?;
            let (name, id) = DEMO_PEOPLE[rng.usize(..DEMO_PEOPLE.len())];

            Some(
                AttendanceRecord::new(name, at)
                    .employee_id(id)
                    .similarity(demo_similarity(rng))
                    .status("PRESENT"),
            )
        })
        .collect()
}

/// One check-in per weekday over the last 30 days for a single employee
pub fn personal_records(
    rng: &mut fastrand::Rng,
    employee_id: &str,
    now: DateTime<FixedOffset>,
) -> Vec<AttendanceRecord> {
    (0..PERSONAL_DAY_SPAN)
        .map(|i| now - Duration::days(i))
        .filter(|day| !matches!(day.weekday(), Weekday::Sat | Weekday::Sun))
        .filter_map(|day| {
            // Between 08:30 and 10:29
            let minute_of_day = 8 * 60 + 30 + rng.u32(0..120);
            let at = at_time(day, minute_of_day / 60, minute_of_day % 60)?;

            Some(
                AttendanceRecord::new("", at)
                    .employee_id(employee_id)
                    .similarity(demo_similarity(rng))
                    .status("PRESENT"),
            )
        })
        .collect()
}

fn demo_similarity(rng: &mut fastrand::Rng) -> f64 {
    85.0 + rng.f64() * 15.0
}

fn at_time(day: DateTime<FixedOffset>, hour: u32, minute: u32) -> Option<DateTime<Utc>> {
    day.with_hour(hour)?
        .with_minute(minute)?
        .with_second(0)?
        .with_nanosecond(0)
        .map(|dt| dt.with_timezone(&Utc))
}
