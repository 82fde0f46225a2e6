//! Attendance record type
//!
//! Records arrive from the recognition API and are never modified locally.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Status used when the API omits one
pub const DEFAULT_STATUS: &str = "PRESENT";

/// A single attendance entry as returned by the recognition API
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    /// Person the face matched; personal queries may omit it
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<String>,
    /// ISO 8601 timestamp, kept verbatim
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub similarity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Pre-formatted time supplied by the server
    #[serde(default, rename = "display_time", skip_serializing_if = "Option::is_none")]
    pub display_time: Option<String>,
}

impl AttendanceRecord {
    /// Create a record stamped at the given instant
    pub fn new(name: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            employee_id: None,
            timestamp: timestamp.to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            similarity: None,
            confidence: None,
            status: None,
            display_time: None,
        }
    }

    /// Builder method: set employee id
    pub fn employee_id(mut self, id: impl Into<String>) -> Self {
        self.employee_id = Some(id.into());
        self
    }

    /// Builder method: set similarity score
    pub fn similarity(mut self, similarity: f64) -> Self {
        self.similarity = Some(similarity);
        self
    }

    /// Builder method: set status
    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Parse the timestamp.
    ///
    /// Accepts RFC 3339 and, failing that, a zone-less ISO date-time read as UTC.
    pub fn instant(&self) -> Option<DateTime<Utc>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(&self.timestamp) {
            return Some(dt.with_timezone(&Utc));
        }

        ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(&self.timestamp, fmt).ok())
            .map(|naive| naive.and_utc())
    }

    /// Raw score: similarity, else confidence, else zero.
    ///
    /// A zero similarity falls through to confidence.
    pub fn score(&self) -> f64 {
        [self.similarity, self.confidence]
            .into_iter()
            .flatten()
            .find(|v| *v != 0.0 && !v.is_nan())
            .unwrap_or(0.0)
    }

    /// Score rounded for display
    pub fn display_confidence(&self) -> i64 {
        self.score().round() as i64
    }

    pub fn display_status(&self) -> &str {
        self.status_or(DEFAULT_STATUS)
    }

    /// Status, or `fallback` when missing or empty
    pub fn status_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        match self.status.as_deref() {
            Some(s) if !s.is_empty() => s,
            _ => fallback,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_deserialize_wire_names() {
        let json = r#"{
            "name": "Asha Rao",
            "employeeId": "EMP042",
            "timestamp": "2026-10-16T03:30:00Z",
            "similarity": 91.4,
            "display_time": "16/10/2026, 09:00:00"
        }"#;

        let record: AttendanceRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.employee_id.as_deref(), Some("EMP042"));
        assert_eq!(record.display_time.as_deref(), Some("16/10/2026, 09:00:00"));
        assert_eq!(record.display_status(), "PRESENT");
        assert_eq!(record.display_confidence(), 91);
    }

    #[test]
    fn test_missing_name_defaults_empty() {
        let record: AttendanceRecord =
            serde_json::from_str(r#"{"timestamp":"2026-10-16T03:30:00Z","confidence":88}"#)
                .unwrap();
        assert_eq!(record.name, "");
        assert_eq!(record.display_confidence(), 88);
    }

    #[test]
    fn test_score_fallthrough() {
        let at = Utc.with_ymd_and_hms(2026, 10, 16, 3, 30, 0).unwrap();
        let mut record = AttendanceRecord::new("A", at);
        assert_eq!(record.score(), 0.0);

        record.confidence = Some(77.6);
        assert_eq!(record.display_confidence(), 78);

        record.similarity = Some(0.0);
        assert_eq!(record.display_confidence(), 78);

        record.similarity = Some(92.5);
        assert_eq!(record.display_confidence(), 93);
    }

    #[test]
    fn test_instant_formats() {
        let at = Utc.with_ymd_and_hms(2026, 10, 16, 3, 30, 0).unwrap();
        let record = AttendanceRecord::new("A", at);
        assert_eq!(record.instant(), Some(at));

        let mut naive = record.clone();
        naive.timestamp = "2026-10-16T03:30:00.000".to_string();
        assert_eq!(naive.instant(), Some(at));

        naive.timestamp = "2026-10-16 03:30:00".to_string();
        assert_eq!(naive.instant(), Some(at));

        naive.timestamp = "yesterday".to_string();
        assert_eq!(naive.instant(), None);
    }

    #[test]
    fn test_empty_status_defaults() {
        let at = Utc.with_ymd_and_hms(2026, 10, 16, 3, 30, 0).unwrap();
        let record = AttendanceRecord::new("A", at).status("");
        assert_eq!(record.display_status(), "PRESENT");
        assert_eq!(record.status("LATE").display_status(), "LATE");
    }
}
