//! Request and response bodies for the recognition endpoint

use serde::{Deserialize, Serialize};

use crate::records::AttendanceRecord;

/// Action discriminator for JSON query bodies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QueryAction {
    GetAttendance,
    GetEmployeeAttendance,
}

/// Face registration body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRequest {
    /// Base64 JPEG, no data-URL prefix
    pub image: String,
    pub name: String,
    pub employee_id: String,
    pub passkey: String,
}

/// Records query body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordsQuery {
    pub action: QueryAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passkey: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<String>,
}

impl RecordsQuery {
    pub fn all(passkey: impl Into<String>) -> Self {
        Self {
            action: QueryAction::GetAttendance,
            passkey: Some(passkey.into()),
            employee_id: None,
        }
    }

    pub fn employee(employee_id: impl Into<String>) -> Self {
        Self {
            action: QueryAction::GetEmployeeAttendance,
            passkey: None,
            employee_id: Some(employee_id.into()),
        }
    }
}

/// Capture (face match) response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CaptureResponse {
    /// Matched person; absent or empty when no face matched
    #[serde(default, rename = "match", skip_serializing_if = "Option::is_none")]
    pub matched: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub similarity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CaptureResponse {
    /// The matched name, ignoring empty strings
    pub fn matched_name(&self) -> Option<&str> {
        self.matched.as_deref().filter(|m| !m.is_empty())
    }
}

/// Registration response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegistrationResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// Records query response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordsResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub records: Vec<AttendanceRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
