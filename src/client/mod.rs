//! Recognition API Integration
//!
//! The kiosk talks to a single remote endpoint that does all matching and
//! storage. This module owns the wire format and the HTTP client.
//!
//! - **AttendanceApi**: the seam the kiosk depends on
//! - **AttendanceClient**: reqwest implementation
//! - **dto**: request/response bodies

mod client;
mod dto;
mod error;

pub use client::{AttendanceApi, AttendanceClient};
pub use dto::{
    CaptureResponse, QueryAction, RecordsQuery, RecordsResponse, RegistrationRequest,
    RegistrationResponse,
};
pub use error::{ClientError, ClientResult};
