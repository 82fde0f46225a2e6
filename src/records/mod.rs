//! Attendance Records
//!
//! In-memory record store and renderer shared by the admin and personal
//! views.
//!
//! ## Components
//!
//! - **AttendanceRecord**: one entry as returned by the recognition API
//! - **RecordCollection**: last fetched list for a view, parameterized by [`Role`]
//! - **DateFilter**: today / yesterday / week / month / quarter / all
//! - **Stats**: summary cards for each view
//! - **Export**: CSV serialization of the unfiltered list
//! - **Demo**: synthetic records used when a query fails

mod collection;
pub mod demo;
mod error;
pub mod export;
mod filter;
mod record;
pub mod render;
mod role;
mod stats;

pub use collection::{Provenance, RecordCollection, RecordView};
pub use error::{RecordsError, RecordsResult};
pub use filter::{DateFilter, MonthWindow};
pub use record::{AttendanceRecord, DEFAULT_STATUS};
pub use render::{RenderedList, RenderedRow};
pub use role::{Admin, Personal, Role, PERSONAL_ROW_STATUS};
pub use stats::{attendance_rate, AdminStats, PersonalStats};
