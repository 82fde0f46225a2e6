//! Kiosk session state
//!
//! The processing flag and the two record lists live here; no globals.

use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

use crate::records::{Admin, Personal, RecordCollection};

/// Mutable state shared by kiosk actions
#[derive(Default)]
pub struct SessionState {
    processing: AtomicBool,
    attendance: RwLock<RecordCollection<Admin>>,
    employee: RwLock<RecordCollection<Personal>>,
}

/// Clears the processing flag when dropped
#[must_use = "processing ends when the guard is dropped"]
pub struct ProcessingGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for ProcessingGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the processing slot; `None` if a capture or registration is in flight
    pub fn try_begin(&self) -> Option<ProcessingGuard<'_>> {
        self.processing
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| ProcessingGuard {
                flag: &self.processing,
            })
    }

    pub fn is_processing(&self) -> bool {
        self.processing.load(Ordering::Acquire)
    }

    /// Admin view records
    pub fn attendance(&self) -> &RwLock<RecordCollection<Admin>> {
        &self.attendance
    }

    /// Self-service view records
    pub fn employee(&self) -> &RwLock<RecordCollection<Personal>> {
        &self.employee
    }

    /// Employee id of the active self-service lookup
    pub async fn current_employee_id(&self) -> Option<String> {
        self.employee.read().await.owner().map(str::to_string)
    }
}
