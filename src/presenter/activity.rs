//! Recent activity feed

use serde::Serialize;
use std::collections::VecDeque;
use std::sync::Mutex;

/// How many entries the feed keeps
pub const MAX_ACTIVITIES: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Attendance,
    Registration,
}

impl ActivityKind {
    pub fn label(&self) -> &'static str {
        match self {
            ActivityKind::Attendance => "Attendance Marked",
            ActivityKind::Registration => "Face Registered",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Activity {
    pub name: String,
    pub kind: ActivityKind,
    /// Local time, already formatted
    pub time: String,
}

impl Activity {
    pub fn headline(&self) -> String {
        format!("{} - {}", self.name, self.kind.label())
    }
}

/// Newest-first list of the last few kiosk actions
#[derive(Debug, Default)]
pub struct RecentActivity {
    entries: Mutex<VecDeque<Activity>>,
}

impl RecentActivity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, name: impl Into<String>, kind: ActivityKind, time: impl Into<String>) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.push_front(Activity {
            name: name.into(),
            kind,
            time: time.into(),
        });
        entries.truncate(MAX_ACTIVITIES);
    }

    pub fn entries(&self) -> Vec<Activity> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_latest_five() {
        let feed = RecentActivity::new();
        for i in 0..7 {
            feed.push(format!("Person {}", i), ActivityKind::Attendance, "09:00");
        }

        let entries = feed.entries();
        assert_eq!(entries.len(), 5);
        assert_eq!(entries[0].name, "Person 6");
        assert_eq!(entries[4].name, "Person 2");
    }

    #[test]
    fn test_headline() {
        let feed = RecentActivity::new();
        feed.push("Asha Rao (EMP042)", ActivityKind::Registration, "09:00");
        assert_eq!(feed.entries()[0].headline(), "Asha Rao (EMP042) - Face Registered");
    }
}
