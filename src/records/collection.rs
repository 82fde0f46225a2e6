//! Record collection
//!
//! Holds the last fetched record list for one view. Loading replaces the
//! list wholesale; filtering and searching return views and never touch it.

use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use super::error::RecordsResult;
use super::export;
use super::filter::DateFilter;
use super::record::AttendanceRecord;
use super::render::{self, RenderedList};
use super::role::{Admin, Personal, Role};
use super::stats::{AdminStats, PersonalStats};

/// Where the current list came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    #[default]
    Live,
    /// Synthesized locally after a failed query
    Demo,
}

/// A rendered view plus the title above it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordView {
    pub title: String,
    pub list: RenderedList,
}

/// The in-memory record list behind one view
#[derive(Debug, Clone)]
pub struct RecordCollection<R: Role> {
    records: Vec<AttendanceRecord>,
    owner: Option<String>,
    provenance: Provenance,
    loaded_at: Option<DateTime<Utc>>,
    _role: PhantomData<R>,
}

impl<R: Role> Default for RecordCollection<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Role> RecordCollection<R> {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            owner: None,
            provenance: Provenance::Live,
            loaded_at: None,
            _role: PhantomData,
        }
    }

    /// Replace the whole list
    pub fn load(&mut self, records: Vec<AttendanceRecord>, provenance: Provenance) {
        tracing::debug!(role = R::LABEL, count = records.len(), ?provenance, "Loaded records");
        self.records = records;
        self.provenance = provenance;
        self.loaded_at = Some(Utc::now());
    }

    pub fn clear(&mut self) {
        self.records.clear();
        self.owner = None;
        self.provenance = Provenance::Live;
        self.loaded_at = None;
    }

    pub fn records(&self) -> &[AttendanceRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Employee id the list was fetched for (personal view)
    pub fn owner(&self) -> Option<&str> {
        self.owner.as_deref()
    }

    pub fn provenance(&self) -> Provenance {
        self.provenance
    }

    pub fn loaded_at(&self) -> Option<DateTime<Utc>> {
        self.loaded_at
    }

    /// Newest first, stable
    pub fn sorted(&self) -> Vec<&AttendanceRecord> {
        render::sort_newest_first(&self.records)
    }

    /// Records inside the filter window, in stored order
    pub fn filter(&self, filter: DateFilter, now: DateTime<FixedOffset>) -> Vec<&AttendanceRecord> {
        self.records
            .iter()
            .filter(|r| match r.instant() {
                Some(at) => filter.matches(at, now, R::MONTH_WINDOW),
                None => filter == DateFilter::All,
            })
            .collect()
    }

    /// Render the whole list
    pub fn render(&self, zone: FixedOffset) -> RenderedList {
        render::rows::<R, _>(&self.records, zone)
    }

    /// Render a filtered view with its title
    pub fn filtered_view(&self, filter: DateFilter, now: DateTime<FixedOffset>) -> RecordView {
        let matching = self.filter(filter, now);
        RecordView {
            title: R::filtered_title(matching.len()),
            list: render::rows::<R, _>(matching, now.timezone()),
        }
    }

    /// Serialize the full, unfiltered list
    pub fn to_csv(&self, zone: FixedOffset) -> RecordsResult<String> {
        export::to_csv::<R>(&self.records, self.owner(), zone)
    }

    /// Write the full, unfiltered list to `dir`.
    ///
    /// Rows use the display zone; the file name carries the UTC date.
    pub fn export(&self, dir: &Path, now: DateTime<FixedOffset>) -> RecordsResult<PathBuf> {
        export::write_file::<R>(
            dir,
            &self.records,
            self.owner(),
            now.timezone(),
            now.with_timezone(&Utc).date_naive(),
        )
    }
}

impl RecordCollection<Admin> {
    /// Case-insensitive substring match on name or employee id
    pub fn search(&self, term: &str) -> Vec<&AttendanceRecord> {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return self.records.iter().collect();
        }

        self.records
            .iter()
            .filter(|r| {
                r.name.to_lowercase().contains(&term)
                    || r
                        .employee_id
                        .as_deref()
                        .is_some_and(|id| id.to_lowercase().contains(&term))
            })
            .collect()
    }

    /// Render search results with their title
    pub fn search_view(&self, term: &str, zone: FixedOffset) -> RecordView {
        let trimmed = term.trim().to_lowercase();
        let matching = self.search(&trimmed);

        let title = if trimmed.is_empty() {
            "All Attendance Records".to_string()
        } else {
            format!("Search Results for \"{}\" ({} found)", trimmed, matching.len())
        };

        RecordView {
            title,
            list: render::rows::<Admin, _>(matching, zone),
        }
    }

    pub fn stats(&self, now: DateTime<FixedOffset>) -> AdminStats {
        AdminStats::compute(&self.records, now)
    }
}

impl RecordCollection<Personal> {
    /// Replace the list with records fetched for `employee_id`
    pub fn load_for(
        &mut self,
        employee_id: impl Into<String>,
        records: Vec<AttendanceRecord>,
        provenance: Provenance,
    ) {
        self.owner = Some(employee_id.into());
        self.load(records, provenance);
    }

    pub fn stats(&self, now: DateTime<FixedOffset>, working_days_per_month: u32) -> PersonalStats {
        PersonalStats::compute(&self.records, now, working_days_per_month)
    }
}
