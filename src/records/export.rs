//! CSV export
//!
//! Always serializes the full stored list, never a filtered view.

use chrono::{FixedOffset, NaiveDate};
use std::path::{Path, PathBuf};

use super::error::{RecordsError, RecordsResult};
use super::record::AttendanceRecord;
use super::role::Role;

/// Serialize records to CSV text using role `R`'s layout
pub fn to_csv<R: Role>(
    records: &[AttendanceRecord],
    owner: Option<&str>,
    zone: FixedOffset,
) -> RecordsResult<String> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(R::EXPORT_HEADERS)?;
    for record in records {
        writer.write_record(R::export_row(record, owner, zone))?;
    }
    writer.flush()?;

    let bytes = writer
        .into_inner()
        .map_err(|e| RecordsError::Io(e.into_error()))?;

    // Every cell came from a String, so the output is valid UTF-8
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Write the export file into `dir` and return its path
pub fn write_file<R: Role>(
    dir: &Path,
    records: &[AttendanceRecord],
    owner: Option<&str>,
    zone: FixedOffset,
    date: NaiveDate,
) -> RecordsResult<PathBuf> {
    if records.is_empty() {
        return Err(RecordsError::NothingToExport);
    }

    let content = to_csv::<R>(records, owner, zone)?;

    std::fs::create_dir_all(dir)?;
    let path = dir.join(R::export_file_name(owner, date));
    std::fs::write(&path, content)?;

    tracing::info!(role = R::LABEL, records = records.len(), path = ?path, "Exported attendance CSV");
    Ok(path)
}
