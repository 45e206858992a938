//! Snapshot export to JSON and CSV files

use crate::model::presentation;
use crate::model::CurrentSnapshot;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};

/// Export file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ExportFormat::Json => "JSON",
            ExportFormat::Csv => "CSV",
        }
    }
}

/// `lunar-data-YYYY-MM-DD.<ext>`
pub fn export_file_name(date: NaiveDate, format: ExportFormat) -> String {
    format!(
        "lunar-data-{}.{}",
        date.format("%Y-%m-%d"),
        format.extension()
    )
}

/// Write the snapshot into `dir`, returning the path of the new file
///
/// An existing export for the same date is overwritten.
pub fn export_snapshot(
    snapshot: &CurrentSnapshot,
    dir: &Path,
    date: NaiveDate,
    format: ExportFormat,
) -> Result<PathBuf> {
    if !dir.exists() {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create export directory {}", dir.display()))?;
    }

    let path = dir.join(export_file_name(date, format));

    match format {
        ExportFormat::Json => write_json(snapshot, &path)?,
        ExportFormat::Csv => write_csv(snapshot, &path)?,
    }

    Ok(path)
}

/// The payload as received, pretty-printed
fn write_json(snapshot: &CurrentSnapshot, path: &Path) -> Result<()> {
    let contents = serde_json::to_string_pretty(&snapshot.raw)?;
    fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// One `section,label,value` row per displayed item
fn write_csv(snapshot: &CurrentSnapshot, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    writer.write_record(["section", "label", "value"])?;
    writer.write_record(["Request", "Location", snapshot.location.as_str()])?;
    writer.write_record([
        "Request",
        "Received At",
        snapshot.received_at.to_rfc3339().as_str(),
    ])?;

    for section in presentation::data_sections(&snapshot.data) {
        for item in &section.items {
            writer.write_record([section.title, item.label, item.value.as_str()])?;
        }
    }

    writer.flush()?;
    Ok(())
}
