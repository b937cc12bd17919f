//! Combined history across categories and its CSV export.
//! Photo payloads never leave the session through here.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::journal::digest::format_hours;
use crate::journal::records::{
    ExerciseEntry, FoodEntry, LogCategory, LoggedAt, SleepEntry, SymptomEntry, WaterEntry,
};
use crate::journal::store::LogStore;

const COLUMN_COUNT: usize = 14;

pub const CSV_COLUMNS: [&str; COLUMN_COUNT] = [
    "Date",
    "Type",
    "Symptom",
    "Severity",
    "Meal",
    "Foods",
    "Photo Desc",
    "Exercise",
    "Duration (min)",
    "Intensity",
    "Amount (ml)",
    "Hours",
    "Quality",
    "Notes",
];

#[derive(Debug, Clone, Copy)]
pub enum HistoryEntry<'a> {
    Symptom(&'a SymptomEntry),
    Food(&'a FoodEntry),
    Exercise(&'a ExerciseEntry),
    Water(&'a WaterEntry),
    Sleep(&'a SleepEntry),
}

impl HistoryEntry<'_> {
    pub fn category(&self) -> LogCategory {
        match self {
            HistoryEntry::Symptom(_) => LogCategory::Symptom,
            HistoryEntry::Food(_) => LogCategory::Food,
            HistoryEntry::Exercise(_) => LogCategory::Exercise,
            HistoryEntry::Water(_) => LogCategory::Water,
            HistoryEntry::Sleep(_) => LogCategory::Sleep,
        }
    }

    pub fn logged_at(&self) -> LoggedAt {
        match self {
            HistoryEntry::Symptom(e) => e.logged_at,
            HistoryEntry::Food(e) => e.logged_at,
            HistoryEntry::Exercise(e) => e.logged_at,
            HistoryEntry::Water(e) => e.logged_at,
            HistoryEntry::Sleep(e) => e.logged_at,
        }
    }

    /// One-line description for the terminal history view.
    pub fn summary(&self) -> String {
        match self {
            HistoryEntry::Symptom(e) => format!("{} (severity {}/10)", e.name, e.severity),
            HistoryEntry::Food(e) => {
                let photo = if e.photo.is_some() { " [photo]" } else { "" };
                format!("{}: {}{}", e.meal, e.foods, photo)
            }
            HistoryEntry::Exercise(e) => format!(
                "{} ({} min, intensity {}/10)",
                e.kind, e.duration_minutes, e.intensity
            ),
            HistoryEntry::Water(e) => format!("{} ml", e.amount_ml),
            HistoryEntry::Sleep(e) => {
                format!("{} hours (quality {}/10)", format_hours(e.hours), e.quality)
            }
        }
    }

    pub fn notes(&self) -> &str {
        match self {
            HistoryEntry::Symptom(e) => &e.notes,
            HistoryEntry::Food(e) => &e.notes,
            HistoryEntry::Exercise(e) => &e.notes,
            HistoryEntry::Water(e) => &e.notes,
            HistoryEntry::Sleep(e) => &e.notes,
        }
    }

    fn csv_cells(&self) -> [String; COLUMN_COUNT] {
        let mut cells: [String; COLUMN_COUNT] = Default::default();
        cells[0] = self.logged_at().to_string();
        cells[1] = self.category().label().to_string();
        match self {
            HistoryEntry::Symptom(e) => {
                cells[2] = e.name.clone();
                cells[3] = e.severity.to_string();
            }
            HistoryEntry::Food(e) => {
                cells[4] = e.meal.to_string();
                cells[5] = e.foods.clone();
                cells[6] = e.photo_description.clone().unwrap_or_default();
            }
            HistoryEntry::Exercise(e) => {
                cells[7] = e.kind.clone();
                cells[8] = e.duration_minutes.to_string();
                cells[9] = e.intensity.to_string();
            }
            HistoryEntry::Water(e) => {
                cells[10] = e.amount_ml.to_string();
            }
            HistoryEntry::Sleep(e) => {
                cells[11] = format_hours(e.hours);
                cells[12] = e.quality.to_string();
            }
        }
        cells[13] = self.notes().to_string();
        cells
    }
}

/// Every record, newest first. Equal timestamps keep category then append order.
pub fn combined_history(store: &LogStore) -> Vec<HistoryEntry<'_>> {
    let mut rows: Vec<HistoryEntry<'_>> = Vec::new();
    rows.extend(store.symptoms().iter().map(HistoryEntry::Symptom));
    rows.extend(store.foods().iter().map(HistoryEntry::Food));
    rows.extend(store.exercises().iter().map(HistoryEntry::Exercise));
    rows.extend(store.water().iter().map(HistoryEntry::Water));
    rows.extend(store.sleep().iter().map(HistoryEntry::Sleep));
    rows.sort_by(|a, b| b.logged_at().cmp(&a.logged_at()));
    rows
}

fn csv_escape(s: &str) -> String {
    let needs_quote = s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r');
    if !needs_quote {
        return s.to_string();
    }
    format!("\"{}\"", s.replace('"', "\"\""))
}

pub fn export_csv(store: &LogStore) -> String {
    let mut out = String::new();
    out.push_str(&CSV_COLUMNS.join(","));
    out.push('\n');
    for row in combined_history(store) {
        let cells: Vec<String> = row.csv_cells().iter().map(|c| csv_escape(c)).collect();
        out.push_str(&cells.join(","));
        out.push('\n');
    }
    out
}

/// Writes the export and returns the number of data rows.
pub fn write_csv(store: &LogStore, path: &Path) -> Result<usize> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(path, export_csv(store))
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(combined_history(store).len())
}
