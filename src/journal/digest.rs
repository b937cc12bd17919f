//! Bounded text digest of the latest log entries, sent to the model as a
//! system message on every chat turn.

use std::fmt::Write as _;

use crate::journal::records::{
    ExerciseEntry, FoodEntry, LogCategory, SleepEntry, SymptomEntry, WaterEntry,
};
use crate::journal::store::{LogStore, most_recent};

pub const DIGEST_ENTRIES_PER_CATEGORY: usize = 5;
pub const DIGEST_HEADER: &str = "Recent User Logs (last 5 each):";
pub const EMPTY_SECTION_SUFFIX: &str = "None logged yet.";
/// Em dash between an entry's facts and its free text.
pub const FIELD_SEPARATOR: &str = " \u{2014} ";

/// Sleep hours keep one decimal for whole values ("7.0") and full precision otherwise.
pub fn format_hours(hours: f64) -> String {
    if hours.fract() == 0.0 {
        format!("{hours:.1}")
    } else {
        format!("{hours}")
    }
}

fn symptom_line(e: &SymptomEntry) -> String {
    format!(
        "- {}: {} (Severity {}/10){FIELD_SEPARATOR}{}",
        e.logged_at, e.name, e.severity, e.notes
    )
}

fn food_line(e: &FoodEntry) -> String {
    let photo = e
        .photo_description
        .as_deref()
        .map(|d| format!(" (Photo: {d})"))
        .unwrap_or_default();
    format!(
        "- {}: {}{FIELD_SEPARATOR}{}{} ({})",
        e.logged_at, e.meal, e.foods, photo, e.notes
    )
}

fn exercise_line(e: &ExerciseEntry) -> String {
    format!(
        "- {}: {} ({} min, Intensity {}/10){FIELD_SEPARATOR}{}",
        e.logged_at, e.kind, e.duration_minutes, e.intensity, e.notes
    )
}

fn water_line(e: &WaterEntry) -> String {
    format!(
        "- {}: {} ml{FIELD_SEPARATOR}{}",
        e.logged_at, e.amount_ml, e.notes
    )
}

fn sleep_line(e: &SleepEntry) -> String {
    format!(
        "- {}: {} hours (Quality {}/10){FIELD_SEPARATOR}{}",
        e.logged_at,
        format_hours(e.hours),
        e.quality,
        e.notes
    )
}

fn append_section<T>(out: &mut String, category: LogCategory, items: &[T], line: fn(&T) -> String) {
    let title = category.section_title();
    if items.is_empty() {
        let _ = writeln!(out, "{title}: {EMPTY_SECTION_SUFFIX}");
        return;
    }
    let _ = writeln!(out, "{title}:");
    for item in most_recent(items, DIGEST_ENTRIES_PER_CATEGORY) {
        out.push_str(&line(item));
        out.push('\n');
    }
}

/// Always renders all five sections, in a fixed order, after a leading blank line.
pub fn build_digest(store: &LogStore) -> String {
    let mut out = String::from("\n");
    out.push_str(DIGEST_HEADER);
    out.push('\n');
    append_section(&mut out, LogCategory::Symptom, store.symptoms(), symptom_line);
    append_section(&mut out, LogCategory::Food, store.foods(), food_line);
    append_section(&mut out, LogCategory::Exercise, store.exercises(), exercise_line);
    append_section(&mut out, LogCategory::Water, store.water(), water_line);
    append_section(&mut out, LogCategory::Sleep, store.sleep(), sleep_line);
    out
}
