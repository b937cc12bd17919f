use base64::Engine as _;
use chrono::{Local, NaiveDateTime, Timelike};
use std::fmt;
use std::str::FromStr;

use crate::error::JournalError;

pub const LOG_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

pub const MIN_SCORE: i64 = 1;
pub const MAX_SCORE: i64 = 10;
pub const MIN_WATER_ML: i64 = 50;
pub const MIN_EXERCISE_MINUTES: i64 = 1;
pub const MAX_SLEEP_HOURS: f64 = 24.0;

/// Creation time of a record, at minute resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct LoggedAt(NaiveDateTime);

impl LoggedAt {
    pub fn now() -> Self {
        Self::from_naive(Local::now().naive_local())
    }

    pub fn from_naive(at: NaiveDateTime) -> Self {
        let truncated = at
            .with_second(0)
            .and_then(|t| t.with_nanosecond(0))
            .unwrap_or(at);
        Self(truncated)
    }
}

impl fmt::Display for LoggedAt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(LOG_TIME_FORMAT))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Meal {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl Meal {
    pub fn label(self) -> &'static str {
        match self {
            Meal::Breakfast => "Breakfast",
            Meal::Lunch => "Lunch",
            Meal::Dinner => "Dinner",
            Meal::Snack => "Snack",
        }
    }
}

impl fmt::Display for Meal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Meal {
    type Err = JournalError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "breakfast" => Ok(Meal::Breakfast),
            "lunch" => Ok(Meal::Lunch),
            "dinner" => Ok(Meal::Dinner),
            "snack" => Ok(Meal::Snack),
            _ => Err(JournalError::UnknownMeal(raw.trim().to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogCategory {
    Symptom,
    Food,
    Exercise,
    Water,
    Sleep,
}

impl LogCategory {
    pub const ALL: [LogCategory; 5] = [
        LogCategory::Symptom,
        LogCategory::Food,
        LogCategory::Exercise,
        LogCategory::Water,
        LogCategory::Sleep,
    ];

    /// Value of the `Type` column in the history table.
    pub fn label(self) -> &'static str {
        match self {
            LogCategory::Symptom => "Symptom",
            LogCategory::Food => "Food",
            LogCategory::Exercise => "Exercise",
            LogCategory::Water => "Water",
            LogCategory::Sleep => "Sleep",
        }
    }

    /// Section heading used in the digest.
    pub fn section_title(self) -> &'static str {
        match self {
            LogCategory::Symptom => "Symptoms",
            LogCategory::Food => "Food Intake",
            LogCategory::Exercise => "Exercise",
            LogCategory::Water => "Water Intake",
            LogCategory::Sleep => "Sleep",
        }
    }
}

fn check_score(field: &'static str, got: i64) -> Result<u8, JournalError> {
    if !(MIN_SCORE..=MAX_SCORE).contains(&got) {
        return Err(JournalError::OutOfRange {
            field,
            min: MIN_SCORE,
            max: MAX_SCORE,
            got,
        });
    }
    Ok(got as u8)
}

fn check_minimum(field: &'static str, min: i64, got: i64) -> Result<u32, JournalError> {
    if got < min {
        return Err(JournalError::BelowMinimum { field, min, got });
    }
    let max = i64::from(u32::MAX);
    if got > max {
        return Err(JournalError::TooLarge { field, max, got });
    }
    Ok(got as u32)
}

fn non_empty(field: &'static str, value: &str) -> Result<String, JournalError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(JournalError::Empty(field));
    }
    Ok(trimmed.to_string())
}

#[derive(Debug, Clone, PartialEq)]
pub struct SymptomEntry {
    pub logged_at: LoggedAt,
    pub name: String,
    pub severity: u8,
    pub notes: String,
}

impl SymptomEntry {
    pub fn new(
        logged_at: LoggedAt,
        name: &str,
        severity: i64,
        notes: &str,
    ) -> Result<Self, JournalError> {
        Ok(Self {
            logged_at,
            name: non_empty("symptom", name)?,
            severity: check_score("severity", severity)?,
            notes: notes.to_string(),
        })
    }
}

/// Meal photo kept as base64 text, the way it is held for the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MealPhoto {
    encoded: String,
}

impl MealPhoto {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            encoded: base64::engine::general_purpose::STANDARD.encode(bytes),
        }
    }

    pub fn encoded(&self) -> &str {
        &self.encoded
    }

    pub fn decoded_len(&self) -> usize {
        base64::engine::general_purpose::STANDARD
            .decode(self.encoded())
            .map(|bytes| bytes.len())
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FoodEntry {
    pub logged_at: LoggedAt,
    pub meal: Meal,
    pub foods: String,
    pub notes: String,
    pub photo_description: Option<String>,
    pub photo: Option<MealPhoto>,
}

impl FoodEntry {
    pub fn new(logged_at: LoggedAt, meal: Meal, foods: &str, notes: &str) -> Self {
        Self {
            logged_at,
            meal,
            foods: foods.trim().to_string(),
            notes: notes.to_string(),
            photo_description: None,
            photo: None,
        }
    }

    pub fn with_photo(mut self, photo: MealPhoto, description: Option<&str>) -> Self {
        self.photo = Some(photo);
        self.photo_description = description
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(ToOwned::to_owned);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseEntry {
    pub logged_at: LoggedAt,
    pub kind: String,
    pub duration_minutes: u32,
    pub intensity: u8,
    pub notes: String,
}

impl ExerciseEntry {
    pub fn new(
        logged_at: LoggedAt,
        kind: &str,
        duration_minutes: i64,
        intensity: i64,
        notes: &str,
    ) -> Result<Self, JournalError> {
        Ok(Self {
            logged_at,
            kind: non_empty("exercise type", kind)?,
            duration_minutes: check_minimum("duration", MIN_EXERCISE_MINUTES, duration_minutes)?,
            intensity: check_score("intensity", intensity)?,
            notes: notes.to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WaterEntry {
    pub logged_at: LoggedAt,
    pub amount_ml: u32,
    pub notes: String,
}

impl WaterEntry {
    pub fn new(logged_at: LoggedAt, amount_ml: i64, notes: &str) -> Result<Self, JournalError> {
        Ok(Self {
            logged_at,
            amount_ml: check_minimum("water amount (ml)", MIN_WATER_ML, amount_ml)?,
            notes: notes.to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SleepEntry {
    pub logged_at: LoggedAt,
    pub hours: f64,
    pub quality: u8,
    pub notes: String,
}

impl SleepEntry {
    pub fn new(
        logged_at: LoggedAt,
        hours: f64,
        quality: i64,
        notes: &str,
    ) -> Result<Self, JournalError> {
        if !(0.0..=MAX_SLEEP_HOURS).contains(&hours) {
            return Err(JournalError::SleepHours(hours));
        }
        Ok(Self {
            logged_at,
            hours,
            quality: check_score("quality", quality)?,
            notes: notes.to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LogRecord {
    Symptom(SymptomEntry),
    Food(FoodEntry),
    Exercise(ExerciseEntry),
    Water(WaterEntry),
    Sleep(SleepEntry),
}

impl LogRecord {
    pub fn category(&self) -> LogCategory {
        match self {
            LogRecord::Symptom(_) => LogCategory::Symptom,
            LogRecord::Food(_) => LogCategory::Food,
            LogRecord::Exercise(_) => LogCategory::Exercise,
            LogRecord::Water(_) => LogCategory::Water,
            LogRecord::Sleep(_) => LogCategory::Sleep,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::{
        ExerciseEntry, FoodEntry, LoggedAt, Meal, MealPhoto, SleepEntry, SymptomEntry,
        WaterEntry,
    };
    use crate::error::JournalError;
    use chrono::NaiveDate;

    pub(crate) fn at(day: u32, hour: u32, minute: u32) -> LoggedAt {
        let naive = NaiveDate::from_ymd_opt(2026, 10, day)
            .and_then(|d| d.and_hms_opt(hour, minute, 42))
            .expect("valid test time");
        LoggedAt::from_naive(naive)
    }

    #[test]
    fn logged_at_renders_minute_resolution() {
        assert_eq!(at(19, 8, 5).to_string(), "2026-10-19 08:05");
    }

    #[test]
    fn meal_parses_case_insensitively() {
        assert_eq!(" dinner ".parse::<Meal>(), Ok(Meal::Dinner));
        assert_eq!("SNACK".parse::<Meal>(), Ok(Meal::Snack));
        assert_eq!(
            "brunch".parse::<Meal>(),
            Err(JournalError::UnknownMeal("brunch".to_string()))
        );
    }

    #[test]
    fn symptom_severity_must_be_within_one_to_ten() {
        assert!(SymptomEntry::new(at(19, 8, 0), "Gas", 10, "").is_ok());
        let err = SymptomEntry::new(at(19, 8, 0), "Gas", 11, "").expect_err("out of range");
        assert_eq!(
            err,
            JournalError::OutOfRange {
                field: "severity",
                min: 1,
                max: 10,
                got: 11
            }
        );
        assert!(SymptomEntry::new(at(19, 8, 0), "  ", 3, "").is_err());
    }

    #[test]
    fn water_requires_at_least_fifty_ml() {
        assert!(WaterEntry::new(at(19, 8, 0), 49, "").is_err());
        assert_eq!(
            WaterEntry::new(at(19, 8, 0), 50, "").map(|w| w.amount_ml),
            Ok(50)
        );
    }

    #[test]
    fn amounts_beyond_u32_report_the_upper_bound() {
        let err = WaterEntry::new(at(19, 8, 0), 5_000_000_000, "").expect_err("too large");
        assert_eq!(
            err,
            JournalError::TooLarge {
                field: "water amount (ml)",
                max: 4_294_967_295,
                got: 5_000_000_000
            }
        );
        assert_eq!(
            err.to_string(),
            "water amount (ml) must be at most 4294967295, got 5000000000"
        );
        assert!(matches!(
            ExerciseEntry::new(at(19, 8, 0), "Hike", 5_000_000_000, 5, ""),
            Err(JournalError::TooLarge { field: "duration", .. })
        ));
    }

    #[test]
    fn exercise_checks_duration_and_intensity() {
        assert!(ExerciseEntry::new(at(19, 8, 0), "Yoga", 0, 5, "").is_err());
        assert!(ExerciseEntry::new(at(19, 8, 0), "Yoga", 20, 0, "").is_err());
        assert!(ExerciseEntry::new(at(19, 8, 0), "Yoga", 20, 5, "").is_ok());
    }

    #[test]
    fn sleep_hours_bounded_to_a_day() {
        assert!(SleepEntry::new(at(19, 8, 0), 0.0, 5, "").is_ok());
        assert!(SleepEntry::new(at(19, 8, 0), 24.0, 5, "").is_ok());
        assert_eq!(
            SleepEntry::new(at(19, 8, 0), 24.5, 5, ""),
            Err(JournalError::SleepHours(24.5))
        );
    }

    #[test]
    fn meal_photo_keeps_base64_and_blank_description_is_dropped() {
        let photo = MealPhoto::from_bytes(&[0x89, b'P', b'N', b'G']);
        assert_eq!(photo.encoded(), "iVBORw==");
        assert_eq!(photo.decoded_len(), 4);

        let entry = FoodEntry::new(at(19, 12, 0), Meal::Lunch, "soup", "")
            .with_photo(photo, Some("   "));
        assert!(entry.photo.is_some());
        assert_eq!(entry.photo_description, None);
    }
}
