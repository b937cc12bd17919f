use crate::journal::records::{
    ExerciseEntry, FoodEntry, LogCategory, LogRecord, SleepEntry, SymptomEntry, WaterEntry,
};

/// Append-only collections for one session. Records are never edited or removed.
#[derive(Debug, Clone, Default)]
pub struct LogStore {
    symptoms: Vec<SymptomEntry>,
    foods: Vec<FoodEntry>,
    exercises: Vec<ExerciseEntry>,
    water: Vec<WaterEntry>,
    sleep: Vec<SleepEntry>,
}

/// Tail of `items` holding at most `limit` entries, in append order.
pub fn most_recent<T>(items: &[T], limit: usize) -> &[T] {
    &items[items.len().saturating_sub(limit)..]
}

impl LogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, record: LogRecord) {
        match record {
            LogRecord::Symptom(e) => self.symptoms.push(e),
            LogRecord::Food(e) => self.foods.push(e),
            LogRecord::Exercise(e) => self.exercises.push(e),
            LogRecord::Water(e) => self.water.push(e),
            LogRecord::Sleep(e) => self.sleep.push(e),
        }
    }

    pub fn symptoms(&self) -> &[SymptomEntry] {
        &self.symptoms
    }

    pub fn foods(&self) -> &[FoodEntry] {
        &self.foods
    }

    pub fn exercises(&self) -> &[ExerciseEntry] {
        &self.exercises
    }

    pub fn water(&self) -> &[WaterEntry] {
        &self.water
    }

    pub fn sleep(&self) -> &[SleepEntry] {
        &self.sleep
    }

    pub fn count(&self, category: LogCategory) -> usize {
        match category {
            LogCategory::Symptom => self.symptoms.len(),
            LogCategory::Food => self.foods.len(),
            LogCategory::Exercise => self.exercises.len(),
            LogCategory::Water => self.water.len(),
            LogCategory::Sleep => self.sleep.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        LogCategory::ALL.iter().all(|c| self.count(*c) == 0)
    }

    /// Food entries carrying a photo, oldest first.
    pub fn foods_with_photos(&self) -> impl Iterator<Item = &FoodEntry> {
        self.foods.iter().filter(|e| e.photo.is_some())
    }
}
