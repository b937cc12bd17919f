use crate::error::JournalError;

pub const MAX_AGE: i64 = 120;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserProfile {
    age: Option<u8>,
    allergies: Option<String>,
}

impl UserProfile {
    pub fn new(age: Option<i64>, allergies: Option<&str>) -> Result<Self, JournalError> {
        let mut profile = Self::default();
        profile.set_age(age)?;
        profile.set_allergies(allergies);
        Ok(profile)
    }

    pub fn age(&self) -> Option<u8> {
        self.age
    }

    /// Trimmed allergy list; blank input counts as none.
    pub fn allergies(&self) -> Option<&str> {
        self.allergies.as_deref()
    }

    pub fn set_age(&mut self, age: Option<i64>) -> Result<(), JournalError> {
        self.age = match age {
            None => None,
            Some(years) if (1..=MAX_AGE).contains(&years) => Some(years as u8),
            Some(years) => {
                return Err(JournalError::OutOfRange {
                    field: "age",
                    min: 1,
                    max: MAX_AGE,
                    got: years,
                });
            }
        };
        Ok(())
    }

    pub fn set_allergies(&mut self, allergies: Option<&str>) {
        self.allergies = allergies
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .map(ToOwned::to_owned);
    }
}
