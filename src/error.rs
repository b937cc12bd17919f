use thiserror::Error;

#[derive(Debug, Error)]
pub enum GuardianError {
    #[error(
        "OPENAI_API_KEY not found; add it to {secrets_path} or export it (a .env file in the working directory also works)"
    )]
    MissingCredential { secrets_path: String },
    #[error("config file invalid or unreadable: {0}")]
    InvalidConfig(String),
}

/// Rejections raised while building log records from user input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum JournalError {
    #[error("{field} must be between {min} and {max}, got {got}")]
    OutOfRange {
        field: &'static str,
        min: i64,
        max: i64,
        got: i64,
    },
    #[error("{field} must be at least {min}, got {got}")]
    BelowMinimum {
        field: &'static str,
        min: i64,
        got: i64,
    },
    #[error("{field} must be at most {max}, got {got}")]
    TooLarge {
        field: &'static str,
        max: i64,
        got: i64,
    },
    #[error("sleep duration must be between 0 and 24 hours, got {0}")]
    SleepHours(f64),
    #[error("{0} cannot be empty")]
    Empty(&'static str),
    #[error("unknown meal `{0}`; use breakfast, lunch, dinner or snack")]
    UnknownMeal(String),
}
