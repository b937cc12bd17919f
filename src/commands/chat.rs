//! Line-oriented journal session. Slash commands log records or tweak the
//! profile; any other line is sent to the model as a chat turn.

use anyhow::{Context, Result};
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use thiserror::Error;

use crate::commands::{BUSY_MESSAGE, build_advice_client, render_remedy_cards};
use crate::error::JournalError;
use crate::journal::advice::AdviceClient;
use crate::journal::audit::AuditLog;
use crate::journal::export::{combined_history, write_csv};
use crate::journal::profile::UserProfile;
use crate::journal::records::{
    ExerciseEntry, FoodEntry, LogRecord, LoggedAt, MealPhoto, SleepEntry, SymptomEntry,
    WaterEntry,
};
use crate::journal::session::JournalSession;
use crate::journal::store::most_recent;

pub const DEFAULT_EXPORT_FILE: &str = "gutguardian_logs.csv";
const RECENT_PHOTO_LIMIT: usize = 6;

const HELP: &str = "\
Log commands (fields separated by `|`, [..] optional; the last field may contain `|`):
  /symptom <name> | <severity 1-10> [| notes]
  /food <breakfast|lunch|dinner|snack> | <foods> [| notes [| photo path [| photo description]]]
  /exercise <type> | <minutes> | <intensity 1-10> [| notes]
  /water <ml, at least 50> [| notes]
  /sleep <hours 0-24> | <quality 1-10> [| notes]
Profile:
  /age <years|clear>    /allergies <list|clear>    /profile
Views:
  /digest   /history   /remedies   /export [path]   /help   /quit
Anything else is sent as a chat message.";

#[derive(Debug, Error)]
pub enum InputError {
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error("{field} must be a number, got `{raw}`")]
    NotANumber { field: &'static str, raw: String },
    #[error("unknown command `{0}`; type /help")]
    UnknownCommand(String),
    #[error(transparent)]
    Journal(#[from] JournalError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReplCommand {
    Log(LogRecord),
    Food {
        entry: FoodEntry,
        photo_path: Option<PathBuf>,
        photo_description: Option<String>,
    },
    Age(Option<i64>),
    Allergies(Option<String>),
    Profile,
    Digest,
    History,
    Remedies,
    Export(PathBuf),
    Help,
    Quit,
    Chat(String),
    Empty,
}

/// Splits into at most `max` fields; the last one keeps any further `|` verbatim.
fn fields(rest: &str, max: usize) -> Vec<&str> {
    if rest.trim().is_empty() {
        return Vec::new();
    }
    rest.splitn(max, '|').map(str::trim).collect()
}

fn field<'a>(parts: &[&'a str], idx: usize) -> &'a str {
    parts.get(idx).copied().unwrap_or("")
}

fn optional_field(parts: &[&str], idx: usize) -> Option<String> {
    Some(field(parts, idx))
        .filter(|v| !v.is_empty())
        .map(ToOwned::to_owned)
}

fn parse_int(field: &'static str, raw: &str) -> Result<i64, InputError> {
    raw.trim().parse::<i64>().map_err(|_| InputError::NotANumber {
        field,
        raw: raw.trim().to_string(),
    })
}

fn parse_float(field: &'static str, raw: &str) -> Result<f64, InputError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| InputError::NotANumber {
            field,
            raw: raw.trim().to_string(),
        })
}

fn is_clear(raw: &str) -> bool {
    raw.is_empty() || raw.eq_ignore_ascii_case("clear") || raw.eq_ignore_ascii_case("none")
}

pub fn parse_line(line: &str, now: LoggedAt) -> Result<ReplCommand, InputError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(ReplCommand::Empty);
    }
    if !trimmed.starts_with('/') {
        return Ok(ReplCommand::Chat(trimmed.to_string()));
    }

    let (word, rest) = trimmed
        .split_once(char::is_whitespace)
        .unwrap_or((trimmed, ""));
    let rest = rest.trim();

    match word.to_ascii_lowercase().as_str() {
        "/symptom" => {
            let parts = fields(rest, 3);
            if parts.len() < 2 {
                return Err(InputError::Usage("/symptom <name> | <severity 1-10> [| notes]"));
            }
            let severity = parse_int("severity", parts[1])?;
            let entry = SymptomEntry::new(now, parts[0], severity, field(&parts, 2))?;
            Ok(ReplCommand::Log(LogRecord::Symptom(entry)))
        }
        "/food" => {
            let parts = fields(rest, 5);
            if parts.len() < 2 || parts[1].is_empty() {
                return Err(InputError::Usage(
                    "/food <meal> | <foods> [| notes [| photo path [| photo description]]]",
                ));
            }
            let meal = parts[0].parse()?;
            Ok(ReplCommand::Food {
                entry: FoodEntry::new(now, meal, parts[1], field(&parts, 2)),
                photo_path: optional_field(&parts, 3).map(PathBuf::from),
                photo_description: optional_field(&parts, 4),
            })
        }
        "/exercise" => {
            let parts = fields(rest, 4);
            if parts.len() < 3 {
                return Err(InputError::Usage(
                    "/exercise <type> | <minutes> | <intensity 1-10> [| notes]",
                ));
            }
            let minutes = parse_int("duration", parts[1])?;
            let intensity = parse_int("intensity", parts[2])?;
            let entry = ExerciseEntry::new(now, parts[0], minutes, intensity, field(&parts, 3))?;
            Ok(ReplCommand::Log(LogRecord::Exercise(entry)))
        }
        "/water" => {
            let parts = fields(rest, 2);
            if parts.is_empty() {
                return Err(InputError::Usage("/water <ml> [| notes]"));
            }
            let amount = parse_int("water amount (ml)", parts[0])?;
            let entry = WaterEntry::new(now, amount, field(&parts, 1))?;
            Ok(ReplCommand::Log(LogRecord::Water(entry)))
        }
        "/sleep" => {
            let parts = fields(rest, 3);
            if parts.len() < 2 {
                return Err(InputError::Usage("/sleep <hours> | <quality 1-10> [| notes]"));
            }
            let hours = parse_float("sleep hours", parts[0])?;
            let quality = parse_int("quality", parts[1])?;
            let entry = SleepEntry::new(now, hours, quality, field(&parts, 2))?;
            Ok(ReplCommand::Log(LogRecord::Sleep(entry)))
        }
        "/age" => {
            if is_clear(rest) {
                return Ok(ReplCommand::Age(None));
            }
            Ok(ReplCommand::Age(Some(parse_int("age", rest)?)))
        }
        "/allergies" => {
            if is_clear(rest) {
                return Ok(ReplCommand::Allergies(None));
            }
            Ok(ReplCommand::Allergies(Some(rest.to_string())))
        }
        "/profile" => Ok(ReplCommand::Profile),
        "/digest" => Ok(ReplCommand::Digest),
        "/history" => Ok(ReplCommand::History),
        "/remedies" => Ok(ReplCommand::Remedies),
        "/export" => {
            let path = if rest.is_empty() { DEFAULT_EXPORT_FILE } else { rest };
            Ok(ReplCommand::Export(PathBuf::from(path)))
        }
        "/help" => Ok(ReplCommand::Help),
        "/quit" | "/exit" => Ok(ReplCommand::Quit),
        other => Err(InputError::UnknownCommand(other.to_string())),
    }
}

fn describe_profile(profile: &UserProfile) -> String {
    format!(
        "Age: {} | Allergies: {}",
        profile
            .age()
            .map(|a| a.to_string())
            .unwrap_or_else(|| "Not provided".to_string()),
        profile.allergies().unwrap_or("None reported")
    )
}

fn write_history<W: Write>(out: &mut W, session: &JournalSession) -> Result<()> {
    if session.logs().is_empty() {
        writeln!(out, "No logs yet.")?;
        return Ok(());
    }
    for row in combined_history(session.logs()) {
        let notes = row.notes();
        if notes.is_empty() {
            writeln!(out, "{} | {} | {}", row.logged_at(), row.category().label(), row.summary())?;
        } else {
            writeln!(
                out,
                "{} | {} | {} | {}",
                row.logged_at(),
                row.category().label(),
                row.summary(),
                notes
            )?;
        }
    }

    let photos: Vec<_> = session.logs().foods_with_photos().collect();
    if !photos.is_empty() {
        writeln!(out, "Recent Meal Photos:")?;
        for entry in most_recent(&photos, RECENT_PHOTO_LIMIT) {
            let bytes = entry.photo.as_ref().map(MealPhoto::decoded_len).unwrap_or(0);
            writeln!(out, "  {} - {} ({bytes} bytes)", entry.logged_at, entry.meal)?;
        }
    }
    Ok(())
}

/// Reads the photo now so the record only ever holds encoded bytes.
fn attach_photo(
    entry: FoodEntry,
    photo_path: Option<PathBuf>,
    description: Option<String>,
) -> Result<FoodEntry> {
    let Some(path) = photo_path else {
        return Ok(entry);
    };
    let bytes =
        fs::read(&path).with_context(|| format!("failed to read photo {}", path.display()))?;
    Ok(entry.with_photo(MealPhoto::from_bytes(&bytes), description.as_deref()))
}

pub struct ReplContext<'a> {
    pub client: &'a AdviceClient,
    pub audit: &'a AuditLog,
}

/// Returns `false` once the user asked to quit.
fn handle_line<W: Write>(
    out: &mut W,
    line: &str,
    session: &mut JournalSession,
    ctx: &ReplContext<'_>,
) -> Result<bool> {
    let command = match parse_line(line, LoggedAt::now()) {
        Ok(command) => command,
        Err(err) => {
            writeln!(out, "! {err}")?;
            return Ok(true);
        }
    };

    match command {
        ReplCommand::Empty => {}
        ReplCommand::Quit => return Ok(false),
        ReplCommand::Help => writeln!(out, "{HELP}")?,
        ReplCommand::Log(record) => {
            let category = session.log(record);
            ctx.audit
                .record("log", "ok", &format!("category={}", category.label()));
            writeln!(out, "{} logged!", category.label())?;
        }
        ReplCommand::Food {
            entry,
            photo_path,
            photo_description,
        } => match attach_photo(entry, photo_path, photo_description) {
            Ok(entry) => {
                let has_photo = entry.photo.is_some();
                let category = session.log(LogRecord::Food(entry));
                ctx.audit.record(
                    "log",
                    "ok",
                    &format!("category={} photo={has_photo}", category.label()),
                );
                writeln!(out, "Meal logged!")?;
            }
            Err(err) => writeln!(out, "! {err:#}")?,
        },
        ReplCommand::Age(age) => match session.profile_mut().set_age(age) {
            Ok(()) => writeln!(out, "{}", describe_profile(session.profile()))?,
            Err(err) => writeln!(out, "! {err}")?,
        },
        ReplCommand::Allergies(allergies) => {
            session.profile_mut().set_allergies(allergies.as_deref());
            writeln!(out, "{}", describe_profile(session.profile()))?;
        }
        ReplCommand::Profile => writeln!(out, "{}", describe_profile(session.profile()))?,
        ReplCommand::Digest => write!(out, "{}", session.digest())?,
        ReplCommand::History => write_history(out, session)?,
        ReplCommand::Remedies => {
            let cards = render_remedy_cards(&session.chat().latest_remedies());
            if cards.is_empty() {
                writeln!(out, "No remedies suggested yet.")?;
            } else {
                write!(out, "{cards}")?;
            }
        }
        ReplCommand::Export(path) => match write_csv(session.logs(), &path) {
            Ok(rows) => {
                ctx.audit.record("export", "ok", &format!("rows={rows}"));
                writeln!(out, "Exported {rows} log(s) to {}", path.display())?;
            }
            Err(err) => writeln!(out, "! {err:#}")?,
        },
        ReplCommand::Chat(input) => {
            writeln!(out, "{BUSY_MESSAGE}")?;
            out.flush()?;
            let outcome = session.ask(&input, ctx.client);
            writeln!(out, "{}", outcome.reply)?;
            let cards = render_remedy_cards(&outcome.remedies);
            if !cards.is_empty() {
                writeln!(out)?;
                write!(out, "{cards}")?;
            }
        }
    }
    Ok(true)
}

pub fn run_session<R: BufRead, W: Write>(
    input: R,
    out: &mut W,
    session: &mut JournalSession,
    ctx: &ReplContext<'_>,
) -> Result<()> {
    if let Some(greeting) = session.chat().messages().first() {
        writeln!(out, "{}", greeting.content)?;
    }
    writeln!(out, "Not medical advice. Consult a doctor. Data is session-only.")?;
    write!(out, "> ")?;
    out.flush()?;

    for line in input.lines() {
        let line = line.context("failed to read input")?;
        if !handle_line(out, &line, session, ctx)? {
            break;
        }
        write!(out, "> ")?;
        out.flush()?;
    }
    writeln!(out)?;
    ctx.audit.record(
        "session",
        "closed",
        &format!("messages={}", session.chat().messages().len()),
    );
    Ok(())
}

pub fn run(profile: &UserProfile) -> Result<()> {
    let (client, audit) = build_advice_client()?;
    let mut session = JournalSession::new(profile.clone());
    let ctx = ReplContext {
        client: &client,
        audit: &audit,
    };
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    run_session(stdin.lock(), &mut stdout, &mut session, &ctx)
}
