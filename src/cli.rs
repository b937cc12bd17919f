use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use crate::commands::{self, CommandReport};
use crate::journal::profile::UserProfile;

/// Session-only gut health journal with remedy suggestions
#[derive(Parser, Debug)]
#[command(name = "gutguardian", author, version, about, long_about = None)]
pub struct Cli {
    /// Print machine-readable JSON instead of text
    #[arg(long, global = true, default_value_t = false)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ProfileArgs {
    /// Age in years (1-120)
    #[arg(long, value_parser = clap::value_parser!(i64).range(1..=120))]
    pub age: Option<i64>,

    /// Comma-separated allergies, e.g. "chamomile, dairy"
    #[arg(long)]
    pub allergies: Option<String>,
}

impl ProfileArgs {
    pub fn to_profile(&self) -> Result<UserProfile> {
        Ok(UserProfile::new(self.age, self.allergies.as_deref())?)
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start an interactive journal session (logs and chat on stdin)
    Chat(ProfileArgs),

    /// Ask a single question with an empty journal
    Ask {
        /// The question to send
        prompt: String,

        #[command(flatten)]
        profile: ProfileArgs,
    },

    /// Print the system prompt that would be sent for this profile
    Prompt(ProfileArgs),

    /// Show resolved paths, config and credential availability
    Status,
}

fn print_report(report: &CommandReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        println!("{}: {}", report.command, if report.ok { "ok" } else { "issues" });
        for detail in &report.details {
            println!("  {detail}");
        }
        for issue in &report.issues {
            println!("  issue: {issue}");
        }
    }
    if !report.ok {
        anyhow::bail!("{} reported {} issue(s)", report.command, report.issues.len());
    }
    Ok(())
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Chat(profile) => commands::chat::run(&profile.to_profile()?),
        Command::Ask { prompt, profile } => {
            commands::ask::run(&prompt, &profile.to_profile()?, cli.json)
        }
        Command::Prompt(profile) => {
            commands::prompt::run(&profile.to_profile()?, cli.json)
        }
        Command::Status => print_report(&commands::status::run()?, cli.json),
    }
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command};
    use clap::Parser;

    #[test]
    fn ask_accepts_profile_flags() {
        let cli = Cli::try_parse_from([
            "gutguardian",
            "ask",
            "bloated after meals",
            "--age",
            "35",
            "--allergies",
            "chamomile",
        ])
        .expect("parse");
        let Command::Ask { prompt, profile } = cli.command else {
            panic!("expected ask");
        };
        assert_eq!(prompt, "bloated after meals");
        assert_eq!(profile.age, Some(35));
        assert_eq!(profile.allergies.as_deref(), Some("chamomile"));
    }

    #[test]
    fn age_outside_range_is_rejected_by_parser() {
        assert!(Cli::try_parse_from(["gutguardian", "chat", "--age", "0"]).is_err());
        assert!(Cli::try_parse_from(["gutguardian", "chat", "--age", "121"]).is_err());
    }

    #[test]
    fn json_flag_is_global() {
        let cli = Cli::try_parse_from(["gutguardian", "status", "--json"]).expect("parse");
        assert!(cli.json);
    }
}
