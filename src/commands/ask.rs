use anyhow::Result;
use serde::Serialize;

use crate::commands::{BUSY_MESSAGE, RemedyCard, build_advice_client, render_remedy_cards};
use crate::journal::profile::UserProfile;
use crate::journal::session::JournalSession;

#[derive(Debug, Serialize)]
struct AskOutput {
    reply: String,
    remedies: Vec<RemedyCard>,
}

pub fn run(prompt: &str, profile: &UserProfile, json: bool) -> Result<()> {
    let (client, _audit) = build_advice_client()?;
    let mut session = JournalSession::new(profile.clone());

    if !json {
        eprintln!("{BUSY_MESSAGE}");
    }
    let outcome = session.ask(prompt, &client);

    if json {
        let out = AskOutput {
            remedies: outcome.remedies.iter().map(RemedyCard::from).collect(),
            reply: outcome.reply,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("{}", outcome.reply);
    let cards = render_remedy_cards(&outcome.remedies);
    if !cards.is_empty() {
        println!();
        print!("{cards}");
    }
    Ok(())
}
