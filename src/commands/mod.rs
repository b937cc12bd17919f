pub mod ask;
pub mod chat;
pub mod prompt;
pub mod status;

use anyhow::Result;
use serde::Serialize;
use std::fmt::Write as _;

use crate::journal::advice::AdviceClient;
use crate::journal::audit::AuditLog;
use crate::journal::config::load_config;
use crate::journal::paths::resolve_paths;
use crate::journal::remedy::Remedy;
use crate::openai::chat_completions::OpenAiChatBackend;
use crate::openai::credentials::resolve_api_key;

pub const BUSY_MESSAGE: &str = "Analyzing your logs and suggesting remedies...";

#[derive(Debug, Clone, Serialize)]
pub struct CommandReport {
    pub command: String,
    pub ok: bool,
    pub details: Vec<String>,
    pub issues: Vec<String>,
}

impl CommandReport {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            ok: true,
            details: Vec::new(),
            issues: Vec::new(),
        }
    }

    pub fn detail(&mut self, text: impl Into<String>) {
        self.details.push(text.into());
    }

    pub fn issue(&mut self, text: impl Into<String>) {
        self.ok = false;
        self.issues.push(text.into());
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RemedyCard {
    pub name: String,
    pub reason: String,
    pub image: &'static str,
}

impl From<&Remedy> for RemedyCard {
    fn from(remedy: &Remedy) -> Self {
        Self {
            name: remedy.name.clone(),
            reason: remedy.reason.clone(),
            image: remedy.image(),
        }
    }
}

/// Resolves config and the API key up front; a missing key stops the command here.
pub fn build_advice_client() -> Result<(AdviceClient, AuditLog)> {
    let paths = resolve_paths()?;
    let cfg = load_config(&paths)?;
    let credential = resolve_api_key(&paths)?;
    let audit = AuditLog::new(&paths, cfg.audit.enabled);
    audit.record(
        "startup",
        "ok",
        &format!(
            "model={} credential_source={}",
            cfg.advice.model,
            credential.source.label()
        ),
    );
    let backend = OpenAiChatBackend::new(credential.key, &cfg.advice);
    let client = AdviceClient::new(Box::new(backend), cfg.advice.model.clone(), audit.clone());
    Ok((client, audit))
}

/// Empty when there are no remedies, so plain replies render unchanged.
pub fn render_remedy_cards(remedies: &[Remedy]) -> String {
    if remedies.is_empty() {
        return String::new();
    }
    let mut out = String::from("### Recommended Natural Remedies\n");
    for remedy in remedies {
        let _ = writeln!(out, "[{}] {}", remedy.name, remedy.image());
        let _ = writeln!(out, "  Why this helps you: {}", remedy.reason);
    }
    out
}
