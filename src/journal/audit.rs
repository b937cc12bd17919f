use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::journal::paths::GuardianPaths;

/// Metadata-only event; journal text and chat content never land here.
#[derive(Debug, Clone, Serialize)]
pub struct AuditEvent {
    pub at_epoch_secs: u64,
    pub phase: String,
    pub status: String,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct AuditLog {
    enabled: bool,
    logs_dir: PathBuf,
}

impl AuditLog {
    pub fn new(paths: &GuardianPaths, enabled: bool) -> Self {
        Self {
            enabled,
            logs_dir: paths.logs_dir.clone(),
        }
    }

    #[cfg(test)]
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            logs_dir: PathBuf::new(),
        }
    }

    /// Failures surface as a warning line; they never break the caller.
    pub fn record(&self, phase: &str, status: &str, message: &str) {
        if !self.enabled {
            return;
        }
        if let Err(err) = append_event(&self.logs_dir, phase, status, message) {
            crate::journal::warn::emit(
                "AUDIT_WRITE_FAILED",
                phase,
                "skip",
                "audit log unwritable",
                &format!("{err:#}"),
            );
        }
    }
}

fn now_epoch_secs() -> Result<u64> {
    Ok(SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs())
}

pub fn append_event(logs_dir: &Path, phase: &str, status: &str, message: &str) -> Result<()> {
    fs::create_dir_all(logs_dir)
        .with_context(|| format!("failed to create {}", logs_dir.display()))?;
    let event = AuditEvent {
        at_epoch_secs: now_epoch_secs()?,
        phase: phase.to_string(),
        status: status.to_string(),
        message: message.to_string(),
    };

    let line = format!("{}\n", serde_json::to_string(&event)?);
    let path = logs_dir.join("audit.log");
    let mut file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    file.write_all(line.as_bytes())?;
    Ok(())
}
