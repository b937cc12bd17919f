use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;

use crate::error::GuardianError;
use crate::journal::paths::GuardianPaths;

pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdviceConfig {
    pub model: String,
    pub base_url: String,
    /// Zero disables the HTTP timeout; a hung call then hangs the turn.
    pub timeout_secs: u64,
}

impl Default for AdviceConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    pub enabled: bool,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GuardianConfig {
    pub advice: AdviceConfig,
    pub audit: AuditConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct PartialGuardianConfig {
    advice: Option<AdviceConfig>,
    audit: Option<AuditConfig>,
}

fn env_or_u64(var: &str, fallback: u64) -> u64 {
    match env::var(var) {
        Ok(v) => v.trim().parse::<u64>().ok().unwrap_or(fallback),
        Err(_) => fallback,
    }
}

fn env_or_bool(var: &str, fallback: bool) -> bool {
    match env::var(var) {
        Ok(v) => match v.trim() {
            "1" | "true" | "TRUE" | "yes" | "on" => true,
            "0" | "false" | "FALSE" | "no" | "off" => false,
            _ => fallback,
        },
        Err(_) => fallback,
    }
}

fn env_or_string(var: &str, fallback: &str) -> String {
    match env::var(var) {
        Ok(v) if !v.trim().is_empty() => v.trim().to_string(),
        _ => fallback.to_string(),
    }
}

fn validate(cfg: &GuardianConfig) -> Result<()> {
    if cfg.advice.model.trim().is_empty() {
        return Err(GuardianError::InvalidConfig("advice model cannot be empty".to_string()).into());
    }
    let base = cfg.advice.base_url.trim();
    if !(base.starts_with("http://") || base.starts_with("https://")) {
        return Err(GuardianError::InvalidConfig(format!(
            "advice base_url must start with http:// or https://, got `{base}`"
        ))
        .into());
    }
    Ok(())
}

fn merge_file_config(paths: &GuardianPaths, base: &mut GuardianConfig) -> Result<()> {
    let path = &paths.config_file;
    if !path.exists() {
        return Ok(());
    }

    let raw = fs::read_to_string(path).map_err(|err| {
        GuardianError::InvalidConfig(format!("failed to read {}: {err}", path.display()))
    })?;
    let parsed: PartialGuardianConfig = toml::from_str(&raw).map_err(|err| {
        GuardianError::InvalidConfig(format!("failed to parse {}: {err}", path.display()))
    })?;
    if let Some(advice) = parsed.advice {
        base.advice = advice;
    }
    if let Some(audit) = parsed.audit {
        base.audit = audit;
    }
    Ok(())
}

pub fn load_config(paths: &GuardianPaths) -> Result<GuardianConfig> {
    let mut cfg = GuardianConfig::default();
    merge_file_config(paths, &mut cfg)?;

    cfg.advice.model = env_or_string("GUTGUARDIAN_MODEL", &cfg.advice.model);
    cfg.advice.base_url = env_or_string("GUTGUARDIAN_BASE_URL", &cfg.advice.base_url);
    cfg.advice.timeout_secs = env_or_u64("GUTGUARDIAN_TIMEOUT_SECS", cfg.advice.timeout_secs);
    cfg.audit.enabled = env_or_bool("GUTGUARDIAN_AUDIT_ENABLED", cfg.audit.enabled);

    validate(&cfg)?;
    Ok(cfg)
}
