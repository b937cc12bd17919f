use anyhow::{Context, Result};
use std::env;
use std::fs;
use std::path::Path;

use crate::error::GuardianError;
use crate::journal::paths::GuardianPaths;
use crate::journal::warn;

pub const API_KEY_VAR: &str = "OPENAI_API_KEY";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    SecretStore,
    Environment,
}

impl CredentialSource {
    pub fn label(self) -> &'static str {
        match self {
            CredentialSource::SecretStore => "secrets-file",
            CredentialSource::Environment => "environment",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiCredential {
    pub key: String,
    pub source: CredentialSource,
}

fn env_non_empty(var: &str) -> Option<String> {
    match env::var(var) {
        Ok(v) if !v.trim().is_empty() => Some(v.trim().to_string()),
        _ => None,
    }
}

/// Reads `OPENAI_API_KEY` from a TOML secrets file; a missing file is not an error.
pub fn read_secret_store(path: &Path) -> Result<Option<String>> {
    if !path.is_file() {
        return Ok(None);
    }
    let raw =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let table: toml::Table =
        toml::from_str(&raw).with_context(|| format!("failed to parse {}", path.display()))?;
    Ok(table
        .get(API_KEY_VAR)
        .and_then(toml::Value::as_str)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToOwned::to_owned))
}

fn pick_credential(secret: Option<String>, environment: Option<String>) -> Option<ApiCredential> {
    if let Some(key) = secret {
        return Some(ApiCredential {
            key,
            source: CredentialSource::SecretStore,
        });
    }
    environment.map(|key| ApiCredential {
        key,
        source: CredentialSource::Environment,
    })
}

/// Secrets file first, then the environment (already seeded from `.env`).
pub fn resolve_api_key(paths: &GuardianPaths) -> Result<ApiCredential> {
    let secret = match read_secret_store(&paths.secrets_file) {
        Ok(found) => found,
        Err(err) => {
            warn::emit(
                "SECRETS_UNREADABLE",
                "credentials",
                "fallback_env",
                "secrets file could not be used",
                &format!("{err:#}"),
            );
            None
        }
    };

    pick_credential(secret, env_non_empty(API_KEY_VAR)).ok_or_else(|| {
        GuardianError::MissingCredential {
            secrets_path: paths.secrets_file.display().to_string(),
        }
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::{CredentialSource, pick_credential, read_secret_store};
    use std::fs;

    #[test]
    fn secret_store_wins_over_environment() {
        let got = pick_credential(Some("sk-secret".to_string()), Some("sk-env".to_string()))
            .expect("credential");
        assert_eq!(got.key, "sk-secret");
        assert_eq!(got.source, CredentialSource::SecretStore);
    }

    #[test]
    fn environment_used_when_secret_store_empty() {
        let got = pick_credential(None, Some("sk-env".to_string())).expect("credential");
        assert_eq!(got.source, CredentialSource::Environment);
        assert!(pick_credential(None, None).is_none());
    }

    #[test]
    fn read_secret_store_handles_missing_blank_and_present_keys() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let path = tmp.path().join("secrets.toml");
        assert_eq!(read_secret_store(&path).expect("missing file"), None);

        fs::write(&path, "OPENAI_API_KEY = \"   \"\n").expect("write blank");
        assert_eq!(read_secret_store(&path).expect("blank key"), None);

        fs::write(&path, "OPENAI_API_KEY = \" sk-from-file \"\nOTHER = 1\n").expect("write key");
        assert_eq!(
            read_secret_store(&path).expect("present key").as_deref(),
            Some("sk-from-file")
        );
    }

    #[test]
    fn read_secret_store_reports_invalid_toml() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let path = tmp.path().join("secrets.toml");
        fs::write(&path, "OPENAI_API_KEY = ").expect("write broken");
        assert!(read_secret_store(&path).is_err());
    }
}
