use anyhow::Result;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct GuardianPaths {
    pub guardian_home: PathBuf,
    pub config_file: PathBuf,
    pub secrets_file: PathBuf,
    pub logs_dir: PathBuf,
}

fn required_home_dir() -> Result<PathBuf> {
    if let Some(home) = dirs::home_dir() {
        return Ok(home);
    }
    Err(anyhow::anyhow!("HOME directory could not be resolved"))
}

fn env_or_default_path(var: &str, fallback: PathBuf) -> PathBuf {
    match env::var(var) {
        Ok(v) if !v.trim().is_empty() => PathBuf::from(v.trim()),
        _ => fallback,
    }
}

pub fn resolve_paths() -> Result<GuardianPaths> {
    let guardian_home = match env::var("GUTGUARDIAN_HOME") {
        Ok(v) if !v.trim().is_empty() => PathBuf::from(v.trim()),
        _ => required_home_dir()?.join(".gutguardian"),
    };

    let config_file = env_or_default_path(
        "GUTGUARDIAN_CONFIG_PATH",
        guardian_home.join("gutguardian.toml"),
    );
    let secrets_file = env_or_default_path(
        "GUTGUARDIAN_SECRETS_PATH",
        guardian_home.join("secrets.toml"),
    );
    let logs_dir = env_or_default_path("GUTGUARDIAN_LOGS_DIR", guardian_home.join("logs"));

    Ok(GuardianPaths {
        guardian_home,
        config_file,
        secrets_file,
        logs_dir,
    })
}
