use anyhow::Result;
use std::env;

use crate::commands::CommandReport;
use crate::journal::advice::{MAX_OUTPUT_TOKENS, TEMPERATURE};
use crate::journal::config::load_config;
use crate::journal::paths::resolve_paths;
use crate::openai::chat_completions::completions_url;
use crate::openai::credentials::resolve_api_key;

mod generated {
    include!(concat!(env!("OUT_DIR"), "/guardian_env_allowlist.rs"));
}

pub fn run() -> Result<CommandReport> {
    let paths = resolve_paths()?;
    let mut report = CommandReport::new("status");

    report.detail(format!("build_id={}", env!("BUILD_ID")));
    report.detail(format!("guardian_home={}", paths.guardian_home.display()));
    report.detail(format!(
        "config_file={} ({})",
        paths.config_file.display(),
        if paths.config_file.exists() { "found" } else { "defaults" }
    ));
    report.detail(format!("secrets_file={}", paths.secrets_file.display()));
    report.detail(format!("logs_dir={}", paths.logs_dir.display()));

    match load_config(&paths) {
        Ok(cfg) => {
            report.detail(format!("advice.model={}", cfg.advice.model));
            report.detail(format!(
                "advice.endpoint={}",
                completions_url(&cfg.advice.base_url)
            ));
            report.detail(format!("advice.temperature={TEMPERATURE}"));
            report.detail(format!("advice.max_tokens={MAX_OUTPUT_TOKENS}"));
            report.detail(format!(
                "advice.timeout_secs={}",
                match cfg.advice.timeout_secs {
                    0 => "none".to_string(),
                    secs => secs.to_string(),
                }
            ));
            report.detail(format!("audit.enabled={}", cfg.audit.enabled));
        }
        Err(err) => report.issue(format!("config invalid: {err:#}")),
    }

    match resolve_api_key(&paths) {
        Ok(credential) => report.detail(format!("credential={}", credential.source.label())),
        Err(err) => report.issue(format!("{err:#}")),
    }

    for key in generated::GENERATED_ENV_ALLOWLIST {
        if env::var_os(key).is_some() {
            report.detail(format!("env.{key}=set"));
        }
    }

    Ok(report)
}
