use crate::app_config::AppConfig;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the
/// process. Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// The core parsing/validation logic is decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup, without
/// `set_var`/`remove_var`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let record_code = require("DOCWATCH_RECORD_CODE")?;
    let portal_base_url = require("DOCWATCH_PORTAL_BASE_URL")?
        .trim_end_matches('/')
        .to_string();

    let fallback_status_path = or_default(
        "DOCWATCH_FALLBACK_STATUS_PATH",
        "/Home/CurrentSessionStatus",
    );

    let check_interval_secs = parse_u64("DOCWATCH_CHECK_INTERVAL_SECS", "3600")?;
    let fetch_timeout_secs = parse_u64("DOCWATCH_FETCH_TIMEOUT_SECS", "30")?;
    let fallback_timeout_secs = parse_u64("DOCWATCH_FALLBACK_TIMEOUT_SECS", "20")?;
    let translate_timeout_secs = parse_u64("DOCWATCH_TRANSLATE_TIMEOUT_SECS", "10")?;
    let fetch_max_retries = parse_u32("DOCWATCH_FETCH_MAX_RETRIES", "2")?;
    let fetch_backoff_base_secs = parse_u64("DOCWATCH_FETCH_BACKOFF_BASE_SECS", "5")?;
    let min_container_len = parse_usize("DOCWATCH_MIN_CONTAINER_LEN", "100")?;

    let vocab_path = lookup("DOCWATCH_VOCAB_PATH").ok().map(PathBuf::from);
    let vocab_poll_interval_secs = parse_u64("DOCWATCH_VOCAB_POLL_INTERVAL_SECS", "120")?;

    let baseline_path = PathBuf::from(or_default("DOCWATCH_BASELINE_PATH", "./last_status.txt"));
    let page_dump_dir = lookup("DOCWATCH_PAGE_DUMP_DIR").ok().map(PathBuf::from);

    let translate_url = or_default(
        "DOCWATCH_TRANSLATE_URL",
        "https://translate.googleapis.com/translate_a/single",
    );
    let translate_source_lang = or_default("DOCWATCH_TRANSLATE_SOURCE_LANG", "uk");
    let translate_target_lang = or_default("DOCWATCH_TRANSLATE_TARGET_LANG", "en");

    let user_agent = or_default("DOCWATCH_USER_AGENT", "docwatch/0.1 (status-monitor)");
    let log_level = or_default("DOCWATCH_LOG_LEVEL", "info");
    let notify_webhook_url = lookup("DOCWATCH_NOTIFY_WEBHOOK_URL").ok();

    Ok(AppConfig {
        record_code,
        portal_base_url,
        fallback_status_path,
        check_interval_secs,
        fetch_timeout_secs,
        fallback_timeout_secs,
        translate_timeout_secs,
        fetch_max_retries,
        fetch_backoff_base_secs,
        min_container_len,
        vocab_path,
        vocab_poll_interval_secs,
        baseline_path,
        page_dump_dir,
        translate_url,
        translate_source_lang,
        translate_target_lang,
        user_agent,
        log_level,
        notify_webhook_url,
    })
}
