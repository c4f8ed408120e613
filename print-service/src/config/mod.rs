use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct PrintConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub pipeline: PipelineConfig,
    pub reaper: ReaperConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    /// Directory holding the per-request markup and document files.
    pub tmp_dir: PathBuf,
    pub converter_program: String,
    /// Argument template; `{input}` and `{output}` are substituted per request.
    pub converter_args: String,
    /// Print command template; `{document}` is substituted per request.
    pub print_command: String,
    /// Exported as `DISPLAY` to the converter only.
    pub display: Option<String>,
    /// Upper bound for each external command. `None` waits indefinitely.
    pub command_timeout: Option<Duration>,
    pub cleanup: CleanupPolicy,
}

/// What happens to a request's artifacts when the pipeline fails.
///
/// Artifacts are always removed after a successful print.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CleanupPolicy {
    /// Leave them on disk for diagnosis; the reaper collects them later.
    #[default]
    RetainOnFailure,
    Always,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReaperConfig {
    /// Zero disables the reaper.
    pub interval: Duration,
    pub max_age: Duration,
}

impl ReaperConfig {
    pub fn enabled(&self) -> bool {
        !self.interval.is_zero()
    }
}

impl PrintConfig {
    pub fn load() -> Result<Self, AppError> {
        // Load common config (handles .env and APP__ prefix)
        let common_config = core_config::Config::load()?;

        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        let cleanup_on_failure: bool =
            parse_env("PRINT_CLEANUP_ON_FAILURE", Some("false"), is_prod)?;

        Ok(PrintConfig {
            common: common_config,
            pipeline: PipelineConfig {
                tmp_dir: expand_home(&get_env(
                    "PRINT_TMP_DIR",
                    Some("~/print-service/tmp"),
                    is_prod,
                )?),
                converter_program: get_env("PRINT_CONVERTER_PROGRAM", Some("wkhtmltopdf"), is_prod)?,
                converter_args: get_env(
                    "PRINT_CONVERTER_ARGS",
                    Some("--quiet {input} {output}"),
                    is_prod,
                )?,
                print_command: get_env("PRINT_COMMAND", Some("lp {document}"), is_prod)?,
                display: env::var("PRINT_DISPLAY").ok().filter(|d| !d.is_empty()),
                command_timeout: optional_env::<u64>("PRINT_COMMAND_TIMEOUT_SECS")?
                    .map(Duration::from_secs),
                cleanup: if cleanup_on_failure {
                    CleanupPolicy::Always
                } else {
                    CleanupPolicy::RetainOnFailure
                },
            },
            reaper: ReaperConfig {
                interval: Duration::from_secs(parse_env(
                    "PRINT_REAPER_INTERVAL_SECS",
                    Some("3600"),
                    is_prod,
                )?),
                max_age: Duration::from_secs(parse_env(
                    "PRINT_REAPER_MAX_AGE_SECS",
                    Some("86400"),
                    is_prod,
                )?),
            },
        })
    }
}

/// Expands a leading `~/` against `HOME`. Other paths are returned as-is.
pub fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), env::var_os("HOME")) {
        (Some(rest), Some(home)) => PathBuf::from(home).join(rest),
        _ => PathBuf::from(path),
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(format!(
                    "{} is required in production but not set",
                    key
                ))))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(format!(
                    "{} is required but not set",
                    key
                ))))
            }
        }
    }
}

fn parse_env<T>(key: &str, default: Option<&str>, is_prod: bool) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = get_env(key, default, is_prod)?;
    parse_value(key, &raw)
}

fn optional_env<T>(key: &str) -> Result<Option<T>, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => parse_value(key, &raw).map(Some),
        _ => Ok(None),
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| {
        AppError::ConfigError(anyhow::anyhow!("Invalid value for {}: {} ({})", key, raw, e))
    })
}
