use std::env;
use std::path::PathBuf;
use std::time::Duration;

use tourguard_core::{AppError, AppResult};
use tracing_subscriber::EnvFilter;

/// How new record identifiers are minted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdStrategy {
    /// `{prefix}-{uuid}`.
    Uuid,
    /// `{prefix}-{n}`.
    Sequential,
}

#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    pub settings_path: PathBuf,
    pub mock_mode: bool,
    pub mock_latency: Duration,
    pub mock_fail_every: u32,
    pub fetch_timeout: Option<Duration>,
    pub id_strategy: IdStrategy,
    pub email: String,
    pub password: String,
}

impl ConsoleConfig {
    pub fn load() -> AppResult<Self> {
        let settings_path = env::var("TOURGUARD_SETTINGS_PATH")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| "authority_settings.json".to_owned());
        let mock_mode = parse_env_bool("TOURGUARD_MOCK_MODE", true)?;
        let mock_latency_ms = parse_env_u64("TOURGUARD_MOCK_LATENCY_MS", 300)?;
        let mock_fail_every = parse_env_u32("TOURGUARD_MOCK_FAIL_EVERY", 0)?;
        let fetch_timeout = optional_env("TOURGUARD_FETCH_TIMEOUT_MS")
            .map(|value| {
                value.parse::<u64>().map_err(|error| {
                    AppError::Validation(format!(
                        "invalid TOURGUARD_FETCH_TIMEOUT_MS value '{value}': {error}"
                    ))
                })
            })
            .transpose()?;

        if fetch_timeout == Some(0) {
            return Err(AppError::Validation(
                "TOURGUARD_FETCH_TIMEOUT_MS must be greater than zero".to_owned(),
            ));
        }

        let id_strategy = match env::var("TOURGUARD_ID_STRATEGY")
            .unwrap_or_else(|_| "uuid".to_owned())
            .as_str()
        {
            "uuid" => IdStrategy::Uuid,
            "sequential" => IdStrategy::Sequential,
            other => {
                return Err(AppError::Validation(format!(
                    "TOURGUARD_ID_STRATEGY must be either 'uuid' or 'sequential', got '{other}'"
                )));
            }
        };

        Ok(Self {
            settings_path: PathBuf::from(settings_path),
            mock_mode,
            mock_latency: Duration::from_millis(mock_latency_ms),
            mock_fail_every,
            fetch_timeout: fetch_timeout.map(Duration::from_millis),
            id_strategy,
            email: required_env("TOURGUARD_EMAIL")?,
            password: required_env("TOURGUARD_PASSWORD")?,
        })
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn required_env(name: &str) -> AppResult<String> {
    env::var(name).map_err(|_| AppError::Validation(format!("{name} is required")))
}

fn optional_env(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

fn parse_env_bool(name: &str, default: bool) -> AppResult<bool> {
    match optional_env(name) {
        Some(value) => parse_bool(name, value.as_str()),
        None => Ok(default),
    }
}

fn parse_bool(name: &str, value: &str) -> AppResult<bool> {
    if value.eq_ignore_ascii_case("true") || value == "1" {
        Ok(true)
    } else if value.eq_ignore_ascii_case("false") || value == "0" {
        Ok(false)
    } else {
        Err(AppError::Validation(format!(
            "invalid {name} value '{value}': expected true or false"
        )))
    }
}

fn parse_env_u32(name: &str, default: u32) -> AppResult<u32> {
    match env::var(name) {
        Ok(value) => value.parse::<u32>().map_err(|error| {
            AppError::Validation(format!("invalid {name} value '{value}': {error}"))
        }),
        Err(_) => Ok(default),
    }
}

fn parse_env_u64(name: &str, default: u64) -> AppResult<u64> {
    match env::var(name) {
        Ok(value) => value.parse::<u64>().map_err(|error| {
            AppError::Validation(format!("invalid {name} value '{value}': {error}"))
        }),
        Err(_) => Ok(default),
    }
}
