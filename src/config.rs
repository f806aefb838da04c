//! Runtime configuration.
//!
//! Settings come from the environment; `main` loads a `.env` file first with
//! `dotenv`, so any of these can live there as well.

use crate::error::ParseModeError;
use crate::models::CloudMode;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub const ENV_DEFAULT_MODE: &str = "SUBNET_CALC_DEFAULT_MODE";
pub const ENV_REFRESH_CLOUDFLARE: &str = "SUBNET_CALC_REFRESH_CLOUDFLARE";
pub const ENV_CLOUDFLARE_IPV4_URL: &str = "SUBNET_CALC_CLOUDFLARE_IPV4_URL";
pub const ENV_CLOUDFLARE_IPV6_URL: &str = "SUBNET_CALC_CLOUDFLARE_IPV6_URL";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "SUBNET_CALC_REQUEST_TIMEOUT_SECS";
pub const ENV_CACHE_DIR: &str = "SUBNET_CALC_CACHE_DIR";
pub const ENV_LOG_CONFIG: &str = "SUBNET_CALC_LOG_CONFIG";

pub const CLOUDFLARE_IPV4_URL: &str = "https://www.cloudflare.com/ips-v4/";
pub const CLOUDFLARE_IPV6_URL: &str = "https://www.cloudflare.com/ips-v6/";
pub const REQUEST_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("SUBNET_CALC_DEFAULT_MODE: {0}")]
    DefaultMode(#[from] ParseModeError),
    #[error("{name} must be {expected}, got '{value}'")]
    InvalidValue {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Mode used by subnet-info when a request does not name one.
    pub default_mode: CloudMode,
    /// Fetch the live Cloudflare lists at startup instead of the builtin table.
    pub refresh_cloudflare: bool,
    pub cloudflare_ipv4_url: String,
    pub cloudflare_ipv6_url: String,
    pub request_timeout: Duration,
    /// Directory for the dated range cache files.
    pub cache_dir: PathBuf,
    pub log_config: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            default_mode: CloudMode::Azure,
            refresh_cloudflare: false,
            cloudflare_ipv4_url: CLOUDFLARE_IPV4_URL.to_string(),
            cloudflare_ipv6_url: CLOUDFLARE_IPV6_URL.to_string(),
            request_timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            cache_dir: PathBuf::from("."),
            log_config: PathBuf::from("log4rs.yml"),
        }
    }
}

impl Config {
    /// Read the configuration from process environment variables.
    pub fn from_env() -> Result<Config, ConfigError> {
        Config::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read the configuration through `lookup`, unset keys keep their default.
    pub fn from_lookup<F>(lookup: F) -> Result<Config, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(mode) = lookup(ENV_DEFAULT_MODE) {
            config.default_mode = mode.trim().parse()?;
        }
        if let Some(flag) = lookup(ENV_REFRESH_CLOUDFLARE) {
            config.refresh_cloudflare = parse_flag(ENV_REFRESH_CLOUDFLARE, &flag)?;
        }
        if let Some(url) = lookup(ENV_CLOUDFLARE_IPV4_URL) {
            config.cloudflare_ipv4_url = url;
        }
        if let Some(url) = lookup(ENV_CLOUDFLARE_IPV6_URL) {
            config.cloudflare_ipv6_url = url;
        }
        if let Some(secs) = lookup(ENV_REQUEST_TIMEOUT_SECS) {
            let secs = secs
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(ConfigError::InvalidValue {
                    name: ENV_REQUEST_TIMEOUT_SECS,
                    expected: "a positive number of seconds",
                    value: secs,
                })?;
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(dir) = lookup(ENV_CACHE_DIR) {
            config.cache_dir = PathBuf::from(dir);
        }
        if let Some(path) = lookup(ENV_LOG_CONFIG) {
            config.log_config = PathBuf::from(path);
        }

        log::debug!("Loaded config: {:?}", config);
        Ok(config)
    }
}

fn parse_flag(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            name,
            expected: "true or false",
            value: value.to_string(),
        }),
    }
}
