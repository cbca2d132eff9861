//! Application configuration parsed from environment variables.
//!
//! Every value has a default; malformed numbers fall back to it. The only
//! hard error is an unrecognized `LOG_FORMAT`.

use std::path::PathBuf;
use std::time::Duration;

use crate::gate::{GateConfig, SUBMIT_DELAY};

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0";
pub const DEFAULT_STATIC_DIR: &str = "web/static";
pub const DEFAULT_IMAGES_DIR: &str = "web/util/images";
pub const DEFAULT_FETCH_REQUEST_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_FETCH_CONNECT_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_FETCH_MAX_BODY_BYTES: usize = 5 * 1024 * 1024;
pub const DEFAULT_USER_AGENT: &str = concat!("page-analyzer/", env!("CARGO_PKG_VERSION"));
pub const DEFAULT_LOG_DIR: &str = "logs";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown LOG_FORMAT: {0} (expected 'pretty' or 'json')")]
    UnknownLogFormat(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub format: LogFormat,
    /// Directory holding `app.log` in JSON mode.
    pub dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchConfig {
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub max_body_bytes: usize,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: DEFAULT_FETCH_REQUEST_TIMEOUT_SECS,
            connect_timeout_secs: DEFAULT_FETCH_CONNECT_TIMEOUT_SECS,
            max_body_bytes: DEFAULT_FETCH_MAX_BODY_BYTES,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: String,
    pub port: u16,
    pub static_dir: PathBuf,
    pub images_dir: PathBuf,
    pub fetch: FetchConfig,
    pub gate: GateConfig,
    pub log: LogConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_owned(),
            port: DEFAULT_PORT,
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            images_dir: PathBuf::from(DEFAULT_IMAGES_DIR),
            fetch: FetchConfig::default(),
            gate: GateConfig::default(),
            log: LogConfig { format: LogFormat::Pretty, dir: PathBuf::from(DEFAULT_LOG_DIR) },
        }
    }
}

impl AppConfig {
    /// Build typed config from environment variables.
    ///
    /// - `PORT` (8080), `BIND_ADDR` (`0.0.0.0`)
    /// - `STATIC_DIR` (`web/static`), `IMAGES_DIR` (`web/util/images`)
    /// - `FETCH_REQUEST_TIMEOUT_SECS` (15), `FETCH_CONNECT_TIMEOUT_SECS` (5)
    /// - `FETCH_MAX_BODY_BYTES` (5 MiB), `FETCH_USER_AGENT`
    /// - `SUBMIT_DELAY_MS` (2000)
    /// - `LOG_FORMAT` (`pretty` or `json`), `LOG_DIR` (`logs`)
    ///
    /// # Errors
    ///
    /// Returns an error if `LOG_FORMAT` names an unknown format.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build typed config from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if `LOG_FORMAT` names an unknown format.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let format = parse_log_format(lookup("LOG_FORMAT").as_deref())?;
        let submit_delay_ms = parse_or(lookup("SUBMIT_DELAY_MS"), duration_millis(SUBMIT_DELAY));

        Ok(Self {
            bind_addr: lookup("BIND_ADDR").unwrap_or(defaults.bind_addr),
            port: parse_or(lookup("PORT"), DEFAULT_PORT),
            static_dir: path_or(lookup("STATIC_DIR"), defaults.static_dir),
            images_dir: path_or(lookup("IMAGES_DIR"), defaults.images_dir),
            fetch: FetchConfig {
                request_timeout_secs: parse_or(
                    lookup("FETCH_REQUEST_TIMEOUT_SECS"),
                    DEFAULT_FETCH_REQUEST_TIMEOUT_SECS,
                ),
                connect_timeout_secs: parse_or(
                    lookup("FETCH_CONNECT_TIMEOUT_SECS"),
                    DEFAULT_FETCH_CONNECT_TIMEOUT_SECS,
                ),
                max_body_bytes: parse_or(lookup("FETCH_MAX_BODY_BYTES"), DEFAULT_FETCH_MAX_BODY_BYTES),
                user_agent: lookup("FETCH_USER_AGENT").unwrap_or(defaults.fetch.user_agent),
            },
            gate: GateConfig::with_delay(Duration::from_millis(submit_delay_ms)),
            log: LogConfig { format, dir: path_or(lookup("LOG_DIR"), defaults.log.dir) },
        })
    }

    #[must_use]
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

fn parse_or<T: std::str::FromStr>(raw: Option<String>, default: T) -> T {
    raw.and_then(|v| v.trim().parse::<T>().ok()).unwrap_or(default)
}

fn path_or(raw: Option<String>, default: PathBuf) -> PathBuf {
    raw.filter(|v| !v.is_empty()).map_or(default, PathBuf::from)
}

fn duration_millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

fn parse_log_format(raw: Option<&str>) -> Result<LogFormat, ConfigError> {
    match raw.map(str::trim).unwrap_or("pretty") {
        "" | "pretty" => Ok(LogFormat::Pretty),
        "json" => Ok(LogFormat::Json),
        other => Err(ConfigError::UnknownLogFormat(other.to_owned())),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
