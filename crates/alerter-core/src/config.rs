//! Configuration management for the alerter
//!
//! Everything is read from the process environment. `DB_HOST`, `DB_USER`,
//! `DB_PW`, `RAVEN_DSN` and `ADDRESS` are required; the rest fall back to
//! defaults.

use std::time::Duration;

use config::{Environment, Map};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default PostgreSQL port when `DB_HOST` carries none
pub const DEFAULT_DB_PORT: u16 = 5432;

/// Default seconds between two polls of the miss table
pub const DEFAULT_CHECK_INTERVAL_SECONDS: u64 = 30;

/// Default number of consecutive misses that triggers an alert
pub const DEFAULT_MISS_THRESHOLD: u32 = 10;

/// Main configuration struct
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Database configuration
    pub database: DatabaseConfig,

    /// Monitor configuration
    pub monitor: MonitorConfig,

    /// Alerting configuration
    pub alerting: AlertingConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database host
    pub host: String,
    /// Database port
    pub port: u16,
    /// Login user
    pub user: String,
    /// Login password
    #[serde(skip_serializing)]
    pub password: String,
    /// Database name
    pub name: String,
    /// Maximum connections
    pub max_connections: u32,
}

/// Monitor configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Validator address whose misses are tracked
    pub address: String,
    /// Poll interval in seconds
    pub check_interval_seconds: u64,
    /// Consecutive misses required before alerting
    pub miss_threshold: u32,
}

impl MonitorConfig {
    /// Poll interval as a `Duration`
    pub fn check_interval(&self) -> Duration {
        Duration::from_secs(self.check_interval_seconds)
    }
}

/// Alerting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertingConfig {
    /// Sentry DSN the alerts are delivered to
    #[serde(skip_serializing)]
    pub dsn: String,
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human readable
    #[default]
    Pretty,
    /// One JSON object per line
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log format
    pub format: LogFormat,
}

/// Flat view of the environment, keys lowercased by the `config` crate
#[derive(Debug, Default, Deserialize)]
struct RawEnv {
    db_host: Option<String>,
    db_user: Option<String>,
    db_pw: Option<String>,
    db_name: Option<String>,
    db_max_connections: Option<u32>,
    raven_dsn: Option<String>,
    address: Option<String>,
    check_interval_seconds: Option<u64>,
    miss_threshold: Option<u32>,
    log_format: Option<LogFormat>,
}

impl Config {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::load(Environment::default())
    }

    /// Load configuration from an explicit set of variables instead of the
    /// process environment
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map: Map<String, String> = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self::load(Environment::default().source(Some(map)))
    }

    fn load(source: Environment) -> Result<Self> {
        let raw: RawEnv = config::Config::builder()
            .add_source(source)
            .build()?
            .try_deserialize()?;

        let (host, port) = split_host_port(&required("DB_HOST", raw.db_host)?)?;
        let user = required("DB_USER", raw.db_user)?;
        let password = required("DB_PW", raw.db_pw)?;
        let dsn = required("RAVEN_DSN", raw.raven_dsn)?;
        let address = required("ADDRESS", raw.address)?;

        let miss_threshold = raw.miss_threshold.unwrap_or(DEFAULT_MISS_THRESHOLD);
        if miss_threshold == 0 {
            return Err(Error::config("MISS_THRESHOLD must be at least 1"));
        }
        let check_interval_seconds = raw
            .check_interval_seconds
            .unwrap_or(DEFAULT_CHECK_INTERVAL_SECONDS);
        if check_interval_seconds == 0 {
            return Err(Error::config("CHECK_INTERVAL_SECONDS must be at least 1"));
        }

        Ok(Self {
            database: DatabaseConfig {
                host,
                port,
                name: non_empty(raw.db_name).unwrap_or_else(|| user.clone()),
                user,
                password,
                max_connections: raw.db_max_connections.unwrap_or(5),
            },
            monitor: MonitorConfig {
                address,
                check_interval_seconds,
                miss_threshold,
            },
            alerting: AlertingConfig { dsn },
            logging: LoggingConfig {
                format: raw.log_format.unwrap_or_default(),
            },
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required(name: &str, value: Option<String>) -> Result<String> {
    non_empty(value).ok_or_else(|| Error::config(format!("{name} needs to be set")))
}

/// Split `host[:port]`, accepting bracketed IPv6 literals
fn split_host_port(addr: &str) -> Result<(String, u16)> {
    if let Some(rest) = addr.strip_prefix('[') {
        let (host, tail) = rest
            .split_once(']')
            .ok_or_else(|| Error::config(format!("invalid DB_HOST: {addr}")))?;
        let port = match tail.strip_prefix(':') {
            Some(p) => parse_port(addr, p)?,
            None if tail.is_empty() => DEFAULT_DB_PORT,
            None => return Err(Error::config(format!("invalid DB_HOST: {addr}"))),
        };
        return Ok((host.to_string(), port));
    }

    match addr.rsplit_once(':') {
        Some((host, port)) if !host.contains(':') => Ok((host.to_string(), parse_port(addr, port)?)),
        _ => Ok((addr.to_string(), DEFAULT_DB_PORT)),
    }
}

fn parse_port(addr: &str, port: &str) -> Result<u16> {
    port.parse()
        .map_err(|_| Error::config(format!("invalid port in DB_HOST: {addr}")))
}
