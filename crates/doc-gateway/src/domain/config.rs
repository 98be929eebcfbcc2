//! Gateway configuration with validation.
//!
//! Defaults come from `Default` impls; `GatewayConfig::from_env` overrides
//! them from environment variables. A variable that fails to parse is
//! logged and the default is kept.

use doc_store::ValidationLimits;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

const BYTES_PER_MB: usize = 1024 * 1024;

/// Upper bound for any configured duration (100 years).
pub const MAX_DURATION: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

/// Main gateway configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// HTTP server configuration
    pub http: HttpConfig,
    /// Document and request size limits
    pub limits: LimitsConfig,
    /// Document storage configuration
    pub storage: StorageConfig,
    /// Periodic cleanup of old documents
    pub retention: RetentionConfig,
}

impl GatewayConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        override_parsed(&lookup, "HOST", &mut config.http.host);
        override_parsed(&lookup, "PORT", &mut config.http.port);

        override_parsed(&lookup, "MAX_KEYS", &mut config.limits.max_keys_per_object);
        override_parsed(&lookup, "MAX_NESTING_LEVEL", &mut config.limits.max_nesting_level);
        override_parsed(&lookup, "MAX_UPLOAD_SIZE_MB", &mut config.limits.max_upload_size_mb);

        if let Some(dir) = lookup("DATA_DIR").filter(|d| !d.trim().is_empty()) {
            config.storage.data_dir = PathBuf::from(dir);
        }
        override_flag(&lookup, "NORMALIZE_UPLOADS", &mut config.storage.normalize_uploads);
        override_flag(&lookup, "SEED_DEMO", &mut config.storage.seed_demo);

        override_flag(&lookup, "RETENTION_ENABLED", &mut config.retention.enabled);
        override_duration(&lookup, "RETENTION_INTERVAL", &mut config.retention.interval);
        override_duration(&lookup, "RETENTION_MAX_AGE", &mut config.retention.max_age);

        config
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.limits.max_keys_per_object == 0 {
            return Err(ConfigError::InvalidLimit(
                "max_keys_per_object cannot be 0".into(),
            ));
        }

        if self.limits.max_upload_size_mb == 0 {
            return Err(ConfigError::InvalidLimit(
                "max_upload_size_mb cannot be 0".into(),
            ));
        }

        if self.storage.data_dir.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("data_dir cannot be empty".into()));
        }

        if self.http.shutdown_grace > MAX_DURATION {
            return Err(ConfigError::Invalid("shutdown_grace is too large".into()));
        }

        if self.retention.enabled {
            if self.retention.interval > MAX_DURATION || self.retention.max_age > MAX_DURATION {
                return Err(ConfigError::InvalidRetention(
                    "interval and max_age must not exceed 100 years".into(),
                ));
            }
            if self.retention.interval.is_zero() {
                return Err(ConfigError::InvalidRetention(
                    "interval cannot be 0".into(),
                ));
            }
            if self.retention.max_age.is_zero() {
                return Err(ConfigError::InvalidRetention(
                    "max_age cannot be 0".into(),
                ));
            }
        }

        Ok(())
    }

    /// Get HTTP server bind address
    pub fn http_addr(&self) -> SocketAddr {
        SocketAddr::new(self.http.host, self.http.port)
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Bind address
    pub host: IpAddr,
    /// Port (default: 8080)
    pub port: u16,
    /// How long open connections may drain after a shutdown signal
    #[serde(with = "humantime_serde")]
    pub shutdown_grace: Duration,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)),
            port: 8080,
            shutdown_grace: Duration::from_secs(30),
        }
    }
}

/// Structural and size limits
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum keys in any object of a stored document
    pub max_keys_per_object: usize,
    /// Maximum depth of a complex value (root is 0)
    pub max_nesting_level: usize,
    /// Maximum request body and uploaded file size, in MiB
    pub max_upload_size_mb: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        let limits = ValidationLimits::default();
        Self {
            max_keys_per_object: limits.max_keys_per_object,
            max_nesting_level: limits.max_nesting_level,
            max_upload_size_mb: 1,
        }
    }
}

impl LimitsConfig {
    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_size_mb.saturating_mul(BYTES_PER_MB)
    }

    pub fn validation_limits(&self) -> ValidationLimits {
        ValidationLimits {
            max_keys_per_object: self.max_keys_per_object,
            max_nesting_level: self.max_nesting_level,
        }
    }
}

/// Document storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding `data_<id>.json` files
    pub data_dir: PathBuf,
    /// Pad uploaded tables so every row has the same columns
    pub normalize_uploads: bool,
    /// Store the sample `demo` document at startup if absent
    pub seed_demo: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            normalize_uploads: true,
            seed_demo: true,
        }
    }
}

/// Retention sweep configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetentionConfig {
    /// Run the sweep at all
    pub enabled: bool,
    /// Time between sweeps
    #[serde(with = "humantime_serde")]
    pub interval: Duration,
    /// Documents untouched for longer than this are deleted
    #[serde(with = "humantime_serde")]
    pub max_age: Duration,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval: Duration::from_secs(60 * 60),
            max_age: Duration::from_secs(24 * 60 * 60),
        }
    }
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Invalid size or count limit
    #[error("invalid limit: {0}")]
    InvalidLimit(String),
    /// Invalid retention schedule
    #[error("invalid retention: {0}")]
    InvalidRetention(String),
    /// General configuration error
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

fn override_parsed<F, T>(lookup: &F, key: &str, target: &mut T)
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let Some(raw) = lookup(key) else {
        return;
    };
    match raw.trim().parse() {
        Ok(value) => *target = value,
        Err(e) => warn!(key, value = %raw, error = %e, "ignoring invalid environment value"),
    }
}

fn override_flag<F>(lookup: &F, key: &str, target: &mut bool)
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return;
    };
    match parse_flag(&raw) {
        Some(value) => *target = value,
        None => warn!(key, value = %raw, "ignoring invalid boolean environment value"),
    }
}

fn override_duration<F>(lookup: &F, key: &str, target: &mut Duration)
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return;
    };
    match humantime_serde::parse_duration(&raw) {
        Ok(value) => *target = value,
        Err(e) => warn!(key, value = %raw, error = e, "ignoring invalid duration environment value"),
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Durations as `"250ms"`, `"30s"`, `"15m"`, `"1h"` or plain seconds.
mod humantime_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format!("{}s", duration.as_secs()))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_duration(&s).map_err(serde::de::Error::custom)
    }

    pub fn parse_duration(s: &str) -> Result<Duration, &'static str> {
        let s = s.trim();
        // "ms" before "m" and "s".
        let duration = if let Some(ms) = s.strip_suffix("ms") {
            parse_count(ms, "invalid milliseconds").map(Duration::from_millis)?
        } else if let Some(hours) = s.strip_suffix('h') {
            Duration::from_secs(scaled(hours, 3600, "invalid hours")?)
        } else if let Some(mins) = s.strip_suffix('m') {
            Duration::from_secs(scaled(mins, 60, "invalid minutes")?)
        } else if let Some(secs) = s.strip_suffix('s') {
            Duration::from_secs(parse_count(secs, "invalid seconds")?)
        } else {
            Duration::from_secs(parse_count(s, "invalid duration format")?)
        };

        if duration > super::MAX_DURATION {
            return Err("duration too large");
        }
        Ok(duration)
    }

    fn parse_count(raw: &str, err: &'static str) -> Result<u64, &'static str> {
        raw.trim().parse::<u64>().map_err(|_| err)
    }

    fn scaled(raw: &str, unit_secs: u64, err: &'static str) -> Result<u64, &'static str> {
        parse_count(raw, err)?
            .checked_mul(unit_secs)
            .ok_or("duration too large")
    }
}
