//! Settings resolution with a declarative defaults table
//!
//! Every "apply this default if the key is absent" rule lives in one place,
//! consulted once when the parsed map is consumed. The parser never applies
//! defaults; the orchestrator never re-implements them per call site.

use std::path::PathBuf;

use crate::errors::{ConfigError, Result};
use crate::value::{ConfigMap, ConfigValue};

/// Relative path the tool reads when no override is given
pub const DEFAULT_CONFIG_PATH: &str = "config.lua";

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 6379;
const DEFAULT_DB: i64 = 0;
const DEFAULT_RULE_PATH: &str = "/usr/local/nginx/conf/waf/wafconf/";

/// Firewall behaviour fields written into the config hash, with the default
/// applied when the key is absent from the source. Order is the write order.
pub const BEHAVIOR_FIELD_DEFAULTS: &[(&str, &str)] = &[
    ("attacklog", "on"),
    ("logdir", "/usr/local/nginx/logs/hack/"),
    ("UrlDeny", "on"),
    ("Redirect", "on"),
    ("CookieMatch", "on"),
    ("postMatch", "on"),
    ("whiteModule", "on"),
    ("CCDeny", "off"),
    ("CCrate", "100/60"),
    ("CCBanTime", "600"),
    ("html", ""),
];

const DEFAULT_IP_WHITELIST: &[&str] = &["127.0.0.1"];
const DEFAULT_IP_BLOCKLIST: &[&str] = &["1.0.0.1"];

/// Store connection parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionSettings {
    pub host: String,
    pub port: u16,
    pub db: i64,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            db: DEFAULT_DB,
            username: None,
            password: None,
        }
    }
}

/// Fully resolved seeding inputs
///
/// Produced once per run from a `ConfigMap`; everything downstream of the
/// parser consumes this instead of raw config values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub connection: ConnectionSettings,
    /// Directory holding one rule file per category
    pub rule_path: PathBuf,
    /// Resolved behaviour hash fields, in write order
    pub behavior: Vec<(String, String)>,
    pub ip_whitelist: Vec<String>,
    pub ip_blocklist: Vec<String>,
}

impl Settings {
    /// Resolve a parsed map against the defaults table
    ///
    /// # Errors
    ///
    /// Returns `InvalidValue` when a configured port or database index does
    /// not parse as a number.
    pub fn from_config(config: &ConfigMap) -> Result<Self> {
        let connection = ConnectionSettings {
            host: scalar_or(config, "redis_host", DEFAULT_HOST),
            port: numeric_or(config, "redis_port", DEFAULT_PORT)?,
            db: numeric_or(config, "redis_db", DEFAULT_DB)?,
            username: optional_scalar(config, "redis_username"),
            password: optional_scalar(config, "redis_password"),
        };

        let behavior = BEHAVIOR_FIELD_DEFAULTS
            .iter()
            .map(|(field, default)| {
                let value = config
                    .get_scalar(field)
                    .map(|v| v.into_owned())
                    .unwrap_or_else(|| (*default).to_string());
                ((*field).to_string(), value)
            })
            .collect();

        Ok(Self {
            connection,
            rule_path: PathBuf::from(scalar_or(config, "RulePath", DEFAULT_RULE_PATH)),
            behavior,
            ip_whitelist: list_or(config, "ipWhitelist", DEFAULT_IP_WHITELIST),
            ip_blocklist: list_or(config, "ipBlocklist", DEFAULT_IP_BLOCKLIST),
        })
    }
}

fn scalar_or(config: &ConfigMap, key: &str, default: &str) -> String {
    config
        .get_scalar(key)
        .map(|v| v.into_owned())
        .unwrap_or_else(|| default.to_string())
}

/// Absent, `nil`, or empty all mean "not configured"
fn optional_scalar(config: &ConfigMap, key: &str) -> Option<String> {
    match config.get(key) {
        None => None,
        Some(value) if value.is_nil() => None,
        Some(value) => value
            .as_scalar_text()
            .map(|v| v.into_owned())
            .filter(|v| !v.is_empty() && v != "nil"),
    }
}

fn numeric_or<T: std::str::FromStr>(config: &ConfigMap, key: &'static str, default: T) -> Result<T> {
    match config.get_scalar(key) {
        None => Ok(default),
        Some(text) => text.parse().map_err(|_| ConfigError::InvalidValue {
            key,
            value: text.into_owned(),
        }),
    }
}

fn list_or(config: &ConfigMap, key: &str, default: &[&str]) -> Vec<String> {
    match config.get(key).and_then(ConfigValue::as_list) {
        Some(items) => items.to_vec(),
        None => default.iter().map(|s| (*s).to_string()).collect(),
    }
}
