//! Shared configuration for vapix tools.
//!
//! TOML profiles, credential resolution (env + plaintext + keyring), and
//! translation to `vapix_core::CameraConfig`. The CLI layers its flag
//! overrides on top.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use vapix_core::{CacheLimits, CameraConfig, TlsVerification};

/// Environment variable consulted for the password when the profile names none.
pub const PASSWORD_ENV: &str = "VAPIX_PASSWORD";
/// Environment variable consulted when a profile has no username.
pub const USERNAME_ENV: &str = "VAPIX_USERNAME";

const KEYRING_SERVICE: &str = "vapix";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no credentials configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("profile '{name}' not found")]
    ProfileNotFound { name: String },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named camera profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Config {
    /// Name of the profile to use: the explicit one, else the default.
    pub fn active_profile_name<'a>(&'a self, explicit: Option<&'a str>) -> &'a str {
        explicit
            .or(self.default_profile.as_deref())
            .unwrap_or("default")
    }

    pub fn profile(&self, name: &str) -> Result<&Profile, ConfigError> {
        self.profiles
            .get(name)
            .ok_or_else(|| ConfigError::ProfileNotFound { name: name.into() })
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default)]
    pub insecure: bool,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Cache entry lifetime in seconds.
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl: u64,

    #[serde(default = "default_cache_max_entries")]
    pub cache_max_entries: usize,

    /// Bytes of JSON per cached response.
    #[serde(default = "default_cache_max_object_size")]
    pub cache_max_object_size: usize,

    /// Bytes of JSON across the whole cache.
    #[serde(default = "default_cache_max_total_size")]
    pub cache_max_total_size: usize,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            insecure: false,
            timeout: default_timeout(),
            cache_ttl: default_cache_ttl(),
            cache_max_entries: default_cache_max_entries(),
            cache_max_object_size: default_cache_max_object_size(),
            cache_max_total_size: default_cache_max_total_size(),
        }
    }
}

impl Defaults {
    pub fn cache_limits(&self) -> CacheLimits {
        CacheLimits {
            ttl: Duration::from_secs(self.cache_ttl),
            max_entries: self.cache_max_entries,
            max_object_size: self.cache_max_object_size,
            max_total_size: self.cache_max_total_size,
        }
    }
}

fn default_timeout() -> u64 {
    30
}
fn default_cache_ttl() -> u64 {
    CacheLimits::default().ttl.as_secs()
}
fn default_cache_max_entries() -> usize {
    CacheLimits::default().max_entries
}
fn default_cache_max_object_size() -> usize {
    CacheLimits::default().max_object_size
}
fn default_cache_max_total_size() -> usize {
    CacheLimits::default().max_total_size
}

/// A named camera profile.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Profile {
    /// CGI root (e.g., "http://192.168.0.90/axis-cgi").
    pub endpoint: String,

    pub username: Option<String>,

    /// Password (plaintext; prefer `password_env` or the keyring).
    pub password: Option<String>,

    /// Environment variable name containing the password.
    pub password_env: Option<String>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    pub insecure: Option<bool>,

    /// Override timeout.
    pub timeout: Option<u64>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("", "", "vapix").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("vapix");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load defaults, then `path` (if it exists), then `VAPIX_*` variables.
///
/// Nested keys use a double underscore: `VAPIX_DEFAULTS__CACHE_TTL=5`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("VAPIX_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Credential resolution ───────────────────────────────────────────

/// Resolve the password for a profile from the process environment.
pub fn resolve_password(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    resolve_password_with(profile, profile_name, |name| std::env::var(name).ok())
}

/// Resolve the password using `env` for variable lookups.
///
/// Order: the variable named by `password_env`, then `VAPIX_PASSWORD`,
/// then the plaintext `password`, then the system keyring.
pub fn resolve_password_with(
    profile: &Profile,
    profile_name: &str,
    env: impl Fn(&str) -> Option<String>,
) -> Result<SecretString, ConfigError> {
    // 1. Profile's password_env → env var lookup
    if let Some(value) = profile.password_env.as_deref().and_then(&env) {
        return Ok(SecretString::from(value));
    }

    // 2. Tool-wide env var
    if let Some(value) = env(PASSWORD_ENV) {
        return Ok(SecretString::from(value));
    }

    // 3. Plaintext in config
    if let Some(ref pw) = profile.password {
        return Ok(SecretString::from(pw.clone()));
    }

    // 4. System keyring
    if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/password")) {
        if let Ok(pw) = entry.get_password() {
            return Ok(SecretString::from(pw));
        }
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Resolve the username: profile value, else `VAPIX_USERNAME`.
pub fn resolve_username_with(
    profile: &Profile,
    profile_name: &str,
    env: impl Fn(&str) -> Option<String>,
) -> Result<String, ConfigError> {
    profile
        .username
        .clone()
        .or_else(|| env(USERNAME_ENV))
        .ok_or_else(|| ConfigError::NoCredentials {
            profile: profile_name.into(),
        })
}

pub fn parse_endpoint(raw: &str) -> Result<Url, ConfigError> {
    let url: Url = raw.parse().map_err(|e| ConfigError::Validation {
        field: "endpoint".into(),
        reason: format!("invalid URL '{raw}': {e}"),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::Validation {
            field: "endpoint".into(),
            reason: format!("expected http or https, got '{}'", url.scheme()),
        });
    }
    Ok(url)
}

/// TLS mode for a profile: insecure wins, then a custom CA, else strict.
pub fn tls_for(profile: &Profile, defaults: &Defaults) -> TlsVerification {
    if profile.insecure.unwrap_or(defaults.insecure) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    }
}

/// Build a `CameraConfig` from a profile, with no flag overrides.
pub fn profile_to_camera_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<CameraConfig, ConfigError> {
    let env = |name: &str| std::env::var(name).ok();
    let endpoint = parse_endpoint(&profile.endpoint)?;
    let username = resolve_username_with(profile, profile_name, env)?;
    let password = resolve_password_with(profile, profile_name, env)?;

    let mut config = CameraConfig::new(endpoint, username, password);
    config.tls = tls_for(profile, defaults);
    config.timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));
    config.cache = defaults.cache_limits();
    Ok(config)
}
