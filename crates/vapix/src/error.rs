//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors
//! with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use vapix_config::ConfigError;
use vapix_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_SUPPORTED: i32 = 4;
    pub const DEVICE: i32 = 5;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to camera at {url}")]
    #[diagnostic(
        code(vapix::connection_failed),
        help(
            "Check that the camera is reachable and the endpoint is its CGI root.\n\
             Reason: {reason}"
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out")]
    #[diagnostic(
        code(vapix::timeout),
        help("Increase timeout with --timeout or check camera responsiveness.")
    )]
    Timeout,

    #[error("Request to {url} failed: {message}")]
    #[diagnostic(code(vapix::http_status))]
    HttpStatus { url: String, message: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed for {url}")]
    #[diagnostic(
        code(vapix::auth_failed),
        help("Verify the username and password for this camera.")
    )]
    AuthFailed { url: String },

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(vapix::no_credentials),
        help(
            "Pass --username and --password, set VAPIX_USERNAME / VAPIX_PASSWORD,\n\
             or add them to the profile in your config file."
        )
    )]
    NoCredentials { profile: String },

    // ── Device ───────────────────────────────────────────────────────
    #[error("Camera rejected {command}: {message}")]
    #[diagnostic(code(vapix::device_error))]
    Device { command: String, message: String },

    #[error("This camera does not support {command}")]
    #[diagnostic(
        code(vapix::not_supported),
        help("The firmware does not expose this CGI endpoint.")
    )]
    NotSupported { command: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(vapix::validation))]
    Validation { field: String, reason: String },

    #[error("Section '{name}' not found in the server report")]
    #[diagnostic(
        code(vapix::no_such_section),
        help("Available sections: {available}")
    )]
    NoSuchSection { name: String, available: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(vapix::profile_not_found),
        help("Add a [profiles.{name}] table to {path}, or pass --endpoint.")
    )]
    ProfileNotFound { name: String, path: String },

    #[error("No camera endpoint configured")]
    #[diagnostic(
        code(vapix::no_config),
        help(
            "Pass --endpoint (or VAPIX_ENDPOINT), or create a profile in\n\
             {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(vapix::config))]
    Config(Box<figment::Error>),

    #[error("Internal error: {0}")]
    #[diagnostic(code(vapix::internal))]
    Internal(String),

    // ── IO / Serialization ────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Could not render JSON: {0}")]
    #[diagnostic(code(vapix::json))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotSupported { .. } => exit_code::NOT_SUPPORTED,
            Self::Device { .. } => exit_code::DEVICE,
            Self::Validation { .. } | Self::NoSuchSection { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Device { command, message } => CliError::Device { command, message },

            CoreError::NotSupported { command } => CliError::NotSupported { command },

            CoreError::TransportFailure {
                url,
                status: Some(401 | 403),
                ..
            } => CliError::AuthFailed { url },

            CoreError::TransportFailure { url, message, .. } => {
                CliError::HttpStatus { url, message }
            }

            CoreError::ConnectionFailed { url, reason } => {
                CliError::ConnectionFailed { url, reason }
            }

            CoreError::Timeout => CliError::Timeout,

            CoreError::InvalidRequest { message } => CliError::Validation {
                field: "request".into(),
                reason: message,
            },

            CoreError::Config { message } => CliError::Validation {
                field: "endpoint".into(),
                reason: message,
            },

            CoreError::Internal(message) => CliError::Internal(message),
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::ProfileNotFound { name } => CliError::ProfileNotFound {
                name,
                path: vapix_config::config_path().display().to_string(),
            },
            ConfigError::Figment(err) => CliError::Config(err),
        }
    }
}
