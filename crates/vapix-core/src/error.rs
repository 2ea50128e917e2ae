// ── Core error types ──
//
// Caller-facing errors from vapix-core. The three outcome families of a
// camera call (device error, not supported, transport failure) stay
// distinct so callers can branch on them; the `From<vapix_api::Error>`
// impl carries the diagnostics across.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Device ───────────────────────────────────────────────────────
    /// The camera reported a problem in-band. Retrying with different
    /// parameters may help.
    #[error("Camera rejected {command}: {message}")]
    Device { command: String, message: String },

    /// The firmware lacks this command. Permanent for this device.
    #[error("Command not supported by this camera: {command}")]
    NotSupported { command: String },

    // ── Transport ────────────────────────────────────────────────────
    #[error("Request to {url} failed: {message}")]
    TransportFailure {
        url: String,
        status: Option<u16>,
        message: String,
        /// Response headers, when a response arrived.
        headers: Vec<(String, String)>,
    },

    #[error("Cannot connect to camera at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Camera request timed out")]
    Timeout,

    // ── Request ──────────────────────────────────────────────────────
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal ─────────────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub fn is_device_error(&self) -> bool {
        matches!(self, Self::Device { .. })
    }

    pub fn is_not_supported(&self) -> bool {
        matches!(self, Self::NotSupported { .. })
    }

    /// Failures of the round-trip itself; fatal to the current call.
    pub fn is_transport_failure(&self) -> bool {
        matches!(
            self,
            Self::TransportFailure { .. } | Self::ConnectionFailed { .. } | Self::Timeout
        )
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<vapix_api::Error> for CoreError {
    fn from(err: vapix_api::Error) -> Self {
        match err {
            vapix_api::Error::Device { command, message } => CoreError::Device { command, message },
            vapix_api::Error::NotSupported { command } => CoreError::NotSupported { command },
            vapix_api::Error::Status {
                status,
                message,
                url,
                headers,
            } => CoreError::TransportFailure {
                url,
                status: Some(status),
                message: format!("HTTP {status} {message}").trim_end().to_owned(),
                headers: headers
                    .iter()
                    .map(|(name, value)| {
                        (
                            name.as_str().to_owned(),
                            String::from_utf8_lossy(value.as_bytes()).into_owned(),
                        )
                    })
                    .collect(),
            },
            vapix_api::Error::Transport(ref e) => {
                let url = e
                    .url()
                    .map_or_else(|| "<unknown>".into(), ToString::to_string);
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url,
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::TransportFailure {
                        url,
                        status: e.status().map(|s| s.as_u16()),
                        message: e.to_string(),
                        headers: Vec::new(),
                    }
                }
            }
            vapix_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            vapix_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            vapix_api::Error::InvalidOption { name, reason } => CoreError::InvalidRequest {
                message: format!("{name}: {reason}"),
            },
        }
    }
}
