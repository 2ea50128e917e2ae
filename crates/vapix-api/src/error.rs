// Error taxonomy for camera requests.

use reqwest::header::HeaderMap;
use thiserror::Error;

/// Top-level error type for the `vapix-api` crate.
///
/// Every failed call lands in exactly one of three families:
/// the device reported a problem in-band ([`Device`](Self::Device)),
/// the firmware lacks the command ([`NotSupported`](Self::NotSupported)),
/// or the round-trip itself failed (everything else).
#[derive(Debug, Error)]
pub enum Error {
    // ── Device ──────────────────────────────────────────────────────
    /// The device answered 2xx but embedded an error marker in the body.
    #[error("Device reported an error for {command}: {message}")]
    Device { command: String, message: String },

    /// The endpoint answered 404 for this command.
    #[error("Command not supported by this device: {command}")]
    NotSupported { command: String },

    // ── Transport ───────────────────────────────────────────────────
    /// Any other non-2xx status.
    #[error("HTTP {status} {message} from {url}")]
    Status {
        status: u16,
        message: String,
        url: String,
        headers: HeaderMap,
    },

    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Request ─────────────────────────────────────────────────────
    /// A request option was out of range.
    #[error("Invalid option {name}: {reason}")]
    InvalidOption { name: &'static str, reason: String },
}

impl Error {
    /// Returns `true` if the device itself rejected the request.
    pub fn is_device_error(&self) -> bool {
        matches!(self, Self::Device { .. })
    }

    /// Returns `true` if the command is missing on this device.
    pub fn is_not_supported(&self) -> bool {
        matches!(self, Self::NotSupported { .. })
    }

    /// Returns `true` for failures of the round-trip itself.
    pub fn is_transport_failure(&self) -> bool {
        matches!(
            self,
            Self::Status { .. } | Self::Transport(_) | Self::Tls(_) | Self::InvalidUrl(_)
        )
    }

    /// HTTP status code, if the failure carried one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::NotSupported { .. } => Some(404),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
