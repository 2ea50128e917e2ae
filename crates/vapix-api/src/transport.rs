// HTTP transport for camera requests.
//
// The client only needs "GET this URL with these credentials and hand me
// status, headers and body". `Transport` is that seam; `HttpTransport`
// fills it with a blocking `reqwest::Client` built from `TransportConfig`.

use std::path::PathBuf;
use std::time::Duration;

use bytes::Bytes;
use reqwest::header::{CONTENT_TYPE, HeaderMap};
use tracing::trace;
use url::Url;

use crate::auth::Credentials;
use crate::error::Error;

const USER_AGENT: &str = concat!("vapix/", env!("CARGO_PKG_VERSION"));

/// TLS verification mode.
#[derive(Debug, Clone, Default)]
pub enum TlsMode {
    /// Use the system certificate store.
    #[default]
    System,
    /// Use a custom CA certificate from the given PEM file.
    CustomCa(PathBuf),
    /// Accept any certificate (for self-signed cameras).
    DangerAcceptInvalid,
}

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub tls: TlsMode,
    pub timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            tls: TlsMode::default(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl TransportConfig {
    /// Build a blocking `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::blocking::Client, Error> {
        let mut builder = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .user_agent(USER_AGENT);

        match &self.tls {
            TlsMode::System => {}
            TlsMode::CustomCa(path) => {
                let cert_pem = std::fs::read(path)
                    .map_err(|e| Error::Tls(format!("failed to read CA cert: {e}")))?;
                let cert = reqwest::Certificate::from_pem(&cert_pem)
                    .map_err(|e| Error::Tls(format!("invalid CA cert: {e}")))?;
                builder = builder.add_root_certificate(cert);
            }
            TlsMode::DangerAcceptInvalid => {
                builder = builder.danger_accept_invalid_certs(true);
            }
        }

        builder
            .build()
            .map_err(|e| Error::Tls(format!("failed to build HTTP client: {e}")))
    }
}

/// One completed HTTP round-trip, before any classification.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub reason: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Whether the response declares a `text/*` content type.
    pub fn is_text(&self) -> bool {
        self.headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.trim_start().to_ascii_lowercase().starts_with("text/"))
    }
}

/// Performs a single authenticated GET.
///
/// Implementations report a lower-level failure (connect, timeout, TLS) as
/// an `Err`; every response that arrived, whatever its status, is `Ok`.
pub trait Transport: Send + Sync {
    fn get(&self, url: &Url, credentials: &Credentials) -> Result<RawResponse, Error>;
}

/// [`Transport`] backed by a blocking `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new(config: &TransportConfig) -> Result<Self, Error> {
        Ok(Self {
            http: config.build_client()?,
        })
    }

    /// Wrap a pre-built client.
    pub fn with_client(http: reqwest::blocking::Client) -> Self {
        Self { http }
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &Url, credentials: &Credentials) -> Result<RawResponse, Error> {
        let resp = self
            .http
            .get(url.clone())
            .basic_auth(credentials.username(), Some(credentials.password()))
            .send()
            .map_err(Error::Transport)?;

        let status = resp.status();
        let headers = resp.headers().clone();
        let body = resp.bytes().map_err(Error::Transport)?;
        trace!(status = status.as_u16(), len = body.len(), "response received");

        Ok(RawResponse {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or_default().to_owned(),
            headers,
            body,
        })
    }
}
