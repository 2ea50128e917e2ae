// ── Runtime camera configuration ──
//
// These types describe *how* to reach one camera. They carry credentials
// and tuning but never touch disk; the CLI (via vapix-config) builds a
// `CameraConfig` and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use vapix_api::transport::{TlsMode, TransportConfig};

use crate::cache::CacheLimits;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed certs).
    DangerAcceptInvalid,
}

/// Configuration for one camera.
#[derive(Debug, Clone)]
pub struct CameraConfig {
    /// CGI root, e.g. `http://192.168.0.90/axis-cgi`.
    pub endpoint: Url,
    pub username: String,
    pub password: SecretString,
    pub tls: TlsVerification,
    /// Request timeout.
    pub timeout: Duration,
    pub cache: CacheLimits,
}

impl CameraConfig {
    /// Config with default TLS, timeout and cache limits.
    pub fn new(endpoint: Url, username: impl Into<String>, password: SecretString) -> Self {
        Self {
            endpoint,
            username: username.into(),
            password,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            cache: CacheLimits::default(),
        }
    }

    pub(crate) fn transport(&self) -> TransportConfig {
        let tls = match &self.tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        };
        TransportConfig {
            tls,
            timeout: self.timeout,
        }
    }
}
