// Camera HTTP client
//
// Wraps a `Transport` with endpoint-relative URL construction, basic auth
// and response classification. Endpoint families (system, parameters,
// users, image) are inherent methods in their own files to keep this
// module focused on request mechanics.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use bytes::Bytes;
use tracing::{debug, info};
use url::Url;

use crate::auth::Credentials;
use crate::classify::classify;
use crate::error::Error;
use crate::request::Request;
use crate::transport::{HttpTransport, Transport, TransportConfig};

/// Lifecycle of a client: configured until the camera first answers 2xx.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Configured,
    Ready,
}

/// Raw client for one camera's CGI endpoints.
///
/// Every method issues exactly one GET and blocks until the transport
/// returns. Nothing is cached here; see `vapix_core::Camera` for that.
pub struct VapixClient {
    transport: Arc<dyn Transport>,
    endpoint: Url,
    credentials: Credentials,
    ready: AtomicBool,
}

impl VapixClient {
    /// Create a client with an HTTP transport built from `config`.
    ///
    /// `endpoint` is the CGI root, e.g. `http://192.168.0.90/axis-cgi`.
    pub fn new(
        endpoint: Url,
        credentials: Credentials,
        config: &TransportConfig,
    ) -> Result<Self, Error> {
        let transport = HttpTransport::new(config)?;
        Ok(Self::with_transport(endpoint, credentials, Arc::new(transport)))
    }

    /// Create a client over an existing transport.
    pub fn with_transport(
        endpoint: Url,
        credentials: Credentials,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            transport,
            endpoint,
            credentials,
            ready: AtomicBool::new(false),
        }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn username(&self) -> &str {
        self.credentials.username()
    }

    pub fn state(&self) -> ConnectionState {
        if self.ready.load(Ordering::Acquire) {
            ConnectionState::Ready
        } else {
            ConnectionState::Configured
        }
    }

    /// Send `request` and return the classified body.
    pub fn execute(&self, request: &Request) -> Result<Bytes, Error> {
        let url = request.url(&self.endpoint)?;
        let command = request.command_name();
        debug!(%url, "GET");

        let response = self.transport.get(&url, &self.credentials)?;
        if response.is_success() && !self.ready.swap(true, Ordering::AcqRel) {
            info!(endpoint = %self.endpoint, "camera ready");
        }

        classify(response, &command, request.expect()).into_result(&command, url.as_str())
    }

    /// Send `request` and decode the body as (lossy) UTF-8.
    pub fn text(&self, request: &Request) -> Result<String, Error> {
        let body = self.execute(request)?;
        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}

impl fmt::Debug for VapixClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VapixClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("username", &self.credentials.username())
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}
