// ── Camera facade ──
//
// Typed, cache-backed access to one camera. Text endpoints are cached
// under a key naming the operation and every parameter that shapes its
// result; images and raw requests always go to the device.

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use serde::Serialize;
use tracing::{Span, debug, info_span, warn};

use vapix_api::{
    ConnectionState, Credentials, ImageOptions, ParameterQuery, ParameterTree, Parameters,
    Request, ServerReport, Transport, UserGroups, VapixClient,
};

use crate::cache::{CacheKey, CacheStats, TtlCache};
use crate::config::CameraConfig;
use crate::error::CoreError;

// ── Cached values ────────────────────────────────────────────────

/// Everything the camera cache can hold. Serialized untagged so an
/// entry's size is the size of the payload alone.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
enum CachedResponse {
    Report(ServerReport),
    Log(String),
    Parameters(Parameters),
    Tree(ParameterTree),
    Users(UserGroups),
}

impl CachedResponse {
    fn kind(&self) -> &'static str {
        match self {
            Self::Report(_) => "server report",
            Self::Log(_) => "system log",
            Self::Parameters(_) => "parameters",
            Self::Tree(_) => "parameter tree",
            Self::Users(_) => "user groups",
        }
    }
}

fn mismatch(key: &CacheKey, found: &CachedResponse) -> CoreError {
    CoreError::Internal(format!("cache entry {key} holds {}", found.kind()))
}

fn parameter_key(operation: &str, query: &ParameterQuery) -> CacheKey {
    // The level is always part of the key, even though admin is not sent.
    CacheKey::new(operation)
        .with_opt("group", query.group.as_deref())
        .with("level", query.level)
}

// ── Camera ───────────────────────────────────────────────────────

/// One camera: a raw client plus its response cache.
///
/// Cheaply cloneable; clones share the client, cache and state. Every
/// call runs inside the camera's tracing span.
#[derive(Clone)]
pub struct Camera {
    inner: Arc<CameraInner>,
    span: Span,
}

struct CameraInner {
    config: CameraConfig,
    client: VapixClient,
    cache: TtlCache<CachedResponse>,
}

impl Camera {
    /// Build a camera with an HTTP transport. Does not contact the device.
    pub fn new(config: CameraConfig) -> Result<Self, CoreError> {
        let client = VapixClient::new(
            config.endpoint.clone(),
            credentials(&config),
            &config.transport(),
        )?;
        Ok(Self::from_parts(config, client))
    }

    /// Build a camera over an existing transport.
    pub fn with_transport(config: CameraConfig, transport: Arc<dyn Transport>) -> Self {
        let client =
            VapixClient::with_transport(config.endpoint.clone(), credentials(&config), transport);
        Self::from_parts(config, client)
    }

    fn from_parts(config: CameraConfig, client: VapixClient) -> Self {
        let span = info_span!("camera", endpoint = %config.endpoint);
        let cache = TtlCache::new(config.cache);
        Self {
            inner: Arc::new(CameraInner {
                config,
                client,
                cache,
            }),
            span,
        }
    }

    /// Replace the span every call of this handle runs in.
    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn config(&self) -> &CameraConfig {
        &self.inner.config
    }

    /// The uncached client underneath.
    pub fn client(&self) -> &VapixClient {
        &self.inner.client
    }

    pub fn state(&self) -> ConnectionState {
        self.inner.client.state()
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.inner.cache.stats()
    }

    /// Number of entries currently cached, expired ones included.
    pub fn cache_len(&self) -> usize {
        self.inner.cache.len()
    }

    /// Bytes currently held by the cache.
    pub fn cache_size(&self) -> usize {
        self.inner.cache.total_size()
    }

    pub fn clear_cache(&self) {
        let _enter = self.span.enter();
        debug!("clearing response cache");
        self.inner.cache.clear();
    }

    // ── Cached accessors ─────────────────────────────────────────

    /// `admin/serverreport.cgi`, split into sections.
    pub fn server_report(&self) -> Result<ServerReport, CoreError> {
        let _enter = self.span.enter();
        let key = CacheKey::new("server_report");
        match self.cached(&key, |c| c.server_report().map(CachedResponse::Report))? {
            CachedResponse::Report(report) => Ok(report),
            other => Err(mismatch(&key, &other)),
        }
    }

    /// `admin/systemlog.cgi` as text.
    pub fn system_log(&self) -> Result<String, CoreError> {
        let _enter = self.span.enter();
        let key = CacheKey::new("system_log");
        match self.cached(&key, |c| c.system_log().map(CachedResponse::Log))? {
            CachedResponse::Log(log) => Ok(log),
            other => Err(mismatch(&key, &other)),
        }
    }

    /// Flat parameter listing for `query`.
    pub fn parameters(&self, query: &ParameterQuery) -> Result<Parameters, CoreError> {
        let _enter = self.span.enter();
        let key = parameter_key("parameters", query);
        match self.cached(&key, |c| {
            c.parameters(query).map(CachedResponse::Parameters)
        })? {
            CachedResponse::Parameters(params) => Ok(params),
            other => Err(mismatch(&key, &other)),
        }
    }

    /// Nested parameter listing for `query`.
    pub fn parameter_tree(&self, query: &ParameterQuery) -> Result<ParameterTree, CoreError> {
        let _enter = self.span.enter();
        let key = parameter_key("parameter_tree", query);
        match self.cached(&key, |c| {
            c.parameter_tree(query).map(CachedResponse::Tree)
        })? {
            CachedResponse::Tree(tree) => Ok(tree),
            other => Err(mismatch(&key, &other)),
        }
    }

    /// User group membership from `admin/pwdgrp.cgi`.
    pub fn users(&self) -> Result<UserGroups, CoreError> {
        let _enter = self.span.enter();
        let key = CacheKey::new("users");
        match self.cached(&key, |c| c.users().map(CachedResponse::Users))? {
            CachedResponse::Users(users) => Ok(users),
            other => Err(mismatch(&key, &other)),
        }
    }

    // ── Uncached ─────────────────────────────────────────────────

    /// JPEG snapshot. Never cached.
    pub fn image(&self, options: &ImageOptions) -> Result<Bytes, CoreError> {
        let _enter = self.span.enter();
        self.call(|c| c.image(options))
    }

    /// Bitmap snapshot. Never cached.
    pub fn bitmap(&self, options: &ImageOptions) -> Result<Bytes, CoreError> {
        let _enter = self.span.enter();
        self.call(|c| c.bitmap(options))
    }

    /// Send an arbitrary request through the classifier. Never cached.
    pub fn raw(&self, request: &Request) -> Result<Bytes, CoreError> {
        let _enter = self.span.enter();
        self.call(|c| c.execute(request))
    }

    // ── Plumbing ─────────────────────────────────────────────────

    fn cached(
        &self,
        key: &CacheKey,
        produce: impl FnOnce(&VapixClient) -> Result<CachedResponse, vapix_api::Error>,
    ) -> Result<CachedResponse, CoreError> {
        self.inner.cache.fetch(key, || self.call(produce))
    }

    fn call<T>(
        &self,
        f: impl FnOnce(&VapixClient) -> Result<T, vapix_api::Error>,
    ) -> Result<T, CoreError> {
        f(&self.inner.client).map_err(|e| {
            let err = CoreError::from(e);
            if err.is_transport_failure() {
                warn!(error = %err, "camera request failed");
            } else {
                debug!(error = %err, "camera rejected request");
            }
            err
        })
    }
}

fn credentials(config: &CameraConfig) -> Credentials {
    Credentials::new(config.username.clone(), config.password.clone())
}

impl fmt::Debug for Camera {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Camera")
            .field("client", &self.inner.client)
            .field("cache", &self.inner.cache.stats())
            .finish_non_exhaustive()
    }
}
