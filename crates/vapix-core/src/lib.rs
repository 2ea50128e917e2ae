// vapix-core: Cached, typed camera facade between vapix-api and consumers.

pub mod cache;
pub mod camera;
pub mod config;
pub mod error;

// ── Primary re-exports ──────────────────────────────────────────────
pub use cache::{CacheKey, CacheLimits, CacheStats, TtlCache};
pub use camera::Camera;
pub use config::{CameraConfig, TlsVerification};
pub use error::CoreError;

// Request and result types callers need alongside `Camera`.
pub use vapix_api::{
    AccessLevel, ConnectionState, ImageOptions, ParamValue, ParameterQuery, ParameterTree,
    Parameters, Request, Rotation, ServerReport, Transport, UserGroups,
};
