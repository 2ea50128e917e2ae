// vapix-api: Blocking Rust client for VAPIX-style camera CGI endpoints

pub mod auth;
pub mod classify;
pub mod client;
pub mod error;
pub mod image;
pub mod parameters;
pub mod parse;
pub mod request;
pub mod system;
pub mod transport;
pub mod users;

pub use auth::Credentials;
pub use classify::{Outcome, classify};
pub use client::{ConnectionState, VapixClient};
pub use error::Error;
pub use image::{ImageOptions, Rotation};
pub use parameters::{AccessLevel, ParameterQuery};
pub use parse::{ParamValue, ParameterTree, Parameters, ServerReport};
pub use request::{Expect, Request};
pub use transport::{HttpTransport, RawResponse, TlsMode, Transport, TransportConfig};
pub use users::UserGroups;

// Header types appear in `Error::Status` and `RawResponse`.
pub use reqwest::header;
