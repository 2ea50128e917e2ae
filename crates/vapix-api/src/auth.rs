// Basic-auth credentials.

use secrecy::{ExposeSecret, SecretString};

/// HTTP basic-auth credentials attached to every request.
///
/// The password stays wrapped in [`SecretString`] so it never shows up in
/// `Debug` output or tracing fields.
#[derive(Debug, Clone)]
pub struct Credentials {
    username: String,
    password: SecretString,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: SecretString) -> Self {
        Self {
            username: username.into(),
            password,
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub(crate) fn password(&self) -> &str {
        self.password.expose_secret()
    }
}
