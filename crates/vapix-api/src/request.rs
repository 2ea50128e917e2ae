// Request description: which CGI to hit and with what query.

use url::Url;

use crate::error::Error;

/// What the caller expects the body to contain.
///
/// Binary responses skip the in-band error-marker scan unless the camera
/// labels the body `text/*`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Expect {
    #[default]
    Text,
    Binary,
}

/// A single GET against `{endpoint}/{subdir}/{command}.{extension}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    subdir: String,
    command: String,
    extension: String,
    query: Vec<(String, String)>,
    expect: Expect,
}

impl Request {
    pub fn new(
        subdir: impl Into<String>,
        command: impl Into<String>,
        extension: impl Into<String>,
    ) -> Self {
        Self {
            subdir: subdir.into(),
            command: command.into(),
            extension: extension.into(),
            query: Vec::new(),
            expect: Expect::Text,
        }
    }

    /// Shorthand for a `.cgi` command.
    pub fn cgi(subdir: impl Into<String>, command: impl Into<String>) -> Self {
        Self::new(subdir, command, "cgi")
    }

    /// Append one `key=value` pair.
    pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Append `key=value` only when `value` is present.
    pub fn param_opt<V: ToString>(self, key: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(v) => self.param(key, v),
            None => self,
        }
    }

    /// Append one `key=value` pair per element, preserving order.
    pub fn params<I, V>(mut self, key: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: ToString,
    {
        self.query
            .extend(values.into_iter().map(|v| (key.to_owned(), v.to_string())));
        self
    }

    pub fn binary(mut self) -> Self {
        self.expect = Expect::Binary;
        self
    }

    pub fn expect(&self) -> Expect {
        self.expect
    }

    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    /// Logical name used in diagnostics, e.g. `admin/param`.
    pub fn command_name(&self) -> String {
        if self.subdir.is_empty() {
            self.command.clone()
        } else {
            format!("{}/{}", self.subdir.trim_matches('/'), self.command)
        }
    }

    /// Build the full URL against a camera endpoint such as
    /// `http://192.168.0.90/axis-cgi`.
    pub fn url(&self, endpoint: &Url) -> Result<Url, Error> {
        let mut path = String::from(endpoint.as_str().trim_end_matches('/'));
        let subdir = self.subdir.trim_matches('/');
        if !subdir.is_empty() {
            path.push('/');
            path.push_str(subdir);
        }
        path.push('/');
        path.push_str(&self.command);
        if !self.extension.is_empty() {
            path.push('.');
            path.push_str(&self.extension);
        }

        let mut url = Url::parse(&path)?;
        if !self.query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(self.query.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        }
        Ok(url)
    }
}
