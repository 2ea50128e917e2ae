// Parameter endpoints
//
// `param.cgi?action=list` returns `root.Group.Sub.Key=value` lines. The
// listing is filtered by group and by the user group whose view of the
// parameters is wanted.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use tracing::debug;

use crate::client::VapixClient;
use crate::error::Error;
use crate::parse::{ParameterTree, Parameters, parse_parameter_tree, parse_parameters};
use crate::request::Request;

/// Permission level a parameter listing is evaluated for.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum AccessLevel {
    #[default]
    Admin,
    Operator,
    Viewer,
}

/// Which slice of the parameter tree to list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ParameterQuery {
    /// Group filter such as `Network.RTSP`; `None` lists everything.
    pub group: Option<String>,
    pub level: AccessLevel,
}

impl ParameterQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn group(group: impl Into<String>) -> Self {
        Self {
            group: Some(group.into()),
            level: AccessLevel::default(),
        }
    }

    pub fn with_level(mut self, level: AccessLevel) -> Self {
        self.level = level;
        self
    }

    /// `admin/param.cgi?action=list[&group=..][&usergroup=..]`
    ///
    /// Admin is the device default and is not sent.
    pub fn request(&self) -> Request {
        let usergroup = (self.level != AccessLevel::Admin).then_some(self.level);
        Request::cgi("admin", "param")
            .param("action", "list")
            .param_opt("group", self.group.as_deref())
            .param_opt("usergroup", usergroup)
    }
}

impl VapixClient {
    /// List parameters as a flat dotted-path map.
    pub fn parameters(&self, query: &ParameterQuery) -> Result<Parameters, Error> {
        debug!(group = ?query.group, level = %query.level, "listing parameters");
        let text = self.text(&query.request())?;
        Ok(parse_parameters(&text))
    }

    /// List parameters expanded into a tree.
    pub fn parameter_tree(&self, query: &ParameterQuery) -> Result<ParameterTree, Error> {
        debug!(group = ?query.group, level = %query.level, "listing parameter tree");
        let text = self.text(&query.request())?;
        Ok(parse_parameter_tree(&text))
    }
}
