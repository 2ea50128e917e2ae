// User group listing: `pwdgrp.cgi?action=get`.
//
// The device answers with `group="member1,member2"` lines. Member names
// are kept verbatim; `0042` is a username, not a number.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::client::VapixClient;
use crate::error::Error;
use crate::request::Request;

/// Members of each user group, e.g. `admin -> [root, joe]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserGroups {
    groups: IndexMap<String, Vec<String>>,
}

impl UserGroups {
    pub fn members(&self, group: &str) -> &[String] {
        self.groups.get(group).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn groups(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.groups.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Every distinct user, in first-seen order.
    pub fn users(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for member in self.groups.values().flatten() {
            if !seen.contains(&member.as_str()) {
                seen.push(member);
            }
        }
        seen
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

pub fn parse_user_groups(text: &str) -> UserGroups {
    let mut groups = IndexMap::new();
    for line in text.lines() {
        let Some((group, members)) = line.split_once('=') else {
            continue;
        };
        let group = group.trim();
        if group.is_empty() {
            continue;
        }
        let members = members
            .trim()
            .trim_matches('"')
            .split(',')
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_owned)
            .collect();
        groups.insert(group.to_owned(), members);
    }
    UserGroups { groups }
}

impl VapixClient {
    /// List user groups and their members.
    ///
    /// `GET admin/pwdgrp.cgi?action=get`
    pub fn users(&self) -> Result<UserGroups, Error> {
        debug!("listing users");
        let text = self.text(&Request::cgi("admin", "pwdgrp").param("action", "get"))?;
        Ok(parse_user_groups(&text))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parses_quoted_member_lists() {
        let groups = parse_user_groups(
            "admin=\"root,joe\"\noperator=\"root\"\nviewer=\"root,joe,guest\"\ndigusers=\"\"\n",
        );
        assert_eq!(groups.members("admin"), ["root", "joe"]);
        assert_eq!(groups.members("operator"), ["root"]);
        assert!(groups.members("digusers").is_empty());
        assert!(groups.members("nobody").is_empty());
        assert_eq!(groups.users(), vec!["root", "joe", "guest"]);
    }

    #[test]
    fn member_names_are_not_typed() {
        let groups = parse_user_groups("admin=\"root,007, 1.50\"\nviewer=\"0042\"\nops=yes\n");
        assert_eq!(groups.members("admin"), ["root", "007", "1.50"]);
        assert_eq!(groups.members("viewer"), ["0042"]);
        assert_eq!(groups.members("ops"), ["yes"]);
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let groups = parse_user_groups("junk
=\"root\"
admin=\"root\"
");
        assert_eq!(groups.groups().count(), 1);
        assert_eq!(groups.members("admin"), ["root"]);
    }
}
