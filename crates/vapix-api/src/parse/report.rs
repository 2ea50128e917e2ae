// Server report parsing: `----- Name -----` dividers split the text into sections.

use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// `----- Name -----` at the start of a line, up to and including its line break.
static DIVIDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^-----(.+?)-----[ \t]*(?:\r?\n|\z)").expect("section divider")
});

static NON_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\W+").expect("non-word run"));

/// A server report split into its sections.
///
/// Keys are normalized section names (`"----- Network Status -----"` becomes
/// `network_status`); values are the raw section bodies, line breaks included.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServerReport {
    sections: IndexMap<String, String>,
}

impl ServerReport {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.sections.get(name).map(String::as_str)
    }

    /// Look up a section by its display name, e.g. `"Network Status"`.
    pub fn section(&self, display_name: &str) -> Option<&str> {
        self.get(&normalize_section_name(display_name))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.sections.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

/// Lowercase, collapse non-word runs to `_`, strip outer underscores.
pub fn normalize_section_name(name: &str) -> String {
    let lowered = name.to_lowercase();
    NON_WORD
        .replace_all(&lowered, "_")
        .trim_matches('_')
        .to_owned()
}

/// Split a multi-section report. Text before the first divider is dropped;
/// input without dividers yields an empty report.
pub fn parse_server_report(text: &str) -> ServerReport {
    let mut sections = IndexMap::new();
    let dividers: Vec<_> = DIVIDER.captures_iter(text).collect();

    for (i, caps) in dividers.iter().enumerate() {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let end = dividers
            .get(i + 1)
            .and_then(|next| next.get(0))
            .map_or(text.len(), |m| m.start());
        let body = text.get(whole.end()..end).unwrap_or_default();
        sections.insert(normalize_section_name(name.as_str()), body.to_owned());
    }

    ServerReport { sections }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn splits_sections_keeping_body_whitespace() {
        let report =
            parse_server_report("----- foo -----\r\nhello\r\n----- bar -----\r\nworld\r\n");
        assert_eq!(report.len(), 2);
        assert_eq!(report.get("foo"), Some("hello\r\n"));
        assert_eq!(report.get("bar"), Some("world\r\n"));
    }

    #[test]
    fn leading_chunk_is_discarded() {
        let report = parse_server_report("preamble\n----- Uptime -----\n12 days\n");
        assert_eq!(report.names().collect::<Vec<_>>(), vec!["uptime"]);
        assert_eq!(report.get("uptime"), Some("12 days\n"));
    }

    #[test]
    fn no_dividers_is_empty() {
        assert!(parse_server_report("just some text\nwith lines\n").is_empty());
        assert!(parse_server_report("").is_empty());
    }

    #[test]
    fn names_are_normalized() {
        assert_eq!(normalize_section_name(" Network Status (eth0) "), "network_status_eth0");
        assert_eq!(normalize_section_name("--IP/Routing--"), "ip_routing");

        let report = parse_server_report("----- Network Status -----\nup\n");
        assert_eq!(report.section("Network Status"), Some("up\n"));
    }

    #[test]
    fn later_duplicate_overwrites_earlier() {
        let report = parse_server_report("----- Log -----\nfirst\n----- LOG -----\nsecond\n");
        assert_eq!(report.len(), 1);
        assert_eq!(report.get("log"), Some("second\n"));
    }

    #[test]
    fn divider_at_end_of_text_gives_empty_body() {
        let report = parse_server_report("----- a -----\nx\n----- b -----");
        assert_eq!(report.get("a"), Some("x\n"));
        assert_eq!(report.get("b"), Some(""));
    }

    #[test]
    fn dashes_inside_a_line_are_not_dividers() {
        let report = parse_server_report("----- a -----\nfoo ----- bar -----\n");
        assert_eq!(report.len(), 1);
        assert_eq!(report.get("a"), Some("foo ----- bar -----\n"));
    }

    #[test]
    fn parsing_twice_is_structurally_equal() {
        let text = "----- one -----\n1\n----- two -----\n2\n";
        assert_eq!(parse_server_report(text), parse_server_report(text));
    }
}
