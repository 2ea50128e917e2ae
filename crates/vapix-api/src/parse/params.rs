// Parameter listing parsing: `path=value` lines into flat or nested typed maps.

use std::fmt;
use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};

static INTEGER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]+$").expect("integer"));
static FLOAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+\.[0-9]+$").expect("float"));
static LIST_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",\s*").expect("list separator"));

const ROOT_PREFIX: &str = "root.";

// ── Values ──────────────────────────────────────────────────────────

/// A typed parameter value.
///
/// Only unsigned decimal forms become numbers; `-5`, `1e3` and `0x10`
/// stay [`Text`](Self::Text).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    List(Vec<ParamValue>),
}

impl ParamValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            #[allow(clippy::cast_precision_loss, clippy::as_conversions)]
            Self::Integer(n) => Some(*n as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[ParamValue]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }
}

/// Renders in the device dialect (`yes`/`no`, comma-joined lists).
///
/// Numbers are printed from their typed value, so `1.50` renders as `1.5`.
impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(true) => f.write_str("yes"),
            Self::Bool(false) => f.write_str("no"),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(s) => f.write_str(s),
            Self::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
        }
    }
}

/// Type a right-hand side.
///
/// Precedence: `yes`/`no`, integer, float, comma-separated list, string.
/// List elements are typed as scalars and never split again.
pub fn parse_value(raw: &str) -> ParamValue {
    let value = raw.trim();
    match parse_scalar(value) {
        ParamValue::Text(text) if text.contains(',') => ParamValue::List(
            LIST_SEPARATOR
                .split(&text)
                .map(|piece| parse_scalar(piece.trim()))
                .collect(),
        ),
        scalar => scalar,
    }
}

fn parse_scalar(value: &str) -> ParamValue {
    match value {
        "yes" => return ParamValue::Bool(true),
        "no" => return ParamValue::Bool(false),
        _ => {}
    }
    if INTEGER.is_match(value) {
        // Out-of-range integers keep their text.
        if let Ok(n) = value.parse() {
            return ParamValue::Integer(n);
        }
    } else if FLOAT.is_match(value) {
        if let Ok(f) = value.parse() {
            return ParamValue::Float(f);
        }
    }
    ParamValue::Text(value.to_owned())
}

// ── Lines ───────────────────────────────────────────────────────────

/// `(path, raw value)` for every well-formed line, `root.` stripped.
fn entries(text: &str) -> impl Iterator<Item = (&str, &str)> {
    text.lines().filter_map(|line| {
        let (path, value) = line.split_once('=')?;
        let path = path.trim();
        let path = path.strip_prefix(ROOT_PREFIX).unwrap_or(path);
        (!path.is_empty()).then_some((path, value))
    })
}

// ── Flat ────────────────────────────────────────────────────────────

/// Flat parameter listing keyed by dotted path, in device order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Parameters {
    values: IndexMap<String, ParamValue>,
}

impl Parameters {
    pub fn get(&self, path: &str) -> Option<&ParamValue> {
        self.values.get(path)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Entries whose path starts with `prefix.` (or equals `prefix`).
    pub fn group<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = (&'a str, &'a ParamValue)> {
        self.iter().filter(move |(path, _)| {
            path.strip_prefix(prefix)
                .is_some_and(|rest| rest.is_empty() || rest.starts_with('.'))
        })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(String, ParamValue)> for Parameters {
    fn from_iter<I: IntoIterator<Item = (String, ParamValue)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// Parse `path=value` lines into a flat map. Later duplicates win.
pub fn parse_parameters(text: &str) -> Parameters {
    entries(text)
        .map(|(path, value)| (path.to_owned(), parse_value(value)))
        .collect()
}

// ── Nested ──────────────────────────────────────────────────────────

/// Parameters expanded along their dotted paths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterTree {
    Leaf(ParamValue),
    Node(IndexMap<String, ParameterTree>),
}

impl Default for ParameterTree {
    fn default() -> Self {
        Self::Node(IndexMap::new())
    }
}

impl ParameterTree {
    /// Walk a dotted path, e.g. `"Network.RTSP"`.
    pub fn get(&self, path: &str) -> Option<&ParameterTree> {
        path.split('.').try_fold(self, |node, segment| match node {
            Self::Node(children) => children.get(segment),
            Self::Leaf(_) => None,
        })
    }

    /// Leaf value at a dotted path.
    pub fn value(&self, path: &str) -> Option<&ParamValue> {
        match self.get(path)? {
            Self::Leaf(value) => Some(value),
            Self::Node(_) => None,
        }
    }

    pub fn children(&self) -> Option<&IndexMap<String, ParameterTree>> {
        match self {
            Self::Node(children) => Some(children),
            Self::Leaf(_) => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.children().is_some_and(IndexMap::is_empty)
    }

    /// Set `value` at `segments`, creating or replacing nodes on the way.
    fn insert(&mut self, segments: &[&str], value: ParamValue) {
        let Some((last, parents)) = segments.split_last() else {
            return;
        };
        if let Self::Leaf(_) = self {
            *self = Self::default();
        }
        let mut node = match self {
            Self::Node(children) => children,
            Self::Leaf(_) => return,
        };
        for segment in parents {
            let entry = node
                .entry((*segment).to_owned())
                .or_insert_with(Self::default);
            if let Self::Leaf(_) = entry {
                *entry = Self::default();
            }
            let Self::Node(children) = entry else {
                return;
            };
            node = children;
        }
        node.insert((*last).to_owned(), Self::Leaf(value));
    }
}

/// Parse `path=value` lines into a tree keyed by path segment.
///
/// The last line touching a position wins, so `A=1` followed by `A.B=2`
/// leaves `A` as a node.
pub fn parse_parameter_tree(text: &str) -> ParameterTree {
    let mut tree = ParameterTree::default();
    for (path, value) in entries(text) {
        let segments: Vec<&str> = path.split('.').collect();
        tree.insert(&segments, parse_value(value));
    }
    tree
}
