//! Dotted path expressions and their resolution against a document.
//!
//! A path such as `server.tls.cert` addresses a value by walking nested
//! mappings one key at a time. The empty string is the document root.
//! There is no escaping: a key that itself contains a `.` cannot be
//! addressed.

use std::fmt;

use serde_json::{Map, Value};

use crate::error::{DocError, DocResult};

/// A parsed path expression: an ordered list of exact-match keys.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Path {
    segments: Vec<String>,
}

impl Path {
    /// The empty path, addressing the document root.
    pub fn root() -> Self {
        Self::default()
    }

    /// Split a dotted string into segments.
    ///
    /// `""` is the root. Empty segments (`"a..b"`, `"a."`) are kept and match
    /// a literal empty key.
    pub fn parse(input: &str) -> Self {
        if input.is_empty() {
            return Self::root();
        }
        Self {
            segments: input.split('.').map(str::to_owned).collect(),
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Returns `true` for the empty path.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Extend this path with the segments of `other`.
    pub fn join(&self, other: &Path) -> Path {
        let mut segments = Vec::with_capacity(self.len() + other.len());
        segments.extend_from_slice(&self.segments);
        segments.extend_from_slice(&other.segments);
        Self { segments }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

impl From<&str> for Path {
    fn from(input: &str) -> Self {
        Self::parse(input)
    }
}

/// Resolve `path` to the value it addresses inside `doc`.
///
/// Fails with a not-found error ([`DocError::NoValue`] or
/// [`DocError::NoTable`]) when a key is missing or a level along the way is
/// not a mapping. The root path has no value of its own (the document is a
/// mapping, not a value) and resolves to [`DocError::NoValue`]; use
/// [`resolve_table`] for it.
pub fn resolve<'a>(doc: &'a Map<String, Value>, path: &Path) -> DocResult<&'a Value> {
    let Some((last, parents)) = path.segments.split_last() else {
        return Err(DocError::NoValue { key: String::new() });
    };
    let table = table_at(doc, parents)?;
    table.get(last).ok_or_else(|| DocError::NoValue {
        key: path.to_string(),
    })
}

/// Resolve `path` to a nested mapping. The root path resolves to `doc`.
pub fn resolve_table<'a>(
    doc: &'a Map<String, Value>,
    path: &Path,
) -> DocResult<&'a Map<String, Value>> {
    table_at(doc, &path.segments)
}

fn table_at<'a>(
    doc: &'a Map<String, Value>,
    segments: &[String],
) -> DocResult<&'a Map<String, Value>> {
    let mut current = doc;
    for (depth, segment) in segments.iter().enumerate() {
        current = match current.get(segment) {
            Some(Value::Object(table)) => table,
            Some(_) => {
                return Err(DocError::NoTable {
                    key: segments[..=depth].join("."),
                })
            }
            None => {
                return Err(DocError::NoValue {
                    key: segments[..=depth].join("."),
                })
            }
        };
    }
    Ok(current)
}

/// Walk to the mapping at `path`, creating missing levels.
///
/// Levels that exist but are not mappings are replaced by empty mappings,
/// the same outcome a deep merge of a mapping over a scalar produces.
pub(crate) fn table_entry<'a>(
    doc: &'a mut Map<String, Value>,
    path: &Path,
) -> &'a mut Map<String, Value> {
    let mut current = doc;
    for segment in &path.segments {
        let slot = current.entry(segment.clone()).or_insert(Value::Null);
        if !slot.is_object() {
            *slot = Value::Object(Map::new());
        }
        current = slot
            .as_object_mut()
            .expect("slot was just made a mapping");
    }
    current
}

/// Wrap `value` in a chain of singleton mappings mirroring `path`.
///
/// `nest("a.b", v)` is `{a: {b: v}}`. Returns `None` for the root path,
/// which has no key to hold the value.
pub fn nest(path: &Path, value: Value) -> Option<Map<String, Value>> {
    let (last, parents) = path.segments.split_last()?;
    let mut chain = Map::new();
    chain.insert(last.clone(), value);
    for segment in parents.iter().rev() {
        let mut outer = Map::new();
        outer.insert(segment.clone(), Value::Object(chain));
        chain = outer;
    }
    Some(chain)
}
