//! Adapter over the document format (YAML via `serde_yaml`) and JSON output.
//!
//! YAML is a superset of JSON, so JSON input decodes through the same path.
//! Values are held as `serde_json::Value`, a closed variant with no YAML
//! tags or non-string keys. It has no NaN or infinities either: `.nan` and
//! `.inf` decode to `null` without an error.
//!
//! YAML is only the byte format. Typed values move in and out of the value
//! tree through `serde_json`, so enums take their JSON shape
//! (`{"Variant": {...}}`) and never a YAML tag.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::coerce::kind_name;
use crate::error::{DocError, DocResult};

/// A document: the top level is always a mapping from string keys.
pub type Document = Map<String, Value>;

/// Decode YAML (or JSON) bytes into a document.
///
/// Empty input and an explicit top-level `null` are the empty document. Any
/// other top-level value that is not a mapping is rejected.
pub fn decode(bytes: &[u8]) -> DocResult<Document> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Document::new());
    }
    let value: Value = serde_yaml::from_slice(bytes)?;
    into_document(value)
}

/// Accept a value as a document if it is a mapping (or `null`).
pub fn into_document(value: Value) -> DocResult<Document> {
    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Document::new()),
        other => Err(DocError::NotAMapping {
            found: kind_name(&other),
        }),
    }
}

/// Serialize any value into the document's value tree.
///
/// Typed values and hand-built values normalize to the same shape. Fails for
/// maps with non-string keys.
pub fn normalize<T: Serialize + ?Sized>(value: &T) -> DocResult<Value> {
    Ok(serde_json::to_value(value)?)
}

/// Deserialize a `T` out of the document's value tree.
pub fn denormalize<T: DeserializeOwned>(value: Value) -> Result<T, serde_json::Error> {
    serde_json::from_value(value)
}

/// Render a document in the document format.
pub fn to_yaml(doc: &Document) -> DocResult<String> {
    Ok(serde_yaml::to_string(doc)?)
}

/// Render a document as compact JSON by converting its YAML rendering.
pub fn to_json(doc: &Document) -> DocResult<Vec<u8>> {
    let text = to_yaml(doc)?;
    let value: Value = serde_yaml::from_str(&text)?;
    Ok(serde_json::to_vec(&value)?)
}
