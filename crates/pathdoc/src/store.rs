use std::any::type_name;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, trace, Level};

use crate::codec::{self, Document};
use crate::coerce;
use crate::config::StoreConfig;
use crate::error::{BoxError, DocError, DocResult};
use crate::merge;
use crate::path::{self, Path};

/// Self-check hook for targets of [`Store::read_validated`].
///
/// Runs after the target has been populated; an `Err` becomes
/// [`DocError::Validation`].
pub trait Validate {
    fn validate(&self) -> Result<(), BoxError>;
}

/// A document addressed by dotted paths.
///
/// A `Store` shares its backing document with every sub-store taken from it
/// with [`get_store`](Self::get_store) and with its clones: nothing is copied,
/// and a write through any alias is visible through all of them. A sub-store
/// is anchored at its [`prefix`](Self::prefix) inside the shared document and
/// re-resolves that anchor on every call.
///
/// The backing document lives in an `Rc<RefCell<_>>`, so a `Store` is neither
/// `Send` nor `Sync`. Callers that need cross-thread access must hold the
/// data elsewhere behind their own lock.
#[derive(Clone)]
pub struct Store {
    root: Rc<RefCell<Document>>,
    prefix: Path,
    config: StoreConfig,
}

impl Store {
    /// A store holding the empty document.
    pub fn new() -> Self {
        Self::from_document(Document::new())
    }

    pub fn from_document(doc: Document) -> Self {
        Self {
            root: Rc::new(RefCell::new(doc)),
            prefix: Path::root(),
            config: StoreConfig::default(),
        }
    }

    /// Decode YAML or JSON bytes. The top level must be a mapping.
    pub fn decode(bytes: &[u8]) -> DocResult<Self> {
        codec::decode(bytes).map(Self::from_document)
    }

    /// Serialize a typed value and decode the result.
    ///
    /// Fails if the value cannot be serialized or does not serialize to a
    /// mapping.
    pub fn encode<T: Serialize + ?Sized>(value: &T) -> DocResult<Self> {
        codec::normalize(value)
            .and_then(codec::into_document)
            .map(Self::from_document)
    }

    pub fn with_config(mut self, config: StoreConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> StoreConfig {
        self.config
    }

    /// Where this store sits inside the shared document. Root stores have
    /// the empty prefix.
    pub fn prefix(&self) -> &Path {
        &self.prefix
    }

    /// Write `value` at `path`, creating missing mappings along the way.
    ///
    /// For a non-empty path the value is wrapped in a chain of mappings
    /// mirroring the path and deep-merged over the document, so sibling keys
    /// at every level survive and the new value wins at its leaf.
    ///
    /// The empty path replaces this store's whole document instead (no
    /// merge). The value must then serialize to a mapping (or `null`, which
    /// empties the document). For a sub-store the mapping at its anchor is
    /// replaced in place, and created if absent.
    pub fn set<T: Serialize + ?Sized>(&self, path: &str, value: &T) -> DocResult<()> {
        let path = Path::parse(path);
        let value = codec::normalize(value)?;
        let mut root = self.root.borrow_mut();

        if path.is_root() {
            let replacement = codec::into_document(value)?;
            *path::table_entry(&mut root, &self.prefix) = replacement;
            return Ok(());
        }

        if let Some(chain) = path::nest(&self.prefix.join(&path), value) {
            merge::merge(&mut root, chain);
        }
        Ok(())
    }

    /// The value at `path`, or `None` if the path does not resolve.
    ///
    /// The empty path yields the whole document as a mapping.
    pub fn get_raw(&self, path: &str) -> Option<Value> {
        match self.lookup(path, |doc| Value::Object(doc.clone()), Value::clone) {
            Ok(value) => Some(value),
            Err(error) => {
                debug!(prefix = %self.prefix, path, %error, "path lookup failed, treating as absent");
                None
            }
        }
    }

    /// Populate `into` from the value at `path`.
    ///
    /// The value is converted by serializing it and deserializing the result
    /// as `T`. When both the value and the target's current serialized form
    /// are mappings, the value is merged over the current form first, so
    /// fields the document does not mention keep their values.
    ///
    /// If the path does not resolve or holds `null`, `into` is left untouched
    /// and the call succeeds. A conversion failure is returned as
    /// [`DocError::Conversion`], or panics when the store is
    /// [strict](StoreConfig::strict).
    pub fn read<T>(&self, path: &str, into: &mut T) -> DocResult<()>
    where
        T: Serialize + DeserializeOwned,
    {
        let Some(found) = self.get_raw(path).filter(|value| !value.is_null()) else {
            return Ok(());
        };

        match convert(path, found, into) {
            Ok(value) => *into = value,
            Err(error) => {
                debug!(prefix = %self.prefix, path, %error, "typed read failed");
                if self.config.strict {
                    panic!("strict read of {path:?} failed: {error}");
                }
                return Err(error);
            }
        }

        if tracing::enabled!(Level::TRACE) {
            let rendered = serde_yaml::to_string(into).unwrap_or_else(|e| e.to_string());
            trace!(prefix = %self.prefix, path, "read\n{rendered}");
        }
        Ok(())
    }

    /// [`read`](Self::read), then run the target's [`Validate`] hook.
    ///
    /// The hook runs even when the path did not resolve and `into` kept its
    /// prior contents.
    pub fn read_validated<T>(&self, path: &str, into: &mut T) -> DocResult<()>
    where
        T: Serialize + DeserializeOwned + Validate,
    {
        self.read(path, into)?;
        into.validate().map_err(DocError::Validation)
    }

    /// The value at `path` as a string, or `""` if the path does not resolve.
    ///
    /// Unlike the other scalar getters a missing path is not an error here.
    pub fn get_string(&self, path: &str) -> String {
        self.lookup(path, coerce::table_to_string, coerce::to_string)
            .unwrap_or_default()
    }

    /// The value at `path` as a bool. Anything but a YAML bool is `false`.
    pub fn get_bool(&self, path: &str) -> DocResult<bool> {
        self.lookup(path, |_| false, coerce::to_bool)
    }

    pub fn get_bool_or(&self, path: &str, default: bool) -> bool {
        self.get_bool(path).unwrap_or(default)
    }

    /// The value at `path` as a float. Non-numbers are `0.0`.
    pub fn get_f64(&self, path: &str) -> DocResult<f64> {
        self.lookup(path, |_| 0.0, coerce::to_f64)
    }

    pub fn get_f64_or(&self, path: &str, default: f64) -> f64 {
        self.get_f64(path).unwrap_or(default)
    }

    /// The value at `path` as a float truncated toward zero.
    pub fn get_i64(&self, path: &str) -> DocResult<i64> {
        self.lookup(path, |_| 0, coerce::to_i64)
    }

    pub fn get_i64_or(&self, path: &str, default: i64) -> i64 {
        self.get_i64(path).unwrap_or(default)
    }

    /// Like [`get_i64`](Self::get_i64), narrowed to `i32` (saturating).
    pub fn get_int(&self, path: &str) -> DocResult<i32> {
        self.lookup(path, |_| 0, coerce::to_i32)
    }

    pub fn get_int_or(&self, path: &str, default: i32) -> i32 {
        self.get_int(path).unwrap_or(default)
    }

    /// Returns `true` if `path` resolves, even to an explicit `null`.
    pub fn is_set(&self, path: &str) -> bool {
        self.lookup(path, |_| (), |_| ()).is_ok()
    }

    /// A view of the mapping at `path`, sharing this store's document.
    ///
    /// Never fails. If nothing (or something other than a mapping) is at
    /// `path`, the view's document is absent: every read through it behaves
    /// as not-found and it renders as an empty mapping. Writes through such
    /// a view create the mapping in the shared document.
    pub fn get_store(&self, path: &str) -> Store {
        let prefix = self.prefix.join(&Path::parse(path));
        {
            let root = self.root.borrow();
            if let Err(error) = path::resolve_table(&root, &prefix) {
                debug!(prefix = %prefix, %error, "sub-store has no mapping at its anchor");
            }
        }
        Store {
            root: Rc::clone(&self.root),
            prefix,
            config: self.config,
        }
    }

    /// Render the document as YAML.
    pub fn to_yaml(&self) -> DocResult<Vec<u8>> {
        self.with_document(codec::to_yaml).map(String::into_bytes)
    }

    /// Render the document as compact JSON.
    pub fn to_json(&self) -> DocResult<Vec<u8>> {
        self.with_document(codec::to_json)
    }

    /// Run `on_value` on the value at `path` while the document is borrowed.
    /// The empty path goes to `on_table` with this store's whole document.
    ///
    /// A mapping coerces like any other non-scalar, so the scalar getters
    /// pass a constant for `on_table`.
    fn lookup<R>(
        &self,
        path: &str,
        on_table: impl FnOnce(&Document) -> R,
        on_value: impl FnOnce(&Value) -> R,
    ) -> DocResult<R> {
        let path = Path::parse(path);
        let root = self.root.borrow();
        let doc = path::resolve_table(&root, &self.prefix)?;
        if path.is_root() {
            return Ok(on_table(doc));
        }
        path::resolve(doc, &path).map(on_value)
    }

    /// Run `f` on this store's document, or on an empty one if the anchor
    /// does not resolve to a mapping.
    fn with_document<R>(&self, f: impl FnOnce(&Document) -> R) -> R {
        let root = self.root.borrow();
        match path::resolve_table(&root, &self.prefix) {
            Ok(doc) => f(doc),
            Err(_) => f(&Document::new()),
        }
    }
}

/// Convert `found` into a `T`, overlaying it on `current` when both are
/// mappings.
///
/// An overlay that does not convert (two variants of one enum merged side
/// by side, say) is dropped and `found` is converted on its own.
fn convert<T>(path: &str, found: Value, current: &T) -> DocResult<T>
where
    T: Serialize + DeserializeOwned,
{
    if let (Ok(Value::Object(base)), Value::Object(overlay)) = (codec::normalize(current), &found)
    {
        let overlaid = Value::Object(merge::merged(base, overlay.clone()));
        match codec::denormalize(overlaid) {
            Ok(value) => return Ok(value),
            Err(error) => trace!(path, %error, "overlay did not convert, using the value alone"),
        }
    }
    codec::denormalize(found).map_err(|e| DocError::Conversion {
        path: path.to_string(),
        target: type_name::<T>(),
        reason: e.to_string(),
    })
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Store {
    /// The YAML rendering. Serialization failures render as their message.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.with_document(codec::to_yaml) {
            Ok(text) => f.write_str(&text),
            Err(error) => write!(f, "{error}"),
        }
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keys = self.with_document(|doc| doc.len());
        f.debug_struct("Store")
            .field("prefix", &self.prefix.to_string())
            .field("keys", &keys)
            .field("strict", &self.config.strict)
            .finish()
    }
}
