//! Path-addressed document store.
//!
//! A [`Store`] holds a dynamically-typed document (a nested mapping decoded
//! from YAML or JSON) and lets callers read and write single values by dotted
//! path, coerce values to scalars, pull typed structs out of any subtree, and
//! render the whole document back out.
//!
//! # Components
//!
//! - [`path`] -- dotted path parsing and resolution
//! - [`coerce`] -- best-effort scalar coercion (never fails)
//! - [`merge`] -- directional deep merge of nested mappings
//! - [`codec`] -- YAML/JSON decoding, normalization, and rendering
//! - [`Store`] -- the path-addressed read/write surface
//!
//! # Design Rules
//!
//! 1. The top level of a document is always a mapping.
//! 2. A path that does not resolve is absence, never a structural error.
//! 3. `set` on a non-empty path deep-merges; `set` on the root overwrites.
//! 4. Sub-stores share the parent's document; nothing is deep-copied.
//! 5. Stores are single-threaded (`!Send`, `!Sync`).
//!
//! # Example
//!
//! ```
//! use pathdoc::Store;
//!
//! let store = Store::decode(br#"{"a":{"b":"c","x":"y"}}"#)?;
//! store.set("a.b", "c1")?;
//! assert_eq!(store.get_string("a.b"), "c1");
//! assert_eq!(store.to_json()?, br#"{"a":{"b":"c1","x":"y"}}"#);
//!
//! assert_eq!(store.get_string("missing"), "");
//! assert!(store.get_i64("missing").is_err());
//! assert_eq!(store.get_i64_or("missing", 8), 8);
//!
//! let a = store.get_store("a");
//! a.set("z", &true)?;
//! assert!(store.get_bool("a.z")?);
//! # Ok::<(), pathdoc::DocError>(())
//! ```

pub mod codec;
pub mod coerce;
pub mod config;
pub mod error;
pub mod merge;
pub mod path;
pub mod store;

// Re-export primary types at crate root for ergonomic imports.
pub use codec::Document;
pub use config::StoreConfig;
pub use error::{BoxError, DocError, DocResult};
pub use path::Path;
pub use store::{Store, Validate};
