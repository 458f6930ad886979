/// Boxed error returned by caller-supplied [`Validate`](crate::Validate) hooks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors from document store operations.
#[derive(Debug, thiserror::Error)]
pub enum DocError {
    /// The input is not valid YAML, or a value could not be rendered as YAML.
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A value could not be rendered as JSON.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The top level of a document must be a mapping from string keys.
    #[error("document root must be a mapping, found {found}")]
    NotAMapping { found: &'static str },

    /// The path walked off the end of a mapping: the last key is absent.
    #[error("{key:?} is not a value")]
    NoValue { key: String },

    /// The path tried to descend through something that is not a mapping.
    #[error("{key:?} is not a table")]
    NoTable { key: String },

    /// A resolved value does not fit the shape of the requested type.
    #[error("cannot read {path:?} into {target}: {reason}")]
    Conversion {
        path: String,
        target: &'static str,
        reason: String,
    },

    /// The target's self-check rejected the value it was populated with.
    #[error("validation failed: {0}")]
    Validation(#[source] BoxError),
}

/// Result alias for document store operations.
pub type DocResult<T> = Result<T, DocError>;

impl DocError {
    /// Returns `true` if this error only means "the path does not resolve".
    ///
    /// Not-found is a benign outcome: callers usually turn it into a default.
    pub fn is_not_found(&self) -> bool {
        matches!(self, DocError::NoValue { .. } | DocError::NoTable { .. })
    }
}
