use thiserror::Error;

/// Result type alias using StoryLensError
pub type Result<T> = std::result::Result<T, StoryLensError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that can be used for programmatic
/// error handling, testing, and for tagging failed tracker checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Snapshot
    /// Snapshot requested on a root that is not a container
    InvalidRoot,

    // Diff
    /// A child expected at a computed path was not found in the tree
    PathConsistency,

    // Input/config
    InvalidInput,
    InvalidConfig,

    // Integration/IO
    Io,
    Serialization,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidRoot => "ERR_INVALID_ROOT",
            ExErrorKind::PathConsistency => "ERR_PATH_CONSISTENCY",
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::InvalidConfig => "ERR_INVALID_CONFIG",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification for programmatic handling plus the location
/// (`path`, `key`) and operation that produced it.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    path: Option<String>,
    key: Option<String>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            path: None,
            key: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add path context
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Add key context
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the path context, if any
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Get the key context, if any
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(path) = &self.path {
            write!(f, " (path: {:?})", path)?;
        }
        if let Some(key) = &self.key {
            write!(f, " (key: {})", key)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        None
    }
}

// ========== End Error Facility ==========

/// Error taxonomy for StoryLens operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoryLensError {
    // ===== Snapshot Errors =====
    /// Snapshot root is not an array, map or object
    #[error("Cannot snapshot a root of kind '{kind}': root must be an array, map or object")]
    InvalidRoot { kind: String },

    // ===== Diff Errors =====
    /// Key enumerator and path encoder disagree about a child location
    #[error("No child at expected path {expected_path:?} for key '{key}' under {parent_path:?} ({side} snapshot)")]
    PathConsistency {
        parent_path: String,
        key: String,
        expected_path: String,
        side: String,
    },

    // ===== Input Errors =====
    /// Input document could not be turned into a state value
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    /// Configuration failed validation
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    // ===== Integration Errors =====
    /// Serialization or deserialization failure
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// Internal invariant broken
    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Conversion from StoryLensError to ExError
impl From<StoryLensError> for ExError {
    fn from(err: StoryLensError) -> Self {
        let message = err.to_string();
        match err {
            StoryLensError::InvalidRoot { kind } => ExError::new(ExErrorKind::InvalidRoot)
                .with_op("build_snapshot")
                .with_path("")
                .with_message(format!("root of kind '{}' is not traversable", kind)),

            StoryLensError::PathConsistency {
                parent_path,
                key,
                expected_path,
                ..
            } => ExError::new(ExErrorKind::PathConsistency)
                .with_op("compare")
                .with_path(expected_path)
                .with_key(key)
                .with_message(format!("child missing under {:?}", parent_path))
                .with_source(ExError::new(ExErrorKind::Internal).with_message(message)),

            StoryLensError::InvalidInput { .. } => {
                ExError::new(ExErrorKind::InvalidInput).with_message(message)
            }

            StoryLensError::InvalidConfig { .. } => {
                ExError::new(ExErrorKind::InvalidConfig).with_message(message)
            }

            StoryLensError::Serialization { .. } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }

            StoryLensError::Internal { .. } => {
                ExError::new(ExErrorKind::Internal).with_message(message)
            }
        }
    }
}

/// Conversion from serde_json::Error to StoryLensError
impl From<serde_json::Error> for StoryLensError {
    fn from(err: serde_json::Error) -> Self {
        StoryLensError::Serialization {
            message: err.to_string(),
        }
    }
}

/// Conversion from toml::de::Error to StoryLensError
impl From<toml::de::Error> for StoryLensError {
    fn from(err: toml::de::Error) -> Self {
        StoryLensError::InvalidConfig {
            reason: err.to_string(),
        }
    }
}
