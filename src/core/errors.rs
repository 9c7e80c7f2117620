//! Error types for the clarify-rs library.
//!
//! Per-file failures (`Parse`, `UnresolvableName`, `RewriteCorruption`,
//! `VerificationTimeout`) are reported and the batch continues. A
//! `ResolutionInvariant` error signals a defect in the resolver itself and
//! halts the run.

use std::io;
use std::str::Utf8Error;

use thiserror::Error;

/// Main result type for clarify operations.
pub type Result<T> = std::result::Result<T, ClarifyError>;

/// Comprehensive error type for all clarify operations.
#[derive(Error, Debug)]
pub enum ClarifyError {
    /// I/O related errors (file operations, process spawning)
    #[error("I/O error: {message}")]
    Io {
        /// Human-readable error message
        message: String,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config {
        /// Error description
        message: String,
        /// Configuration field that caused the error
        field: Option<String>,
    },

    /// Malformed input; the file is skipped
    #[error("Parse error in {language} at byte {offset}: {message}")]
    Parse {
        /// Programming language being parsed
        language: String,
        /// Error description
        message: String,
        /// File path where error occurred
        file_path: Option<String>,
        /// Byte offset of the first structural anomaly
        offset: usize,
        /// Line number (1-based, if available)
        line: Option<usize>,
        /// Column number (1-based, if available)
        column: Option<usize>,
    },

    /// The resolver broke one of its own guarantees
    #[error("Resolution invariant violated: {message}")]
    ResolutionInvariant {
        /// Error description
        message: String,
        /// File being processed, when known
        file_path: Option<String>,
    },

    /// Every suffixed variant of a candidate name was blocked
    #[error("Cannot find a free name for '{original}' (candidate '{candidate}', tried {attempts} variants)")]
    UnresolvableName {
        /// Original identifier of the symbol
        original: String,
        /// Candidate base name proposed by the naming oracle
        candidate: String,
        /// Number of variants attempted
        attempts: usize,
        /// Names that blocked the attempts
        blocking: Vec<String>,
    },

    /// Post-rewrite structure differs from the original
    #[error("Rewrite corrupted structure at byte {offset}: {message}")]
    RewriteCorruption {
        /// Error description
        message: String,
        /// Byte offset in the original file of the first mismatch
        offset: usize,
        /// Tree edit cost between the normalized trees, when computed
        edit_cost: Option<u64>,
    },

    /// Execution-based verification did not finish in time
    #[error("Verification timed out after {timeout_secs}s for {file_path}")]
    VerificationTimeout {
        /// File whose verification timed out
        file_path: String,
        /// Timeout that elapsed
        timeout_secs: u64,
    },

    /// External execution collaborator failures
    #[error("Execution error: {message}")]
    Execution {
        /// Error description
        message: String,
        /// Command that was invoked
        command: Option<String>,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error description
        message: String,
        /// Data type being serialized
        data_type: Option<String>,
        /// Underlying serialization error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Validation errors for input data
    #[error("Validation error: {message}")]
    Validation {
        /// Error description
        message: String,
        /// Field or input that failed validation
        field: Option<String>,
    },

    /// Generic internal errors
    #[error("Internal error: {message}")]
    Internal {
        /// Error description
        message: String,
        /// Additional context
        context: Option<String>,
    },
}

impl ClarifyError {
    /// Create a new I/O error with context
    pub fn io(message: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            field: None,
        }
    }

    /// Create a new configuration error with field context
    pub fn config_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Create a new parse error at a byte offset
    pub fn parse(language: impl Into<String>, message: impl Into<String>, offset: usize) -> Self {
        Self::Parse {
            language: language.into(),
            message: message.into(),
            file_path: None,
            offset,
            line: None,
            column: None,
        }
    }

    /// Create a new parse error with full location
    pub fn parse_with_location(
        language: impl Into<String>,
        message: impl Into<String>,
        offset: usize,
        line: usize,
        column: usize,
    ) -> Self {
        Self::Parse {
            language: language.into(),
            message: message.into(),
            file_path: None,
            offset,
            line: Some(line),
            column: Some(column),
        }
    }

    /// Create a new resolution invariant violation
    pub fn invariant(message: impl Into<String>) -> Self {
        Self::ResolutionInvariant {
            message: message.into(),
            file_path: None,
        }
    }

    /// Create a new rewrite corruption error
    pub fn corruption(message: impl Into<String>, offset: usize) -> Self {
        Self::RewriteCorruption {
            message: message.into(),
            offset,
            edit_cost: None,
        }
    }

    /// Create a new execution error
    pub fn execution(message: impl Into<String>) -> Self {
        Self::Execution {
            message: message.into(),
            command: None,
        }
    }

    /// Create a new validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            field: None,
        }
    }

    /// Create a new validation error naming the offending field
    pub fn validation_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Create a new internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            context: None,
        }
    }

    /// Attach the file being processed to errors that carry a path
    pub fn with_file(mut self, path: impl Into<String>) -> Self {
        match &mut self {
            Self::Parse { file_path, .. } | Self::ResolutionInvariant { file_path, .. } => {
                *file_path = Some(path.into());
            }
            _ => {}
        }
        self
    }

    /// Add context to an existing error
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        match &mut self {
            Self::Internal { context: ctx, .. } => {
                *ctx = Some(context.into());
            }
            Self::Io { message, .. } | Self::Execution { message, .. } => {
                *message = format!("{}: {}", context.into(), message);
            }
            _ => {}
        }
        self
    }

    /// Whether this error means the tool itself is broken and the run must stop
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::ResolutionInvariant { .. })
    }

    /// Short stable label used in reports and diagnostics
    pub fn category(&self) -> &'static str {
        match self {
            Self::Io { .. } => "io",
            Self::Config { .. } => "config",
            Self::Parse { .. } => "parse",
            Self::ResolutionInvariant { .. } => "resolution_invariant",
            Self::UnresolvableName { .. } => "unresolvable_name",
            Self::RewriteCorruption { .. } => "rewrite_corruption",
            Self::VerificationTimeout { .. } => "verification_timeout",
            Self::Execution { .. } => "execution",
            Self::Serialization { .. } => "serialization",
            Self::Validation { .. } => "validation",
            Self::Internal { .. } => "internal",
        }
    }
}

impl From<io::Error> for ClarifyError {
    fn from(err: io::Error) -> Self {
        Self::io("I/O operation failed", err)
    }
}

impl From<serde_json::Error> for ClarifyError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            message: format!("JSON serialization failed: {err}"),
            data_type: Some("JSON".to_string()),
            source: Some(Box::new(err)),
        }
    }
}

impl From<serde_yaml::Error> for ClarifyError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Serialization {
            message: format!("YAML serialization failed: {err}"),
            data_type: Some("YAML".to_string()),
            source: Some(Box::new(err)),
        }
    }
}

impl From<Utf8Error> for ClarifyError {
    fn from(err: Utf8Error) -> Self {
        Self::parse("java", format!("UTF-8 encoding error: {err}"), err.valid_up_to())
    }
}

/// Result extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;

    /// Add static context to an error result
    fn context(self, msg: &'static str) -> Result<T>;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<ClarifyError>,
{
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.into().with_context(f()))
    }

    fn context(self, msg: &'static str) -> Result<T> {
        self.map_err(|e| e.into().with_context(msg))
    }
}
