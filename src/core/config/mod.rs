//! Configuration types and management for clarify-rs.
//!
//! All configuration is read-only once loaded; a single [`ClarifyConfig`] is
//! shared across every file in a batch.

pub mod validation;

use std::collections::BTreeSet;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::errors::{ClarifyError, Result};
pub use crate::detectors::names::config::{NamingStyle, NamingVocabulary};

pub use validation::{validate_non_empty, validate_positive_u64, validate_positive_usize};

/// Main configuration for the renaming pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClarifyConfig {
    /// Identifiers that generated names must never take
    #[serde(default = "ClarifyConfig::default_reserved_words")]
    pub reserved_words: BTreeSet<String>,

    /// Casing for generated names
    #[serde(default)]
    pub naming_style: NamingStyle,

    /// Maximum collision suffix tried before giving up on a symbol
    #[serde(default = "ClarifyConfig::default_suffix_bound")]
    pub suffix_bound: usize,

    /// Compile and run both variants and compare test outcomes
    #[serde(default)]
    pub verify_execution: bool,

    /// Verifier-driven fallback rounds before a file is failed
    #[serde(default = "ClarifyConfig::default_max_fallback_retries")]
    pub max_fallback_retries: usize,

    /// Number of files processed concurrently
    #[serde(default = "ClarifyConfig::default_workers")]
    pub workers: usize,

    /// Test-dialect conventions
    #[serde(default)]
    pub dialect: DialectConfig,

    /// Vocabulary used to judge existing names
    #[serde(default)]
    pub vocabulary: NamingVocabulary,

    /// External execution collaborator
    #[serde(default)]
    pub execution: ExecutionConfig,

    /// Structural verification limits
    #[serde(default)]
    pub verification: VerificationConfig,
}

impl Default for ClarifyConfig {
    fn default() -> Self {
        Self {
            reserved_words: Self::default_reserved_words(),
            naming_style: NamingStyle::default(),
            suffix_bound: Self::default_suffix_bound(),
            verify_execution: false,
            max_fallback_retries: Self::default_max_fallback_retries(),
            workers: Self::default_workers(),
            dialect: DialectConfig::default(),
            vocabulary: NamingVocabulary::default(),
            execution: ExecutionConfig::default(),
            verification: VerificationConfig::default(),
        }
    }
}

impl ClarifyConfig {
    fn default_reserved_words() -> BTreeSet<String> {
        JAVA_RESERVED_WORDS.iter().map(|w| (*w).to_string()).collect()
    }

    const fn default_suffix_bound() -> usize {
        50
    }

    const fn default_max_fallback_retries() -> usize {
        2
    }

    fn default_workers() -> usize {
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4)
    }

    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let content = std::fs::read_to_string(&path).map_err(|e| {
            ClarifyError::io(format!("Failed to read config file: {}", path.display()), e)
        })?;

        serde_yaml::from_str(&content).map_err(Into::into)
    }

    /// Set the naming style
    pub fn with_naming_style(mut self, style: NamingStyle) -> Self {
        self.naming_style = style;
        self
    }

    /// Enable or disable execution-based verification
    pub fn with_execution_verification(mut self, enabled: bool) -> Self {
        self.verify_execution = enabled;
        self
    }

    /// Set the worker count
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<()> {
        if self.suffix_bound < 2 {
            return Err(ClarifyError::validation_field(
                "suffix_bound must be at least 2",
                "suffix_bound",
            ));
        }
        validate_positive_usize(self.workers, "workers")?;

        for word in &self.reserved_words {
            if word.is_empty() {
                return Err(ClarifyError::config_field(
                    "reserved words must be non-empty",
                    "reserved_words",
                ));
            }
        }

        self.dialect.validate()?;
        self.vocabulary.validate()?;
        self.execution.validate()?;
        self.verification.validate()?;

        if self.verify_execution && self.execution.command.is_none() {
            return Err(ClarifyError::config_field(
                "verify_execution requires execution.command",
                "execution.command",
            ));
        }

        Ok(())
    }
}

/// Conventions of the test dialect being rewritten
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DialectConfig {
    /// Annotations that mark a method as a test
    #[serde(default = "DialectConfig::default_test_annotations")]
    pub test_annotations: Vec<String>,

    /// Assertion helpers recognised as assertion calls
    #[serde(default = "DialectConfig::default_assertion_methods")]
    pub assertion_methods: Vec<String>,

    /// Two-argument equality assertions (`expected`, `actual`)
    #[serde(default = "DialectConfig::default_equality_assertions")]
    pub equality_assertions: Vec<String>,

    /// Receivers under which assertions may be called (`Assert.assertEquals`)
    #[serde(default = "DialectConfig::default_assertion_holders")]
    pub assertion_holders: Vec<String>,
}

impl Default for DialectConfig {
    fn default() -> Self {
        Self {
            test_annotations: Self::default_test_annotations(),
            assertion_methods: Self::default_assertion_methods(),
            equality_assertions: Self::default_equality_assertions(),
            assertion_holders: Self::default_assertion_holders(),
        }
    }
}

impl DialectConfig {
    fn default_test_annotations() -> Vec<String> {
        ["Test", "ParameterizedTest", "RepeatedTest"]
            .into_iter()
            .map(String::from)
            .collect()
    }

    fn default_assertion_methods() -> Vec<String> {
        [
            "assertEquals",
            "assertNotEquals",
            "assertSame",
            "assertNotSame",
            "assertArrayEquals",
            "assertTrue",
            "assertFalse",
            "assertNull",
            "assertNotNull",
            "assertThrows",
            "assertDoesNotThrow",
            "assertThat",
            "fail",
        ]
        .into_iter()
        .map(String::from)
        .collect()
    }

    fn default_equality_assertions() -> Vec<String> {
        [
            "assertEquals",
            "assertNotEquals",
            "assertSame",
            "assertNotSame",
            "assertArrayEquals",
        ]
        .into_iter()
        .map(String::from)
        .collect()
    }

    fn default_assertion_holders() -> Vec<String> {
        ["Assert", "Assertions"].into_iter().map(String::from).collect()
    }

    /// Whether a call with this receiver text and name is an assertion
    pub fn is_assertion(&self, receiver: Option<&str>, name: &str) -> bool {
        let receiver_ok = receiver.map_or(true, |r| {
            let last = r.rsplit('.').next().unwrap_or(r);
            self.assertion_holders.iter().any(|h| h == last)
        });
        receiver_ok && self.assertion_methods.iter().any(|m| m == name)
    }

    /// Whether the assertion compares an expected value with an actual one
    pub fn is_equality_assertion(&self, name: &str) -> bool {
        self.equality_assertions.iter().any(|m| m == name)
    }

    /// Validate dialect settings
    pub fn validate(&self) -> Result<()> {
        validate_non_empty(&self.test_annotations, "dialect.test_annotations")?;
        validate_non_empty(&self.assertion_methods, "dialect.assertion_methods")?;
        for name in &self.equality_assertions {
            if !self.assertion_methods.contains(name) {
                return Err(ClarifyError::validation_field(
                    format!("equality assertion '{name}' is not listed in assertion_methods"),
                    "dialect.equality_assertions",
                ));
            }
        }
        Ok(())
    }
}

/// External compile-and-run collaborator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionConfig {
    /// Program invoked with the test file path appended
    #[serde(default)]
    pub command: Option<String>,

    /// Arguments placed before the file path
    #[serde(default)]
    pub args: Vec<String>,

    /// Per-file timeout in seconds
    #[serde(default = "ExecutionConfig::default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            command: None,
            args: Vec::new(),
            timeout_secs: Self::default_timeout_secs(),
        }
    }
}

impl ExecutionConfig {
    const fn default_timeout_secs() -> u64 {
        120
    }

    /// Validate execution settings
    pub fn validate(&self) -> Result<()> {
        validate_positive_u64(self.timeout_secs, "execution.timeout_secs")?;
        if let Some(command) = &self.command {
            if command.trim().is_empty() {
                return Err(ClarifyError::config_field(
                    "execution.command must not be blank",
                    "execution.command",
                ));
            }
        }
        Ok(())
    }
}

/// Structural verification limits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationConfig {
    /// Largest tree (in nodes) for which an edit cost is computed on mismatch
    #[serde(default = "VerificationConfig::default_max_diff_nodes")]
    pub max_diff_nodes: usize,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            max_diff_nodes: Self::default_max_diff_nodes(),
        }
    }
}

impl VerificationConfig {
    const fn default_max_diff_nodes() -> usize {
        2_000
    }

    /// Validate verification settings
    pub fn validate(&self) -> Result<()> {
        validate_positive_usize(self.max_diff_nodes, "verification.max_diff_nodes")
    }
}

/// Java keywords, literals and contextual keywords
pub const JAVA_RESERVED_WORDS: &[&str] = &[
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class",
    "const", "continue", "default", "do", "double", "else", "enum", "extends", "final",
    "finally", "float", "for", "goto", "if", "implements", "import", "instanceof", "int",
    "interface", "long", "native", "new", "package", "private", "protected", "public",
    "return", "short", "static", "strictfp", "super", "switch", "synchronized", "this",
    "throw", "throws", "transient", "try", "void", "volatile", "while", "true", "false",
    "null", "var", "yield", "record", "sealed", "permits", "when", "_",
];
