//! Language-specific parsing and syntax-tree construction.

pub mod common;
pub mod java;

use std::path::Path;
use std::sync::Arc;

use crate::core::config::DialectConfig;
use crate::core::errors::{ClarifyError, Result};

pub use common::{NodeKind, SourceFile, Span, SyntaxNode, SyntaxTree};
pub use java::JavaAdapter;

/// Language adapter trait for full-fidelity parsing
pub trait LanguageAdapter: Send {
    /// Canonical language key
    fn language(&self) -> &'static str;

    /// Parse source text into a [`SourceFile`]
    fn parse_source(&mut self, text: Arc<str>, path: &Path) -> Result<SourceFile>;

    /// Identifiers of the source in order of appearance
    fn extract_identifiers(&mut self, text: &str) -> Result<Vec<String>>;
}

/// Supported file extensions (without leading dots)
pub const SUPPORTED_EXTENSIONS: &[&str] = &["java"];

/// Whether a path looks like a supported source file
pub fn is_supported_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext))
}

/// Create the adapter responsible for a file
pub fn adapter_for_path(path: &Path, dialect: &DialectConfig) -> Result<Box<dyn LanguageAdapter>> {
    if is_supported_path(path) {
        Ok(Box::new(JavaAdapter::new(dialect.clone())?))
    } else {
        Err(ClarifyError::validation_field(
            format!("Unsupported source file: {}", path.display()),
            "input",
        ))
    }
}
