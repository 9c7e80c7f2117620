//! Per-file pipeline: parse, resolve, name, plan, rewrite, verify.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::core::config::ClarifyConfig;
use crate::core::errors::{Result, ResultExt};
use crate::detectors::names::NamingOracle;
use crate::lang::{adapter_for_path, LanguageAdapter, SourceFile};
use crate::rename::{apply, substitutions, PlanBuilder, RenamePlan};
use crate::resolve::{Resolution, SymbolId, SymbolTable};

use super::pipeline_results::{FileRewrite, VerificationStatus};
use super::verification::{Mismatch, StructuralVerifier};

/// Runs every synchronous stage for one file.
///
/// Holds only read-only state, so one instance is shared by all workers.
pub struct RenamePipeline {
    config: Arc<ClarifyConfig>,
    oracle: NamingOracle,
    verifier: StructuralVerifier,
}

impl RenamePipeline {
    pub fn new(config: Arc<ClarifyConfig>) -> Self {
        Self {
            oracle: NamingOracle::new(&config),
            verifier: StructuralVerifier::new(&config.verification),
            config,
        }
    }

    pub fn config(&self) -> &ClarifyConfig {
        &self.config
    }

    /// Read and process a file from disk
    pub fn process_path(&self, path: &Path) -> Result<FileRewrite> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        self.process_text(path, &text)
    }

    /// Process source text.
    ///
    /// When the structural check fails, the symbols touching the mismatch
    /// (or every renamed symbol when none does) fall back to their
    /// next-ranked evidence, up to `max_fallback_retries` times.
    pub fn process_text(&self, path: &Path, text: &str) -> Result<FileRewrite> {
        let label = path.display().to_string();
        let dialect = &self.config.dialect;
        let mut adapter = adapter_for_path(path, dialect)?;

        let source = adapter
            .parse_source(Arc::from(text), path)
            .map_err(|e| e.with_file(label.as_str()))?;
        let resolution =
            Resolution::build(&source, dialect).map_err(|e| e.with_file(label.as_str()))?;
        let evidence = self.oracle.collect(&source, &resolution);
        debug!("{}: {} rename candidates ({})", label, evidence.len(), adapter.language());

        let builder = PlanBuilder::new(&self.config, &resolution, &evidence);
        let mut depths: HashMap<SymbolId, usize> = HashMap::new();
        let mut retries = 0;

        loop {
            let plan = builder.build(&depths)?;
            let output = apply(source.text(), &substitutions(&plan, &resolution.symbols))?;

            let mismatch = if plan.is_empty() {
                None
            } else {
                self.check(adapter.as_mut(), path, (&source, &resolution), &output)?
            };

            let Some(mismatch) = mismatch else {
                info!("{}: {} renames, {} retries", label, plan.len(), retries);
                return Ok(FileRewrite {
                    path: path.to_path_buf(),
                    output,
                    plan,
                    retries,
                    status: VerificationStatus::Structural,
                });
            };

            if retries >= self.config.max_fallback_retries {
                warn!("{}: giving up after {} retries: {}", label, retries, mismatch.message);
                return Err(mismatch.into_error());
            }

            let suspects = suspects(&plan, &resolution.symbols, &mismatch);
            warn!(
                "{}: rewrite rejected at byte {} ({}), retrying {} symbols",
                label,
                mismatch.span.start,
                mismatch.message,
                suspects.len()
            );
            for symbol in suspects {
                *depths.entry(symbol).or_insert(0) += 1;
            }
            retries += 1;
        }
    }

    /// Re-parse and re-resolve the output and compare it with the original
    fn check(
        &self,
        adapter: &mut dyn LanguageAdapter,
        path: &Path,
        original: (&SourceFile, &Resolution),
        output: &str,
    ) -> Result<Option<Mismatch>> {
        let rewritten = match adapter.parse_source(Arc::from(output), path) {
            Ok(rewritten) => rewritten,
            Err(e) => {
                return Ok(Some(Mismatch {
                    span: original.0.root().span,
                    message: format!("rewrite does not parse: {e}"),
                    edit_cost: None,
                }))
            }
        };
        let rewritten_resolution = Resolution::build(&rewritten, &self.config.dialect)
            .map_err(|e| e.with_file(path.display().to_string()))?;
        Ok(self
            .verifier
            .compare(original, (&rewritten, &rewritten_resolution)))
    }
}

/// Renamed symbols with an occurrence inside the mismatched node, or all
/// renamed symbols when none has one
fn suspects(plan: &RenamePlan, symbols: &SymbolTable, mismatch: &Mismatch) -> Vec<SymbolId> {
    let touching: Vec<SymbolId> = plan
        .entries()
        .filter(|entry| {
            symbols
                .get(entry.symbol)
                .occurrence_spans()
                .any(|span| mismatch.span.contains(span) || mismatch.span.overlaps(span))
        })
        .map(|entry| entry.symbol)
        .collect();

    if touching.is_empty() {
        plan.entries().map(|entry| entry.symbol).collect()
    } else {
        touching
    }
}

#[cfg(test)]
#[path = "pipeline_executor_tests.rs"]
mod tests;
