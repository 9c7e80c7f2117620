//! Evaluation of renamed files against hand-named reference files.
//!
//! Pairs are either two files or two directories; in directory mode every
//! `.java` file under the oracle directory is paired with the file at the
//! same relative path under the prediction directory.

pub mod metrics;

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::core::config::DialectConfig;
use crate::core::errors::{ClarifyError, Result};
use crate::lang::{is_supported_path, JavaAdapter};

pub use metrics::{average, evaluate, AverageMetrics, PairMetrics};

/// One oracle/prediction file pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvalPair {
    pub name: String,
    pub oracle: PathBuf,
    pub prediction: PathBuf,
}

#[derive(Debug, Clone, Serialize)]
pub struct PairResult {
    pub name: String,
    #[serde(flatten)]
    pub metrics: PairMetrics,
}

#[derive(Debug, Clone, Serialize)]
pub struct EvalReport {
    pub pairs: Vec<PairResult>,
    pub average: AverageMetrics,
}

/// Match oracle files with prediction files
pub fn pair_paths(oracle: &Path, prediction: &Path) -> Result<Vec<EvalPair>> {
    if oracle.is_file() && prediction.is_file() {
        let name = oracle
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        return Ok(vec![EvalPair {
            name,
            oracle: oracle.to_path_buf(),
            prediction: prediction.to_path_buf(),
        }]);
    }
    if !(oracle.is_dir() && prediction.is_dir()) {
        return Err(ClarifyError::validation_field(
            format!(
                "oracle {} and prediction {} must both be files or both be directories",
                oracle.display(),
                prediction.display()
            ),
            "prediction",
        ));
    }

    let mut pairs = Vec::new();
    for entry in WalkDir::new(oracle).sort_by_file_name() {
        let entry = entry.map_err(|e| ClarifyError::validation(format!("Failed to walk {}: {e}", oracle.display())))?;
        if !entry.file_type().is_file() || !is_supported_path(entry.path()) {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(oracle)
            .map_err(|e| ClarifyError::internal(e.to_string()))?;
        let predicted = prediction.join(relative);
        if !predicted.is_file() {
            warn!("No prediction for {}", relative.display());
            continue;
        }
        pairs.push(EvalPair {
            name: relative.display().to_string(),
            oracle: entry.path().to_path_buf(),
            prediction: predicted,
        });
    }
    Ok(pairs)
}

/// Evaluate every pair in parallel and average the results
pub fn evaluate_pairs(pairs: &[EvalPair], dialect: &DialectConfig) -> Result<EvalReport> {
    let results: Vec<PairResult> = pairs
        .par_iter()
        .map_init(
            || JavaAdapter::new(dialect.clone()),
            |adapter, pair| {
                let adapter = adapter
                    .as_mut()
                    .map_err(|e| ClarifyError::internal(format!("parser unavailable: {e}")))?;
                let oracle = read(&pair.oracle)?;
                let prediction = read(&pair.prediction)?;
                Ok(PairResult {
                    name: pair.name.clone(),
                    metrics: evaluate(&oracle, &prediction, adapter),
                })
            },
        )
        .collect::<Result<_>>()?;

    let metrics: Vec<PairMetrics> = results.iter().map(|r| r.metrics.clone()).collect();
    let report = EvalReport {
        average: average(&metrics),
        pairs: results,
    };
    info!(
        "Evaluated {} pairs: mean F1 {:.3}, mean CER {:.2}",
        report.average.pairs, report.average.f1, report.average.cer
    );
    Ok(report)
}

/// Pair and evaluate in one step
pub fn evaluate_paths(oracle: &Path, prediction: &Path, dialect: &DialectConfig) -> Result<EvalReport> {
    let pairs = pair_paths(oracle, prediction)?;
    evaluate_pairs(&pairs, dialect)
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .map_err(|e| ClarifyError::io(format!("Failed to read {}", path.display()), e))
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn directories_pair_by_relative_path() {
        let oracle = TempDir::new().unwrap();
        let prediction = TempDir::new().unwrap();
        std::fs::create_dir_all(oracle.path().join("pkg")).unwrap();
        std::fs::create_dir_all(prediction.path().join("pkg")).unwrap();

        let text = "class A { int sum; }";
        std::fs::write(oracle.path().join("pkg/A.java"), text).unwrap();
        std::fs::write(prediction.path().join("pkg/A.java"), text).unwrap();
        std::fs::write(oracle.path().join("B.java"), text).unwrap();
        std::fs::write(oracle.path().join("notes.txt"), "x").unwrap();

        let pairs = pair_paths(oracle.path(), prediction.path()).unwrap();
        assert_eq!(pairs.len(), 1);
        assert!(pairs[0].name.ends_with("A.java"));

        let report = evaluate_pairs(&pairs, &DialectConfig::default()).unwrap();
        assert_eq!(report.average.pairs, 1);
        assert_eq!(report.average.f1, 1.0);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["pairs"][0]["cer"], 0.0);
    }

    #[test]
    fn mixed_file_and_directory_is_rejected() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("A.java");
        std::fs::write(&file, "class A {}").unwrap();
        assert!(pair_paths(&file, dir.path()).is_err());
    }
}
