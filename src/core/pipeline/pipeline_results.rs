//! Result types for per-file rewrites and whole batches.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::core::errors::{ClarifyError, Result};
use crate::rename::{PlanEntry, RenamePlan};

/// How far a rewrite has been checked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    /// Structure verified; execution not requested
    Structural,
    /// Structure verified and test outcomes matched
    Behavioral,
    /// Structure verified; the execution check timed out
    Unverified,
}

/// Output of the pipeline for one file
#[derive(Debug, Clone)]
pub struct FileRewrite {
    pub path: PathBuf,
    pub output: String,
    pub plan: RenamePlan,
    /// Verifier-driven fallback rounds that were needed
    pub retries: usize,
    pub status: VerificationStatus,
}

impl FileRewrite {
    pub fn report(&self, run_id: Uuid) -> RenameReport {
        RenameReport {
            run_id,
            generated_at: Utc::now(),
            file: self.path.display().to_string(),
            entries: self.plan.entries().cloned().collect(),
            retries: self.retries,
            verification: self.status,
        }
    }
}

/// Audit record written next to each rewritten file
#[derive(Debug, Clone, Serialize)]
pub struct RenameReport {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub file: String,
    pub entries: Vec<PlanEntry>,
    pub retries: usize,
    pub verification: VerificationStatus,
}

impl RenameReport {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// What happened to one input file
#[derive(Debug)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub result: Result<FileRewrite>,
}

impl FileOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    pub fn error(&self) -> Option<&ClarifyError> {
        self.result.as_ref().err()
    }
}

/// Outcomes of a batch, in input order
#[derive(Debug)]
pub struct BatchSummary {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub outcomes: Vec<FileOutcome>,
    /// Files never dispatched because the batch was cancelled
    pub skipped: Vec<PathBuf>,
}

impl BatchSummary {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    /// The resolver invariant violation that halted the batch, if any
    pub fn fatal_error(&self) -> Option<&ClarifyError> {
        self.outcomes
            .iter()
            .filter_map(FileOutcome::error)
            .find(|e| e.is_fatal())
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed() == 0 && self.skipped.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rewrite() -> FileRewrite {
        FileRewrite {
            path: PathBuf::from("CalcTest.java"),
            output: String::new(),
            plan: RenamePlan::default(),
            retries: 0,
            status: VerificationStatus::Structural,
        }
    }

    #[test]
    fn report_serializes_status_and_entries() {
        let run_id = Uuid::new_v4();
        let json = rewrite().report(run_id).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["verification"], "structural");
        assert_eq!(value["file"], "CalcTest.java");
        assert_eq!(value["run_id"], run_id.to_string());
        assert!(value["entries"].as_array().unwrap().is_empty());
    }

    #[test]
    fn summary_separates_fatal_errors() {
        let summary = BatchSummary {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            outcomes: vec![
                FileOutcome {
                    path: PathBuf::from("A.java"),
                    result: Ok(rewrite()),
                },
                FileOutcome {
                    path: PathBuf::from("B.java"),
                    result: Err(ClarifyError::parse("java", "unexpected token", 3)),
                },
                FileOutcome {
                    path: PathBuf::from("C.java"),
                    result: Err(ClarifyError::invariant("use outside scope")),
                },
            ],
            skipped: vec![PathBuf::from("D.java")],
        };
        assert_eq!(summary.succeeded(), 1);
        assert_eq!(summary.failed(), 2);
        assert!(!summary.all_succeeded());
        assert_eq!(summary.fatal_error().map(|e| e.category()), Some("resolution_invariant"));
    }
}
