//! Execution-based behavior comparison.
//!
//! An [`ExecutionCollaborator`] compiles and runs a test file and reports one
//! outcome per test method. The original and rewritten files must produce
//! the same outcomes, matched through the plan's test-method mapping.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::core::config::ExecutionConfig;
use crate::core::errors::{ClarifyError, Result, ResultExt};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestOutcome {
    Passed,
    Failed,
    Error,
}

/// Outcome of one test method
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestResult {
    pub test: String,
    pub outcome: TestOutcome,
    /// Exception type for errored tests
    #[serde(default)]
    pub exception: Option<String>,
}

/// Runs a test file and reports per-test outcomes
#[async_trait]
pub trait ExecutionCollaborator: Send + Sync {
    async fn run(&self, path: &Path) -> Result<Vec<TestResult>>;
}

/// Collaborator that invokes a configured command with the file path
/// appended and reads JSON lines from its stdout.
#[derive(Debug, Clone)]
pub struct CommandExecutor {
    command: String,
    args: Vec<String>,
}

impl CommandExecutor {
    pub fn new(command: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            command: command.into(),
            args,
        }
    }

    /// `None` when no command is configured
    pub fn from_config(config: &ExecutionConfig) -> Option<Self> {
        config
            .command
            .as_ref()
            .map(|command| Self::new(command.clone(), config.args.clone()))
    }
}

#[async_trait]
impl ExecutionCollaborator for CommandExecutor {
    async fn run(&self, path: &Path) -> Result<Vec<TestResult>> {
        debug!("Executing {} {:?} {}", self.command, self.args, path.display());
        let output = Command::new(&self.command)
            .args(&self.args)
            .arg(path)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| ClarifyError::Execution {
                message: format!("failed to start: {e}"),
                command: Some(self.command.clone()),
            })?;

        // Failing tests usually make the runner exit non-zero; outcomes still count.
        if !output.status.success() {
            debug!("{} exited with {}", self.command, output.status);
        }
        parse_outcomes(&String::from_utf8_lossy(&output.stdout))
    }
}

/// Parse JSON-line outcomes, ignoring lines that are not JSON objects
pub fn parse_outcomes(stdout: &str) -> Result<Vec<TestResult>> {
    let mut results = Vec::new();
    for line in stdout.lines().map(str::trim) {
        if !line.starts_with('{') {
            continue;
        }
        let result: TestResult = serde_json::from_str(line)
            .map_err(|e| ClarifyError::execution(format!("malformed outcome line `{line}`: {e}")))?;
        results.push(result);
    }
    Ok(results)
}

/// Describe the first difference between two runs, if any.
///
/// Tests of the rewritten run are looked up under their renamed names.
pub fn compare_outcomes(
    original: &[TestResult],
    rewritten: &[TestResult],
    method_mapping: &BTreeMap<String, String>,
) -> Option<String> {
    let renamed: BTreeMap<&str, &TestResult> =
        rewritten.iter().map(|r| (r.test.as_str(), r)).collect();

    if original.len() != rewritten.len() {
        return Some(format!(
            "original ran {} tests, rewrite ran {}",
            original.len(),
            rewritten.len()
        ));
    }

    for before in original {
        let name = method_mapping
            .get(&before.test)
            .map_or(before.test.as_str(), String::as_str);
        match renamed.get(name) {
            None => return Some(format!("test `{}` missing from rewrite (as `{name}`)", before.test)),
            Some(after) if after.outcome != before.outcome || after.exception != before.exception => {
                return Some(format!(
                    "test `{}` was {:?}{} but `{name}` is {:?}{}",
                    before.test,
                    before.outcome,
                    exception_suffix(before),
                    after.outcome,
                    exception_suffix(after)
                ));
            }
            Some(_) => {}
        }
    }
    None
}

fn exception_suffix(result: &TestResult) -> String {
    result
        .exception
        .as_deref()
        .map(|e| format!(" ({e})"))
        .unwrap_or_default()
}

/// Result of comparing the two runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionVerdict {
    Equivalent,
    Diverged(String),
}

/// Runs both variants under a shared timeout
pub struct ExecutionVerifier<'a> {
    collaborator: &'a dyn ExecutionCollaborator,
    timeout: Duration,
}

impl<'a> ExecutionVerifier<'a> {
    pub fn new(collaborator: &'a dyn ExecutionCollaborator, timeout_secs: u64) -> Self {
        Self {
            collaborator,
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    /// Execute the original file and the rewritten text.
    ///
    /// The rewrite is staged under the original file name in a scratch
    /// directory, since Java ties public class names to file names.
    pub async fn verify(
        &self,
        original_path: &Path,
        rewritten_text: &str,
        method_mapping: &BTreeMap<String, String>,
    ) -> Result<ExecutionVerdict> {
        let staged = StagedFile::write(original_path, rewritten_text).await?;

        let both = async {
            let before = self.collaborator.run(original_path).await?;
            let after = self.collaborator.run(staged.path()).await?;
            Ok::<_, ClarifyError>((before, after))
        };

        let outcome = timeout(self.timeout, both).await;
        staged.remove().await;

        let (before, after) = outcome.map_err(|_| ClarifyError::VerificationTimeout {
            file_path: original_path.display().to_string(),
            timeout_secs: self.timeout.as_secs(),
        })??;

        Ok(match compare_outcomes(&before, &after, method_mapping) {
            Some(difference) => ExecutionVerdict::Diverged(difference),
            None => ExecutionVerdict::Equivalent,
        })
    }
}

struct StagedFile {
    dir: PathBuf,
    path: PathBuf,
}

impl StagedFile {
    async fn write(original_path: &Path, text: &str) -> Result<Self> {
        let dir = std::env::temp_dir().join(format!("clarify-{}", uuid::Uuid::new_v4()));
        tokio::fs::create_dir_all(&dir)
            .await
            .context("Failed to create staging directory")?;
        let file_name = original_path
            .file_name()
            .ok_or_else(|| ClarifyError::validation(format!("no file name in {}", original_path.display())))?;
        let path = dir.join(file_name);
        tokio::fs::write(&path, text)
            .await
            .context("Failed to stage rewritten file")?;
        Ok(Self { dir, path })
    }

    fn path(&self) -> &Path {
        &self.path
    }

    async fn remove(self) {
        if let Err(e) = tokio::fs::remove_dir_all(&self.dir).await {
            warn!("Failed to remove {}: {}", self.dir.display(), e);
        }
    }
}
