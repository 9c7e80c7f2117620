//! Bounded parallel processing of many files.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::core::config::ClarifyConfig;
use crate::core::errors::{ClarifyError, Result};

use super::pipeline_executor::RenamePipeline;
use super::pipeline_results::{BatchSummary, FileOutcome, FileRewrite, VerificationStatus};
use super::verification::{CommandExecutor, ExecutionCollaborator, ExecutionVerdict, ExecutionVerifier};

/// Called once per finished file with whether it succeeded
pub type ProgressCallback = Arc<dyn Fn(&Path, bool) + Send + Sync>;

/// Runs the pipeline over a set of files with at most `workers` in flight.
///
/// A resolver invariant violation cancels the batch: files not yet started
/// are skipped, files in flight finish.
pub struct BatchRunner {
    config: Arc<ClarifyConfig>,
    pipeline: Arc<RenamePipeline>,
    collaborator: Option<Arc<dyn ExecutionCollaborator>>,
    cancel: CancellationToken,
}

impl BatchRunner {
    pub fn new(config: Arc<ClarifyConfig>) -> Self {
        let collaborator = if config.verify_execution {
            let executor = CommandExecutor::from_config(&config.execution)
                .map(|executor| Arc::new(executor) as Arc<dyn ExecutionCollaborator>);
            if executor.is_none() {
                warn!(
                    "Execution verification requested but no execution.command is configured; \
                     files will only be verified structurally"
                );
            }
            executor
        } else {
            None
        };
        Self {
            pipeline: Arc::new(RenamePipeline::new(config.clone())),
            config,
            collaborator,
            cancel: CancellationToken::new(),
        }
    }

    /// Replace the execution collaborator (used only when execution
    /// verification is enabled)
    pub fn with_collaborator(mut self, collaborator: Arc<dyn ExecutionCollaborator>) -> Self {
        if self.config.verify_execution {
            self.collaborator = Some(collaborator);
        }
        self
    }

    /// Token that stops the batch from dispatching more files
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub async fn run(&self, paths: Vec<PathBuf>, progress: Option<ProgressCallback>) -> BatchSummary {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        let semaphore = Arc::new(Semaphore::new(self.config.workers.max(1)));
        info!("Batch {} started: {} files, {} workers", run_id, paths.len(), self.config.workers);

        let mut handles = Vec::with_capacity(paths.len());
        let mut skipped = Vec::new();

        for path in paths {
            let permit = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => None,
                permit = semaphore.clone().acquire_owned() => permit.ok(),
            };
            let Some(permit) = permit.filter(|_| !self.cancel.is_cancelled()) else {
                skipped.push(path);
                continue;
            };

            let pipeline = self.pipeline.clone();
            let collaborator = self.collaborator.clone();
            let timeout_secs = self.config.execution.timeout_secs;
            let cancel = self.cancel.clone();
            let progress = progress.clone();
            let task_path = path.clone();

            let handle = tokio::spawn(async move {
                let _permit = permit;
                let result = process_file(pipeline, collaborator, timeout_secs, &task_path).await;
                match &result {
                    Err(e) if e.is_fatal() => {
                        error!("{}: {}; cancelling batch", task_path.display(), e);
                        cancel.cancel();
                    }
                    Err(e) => warn!("{}: {}", task_path.display(), e),
                    Ok(_) => {}
                }
                if let Some(progress) = &progress {
                    progress(&task_path, result.is_ok());
                }
                result
            });
            handles.push((path, handle));
        }

        let mut outcomes = Vec::with_capacity(handles.len());
        for (path, handle) in handles {
            let result = handle
                .await
                .unwrap_or_else(|e| Err(ClarifyError::internal(format!("worker task failed: {e}"))));
            outcomes.push(FileOutcome { path, result });
        }

        let summary = BatchSummary {
            run_id,
            started_at,
            outcomes,
            skipped,
        };
        info!(
            "Batch {} finished: {} succeeded, {} failed, {} skipped",
            run_id,
            summary.succeeded(),
            summary.failed(),
            summary.skipped.len()
        );
        summary
    }
}

async fn process_file(
    pipeline: Arc<RenamePipeline>,
    collaborator: Option<Arc<dyn ExecutionCollaborator>>,
    timeout_secs: u64,
    path: &Path,
) -> Result<FileRewrite> {
    let blocking_path = path.to_path_buf();
    let mut rewrite = tokio::task::spawn_blocking(move || pipeline.process_path(&blocking_path))
        .await
        .map_err(|e| ClarifyError::internal(format!("pipeline worker failed: {e}")))??;

    let Some(collaborator) = collaborator else {
        return Ok(rewrite);
    };
    if rewrite.plan.is_empty() {
        return Ok(rewrite);
    }

    let verifier = ExecutionVerifier::new(collaborator.as_ref(), timeout_secs);
    match verifier
        .verify(path, &rewrite.output, &rewrite.plan.method_mapping())
        .await
    {
        Ok(ExecutionVerdict::Equivalent) => {
            rewrite.status = VerificationStatus::Behavioral;
            Ok(rewrite)
        }
        Ok(ExecutionVerdict::Diverged(difference)) => Err(ClarifyError::corruption(
            format!("test outcomes differ after rewrite: {difference}"),
            0,
        )),
        Err(timeout @ ClarifyError::VerificationTimeout { .. }) => {
            warn!("{}", timeout);
            rewrite.status = VerificationStatus::Unverified;
            Ok(rewrite)
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use tempfile::TempDir;

    use super::*;
    use crate::core::pipeline::verification::{TestOutcome, TestResult};

    const CALC_TEST: &str = r#"import org.junit.Test;
import static org.junit.Assert.*;

public class CalcTest {
    @Test
    public void test0() {
        Calculator calc = new Calculator();
        int result = calc.add(2, 3);
        assertEquals(5, result);
    }
}
"#;

    fn write(dir: &TempDir, name: &str, text: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, text).unwrap();
        path
    }

    #[tokio::test]
    async fn per_file_failures_do_not_stop_the_batch() {
        let dir = TempDir::new().unwrap();
        let good = write(&dir, "CalcTest.java", CALC_TEST);
        let bad = write(&dir, "Broken.java", "class Broken { void m( { }");
        let also_good = write(&dir, "Other.java", "class Other { int total(int price) { return price; } }");

        let runner = BatchRunner::new(Arc::new(ClarifyConfig::default().with_workers(2)));
        let finished = Arc::new(AtomicUsize::new(0));
        let counter = finished.clone();
        let progress: ProgressCallback = Arc::new(move |_: &Path, _: bool| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let summary = runner
            .run(vec![good.clone(), bad.clone(), also_good], Some(progress))
            .await;

        assert_eq!(summary.outcomes.len(), 3);
        assert_eq!(summary.outcomes[0].path, good);
        assert_eq!(summary.outcomes[1].path, bad);
        assert_eq!(summary.succeeded(), 2);
        assert_eq!(summary.outcomes[1].error().map(|e| e.category()), Some("parse"));
        assert!(summary.fatal_error().is_none());
        assert_eq!(finished.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn cancelled_batches_skip_remaining_files() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "CalcTest.java", CALC_TEST);
        let runner = BatchRunner::new(Arc::new(ClarifyConfig::default()));
        runner.cancellation_token().cancel();

        let summary = runner.run(vec![path.clone()], None).await;
        assert!(summary.outcomes.is_empty());
        assert_eq!(summary.skipped, vec![path]);
        assert!(!summary.all_succeeded());
    }

    #[tokio::test]
    async fn execution_without_a_command_falls_back_to_structural() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "CalcTest.java", CALC_TEST);
        let config = ClarifyConfig::default().with_execution_verification(true);
        assert!(config.execution.command.is_none());
        let runner = BatchRunner::new(Arc::new(config));
        assert!(runner.collaborator.is_none());

        let summary = runner.run(vec![path], None).await;
        let rewrite = summary.outcomes[0].result.as_ref().unwrap();
        assert_eq!(rewrite.status, VerificationStatus::Structural);
    }

    struct Fixed {
        delay: Duration,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ExecutionCollaborator for Fixed {
        async fn run(&self, _path: &Path) -> Result<Vec<TestResult>> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            // Report the test under whatever name the current variant uses.
            let test = if call == 0 { "test0" } else { "testAdditionOfTwoNumbers" };
            Ok(vec![TestResult {
                test: test.to_string(),
                outcome: TestOutcome::Passed,
                exception: None,
            }])
        }
    }

    #[tokio::test]
    async fn matching_executions_mark_files_behavioral() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "CalcTest.java", CALC_TEST);
        let config = ClarifyConfig::default().with_execution_verification(true);
        let runner = BatchRunner::new(Arc::new(config)).with_collaborator(Arc::new(Fixed {
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }));

        let summary = runner.run(vec![path], None).await;
        let rewrite = summary.outcomes[0].result.as_ref().unwrap();
        assert_eq!(rewrite.status, VerificationStatus::Behavioral);
    }

    #[tokio::test]
    async fn execution_timeouts_still_emit_output() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "CalcTest.java", CALC_TEST);
        let mut config = ClarifyConfig::default().with_execution_verification(true);
        config.execution.timeout_secs = 1;
        let runner = BatchRunner::new(Arc::new(config)).with_collaborator(Arc::new(Fixed {
            delay: Duration::from_secs(30),
            calls: AtomicUsize::new(0),
        }));

        let summary = runner.run(vec![path], None).await;
        let rewrite = summary.outcomes[0].result.as_ref().unwrap();
        assert_eq!(rewrite.status, VerificationStatus::Unverified);
        assert!(rewrite.output.contains("testAdditionOfTwoNumbers"));
    }
}
