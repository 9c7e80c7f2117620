//! Main renaming engine implementation.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::info;
use walkdir::WalkDir;

use crate::core::config::ClarifyConfig;
use crate::core::errors::{ClarifyError, Result, ResultExt};
use crate::core::pipeline::verification::ExecutionCollaborator;
use crate::core::pipeline::{BatchRunner, BatchSummary, FileRewrite, ProgressCallback, RenamePipeline};
use crate::lang::is_supported_path;

/// Suffix appended to an output file name for its rename report
pub const REPORT_SUFFIX: &str = ".renames.json";

/// An input file and its path relative to the output directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredFile {
    pub path: PathBuf,
    pub relative: PathBuf,
}

/// Options of a run
#[derive(Clone, Default)]
pub struct RunOptions {
    pub out_dir: PathBuf,
    /// Overwrite existing output files
    pub force: bool,
    pub progress: Option<ProgressCallback>,
}

/// Batch outcome plus the files written for it
#[derive(Debug)]
pub struct RunSummary {
    pub batch: BatchSummary,
    pub written: Vec<PathBuf>,
}

/// Main clarify engine
pub struct ClarifyEngine {
    config: Arc<ClarifyConfig>,
    collaborator: Option<Arc<dyn ExecutionCollaborator>>,
}

impl ClarifyEngine {
    /// Create an engine; the configuration is validated once here
    pub fn new(config: ClarifyConfig) -> Result<Self> {
        config.validate()?;
        info!(
            "Clarify engine initialized ({:?}, {} workers, execution verification {})",
            config.naming_style,
            config.workers,
            if config.verify_execution { "on" } else { "off" }
        );
        Ok(Self {
            config: Arc::new(config),
            collaborator: None,
        })
    }

    pub fn with_collaborator(mut self, collaborator: Arc<dyn ExecutionCollaborator>) -> Self {
        self.collaborator = Some(collaborator);
        self
    }

    pub fn config(&self) -> &ClarifyConfig {
        &self.config
    }

    /// Expand inputs into `.java` files; directories are walked recursively
    pub fn discover(&self, inputs: &[PathBuf]) -> Result<Vec<DiscoveredFile>> {
        let mut by_relative: BTreeMap<PathBuf, PathBuf> = BTreeMap::new();
        let mut files = Vec::new();

        for input in inputs {
            if !input.exists() {
                return Err(ClarifyError::io(
                    format!("Path does not exist: {}", input.display()),
                    std::io::Error::new(std::io::ErrorKind::NotFound, "Path not found"),
                ));
            }

            let found: Vec<DiscoveredFile> = if input.is_dir() {
                let mut found = Vec::new();
                for entry in WalkDir::new(input).sort_by_file_name() {
                    let entry = entry.map_err(|e| {
                        ClarifyError::validation(format!("Failed to walk {}: {e}", input.display()))
                    })?;
                    if entry.file_type().is_file() && is_supported_path(entry.path()) {
                        let relative = entry
                            .path()
                            .strip_prefix(input)
                            .map_err(|e| ClarifyError::internal(e.to_string()))?
                            .to_path_buf();
                        found.push(DiscoveredFile {
                            path: entry.path().to_path_buf(),
                            relative,
                        });
                    }
                }
                found
            } else if is_supported_path(input) {
                let relative = input
                    .file_name()
                    .map(PathBuf::from)
                    .ok_or_else(|| ClarifyError::validation(format!("No file name in {}", input.display())))?;
                vec![DiscoveredFile {
                    path: input.clone(),
                    relative,
                }]
            } else {
                return Err(ClarifyError::validation_field(
                    format!("Not a .java file: {}", input.display()),
                    "input",
                ));
            };

            for file in found {
                match by_relative.get(&file.relative) {
                    Some(existing) if *existing == file.path => continue,
                    Some(existing) => {
                        return Err(ClarifyError::validation_field(
                            format!(
                                "{} and {} would both be written to {}",
                                existing.display(),
                                file.path.display(),
                                file.relative.display()
                            ),
                            "input",
                        ))
                    }
                    None => {
                        by_relative.insert(file.relative.clone(), file.path.clone());
                        files.push(file);
                    }
                }
            }
        }

        info!("Discovered {} Java files", files.len());
        Ok(files)
    }

    /// Rename one in-memory source without touching the filesystem
    pub fn rewrite_source(&self, path: &Path, text: &str) -> Result<FileRewrite> {
        RenamePipeline::new(self.config.clone()).process_text(path, text)
    }

    /// Process inputs and write every successful rewrite with its report
    pub async fn run(&self, inputs: &[PathBuf], options: RunOptions) -> Result<RunSummary> {
        let files = self.discover(inputs)?;

        if !options.force {
            if let Some(existing) = files
                .iter()
                .map(|f| options.out_dir.join(&f.relative))
                .find(|out| out.exists())
            {
                return Err(ClarifyError::validation_field(
                    format!("{} already exists (use --force to overwrite)", existing.display()),
                    "out",
                ));
            }
        }

        let mut runner = BatchRunner::new(self.config.clone());
        if let Some(collaborator) = &self.collaborator {
            runner = runner.with_collaborator(collaborator.clone());
        }

        let relative: BTreeMap<PathBuf, PathBuf> = files
            .iter()
            .map(|f| (f.path.clone(), f.relative.clone()))
            .collect();
        let batch = runner
            .run(files.into_iter().map(|f| f.path).collect(), options.progress.clone())
            .await;

        let mut written = Vec::new();
        for outcome in &batch.outcomes {
            let (Ok(rewrite), Some(relative)) = (&outcome.result, relative.get(&outcome.path)) else {
                continue;
            };
            let target = options.out_dir.join(relative);
            write_output(&target, rewrite, &batch).await?;
            written.push(target);
        }

        info!(
            "Run {} complete: {} written to {}",
            batch.run_id,
            written.len(),
            options.out_dir.display()
        );
        Ok(RunSummary { batch, written })
    }
}

/// Path of the report written next to an output file
pub fn report_path(output: &Path) -> PathBuf {
    let mut name = output
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(REPORT_SUFFIX);
    output.with_file_name(name)
}

async fn write_output(target: &Path, rewrite: &FileRewrite, batch: &BatchSummary) -> Result<()> {
    if let Some(parent) = target.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    tokio::fs::write(target, &rewrite.output)
        .await
        .with_context(|| format!("Failed to write {}", target.display()))?;

    let report = rewrite.report(batch.run_id).to_json()?;
    let report_target = report_path(target);
    tokio::fs::write(&report_target, report)
        .await
        .with_context(|| format!("Failed to write {}", report_target.display()))?;
    Ok(())
}
