//! Rename Pipeline Module
//!
//! Orchestrates the per-file stages and the batch that runs them.
//!
//! ## Pipeline Stages
//!
//! 1. **Parse**: full-fidelity syntax tree
//! 2. **Resolve**: scopes, symbols and use sites
//! 3. **Name**: ranked evidence from the naming oracle
//! 4. **Plan**: collision-free final names
//! 5. **Rewrite**: span substitution
//! 6. **Verify**: structural comparison, then optionally execution
//!
//! ## Usage
//!
//! ```ignore
//! use clarify_rs::core::pipeline::BatchRunner;
//!
//! let runner = BatchRunner::new(Arc::new(ClarifyConfig::default()));
//! let summary = runner.run(vec!["CalcTest.java".into()], None).await;
//! println!("{} files renamed", summary.succeeded());
//! ```

pub mod verification;

mod batch;
mod pipeline_executor;
mod pipeline_results;

pub use batch::{BatchRunner, ProgressCallback};
pub use pipeline_executor::RenamePipeline;
pub use pipeline_results::{
    BatchSummary, FileOutcome, FileRewrite, RenameReport, VerificationStatus,
};
