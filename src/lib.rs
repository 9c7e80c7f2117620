//! # Clarify-RS: Behavior-Preserving Renaming for Generated Tests
//!
//! Automatically generated unit tests (EvoSuite, Randoop) are correct but
//! unreadable: `test0`, `calc`, `int0`. This library renames local
//! variables, parameters, fields and test methods to descriptive names while
//! proving that the rewritten file is structurally identical to the
//! original, and optionally that it behaves identically when run.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 API Layer (ClarifyEngine)                   │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Core          │  Naming     │  Language  │  Rename         │
//! │                │             │            │                 │
//! │ • Config       │ • Oracle    │ • Java     │ • Collisions    │
//! │ • Errors       │ • Evidence  │ • Syntax   │ • Plan          │
//! │ • Pipeline     │ • Themes    │   tree     │ • Rewriter      │
//! │ • Verification │             │ • Resolver │                 │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use clarify_rs::{ClarifyConfig, ClarifyEngine, RunOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let engine = ClarifyEngine::new(ClarifyConfig::default())?;
//!     let options = RunOptions {
//!         out_dir: "renamed".into(),
//!         ..RunOptions::default()
//!     };
//!     let summary = engine.run(&["src/test/java".into()], options).await?;
//!
//!     println!("{} files renamed", summary.batch.succeeded());
//!     Ok(())
//! }
//! ```

#![warn(unsafe_code)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![cfg_attr(docsrs, feature(doc_cfg))]

// Memory allocator selection (mutually exclusive)
#[cfg(all(feature = "mimalloc", not(feature = "jemalloc")))]
#[global_allocator]
static ALLOC: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[cfg(all(feature = "jemalloc", not(feature = "mimalloc")))]
#[global_allocator]
static ALLOC: jemallocator::Jemalloc = jemallocator::Jemalloc;

// Core configuration, errors and the rename pipeline
pub mod core {
    //! Configuration, error types and pipeline orchestration.

    pub mod config;
    pub mod errors;
    pub mod pipeline;
}

// Naming heuristics
pub mod detectors {
    //! Detectors that judge identifiers and propose replacements.

    pub mod names;
}

// Java parsing
pub mod lang;

// Scopes and symbols
pub mod resolve;

// Plans and text substitution
pub mod rename;

// Identifier-level evaluation against reference files
pub mod eval;

// Public API and engine interface
pub mod api {
    //! High-level API and engine interface.

    pub mod engine;
}

// Re-export primary types for convenience
pub use api::engine::{ClarifyEngine, RunOptions, RunSummary};
pub use core::config::ClarifyConfig;
pub use core::errors::{ClarifyError, Result, ResultExt};

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
