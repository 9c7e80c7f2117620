//! Equivalence verification of rewritten files.
//!
//! - Structural: re-parse, re-resolve and compare with identifiers erased
//! - Execution: run both variants and compare per-test outcomes

pub mod execution;
pub mod structural;

pub use execution::{
    compare_outcomes, parse_outcomes, CommandExecutor, ExecutionCollaborator, ExecutionVerdict,
    ExecutionVerifier, TestOutcome, TestResult,
};
pub use structural::{hash_kind, Mismatch, SimpleAstNode, StructuralVerifier};
