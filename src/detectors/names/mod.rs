//! Naming oracle: decides which identifiers say nothing and what they
//! should be called instead.
//!
//! Evidence is read from the structural role of each symbol:
//! - the call a value is initialized from (`calc.add(2, 3)` -> `sum`)
//! - a literal initializer and the parameter it is passed to
//! - its position in an equality assertion (`expected`, `actual`)
//! - its declared type (`BankAccount` -> `account`)
//!
//! Test methods are named after the behavior their body exercises.

pub mod analyzer;
pub mod config;
pub mod evidence;
pub mod generator;

// Re-export all public types and structs from config
pub use config::*;

// Re-export the main analyzer
pub use analyzer::NamingOracle;

pub use evidence::{rank_evidence, EvidenceKind, EvidenceStrength, NamingEvidence, SymbolEvidence};
pub use generator::{MethodProfile, MethodProfiler, NameGenerator};
