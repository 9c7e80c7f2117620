//! CLI Module Organization
//!
//! - args: CLI argument structures and configuration types
//! - commands: command execution logic
//! - output: console formatting of results

pub mod args;
pub mod commands;
pub mod output;

// Re-export commonly used items for convenience
pub use args::*;
pub use commands::*;
