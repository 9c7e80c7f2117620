//! Turning naming evidence into a rewritten source file.
//!
//! [`PlanBuilder`] settles one collision-free name per candidate symbol,
//! [`substitutions`] expands the plan into identifier spans and [`apply`]
//! writes them into the original text.

pub mod collision;
pub mod plan;
pub mod rewriter;

pub use collision::{CollisionResolver, FreeName};
pub use plan::{PlanBuilder, PlanEntry, Rationale, RenamePlan};
pub use rewriter::{apply, substitutions, Substitution};
