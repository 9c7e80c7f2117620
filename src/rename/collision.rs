//! Disambiguation of proposed names against everything they could clash with.

use std::collections::BTreeSet;

use crate::core::errors::{ClarifyError, Result};
use crate::detectors::names::NamingStyle;

/// A proposal that survived collision checks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FreeName {
    pub name: String,
    /// Numeric suffix appended to the candidate, if any
    pub suffix: Option<usize>,
}

/// Checks candidates against reserved words, unresolved identifiers of the
/// file and the names visible from (or inside) the symbol's scope.
#[derive(Debug, Clone)]
pub struct CollisionResolver<'a> {
    reserved: &'a BTreeSet<String>,
    external: &'a BTreeSet<String>,
    style: NamingStyle,
    suffix_bound: usize,
}

impl<'a> CollisionResolver<'a> {
    pub fn new(
        reserved: &'a BTreeSet<String>,
        external: &'a BTreeSet<String>,
        style: NamingStyle,
        suffix_bound: usize,
    ) -> Self {
        Self {
            reserved,
            external,
            style,
            suffix_bound,
        }
    }

    /// Whether `name` is unavailable given the names `taken` in related scopes
    pub fn is_blocked(&self, name: &str, taken: &BTreeSet<String>) -> bool {
        self.reserved.contains(name) || self.external.contains(name) || taken.contains(name)
    }

    /// First free variant of `candidate`: the bare name, then suffixes
    /// `2..=suffix_bound`
    pub fn resolve(
        &self,
        original: &str,
        candidate: &str,
        taken: &BTreeSet<String>,
    ) -> Result<FreeName> {
        if !self.is_blocked(candidate, taken) {
            return Ok(FreeName {
                name: candidate.to_string(),
                suffix: None,
            });
        }

        let mut blocking = vec![candidate.to_string()];
        for n in 2..=self.suffix_bound {
            let variant = self.style.with_suffix(candidate, n);
            if !self.is_blocked(&variant, taken) {
                return Ok(FreeName {
                    name: variant,
                    suffix: Some(n),
                });
            }
            blocking.push(variant);
        }

        Err(ClarifyError::UnresolvableName {
            original: original.to_string(),
            candidate: candidate.to_string(),
            attempts: blocking.len(),
            blocking,
        })
    }
}
