//! Rename plans and the builder that finalizes them in declaration order.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;

use crate::core::config::{ClarifyConfig, NamingStyle};
use crate::core::errors::Result;
use crate::detectors::names::{EvidenceKind, EvidenceStrength, SymbolEvidence};
use crate::resolve::{Resolution, ScopeArena, SymbolId, SymbolKind, SymbolTable};

use super::collision::CollisionResolver;

/// Which evidence produced a final name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rationale {
    pub evidence_kind: EvidenceKind,
    pub strength: EvidenceStrength,
    pub evidence: String,
    /// Collision suffix appended to the candidate
    pub suffix: Option<usize>,
    /// Verifier-requested fallbacks taken before this evidence
    pub fallback_depth: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanEntry {
    pub symbol: SymbolId,
    pub original_name: String,
    pub final_name: String,
    pub kind: SymbolKind,
    pub rationale: Rationale,
}

/// Final names for the symbols of one file, keyed by symbol id.
///
/// Only symbols whose name actually changes have an entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenamePlan {
    entries: IndexMap<SymbolId, PlanEntry>,
}

impl RenamePlan {
    pub fn entries(&self) -> impl Iterator<Item = &PlanEntry> {
        self.entries.values()
    }

    pub fn get(&self, symbol: SymbolId) -> Option<&PlanEntry> {
        self.entries.get(&symbol)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Original test-method name to renamed test-method name
    pub fn method_mapping(&self) -> BTreeMap<String, String> {
        self.entries()
            .filter(|e| e.kind == SymbolKind::Method)
            .map(|e| (e.original_name.clone(), e.final_name.clone()))
            .collect()
    }
}

/// Turns ranked evidence into a collision-free [`RenamePlan`].
///
/// Proposals are finalized in declaration order. Each one is checked against
/// the names already settled in related scopes (ancestors, the declaring
/// scope and descendants), the names of symbols that keep theirs, every
/// unresolved identifier of the file and the reserved words. Original names
/// of candidates that are not yet finalized do not block, because those
/// names are about to disappear.
pub struct PlanBuilder<'a> {
    scopes: &'a ScopeArena,
    symbols: &'a SymbolTable,
    evidence: &'a [SymbolEvidence],
    collisions: CollisionResolver<'a>,
    style: NamingStyle,
}

impl<'a> PlanBuilder<'a> {
    pub fn new(
        config: &'a ClarifyConfig,
        resolution: &'a Resolution,
        evidence: &'a [SymbolEvidence],
    ) -> Self {
        Self {
            scopes: &resolution.scopes,
            symbols: &resolution.symbols,
            evidence,
            collisions: CollisionResolver::new(
                &config.reserved_words,
                resolution.symbols.external_names(),
                config.naming_style,
                config.suffix_bound,
            ),
            style: config.naming_style,
        }
    }

    /// Build the plan, taking each symbol's evidence at the given depth
    /// (0 when absent). A symbol whose depth runs past its evidence keeps
    /// its name.
    pub fn build(&self, depths: &HashMap<SymbolId, usize>) -> Result<RenamePlan> {
        let depth_of = |id: SymbolId| depths.get(&id).copied().unwrap_or(0);

        let mut pending: HashSet<SymbolId> = self
            .evidence
            .iter()
            .filter(|e| e.at_depth(depth_of(e.symbol)).is_some())
            .map(|e| e.symbol)
            .collect();
        let mut finalized: HashMap<SymbolId, String> = HashMap::new();
        let mut plan = RenamePlan::default();

        for symbol_evidence in self.evidence {
            let depth = depth_of(symbol_evidence.symbol);
            let Some(winner) = symbol_evidence.at_depth(depth) else {
                continue;
            };
            let symbol = self.symbols.get(symbol_evidence.symbol);
            let candidate = winner.candidate(self.style);
            let taken = self.taken_names(symbol.id, &pending, &finalized);
            let free = self
                .collisions
                .resolve(&symbol.original_name, &candidate, &taken)?;

            pending.remove(&symbol.id);
            finalized.insert(symbol.id, free.name.clone());

            if free.name == symbol.original_name {
                continue;
            }
            debug!(
                "Renaming '{}' -> '{}' ({})",
                symbol.original_name, free.name, winner.kind
            );
            plan.entries.insert(
                symbol.id,
                PlanEntry {
                    symbol: symbol.id,
                    original_name: symbol.original_name.clone(),
                    final_name: free.name,
                    kind: symbol.kind,
                    rationale: Rationale {
                        evidence_kind: winner.kind,
                        strength: winner.strength,
                        evidence: winner.text.clone(),
                        suffix: free.suffix,
                        fallback_depth: depth,
                    },
                },
            );
        }

        Ok(plan)
    }

    fn taken_names(
        &self,
        symbol: SymbolId,
        pending: &HashSet<SymbolId>,
        finalized: &HashMap<SymbolId, String>,
    ) -> BTreeSet<String> {
        let declaring = self.symbols.get(symbol).declaring_scope;
        let mut taken = BTreeSet::new();
        for scope in self.scopes.related(declaring) {
            for (_, name, id) in self.scopes.get(scope).bindings() {
                if id == symbol {
                    continue;
                }
                if let Some(final_name) = finalized.get(&id) {
                    taken.insert(final_name.clone());
                } else if !pending.contains(&id) {
                    taken.insert(name.to_string());
                }
            }
        }
        taken
    }
}
