//! Naming evidence and its ranking table.

use std::cmp::Reverse;
use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::config::NamingStyle;
use crate::resolve::SymbolId;

/// Where a proposed name came from. The ranking between kinds is total and
/// fixed; see [`EvidenceKind::rank`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceKind {
    /// Position in an equality assertion, or the exception a test expects
    AssertionRole,
    /// Name of the call a value comes from, or the calls a test makes
    CalleeReturn,
    /// A literal initializer and the parameter it is passed to
    LiteralAssignment,
    /// The declared type alone
    TypeOnly,
}

impl EvidenceKind {
    pub const ALL: [EvidenceKind; 4] = [
        EvidenceKind::AssertionRole,
        EvidenceKind::CalleeReturn,
        EvidenceKind::LiteralAssignment,
        EvidenceKind::TypeOnly,
    ];

    /// Higher wins
    pub const fn rank(self) -> u8 {
        match self {
            EvidenceKind::AssertionRole => 4,
            EvidenceKind::CalleeReturn => 3,
            EvidenceKind::LiteralAssignment => 2,
            EvidenceKind::TypeOnly => 1,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            EvidenceKind::AssertionRole => "assertion_role",
            EvidenceKind::CalleeReturn => "callee_return",
            EvidenceKind::LiteralAssignment => "literal_assignment",
            EvidenceKind::TypeOnly => "type_only",
        }
    }
}

impl fmt::Display for EvidenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Positional fallbacks (`input1`, `value2`) rank below every direct item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceStrength {
    Direct,
    Fallback,
}

/// One piece of information suggesting a name for a symbol
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingEvidence {
    pub symbol: SymbolId,
    pub kind: EvidenceKind,
    pub strength: EvidenceStrength,
    /// Human-readable account of the evidence (`calc.add()`)
    pub text: String,
    /// Lower-case words of the candidate name
    pub words: Vec<String>,
    /// Source offset of the use site (or declaration) it was read from
    pub position: usize,
}

impl NamingEvidence {
    /// Candidate name in the given style
    pub fn candidate(&self, style: NamingStyle) -> String {
        style.join(&self.words)
    }
}

/// Sort evidence best-first and drop items proposing a name already offered
/// by a better one.
///
/// Order: direct before fallback, then by kind rank, then by earliest
/// position. The sort is stable, so remaining ties keep collection order.
pub fn rank_evidence(items: &mut Vec<NamingEvidence>) {
    items.sort_by_key(|e| {
        (
            e.strength == EvidenceStrength::Fallback,
            Reverse(e.kind.rank()),
            e.position,
        )
    });
    let mut seen = HashSet::new();
    items.retain(|e| !e.words.is_empty() && seen.insert(e.words.clone()));
}

/// Ranked evidence for one candidate symbol
#[derive(Debug, Clone)]
pub struct SymbolEvidence {
    pub symbol: SymbolId,
    pub items: Vec<NamingEvidence>,
}

impl SymbolEvidence {
    /// The winning item after `depth` verifier-requested fallbacks
    pub fn at_depth(&self, depth: usize) -> Option<&NamingEvidence> {
        self.items.get(depth)
    }
}
