//! Identifier-erasing structural comparison of a file and its rewrite.
//!
//! Both trees are walked in lockstep. Identifiers that resolve to a symbol
//! compare by symbol id, so a renamed variable matches itself while an
//! identifier captured by a new declaration does not. All other leaves
//! compare by text and interior nodes by grammar kind and field.

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

use tracing::debug;
use tree_edit_distance::{diff, Node as TedNode, Tree as TedTree};

use crate::core::config::VerificationConfig;
use crate::core::errors::{ClarifyError, Result};
use crate::lang::{NodeKind, SourceFile, Span, SyntaxNode};
use crate::resolve::{Resolution, SymbolId, SymbolKind, SymbolTable};

/// Simple tree for tree-edit-distance computation.
#[derive(Debug, Clone)]
pub struct SimpleAstNode {
    pub kind_hash: u64,
    pub kind_label: String,
    pub children: Vec<SimpleAstNode>,
}

impl TedNode for SimpleAstNode {
    type Kind = u64;

    fn kind(&self) -> Self::Kind {
        self.kind_hash
    }

    type Weight = u64;

    fn weight(&self) -> Self::Weight {
        1
    }
}

impl TedTree for SimpleAstNode {
    type Children<'c>
        = std::slice::Iter<'c, SimpleAstNode>
    where
        Self: 'c;

    fn children(&self) -> Self::Children<'_> {
        self.children.iter()
    }
}

/// Hash a normalized label to u64.
pub fn hash_kind(kind: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    kind.hash(&mut hasher);
    hasher.finish()
}

/// Comparison key of one node after identifier erasure
#[derive(Debug, Clone, PartialEq, Eq)]
enum NodeLabel<'a> {
    Interior {
        grammar: &'static str,
        field: Option<&'static str>,
    },
    Symbol {
        field: Option<&'static str>,
        id: SymbolId,
    },
    Leaf {
        grammar: &'static str,
        field: Option<&'static str>,
        text: &'a str,
    },
}

impl fmt::Display for NodeLabel<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeLabel::Interior { grammar, field } => match field {
                Some(field) => write!(f, "{field}:{grammar}"),
                None => write!(f, "{grammar}"),
            },
            NodeLabel::Symbol { id, .. } => write!(f, "symbol#{}", id.0),
            NodeLabel::Leaf { grammar, text, .. } => write!(f, "{grammar} `{text}`"),
        }
    }
}

fn label<'a>(node: &SyntaxNode, source: &'a SourceFile, symbols: &SymbolTable) -> NodeLabel<'a> {
    if !node.is_leaf() {
        return NodeLabel::Interior {
            grammar: node.grammar,
            field: node.field,
        };
    }
    if node.kind == NodeKind::Identifier {
        if let Some(id) = symbols.symbol_at(node.span.start) {
            return NodeLabel::Symbol {
                field: node.field,
                id,
            };
        }
    }
    NodeLabel::Leaf {
        grammar: node.grammar,
        field: node.field,
        text: source.node_text(node),
    }
}

/// First point where the rewrite departs from the original
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    /// Span of the mismatched node in the original file
    pub span: Span,
    pub message: String,
    pub edit_cost: Option<u64>,
}

impl Mismatch {
    pub fn into_error(self) -> ClarifyError {
        ClarifyError::RewriteCorruption {
            message: self.message,
            offset: self.span.start,
            edit_cost: self.edit_cost,
        }
    }
}

/// Re-parse based structural equivalence check
#[derive(Debug, Clone)]
pub struct StructuralVerifier {
    max_diff_nodes: usize,
}

impl StructuralVerifier {
    pub fn new(config: &VerificationConfig) -> Self {
        Self {
            max_diff_nodes: config.max_diff_nodes,
        }
    }

    /// Fail with `RewriteCorruption` unless both files are equivalent
    pub fn verify(
        &self,
        original: (&SourceFile, &Resolution),
        rewritten: (&SourceFile, &Resolution),
    ) -> Result<()> {
        match self.compare(original, rewritten) {
            Some(mismatch) => Err(mismatch.into_error()),
            None => Ok(()),
        }
    }

    /// First mismatch in pre-order, if any
    pub fn compare(
        &self,
        (original, original_res): (&SourceFile, &Resolution),
        (rewritten, rewritten_res): (&SourceFile, &Resolution),
    ) -> Option<Mismatch> {
        let side_a = Side {
            source: original,
            symbols: &original_res.symbols,
        };
        let side_b = Side {
            source: rewritten,
            symbols: &rewritten_res.symbols,
        };

        let (span, message) = first_mismatch(original.root(), rewritten.root(), &side_a, &side_b)
            .or_else(|| renamed_qualified_member(&original_res.symbols, &rewritten_res.symbols))?;

        let edit_cost = (original.root().node_count() <= self.max_diff_nodes
            && rewritten.root().node_count() <= self.max_diff_nodes)
            .then(|| {
                let (_, cost) = diff(&side_a.simplify(original.root()), &side_b.simplify(rewritten.root()));
                cost
            });
        debug!(
            "Structural mismatch at byte {} ({}), edit cost {:?}",
            span.start, message, edit_cost
        );

        Some(Mismatch {
            span,
            message,
            edit_cost,
        })
    }
}

struct Side<'a> {
    source: &'a SourceFile,
    symbols: &'a SymbolTable,
}

impl<'a> Side<'a> {
    fn label(&self, node: &SyntaxNode) -> NodeLabel<'a> {
        label(node, self.source, self.symbols)
    }

    fn simplify(&self, node: &SyntaxNode) -> SimpleAstNode {
        let kind_label = self.label(node).to_string();
        SimpleAstNode {
            kind_hash: hash_kind(&kind_label),
            kind_label,
            children: node.children.iter().map(|c| self.simplify(c)).collect(),
        }
    }
}

/// A renamed field or method whose old name is still reached through a
/// qualifier (`node.v`, `Type::m`). Qualified occurrences are external on
/// both sides, so the tree walk alone cannot see them go stale.
fn renamed_qualified_member(original: &SymbolTable, rewritten: &SymbolTable) -> Option<(Span, String)> {
    let qualified = original.qualified_members();
    original
        .iter()
        .filter(|s| matches!(s.kind, SymbolKind::Field | SymbolKind::Method))
        .filter(|s| qualified.contains(&s.original_name))
        .find_map(|s| {
            let renamed = rewritten.find(s.id)?;
            (renamed.original_name != s.original_name).then(|| {
                (
                    s.decl_span,
                    format!(
                        "'{}' is renamed to '{}' but is also reached through a qualifier",
                        s.original_name, renamed.original_name
                    ),
                )
            })
        })
}

fn first_mismatch(
    a: &SyntaxNode,
    b: &SyntaxNode,
    side_a: &Side<'_>,
    side_b: &Side<'_>,
) -> Option<(Span, String)> {
    let (label_a, label_b) = (side_a.label(a), side_b.label(b));
    if label_a != label_b {
        return Some((a.span, format!("expected {label_a}, found {label_b}")));
    }
    if a.children.len() != b.children.len() {
        return Some((
            a.span,
            format!(
                "{label_a} has {} children, rewrite has {}",
                a.children.len(),
                b.children.len()
            ),
        ));
    }
    a.children
        .iter()
        .zip(&b.children)
        .find_map(|(ca, cb)| first_mismatch(ca, cb, side_a, side_b))
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::sync::Arc;

    use super::*;
    use crate::core::config::DialectConfig;
    use crate::lang::JavaAdapter;

    fn parsed(source: &str) -> (SourceFile, Resolution) {
        let dialect = DialectConfig::default();
        let file = JavaAdapter::new(dialect.clone())
            .unwrap()
            .parse_source(Arc::from(source), Path::new("T.java"))
            .unwrap();
        let resolution = Resolution::build(&file, &dialect).unwrap();
        (file, resolution)
    }

    fn compare(before: &str, after: &str) -> Option<Mismatch> {
        let (a, ra) = parsed(before);
        let (b, rb) = parsed(after);
        StructuralVerifier::new(&VerificationConfig::default()).compare((&a, &ra), (&b, &rb))
    }

    #[test]
    fn consistent_renames_are_equivalent() {
        let before = "class T { void m() { int a = 1; System.out.println(a); } }";
        let after = "class T { void m() { int count = 1; System.out.println(count); } }";
        assert_eq!(compare(before, after), None);
    }

    #[test]
    fn changed_literals_are_detected() {
        let before = "class T { void m() { int a = 1; } }";
        let after = "class T { void m() { int a = 2; } }";
        let mismatch = compare(before, after).unwrap();
        assert_eq!(mismatch.span.start, before.find('1').unwrap());
        assert!(mismatch.edit_cost.unwrap_or(0) > 0);
    }

    #[test]
    fn captured_references_are_detected() {
        // `b` is a field in the original; after the rename the local takes its name.
        let before = "class T { int b; void m() { int a = 1; System.out.println(a + b); } }";
        let after = "class T { int b; void m() { int b = 1; System.out.println(b + b); } }";
        let mismatch = compare(before, after).unwrap();
        let second_b = before.rfind('b').unwrap();
        assert_eq!(mismatch.span.start, second_b);
        assert!(matches!(mismatch.into_error(), ClarifyError::RewriteCorruption { .. }));
    }

    #[test]
    fn partially_applied_renames_are_rejected() {
        use crate::rename::{apply, Substitution};

        let before = "class T { void m() { int a = 1; int b = a + a; } }";
        let (file, resolution) = parsed(before);
        let id = resolution.symbols.symbol_at(before.find("a =").unwrap()).unwrap();
        let symbol = resolution.symbols.get(id);

        // Declaration and first use only; the second use keeps the old name.
        let subs: Vec<Substitution> = symbol
            .occurrence_spans()
            .take(2)
            .map(|span| Substitution {
                span,
                replacement: "count".to_string(),
            })
            .collect();
        let after = apply(before, &subs).unwrap();
        assert_eq!(after, "class T { void m() { int count = 1; int b = count + a; } }");

        let (rewritten, rewritten_res) = parsed(&after);
        let verifier = StructuralVerifier::new(&VerificationConfig::default());
        let err = verifier
            .verify((&file, &resolution), (&rewritten, &rewritten_res))
            .unwrap_err();
        match err {
            ClarifyError::RewriteCorruption { offset, .. } => {
                assert_eq!(offset, before.rfind('a').unwrap());
            }
            other => panic!("expected rewrite corruption, got {other:?}"),
        }
    }

    #[test]
    fn renamed_members_with_qualified_uses_are_rejected() {
        let before = "class T { static class Node { int v; } void m() { Node node = new Node(); node.v = 3; } }";
        let after = "class T { static class Node { int value; } void m() { Node node = new Node(); node.v = 3; } }";
        let mismatch = compare(before, after).unwrap();
        assert_eq!(mismatch.span.start, before.find("v;").unwrap());
        assert!(mismatch.message.contains("qualifier"));
    }

    #[test]
    fn large_trees_skip_the_edit_cost() {
        let (a, ra) = parsed("class T { void m() { int a = 1; } }");
        let (b, rb) = parsed("class T { void m() { int a = 2; } }");
        let verifier = StructuralVerifier::new(&VerificationConfig { max_diff_nodes: 3 });
        let mismatch = verifier.compare((&a, &ra), (&b, &rb)).unwrap();
        assert_eq!(mismatch.edit_cost, None);
    }
}
