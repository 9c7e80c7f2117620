//! Common syntax-tree abstractions shared by the pipeline stages.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Half-open byte range into a source buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Span {
    /// First byte
    pub start: usize,
    /// One past the last byte
    pub end: usize,
}

impl Span {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub const fn contains(&self, other: Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    pub const fn overlaps(&self, other: Span) -> bool {
        self.start < other.end && other.start < self.end
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Structural role of a syntax node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    Class,
    Method,
    Block,
    Declaration,
    CallExpression,
    AssertionCall,
    Literal,
    Identifier,
    Comment,
    Other,
}

/// Node of the full-fidelity syntax tree.
///
/// Every leaf carries the whitespace run that precedes it, so concatenating
/// `leading` + leaf text over all leaves (plus the tree's trailing trivia)
/// reproduces the source exactly.
#[derive(Debug, Clone)]
pub struct SyntaxNode {
    pub kind: NodeKind,
    /// Grammar kind as reported by the parser (`method_invocation`, `;`, ...)
    pub grammar: &'static str,
    /// Field name under the parent, if the grammar assigns one
    pub field: Option<&'static str>,
    pub named: bool,
    pub span: Span,
    /// Whitespace between the previous leaf and this one (leaves only)
    pub leading: Span,
    pub children: Vec<SyntaxNode>,
}

impl SyntaxNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// First child assigned to a grammar field
    pub fn child_by_field(&self, field: &str) -> Option<&SyntaxNode> {
        self.children.iter().find(|c| c.field == Some(field))
    }

    /// All children assigned to a grammar field
    pub fn children_by_field<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a SyntaxNode> + 'a {
        self.children.iter().filter(move |c| c.field == Some(field))
    }

    /// Named children, skipping punctuation and comments
    pub fn named_children(&self) -> impl Iterator<Item = &SyntaxNode> {
        self.children
            .iter()
            .filter(|c| c.named && c.kind != NodeKind::Comment)
    }

    /// First named child of the given grammar kind
    pub fn child_of_kind(&self, grammar: &str) -> Option<&SyntaxNode> {
        self.children.iter().find(|c| c.grammar == grammar)
    }

    /// Deepest node whose span equals `span` and whose grammar kind matches.
    pub fn find(&self, span: Span, grammar: &str) -> Option<&SyntaxNode> {
        if !self.span.contains(span) {
            return None;
        }
        for child in &self.children {
            if let Some(found) = child.find(span, grammar) {
                return Some(found);
            }
        }
        (self.span == span && self.grammar == grammar).then_some(self)
    }

    /// Pre-order traversal
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a SyntaxNode)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }

    /// Number of nodes in this subtree
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(SyntaxNode::node_count).sum::<usize>()
    }

    /// Strip parentheses and casts around an expression
    pub fn unwrap_expression(&self) -> &SyntaxNode {
        match self.grammar {
            "parenthesized_expression" => self
                .named_children()
                .next()
                .map_or(self, SyntaxNode::unwrap_expression),
            "cast_expression" => self
                .child_by_field("value")
                .map_or(self, SyntaxNode::unwrap_expression),
            _ => self,
        }
    }
}

/// Parsed tree plus the trailing trivia after the last leaf
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    pub root: SyntaxNode,
    pub trailing: Span,
}

impl SyntaxTree {
    /// Re-emit the source text from the tree's leaves and trivia.
    pub fn render(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        self.root.walk(&mut |node| {
            if node.is_leaf() {
                out.push_str(&text[node.leading.start..node.leading.end]);
                out.push_str(&text[node.span.start..node.span.end]);
            }
        });
        out.push_str(&text[self.trailing.start..self.trailing.end]);
        out
    }
}

/// Immutable source text and its syntax tree
#[derive(Debug, Clone)]
pub struct SourceFile {
    path: PathBuf,
    text: Arc<str>,
    tree: SyntaxTree,
}

impl SourceFile {
    pub fn new(path: impl Into<PathBuf>, text: Arc<str>, tree: SyntaxTree) -> Self {
        Self {
            path: path.into(),
            text,
            tree,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn tree(&self) -> &SyntaxTree {
        &self.tree
    }

    pub fn root(&self) -> &SyntaxNode {
        &self.tree.root
    }

    /// Source text covered by a span
    pub fn slice(&self, span: Span) -> &str {
        &self.text[span.start..span.end]
    }

    /// Source text of a node
    pub fn node_text(&self, node: &SyntaxNode) -> &str {
        self.slice(node.span)
    }

    /// 1-based line and column of a byte offset
    pub fn line_col(&self, offset: usize) -> (usize, usize) {
        line_col(&self.text, offset)
    }
}

/// 1-based line and column of a byte offset in `text`
pub fn line_col(text: &str, offset: usize) -> (usize, usize) {
    let offset = offset.min(text.len());
    let before = &text[..offset];
    let line = before.matches('\n').count() + 1;
    let column = before.rfind('\n').map_or(offset, |nl| offset - nl - 1) + 1;
    (line, column)
}
