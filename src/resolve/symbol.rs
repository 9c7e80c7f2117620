//! Symbols, their use sites and the per-file symbol table.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use super::scope::{ScopeArena, ScopeId};
use crate::core::errors::{ClarifyError, Result};
use crate::lang::Span;

/// Index of a symbol in its [`SymbolTable`]; unique per file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SymbolId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolKind {
    LocalVariable,
    Parameter,
    Field,
    Method,
}

/// Category of a literal initializer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LiteralCategory {
    Integer,
    Float,
    String,
    Char,
    Boolean,
    Null,
}

impl LiteralCategory {
    /// Java type a `var` declaration takes from this literal
    pub fn java_type(self) -> Option<&'static str> {
        match self {
            Self::Integer => Some("int"),
            Self::Float => Some("double"),
            Self::String => Some("String"),
            Self::Char => Some("char"),
            Self::Boolean => Some("boolean"),
            Self::Null => None,
        }
    }
}

/// Shape of the expression a variable is initialized from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Initializer {
    None,
    Literal {
        category: LiteralCategory,
    },
    Call {
        callee: String,
        receiver: Option<String>,
        receiver_symbol: Option<SymbolId>,
        callee_symbol: Option<SymbolId>,
    },
    Construction {
        type_name: String,
    },
    Other,
}

impl Initializer {
    pub fn is_call(&self) -> bool {
        matches!(self, Self::Call { .. })
    }
}

/// How an assertion call treats its arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssertionShape {
    pub method: String,
    /// Two-argument equality assertion (`expected`, `actual`)
    pub equality: bool,
    /// First argument is a failure message, shifting the others by one
    pub leading_message: bool,
}

/// Identifier passed directly as an argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallArgument {
    pub callee: String,
    pub callee_symbol: Option<SymbolId>,
    pub position: usize,
    pub arg_count: usize,
    pub assertion: Option<AssertionShape>,
}

impl CallArgument {
    /// Position once a leading assertion message is discounted
    pub fn effective_position(&self) -> usize {
        match &self.assertion {
            Some(shape) if shape.leading_message => self.position.saturating_sub(1),
            _ => self.position,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UseContext {
    Plain,
    Argument(CallArgument),
    Receiver { callee: String },
}

/// One reference to a symbol
#[derive(Debug, Clone)]
pub struct UseSite {
    pub span: Span,
    /// Nearest enclosing scope of the reference
    pub scope: ScopeId,
    pub context: UseContext,
}

#[derive(Debug, Clone)]
pub struct Symbol {
    pub id: SymbolId,
    pub original_name: String,
    pub kind: SymbolKind,
    pub declared_type: Option<String>,
    pub declaring_scope: ScopeId,
    /// Span of the declaring identifier
    pub decl_span: Span,
    /// Span of the whole declaring construct (declarator, parameter, method)
    pub node_span: Span,
    pub initializer: Initializer,
    /// Position among the owner's formal parameters
    pub parameter_index: Option<usize>,
    /// Enclosing method for parameters and locals
    pub owner: Option<SymbolId>,
    pub use_sites: Vec<UseSite>,
    pub renameable: bool,
    pub is_test: bool,
}

impl Symbol {
    /// Declaration span followed by every use-site span
    pub fn occurrence_spans(&self) -> impl Iterator<Item = Span> + '_ {
        std::iter::once(self.decl_span).chain(self.use_sites.iter().map(|u| u.span))
    }

    /// Source offset of the earliest use, or the declaration when unused
    pub fn first_use(&self) -> usize {
        self.use_sites
            .first()
            .map_or(self.decl_span.start, |u| u.span.start)
    }
}

/// Every symbol of one file plus the identifiers that resolved to nothing
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
    /// Text of identifiers that resolve to no symbol
    external: BTreeSet<String>,
    /// Identifier start offset to the symbol it names (declarations and uses)
    resolved: BTreeMap<usize, SymbolId>,
    /// Member names reached through a qualifier (`node.v`, `Type::m`, `obj.m()`)
    qualified_members: BTreeSet<String>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a symbol; its id is assigned here
    pub fn insert(&mut self, mut symbol: Symbol) -> SymbolId {
        let id = SymbolId(self.symbols.len());
        symbol.id = id;
        self.resolved.insert(symbol.decl_span.start, id);
        self.symbols.push(symbol);
        id
    }

    pub fn add_use(&mut self, id: SymbolId, site: UseSite) {
        self.resolved.insert(site.span.start, id);
        self.symbols[id.0].use_sites.push(site);
    }

    pub fn add_external(&mut self, name: &str) {
        if !self.external.contains(name) {
            self.external.insert(name.to_string());
        }
    }

    /// Record a member name reached through a qualifier the resolver does
    /// not follow; such names are also external
    pub fn add_qualified_member(&mut self, name: &str) {
        self.add_external(name);
        if !self.qualified_members.contains(name) {
            self.qualified_members.insert(name.to_string());
        }
    }

    pub fn qualified_members(&self) -> &BTreeSet<String> {
        &self.qualified_members
    }

    /// Fields and methods sharing a name with a qualified member access keep
    /// their name, since the qualified occurrence cannot be rewritten with
    /// them. Returns how many symbols were pinned.
    pub fn pin_qualified_members(&mut self) -> usize {
        let mut pinned = 0;
        for symbol in &mut self.symbols {
            if symbol.renameable
                && matches!(symbol.kind, SymbolKind::Field | SymbolKind::Method)
                && self.qualified_members.contains(&symbol.original_name)
            {
                symbol.renameable = false;
                pinned += 1;
            }
        }
        pinned
    }

    pub fn find(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id.0)
    }

    pub fn get(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.0]
    }

    pub fn get_mut(&mut self, id: SymbolId) -> &mut Symbol {
        &mut self.symbols[id.0]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn external_names(&self) -> &BTreeSet<String> {
        &self.external
    }

    /// Symbol named by the identifier starting at `offset`
    pub fn symbol_at(&self, offset: usize) -> Option<SymbolId> {
        self.resolved.get(&offset).copied()
    }

    /// Formal parameters of a method in declaration order
    pub fn parameters_of(&self, method: SymbolId) -> Vec<&Symbol> {
        let mut params: Vec<&Symbol> = self
            .symbols
            .iter()
            .filter(|s| s.owner == Some(method) && s.kind == SymbolKind::Parameter)
            .filter(|s| s.parameter_index.is_some())
            .collect();
        params.sort_by_key(|s| s.parameter_index);
        params
    }

    /// Check the guarantees the resolver makes to later stages
    pub fn check_invariants(&self, scopes: &ScopeArena) -> Result<()> {
        for symbol in &self.symbols {
            for site in &symbol.use_sites {
                if !scopes.is_ancestor_or_self(symbol.declaring_scope, site.scope) {
                    return Err(ClarifyError::invariant(format!(
                        "use of '{}' at {} lies outside its declaring scope",
                        symbol.original_name, site.span
                    )));
                }
                if site.span.overlaps(symbol.decl_span) {
                    return Err(ClarifyError::invariant(format!(
                        "use of '{}' at {} overlaps its declaration",
                        symbol.original_name, site.span
                    )));
                }
            }
            let mut starts: Vec<usize> = symbol.occurrence_spans().map(|s| s.start).collect();
            let total = starts.len();
            starts.sort_unstable();
            starts.dedup();
            if starts.len() != total {
                return Err(ClarifyError::invariant(format!(
                    "'{}' records the same occurrence twice",
                    symbol.original_name
                )));
            }
        }
        Ok(())
    }
}
