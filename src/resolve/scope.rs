//! Arena of lexical scopes with parent-pointer lookup.

use indexmap::IndexMap;
use serde::Serialize;

use super::symbol::SymbolId;
use crate::lang::Span;

/// Index of a scope in its [`ScopeArena`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ScopeId(pub usize);

/// Lexical region kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ScopeKind {
    File,
    Class,
    Method,
    Block,
}

/// Java keeps methods and variables in separate namespaces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Namespace {
    Value,
    Method,
}

#[derive(Debug, Clone)]
pub struct Scope {
    pub id: ScopeId,
    pub kind: ScopeKind,
    pub parent: Option<ScopeId>,
    pub children: Vec<ScopeId>,
    pub span: Span,
    bindings: IndexMap<(Namespace, String), SymbolId>,
}

impl Scope {
    /// Symbols bound directly in this scope, in declaration order
    pub fn bindings(&self) -> impl Iterator<Item = (Namespace, &str, SymbolId)> {
        self.bindings
            .iter()
            .map(|((ns, name), id)| (*ns, name.as_str(), *id))
    }
}

/// Scope tree stored by index; the root is the file scope
#[derive(Debug, Clone)]
pub struct ScopeArena {
    scopes: Vec<Scope>,
}

impl ScopeArena {
    /// Create an arena holding only the file scope
    pub fn new(file_span: Span) -> Self {
        Self {
            scopes: vec![Scope {
                id: ScopeId(0),
                kind: ScopeKind::File,
                parent: None,
                children: Vec::new(),
                span: file_span,
                bindings: IndexMap::new(),
            }],
        }
    }

    pub fn root(&self) -> ScopeId {
        ScopeId(0)
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    pub fn get(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.0]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Scope> {
        self.scopes.iter()
    }

    /// Open a child scope
    pub fn push(&mut self, parent: ScopeId, kind: ScopeKind, span: Span) -> ScopeId {
        let id = ScopeId(self.scopes.len());
        self.scopes.push(Scope {
            id,
            kind,
            parent: Some(parent),
            children: Vec::new(),
            span,
            bindings: IndexMap::new(),
        });
        self.scopes[parent.0].children.push(id);
        id
    }

    /// Bind a name, returning the symbol it replaced in this scope
    pub fn bind(
        &mut self,
        scope: ScopeId,
        namespace: Namespace,
        name: &str,
        symbol: SymbolId,
    ) -> Option<SymbolId> {
        self.scopes[scope.0]
            .bindings
            .insert((namespace, name.to_string()), symbol)
    }

    /// Binding in exactly this scope
    pub fn lookup_local(&self, scope: ScopeId, namespace: Namespace, name: &str) -> Option<SymbolId> {
        self.scopes[scope.0]
            .bindings
            .get(&(namespace, name.to_string()))
            .copied()
    }

    /// Innermost binding visible from `scope`
    pub fn lookup(&self, scope: ScopeId, namespace: Namespace, name: &str) -> Option<SymbolId> {
        self.ancestors(scope)
            .find_map(|id| self.lookup_local(id, namespace, name))
    }

    /// `scope` followed by each parent up to the root
    pub fn ancestors(&self, scope: ScopeId) -> impl Iterator<Item = ScopeId> + '_ {
        std::iter::successors(Some(scope), move |id| self.scopes[id.0].parent)
    }

    /// Nearest enclosing scope of a kind (including `scope` itself)
    pub fn enclosing(&self, scope: ScopeId, kind: ScopeKind) -> Option<ScopeId> {
        self.ancestors(scope).find(|id| self.scopes[id.0].kind == kind)
    }

    pub fn is_ancestor_or_self(&self, ancestor: ScopeId, scope: ScopeId) -> bool {
        self.ancestors(scope).any(|id| id == ancestor)
    }

    /// All scopes strictly below `scope`
    pub fn descendants(&self, scope: ScopeId) -> Vec<ScopeId> {
        let mut out = Vec::new();
        let mut stack: Vec<ScopeId> = self.scopes[scope.0].children.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.scopes[id.0].children.iter().rev().copied());
        }
        out
    }

    /// Scopes whose declarations can conflict with one made in `scope`:
    /// itself, its ancestors and its descendants.
    pub fn related(&self, scope: ScopeId) -> Vec<ScopeId> {
        let mut related: Vec<ScopeId> = self.ancestors(scope).collect();
        related.extend(self.descendants(scope));
        related
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arena() -> (ScopeArena, ScopeId, ScopeId, ScopeId, ScopeId) {
        let mut arena = ScopeArena::new(Span::new(0, 100));
        let class = arena.push(arena.root(), ScopeKind::Class, Span::new(0, 100));
        let method = arena.push(class, ScopeKind::Method, Span::new(10, 90));
        let block = arena.push(method, ScopeKind::Block, Span::new(20, 80));
        let sibling = arena.push(class, ScopeKind::Method, Span::new(90, 99));
        (arena, class, method, block, sibling)
    }

    #[test]
    fn lookup_walks_outward_and_stops_at_first_match() {
        let (mut arena, class, method, block, _) = arena();
        arena.bind(class, Namespace::Value, "x", SymbolId(0));
        arena.bind(method, Namespace::Value, "x", SymbolId(1));

        assert_eq!(arena.lookup(block, Namespace::Value, "x"), Some(SymbolId(1)));
        assert_eq!(arena.lookup(class, Namespace::Value, "x"), Some(SymbolId(0)));
        assert_eq!(arena.lookup(block, Namespace::Method, "x"), None);
    }

    #[test]
    fn every_scope_but_root_has_one_parent() {
        let (arena, ..) = arena();
        assert!(arena.get(arena.root()).parent.is_none());
        assert!(arena.iter().skip(1).all(|s| s.parent.is_some()));
    }

    #[test]
    fn related_scopes_exclude_siblings() {
        let (arena, class, method, block, sibling) = arena();
        let related = arena.related(method);
        assert!(related.contains(&class));
        assert!(related.contains(&block));
        assert!(related.contains(&arena.root()));
        assert!(!related.contains(&sibling));
        assert_eq!(arena.enclosing(block, ScopeKind::Class), Some(class));
    }
}
