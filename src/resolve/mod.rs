//! Scope and symbol resolution.
//!
//! Builds an arena of lexical scopes for one source file and a table of
//! symbols with their declaration and ordered use sites. Identifiers that
//! resolve to nothing are kept as external names so later stages never
//! introduce a name that would capture them.

pub mod resolver;
pub mod scope;
pub mod symbol;

pub use resolver::{base_type_name, literal_category, Resolution};
pub use scope::{Namespace, Scope, ScopeArena, ScopeId, ScopeKind};
pub use symbol::{
    AssertionShape, CallArgument, Initializer, LiteralCategory, Symbol, SymbolId, SymbolKind,
    SymbolTable, UseContext, UseSite,
};

#[cfg(test)]
mod tests;
