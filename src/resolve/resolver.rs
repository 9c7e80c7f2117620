//! Top-down scope construction and identifier resolution over a Java syntax tree.

use std::collections::HashMap;

use tracing::debug;

use super::scope::{Namespace, ScopeArena, ScopeId, ScopeKind};
use super::symbol::{
    AssertionShape, CallArgument, Initializer, LiteralCategory, Symbol, SymbolId, SymbolKind,
    SymbolTable, UseContext, UseSite,
};
use crate::core::config::DialectConfig;
use crate::core::errors::Result;
use crate::lang::{NodeKind, SourceFile, Span, SyntaxNode};

/// Scope tree and symbol table of one file
#[derive(Debug, Clone)]
pub struct Resolution {
    pub scopes: ScopeArena,
    pub symbols: SymbolTable,
}

impl Resolution {
    /// Resolve every identifier of `source`
    pub fn build(source: &SourceFile, dialect: &DialectConfig) -> Result<Self> {
        let mut resolver = Resolver::new(source, dialect);
        let root = resolver.scopes.root();
        resolver.walk(source.root(), root)?;

        let Resolver {
            scopes, mut symbols, ..
        } = resolver;
        let pinned = symbols.pin_qualified_members();
        if pinned > 0 {
            debug!(
                "{} members of {} are reached through a qualifier and keep their names",
                pinned,
                source.path().display()
            );
        }
        symbols
            .check_invariants(&scopes)
            .map_err(|e| e.with_file(source.path().display().to_string()))?;

        debug!(
            "Resolved {} symbols across {} scopes in {}",
            symbols.len(),
            scopes.len(),
            source.path().display()
        );
        Ok(Self { scopes, symbols })
    }
}

struct Resolver<'a> {
    source: &'a SourceFile,
    dialect: &'a DialectConfig,
    scopes: ScopeArena,
    symbols: SymbolTable,
    /// Method symbols keyed by the start of their declaration node
    members: HashMap<usize, SymbolId>,
    /// Enclosing named method of the code being walked
    owners: Vec<Option<SymbolId>>,
}

impl<'a> Resolver<'a> {
    fn new(source: &'a SourceFile, dialect: &'a DialectConfig) -> Self {
        Self {
            source,
            dialect,
            scopes: ScopeArena::new(source.root().span),
            symbols: SymbolTable::new(),
            members: HashMap::new(),
            owners: vec![None],
        }
    }

    fn text(&self, node: &SyntaxNode) -> &'a str {
        let source: &'a SourceFile = self.source;
        source.node_text(node)
    }

    fn owner(&self) -> Option<SymbolId> {
        self.owners.last().copied().flatten()
    }

    fn walk(&mut self, node: &SyntaxNode, scope: ScopeId) -> Result<()> {
        match node.grammar {
            "package_declaration" | "import_declaration" | "marker_annotation" | "annotation"
            | "labeled_statement" | "break_statement" | "continue_statement" => {
                self.walk_opaque_identifiers(node, scope)
            }
            "class_declaration" | "interface_declaration" | "enum_declaration"
            | "record_declaration" | "annotation_type_declaration" => {
                self.walk_type_declaration(node, scope)
            }
            "class_body" => {
                let class_scope = self.scopes.push(scope, ScopeKind::Class, node.span);
                self.walk_members(node, class_scope)
            }
            "method_declaration" | "constructor_declaration" | "compact_constructor_declaration" => {
                self.walk_method(node, scope)
            }
            "lambda_expression" => self.walk_lambda(node, scope),
            "block" | "constructor_body" | "switch_block" | "for_statement" => {
                let inner = self.scopes.push(scope, ScopeKind::Block, node.span);
                self.walk_children(node, inner)
            }
            "enhanced_for_statement" => self.walk_enhanced_for(node, scope),
            "catch_clause" => self.walk_catch(node, scope),
            "try_with_resources_statement" => {
                let inner = self.scopes.push(scope, ScopeKind::Block, node.span);
                self.walk_children(node, inner)
            }
            "resource" => self.walk_resource(node, scope),
            "local_variable_declaration" => self.walk_local_declaration(node, scope),
            "instanceof_expression" => self.walk_instanceof(node, scope),
            "method_invocation" => self.walk_invocation(node, scope),
            "object_creation_expression" => self.walk_construction(node, scope),
            "field_access" => self.walk_field_access(node, scope),
            "method_reference" => self.walk_method_reference(node, scope),
            "identifier" => {
                self.reference(node, scope, UseContext::Plain);
                Ok(())
            }
            _ => self.walk_children(node, scope),
        }
    }

    fn walk_children(&mut self, node: &SyntaxNode, scope: ScopeId) -> Result<()> {
        for child in &node.children {
            self.walk(child, scope)?;
        }
        Ok(())
    }

    /// Record every identifier below `node` as external. A labelled
    /// statement only hides its label; its body is resolved normally.
    fn walk_opaque_identifiers(&mut self, node: &SyntaxNode, scope: ScopeId) -> Result<()> {
        match node.grammar {
            "labeled_statement" => {
                for child in &node.children {
                    if child.grammar == "identifier" {
                        self.symbols.add_external(self.text(child));
                    } else {
                        self.walk(child, scope)?;
                    }
                }
                Ok(())
            }
            _ => {
                node.walk(&mut |n| {
                    if n.kind == NodeKind::Identifier {
                        self.symbols.add_external(self.source.node_text(n));
                    }
                });
                Ok(())
            }
        }
    }

    /// Class, interface, enum and record declarations
    fn walk_type_declaration(&mut self, node: &SyntaxNode, scope: ScopeId) -> Result<()> {
        let class_scope = self.scopes.push(scope, ScopeKind::Class, node.span);

        if node.grammar == "record_declaration" {
            if let Some(components) = node.child_by_field("parameters") {
                for component in components.named_children() {
                    if let Some(name) = component.child_by_field("name") {
                        let declared_type = component.child_by_field("type").map(|t| self.text(t));
                        self.declare(
                            name,
                            component.span,
                            class_scope,
                            Namespace::Value,
                            SymbolKind::Field,
                            declared_type,
                            Initializer::None,
                            false,
                        );
                    }
                }
            }
        }

        for child in &node.children {
            match child.field {
                Some("name") => self.symbols.add_external(self.text(child)),
                Some("body") => self.walk_members(child, class_scope)?,
                Some("parameters") if node.grammar == "record_declaration" => {}
                _ => self.walk_opaque_identifiers(child, scope)?,
            }
        }
        Ok(())
    }

    /// Predeclare the members of a class body, then walk them
    fn walk_members(&mut self, body: &SyntaxNode, class_scope: ScopeId) -> Result<()> {
        self.predeclare_members(body, class_scope);

        for member in &body.children {
            match member.grammar {
                "field_declaration" | "constant_declaration" => {
                    for child in &member.children {
                        match child.grammar {
                            "variable_declarator" => {
                                if let Some(value) = child.child_by_field("value") {
                                    self.walk(value, class_scope)?;
                                }
                            }
                            "modifiers" => self.walk_opaque_identifiers(child, class_scope)?,
                            _ => {}
                        }
                    }
                }
                "enum_constant" => {
                    for child in &member.children {
                        if child.field != Some("name") {
                            self.walk(child, class_scope)?;
                        }
                    }
                }
                "enum_body_declarations" => self.walk_members(member, class_scope)?,
                _ => self.walk(member, class_scope)?,
            }
        }
        Ok(())
    }

    fn predeclare_members(&mut self, body: &SyntaxNode, class_scope: ScopeId) {
        for member in &body.children {
            match member.grammar {
                "field_declaration" | "constant_declaration" => {
                    let visible = has_modifier(member, &["public", "protected"]);
                    let interface_constant = member.grammar == "constant_declaration";
                    let declared_type = member.child_by_field("type").map(|t| self.text(t));
                    for declarator in member.children_by_field("declarator") {
                        let Some(name) = declarator.child_by_field("name") else {
                            continue;
                        };
                        let initializer = declarator
                            .child_by_field("value")
                            .map_or(Initializer::None, |v| self.initializer_shape(v, class_scope));
                        self.declare(
                            name,
                            declarator.span,
                            class_scope,
                            Namespace::Value,
                            SymbolKind::Field,
                            declared_type,
                            initializer,
                            !visible && !interface_constant,
                        );
                    }
                }
                "enum_constant" => {
                    if let Some(name) = member.child_by_field("name") {
                        self.declare(
                            name,
                            member.span,
                            class_scope,
                            Namespace::Value,
                            SymbolKind::Field,
                            None,
                            Initializer::None,
                            false,
                        );
                    }
                }
                "method_declaration" => {
                    let Some(name) = member.child_by_field("name") else {
                        continue;
                    };
                    let is_test = self.is_test_method(member);
                    let declared_type = member.child_by_field("type").map(|t| self.text(t));
                    let method_name = self.text(name);
                    let overloaded = self
                        .scopes
                        .lookup_local(class_scope, Namespace::Method, method_name);

                    let id = self.declare(
                        name,
                        member.span,
                        class_scope,
                        Namespace::Method,
                        SymbolKind::Method,
                        declared_type,
                        Initializer::None,
                        is_test,
                    );
                    self.symbols.get_mut(id).is_test = is_test;
                    self.members.insert(member.span.start, id);

                    if let Some(previous) = overloaded {
                        // Keep the first declaration bound so lookups stay stable
                        self.scopes
                            .bind(class_scope, Namespace::Method, method_name, previous);
                        self.symbols.get_mut(previous).renameable = false;
                        self.symbols.get_mut(id).renameable = false;
                    }
                }
                "enum_body_declarations" => self.predeclare_members(member, class_scope),
                _ => {}
            }
        }
    }

    fn is_test_method(&self, method: &SyntaxNode) -> bool {
        let Some(modifiers) = method.child_of_kind("modifiers") else {
            return false;
        };
        modifiers
            .children
            .iter()
            .filter(|c| matches!(c.grammar, "marker_annotation" | "annotation"))
            .filter_map(|a| a.child_by_field("name"))
            .any(|name| {
                let text = self.text(name);
                let simple = text.rsplit('.').next().unwrap_or(text);
                self.dialect.test_annotations.iter().any(|t| t == simple)
            })
    }

    fn walk_method(&mut self, node: &SyntaxNode, scope: ScopeId) -> Result<()> {
        let method_symbol = self.members.get(&node.span.start).copied();
        let method_scope = self.scopes.push(scope, ScopeKind::Method, node.span);
        self.owners.push(method_symbol);

        let result = self.walk_method_parts(node, scope, method_scope, method_symbol);
        self.owners.pop();
        result
    }

    fn walk_method_parts(
        &mut self,
        node: &SyntaxNode,
        scope: ScopeId,
        method_scope: ScopeId,
        method_symbol: Option<SymbolId>,
    ) -> Result<()> {
        for child in &node.children {
            match child.field {
                Some("name") => {
                    if method_symbol.is_none() {
                        self.symbols.add_external(self.text(child));
                    }
                }
                Some("parameters") => self.declare_parameters(child, method_scope, true)?,
                Some("body") => {
                    if child.grammar == "block" {
                        // The method scope is the body's scope
                        self.walk_children(child, method_scope)?;
                    } else {
                        self.walk(child, method_scope)?;
                    }
                }
                _ => self.walk_opaque_identifiers(child, scope)?,
            }
        }
        Ok(())
    }

    /// Declare formal parameters; only a named method's parameters carry a position
    fn declare_parameters(
        &mut self,
        parameters: &SyntaxNode,
        scope: ScopeId,
        indexed: bool,
    ) -> Result<()> {
        let mut index = 0;
        for param in parameters.named_children() {
            let (name, declared_type) = match param.grammar {
                "formal_parameter" => (
                    param.child_by_field("name"),
                    param.child_by_field("type").map(|t| self.text(t)),
                ),
                "spread_parameter" => (
                    param
                        .child_of_kind("variable_declarator")
                        .and_then(|d| d.child_by_field("name")),
                    param
                        .named_children()
                        .find(|c| c.grammar != "modifiers" && c.grammar != "variable_declarator")
                        .map(|t| self.text(t)),
                ),
                "identifier" => (Some(param), None),
                _ => (None, None),
            };
            let Some(name) = name else {
                continue;
            };
            if let Some(modifiers) = param.child_of_kind("modifiers") {
                self.walk_opaque_identifiers(modifiers, scope)?;
            }
            let id = self.declare(
                name,
                param.span,
                scope,
                Namespace::Value,
                SymbolKind::Parameter,
                declared_type,
                Initializer::None,
                true,
            );
            if indexed {
                self.symbols.get_mut(id).parameter_index = Some(index);
                index += 1;
            }
        }
        Ok(())
    }

    fn walk_lambda(&mut self, node: &SyntaxNode, scope: ScopeId) -> Result<()> {
        let lambda_scope = self.scopes.push(scope, ScopeKind::Method, node.span);
        if let Some(parameters) = node.child_by_field("parameters") {
            if parameters.grammar == "identifier" {
                self.declare(
                    parameters,
                    parameters.span,
                    lambda_scope,
                    Namespace::Value,
                    SymbolKind::Parameter,
                    None,
                    Initializer::None,
                    true,
                );
            } else {
                self.declare_parameters(parameters, lambda_scope, false)?;
            }
        }
        if let Some(body) = node.child_by_field("body") {
            if body.grammar == "block" {
                self.walk_children(body, lambda_scope)?;
            } else {
                self.walk(body, lambda_scope)?;
            }
        }
        Ok(())
    }

    fn walk_enhanced_for(&mut self, node: &SyntaxNode, scope: ScopeId) -> Result<()> {
        if let Some(value) = node.child_by_field("value") {
            self.walk(value, scope)?;
        }
        let loop_scope = self.scopes.push(scope, ScopeKind::Block, node.span);
        if let Some(name) = node.child_by_field("name") {
            let declared_type = node.child_by_field("type").map(|t| self.text(t));
            self.declare(
                name,
                name.span,
                loop_scope,
                Namespace::Value,
                SymbolKind::LocalVariable,
                declared_type,
                Initializer::Other,
                true,
            );
        }
        if let Some(body) = node.child_by_field("body") {
            self.walk(body, loop_scope)?;
        }
        Ok(())
    }

    fn walk_catch(&mut self, node: &SyntaxNode, scope: ScopeId) -> Result<()> {
        let catch_scope = self.scopes.push(scope, ScopeKind::Block, node.span);
        for child in &node.children {
            match child.grammar {
                "catch_formal_parameter" => {
                    let Some(name) = child.child_by_field("name") else {
                        continue;
                    };
                    let declared_type = child.child_of_kind("catch_type").map(|t| self.text(t));
                    self.declare(
                        name,
                        child.span,
                        catch_scope,
                        Namespace::Value,
                        SymbolKind::Parameter,
                        declared_type,
                        Initializer::None,
                        true,
                    );
                }
                "block" => self.walk_children(child, catch_scope)?,
                _ => self.walk(child, catch_scope)?,
            }
        }
        Ok(())
    }

    fn walk_resource(&mut self, node: &SyntaxNode, scope: ScopeId) -> Result<()> {
        let Some(name) = node.child_by_field("name") else {
            return self.walk_children(node, scope);
        };
        let initializer = match node.child_by_field("value") {
            Some(value) => {
                self.walk(value, scope)?;
                self.initializer_shape(value, scope)
            }
            None => Initializer::None,
        };
        let declared_type = node.child_by_field("type").map(|t| self.text(t));
        self.declare(
            name,
            node.span,
            scope,
            Namespace::Value,
            SymbolKind::LocalVariable,
            declared_type,
            initializer,
            true,
        );
        Ok(())
    }

    fn walk_local_declaration(&mut self, node: &SyntaxNode, scope: ScopeId) -> Result<()> {
        let declared_type = node.child_by_field("type").map(|t| self.text(t));
        for child in &node.children {
            if child.grammar == "modifiers" {
                self.walk_opaque_identifiers(child, scope)?;
            }
        }

        for declarator in node.children_by_field("declarator") {
            let Some(name) = declarator.child_by_field("name") else {
                continue;
            };
            let initializer = match declarator.child_by_field("value") {
                Some(value) => {
                    self.walk(value, scope)?;
                    self.initializer_shape(value, scope)
                }
                None => Initializer::None,
            };
            let declared_type = match declared_type {
                Some("var") => inferred_type(&initializer),
                other => other.map(str::to_string),
            };
            self.declare(
                name,
                declarator.span,
                scope,
                Namespace::Value,
                SymbolKind::LocalVariable,
                declared_type.as_deref(),
                initializer,
                true,
            );
        }
        Ok(())
    }

    fn walk_instanceof(&mut self, node: &SyntaxNode, scope: ScopeId) -> Result<()> {
        for child in &node.children {
            match child.field {
                Some("left") => self.walk(child, scope)?,
                Some("name") => {
                    let declared_type = node.child_by_field("right").map(|t| self.text(t));
                    self.declare(
                        child,
                        child.span,
                        scope,
                        Namespace::Value,
                        SymbolKind::LocalVariable,
                        declared_type,
                        Initializer::Other,
                        true,
                    );
                }
                Some("pattern") => self.walk(child, scope)?,
                _ => {}
            }
        }
        Ok(())
    }

    fn walk_invocation(&mut self, node: &SyntaxNode, scope: ScopeId) -> Result<()> {
        let name = node.child_by_field("name");
        let callee = name.map(|n| self.text(n)).unwrap_or_default();
        let object = node.child_by_field("object");

        let callee_symbol = match object {
            None => self.scopes.lookup(scope, Namespace::Method, callee),
            Some(obj) if obj.grammar == "this" => self.class_scope(scope).and_then(|class| {
                self.scopes.lookup(class, Namespace::Method, callee)
            }),
            Some(_) => None,
        };

        if let Some(obj) = object {
            if obj.grammar == "identifier" {
                self.reference(
                    obj,
                    scope,
                    UseContext::Receiver {
                        callee: callee.to_string(),
                    },
                );
            } else {
                self.walk(obj, scope)?;
            }
        }

        if let Some(name) = name {
            match (callee_symbol, object) {
                (Some(id), _) => self.use_symbol(id, name.span, scope, UseContext::Plain),
                (None, Some(_)) => self.symbols.add_qualified_member(callee),
                (None, None) => self.symbols.add_external(callee),
            }
        }

        let assertion = (node.kind == NodeKind::AssertionCall).then(|| {
            let args: Vec<&SyntaxNode> = node
                .child_by_field("arguments")
                .map(|a| a.named_children().collect())
                .unwrap_or_default();
            let equality = self.dialect.is_equality_assertion(callee);
            AssertionShape {
                method: callee.to_string(),
                equality,
                leading_message: equality
                    && args.len() >= 3
                    && matches!(args[0].grammar, "string_literal" | "text_block"),
            }
        });

        for child in &node.children {
            match child.field {
                Some("arguments") => {
                    self.walk_arguments(child, scope, callee, callee_symbol, assertion.clone())?
                }
                Some("object") | Some("name") => {}
                _ => self.walk_opaque_identifiers(child, scope)?,
            }
        }
        Ok(())
    }

    fn walk_construction(&mut self, node: &SyntaxNode, scope: ScopeId) -> Result<()> {
        let type_name = node
            .child_by_field("type")
            .map(|t| base_type_name(self.text(t)))
            .unwrap_or_default();
        let callee = format!("new {type_name}");

        for child in &node.children {
            match (child.field, child.grammar) {
                (Some("arguments"), _) => self.walk_arguments(child, scope, &callee, None, None)?,
                (_, "class_body") => self.walk(child, scope)?,
                (Some("type"), _) | (Some("type_arguments"), _) => {}
                _ => self.walk(child, scope)?,
            }
        }
        Ok(())
    }

    fn walk_arguments(
        &mut self,
        arguments: &SyntaxNode,
        scope: ScopeId,
        callee: &str,
        callee_symbol: Option<SymbolId>,
        assertion: Option<AssertionShape>,
    ) -> Result<()> {
        let arg_count = arguments.named_children().count();
        let mut position = 0;
        for arg in &arguments.children {
            if !arg.named || arg.kind == NodeKind::Comment {
                continue;
            }
            if arg.grammar == "identifier" {
                let context = UseContext::Argument(CallArgument {
                    callee: callee.to_string(),
                    callee_symbol,
                    position,
                    arg_count,
                    assertion: assertion.clone(),
                });
                self.reference(arg, scope, context);
            } else {
                self.walk(arg, scope)?;
            }
            position += 1;
        }
        Ok(())
    }

    fn walk_field_access(&mut self, node: &SyntaxNode, scope: ScopeId) -> Result<()> {
        let object = node.child_by_field("object");
        let field = node.child_by_field("field");

        match (object, field) {
            (Some(obj), Some(field)) if obj.grammar == "this" => {
                let name = self.text(field);
                let found = self
                    .class_scope(scope)
                    .and_then(|class| self.scopes.lookup_local(class, Namespace::Value, name));
                match found {
                    Some(id) => self.use_symbol(id, field.span, scope, UseContext::Plain),
                    None => self.symbols.add_external(name),
                }
                Ok(())
            }
            (Some(obj), field) => {
                self.walk(obj, scope)?;
                if let Some(field) = field {
                    if field.grammar == "identifier" {
                        self.symbols.add_qualified_member(self.text(field));
                    }
                }
                Ok(())
            }
            _ => self.walk_children(node, scope),
        }
    }

    fn walk_method_reference(&mut self, node: &SyntaxNode, scope: ScopeId) -> Result<()> {
        let mut named = node.named_children();
        if let Some(first) = named.next() {
            self.walk(first, scope)?;
        }
        for rest in named {
            if rest.grammar == "identifier" {
                self.symbols.add_qualified_member(self.text(rest));
            } else {
                self.walk(rest, scope)?;
            }
        }
        Ok(())
    }

    fn class_scope(&self, scope: ScopeId) -> Option<ScopeId> {
        self.scopes.enclosing(scope, ScopeKind::Class)
    }

    /// Resolve an identifier in the value namespace
    fn reference(&mut self, node: &SyntaxNode, scope: ScopeId, context: UseContext) {
        let name = self.text(node);
        match self.scopes.lookup(scope, Namespace::Value, name) {
            Some(id) => self.use_symbol(id, node.span, scope, context),
            None => self.symbols.add_external(name),
        }
    }

    fn use_symbol(&mut self, id: SymbolId, span: Span, scope: ScopeId, context: UseContext) {
        self.symbols.add_use(
            id,
            UseSite {
                span,
                scope,
                context,
            },
        );
    }

    #[allow(clippy::too_many_arguments)]
    fn declare(
        &mut self,
        name: &SyntaxNode,
        node_span: Span,
        scope: ScopeId,
        namespace: Namespace,
        kind: SymbolKind,
        declared_type: Option<&str>,
        initializer: Initializer,
        renameable: bool,
    ) -> SymbolId {
        let owner = match kind {
            SymbolKind::Field | SymbolKind::Method => None,
            SymbolKind::LocalVariable | SymbolKind::Parameter => self.owner(),
        };
        let id = self.symbols.insert(Symbol {
            id: SymbolId(0),
            original_name: self.text(name).to_string(),
            kind,
            declared_type: declared_type.map(str::to_string),
            declaring_scope: scope,
            decl_span: name.span,
            node_span,
            initializer,
            parameter_index: None,
            owner,
            use_sites: Vec::new(),
            renameable,
            is_test: false,
        });
        self.scopes.bind(scope, namespace, self.text(name), id);
        id
    }

    /// Classify the expression a variable is initialized from
    fn initializer_shape(&self, value: &SyntaxNode, scope: ScopeId) -> Initializer {
        let value = value.unwrap_expression();
        match value.grammar {
            "method_invocation" => {
                let callee = value
                    .child_by_field("name")
                    .map(|n| self.text(n).to_string())
                    .unwrap_or_default();
                let object = value.child_by_field("object");
                let receiver = object.map(|o| self.text(o).to_string());
                let receiver_symbol = object
                    .filter(|o| o.grammar == "identifier")
                    .and_then(|o| self.scopes.lookup(scope, Namespace::Value, self.text(o)));
                let callee_symbol = match object {
                    None => self.scopes.lookup(scope, Namespace::Method, &callee),
                    Some(o) if o.grammar == "this" => self
                        .class_scope(scope)
                        .and_then(|class| self.scopes.lookup(class, Namespace::Method, &callee)),
                    Some(_) => None,
                };
                Initializer::Call {
                    callee,
                    receiver,
                    receiver_symbol,
                    callee_symbol,
                }
            }
            "object_creation_expression" => Initializer::Construction {
                type_name: value
                    .child_by_field("type")
                    .map(|t| base_type_name(self.text(t)))
                    .unwrap_or_default(),
            },
            "unary_expression" => match value.child_by_field("operand") {
                Some(operand) => match literal_category(operand.unwrap_expression()) {
                    Some(category) => Initializer::Literal { category },
                    None => Initializer::Other,
                },
                None => Initializer::Other,
            },
            _ => match literal_category(value) {
                Some(category) => Initializer::Literal { category },
                None => Initializer::Other,
            },
        }
    }
}

/// Category of a literal node
pub fn literal_category(node: &SyntaxNode) -> Option<LiteralCategory> {
    let category = match node.grammar {
        "decimal_integer_literal" | "hex_integer_literal" | "octal_integer_literal"
        | "binary_integer_literal" => LiteralCategory::Integer,
        "decimal_floating_point_literal" | "hex_floating_point_literal" => LiteralCategory::Float,
        "string_literal" | "text_block" => LiteralCategory::String,
        "character_literal" => LiteralCategory::Char,
        "true" | "false" => LiteralCategory::Boolean,
        "null_literal" => LiteralCategory::Null,
        _ => return None,
    };
    Some(category)
}

/// Strip type arguments, array brackets and package qualifiers
pub fn base_type_name(type_text: &str) -> String {
    let base = type_text.split('<').next().unwrap_or(type_text);
    let base = base.trim_end_matches("[]").trim();
    base.rsplit('.').next().unwrap_or(base).trim().to_string()
}

fn inferred_type(initializer: &Initializer) -> Option<String> {
    match initializer {
        Initializer::Literal { category } => category.java_type().map(str::to_string),
        Initializer::Construction { type_name } => Some(type_name.clone()),
        _ => None,
    }
}

fn has_modifier(declaration: &SyntaxNode, wanted: &[&str]) -> bool {
    declaration
        .child_of_kind("modifiers")
        .is_some_and(|m| m.children.iter().any(|c| wanted.contains(&c.grammar)))
}
