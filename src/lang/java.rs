//! Java language adapter with tree-sitter integration.

use std::path::Path;
use std::sync::Arc;

use tree_sitter::{Language, Node, Parser, TreeCursor};

use super::common::{line_col, NodeKind, SourceFile, Span, SyntaxNode, SyntaxTree};
use super::LanguageAdapter;
use crate::core::config::DialectConfig;
use crate::core::errors::{ClarifyError, Result};

/// Java-specific parsing
pub struct JavaAdapter {
    /// Tree-sitter parser for Java
    parser: Parser,

    /// Test-dialect conventions used to tag assertion calls
    dialect: DialectConfig,
}

impl JavaAdapter {
    /// Create a new Java adapter
    pub fn new(dialect: DialectConfig) -> Result<Self> {
        let language: Language = tree_sitter_java::LANGUAGE.into();
        let mut parser = Parser::new();
        parser.set_language(&language).map_err(|e| {
            ClarifyError::internal(format!("Failed to set Java language: {:?}", e))
        })?;

        Ok(Self { parser, dialect })
    }

    /// Parse Java source into a full-fidelity syntax tree
    pub fn parse_source(&mut self, text: Arc<str>, path: &Path) -> Result<SourceFile> {
        let tree = self
            .parser
            .parse(text.as_bytes(), None)
            .ok_or_else(|| ClarifyError::parse("java", "Parser produced no tree", 0))?;

        let root = tree.root_node();
        if let Some(anomaly) = first_anomaly(root) {
            let offset = anomaly.start_byte();
            let (line, column) = line_col(&text, offset);
            let message = if anomaly.is_missing() {
                format!("missing '{}'", anomaly.kind())
            } else {
                "unexpected syntax".to_string()
            };
            return Err(ClarifyError::parse_with_location("java", message, offset, line, column)
                .with_file(path.display().to_string()));
        }

        let mut last_end = 0;
        let mut cursor = root.walk();
        let root = self
            .build_node(&mut cursor, &text, &mut last_end)
            .map_err(|e| e.with_file(path.display().to_string()))?;
        let trailing = Span::new(last_end, text.len());
        check_trivia(&text, trailing).map_err(|e| e.with_file(path.display().to_string()))?;

        Ok(SourceFile::new(path, text, SyntaxTree { root, trailing }))
    }

    /// Convert the node under the cursor (and its subtree) into a [`SyntaxNode`]
    fn build_node(
        &self,
        cursor: &mut TreeCursor,
        text: &str,
        last_end: &mut usize,
    ) -> Result<SyntaxNode> {
        let node = cursor.node();
        let field = cursor.field_name();
        let span = Span::new(node.start_byte(), node.end_byte());

        let mut children = Vec::new();
        if cursor.goto_first_child() {
            loop {
                children.push(self.build_node(cursor, text, last_end)?);
                if !cursor.goto_next_sibling() {
                    break;
                }
            }
            cursor.goto_parent();
        }

        let leading = if children.is_empty() {
            let gap = Span::new((*last_end).min(span.start), span.start);
            check_trivia(text, gap)?;
            *last_end = (*last_end).max(span.end);
            gap
        } else {
            Span::new(span.start, span.start)
        };

        Ok(SyntaxNode {
            kind: self.classify(node, text)?,
            grammar: node.kind(),
            field,
            named: node.is_named(),
            span,
            leading,
            children,
        })
    }

    /// Map a grammar node onto its structural role
    fn classify(&self, node: Node, text: &str) -> Result<NodeKind> {
        let kind = match node.kind() {
            "class_declaration" | "interface_declaration" | "enum_declaration"
            | "record_declaration" => NodeKind::Class,
            "method_declaration" | "constructor_declaration" | "lambda_expression" => {
                NodeKind::Method
            }
            "block" | "constructor_body" | "switch_block" => NodeKind::Block,
            "local_variable_declaration" | "field_declaration" | "formal_parameter"
            | "catch_formal_parameter" | "spread_parameter" | "resource" => {
                NodeKind::Declaration
            }
            "method_invocation" => {
                let name = match node.child_by_field_name("name") {
                    Some(name) => name.utf8_text(text.as_bytes())?,
                    None => "",
                };
                let receiver = match node.child_by_field_name("object") {
                    Some(object) => Some(object.utf8_text(text.as_bytes())?),
                    None => None,
                };
                if self.dialect.is_assertion(receiver, name) {
                    NodeKind::AssertionCall
                } else {
                    NodeKind::CallExpression
                }
            }
            "object_creation_expression" | "explicit_constructor_invocation" => {
                NodeKind::CallExpression
            }
            "decimal_integer_literal" | "hex_integer_literal" | "octal_integer_literal"
            | "binary_integer_literal" | "decimal_floating_point_literal"
            | "hex_floating_point_literal" | "string_literal" | "character_literal"
            | "text_block" | "true" | "false" | "null_literal" => NodeKind::Literal,
            "identifier" => NodeKind::Identifier,
            "line_comment" | "block_comment" => NodeKind::Comment,
            _ => NodeKind::Other,
        };
        Ok(kind)
    }
}

impl LanguageAdapter for JavaAdapter {
    fn language(&self) -> &'static str {
        "java"
    }

    fn parse_source(&mut self, text: Arc<str>, path: &Path) -> Result<SourceFile> {
        JavaAdapter::parse_source(self, text, path)
    }

    fn extract_identifiers(&mut self, text: &str) -> Result<Vec<String>> {
        let source = JavaAdapter::parse_source(self, Arc::from(text), Path::new("<memory>"))?;
        let mut identifiers = Vec::new();
        source.root().walk(&mut |node| {
            if node.kind == NodeKind::Identifier || node.grammar == "type_identifier" {
                identifiers.push(source.node_text(node).to_string());
            }
        });
        Ok(identifiers)
    }
}

/// First error or missing node in pre-order
fn first_anomaly(node: Node) -> Option<Node> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    let children: Vec<Node> = node.children(&mut cursor).collect();
    children.into_iter().find_map(first_anomaly)
}

/// Text between leaves must be whitespace; anything else was dropped by the parser
fn check_trivia(text: &str, gap: Span) -> Result<()> {
    let slice = &text[gap.start..gap.end];
    if let Some((index, _)) = slice.char_indices().find(|(_, c)| !c.is_whitespace()) {
        let offset = gap.start + index;
        let (line, column) = line_col(text, offset);
        return Err(ClarifyError::parse_with_location(
            "java",
            "source text not covered by the syntax tree",
            offset,
            line,
            column,
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adapter() -> JavaAdapter {
        JavaAdapter::new(DialectConfig::default()).unwrap()
    }

    fn parse(source: &str) -> SourceFile {
        adapter()
            .parse_source(Arc::from(source), Path::new("Test.java"))
            .unwrap()
    }

    const CALC_TEST: &str = r#"import org.junit.Test;
import static org.junit.Assert.*;

public class Calculator_ESTest {

    // addition
    @Test(timeout = 4000)
    public void test0() throws Throwable {
        Calculator calc = new Calculator();
        int result = calc.add(2, 3);

        assertEquals(5, result);
    }
}
"#;

    #[test]
    fn test_java_adapter_creation() {
        let adapter = JavaAdapter::new(DialectConfig::default());
        assert!(adapter.is_ok(), "Should create Java adapter successfully");
    }

    #[test]
    fn test_render_reproduces_source() {
        let source = parse(CALC_TEST);
        assert_eq!(source.tree().render(source.text()), CALC_TEST);
    }

    #[test]
    fn test_classifies_structural_nodes() {
        let source = parse(CALC_TEST);
        let mut kinds = Vec::new();
        source.root().walk(&mut |node| kinds.push(node.kind));

        assert!(kinds.contains(&NodeKind::Class));
        assert!(kinds.contains(&NodeKind::Method));
        assert!(kinds.contains(&NodeKind::Block));
        assert!(kinds.contains(&NodeKind::Declaration));
        assert!(kinds.contains(&NodeKind::CallExpression));
        assert!(kinds.contains(&NodeKind::AssertionCall));
        assert!(kinds.contains(&NodeKind::Literal));
        assert!(kinds.contains(&NodeKind::Comment));
    }

    #[test]
    fn test_malformed_input_reports_offset() {
        let broken = "public class A {\n  void t() { int x = ; }\n}\n";
        let err = adapter()
            .parse_source(Arc::from(broken), Path::new("A.java"))
            .unwrap_err();
        match err {
            ClarifyError::Parse {
                offset,
                line,
                file_path,
                ..
            } => {
                assert!(offset > 0 && offset < broken.len());
                assert_eq!(line, Some(2));
                assert_eq!(file_path.as_deref(), Some("A.java"));
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_extract_identifiers_in_order() {
        let ids = adapter()
            .extract_identifiers("class A { void t() { int a = 1; foo(a); } }")
            .unwrap();
        assert_eq!(ids, vec!["A", "t", "a", "foo", "a"]);
    }
}
