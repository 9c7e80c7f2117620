//! Evidence collection for symbols with uninformative names.

use std::collections::HashMap;

use tracing::debug;

use crate::core::config::ClarifyConfig;
use crate::lang::{SourceFile, Span, SyntaxNode};
use crate::resolve::{Initializer, Resolution, Symbol, SymbolId, SymbolKind, SymbolTable, UseContext};

use super::config::{split_words, NamingVocabulary};
use super::evidence::{rank_evidence, EvidenceKind, EvidenceStrength, NamingEvidence, SymbolEvidence};
use super::generator::{MethodProfiler, NameGenerator};

/// Decides which symbols get new names and what the candidates are.
///
/// A pure function of the source, its resolution and the configuration:
/// the same input always yields the same ranked evidence.
pub struct NamingOracle {
    vocabulary: NamingVocabulary,
    generator: NameGenerator,
    profiler: MethodProfiler,
}

impl NamingOracle {
    pub fn new(config: &ClarifyConfig) -> Self {
        Self {
            vocabulary: config.vocabulary.clone(),
            generator: NameGenerator::new(&config.vocabulary),
            profiler: MethodProfiler::new(),
        }
    }

    /// Renameable symbol whose current name says nothing
    pub fn is_candidate(&self, symbol: &Symbol) -> bool {
        symbol.renameable
            && (symbol.kind != SymbolKind::Method || symbol.is_test)
            && self.vocabulary.is_uninformative(&symbol.original_name)
    }

    /// Ranked evidence for every candidate, in declaration order
    pub fn collect(&self, source: &SourceFile, resolution: &Resolution) -> Vec<SymbolEvidence> {
        let symbols = &resolution.symbols;
        let numbering = FallbackNumbering::new(symbols);

        let mut collected = Vec::new();
        for symbol in symbols.iter().filter(|s| self.is_candidate(s)) {
            let mut items = match symbol.kind {
                SymbolKind::Method => self.method_evidence(source, symbol),
                _ => self.value_evidence(symbols, symbol, &numbering),
            };
            rank_evidence(&mut items);
            if items.is_empty() {
                debug!("No naming evidence for '{}'", symbol.original_name);
                continue;
            }
            collected.push(SymbolEvidence {
                symbol: symbol.id,
                items,
            });
        }

        debug!(
            "Collected naming evidence for {} of {} symbols in {}",
            collected.len(),
            symbols.len(),
            source.path().display()
        );
        collected
    }

    fn value_evidence(
        &self,
        symbols: &SymbolTable,
        symbol: &Symbol,
        numbering: &FallbackNumbering,
    ) -> Vec<NamingEvidence> {
        let mut items = Vec::new();
        let declared_at = symbol.decl_span.start;
        let mut push = |kind, strength, text: String, words: Vec<String>, position| {
            items.push(NamingEvidence {
                symbol: symbol.id,
                kind,
                strength,
                text,
                words,
                position,
            });
        };

        if !symbol.initializer.is_call() {
            for (role, position) in assertion_roles(symbol).unwrap_or_default() {
                push(
                    EvidenceKind::AssertionRole,
                    EvidenceStrength::Direct,
                    format!("{role} argument of an equality assertion"),
                    vec![role.to_string()],
                    position,
                );
            }
        }

        match &symbol.initializer {
            Initializer::Call {
                callee,
                receiver,
                receiver_symbol,
                ..
            } => {
                let receiver_type = receiver_symbol
                    .map(|id| symbols.get(id))
                    .and_then(|r| r.declared_type.as_deref());
                let text = match receiver {
                    Some(receiver) => format!("{receiver}.{callee}()"),
                    None => format!("{callee}()"),
                };
                push(
                    EvidenceKind::CalleeReturn,
                    EvidenceStrength::Direct,
                    text,
                    self.generator.callee_return_words(callee, receiver_type),
                    declared_at,
                );
            }
            Initializer::Literal { .. } => {
                for site in &symbol.use_sites {
                    let UseContext::Argument(arg) = &site.context else {
                        continue;
                    };
                    if arg.assertion.is_some() {
                        continue;
                    }
                    let Some(method) = arg.callee_symbol else {
                        continue;
                    };
                    if let Some(words) = self.parameter_hint(symbols, method, arg.position, numbering) {
                        push(
                            EvidenceKind::LiteralAssignment,
                            EvidenceStrength::Direct,
                            format!("argument {} of {}()", arg.position + 1, arg.callee),
                            words,
                            site.span.start,
                        );
                    }
                }
                if let Some(n) = numbering.literal.get(&symbol.id) {
                    push(
                        EvidenceKind::LiteralAssignment,
                        EvidenceStrength::Fallback,
                        "literal initializer".to_string(),
                        vec!["input".to_string(), n.to_string()],
                        declared_at,
                    );
                }
            }
            _ => {}
        }

        if let Some(declared) = symbol.declared_type.as_deref() {
            if let Some(words) = self.generator.type_words(declared) {
                push(
                    EvidenceKind::TypeOnly,
                    EvidenceStrength::Direct,
                    format!("declared type {declared}"),
                    words,
                    declared_at,
                );
            }
        }

        let fallback = match (symbol.kind, symbol.parameter_index) {
            (SymbolKind::Parameter, Some(index)) => {
                Some(vec!["input".to_string(), (index + 1).to_string()])
            }
            (SymbolKind::Parameter, None) => Some(vec!["item".to_string()]),
            (SymbolKind::Field | SymbolKind::LocalVariable, _) => numbering
                .value
                .get(&symbol.id)
                .map(|n| vec!["value".to_string(), n.to_string()]),
            (SymbolKind::Method, _) => None,
        };
        if let Some(words) = fallback {
            push(
                EvidenceKind::TypeOnly,
                EvidenceStrength::Fallback,
                "position".to_string(),
                words,
                declared_at,
            );
        }
        items
    }

    /// Descriptive name of the parameter a literal is passed to, if the
    /// callee is declared in this file. Parameters that are themselves about
    /// to be renamed contribute their strongest direct evidence instead.
    fn parameter_hint(
        &self,
        symbols: &SymbolTable,
        method: SymbolId,
        position: usize,
        numbering: &FallbackNumbering,
    ) -> Option<Vec<String>> {
        let params = symbols.parameters_of(method);
        let param = params.get(position)?;

        let words = if self.is_candidate(param) {
            let mut items = self.value_evidence(symbols, param, numbering);
            rank_evidence(&mut items);
            items
                .into_iter()
                .find(|e| e.strength == EvidenceStrength::Direct)?
                .words
        } else {
            split_words(&param.original_name)
        };

        let words: Vec<String> = words
            .into_iter()
            .filter(|w| !w.chars().all(|c| c.is_ascii_digit()))
            .collect();
        (!words.is_empty()).then_some(words)
    }

    fn method_evidence(&self, source: &SourceFile, symbol: &Symbol) -> Vec<NamingEvidence> {
        let Some(method) = source.root().find(symbol.node_span, "method_declaration") else {
            return Vec::new();
        };
        let profile = self.profiler.profile(source, method);
        let class_name = enclosing_class_name(source, source.root(), symbol.node_span);

        self.generator
            .test_method_themes(&profile, class_name)
            .into_iter()
            .map(|theme| NamingEvidence {
                symbol: symbol.id,
                kind: theme.kind,
                strength: theme.strength,
                text: theme.text,
                words: theme.words,
                position: symbol.decl_span.start,
            })
            .collect()
    }
}

/// `expected`/`actual` roles when every use is a direct argument of an
/// equality assertion
fn assertion_roles(symbol: &Symbol) -> Option<Vec<(&'static str, usize)>> {
    if symbol.use_sites.is_empty() {
        return None;
    }
    symbol
        .use_sites
        .iter()
        .map(|site| {
            let UseContext::Argument(arg) = &site.context else {
                return None;
            };
            if !arg.assertion.as_ref().is_some_and(|a| a.equality) {
                return None;
            }
            match arg.effective_position() {
                0 => Some(("expected", site.span.start)),
                1 => Some(("actual", site.span.start)),
                _ => None,
            }
        })
        .collect()
}

/// Name of the innermost class-like declaration containing `span`
fn enclosing_class_name<'a>(
    source: &'a SourceFile,
    node: &SyntaxNode,
    span: Span,
) -> Option<&'a str> {
    let inner = node
        .children
        .iter()
        .find(|c| c.span.contains(span))
        .and_then(|c| enclosing_class_name(source, c, span));
    inner.or_else(|| match node.grammar {
        "class_declaration" | "enum_declaration" | "record_declaration" | "interface_declaration" => {
            node.child_by_field("name").map(|n| source.node_text(n))
        }
        _ => None,
    })
}

/// Positional numbers for fallback names, fixed by declaration order so they
/// do not depend on which names happen to be uninformative.
struct FallbackNumbering {
    /// `input<n>`: numbered after the owning method's parameters
    literal: HashMap<SymbolId, usize>,
    /// `value<n>`: per owning method for locals, per class for fields
    value: HashMap<SymbolId, usize>,
}

impl FallbackNumbering {
    fn new(symbols: &SymbolTable) -> Self {
        let mut param_counts: HashMap<Option<SymbolId>, usize> = HashMap::new();
        for symbol in symbols.iter() {
            if symbol.kind == SymbolKind::Parameter && symbol.parameter_index.is_some() {
                *param_counts.entry(symbol.owner).or_default() += 1;
            }
        }

        let mut literal = HashMap::new();
        let mut value = HashMap::new();
        let mut literal_seen: HashMap<Option<SymbolId>, usize> = HashMap::new();
        let mut locals_seen: HashMap<Option<SymbolId>, usize> = HashMap::new();
        let mut fields_seen: HashMap<usize, usize> = HashMap::new();

        for symbol in symbols.iter() {
            match symbol.kind {
                SymbolKind::LocalVariable => {
                    if matches!(symbol.initializer, Initializer::Literal { .. }) {
                        let seen = literal_seen.entry(symbol.owner).or_default();
                        *seen += 1;
                        let params = param_counts.get(&symbol.owner).copied().unwrap_or(0);
                        literal.insert(symbol.id, params + *seen);
                    }
                    let seen = locals_seen.entry(symbol.owner).or_default();
                    *seen += 1;
                    value.insert(symbol.id, *seen);
                }
                SymbolKind::Field => {
                    let seen = fields_seen.entry(symbol.declaring_scope.0).or_default();
                    *seen += 1;
                    value.insert(symbol.id, *seen);
                }
                SymbolKind::Parameter | SymbolKind::Method => {}
            }
        }
        Self { literal, value }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::sync::Arc;

    use super::*;
    use crate::lang::JavaAdapter;

    fn evidence_for(source: &str) -> (Resolution, Vec<SymbolEvidence>) {
        let config = ClarifyConfig::default();
        let file = JavaAdapter::new(config.dialect.clone())
            .unwrap()
            .parse_source(Arc::from(source), Path::new("T.java"))
            .unwrap();
        let resolution = Resolution::build(&file, &config.dialect).unwrap();
        let evidence = NamingOracle::new(&config).collect(&file, &resolution);
        (resolution, evidence)
    }

    fn winner(resolution: &Resolution, evidence: &[SymbolEvidence], name: &str) -> Option<String> {
        let symbol = resolution
            .symbols
            .iter()
            .find(|s| s.original_name == name)?;
        evidence
            .iter()
            .find(|e| e.symbol == symbol.id)
            .and_then(|e| e.at_depth(0))
            .map(|e| e.words.join(" "))
    }

    #[test]
    fn callee_return_beats_type_and_assertion_does_not_apply_to_calls() {
        let (resolution, evidence) = evidence_for(
            r#"public class Calculator_ESTest {
    @Test(timeout = 4000)
    public void test0() throws Throwable {
        Calculator calc = new Calculator();
        int result = calc.add(2, 3);
        assertEquals(5, result);
    }
}
"#,
        );
        assert_eq!(winner(&resolution, &evidence, "result").as_deref(), Some("sum"));
        assert_eq!(winner(&resolution, &evidence, "calc").as_deref(), Some("calculator"));
        assert_eq!(
            winner(&resolution, &evidence, "test0").as_deref(),
            Some("test addition of two numbers")
        );
    }

    #[test]
    fn literal_locals_used_only_in_assertions_take_their_role() {
        let (resolution, evidence) = evidence_for(
            "class A {\n  @Test void t() {\n    int a = 5;\n    int b = 5;\n    assertEquals(a, b);\n  }\n}\n",
        );
        assert_eq!(winner(&resolution, &evidence, "a").as_deref(), Some("expected"));
        assert_eq!(winner(&resolution, &evidence, "b").as_deref(), Some("actual"));
    }

    #[test]
    fn literals_passed_to_local_methods_borrow_descriptive_parameter_names() {
        let (resolution, evidence) = evidence_for(
            r#"class Shop {
    double calculateDiscount(int price, int age) { return price * 0.1; }

    @Test
    void t1() {
        int a1 = 70;
        int b1 = 20;
        double d = calculateDiscount(a1, b1);
    }
}
"#,
        );
        assert_eq!(winner(&resolution, &evidence, "a1").as_deref(), Some("price"));
        assert_eq!(winner(&resolution, &evidence, "b1").as_deref(), Some("age"));
        assert_eq!(winner(&resolution, &evidence, "d").as_deref(), Some("discount"));
    }

    #[test]
    fn uninformative_parameters_give_positional_fallbacks() {
        let (resolution, evidence) = evidence_for(
            r#"public class X9yZ {
    public double f1(int a) {
        if (a >= 65) {
            return 0.2;
        }
        return 0.0;
    }

    @Test
    public void t1() {
        int a1 = 70;
        double b1 = f1(a1);
        assertEquals(0.2, b1);
    }
}
"#,
        );
        assert_eq!(winner(&resolution, &evidence, "a").as_deref(), Some("input 1"));
        assert_eq!(winner(&resolution, &evidence, "a1").as_deref(), Some("input 1"));
        assert_eq!(winner(&resolution, &evidence, "b1").as_deref(), Some("f 1 result"));
        // `f1` is not a test method and is never renamed
        assert_eq!(winner(&resolution, &evidence, "f1"), None);
    }

    #[test]
    fn descriptive_names_produce_no_evidence() {
        let (_, evidence) = evidence_for(
            "class A {\n  void m() {\n    int price = 3;\n    String label = \"x\";\n  }\n}\n",
        );
        assert!(evidence.is_empty());
    }

    #[test]
    fn fallback_numbers_ignore_which_names_are_candidates() {
        let (resolution, evidence) = evidence_for(
            "class A {\n  void m(int count) {\n    int price = 3;\n    int v = 4;\n  }\n}\n",
        );
        // `price` is kept but still occupies the first literal slot after the parameter
        assert_eq!(winner(&resolution, &evidence, "v").as_deref(), Some("input 3"));
    }
}
