//! End-to-end tests of the renaming pipeline on generated test suites.

use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use proptest::prelude::*;

use clarify_rs::core::config::JAVA_RESERVED_WORDS;
use clarify_rs::core::pipeline::{FileRewrite, VerificationStatus};
use clarify_rs::lang::JavaAdapter;
use clarify_rs::resolve::{Resolution, SymbolKind};
use clarify_rs::{ClarifyConfig, ClarifyEngine};

fn fixture(name: &str) -> (PathBuf, String) {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures/java")
        .join(name);
    let text = std::fs::read_to_string(&path).unwrap();
    (path, text)
}

fn engine() -> ClarifyEngine {
    ClarifyEngine::new(ClarifyConfig::default()).unwrap()
}

fn rewrite(name: &str) -> FileRewrite {
    let (path, text) = fixture(name);
    engine().rewrite_source(&path, &text).unwrap()
}

fn parses(text: &str) -> bool {
    let mut adapter = JavaAdapter::new(ClarifyConfig::default().dialect).unwrap();
    adapter
        .parse_source(Arc::from(text), Path::new("Out.java"))
        .is_ok()
}

#[test]
fn calculator_suite_gets_descriptive_names() {
    let result = rewrite("Calculator_ESTest.java");
    let out = &result.output;

    assert!(out.contains("public void testAdditionOfTwoNumbers() throws Throwable {"));
    assert!(out.contains("public void testMultiplicationByZero() throws Throwable {"));
    assert!(out.contains("public void testSubtractionOfTwoNumbers() throws Throwable {"));
    assert!(out.contains("int sum = calculator.add(2, 3);"));
    assert!(out.contains("int product = calculator.multiply(4, 0);"));
    assert!(out.contains("int difference = calculator.subtract(10, 7);"));
    assert!(!out.contains("Calculator calc ="));

    // Types, callees and comments are untouched.
    assert!(out.contains("public class Calculator_ESTest {"));
    assert!(out.contains("// Expected exception"));
    assert!(out.contains("fail(\"Expected ArithmeticException to be thrown\");"));
    assert_eq!(out.lines().count(), fixture("Calculator_ESTest.java").1.lines().count());

    assert_eq!(result.status, VerificationStatus::Structural);
    assert!(parses(out));
}

#[test]
fn test_method_names_stay_unique_within_a_class() {
    for name in ["Calculator_ESTest.java", "BankAccount_RandoopTest.java", "X9yZ.java"] {
        let result = rewrite(name);
        let methods: Vec<&str> = result
            .plan
            .entries()
            .filter(|e| e.kind == SymbolKind::Method)
            .map(|e| e.final_name.as_str())
            .collect();
        let unique: HashSet<&str> = methods.iter().copied().collect();
        assert_eq!(unique.len(), methods.len(), "{name}: {methods:?}");
        assert!(parses(&result.output), "{name} no longer parses");
    }
}

#[test]
fn bank_suite_drops_numbered_abbreviations() {
    let result = rewrite("BankAccount_RandoopTest.java");
    for gone in ["acc0", "acc1", "acc2", "bal0", "bal1", "void test1()", "void test2()"] {
        assert!(!result.output.contains(gone), "{gone} survived");
    }
    assert!(result.output.contains("new BankAccount(50.0);"));
    assert!(result.output.contains(".deposit(25.0);"));
    assert!(result.output.contains("// Invalid withdrawal: should throw IllegalStateException"));
}

#[test]
fn helper_methods_are_never_renamed() {
    let result = rewrite("X9yZ.java");
    assert!(result.output.contains("public double f1("));
    assert!(result.output.contains("public class X9yZ {"));
    assert!(result.plan.entries().all(|e| e.original_name != "f1"));
    assert!(!result.output.contains("void t1()"));
    assert!(result.output.contains("public void testX9yZ()"));
    assert!(!result.output.contains("X9YZ"));
}

#[test]
fn descriptive_sources_are_byte_identical() {
    let (path, text) = fixture("Totals.java");
    let result = engine().rewrite_source(&path, &text).unwrap();
    assert!(result.plan.is_empty());
    assert_eq!(result.output, text);
}

#[test]
fn rewriting_twice_is_a_no_op() {
    for name in [
        "Calculator_ESTest.java",
        "BankAccount_RandoopTest.java",
        "X9yZ.java",
        "Totals.java",
    ] {
        let first = rewrite(name);
        let second = engine()
            .rewrite_source(Path::new(name), &first.output)
            .unwrap();
        assert!(second.plan.is_empty(), "{name}: {:?}", second.plan);
        assert_eq!(second.output, first.output);
    }
}

#[test]
fn runs_are_deterministic() {
    for name in ["Calculator_ESTest.java", "BankAccount_RandoopTest.java", "X9yZ.java"] {
        let first = rewrite(name);
        let second = rewrite(name);
        assert_eq!(first.output, second.output);
        assert_eq!(first.plan, second.plan);
    }
}

#[test]
fn snake_case_style_is_honoured() {
    let (path, text) = fixture("Calculator_ESTest.java");
    let config = ClarifyConfig::default()
        .with_naming_style(clarify_rs::core::config::NamingStyle::SnakeCase);
    let result = ClarifyEngine::new(config)
        .unwrap()
        .rewrite_source(&path, &text)
        .unwrap();
    assert!(result.output.contains("public void test_addition_of_two_numbers()"));
    assert!(result.output.contains("int sum = calculator.add(2, 3);"));
}

#[test]
fn every_identifier_belongs_to_at_most_one_symbol() {
    let config = ClarifyConfig::default();
    let mut adapter = JavaAdapter::new(config.dialect.clone()).unwrap();
    for name in ["Calculator_ESTest.java", "BankAccount_RandoopTest.java", "X9yZ.java"] {
        let (path, text) = fixture(name);
        let source = adapter.parse_source(Arc::from(text.as_str()), &path).unwrap();
        let resolution = Resolution::build(&source, &config.dialect).unwrap();

        let mut seen = BTreeSet::new();
        for symbol in resolution.symbols.iter() {
            for span in symbol.occurrence_spans() {
                assert!(seen.insert(span.start), "{name}: offset {} claimed twice", span.start);
                assert_eq!(&text[span.start..span.end], symbol.original_name);
            }
        }
    }
}

#[test]
fn members_reached_through_a_qualifier_keep_their_names() {
    let source = r#"import org.junit.Test;
import static org.junit.Assert.*;

public class NodeTest {
    static class Node {
        int v;
    }

    @Test
    public void test0() {
        Node node = new Node();
        node.v = 3;
        assertEquals(3, node.v);
    }

    @Test
    public void test1() {
        Runnable r = this::test0;
        r.run();
    }
}
"#;
    let result = engine()
        .rewrite_source(Path::new("NodeTest.java"), source)
        .unwrap();

    assert!(result.plan.entries().all(|e| e.original_name != "v"));
    assert!(result.plan.entries().all(|e| e.original_name != "test0"));
    assert!(result.output.contains("        int v;"));
    assert!(result.output.contains("node.v = 3;"));
    assert!(result.output.contains("assertEquals(3, node.v);"));
    assert!(result.output.contains("this::test0;"));
    assert!(result.output.contains("public void test0()"));
    assert!(parses(&result.output));
}

const UNINFORMATIVE: &[&str] = &["a", "b", "x", "tmp", "res", "v1", "val", "obj2"];

fn generated_test(first: &str, second: &str) -> String {
    format!(
        r#"import org.junit.Test;
import static org.junit.Assert.*;

public class GeneratedTest {{
    @Test
    public void test0() {{
        Calculator calc = new Calculator();
        int {first} = calc.add(1, 2);
        int {second} = calc.multiply({first}, 3);
        assertEquals(9, {second});
    }}
}}
"#
    )
}

fn generated_members(field: &str, param: &str, local: &str) -> String {
    format!(
        r#"import org.junit.Test;
import static org.junit.Assert.*;

public class GeneratedMembersTest {{
    private Calculator {field} = new Calculator();

    private int twice(int {param}) {{
        return {param} * 2;
    }}

    @Test
    public void test0() {{
        int {local} = {field}.add(1, 2);
        assertEquals(6, twice({local}));
    }}
}}
"#
    )
}

fn resolve(text: &str) -> Resolution {
    let config = ClarifyConfig::default();
    let mut adapter = JavaAdapter::new(config.dialect.clone()).unwrap();
    let source = adapter
        .parse_source(Arc::from(text), Path::new("Generated.java"))
        .unwrap();
    Resolution::build(&source, &config.dialect).unwrap()
}

proptest! {
    #[test]
    fn generated_locals_get_distinct_legal_names(
        first in prop::sample::select(UNINFORMATIVE),
        second in prop::sample::select(UNINFORMATIVE),
    ) {
        prop_assume!(first != second);
        let source = generated_test(first, second);
        let result = engine()
            .rewrite_source(Path::new("GeneratedTest.java"), &source)
            .unwrap();

        prop_assert!(parses(&result.output));
        let finals: Vec<&str> = result.plan.entries().map(|e| e.final_name.as_str()).collect();
        let unique: HashSet<&str> = finals.iter().copied().collect();
        prop_assert_eq!(unique.len(), finals.len());
        for name in &finals {
            prop_assert!(!JAVA_RESERVED_WORDS.contains(name));
        }
        prop_assert!(result.output.contains("int sum = calculator.add(1, 2);"));
        prop_assert!(result.output.contains("int product = calculator.multiply(sum, 3);"));
        prop_assert!(result.output.contains("assertEquals(9, product);"));
    }

    #[test]
    fn fields_and_parameters_are_renamed_everywhere_and_deterministically(
        names in prop::sample::subsequence(UNINFORMATIVE.to_vec(), 3).prop_shuffle(),
    ) {
        let source = generated_members(names[0], names[1], names[2]);
        let path = Path::new("GeneratedMembersTest.java");
        let first = engine().rewrite_source(path, &source).unwrap();
        let second = engine().rewrite_source(path, &source).unwrap();
        prop_assert_eq!(&first.output, &second.output);
        prop_assert_eq!(&first.plan, &second.plan);

        let kinds: HashSet<SymbolKind> = first.plan.entries().map(|e| e.kind).collect();
        prop_assert!(kinds.contains(&SymbolKind::Field));
        prop_assert!(kinds.contains(&SymbolKind::Parameter));

        // Every occurrence of a renamed symbol carries the new name, and no
        // occurrence was lost or gained.
        let before = resolve(&source);
        let after = resolve(&first.output);
        for entry in first.plan.entries() {
            let original = before.symbols.get(entry.symbol);
            let renamed = after.symbols.get(entry.symbol);
            prop_assert_eq!(
                original.occurrence_spans().count(),
                renamed.occurrence_spans().count()
            );
            for span in renamed.occurrence_spans() {
                prop_assert_eq!(&first.output[span.start..span.end], entry.final_name.as_str());
            }
        }
    }
}
