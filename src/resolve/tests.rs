use std::path::Path;
use std::sync::Arc;

use super::*;
use crate::core::config::DialectConfig;
use crate::lang::JavaAdapter;

fn resolve(source: &str) -> Resolution {
    let dialect = DialectConfig::default();
    let file = JavaAdapter::new(dialect.clone())
        .unwrap()
        .parse_source(Arc::from(source), Path::new("T.java"))
        .unwrap();
    Resolution::build(&file, &dialect).unwrap()
}

fn named<'a>(resolution: &'a Resolution, name: &str) -> Vec<&'a Symbol> {
    resolution
        .symbols
        .iter()
        .filter(|s| s.original_name == name)
        .collect()
}

fn only<'a>(resolution: &'a Resolution, name: &str) -> &'a Symbol {
    let found = named(resolution, name);
    assert_eq!(found.len(), 1, "expected exactly one symbol named {name}");
    found[0]
}

const CALC_TEST: &str = r#"import org.junit.Test;
import static org.junit.Assert.*;

public class Calculator_ESTest {

    @Test(timeout = 4000)
    public void test0() throws Throwable {
        Calculator calc = new Calculator();
        int result = calc.add(2, 3);

        assertEquals(5, result);
    }
}
"#;

#[test]
fn resolves_locals_with_initializer_shapes() {
    let resolution = resolve(CALC_TEST);

    let calc = only(&resolution, "calc");
    assert_eq!(calc.kind, SymbolKind::LocalVariable);
    assert_eq!(calc.declared_type.as_deref(), Some("Calculator"));
    assert_eq!(
        calc.initializer,
        Initializer::Construction {
            type_name: "Calculator".to_string()
        }
    );
    assert_eq!(calc.use_sites.len(), 1);
    assert!(matches!(
        calc.use_sites[0].context,
        UseContext::Receiver { ref callee } if callee == "add"
    ));

    let result = only(&resolution, "result");
    match &result.initializer {
        Initializer::Call {
            callee,
            receiver,
            receiver_symbol,
            ..
        } => {
            assert_eq!(callee, "add");
            assert_eq!(receiver.as_deref(), Some("calc"));
            assert_eq!(*receiver_symbol, Some(calc.id));
        }
        other => panic!("expected call initializer, got {other:?}"),
    }
    match &result.use_sites[0].context {
        UseContext::Argument(arg) => {
            assert_eq!(arg.callee, "assertEquals");
            assert_eq!(arg.position, 1);
            assert_eq!(arg.arg_count, 2);
            assert!(arg.assertion.as_ref().is_some_and(|a| a.equality));
        }
        other => panic!("expected assertion argument, got {other:?}"),
    }
}

#[test]
fn test_methods_are_renameable_and_names_outside_are_external() {
    let resolution = resolve(CALC_TEST);

    let method = only(&resolution, "test0");
    assert_eq!(method.kind, SymbolKind::Method);
    assert!(method.is_test);
    assert!(method.renameable);

    let external = resolution.symbols.external_names();
    for name in ["Test", "timeout", "org", "junit", "Calculator_ESTest", "assertEquals"] {
        assert!(external.contains(name), "{name} should be external");
    }
    assert!(!external.contains("result"));
}

#[test]
fn locals_are_visible_only_after_declaration_and_inside_their_block() {
    let resolution = resolve(
        "class A {\n  void m() {\n    foo(a);\n    int a = 1;\n    { int y = a; }\n    int z = y;\n  }\n}\n",
    );

    let a = only(&resolution, "a");
    assert_eq!(a.use_sites.len(), 1);
    let y = only(&resolution, "y");
    assert!(y.use_sites.is_empty());

    let external = resolution.symbols.external_names();
    assert!(external.contains("a"));
    assert!(external.contains("y"));
}

#[test]
fn this_access_resolves_to_the_field_past_a_shadowing_parameter() {
    let resolution = resolve("class A {\n  private int v;\n  void set(int v) { this.v = v; }\n}\n");

    let symbols = named(&resolution, "v");
    assert_eq!(symbols.len(), 2);
    let field = symbols.iter().find(|s| s.kind == SymbolKind::Field).unwrap();
    let param = symbols
        .iter()
        .find(|s| s.kind == SymbolKind::Parameter)
        .unwrap();

    assert_eq!(field.use_sites.len(), 1);
    assert_eq!(param.use_sites.len(), 1);
    assert!(field.use_sites[0].span.start < param.use_sites[0].span.start);
    assert_eq!(param.parameter_index, Some(0));

    let setter = only(&resolution, "set");
    assert_eq!(param.owner, Some(setter.id));
    assert!(!setter.renameable);
    assert_eq!(resolution.symbols.parameters_of(setter.id).len(), 1);
}

#[test]
fn fields_are_declared_before_method_bodies() {
    let resolution = resolve("class A {\n  int read() { return x1; }\n  private int x1 = 3;\n}\n");
    let field = only(&resolution, "x1");
    assert_eq!(field.use_sites.len(), 1);
    assert!(field.renameable);
}

#[test]
fn visibility_and_overloading_block_renames() {
    let resolution = resolve(
        r#"class A {
    public int shown;
    protected int inherited;
    private int hidden;

    @Test
    void t1() {}

    @Test
    void t2() {}

    @Test
    void t2(int x) {}
}
"#,
    );

    assert!(!only(&resolution, "shown").renameable);
    assert!(!only(&resolution, "inherited").renameable);
    assert!(only(&resolution, "hidden").renameable);
    assert!(only(&resolution, "t1").renameable);
    assert!(named(&resolution, "t2").iter().all(|s| !s.renameable));
}

#[test]
fn leading_assertion_message_shifts_positions() {
    let resolution = resolve(
        "class A {\n  @Test void t() {\n    int r = 5;\n    assertEquals(\"sum\", 5, r);\n  }\n}\n",
    );
    let r = only(&resolution, "r");
    match &r.use_sites[0].context {
        UseContext::Argument(arg) => {
            assert_eq!(arg.position, 2);
            assert_eq!(arg.effective_position(), 1);
        }
        other => panic!("expected argument context, got {other:?}"),
    }
}

#[test]
fn lambda_and_catch_parameters_are_scoped_symbols() {
    let resolution = resolve(
        r#"class A {
    void m(java.util.List<String> items) {
        items.forEach(item -> System.out.println(item));
        try {
            run();
        } catch (IllegalStateException e) {
            e.printStackTrace();
        }
    }
}
"#,
    );

    let item = only(&resolution, "item");
    assert_eq!(item.kind, SymbolKind::Parameter);
    assert_eq!(item.parameter_index, None);
    assert_eq!(item.use_sites.len(), 1);

    let e = only(&resolution, "e");
    assert_eq!(e.kind, SymbolKind::Parameter);
    assert_eq!(e.declared_type.as_deref(), Some("IllegalStateException"));
    assert_eq!(e.use_sites.len(), 1);

    let method = only(&resolution, "m");
    assert_eq!(resolution.symbols.parameters_of(method.id).len(), 1);

    let external = resolution.symbols.external_names();
    assert!(external.contains("System"));
    assert!(external.contains("out"));
}

#[test]
fn var_declarations_take_their_type_from_the_initializer() {
    let resolution = resolve("class A {\n  void m() {\n    var n = 4;\n    var acc = new BankAccount(1.0);\n  }\n}\n");
    assert_eq!(only(&resolution, "n").declared_type.as_deref(), Some("int"));
    assert_eq!(
        only(&resolution, "acc").declared_type.as_deref(),
        Some("BankAccount")
    );
}

#[test]
fn every_use_site_lies_in_its_declaring_scope() {
    let resolution = resolve(CALC_TEST);
    for symbol in resolution.symbols.iter() {
        for site in &symbol.use_sites {
            assert!(resolution
                .scopes
                .is_ancestor_or_self(symbol.declaring_scope, site.scope));
        }
    }
    assert!(resolution.symbols.check_invariants(&resolution.scopes).is_ok());
}

#[test]
fn base_type_names_drop_generics_and_packages() {
    assert_eq!(base_type_name("java.util.List<String>"), "List");
    assert_eq!(base_type_name("int[]"), "int");
    assert_eq!(base_type_name("BankAccount"), "BankAccount");
}

#[test]
fn members_used_through_a_qualifier_are_pinned() {
    let resolution = resolve(
        r#"class A {
    private int count;
    private int total;

    @Test
    void t0() {
        A other = new A();
        other.count = 1;
        total = 2;
    }

    @Test
    void t1() {
        Runnable r = this::t0;
    }
}
"#,
    );

    assert!(!only(&resolution, "count").renameable);
    assert!(only(&resolution, "total").renameable);
    assert!(!only(&resolution, "t0").renameable);
    assert!(only(&resolution, "t1").renameable);

    let qualified = resolution.symbols.qualified_members();
    assert!(qualified.contains("count"));
    assert!(qualified.contains("t0"));
    assert!(!qualified.contains("total"));
}
