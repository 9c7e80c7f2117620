//! Word generation for proposed names and behavior profiling of test methods.

use crate::lang::{NodeKind, SourceFile, SyntaxNode};
use crate::resolve::{base_type_name, literal_category, LiteralCategory};

use super::config::{capitalize, split_words, NamingVocabulary};
use super::evidence::{EvidenceKind, EvidenceStrength};

/// Callees whose result has a conventional noun
const RESULT_NOUNS: &[(&str, &str)] = &[
    ("add", "sum"),
    ("plus", "sum"),
    ("sum", "sum"),
    ("subtract", "difference"),
    ("minus", "difference"),
    ("multiply", "product"),
    ("times", "product"),
    ("divide", "quotient"),
    ("mod", "remainder"),
    ("modulo", "remainder"),
    ("remainder", "remainder"),
    ("pow", "power"),
    ("power", "power"),
    ("sqrt", "root"),
    ("negate", "negation"),
    ("max", "maximum"),
    ("min", "minimum"),
    ("average", "average"),
    ("avg", "average"),
    ("mean", "average"),
    ("count", "count"),
    ("size", "size"),
    ("length", "length"),
    ("concat", "concatenation"),
    ("toString", "text"),
    ("hashCode", "hash"),
    ("compareTo", "comparison"),
    ("clone", "copy"),
    ("copy", "copy"),
];

/// Verbs dropped from the callee name when the rest names the result
const STRIPPED_VERBS: &[&str] = &[
    "get", "calculate", "compute", "create", "find", "load", "parse", "read", "fetch", "build",
    "make", "generate", "to", "as", "retrieve", "lookup", "new",
];

/// Prefixes of boolean queries; the callee name is kept as-is
const PREDICATE_PREFIXES: &[&str] = &["is", "has", "can", "should", "was", "will"];

/// Element accessors that name their result after the container's type argument
const CONTAINER_VERBS: &[&str] = &[
    "get", "next", "pop", "peek", "poll", "remove", "take", "element", "first", "last",
    "getFirst", "getLast",
];

/// Verb to action noun, for test-method themes
const ACTION_NOUNS: &[(&str, &str)] = &[
    ("add", "addition"),
    ("subtract", "subtraction"),
    ("multiply", "multiplication"),
    ("divide", "division"),
    ("withdraw", "withdrawal"),
    ("deposit", "deposit"),
    ("transfer", "transfer"),
    ("calculate", "calculation"),
    ("compute", "computation"),
    ("create", "creation"),
    ("validate", "validation"),
    ("parse", "parsing"),
    ("load", "loading"),
    ("save", "saving"),
    ("store", "storage"),
    ("remove", "removal"),
    ("delete", "deletion"),
    ("insert", "insertion"),
    ("update", "update"),
    ("set", "update"),
    ("put", "insertion"),
    ("push", "push"),
    ("pop", "pop"),
    ("find", "lookup"),
    ("search", "search"),
    ("sort", "sorting"),
    ("reverse", "reversal"),
    ("convert", "conversion"),
    ("format", "formatting"),
    ("apply", "application"),
    ("process", "processing"),
    ("register", "registration"),
    ("open", "opening"),
    ("close", "closing"),
    ("clear", "clearing"),
    ("reset", "reset"),
    ("init", "initialization"),
    ("initialize", "initialization"),
    ("increment", "increment"),
    ("decrement", "decrement"),
    ("append", "append"),
    ("concat", "concatenation"),
    ("compare", "comparison"),
    ("verify", "verification"),
    ("send", "sending"),
    ("read", "reading"),
    ("write", "writing"),
    ("encode", "encoding"),
    ("decode", "decoding"),
    ("merge", "merge"),
    ("split", "split"),
    ("evaluate", "evaluation"),
    ("execute", "execution"),
    ("connect", "connection"),
    ("authenticate", "authentication"),
    ("login", "login"),
    ("logout", "logout"),
];

/// Calls that never describe what a test exercises
const IGNORED_CALLEES: &[&str] = &[
    "println", "print", "printf", "format", "toString", "hashCode", "equals", "getClass",
    "valueOf", "printStackTrace", "getMessage",
];

const PRIMITIVE_TYPES: &[&str] = &[
    "int", "long", "short", "byte", "char", "boolean", "float", "double", "void",
];

/// Test suffixes stripped from class names (`Calculator_ESTest` -> `Calculator`)
const CLASS_TEST_SUFFIXES: &[&str] = &["_ESTest", "_RandoopTest", "TestCase", "Tests", "Test", "IT"];

/// Call or construction observed in a test method body
#[derive(Debug, Clone, PartialEq)]
pub struct CallEvent {
    pub target: CallTarget,
    pub arg_count: usize,
    /// Number of numeric literal arguments (a leading minus counts)
    pub numeric_args: usize,
    /// Some argument is a numeric literal equal to zero
    pub zero_arg: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallTarget {
    Method(String),
    Construction(String),
}

/// Exception a test expects, with the first call that may raise it
#[derive(Debug, Clone, PartialEq)]
pub struct ExceptionExpectation {
    pub exception: String,
    pub guarded_event: Option<usize>,
}

/// What a test method does, in source order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MethodProfile {
    pub events: Vec<CallEvent>,
    pub expectations: Vec<ExceptionExpectation>,
}

/// One candidate name for a test method
#[derive(Debug, Clone, PartialEq)]
pub struct MethodTheme {
    pub kind: EvidenceKind,
    pub strength: EvidenceStrength,
    pub text: String,
    pub words: Vec<String>,
}

/// Profiles test-method bodies from the syntax tree
pub struct MethodProfiler;

impl MethodProfiler {
    pub fn new() -> Self {
        Self
    }

    /// Collect calls, constructions and expected exceptions of a method
    pub fn profile(&self, source: &SourceFile, method: &SyntaxNode) -> MethodProfile {
        let mut profile = MethodProfile::default();
        let annotated = self.annotated_expectation(source, method);

        if let Some(body) = method.child_by_field("body") {
            self.visit(source, body, None, &mut profile);
        }

        if let Some(exception) = annotated {
            let guarded_event = profile.events.len().checked_sub(1);
            profile.expectations.push(ExceptionExpectation {
                exception,
                guarded_event,
            });
        }
        profile
    }

    /// JUnit 4 `@Test(expected = X.class)`
    fn annotated_expectation(&self, source: &SourceFile, method: &SyntaxNode) -> Option<String> {
        let modifiers = method.child_of_kind("modifiers")?;
        for annotation in modifiers.children.iter().filter(|c| c.grammar == "annotation") {
            let Some(arguments) = annotation.child_by_field("arguments") else {
                continue;
            };
            for pair in arguments.children.iter().filter(|c| c.grammar == "element_value_pair") {
                let key = pair.child_by_field("key").map(|k| source.node_text(k));
                let value = pair.child_by_field("value");
                if let (Some("expected"), Some(value)) = (key, value) {
                    if value.grammar == "class_literal" {
                        return value
                            .named_children()
                            .next()
                            .map(|t| base_type_name(source.node_text(t)));
                    }
                }
            }
        }
        None
    }

    fn visit(
        &self,
        source: &SourceFile,
        node: &SyntaxNode,
        guard: Option<usize>,
        profile: &mut MethodProfile,
    ) {
        match node.grammar {
            "try_statement" | "try_with_resources_statement" => {
                let caught: Vec<String> = node
                    .children
                    .iter()
                    .filter(|c| c.grammar == "catch_clause")
                    .filter_map(|c| c.child_of_kind("catch_formal_parameter"))
                    .filter_map(|p| p.child_of_kind("catch_type"))
                    .filter_map(|t| t.named_children().last())
                    .map(|t| base_type_name(source.node_text(t)))
                    .collect();

                let Some(exception) = caught.into_iter().next() else {
                    self.visit_children(source, node, guard, profile);
                    return;
                };
                let index = profile.expectations.len();
                profile.expectations.push(ExceptionExpectation {
                    exception,
                    guarded_event: None,
                });
                for child in &node.children {
                    match child.grammar {
                        "catch_clause" => {}
                        "finally_clause" => self.visit(source, child, guard, profile),
                        _ => self.visit(source, child, Some(index), profile),
                    }
                }
            }
            "method_invocation" if node.kind == NodeKind::AssertionCall => {
                let name = node.child_by_field("name").map(|n| source.node_text(n));
                let arguments = node.child_by_field("arguments");
                let thrown = arguments
                    .and_then(|args| args.named_children().next())
                    .filter(|first| first.grammar == "class_literal")
                    .and_then(|first| first.named_children().next())
                    .map(|t| base_type_name(source.node_text(t)));

                match (name, thrown, arguments) {
                    (Some("assertThrows"), Some(exception), Some(args)) => {
                        let index = profile.expectations.len();
                        profile.expectations.push(ExceptionExpectation {
                            exception,
                            guarded_event: None,
                        });
                        self.visit_children(source, args, Some(index), profile);
                    }
                    (_, _, Some(args)) => self.visit_children(source, args, guard, profile),
                    _ => {}
                }
            }
            "method_invocation" => {
                let callee = node
                    .child_by_field("name")
                    .map(|n| source.node_text(n).to_string())
                    .unwrap_or_default();
                self.record(source, node, CallTarget::Method(callee), guard, profile);
                self.visit_children(source, node, guard, profile);
            }
            "object_creation_expression" => {
                let type_name = node
                    .child_by_field("type")
                    .map(|t| base_type_name(source.node_text(t)))
                    .unwrap_or_default();
                self.record(source, node, CallTarget::Construction(type_name), guard, profile);
                self.visit_children(source, node, guard, profile);
            }
            _ => self.visit_children(source, node, guard, profile),
        }
    }

    fn visit_children(
        &self,
        source: &SourceFile,
        node: &SyntaxNode,
        guard: Option<usize>,
        profile: &mut MethodProfile,
    ) {
        for child in &node.children {
            self.visit(source, child, guard, profile);
        }
    }

    fn record(
        &self,
        source: &SourceFile,
        call: &SyntaxNode,
        target: CallTarget,
        guard: Option<usize>,
        profile: &mut MethodProfile,
    ) {
        let args: Vec<&SyntaxNode> = call
            .child_by_field("arguments")
            .map(|a| a.named_children().collect())
            .unwrap_or_default();
        let numeric: Vec<&str> = args.iter().filter_map(|a| numeric_literal(source, a)).collect();

        let index = profile.events.len();
        profile.events.push(CallEvent {
            target,
            arg_count: args.len(),
            numeric_args: numeric.len(),
            zero_arg: numeric.iter().any(|text| is_zero_literal(text)),
        });

        if let Some(guard) = guard {
            if let Some(expectation) = profile.expectations.get_mut(guard) {
                expectation.guarded_event.get_or_insert(index);
            }
        }
    }
}

impl Default for MethodProfiler {
    fn default() -> Self {
        Self::new()
    }
}

/// Text of a numeric literal argument, including a leading sign
fn numeric_literal<'a>(source: &'a SourceFile, node: &SyntaxNode) -> Option<&'a str> {
    let node = node.unwrap_expression();
    let literal = match node.grammar {
        "unary_expression" => node.child_by_field("operand")?.unwrap_expression(),
        _ => node,
    };
    match literal_category(literal)? {
        LiteralCategory::Integer | LiteralCategory::Float => Some(source.node_text(literal)),
        _ => None,
    }
}

/// Whether a Java numeric literal denotes zero (`0`, `0.0`, `0L`, `0x0`, `0.0f`)
pub fn is_zero_literal(text: &str) -> bool {
    let cleaned = text.replace('_', "");
    let lower = cleaned.to_ascii_lowercase();
    if let Some(hex) = lower.strip_prefix("0x") {
        let digits = hex.trim_end_matches('l');
        return !digits.is_empty() && digits.chars().all(|c| c == '0');
    }
    if let Some(binary) = lower.strip_prefix("0b") {
        let digits = binary.trim_end_matches('l');
        return !digits.is_empty() && digits.chars().all(|c| c == '0');
    }
    let trimmed = lower.trim_end_matches(['l', 'f', 'd']);
    trimmed.parse::<f64>().is_ok_and(|v| v == 0.0)
}

/// Deterministic word rules for proposed names
#[derive(Debug, Clone)]
pub struct NameGenerator {
    vocabulary: NamingVocabulary,
}

impl NameGenerator {
    pub fn new(vocabulary: &NamingVocabulary) -> Self {
        Self {
            vocabulary: vocabulary.clone(),
        }
    }

    /// Name words implied by a declared type; `None` for primitives
    pub fn type_words(&self, declared_type: &str) -> Option<Vec<String>> {
        let base = base_type_name(declared_type);
        if base.is_empty() || PRIMITIVE_TYPES.contains(&base.as_str()) || base == "var" {
            return None;
        }
        let word = match base.as_str() {
            "String" | "CharSequence" => "text".to_string(),
            "Integer" | "Long" | "Short" | "Byte" | "Double" | "Float" | "Number"
            | "BigDecimal" | "BigInteger" => "number".to_string(),
            "Boolean" => "flag".to_string(),
            "Character" => "character".to_string(),
            _ => split_words(&base)
                .into_iter()
                .rev()
                .find(|w| !w.chars().all(|c| c.is_ascii_digit()))?,
        };
        Some(vec![word])
    }

    /// Name words for a variable initialized from a call
    pub fn callee_return_words(&self, callee: &str, receiver_type: Option<&str>) -> Vec<String> {
        if let Some((_, noun)) = RESULT_NOUNS.iter().find(|(verb, _)| *verb == callee) {
            return vec![(*noun).to_string()];
        }

        if CONTAINER_VERBS.contains(&callee) {
            let element = receiver_type
                .and_then(|t| element_type(t, callee == "get"))
                .and_then(|t| self.type_words(&t));
            return element.unwrap_or_else(|| vec!["element".to_string()]);
        }

        let words = split_words(callee);
        match words.first().map(String::as_str) {
            Some(first) if words.len() > 1 && PREDICATE_PREFIXES.contains(&first) => words,
            Some(first) if words.len() > 1 && STRIPPED_VERBS.contains(&first) => {
                words[1..].to_vec()
            }
            _ => {
                let mut words = words;
                words.push("result".to_string());
                words
            }
        }
    }

    /// Action noun phrase for a callee (`calculateDiscount` -> `discount calculation`)
    pub fn action_words(&self, callee: &str) -> Vec<String> {
        let words: Vec<String> = split_words(callee)
            .into_iter()
            .filter(|w| !w.chars().all(|c| c.is_ascii_digit()))
            .collect();
        let Some(first) = words.first() else {
            return Vec::new();
        };
        match ACTION_NOUNS.iter().find(|(verb, _)| verb == first) {
            Some((_, noun)) => {
                let mut phrase = words[1..].to_vec();
                phrase.push((*noun).to_string());
                phrase
            }
            None => words,
        }
    }

    fn target_words(&self, target: &CallTarget) -> Vec<String> {
        match target {
            CallTarget::Method(callee) => self.action_words(callee),
            CallTarget::Construction(type_name) => {
                let mut words = split_words(type_name);
                words.push("creation".to_string());
                words
            }
        }
    }

    /// Whether a call says nothing about what the test exercises
    fn is_incidental(&self, callee: &str) -> bool {
        IGNORED_CALLEES.contains(&callee) || self.vocabulary.is_uninformative(callee)
    }

    fn is_accessor(&self, callee: &str) -> bool {
        let words = split_words(callee);
        matches!(
            words.first().map(String::as_str),
            Some("get" | "is" | "has" | "to" | "size" | "length")
        )
    }

    /// Candidate test-method names, strongest first
    pub fn test_method_themes(
        &self,
        profile: &MethodProfile,
        class_name: Option<&str>,
    ) -> Vec<MethodTheme> {
        let mut themes = Vec::new();

        for expectation in &profile.expectations {
            if let Some(theme) = self.exception_theme(profile, expectation) {
                themes.push(theme);
                break;
            }
        }

        if let Some(theme) = self.call_theme(profile) {
            themes.push(theme);
        }

        let constructed = profile.events.iter().find_map(|e| match &e.target {
            CallTarget::Construction(type_name) if !type_name.is_empty() => Some(type_name),
            _ => None,
        });
        if let Some(type_name) = constructed {
            let mut words = vec!["test".to_string()];
            words.extend(split_words(type_name));
            words.push("creation".to_string());
            themes.push(MethodTheme {
                kind: EvidenceKind::TypeOnly,
                strength: EvidenceStrength::Direct,
                text: format!("constructs {type_name}"),
                words,
            });
        }

        if let Some(stem) = class_name.map(class_stem).filter(|s| !s.is_empty()) {
            let mut words = vec!["test".to_string()];
            words.extend(stem_words(&stem));
            themes.push(MethodTheme {
                kind: EvidenceKind::TypeOnly,
                strength: EvidenceStrength::Fallback,
                text: format!("enclosing class {stem}"),
                words,
            });
        }
        themes
    }

    fn exception_theme(
        &self,
        profile: &MethodProfile,
        expectation: &ExceptionExpectation,
    ) -> Option<MethodTheme> {
        let event = expectation.guarded_event.and_then(|i| profile.events.get(i));
        let noun = event.map(|e| self.target_words(&e.target)).unwrap_or_default();
        let exception = expectation.exception.as_str();

        let mut words = vec!["test".to_string()];
        if exception.starts_with("IllegalArgument") || exception.starts_with("IllegalState") {
            if noun.is_empty() {
                return None;
            }
            words.push("invalid".to_string());
            words.extend(noun);
        } else if exception == "ArithmeticException" && event.is_some_and(|e| e.zero_arg) {
            words.extend(noun);
            words.extend(["by".to_string(), "zero".to_string()]);
        } else {
            words.extend(noun);
            words.push("throws".to_string());
            words.extend(split_words(exception));
        }

        let guarded = match event.map(|e| &e.target) {
            Some(CallTarget::Method(callee)) => format!(" around {callee}()"),
            Some(CallTarget::Construction(type_name)) => format!(" around new {type_name}()"),
            None => String::new(),
        };
        Some(MethodTheme {
            kind: EvidenceKind::AssertionRole,
            strength: EvidenceStrength::Direct,
            text: format!("expects {exception}{guarded}"),
            words,
        })
    }

    fn call_theme(&self, profile: &MethodProfile) -> Option<MethodTheme> {
        let calls: Vec<(&CallEvent, &str)> = profile
            .events
            .iter()
            .filter_map(|e| match &e.target {
                CallTarget::Method(callee) if !self.is_incidental(callee) => Some((e, callee.as_str())),
                _ => None,
            })
            .collect();

        let actions: Vec<(&CallEvent, &str)> = calls
            .iter()
            .copied()
            .filter(|(_, callee)| !self.is_accessor(callee))
            .collect();
        let chosen = if actions.is_empty() { calls } else { actions };

        let mut themes: Vec<(Vec<String>, &CallEvent, &str)> = Vec::new();
        for (event, callee) in chosen {
            let words = self.action_words(callee);
            if words.is_empty() || themes.iter().any(|(w, _, _)| *w == words) {
                continue;
            }
            themes.push((words, event, callee));
            if themes.len() == 2 {
                break;
            }
        }

        let mut words = vec!["test".to_string()];
        let text = match themes.as_slice() {
            [] => return None,
            [(theme, event, callee)] => {
                words.extend(theme.iter().cloned());
                if event.zero_arg {
                    words.extend(["by".to_string(), "zero".to_string()]);
                } else if event.arg_count == 2 && event.numeric_args == 2 {
                    words.extend(["of".to_string(), "two".to_string(), "numbers".to_string()]);
                }
                format!("calls {callee}()")
            }
            [(first, _, first_callee), (second, _, second_callee), ..] => {
                words.extend(first.iter().cloned());
                words.push("and".to_string());
                words.extend(second.iter().cloned());
                format!("calls {first_callee}() and {second_callee}()")
            }
        };

        Some(MethodTheme {
            kind: EvidenceKind::CalleeReturn,
            strength: EvidenceStrength::Direct,
            text,
            words,
        })
    }
}

/// Type argument naming a container's elements: the last one for map
/// lookups, the first one otherwise.
fn element_type(container: &str, keyed_lookup: bool) -> Option<String> {
    let open = container.find('<')?;
    let close = container.rfind('>')?;
    let inner = container.get(open + 1..close)?;

    let mut args = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, ch) in inner.char_indices() {
        match ch {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                args.push(inner[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    args.push(inner[start..].trim());

    let chosen = if keyed_lookup { args.last() } else { args.first() };
    chosen.filter(|a| !a.is_empty()).map(|a| a.to_string())
}

/// Words of a class stem. A stem whose casing does not survive splitting
/// (`X9yZ`) stays one verbatim word.
fn stem_words(stem: &str) -> Vec<String> {
    let words = split_words(stem);
    let rejoined: String = words.iter().map(|w| capitalize(w)).collect();
    if rejoined == stem {
        words
    } else {
        vec![stem.to_string()]
    }
}

/// Class name without test-harness suffixes
pub fn class_stem(class_name: &str) -> String {
    let mut stem = class_name;
    for suffix in CLASS_TEST_SUFFIXES {
        if let Some(stripped) = stem.strip_suffix(suffix) {
            if !stripped.is_empty() {
                stem = stripped;
                break;
            }
        }
    }
    let stem = stem.strip_prefix("Test").filter(|s| !s.is_empty()).unwrap_or(stem);
    stem.trim_end_matches('_').to_string()
}
