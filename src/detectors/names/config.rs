//! Configuration structs and vocabulary for the naming oracle.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::errors::{ClarifyError, Result};

/// Casing applied to generated names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum NamingStyle {
    /// `multiplicationResult`, `testAdditionOfTwoNumbers`
    #[default]
    CamelCase,
    /// `multiplication_result`, `test_addition_of_two_numbers`
    SnakeCase,
}

impl NamingStyle {
    /// Join words into an identifier in this style. Lower-case words are
    /// cased by the style; a word that already carries capitals is kept
    /// verbatim apart from its leading letter.
    pub fn join<S: AsRef<str>>(self, words: &[S]) -> String {
        let mut out = String::new();
        for (index, word) in words.iter().enumerate() {
            let word = word.as_ref();
            if word.is_empty() {
                continue;
            }
            match self {
                NamingStyle::CamelCase => {
                    if index == 0 || out.is_empty() {
                        out.push_str(&word.to_lowercase());
                    } else if has_capitals(word) {
                        out.push_str(&upper_first(word));
                    } else {
                        out.push_str(&capitalize(word));
                    }
                }
                NamingStyle::SnakeCase => {
                    if !out.is_empty() {
                        out.push('_');
                    }
                    out.push_str(word);
                }
            }
        }
        out
    }

    /// Append a numeric suffix (`price2` / `price_2`).
    pub fn with_suffix(self, base: &str, n: usize) -> String {
        match self {
            NamingStyle::CamelCase => format!("{base}{n}"),
            NamingStyle::SnakeCase => format!("{base}_{n}"),
        }
    }
}

/// Upper-case the first character of a word, lower-case the rest.
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

fn upper_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn has_capitals(word: &str) -> bool {
    word.chars().any(char::is_uppercase)
}

/// Split an identifier into lower-case words on camel humps, underscores and
/// letter/digit boundaries. Digits are kept as their own words.
pub fn split_words(identifier: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let chars: Vec<char> = identifier.chars().collect();

    for (i, &ch) in chars.iter().enumerate() {
        if ch == '_' || ch == '$' {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }
        if let Some(prev) = current.chars().last() {
            let next_is_lower = chars.get(i + 1).is_some_and(|c| c.is_lowercase());
            let boundary = (prev.is_lowercase() && ch.is_uppercase())
                || (prev.is_ascii_digit() != ch.is_ascii_digit())
                || (prev.is_uppercase() && ch.is_uppercase() && next_is_lower);
            if boundary {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(ch);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words.into_iter().map(|w| w.to_lowercase()).collect()
}

/// Vocabulary used to decide whether an existing name already says something.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamingVocabulary {
    /// Words that carry no meaning on their own (`var`, `tmp`, `result`)
    #[serde(default = "NamingVocabulary::default_generic_words")]
    pub generic_words: Vec<String>,

    /// Abbreviation expansions; an abbreviated name is treated as uninformative
    #[serde(default = "NamingVocabulary::default_abbreviations")]
    pub abbreviations: IndexMap<String, String>,

    /// Short names that are conventional and kept as-is
    #[serde(default = "NamingVocabulary::default_allowed_short_names")]
    pub allowed_short_names: Vec<String>,
}

impl Default for NamingVocabulary {
    fn default() -> Self {
        Self {
            generic_words: Self::default_generic_words(),
            abbreviations: Self::default_abbreviations(),
            allowed_short_names: Self::default_allowed_short_names(),
        }
    }
}

impl NamingVocabulary {
    fn default_generic_words() -> Vec<String> {
        [
            "var", "val", "value", "values", "tmp", "temp", "param", "params", "arg", "args",
            "obj", "object", "res", "result", "ret", "return", "out", "output", "data", "input",
            "str", "num", "number", "foo", "bar", "baz", "qux", "test", "tests", "t", "check",
            "verify", "case", "my", "the", "a", "b", "c", "d", "f", "func", "fn", "method",
            "item", "elem", "x", "y", "z", "computed", "list", "map", "set", "arr", "array",
            "thing", "stuff", "new", "local", "field", "v", "p", "q", "n", "s", "o", "r", "e",
        ]
        .into_iter()
        .map(String::from)
        .collect()
    }

    fn default_abbreviations() -> IndexMap<String, String> {
        [
            ("calc", "calculator"),
            ("acc", "account"),
            ("acct", "account"),
            ("bal", "balance"),
            ("amt", "amount"),
            ("cnt", "count"),
            ("idx", "index"),
            ("usr", "user"),
            ("cfg", "config"),
            ("mgr", "manager"),
            ("svc", "service"),
            ("btn", "button"),
            ("msg", "message"),
            ("ex", "exception"),
            ("exc", "exception"),
            ("err", "error"),
            ("lst", "list"),
            ("sb", "builder"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    fn default_allowed_short_names() -> Vec<String> {
        ["i", "j", "k", "id", "io", "ui", "db", "os", "fs", "url"]
            .into_iter()
            .map(String::from)
            .collect()
    }

    /// Validate the vocabulary
    pub fn validate(&self) -> Result<()> {
        for (abbreviation, expansion) in &self.abbreviations {
            if abbreviation.is_empty() || expansion.is_empty() {
                return Err(ClarifyError::validation_field(
                    "abbreviation entries must be non-empty",
                    "vocabulary.abbreviations",
                ));
            }
        }
        if self.generic_words.iter().any(String::is_empty) {
            return Err(ClarifyError::validation_field(
                "generic words must be non-empty",
                "vocabulary.generic_words",
            ));
        }
        Ok(())
    }

    /// Whether a name carries no meaning and may be replaced.
    pub fn is_uninformative(&self, name: &str) -> bool {
        let lowered = name.to_lowercase();
        if self.allowed_short_names.iter().any(|n| *n == lowered) {
            return false;
        }
        if name.chars().count() <= 2 {
            return true;
        }

        // Digits wedged between letters (`x9yZ`, `a1b`) read as noise.
        let chars: Vec<char> = name.chars().collect();
        if chars.windows(2).any(|w| w[0].is_ascii_digit() && w[1].is_alphabetic()) {
            return true;
        }

        let words: Vec<String> = split_words(name)
            .into_iter()
            .filter(|w| !w.chars().all(|c| c.is_ascii_digit()))
            .collect();
        if words.is_empty() {
            return true;
        }
        words.iter().all(|word| {
            word.chars().count() <= 1
                || self.generic_words.iter().any(|g| g == word)
                || self.abbreviations.contains_key(word)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_words_handles_camel_snake_and_digits() {
        assert_eq!(split_words("calculateDiscount"), vec!["calculate", "discount"]);
        assert_eq!(split_words("result_var"), vec!["result", "var"]);
        assert_eq!(split_words("input_data_1"), vec!["input", "data", "1"]);
        assert_eq!(split_words("acc0"), vec!["acc", "0"]);
        assert_eq!(split_words("HTTPServer"), vec!["http", "server"]);
    }

    #[test]
    fn styles_join_words() {
        assert_eq!(NamingStyle::CamelCase.join(&["multiplication", "result"]), "multiplicationResult");
        assert_eq!(NamingStyle::SnakeCase.join(&["multiplication", "result"]), "multiplication_result");
        assert_eq!(NamingStyle::CamelCase.with_suffix("price", 2), "price2");
        assert_eq!(NamingStyle::SnakeCase.with_suffix("price", 2), "price_2");
        assert_eq!(NamingStyle::CamelCase.join(&["test", "X9yZ"]), "testX9yZ");
        assert_eq!(NamingStyle::SnakeCase.join(&["test", "X9yZ"]), "test_X9yZ");
    }

    #[test]
    fn fixture_names_are_uninformative() {
        let vocab = NamingVocabulary::default();
        for name in [
            "var1", "var2", "result_var", "value_a", "output_val", "list1", "param1",
            "return_value", "x", "zz", "str_var", "input_data_1", "computed_result", "acc0",
            "bal2", "calc", "test0", "t1", "test_var1", "check_value2", "verify_test4",
            "test_case3", "X9yZ", "a1", "f1", "e",
        ] {
            assert!(vocab.is_uninformative(name), "{name} should be uninformative");
        }
    }

    #[test]
    fn descriptive_names_are_kept() {
        let vocab = NamingVocabulary::default();
        for name in [
            "price", "age", "sum", "calculator", "account", "balance2", "expected",
            "actual", "testAdditionOfTwoNumbers", "calculateDiscount", "i", "id",
            "test_discount_calculation_but_with_bad_vars",
        ] {
            assert!(!vocab.is_uninformative(name), "{name} should be kept");
        }
    }
}
