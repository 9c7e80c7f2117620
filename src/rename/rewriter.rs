//! Single-pass span substitution.

use crate::core::errors::{ClarifyError, Result};
use crate::lang::Span;
use crate::resolve::SymbolTable;

use super::plan::RenamePlan;

/// Replace the text of one identifier occurrence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    pub span: Span,
    pub replacement: String,
}

/// Substitutions for the declaration and every use site of each renamed
/// symbol, sorted by span start.
pub fn substitutions(plan: &RenamePlan, symbols: &SymbolTable) -> Vec<Substitution> {
    let mut subs: Vec<Substitution> = plan
        .entries()
        .flat_map(|entry| {
            symbols
                .get(entry.symbol)
                .occurrence_spans()
                .map(move |span| Substitution {
                    span,
                    replacement: entry.final_name.clone(),
                })
        })
        .collect();
    subs.sort_by_key(|s| s.span.start);
    subs
}

/// Apply substitutions to `text`, copying every other byte unchanged
pub fn apply(text: &str, substitutions: &[Substitution]) -> Result<String> {
    let mut ordered: Vec<&Substitution> = substitutions.iter().collect();
    ordered.sort_by_key(|s| s.span.start);

    for pair in ordered.windows(2) {
        if pair[0].span.overlaps(pair[1].span) || pair[0].span.start == pair[1].span.start {
            return Err(ClarifyError::invariant(format!(
                "substitutions at {} and {} overlap",
                pair[0].span, pair[1].span
            )));
        }
    }

    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    for sub in ordered {
        if sub.span.end > text.len() {
            return Err(ClarifyError::invariant(format!(
                "substitution {} lies outside the source",
                sub.span
            )));
        }
        out.push_str(&text[cursor..sub.span.start]);
        out.push_str(&sub.replacement);
        cursor = sub.span.end;
    }
    out.push_str(&text[cursor..]);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sub(start: usize, end: usize, replacement: &str) -> Substitution {
        Substitution {
            span: Span::new(start, end),
            replacement: replacement.to_string(),
        }
    }

    #[test]
    fn text_outside_substitutions_is_copied() {
        let text = "int a = 1; f(a);";
        let out = apply(text, &[sub(13, 14, "count"), sub(4, 5, "count")]).unwrap();
        assert_eq!(out, "int count = 1; f(count);");
    }

    #[test]
    fn no_substitutions_is_identity() {
        let text = "class A { /* a */ }";
        assert_eq!(apply(text, &[]).unwrap(), text);
    }

    #[test]
    fn overlapping_substitutions_are_an_invariant_violation() {
        let err = apply("abcdef", &[sub(0, 3, "x"), sub(2, 4, "y")]).unwrap_err();
        assert!(err.is_fatal());
    }
}
