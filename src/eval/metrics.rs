//! Identifier-level agreement between a reference file and a prediction.

use std::collections::BTreeSet;
use std::time::Instant;

use edit_distance::edit_distance;
use serde::Serialize;
use tracing::debug;

use crate::lang::LanguageAdapter;

/// Metrics for one oracle/prediction pair
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PairMetrics {
    /// Character error rate in percent of the oracle length
    pub cer: f64,
    /// Character-level Levenshtein distance
    pub edit_distance: f64,
    /// Share of oracle identifiers matched at the same position
    pub correct_ordered: f64,
    /// Jaccard similarity of the identifier sets
    pub correct_unordered: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub elapsed_secs: f64,
}

/// Dataset means; time is the total over all pairs
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AverageMetrics {
    pub pairs: usize,
    pub cer: f64,
    pub edit_distance: f64,
    pub correct_ordered: f64,
    pub correct_unordered: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub execution_time_secs: f64,
}

/// Compare a prediction with its oracle.
///
/// Text that fails to parse contributes no identifiers.
pub fn evaluate(oracle: &str, prediction: &str, adapter: &mut dyn LanguageAdapter) -> PairMetrics {
    let start = Instant::now();

    let edit = edit_distance(oracle, prediction);
    let total_chars = oracle.chars().count().max(1);
    let cer = 100.0 * edit as f64 / total_chars as f64;

    let oracle_ids = identifiers(adapter, oracle);
    let predicted_ids = identifiers(adapter, prediction);
    let agreement = IdentifierAgreement::between(&oracle_ids, &predicted_ids);

    PairMetrics {
        cer,
        edit_distance: edit as f64,
        correct_ordered: agreement.ordered,
        correct_unordered: agreement.unordered,
        precision: agreement.precision,
        recall: agreement.recall,
        f1: agreement.f1,
        elapsed_secs: start.elapsed().as_secs_f64(),
    }
}

fn identifiers(adapter: &mut dyn LanguageAdapter, text: &str) -> Vec<String> {
    adapter.extract_identifiers(text).unwrap_or_else(|e| {
        debug!("No identifiers extracted: {}", e);
        Vec::new()
    })
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct IdentifierAgreement {
    ordered: f64,
    unordered: f64,
    precision: f64,
    recall: f64,
    f1: f64,
}

impl IdentifierAgreement {
    fn between(oracle: &[String], predicted: &[String]) -> Self {
        let ordered = if oracle.is_empty() {
            0.0
        } else {
            let same = oracle
                .iter()
                .zip(predicted)
                .filter(|(a, b)| a == b)
                .count();
            same as f64 / oracle.len() as f64
        };

        let oracle_set: BTreeSet<&String> = oracle.iter().collect();
        let predicted_set: BTreeSet<&String> = predicted.iter().collect();
        let tp = oracle_set.intersection(&predicted_set).count();
        let union = oracle_set.union(&predicted_set).count();
        let fp = predicted_set.len() - tp;
        let fn_ = oracle_set.len() - tp;

        let unordered = ratio(tp, union);
        let precision = ratio(tp, tp + fp);
        let recall = ratio(tp, tp + fn_);
        let f1 = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };

        Self {
            ordered,
            unordered,
            precision,
            recall,
            f1,
        }
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// Mean of every metric across pairs
pub fn average(metrics: &[PairMetrics]) -> AverageMetrics {
    if metrics.is_empty() {
        return AverageMetrics::default();
    }
    let n = metrics.len() as f64;
    let mean = |f: fn(&PairMetrics) -> f64| metrics.iter().map(f).sum::<f64>() / n;

    AverageMetrics {
        pairs: metrics.len(),
        cer: mean(|m| m.cer),
        edit_distance: mean(|m| m.edit_distance),
        correct_ordered: mean(|m| m.correct_ordered),
        correct_unordered: mean(|m| m.correct_unordered),
        precision: mean(|m| m.precision),
        recall: mean(|m| m.recall),
        f1: mean(|m| m.f1),
        execution_time_secs: metrics.iter().map(|m| m.elapsed_secs).sum(),
    }
}
