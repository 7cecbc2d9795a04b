// Batch aggregation of per-sample tallies into Recall / Precision.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{EditTally, Scorer};
use crate::error::{EvalError, Result};

/// One evaluation row: the erroneous sentence, its gold correction and the
/// model's prediction.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Sample {
    pub original: String,
    pub gold: String,
    pub predicted: String,
    /// Erroneous fragment annotated in the truth table, if any
    pub original_target_part: Option<String>,
    /// Corrected fragment annotated in the truth table, if any
    pub golden_target_part: Option<String>,
}

impl Sample {
    pub fn new(
        original: impl Into<String>,
        gold: impl Into<String>,
        predicted: impl Into<String>,
    ) -> Self {
        Self {
            original: original.into(),
            gold: gold.into(),
            predicted: predicted.into(),
            ..Self::default()
        }
    }

    /// Build a batch from parallel columns. All three must have equal length.
    pub fn from_columns<S: AsRef<str>>(
        originals: &[S],
        golds: &[S],
        predicted: &[S],
    ) -> Result<Vec<Sample>> {
        if originals.len() != golds.len() || golds.len() != predicted.len() {
            return Err(EvalError::ColumnLengths {
                original: originals.len(),
                gold: golds.len(),
                predicted: predicted.len(),
            });
        }

        Ok(originals
            .iter()
            .zip(golds)
            .zip(predicted)
            .map(|((o, g), p)| Sample::new(o.as_ref(), g.as_ref(), p.as_ref()))
            .collect())
    }
}

/// Per-sample row of the analysis table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub original: String,
    pub golden: String,
    pub prediction: String,
    pub tp: usize,
    pub fp: usize,
    pub fm: usize,
    pub fr: usize,
    #[serde(default)]
    pub original_target_part: Option<String>,
    #[serde(default)]
    pub golden_target_part: Option<String>,
}

impl AnalysisRecord {
    fn new(sample: &Sample, tally: EditTally) -> Self {
        Self {
            original: sample.original.clone(),
            golden: sample.gold.clone(),
            prediction: sample.predicted.clone(),
            tp: tally.tp,
            fp: tally.fp,
            fm: tally.fm,
            fr: tally.fr,
            original_target_part: sample.original_target_part.clone(),
            golden_target_part: sample.golden_target_part.clone(),
        }
    }

    pub fn tally(&self) -> EditTally {
        EditTally {
            tp: self.tp,
            fp: self.fp,
            fm: self.fm,
            fr: self.fr,
        }
    }
}

/// Summed counts over a batch with the derived percentages.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub true_positives: usize,
    pub false_positives: usize,
    pub false_missings: usize,
    pub false_redundants: usize,
    /// `100 * tp / (tp + fp + fm)`, or 0.0 with no gold edits
    pub recall: f64,
    /// `100 * tp / (tp + fp + fr)`, or 0.0 with no prediction edits
    pub precision: f64,
}

impl EvaluationResult {
    pub fn from_tally(tally: EditTally) -> Self {
        Self {
            true_positives: tally.tp,
            false_positives: tally.fp,
            false_missings: tally.fm,
            false_redundants: tally.fr,
            recall: percentage(tally.tp, tally.gold_edits()),
            precision: percentage(tally.tp, tally.predicted_edits()),
        }
    }

    pub fn tally(&self) -> EditTally {
        EditTally {
            tp: self.true_positives,
            fp: self.false_positives,
            fm: self.false_missings,
            fr: self.false_redundants,
        }
    }
}

impl Default for EvaluationResult {
    fn default() -> Self {
        Self::from_tally(EditTally::default())
    }
}

fn percentage(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64 * 100.0
    }
}

/// Batch scores plus the per-sample analysis table, in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchEvaluation {
    pub result: EvaluationResult,
    pub analysis: Vec<AnalysisRecord>,
}

impl BatchEvaluation {
    fn from_tallies(samples: &[Sample], tallies: Vec<EditTally>) -> Self {
        let total: EditTally = tallies.iter().copied().sum();
        let analysis = samples
            .iter()
            .zip(tallies)
            .map(|(sample, tally)| AnalysisRecord::new(sample, tally))
            .collect();
        let result = EvaluationResult::from_tally(total);

        info!(
            samples = samples.len(),
            tp = total.tp,
            fp = total.fp,
            fm = total.fm,
            fr = total.fr,
            "Recall: {:.2}%, Precision: {:.2}%",
            result.recall,
            result.precision
        );

        Self { result, analysis }
    }
}

impl Scorer {
    /// Score every sample in order and aggregate.
    pub fn evaluate_batch(&self, samples: &[Sample]) -> BatchEvaluation {
        let tallies = samples
            .iter()
            .map(|s| self.evaluate_sample(&s.original, &s.gold, &s.predicted))
            .collect();
        BatchEvaluation::from_tallies(samples, tallies)
    }

    /// Same result as [`Scorer::evaluate_batch`], with samples scored on the
    /// rayon pool. Tallies are collected in input order before summation.
    pub fn evaluate_batch_parallel(&self, samples: &[Sample]) -> BatchEvaluation {
        let tallies = samples
            .par_iter()
            .map(|s| self.evaluate_sample(&s.original, &s.gold, &s.predicted))
            .collect();
        BatchEvaluation::from_tallies(samples, tallies)
    }
}

/// [`Scorer::evaluate_batch`] with the default merge window.
pub fn evaluate_batch(samples: &[Sample]) -> BatchEvaluation {
    Scorer::default().evaluate_batch(samples)
}

/// [`Scorer::evaluate_batch_parallel`] with the default merge window.
pub fn evaluate_batch_parallel(samples: &[Sample]) -> BatchEvaluation {
    Scorer::default().evaluate_batch_parallel(samples)
}
