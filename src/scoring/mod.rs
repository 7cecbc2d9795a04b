// Edit classification: compares the (original, gold) and (original, predicted)
// span lists in the shared coordinate space of the original sentence.

use std::iter::Sum;
use std::ops::{Add, AddAssign};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::alignment::{Aligner, DifferenceSpan};

pub mod batch;

pub use batch::{
    evaluate_batch, evaluate_batch_parallel, AnalysisRecord, BatchEvaluation, EvaluationResult,
    Sample,
};

/// Outcome of one step of the gold/prediction merge-join.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EditClass {
    /// Same location, same replacement text
    TruePositive,
    /// Same location, different replacement text
    FalsePositive,
    /// Gold edit with no prediction edit at that location
    FalseMiss,
    /// Prediction edit with no gold edit at that location
    FalseRedundant,
}

/// Per-sample (or summed) classification counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditTally {
    pub tp: usize,
    pub fp: usize,
    pub fm: usize,
    pub fr: usize,
}

impl EditTally {
    pub fn record(&mut self, class: EditClass) {
        match class {
            EditClass::TruePositive => self.tp += 1,
            EditClass::FalsePositive => self.fp += 1,
            EditClass::FalseMiss => self.fm += 1,
            EditClass::FalseRedundant => self.fr += 1,
        }
    }

    /// Every gold edit, counted once: `tp + fp + fm`.
    pub fn gold_edits(&self) -> usize {
        self.tp + self.fp + self.fm
    }

    /// Every prediction edit, counted once: `tp + fp + fr`.
    pub fn predicted_edits(&self) -> usize {
        self.tp + self.fp + self.fr
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl FromIterator<EditClass> for EditTally {
    fn from_iter<I: IntoIterator<Item = EditClass>>(iter: I) -> Self {
        let mut tally = Self::default();
        for class in iter {
            tally.record(class);
        }
        tally
    }
}

impl AddAssign for EditTally {
    fn add_assign(&mut self, other: Self) {
        self.tp += other.tp;
        self.fp += other.fp;
        self.fm += other.fm;
        self.fr += other.fr;
    }
}

impl Add for EditTally {
    type Output = Self;

    fn add(mut self, other: Self) -> Self {
        self += other;
        self
    }
}

impl Sum for EditTally {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

/// Merge-join two span lists ordered by original offset.
///
/// Spans meet when their `orig_start` coincide; a meeting pair is a true
/// positive if the replacement text matches and a false positive otherwise.
/// A gold span that starts earlier is a miss, a prediction span that starts
/// earlier is redundant. Leftovers on either side are classified the same way.
pub fn classify_edits(gold: &[DifferenceSpan], predicted: &[DifferenceSpan]) -> Vec<EditClass> {
    let mut classes = Vec::with_capacity(gold.len() + predicted.len());
    let (mut i, mut j) = (0usize, 0usize);

    loop {
        let class = match (gold.get(i), predicted.get(j)) {
            (None, None) => break,
            (None, Some(_)) => {
                j += 1;
                EditClass::FalseRedundant
            }
            (Some(_), None) => {
                i += 1;
                EditClass::FalseMiss
            }
            (Some(g), Some(p)) if g.orig_start == p.orig_start => {
                i += 1;
                j += 1;
                if g.added == p.added {
                    EditClass::TruePositive
                } else {
                    EditClass::FalsePositive
                }
            }
            (Some(g), Some(p)) if g.orig_start < p.orig_start => {
                i += 1;
                EditClass::FalseMiss
            }
            (Some(_), Some(_)) => {
                j += 1;
                EditClass::FalseRedundant
            }
        };
        classes.push(class);
    }

    classes
}

/// Scores correction triples with a fixed alignment configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct Scorer {
    aligner: Aligner,
}

impl Scorer {
    pub fn new(aligner: Aligner) -> Self {
        Self { aligner }
    }

    pub fn aligner(&self) -> &Aligner {
        &self.aligner
    }

    /// Classify every edit of one `(original, gold, predicted)` triple.
    pub fn evaluate_sample(&self, original: &str, gold: &str, predicted: &str) -> EditTally {
        let gold_spans = self.aligner.find_differences(original, gold);
        let predicted_spans = self.aligner.find_differences(original, predicted);
        let tally: EditTally = classify_edits(&gold_spans, &predicted_spans).into_iter().collect();

        debug!(
            gold_spans = gold_spans.len(),
            predicted_spans = predicted_spans.len(),
            tp = tally.tp,
            fp = tally.fp,
            fm = tally.fm,
            fr = tally.fr,
            "Scored sample"
        );
        tally
    }
}

/// [`Scorer::evaluate_sample`] with the default merge window.
pub fn evaluate_sample(original: &str, gold: &str, predicted: &str) -> EditTally {
    Scorer::default().evaluate_sample(original, gold, predicted)
}
