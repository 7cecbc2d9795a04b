// Difference-span extraction: the three-pointer walk and near-adjacent merging.

use serde::{Deserialize, Serialize};

/// One contiguous edit between an original and a compared token sequence.
///
/// Offsets are half-open token ranges. `orig_*` index the original sequence,
/// `corr_*` index the compared (gold or predicted) one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifferenceSpan {
    /// Space-joined original tokens dropped at this point
    pub removed: String,
    /// Space-joined corrected tokens introduced at this point
    pub added: String,
    pub orig_start: usize,
    pub orig_end: usize,
    pub corr_start: usize,
    pub corr_end: usize,
}

impl DifferenceSpan {
    /// No original tokens removed.
    pub fn is_insertion(&self) -> bool {
        self.orig_start == self.orig_end
    }

    /// No corrected tokens added.
    pub fn is_deletion(&self) -> bool {
        self.corr_start == self.corr_end
    }

    /// Absorb `next` into this span: text is joined with a single space on
    /// both sides, ranges widen to cover both spans.
    fn absorb(&mut self, next: DifferenceSpan) {
        self.removed.push(' ');
        self.removed.push_str(&next.removed);
        self.added.push(' ');
        self.added.push_str(&next.added);
        self.orig_end = next.orig_end;
        self.corr_end = next.corr_end;
    }
}

/// Walk `original` and `corrected` against their common subsequence and emit
/// one span per gap between consecutive anchor tokens.
///
/// `lcs` must be a common subsequence of both sides. Tokens are matched
/// greedily to the next expected anchor, so the result is ordered by
/// `orig_start` and spans never overlap.
pub fn raw_differences(original: &[&str], corrected: &[&str], lcs: &[&str]) -> Vec<DifferenceSpan> {
    let (mut orig_idx, mut corr_idx, mut lcs_idx) = (0usize, 0usize, 0usize);
    let mut spans = Vec::new();

    while orig_idx < original.len() || corr_idx < corrected.len() {
        let anchor = lcs.get(lcs_idx).copied();
        let (orig_start, corr_start) = (orig_idx, corr_idx);

        while orig_idx < original.len() && Some(original[orig_idx]) != anchor {
            orig_idx += 1;
        }
        while corr_idx < corrected.len() && Some(corrected[corr_idx]) != anchor {
            corr_idx += 1;
        }

        if orig_idx > orig_start || corr_idx > corr_start {
            spans.push(DifferenceSpan {
                removed: original[orig_start..orig_idx].join(" "),
                added: corrected[corr_start..corr_idx].join(" "),
                orig_start,
                orig_end: orig_idx,
                corr_start,
                corr_end: corr_idx,
            });
        }

        if anchor.is_some() {
            lcs_idx += 1;
            orig_idx = (orig_idx + 1).min(original.len());
            corr_idx = (corr_idx + 1).min(corrected.len());
        }
    }

    spans
}

/// Collapse near-adjacent spans into single edits.
///
/// A span is folded into its predecessor when its `orig_start` lies within
/// `window` tokens of the previous *raw* span's `orig_start`, so chains of
/// close edits fold into one.
pub fn merge_near_adjacent(raw: Vec<DifferenceSpan>, window: usize) -> Vec<DifferenceSpan> {
    let mut merged: Vec<DifferenceSpan> = Vec::with_capacity(raw.len());
    let mut prev_start: Option<usize> = None;

    for span in raw {
        let start = span.orig_start;
        let fold = prev_start.is_some_and(|prev| start.saturating_sub(prev) <= window);
        prev_start = Some(start);

        match merged.last_mut() {
            Some(last) if fold => last.absorb(span),
            _ => merged.push(span),
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(removed: &str, added: &str, orig: (usize, usize), corr: (usize, usize)) -> DifferenceSpan {
        DifferenceSpan {
            removed: removed.to_string(),
            added: added.to_string(),
            orig_start: orig.0,
            orig_end: orig.1,
            corr_start: corr.0,
            corr_end: corr.1,
        }
    }

    #[test]
    fn test_raw_walk_substitution_and_insertion() {
        let original = ["a", "b", "c"];
        let corrected = ["a", "x", "b", "c", "d"];
        let lcs = ["a", "b", "c"];

        let spans = raw_differences(&original, &corrected, &lcs);
        assert_eq!(
            spans,
            vec![span("", "x", (1, 1), (1, 2)), span("", "d", (3, 3), (4, 5))]
        );
        assert!(spans[0].is_insertion());
        assert!(!spans[0].is_deletion());
    }

    #[test]
    fn test_raw_walk_deletion() {
        let spans = raw_differences(&["a", "b", "c"], &["a", "c"], &["a", "c"]);
        assert_eq!(spans, vec![span("b", "", (1, 2), (1, 1))]);
        assert!(spans[0].is_deletion());
    }

    #[test]
    fn test_merge_within_window() {
        let raw = vec![span("a", "A", (0, 1), (0, 1)), span("c", "C", (2, 3), (2, 3))];
        let merged = merge_near_adjacent(raw, 2);
        assert_eq!(merged, vec![span("a c", "A C", (0, 3), (0, 3))]);
    }

    #[test]
    fn test_merge_outside_window() {
        let raw = vec![span("a", "A", (0, 1), (0, 1)), span("d", "D", (3, 4), (3, 4))];
        let merged = merge_near_adjacent(raw.clone(), 2);
        assert_eq!(merged, raw);
    }

    #[test]
    fn test_merge_compares_against_previous_raw_start() {
        // 0 -> 2 -> 4: each hop is within the window, so the whole chain folds
        // even though 4 is further than 2 from the merged span's start.
        let raw = vec![
            span("a", "A", (0, 1), (0, 1)),
            span("c", "C", (2, 3), (2, 3)),
            span("e", "E", (4, 5), (4, 5)),
        ];
        let merged = merge_near_adjacent(raw, 2);
        assert_eq!(merged, vec![span("a c e", "A C E", (0, 5), (0, 5))]);
    }

    #[test]
    fn test_merge_keeps_separator_for_empty_side() {
        let raw = vec![span("a", "", (0, 1), (0, 0)), span("", "a", (2, 2), (1, 2))];
        let merged = merge_near_adjacent(raw, 2);
        assert_eq!(merged, vec![span("a ", " a", (0, 2), (0, 2))]);
    }

    #[test]
    fn test_zero_window_disables_merging() {
        let raw = vec![span("a", "A", (0, 1), (0, 1)), span("c", "C", (2, 3), (2, 3))];
        assert_eq!(merge_near_adjacent(raw.clone(), 0), raw);
    }
}
