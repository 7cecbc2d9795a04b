// Token alignment between an original sentence and a corrected version of it.
// Produces the ordered difference spans the scorer walks.

use tracing::trace;

pub mod lcs;
pub mod spans;

pub use lcs::{lcs_table, longest_common_subsequence};
pub use spans::{merge_near_adjacent, raw_differences, DifferenceSpan};

/// Default near-adjacent merge window, in original-token positions.
pub const DEFAULT_MERGE_WINDOW: usize = 2;

/// Split text into whitespace-delimited tokens, borrowing from the input.
pub fn tokenize(text: &str) -> Vec<&str> {
    text.split_whitespace().collect()
}

/// Tokenize a possibly-missing cell; absent text is an empty sequence.
pub fn tokenize_opt(text: Option<&str>) -> Vec<&str> {
    text.map(tokenize).unwrap_or_default()
}

/// Span extraction with a fixed merge window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Aligner {
    merge_window: usize,
}

impl Default for Aligner {
    fn default() -> Self {
        Self::new(DEFAULT_MERGE_WINDOW)
    }
}

impl Aligner {
    pub fn new(merge_window: usize) -> Self {
        Self { merge_window }
    }

    pub fn merge_window(&self) -> usize {
        self.merge_window
    }

    /// Unmerged spans: one per gap between LCS anchors.
    pub fn raw_differences(&self, original: &str, corrected: &str) -> Vec<DifferenceSpan> {
        let original_tokens = tokenize(original);
        let corrected_tokens = tokenize(corrected);
        let lcs = longest_common_subsequence(&original_tokens, &corrected_tokens);
        raw_differences(&original_tokens, &corrected_tokens, &lcs)
    }

    /// Ordered, merged difference spans between `original` and `corrected`.
    pub fn find_differences(&self, original: &str, corrected: &str) -> Vec<DifferenceSpan> {
        let raw = self.raw_differences(original, corrected);
        let raw_count = raw.len();
        let merged = merge_near_adjacent(raw, self.merge_window);
        trace!(raw = raw_count, merged = merged.len(), "Computed difference spans");
        merged
    }
}

/// [`Aligner::find_differences`] with the default merge window.
pub fn find_differences(original: &str, corrected: &str) -> Vec<DifferenceSpan> {
    Aligner::default().find_differences(original, corrected)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_basic() {
        assert_eq!(tokenize("오늘 날씨가 좋다"), vec!["오늘", "날씨가", "좋다"]);
    }

    #[test]
    fn test_tokenize_degenerate_inputs() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   \t\n").is_empty());
        assert!(tokenize_opt(None).is_empty());
        assert_eq!(tokenize("안녕하세요"), vec!["안녕하세요"]);
        assert_eq!(tokenize_opt(Some(" a  b ")), vec!["a", "b"]);
    }

    #[test]
    fn test_identical_sentences_have_no_spans() {
        assert!(find_differences("오늘 날씨가 좋다", "오늘 날씨가 좋다").is_empty());
        assert!(find_differences("", "").is_empty());
    }

    #[test]
    fn test_single_word_change() {
        let spans = find_differences("오늘 날씨가 않좋다", "오늘 날씨가 안좋다");
        assert_eq!(
            spans,
            vec![DifferenceSpan {
                removed: "않좋다".to_string(),
                added: "안좋다".to_string(),
                orig_start: 2,
                orig_end: 3,
                corr_start: 2,
                corr_end: 3,
            }]
        );
    }

    #[test]
    fn test_word_insertion_and_deletion() {
        let inserted = find_differences("오늘 날씨가 좋다", "오늘 날씨가 매우 좋다");
        assert_eq!(inserted.len(), 1);
        assert_eq!(inserted[0].added, "매우");
        assert!(inserted[0].is_insertion());
        assert_eq!((inserted[0].orig_start, inserted[0].corr_end), (2, 3));

        let deleted = find_differences("오늘 날씨가 매우 좋다", "오늘 날씨가 좋다");
        assert_eq!(deleted.len(), 1);
        assert_eq!(deleted[0].removed, "매우");
        assert!(deleted[0].is_deletion());
    }

    #[test]
    fn test_disjoint_sentences_form_one_span() {
        let spans = find_differences("a b c", "d e");
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].removed, "a b c");
        assert_eq!(spans[0].added, "d e");
        assert_eq!((spans[0].orig_start, spans[0].orig_end), (0, 3));
        assert_eq!((spans[0].corr_start, spans[0].corr_end), (0, 2));
    }

    #[test]
    fn test_empty_original_is_pure_insertion() {
        let spans = find_differences("", "새 문장");
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].removed, "");
        assert_eq!(spans[0].added, "새 문장");
        assert_eq!((spans[0].orig_start, spans[0].orig_end), (0, 0));
    }

    #[test]
    fn test_empty_corrected_is_pure_deletion() {
        let spans = find_differences("지울 문장", "");
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].added, "");
        assert_eq!((spans[0].orig_start, spans[0].orig_end), (0, 2));
        assert!(spans[0].is_deletion());
    }

    #[test]
    fn test_near_adjacent_edits_merge() {
        let spans = find_differences("김치찌게 먹으러 갈려고", "김치찌개 먹으러 가려고");
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].removed, "김치찌게 갈려고");
        assert_eq!(spans[0].added, "김치찌개 가려고");
        assert_eq!((spans[0].orig_start, spans[0].orig_end), (0, 3));
    }

    #[test]
    fn test_distant_edits_stay_separate() {
        let spans = find_differences("a b c d e", "A b c d E");
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].orig_start, 0);
        assert_eq!(spans[1].orig_start, 4);
    }

    #[test]
    fn test_custom_window() {
        let aligner = Aligner::new(0);
        let spans = aligner.find_differences("김치찌게 먹으러 갈려고", "김치찌개 먹으러 가려고");
        assert_eq!(spans.len(), 2);
        assert_eq!(aligner.raw_differences("김치찌게 먹으러 갈려고", "김치찌개 먹으러 가려고"), spans);
    }

    #[test]
    fn test_tie_break_regression() {
        // "a b" -> "b a": the LCS is ["b"] (ties move left), giving a deletion
        // of "a" then an insertion of "a" that merge into one span.
        let aligner = Aligner::default();
        let raw = aligner.raw_differences("a b", "b a");
        assert_eq!(raw.len(), 2);
        assert_eq!((raw[0].removed.as_str(), raw[0].orig_start, raw[0].orig_end), ("a", 0, 1));
        assert_eq!((raw[1].added.as_str(), raw[1].orig_start, raw[1].corr_start), ("a", 2, 1));

        let merged = aligner.find_differences("a b", "b a");
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].removed, "a ");
        assert_eq!(merged[0].added, " a");
        assert_eq!((merged[0].orig_start, merged[0].orig_end), (0, 2));
        assert_eq!((merged[0].corr_start, merged[0].corr_end), (0, 2));
    }
}
