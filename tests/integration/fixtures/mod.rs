// Test fixtures with known sentence triples and expected tallies
// WHY: Golden testing requires deterministic input/output pairs for validation

/// (original, gold, predicted, expected [tp, fp, fm, fr])
pub type Scenario = (&'static str, &'static str, &'static str, [usize; 4]);

/// Model applies the gold correction exactly
pub const EXACT_FIX: Scenario = (
    "오늘 날씨가 않좋다",
    "오늘 날씨가 안 좋다",
    "오늘 날씨가 안 좋다",
    [1, 0, 0, 0],
);

/// Model leaves a needed correction untouched
pub const MISSED_FIX: Scenario = (
    "오늘 날씨가 않좋다",
    "오늘 날씨가 안 좋다",
    "오늘 날씨가 않좋다",
    [0, 0, 1, 0],
);

/// Model rewrites a sentence that was already correct
pub const SPURIOUS_EDIT: Scenario = (
    "완벽한 문장입니다",
    "완벽한 문장입니다",
    "완벽한 문장이에요",
    [0, 0, 0, 1],
);

/// Model edits the right place with the wrong text
pub const WRONG_FIX: Scenario = (
    "나는 학교에 갔다 왔다",
    "나는 학교에 갔다가 왔다",
    "나는 학교에 갔었다 왔다",
    [0, 1, 0, 0],
);

/// Nothing to fix and nothing changed
pub const UNTOUCHED: Scenario = (
    "완벽한 문장입니다",
    "완벽한 문장입니다",
    "완벽한 문장입니다",
    [0, 0, 0, 0],
);

/// Two near-adjacent gold edits, merged into one span, both fixed
pub const MERGED_FIX: Scenario = (
    "김치찌게 먹으러 갈려고",
    "김치찌개 먹으러 가려고",
    "김치찌개 먹으러 가려고",
    [1, 0, 0, 0],
);

pub const ALL: [Scenario; 6] = [EXACT_FIX, MISSED_FIX, SPURIOUS_EDIT, WRONG_FIX, UNTOUCHED, MERGED_FIX];
