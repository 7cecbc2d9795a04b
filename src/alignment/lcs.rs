// Dense dynamic-programming LCS over token sequences.
// WHY: sentence inputs are tens of tokens, so the O(|A|*|B|) table is cheap.

/// LCS length table of shape `(|a|+1) x (|b|+1)`.
///
/// `table[i][j]` holds the LCS length of `a[..i]` and `b[..j]`.
pub fn lcs_table<T: PartialEq>(a: &[T], b: &[T]) -> Vec<Vec<usize>> {
    let mut table = vec![vec![0usize; b.len() + 1]; a.len() + 1];
    for i in 1..=a.len() {
        for j in 1..=b.len() {
            table[i][j] = if a[i - 1] == b[j - 1] {
                table[i - 1][j - 1] + 1
            } else {
                table[i - 1][j].max(table[i][j - 1])
            };
        }
    }
    table
}

/// Longest common subsequence of `a` and `b`, in left-to-right order.
///
/// Backtracks from `table[|a|][|b|]`. On a mismatch the walk moves up (drops
/// a token of `a`) only when that strictly keeps a longer subsequence; on a
/// tie it moves left and drops the token of `b` instead. The tie-break
/// decides span boundaries downstream, so it must not change silently.
pub fn longest_common_subsequence<'a>(a: &[&'a str], b: &[&'a str]) -> Vec<&'a str> {
    let table = lcs_table(a, b);
    let (mut i, mut j) = (a.len(), b.len());
    let mut lcs = Vec::with_capacity(table[i][j]);

    while i > 0 && j > 0 {
        if a[i - 1] == b[j - 1] {
            lcs.push(a[i - 1]);
            i -= 1;
            j -= 1;
        } else if table[i - 1][j] > table[i][j - 1] {
            i -= 1;
        } else {
            j -= 1;
        }
    }

    lcs.reverse();
    lcs
}
