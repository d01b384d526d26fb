//! Matching-blocks string similarity.
//!
//! Implements the classic greedy matching-blocks ratio: find the longest
//! matching contiguous block between the two strings, recurse on the pieces
//! to its left and right, and normalize the total matched length by the
//! combined input length. The fill-in-blank and short-answer grading
//! thresholds (0.7 accept, 0.8 partial-credit multiplier) are calibrated to
//! this exact algorithm, so it must not be swapped for edit distance.

use std::collections::HashMap;

/// Similarity ratio between two strings in `[0, 1]`.
///
/// `ratio = 2 * matched / (len(a) + len(b))`, where `matched` is the total
/// length of the greedy non-overlapping matching blocks. Two empty strings
/// are considered identical (`1.0`). Symmetric and deterministic.
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() && b.is_empty() {
        return 1.0;
    }

    let matched = matched_len(&a, &b, 0, a.len(), 0, b.len());
    2.0 * matched as f64 / (a.len() + b.len()) as f64
}

/// Total matched length over `a[alo..ahi]` / `b[blo..bhi]`.
fn matched_len(a: &[char], b: &[char], alo: usize, ahi: usize, blo: usize, bhi: usize) -> usize {
    let (i, j, k) = longest_match(a, b, alo, ahi, blo, bhi);
    if k == 0 {
        return 0;
    }
    k + matched_len(a, b, alo, i, blo, j) + matched_len(a, b, i + k, ahi, j + k, bhi)
}

/// Longest matching contiguous block within the given windows.
///
/// Returns `(i, j, k)`: the block `a[i..i+k] == b[j..j+k]`. Ties resolve to
/// the block starting earliest in `a`, then earliest in `b`, which keeps the
/// recursion deterministic.
fn longest_match(
    a: &[char],
    b: &[char],
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let mut best = (alo, blo, 0usize);
    // j2len[j] = length of the longest run ending at a[i], b[j]
    let mut j2len: HashMap<usize, usize> = HashMap::new();

    for i in alo..ahi {
        let mut next: HashMap<usize, usize> = HashMap::new();
        for j in blo..bhi {
            if a[i] == b[j] {
                let k = j
                    .checked_sub(1)
                    .and_then(|prev| j2len.get(&prev))
                    .copied()
                    .unwrap_or(0)
                    + 1;
                next.insert(j, k);
                if k > best.2 {
                    best = (i + 1 - k, j + 1 - k, k);
                }
            }
        }
        j2len = next;
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_strings_are_one() {
        assert_eq!(ratio("photosynthesis", "photosynthesis"), 1.0);
        assert_eq!(ratio("a", "a"), 1.0);
    }

    #[test]
    fn both_empty_is_one() {
        assert_eq!(ratio("", ""), 1.0);
    }

    #[test]
    fn one_empty_is_zero() {
        assert_eq!(ratio("", "paris"), 0.0);
        assert_eq!(ratio("paris", ""), 0.0);
    }

    #[test]
    fn symmetric() {
        let pairs = [
            ("pari", "paris"),
            ("abcd", "bcde"),
            ("kitten", "sitting"),
            ("", "x"),
        ];
        for (a, b) in pairs {
            assert_eq!(ratio(a, b), ratio(b, a), "asymmetric for ({a}, {b})");
        }
    }

    #[test]
    fn bounded_zero_to_one() {
        let pairs = [("abc", "xyz"), ("hello world", "world hello"), ("a", "aa")];
        for (a, b) in pairs {
            let r = ratio(a, b);
            assert!((0.0..=1.0).contains(&r), "out of range for ({a}, {b}): {r}");
        }
    }

    #[test]
    fn near_miss_scores_high() {
        // "pari" vs "paris": matched block "pari" (4), ratio = 8/9
        let r = ratio("pari", "paris");
        assert!((r - 8.0 / 9.0).abs() < 1e-12, "got {r}");
        assert!(r >= 0.7);
    }

    #[test]
    fn disjoint_strings_score_zero() {
        assert_eq!(ratio("abc", "xyz"), 0.0);
    }

    #[test]
    fn recursive_blocks_accumulate() {
        // "abxcd" vs "abcd": blocks "ab" and "cd", matched = 4, ratio = 8/9
        let r = ratio("abxcd", "abcd");
        assert!((r - 8.0 / 9.0).abs() < 1e-12, "got {r}");
    }

    #[test]
    fn multibyte_chars_counted_per_char() {
        assert_eq!(ratio("héllo", "héllo"), 1.0);
        // one char of five differs: matched 4, ratio = 8/10
        let r = ratio("héllo", "hallo");
        assert!((r - 0.8).abs() < 1e-12, "got {r}");
    }
}
