// Ratcliff/Obershelp string similarity.
//
// The ratio is `2 * M / (len_a + len_b)` where M is the total size of the
// matching blocks: the longest contiguous substring common to both inputs,
// found greedily, plus the matches found by recursing on the unmatched
// pieces to its left and right. Lengths are counted in chars.

/// Similarity between two strings in [0.0, 1.0].
///
/// Two empty strings are fully similar (1.0). The maximum-block search
/// breaks ties deterministically (earliest block in `a`, then in `b`), so
/// equal inputs always produce equal ratios.
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * matching_chars(&a, &b) as f64 / total as f64
}

/// Total size of the recursive matching blocks between `a` and `b`.
fn matching_chars(a: &[char], b: &[char]) -> usize {
    let (start_a, start_b, len) = longest_common_block(a, b);
    if len == 0 {
        return 0;
    }
    len + matching_chars(&a[..start_a], &b[..start_b])
        + matching_chars(&a[start_a + len..], &b[start_b + len..])
}

/// Longest contiguous block common to `a` and `b` as (start_a, start_b, len).
///
/// Ties on length resolve to the block appearing earliest in `a`, then
/// earliest in `b`.
fn longest_common_block(a: &[char], b: &[char]) -> (usize, usize, usize) {
    let mut best = (0, 0, 0);
    // prev[j] holds the common-suffix length ending at (i - 1, j - 1).
    let mut prev = vec![0usize; b.len()];
    let mut cur = vec![0usize; b.len()];
    for (i, &ca) in a.iter().enumerate() {
        for (j, &cb) in b.iter().enumerate() {
            if ca == cb {
                let run = if j > 0 { prev[j - 1] + 1 } else { 1 };
                cur[j] = run;
                if run > best.2 {
                    best = (i + 1 - run, j + 1 - run, run);
                }
            } else {
                cur[j] = 0;
            }
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    best
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
