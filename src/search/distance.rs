//! Levenshtein edit distance and the similarity ratio derived from it.

/// Minimum number of single-character insertions, deletions or substitutions
/// that turn `a` into `b`.
///
/// Characters are Unicode scalar values, so `"café"` and `"cafe"` are one edit
/// apart. Only two rows of the DP table are kept alive at a time.
pub fn distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    // prev[j] holds the distance between a[..i-1] and b[..j]
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1) // deletion
                .min(curr[j] + 1) // insertion
                .min(prev[j] + cost); // substitution or match
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Similarity ratio in `[0.0, 1.0]`, where 1.0 means identical.
///
/// Computed as `(max_len - distance) / max_len`. Two empty strings are
/// considered a full match.
pub fn similarity(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }

    (max_len - distance(a, b)) as f64 / max_len as f64
}
