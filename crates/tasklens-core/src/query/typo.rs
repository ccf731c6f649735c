//! Typo correction for query tokens.
//!
//! Runs before any structural extraction so `"urgnt"` still triggers the
//! high-priority vocabulary and `"befor 2025-01-01"` still parses as a
//! range. Correction is conservative: only plain ASCII-alphabetic tokens
//! are candidates, with an edit budget that scales with token length. A
//! token that already is a dictionary word is left alone. CJK text is
//! never touched.

// ============================================================================
// CONSTANTS
// ============================================================================

/// Tokens shorter than this are never corrected
pub const MIN_CORRECTION_LEN: usize = 4;

/// Token length above which two edits are allowed instead of one
pub const TWO_EDIT_MIN_LEN: usize = 7;

/// Correct each token of `query` against the dictionary.
///
/// The dictionary must be sorted; ties on edit distance resolve to the
/// first (alphabetically smallest) entry so correction is deterministic.
/// Whitespace between tokens collapses to single spaces.
pub fn correct_query(query: &str, dictionary: &[String]) -> String {
    query
        .split_whitespace()
        .map(|token| correct_token(token, dictionary))
        .collect::<Vec<_>>()
        .join(" ")
}

fn correct_token<'a>(token: &'a str, dictionary: &'a [String]) -> &'a str {
    if !is_correctable(token) {
        return token;
    }
    let lowered = token.to_lowercase();
    if dictionary.binary_search(&lowered).is_ok() {
        return token;
    }

    let budget = edit_budget(lowered.chars().count());
    if budget == 0 {
        return token;
    }

    let mut best: Option<(usize, &str)> = None;
    for word in dictionary {
        if let Some(distance) = levenshtein_bounded(&lowered, word, budget) {
            if distance > 0 && best.map(|(d, _)| distance < d).unwrap_or(true) {
                best = Some((distance, word));
                if distance == 1 {
                    break;
                }
            }
        }
    }
    best.map(|(_, word)| word).unwrap_or(token)
}

#[inline]
fn is_correctable(token: &str) -> bool {
    token.chars().count() >= MIN_CORRECTION_LEN
        && token.chars().all(|c| c.is_ascii_alphabetic())
}

#[inline]
fn edit_budget(len: usize) -> usize {
    if len >= TWO_EDIT_MIN_LEN {
        2
    } else if len >= MIN_CORRECTION_LEN {
        1
    } else {
        0
    }
}

/// Levenshtein distance with an upper bound.
///
/// Single-row dynamic programming; bails out early once every cell of a
/// row exceeds `max`, and skips the computation entirely when the length
/// difference alone exceeds the bound. Returns `None` when the distance
/// is above `max`.
pub fn levenshtein_bounded(a: &str, b: &str, max: usize) -> Option<usize> {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let (a_len, b_len) = (a_chars.len(), b_chars.len());

    if a_len.abs_diff(b_len) > max {
        return None;
    }
    if a_len == 0 {
        return Some(b_len);
    }
    if b_len == 0 {
        return Some(a_len);
    }

    let mut row: Vec<usize> = (0..=b_len).collect();
    for (i, a_char) in a_chars.iter().enumerate() {
        let mut previous_diagonal = row[0];
        row[0] = i + 1;
        let mut row_min = row[0];
        for (j, b_char) in b_chars.iter().enumerate() {
            let cost = usize::from(a_char != b_char);
            let value = (previous_diagonal + cost)
                .min(row[j] + 1)
                .min(row[j + 1] + 1);
            previous_diagonal = row[j + 1];
            row[j + 1] = value;
            row_min = row_min.min(value);
        }
        if row_min > max {
            return None;
        }
    }
    (row[b_len] <= max).then_some(row[b_len])
}

// ============================================================================
// TESTS
// ============================================================================
