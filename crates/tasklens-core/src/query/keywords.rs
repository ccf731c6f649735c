//! Positional keyword extraction.
//!
//! After explicit syntax and natural-language terms are consumed, the
//! leftover text becomes relevance keywords. Consumed fragments are only
//! stripped from the beginning and the end of the token list; a word in
//! the middle of the query survives even when it looks like syntax, so
//! "payment priority system" keeps all three words.
//!
//! Tokens are segmented script-aware: whitespace splits Latin text, CJK
//! runs are chunked into two-character words (tail merged), and mixed
//! tokens split at the script boundary. Segmentation artifacts are then
//! deduplicated: a CJK token is dropped when it is a substring of a
//! longer kept CJK token.

use crate::registry::TermTables;

/// Longest CJK run kept as a single keyword without chunking
const CJK_WHOLE_RUN_MAX: usize = 4;

/// Extract relevance keywords from a parsed query.
///
/// # Arguments
///
/// * `text` - The corrected query text
/// * `consumed` - Byte ranges claimed by syntax and term matches
/// * `tables` - Term tables providing the stop-word list
pub fn extract_keywords(
    text: &str,
    consumed: &[(usize, usize)],
    tables: &TermTables,
) -> Vec<String> {
    let tokens = span_tokens(text);
    let mut start = 0usize;
    let mut end = tokens.len();
    let mut prefix_pieces: Vec<&str> = Vec::new();
    let mut suffix_pieces: Vec<&str> = Vec::new();

    // Strip consumed tokens from the front; a partially consumed token
    // contributes its uncovered remainder and ends the strip.
    while start < end {
        let (s, e, _) = tokens[start];
        if !overlaps_any(s, e, consumed) {
            break;
        }
        let pieces = uncovered_pieces(text, s, e, consumed);
        start += 1;
        if !pieces.is_empty() {
            prefix_pieces = pieces;
            break;
        }
    }

    // Same from the back.
    while end > start {
        let (s, e, _) = tokens[end - 1];
        if !overlaps_any(s, e, consumed) {
            break;
        }
        let pieces = uncovered_pieces(text, s, e, consumed);
        end -= 1;
        if !pieces.is_empty() {
            suffix_pieces = pieces;
            break;
        }
    }

    let mut candidates: Vec<String> = Vec::new();
    for piece in prefix_pieces {
        candidates.extend(segment_token(piece));
    }
    for (_, _, token) in &tokens[start..end] {
        candidates.extend(segment_token(token));
    }
    for piece in suffix_pieces {
        candidates.extend(segment_token(piece));
    }

    candidates.retain(|token| !tables.is_stop_word(token));
    dedup_keywords(candidates)
}

/// Whitespace tokens with their byte spans.
fn span_tokens(text: &str) -> Vec<(usize, usize, &str)> {
    let mut tokens = Vec::new();
    let mut token_start: Option<usize> = None;
    for (offset, c) in text.char_indices() {
        if c.is_whitespace() {
            if let Some(start) = token_start.take() {
                tokens.push((start, offset, &text[start..offset]));
            }
        } else if token_start.is_none() {
            token_start = Some(offset);
        }
    }
    if let Some(start) = token_start {
        tokens.push((start, text.len(), &text[start..]));
    }
    tokens
}

#[inline]
fn overlaps_any(start: usize, end: usize, ranges: &[(usize, usize)]) -> bool {
    ranges.iter().any(|&(s, e)| start < e && s < end)
}

/// Sub-slices of `text[start..end]` not covered by any consumed range.
fn uncovered_pieces<'a>(
    text: &'a str,
    start: usize,
    end: usize,
    consumed: &[(usize, usize)],
) -> Vec<&'a str> {
    let mut covering: Vec<(usize, usize)> = consumed
        .iter()
        .filter(|&&(s, e)| start < e && s < end)
        .map(|&(s, e)| (s.max(start), e.min(end)))
        .collect();
    covering.sort_unstable();

    let mut pieces = Vec::new();
    let mut cursor = start;
    for (s, e) in covering {
        if s > cursor {
            pieces.push(&text[cursor..s]);
        }
        cursor = cursor.max(e);
    }
    if cursor < end {
        pieces.push(&text[cursor..end]);
    }
    pieces.retain(|p| !p.trim().is_empty());
    pieces
}

/// Split one token into keyword candidates, script-aware.
pub fn segment_token(token: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut run = String::new();
    let mut run_is_cjk = false;

    for c in token.chars() {
        let cjk = is_cjk(c);
        if !run.is_empty() && cjk != run_is_cjk {
            flush_run(&mut segments, &run, run_is_cjk);
            run.clear();
        }
        run_is_cjk = cjk;
        run.push(c);
    }
    if !run.is_empty() {
        flush_run(&mut segments, &run, run_is_cjk);
    }
    segments
}

fn flush_run(segments: &mut Vec<String>, run: &str, is_cjk_run: bool) {
    if is_cjk_run {
        segments.extend(chunk_cjk_run(run));
    } else {
        segments.push(run.to_lowercase());
    }
}

/// Chunk a CJK run into two-character words; an odd trailing character
/// merges into the last chunk rather than standing alone.
fn chunk_cjk_run(run: &str) -> Vec<String> {
    let chars: Vec<char> = run.chars().collect();
    if chars.len() <= CJK_WHOLE_RUN_MAX {
        return vec![run.to_string()];
    }
    let mut chunks = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let remaining = chars.len() - i;
        let take = if remaining == 3 { 3 } else { 2 };
        chunks.push(chars[i..i + take].iter().collect());
        i += take;
    }
    chunks
}

/// Whether a character belongs to the CJK scripts.
pub fn is_cjk(c: char) -> bool {
    matches!(c as u32,
        0x4E00..=0x9FFF      // CJK Unified Ideographs
        | 0x3400..=0x4DBF    // Extension A
        | 0xF900..=0xFAFF    // Compatibility Ideographs
        | 0x3040..=0x309F    // Hiragana
        | 0x30A0..=0x30FF    // Katakana
        | 0xAC00..=0xD7AF    // Hangul Syllables
    )
}

#[inline]
fn is_cjk_token(token: &str) -> bool {
    !token.is_empty() && token.chars().all(is_cjk)
}

/// Drop exact duplicates, and CJK tokens that are substrings of a longer
/// kept CJK token. Longer tokens win; original order is preserved.
fn dedup_keywords(candidates: Vec<String>) -> Vec<String> {
    let mut by_length: Vec<(usize, String)> = candidates.into_iter().enumerate().collect();
    by_length.sort_by_key(|(index, token)| (std::cmp::Reverse(token.chars().count()), *index));

    let mut kept: Vec<(usize, String)> = Vec::new();
    for (index, token) in by_length {
        if kept.iter().any(|(_, k)| *k == token) {
            continue;
        }
        if is_cjk_token(&token)
            && kept
                .iter()
                .any(|(_, k)| is_cjk_token(k) && k.contains(token.as_str()))
        {
            continue;
        }
        kept.push((index, token));
    }
    kept.sort_by_key(|(index, _)| *index);
    kept.into_iter().map(|(_, token)| token).collect()
}

// ============================================================================
// TESTS
// ============================================================================
