//! # Query Parser
//!
//! Free text in, [`TaskFilter`] plus warnings out. The pipeline is fixed:
//! typo correction, explicit syntax extraction, natural-language fallback
//! for fields the explicit pass left empty, status resolution, then
//! positional keyword extraction over whatever text no step claimed.
//!
//! Every extractor records the byte spans it consumed so later steps
//! never re-interpret the same fragment: `folder:"urgent stuff"` does not
//! trigger the high-priority vocabulary, and `#p1` stays a tag.

use crate::query::ParseWarning;
use crate::query::dates;
use crate::query::filter::{
    DateRange, DueDateValue, OneOrMany, OperatorHints, PriorityFilter, PrioritySentinel,
    TaskFilter,
};
use crate::query::keywords;
use crate::query::typo;
use crate::registry::patterns;
use crate::registry::terms::{PRIORITY_LEVEL_MAX, PRIORITY_LEVEL_MIN, PriorityTier};
use crate::registry::TermRegistry;
use regex::Regex;

/// Result of parsing one query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedQuery {
    pub filter: TaskFilter,
    pub warnings: Vec<ParseWarning>,
}

/// Parses free-text queries against a vocabulary registry.
///
/// The parser is stateless and infallible: any input produces a filter,
/// and everything unparseable degrades to warnings.
pub struct QueryParser<'a> {
    registry: &'a TermRegistry,
    correct_typos: bool,
}

impl<'a> QueryParser<'a> {
    pub fn new(registry: &'a TermRegistry) -> Self {
        QueryParser {
            registry,
            correct_typos: true,
        }
    }

    /// Disable or re-enable typo correction (enabled by default).
    pub fn with_typo_correction(mut self, enabled: bool) -> Self {
        self.correct_typos = enabled;
        self
    }

    /// Parse a query into a structured filter.
    pub fn parse(&self, query: &str) -> ParsedQuery {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return ParsedQuery::default();
        }

        let corrected = if self.correct_typos {
            typo::correct_query(trimmed, self.registry.correction_dictionary())
        } else {
            trimmed.to_string()
        };
        let text = corrected.as_str();

        let mut consumed: Vec<(usize, usize)> = Vec::new();
        let mut warnings: Vec<ParseWarning> = Vec::new();
        let mut filter = TaskFilter::default();

        // Quoted forms first: their content must never feed other extractors.
        filter.folder = self.extract_folder_quoted(text, &mut consumed);
        let search_phrases = self.extract_search_phrases(text, &mut consumed);

        filter.due_date_range = self.extract_date_range(text, &mut consumed, &mut warnings);
        filter.tags = self.extract_tags(text, &mut consumed);
        filter.priority = self.extract_priority(text, &mut consumed, &mut warnings);
        let status_values = self.extract_status_values(text, &mut consumed);
        let due_values = self.extract_due_values(text, &mut consumed, &mut warnings);

        if filter.folder.is_none() {
            filter.folder = self.extract_folder_bare(text, &mut consumed);
        }
        let search_terms = self.extract_search_bare(text, &mut consumed);

        // Natural-language fallback, only for fields still empty. Runs
        // before the operator scan so "not done" is a status term, not a
        // `not` hint followed by a status term.
        let priority_levels = if filter.priority.is_none() {
            self.nl_priority(text, &mut consumed)
        } else {
            Vec::new()
        };
        if !priority_levels.is_empty() {
            filter.priority = Some(collapse_levels(priority_levels));
        }

        let mut due_values = due_values;
        if due_values.is_empty() {
            due_values = self.nl_due(text, &mut consumed);
        }
        filter.due_date = OneOrMany::from_vec(due_values);

        let mut status_values = status_values;
        if status_values.is_empty() {
            status_values = self.nl_status(text, &mut consumed);
        }
        filter.status = OneOrMany::from_vec(status_values);

        filter.operators = self.scan_operators(text, &mut consumed);

        warnings.extend(filter.normalize(self.registry.categories()));

        filter.keywords = keywords::extract_keywords(text, &consumed, self.registry.tables());
        for phrase in search_phrases.into_iter().chain(search_terms) {
            if !filter.keywords.iter().any(|k| *k == phrase) {
                filter.keywords.push(phrase);
            }
        }

        for warning in &warnings {
            tracing::warn!(query = %trimmed, warning = %warning, "query parse warning");
        }

        ParsedQuery { filter, warnings }
    }

    // ------------------------------------------------------------------
    // Explicit syntax
    // ------------------------------------------------------------------

    fn extract_folder_quoted(
        &self,
        text: &str,
        consumed: &mut Vec<(usize, usize)>,
    ) -> Option<String> {
        let mut folder = None;
        for caps in patterns::FOLDER_QUOTED.captures_iter(text) {
            let span = match_span(&caps);
            if overlaps(span, consumed) {
                continue;
            }
            consumed.push(span);
            let value = normalize_folder(&caps[1]);
            if folder.is_none() {
                folder = Some(value);
            } else {
                tracing::debug!(folder = %value, "extra folder scope ignored");
            }
        }
        folder
    }

    fn extract_folder_bare(
        &self,
        text: &str,
        consumed: &mut Vec<(usize, usize)>,
    ) -> Option<String> {
        let mut folder = None;
        for caps in patterns::FOLDER_BARE.captures_iter(text) {
            let span = match_span(&caps);
            if overlaps(span, consumed) {
                continue;
            }
            consumed.push(span);
            if folder.is_none() {
                folder = Some(normalize_folder(&caps[1]));
            }
        }
        folder
    }

    fn extract_search_phrases(
        &self,
        text: &str,
        consumed: &mut Vec<(usize, usize)>,
    ) -> Vec<String> {
        let mut phrases = Vec::new();
        for caps in patterns::SEARCH_QUOTED.captures_iter(text) {
            let span = match_span(&caps);
            if overlaps(span, consumed) {
                continue;
            }
            consumed.push(span);
            let phrase = caps[1].trim().to_lowercase();
            if !phrase.is_empty() {
                phrases.push(phrase);
            }
        }
        phrases
    }

    fn extract_search_bare(&self, text: &str, consumed: &mut Vec<(usize, usize)>) -> Vec<String> {
        let mut terms = Vec::new();
        for caps in patterns::SEARCH_BARE.captures_iter(text) {
            let span = match_span(&caps);
            if overlaps(span, consumed) {
                continue;
            }
            consumed.push(span);
            let term = caps[1].trim().to_lowercase();
            if !term.is_empty() {
                terms.push(term);
            }
        }
        terms
    }

    /// Date ranges follow a fixed precedence: `before`, then `after`, then
    /// `from..to`. Only the first pattern that matches defines the range;
    /// the spans of the others are still consumed so they never leak into
    /// keywords.
    fn extract_date_range(
        &self,
        text: &str,
        consumed: &mut Vec<(usize, usize)>,
        warnings: &mut Vec<ParseWarning>,
    ) -> Option<DateRange> {
        fn parse_bound(
            caps: &regex::Captures<'_>,
            idx: Option<usize>,
            warnings: &mut Vec<ParseWarning>,
        ) -> Option<chrono::NaiveDate> {
            let raw = &caps[idx?];
            match dates::parse_iso(raw) {
                Some(date) => Some(date),
                None => {
                    warnings.push(ParseWarning::MalformedDate {
                        raw: raw.to_string(),
                    });
                    None
                }
            }
        }

        let mut range: Option<DateRange> = None;
        for (pattern, start_idx, end_idx) in [
            (&patterns::RANGE_BEFORE, None, Some(1usize)),
            (&patterns::RANGE_AFTER, Some(1usize), None),
            (&patterns::RANGE_FROM_TO, Some(1usize), Some(2usize)),
        ] {
            let pattern: &Regex = pattern;
            let mut first_unconsumed = true;
            for caps in pattern.captures_iter(text) {
                let span = match_span(&caps);
                if overlaps(span, consumed) {
                    continue;
                }
                consumed.push(span);
                if first_unconsumed && range.is_none() {
                    let candidate = DateRange {
                        start: parse_bound(&caps, start_idx, warnings),
                        end: parse_bound(&caps, end_idx, warnings),
                    };
                    if !candidate.is_unbounded() {
                        range = Some(candidate);
                    }
                }
                first_unconsumed = false;
            }
        }

        range
    }

    fn extract_tags(&self, text: &str, consumed: &mut Vec<(usize, usize)>) -> Vec<String> {
        let mut tags: Vec<String> = Vec::new();
        for pattern in [&patterns::PROJECT_TAG, &patterns::TAG] {
            let pattern: &Regex = pattern;
            for caps in pattern.captures_iter(text) {
                let span = match_span(&caps);
                if overlaps(span, consumed) {
                    continue;
                }
                consumed.push(span);
                let tag = &caps[1];
                if !tags.iter().any(|t| t.eq_ignore_ascii_case(tag)) {
                    tags.push(tag.to_string());
                }
            }
        }
        tags
    }

    fn extract_priority(
        &self,
        text: &str,
        consumed: &mut Vec<(usize, usize)>,
        warnings: &mut Vec<ParseWarning>,
    ) -> Option<PriorityFilter> {
        let mut levels: Vec<u8> = Vec::new();
        let mut sentinel: Option<PrioritySentinel> = None;

        for caps in patterns::PRIORITY_FIELD.captures_iter(text) {
            let span = match_span(&caps);
            if overlaps(span, consumed) {
                continue;
            }
            consumed.push(span);
            for value in caps[1].split(',') {
                let value = value.trim();
                if value.is_empty() {
                    continue;
                }
                if let Some(parsed) = PrioritySentinel::parse_name(value) {
                    if let Some(previous) = sentinel {
                        if previous != parsed {
                            warnings.push(ParseWarning::ConflictingSentinels {
                                kept: parsed.as_str().to_string(),
                            });
                        }
                    }
                    sentinel = Some(parsed);
                } else if let Ok(level) = value.parse::<u8>() {
                    push_level(level, &mut levels, warnings);
                } else if let Some(tier) = PriorityTier::parse_name(value) {
                    push_level(tier.level(), &mut levels, warnings);
                } else {
                    tracing::warn!(value = %value, "unrecognized priority value ignored");
                }
            }
        }

        for caps in patterns::PRIORITY_SHORT.captures_iter(text) {
            let span = match_span(&caps);
            if overlaps(span, consumed) {
                continue;
            }
            consumed.push(span);
            if let Ok(level) = caps[1].parse::<u8>() {
                push_level(level, &mut levels, warnings);
            }
        }

        if !levels.is_empty() {
            if sentinel.is_some() {
                tracing::warn!("priority sentinel ignored in favor of explicit levels");
            }
            Some(collapse_levels(levels))
        } else {
            sentinel.map(PriorityFilter::Sentinel)
        }
    }

    fn extract_status_values(
        &self,
        text: &str,
        consumed: &mut Vec<(usize, usize)>,
    ) -> Vec<String> {
        let mut values = Vec::new();
        for caps in patterns::STATUS_FIELD.captures_iter(text) {
            let span = match_span(&caps);
            if overlaps(span, consumed) {
                continue;
            }
            consumed.push(span);
            for value in caps[1].split(',') {
                let value = value.trim();
                if !value.is_empty() {
                    values.push(value.to_string());
                }
            }
        }
        values
    }

    fn extract_due_values(
        &self,
        text: &str,
        consumed: &mut Vec<(usize, usize)>,
        warnings: &mut Vec<ParseWarning>,
    ) -> Vec<DueDateValue> {
        let mut values = Vec::new();
        for caps in patterns::DUE_FIELD.captures_iter(text) {
            let span = match_span(&caps);
            if overlaps(span, consumed) {
                continue;
            }
            consumed.push(span);
            for value in caps[1].split(',') {
                let value = value.trim();
                if value.is_empty() {
                    continue;
                }
                match dates::parse_due_value(value) {
                    Some(parsed) => values.push(parsed),
                    None => warnings.push(ParseWarning::MalformedDate {
                        raw: value.to_string(),
                    }),
                }
            }
        }
        values
    }

    fn scan_operators(&self, text: &str, consumed: &mut Vec<(usize, usize)>) -> OperatorHints {
        let mut hints = OperatorHints::default();
        for caps in patterns::OPERATOR_WORD.captures_iter(text) {
            let span = match_span(&caps);
            if overlaps(span, consumed) {
                continue;
            }
            consumed.push(span);
            match caps[1].to_lowercase().as_str() {
                "and" => hints.and = true,
                "or" => hints.or = true,
                "not" => hints.not = true,
                _ => {}
            }
        }
        hints
    }

    // ------------------------------------------------------------------
    // Natural-language fallback
    // ------------------------------------------------------------------

    fn nl_priority(&self, text: &str, consumed: &mut Vec<(usize, usize)>) -> Vec<u8> {
        let mut levels = Vec::new();
        for (tier, terms) in self.registry.tables().priority_terms() {
            for term in terms {
                if let Some(span) = find_term(text, term, consumed) {
                    consumed.push(span);
                    if !levels.contains(&tier.level()) {
                        levels.push(tier.level());
                    }
                    break;
                }
            }
        }
        levels
    }

    fn nl_due(&self, text: &str, consumed: &mut Vec<(usize, usize)>) -> Vec<DueDateValue> {
        let mut values = Vec::new();
        for (bucket, terms) in self.registry.tables().due_terms() {
            for term in terms {
                if let Some(span) = find_term(text, term, consumed) {
                    consumed.push(span);
                    let value = DueDateValue::Bucket(*bucket);
                    if !values.contains(&value) {
                        values.push(value);
                    }
                    break;
                }
            }
        }
        values
    }

    fn nl_status(&self, text: &str, consumed: &mut Vec<(usize, usize)>) -> Vec<String> {
        let mut keys: Vec<String> = Vec::new();
        for (term, key) in self.registry.categories().nl_terms() {
            if keys.iter().any(|k| k == key) {
                continue;
            }
            if let Some(span) = find_term(text, term, consumed) {
                consumed.push(span);
                keys.push(key.to_string());
            }
        }
        keys
    }
}

// ----------------------------------------------------------------------
// Helpers
// ----------------------------------------------------------------------

fn match_span(caps: &regex::Captures<'_>) -> (usize, usize) {
    let m = caps.get(0).expect("capture group 0 always exists");
    (m.start(), m.end())
}

#[inline]
fn overlaps(span: (usize, usize), ranges: &[(usize, usize)]) -> bool {
    ranges.iter().any(|&(s, e)| span.0 < e && s < span.1)
}

fn normalize_folder(value: &str) -> String {
    value.trim().trim_end_matches('/').to_string()
}

fn push_level(level: u8, levels: &mut Vec<u8>, warnings: &mut Vec<ParseWarning>) {
    if !(PRIORITY_LEVEL_MIN..=PRIORITY_LEVEL_MAX).contains(&level) {
        warnings.push(ParseWarning::PriorityOutOfRange { value: level });
    }
    if !levels.contains(&level) {
        levels.push(level);
    }
}

fn collapse_levels(levels: Vec<u8>) -> PriorityFilter {
    if levels.len() == 1 {
        PriorityFilter::Level(levels[0])
    } else {
        PriorityFilter::Levels(levels)
    }
}

/// Find the first case-insensitive, unconsumed occurrence of `term`.
///
/// Terms that start or end with an ASCII alphanumeric character require a
/// word boundary on that side, so "urgent" never fires inside
/// "insurgents". CJK terms match as plain substrings.
fn find_term(text: &str, term: &str, consumed: &[(usize, usize)]) -> Option<(usize, usize)> {
    let needle = term.to_lowercase();
    if needle.is_empty() {
        return None;
    }
    let mut pos = 0;
    loop {
        if let Some(end) = match_ci_at(text, pos, &needle) {
            if !overlaps((pos, end), consumed) && has_word_boundaries(text, pos, end, &needle) {
                return Some((pos, end));
            }
        }
        match text[pos..].chars().next() {
            Some(c) => pos += c.len_utf8(),
            None => return None,
        }
    }
}

/// Case-insensitive prefix match of `needle` (already lowercase) at a
/// byte position. Returns the end byte of the match.
fn match_ci_at(text: &str, start: usize, needle: &str) -> Option<usize> {
    let mut remaining = needle.chars().peekable();
    let mut end = start;
    for c in text[start..].chars() {
        if remaining.peek().is_none() {
            break;
        }
        for lowered in c.to_lowercase() {
            match remaining.peek() {
                Some(&expected) if expected == lowered => {
                    remaining.next();
                }
                // Mismatch, or the needle ends in the middle of this
                // character's lowercase expansion.
                _ => return None,
            }
        }
        end += c.len_utf8();
    }
    remaining.peek().is_none().then_some(end)
}

fn has_word_boundaries(text: &str, start: usize, end: usize, needle: &str) -> bool {
    let needs_left = needle.chars().next().map(|c| c.is_ascii_alphanumeric());
    let needs_right = needle.chars().last().map(|c| c.is_ascii_alphanumeric());

    if needs_left == Some(true) {
        if let Some(before) = text[..start].chars().next_back() {
            if before.is_ascii_alphanumeric() {
                return false;
            }
        }
    }
    if needs_right == Some(true) {
        if let Some(after) = text[end..].chars().next() {
            if after.is_ascii_alphanumeric() {
                return false;
            }
        }
    }
    true
}

// ============================================================================
// TESTS
// ============================================================================
