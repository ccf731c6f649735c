//! # Property and Term Registry
//!
//! Single lookup surface for everything vocabulary-driven in the engine:
//!
//! - **Term tables**: natural-language trigger phrases for priority tiers
//!   and due-date buckets, built-in (English + Chinese) plus user extensions
//! - **Status categories**: canonical status keys with symbols, aliases,
//!   scores, sort ranks and trigger words
//! - **Syntax patterns**: the fixed explicit-syntax regexes
//! - **Correction dictionary**: the vocabulary the typo corrector snaps
//!   misspelled query tokens onto
//!
//! The registry is immutable once built. Merging built-in and user terms is
//! a pure function of the configuration, so two registries built from equal
//! configurations behave identically.

pub mod patterns;
pub mod status;
pub mod terms;

pub use status::{OTHER_CATEGORY, OTHER_CATEGORY_SCORE, StatusCategories, StatusCategory};
pub use terms::{DueBucket, PriorityTier, TermTables, UserTerms};

/// Immutable vocabulary registry shared by the parser and the scorer.
#[derive(Debug, Clone)]
pub struct TermRegistry {
    tables: TermTables,
    categories: StatusCategories,
    correction_dictionary: Vec<String>,
}

impl TermRegistry {
    /// Build a registry from user configuration.
    ///
    /// # Arguments
    ///
    /// * `user_terms` - Vocabulary extensions merged over the built-ins
    /// * `categories` - The status category set in effect
    pub fn new(user_terms: &UserTerms, categories: StatusCategories) -> Self {
        let tables = TermTables::merged(user_terms);
        let correction_dictionary = build_correction_dictionary(&tables, &categories);
        TermRegistry {
            tables,
            categories,
            correction_dictionary,
        }
    }

    /// Merged term tables.
    #[inline]
    pub fn tables(&self) -> &TermTables {
        &self.tables
    }

    /// Status category set.
    #[inline]
    pub fn categories(&self) -> &StatusCategories {
        &self.categories
    }

    /// Sorted dictionary for typo correction: syntax words, trigger words,
    /// status keys and aliases. ASCII-only; CJK queries are never corrected.
    #[inline]
    pub fn correction_dictionary(&self) -> &[String] {
        &self.correction_dictionary
    }

    /// Expand core keywords with configured synonyms.
    ///
    /// Returns the full keyword set: every core keyword followed by its
    /// expansions, deduplicated, core keywords always first so callers can
    /// weigh them separately.
    pub fn expand_keywords(&self, core: &[String]) -> Vec<String> {
        let mut all: Vec<String> = core.to_vec();
        for keyword in core {
            if let Some(expansions) = self.tables.synonyms_of(&keyword.to_lowercase()) {
                for expansion in expansions {
                    if !all.iter().any(|k| k.eq_ignore_ascii_case(expansion)) {
                        all.push(expansion.clone());
                    }
                }
            }
        }
        all
    }
}

impl Default for TermRegistry {
    fn default() -> Self {
        Self::new(&UserTerms::default(), StatusCategories::default())
    }
}

/// Fixed syntax vocabulary that should survive typo correction.
const SYNTAX_WORDS: &[&str] = &[
    "priority", "status", "due", "folder", "search", "before", "after", "from", "to",
];

fn build_correction_dictionary(tables: &TermTables, categories: &StatusCategories) -> Vec<String> {
    let mut dictionary: Vec<String> = SYNTAX_WORDS.iter().map(|s| s.to_string()).collect();
    for word in tables.correction_words() {
        if !dictionary.contains(&word) {
            dictionary.push(word);
        }
    }
    for word in categories.correction_words() {
        if !dictionary.contains(&word) {
            dictionary.push(word);
        }
    }
    // Deterministic lookup order so correction ties always break the same way.
    dictionary.sort();
    dictionary
}
