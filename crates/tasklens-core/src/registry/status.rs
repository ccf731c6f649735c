//! # Status Categories
//!
//! Canonical status categories and the resolution of raw status values
//! (checkbox symbols, aliases, natural-language words) onto them.
//!
//! Categories are configuration, not a closed enum: users add their own
//! (e.g. "waiting", "delegated") and every category carries its checkbox
//! symbols, a scoring weight, a sort rank, and its trigger vocabulary.
//! A built-in catch-all category absorbs symbols nothing else claims.

use serde::{Deserialize, Serialize};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Key of the built-in catch-all category for unrecognized symbols
pub const OTHER_CATEGORY: &str = "other";

/// Score assigned to statuses that fall through to the catch-all
pub const OTHER_CATEGORY_SCORE: f64 = 0.5;

/// Sort rank assigned to the catch-all (sorts after every built-in)
pub const OTHER_CATEGORY_RANK: u32 = 99;

// ============================================================================
// STATUS CATEGORY
// ============================================================================

/// One status category with everything resolution, scoring and sorting need.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct StatusCategory {
    /// Canonical key ("open", "in_progress", ...)
    pub key: String,
    /// Checkbox symbols that resolve to this category (" ", "x", "/", ...)
    pub symbols: Vec<String>,
    /// Score contributed when the status dimension is active
    pub score: f64,
    /// Sort rank, lower sorts first
    pub rank: u32,
    /// Alternative keys accepted in explicit `status:` values
    pub aliases: Vec<String>,
    /// Natural-language trigger words for the fallback parser
    pub terms: Vec<String>,
}

impl Default for StatusCategory {
    fn default() -> Self {
        StatusCategory {
            key: String::new(),
            symbols: Vec::new(),
            score: OTHER_CATEGORY_SCORE,
            rank: OTHER_CATEGORY_RANK,
            aliases: Vec::new(),
            terms: Vec::new(),
        }
    }
}

impl StatusCategory {
    fn new(
        key: &str,
        symbols: &[&str],
        score: f64,
        rank: u32,
        aliases: &[&str],
        terms: &[&str],
    ) -> Self {
        StatusCategory {
            key: key.to_string(),
            symbols: symbols.iter().map(|s| s.to_string()).collect(),
            score,
            rank,
            aliases: aliases.iter().map(|s| s.to_string()).collect(),
            terms: terms.iter().map(|s| s.to_string()).collect(),
        }
    }
}

// ============================================================================
// STATUS CATEGORY SET
// ============================================================================

/// Ordered set of status categories.
///
/// Resolution order is declaration order, and the first category claiming a
/// symbol or alias wins. The catch-all is always present and always last.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusCategories {
    categories: Vec<StatusCategory>,
}

impl Default for StatusCategories {
    fn default() -> Self {
        StatusCategories {
            categories: vec![
                StatusCategory::new(
                    "open",
                    &[" ", ""],
                    1.0,
                    0,
                    &["todo", "pending", "incomplete"],
                    &["todo", "open", "not done", "待办", "未完成"],
                ),
                StatusCategory::new(
                    "in_progress",
                    &["/", ">"],
                    0.9,
                    1,
                    &["doing", "in-progress", "inprogress", "wip", "started"],
                    &["in progress", "doing", "ongoing", "进行中", "正在做"],
                ),
                StatusCategory::new(
                    "completed",
                    &["x", "X"],
                    0.2,
                    2,
                    &["done", "complete", "finished", "closed"],
                    &["done", "completed", "finished", "已完成", "完成了"],
                ),
                StatusCategory::new(
                    "cancelled",
                    &["-", "~"],
                    0.1,
                    3,
                    &["canceled", "dropped", "abandoned", "wont-do"],
                    &["cancelled", "canceled", "dropped", "已取消", "取消了"],
                ),
                StatusCategory::new(OTHER_CATEGORY, &[], OTHER_CATEGORY_SCORE, OTHER_CATEGORY_RANK, &[], &[]),
            ],
        }
    }
}

impl StatusCategories {
    /// Build from configured categories.
    ///
    /// User categories replace the built-in set entirely (the configuration
    /// is the whole truth), except that the catch-all is appended when
    /// missing. Duplicate symbol claims keep the first category and log the
    /// loser, so resolution stays unambiguous.
    pub fn from_config(mut categories: Vec<StatusCategory>) -> Self {
        if categories.is_empty() {
            return Self::default();
        }

        let mut seen_symbols: Vec<String> = Vec::new();
        for category in &mut categories {
            category.symbols.retain(|sym| {
                if seen_symbols.iter().any(|s| s == sym) {
                    tracing::warn!(
                        symbol = %sym,
                        category = %category.key,
                        "status symbol already claimed by an earlier category"
                    );
                    false
                } else {
                    seen_symbols.push(sym.clone());
                    true
                }
            });
        }

        if !categories.iter().any(|c| c.key == OTHER_CATEGORY) {
            categories.push(StatusCategory {
                key: OTHER_CATEGORY.to_string(),
                ..StatusCategory::default()
            });
        }

        StatusCategories { categories }
    }

    /// All categories in declaration order.
    #[inline]
    pub fn all(&self) -> &[StatusCategory] {
        &self.categories
    }

    /// Look up a category by canonical key.
    pub fn get(&self, key: &str) -> Option<&StatusCategory> {
        self.categories.iter().find(|c| c.key == key)
    }

    /// Resolve any raw status value (key, alias or checkbox symbol) to a
    /// canonical category key. Comparison is case-insensitive for keys and
    /// aliases, exact for symbols (`x` and `X` are distinct symbols).
    pub fn resolve(&self, value: &str) -> Option<&str> {
        let lowered = value.to_lowercase();
        for category in &self.categories {
            if category.key.to_lowercase() == lowered
                || category.aliases.iter().any(|a| a.to_lowercase() == lowered)
                || category.symbols.iter().any(|s| s == value)
            {
                return Some(&category.key);
            }
        }
        None
    }

    /// Resolve a checkbox symbol to its category key, falling back to the
    /// catch-all for symbols no category claims.
    pub fn resolve_symbol(&self, symbol: &str) -> &str {
        self.categories
            .iter()
            .find(|c| c.symbols.iter().any(|s| s == symbol))
            .map(|c| c.key.as_str())
            .unwrap_or(OTHER_CATEGORY)
    }

    /// Scoring weight of a category key. Unknown keys score like the
    /// catch-all so a stale filter can never poison a ranking.
    pub fn score_of(&self, key: &str) -> f64 {
        self.get(key)
            .map(|c| c.score)
            .unwrap_or(OTHER_CATEGORY_SCORE)
    }

    /// Sort rank of a category key, lower sorts first.
    pub fn rank_of(&self, key: &str) -> u32 {
        self.get(key).map(|c| c.rank).unwrap_or(OTHER_CATEGORY_RANK)
    }

    /// Natural-language trigger words across all categories, paired with
    /// the category key they resolve to. Longest term first per category.
    pub fn nl_terms(&self) -> Vec<(&str, &str)> {
        let mut pairs: Vec<(&str, &str)> = self
            .categories
            .iter()
            .flat_map(|c| c.terms.iter().map(move |t| (t.as_str(), c.key.as_str())))
            .collect();
        pairs.sort_by_key(|(term, _)| std::cmp::Reverse(term.chars().count()));
        pairs
    }

    /// Single-word ASCII vocabulary for the typo-correction dictionary.
    pub fn correction_words(&self) -> Vec<String> {
        let mut words = Vec::new();
        for category in &self.categories {
            let candidates = std::iter::once(&category.key)
                .chain(category.aliases.iter())
                .chain(category.terms.iter());
            for value in candidates {
                for word in value.split(|c: char| c.is_whitespace() || c == '_' || c == '-') {
                    if !word.is_empty() && word.chars().all(|c| c.is_ascii_alphabetic()) {
                        let lowered = word.to_lowercase();
                        if !words.contains(&lowered) {
                            words.push(lowered);
                        }
                    }
                }
            }
        }
        words
    }
}

// ============================================================================
// TESTS
// ============================================================================
