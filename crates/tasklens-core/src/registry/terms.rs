//! # Term Tables
//!
//! Built-in natural-language trigger terms for priority tiers and due-date
//! buckets, plus the pure merge of user-configured terms on top of them.
//!
//! Terms are plain substrings matched case-insensitively against the query
//! text, so multi-word entries ("high priority", "past due") work without
//! any tokenization. English and Chinese ship built in; every table accepts
//! user extensions for other languages.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Priority level assigned when a high-tier term matches
pub const PRIORITY_LEVEL_HIGH: u8 = 1;

/// Priority level assigned when a medium-tier term matches
pub const PRIORITY_LEVEL_MEDIUM: u8 = 2;

/// Priority level assigned when a low-tier term matches
pub const PRIORITY_LEVEL_LOW: u8 = 3;

/// Lowest priority level accepted by explicit syntax (`p1`)
pub const PRIORITY_LEVEL_MIN: u8 = 1;

/// Highest priority level accepted by explicit syntax (`p4`)
pub const PRIORITY_LEVEL_MAX: u8 = 4;

// ============================================================================
// PRIORITY TIERS
// ============================================================================

/// Natural-language priority tier.
///
/// Trigger phrases map to a tier rather than to a numeric level directly,
/// so user-configured vocabularies only need to name the tier they extend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriorityTier {
    /// Urgent/important work, maps to level 1
    High,
    /// Routine work, maps to level 2
    Medium,
    /// Background work, maps to level 3
    Low,
}

impl PriorityTier {
    /// The numeric priority level this tier resolves to.
    #[inline]
    pub fn level(&self) -> u8 {
        match self {
            PriorityTier::High => PRIORITY_LEVEL_HIGH,
            PriorityTier::Medium => PRIORITY_LEVEL_MEDIUM,
            PriorityTier::Low => PRIORITY_LEVEL_LOW,
        }
    }

    /// String name used in configuration files.
    pub fn as_str(&self) -> &'static str {
        match self {
            PriorityTier::High => "high",
            PriorityTier::Medium => "medium",
            PriorityTier::Low => "low",
        }
    }

    /// Parse a tier from its configuration name.
    pub fn parse_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "high" => Some(PriorityTier::High),
            "medium" | "normal" => Some(PriorityTier::Medium),
            "low" => Some(PriorityTier::Low),
            _ => None,
        }
    }
}

impl fmt::Display for PriorityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// DUE-DATE BUCKETS
// ============================================================================

/// Relative due-date bucket.
///
/// Buckets are resolved against "today" at match time, never at parse time,
/// so a parsed filter stays valid across midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DueBucket {
    /// Due exactly today
    Today,
    /// Due exactly tomorrow
    Tomorrow,
    /// Due strictly before today
    Overdue,
    /// Due within the next 7 days (today inclusive)
    Week,
    /// Due 8 to 14 days out
    NextWeek,
    /// Due strictly after today
    Future,
    /// No due date at all
    NoDate,
}

impl DueBucket {
    /// String name used in explicit `due:` values and configuration files.
    pub fn as_str(&self) -> &'static str {
        match self {
            DueBucket::Today => "today",
            DueBucket::Tomorrow => "tomorrow",
            DueBucket::Overdue => "overdue",
            DueBucket::Week => "week",
            DueBucket::NextWeek => "next-week",
            DueBucket::Future => "future",
            DueBucket::NoDate => "none",
        }
    }

    /// Parse a bucket from an explicit `due:` value or configuration name.
    pub fn parse_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "today" => Some(DueBucket::Today),
            "tomorrow" => Some(DueBucket::Tomorrow),
            "overdue" | "late" => Some(DueBucket::Overdue),
            "week" | "this-week" => Some(DueBucket::Week),
            "next-week" | "nextweek" => Some(DueBucket::NextWeek),
            "future" | "later" => Some(DueBucket::Future),
            "none" | "no-date" => Some(DueBucket::NoDate),
            _ => None,
        }
    }
}

impl fmt::Display for DueBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// TERM TABLES
// ============================================================================

/// Merged trigger-term tables used by the natural-language fallback.
///
/// Order inside each tier/bucket list is match order; longer phrases are
/// sorted first so "next week" wins over "week" when both would match.
#[derive(Debug, Clone)]
pub struct TermTables {
    priority: Vec<(PriorityTier, Vec<String>)>,
    due: Vec<(DueBucket, Vec<String>)>,
    stop_words: HashSet<String>,
    synonyms: HashMap<String, Vec<String>>,
}

impl TermTables {
    /// Built-in tables only (English + Chinese).
    pub fn builtin() -> Self {
        let priority = vec![
            (
                PriorityTier::High,
                string_vec(&[
                    "high priority",
                    "highest priority",
                    "urgent",
                    "critical",
                    "important",
                    "asap",
                    "高优先级",
                    "最高优先级",
                    "紧急",
                    "重要",
                    "加急",
                ]),
            ),
            (
                PriorityTier::Medium,
                string_vec(&[
                    "medium priority",
                    "normal priority",
                    "中优先级",
                    "普通优先级",
                ]),
            ),
            (
                PriorityTier::Low,
                string_vec(&[
                    "low priority",
                    "lowest priority",
                    "minor",
                    "someday",
                    "低优先级",
                    "不急",
                    "不重要",
                ]),
            ),
        ];

        let due = vec![
            (DueBucket::NextWeek, string_vec(&["next week", "下周", "下个星期"])),
            (
                DueBucket::Week,
                string_vec(&["this week", "within a week", "本周", "这周", "这个星期"]),
            ),
            (
                DueBucket::Overdue,
                string_vec(&["overdue", "past due", "expired", "过期", "逾期", "超期"]),
            ),
            (DueBucket::Today, string_vec(&["today", "due now", "今天", "今日"])),
            (DueBucket::Tomorrow, string_vec(&["tomorrow", "明天", "明日"])),
            (
                DueBucket::Future,
                string_vec(&["in the future", "upcoming", "以后", "将来", "未来"]),
            ),
            (DueBucket::NoDate, string_vec(&["no due date", "没有截止日期", "无截止"])),
        ];

        let stop_words = [
            // English
            "a", "an", "the", "and", "or", "not", "of", "to", "from", "in", "on",
            "for", "with", "at", "by", "is", "are", "was", "be", "this", "that",
            "my", "me", "all", "show", "find", "list", "tasks", "task",
            // Chinese
            "的", "了", "和", "是", "在", "我", "有", "个", "这", "那", "吗", "请",
            "任务", "所有",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        let mut tables = TermTables {
            priority,
            due,
            stop_words,
            synonyms: HashMap::new(),
        };
        tables.sort_for_matching();
        tables
    }

    /// Pure merge of user-configured terms on top of the built-in tables.
    ///
    /// User terms extend the built-ins; they never replace them. Unknown tier
    /// or bucket names are skipped with a warning rather than failing the
    /// whole configuration.
    pub fn merged(user: &UserTerms) -> Self {
        let mut tables = Self::builtin();

        for (name, terms) in &user.priority_terms {
            match PriorityTier::parse_name(name) {
                Some(tier) => {
                    if let Some((_, list)) = tables.priority.iter_mut().find(|(t, _)| *t == tier) {
                        extend_unique(list, terms);
                    }
                }
                None => {
                    tracing::warn!(tier = %name, "ignoring terms for unknown priority tier");
                }
            }
        }

        for (name, terms) in &user.due_terms {
            match DueBucket::parse_name(name) {
                Some(bucket) => {
                    if let Some((_, list)) = tables.due.iter_mut().find(|(b, _)| *b == bucket) {
                        extend_unique(list, terms);
                    }
                }
                None => {
                    tracing::warn!(bucket = %name, "ignoring terms for unknown due bucket");
                }
            }
        }

        for word in &user.stop_words {
            tables.stop_words.insert(word.to_lowercase());
        }

        for (keyword, expansions) in &user.keyword_synonyms {
            let entry = tables.synonyms.entry(keyword.to_lowercase()).or_default();
            extend_unique(entry, expansions);
        }

        tables.sort_for_matching();
        tables
    }

    /// Priority tiers with their trigger phrases, longest phrase first.
    #[inline]
    pub fn priority_terms(&self) -> &[(PriorityTier, Vec<String>)] {
        &self.priority
    }

    /// Due buckets with their trigger phrases, longest phrase first.
    #[inline]
    pub fn due_terms(&self) -> &[(DueBucket, Vec<String>)] {
        &self.due
    }

    /// Whether a token is a stop word (expects lowercase input).
    #[inline]
    pub fn is_stop_word(&self, token: &str) -> bool {
        self.stop_words.contains(token)
    }

    /// Configured synonym expansions for a keyword, if any.
    #[inline]
    pub fn synonyms_of(&self, keyword: &str) -> Option<&[String]> {
        self.synonyms.get(keyword).map(|v| v.as_slice())
    }

    /// Every single-word ASCII term across all tables.
    ///
    /// This feeds the typo-correction dictionary; multi-word phrases are
    /// contributed word by word so "past due" can fix "pst due".
    pub fn correction_words(&self) -> HashSet<String> {
        let mut words = HashSet::new();
        let all_terms = self
            .priority
            .iter()
            .flat_map(|(_, terms)| terms.iter())
            .chain(self.due.iter().flat_map(|(_, terms)| terms.iter()));
        for term in all_terms {
            for word in term.split_whitespace() {
                if word.is_ascii() && word.chars().all(|c| c.is_ascii_alphabetic()) {
                    words.insert(word.to_lowercase());
                }
            }
        }
        words
    }

    fn sort_for_matching(&mut self) {
        for (_, terms) in &mut self.priority {
            terms.sort_by_key(|t| std::cmp::Reverse(t.chars().count()));
        }
        for (_, terms) in &mut self.due {
            terms.sort_by_key(|t| std::cmp::Reverse(t.chars().count()));
        }
    }
}

impl Default for TermTables {
    fn default() -> Self {
        Self::builtin()
    }
}

// ============================================================================
// USER CONFIGURATION
// ============================================================================

/// User-configured term extensions, as loaded from configuration.
///
/// Every field defaults to empty so a missing section degrades to the
/// built-in vocabulary.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct UserTerms {
    /// Extra trigger phrases per priority tier name ("high", "medium", "low")
    pub priority_terms: HashMap<String, Vec<String>>,
    /// Extra trigger phrases per due bucket name ("today", "overdue", ...)
    pub due_terms: HashMap<String, Vec<String>>,
    /// Extra stop words removed from extracted keywords
    pub stop_words: Vec<String>,
    /// Keyword synonym expansions used by relevance scoring
    pub keyword_synonyms: HashMap<String, Vec<String>>,
}

impl UserTerms {
    /// True when no extension is configured at all.
    pub fn is_empty(&self) -> bool {
        self.priority_terms.is_empty()
            && self.due_terms.is_empty()
            && self.stop_words.is_empty()
            && self.keyword_synonyms.is_empty()
    }
}

fn string_vec(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn extend_unique(list: &mut Vec<String>, extra: &[String]) {
    for term in extra {
        let lowered = term.to_lowercase();
        if !lowered.is_empty() && !list.iter().any(|t| *t == lowered) {
            list.push(lowered);
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
