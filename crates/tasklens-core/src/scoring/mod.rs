//! # Scoring Engine
//!
//! Pure functions computing four independent component scores per task
//! (relevance, due date, priority, status) and combining them into one
//! final score via user-configurable coefficients.
//!
//! A dimension only contributes when it is *active*: mentioned in the
//! structured filter or present in the configured sort order. An inactive
//! dimension multiplies to zero, so a property the user never asked about
//! cannot silently reorder results.
//!
//! Everything here is synchronous and side-effect free; "today" is always
//! passed in, never read from the clock.

use crate::registry::StatusCategories;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Days after today still counted as "due within a week"
pub const DUE_WEEK_WINDOW_DAYS: i64 = 7;

/// Days after today still counted as "due within a month"
pub const DUE_MONTH_WINDOW_DAYS: i64 = 30;

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Banded due-date urgency scores. Every band is independently
/// configurable; defaults keep the natural ordering
/// overdue > week > month > later > none.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DueDateBands {
    pub overdue: f64,
    pub due_within_week: f64,
    pub due_within_month: f64,
    pub due_later: f64,
    pub no_due_date: f64,
}

impl Default for DueDateBands {
    fn default() -> Self {
        DueDateBands {
            overdue: 1.0,
            due_within_week: 0.8,
            due_within_month: 0.5,
            due_later: 0.3,
            no_due_date: 0.1,
        }
    }
}

/// Per-level priority scores, plus a distinct score for "no priority"
/// that sits below all four levels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PriorityBands {
    pub p1: f64,
    pub p2: f64,
    pub p3: f64,
    pub p4: f64,
    pub none: f64,
}

impl Default for PriorityBands {
    fn default() -> Self {
        PriorityBands {
            p1: 1.0,
            p2: 0.75,
            p3: 0.5,
            p4: 0.25,
            none: 0.1,
        }
    }
}

/// Scoring coefficients and band tables.
///
/// Coefficients weigh whole dimensions against each other;
/// `core_keyword_weight` weighs original query keywords against synonym
/// expansions inside the relevance component.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScoreWeights {
    pub relevance: f64,
    pub due_date: f64,
    pub priority: f64,
    pub status: f64,
    pub core_keyword_weight: f64,
    pub due_bands: DueDateBands,
    pub priority_bands: PriorityBands,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        ScoreWeights {
            relevance: 1.0,
            due_date: 0.8,
            priority: 0.6,
            status: 0.4,
            core_keyword_weight: 2.0,
            due_bands: DueDateBands::default(),
            priority_bands: PriorityBands::default(),
        }
    }
}

// ============================================================================
// KEYWORD SETS
// ============================================================================

/// Core query keywords plus their synonym expansions, pre-lowercased.
///
/// Relevance normalizes both the core and the expanded match ratio by the
/// *core* count, so adding synonyms can never dilute a score.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeywordSets {
    core: Vec<String>,
    all: Vec<String>,
}

impl KeywordSets {
    pub fn new(core: Vec<String>, all: Vec<String>) -> Self {
        KeywordSets {
            core: core.into_iter().map(|k| k.to_lowercase()).collect(),
            all: all.into_iter().map(|k| k.to_lowercase()).collect(),
        }
    }

    /// Keyword set without synonym expansion.
    pub fn from_core(core: Vec<String>) -> Self {
        let all = core.clone();
        Self::new(core, all)
    }

    #[inline]
    pub fn core(&self) -> &[String] {
        &self.core
    }

    #[inline]
    pub fn all(&self) -> &[String] {
        &self.all
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.core.is_empty()
    }
}

// ============================================================================
// COMPONENT SCORES
// ============================================================================

/// The four component scores of one task plus their weighted combination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentScores {
    pub relevance: f64,
    pub due_date: f64,
    pub priority: f64,
    pub status: f64,
    pub final_score: f64,
}

/// Which scoring dimensions are allowed to contribute.
///
/// A dimension is active when the structured filter mentions it or when
/// it appears in the configured sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveDimensions {
    pub relevance: bool,
    pub due_date: bool,
    pub priority: bool,
    pub status: bool,
}

impl ActiveDimensions {
    /// Every dimension contributes. Useful for standalone scoring.
    pub const ALL: ActiveDimensions = ActiveDimensions {
        relevance: true,
        due_date: true,
        priority: true,
        status: true,
    };
}

// ============================================================================
// COMPONENT FUNCTIONS
// ============================================================================

/// Keyword relevance of a task text.
///
/// `coreRatio * coreWeight + allRatio`, where both ratios divide by the
/// core keyword count (minimum 1). Matching is case-insensitive
/// substring containment.
pub fn relevance_score(text: &str, keywords: &KeywordSets, core_weight: f64) -> f64 {
    if keywords.core.is_empty() {
        return 0.0;
    }
    let haystack = text.to_lowercase();
    let matched = |set: &[String]| {
        set.iter()
            .filter(|keyword| haystack.contains(keyword.as_str()))
            .count() as f64
    };
    let core_count = keywords.core.len().max(1) as f64;
    let core_ratio = matched(&keywords.core) / core_count;
    let all_ratio = matched(&keywords.all) / core_count;
    core_ratio * core_weight + all_ratio
}

/// Banded due-date urgency.
pub fn due_date_score(due: Option<NaiveDate>, today: NaiveDate, bands: &DueDateBands) -> f64 {
    let Some(due) = due else {
        return bands.no_due_date;
    };
    let days_until = (due - today).num_days();
    if days_until < 0 {
        bands.overdue
    } else if days_until <= DUE_WEEK_WINDOW_DAYS {
        bands.due_within_week
    } else if days_until <= DUE_MONTH_WINDOW_DAYS {
        bands.due_within_month
    } else {
        bands.due_later
    }
}

/// Priority lookup; levels outside 1-4 score like "no priority".
pub fn priority_score(priority: Option<u8>, bands: &PriorityBands) -> f64 {
    match priority {
        Some(1) => bands.p1,
        Some(2) => bands.p2,
        Some(3) => bands.p3,
        Some(4) => bands.p4,
        _ => bands.none,
    }
}

/// Status category lookup; unknown categories fall back to the catch-all
/// score instead of erroring.
#[inline]
pub fn status_score(category: &str, categories: &StatusCategories) -> f64 {
    categories.score_of(category)
}

/// Weighted combination of the component scores.
pub fn combine(
    scores: &ComponentScores,
    weights: &ScoreWeights,
    active: ActiveDimensions,
) -> f64 {
    let gate = |on: bool| if on { 1.0 } else { 0.0 };
    scores.relevance * weights.relevance * gate(active.relevance)
        + scores.due_date * weights.due_date * gate(active.due_date)
        + scores.priority * weights.priority * gate(active.priority)
        + scores.status * weights.status * gate(active.status)
}

/// All four components plus the final score for one task's fields.
pub fn score_fields(
    text: &str,
    due: Option<NaiveDate>,
    priority: Option<u8>,
    status: &str,
    keywords: &KeywordSets,
    weights: &ScoreWeights,
    categories: &StatusCategories,
    active: ActiveDimensions,
    today: NaiveDate,
) -> ComponentScores {
    let mut scores = ComponentScores {
        relevance: relevance_score(text, keywords, weights.core_keyword_weight),
        due_date: due_date_score(due, today, &weights.due_bands),
        priority: priority_score(priority, &weights.priority_bands),
        status: status_score(status, categories),
        final_score: 0.0,
    };
    scores.final_score = combine(&scores, weights, active);
    scores
}

// ============================================================================
// TESTS
// ============================================================================
