//! Multi-criterion task ordering.
//!
//! Each criterion has a fixed direction; user configuration chooses which
//! criteria apply and in what order, never the direction. Ties fall
//! through to the next criterion, and the underlying sort is stable, so
//! fully tied tasks keep their traversal order.

use super::ScoredTask;
use crate::registry::StatusCategories;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Scores closer than this count as tied in the batch comparator.
pub const SCORE_EPSILON: f64 = 1e-9;

// ============================================================================
// SORT CRITERIA
// ============================================================================

/// One axis of the configured sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortCriterion {
    /// Relevance component, descending
    Relevance,
    /// Due date ascending, undated tasks last
    DueDate,
    /// Priority level ascending (1 is most urgent), unprioritized last
    Priority,
    /// Status category rank ascending
    Status,
    /// Creation date descending, undated tasks last
    Created,
    /// Task text, case-insensitive ascending
    Alphabetical,
}

impl SortCriterion {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortCriterion::Relevance => "relevance",
            SortCriterion::DueDate => "dueDate",
            SortCriterion::Priority => "priority",
            SortCriterion::Status => "status",
            SortCriterion::Created => "created",
            SortCriterion::Alphabetical => "alphabetical",
        }
    }

    pub fn parse_name(name: &str) -> Option<SortCriterion> {
        match name {
            "relevance" => Some(SortCriterion::Relevance),
            "dueDate" | "due_date" | "due" => Some(SortCriterion::DueDate),
            "priority" => Some(SortCriterion::Priority),
            "status" => Some(SortCriterion::Status),
            "created" => Some(SortCriterion::Created),
            "alphabetical" | "alpha" => Some(SortCriterion::Alphabetical),
            _ => None,
        }
    }
}

impl std::fmt::Display for SortCriterion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Default sort order applied when the user configures none.
pub fn default_sort_order() -> Vec<SortCriterion> {
    vec![
        SortCriterion::Relevance,
        SortCriterion::DueDate,
        SortCriterion::Priority,
    ]
}

// ============================================================================
// SORT KEYS
// ============================================================================

/// The fields a comparison can touch, borrowed from either a materialized
/// task or a raw batch record. Raw records sort through the same
/// comparators without being turned into tasks first.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SortKey<'a> {
    pub relevance: f64,
    pub final_score: f64,
    pub due_date: Option<chrono::NaiveDate>,
    pub priority: Option<u8>,
    pub status: &'a str,
    pub created_date: Option<chrono::NaiveDate>,
    pub text: &'a str,
}

impl<'a> From<&'a ScoredTask> for SortKey<'a> {
    fn from(scored: &'a ScoredTask) -> Self {
        SortKey {
            relevance: scored.scores.relevance,
            final_score: scored.scores.final_score,
            due_date: scored.task.due_date,
            priority: scored.task.priority,
            status: &scored.task.status,
            created_date: scored.task.created_date,
            text: &scored.task.text,
        }
    }
}

// ============================================================================
// COMPARATORS
// ============================================================================

fn cmp_ci(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}

/// Ascending on the inner value, `None` sorted last.
fn cmp_option_asc<T: Ord>(a: &Option<T>, b: &Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Descending on the inner value, `None` still sorted last.
fn cmp_option_desc<T: Ord>(a: &Option<T>, b: &Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

pub(crate) fn compare_keys(
    a: &SortKey<'_>,
    b: &SortKey<'_>,
    criterion: SortCriterion,
    categories: &StatusCategories,
) -> Ordering {
    match criterion {
        SortCriterion::Relevance => b.relevance.total_cmp(&a.relevance),
        SortCriterion::DueDate => cmp_option_asc(&a.due_date, &b.due_date),
        SortCriterion::Priority => cmp_option_asc(&a.priority, &b.priority),
        SortCriterion::Status => categories
            .rank_of(a.status)
            .cmp(&categories.rank_of(b.status)),
        SortCriterion::Created => cmp_option_desc(&a.created_date, &b.created_date),
        SortCriterion::Alphabetical => cmp_ci(a.text, b.text),
    }
}

/// Multi-criterion comparison falling through the configured order.
pub fn compare_tasks(
    a: &ScoredTask,
    b: &ScoredTask,
    order: &[SortCriterion],
    categories: &StatusCategories,
) -> Ordering {
    let (a, b) = (SortKey::from(a), SortKey::from(b));
    for &criterion in order {
        let ordering = compare_keys(&a, &b, criterion, categories);
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

/// Stable in-place sort by the configured criteria.
pub fn sort_tasks(tasks: &mut [ScoredTask], order: &[SortCriterion], categories: &StatusCategories) {
    tasks.sort_by(|a, b| compare_tasks(a, b, order, categories));
}

/// Batch-mode comparison: final score descending, with scores within
/// [`SCORE_EPSILON`] treated as tied and broken by the configured
/// criteria minus relevance (the final score already embeds it).
pub(crate) fn compare_scored_keys(
    a: &SortKey<'_>,
    b: &SortKey<'_>,
    order: &[SortCriterion],
    categories: &StatusCategories,
) -> Ordering {
    if (a.final_score - b.final_score).abs() > SCORE_EPSILON {
        return b.final_score.total_cmp(&a.final_score);
    }
    for &criterion in order {
        if criterion == SortCriterion::Relevance {
            continue;
        }
        let ordering = compare_keys(a, b, criterion, categories);
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

/// [`compare_scored_keys`] over materialized tasks.
pub fn compare_scored(
    a: &ScoredTask,
    b: &ScoredTask,
    order: &[SortCriterion],
    categories: &StatusCategories,
) -> Ordering {
    compare_scored_keys(&SortKey::from(a), &SortKey::from(b), order, categories)
}

// ============================================================================
// TESTS
// ============================================================================
