//! # Filter/Score/Sort Pipeline
//!
//! Single traversal over the candidate list: keyword filter, structured
//! filter, scoring, quality and relevance thresholds, then one sort and
//! one truncation at the very end. No stage runs its own pass, and
//! sorting happens exactly once per query.
//!
//! Long traversals yield to the runtime between chunks so a large vault
//! never starves concurrent work.

pub mod predicate;
pub mod sort;

pub use predicate::{matches_filter, matches_keywords, matches_structured};
pub use sort::{
    SCORE_EPSILON, SortCriterion, compare_scored, compare_tasks, default_sort_order, sort_tasks,
};

use crate::batch::ScoreCache;
use crate::query::TaskFilter;
use crate::registry::StatusCategories;
use crate::scoring::{self, ActiveDimensions, ComponentScores, KeywordSets, ScoreWeights};
use crate::task::Task;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Survivors collected before the traversal stops early. The surplus over
/// the display limit absorbs sorting-induced reordering; the multiplier
/// must stay >= 1.
pub const COLLECTION_CAP_MULTIPLIER: usize = 3;

/// Tasks processed between cooperative yield points.
pub const PIPELINE_CHUNK_SIZE: usize = 500;

// ============================================================================
// SCORED TASK
// ============================================================================

/// A task together with the component scores that ranked it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredTask {
    pub task: Task,
    pub scores: ComponentScores,
}

// ============================================================================
// PIPELINE CONTEXT
// ============================================================================

/// Everything one pipeline run needs, borrowed from the engine.
#[derive(Debug, Clone, Copy)]
pub struct PipelineContext<'a> {
    pub filter: &'a TaskFilter,
    pub keywords: &'a KeywordSets,
    pub weights: &'a ScoreWeights,
    pub categories: &'a StatusCategories,
    pub sort_order: &'a [SortCriterion],
    /// Maximum results returned; 0 means unlimited
    pub display_limit: usize,
    /// Minimum final score, applied to every task
    pub min_quality_score: Option<f64>,
    /// Minimum relevance component, applied only when keywords exist
    pub min_relevance_score: Option<f64>,
    /// Component scores computed by the batch layer, keyed by record id
    pub score_cache: Option<&'a ScoreCache>,
    pub today: NaiveDate,
}

/// Which scoring dimensions may contribute to the final score.
///
/// A dimension is active when the filter constrains it or the sort order
/// ranks by it; anything else is gated to zero so it cannot silently
/// reorder results.
pub fn active_dimensions(filter: &TaskFilter, sort_order: &[SortCriterion]) -> ActiveDimensions {
    let sorted_by = |criterion: SortCriterion| sort_order.contains(&criterion);
    ActiveDimensions {
        relevance: !filter.keywords.is_empty() || sorted_by(SortCriterion::Relevance),
        due_date: filter.due_date.is_some()
            || filter.due_date_range.is_some()
            || sorted_by(SortCriterion::DueDate),
        priority: filter.priority.is_some() || sorted_by(SortCriterion::Priority),
        status: filter.status.is_some() || sorted_by(SortCriterion::Status),
    }
}

// ============================================================================
// PIPELINE
// ============================================================================

/// What one pipeline run produced.
#[derive(Debug, Clone, Default)]
pub struct PipelineOutcome {
    /// Ranked tasks, truncated to the display limit
    pub tasks: Vec<ScoredTask>,
    /// Survivors before truncation, bounded by the collection cap
    pub total_candidates: usize,
}

/// Run the full pipeline over materialized tasks.
///
/// A quality threshold above every task's score yields an empty list,
/// never an error. Raising either threshold can only shrink the result
/// set, and fully tied tasks keep their traversal order.
pub async fn run_pipeline(tasks: Vec<Task>, ctx: &PipelineContext<'_>) -> PipelineOutcome {
    let active = active_dimensions(ctx.filter, ctx.sort_order);
    let cap = match ctx.display_limit {
        0 => usize::MAX,
        limit => limit.saturating_mul(COLLECTION_CAP_MULTIPLIER),
    };

    let mut survivors: Vec<ScoredTask> = Vec::new();
    let mut processed = 0usize;
    for task in tasks {
        if processed != 0 && processed % PIPELINE_CHUNK_SIZE == 0 {
            tokio::task::yield_now().await;
        }
        processed += 1;

        if !predicate::matches_filter(&task, ctx.filter, ctx.keywords, ctx.today) {
            continue;
        }
        let scores = score_or_recall(&task, ctx, active);
        if let Some(min) = ctx.min_quality_score {
            if scores.final_score < min {
                continue;
            }
        }
        if let Some(min) = ctx.min_relevance_score {
            if !ctx.keywords.is_empty() && scores.relevance < min {
                continue;
            }
        }
        survivors.push(ScoredTask { task, scores });
        if survivors.len() >= cap {
            break;
        }
    }

    let total_candidates = survivors.len();
    sort::sort_tasks(&mut survivors, ctx.sort_order, ctx.categories);
    if ctx.display_limit > 0 {
        survivors.truncate(ctx.display_limit);
    }
    PipelineOutcome {
        tasks: survivors,
        total_candidates,
    }
}

/// Reuse batch-layer scores when present, compute otherwise.
fn score_or_recall(
    task: &Task,
    ctx: &PipelineContext<'_>,
    active: ActiveDimensions,
) -> ComponentScores {
    if let Some(scores) = ctx.score_cache.and_then(|cache| cache.get(&task.id)) {
        return scores;
    }
    scoring::score_fields(
        &task.text,
        task.due_date,
        task.priority,
        &task.status,
        ctx.keywords,
        ctx.weights,
        ctx.categories,
        active,
        ctx.today,
    )
}

// ============================================================================
// TESTS
// ============================================================================
