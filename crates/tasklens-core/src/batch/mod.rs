//! # Batch Prefilter
//!
//! Shrinks a large raw record set before materialization. Turning a raw
//! record into a [`Task`](crate::task::Task) is the expensive part of a
//! search (field parsing, string clones), so thresholds are applied while
//! records are still raw, and the component scores computed here are
//! cached by record id for the pipeline to reuse.
//!
//! Filtering is order-preserving: the surviving records keep their input
//! order, and ranking happens later in the pipeline.

use crate::pipeline::SortCriterion;
use crate::pipeline::sort::{SortKey, compare_scored_keys};
use crate::registry::StatusCategories;
use crate::scoring::{self, ActiveDimensions, ComponentScores, KeywordSets, ScoreWeights};
use crate::task::{RawTaskRecord, RecordId, parse_date_value, parse_priority_value};
use chrono::NaiveDate;
use std::collections::HashMap;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Raw records scored between cooperative yield points.
pub const SCORING_CHUNK_SIZE: usize = 500;

// ============================================================================
// SCORE CACHE
// ============================================================================

/// Component scores keyed by record id, valid for one search invocation.
///
/// The pipeline consults this before rescoring a materialized task, so
/// each record is scored at most once per query.
#[derive(Debug, Default)]
pub struct ScoreCache {
    scores: HashMap<RecordId, ComponentScores>,
}

impl ScoreCache {
    pub fn new() -> Self {
        ScoreCache::default()
    }

    pub fn insert(&mut self, id: RecordId, scores: ComponentScores) {
        self.scores.insert(id, scores);
    }

    pub fn get(&self, id: &RecordId) -> Option<ComponentScores> {
        self.scores.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

// ============================================================================
// THRESHOLDS
// ============================================================================

/// Caller-supplied limits steering the prefilter.
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchThresholds {
    /// Minimum final score; `None` disables quality filtering
    pub min_quality_score: Option<f64>,
    /// Minimum relevance component, applied only when keywords exist
    pub min_relevance_score: Option<f64>,
    /// Results the caller will ultimately display; 0 means unlimited
    pub max_results: usize,
    /// Early-limit keep factor over `max_results`
    pub early_limit_multiplier: usize,
    /// Absolute ceiling on early-limit survivors
    pub early_limit_hard_cap: usize,
}

impl BatchThresholds {
    /// Records kept by the early-limit fallback, when it applies at all.
    fn early_limit(&self) -> Option<usize> {
        if self.max_results == 0 {
            return None;
        }
        let keep = self
            .max_results
            .saturating_mul(self.early_limit_multiplier.max(1));
        Some(keep.min(self.early_limit_hard_cap.max(1)))
    }
}

// ============================================================================
// RAW SCORING
// ============================================================================

/// Borrowed inputs for scoring raw records.
#[derive(Debug, Clone, Copy)]
pub struct BatchContext<'a> {
    pub keywords: &'a KeywordSets,
    pub weights: &'a ScoreWeights,
    pub categories: &'a StatusCategories,
    pub active: ActiveDimensions,
    pub today: NaiveDate,
}

/// Fields parsed from a raw record, kept alongside its scores so the
/// early-limit sort can break ties without materializing anything.
#[derive(Debug, Clone)]
struct RawFields {
    due_date: Option<NaiveDate>,
    priority: Option<u8>,
    status: String,
    created_date: Option<NaiveDate>,
}

fn parse_fields(record: &RawTaskRecord, categories: &StatusCategories) -> RawFields {
    let symbol = record.symbol.as_deref().unwrap_or_default();
    RawFields {
        due_date: record.due_raw.as_deref().and_then(parse_date_value),
        priority: record.priority_raw.as_deref().and_then(parse_priority_value),
        status: categories.resolve_symbol(symbol).to_string(),
        created_date: record.created_raw.as_deref().and_then(parse_date_value),
    }
}

fn score_record(record: &RawTaskRecord, fields: &RawFields, ctx: &BatchContext<'_>) -> ComponentScores {
    scoring::score_fields(
        &record.text,
        fields.due_date,
        fields.priority,
        &fields.status,
        ctx.keywords,
        ctx.weights,
        ctx.categories,
        ctx.active,
        ctx.today,
    )
}

// ============================================================================
// PREFILTER
// ============================================================================

/// Raw records that survived the prefilter, plus the score cache the
/// pipeline reuses.
#[derive(Debug)]
pub struct BatchOutcome {
    pub records: Vec<RawTaskRecord>,
    pub cache: ScoreCache,
}

/// Score every record once, then shrink the set.
///
/// With thresholds present, records below them are dropped in place.
/// Without any applicable threshold and without keywords, a very large
/// set instead keeps only the `maxResults x multiplier` best-scoring
/// records (capped), trading borderline low scorers for bounded latency.
/// Either way the survivors keep their input order.
pub async fn prefilter_records(
    records: Vec<RawTaskRecord>,
    ctx: &BatchContext<'_>,
    thresholds: &BatchThresholds,
    sort_order: &[SortCriterion],
) -> BatchOutcome {
    let mut cache = ScoreCache::new();
    let mut fields: Vec<RawFields> = Vec::with_capacity(records.len());
    let mut scores: Vec<ComponentScores> = Vec::with_capacity(records.len());

    for (index, record) in records.iter().enumerate() {
        if index != 0 && index % SCORING_CHUNK_SIZE == 0 {
            tokio::task::yield_now().await;
        }
        let parsed = parse_fields(record, ctx.categories);
        let component = score_record(record, &parsed, ctx);
        cache.insert(record.id.clone(), component);
        fields.push(parsed);
        scores.push(component);
    }

    let has_keywords = !ctx.keywords.is_empty();
    let quality_applies = thresholds.min_quality_score.is_some();
    let relevance_applies = thresholds.min_relevance_score.is_some() && has_keywords;

    let records = if quality_applies || relevance_applies {
        let mut index = 0;
        let mut kept = records;
        kept.retain(|_| {
            let component = scores[index];
            index += 1;
            if let Some(min) = thresholds.min_quality_score {
                if component.final_score < min {
                    return false;
                }
            }
            if relevance_applies {
                if let Some(min) = thresholds.min_relevance_score {
                    if component.relevance < min {
                        return false;
                    }
                }
            }
            true
        });
        kept
    } else if !has_keywords {
        early_limit(records, &fields, &scores, thresholds, sort_order, ctx.categories)
    } else {
        records
    };

    BatchOutcome { records, cache }
}

/// Keep only the best-scoring records of an unfilterable oversized set,
/// in their original order.
fn early_limit(
    records: Vec<RawTaskRecord>,
    fields: &[RawFields],
    scores: &[ComponentScores],
    thresholds: &BatchThresholds,
    sort_order: &[SortCriterion],
    categories: &StatusCategories,
) -> Vec<RawTaskRecord> {
    let Some(keep) = thresholds.early_limit() else {
        return records;
    };
    if records.len() <= keep {
        return records;
    }

    let keys: Vec<SortKey<'_>> = records
        .iter()
        .zip(fields.iter().zip(scores.iter()))
        .map(|(record, (parsed, component))| SortKey {
            relevance: component.relevance,
            final_score: component.final_score,
            due_date: parsed.due_date,
            priority: parsed.priority,
            status: &parsed.status,
            created_date: parsed.created_date,
            text: &record.text,
        })
        .collect();

    let mut order: Vec<usize> = (0..records.len()).collect();
    order.sort_by(|&a, &b| compare_scored_keys(&keys[a], &keys[b], sort_order, categories));
    order.truncate(keep);
    order.sort_unstable();

    let mut wanted = order.into_iter().peekable();
    let mut index = 0;
    let mut kept = records;
    kept.retain(|_| {
        let keep_this = wanted.peek() == Some(&index);
        if keep_this {
            wanted.next();
        }
        index += 1;
        keep_this
    });
    kept
}

// ============================================================================
// TESTS
// ============================================================================
