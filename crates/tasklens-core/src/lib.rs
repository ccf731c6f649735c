//! # Tasklens Core
//!
//! In-memory task query engine. Turns a free-text search string into a
//! ranked, filtered list of tasks pulled from an external index:
//!
//! - **Query Parser**: typo-tolerant extraction of priority, due dates and
//!   ranges, status, folder, tags and keywords, with natural-language
//!   fallbacks in English and Chinese
//! - **Weighted Scoring**: four independent components (relevance,
//!   due-date urgency, priority, status) with user-tunable coefficients
//!   and band tables; inactive dimensions are gated out of the final score
//! - **Single-Pass Pipeline**: filter, score, threshold, then exactly one
//!   sort and one truncation per query
//! - **Multi-Criterion Sort**: configurable criterion order with fixed,
//!   predictable directions and stable ties
//! - **Batch Prefilter**: thresholds applied to raw records before the
//!   expensive materialization step, with per-record score caching
//! - **Result Cache**: short-TTL LRU absorbing bursts of identical queries
//! - **Cooperative Chunking**: long traversals yield to the runtime so
//!   searches over tens of thousands of records never block it
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tasklens_core::prelude::*;
//!
//! // Any type implementing TaskIndexProvider supplies the raw records.
//! let engine = SearchEngine::new(provider, SearchConfig::default());
//!
//! let outcome = engine.search("login bug p1 overdue #auth").await?;
//! for scored in &outcome.tasks {
//!     println!("{:5.2}  {}", scored.scores.final_score, scored.task.text);
//! }
//! ```
//!
//! Structured filters can also bypass the parser entirely, e.g. when an
//! AI assistant emits filter JSON:
//!
//! ```rust,ignore
//! let filter: TaskFilter = serde_json::from_str(r#"{"priority": [1, 2]}"#)?;
//! let outcome = engine.search_with_filter(filter).await?;
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
// Only warn about missing docs for public items exported from the crate root
// Internal struct fields and enum variants don't need documentation
#![warn(rustdoc::missing_crate_level_docs)]

// ============================================================================
// MODULES
// ============================================================================

pub mod batch;
pub mod cache;
pub mod config;
pub mod engine;
pub mod pipeline;
pub mod provider;
pub mod query;
pub mod registry;
pub mod scoring;
pub mod task;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

// Query parsing
pub use query::{
    DateRange, DueDateValue, OneOrMany, OperatorHints, ParseWarning, ParsedQuery, PriorityFilter,
    PrioritySentinel, QueryParser, TaskFilter,
};

// Vocabulary registry
pub use registry::{
    DueBucket, PriorityTier, StatusCategories, StatusCategory, TermRegistry, TermTables, UserTerms,
};

// Task data model
pub use task::{
    BackendRecord, ChecklistRecord, MetadataRecord, RawTaskRecord, RecordId, Task,
};

// Scoring
pub use scoring::{
    ActiveDimensions, ComponentScores, DueDateBands, KeywordSets, PriorityBands, ScoreWeights,
    combine, due_date_score, priority_score, relevance_score, score_fields, status_score,
};

// Pipeline and sorting
pub use pipeline::{
    COLLECTION_CAP_MULTIPLIER, PipelineContext, PipelineOutcome, SCORE_EPSILON, ScoredTask,
    SortCriterion, active_dimensions, compare_scored, compare_tasks, default_sort_order,
    matches_filter, run_pipeline, sort_tasks,
};

// Batch prefiltering
pub use batch::{BatchContext, BatchOutcome, BatchThresholds, ScoreCache, prefilter_records};

// Result caching
pub use cache::{CachedResults, RESULT_CACHE_CAPACITY, RESULT_CACHE_TTL, ResultCache, derive_key};

// Provider interface
pub use provider::{IndexBackend, ProviderError, SourceQuery, TaskIndexProvider};

// Configuration
pub use config::{
    DEFAULT_DISPLAY_LIMIT, DEFAULT_EARLY_LIMIT_HARD_CAP, DEFAULT_EARLY_LIMIT_MULTIPLIER,
    DEFAULT_RESULT_CACHE_TTL_SECS, SearchConfig,
};

// Engine facade
pub use engine::chunk::process_chunked;
pub use engine::{EngineError, Result, SearchEngine, SearchOutcome};

// ============================================================================
// VERSION INFO
// ============================================================================

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// PRELUDE
// ============================================================================

/// Convenient imports for common usage
pub mod prelude {
    pub use crate::{
        ComponentScores, EngineError, IndexBackend, ParseWarning, ProviderError, QueryParser,
        Result, ScoreWeights, ScoredTask, SearchConfig, SearchEngine, SearchOutcome,
        SortCriterion, SourceQuery, Task, TaskFilter, TaskIndexProvider, TermRegistry,
    };
}
