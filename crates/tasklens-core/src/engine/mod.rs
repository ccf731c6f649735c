//! # Search Engine
//!
//! The facade tying everything together. One engine owns a provider, a
//! configuration, the vocabulary registry built from it, and the result
//! cache. A search is: parse (or accept) a filter, check readiness, check
//! the cache, fetch raw records, prefilter them in batch, materialize the
//! survivors, run the pipeline, remember the result.
//!
//! All methods take `&self`; the engine is `Send + Sync` behind an `Arc`
//! with no outer lock.

pub mod chunk;

use crate::batch::{self, BatchContext};
use crate::cache::{self, CachedResults, RESULT_CACHE_CAPACITY, ResultCache};
use crate::config::SearchConfig;
use crate::pipeline::{self, PipelineContext, ScoredTask};
use crate::provider::{ProviderError, SourceQuery, TaskIndexProvider};
use crate::query::{ParseWarning, QueryParser, TaskFilter};
use crate::registry::TermRegistry;
use crate::scoring::KeywordSets;
use crate::task::{self, RawTaskRecord, Task};
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex;

// ============================================================================
// ERRORS
// ============================================================================

/// Failures a search can surface. An index that has not finished building
/// is an error; a search that matches nothing is an empty `Ok`.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("task index `{0}` is not ready yet")]
    IndexUnavailable(String),
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

pub type Result<T> = std::result::Result<T, EngineError>;

// ============================================================================
// OUTCOME
// ============================================================================

/// Everything one search produced.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchOutcome {
    /// Ranked tasks, truncated to the display limit
    pub tasks: Vec<ScoredTask>,
    /// Matching tasks before the display limit, bounded by the
    /// pipeline's collection cap
    pub total_candidates: usize,
    /// Whether the result came from the result cache
    pub from_cache: bool,
    /// Non-fatal parse and normalization warnings
    pub warnings: Vec<ParseWarning>,
}

// ============================================================================
// ENGINE
// ============================================================================

/// Task search engine over one index provider.
pub struct SearchEngine<P> {
    provider: P,
    config: SearchConfig,
    registry: TermRegistry,
    cache: Mutex<ResultCache>,
}

impl<P: TaskIndexProvider> SearchEngine<P> {
    pub fn new(provider: P, config: SearchConfig) -> Self {
        let registry = config.build_registry();
        let cache = Mutex::new(ResultCache::new(
            RESULT_CACHE_CAPACITY,
            config.result_cache_ttl(),
        ));
        SearchEngine {
            provider,
            config,
            registry,
            cache,
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn registry(&self) -> &TermRegistry {
        &self.registry
    }

    /// Parse a free-text query and run it.
    pub async fn search(&self, query: &str) -> Result<SearchOutcome> {
        let parser =
            QueryParser::new(&self.registry).with_typo_correction(self.config.typo_correction);
        let parsed = parser.parse(query);
        tracing::debug!(
            query = %query,
            warnings = parsed.warnings.len(),
            "query parsed"
        );
        self.run(parsed.filter, parsed.warnings).await
    }

    /// Run a pre-built structured filter, e.g. deserialized from JSON.
    ///
    /// The filter is normalized first, so raw status values and inverted
    /// date ranges get the same treatment as parser output.
    pub async fn search_with_filter(&self, mut filter: TaskFilter) -> Result<SearchOutcome> {
        let warnings = filter.normalize(self.registry.categories());
        for warning in &warnings {
            tracing::warn!(warning = %warning, "filter normalization");
        }
        self.run(filter, warnings).await
    }

    /// Poll the provider until its index is ready.
    ///
    /// Sleeps `poll_interval` between attempts and gives up with
    /// [`EngineError::IndexUnavailable`] after `max_attempts` polls.
    pub async fn wait_until_ready(
        &self,
        poll_interval: Duration,
        max_attempts: u32,
    ) -> Result<()> {
        for attempt in 0..max_attempts {
            if self.provider.is_ready() {
                return Ok(());
            }
            tracing::debug!(attempt, "index not ready, polling again");
            tokio::time::sleep(poll_interval).await;
        }
        if self.provider.is_ready() {
            Ok(())
        } else {
            Err(EngineError::IndexUnavailable(
                self.provider.backend().as_str().to_string(),
            ))
        }
    }

    async fn run(&self, filter: TaskFilter, warnings: Vec<ParseWarning>) -> Result<SearchOutcome> {
        if !self.provider.is_ready() {
            return Err(EngineError::IndexUnavailable(
                self.provider.backend().as_str().to_string(),
            ));
        }

        let source = self.source_query(&filter);
        let key = cache::derive_key(self.provider.backend().as_str(), &filter, &source);

        if let Some(hit) = self.cache.lock().await.get(&key) {
            tracing::debug!(results = hit.tasks.len(), "result cache hit");
            return Ok(SearchOutcome {
                tasks: hit.tasks,
                total_candidates: hit.total_candidates,
                from_cache: true,
                warnings,
            });
        }

        let today = chrono::Local::now().date_naive();
        let keywords = KeywordSets::new(
            filter.keywords.clone(),
            self.registry.expand_keywords(&filter.keywords),
        );

        let records = self.provider.fetch(&source).await?;
        tracing::debug!(records = records.len(), "records fetched");
        let raw: Vec<RawTaskRecord> =
            chunk::process_chunked(records, chunk::VALIDATION_CHUNK_SIZE, task::normalize).await;

        let active = pipeline::active_dimensions(&filter, &self.config.sort_order);
        let batch_ctx = BatchContext {
            keywords: &keywords,
            weights: &self.config.weights,
            categories: self.registry.categories(),
            active,
            today,
        };
        let prefiltered = batch::prefilter_records(
            raw,
            &batch_ctx,
            &self.config.batch_thresholds(),
            &self.config.sort_order,
        )
        .await;
        tracing::debug!(
            survivors = prefiltered.records.len(),
            scored = prefiltered.cache.len(),
            "batch prefilter done"
        );

        let categories = self.registry.categories();
        let tasks: Vec<Task> = chunk::process_chunked(
            prefiltered.records,
            chunk::EXTRACTION_CHUNK_SIZE,
            |record| Task::from_raw(&record, categories),
        )
        .await;

        let ctx = PipelineContext {
            filter: &filter,
            keywords: &keywords,
            weights: &self.config.weights,
            categories,
            sort_order: &self.config.sort_order,
            display_limit: self.config.display_limit,
            min_quality_score: self.config.min_quality_score,
            min_relevance_score: self.config.min_relevance_score,
            score_cache: Some(&prefiltered.cache),
            today,
        };
        let outcome = pipeline::run_pipeline(tasks, &ctx).await;
        tracing::debug!(
            results = outcome.tasks.len(),
            total = outcome.total_candidates,
            "search complete"
        );

        self.cache.lock().await.insert(
            key,
            CachedResults {
                tasks: outcome.tasks.clone(),
                total_candidates: outcome.total_candidates,
            },
        );

        Ok(SearchOutcome {
            tasks: outcome.tasks,
            total_candidates: outcome.total_candidates,
            from_cache: false,
            warnings,
        })
    }

    /// Location scope for the provider: inclusion from the filter,
    /// exclusion from configuration.
    fn source_query(&self, filter: &TaskFilter) -> SourceQuery {
        SourceQuery {
            folders: filter.folder.clone().into_iter().collect(),
            tags: filter.tags.clone(),
            exclude_folders: self.config.excluded_folders.clone(),
            exclude_tags: self.config.excluded_tags.clone(),
            exclude_paths: self.config.excluded_paths.clone(),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
