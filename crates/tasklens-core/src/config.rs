//! # Engine Configuration
//!
//! One struct covers everything tunable: scoring coefficients and bands,
//! status categories, vocabulary extensions, sort order, limits and
//! thresholds, caching and typo correction. Every field has a default, so
//! partial configuration files deserialize cleanly.

use crate::batch::BatchThresholds;
use crate::pipeline::{SortCriterion, default_sort_order};
use crate::registry::{StatusCategories, StatusCategory, TermRegistry, UserTerms};
use crate::scoring::ScoreWeights;
use serde::{Deserialize, Serialize};
use std::time::Duration;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Results returned per search unless configured otherwise
pub const DEFAULT_DISPLAY_LIMIT: usize = 50;

/// Early-limit keep factor over the display limit
pub const DEFAULT_EARLY_LIMIT_MULTIPLIER: usize = 3;

/// Absolute ceiling on early-limit survivors
pub const DEFAULT_EARLY_LIMIT_HARD_CAP: usize = 5_000;

/// Result cache time-to-live in seconds
pub const DEFAULT_RESULT_CACHE_TTL_SECS: u64 = 2;

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Engine configuration, usually deserialized from user settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchConfig {
    /// Scoring coefficients plus due-date and priority band tables
    pub weights: ScoreWeights,
    /// Status category set; empty falls back to the built-in set
    pub status_categories: Vec<StatusCategory>,
    /// Vocabulary extensions merged over the built-in term tables
    pub user_terms: UserTerms,
    /// Sort criteria in application order
    pub sort_order: Vec<SortCriterion>,
    /// Results returned per search; 0 means unlimited
    pub display_limit: usize,
    /// Minimum final score a task must reach
    pub min_quality_score: Option<f64>,
    /// Minimum relevance component when the query has keywords
    pub min_relevance_score: Option<f64>,
    pub early_limit_multiplier: usize,
    pub early_limit_hard_cap: usize,
    pub result_cache_ttl_secs: u64,
    /// Correct unknown query words against the vocabulary before parsing
    pub typo_correction: bool,
    /// Folders never searched
    pub excluded_folders: Vec<String>,
    /// Tags never searched
    pub excluded_tags: Vec<String>,
    /// Individual files never searched
    pub excluded_paths: Vec<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            weights: ScoreWeights::default(),
            status_categories: Vec::new(),
            user_terms: UserTerms::default(),
            sort_order: default_sort_order(),
            display_limit: DEFAULT_DISPLAY_LIMIT,
            min_quality_score: None,
            min_relevance_score: None,
            early_limit_multiplier: DEFAULT_EARLY_LIMIT_MULTIPLIER,
            early_limit_hard_cap: DEFAULT_EARLY_LIMIT_HARD_CAP,
            result_cache_ttl_secs: DEFAULT_RESULT_CACHE_TTL_SECS,
            typo_correction: true,
            excluded_folders: Vec::new(),
            excluded_tags: Vec::new(),
            excluded_paths: Vec::new(),
        }
    }
}

impl SearchConfig {
    /// Build the term registry this configuration describes.
    pub fn build_registry(&self) -> TermRegistry {
        let categories = StatusCategories::from_config(self.status_categories.clone());
        TermRegistry::new(&self.user_terms, categories)
    }

    pub fn result_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.result_cache_ttl_secs)
    }

    /// Threshold set handed to the batch prefilter.
    pub fn batch_thresholds(&self) -> BatchThresholds {
        BatchThresholds {
            min_quality_score: self.min_quality_score,
            min_relevance_score: self.min_relevance_score,
            max_results: self.display_limit,
            early_limit_multiplier: self.early_limit_multiplier,
            early_limit_hard_cap: self.early_limit_hard_cap,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
