//! # Index Provider Interface
//!
//! The engine never scans files itself; it asks a provider for raw
//! records matching a declarative source query. Providers only narrow by
//! location (folders, tags, paths); every priority, due-date, status and
//! keyword decision is made by this crate, so results are identical no
//! matter which backend served the records.

use crate::task::BackendRecord;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// BACKEND IDENTITY
// ============================================================================

/// Which index a provider reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IndexBackend {
    /// Page-level metadata index with free-form fields
    Metadata,
    /// Checklist plugin index with pre-parsed inline markers
    Checklist,
}

impl IndexBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            IndexBackend::Metadata => "metadata",
            IndexBackend::Checklist => "checklist",
        }
    }

    pub fn parse_name(name: &str) -> Option<IndexBackend> {
        match name {
            "metadata" => Some(IndexBackend::Metadata),
            "checklist" => Some(IndexBackend::Checklist),
            _ => None,
        }
    }
}

impl std::fmt::Display for IndexBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SOURCE QUERY
// ============================================================================

/// Declarative location scope handed to a provider.
///
/// Inclusion fields come from the structured filter; exclusion fields
/// come from engine configuration. Empty vectors mean "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SourceQuery {
    pub folders: Vec<String>,
    pub tags: Vec<String>,
    pub exclude_folders: Vec<String>,
    pub exclude_tags: Vec<String>,
    pub exclude_paths: Vec<String>,
}

// ============================================================================
// ERRORS
// ============================================================================

/// Failure reported by an index provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("index backend `{0}` is unavailable")]
    Unavailable(String),
    #[error("index query failed: {0}")]
    Query(String),
}

// ============================================================================
// PROVIDER TRAIT
// ============================================================================

/// A source of raw task records.
#[async_trait]
pub trait TaskIndexProvider: Send + Sync {
    /// Which backend this provider reads.
    fn backend(&self) -> IndexBackend;

    /// Whether the underlying index has finished building. A not-ready
    /// index is a distinct condition from an index with zero matches.
    fn is_ready(&self) -> bool;

    /// Fetch raw records within the query's location scope.
    async fn fetch(&self, query: &SourceQuery) -> Result<Vec<BackendRecord>, ProviderError>;
}
