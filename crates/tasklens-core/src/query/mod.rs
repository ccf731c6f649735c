//! # Query Parsing
//!
//! Turns a free-text query into a structured [`TaskFilter`]:
//!
//! 1. Typo correction against the registry vocabulary
//! 2. Extraction of explicit syntax (`p1`, `status:done`, `#tag`,
//!    `folder:"Work"`, `before 2025-12-31`, ...)
//! 3. Natural-language fallback for fields the explicit pass left empty
//! 4. Status resolution onto canonical category keys
//! 5. Positional keyword extraction with CJK-aware segmentation
//!
//! Parsing never fails. Anything malformed degrades to a smaller filter
//! and a [`ParseWarning`] the caller can surface.

pub mod dates;
pub mod filter;
pub mod keywords;
pub mod parser;
pub mod typo;

pub use filter::{
    DateRange, DueDateValue, OneOrMany, OperatorHints, PriorityFilter, PrioritySentinel,
    TaskFilter,
};
pub use parser::{ParsedQuery, QueryParser};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Non-fatal problems found while parsing a query.
///
/// Warnings never abort parsing; the offending fragment is dropped or
/// repaired and the rest of the query still applies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ParseWarning {
    /// A date-shaped value that is not a real calendar date
    #[error("malformed date `{raw}` ignored")]
    MalformedDate { raw: String },

    /// Priority outside the 1-4 range, kept in the filter as written
    #[error("priority {value} is outside the 1-4 range")]
    PriorityOutOfRange { value: u8 },

    /// Status value no category claims, dropped from the filter
    #[error("unknown status `{value}` ignored")]
    UnknownStatus { value: String },

    /// Two different priority sentinels in one query, the later one wins
    #[error("conflicting priority sentinels, keeping `{kept}`")]
    ConflictingSentinels { kept: String },

    /// Date range with start after end, bounds were swapped
    #[error("inverted date range, bounds swapped")]
    InvertedDateRange,
}
