//! # Task Data Model
//!
//! The normalized task record every stage of the engine operates on, and
//! its materialization from raw index records.

pub mod record;

pub use record::{
    BackendRecord, ChecklistRecord, MetadataRecord, RawTaskRecord, RecordId, folder_of,
    normalize, parse_date_value, parse_priority_value,
};

use crate::registry::StatusCategories;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A fully materialized task.
///
/// All raw field values have been parsed, the status symbol has been
/// resolved to its canonical category, and dates are calendar dates.
/// Materialization never fails: unparseable or out-of-range field values
/// degrade to `None` instead of rejecting the record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Stable identity, `path:line`
    pub id: RecordId,
    /// Task description without checkbox or markers
    pub text: String,
    /// Checkbox symbol as written, empty when absent
    pub symbol: String,
    /// Canonical status category key
    pub status: String,
    /// Priority level 1-4, 1 is most urgent
    pub priority: Option<u8>,
    pub due_date: Option<NaiveDate>,
    pub created_date: Option<NaiveDate>,
    pub completed_date: Option<NaiveDate>,
    pub tags: Vec<String>,
    /// Parent folder of the source file
    pub folder: String,
    pub path: String,
    pub line: u32,
}

impl Task {
    /// Materialize a normalized record.
    ///
    /// # Arguments
    ///
    /// * `raw` - The normalized record from either backend
    /// * `categories` - Status category set used for symbol resolution
    pub fn from_raw(raw: &RawTaskRecord, categories: &StatusCategories) -> Self {
        let symbol = raw.symbol.clone().unwrap_or_default();
        let status = categories.resolve_symbol(&symbol).to_string();
        Task {
            id: raw.id.clone(),
            text: raw.text.clone(),
            status,
            symbol,
            priority: raw
                .priority_raw
                .as_deref()
                .and_then(record::parse_priority_value)
                .filter(|level| (1..=4).contains(level)),
            due_date: raw.due_raw.as_deref().and_then(record::parse_date_value),
            created_date: raw
                .created_raw
                .as_deref()
                .and_then(record::parse_date_value),
            completed_date: raw
                .completed_raw
                .as_deref()
                .and_then(record::parse_date_value),
            tags: raw.tags.clone(),
            folder: raw.folder.clone(),
            path: raw.path.clone(),
            line: raw.line,
        }
    }
}

#[cfg(test)]
impl Task {
    /// Bare open task used as a starting point across unit tests.
    pub(crate) fn fixture(text: &str) -> Self {
        Task {
            id: RecordId::new("notes/fixtures.md", 1),
            text: text.to_string(),
            symbol: " ".to_string(),
            status: "open".to_string(),
            priority: None,
            due_date: None,
            created_date: None,
            completed_date: None,
            tags: Vec::new(),
            folder: "notes".to_string(),
            path: "notes/fixtures.md".to_string(),
            line: 1,
        }
    }
}
