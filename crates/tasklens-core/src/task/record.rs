//! # Index Records
//!
//! Raw records as the backing indexes hand them over, and their
//! normalization into the engine's single internal shape.
//!
//! Two snapshot providers exist: a metadata index that exposes page-level
//! key/value fields, and a checklist plugin that exposes already-parsed
//! inline markers. Normalization reduces both to [`RawTaskRecord`] so
//! everything downstream is backend-agnostic.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

// ============================================================================
// RECORD IDENTITY
// ============================================================================

/// Stable identity of a task record: source path plus line number.
///
/// The id doubles as the score-cache key within one search invocation, so
/// it must be cheap to clone and hash.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Compose an id from a source path and a 0-based line number.
    pub fn new(path: &str, line: u32) -> Self {
        RecordId(format!("{path}:{line}"))
    }

    /// The underlying `path:line` string.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// BACKEND RECORDS
// ============================================================================

/// A record as produced by one of the backing indexes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "backend", rename_all = "camelCase")]
pub enum BackendRecord {
    /// From the metadata index: page-level key/value fields
    Metadata(MetadataRecord),
    /// From the checklist plugin: inline markers already parsed
    Checklist(ChecklistRecord),
}

impl BackendRecord {
    /// Source path of the record.
    pub fn path(&self) -> &str {
        match self {
            BackendRecord::Metadata(r) => &r.path,
            BackendRecord::Checklist(r) => &r.path,
        }
    }

    /// 0-based line number of the record.
    pub fn line(&self) -> u32 {
        match self {
            BackendRecord::Metadata(r) => r.line,
            BackendRecord::Checklist(r) => r.line,
        }
    }
}

/// Raw record from the metadata index.
///
/// Task properties arrive as free-form string fields; well-known keys are
/// `due`, `priority`, `created` and `completion`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct MetadataRecord {
    pub path: String,
    pub line: u32,
    /// Task description without the checkbox prefix
    pub text: String,
    /// Checkbox symbol, `None` when the line is not a checkbox at all
    pub symbol: Option<String>,
    /// Page metadata fields keyed by lowercase field name
    pub fields: HashMap<String, String>,
    pub tags: Vec<String>,
}

/// Raw record from the checklist plugin.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ChecklistRecord {
    pub path: String,
    pub line: u32,
    /// Task description with inline markers already stripped
    pub text: String,
    pub symbol: Option<String>,
    /// Due date as written, usually ISO
    pub due: Option<String>,
    /// Scheduled date, used as the due date when `due` is absent
    pub scheduled: Option<String>,
    pub created: Option<String>,
    pub done: Option<String>,
    /// Priority as written: numeric ("2") or word form ("high")
    pub priority: Option<String>,
    pub tags: Vec<String>,
}

// ============================================================================
// NORMALIZED RECORD
// ============================================================================

/// Backend-agnostic record shape consumed by pre-filtering and
/// materialization. Field values are still raw strings; parsing them is
/// deferred so a record rejected by pre-filtering costs as little as
/// possible.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTaskRecord {
    pub id: RecordId,
    pub path: String,
    /// Parent folder of `path`, empty for top-level files
    pub folder: String,
    pub line: u32,
    pub text: String,
    pub symbol: Option<String>,
    pub priority_raw: Option<String>,
    pub due_raw: Option<String>,
    pub created_raw: Option<String>,
    pub completed_raw: Option<String>,
    pub tags: Vec<String>,
}

/// Normalize one backend record into the internal shape.
pub fn normalize(record: BackendRecord) -> RawTaskRecord {
    match record {
        BackendRecord::Metadata(r) => normalize_metadata(r),
        BackendRecord::Checklist(r) => normalize_checklist(r),
    }
}

fn normalize_metadata(record: MetadataRecord) -> RawTaskRecord {
    let field = |name: &str| record.fields.get(name).cloned();
    RawTaskRecord {
        id: RecordId::new(&record.path, record.line),
        folder: folder_of(&record.path),
        priority_raw: field("priority"),
        due_raw: field("due").or_else(|| field("deadline")),
        created_raw: field("created"),
        completed_raw: field("completion").or_else(|| field("completed")),
        path: record.path,
        line: record.line,
        text: record.text,
        symbol: record.symbol,
        tags: record.tags,
    }
}

fn normalize_checklist(record: ChecklistRecord) -> RawTaskRecord {
    RawTaskRecord {
        id: RecordId::new(&record.path, record.line),
        folder: folder_of(&record.path),
        priority_raw: record.priority,
        due_raw: record.due.or(record.scheduled),
        created_raw: record.created,
        completed_raw: record.done,
        path: record.path,
        line: record.line,
        text: record.text,
        symbol: record.symbol,
        tags: record.tags,
    }
}

/// Parent folder of a path, without the trailing separator.
pub fn folder_of(path: &str) -> String {
    match path.rsplit_once('/') {
        Some((folder, _)) => folder.to_string(),
        None => String::new(),
    }
}

// ============================================================================
// FIELD PARSING
// ============================================================================

/// Parse a raw priority value into a numeric level.
///
/// Accepts numeric forms (`"2"`, `"p2"`) and word forms. Anything
/// unrecognized, including an explicit `"none"`, parses to `None`.
pub fn parse_priority_value(raw: &str) -> Option<u8> {
    let value = raw.trim().to_lowercase();
    let numeric = value.strip_prefix('p').unwrap_or(&value);
    if let Ok(level) = numeric.parse::<u8>() {
        return Some(level);
    }
    match value.as_str() {
        "highest" | "urgent" | "high" => Some(1),
        "medium" | "normal" => Some(2),
        "low" => Some(3),
        "lowest" => Some(4),
        _ => None,
    }
}

/// Parse a raw date value into a calendar date.
///
/// Accepts ISO dates with or without zero padding, and datetime strings
/// whose first ten characters are an ISO date. Unparseable values are
/// treated as absent rather than failing the record.
pub fn parse_date_value(raw: &str) -> Option<NaiveDate> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }
    if let Some(prefix) = value.get(..10) {
        if let Ok(date) = NaiveDate::parse_from_str(prefix, "%Y-%m-%d") {
            return Some(date);
        }
    }
    None
}

// ============================================================================
// TESTS
// ============================================================================
