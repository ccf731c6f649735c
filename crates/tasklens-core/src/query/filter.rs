//! # Structured Filter
//!
//! The filter shape produced by the parser and accepted directly from
//! AI-generated JSON. Scalar and array forms deserialize into the same
//! types (`"dueDate": "today"` and `"dueDate": ["today", "tomorrow"]`),
//! and every field is optional.

use crate::query::ParseWarning;
use crate::query::dates;
use crate::registry::{DueBucket, StatusCategories};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// SCALAR-OR-ARRAY
// ============================================================================

/// One value or several; several always means "any of".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    /// Collapse a list into the canonical shape: one element becomes
    /// `One`, empty becomes nothing at all.
    pub fn from_vec(mut values: Vec<T>) -> Option<Self> {
        match values.len() {
            0 => None,
            1 => Some(OneOrMany::One(values.remove(0))),
            _ => Some(OneOrMany::Many(values)),
        }
    }

    /// Iterate the values regardless of shape.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        match self {
            OneOrMany::One(value) => std::slice::from_ref(value).iter(),
            OneOrMany::Many(values) => values.iter(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            OneOrMany::One(_) => 1,
            OneOrMany::Many(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ============================================================================
// PRIORITY
// ============================================================================

/// Priority sentinels: presence/absence instead of a concrete level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrioritySentinel {
    /// Every task, with or without a priority
    All,
    /// Any task that has some priority set
    Any,
    /// Only tasks with no priority at all
    None,
}

impl PrioritySentinel {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrioritySentinel::All => "all",
            PrioritySentinel::Any => "any",
            PrioritySentinel::None => "none",
        }
    }

    pub fn parse_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "all" => Some(PrioritySentinel::All),
            "any" => Some(PrioritySentinel::Any),
            "none" => Some(PrioritySentinel::None),
            _ => None,
        }
    }
}

impl fmt::Display for PrioritySentinel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Priority filter: a level, several levels, or a sentinel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PriorityFilter {
    Sentinel(PrioritySentinel),
    Level(u8),
    Levels(Vec<u8>),
}

impl PriorityFilter {
    /// Whether a task's priority satisfies this filter.
    pub fn matches(&self, priority: Option<u8>) -> bool {
        match self {
            PriorityFilter::Sentinel(PrioritySentinel::All) => true,
            PriorityFilter::Sentinel(PrioritySentinel::Any) => priority.is_some(),
            PriorityFilter::Sentinel(PrioritySentinel::None) => priority.is_none(),
            PriorityFilter::Level(level) => priority == Some(*level),
            PriorityFilter::Levels(levels) => {
                priority.map(|p| levels.contains(&p)).unwrap_or(false)
            }
        }
    }
}

// ============================================================================
// DUE DATE
// ============================================================================

/// One due-date filter value, written as a string: a bucket keyword, an
/// ISO date, or a relative expression.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DueDateValue {
    /// Relative bucket, resolved against "today" at match time
    Bucket(DueBucket),
    /// Exact calendar date
    Date(NaiveDate),
    /// Exactly N days from today
    InDays(u32),
}

impl DueDateValue {
    /// Whether a task's due date satisfies this value on the given day.
    pub fn matches(&self, due: Option<NaiveDate>, today: NaiveDate) -> bool {
        match self {
            DueDateValue::Bucket(bucket) => dates::bucket_matches(*bucket, due, today),
            DueDateValue::Date(date) => due == Some(*date),
            DueDateValue::InDays(days) => due == Some(dates::days_from(today, *days)),
        }
    }
}

impl fmt::Display for DueDateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DueDateValue::Bucket(bucket) => write!(f, "{bucket}"),
            DueDateValue::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            DueDateValue::InDays(days) => write!(f, "in {days} days"),
        }
    }
}

impl TryFrom<String> for DueDateValue {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        dates::parse_due_value(&value).ok_or_else(|| format!("unrecognized due value `{value}`"))
    }
}

impl From<DueDateValue> for String {
    fn from(value: DueDateValue) -> String {
        value.to_string()
    }
}

// ============================================================================
// DATE RANGE
// ============================================================================

/// Inclusive due-date range; either bound may be open.
///
/// A range with no bounds at all still means something: "has any due
/// date". Tasks without a due date never match a range filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Whether a task's due date falls inside the range, bounds inclusive.
    pub fn matches(&self, due: Option<NaiveDate>) -> bool {
        let Some(due) = due else {
            return false;
        };
        if let Some(start) = self.start {
            if due < start {
                return false;
            }
        }
        if let Some(end) = self.end {
            if due > end {
                return false;
            }
        }
        true
    }

    /// Swap inverted bounds in place. Returns true when a swap happened.
    pub fn normalize(&mut self) -> bool {
        if let (Some(start), Some(end)) = (self.start, self.end) {
            if start > end {
                self.start = Some(end);
                self.end = Some(start);
                return true;
            }
        }
        false
    }
}

// ============================================================================
// OPERATOR HINTS
// ============================================================================

/// Boolean operator words spotted in the query.
///
/// `and` switches keyword matching from any-of to all-of; `or` and `not`
/// are recorded for callers that post-process results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OperatorHints {
    pub and: bool,
    pub or: bool,
    pub not: bool,
}

impl OperatorHints {
    pub fn any(&self) -> bool {
        self.and || self.or || self.not
    }
}

// ============================================================================
// TASK FILTER
// ============================================================================

/// The structured filter every search runs on.
///
/// Built by the parser from query text, or deserialized directly from
/// AI-generated JSON. Every field is optional; an entirely empty filter
/// matches everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskFilter {
    /// Priority level(s) or sentinel
    pub priority: Option<PriorityFilter>,
    /// Due-date value(s): buckets, exact dates, relative expressions
    pub due_date: Option<OneOrMany<DueDateValue>>,
    /// Inclusive due-date range, combined with `due_date` as AND
    pub due_date_range: Option<DateRange>,
    /// Status category key(s); raw values are resolved by [`Self::normalize`]
    pub status: Option<OneOrMany<String>>,
    /// Folder scope, matches the folder itself and everything below it
    pub folder: Option<String>,
    /// Tags that must all be present (nested tags match by prefix)
    pub tags: Vec<String>,
    /// Free-text keywords for relevance scoring and text matching
    pub keywords: Vec<String>,
    /// Boolean operator words spotted in the query
    pub operators: OperatorHints,
}

impl TaskFilter {
    /// True when the filter constrains nothing at all.
    pub fn is_empty(&self) -> bool {
        self.priority.is_none()
            && self.due_date.is_none()
            && self.due_date_range.is_none()
            && self.status.is_none()
            && self.folder.is_none()
            && self.tags.is_empty()
            && self.keywords.is_empty()
    }

    /// Normalize the filter in place: resolve raw status values onto
    /// canonical category keys and repair inverted date ranges.
    ///
    /// Runs on every filter regardless of origin, so a hand-written JSON
    /// filter gets the same treatment as parser output.
    pub fn normalize(&mut self, categories: &StatusCategories) -> Vec<ParseWarning> {
        let mut warnings = Vec::new();

        if let Some(status) = self.status.take() {
            let mut resolved: Vec<String> = Vec::new();
            for value in status.iter() {
                match categories.resolve(value) {
                    Some(key) => {
                        if !resolved.iter().any(|k| k == key) {
                            resolved.push(key.to_string());
                        }
                    }
                    None => {
                        warnings.push(ParseWarning::UnknownStatus {
                            value: value.clone(),
                        });
                    }
                }
            }
            self.status = OneOrMany::from_vec(resolved);
        }

        if let Some(range) = self.due_date_range.as_mut() {
            if range.normalize() {
                warnings.push(ParseWarning::InvertedDateRange);
            }
        }

        warnings
    }
}

// ============================================================================
// TESTS
// ============================================================================
