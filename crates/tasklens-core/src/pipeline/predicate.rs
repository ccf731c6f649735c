//! Filter predicate.
//!
//! Decides whether one task satisfies a structured filter. All filter
//! semantics live here, independent of whatever native filtering an index
//! provider may offer, so behavior is identical across providers.

use crate::query::TaskFilter;
use crate::scoring::KeywordSets;
use crate::task::Task;
use chrono::NaiveDate;

/// Whether a task passes the whole filter: keywords plus every
/// structured field. Empty filters match everything.
pub fn matches_filter(
    task: &Task,
    filter: &TaskFilter,
    keywords: &KeywordSets,
    today: NaiveDate,
) -> bool {
    matches_keywords(&task.text, filter, keywords) && matches_structured(task, filter, today)
}

/// Keyword stage: cheap substring containment, checked before any
/// scoring happens.
///
/// By default a task passes when any keyword from the expanded set
/// appears in its text; an explicit `and` in the query demands every
/// core keyword instead.
pub fn matches_keywords(text: &str, filter: &TaskFilter, keywords: &KeywordSets) -> bool {
    if keywords.is_empty() {
        return true;
    }
    let haystack = text.to_lowercase();
    if filter.operators.and {
        keywords.core().iter().all(|k| haystack.contains(k.as_str()))
    } else {
        keywords.all().iter().any(|k| haystack.contains(k.as_str()))
    }
}

/// Every structured field of the filter, ANDed together.
pub fn matches_structured(task: &Task, filter: &TaskFilter, today: NaiveDate) -> bool {
    if let Some(priority) = &filter.priority {
        if !priority.matches(task.priority) {
            return false;
        }
    }
    if let Some(due) = &filter.due_date {
        if !due.iter().any(|value| value.matches(task.due_date, today)) {
            return false;
        }
    }
    if let Some(range) = &filter.due_date_range {
        if !range.matches(task.due_date) {
            return false;
        }
    }
    if let Some(status) = &filter.status {
        if !status.iter().any(|key| key == &task.status) {
            return false;
        }
    }
    if let Some(folder) = filter.folder.as_deref() {
        if !folder_matches(&task.folder, folder) {
            return false;
        }
    }
    if !filter.tags.is_empty() {
        let satisfied = filter
            .tags
            .iter()
            .all(|want| task.tags.iter().any(|tag| tag_matches(tag, want)));
        if !satisfied {
            return false;
        }
    }
    true
}

/// Folder scope match: the folder itself or anything nested below it,
/// case-insensitive. An empty scope matches everywhere.
fn folder_matches(task_folder: &str, wanted: &str) -> bool {
    if wanted.is_empty() {
        return true;
    }
    let folder = task_folder.to_lowercase();
    let wanted = wanted.to_lowercase();
    folder == wanted || folder.starts_with(&format!("{wanted}/"))
}

/// Tag match: exact or nested (`work` matches `work/errands`),
/// case-insensitive.
fn tag_matches(task_tag: &str, wanted: &str) -> bool {
    let tag = task_tag.to_lowercase();
    let wanted = wanted.to_lowercase();
    tag == wanted || tag.starts_with(&format!("{wanted}/"))
}
