//! Compiled patterns for the explicit query syntax.
//!
//! Patterns are fixed; user configuration extends vocabularies, never
//! syntax. All matching is case-insensitive (`BEFORE 2025-12-31` works).
//! Date captures are deliberately loose (`\d{4}-\d{1,2}-\d{1,2}`) so that
//! a malformed calendar date like `2025-13-45` still matches the syntax
//! and can be reported as a warning instead of leaking into keywords.

use regex::Regex;
use std::sync::LazyLock;

/// Bare short-form priority token: `p1` .. `p4` (any digits captured so
/// out-of-range values can be reported)
pub static PRIORITY_SHORT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bp(\d{1,2})\b").unwrap());

/// Field-form priority: `p:1,3` / `priority:high` / `priority:none`
pub static PRIORITY_FIELD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)\b(?:p|priority):([^\s"]+)"#).unwrap());

/// Field-form status: `s:done` / `status:open,in_progress`
pub static STATUS_FIELD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)\b(?:s|status):([^\s"]+)"#).unwrap());

/// Field-form due date: `d:today` / `due:2025-03-01,overdue`
pub static DUE_FIELD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)\b(?:d|due):([^\s"]+)"#).unwrap());

/// Project-wide tag: `##release`
pub static PROJECT_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"##([\p{L}\p{N}_][\p{L}\p{N}_/-]*)").unwrap());

/// Plain tag: `#bug`, `#area/backend`, CJK letters included
pub static TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#([\p{L}\p{N}_][\p{L}\p{N}_/-]*)").unwrap());

/// Quoted folder scope: `folder:"Projects/Work"`
pub static FOLDER_QUOTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)\bfolder:"([^"]+)""#).unwrap());

/// Bare folder scope: `folder:Work`
pub static FOLDER_BARE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)\bfolder:([^\s"]+)"#).unwrap());

/// Quoted search phrase kept verbatim as a keyword: `search:"login page"`
pub static SEARCH_QUOTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)\bsearch:"([^"]+)""#).unwrap());

/// Bare search term: `search:login`
pub static SEARCH_BARE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)\bsearch:([^\s"]+)"#).unwrap());

/// Open-ended upper bound: `before 2025-12-31`
pub static RANGE_BEFORE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bbefore\s+(\d{4}-\d{1,2}-\d{1,2})\b").unwrap());

/// Open-ended lower bound: `after 2025-01-01`
pub static RANGE_AFTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bafter\s+(\d{4}-\d{1,2}-\d{1,2})\b").unwrap());

/// Bounded range: `from 2025-01-01 to 2025-06-30`
pub static RANGE_FROM_TO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bfrom\s+(\d{4}-\d{1,2}-\d{1,2})\s+to\s+(\d{4}-\d{1,2}-\d{1,2})\b").unwrap()
});

/// Boolean operator words, detected as hints only
pub static OPERATOR_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(and|or|not)\b").unwrap());

/// Relative due expression inside `due:` values: `in 3 days` / `3d`
pub static RELATIVE_DAYS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:in\s*)?(\d{1,3})\s*d(?:ays?)?$").unwrap());

/// Strict ISO shape for `due:` values (calendar validity checked separately)
pub static ISO_DATE_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{1,2}-\d{1,2}$").unwrap());
