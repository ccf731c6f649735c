//! Test Data Factory
//!
//! Generates realistic vault contents for end-to-end tests:
//! - backend records with configurable fields
//! - bulk generation with a fixed, documented rotation for scale tests
//! - pre-built scenarios for common query journeys
//!
//! Scenario due dates are computed against a caller-supplied "today" so
//! tests stay stable no matter when they run.

use chrono::{Duration, NaiveDate};
use std::collections::HashMap;
use tasklens_core::task::{BackendRecord, ChecklistRecord, MetadataRecord, RecordId};

/// Factory for creating test records and scenarios.
pub struct VaultFactory;

/// A set of related records plus metadata for test assertions.
///
/// `metadata` maps stable keys ("login_bug", "overdue", ...) to the
/// `path:line` id of the record they name.
#[derive(Debug)]
pub struct VaultScenario {
    pub records: Vec<BackendRecord>,
    pub description: String,
    pub metadata: HashMap<String, String>,
}

impl VaultScenario {
    /// The record id stored under a metadata key.
    pub fn id_of(&self, key: &str) -> &str {
        self.metadata
            .get(key)
            .map(String::as_str)
            .unwrap_or_else(|| panic!("scenario has no metadata key `{key}`"))
    }
}

impl VaultFactory {
    // ========================================================================
    // SINGLE RECORD CREATION
    // ========================================================================

    /// A bare open checklist task with no dates, priority or tags.
    pub fn open_task(path: &str, line: u32, text: &str) -> BackendRecord {
        Self::checklist_task(path, line, text, " ", None, None, &[])
    }

    /// A checklist record with full control over the searchable fields.
    pub fn checklist_task(
        path: &str,
        line: u32,
        text: &str,
        symbol: &str,
        priority: Option<&str>,
        due: Option<NaiveDate>,
        tags: &[&str],
    ) -> BackendRecord {
        BackendRecord::Checklist(ChecklistRecord {
            path: path.to_string(),
            line,
            text: text.to_string(),
            symbol: Some(symbol.to_string()),
            due: due.map(|d| d.to_string()),
            priority: priority.map(String::from),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            ..ChecklistRecord::default()
        })
    }

    /// A metadata-index record with raw key/value fields.
    pub fn metadata_task(
        path: &str,
        line: u32,
        text: &str,
        symbol: &str,
        fields: &[(&str, &str)],
        tags: &[&str],
    ) -> BackendRecord {
        BackendRecord::Metadata(MetadataRecord {
            path: path.to_string(),
            line,
            text: text.to_string(),
            symbol: Some(symbol.to_string()),
            fields: fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        })
    }

    // ========================================================================
    // SCENARIO CREATION
    // ========================================================================

    /// A small sprint vault mixing priorities, due dates, statuses, tags
    /// and folders. The shape most journey tests start from.
    pub fn create_sprint_scenario(today: NaiveDate) -> VaultScenario {
        let mut records = Vec::new();
        let mut metadata = HashMap::new();
        let mut add = |key: &str, record: BackendRecord| {
            metadata.insert(
                key.to_string(),
                RecordId::new(record.path(), record.line()).to_string(),
            );
            records.push(record);
        };

        add(
            "login_bug",
            Self::checklist_task(
                "Work/Sprint/auth.md",
                4,
                "fix login bug on the auth page",
                " ",
                Some("1"),
                Some(today + Duration::days(1)),
                &["bug", "auth"],
            ),
        );
        add(
            "api_timeout",
            Self::checklist_task(
                "Work/Sprint/api.md",
                9,
                "investigate api timeout bug",
                "/",
                Some("2"),
                Some(today - Duration::days(2)),
                &["bug"],
            ),
        );
        add(
            "release_notes",
            Self::checklist_task(
                "Work/Sprint/notes.md",
                2,
                "write release notes",
                " ",
                Some("3"),
                Some(today + Duration::days(9)),
                &[],
            ),
        );
        add(
            "groceries",
            Self::checklist_task(
                "Personal/home.md",
                1,
                "buy groceries",
                " ",
                None,
                None,
                &["errands"],
            ),
        );
        add(
            "login_styling",
            Self::checklist_task(
                "Work/Sprint/auth.md",
                11,
                "polish login styling",
                "x",
                Some("2"),
                None,
                &["auth"],
            ),
        );
        add(
            "payment_bug",
            Self::checklist_task(
                "Work/Billing/pay.md",
                7,
                "payment processing bug",
                " ",
                Some("1"),
                Some(today),
                &["payments", "bug"],
            ),
        );
        add(
            "cache_spike",
            Self::checklist_task(
                "Work/Sprint/spike.md",
                3,
                "evaluate cache library",
                "-",
                None,
                None,
                &[],
            ),
        );

        VaultScenario {
            records,
            description: "Sprint vault with mixed priorities, dues and statuses".to_string(),
            metadata,
        }
    }

    /// One open task per due-date bucket, plus one with no date at all.
    pub fn create_due_spread_scenario(today: NaiveDate) -> VaultScenario {
        let offsets: [(&str, Option<i64>); 7] = [
            ("overdue", Some(-3)),
            ("today", Some(0)),
            ("tomorrow", Some(1)),
            ("this_week", Some(5)),
            ("next_week", Some(10)),
            ("future", Some(45)),
            ("undated", None),
        ];

        let mut records = Vec::new();
        let mut metadata = HashMap::new();
        for (line, (key, offset)) in offsets.into_iter().enumerate() {
            let line = line as u32 + 1;
            let due = offset.map(|days| today + Duration::days(days));
            metadata.insert(
                key.to_string(),
                RecordId::new("Planner/due.md", line).to_string(),
            );
            records.push(Self::checklist_task(
                "Planner/due.md",
                line,
                &format!("{} deadline item", key.replace('_', " ")),
                " ",
                None,
                due,
                &[],
            ));
        }

        VaultScenario {
            records,
            description: "One task per due bucket".to_string(),
            metadata,
        }
    }

    /// One task per status category, including an unclaimed symbol that
    /// resolves to the catch-all.
    pub fn create_status_spread_scenario() -> VaultScenario {
        let symbols: [(&str, &str); 5] = [
            ("open", " "),
            ("in_progress", "/"),
            ("completed", "x"),
            ("cancelled", "-"),
            ("other", "?"),
        ];

        let mut records = Vec::new();
        let mut metadata = HashMap::new();
        for (line, (key, symbol)) in symbols.into_iter().enumerate() {
            let line = line as u32 + 1;
            metadata.insert(
                key.to_string(),
                RecordId::new("Planner/status.md", line).to_string(),
            );
            records.push(Self::checklist_task(
                "Planner/status.md",
                line,
                &format!("{} checklist entry", key.replace('_', " ")),
                symbol,
                None,
                None,
                &[],
            ));
        }

        VaultScenario {
            records,
            description: "One task per status category".to_string(),
            metadata,
        }
    }

    /// Folder tree with nested tags, for scope tests. "Archive/Work" is
    /// deliberately NOT under "Work".
    pub fn create_folder_tree_scenario() -> VaultScenario {
        let entries: [(&str, &str, &str, &[&str]); 5] = [
            ("client_a", "Work/ClientA/site.md", "update client homepage", &["work/clienta"]),
            ("client_b", "Work/ClientB/app.md", "ship beta build", &["work/clientb"]),
            ("passport", "Personal/errands.md", "renew passport", &["personal"]),
            ("archived", "Archive/Work/old.md", "retired work item", &["work"]),
            ("inbox", "inbox.md", "triage new inbox item", &[]),
        ];

        let mut records = Vec::new();
        let mut metadata = HashMap::new();
        for (key, path, text, tags) in entries {
            metadata.insert(key.to_string(), RecordId::new(path, 1).to_string());
            records.push(Self::checklist_task(path, 1, text, " ", None, None, tags));
        }

        VaultScenario {
            records,
            description: "Folder tree with nested tags".to_string(),
            metadata,
        }
    }

    /// Chinese and English tasks side by side.
    pub fn create_multilingual_scenario(today: NaiveDate) -> VaultScenario {
        let mut records = Vec::new();
        let mut metadata = HashMap::new();
        let mut add = |key: &str, record: BackendRecord| {
            metadata.insert(
                key.to_string(),
                RecordId::new(record.path(), record.line()).to_string(),
            );
            records.push(record);
        };

        add(
            "cn_crash",
            Self::checklist_task(
                "Work/cn.md",
                1,
                "修复登录页面的崩溃问题",
                " ",
                Some("1"),
                Some(today + Duration::days(1)),
                &[],
            ),
        );
        add(
            "cn_report",
            Self::checklist_task(
                "Work/cn.md",
                2,
                "写本周的项目周报",
                " ",
                None,
                Some(today),
                &[],
            ),
        );
        add(
            "en_review",
            Self::checklist_task(
                "Work/en.md",
                1,
                "review quarterly plan",
                " ",
                Some("2"),
                None,
                &[],
            ),
        );

        VaultScenario {
            records,
            description: "Chinese and English tasks".to_string(),
            metadata,
        }
    }

    // ========================================================================
    // BULK CREATION
    // ========================================================================

    /// Deterministic bulk records for scale tests.
    ///
    /// The rotation is part of the contract tests reason about:
    /// - folder: 5-way cycle, `Archive/2024` included
    /// - symbol: "x" when `i % 10 == 9`, open otherwise
    /// - priority: `i % 5`, where 0 means none and 1-4 are the levels
    /// - due: `i % 6` picks none, today-2, today, today+3, today+10, today+40
    /// - text: `task {i:05} ...`, with " login" appended when `i % 10 == 0`
    pub fn bulk_checklist(count: usize, today: NaiveDate) -> Vec<BackendRecord> {
        const FOLDERS: [&str; 5] = ["Work/Alpha", "Work/Beta", "Personal", "Inbox", "Archive/2024"];

        (0..count)
            .map(|i| {
                let path = format!("{}/bulk-{}.md", FOLDERS[i % FOLDERS.len()], i / 100);
                let symbol = if i % 10 == 9 { "x" } else { " " };
                let priority = match i % 5 {
                    0 => None,
                    level => Some(level.to_string()),
                };
                let due = match i % 6 {
                    0 => None,
                    1 => Some(today - Duration::days(2)),
                    2 => Some(today),
                    3 => Some(today + Duration::days(3)),
                    4 => Some(today + Duration::days(10)),
                    _ => Some(today + Duration::days(40)),
                };
                let mut text = format!("task {i:05} {}", Self::lorem_task_text(4, i));
                if i % 10 == 0 {
                    text.push_str(" login");
                }
                BackendRecord::Checklist(ChecklistRecord {
                    path,
                    line: i as u32,
                    text,
                    symbol: Some(symbol.to_string()),
                    due: due.map(|d| d.to_string()),
                    priority,
                    tags: vec![format!("area-{}", i % 3)],
                    ..ChecklistRecord::default()
                })
            })
            .collect()
    }

    // ========================================================================
    // UTILITY METHODS
    // ========================================================================

    /// Deterministic task-flavored filler text.
    ///
    /// The vocabulary avoids every built-in trigger word so generated
    /// text never accidentally parses as priority, due or status.
    pub fn lorem_task_text(words: usize, seed: usize) -> String {
        const WORDS: [&str; 20] = [
            "review", "update", "draft", "schedule", "email", "report", "meeting", "notes",
            "budget", "design", "backlog", "sprint", "cleanup", "archive", "plan", "sync",
            "invoice", "roadmap", "survey", "deck",
        ];

        (0..words)
            .map(|i| WORDS[(seed + i * 7) % WORDS.len()])
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_sprint_scenario_metadata_points_at_records() {
        let scenario = VaultFactory::create_sprint_scenario(day(2026, 3, 10));
        assert_eq!(scenario.records.len(), 7);
        assert_eq!(scenario.id_of("login_bug"), "Work/Sprint/auth.md:4");
        assert_eq!(scenario.id_of("payment_bug"), "Work/Billing/pay.md:7");
    }

    #[test]
    fn test_due_spread_covers_every_bucket() {
        let scenario = VaultFactory::create_due_spread_scenario(day(2026, 3, 10));
        assert_eq!(scenario.records.len(), 7);
        for key in ["overdue", "today", "tomorrow", "this_week", "next_week", "future", "undated"] {
            assert!(scenario.metadata.contains_key(key), "missing {key}");
        }
    }

    #[test]
    fn test_bulk_rotation_is_deterministic() {
        let today = day(2026, 3, 10);
        let a = VaultFactory::bulk_checklist(50, today);
        let b = VaultFactory::bulk_checklist(50, today);
        assert_eq!(a, b);

        match &a[10] {
            BackendRecord::Checklist(r) => {
                assert!(r.text.ends_with(" login"));
                assert_eq!(r.symbol.as_deref(), Some(" "));
            }
            _ => panic!("bulk records are checklist records"),
        }
    }

    #[test]
    fn test_lorem_text_has_requested_word_count() {
        let text = VaultFactory::lorem_task_text(10, 42);
        assert_eq!(text.split_whitespace().count(), 10);
    }
}
