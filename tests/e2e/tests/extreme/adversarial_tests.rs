//! Adversarial Input Tests
//!
//! Hostile queries and malformed records: the engine must degrade to
//! empty or partial results, never to a panic or an error. Garbage field
//! values parse to absent, unclaimed symbols land in the catch-all
//! status, and thresholds past the ceiling just return nothing.

use chrono::NaiveDate;
use tasklens_core::config::SearchConfig;
use tasklens_core::query::TaskFilter;
use tasklens_core::scoring::ScoreWeights;
use tasklens_core::task::{BackendRecord, ChecklistRecord};
use tasklens_e2e_tests::harness::TestIndexManager;
use tasklens_e2e_tests::mocks::VaultFactory;

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

// ============================================================================
// HOSTILE QUERIES
// ============================================================================

#[tokio::test]
async fn test_hostile_query_strings_return_ok() {
    let manager = TestIndexManager::new();
    manager
        .index
        .extend(VaultFactory::create_sprint_scenario(today()).records);

    let queries = [
        "!!!",
        "???",
        "----",
        "((()))",
        "#",
        "####",
        "p:",
        "due:",
        "from to",
        r#"folder:"unclosed"#,
        "\"\"\"",
        "p99999999999999999999",
        "🔥🔥🔥 💥",
        "قائمة المهام",
        "status:,,,",
    ];

    for query in queries {
        let outcome = manager.engine.search(query).await;
        assert!(outcome.is_ok(), "query {query:?} should not fail");
    }
}

#[tokio::test]
async fn test_very_long_query_is_handled() {
    let manager = TestIndexManager::new();
    manager.seed_tasks(10);

    let query = "review ".repeat(2_000);
    let outcome = manager.engine.search(&query).await.unwrap();

    assert!(outcome.warnings.is_empty());
    assert!(outcome.tasks.is_empty());
}

// ============================================================================
// MALFORMED RECORDS
// ============================================================================

#[tokio::test]
async fn test_garbage_record_fields_degrade_gracefully() {
    let manager = TestIndexManager::new();
    manager.index.push(BackendRecord::Checklist(ChecklistRecord {
        path: "junk.md".to_string(),
        line: 1,
        text: "due date is word salad".to_string(),
        symbol: Some(" ".to_string()),
        due: Some("not-a-date".to_string()),
        priority: Some("banana".to_string()),
        ..ChecklistRecord::default()
    }));
    manager.index.push(BackendRecord::Checklist(ChecklistRecord {
        path: "junk.md".to_string(),
        line: 2,
        text: "month thirteen".to_string(),
        symbol: Some(" ".to_string()),
        due: Some("2025-99-99".to_string()),
        ..ChecklistRecord::default()
    }));
    manager.index.push(BackendRecord::Checklist(ChecklistRecord {
        path: "junk.md".to_string(),
        line: 3,
        text: "snowman checkbox".to_string(),
        symbol: Some("☃".to_string()),
        ..ChecklistRecord::default()
    }));

    let outcome = manager.engine.search("").await.unwrap();

    assert_eq!(outcome.tasks.len(), 3);
    for scored in &outcome.tasks {
        assert_eq!(scored.task.due_date, None);
        assert_eq!(scored.task.priority, None);
    }
    let snowman = outcome
        .tasks
        .iter()
        .find(|s| s.task.id.as_str() == "junk.md:3")
        .unwrap();
    assert_eq!(snowman.task.status, "other");
}

#[tokio::test]
async fn test_empty_and_whitespace_texts_are_searchable() {
    let manager = TestIndexManager::new();
    manager
        .index
        .push(VaultFactory::open_task("blank.md", 1, ""));
    manager
        .index
        .push(VaultFactory::open_task("blank.md", 2, "   "));

    let all = manager.engine.search("").await.unwrap();
    assert_eq!(all.tasks.len(), 2);

    let keyword = manager.engine.search("anything").await.unwrap();
    assert!(keyword.tasks.is_empty());
}

#[tokio::test]
async fn test_duplicate_record_ids_are_both_returned() {
    let manager = TestIndexManager::new();
    manager
        .index
        .push(VaultFactory::open_task("dup.md", 5, "first copy"));
    manager
        .index
        .push(VaultFactory::open_task("dup.md", 5, "second copy"));

    let outcome = manager.engine.search("copy").await.unwrap();

    assert_eq!(outcome.tasks.len(), 2);
    let texts: Vec<&str> = outcome.tasks.iter().map(|s| s.task.text.as_str()).collect();
    assert!(texts.contains(&"first copy"));
    assert!(texts.contains(&"second copy"));
}

// ============================================================================
// DEGENERATE CONFIGURATION
// ============================================================================

#[tokio::test]
async fn test_zero_weights_produce_zero_scores() {
    let manager = TestIndexManager::with_config(SearchConfig {
        weights: ScoreWeights {
            relevance: 0.0,
            due_date: 0.0,
            priority: 0.0,
            status: 0.0,
            core_keyword_weight: 0.0,
            ..ScoreWeights::default()
        },
        ..SearchConfig::default()
    });
    manager
        .index
        .extend(VaultFactory::create_sprint_scenario(today()).records);

    let outcome = manager.engine.search("login").await.unwrap();

    assert_eq!(outcome.tasks.len(), 2);
    for scored in &outcome.tasks {
        assert_eq!(scored.scores.final_score, 0.0);
    }
}

#[tokio::test]
async fn test_quality_threshold_above_ceiling_yields_empty_ok() {
    let manager = TestIndexManager::with_config(SearchConfig {
        min_quality_score: Some(100.0),
        ..SearchConfig::default()
    });
    manager
        .index
        .extend(VaultFactory::create_sprint_scenario(today()).records);

    let outcome = manager.engine.search("login").await.unwrap();

    assert!(outcome.tasks.is_empty());
    assert_eq!(outcome.total_candidates, 0);
}

#[tokio::test]
async fn test_conflicting_filters_yield_empty_ok() {
    let manager = TestIndexManager::new();
    manager
        .index
        .extend(VaultFactory::create_sprint_scenario(today()).records);

    // Keyword matches exist, but they all carry a priority.
    let filter: TaskFilter = serde_json::from_value(serde_json::json!({
        "priority": "none",
        "keywords": ["login"],
    }))
    .unwrap();
    let outcome = manager.engine.search_with_filter(filter).await.unwrap();

    assert!(outcome.tasks.is_empty());
    assert!(outcome.warnings.is_empty());
}

#[tokio::test]
async fn test_unclaimed_symbol_resolves_to_catch_all() {
    let manager = TestIndexManager::new();
    let scenario = VaultFactory::create_status_spread_scenario();
    manager.index.extend(scenario.records.clone());

    let filter: TaskFilter =
        serde_json::from_value(serde_json::json!({ "status": "other" })).unwrap();
    let outcome = manager.engine.search_with_filter(filter).await.unwrap();

    assert_eq!(outcome.tasks.len(), 1);
    assert_eq!(outcome.tasks[0].task.id.as_str(), scenario.id_of("other"));
}
