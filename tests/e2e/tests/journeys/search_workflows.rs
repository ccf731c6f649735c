//! Complete Search Journeys
//!
//! Full query-to-results workflows over the in-memory index: free-text
//! queries, structured filters, folder and tag scoping, display limits
//! and index readiness. Every test goes through the public engine API.

use chrono::NaiveDate;
use std::time::Duration;
use tasklens_core::config::SearchConfig;
use tasklens_core::engine::EngineError;
use tasklens_core::provider::IndexBackend;
use tasklens_core::query::TaskFilter;
use tasklens_e2e_tests::harness::TestIndexManager;
use tasklens_e2e_tests::mocks::VaultFactory;

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Manager pre-loaded with the sprint scenario.
fn sprint_manager() -> (TestIndexManager, tasklens_e2e_tests::mocks::VaultScenario) {
    let manager = TestIndexManager::new();
    let scenario = VaultFactory::create_sprint_scenario(today());
    manager.index.extend(scenario.records.clone());
    (manager, scenario)
}

fn result_ids(outcome: &tasklens_core::engine::SearchOutcome) -> Vec<String> {
    outcome
        .tasks
        .iter()
        .map(|scored| scored.task.id.to_string())
        .collect()
}

// ============================================================================
// FREE-TEXT QUERIES
// ============================================================================

#[tokio::test]
async fn test_keyword_query_ranks_best_match_first() {
    let (manager, scenario) = sprint_manager();

    let outcome = manager.engine.search("login bug").await.unwrap();

    // Both keywords beat one keyword; one-keyword ties rank by due date,
    // dateless tasks last.
    assert_eq!(
        result_ids(&outcome),
        vec![
            scenario.id_of("login_bug"),
            scenario.id_of("api_timeout"),
            scenario.id_of("payment_bug"),
            scenario.id_of("login_styling"),
        ]
    );
    assert!(outcome.warnings.is_empty());
    assert!(!outcome.from_cache);
}

#[tokio::test]
async fn test_priority_shorthand_filters_levels() {
    let (manager, scenario) = sprint_manager();

    let outcome = manager.engine.search("p1").await.unwrap();

    // No keywords, so equal relevance; earlier due date wins.
    assert_eq!(
        result_ids(&outcome),
        vec![scenario.id_of("payment_bug"), scenario.id_of("login_bug")]
    );
}

#[tokio::test]
async fn test_natural_language_due_bucket() {
    let (manager, scenario) = sprint_manager();

    let outcome = manager.engine.search("overdue tasks").await.unwrap();

    // "tasks" is a stop word, "overdue" becomes a due bucket.
    assert_eq!(result_ids(&outcome), vec![scenario.id_of("api_timeout")]);
    assert!(outcome.warnings.is_empty());
}

#[tokio::test]
async fn test_natural_language_status() {
    let (manager, scenario) = sprint_manager();

    let outcome = manager.engine.search("done tasks").await.unwrap();

    assert_eq!(result_ids(&outcome), vec![scenario.id_of("login_styling")]);
}

#[tokio::test]
async fn test_empty_query_ranks_by_due_date() {
    let manager = TestIndexManager::new();
    let scenario = VaultFactory::create_due_spread_scenario(today());
    manager.index.extend(scenario.records.clone());

    let outcome = manager.engine.search("").await.unwrap();

    assert_eq!(
        result_ids(&outcome),
        vec![
            scenario.id_of("overdue"),
            scenario.id_of("today"),
            scenario.id_of("tomorrow"),
            scenario.id_of("this_week"),
            scenario.id_of("next_week"),
            scenario.id_of("future"),
            scenario.id_of("undated"),
        ]
    );
}

// ============================================================================
// FOLDER AND TAG SCOPE
// ============================================================================

#[tokio::test]
async fn test_folder_scope_includes_subfolders_only() {
    let manager = TestIndexManager::new();
    let scenario = VaultFactory::create_folder_tree_scenario();
    manager.index.extend(scenario.records.clone());

    let outcome = manager.engine.search(r#"folder:"Work""#).await.unwrap();

    // "Archive/Work" is not under "Work"; root-level notes have no folder.
    assert_eq!(
        result_ids(&outcome),
        vec![scenario.id_of("client_a"), scenario.id_of("client_b")]
    );
    for scored in &outcome.tasks {
        assert!(scored.task.folder.starts_with("Work"));
    }
}

#[tokio::test]
async fn test_tag_filter_requires_every_tag() {
    let (manager, scenario) = sprint_manager();

    let outcome = manager.engine.search("#bug #auth").await.unwrap();

    assert_eq!(result_ids(&outcome), vec![scenario.id_of("login_bug")]);
}

#[tokio::test]
async fn test_nested_tags_match_by_prefix() {
    let manager = TestIndexManager::new();
    let scenario = VaultFactory::create_folder_tree_scenario();
    manager.index.extend(scenario.records.clone());

    let outcome = manager.engine.search("#work").await.unwrap();

    // work/clienta and work/clientb count as work; personal does not.
    assert_eq!(
        result_ids(&outcome),
        vec![
            scenario.id_of("client_a"),
            scenario.id_of("client_b"),
            scenario.id_of("archived"),
        ]
    );
}

// ============================================================================
// STRUCTURED FILTERS
// ============================================================================

#[tokio::test]
async fn test_structured_filter_from_json() {
    let (manager, scenario) = sprint_manager();

    let filter: TaskFilter = serde_json::from_value(serde_json::json!({
        "priority": [1, 2],
        "status": "open",
    }))
    .unwrap();
    let outcome = manager.engine.search_with_filter(filter).await.unwrap();

    assert_eq!(
        result_ids(&outcome),
        vec![scenario.id_of("payment_bug"), scenario.id_of("login_bug")]
    );
    assert!(outcome.warnings.is_empty());
}

#[tokio::test]
async fn test_metadata_backend_field_fallbacks() {
    let manager = TestIndexManager::with_backend(IndexBackend::Metadata, SearchConfig::default());
    let due = (today() + chrono::Duration::days(1)).to_string();
    manager.index.push(VaultFactory::metadata_task(
        "Projects/plan.md",
        3,
        "quarterly objectives",
        " ",
        &[("deadline", &due), ("priority", "high")],
        &[],
    ));
    manager.index.push(VaultFactory::metadata_task(
        "Projects/plan.md",
        8,
        "supporting research",
        " ",
        &[],
        &[],
    ));

    // "deadline" backfills the due date, the word "high" maps to level 1.
    let outcome = manager.engine.search("p1 tomorrow").await.unwrap();

    assert_eq!(result_ids(&outcome), vec!["Projects/plan.md:3"]);
}

// ============================================================================
// LIMITS AND READINESS
// ============================================================================

#[tokio::test]
async fn test_display_limit_truncates_and_reports_pool() {
    let config = SearchConfig {
        display_limit: 2,
        ..SearchConfig::default()
    };
    let manager = TestIndexManager::with_config(config);
    let scenario = VaultFactory::create_sprint_scenario(today());
    manager.index.extend(scenario.records.clone());

    let outcome = manager.engine.search("").await.unwrap();

    // Collection stops at 3x the display limit, then the best two remain.
    assert_eq!(outcome.tasks.len(), 2);
    assert_eq!(outcome.total_candidates, 6);
    assert_eq!(
        result_ids(&outcome),
        vec![scenario.id_of("api_timeout"), scenario.id_of("payment_bug")]
    );
}

#[tokio::test]
async fn test_unready_index_errors_then_recovers() {
    let (manager, _) = sprint_manager();
    manager.index.set_ready(false);

    let err = manager.engine.search("login").await.unwrap_err();
    assert!(matches!(err, EngineError::IndexUnavailable(_)));

    let wait = manager
        .engine
        .wait_until_ready(Duration::from_millis(1), 2)
        .await;
    assert!(wait.is_err());

    manager.index.set_ready(true);
    manager
        .engine
        .wait_until_ready(Duration::from_millis(1), 2)
        .await
        .unwrap();
    let outcome = manager.engine.search("login").await.unwrap();
    assert_eq!(outcome.tasks.len(), 2);
}
