//! Parser Scenarios
//!
//! Query-language behavior observed through full searches: typo
//! correction, quoted forms, date ranges, Chinese vocabulary, boolean
//! hints and the warnings surfaced for values the parser cannot use.

use chrono::{Duration, NaiveDate};
use tasklens_core::query::ParseWarning;
use tasklens_e2e_tests::harness::TestIndexManager;
use tasklens_e2e_tests::mocks::VaultFactory;

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

fn result_ids(outcome: &tasklens_core::engine::SearchOutcome) -> Vec<String> {
    outcome
        .tasks
        .iter()
        .map(|scored| scored.task.id.to_string())
        .collect()
}

// ============================================================================
// TYPO CORRECTION AND QUOTING
// ============================================================================

#[tokio::test]
async fn test_typo_corrected_words_still_match() {
    let manager = TestIndexManager::new();
    let scenario = VaultFactory::create_sprint_scenario(today());
    manager.index.extend(scenario.records.clone());

    // "urgnt" corrects to "urgent", which is a priority-1 term.
    let outcome = manager.engine.search("urgnt login").await.unwrap();

    assert_eq!(result_ids(&outcome), vec![scenario.id_of("login_bug")]);
}

#[tokio::test]
async fn test_quoted_folder_shields_term_vocabulary() {
    let manager = TestIndexManager::new();
    manager
        .index
        .push(VaultFactory::open_task("urgent stuff/list.md", 1, "water plants"));
    manager
        .index
        .push(VaultFactory::open_task("Inbox/notes.md", 1, "water garden"));

    // Inside quotes "urgent" is a folder name, not a priority term. The
    // task has no priority, so any leak would return nothing.
    let outcome = manager
        .engine
        .search(r#"folder:"urgent stuff""#)
        .await
        .unwrap();

    assert_eq!(result_ids(&outcome), vec!["urgent stuff/list.md:1"]);
}

#[tokio::test]
async fn test_quoted_search_phrase_matches_exact_substring() {
    let manager = TestIndexManager::new();
    let scenario = VaultFactory::create_sprint_scenario(today());
    manager.index.extend(scenario.records.clone());
    manager.index.push(VaultFactory::open_task(
        "Work/Sprint/copy.md",
        1,
        "review login page copy",
    ));

    let outcome = manager
        .engine
        .search(r#"search:"login page""#)
        .await
        .unwrap();

    // "fix login bug on the auth page" has both words but not the phrase.
    assert_eq!(result_ids(&outcome), vec!["Work/Sprint/copy.md:1"]);
}

// ============================================================================
// DATES
// ============================================================================

#[tokio::test]
async fn test_explicit_date_range_bounds_are_inclusive() {
    let manager = TestIndexManager::new();
    let scenario = VaultFactory::create_due_spread_scenario(today());
    manager.index.extend(scenario.records.clone());

    let from = today() + Duration::days(5);
    let to = today() + Duration::days(10);
    let outcome = manager
        .engine
        .search(&format!("from {from} to {to}"))
        .await
        .unwrap();

    assert_eq!(
        result_ids(&outcome),
        vec![scenario.id_of("this_week"), scenario.id_of("next_week")]
    );
}

#[tokio::test]
async fn test_malformed_due_date_warns_but_searches() {
    let manager = TestIndexManager::new();
    let scenario = VaultFactory::create_sprint_scenario(today());
    manager.index.extend(scenario.records.clone());

    let outcome = manager.engine.search("due:2025-13-45 login").await.unwrap();

    assert_eq!(
        outcome.warnings,
        vec![ParseWarning::MalformedDate {
            raw: "2025-13-45".to_string()
        }]
    );
    // The bad date is dropped, the keyword still applies.
    assert_eq!(
        result_ids(&outcome),
        vec![
            scenario.id_of("login_bug"),
            scenario.id_of("login_styling"),
        ]
    );
}

// ============================================================================
// CHINESE VOCABULARY
// ============================================================================

#[tokio::test]
async fn test_chinese_priority_terms() {
    let manager = TestIndexManager::new();
    let scenario = VaultFactory::create_multilingual_scenario(today());
    manager.index.extend(scenario.records.clone());

    let outcome = manager.engine.search("高优先级").await.unwrap();

    assert_eq!(result_ids(&outcome), vec![scenario.id_of("cn_crash")]);
}

#[tokio::test]
async fn test_chinese_keywords_match_substrings() {
    let manager = TestIndexManager::new();
    let scenario = VaultFactory::create_multilingual_scenario(today());
    manager.index.extend(scenario.records.clone());

    let outcome = manager.engine.search("登录").await.unwrap();

    assert_eq!(result_ids(&outcome), vec![scenario.id_of("cn_crash")]);
}

// ============================================================================
// BOOLEAN HINTS
// ============================================================================

#[tokio::test]
async fn test_and_operator_requires_all_keywords() {
    let manager = TestIndexManager::new();
    let scenario = VaultFactory::create_sprint_scenario(today());
    manager.index.extend(scenario.records.clone());

    let any_of = manager.engine.search("login bug").await.unwrap();
    let all_of = manager.engine.search("login and bug").await.unwrap();

    assert_eq!(any_of.tasks.len(), 4);
    assert_eq!(result_ids(&all_of), vec![scenario.id_of("login_bug")]);
}

#[tokio::test]
async fn test_or_operator_keeps_any_of_matching() {
    let manager = TestIndexManager::new();
    let scenario = VaultFactory::create_sprint_scenario(today());
    manager.index.extend(scenario.records.clone());

    let outcome = manager.engine.search("login or payment").await.unwrap();

    assert_eq!(
        result_ids(&outcome),
        vec![
            scenario.id_of("payment_bug"),
            scenario.id_of("login_bug"),
            scenario.id_of("login_styling"),
        ]
    );
}

// ============================================================================
// STATUS AND TAGS
// ============================================================================

#[tokio::test]
async fn test_unknown_status_value_warns_and_drops() {
    let manager = TestIndexManager::new();
    let scenario = VaultFactory::create_sprint_scenario(today());
    manager.index.extend(scenario.records.clone());

    let outcome = manager.engine.search("status:bogus,done").await.unwrap();

    assert_eq!(
        outcome.warnings,
        vec![ParseWarning::UnknownStatus {
            value: "bogus".to_string()
        }]
    );
    assert_eq!(result_ids(&outcome), vec![scenario.id_of("login_styling")]);
}

#[tokio::test]
async fn test_hash_prefixed_level_stays_a_tag() {
    let manager = TestIndexManager::new();
    manager
        .index
        .extend(VaultFactory::create_sprint_scenario(today()).records);
    manager.index.push(VaultFactory::checklist_task(
        "Inbox/triage.md",
        2,
        "triage backlog",
        " ",
        None,
        None,
        &["p1"],
    ));

    // #p1 is a tag filter; the sprint's priority-1 tasks lack that tag.
    let outcome = manager.engine.search("#p1").await.unwrap();

    assert_eq!(result_ids(&outcome), vec!["Inbox/triage.md:2"]);
}
