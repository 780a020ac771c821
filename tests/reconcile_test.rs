mod common;

use serde_json::json;

use alldeadlines::reconcile::{self, ApprovalOutcome, ReconcileError, diff};
use alldeadlines::store::RecordStore;
use common::{MemStore, conference_row, date, deadline, instant, suggestion_row};

fn create_suggestion() -> alldeadlines::models::suggestion::SuggestionRow {
    let mut s = suggestion_row(1, "Foo Bar");
    s.conf_start_date = Some(date(2026, 3, 1));
    s.conf_end_date = Some(date(2026, 3, 5));
    s.location = Some("Lisbon, Portugal".to_string());
    s.category = Some("AI".to_string());
    s.subfields = Some("NLP, CV".to_string());
    s.tags = vec!["machine-learning".to_string()];
    s.deadlines = json!([
        { "type": "Abstract", "due": "2026-01-10T23:59:00Z" },
        { "type": "Full Paper", "due": "2026-01-20" },
    ]);
    s
}

fn edit_suggestion(target: &str) -> alldeadlines::models::suggestion::SuggestionRow {
    let mut s = suggestion_row(7, "ICML 2026");
    s.is_edit = true;
    s.target_conference_id = Some(target.to_string());
    s.location = Some("Vienna, Austria".to_string());
    s.deadlines = json!([{ "type": "Rebuttal", "due": "2026-02-15T12:00:00Z" }]);
    s
}

#[tokio::test]
async fn approving_a_create_builds_the_conference_and_consumes_the_suggestion() {
    let store = MemStore::default();
    store.seed_suggestion(create_suggestion());

    let outcome = reconcile::approve(&store, 1, instant(2026, 1, 1, 0, 0))
        .await
        .unwrap();
    let ApprovalOutcome::Created { conference_id } = outcome else {
        panic!("expected Created, got {outcome:?}");
    };
    assert_eq!(conference_id, "foo-bar-2026");

    let row = store.conference("foo-bar-2026").unwrap();
    assert_eq!(row.name, "Foo Bar");
    assert_eq!(row.location.as_deref(), Some("Lisbon, Portugal"));
    assert_eq!(row.areas, json!({"AI": ["NLP", "CV"]}));
    assert_eq!(row.tags, vec!["machine-learning"]);

    let deadlines = store.deadlines_for("foo-bar-2026").await.unwrap();
    assert_eq!(
        deadlines,
        vec![
            deadline("Abstract", instant(2026, 1, 10, 23, 59)),
            deadline("Full Paper", instant(2026, 1, 20, 0, 0)),
        ]
    );

    assert_eq!(store.suggestion_count(), 0);
}

#[tokio::test]
async fn create_survives_a_deadline_write_failure() {
    let store = MemStore {
        fail_insert_deadlines: true,
        ..MemStore::default()
    };
    store.seed_suggestion(create_suggestion());

    let outcome = reconcile::approve(&store, 1, instant(2026, 1, 1, 0, 0))
        .await
        .unwrap();
    let ApprovalOutcome::CreatedWithoutDeadlines { conference_id, .. } = outcome else {
        panic!("expected CreatedWithoutDeadlines, got {outcome:?}");
    };
    assert_eq!(conference_id, "foo-bar-2026");

    // The record exists with no deadlines, and the suggestion is gone
    // rather than retried forever.
    assert!(store.conference("foo-bar-2026").is_some());
    assert!(store.deadlines_for("foo-bar-2026").await.unwrap().is_empty());
    assert_eq!(store.suggestion_count(), 0);
}

#[tokio::test]
async fn create_failure_before_any_write_keeps_the_suggestion() {
    let store = MemStore {
        fail_insert_conference: true,
        ..MemStore::default()
    };
    store.seed_suggestion(create_suggestion());

    let err = reconcile::approve(&store, 1, instant(2026, 1, 1, 0, 0))
        .await
        .unwrap_err();
    assert!(matches!(err, ReconcileError::Store(_)));
    assert_eq!(store.suggestion_count(), 1);
}

#[tokio::test]
async fn approving_an_edit_replaces_the_deadline_list_wholesale() {
    let store = MemStore::default();
    store.seed_conference(
        conference_row("icml-2026", "ICML"),
        vec![
            deadline("Abstract", instant(2026, 1, 5, 0, 0)),
            deadline("Full Paper", instant(2026, 1, 12, 0, 0)),
        ],
    );
    store.seed_suggestion(edit_suggestion("icml-2026"));

    let outcome = reconcile::approve(&store, 7, instant(2026, 1, 1, 0, 0))
        .await
        .unwrap();
    let ApprovalOutcome::Updated { conference_id } = outcome else {
        panic!("expected Updated, got {outcome:?}");
    };
    assert_eq!(conference_id, "icml-2026");

    let row = store.conference("icml-2026").unwrap();
    assert_eq!(row.name, "ICML 2026");
    assert_eq!(row.location.as_deref(), Some("Vienna, Austria"));

    let deadlines = store.deadlines_for("icml-2026").await.unwrap();
    assert_eq!(deadlines, vec![deadline("Rebuttal", instant(2026, 2, 15, 12, 0))]);

    assert_eq!(store.suggestion_count(), 0);
}

#[tokio::test]
async fn edit_against_a_vanished_target_mutates_nothing() {
    let store = MemStore::default();
    store.seed_suggestion(edit_suggestion("gone-2026"));

    let err = reconcile::approve(&store, 7, instant(2026, 1, 1, 0, 0))
        .await
        .unwrap_err();
    let ReconcileError::TargetMissing(id) = err else {
        panic!("expected TargetMissing, got {err:?}");
    };
    assert_eq!(id, "gone-2026");

    // Retained so the admin can still see and reject it.
    assert_eq!(store.suggestion_count(), 1);
}

#[tokio::test]
async fn edit_deadline_write_failure_is_reported_as_cleared() {
    let store = MemStore {
        fail_insert_deadlines: true,
        ..MemStore::default()
    };
    store.seed_conference(
        conference_row("icml-2026", "ICML"),
        vec![deadline("Abstract", instant(2026, 1, 5, 0, 0))],
    );
    store.seed_suggestion(edit_suggestion("icml-2026"));

    let err = reconcile::approve(&store, 7, instant(2026, 1, 1, 0, 0))
        .await
        .unwrap_err();
    let ReconcileError::DeadlinesCleared { conference_id, .. } = err else {
        panic!("expected DeadlinesCleared, got {err:?}");
    };
    assert_eq!(conference_id, "icml-2026");

    // The risk window happened: the old list is gone, nothing replaced it,
    // and the suggestion survives so the approval can be retried.
    assert!(store.deadlines_for("icml-2026").await.unwrap().is_empty());
    assert_eq!(store.suggestion_count(), 1);
}

#[tokio::test]
async fn approving_an_unknown_suggestion_fails_cleanly() {
    let store = MemStore::default();
    let err = reconcile::approve(&store, 42, instant(2026, 1, 1, 0, 0))
        .await
        .unwrap_err();
    assert!(matches!(err, ReconcileError::SuggestionNotFound(42)));
}

#[tokio::test]
async fn rejecting_deletes_only_the_suggestion() {
    let store = MemStore::default();
    store.seed_conference(conference_row("icml-2026", "ICML"), vec![]);
    store.seed_suggestion(edit_suggestion("icml-2026"));

    reconcile::reject(&store, 7).await.unwrap();

    assert_eq!(store.suggestion_count(), 0);
    assert!(store.conference("icml-2026").is_some());
}

#[test]
fn diff_reports_one_line_per_changed_field() {
    let mut current = conference_row("icml-2026", "ICML 2026");
    current.location = Some("Vienna, Austria".to_string());
    current.areas = json!({"AI": ["ML"]});
    let current_deadlines = vec![deadline("Abstract", instant(2026, 1, 5, 0, 0))];

    let mut s = suggestion_row(7, "ICML 2026");
    s.is_edit = true;
    s.target_conference_id = Some("icml-2026".to_string());
    s.location = Some("Valencia, Spain".to_string());
    s.category = Some("AI".to_string());
    s.subfields = Some("ML".to_string());
    s.deadlines = json!([{ "type": "Abstract", "due": "2026-01-05T00:00:00Z" }]);

    let changes = diff::changes(&current, &current_deadlines, &s);
    assert_eq!(changes.len(), 1);
    assert!(changes[0].contains("location"));
    assert!(changes[0].contains("Valencia, Spain"));
}

#[test]
fn diff_of_an_identical_suggestion_is_empty() {
    let mut current = conference_row("icml-2026", "ICML 2026");
    current.areas = json!({"AI": ["ML"]});
    let current_deadlines = vec![deadline("Abstract", instant(2026, 1, 5, 0, 0))];

    let mut s = suggestion_row(7, "ICML 2026");
    s.is_edit = true;
    s.target_conference_id = Some("icml-2026".to_string());
    s.category = Some("AI".to_string());
    s.subfields = Some("ML".to_string());
    s.deadlines = json!([{ "type": "Abstract", "due": "2026-01-05T00:00:00Z" }]);

    assert!(diff::changes(&current, &current_deadlines, &s).is_empty());
}

#[test]
fn diff_treats_absent_and_empty_strings_as_equal() {
    let mut current = conference_row("icml-2026", "ICML 2026");
    current.location = Some(String::new());
    let s = {
        let mut s = suggestion_row(7, "ICML 2026");
        s.is_edit = true;
        s.location = None;
        s
    };
    assert!(diff::changes(&current, &[], &s).is_empty());
}

#[test]
fn diff_summarizes_deadline_replacement_by_count() {
    let current = conference_row("icml-2026", "ICML 2026");
    let current_deadlines = vec![
        deadline("Abstract", instant(2026, 1, 5, 0, 0)),
        deadline("Full Paper", instant(2026, 1, 12, 0, 0)),
    ];

    let mut s = suggestion_row(7, "ICML 2026");
    s.is_edit = true;
    s.deadlines = json!([{ "type": "Rebuttal", "due": "2026-02-15" }]);

    let changes = diff::changes(&current, &current_deadlines, &s);
    assert_eq!(changes, vec!["deadlines: 2 entries replaced by 1".to_string()]);
}
