//! Integration test for submission storage.
//!
//! Exercises: open_db, migrate, record_submission, load_submission,
//! list_submissions.

use imgrev_core::{db, Decision, Direction, ImageRef, ReviewFilter, ReviewSession, Submission};

fn temp_db_path() -> String {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.keep().join("test.db");
    path.to_string_lossy().to_string()
}

/// Runs a full review over three images and returns the submission.
fn reviewed_submission() -> Submission {
    let mut session = ReviewSession::new(vec![
        ImageRef::new("1", "https://placedog.net/300/300?id=1"),
        ImageRef::new("2", "https://placedog.net/300/300?id=2"),
        ImageRef::new("3", "https://placedog.net/300/300?id=3"),
    ])
    .unwrap();
    let all = ReviewFilter::All;

    session.open_item(all, 0).unwrap();
    session.add_comment("good framing").unwrap();
    session.add_comment("slight blur").unwrap();
    session.set_status(all, Decision::Approve).unwrap();
    session.advance(all, Direction::Next).unwrap();
    session.add_comment("not a dog").unwrap();
    session.set_status(all, Decision::Flag).unwrap();
    session.advance(all, Direction::Next).unwrap();
    session.set_status(all, Decision::Approve).unwrap();

    session.submit(&mut Vec::<Submission>::new()).unwrap()
}

#[tokio::test]
async fn open_db_applies_schema_in_wal_mode() {
    let path = temp_db_path();
    let conn = db::open_db(&path).await.unwrap();

    let version: i64 = conn
        .call(|db| {
            Ok::<_, rusqlite::Error>(db.query_row(
                "SELECT MAX(version) FROM schema_version",
                [],
                |r| r.get(0),
            )?)
        })
        .await
        .unwrap();
    assert_eq!(version, 1, "schema_version should be 1");

    let journal: String = conn
        .call(|db| {
            Ok::<_, rusqlite::Error>(db.query_row("PRAGMA journal_mode", [], |r| r.get(0))?)
        })
        .await
        .unwrap();
    assert_eq!(journal, "wal", "journal_mode should be wal");

    let decision_pk_count: i64 = conn
        .call(|db| {
            Ok::<_, rusqlite::Error>(db.query_row(
                "SELECT COUNT(*) FROM pragma_table_info('decisions') WHERE pk > 0",
                [],
                |r| r.get(0),
            )?)
        })
        .await
        .unwrap();
    assert_eq!(decision_pk_count, 2, "decisions should have composite PK");

    // Reopening must not re-apply v1.
    drop(conn);
    let conn = db::open_db(&path).await.unwrap();
    let rows: i64 = conn
        .call(|db| {
            Ok::<_, rusqlite::Error>(db.query_row(
                "SELECT COUNT(*) FROM schema_version",
                [],
                |r| r.get(0),
            )?)
        })
        .await
        .unwrap();
    assert_eq!(rows, 1, "migration should be idempotent");
}

#[tokio::test]
async fn submission_round_trips() {
    let path = temp_db_path();
    let conn = db::open_db(&path).await.unwrap();
    let submission = reviewed_submission();

    db::record_submission(&conn, &submission).await.unwrap();
    let loaded = db::load_submission(&conn, &submission.id)
        .await
        .unwrap()
        .expect("stored submission should load");
    assert_eq!(loaded, submission);

    // Persists across connections.
    let conn2 = db::open_db(&path).await.unwrap();
    let loaded2 = db::load_submission(&conn2, &submission.id).await.unwrap();
    assert_eq!(loaded2.as_ref(), Some(&submission));
}

#[tokio::test]
async fn missing_submission_loads_as_none() {
    let conn = db::open_db(&temp_db_path()).await.unwrap();
    let loaded = db::load_submission(&conn, "no-such-id").await.unwrap();
    assert!(loaded.is_none());
}

#[tokio::test]
async fn recording_twice_is_rejected_atomically() {
    let conn = db::open_db(&temp_db_path()).await.unwrap();
    let submission = reviewed_submission();
    db::record_submission(&conn, &submission).await.unwrap();
    assert!(db::record_submission(&conn, &submission).await.is_err());

    let decisions: i64 = conn
        .call(|db| {
            Ok::<_, rusqlite::Error>(db.query_row("SELECT COUNT(*) FROM decisions", [], |r| r.get(0))?)
        })
        .await
        .unwrap();
    assert_eq!(decisions, 3, "failed insert must leave no partial rows");
}

#[tokio::test]
async fn list_summarises_each_submission() {
    let conn = db::open_db(&temp_db_path()).await.unwrap();
    let first = reviewed_submission();
    let second = reviewed_submission();
    db::record_submission(&conn, &first).await.unwrap();
    db::record_submission(&conn, &second).await.unwrap();

    let summaries = db::list_submissions(&conn).await.unwrap();
    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[0].id, second.id, "newest first");
    assert_eq!(summaries[1].id, first.id);
    for summary in &summaries {
        assert_eq!(summary.approved, 2);
        assert_eq!(summary.flagged, 1);
        assert_eq!(summary.comments, 3);
    }
}
