//! SQLite-backed submission sink.
//!
//! `ReviewSession::submit` is synchronous, so [`DbSink`] only queues the
//! snapshot for a background writer task. The writer stores it with
//! `imgrev_core::db::record_submission` and reports the outcome to the main
//! loop as `AppEvent::SubmissionStored`. A failed write hands the snapshot
//! back, since the session that produced it is already closed.

use imgrev_core::{db, SinkError, Submission, SubmissionSink};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::event::AppEvent;

/// A submission the writer could not store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreFailure {
    pub submission: Submission,
    pub error: String,
}

/// Hands submissions to the database writer task.
pub struct DbSink {
    tx: mpsc::UnboundedSender<Submission>,
}

impl SubmissionSink for DbSink {
    fn deliver(&mut self, submission: &Submission) -> Result<(), SinkError> {
        self.tx
            .send(submission.clone())
            .map_err(|_| SinkError::Closed)
    }
}

/// Spawns the writer task for `conn` and returns the sink feeding it.
///
/// The task ends once the sink is dropped and every queued submission has
/// been written; await the returned handle to flush before exiting.
pub fn spawn_db_writer(
    conn: tokio_rusqlite::Connection,
    events: mpsc::UnboundedSender<AppEvent>,
) -> (DbSink, JoinHandle<()>) {
    let (tx, mut rx) = mpsc::unbounded_channel::<Submission>();
    let handle = tokio::spawn(async move {
        while let Some(submission) = rx.recv().await {
            let result = match db::record_submission(&conn, &submission).await {
                Ok(()) => Ok(submission.id),
                Err(e) => {
                    tracing::error!(submission = %submission.id, "failed to store submission: {e}");
                    Err(StoreFailure {
                        submission,
                        error: e.to_string(),
                    })
                }
            };
            let _ = events.send(AppEvent::SubmissionStored(result));
        }
    });
    (DbSink { tx }, handle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use imgrev_core::{Decision, ImageRef, ReviewFilter, ReviewSession};

    use crate::app::{AppState, Mode, Role};

    #[tokio::test]
    async fn submitted_review_reaches_the_database() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("reviews.db");
        let conn = db::open_db(&path.to_string_lossy()).await.unwrap();
        let (events_tx, mut events_rx) = mpsc::unbounded_channel();
        let (mut sink, writer) = spawn_db_writer(conn, events_tx);

        let mut session = ReviewSession::new([ImageRef::new("1", "1.png")]).unwrap();
        session.open_item(ReviewFilter::All, 0).unwrap();
        session.add_comment("sharp").unwrap();
        session.set_status(ReviewFilter::All, Decision::Flag).unwrap();
        let submission = session.submit(&mut sink).unwrap();

        match events_rx.recv().await {
            Some(AppEvent::SubmissionStored(Ok(id))) => assert_eq!(id, submission.id),
            other => panic!("unexpected event {other:?}"),
        }
        let reader = db::open_db(&path.to_string_lossy()).await.unwrap();
        let stored = db::load_submission(&reader, &submission.id).await.unwrap();
        assert_eq!(stored, Some(submission));

        drop(sink);
        writer.await.unwrap();
    }

    #[tokio::test]
    async fn storage_failure_is_reported_as_an_event() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("reviews.db");
        let conn = db::open_db(&path.to_string_lossy()).await.unwrap();
        let (events_tx, mut events_rx) = mpsc::unbounded_channel();
        let (mut sink, _writer) = spawn_db_writer(conn, events_tx);

        let mut session = ReviewSession::new([ImageRef::new("1", "1.png")]).unwrap();
        session.open_item(ReviewFilter::All, 0).unwrap();
        session.set_status(ReviewFilter::All, Decision::Approve).unwrap();
        let submission = session.submit(&mut Vec::<Submission>::new()).unwrap();

        // The same snapshot twice violates the primary key on the second write.
        sink.deliver(&submission).unwrap();
        sink.deliver(&submission).unwrap();
        assert!(matches!(
            events_rx.recv().await,
            Some(AppEvent::SubmissionStored(Ok(_)))
        ));
        match events_rx.recv().await {
            Some(AppEvent::SubmissionStored(Err(failure))) => {
                assert_eq!(failure.submission, submission);
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[tokio::test]
    async fn failed_write_can_be_retried_from_the_app() {
        let dir = tempfile::TempDir::new().unwrap();
        let broken_path = dir.path().join("broken.db");
        let broken = db::open_db(&broken_path.to_string_lossy()).await.unwrap();
        broken
            .call(|db| {
                db.execute_batch(
                    "DROP TABLE decision_comments; DROP TABLE decisions; DROP TABLE submissions;",
                )
            })
            .await
            .unwrap();
        let (events_tx, mut events_rx) = mpsc::unbounded_channel();
        let (mut broken_sink, _broken_writer) = spawn_db_writer(broken, events_tx.clone());

        let session = ReviewSession::new([ImageRef::new("1", "https://example.test/1.png")]).unwrap();
        let mut state = AppState::new(session, Role::Verifier);
        state.open_selected();
        state.decide(Decision::Approve);
        assert_eq!(state.mode, Mode::ConfirmSubmit);
        state.submit(&mut broken_sink);
        assert!(state.session.is_closed());

        match events_rx.recv().await {
            Some(AppEvent::SubmissionStored(result)) => state.on_submission_stored(result),
            other => panic!("unexpected event {other:?}"),
        }
        assert!(state.has_unsaved_work(), "quitting now must ask first");
        let snapshot = state.unstored.clone().unwrap();

        let good_path = dir.path().join("good.db");
        let good = db::open_db(&good_path.to_string_lossy()).await.unwrap();
        let (mut good_sink, good_writer) = spawn_db_writer(good, events_tx);
        state.request_submit();
        assert_eq!(state.mode, Mode::ConfirmSubmit);
        state.submit(&mut good_sink);
        match events_rx.recv().await {
            Some(AppEvent::SubmissionStored(result)) => state.on_submission_stored(result),
            other => panic!("unexpected event {other:?}"),
        }
        assert!(!state.has_unsaved_work());

        let reader = db::open_db(&good_path.to_string_lossy()).await.unwrap();
        let stored = db::load_submission(&reader, &snapshot.id).await.unwrap();
        assert_eq!(stored, Some(snapshot));

        drop(good_sink);
        good_writer.await.unwrap();
    }

    #[test]
    fn closed_writer_rejects_delivery() {
        let (tx, rx) = mpsc::unbounded_channel::<Submission>();
        drop(rx);
        let mut sink = DbSink { tx };
        let mut session = ReviewSession::new([ImageRef::new("1", "1.png")]).unwrap();
        session.open_item(ReviewFilter::All, 0).unwrap();
        session.set_status(ReviewFilter::All, Decision::Approve).unwrap();
        let err = session.submit(&mut sink).unwrap_err();
        assert_eq!(err, imgrev_core::ReviewError::Sink(SinkError::Closed));
        assert!(!session.is_closed());
    }
}
