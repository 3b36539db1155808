//! Integration tests for the review session workflow.
//!
//! Exercises: new, open_item, close_item, advance, add_comment, set_status,
//! is_submission_ready, unreviewed_ids, counts, submit.

use imgrev_core::{
    Decision, Direction, FollowUp, ImageRef, ReviewError, ReviewFilter, ReviewSession,
    ReviewStatus, SinkError, Submission, SubmissionSink,
};
use rstest::{fixture, rstest};

const ALL: ReviewFilter = ReviewFilter::All;

fn session_of(ids: &[&str]) -> ReviewSession {
    ReviewSession::new(
        ids.iter()
            .map(|id| ImageRef::new(*id, format!("https://placedog.net/300/300?id={id}"))),
    )
    .unwrap()
}

#[fixture]
fn abc() -> ReviewSession {
    session_of(&["a", "b", "c"])
}

/// A sink that refuses every delivery.
struct BrokenSink;

impl SubmissionSink for BrokenSink {
    fn deliver(&mut self, _submission: &Submission) -> Result<(), SinkError> {
        Err(SinkError::Failed {
            message: "disk full".to_owned(),
        })
    }
}

#[rstest]
fn new_session_starts_unreviewed_and_unfocused(abc: ReviewSession) {
    assert_eq!(abc.len(), 3);
    assert!(abc.focused().is_none());
    assert!(abc.items().iter().all(|i| i.status() == ReviewStatus::Unreviewed));
    assert!(abc.items().iter().all(|i| i.comments().is_empty()));
    assert!(!abc.is_submission_ready());
    assert!(!abc.is_closed());
}

#[test]
fn duplicate_ids_are_rejected() {
    let err = ReviewSession::new(vec![
        ImageRef::new("1", "one.png"),
        ImageRef::new("2", "two.png"),
        ImageRef::new("1", "again.png"),
    ])
    .unwrap_err();
    assert_eq!(err, ReviewError::DuplicateId("1".to_owned()));
}

#[rstest]
fn open_item_focuses_and_returns_item(mut abc: ReviewSession) {
    let item = abc.open_item(ALL, 1).unwrap();
    assert_eq!(item.id(), "b");
    assert_eq!(item.source(), "https://placedog.net/300/300?id=b");
    assert_eq!(abc.focused_index(), Some(1));
    assert_eq!(abc.focus_position(ALL), Some(1));
}

#[rstest]
fn open_item_out_of_range_is_invalid_index(mut abc: ReviewSession) {
    let err = abc.open_item(ALL, 3).unwrap_err();
    assert_eq!(err, ReviewError::InvalidIndex { index: 3, len: 3 });
    assert!(abc.focused().is_none(), "failed open must not move focus");
}

#[test]
fn empty_session_has_no_active_session() {
    let mut session = ReviewSession::new(Vec::new()).unwrap();
    assert_eq!(session.open_item(ALL, 0).unwrap_err(), ReviewError::NoActiveSession);
    assert_eq!(
        session.advance(ALL, Direction::Next).unwrap_err(),
        ReviewError::NoActiveSession
    );
    assert_eq!(session.submit(&mut Vec::<Submission>::new()).unwrap_err(), ReviewError::NoActiveSession);
}

#[rstest]
fn close_item_clears_focus(mut abc: ReviewSession) {
    abc.open_item(ALL, 0).unwrap();
    abc.close_item();
    assert!(abc.focused().is_none());
}

#[test]
fn prev_from_first_wraps_to_last() {
    let mut session = session_of(&["a", "b", "c", "d"]);
    session.open_item(ALL, 0).unwrap();
    let item = session.advance(ALL, Direction::Prev).unwrap();
    assert_eq!(item.id(), "d");
    assert_eq!(session.focused_index(), Some(3));
}

#[rstest]
fn next_from_last_wraps_to_first(mut abc: ReviewSession) {
    abc.open_item(ALL, 2).unwrap();
    assert_eq!(abc.advance(ALL, Direction::Next).unwrap().id(), "a");
}

#[test]
fn single_item_session_stays_put() {
    let mut session = session_of(&["only"]);
    session.open_item(ALL, 0).unwrap();
    assert_eq!(session.advance(ALL, Direction::Next).unwrap().id(), "only");
    assert_eq!(session.advance(ALL, Direction::Prev).unwrap().id(), "only");
}

#[rstest]
fn advance_without_focus_opens_an_end(mut abc: ReviewSession) {
    assert_eq!(abc.advance(ALL, Direction::Next).unwrap().id(), "a");
    abc.close_item();
    assert_eq!(abc.advance(ALL, Direction::Prev).unwrap().id(), "c");
}

#[rstest]
#[case("")]
#[case("   ")]
#[case("\n\t ")]
fn blank_comments_are_ignored(mut abc: ReviewSession, #[case] text: &str) {
    assert_eq!(abc.add_comment(text).unwrap(), None, "no image open");
    abc.open_item(ALL, 0).unwrap();
    assert_eq!(abc.add_comment(text).unwrap(), None);
    assert!(abc.items()[0].comments().is_empty());

    decide_all(&mut abc);
    abc.submit(&mut Vec::<Submission>::new()).unwrap();
    assert_eq!(abc.add_comment(text).unwrap(), None, "closed session");
}

#[rstest]
fn comments_append_in_order_with_unique_ids(mut abc: ReviewSession) {
    abc.open_item(ALL, 0).unwrap();
    abc.add_comment("blurry").unwrap();
    let item = abc.add_comment("  ok  ").unwrap().unwrap();

    let texts: Vec<&str> = item.comments().iter().map(|c| c.text.as_str()).collect();
    assert_eq!(texts, ["blurry", "  ok  "], "text is stored as typed");
    assert_ne!(item.comments()[0].id, item.comments()[1].id);
    assert!(item.comments()[0].created_at <= item.comments()[1].created_at);
}

#[rstest]
fn comment_ids_are_unique_across_items(mut abc: ReviewSession) {
    let mut ids = Vec::new();
    for index in 0..3 {
        abc.open_item(ALL, index).unwrap();
        for n in 0..50 {
            let item = abc.add_comment(&format!("note {n}")).unwrap().unwrap();
            ids.push(item.comments().last().unwrap().id);
        }
    }
    let mut deduped = ids.clone();
    deduped.sort();
    deduped.dedup();
    assert_eq!(deduped.len(), ids.len(), "rapid appends must not collide");
}

#[rstest]
fn comment_requires_focus(mut abc: ReviewSession) {
    assert_eq!(abc.add_comment("hello").unwrap_err(), ReviewError::NoFocusedItem);
}

#[rstest]
fn set_status_requires_focus(mut abc: ReviewSession) {
    assert_eq!(
        abc.set_status(ALL, Decision::Approve).unwrap_err(),
        ReviewError::NoFocusedItem
    );
}

#[rstest]
fn later_decision_overwrites_earlier(mut abc: ReviewSession) {
    abc.open_item(ALL, 1).unwrap();
    abc.set_status(ALL, Decision::Flag).unwrap();
    abc.set_status(ALL, Decision::Approve).unwrap();
    assert_eq!(abc.focused().unwrap().status(), ReviewStatus::Approved);
    abc.set_status(ALL, Decision::Flag).unwrap();
    assert_eq!(abc.focused().unwrap().status(), ReviewStatus::Flagged);
}

#[rstest]
fn follow_up_recommends_advance_until_last(mut abc: ReviewSession) {
    abc.open_item(ALL, 0).unwrap();
    assert_eq!(abc.set_status(ALL, Decision::Approve).unwrap(), FollowUp::Advance);
    assert_eq!(abc.focused_index(), Some(0), "decisions never move focus");

    abc.open_item(ALL, 2).unwrap();
    assert_eq!(
        abc.set_status(ALL, Decision::Flag).unwrap(),
        FollowUp::ReviewComplete { ready: false }
    );

    abc.open_item(ALL, 1).unwrap();
    abc.set_status(ALL, Decision::Approve).unwrap();
    abc.open_item(ALL, 2).unwrap();
    assert_eq!(
        abc.set_status(ALL, Decision::Approve).unwrap(),
        FollowUp::ReviewComplete { ready: true }
    );
}

#[rstest]
fn counts_track_statuses(mut abc: ReviewSession) {
    abc.open_item(ALL, 0).unwrap();
    abc.set_status(ALL, Decision::Approve).unwrap();
    abc.open_item(ALL, 1).unwrap();
    abc.set_status(ALL, Decision::Flag).unwrap();

    let counts = abc.counts();
    assert_eq!(counts.approved, 1);
    assert_eq!(counts.flagged, 1);
    assert_eq!(counts.unreviewed, 1);
    assert_eq!(counts.total(), 3);
    assert_eq!(counts.decided(), 2);
    assert_eq!(abc.unreviewed_ids(), ["c"]);
}

#[rstest]
fn submit_gate_scenario(mut abc: ReviewSession) {
    abc.open_item(ALL, 0).unwrap();
    abc.set_status(ALL, Decision::Approve).unwrap();
    abc.advance(ALL, Direction::Next).unwrap();
    abc.set_status(ALL, Decision::Flag).unwrap();

    let mut sink: Vec<Submission> = Vec::new();
    let err = abc.submit(&mut sink).unwrap_err();
    assert_eq!(
        err,
        ReviewError::IncompleteReview {
            unreviewed: vec!["c".to_owned()]
        }
    );
    assert!(sink.is_empty(), "blocked submit must not reach the sink");
    assert!(!abc.is_closed());

    abc.advance(ALL, Direction::Next).unwrap();
    abc.set_status(ALL, Decision::Approve).unwrap();
    let submission = abc.submit(&mut sink).unwrap();

    let decided: Vec<(&str, ReviewStatus)> = submission
        .items
        .iter()
        .map(|i| (i.id.as_str(), i.status))
        .collect();
    assert_eq!(
        decided,
        [
            ("a", ReviewStatus::Approved),
            ("b", ReviewStatus::Flagged),
            ("c", ReviewStatus::Approved),
        ]
    );
    assert_eq!(sink, [submission]);
    assert!(abc.is_closed());
}

#[rstest]
fn incomplete_review_lists_every_unreviewed_id_in_order(mut abc: ReviewSession) {
    abc.open_item(ALL, 1).unwrap();
    abc.set_status(ALL, Decision::Approve).unwrap();
    let err = abc.submit(&mut Vec::<Submission>::new()).unwrap_err();
    assert_eq!(
        err,
        ReviewError::IncompleteReview {
            unreviewed: vec!["a".to_owned(), "c".to_owned()]
        }
    );
    assert_eq!(err.to_string(), "2 image(s) still unreviewed: a, c");
}

fn decide_all(session: &mut ReviewSession) {
    for index in 0..session.len() {
        session.open_item(ALL, index).unwrap();
        session.set_status(ALL, Decision::Approve).unwrap();
    }
}

#[rstest]
fn submitted_session_is_closed_to_mutation(mut abc: ReviewSession) {
    decide_all(&mut abc);
    abc.submit(&mut Vec::<Submission>::new()).unwrap();

    assert_eq!(abc.submit(&mut Vec::<Submission>::new()).unwrap_err(), ReviewError::SessionClosed);
    assert_eq!(abc.open_item(ALL, 0).unwrap_err(), ReviewError::SessionClosed);
    assert_eq!(
        abc.advance(ALL, Direction::Next).unwrap_err(),
        ReviewError::SessionClosed
    );
    assert_eq!(abc.add_comment("late").unwrap_err(), ReviewError::SessionClosed);
    assert_eq!(
        abc.set_status(ALL, Decision::Flag).unwrap_err(),
        ReviewError::SessionClosed
    );
    assert!(abc.is_submission_ready(), "reads stay available after submit");
}

#[rstest]
fn sink_failure_keeps_session_open(mut abc: ReviewSession) {
    decide_all(&mut abc);
    let err = abc.submit(&mut BrokenSink).unwrap_err();
    assert!(matches!(err, ReviewError::Sink(SinkError::Failed { .. })));
    assert!(!abc.is_closed());

    let mut sink: Vec<Submission> = Vec::new();
    abc.submit(&mut sink).unwrap();
    assert_eq!(sink.len(), 1, "retry after a sink failure succeeds");
}

#[rstest]
fn submission_snapshot_carries_comments(mut abc: ReviewSession) {
    abc.open_item(ALL, 0).unwrap();
    abc.add_comment("left ear cropped").unwrap();
    decide_all(&mut abc);

    let submission = abc.submit(&mut imgrev_core::LogSink).unwrap();
    assert_eq!(submission.items[0].comments.len(), 1);
    assert_eq!(submission.items[0].comments[0].text, "left ear cropped");

    let json = serde_json::to_value(&submission).unwrap();
    assert_eq!(json["items"][0]["status"], "approved");
    assert_eq!(json["items"][0]["comments"][0]["text"], "left ear cropped");
}
