//! Finalized review snapshots and the sinks that receive them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SinkError;
use crate::types::{Comment, ReviewItem, ReviewStatus};

/// The decided state of one image at submission time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSnapshot {
    pub id: String,
    pub source: String,
    pub status: ReviewStatus,
    pub comments: Vec<Comment>,
}

impl From<&ReviewItem> for ItemSnapshot {
    fn from(item: &ReviewItem) -> Self {
        Self {
            id: item.id().to_owned(),
            source: item.source().to_owned(),
            status: item.status(),
            comments: item.comments().to_vec(),
        }
    }
}

/// A completed review pass, emitted once by `ReviewSession::submit`.
///
/// Keyed by UUID v4 text so stored batches never collide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub id: String,
    pub submitted_at: DateTime<Utc>,
    pub items: Vec<ItemSnapshot>,
}

impl Submission {
    pub(crate) fn capture(items: &[ReviewItem]) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            submitted_at: Utc::now(),
            items: items.iter().map(ItemSnapshot::from).collect(),
        }
    }

    pub fn count(&self, status: ReviewStatus) -> usize {
        self.items.iter().filter(|i| i.status == status).count()
    }
}

/// Receives the finalized snapshot of a session.
///
/// Implementations are injected by the host: the core never decides where a
/// submission goes. A failed delivery leaves the session open.
pub trait SubmissionSink {
    fn deliver(&mut self, submission: &Submission) -> Result<(), SinkError>;
}

/// Collects submissions in memory.
impl SubmissionSink for Vec<Submission> {
    fn deliver(&mut self, submission: &Submission) -> Result<(), SinkError> {
        self.push(submission.clone());
        Ok(())
    }
}

/// Writes each submission to the tracing log and nowhere else.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl SubmissionSink for LogSink {
    fn deliver(&mut self, submission: &Submission) -> Result<(), SinkError> {
        tracing::info!(
            submission = %submission.id,
            images = submission.items.len(),
            approved = submission.count(ReviewStatus::Approved),
            flagged = submission.count(ReviewStatus::Flagged),
            "review submitted"
        );
        for item in &submission.items {
            tracing::debug!(
                submission = %submission.id,
                image = %item.id,
                status = %item.status,
                comments = item.comments.len(),
                "image decision"
            );
        }
        Ok(())
    }
}
