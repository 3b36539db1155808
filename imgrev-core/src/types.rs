use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An `(id, uri)` pair supplied by the image source at session start.
///
/// The `uri` is opaque to the core: a local path, a URL, or any other handle
/// the front-end knows how to display.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ImageRef {
    pub id: String,
    pub uri: String,
}

impl ImageRef {
    pub fn new(id: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            uri: uri.into(),
        }
    }
}

/// Review status of a single image.
///
/// Every status can be replaced by an explicit decision; `Unreviewed` is only
/// ever the initial state. Whether a review pass is complete is a property of
/// the whole session, not of any one item.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    #[default]
    Unreviewed,
    Approved,
    Flagged,
}

impl ReviewStatus {
    /// `true` for `Approved` and `Flagged`: the image has been decided.
    pub fn is_terminal(self) -> bool {
        !matches!(self, ReviewStatus::Unreviewed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ReviewStatus::Unreviewed => "unreviewed",
            ReviewStatus::Approved => "approved",
            ReviewStatus::Flagged => "flagged",
        }
    }

    /// Parses the lowercase form written by [`ReviewStatus::as_str`].
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "unreviewed" => Some(ReviewStatus::Unreviewed),
            "approved" => Some(ReviewStatus::Approved),
            "flagged" => Some(ReviewStatus::Flagged),
            _ => None,
        }
    }
}

impl fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A reviewer's decision on the focused image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Approve,
    Flag,
}

impl From<Decision> for ReviewStatus {
    fn from(decision: Decision) -> Self {
        match decision {
            Decision::Approve => ReviewStatus::Approved,
            Decision::Flag => ReviewStatus::Flagged,
        }
    }
}

/// Session-unique comment identifier, drawn from a monotonic counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CommentId(pub u64);

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}", self.0)
    }
}

/// A single comment in an image's thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// One image under review.
///
/// Fields are private: the session is the only writer, and callers only ever
/// see `&ReviewItem`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewItem {
    id: String,
    source: String,
    comments: Vec<Comment>,
    status: ReviewStatus,
}

impl ReviewItem {
    pub(crate) fn new(image: ImageRef) -> Self {
        Self {
            id: image.id,
            source: image.uri,
            comments: Vec::new(),
            status: ReviewStatus::Unreviewed,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Comments in the order they were added.
    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub fn status(&self) -> ReviewStatus {
        self.status
    }

    pub(crate) fn push_comment(&mut self, comment: Comment) {
        self.comments.push(comment);
    }

    pub(crate) fn set_status(&mut self, status: ReviewStatus) {
        self.status = status;
    }
}

/// Per-status item counts, derived on demand for the status bar.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StatusCounts {
    pub unreviewed: usize,
    pub approved: usize,
    pub flagged: usize,
}

impl StatusCounts {
    pub fn total(&self) -> usize {
        self.unreviewed + self.approved + self.flagged
    }

    pub fn decided(&self) -> usize {
        self.approved + self.flagged
    }
}
