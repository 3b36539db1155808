//! Error types for the review core and its collaborators.

use std::path::PathBuf;

use thiserror::Error;

use crate::filter::ReviewFilter;

/// Errors returned by [`crate::session::ReviewSession`] operations.
///
/// None of these are fatal. `IncompleteReview` is the only one expected in
/// normal use; the rest indicate a front-end offering an intent it should not.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReviewError {
    #[error("index {index} is out of range for a view of {len} images")]
    InvalidIndex { index: usize, len: usize },

    #[error("the review session has no images")]
    NoActiveSession,

    #[error("no images match the {} filter", .filter.label())]
    EmptyView { filter: ReviewFilter },

    #[error("no image is open")]
    NoFocusedItem,

    #[error("{} image(s) still unreviewed: {}", .unreviewed.len(), .unreviewed.join(", "))]
    IncompleteReview { unreviewed: Vec<String> },

    #[error("the review session has already been submitted")]
    SessionClosed,

    #[error("duplicate image id `{0}`")]
    DuplicateId(String),

    #[error(transparent)]
    Sink(#[from] SinkError),
}

/// Failure reported by a [`crate::submission::SubmissionSink`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SinkError {
    /// The receiving side of the sink has gone away.
    #[error("submission sink is closed")]
    Closed,

    #[error("submission sink failed: {message}")]
    Failed { message: String },
}

/// Errors loading the image set for a session.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid manifest {}: {source}", .path.display())]
    Manifest {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("manifest {} entry {index} has an empty id", .path.display())]
    EmptyId { path: PathBuf, index: usize },
}
