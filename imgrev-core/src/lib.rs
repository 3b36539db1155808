//! Core of imgrev: the image review session state machine and the
//! collaborators around it.
//!
//! - [`session`]: `ReviewSession`, the only writer of review state.
//! - [`filter`]: status views used for gallery display and navigation.
//! - [`submission`]: finalized snapshots and the sink trait they go to.
//! - [`source`]: loads the image set from a directory or manifest.
//! - [`db`] / [`schema`]: SQLite storage backing the binary's sink.

pub mod db;
pub mod error;
pub mod filter;
pub mod schema;
pub mod session;
pub mod source;
pub mod submission;
pub mod types;

pub use error::{ReviewError, SinkError, SourceError};
pub use filter::ReviewFilter;
pub use session::{Direction, FollowUp, ReviewSession};
pub use submission::{ItemSnapshot, LogSink, Submission, SubmissionSink};
pub use types::{Comment, CommentId, Decision, ImageRef, ReviewItem, ReviewStatus, StatusCounts};
