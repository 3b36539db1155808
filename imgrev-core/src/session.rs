//! The review session state machine.
//!
//! A `ReviewSession` owns the fixed, ordered image set for one review pass,
//! tracks which image is focused, and applies the reviewer's intents: open,
//! navigate, comment, decide, submit. It never schedules anything itself. A
//! decision returns a [`FollowUp`] telling the host what to do next, and the
//! host decides when (or whether) to act on it.
//!
//! # Views
//!
//! Every navigation call takes a [`ReviewFilter`]. Indices passed to
//! [`ReviewSession::open_item`] and reported by
//! [`ReviewSession::focus_position`] are positions within that filter's
//! subsequence. Focus itself is stored as a backing-store index so it stays
//! on the same image when the filter changes or the image drops out of the
//! filter after a decision.

use chrono::Utc;

use crate::error::ReviewError;
use crate::filter::ReviewFilter;
use crate::submission::{Submission, SubmissionSink};
use crate::types::{Comment, CommentId, Decision, ImageRef, ReviewItem, ReviewStatus, StatusCounts};

/// Navigation direction for [`ReviewSession::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Prev,
}

/// What the host should do after a decision.
///
/// The session only recommends; the host owns timing and may ignore it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowUp {
    /// More images follow the decided one in the current view; move on with
    /// `advance(view, Direction::Next)`.
    Advance,
    /// The decided image was the last one in the current view. `ready` is the
    /// value of [`ReviewSession::is_submission_ready`] after the decision.
    ReviewComplete { ready: bool },
}

/// In-memory state for one review pass over a fixed image set.
#[derive(Debug, Clone)]
pub struct ReviewSession {
    items: Vec<ReviewItem>,
    /// Backing-store index of the open image.
    focus: Option<usize>,
    /// Last comment id handed out.
    comment_seq: u64,
    closed: bool,
}

impl ReviewSession {
    /// Builds a session over `images`, all starting `Unreviewed`, in the
    /// order given.
    ///
    /// # Errors
    ///
    /// Returns `ReviewError::DuplicateId` if two images share an id.
    pub fn new(images: impl IntoIterator<Item = ImageRef>) -> Result<Self, ReviewError> {
        let mut items: Vec<ReviewItem> = Vec::new();
        for image in images {
            if items.iter().any(|item| item.id() == image.id) {
                return Err(ReviewError::DuplicateId(image.id));
            }
            items.push(ReviewItem::new(image));
        }
        tracing::debug!(images = items.len(), "review session created");
        Ok(Self {
            items,
            focus: None,
            comment_seq: 0,
            closed: false,
        })
    }

    /// All images in backing order.
    pub fn items(&self) -> &[ReviewItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// `true` once a submission has been delivered.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// The images selected by `filter`, in backing order.
    pub fn view(&self, filter: ReviewFilter) -> Vec<&ReviewItem> {
        filter.apply(&self.items)
    }

    pub fn focused(&self) -> Option<&ReviewItem> {
        self.focus.and_then(|i| self.items.get(i))
    }

    /// Backing-store index of the open image.
    pub fn focused_index(&self) -> Option<usize> {
        self.focus
    }

    /// Position of the open image within `filter`'s view, or `None` when no
    /// image is open or the open image is not part of that view.
    pub fn focus_position(&self, filter: ReviewFilter) -> Option<usize> {
        let focus = self.focus?;
        filter.indices(&self.items).iter().position(|&i| i == focus)
    }

    /// Opens the image at `index` within `filter`'s view.
    ///
    /// Transient presentation state tied to the previously open image (zoom,
    /// draft comment text) belongs to the caller and should be reset there.
    ///
    /// # Errors
    ///
    /// - `SessionClosed` after a successful submit.
    /// - `NoActiveSession` when the session has no images.
    /// - `InvalidIndex` when `index` is not a position in the view.
    pub fn open_item(
        &mut self,
        filter: ReviewFilter,
        index: usize,
    ) -> Result<&ReviewItem, ReviewError> {
        self.ensure_open()?;
        if self.items.is_empty() {
            return Err(ReviewError::NoActiveSession);
        }
        let indices = filter.indices(&self.items);
        let Some(&target) = indices.get(index) else {
            return Err(ReviewError::InvalidIndex {
                index,
                len: indices.len(),
            });
        };
        self.focus = Some(target);
        tracing::debug!(view = filter.label(), index, image = self.items[target].id(), "opened image");
        Ok(&self.items[target])
    }

    /// Closes the open image, if any.
    pub fn close_item(&mut self) {
        self.focus = None;
    }

    /// Moves focus one step through `filter`'s view, wrapping at both ends.
    ///
    /// When the open image is in the view, the new position is
    /// `(p + delta + n) mod n`. When it is not (it was just decided out of an
    /// `UnsavedOnly` view, say), `Next` goes to the first view image after it
    /// in backing order and `Prev` to the last one before it, wrapping. With
    /// nothing open, `Next` opens the first view image and `Prev` the last.
    ///
    /// # Errors
    ///
    /// - `SessionClosed` after a successful submit.
    /// - `NoActiveSession` when the session has no images.
    /// - `EmptyView` when no image matches `filter`.
    pub fn advance(
        &mut self,
        filter: ReviewFilter,
        direction: Direction,
    ) -> Result<&ReviewItem, ReviewError> {
        self.ensure_open()?;
        if self.items.is_empty() {
            return Err(ReviewError::NoActiveSession);
        }
        let indices = filter.indices(&self.items);
        let (Some(&first), Some(&last)) = (indices.first(), indices.last()) else {
            return Err(ReviewError::EmptyView { filter });
        };
        let n = indices.len();

        let target = match self.focus {
            Some(current) => match indices.iter().position(|&i| i == current) {
                Some(p) => match direction {
                    Direction::Next => indices[(p + 1) % n],
                    Direction::Prev => indices[(p + n - 1) % n],
                },
                None => match direction {
                    Direction::Next => indices.iter().copied().find(|&i| i > current).unwrap_or(first),
                    Direction::Prev => indices
                        .iter()
                        .rev()
                        .copied()
                        .find(|&i| i < current)
                        .unwrap_or(last),
                },
            },
            None => match direction {
                Direction::Next => first,
                Direction::Prev => last,
            },
        };

        self.focus = Some(target);
        tracing::debug!(view = filter.label(), ?direction, image = self.items[target].id(), "advanced");
        Ok(&self.items[target])
    }

    /// Appends a comment to the open image and returns it.
    ///
    /// Blank or whitespace-only text is ignored in every state and yields
    /// `Ok(None)`. Non-blank text is stored exactly as given.
    ///
    /// # Errors
    ///
    /// - `SessionClosed` after a successful submit.
    /// - `NoFocusedItem` when no image is open.
    pub fn add_comment(&mut self, text: &str) -> Result<Option<&ReviewItem>, ReviewError> {
        if text.trim().is_empty() {
            return Ok(None);
        }
        self.ensure_open()?;
        let current = self.focus.ok_or(ReviewError::NoFocusedItem)?;

        self.comment_seq += 1;
        let comment = Comment {
            id: CommentId(self.comment_seq),
            text: text.to_owned(),
            created_at: Utc::now(),
        };
        tracing::debug!(image = self.items[current].id(), comment = %comment.id, "comment added");

        self.items[current].push_comment(comment);
        Ok(Some(&self.items[current]))
    }

    /// Records `decision` on the open image, replacing any earlier status.
    ///
    /// Returns [`FollowUp::Advance`] when `filter`'s view, evaluated after the
    /// decision, still has an image after the open one in backing order, and
    /// [`FollowUp::ReviewComplete`] otherwise. Focus does not move.
    ///
    /// # Errors
    ///
    /// - `SessionClosed` after a successful submit.
    /// - `NoFocusedItem` when no image is open.
    pub fn set_status(
        &mut self,
        filter: ReviewFilter,
        decision: Decision,
    ) -> Result<FollowUp, ReviewError> {
        self.ensure_open()?;
        let current = self.focus.ok_or(ReviewError::NoFocusedItem)?;
        let status = ReviewStatus::from(decision);
        let previous = self.items[current].status();
        self.items[current].set_status(status);
        tracing::debug!(
            image = self.items[current].id(),
            from = %previous,
            to = %status,
            "status changed"
        );

        let has_later = self.items[current + 1..].iter().any(|item| filter.matches(item));
        if has_later {
            Ok(FollowUp::Advance)
        } else {
            Ok(FollowUp::ReviewComplete {
                ready: self.is_submission_ready(),
            })
        }
    }

    /// `true` iff no image is `Unreviewed`.
    pub fn is_submission_ready(&self) -> bool {
        self.items.iter().all(|item| item.status().is_terminal())
    }

    /// Ids of the images still awaiting a decision, in backing order.
    pub fn unreviewed_ids(&self) -> Vec<&str> {
        self.items
            .iter()
            .filter(|item| !item.status().is_terminal())
            .map(ReviewItem::id)
            .collect()
    }

    pub fn counts(&self) -> StatusCounts {
        self.items
            .iter()
            .fold(StatusCounts::default(), |mut counts, item| {
                match item.status() {
                    ReviewStatus::Unreviewed => counts.unreviewed += 1,
                    ReviewStatus::Approved => counts.approved += 1,
                    ReviewStatus::Flagged => counts.flagged += 1,
                }
                counts
            })
    }

    /// Finalizes the review and hands the snapshot to `sink`.
    ///
    /// On success the session is closed: further mutating calls, including a
    /// second `submit`, fail with `SessionClosed`. If the sink fails the
    /// session stays open so the submit can be retried.
    ///
    /// # Errors
    ///
    /// - `SessionClosed` when already submitted.
    /// - `NoActiveSession` when the session has no images.
    /// - `IncompleteReview` listing every still-unreviewed id.
    /// - `Sink` when delivery fails.
    pub fn submit<S>(&mut self, sink: &mut S) -> Result<Submission, ReviewError>
    where
        S: SubmissionSink + ?Sized,
    {
        self.ensure_open()?;
        if self.items.is_empty() {
            return Err(ReviewError::NoActiveSession);
        }
        let unreviewed: Vec<String> = self.unreviewed_ids().into_iter().map(str::to_owned).collect();
        if !unreviewed.is_empty() {
            tracing::debug!(remaining = unreviewed.len(), "submit blocked");
            return Err(ReviewError::IncompleteReview { unreviewed });
        }

        let submission = Submission::capture(&self.items);
        if let Err(e) = sink.deliver(&submission) {
            tracing::warn!(submission = %submission.id, "submission sink failed: {e}");
            return Err(e.into());
        }

        self.closed = true;
        self.focus = None;
        tracing::info!(submission = %submission.id, images = submission.items.len(), "review session closed");
        Ok(submission)
    }

    fn ensure_open(&self) -> Result<(), ReviewError> {
        if self.closed {
            Err(ReviewError::SessionClosed)
        } else {
            Ok(())
        }
    }
}
