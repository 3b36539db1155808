//! SQLite storage for submitted review passes.
//!
//! This is where the binary's submission sink writes. Sessions in progress are
//! never stored; only the finalized [`Submission`] snapshots are.

use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::OptionalExtension;
use tokio_rusqlite::Connection;

use crate::submission::{ItemSnapshot, Submission};
use crate::types::{Comment, CommentId, ReviewStatus};

/// One row of [`list_submissions`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionSummary {
    pub id: String,
    pub submitted_at: DateTime<Utc>,
    pub approved: usize,
    pub flagged: usize,
    pub comments: usize,
}

/// Opens (or creates) the SQLite database at `path`, configures WAL mode,
/// and applies schema migrations via the `schema_version` table.
///
/// `busy_timeout` is set through the `Connection` method rather than a PRAGMA
/// string so it takes effect regardless of pragma caching.
///
/// # Errors
///
/// Returns `tokio_rusqlite::Error` if the file cannot be opened, WAL configuration
/// fails, or schema DDL fails.
pub async fn open_db(path: &str) -> Result<Connection, tokio_rusqlite::Error> {
    let conn = Connection::open(path).await?;

    conn.call(|db| {
        db.execute_batch(
            "PRAGMA journal_mode=WAL;
             PRAGMA synchronous=NORMAL;
             PRAGMA foreign_keys=ON;",
        )?;
        db.busy_timeout(Duration::from_secs(5))?;
        // Fold any WAL left over from a previous run back into the main file.
        db.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        crate::schema::migrate(db)?;
        Ok::<_, rusqlite::Error>(())
    })
    .await?;

    tracing::debug!(path, "database ready");
    Ok(conn)
}

fn format_ts(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn parse_ts(raw: &str, column: usize) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(column, rusqlite::types::Type::Text, Box::new(e))
        })
}

fn parse_status(raw: &str, column: usize) -> rusqlite::Result<ReviewStatus> {
    ReviewStatus::parse(raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            column,
            rusqlite::types::Type::Text,
            format!("unknown review status `{raw}`").into(),
        )
    })
}

/// Stores `submission` and all of its decisions and comments in one
/// `BEGIN IMMEDIATE` transaction.
///
/// # Errors
///
/// Returns `tokio_rusqlite::Error` if any insert fails (including a repeated
/// submission id or an unreviewed item, which the schema rejects); nothing is
/// written in that case.
pub async fn record_submission(
    conn: &Connection,
    submission: &Submission,
) -> Result<(), tokio_rusqlite::Error> {
    let submission_id = submission.id.clone();
    let submission = submission.clone();

    conn.call(move |db| {
        let tx = db.transaction_with_behavior(rusqlite::TransactionBehavior::Immediate)?;
        tx.execute(
            "INSERT INTO submissions (id, submitted_at) VALUES (?1, ?2)",
            rusqlite::params![&submission.id, format_ts(&submission.submitted_at)],
        )?;
        for (position, item) in submission.items.iter().enumerate() {
            tx.execute(
                "INSERT INTO decisions (submission_id, position, image_id, source, status)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                rusqlite::params![
                    &submission.id,
                    position as i64,
                    &item.id,
                    &item.source,
                    item.status.as_str()
                ],
            )?;
            for comment in &item.comments {
                tx.execute(
                    "INSERT INTO decision_comments
                         (submission_id, image_id, comment_id, body, created_at)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                    rusqlite::params![
                        &submission.id,
                        &item.id,
                        comment.id.0 as i64,
                        &comment.text,
                        format_ts(&comment.created_at)
                    ],
                )?;
            }
        }
        tx.commit()?;
        Ok::<_, rusqlite::Error>(())
    })
    .await?;

    tracing::info!(submission = %submission_id, "submission stored");
    Ok(())
}

/// Loads the submission with `id`, or `None` if it was never stored.
///
/// Items come back in their original order, comments in id order.
///
/// # Errors
///
/// Returns `tokio_rusqlite::Error` if a query fails or a stored value cannot
/// be decoded.
pub async fn load_submission(
    conn: &Connection,
    id: &str,
) -> Result<Option<Submission>, tokio_rusqlite::Error> {
    let id = id.to_owned();

    conn.call(move |db| {
        let submitted_at: Option<String> = db
            .query_row(
                "SELECT submitted_at FROM submissions WHERE id = ?1",
                rusqlite::params![&id],
                |r| r.get(0),
            )
            .optional()?;
        let Some(submitted_at) = submitted_at else {
            return Ok::<_, rusqlite::Error>(None);
        };
        let submitted_at = parse_ts(&submitted_at, 0)?;

        let mut decisions = db.prepare(
            "SELECT image_id, source, status FROM decisions
             WHERE submission_id = ?1
             ORDER BY position",
        )?;
        let mut items = decisions
            .query_map(rusqlite::params![&id], |r| {
                let status: String = r.get(2)?;
                Ok(ItemSnapshot {
                    id: r.get(0)?,
                    source: r.get(1)?,
                    status: parse_status(&status, 2)?,
                    comments: Vec::new(),
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut comments = db.prepare(
            "SELECT comment_id, body, created_at FROM decision_comments
             WHERE submission_id = ?1 AND image_id = ?2
             ORDER BY comment_id",
        )?;
        for item in &mut items {
            item.comments = comments
                .query_map(rusqlite::params![&id, &item.id], |r| {
                    let comment_id: i64 = r.get(0)?;
                    let created_at: String = r.get(2)?;
                    Ok(Comment {
                        id: CommentId(comment_id as u64),
                        text: r.get(1)?,
                        created_at: parse_ts(&created_at, 2)?,
                    })
                })?
                .collect::<rusqlite::Result<Vec<_>>>()?;
        }

        Ok(Some(Submission {
            id,
            submitted_at,
            items,
        }))
    })
    .await
}

/// Lists every stored submission, newest first, with per-status counts.
///
/// # Errors
///
/// Returns `tokio_rusqlite::Error` if the query fails.
pub async fn list_submissions(
    conn: &Connection,
) -> Result<Vec<SubmissionSummary>, tokio_rusqlite::Error> {
    conn.call(|db| {
        let mut stmt = db.prepare(
            "SELECT s.id,
                    s.submitted_at,
                    (SELECT COUNT(*) FROM decisions d
                      WHERE d.submission_id = s.id AND d.status = 'approved'),
                    (SELECT COUNT(*) FROM decisions d
                      WHERE d.submission_id = s.id AND d.status = 'flagged'),
                    (SELECT COUNT(*) FROM decision_comments c
                      WHERE c.submission_id = s.id)
             FROM submissions s
             ORDER BY s.submitted_at DESC",
        )?;
        let rows = stmt
            .query_map([], |r| {
                let submitted_at: String = r.get(1)?;
                let approved: i64 = r.get(2)?;
                let flagged: i64 = r.get(3)?;
                let comments: i64 = r.get(4)?;
                Ok(SubmissionSummary {
                    id: r.get(0)?,
                    submitted_at: parse_ts(&submitted_at, 1)?,
                    approved: approved as usize,
                    flagged: flagged as usize,
                    comments: comments as usize,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok::<_, rusqlite::Error>(rows)
    })
    .await
}
