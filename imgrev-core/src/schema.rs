/// DDL to create the schema_version tracking table.
///
/// Applied unconditionally on every DB open (before checking the version),
/// using `IF NOT EXISTS` so it is safe to run multiple times.
pub const SCHEMA_VERSION_DDL: &str = "
    CREATE TABLE IF NOT EXISTS schema_version (
        version INTEGER NOT NULL
    ) STRICT;
";

/// DDL for the full v1 schema.
///
/// Contains three tables:
/// - `submissions`: one row per submitted review pass, keyed by UUID v4 text.
/// - `decisions`: the final status of each image in a submission, with its
///   position in the original image order.
/// - `decision_comments`: the comment thread of each decided image.
///
/// Only decided images are ever stored, so `decisions.status` excludes
/// `unreviewed`. Timestamps are RFC 3339 text with nanosecond precision so a
/// stored submission reads back identical to the one written.
pub const SCHEMA_V1_SQL: &str = "
    CREATE TABLE IF NOT EXISTS submissions (
        id           TEXT    PRIMARY KEY,
        submitted_at TEXT    NOT NULL
    ) STRICT;

    CREATE TABLE IF NOT EXISTS decisions (
        submission_id TEXT    NOT NULL REFERENCES submissions(id) ON DELETE CASCADE,
        position      INTEGER NOT NULL,
        image_id      TEXT    NOT NULL,
        source        TEXT    NOT NULL,
        status        TEXT    NOT NULL CHECK(status IN ('approved', 'flagged')),
        PRIMARY KEY (submission_id, image_id)
    ) STRICT;

    CREATE TABLE IF NOT EXISTS decision_comments (
        submission_id TEXT    NOT NULL,
        image_id      TEXT    NOT NULL,
        comment_id    INTEGER NOT NULL,
        body          TEXT    NOT NULL,
        created_at    TEXT    NOT NULL,
        PRIMARY KEY (submission_id, image_id, comment_id),
        FOREIGN KEY (submission_id, image_id)
            REFERENCES decisions(submission_id, image_id) ON DELETE CASCADE
    ) STRICT;
";

/// Runs forward-only schema migration to migrate the DB to the latest version.
///
/// Idempotent: safe to call on every open.
///
/// # Errors
///
/// Returns `rusqlite::Error` if the DDL fails or the version row cannot be read.
pub fn migrate(db: &mut rusqlite::Connection) -> rusqlite::Result<()> {
    db.execute_batch(SCHEMA_VERSION_DDL)?;

    let version: i64 = db.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |r| r.get(0),
    )?;

    if version < 1 {
        let tx = db.transaction_with_behavior(rusqlite::TransactionBehavior::Immediate)?;
        tx.execute_batch(SCHEMA_V1_SQL)?;
        tx.execute("INSERT INTO schema_version (version) VALUES (1)", [])?;
        tx.commit()?;
        tracing::info!("applied schema v1");
    }

    Ok(())
}
