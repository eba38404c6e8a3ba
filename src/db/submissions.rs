use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{error, info};

use crate::models::{ContactDetails, Moment, Submission, SubmissionEntry};
use crate::planner::{FieldError, SinkError, SubmissionSink};

/// Submission sink backed by the local SQLite file. Each submission lands in
/// `submissions` with one `submission_songs` row per moment.
pub struct SubmissionStore<'c> {
    conn: &'c Connection,
}

impl<'c> SubmissionStore<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    fn insert(&self, submission: &Submission) -> rusqlite::Result<i64> {
        let contact = submission.contact();
        let payload = submission
            .to_json()
            .map_err(|err| rusqlite::Error::ToSqlConversionFailure(Box::new(err)))?;

        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO submissions
                (couple_names, wedding_date, email, phone, notes, created_at, payload)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                contact.couple_names,
                contact.wedding_date,
                contact.email,
                contact.phone,
                contact.notes,
                Utc::now().to_rfc3339(),
                payload,
            ],
        )?;
        let id = tx.last_insert_rowid();

        for entry in submission.song_selections() {
            tx.execute(
                "INSERT INTO submission_songs (submission_id, song_id, moment) VALUES (?1, ?2, ?3)",
                params![id, entry.song_id, entry.moment.as_str()],
            )?;
        }
        tx.commit()?;
        Ok(id)
    }
}

impl SubmissionSink for SubmissionStore<'_> {
    fn submit(&mut self, submission: &Submission) -> Result<i64, SinkError> {
        let mut problems = submission.contact().validate();
        if submission.song_selections().is_empty() {
            problems.push(FieldError::new(
                "songSelections",
                "Please select at least one song for your ceremony.",
            ));
        }
        if !problems.is_empty() {
            return Err(SinkError::Validation(problems));
        }

        match self.insert(submission) {
            Ok(id) => {
                info!(
                    id,
                    songs = submission.song_selections().len(),
                    "submission stored"
                );
                Ok(id)
            }
            Err(err) => {
                error!(error = %err, "failed to store submission");
                Err(SinkError::Storage(err.to_string()))
            }
        }
    }
}

/// A submission as read back from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredSubmission {
    pub id: i64,
    pub contact: ContactDetails,
    pub created_at: String,
    pub entries: Vec<SubmissionEntry>,
    pub payload: String,
}

pub fn fetch_submission(conn: &Connection, id: i64) -> Result<Option<StoredSubmission>> {
    let header = conn
        .query_row(
            "SELECT couple_names, wedding_date, email, phone, notes, created_at, payload
             FROM submissions
             WHERE id = ?1",
            [id],
            |row| {
                Ok((
                    ContactDetails {
                        couple_names: row.get(0)?,
                        wedding_date: row.get(1)?,
                        email: row.get(2)?,
                        phone: row.get(3)?,
                        notes: row.get(4)?,
                    },
                    row.get::<_, String>(5)?,
                    row.get::<_, String>(6)?,
                ))
            },
        )
        .optional()
        .context("failed to load submission")?;

    let Some((contact, created_at, payload)) = header else {
        return Ok(None);
    };

    let mut stmt = conn
        .prepare(
            "SELECT ss.moment, ss.song_id, s.title
             FROM submission_songs ss
             JOIN songs s ON s.id = ss.song_id
             WHERE ss.submission_id = ?1",
        )
        .context("failed to prepare submission songs query")?;

    let mut rows = stmt
        .query([id])
        .context("failed to execute submission songs query")?;

    let mut entries = Vec::new();
    while let Some(row) = rows.next().context("failed to fetch submission song row")? {
        let moment: String = row.get(0).context("failed to read moment")?;
        let moment = moment
            .parse::<Moment>()
            .with_context(|| format!("submission {id} has an invalid moment"))?;
        entries.push(SubmissionEntry {
            moment,
            song_id: row.get(1).context("failed to read song id")?,
            song_title: row.get(2).context("failed to read song title")?,
        });
    }
    entries.sort_by_key(|entry| entry.moment);

    Ok(Some(StoredSubmission {
        id,
        contact,
        created_at,
        entries,
        payload,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{init_schema, load_catalog};
    use crate::planner::{build_submission, Selection};

    fn memory_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        conn
    }

    fn contact() -> ContactDetails {
        ContactDetails {
            couple_names: "Anna & Luca".into(),
            wedding_date: "2026-06-13".into(),
            email: "anna@example.com".into(),
            phone: "+39 333 1234567".into(),
            notes: None,
        }
    }

    #[test]
    fn stored_submission_round_trips_with_songs() {
        let conn = memory_db();
        let catalog = load_catalog(&conn, true).unwrap();
        let mut selection = Selection::new();
        selection.insert(Moment::Fine, 10);
        selection.insert(Moment::Ingresso, 1);
        let submission = build_submission(contact(), &selection, &catalog, &Moment::ALL).unwrap();

        let id = SubmissionStore::new(&conn).submit(&submission).unwrap();
        let stored = fetch_submission(&conn, id).unwrap().unwrap();

        assert_eq!(stored.contact, contact());
        assert_eq!(stored.entries, submission.song_selections());
        assert!(chrono::DateTime::parse_from_rfc3339(&stored.created_at).is_ok());
        let payload: serde_json::Value = serde_json::from_str(&stored.payload).unwrap();
        assert_eq!(payload["coupleNames"], "Anna & Luca");
        assert_eq!(payload["songSelections"][1]["songTitle"], "Resta Qui Con Noi");
    }

    #[test]
    fn invalid_contact_is_rejected_before_any_write() {
        let conn = memory_db();
        let catalog = load_catalog(&conn, true).unwrap();
        let mut selection = Selection::new();
        selection.insert(Moment::Ingresso, 1);
        let bad = ContactDetails {
            email: "not-an-email".into(),
            ..contact()
        };
        let submission = build_submission(bad, &selection, &catalog, &Moment::ALL).unwrap();

        let err = SubmissionStore::new(&conn).submit(&submission).unwrap_err();

        assert!(!err.is_retryable());
        assert!(err.to_string().contains("email: Invalid email address"));
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM submissions", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn empty_selection_is_a_validation_error() {
        let conn = memory_db();
        let submission = Submission::new(contact(), Vec::new());

        let err = SubmissionStore::new(&conn).submit(&submission).unwrap_err();

        match err {
            SinkError::Validation(fields) => assert_eq!(fields[0].field, "songSelections"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn storage_failure_rolls_back_and_is_retryable() {
        let conn = memory_db();
        let submission = Submission::new(
            contact(),
            vec![SubmissionEntry {
                moment: Moment::Pace,
                song_id: 404,
                song_title: "Missing".into(),
            }],
        );

        let err = SubmissionStore::new(&conn).submit(&submission).unwrap_err();

        assert!(err.is_retryable());
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM submissions", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn unknown_id_reads_as_none() {
        let conn = memory_db();
        assert!(fetch_submission(&conn, 12).unwrap().is_none());
    }

    #[test]
    fn corrupt_stored_moment_names_the_submission() {
        let conn = memory_db();
        load_catalog(&conn, true).unwrap();
        conn.execute(
            "INSERT INTO submissions
                 (id, couple_names, wedding_date, email, phone, notes, created_at, payload)
             VALUES (3, 'Anna & Luca', '2026-06-13', 'anna@example.com', '+39 333', NULL,
                     '2026-01-01 10:00:00', '{}')",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO submission_songs (submission_id, moment, song_id) VALUES (3, 'gloria', 1)",
            [],
        )
        .unwrap();

        let err = fetch_submission(&conn, 3).unwrap_err();
        assert!(format!("{err:#}").contains("submission 3 has an invalid moment"));
    }
}
