use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::Connection;

/// Open (creating if needed) the SQLite file at `path` and bring the schema
/// up to date.
pub fn open_database(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create data directory")?;
    }

    let conn = Connection::open(path).context("failed to open SQLite database")?;
    init_schema(&conn)?;
    Ok(conn)
}

/// Run lazy migrations on an open connection. Also toggles
/// `PRAGMA foreign_keys = ON` so cascades and references behave the same in
/// tests (in-memory databases) and production runs.
pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute("PRAGMA foreign_keys = ON", [])
        .context("failed to enable foreign keys")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS songs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            description TEXT NOT NULL,
            lyrics TEXT NOT NULL,
            audio_url TEXT NOT NULL
        )",
        [],
    )
    .context("failed to create songs table")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS song_moments (
            song_id INTEGER NOT NULL,
            moment TEXT NOT NULL,
            PRIMARY KEY (song_id, moment),
            FOREIGN KEY(song_id) REFERENCES songs(id) ON DELETE CASCADE
        )",
        [],
    )
    .context("failed to create song_moments table")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS submissions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            couple_names TEXT NOT NULL,
            wedding_date TEXT NOT NULL,
            email TEXT NOT NULL,
            phone TEXT NOT NULL,
            notes TEXT,
            created_at TEXT NOT NULL,
            payload TEXT NOT NULL
        )",
        [],
    )
    .context("failed to create submissions table")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS submission_songs (
            submission_id INTEGER NOT NULL,
            song_id INTEGER NOT NULL,
            moment TEXT NOT NULL,
            PRIMARY KEY (submission_id, moment),
            FOREIGN KEY(submission_id) REFERENCES submissions(id) ON DELETE CASCADE,
            FOREIGN KEY(song_id) REFERENCES songs(id)
        )",
        [],
    )
    .context("failed to create submission_songs table")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        init_schema(&conn).unwrap();

        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table'
                 AND name IN ('songs', 'song_moments', 'submissions', 'submission_songs')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 4);
    }

    #[test]
    fn opens_file_in_nested_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("planner.sqlite");

        open_database(&path).unwrap();

        assert!(path.exists());
    }
}
