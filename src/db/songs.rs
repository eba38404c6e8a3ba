use std::collections::BTreeMap;

use anyhow::{anyhow, Context, Result};
use rusqlite::{params, Connection, Transaction};
use tracing::info;

use crate::models::{Moment, Song, SongId};
use crate::planner::SongCatalog;

use super::seed::DEFAULT_SONGS;

/// Fields needed to insert a song; the id comes from SQLite.
#[derive(Debug, Clone)]
pub struct NewSong<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub lyrics: &'a str,
    pub audio_url: &'a str,
    pub moments: &'a [Moment],
}

/// Fetch every song with its suitable moments, ordered by id. A song with
/// no moment rows, or with a moment name we do not recognise, is treated as
/// a corrupt catalog.
pub fn fetch_all_songs(conn: &Connection) -> Result<Vec<Song>> {
    let mut moments = fetch_song_moments(conn)?;

    let mut stmt = conn
        .prepare(
            "SELECT id, title, description, lyrics, audio_url
             FROM songs
             ORDER BY id",
        )
        .context("failed to prepare songs query")?;

    let rows = stmt
        .query_map([], |row| {
            Ok(Song {
                id: row.get(0)?,
                title: row.get(1)?,
                description: row.get(2)?,
                lyrics: row.get(3)?,
                audio_url: row.get(4)?,
                suitable_moments: Vec::new(),
            })
        })
        .context("failed to iterate songs")?
        .collect::<Result<Vec<_>, _>>()
        .context("failed to collect songs")?;

    rows.into_iter()
        .map(|mut song| {
            song.suitable_moments = moments
                .remove(&song.id)
                .filter(|list| !list.is_empty())
                .ok_or_else(|| anyhow!("Song '{}' has no suitable moments", song.title))?;
            Ok(song)
        })
        .collect()
}

fn fetch_song_moments(conn: &Connection) -> Result<BTreeMap<SongId, Vec<Moment>>> {
    let mut stmt = conn
        .prepare("SELECT song_id, moment FROM song_moments")
        .context("failed to prepare song moments query")?;

    let mut rows = stmt
        .query([])
        .context("failed to execute song moments query")?;

    let mut by_song: BTreeMap<SongId, Vec<Moment>> = BTreeMap::new();
    while let Some(row) = rows.next().context("failed to fetch song moment row")? {
        let song_id: SongId = row.get(0).context("failed to read song id")?;
        let name: String = row.get(1).context("failed to read moment")?;
        let moment = name
            .parse::<Moment>()
            .with_context(|| format!("song {song_id} has an invalid moment"))?;
        by_song.entry(song_id).or_default().push(moment);
    }

    for list in by_song.values_mut() {
        list.sort();
    }
    Ok(by_song)
}

/// Insert a song and its moment tags in one transaction. We echo the
/// hydrated struct so callers do not have to re-query.
pub fn create_song(conn: &Connection, song: &NewSong<'_>) -> Result<Song> {
    let tx = conn
        .unchecked_transaction()
        .context("failed to start song transaction")?;
    let created = insert_song(&tx, song)?;
    tx.commit().context("failed to commit song")?;
    Ok(created)
}

fn insert_song(tx: &Transaction<'_>, song: &NewSong<'_>) -> Result<Song> {
    if song.moments.is_empty() {
        return Err(anyhow!("Song '{}' needs at least one moment", song.title));
    }

    tx.execute(
        "INSERT INTO songs (title, description, lyrics, audio_url) VALUES (?1, ?2, ?3, ?4)",
        params![song.title, song.description, song.lyrics, song.audio_url],
    )
    .with_context(|| format!("failed to insert song '{}'", song.title))?;
    let id = tx.last_insert_rowid();

    let mut moments = song.moments.to_vec();
    moments.sort();
    moments.dedup();
    for moment in &moments {
        tx.execute(
            "INSERT INTO song_moments (song_id, moment) VALUES (?1, ?2)",
            params![id, moment.as_str()],
        )
        .context("failed to tag song with moment")?;
    }

    Ok(Song {
        id,
        title: song.title.to_string(),
        description: song.description.to_string(),
        lyrics: song.lyrics.to_string(),
        audio_url: song.audio_url.to_string(),
        suitable_moments: moments,
    })
}

/// Insert the default ceremony songs when the catalog is empty. Returns the
/// number of songs inserted (zero when songs already exist). All songs go in
/// one transaction, so a failed seed leaves the table empty for the next run.
pub fn seed_default_catalog(conn: &Connection) -> Result<usize> {
    let existing: i64 = conn
        .query_row("SELECT COUNT(*) FROM songs", [], |row| row.get(0))
        .context("failed to count songs")?;
    if existing > 0 {
        return Ok(0);
    }

    let tx = conn
        .unchecked_transaction()
        .context("failed to start seed transaction")?;
    for seed in DEFAULT_SONGS {
        insert_song(
            &tx,
            &NewSong {
                title: seed.title,
                description: seed.description,
                lyrics: seed.lyrics,
                audio_url: seed.audio_url,
                moments: seed.moments,
            },
        )?;
    }
    tx.commit().context("failed to commit default catalog")?;

    info!(count = DEFAULT_SONGS.len(), "seeded default catalog");
    Ok(DEFAULT_SONGS.len())
}

/// Load the read-only catalog for this session, seeding first if asked to.
pub fn load_catalog(conn: &Connection, seed: bool) -> Result<SongCatalog> {
    if seed {
        seed_default_catalog(conn)?;
    }
    let songs = fetch_all_songs(conn)?;
    info!(songs = songs.len(), "catalog loaded");
    Ok(SongCatalog::new(songs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_schema;
    use crate::planner::Catalog;

    fn memory_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        conn
    }

    #[test]
    fn seeding_fills_an_empty_catalog_once() {
        let conn = memory_db();

        assert_eq!(seed_default_catalog(&conn).unwrap(), 10);
        assert_eq!(seed_default_catalog(&conn).unwrap(), 0);

        let catalog = load_catalog(&conn, true).unwrap();
        assert_eq!(catalog.len(), 10);
        let ave = catalog.song_by_id(1).unwrap();
        assert_eq!(ave.title, "Ave Maria");
        assert_eq!(ave.suitable_moments, vec![Moment::Ingresso, Moment::Inizio]);
        let last = catalog.song_by_id(10).unwrap();
        assert_eq!(last.title, "Resta Qui Con Noi");
        assert_eq!(last.suitable_moments, vec![Moment::Fine]);
    }

    #[test]
    fn every_moment_has_a_seeded_song() {
        let conn = memory_db();
        let catalog = load_catalog(&conn, true).unwrap();
        for moment in Moment::ALL {
            assert!(
                catalog.all_songs().iter().any(|song| song.suits(moment)),
                "no song for {moment}"
            );
        }
    }

    #[test]
    fn created_song_moments_are_sorted_and_deduplicated() {
        let conn = memory_db();
        let song = create_song(
            &conn,
            &NewSong {
                title: "Gloria",
                description: "Festive",
                lyrics: "Gloria in excelsis Deo",
                audio_url: "gloria.ogg",
                moments: &[Moment::Fine, Moment::Ingresso, Moment::Fine],
            },
        )
        .unwrap();

        assert_eq!(song.suitable_moments, vec![Moment::Ingresso, Moment::Fine]);
        let loaded = fetch_all_songs(&conn).unwrap();
        assert_eq!(loaded, vec![song]);
    }

    #[test]
    fn song_without_moments_is_refused() {
        let conn = memory_db();
        let err = create_song(
            &conn,
            &NewSong {
                title: "Nowhere",
                description: "",
                lyrics: "",
                audio_url: "",
                moments: &[],
            },
        )
        .unwrap_err();
        assert!(err.to_string().contains("at least one moment"));
    }

    #[test]
    fn untagged_rows_are_a_corrupt_catalog() {
        let conn = memory_db();
        conn.execute(
            "INSERT INTO songs (title, description, lyrics, audio_url) VALUES ('Bare', '', '', '')",
            [],
        )
        .unwrap();

        let err = fetch_all_songs(&conn).unwrap_err();
        assert!(err.to_string().contains("no suitable moments"));
    }

    #[test]
    fn unknown_moment_names_fail_loudly() {
        let conn = memory_db();
        conn.execute(
            "INSERT INTO songs (id, title, description, lyrics, audio_url) VALUES (7, 'Odd', '', '', '')",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO song_moments (song_id, moment) VALUES (7, 'gloria')",
            [],
        )
        .unwrap();

        assert!(fetch_all_songs(&conn).is_err());
    }

    #[test]
    fn failed_seed_leaves_nothing_behind_and_retries_cleanly() {
        let conn = memory_db();
        conn.execute_batch(
            "CREATE TRIGGER fail_fifth_song BEFORE INSERT ON songs
             WHEN NEW.title = 'Servo per Amore'
             BEGIN SELECT RAISE(ABORT, 'disk full'); END;",
        )
        .unwrap();

        assert!(seed_default_catalog(&conn).is_err());
        let count = |conn: &Connection, table: &str| -> i64 {
            conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
                .unwrap()
        };
        assert_eq!(count(&conn, "songs"), 0);
        assert_eq!(count(&conn, "song_moments"), 0);

        conn.execute_batch("DROP TRIGGER fail_fifth_song;").unwrap();
        assert_eq!(seed_default_catalog(&conn).unwrap(), 10);
        assert_eq!(load_catalog(&conn, true).unwrap().len(), 10);
    }
}
