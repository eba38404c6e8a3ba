//! Persistence module split across logical submodules.

mod connection;
mod seed;
mod songs;
mod submissions;

pub use connection::{init_schema, open_database};
pub use songs::{create_song, fetch_all_songs, load_catalog, seed_default_catalog, NewSong};
pub use submissions::{fetch_submission, StoredSubmission, SubmissionStore};
