//! Wedding ceremony song planner.
//!
//! `planner` holds the selection rules and finalize workflow, `db` the
//! SQLite-backed catalog and submission store, and `ui` the terminal
//! front-end that ties them together.
pub mod config;
pub mod db;
pub mod logging;
pub mod models;
pub mod planner;
pub mod ui;

pub use config::{AppConfig, ConfigError, Paths};
pub use db::{load_catalog, open_database, SubmissionStore};
pub use models::{ContactDetails, Moment, Song, SongId, Submission};
pub use planner::{Catalog, SelectionEngine, SongCatalog};
pub use ui::{run_app, App};
