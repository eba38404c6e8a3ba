use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::models::{Moment, SongId};

/// Why a selection change was refused. State is always left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("Song {song_id} is not in the catalog.")]
    UnknownSong { song_id: SongId },
    #[error("'{title}' cannot be sung at {}.", .moment.label())]
    UnsuitableMoment {
        song_id: SongId,
        title: String,
        moment: Moment,
    },
    #[error("This song is already selected for {}. Each song can only be used once.", .moment.label())]
    AlreadySelected { song_id: SongId, moment: Moment },
}

impl SelectionError {
    /// Conflicts are a separate class from plain validation failures.
    pub fn is_conflict(&self) -> bool {
        matches!(self, SelectionError::AlreadySelected { .. })
    }
}

/// A single field that failed validation at the submission sink.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Failures reported by a submission sink.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SinkError {
    #[error("{}", join_fields(.0))]
    Validation(Vec<FieldError>),
    #[error("Could not send your selections: {0}. Please try again.")]
    Storage(String),
}

impl SinkError {
    /// Backend failures can be retried as-is; validation failures need edits.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SinkError::Storage(_))
    }
}

fn join_fields(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|error| error.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Errors raised by download, share, or submit.
#[derive(Debug, Error)]
pub enum FinalizeError {
    #[error("Selection out of date: the song chosen for {} (id {song_id}) is no longer available. Please choose again.", .moment.label())]
    StaleSelection { moment: Moment, song_id: SongId },
    #[error("Please select at least one song for your ceremony.")]
    EmptySubmission,
    #[error(transparent)]
    Sink(#[from] SinkError),
    #[error("Could not write {}: {source}", .path.display())]
    Export {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
