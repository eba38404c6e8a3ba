use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::models::{Moment, SongId};

use super::catalog::Catalog;
use super::completion::{evaluate, Completion};
use super::error::SelectionError;

/// Moment → chosen song. Keys iterate in ceremony order.
pub type Selection = BTreeMap<Moment, SongId>;

/// Successful outcome of `select_song_for_moment`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selected {
    /// The song now sits at `moment`; `replaced` is the song it displaced.
    Applied {
        moment: Moment,
        song_id: SongId,
        replaced: Option<SongId>,
    },
    /// The same pair was chosen again, so the moment is empty now.
    ToggledOff { moment: Moment, song_id: SongId },
}

/// First phase of a reset: tells the caller whether to ask the user at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetRequest {
    NothingToReset,
    Confirm { selected: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetOutcome {
    Cleared { count: usize },
    Cancelled,
    NothingToReset,
}

/// Holds the couple's in-progress selection and enforces its rules:
///
/// - a moment holds at most one song;
/// - a song is used for at most one moment;
/// - a song only goes to a moment listed among its suitable moments.
///
/// Every mutation either applies completely or leaves the map untouched.
#[derive(Debug, Clone, Default)]
pub struct SelectionEngine {
    selection: Selection,
}

impl SelectionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Owned copy for hand-off to finalize actions.
    pub fn snapshot(&self) -> Selection {
        self.selection.clone()
    }

    pub fn song_for(&self, moment: Moment) -> Option<SongId> {
        self.selection.get(&moment).copied()
    }

    pub fn moment_of(&self, song_id: SongId) -> Option<Moment> {
        self.selection
            .iter()
            .find(|(_, id)| **id == song_id)
            .map(|(moment, _)| *moment)
    }

    pub fn selected_count(&self) -> usize {
        self.selection.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selection.is_empty()
    }

    pub fn completion(&self) -> Completion {
        evaluate(&self.selection, &Moment::ALL)
    }

    /// Choose `song_id` for `moment` with toggle semantics. Choosing the pair
    /// that is already set clears the moment. Unknown songs, unsuitable
    /// moments, and songs already used elsewhere are rejected.
    pub fn select_song_for_moment<C>(
        &mut self,
        catalog: &C,
        song_id: SongId,
        moment: Moment,
    ) -> Result<Selected, SelectionError>
    where
        C: Catalog + ?Sized,
    {
        if self.song_for(moment) == Some(song_id) {
            self.selection.remove(&moment);
            info!(%moment, song_id, "song deselected");
            return Ok(Selected::ToggledOff { moment, song_id });
        }

        let song = catalog
            .song_by_id(song_id)
            .ok_or(SelectionError::UnknownSong { song_id })?;
        if !song.suits(moment) {
            debug!(%moment, song_id, "rejected unsuitable moment");
            return Err(SelectionError::UnsuitableMoment {
                song_id,
                title: song.title.clone(),
                moment,
            });
        }

        if let Some(existing) = self.moment_of(song_id) {
            debug!(%moment, song_id, %existing, "rejected song already in use");
            return Err(SelectionError::AlreadySelected {
                song_id,
                moment: existing,
            });
        }

        let replaced = self.selection.insert(moment, song_id);
        info!(%moment, song_id, ?replaced, "song selected");
        Ok(Selected::Applied {
            moment,
            song_id,
            replaced,
        })
    }

    /// Clear `moment`. Returns the song that was there, if any.
    pub fn remove_song_from_moment(&mut self, moment: Moment) -> Option<SongId> {
        let removed = self.selection.remove(&moment);
        if let Some(song_id) = removed {
            info!(%moment, song_id, "song removed");
        }
        removed
    }

    pub fn request_reset(&self) -> ResetRequest {
        if self.selection.is_empty() {
            ResetRequest::NothingToReset
        } else {
            ResetRequest::Confirm {
                selected: self.selection.len(),
            }
        }
    }

    /// Second phase of a reset, called with the user's answer.
    pub fn confirm_reset(&mut self, confirmed: bool) -> ResetOutcome {
        if self.selection.is_empty() {
            return ResetOutcome::NothingToReset;
        }
        if !confirmed {
            debug!("reset declined");
            return ResetOutcome::Cancelled;
        }
        let count = self.selection.len();
        self.selection.clear();
        info!(count, "selections reset");
        ResetOutcome::Cleared { count }
    }

    /// Reset in one call. `confirm` receives the number of selected moments
    /// and is not invoked at all when nothing is selected.
    pub fn reset_selections<F>(&mut self, confirm: F) -> ResetOutcome
    where
        F: FnOnce(usize) -> bool,
    {
        match self.request_reset() {
            ResetRequest::NothingToReset => ResetOutcome::NothingToReset,
            ResetRequest::Confirm { selected } => {
                let confirmed = confirm(selected);
                self.confirm_reset(confirmed)
            }
        }
    }
}
