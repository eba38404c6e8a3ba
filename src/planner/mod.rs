//! Selection-state core: which song goes to which ceremony moment, how far
//! along the couple is, and what has to happen before the selection leaves
//! the application. Nothing in here touches the terminal or the database.

mod catalog;
mod completion;
mod engine;
mod error;
mod finalize;
mod gate;
mod submission;

pub use catalog::{Catalog, MomentFilter, SongCatalog};
pub use completion::{evaluate, Completion};
pub use engine::{ResetOutcome, ResetRequest, Selected, Selection, SelectionEngine};
pub use error::{FieldError, FinalizeError, SelectionError, SinkError};
pub use finalize::{
    finalize, lyrics_sheet, share_link, share_message, FinalizeAction, FinalizeOutcome,
    OutputSettings,
};
pub use gate::{guard, guard_with, Gate, Gated, PendingConfirmation};
pub use submission::{build_submission, resolve_selection, SubmissionSink};
