use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate, NaiveDateTime};
use tracing::{info, warn};

use crate::models::{ContactDetails, Moment, Song};

use super::catalog::Catalog;
use super::engine::Selection;
use super::error::FinalizeError;
use super::submission::{build_submission, resolve_selection, SubmissionSink};

/// The three ways a selection leaves the planner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinalizeAction {
    Download,
    Share,
    Submit(ContactDetails),
}

impl FinalizeAction {
    pub fn label(&self) -> &'static str {
        match self {
            FinalizeAction::Download => "Download lyrics",
            FinalizeAction::Share => "Share via WhatsApp",
            FinalizeAction::Submit(_) => "Send to choir",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinalizeOutcome {
    /// Lyrics sheet written to this path.
    Downloaded(PathBuf),
    /// Link that opens the messaging app with the message filled in.
    ShareLink(String),
    /// Id assigned by the submission sink.
    Submitted(i64),
}

/// Where finalize outputs go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputSettings {
    pub export_dir: PathBuf,
    pub share_url: String,
}

/// Run `action` against a selection snapshot. Nothing is written, opened, or
/// sent unless every selected song still resolves in the catalog.
pub fn finalize<C, S>(
    action: FinalizeAction,
    selection: &Selection,
    catalog: &C,
    sink: &mut S,
    settings: &OutputSettings,
) -> Result<FinalizeOutcome, FinalizeError>
where
    C: Catalog + ?Sized,
    S: SubmissionSink + ?Sized,
{
    let outcome = match action {
        FinalizeAction::Download => {
            let resolved = resolve_selection(selection, catalog, &Moment::ALL)?;
            let path = export_lyrics(&resolved, &settings.export_dir, Local::now().naive_local())?;
            FinalizeOutcome::Downloaded(path)
        }
        FinalizeAction::Share => {
            let resolved = resolve_selection(selection, catalog, &Moment::ALL)?;
            let message = share_message(&resolved);
            FinalizeOutcome::ShareLink(share_link(&settings.share_url, &message))
        }
        FinalizeAction::Submit(contact) => {
            let submission =
                build_submission(contact.normalized(), selection, catalog, &Moment::ALL)?;
            let id = sink.submit(&submission).inspect_err(|err| {
                warn!(error = %err, retryable = err.is_retryable(), "submission failed");
            })?;
            FinalizeOutcome::Submitted(id)
        }
    };
    info!(?outcome, "finalize complete");
    Ok(outcome)
}

/// Write the lyrics sheet stamped with `at`. The file name and the
/// "Created on" line come from the same instant.
fn export_lyrics(
    entries: &[(Moment, &Song)],
    export_dir: &Path,
    at: NaiveDateTime,
) -> Result<PathBuf, FinalizeError> {
    let sheet = lyrics_sheet(entries, at.date());
    let path = export_dir.join(format!("wedding-songs-{}.txt", at.format("%Y%m%d-%H%M%S")));
    write_export(&path, &sheet)?;
    Ok(path)
}

fn write_export(path: &Path, contents: &str) -> Result<(), FinalizeError> {
    let export_error = |source| FinalizeError::Export {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(export_error)?;
    }
    fs::write(path, contents).map_err(export_error)
}

/// Plain-text lyrics booklet: a title block, then each moment with its song
/// and lyrics in ceremony order.
pub fn lyrics_sheet(entries: &[(Moment, &Song)], created: NaiveDate) -> String {
    let mut sheet = String::new();
    let _ = writeln!(sheet, "Wedding Ceremony Song Selections");
    let _ = writeln!(sheet, "Created on {}", created.format("%B %-d, %Y"));

    for (moment, song) in entries {
        let _ = writeln!(sheet);
        let _ = writeln!(sheet, "{}", moment.label());
        let _ = writeln!(sheet, "Song: {}", song.title);
        let _ = writeln!(sheet);
        for line in song.lyrics.lines() {
            let _ = writeln!(sheet, "    {}", line.trim_end());
        }
    }
    sheet
}

/// Message body for sharing, one `Moment: Title` line per selection.
pub fn share_message(entries: &[(Moment, &Song)]) -> String {
    let lines = entries
        .iter()
        .map(|(moment, song)| format!("{}: {}", moment.label(), song.title))
        .collect::<Vec<_>>()
        .join("\n");
    format!("My Wedding Ceremony Song Selections:\n\n{lines}")
}

/// Append `text=<message>` to `base`, percent-encoding the message.
pub fn share_link(base: &str, message: &str) -> String {
    let separator = if base.contains('?') { '&' } else { '?' };
    format!("{base}{separator}text={}", percent_encode(message))
}

/// Encode everything outside the RFC 3986 unreserved set.
fn percent_encode(value: &str) -> String {
    let mut encoded = String::with_capacity(value.len() * 3);
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                encoded.push(byte as char)
            }
            _ => {
                let _ = write!(encoded, "%{byte:02X}");
            }
        }
    }
    encoded
}
