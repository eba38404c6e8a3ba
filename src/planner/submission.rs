use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use tracing::error;

use crate::models::{ContactDetails, Moment, Song, Submission, SubmissionEntry};

use super::catalog::Catalog;
use super::engine::Selection;
use super::error::{FieldError, FinalizeError, SinkError};

/// Destination for finished selections. Returns the id the backend assigned.
pub trait SubmissionSink {
    fn submit(&mut self, submission: &Submission) -> Result<i64, SinkError>;
}

/// Walk `order`, resolving every selected moment to its catalog song.
/// Moments without a selection are skipped. A song id the catalog no longer
/// knows is a stale selection; an empty result is refused.
pub fn resolve_selection<'c, C>(
    selection: &Selection,
    catalog: &'c C,
    order: &[Moment],
) -> Result<Vec<(Moment, &'c Song)>, FinalizeError>
where
    C: Catalog + ?Sized,
{
    let mut resolved = Vec::with_capacity(selection.len());
    for moment in order {
        let Some(song_id) = selection.get(moment).copied() else {
            continue;
        };
        let song = catalog
            .song_by_id(song_id)
            .ok_or(FinalizeError::StaleSelection {
                moment: *moment,
                song_id,
            })?;
        resolved.push((*moment, song));
    }

    if resolved.is_empty() {
        return Err(FinalizeError::EmptySubmission);
    }
    Ok(resolved)
}

/// Project the selection plus contact details into the sink payload.
/// Entries follow `order`, not the selection's insertion history.
pub fn build_submission<C>(
    contact: ContactDetails,
    selection: &Selection,
    catalog: &C,
    order: &[Moment],
) -> Result<Submission, FinalizeError>
where
    C: Catalog + ?Sized,
{
    let entries = resolve_selection(selection, catalog, order)?
        .into_iter()
        .map(|(moment, song)| SubmissionEntry {
            moment,
            song_id: song.id,
            song_title: song.title.clone(),
        })
        .collect();
    Ok(Submission::new(contact, entries))
}

const EMAIL_PATTERN: &str = r"(?i)^[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}$";

/// Compiled once per process. `None` only if the pattern fails to build,
/// in which case every address is reported as uncheckable.
fn email_pattern() -> Option<&'static Regex> {
    static EMAIL: OnceLock<Option<Regex>> = OnceLock::new();
    EMAIL
        .get_or_init(|| match Regex::new(EMAIL_PATTERN) {
            Ok(pattern) => Some(pattern),
            Err(err) => {
                error!(%err, "email pattern failed to compile");
                None
            }
        })
        .as_ref()
}

impl ContactDetails {
    /// Field-level problems, empty when the details are usable. Both the
    /// submit form and the sink run this.
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();

        if self.couple_names.trim().is_empty() {
            errors.push(FieldError::new("coupleNames", "Couple names are required"));
        }

        let date = self.wedding_date.trim();
        if date.is_empty() {
            errors.push(FieldError::new("weddingDate", "Wedding date is required"));
        } else if NaiveDate::parse_from_str(date, "%Y-%m-%d").is_err() {
            errors.push(FieldError::new(
                "weddingDate",
                "Wedding date must look like YYYY-MM-DD",
            ));
        }

        let email = self.email.trim();
        if email.is_empty() {
            errors.push(FieldError::new("email", "Email is required"));
        } else {
            match email_pattern() {
                Some(pattern) if pattern.is_match(email) => {}
                Some(_) => errors.push(FieldError::new("email", "Invalid email address")),
                None => errors.push(FieldError::new("email", "Email could not be checked")),
            }
        }

        if self.phone.trim().is_empty() {
            errors.push(FieldError::new("phone", "Phone number is required"));
        }

        errors
    }

    /// Trimmed copy with blank notes collapsed to `None`.
    pub fn normalized(&self) -> Self {
        Self {
            couple_names: self.couple_names.trim().to_string(),
            wedding_date: self.wedding_date.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            notes: self
                .notes
                .as_deref()
                .map(str::trim)
                .filter(|notes| !notes.is_empty())
                .map(str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SongId;
    use crate::planner::catalog::SongCatalog;

    fn song(id: SongId, title: &str) -> Song {
        Song {
            id,
            title: title.to_string(),
            description: String::new(),
            lyrics: String::new(),
            audio_url: String::new(),
            suitable_moments: Moment::ALL.to_vec(),
        }
    }

    fn catalog() -> SongCatalog {
        SongCatalog::new(vec![song(1, "Ave Maria"), song(10, "Resta Qui Con Noi")])
    }

    fn contact() -> ContactDetails {
        ContactDetails {
            couple_names: "Anna & Luca".into(),
            wedding_date: "2026-06-13".into(),
            email: "anna@example.com".into(),
            phone: "+39 333 1234567".into(),
            notes: Some("Please keep the Ave Maria slow".into()),
        }
    }

    #[test]
    fn entries_follow_ceremony_order() {
        let mut selection = Selection::new();
        selection.insert(Moment::Fine, 10);
        selection.insert(Moment::Ingresso, 1);

        let submission = build_submission(contact(), &selection, &catalog(), &Moment::ALL).unwrap();

        let moments: Vec<_> = submission.song_selections().iter().map(|e| e.moment).collect();
        assert_eq!(moments, vec![Moment::Ingresso, Moment::Fine]);
        assert_eq!(submission.song_selections()[1].song_title, "Resta Qui Con Noi");
        assert_eq!(submission.contact().couple_names, "Anna & Luca");
    }

    #[test]
    fn order_argument_drives_output_order() {
        let mut selection = Selection::new();
        selection.insert(Moment::Ingresso, 1);
        selection.insert(Moment::Fine, 10);

        let reversed: Vec<Moment> = Moment::ALL.iter().rev().copied().collect();
        let submission = build_submission(contact(), &selection, &catalog(), &reversed).unwrap();

        assert_eq!(submission.song_selections()[0].moment, Moment::Fine);
    }

    #[test]
    fn empty_selection_is_refused() {
        let err = build_submission(contact(), &Selection::new(), &catalog(), &Moment::ALL)
            .unwrap_err();
        assert!(matches!(err, FinalizeError::EmptySubmission));
    }

    #[test]
    fn missing_song_is_a_stale_selection() {
        let mut selection = Selection::new();
        selection.insert(Moment::Ingresso, 1);
        selection.insert(Moment::Pace, 7);

        let err = build_submission(contact(), &selection, &catalog(), &Moment::ALL).unwrap_err();

        assert!(matches!(
            err,
            FinalizeError::StaleSelection {
                moment: Moment::Pace,
                song_id: 7
            }
        ));
    }

    #[test]
    fn valid_contact_has_no_errors() {
        assert!(contact().validate().is_empty());
    }

    #[test]
    fn contact_validation_lists_every_problem() {
        let details = ContactDetails {
            couple_names: "  ".into(),
            wedding_date: "13/06/2026".into(),
            email: "anna-at-example".into(),
            phone: String::new(),
            notes: None,
        };

        let fields: Vec<_> = details.validate().iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["coupleNames", "weddingDate", "email", "phone"]);
    }

    #[test]
    fn normalizing_drops_blank_notes() {
        let details = ContactDetails {
            couple_names: " Anna & Luca ".into(),
            notes: Some("   ".into()),
            ..contact()
        };
        let normalized = details.normalized();
        assert_eq!(normalized.couple_names, "Anna & Luca");
        assert_eq!(normalized.notes, None);
    }

    #[test]
    fn email_pattern_builds_and_screens_addresses() {
        let pattern = email_pattern().unwrap();
        for good in ["anna@example.it", "Luca.Rossi+nozze@mail.example.com"] {
            assert!(pattern.is_match(good), "{good} should pass");
        }
        for bad in ["anna@", "@example.it", "anna@example", "anna example@it.com"] {
            assert!(!pattern.is_match(bad), "{bad} should fail");
        }
    }
}
