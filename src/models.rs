//! Domain models shared by the planner core, the SQLite layer, and the TUI.
//! These types stay light-weight data holders; the rules about how songs map
//! to ceremony moments live in `planner`, not here.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Numeric identifier of a catalog song. Mirrors the SQLite primary key.
pub type SongId = i64;

/// One of the nine stages of the wedding mass that can receive a song. The
/// declaration order is the ceremony order; `Ord` follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Moment {
    Ingresso,
    Inizio,
    Alleluia,
    Offertorio,
    Santo,
    Pace,
    Comunione,
    Ringraziamento,
    Fine,
}

impl Moment {
    /// Every moment, in the order the ceremony runs through them.
    pub const ALL: [Moment; 9] = [
        Moment::Ingresso,
        Moment::Inizio,
        Moment::Alleluia,
        Moment::Offertorio,
        Moment::Santo,
        Moment::Pace,
        Moment::Comunione,
        Moment::Ringraziamento,
        Moment::Fine,
    ];

    /// Stable identifier used on the wire and in the database.
    pub fn as_str(self) -> &'static str {
        match self {
            Moment::Ingresso => "ingresso",
            Moment::Inizio => "inizio",
            Moment::Alleluia => "alleluia",
            Moment::Offertorio => "offertorio",
            Moment::Santo => "santo",
            Moment::Pace => "pace",
            Moment::Comunione => "comunione",
            Moment::Ringraziamento => "ringraziamento",
            Moment::Fine => "fine",
        }
    }

    /// Capitalized name shown to the couple ("Ingresso").
    pub fn label(self) -> String {
        let name = self.as_str();
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    /// Short English gloss for the stage, used as a subtitle in the timeline.
    pub fn gloss(self) -> &'static str {
        match self {
            Moment::Ingresso => "entrance",
            Moment::Inizio => "beginning",
            Moment::Alleluia => "before the gospel",
            Moment::Offertorio => "offertory",
            Moment::Santo => "sanctus",
            Moment::Pace => "sign of peace",
            Moment::Comunione => "communion",
            Moment::Ringraziamento => "thanksgiving",
            Moment::Fine => "end",
        }
    }

    /// One-based position in the ceremony.
    pub fn position(self) -> usize {
        self as usize + 1
    }
}

impl fmt::Display for Moment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string does not name one of the nine moments.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown ceremony moment '{0}'")]
pub struct UnknownMoment(pub String);

impl FromStr for Moment {
    type Err = UnknownMoment;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let needle = value.trim().to_lowercase();
        Moment::ALL
            .into_iter()
            .find(|moment| moment.as_str() == needle)
            .ok_or_else(|| UnknownMoment(value.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// A catalog song. Songs are owned by the catalog and never mutated once
/// loaded.
pub struct Song {
    /// Primary key from the SQLite store.
    pub id: SongId,
    /// Title displayed in lists, the timeline, and every finalize output.
    pub title: String,
    /// One or two sentences describing when the song fits best.
    pub description: String,
    /// Full lyrics, newline separated.
    pub lyrics: String,
    /// Where the preview recording lives (URL or local path).
    pub audio_url: String,
    /// Moments this song may be chosen for. Never empty for a loaded song.
    pub suitable_moments: Vec<Moment>,
}

impl Song {
    /// Whether the song may be assigned to `moment`.
    pub fn suits(&self, moment: Moment) -> bool {
        self.suitable_moments.contains(&moment)
    }

    /// Comma separated moment labels, e.g. `Ingresso, Inizio`.
    pub fn moments_label(&self) -> String {
        self.suitable_moments
            .iter()
            .map(|moment| moment.label())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// How the choir can reach the couple. Collected by the submit form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactDetails {
    pub couple_names: String,
    /// ISO date (`YYYY-MM-DD`).
    pub wedding_date: String,
    pub email: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A single moment/song pair inside a submission payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionEntry {
    pub moment: Moment,
    pub song_id: SongId,
    pub song_title: String,
}

/// The payload handed to the submission sink. Built once at finalize time
/// and never mutated afterwards; fields are private so the only way to get
/// one is through `planner::build_submission`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    #[serde(flatten)]
    contact: ContactDetails,
    song_selections: Vec<SubmissionEntry>,
}

impl Submission {
    pub(crate) fn new(contact: ContactDetails, song_selections: Vec<SubmissionEntry>) -> Self {
        Self {
            contact,
            song_selections,
        }
    }

    pub fn contact(&self) -> &ContactDetails {
        &self.contact
    }

    /// Selections in ceremony order.
    pub fn song_selections(&self) -> &[SubmissionEntry] {
        &self.song_selections
    }

    /// JSON wire form (`coupleNames`, `weddingDate`, ..., `songSelections`).
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moments_parse_case_insensitively() {
        assert_eq!("Santo".parse::<Moment>().unwrap(), Moment::Santo);
        assert_eq!(" fine ".parse::<Moment>().unwrap(), Moment::Fine);
        assert!("gloria".parse::<Moment>().is_err());
    }

    #[test]
    fn moment_order_matches_ceremony() {
        assert_eq!(Moment::ALL.len(), 9);
        assert_eq!(Moment::ALL[0], Moment::Ingresso);
        assert_eq!(Moment::ALL[8], Moment::Fine);
        assert!(Moment::Ingresso < Moment::Fine);
        assert_eq!(Moment::Santo.position(), 5);
    }

    #[test]
    fn labels_are_capitalized() {
        assert_eq!(Moment::Ringraziamento.label(), "Ringraziamento");
    }

    #[test]
    fn submission_serializes_with_wire_keys() {
        let submission = Submission::new(
            ContactDetails {
                couple_names: "Anna & Luca".into(),
                wedding_date: "2026-06-13".into(),
                email: "anna@example.com".into(),
                phone: "+39 333 000".into(),
                notes: None,
            },
            vec![SubmissionEntry {
                moment: Moment::Ingresso,
                song_id: 1,
                song_title: "Ave Maria".into(),
            }],
        );

        let value: serde_json::Value =
            serde_json::from_str(&submission.to_json().unwrap()).unwrap();
        assert_eq!(value["coupleNames"], "Anna & Luca");
        assert_eq!(value["weddingDate"], "2026-06-13");
        assert!(value.get("notes").is_none());
        assert_eq!(value["songSelections"][0]["moment"], "ingresso");
        assert_eq!(value["songSelections"][0]["songId"], 1);
        assert_eq!(value["songSelections"][0]["songTitle"], "Ave Maria");
    }
}
