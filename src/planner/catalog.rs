use crate::models::{Moment, Song, SongId};

/// Read-only song lookup used by the planner. The terminal front-end backs it
/// with `SongCatalog`; tests can provide their own.
pub trait Catalog {
    fn all_songs(&self) -> &[Song];

    fn song_by_id(&self, id: SongId) -> Option<&Song> {
        self.all_songs().iter().find(|song| song.id == id)
    }
}

/// Which moment the gallery is narrowed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MomentFilter {
    #[default]
    All,
    Only(Moment),
}

impl MomentFilter {
    /// Cycle All → Ingresso → ... → Fine → All.
    pub fn next(self) -> Self {
        match self {
            MomentFilter::All => MomentFilter::Only(Moment::ALL[0]),
            MomentFilter::Only(moment) => match Moment::ALL.get(moment.position()) {
                Some(next) => MomentFilter::Only(*next),
                None => MomentFilter::All,
            },
        }
    }

    pub fn previous(self) -> Self {
        match self {
            MomentFilter::All => MomentFilter::Only(Moment::ALL[Moment::ALL.len() - 1]),
            MomentFilter::Only(moment) if moment.position() == 1 => MomentFilter::All,
            MomentFilter::Only(moment) => MomentFilter::Only(Moment::ALL[moment.position() - 2]),
        }
    }

    pub fn label(self) -> String {
        match self {
            MomentFilter::All => "All Songs".to_string(),
            MomentFilter::Only(moment) => moment.label(),
        }
    }

    fn admits(self, song: &Song) -> bool {
        match self {
            MomentFilter::All => true,
            MomentFilter::Only(moment) => song.suits(moment),
        }
    }
}

/// In-memory catalog loaded once at start-up. Songs keep the order they were
/// loaded in (ascending id from the database).
#[derive(Debug, Clone, Default)]
pub struct SongCatalog {
    songs: Vec<Song>,
}

impl SongCatalog {
    pub fn new(songs: Vec<Song>) -> Self {
        Self { songs }
    }

    pub fn len(&self) -> usize {
        self.songs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    /// Songs matching both the moment filter and a case-insensitive search on
    /// title or description. A blank query matches everything.
    pub fn browse(&self, filter: MomentFilter, query: &str) -> Vec<&Song> {
        let needle = query.trim().to_lowercase();
        self.songs
            .iter()
            .filter(|song| filter.admits(song))
            .filter(|song| {
                needle.is_empty()
                    || song.title.to_lowercase().contains(&needle)
                    || song.description.to_lowercase().contains(&needle)
            })
            .collect()
    }
}

impl Catalog for SongCatalog {
    fn all_songs(&self) -> &[Song] {
        &self.songs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn song(id: SongId, title: &str, description: &str, moments: &[Moment]) -> Song {
        Song {
            id,
            title: title.to_string(),
            description: description.to_string(),
            lyrics: String::new(),
            audio_url: String::new(),
            suitable_moments: moments.to_vec(),
        }
    }

    fn catalog() -> SongCatalog {
        SongCatalog::new(vec![
            song(1, "Ave Maria", "A classic hymn", &[Moment::Ingresso, Moment::Inizio]),
            song(2, "Pace a Te", "Gentle hymn about peace", &[Moment::Pace]),
            song(3, "Magnificat", "Canticle of praise", &[Moment::Ringraziamento, Moment::Fine]),
        ])
    }

    #[test]
    fn lookup_by_id() {
        let catalog = catalog();
        assert_eq!(catalog.song_by_id(2).map(|s| s.title.as_str()), Some("Pace a Te"));
        assert!(catalog.song_by_id(42).is_none());
    }

    #[test]
    fn browse_filters_by_moment_and_query() {
        let catalog = catalog();
        let ids = |songs: Vec<&Song>| songs.iter().map(|s| s.id).collect::<Vec<_>>();

        assert_eq!(ids(catalog.browse(MomentFilter::All, "")), vec![1, 2, 3]);
        assert_eq!(ids(catalog.browse(MomentFilter::Only(Moment::Fine), "")), vec![3]);
        assert_eq!(ids(catalog.browse(MomentFilter::All, "PEACE")), vec![2]);
        assert!(catalog.browse(MomentFilter::Only(Moment::Pace), "maria").is_empty());
    }

    #[test]
    fn filter_cycles_through_every_moment() {
        let mut filter = MomentFilter::All;
        for moment in Moment::ALL {
            filter = filter.next();
            assert_eq!(filter, MomentFilter::Only(moment));
        }
        assert_eq!(filter.next(), MomentFilter::All);
        assert_eq!(MomentFilter::All.previous(), MomentFilter::Only(Moment::Fine));
        assert_eq!(MomentFilter::Only(Moment::Ingresso).previous(), MomentFilter::All);
        assert_eq!(
            MomentFilter::Only(Moment::Santo).previous(),
            MomentFilter::Only(Moment::Offertorio)
        );
    }
}
