use crate::models::{Moment, Song, SongId};
use crate::planner::{Catalog, MomentFilter, SongCatalog};

use super::preview::AudioPreview;

/// Browsable song list: the catalog narrowed by moment filter and search.
pub(crate) struct GalleryScreen {
    pub(crate) filter: MomentFilter,
    pub(crate) query: String,
    pub(crate) visible: Vec<SongId>,
    pub(crate) selected: usize,
}

impl GalleryScreen {
    pub(crate) fn new(catalog: &SongCatalog) -> Self {
        let mut screen = Self {
            filter: MomentFilter::All,
            query: String::new(),
            visible: Vec::new(),
            selected: 0,
        };
        screen.refresh(catalog);
        screen
    }

    /// Recompute the visible ids, keeping the highlighted song when it
    /// survives the new filter.
    pub(crate) fn refresh(&mut self, catalog: &SongCatalog) {
        let focused = self.current_song_id();
        self.visible = catalog
            .browse(self.filter, &self.query)
            .into_iter()
            .map(|song| song.id)
            .collect();
        self.selected = focused
            .and_then(|id| self.visible.iter().position(|visible| *visible == id))
            .unwrap_or(0);
    }

    pub(crate) fn set_filter(&mut self, catalog: &SongCatalog, filter: MomentFilter) {
        self.filter = filter;
        self.refresh(catalog);
    }

    pub(crate) fn set_query(&mut self, catalog: &SongCatalog, query: String) {
        self.query = query;
        self.refresh(catalog);
    }

    pub(crate) fn current_song_id(&self) -> Option<SongId> {
        self.visible.get(self.selected).copied()
    }

    pub(crate) fn songs<'c>(&self, catalog: &'c SongCatalog) -> Vec<&'c Song> {
        self.visible
            .iter()
            .filter_map(|id| catalog.song_by_id(*id))
            .collect()
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        if self.visible.is_empty() {
            return;
        }
        let last = self.visible.len() as isize - 1;
        self.selected = (self.selected as isize + offset).clamp(0, last) as usize;
    }

    pub(crate) fn select_first(&mut self) {
        self.selected = 0;
    }

    pub(crate) fn select_last(&mut self) {
        self.selected = self.visible.len().saturating_sub(1);
    }
}

/// Cursor over the nine ceremony moments.
#[derive(Default)]
pub(crate) struct TimelineState {
    pub(crate) selected: usize,
}

impl TimelineState {
    pub(crate) fn current_moment(&self) -> Moment {
        Moment::ALL[self.selected.min(Moment::ALL.len() - 1)]
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        let last = Moment::ALL.len() as isize - 1;
        self.selected = (self.selected as isize + offset).clamp(0, last) as usize;
    }
}

/// Choosing which of a song's suitable moments it should fill.
pub(crate) struct MomentPicker {
    pub(crate) song_id: SongId,
    pub(crate) title: String,
    pub(crate) moments: Vec<Moment>,
    pub(crate) selected: usize,
}

impl MomentPicker {
    /// Start on the moment the song already fills, if any.
    pub(crate) fn for_song(song: &Song, current: Option<Moment>) -> Self {
        let selected = current
            .and_then(|moment| song.suitable_moments.iter().position(|m| *m == moment))
            .unwrap_or(0);
        Self {
            song_id: song.id,
            title: song.title.clone(),
            moments: song.suitable_moments.clone(),
            selected,
        }
    }

    pub(crate) fn current_moment(&self) -> Option<Moment> {
        self.moments.get(self.selected).copied()
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        if self.moments.is_empty() {
            return;
        }
        let last = self.moments.len() as isize - 1;
        self.selected = (self.selected as isize + offset).clamp(0, last) as usize;
    }
}

/// Lyrics overlay for one song. Dropping the view drops the preview with it.
pub(crate) struct LyricsView {
    pub(crate) song_id: SongId,
    pub(crate) scroll: u16,
    pub(crate) preview: Option<AudioPreview>,
}

impl LyricsView {
    pub(crate) fn new(song_id: SongId) -> Self {
        Self {
            song_id,
            scroll: 0,
            preview: None,
        }
    }

    pub(crate) fn scroll_by(&mut self, offset: i32) {
        self.scroll = (self.scroll as i32 + offset).clamp(0, u16::MAX as i32) as u16;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn song(id: SongId, title: &str, moments: &[Moment]) -> Song {
        Song {
            id,
            title: title.to_string(),
            description: String::new(),
            lyrics: String::new(),
            audio_url: String::new(),
            suitable_moments: moments.to_vec(),
        }
    }

    fn catalog() -> SongCatalog {
        SongCatalog::new(vec![
            song(1, "Ave Maria", &[Moment::Ingresso, Moment::Inizio]),
            song(2, "Alleluia", &[Moment::Alleluia]),
            song(3, "Pace a Te", &[Moment::Pace, Moment::Fine]),
        ])
    }

    #[test]
    fn filter_keeps_highlight_when_song_survives() {
        let catalog = catalog();
        let mut gallery = GalleryScreen::new(&catalog);
        gallery.move_selection(2);
        assert_eq!(gallery.current_song_id(), Some(3));

        gallery.set_filter(&catalog, MomentFilter::Only(Moment::Fine));
        assert_eq!(gallery.visible, vec![3]);
        assert_eq!(gallery.current_song_id(), Some(3));

        gallery.set_filter(&catalog, MomentFilter::Only(Moment::Alleluia));
        assert_eq!(gallery.current_song_id(), Some(2));
    }

    #[test]
    fn empty_search_result_has_no_current_song() {
        let catalog = catalog();
        let mut gallery = GalleryScreen::new(&catalog);
        gallery.set_query(&catalog, "requiem".into());
        assert!(gallery.visible.is_empty());
        assert_eq!(gallery.current_song_id(), None);
        gallery.move_selection(1);
        assert_eq!(gallery.selected, 0);
    }

    #[test]
    fn picker_starts_on_current_assignment() {
        let catalog = catalog();
        let picker = MomentPicker::for_song(catalog.song_by_id(3).unwrap(), Some(Moment::Fine));
        assert_eq!(picker.current_moment(), Some(Moment::Fine));
    }

    #[test]
    fn timeline_cursor_is_clamped() {
        let mut timeline = TimelineState::default();
        timeline.move_selection(-3);
        assert_eq!(timeline.current_moment(), Moment::Ingresso);
        timeline.move_selection(20);
        assert_eq!(timeline.current_moment(), Moment::Fine);
    }
}
