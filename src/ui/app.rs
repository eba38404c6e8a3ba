use std::cmp::min;
use std::mem;

use anyhow::{anyhow, Result};
use crossterm::event::KeyCode;
use open::that as open_link;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Gauge, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;
use rusqlite::Connection;
use tracing::info;

use crate::config::AppConfig;
use crate::db::SubmissionStore;
use crate::models::{ContactDetails, Moment, Song, SongId};
use crate::planner::{
    finalize, guard, Catalog, FinalizeAction, FinalizeError, FinalizeOutcome, Gate,
    MomentFilter, OutputSettings, PendingConfirmation, ResetOutcome, ResetRequest, Selected,
    SelectionEngine, SinkError, SongCatalog,
};

use super::forms::{ContactField, ContactForm};
use super::helpers::{centered_rect, filter_chips, key_hints, surface_error};
use super::preview::AudioPreview;
use super::screens::{GalleryScreen, LyricsView, MomentPicker, TimelineState};

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Height allocation per song card in the gallery.
const SONG_CARD_HEIGHT: u16 = 5;
const PAGE_STEP: isize = 5;

/// Which half of the main screen receives navigation keys.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
enum Pane {
    Gallery,
    Timeline,
}

/// Fine-grained modes layered over the main screen.
enum Mode {
    Normal,
    Searching(SearchState),
    ChoosingMoment(MomentPicker),
    ViewingLyrics(LyricsView),
    ConfirmReset { selected: usize },
    ConfirmFinalize(PendingConfirmation<FinalizeAction>),
    EditingContact(ContactForm),
    Help,
}

/// State for an active inline search. `previous` is restored on Esc.
struct SearchState {
    query: String,
    previous: String,
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state shared across the TUI.
pub struct App {
    conn: Connection,
    catalog: SongCatalog,
    engine: SelectionEngine,
    config: AppConfig,
    output: OutputSettings,
    gallery: GalleryScreen,
    timeline: TimelineState,
    focus: Pane,
    contact: ContactDetails,
    mode: Mode,
    status: Option<StatusMessage>,
}

impl App {
    pub fn new(
        conn: Connection,
        catalog: SongCatalog,
        config: AppConfig,
        output: OutputSettings,
    ) -> Self {
        let gallery = GalleryScreen::new(&catalog);
        Self {
            conn,
            catalog,
            engine: SelectionEngine::new(),
            config,
            output,
            gallery,
            timeline: TimelineState::default(),
            focus: Pane::Gallery,
            contact: ContactDetails::default(),
            mode: Mode::Normal,
            status: None,
        }
    }

    pub fn engine(&self) -> &SelectionEngine {
        &self.engine
    }

    /// Process one key press. Returns `true` when the user asked to quit.
    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit)?,
            Mode::Searching(state) => self.handle_search(code, state)?,
            Mode::ChoosingMoment(picker) => self.handle_choose_moment(code, picker)?,
            Mode::ViewingLyrics(view) => self.handle_lyrics(code, view)?,
            Mode::ConfirmReset { selected } => self.handle_confirm_reset(code, selected)?,
            Mode::ConfirmFinalize(pending) => self.handle_confirm_finalize(code, pending)?,
            Mode::EditingContact(form) => self.handle_contact_form(code, form)?,
            Mode::Help => Mode::Normal,
        };

        Ok(exit)
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                *exit = true;
            }
            KeyCode::Char('?') => return Ok(Mode::Help),
            KeyCode::Left => self.focus = Pane::Gallery,
            KeyCode::Right => self.focus = Pane::Timeline,
            KeyCode::Up => self.move_focused(-1),
            KeyCode::Down => self.move_focused(1),
            KeyCode::PageUp => self.move_focused(-PAGE_STEP),
            KeyCode::PageDown => self.move_focused(PAGE_STEP),
            KeyCode::Home if self.focus == Pane::Gallery => self.gallery.select_first(),
            KeyCode::End if self.focus == Pane::Gallery => self.gallery.select_last(),
            KeyCode::Tab => {
                let filter = self.gallery.filter.next();
                self.gallery.set_filter(&self.catalog, filter);
                self.clear_status();
            }
            KeyCode::BackTab => {
                let filter = self.gallery.filter.previous();
                self.gallery.set_filter(&self.catalog, filter);
                self.clear_status();
            }
            KeyCode::Char('f') | KeyCode::Char('/') => {
                self.clear_status();
                return Ok(Mode::Searching(SearchState {
                    query: self.gallery.query.clone(),
                    previous: self.gallery.query.clone(),
                }));
            }
            KeyCode::Enter => match self.focus {
                Pane::Gallery => return Ok(self.open_moment_picker()),
                Pane::Timeline => self.focus_moment(self.timeline.current_moment()),
            },
            KeyCode::Char('l') => return Ok(self.open_lyrics()),
            KeyCode::Char('x') | KeyCode::Delete | KeyCode::Backspace => self.remove_focused(),
            KeyCode::Char('r') => return Ok(self.request_reset()),
            KeyCode::Char('d') => return self.request_finalize(FinalizeAction::Download),
            KeyCode::Char('w') => return self.request_finalize(FinalizeAction::Share),
            KeyCode::Char('s') => {
                if self.engine.is_empty() {
                    self.set_status(FinalizeError::EmptySubmission.to_string(), StatusKind::Error);
                } else {
                    self.clear_status();
                    return Ok(Mode::EditingContact(ContactForm::from_details(
                        self.contact.clone(),
                    )));
                }
            }
            _ => {}
        }
        Ok(Mode::Normal)
    }

    fn handle_search(&mut self, code: KeyCode, mut state: SearchState) -> Result<Mode> {
        match code {
            KeyCode::Esc => {
                self.gallery.set_query(&self.catalog, state.previous);
                return Ok(Mode::Normal);
            }
            KeyCode::Enter => return Ok(Mode::Normal),
            KeyCode::Up => self.gallery.move_selection(-1),
            KeyCode::Down => self.gallery.move_selection(1),
            KeyCode::Backspace => {
                state.query.pop();
                self.gallery.set_query(&self.catalog, state.query.clone());
            }
            KeyCode::Char(ch) if !ch.is_control() => {
                state.query.push(ch);
                self.gallery.set_query(&self.catalog, state.query.clone());
            }
            _ => {}
        }
        Ok(Mode::Searching(state))
    }

    fn handle_choose_moment(&mut self, code: KeyCode, mut picker: MomentPicker) -> Result<Mode> {
        match code {
            KeyCode::Esc => Ok(Mode::Normal),
            KeyCode::Up => {
                picker.move_selection(-1);
                Ok(Mode::ChoosingMoment(picker))
            }
            KeyCode::Down => {
                picker.move_selection(1);
                Ok(Mode::ChoosingMoment(picker))
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                if let Some(moment) = picker.current_moment() {
                    self.apply_choice(picker.song_id, moment);
                }
                Ok(Mode::Normal)
            }
            _ => Ok(Mode::ChoosingMoment(picker)),
        }
    }

    fn handle_lyrics(&mut self, code: KeyCode, mut view: LyricsView) -> Result<Mode> {
        match code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('l') => {
                if let Some(preview) = view.preview.take() {
                    self.note_preview_closed(&preview);
                }
                Ok(Mode::Normal)
            }
            KeyCode::Up => {
                view.scroll_by(-1);
                Ok(Mode::ViewingLyrics(view))
            }
            KeyCode::Down => {
                view.scroll_by(1);
                Ok(Mode::ViewingLyrics(view))
            }
            KeyCode::PageUp => {
                view.scroll_by(-10);
                Ok(Mode::ViewingLyrics(view))
            }
            KeyCode::PageDown => {
                view.scroll_by(10);
                Ok(Mode::ViewingLyrics(view))
            }
            KeyCode::Home => {
                view.scroll = 0;
                Ok(Mode::ViewingLyrics(view))
            }
            KeyCode::Char('p') | KeyCode::Char(' ') => {
                self.toggle_preview(&mut view);
                Ok(Mode::ViewingLyrics(view))
            }
            KeyCode::Enter => {
                let song_id = view.song_id;
                if let Some(preview) = view.preview.take() {
                    self.note_preview_closed(&preview);
                }
                match self.catalog.song_by_id(song_id) {
                    Some(song) => Ok(Mode::ChoosingMoment(MomentPicker::for_song(
                        song,
                        self.engine.moment_of(song_id),
                    ))),
                    None => Ok(Mode::Normal),
                }
            }
            _ => Ok(Mode::ViewingLyrics(view)),
        }
    }

    fn handle_confirm_reset(&mut self, code: KeyCode, selected: usize) -> Result<Mode> {
        let confirmed = match code {
            KeyCode::Char('y') | KeyCode::Char('Y') => true,
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => false,
            _ => return Ok(Mode::ConfirmReset { selected }),
        };

        match self.engine.confirm_reset(confirmed) {
            ResetOutcome::Cleared { .. } => self.set_status(
                "All your song selections have been cleared.",
                StatusKind::Info,
            ),
            ResetOutcome::Cancelled => self.set_status("Reset cancelled.", StatusKind::Info),
            ResetOutcome::NothingToReset => self.set_status(
                "You don't have any songs selected yet.",
                StatusKind::Info,
            ),
        }
        Ok(Mode::Normal)
    }

    fn handle_confirm_finalize(
        &mut self,
        code: KeyCode,
        pending: PendingConfirmation<FinalizeAction>,
    ) -> Result<Mode> {
        let confirmed = match code {
            KeyCode::Char('y') | KeyCode::Char('Y') => true,
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => false,
            _ => return Ok(Mode::ConfirmFinalize(pending)),
        };

        match pending.resolve(confirmed) {
            Some(action) => self.run_finalize(action),
            None => {
                self.set_status(
                    "Nothing was sent. Keep choosing songs whenever you're ready.",
                    StatusKind::Info,
                );
                Ok(Mode::Normal)
            }
        }
    }

    fn handle_contact_form(&mut self, code: KeyCode, mut form: ContactForm) -> Result<Mode> {
        match code {
            KeyCode::Esc => {
                self.contact = form.details;
                return Ok(Mode::Normal);
            }
            KeyCode::Tab | KeyCode::Down => form.next_field(),
            KeyCode::BackTab | KeyCode::Up => form.previous_field(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => {
                let submitted = form.submit();
                self.contact = form.details.clone();
                match submitted {
                    Some(details) => {
                        self.clear_status();
                        return self.request_finalize(FinalizeAction::Submit(details));
                    }
                    None => {
                        self.set_status("Please fix the highlighted fields.", StatusKind::Error)
                    }
                }
            }
            KeyCode::Char(ch) => {
                form.push_char(ch);
            }
            _ => {}
        }
        Ok(Mode::EditingContact(form))
    }

    /// Gate a finalize action. An empty selection is refused before any
    /// prompt; an incomplete one asks first when confirmation is enabled.
    fn request_finalize(&mut self, action: FinalizeAction) -> Result<Mode> {
        if self.engine.is_empty() {
            self.set_status(FinalizeError::EmptySubmission.to_string(), StatusKind::Error);
            return Ok(Mode::Normal);
        }

        match guard(
            action,
            self.engine.completion(),
            self.config.confirm_incomplete,
        ) {
            Gate::Proceed(action) => self.run_finalize(action),
            Gate::Confirm(pending) => Ok(Mode::ConfirmFinalize(pending)),
        }
    }

    fn run_finalize(&mut self, action: FinalizeAction) -> Result<Mode> {
        let snapshot = self.engine.snapshot();
        let result = {
            let mut store = SubmissionStore::new(&self.conn);
            finalize(action, &snapshot, &self.catalog, &mut store, &self.output)
        };

        match result {
            Ok(FinalizeOutcome::Downloaded(path)) => self.set_status(
                format!("Lyrics saved to {}.", path.display()),
                StatusKind::Info,
            ),
            Ok(FinalizeOutcome::ShareLink(link)) => match open_link(&link) {
                Ok(()) => self.set_status(
                    "Opened WhatsApp to share your selections.",
                    StatusKind::Info,
                ),
                Err(err) => self.set_status(
                    format!("Failed to open share link: {err}"),
                    StatusKind::Error,
                ),
            },
            Ok(FinalizeOutcome::Submitted(id)) => self.set_status(
                format!("Thank you! Your selections were sent to the choir (submission #{id})."),
                StatusKind::Info,
            ),
            Err(FinalizeError::Sink(SinkError::Validation(errors))) => {
                self.set_status("Please fix the highlighted fields.", StatusKind::Error);
                let mut form = ContactForm::from_details(self.contact.clone());
                form.errors = errors;
                return Ok(Mode::EditingContact(form));
            }
            Err(err) => self.set_status(err.to_string(), StatusKind::Error),
        }
        Ok(Mode::Normal)
    }

    fn apply_choice(&mut self, song_id: SongId, moment: Moment) {
        let title = self.song_title(song_id);
        match self
            .engine
            .select_song_for_moment(&self.catalog, song_id, moment)
        {
            Ok(Selected::Applied {
                moment, replaced, ..
            }) => {
                let text = match replaced.map(|previous| self.song_title(previous)) {
                    Some(previous) => format!(
                        "{title} selected for {} (replacing {previous}).",
                        moment.label()
                    ),
                    None => format!("{title} selected for {}.", moment.label()),
                };
                self.set_status(text, StatusKind::Info);
            }
            Ok(Selected::ToggledOff { moment, .. }) => self.set_status(
                format!("{title} removed from {}.", moment.label()),
                StatusKind::Info,
            ),
            Err(err) if err.is_conflict() => self.set_status(
                format!("Song Already Selected: {err}"),
                StatusKind::Error,
            ),
            Err(err) => self.set_status(err.to_string(), StatusKind::Error),
        }
    }

    fn remove_focused(&mut self) {
        let moment = match self.focus {
            Pane::Timeline => Some(self.timeline.current_moment()),
            Pane::Gallery => self
                .gallery
                .current_song_id()
                .and_then(|id| self.engine.moment_of(id)),
        };
        let Some(moment) = moment else {
            self.set_status("That song is not part of your ceremony.", StatusKind::Error);
            return;
        };

        match self.engine.remove_song_from_moment(moment) {
            Some(song_id) => {
                let title = self.song_title(song_id);
                self.set_status(
                    format!("{title} removed from {}.", moment.label()),
                    StatusKind::Info,
                );
            }
            None => self.set_status(
                format!("No song is selected for {}.", moment.label()),
                StatusKind::Info,
            ),
        }
    }

    fn request_reset(&mut self) -> Mode {
        match self.engine.request_reset() {
            ResetRequest::NothingToReset => {
                self.set_status("You don't have any songs selected yet.", StatusKind::Info);
                Mode::Normal
            }
            ResetRequest::Confirm { selected } => Mode::ConfirmReset { selected },
        }
    }

    /// Timeline callback: narrow the gallery to songs for `moment` and move
    /// focus there so the next Enter picks a song for it.
    fn focus_moment(&mut self, moment: Moment) {
        self.gallery
            .set_filter(&self.catalog, MomentFilter::Only(moment));
        self.focus = Pane::Gallery;
        info!(%moment, "gallery focused on moment");
        self.set_status(
            format!("Showing songs for {}.", moment.label()),
            StatusKind::Info,
        );
    }

    fn open_moment_picker(&mut self) -> Mode {
        let Some(song) = self
            .gallery
            .current_song_id()
            .and_then(|id| self.catalog.song_by_id(id))
        else {
            self.set_status("No song selected.", StatusKind::Error);
            return Mode::Normal;
        };
        Mode::ChoosingMoment(MomentPicker::for_song(song, self.engine.moment_of(song.id)))
    }

    fn open_lyrics(&mut self) -> Mode {
        let song_id = match self.focus {
            Pane::Gallery => self.gallery.current_song_id(),
            Pane::Timeline => self.engine.song_for(self.timeline.current_moment()),
        };
        match song_id {
            Some(song_id) => {
                self.clear_status();
                Mode::ViewingLyrics(LyricsView::new(song_id))
            }
            None => {
                self.set_status("No song to show lyrics for.", StatusKind::Error);
                Mode::Normal
            }
        }
    }

    fn toggle_preview(&mut self, view: &mut LyricsView) {
        if let Some(preview) = view.preview.take() {
            self.note_preview_closed(&preview);
            return;
        }

        let started = match self.catalog.song_by_id(view.song_id) {
            Some(song) => AudioPreview::start(&song.audio_url, self.config.audio_player.as_deref()),
            None => Err(anyhow!("Song {} is no longer in the catalog.", view.song_id)),
        };
        match started {
            Ok(preview) => {
                let text = if preview.is_managed() {
                    "Playing preview. Press p to stop."
                } else {
                    "Opened the audio preview in your default player."
                };
                view.preview = Some(preview);
                self.set_status(text, StatusKind::Info);
            }
            Err(err) => self.set_status(surface_error(&err), StatusKind::Error),
        }
    }

    fn note_preview_closed(&mut self, preview: &AudioPreview) {
        if preview.is_managed() {
            self.set_status("Preview stopped.", StatusKind::Info);
        }
    }

    fn move_focused(&mut self, offset: isize) {
        match self.focus {
            Pane::Gallery => self.gallery.move_selection(offset),
            Pane::Timeline => self.timeline.move_selection(offset),
        }
    }

    fn song_title(&self, song_id: SongId) -> String {
        self.catalog
            .song_by_id(song_id)
            .map(|song| song.title.clone())
            .unwrap_or_else(|| format!("Song {song_id}"))
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let footer_height = FOOTER_HEIGHT.min(area.height);

        let (content_area, footer_area) = if area.height > footer_height {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(footer_height)])
                .split(area);
            (chunks[0], chunks[1])
        } else {
            (area, area)
        };

        let panes = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(58), Constraint::Percentage(42)])
            .split(content_area);
        self.draw_gallery(frame, panes[0]);
        self.draw_timeline(frame, panes[1]);

        if area.height >= footer_height {
            self.draw_footer(frame, footer_area);
        }

        match &self.mode {
            Mode::Searching(state) => self.draw_search_bar(frame, area, state),
            Mode::ChoosingMoment(picker) => self.draw_moment_picker(frame, area, picker),
            Mode::ViewingLyrics(view) => self.draw_lyrics(frame, area, view),
            Mode::ConfirmReset { selected } => self.draw_confirm_reset(frame, area, *selected),
            Mode::ConfirmFinalize(pending) => self.draw_confirm_finalize(frame, area, pending),
            Mode::EditingContact(form) => self.draw_contact_form(frame, area, form),
            Mode::Help => self.draw_help(frame, area),
            Mode::Normal => {}
        }
    }

    fn pane_block(&self, title: String, pane: Pane) -> Block<'static> {
        let block = Block::default().title(title).borders(Borders::ALL);
        if self.focus == pane {
            block.border_style(Style::default().fg(Color::Yellow))
        } else {
            block
        }
    }

    fn draw_gallery(&self, frame: &mut Frame, area: Rect) {
        let songs = self.gallery.songs(&self.catalog);
        let block = self.pane_block(
            format!("Songs: {} ({})", self.gallery.filter.label(), songs.len()),
            Pane::Gallery,
        );
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .split(inner);

        frame.render_widget(
            Paragraph::new(filter_chips(self.gallery.filter)).wrap(Wrap { trim: true }),
            chunks[0],
        );

        let search_line = if self.gallery.query.is_empty() {
            Line::from(Span::styled(
                "Press f to search titles and descriptions",
                Style::default().fg(Color::DarkGray),
            ))
        } else {
            Line::from(vec![
                Span::raw("Search: "),
                Span::styled(self.gallery.query.clone(), Style::default().fg(Color::Yellow)),
            ])
        };
        frame.render_widget(Paragraph::new(search_line), chunks[1]);

        if songs.is_empty() {
            frame.render_widget(
                Paragraph::new("No songs match this filter.")
                    .style(Style::default().fg(Color::DarkGray)),
                chunks[2],
            );
        } else {
            self.render_song_cards(frame, chunks[2], &songs, self.gallery.selected);
        }
    }

    fn render_song_cards(&self, frame: &mut Frame, area: Rect, songs: &[&Song], selected: usize) {
        if songs.is_empty() || area.height == 0 {
            return;
        }

        let card_height = SONG_CARD_HEIGHT as usize;
        let capacity = ((area.height as usize) / card_height).max(1);
        let len = songs.len();
        let mut start = if selected >= capacity {
            selected + 1 - capacity
        } else {
            0
        };
        if start + capacity > len {
            start = len.saturating_sub(capacity);
        }
        let end = min(start + capacity, len);
        let visible_len = end.saturating_sub(start);
        if visible_len == 0 {
            return;
        }

        let constraints: Vec<Constraint> = (0..visible_len)
            .map(|_| Constraint::Length(SONG_CARD_HEIGHT))
            .collect();
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        for (idx, chunk) in rows.iter().enumerate() {
            let song_index = start + idx;
            if chunk.height == 0 || song_index >= len {
                continue;
            }

            let song = songs[song_index];
            let is_selected = song_index == selected;
            let mut block = Block::default().borders(Borders::ALL);
            let mut paragraph_style = Style::default();
            if is_selected {
                block = block.style(Style::default().fg(Color::Yellow));
                paragraph_style = Style::default().fg(Color::Yellow);
            }

            let title = if is_selected {
                format!("▶ {}", song.title)
            } else {
                song.title.clone()
            };
            let mut title_spans = vec![Span::styled(
                title,
                Style::default().add_modifier(Modifier::BOLD),
            )];
            if let Some(moment) = self.engine.moment_of(song.id) {
                title_spans.push(Span::styled(
                    format!("  ✓ {}", moment.label()),
                    Style::default().fg(Color::Green),
                ));
            }

            let lines = vec![
                Line::from(title_spans),
                Line::from(Span::styled(
                    song.description.clone(),
                    Style::default().fg(Color::Gray),
                )),
                Line::from(Span::styled(
                    format!("Suitable for: {}", song.moments_label()),
                    Style::default().fg(Color::Cyan),
                )),
            ];

            let paragraph = Paragraph::new(lines)
                .block(block)
                .wrap(Wrap { trim: true })
                .alignment(Alignment::Left)
                .style(paragraph_style);

            frame.render_widget(paragraph, *chunk);
        }
    }

    fn draw_timeline(&self, frame: &mut Frame, area: Rect) {
        let block = self.pane_block("Ceremony".to_string(), Pane::Timeline);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .split(inner);

        let completion = self.engine.completion();
        let gauge_color = if completion.is_complete {
            Color::Green
        } else {
            Color::Cyan
        };
        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(gauge_color).bg(Color::Black))
            .percent(u16::from(completion.percent))
            .label(completion.summary());
        frame.render_widget(gauge, chunks[0]);

        let items: Vec<ListItem> = Moment::ALL
            .iter()
            .map(|moment| {
                let heading = Line::from(vec![
                    Span::styled(
                        format!("{}. {}", moment.position(), moment.label()),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(
                        format!("  {}", moment.gloss()),
                        Style::default().fg(Color::DarkGray),
                    ),
                ]);
                let song_line = match self
                    .engine
                    .song_for(*moment)
                    .and_then(|id| self.catalog.song_by_id(id))
                {
                    Some(song) => Line::from(Span::styled(
                        format!("   ♪ {}", song.title),
                        Style::default().fg(Color::Green),
                    )),
                    None => Line::from(Span::styled(
                        "   no song yet",
                        Style::default().fg(Color::DarkGray),
                    )),
                };
                ListItem::new(vec![heading, song_line])
            })
            .collect();

        let mut list = List::new(items);
        let mut state = ListState::default();
        if self.focus == Pane::Timeline {
            list = list
                .highlight_style(Style::default().fg(Color::Yellow))
                .highlight_symbol("▶ ");
            state.select(Some(self.timeline.selected));
        }
        frame.render_stateful_widget(list, chunks[2], &mut state);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let instructions = self.footer_instructions();

        let paragraph = Paragraph::new(vec![status_line, instructions]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        match (&self.mode, self.focus) {
            (Mode::Searching(_), _) => key_hints(&[
                ("[Type]", "Filter"),
                ("[↑↓]", "Select"),
                ("[Enter]", "Keep"),
                ("[Esc]", "Cancel"),
            ]),
            (Mode::ChoosingMoment(_), _) => key_hints(&[
                ("[↑↓]", "Moment"),
                ("[Enter]", "Select / Remove"),
                ("[Esc]", "Cancel"),
            ]),
            (Mode::ViewingLyrics(_), _) => key_hints(&[
                ("[↑↓]", "Scroll"),
                ("[p]", "Preview"),
                ("[Enter]", "Choose Moment"),
                ("[Esc]", "Close"),
            ]),
            (Mode::ConfirmReset { .. }, _) | (Mode::ConfirmFinalize(_), _) => {
                key_hints(&[("[y]", "Confirm"), ("[n/Esc]", "Cancel")])
            }
            (Mode::EditingContact(_), _) => key_hints(&[
                ("[Tab]", "Next Field"),
                ("[Enter]", "Send"),
                ("[Esc]", "Back"),
            ]),
            (Mode::Help, _) => key_hints(&[("[any key]", "Close")]),
            (Mode::Normal, Pane::Timeline) => key_hints(&[
                ("[↑↓]", "Moment"),
                ("[Enter]", "Show Songs"),
                ("[x]", "Remove"),
                ("[l]", "Lyrics"),
                ("[←]", "Songs"),
                ("[d/w/s]", "Download/Share/Send"),
                ("[?]", "Help"),
                ("[q]", "Quit"),
            ]),
            (Mode::Normal, Pane::Gallery) => key_hints(&[
                ("[↑↓]", "Select"),
                ("[Enter]", "Choose Moment"),
                ("[Tab]", "Filter"),
                ("[f]", "Search"),
                ("[l]", "Lyrics"),
                ("[→]", "Ceremony"),
                ("[r]", "Reset"),
                ("[?]", "Help"),
                ("[q]", "Quit"),
            ]),
        }
    }

    fn draw_search_bar(&self, frame: &mut Frame, area: Rect, state: &SearchState) {
        let height = 3u16.min(area.height);
        let popup_area = Rect {
            x: area.x,
            y: area.y,
            width: area.width,
            height,
        };
        frame.render_widget(Clear, popup_area);

        let block = Block::default().borders(Borders::ALL).title("Search");
        let paragraph = Paragraph::new(Span::raw(format!("Search: {}", state.query)))
            .block(block.clone())
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, popup_area);

        let inner = block.inner(popup_area);
        let cursor_x = inner.x + "Search: ".len() as u16 + state.query.chars().count() as u16;
        frame.set_cursor_position((cursor_x, inner.y));
    }

    fn draw_moment_picker(&self, frame: &mut Frame, area: Rect, picker: &MomentPicker) {
        let popup_area = centered_rect(50, 50, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(format!("Choose a moment for {}", picker.title))
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines = Vec::with_capacity(picker.moments.len() + 2);
        for (idx, moment) in picker.moments.iter().enumerate() {
            let is_selected = idx == picker.selected;
            let marker = if is_selected { "▶ " } else { "  " };
            let label_style = if is_selected {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let mut spans = vec![Span::styled(
                format!("{marker}{} ({})", moment.label(), moment.gloss()),
                label_style,
            )];
            match self.engine.song_for(*moment) {
                Some(id) if id == picker.song_id => spans.push(Span::styled(
                    "  ✓ selected",
                    Style::default().fg(Color::Green),
                )),
                Some(id) => spans.push(Span::styled(
                    format!("  currently {}", self.song_title(id)),
                    Style::default().fg(Color::DarkGray),
                )),
                None => {}
            }
            lines.push(Line::from(spans));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Enter selects (or removes a current choice). Esc cancels.",
            Style::default().fg(Color::Gray),
        )));

        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
    }

    fn draw_lyrics(&self, frame: &mut Frame, area: Rect, view: &LyricsView) {
        let popup_area = centered_rect(80, 80, area);
        frame.render_widget(Clear, popup_area);

        let Some(song) = self.catalog.song_by_id(view.song_id) else {
            return;
        };

        let block = Block::default()
            .title(format!("{} Lyrics", song.title))
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0)])
            .split(inner);

        let preview_line = match &view.preview {
            Some(preview) if preview.is_managed() => Line::from(Span::styled(
                format!("♪ Playing {}", preview.url()),
                Style::default().fg(Color::Green),
            )),
            Some(preview) => Line::from(Span::styled(
                format!("♪ Opened {}", preview.url()),
                Style::default().fg(Color::Green),
            )),
            None => Line::from(Span::styled(
                "Press p to preview the audio.",
                Style::default().fg(Color::DarkGray),
            )),
        };

        let header = vec![
            Line::from(Span::styled(
                song.description.clone(),
                Style::default()
                    .fg(Color::Gray)
                    .add_modifier(Modifier::ITALIC),
            )),
            Line::from(Span::styled(
                format!("Suitable for: {}", song.moments_label()),
                Style::default().fg(Color::Cyan),
            )),
            preview_line,
        ];
        frame.render_widget(Paragraph::new(header).wrap(Wrap { trim: true }), chunks[0]);

        let lyrics = Paragraph::new(song.lyrics.clone())
            .wrap(Wrap { trim: false })
            .scroll((view.scroll, 0));
        frame.render_widget(lyrics, chunks[1]);
    }

    fn draw_confirm_reset(&self, frame: &mut Frame, area: Rect, selected: usize) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title("Reset Selections")
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let lines = vec![
            Line::from("Are you sure you want to reset all your song selections?"),
            Line::from(format!(
                "{selected} of {} moments currently have a song.",
                Moment::ALL.len()
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Press Y to confirm or N / Esc to cancel.",
                Style::default().fg(Color::Gray),
            )),
        ];

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn draw_confirm_finalize(
        &self,
        frame: &mut Frame,
        area: Rect,
        pending: &PendingConfirmation<FinalizeAction>,
    ) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(pending.action().label())
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let lines = vec![
            Line::from("Incomplete Selections"),
            Line::from(pending.prompt()),
            Line::from(""),
            Line::from(Span::styled(
                "Press Y to confirm or N / Esc to cancel.",
                Style::default().fg(Color::Gray),
            )),
        ];

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn draw_contact_form(&self, frame: &mut Frame, area: Rect, form: &ContactForm) {
        let popup_area = centered_rect(70, 50, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title("Send to Choir")
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines: Vec<Line> = ContactField::ALL
            .iter()
            .map(|field| form.build_line(*field))
            .collect();
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!(
                "{} moment(s) selected. Tab moves between fields, Enter sends.",
                self.engine.selected_count()
            ),
            Style::default().fg(Color::Gray),
        )));
        frame.render_widget(Paragraph::new(lines), inner);

        let row = ContactField::ALL
            .iter()
            .position(|field| *field == form.active)
            .unwrap_or(0) as u16;
        let cursor_x = (inner.x + form.cursor_offset()).min(inner.right().saturating_sub(1));
        frame.set_cursor_position((cursor_x, inner.y + row));
    }

    fn draw_help(&self, frame: &mut Frame, area: Rect) {
        let popup_area = centered_rect(60, 70, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title("Help").borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let entries = [
            ("←/→", "Switch between songs and the ceremony timeline"),
            ("↑/↓", "Move within the focused pane"),
            ("Enter", "Choose a moment for a song, or show songs for a moment"),
            ("Tab", "Cycle the moment filter"),
            ("f", "Search song titles and descriptions"),
            ("l", "Read lyrics and preview audio"),
            ("x", "Remove the song from its moment"),
            ("r", "Reset all selections"),
            ("d", "Download a lyrics sheet"),
            ("w", "Share your selections via WhatsApp"),
            ("s", "Send your selections to the choir"),
            ("q", "Quit"),
        ];
        let mut lines = vec![
            Line::from("Choose one song for each moment of the ceremony. Each song can only be used once."),
            Line::from(""),
        ];
        lines.extend(entries.iter().map(|(key, text)| {
            Line::from(vec![
                Span::styled(format!("{key:<7}"), key_style),
                Span::raw(*text),
            ])
        }));

        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);
    }
}
