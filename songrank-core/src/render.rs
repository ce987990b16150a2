use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
};

use crate::{
    AppStateError, Logic, Notice, PlaybackState,
    pagination::{PaginationView, page_range},
    util::format_duration,
};

/// Everything a front end needs to draw the page.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewSnapshot {
    /// The rows of the current page.
    pub rows: Vec<SongRow>,
    /// Set once songs have loaded and the filters matched nothing.
    pub no_results: bool,
    pub has_loaded: bool,
    /// Length of the filtered list.
    pub total_songs: usize,
    pub pagination: Option<PaginationView>,
    pub now_playing: Option<NowPlaying>,
    pub filters: FilterView,
    pub notice: Option<Notice>,
    pub error: Option<AppStateError>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SongRow {
    /// 1-based rank shown to the user.
    pub rank: usize,
    /// The index that play and details actions take for this row.
    ///
    /// Songs sharing a title share the rank and index of the first of them,
    /// so playing a later duplicate plays the first one.
    pub index: usize,
    pub title: String,
    pub singer: String,
    pub score: f64,
    /// The whole-number score band, for styling.
    pub score_class: Option<i64>,
    pub is_top3: bool,
    pub is_current: bool,
    pub free: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NowPlaying {
    pub index: usize,
    pub title: String,
    /// The full singer field, members included.
    pub singer: String,
    pub state: PlaybackState,
    /// Waiting for the output to confirm a play request.
    pub is_loading: bool,
    pub position: Duration,
    pub duration: Option<Duration>,
    pub position_text: String,
    pub duration_text: String,
    /// Progress through the song, 0 to 100.
    pub percent: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterView {
    pub singer: Option<String>,
    pub score: Option<String>,
}

/// Receives a fresh [`ViewSnapshot`] after every state change.
pub trait Renderer {
    fn render(&mut self, view: &ViewSnapshot);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;
impl Renderer for NullRenderer {
    fn render(&mut self, _view: &ViewSnapshot) {}
}

/// Keeps every snapshot it is given. Clones share the same record.
#[derive(Debug, Default, Clone)]
pub struct RecordingRenderer(Arc<Mutex<Vec<ViewSnapshot>>>);
impl RecordingRenderer {
    pub fn count(&self) -> usize {
        self.lock().len()
    }

    pub fn last(&self) -> Option<ViewSnapshot> {
        self.lock().last().cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<ViewSnapshot>> {
        self.0.lock().unwrap_or_else(|e| e.into_inner())
    }
}
impl Renderer for RecordingRenderer {
    fn render(&mut self, view: &ViewSnapshot) {
        self.lock().push(view.clone());
    }
}

impl Logic {
    pub fn snapshot(&self) -> ViewSnapshot {
        let songs = self.library.songs();
        let current = self.playback.index();

        let mut first_by_title: HashMap<&str, usize> = HashMap::new();
        for (position, &song_index) in self.filtered.iter().enumerate() {
            first_by_title
                .entry(songs[song_index].title.as_str())
                .or_insert(position);
        }

        let rows = page_range(self.filtered.len(), self.current_page)
            .map(|position| {
                let song = &songs[self.filtered[position]];
                let index = first_by_title
                    .get(song.title.as_str())
                    .copied()
                    .unwrap_or(position);
                SongRow {
                    rank: index + 1,
                    index,
                    title: song.title.clone(),
                    singer: song.primary_singer().to_string(),
                    score: song.score,
                    score_class: song.score_class(),
                    is_top3: index < 3,
                    is_current: current == Some(index),
                    free: song.free,
                }
            })
            .collect();

        let now_playing = current
            .and_then(|index| Some((index, songs.get(*self.filtered.get(index)?)?)))
            .map(|(index, song)| {
                let position = self.progress.position;
                let duration = self.progress.duration;
                let percent = match duration {
                    Some(d) if !d.is_zero() => {
                        (position.as_secs_f64() / d.as_secs_f64() * 100.0).clamp(0.0, 100.0)
                    }
                    _ => 0.0,
                };
                NowPlaying {
                    index,
                    title: song.title.clone(),
                    singer: song.singer.clone(),
                    state: self.playback,
                    is_loading: self.awaiting_start,
                    position,
                    duration,
                    position_text: format_duration(position),
                    duration_text: duration.map(format_duration).unwrap_or_else(|| "0:00".into()),
                    percent,
                }
            });

        ViewSnapshot {
            rows,
            no_results: self.has_loaded && self.filtered.is_empty(),
            has_loaded: self.has_loaded,
            total_songs: self.filtered.len(),
            pagination: PaginationView::new(self.current_page, self.filtered.len()),
            now_playing,
            filters: FilterView {
                singer: self.filter.singer.clone(),
                score: self.filter.score.as_ref().map(|b| b.label().to_string()),
            },
            notice: self.notice.clone(),
            error: self.error.clone(),
        }
    }

    pub(crate) fn render(&mut self) {
        let view = self.snapshot();
        self.renderer.render(&view);
    }
}
