use std::{
    sync::{Arc, mpsc},
    time::Duration,
};

use songrank_state::{ScoreBucket, Song};

use crate::{
    AppStateError, DataSource, Library, LoadError, Notice, PlaybackState, Renderer, SongFilter,
    TokioThread,
    clock::Clock,
    output::{AudioOutput, OutputEvent},
    pagination::total_pages,
    timer::{Interval, Timeout},
};

/// Drives the ranking page: filters, pages and the player.
///
/// All state lives here and is only changed from the owning thread. Call
/// [`Logic::update`] regularly so that loads, output events and timers are
/// picked up.
pub struct Logic {
    _tokio_thread: Option<TokioThread>,
    library_rx: Option<mpsc::Receiver<Result<Library, LoadError>>>,

    pub(crate) library: Library,
    pub(crate) has_loaded: bool,
    pub(crate) filter: SongFilter,
    pub(crate) filtered: Vec<usize>,
    pub(crate) current_page: usize,

    pub(crate) playback: PlaybackState,
    pub(crate) awaiting_start: bool,
    pub(crate) progress: Progress,
    pub(crate) notice: Option<Notice>,
    pub(crate) error: Option<AppStateError>,

    output: Box<dyn AudioOutput>,
    pub(crate) renderer: Box<dyn Renderer>,
    clock: Arc<dyn Clock>,
    settings: PlayerSettings,
    auto_stop: Timeout,
    progress_poll: Interval,
    draining_output: bool,
}

pub struct LogicArgs {
    /// Loaded in the background if set; otherwise songs come from
    /// [`Logic::populate`].
    pub source: Option<DataSource>,
    pub output: Box<dyn AudioOutput>,
    pub renderer: Box<dyn Renderer>,
    pub clock: Arc<dyn Clock>,
    pub settings: PlayerSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerSettings {
    /// How long a song may play before it is paused automatically.
    pub max_listen: Duration,
    /// How often the playback position is refreshed while playing.
    pub progress_interval: Duration,
}
impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            max_listen: Duration::from_secs(9999),
            progress_interval: Duration::from_millis(500),
        }
    }
}

/// The last known playback position.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub position: Duration,
    pub duration: Option<Duration>,
}

impl Logic {
    pub fn new(args: LogicArgs) -> std::io::Result<Self> {
        let LogicArgs {
            source,
            output,
            renderer,
            clock,
            settings,
        } = args;

        let mut tokio_thread = None;
        let mut library_rx = None;
        if let Some(source) = source {
            let thread = TokioThread::new()?;
            let (tx, rx) = mpsc::channel();
            tracing::info!("Loading songs from {source}");
            thread.spawn(async move {
                let result = source.load().await;
                if tx.send(result).is_err() {
                    tracing::warn!("Song list loaded after shutdown");
                }
            });
            tokio_thread = Some(thread);
            library_rx = Some(rx);
        }

        let mut logic = Self {
            _tokio_thread: tokio_thread,
            library_rx,

            library: Library::default(),
            has_loaded: false,
            filter: SongFilter::default(),
            filtered: vec![],
            current_page: 1,

            playback: PlaybackState::Idle,
            awaiting_start: false,
            progress: Progress::default(),
            notice: None,
            error: None,

            output,
            renderer,
            clock,
            progress_poll: Interval::new(settings.progress_interval),
            settings,
            auto_stop: Timeout::default(),
            draining_output: false,
        };
        logic.render();
        Ok(logic)
    }

    /// Picks up finished loads, output events and due timers.
    pub fn update(&mut self) {
        self.receive_library();
        self.process_output_events();

        let now = self.clock.now();
        if self.auto_stop.take_if_due(now) {
            tracing::info!("Listened for {:?}; pausing", self.settings.max_listen);
            self.pause();
        }
        if self.progress_poll.take_if_due(now) {
            self.poll_progress();
        }
    }

    fn receive_library(&mut self) {
        let Some(rx) = &self.library_rx else {
            return;
        };
        let result = match rx.try_recv() {
            Ok(result) => result.map_err(|e| e.to_string()),
            Err(mpsc::TryRecvError::Empty) => return,
            Err(mpsc::TryRecvError::Disconnected) => {
                Err("loader stopped without a result".to_string())
            }
        };
        self.library_rx = None;

        match result {
            Ok(library) => self.populate(library),
            Err(error) => {
                tracing::error!("Failed to load songs: {error}");
                self.error = Some(AppStateError::InitialFetchFailed { error });
                self.render();
            }
        }
    }

    /// Replaces the song list. Filters are kept and re-applied.
    pub fn populate(&mut self, library: Library) {
        tracing::info!(
            "Loaded {} songs by {} singers",
            library.len(),
            library.singers().len()
        );
        self.library = library;
        self.has_loaded = true;
        self.refilter();
    }

    // Filters
    pub fn set_singer_filter(&mut self, singer: Option<String>) {
        self.filter.singer = singer.filter(|s| !s.is_empty());
        self.refilter();
    }

    pub fn set_score_filter(&mut self, bucket: Option<ScoreBucket>) {
        self.filter.score = bucket;
        self.refilter();
    }

    pub fn set_filter(&mut self, filter: SongFilter) {
        self.filter = filter;
        self.refilter();
    }

    pub fn reset_filters(&mut self) {
        self.filter = SongFilter::default();
        self.refilter();
    }

    /// Recomputes the filtered list and goes back to the first page.
    ///
    /// The bound song follows its new position in the list; if it was
    /// filtered out, playback stops.
    fn refilter(&mut self) {
        let bound_song = self
            .playback
            .index()
            .and_then(|index| self.filtered.get(index).copied());

        self.filtered = self.filter.apply(self.library.songs());
        self.current_page = 1;
        tracing::debug!(
            "Filter {:?} matched {} songs",
            self.filter,
            self.filtered.len()
        );

        if let Some(song_index) = bound_song {
            match self.filtered.iter().position(|&s| s == song_index) {
                Some(index) => self.playback = self.playback.with_index(index),
                None => {
                    tracing::info!("Current song was filtered out; stopping");
                    self.stop();
                }
            }
        }
        self.render();
    }

    // Pages
    pub fn goto_page(&mut self, page: usize) {
        if page == 0 || page > self.total_pages() {
            tracing::debug!("Ignoring request for page {page} of {}", self.total_pages());
            return;
        }
        self.current_page = page;
        self.render();
    }

    pub fn next_page(&mut self) {
        if self.current_page < self.total_pages() {
            self.current_page += 1;
            self.render();
        }
    }

    pub fn previous_page(&mut self) {
        if self.current_page > 1 {
            self.current_page -= 1;
            self.render();
        }
    }

    // Playback
    /// Plays the song at `index` in the filtered list.
    ///
    /// Songs that aren't free raise a notice instead. Playing the song that
    /// is already bound toggles it.
    pub fn play_song(&mut self, index: usize) {
        let Some(song) = self.song_at(index) else {
            tracing::warn!("No song at index {index}");
            return;
        };
        let title = song.title.clone();
        let url = song.url();

        if !song.free {
            tracing::info!("`{title}` isn't free; showing link instead");
            self.notice = Some(Notice::unplayable(&title, url));
            self.render();
            return;
        }

        self.auto_stop.cancel();
        if self.playback.index() == Some(index) {
            self.toggle_current();
            return;
        }

        tracing::info!("Playing `{title}` from {url}");
        self.playback = PlaybackState::Paused(index);
        self.awaiting_start = true;
        self.progress = Progress::default();
        self.clear_playback_error();
        self.output.set_source(&url);
        self.output.play();
        self.progress_poll.start(self.clock.now());
        self.render();
        self.process_output_events();
    }

    pub fn toggle_current(&mut self) {
        match self.playback {
            PlaybackState::Playing(_) => self.pause(),
            PlaybackState::Paused(_) => self.resume(),
            PlaybackState::Idle => tracing::debug!("Nothing to toggle"),
        }
    }

    pub fn pause(&mut self) {
        let Some(index) = self.playback.index() else {
            return;
        };
        self.output.pause();
        self.auto_stop.cancel();
        self.progress_poll.stop();
        self.awaiting_start = false;
        self.playback = PlaybackState::Paused(index);
        self.render();
    }

    /// Asks the output to continue. The player only counts as playing once
    /// the output confirms.
    pub fn resume(&mut self) {
        if self.playback.index().is_none() {
            return;
        }
        self.awaiting_start = true;
        self.output.play();
        self.render();
        self.process_output_events();
    }

    /// Plays the next song, wrapping to the first. From idle, plays the first.
    pub fn next(&mut self) {
        let len = self.filtered.len();
        if len == 0 {
            return;
        }
        let index = match self.playback.index() {
            Some(index) if index + 1 < len => index + 1,
            _ => 0,
        };
        self.play_song(index);
    }

    /// Plays the previous song, wrapping to the last. From idle, plays the
    /// last.
    pub fn previous(&mut self) {
        let len = self.filtered.len();
        if len == 0 {
            return;
        }
        let index = match self.playback.index() {
            Some(index) if index > 0 => (index - 1).min(len - 1),
            _ => len - 1,
        };
        self.play_song(index);
    }

    /// Seeks to `fraction` (0 to 1) of the song. Ignored until the output
    /// knows the song's length.
    pub fn seek_fraction(&mut self, fraction: f64) {
        let Some(duration) = self.output.duration().filter(|d| !d.is_zero()) else {
            tracing::debug!("Ignoring seek; duration unknown");
            return;
        };
        if !fraction.is_finite() {
            return;
        }
        let position = duration.mul_f64(fraction.clamp(0.0, 1.0));
        self.output.seek(position);
        self.progress = Progress {
            position,
            duration: Some(duration),
        };
        self.render();
    }

    /// Seeks to where `x` falls on a progress bar starting at `left` that is
    /// `width` wide.
    pub fn seek_at(&mut self, x: f64, left: f64, width: f64) {
        if width <= 0.0 {
            return;
        }
        self.seek_fraction((x - left) / width);
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.output.set_volume(volume.clamp(0.0, 1.0));
    }

    // Notices
    pub fn show_details(&mut self, index: usize) {
        let Some(song) = self.song_at(index) else {
            return;
        };
        self.notice = Some(Notice::details_unavailable(&song.title));
        self.render();
    }

    pub fn dismiss_notice(&mut self) {
        if self.notice.take().is_some() {
            self.render();
        }
    }

    fn process_output_events(&mut self) {
        if self.draining_output {
            return;
        }
        self.draining_output = true;
        while let Some(event) = self.output.poll_event() {
            match event {
                OutputEvent::Started => self.on_started(),
                OutputEvent::Failed(reason) => self.on_failed(reason),
                OutputEvent::Ended => {
                    tracing::debug!("Song ended");
                    self.next();
                }
            }
        }
        self.draining_output = false;
    }

    fn on_started(&mut self) {
        let Some(index) = self.playback.index() else {
            tracing::debug!("Output started with nothing bound; pausing it");
            self.output.pause();
            return;
        };
        if !self.awaiting_start {
            // Paused before the output got going.
            self.output.pause();
            return;
        }
        self.awaiting_start = false;
        self.playback = PlaybackState::Playing(index);
        let now = self.clock.now();
        self.auto_stop.arm(now, self.settings.max_listen);
        self.progress_poll.start(now);
        self.poll_progress();
        self.render();
    }

    fn on_failed(&mut self, reason: String) {
        let title = self
            .playback
            .index()
            .and_then(|index| self.song_at(index))
            .map(|song| song.title.clone())
            .unwrap_or_default();
        tracing::warn!("Failed to play `{title}`: {reason}");
        self.awaiting_start = false;
        self.progress_poll.stop();
        self.error = Some(AppStateError::PlaybackFailed {
            title,
            error: reason,
        });
        self.render();
    }

    fn poll_progress(&mut self) {
        if let Some(duration) = self.output.duration().filter(|d| !d.is_zero()) {
            self.progress = Progress {
                position: self.output.position(),
                duration: Some(duration),
            };
            self.render();
        }
    }

    fn stop(&mut self) {
        self.output.pause();
        self.auto_stop.cancel();
        self.progress_poll.stop();
        self.awaiting_start = false;
        self.playback = PlaybackState::Idle;
        self.progress = Progress::default();
    }

    fn clear_playback_error(&mut self) {
        if matches!(self.error, Some(AppStateError::PlaybackFailed { .. })) {
            self.error = None;
        }
    }
}
impl Logic {
    pub fn library(&self) -> &Library {
        &self.library
    }

    pub fn has_loaded(&self) -> bool {
        self.has_loaded
    }

    pub fn singers(&self) -> &[String] {
        self.library.singers()
    }

    pub fn filter(&self) -> &SongFilter {
        &self.filter
    }

    /// Length of the filtered list.
    pub fn filtered_len(&self) -> usize {
        self.filtered.len()
    }

    /// The song at `index` in the filtered list.
    pub fn song_at(&self, index: usize) -> Option<&Song> {
        self.library.get(*self.filtered.get(index)?)
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.filtered.len())
    }

    pub fn playback_state(&self) -> PlaybackState {
        self.playback
    }

    pub fn is_awaiting_start(&self) -> bool {
        self.awaiting_start
    }

    pub fn progress(&self) -> Progress {
        self.progress
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn error(&self) -> Option<&AppStateError> {
        self.error.as_ref()
    }

    pub fn settings(&self) -> &PlayerSettings {
        &self.settings
    }
}
