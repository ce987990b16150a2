use std::{
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
        mpsc,
    },
    time::{Duration, Instant},
};

use rodio::Source as _;

use crate::{
    TokioThread,
    output::{AudioOutput, OutputEvent},
};

#[derive(Debug, Clone)]
enum LogicToPlaybackMessage {
    PlayTrack { request_id: u64, data: Vec<u8> },
    Play,
    Pause,
    Stop,
    Seek(Duration),
    SetVolume(f32),
}

/// Every message names the request it belongs to, so the controller can
/// drop whatever was in flight when the source changed.
#[derive(Debug, Clone, PartialEq)]
enum PlaybackToLogicMessage {
    TrackStarted {
        request_id: u64,
        duration: Option<Duration>,
    },
    Resumed {
        request_id: u64,
    },
    Failed {
        request_id: u64,
        reason: String,
    },
    PositionChanged {
        request_id: u64,
        position: Duration,
    },
    Ended {
        request_id: u64,
    },
}
impl PlaybackToLogicMessage {
    fn request_id(&self) -> u64 {
        match self {
            Self::TrackStarted { request_id, .. }
            | Self::Resumed { request_id }
            | Self::Failed { request_id, .. }
            | Self::PositionChanged { request_id, .. }
            | Self::Ended { request_id } => *request_id,
        }
    }
}

#[derive(Clone)]
struct PlaybackThreadSendHandle(mpsc::Sender<LogicToPlaybackMessage>);
impl PlaybackThreadSendHandle {
    fn send(&self, message: LogicToPlaybackMessage) {
        if self.0.send(message).is_err() {
            tracing::warn!("Playback thread has stopped; dropping message");
        }
    }
}

/// Owns the audio device. Decodes and plays whatever it is sent.
struct PlaybackThread {
    logic_to_playback_tx: PlaybackThreadSendHandle,
    _playback_thread_handle: std::thread::JoinHandle<()>,
}
impl PlaybackThread {
    fn new(
        playback_to_logic_tx: mpsc::Sender<PlaybackToLogicMessage>,
        latest_request: Arc<AtomicU64>,
        volume: f32,
    ) -> std::io::Result<Self> {
        let (logic_to_playback_tx, logic_to_playback_rx) = mpsc::channel();
        let playback_thread_handle = std::thread::Builder::new()
            .name("songrank-playback".to_string())
            .spawn(move || {
                Self::run(
                    logic_to_playback_rx,
                    playback_to_logic_tx,
                    latest_request,
                    volume,
                );
            })?;
        Ok(Self {
            logic_to_playback_tx: PlaybackThreadSendHandle(logic_to_playback_tx),
            _playback_thread_handle: playback_thread_handle,
        })
    }

    fn send(&self, message: LogicToPlaybackMessage) {
        self.logic_to_playback_tx.send(message);
    }

    fn send_handle(&self) -> PlaybackThreadSendHandle {
        self.logic_to_playback_tx.clone()
    }

    fn run(
        playback_rx: mpsc::Receiver<LogicToPlaybackMessage>,
        logic_tx: mpsc::Sender<PlaybackToLogicMessage>,
        latest_request: Arc<AtomicU64>,
        volume: f32,
    ) {
        use LogicToPlaybackMessage as LTPM;
        use PlaybackToLogicMessage as PTLM;

        let stream_handle = match rodio::OutputStreamBuilder::open_default_stream() {
            Ok(stream_handle) => stream_handle,
            Err(e) => {
                tracing::error!("Failed to open audio output: {e}");
                // Keep answering play requests so the controller hears about it.
                for msg in playback_rx {
                    let request_id = match msg {
                        LTPM::PlayTrack { request_id, .. } => request_id,
                        LTPM::Play => latest_request.load(Ordering::SeqCst),
                        _ => continue,
                    };
                    let _ = logic_tx.send(PTLM::Failed {
                        request_id,
                        reason: format!("no audio output: {e}"),
                    });
                }
                return;
            }
        };
        let sink = rodio::Sink::connect_new(stream_handle.mixer());
        sink.set_volume(volume);

        fn build_decoder(
            data: Vec<u8>,
        ) -> Result<rodio::decoder::Decoder<std::io::Cursor<Vec<u8>>>, rodio::decoder::DecoderError>
        {
            rodio::decoder::DecoderBuilder::new()
                .with_byte_len(data.len() as u64)
                .with_data(std::io::Cursor::new(data))
                .build()
        }

        let mut last_data: Option<Vec<u8>> = None;
        // The request the sink's contents belong to.
        let mut current_request = 0;
        // Set while a track is loaded and hasn't been reported as ended.
        let mut in_track = false;
        let mut last_position_update = Instant::now();

        loop {
            loop {
                let msg = match playback_rx.try_recv() {
                    Ok(msg) => msg,
                    Err(mpsc::TryRecvError::Empty) => break,
                    Err(mpsc::TryRecvError::Disconnected) => return,
                };
                match msg {
                    LTPM::PlayTrack { request_id, data } => {
                        if request_id != latest_request.load(Ordering::SeqCst) {
                            tracing::debug!("Dropping stale track {request_id}");
                            continue;
                        }
                        sink.clear();
                        current_request = request_id;
                        match build_decoder(data.clone()) {
                            Ok(decoder) => {
                                let duration = decoder.total_duration();
                                sink.append(decoder);
                                sink.play();
                                last_data = Some(data);
                                in_track = true;
                                let _ = logic_tx.send(PTLM::TrackStarted {
                                    request_id,
                                    duration,
                                });
                            }
                            Err(e) => {
                                last_data = None;
                                in_track = false;
                                let _ = logic_tx.send(PTLM::Failed {
                                    request_id,
                                    reason: format!("failed to decode: {e}"),
                                });
                            }
                        }
                    }
                    LTPM::Play => {
                        if sink.empty() {
                            // Restart a finished track. Without data, a download
                            // is still in flight and will start on its own.
                            let Some(data) = last_data.clone() else {
                                continue;
                            };
                            match build_decoder(data) {
                                Ok(decoder) => sink.append(decoder),
                                Err(e) => {
                                    let _ = logic_tx.send(PTLM::Failed {
                                        request_id: current_request,
                                        reason: format!("failed to decode: {e}"),
                                    });
                                    continue;
                                }
                            }
                        }
                        sink.play();
                        in_track = true;
                        let _ = logic_tx.send(PTLM::Resumed {
                            request_id: current_request,
                        });
                    }
                    LTPM::Pause => sink.pause(),
                    LTPM::Stop => {
                        sink.clear();
                        last_data = None;
                        in_track = false;
                    }
                    LTPM::Seek(position) => {
                        if let Err(e) = sink.try_seek(position) {
                            tracing::warn!("Failed to seek to position {position:?}: {e}");
                        }
                        let _ = logic_tx.send(PTLM::PositionChanged {
                            request_id: current_request,
                            position: sink.get_pos(),
                        });
                    }
                    LTPM::SetVolume(volume) => sink.set_volume(volume),
                }
            }

            if in_track && sink.empty() {
                in_track = false;
                let _ = logic_tx.send(PTLM::Ended {
                    request_id: current_request,
                });
            }

            let now = Instant::now();
            if now.duration_since(last_position_update) >= Duration::from_millis(250) {
                last_position_update = now;
                if !sink.empty() && !sink.is_paused() {
                    let _ = logic_tx.send(PTLM::PositionChanged {
                        request_id: current_request,
                        position: sink.get_pos(),
                    });
                }
            }

            std::thread::sleep(Duration::from_millis(10));
        }
    }
}

/// The controller's view of the playback thread: which request is current,
/// and what that request last reported.
struct RequestState {
    latest_request: Arc<AtomicU64>,
    /// Whether the current source has been sent for download. Cleared when
    /// the request fails, so that playing again starts a fresh download.
    requested: bool,
    position: Duration,
    duration: Option<Duration>,
}
impl RequestState {
    fn new(latest_request: Arc<AtomicU64>) -> Self {
        Self {
            latest_request,
            requested: false,
            position: Duration::ZERO,
            duration: None,
        }
    }

    fn current(&self) -> u64 {
        self.latest_request.load(Ordering::SeqCst)
    }

    /// Supersedes everything in flight.
    fn begin_source(&mut self) {
        self.latest_request.fetch_add(1, Ordering::SeqCst);
        self.requested = false;
        self.position = Duration::ZERO;
        self.duration = None;
    }

    fn accept(&mut self, msg: PlaybackToLogicMessage) -> Option<OutputEvent> {
        use PlaybackToLogicMessage as PTLM;
        if msg.request_id() != self.current() {
            tracing::debug!("Dropping stale playback message {msg:?}");
            return None;
        }
        match msg {
            PTLM::PositionChanged { position, .. } => {
                self.position = position;
                None
            }
            PTLM::TrackStarted { duration, .. } => {
                self.duration = duration;
                self.position = Duration::ZERO;
                Some(OutputEvent::Started)
            }
            PTLM::Resumed { .. } => Some(OutputEvent::Started),
            PTLM::Failed { reason, .. } => {
                self.requested = false;
                Some(OutputEvent::Failed(reason))
            }
            PTLM::Ended { .. } => Some(OutputEvent::Ended),
        }
    }
}

/// Plays songs through the default audio device.
///
/// Sources are downloaded in full on the tokio thread, then decoded and
/// played on a dedicated playback thread.
pub struct RodioOutput {
    tokio_thread: TokioThread,
    playback_thread: PlaybackThread,
    playback_to_logic_tx: mpsc::Sender<PlaybackToLogicMessage>,
    playback_to_logic_rx: mpsc::Receiver<PlaybackToLogicMessage>,
    state: RequestState,
    source: String,
}
impl RodioOutput {
    pub fn new(volume: f32) -> std::io::Result<Self> {
        let (playback_to_logic_tx, playback_to_logic_rx) = mpsc::channel();
        let latest_request = Arc::new(AtomicU64::new(0));
        let playback_thread =
            PlaybackThread::new(playback_to_logic_tx.clone(), latest_request.clone(), volume)?;
        Ok(Self {
            tokio_thread: TokioThread::new()?,
            playback_thread,
            playback_to_logic_tx,
            playback_to_logic_rx,
            state: RequestState::new(latest_request),
            source: String::new(),
        })
    }

    fn request_track(&mut self) {
        let request_id = self.state.current();
        let url = self.source.clone();
        let latest_request = self.state.latest_request.clone();
        let playback_tx = self.playback_thread.send_handle();
        let logic_tx = self.playback_to_logic_tx.clone();
        self.state.requested = true;

        self.tokio_thread.spawn(async move {
            let result = download(&url).await;
            if latest_request.load(Ordering::SeqCst) != request_id {
                tracing::debug!("Dropping stale download of {url}");
                return;
            }
            match result {
                Ok(data) => {
                    tracing::debug!("Downloaded {} bytes from {url}", data.len());
                    playback_tx.send(LogicToPlaybackMessage::PlayTrack { request_id, data });
                }
                Err(e) => {
                    let _ = logic_tx.send(PlaybackToLogicMessage::Failed {
                        request_id,
                        reason: e.to_string(),
                    });
                }
            }
        });
    }
}
impl AudioOutput for RodioOutput {
    fn set_source(&mut self, url: &str) {
        self.state.begin_source();
        self.playback_thread.send(LogicToPlaybackMessage::Stop);
        self.source = url.to_string();
    }

    fn play(&mut self) {
        if self.source.is_empty() {
            let _ = self
                .playback_to_logic_tx
                .send(PlaybackToLogicMessage::Failed {
                    request_id: self.state.current(),
                    reason: "no source set".to_string(),
                });
        } else if self.state.requested {
            self.playback_thread.send(LogicToPlaybackMessage::Play);
        } else {
            self.request_track();
        }
    }

    fn pause(&mut self) {
        self.playback_thread.send(LogicToPlaybackMessage::Pause);
    }

    fn seek(&mut self, position: Duration) {
        self.state.position = position;
        self.playback_thread.send(LogicToPlaybackMessage::Seek(position));
    }

    fn position(&self) -> Duration {
        self.state.position
    }

    fn duration(&self) -> Option<Duration> {
        self.state.duration
    }

    fn poll_event(&mut self) -> Option<OutputEvent> {
        while let Ok(msg) = self.playback_to_logic_rx.try_recv() {
            if let Some(event) = self.state.accept(msg) {
                return Some(event);
            }
        }
        None
    }

    fn set_volume(&mut self, volume: f32) {
        self.playback_thread
            .send(LogicToPlaybackMessage::SetVolume(volume));
    }
}

async fn download(url: &str) -> Result<Vec<u8>, reqwest::Error> {
    let response = reqwest::get(url).await?.error_for_status()?;
    Ok(response.bytes().await?.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::PlaybackToLogicMessage as PTLM;

    fn state() -> RequestState {
        RequestState::new(Arc::new(AtomicU64::new(0)))
    }

    #[test]
    fn test_messages_from_an_old_source_are_dropped() {
        let mut state = state();
        state.begin_source();
        let old = state.current();
        state.begin_source();

        // The old track got through the playback thread's check just before
        // the source changed.
        assert_eq!(
            state.accept(PTLM::TrackStarted {
                request_id: old,
                duration: Some(Duration::from_secs(200)),
            }),
            None
        );
        assert_eq!(state.accept(PTLM::Ended { request_id: old }), None);
        assert_eq!(state.duration, None);

        let current = state.current();
        assert_eq!(
            state.accept(PTLM::TrackStarted {
                request_id: current,
                duration: Some(Duration::from_secs(90)),
            }),
            Some(OutputEvent::Started)
        );
        assert_eq!(state.duration, Some(Duration::from_secs(90)));
    }

    #[test]
    fn test_stale_positions_are_ignored() {
        let mut state = state();
        state.begin_source();
        let current = state.current();
        state.accept(PTLM::PositionChanged {
            request_id: current.wrapping_sub(1),
            position: Duration::from_secs(30),
        });
        assert_eq!(state.position, Duration::ZERO);
        state.accept(PTLM::PositionChanged {
            request_id: current,
            position: Duration::from_secs(4),
        });
        assert_eq!(state.position, Duration::from_secs(4));
    }

    #[test]
    fn test_failure_allows_a_fresh_request() {
        let mut state = state();
        state.begin_source();
        state.requested = true;

        let event = state.accept(PTLM::Failed {
            request_id: state.current(),
            reason: "404".to_string(),
        });
        assert_eq!(event, Some(OutputEvent::Failed("404".to_string())));
        assert!(!state.requested);
    }

    #[test]
    fn test_stale_failure_keeps_current_request() {
        let mut state = state();
        state.begin_source();
        let old = state.current();
        state.begin_source();
        state.requested = true;

        assert_eq!(
            state.accept(PTLM::Failed {
                request_id: old,
                reason: "timed out".to_string(),
            }),
            None
        );
        assert!(state.requested);
    }
}
