//! Audio outputs the controller can drive.

use std::{
    collections::VecDeque,
    sync::Arc,
    time::{Duration, Instant},
};

use crate::clock::Clock;

/// Something an output reports back after the fact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputEvent {
    /// A [`AudioOutput::play`] request succeeded and audio is running.
    Started,
    /// A [`AudioOutput::play`] request failed.
    Failed(String),
    /// The current source played through to its end.
    Ended,
}

/// An audio element: one source at a time, played asynchronously.
///
/// `play` only *requests* playback. The outcome arrives later as an
/// [`OutputEvent`] from [`poll_event`](Self::poll_event), which may already be
/// the case by the time `play` returns.
pub trait AudioOutput {
    /// Replaces the source. Stops whatever was playing, rewinds to zero and
    /// discards any pending events of the old source.
    fn set_source(&mut self, url: &str);
    fn play(&mut self);
    fn pause(&mut self);
    fn seek(&mut self, position: Duration);
    fn position(&self) -> Duration;
    /// The source's length, if known yet.
    fn duration(&self) -> Option<Duration>;
    fn poll_event(&mut self) -> Option<OutputEvent>;
    fn set_volume(&mut self, _volume: f32) {}
}

/// An output that plays nothing, but keeps time as if it did.
///
/// Used when no audio device is available, and by tests. Every source is
/// treated as `track_length` long; with no length set, sources never end and
/// report no duration.
pub struct SilentOutput {
    clock: Arc<dyn Clock>,
    track_length: Option<Duration>,
    source: String,
    offset: Duration,
    playing_since: Option<Instant>,
    events: VecDeque<OutputEvent>,
}
impl SilentOutput {
    pub fn new(clock: Arc<dyn Clock>, track_length: Option<Duration>) -> Self {
        Self {
            clock,
            track_length,
            source: String::new(),
            offset: Duration::ZERO,
            playing_since: None,
            events: VecDeque::new(),
        }
    }

    #[cfg(test)]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[cfg(test)]
    pub fn is_playing(&self) -> bool {
        self.playing_since.is_some()
    }

    fn clamp(&self, position: Duration) -> Duration {
        match self.track_length {
            Some(length) => position.min(length),
            None => position,
        }
    }

    fn has_ended(&self) -> bool {
        match self.track_length {
            Some(length) => !length.is_zero() && self.position() >= length,
            None => false,
        }
    }
}
impl AudioOutput for SilentOutput {
    fn set_source(&mut self, url: &str) {
        self.source = url.to_string();
        self.offset = Duration::ZERO;
        self.playing_since = None;
        self.events.clear();
    }

    fn play(&mut self) {
        if self.source.is_empty() {
            self.events
                .push_back(OutputEvent::Failed("no source set".to_string()));
            return;
        }
        if self.playing_since.is_none() {
            if self.has_ended() {
                self.offset = Duration::ZERO;
            }
            self.playing_since = Some(self.clock.now());
        }
        self.events.push_back(OutputEvent::Started);
    }

    fn pause(&mut self) {
        self.offset = self.position();
        self.playing_since = None;
    }

    fn seek(&mut self, position: Duration) {
        self.offset = self.clamp(position);
        if self.playing_since.is_some() {
            self.playing_since = Some(self.clock.now());
        }
    }

    fn position(&self) -> Duration {
        let elapsed = self
            .playing_since
            .map(|since| self.clock.now().saturating_duration_since(since))
            .unwrap_or_default();
        self.clamp(self.offset + elapsed)
    }

    fn duration(&self) -> Option<Duration> {
        if self.source.is_empty() {
            None
        } else {
            self.track_length
        }
    }

    fn poll_event(&mut self) -> Option<OutputEvent> {
        if self.playing_since.is_some() && self.has_ended() {
            self.offset = self.position();
            self.playing_since = None;
            self.events.push_back(OutputEvent::Ended);
        }
        self.events.pop_front()
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    fn output(length: Option<u64>) -> (ManualClock, SilentOutput) {
        let clock = ManualClock::new();
        let output = SilentOutput::new(Arc::new(clock.clone()), length.map(Duration::from_secs));
        (clock, output)
    }

    #[test]
    fn test_play_without_source_fails() {
        let (_, mut output) = output(Some(10));
        output.play();
        assert!(matches!(output.poll_event(), Some(OutputEvent::Failed(_))));
        assert_eq!(output.poll_event(), None);
        assert_eq!(output.duration(), None);
    }

    #[test]
    fn test_keeps_time_while_playing() {
        let (clock, mut output) = output(Some(100));
        output.set_source("a.mp3");
        output.play();
        assert_eq!(output.poll_event(), Some(OutputEvent::Started));

        clock.advance(Duration::from_secs(3));
        assert_eq!(output.position(), Duration::from_secs(3));

        output.pause();
        clock.advance(Duration::from_secs(30));
        assert_eq!(output.position(), Duration::from_secs(3));

        output.seek(Duration::from_secs(50));
        output.play();
        clock.advance(Duration::from_secs(1));
        assert_eq!(output.position(), Duration::from_secs(51));
    }

    #[test]
    fn test_ends_at_track_length() {
        let (clock, mut output) = output(Some(10));
        output.set_source("a.mp3");
        output.play();
        assert_eq!(output.poll_event(), Some(OutputEvent::Started));

        clock.advance(Duration::from_secs(11));
        assert_eq!(output.poll_event(), Some(OutputEvent::Ended));
        assert_eq!(output.poll_event(), None);
        assert!(!output.is_playing());
        assert_eq!(output.position(), Duration::from_secs(10));

        // Playing again after the end starts over.
        output.play();
        assert_eq!(output.position(), Duration::ZERO);
    }

    #[test]
    fn test_set_source_discards_pending_events() {
        let (_, mut output) = output(None);
        output.set_source("a.mp3");
        output.play();
        output.set_source("b.mp3");
        assert_eq!(output.poll_event(), None);
        assert!(!output.is_playing());
        assert_eq!(output.source(), "b.mp3");
    }

    #[test]
    fn test_unknown_length_never_ends() {
        let (clock, mut output) = output(None);
        output.set_source("a.mp3");
        output.play();
        output.poll_event();
        clock.advance(Duration::from_secs(100_000));
        assert_eq!(output.poll_event(), None);
        assert_eq!(output.duration(), None);
    }
}
