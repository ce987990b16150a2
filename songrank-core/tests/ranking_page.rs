use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
    time::Duration,
};

use songrank_core::{
    Library, Logic, LogicArgs, PlaybackState, PlayerSettings, RecordingRenderer,
    clock::ManualClock,
    output::{AudioOutput, OutputEvent},
};
use songrank_state::ScoreBucket;

const SONGS: &str = r#"[
    {"title": "Lanterns", "singer": "Mira", "score": 9.4, "music": "https://cdn.example/lanterns.mp3", "free": true},
    {"title": "Paper Moon", "singer": "Tide:Mira|Jun", "score": "9.8", "music": "https://cdn.example/paper-moon.mp3", "free": true},
    {"title": "Static", "singer": "Jun", "score": 6.1, "music": "wwy|00012345", "free": false},
    {"title": "Harbor", "singer": "Ola|Jun", "score": 7.5, "music": "https://cdn.example/harbor.mp3", "free": true},
    {"title": "Lanterns", "singer": "Ola", "score": 8.2, "music": "https://cdn.example/lanterns-cover.mp3", "free": true},
    {"title": "Undated", "singer": "Ola", "music": "https://cdn.example/undated.mp3", "free": true},
    {"title": "Glass", "singer": "Mira", "score": 4.0, "music": "https://cdn.example/glass.mp3", "free": true}
]"#;

/// An output whose play requests only complete when the test says so.
#[derive(Default)]
struct ScriptedState {
    source: String,
    calls: Vec<String>,
    events: VecDeque<OutputEvent>,
    duration: Option<Duration>,
    position: Duration,
}

#[derive(Clone, Default)]
struct ScriptedOutput(Arc<Mutex<ScriptedState>>);
impl ScriptedOutput {
    fn state(&self) -> std::sync::MutexGuard<'_, ScriptedState> {
        self.0.lock().unwrap()
    }

    fn push(&self, event: OutputEvent) {
        self.state().events.push_back(event);
    }

    fn calls(&self) -> Vec<String> {
        self.state().calls.clone()
    }
}
impl AudioOutput for ScriptedOutput {
    fn set_source(&mut self, url: &str) {
        let mut state = self.state();
        state.source = url.to_string();
        state.calls.push(format!("source {url}"));
        state.events.clear();
    }

    fn play(&mut self) {
        self.state().calls.push("play".to_string());
    }

    fn pause(&mut self) {
        self.state().calls.push("pause".to_string());
    }

    fn seek(&mut self, position: Duration) {
        let mut state = self.state();
        state.position = position;
        state.calls.push(format!("seek {}", position.as_secs()));
    }

    fn position(&self) -> Duration {
        self.state().position
    }

    fn duration(&self) -> Option<Duration> {
        self.state().duration
    }

    fn poll_event(&mut self) -> Option<OutputEvent> {
        self.state().events.pop_front()
    }
}

fn setup() -> (Logic, ScriptedOutput, ManualClock, RecordingRenderer) {
    let output = ScriptedOutput::default();
    let clock = ManualClock::new();
    let renders = RecordingRenderer::default();
    let mut logic = Logic::new(LogicArgs {
        source: None,
        output: Box::new(output.clone()),
        renderer: Box::new(renders.clone()),
        clock: Arc::new(clock.clone()),
        settings: PlayerSettings {
            max_listen: Duration::from_secs(30),
            progress_interval: Duration::from_millis(500),
        },
    })
    .unwrap();
    logic.populate(Library::from_json(SONGS).unwrap());
    (logic, output, clock, renders)
}

#[test]
fn ranking_is_sorted_and_paginated() {
    let (mut logic, _, _, renders) = setup();

    let view = renders.last().unwrap();
    let titles: Vec<_> = view.rows.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, ["Paper Moon", "Lanterns", "Lanterns", "Harbor", "Static"]);
    assert_eq!(view.rows[0].singer, "Tide");
    assert_eq!(view.rows[2].rank, 2);
    assert_eq!(view.pagination.as_ref().unwrap().info, "Page 1 of 2");

    logic.next_page();
    let view = renders.last().unwrap();
    let titles: Vec<_> = view.rows.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, ["Glass", "Undated"]);
    assert_eq!(view.rows[1].score_class, None);

    assert_eq!(logic.singers(), ["Jun", "Mira", "Ola", "Tide"]);
}

#[test]
fn filters_narrow_the_list() {
    let (mut logic, _, _, renders) = setup();

    logic.set_singer_filter(Some("Mira".to_string()));
    let view = renders.last().unwrap();
    let titles: Vec<_> = view.rows.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, ["Paper Moon", "Lanterns", "Glass"]);
    assert_eq!(view.pagination, None);

    logic.set_score_filter(Some(ScoreBucket::parse("0-5")));
    let titles: Vec<_> = renders
        .last()
        .unwrap()
        .rows
        .iter()
        .map(|r| r.title.clone())
        .collect();
    assert_eq!(titles, ["Glass"]);

    // Songs without a score survive every bucket.
    logic.set_singer_filter(Some("Ola".to_string()));
    logic.set_score_filter(Some(ScoreBucket::parse("9-10")));
    let titles: Vec<_> = renders
        .last()
        .unwrap()
        .rows
        .iter()
        .map(|r| r.title.clone())
        .collect();
    assert_eq!(titles, ["Undated"]);
}

#[test]
fn playback_waits_for_output() {
    let (mut logic, output, clock, renders) = setup();

    logic.play_song(0);
    assert_eq!(logic.playback_state(), PlaybackState::Paused(0));
    assert!(renders.last().unwrap().now_playing.unwrap().is_loading);
    assert_eq!(
        output.calls(),
        ["source https://cdn.example/paper-moon.mp3", "play"]
    );

    output.state().duration = Some(Duration::from_secs(200));
    output.push(OutputEvent::Started);
    logic.update();
    assert_eq!(logic.playback_state(), PlaybackState::Playing(0));
    let now_playing = renders.last().unwrap().now_playing.unwrap();
    assert!(!now_playing.is_loading);
    assert_eq!(now_playing.singer, "Tide:Mira|Jun");
    assert_eq!(now_playing.duration_text, "3:20");

    output.state().position = Duration::from_secs(65);
    clock.advance(Duration::from_millis(500));
    logic.update();
    let now_playing = renders.last().unwrap().now_playing.unwrap();
    assert_eq!(now_playing.position_text, "1:05");

    clock.advance(Duration::from_secs(30));
    logic.update();
    assert_eq!(logic.playback_state(), PlaybackState::Paused(0));
    assert_eq!(output.calls().last().unwrap(), "pause");
}

#[test]
fn pause_before_start_wins() {
    let (mut logic, output, _, _) = setup();

    logic.play_song(1);
    logic.pause();
    output.push(OutputEvent::Started);
    logic.update();

    assert_eq!(logic.playback_state(), PlaybackState::Paused(1));
    let calls = output.calls();
    assert_eq!(&calls[calls.len() - 2..], ["pause", "pause"]);
}

#[test]
fn failure_and_end_of_song() {
    let (mut logic, output, _, _) = setup();

    logic.play_song(3);
    output.push(OutputEvent::Failed("network down".to_string()));
    logic.update();
    assert_eq!(logic.playback_state(), PlaybackState::Paused(3));
    assert!(logic.error().unwrap().display_message().contains("network down"));

    logic.play_song(1);
    output.push(OutputEvent::Started);
    logic.update();
    assert_eq!(logic.playback_state(), PlaybackState::Playing(1));

    output.push(OutputEvent::Ended);
    logic.update();
    // Index 2 is a duplicate title; the next index is still just index + 1.
    assert_eq!(logic.playback_state(), PlaybackState::Paused(2));
    assert_eq!(output.calls().last().unwrap(), "play");
    assert!(output.state().source.ends_with("lanterns-cover.mp3"));
}

#[test]
fn unplayable_song_links_out() {
    let (mut logic, output, _, renders) = setup();

    logic.play_song(4);
    let notice = renders.last().unwrap().notice.unwrap();
    assert_eq!(notice.title, "This song can't be played here");
    let link = notice.link.unwrap();
    assert_eq!(link.label, "Static");
    assert_eq!(link.url, "https://music.163.com/#/song?id=12345");
    assert_eq!(logic.playback_state(), PlaybackState::Idle);
    assert!(output.calls().is_empty());

    logic.dismiss_notice();
    assert_eq!(renders.last().unwrap().notice, None);
}

#[test]
fn seeking_uses_known_duration() {
    let (mut logic, output, _, renders) = setup();

    logic.play_song(0);
    logic.seek_fraction(0.5);
    assert!(!output.calls().iter().any(|c| c.starts_with("seek")));

    output.state().duration = Some(Duration::from_secs(200));
    output.push(OutputEvent::Started);
    logic.update();
    logic.seek_at(150.0, 50.0, 400.0);
    assert_eq!(output.calls().last().unwrap(), "seek 50");
    assert_eq!(renders.last().unwrap().now_playing.unwrap().percent, 25.0);
}
