use std::time::Duration;

use serde::{Deserialize, Serialize};
use songrank_core::{PlayerSettings, SongFilter, songrank_state::ScoreBucket};

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub general: General,
    pub library: Library,
    pub player: Player,
    pub last_filters: LastFilters,
}
impl Config {
    pub const FILENAME: &str = "songrank-tui.toml";

    pub fn load() -> Self {
        match std::fs::read_to_string(Self::FILENAME) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => config,
                Err(e) => panic!("Failed to parse {}: {e}", Self::FILENAME),
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("no config file found, using defaults");
                Config::default()
            }
            Err(e) => {
                panic!("Failed to read {}: {e}", Self::FILENAME)
            }
        }
    }

    pub fn save(&self) {
        let contents = match toml::to_string(self) {
            Ok(contents) => contents,
            Err(e) => {
                tracing::error!("failed to serialize config: {e}");
                return;
            }
        };
        match std::fs::write(Self::FILENAME, contents) {
            Ok(()) => tracing::info!("saved config to {}", Self::FILENAME),
            Err(e) => tracing::error!("failed to write {}: {e}", Self::FILENAME),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct General {
    pub tick_rate_ms: u64,
}
impl Default for General {
    fn default() -> Self {
        Self { tick_rate_ms: 100 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Library {
    /// A path to a JSON song list, or an http(s) URL serving one.
    pub source: String,
}
impl Default for Library {
    fn default() -> Self {
        Self {
            source: "resource/music.json".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Player {
    pub max_listen_secs: u64,
    pub progress_poll_ms: u64,
    pub volume: f32,
}
impl Default for Player {
    fn default() -> Self {
        let settings = PlayerSettings::default();
        Self {
            max_listen_secs: settings.max_listen.as_secs(),
            progress_poll_ms: settings.progress_interval.as_millis() as u64,
            volume: 1.0,
        }
    }
}
impl Player {
    pub fn settings(&self) -> PlayerSettings {
        PlayerSettings {
            max_listen: Duration::from_secs(self.max_listen_secs),
            progress_interval: Duration::from_millis(self.progress_poll_ms.max(1)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct LastFilters {
    pub singer: Option<String>,
    pub score: Option<ScoreBucket>,
}
impl LastFilters {
    pub fn as_filter(&self) -> SongFilter {
        SongFilter {
            singer: self.singer.clone(),
            score: self.score.clone(),
        }
    }
}
impl From<&SongFilter> for LastFilters {
    fn from(filter: &SongFilter) -> Self {
        Self {
            singer: filter.singer.clone(),
            score: filter.score.clone(),
        }
    }
}
