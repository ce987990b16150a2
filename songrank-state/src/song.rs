use serde::{Deserialize, Deserializer};

use crate::{extract_singers, parse_number, primary_singer, song_url};

/// A song, as `songrank` cares about it.
///
/// Records come from hand-maintained data files, so every field is optional
/// on the wire: missing strings are empty and a missing `free` is `false`.
/// A missing or non-numeric `score` is NaN, but a `null` one is 0.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Song {
    /// The song title. Treated as the song's key when ranking.
    #[serde(default)]
    pub title: String,
    /// The raw singer field; see [`extract_singers`] for its encoding.
    #[serde(default)]
    pub singer: String,
    /// The score, nominally between 0 and 10.
    #[serde(default = "nan", deserialize_with = "deserialize_score")]
    pub score: f64,
    /// Where the song can be played from; see [`song_url`].
    #[serde(default)]
    pub music: String,
    /// Whether `music` can be played directly.
    #[serde(default)]
    pub free: bool,
}
impl Default for Song {
    fn default() -> Self {
        Self {
            title: String::new(),
            singer: String::new(),
            score: f64::NAN,
            music: String::new(),
            free: false,
        }
    }
}
impl Song {
    /// The distinct singers credited on this song.
    pub fn singers(&self) -> Vec<String> {
        extract_singers(&self.singer)
    }

    /// Whether `name` is credited on this song. Exact, case-sensitive match.
    pub fn has_singer(&self, name: &str) -> bool {
        self.singers().iter().any(|s| s == name)
    }

    /// The singer shown in listings.
    pub fn primary_singer(&self) -> &str {
        primary_singer(&self.singer)
    }

    /// The URL this song resolves to.
    pub fn url(&self) -> String {
        song_url(&self.music, self.free)
    }

    /// The whole-number score band, or `None` if the score is not a number.
    pub fn score_class(&self) -> Option<i64> {
        (!self.score.is_nan()).then(|| self.score.floor() as i64)
    }
}

fn nan() -> f64 {
    f64::NAN
}

fn deserialize_score<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    #[allow(dead_code)]
    enum RawScore {
        Number(f64),
        Text(String),
        Null,
        Other(serde::de::IgnoredAny),
    }

    Ok(match RawScore::deserialize(deserializer)? {
        RawScore::Number(n) => n,
        RawScore::Text(s) => parse_number(&s),
        // An explicit null ranks and filters as 0, unlike a missing score.
        RawScore::Null => 0.0,
        RawScore::Other(_) => f64::NAN,
    })
}
