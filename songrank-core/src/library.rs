use std::{fmt, path::PathBuf};

use songrank_state::{Song, distinct_singers};

/// The loaded song list, in file order, and the singers mentioned in it.
#[derive(Debug, Default, Clone)]
pub struct Library {
    songs: Vec<Song>,
    singers: Vec<String>,
}
impl Library {
    pub fn new(songs: Vec<Song>) -> Self {
        let singers = distinct_singers(&songs);
        Self { songs, singers }
    }

    /// Parses a JSON array of song records.
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        let songs: Vec<Song> = serde_json::from_str(json)?;
        Ok(Self::new(songs))
    }

    pub fn songs(&self) -> &[Song] {
        &self.songs
    }

    pub fn get(&self, index: usize) -> Option<&Song> {
        self.songs.get(index)
    }

    /// Every distinct singer, sorted.
    pub fn singers(&self) -> &[String] {
        &self.singers
    }

    pub fn len(&self) -> usize {
        self.songs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("server responded with status {0}")]
    Status(u16),
    #[error("invalid song list: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Where the song list comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Path(PathBuf),
    Url(String),
}
impl DataSource {
    /// Interprets `source` as a URL if it looks like one, a path otherwise.
    pub fn parse(source: &str) -> Self {
        if source.starts_with("http://") || source.starts_with("https://") {
            DataSource::Url(source.to_string())
        } else {
            DataSource::Path(PathBuf::from(source))
        }
    }

    pub async fn load(&self) -> Result<Library, LoadError> {
        let json = match self {
            DataSource::Path(path) => {
                tokio::fs::read_to_string(path)
                    .await
                    .map_err(|source| LoadError::Io {
                        path: path.clone(),
                        source,
                    })?
            }
            DataSource::Url(url) => {
                let response = reqwest::get(url).await?;
                let status = response.status();
                if !status.is_success() {
                    return Err(LoadError::Status(status.as_u16()));
                }
                response.text().await?
            }
        };
        Library::from_json(&json)
    }
}
impl From<&str> for DataSource {
    fn from(source: &str) -> Self {
        Self::parse(source)
    }
}
impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Path(path) => write!(f, "{}", path.display()),
            DataSource::Url(url) => write!(f, "{url}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_collects_singers() {
        let library = Library::from_json(
            r#"[{"title":"a","singer":"B|A"},{"title":"b","singer":"G:A|C"}]"#,
        )
        .unwrap();
        assert_eq!(library.len(), 2);
        assert_eq!(library.singers(), ["A", "B", "C", "G"]);
        assert_eq!(library.get(1).unwrap().title, "b");
        assert!(library.get(2).is_none());
    }

    #[test]
    fn test_from_json_rejects_non_array() {
        assert!(matches!(
            Library::from_json(r#"{"title":"a"}"#),
            Err(LoadError::Parse(_))
        ));
    }

    #[test]
    fn test_data_source_parse() {
        assert_eq!(
            DataSource::parse("https://example.com/music.json"),
            DataSource::Url("https://example.com/music.json".to_string())
        );
        assert_eq!(
            DataSource::parse("resource/music.json"),
            DataSource::Path(PathBuf::from("resource/music.json"))
        );
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let source = DataSource::parse("does/not/exist.json");
        let err = source.load().await.unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
        assert!(err.to_string().contains("does/not/exist.json"));
    }

    #[tokio::test]
    async fn test_load_file() {
        let path = std::env::temp_dir().join(format!("songrank-load-{}.json", std::process::id()));
        std::fs::write(&path, r#"[{"title":"x","score":"7"}]"#).unwrap();
        let library = DataSource::Path(path.clone()).load().await.unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(library.songs()[0].score, 7.0);
    }
}
