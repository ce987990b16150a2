/// Where the player is. The index is a position in the *filtered* list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Idle,
    Playing(usize),
    Paused(usize),
}
impl PlaybackState {
    /// The bound song, if any.
    pub fn index(&self) -> Option<usize> {
        match self {
            PlaybackState::Idle => None,
            PlaybackState::Playing(index) | PlaybackState::Paused(index) => Some(*index),
        }
    }

    pub fn is_playing(&self) -> bool {
        matches!(self, PlaybackState::Playing(_))
    }

    /// The same state bound to a different index. `Idle` stays `Idle`.
    pub fn with_index(self, index: usize) -> Self {
        match self {
            PlaybackState::Idle => PlaybackState::Idle,
            PlaybackState::Playing(_) => PlaybackState::Playing(index),
            PlaybackState::Paused(_) => PlaybackState::Paused(index),
        }
    }
}

/// A dismissable message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub message: String,
    pub link: Option<NoticeLink>,
}
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoticeLink {
    pub label: String,
    pub url: String,
}
impl Notice {
    pub const UNPLAYABLE_TITLE: &str = "This song can't be played here";

    /// Shown when a song that isn't free is played. The link is labelled
    /// with the song's title; there's no link when the song has nowhere to go.
    pub fn unplayable(song_title: &str, url: String) -> Self {
        let message = if url.is_empty() {
            "There's nowhere else to listen to it."
        } else {
            "It can be heard on the streaming site:"
        };
        Self {
            title: Self::UNPLAYABLE_TITLE.to_string(),
            message: message.to_string(),
            link: (!url.is_empty()).then(|| NoticeLink {
                label: song_title.to_string(),
                url,
            }),
        }
    }

    pub fn details_unavailable(title: &str) -> Self {
        Self {
            title: title.to_string(),
            message: "Song details aren't available yet.".to_string(),
            link: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppStateError {
    InitialFetchFailed { error: String },
    PlaybackFailed { title: String, error: String },
}
impl AppStateError {
    /// Should be paired with [`Self::display_message`]
    pub fn display_name(&self) -> &'static str {
        match self {
            AppStateError::InitialFetchFailed { .. } => "Failed to load the song list",
            AppStateError::PlaybackFailed { .. } => "Failed to play song",
        }
    }

    /// Should be paired with [`Self::display_name`]
    pub fn display_message(&self) -> String {
        match self {
            AppStateError::InitialFetchFailed { error } => error.clone(),
            AppStateError::PlaybackFailed { title, error } => format!("`{title}`: {error}"),
        }
    }

    /// Whether the app can't do anything useful until restarted.
    pub fn is_fatal(&self) -> bool {
        matches!(self, AppStateError::InitialFetchFailed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_index_keeps_state() {
        assert_eq!(
            PlaybackState::Playing(3).with_index(1),
            PlaybackState::Playing(1)
        );
        assert_eq!(
            PlaybackState::Paused(3).with_index(0),
            PlaybackState::Paused(0)
        );
        assert_eq!(PlaybackState::Idle.with_index(2), PlaybackState::Idle);
    }

    #[test]
    fn test_unplayable_notice_link() {
        let notice = Notice::unplayable("Song", "https://example.com".to_string());
        assert_eq!(notice.title, "This song can't be played here");
        let link = notice.link.unwrap();
        assert_eq!(link.label, "Song");
        assert_eq!(link.url, "https://example.com");

        let notice = Notice::unplayable("Song", String::new());
        assert_eq!(notice.title, Notice::UNPLAYABLE_TITLE);
        assert!(notice.link.is_none());
    }
}
