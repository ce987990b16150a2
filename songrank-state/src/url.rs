/// Prefix marking a `music` field as an external streaming-service track id.
pub const STREAM_ID_PREFIX: &str = "wwy|";

/// Direct audio stream for an external track id.
pub const OUTER_STREAM_URL: &str = "https://music.163.com/song/media/outer/url?id=";

/// Web page for an external track id, for tracks that can't be streamed.
pub const SONG_PAGE_URL: &str = "https://music.163.com/#/song?id=";

/// Number of characters removed from a prefixed `music` field to get the id.
///
/// NOTE: this is longer than [`STREAM_ID_PREFIX`]. The data files were
/// written against this offset, so it is kept as-is even though it looks
/// like an off-by-three.
const STREAM_ID_OFFSET: usize = 7;

/// Resolves a song's `music` field into a URL.
///
/// - An empty field resolves to an empty string (unplayable).
/// - `wwy|...` resolves to the outer stream URL when `free`, the song page
///   otherwise.
/// - Anything else is already a URL and is returned unchanged.
pub fn song_url(music: &str, free: bool) -> String {
    if music.is_empty() {
        return String::new();
    }
    if music.starts_with(STREAM_ID_PREFIX) {
        let id = music
            .char_indices()
            .nth(STREAM_ID_OFFSET)
            .map(|(i, _)| &music[i..])
            .unwrap_or_default();
        let base = if free { OUTER_STREAM_URL } else { SONG_PAGE_URL };
        return format!("{base}{id}");
    }
    music.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_free_stream_id_strips_seven_chars() {
        assert_eq!(
            song_url("wwy|12345678", true),
            "https://music.163.com/song/media/outer/url?id=45678"
        );
    }

    #[test]
    fn test_non_free_stream_id_links_to_page() {
        assert_eq!(
            song_url("wwy|12345678", false),
            "https://music.163.com/#/song?id=45678"
        );
    }

    #[test]
    fn test_short_stream_id() {
        assert_eq!(song_url("wwy|12", true), OUTER_STREAM_URL);
        assert_eq!(song_url("wwy|123", true), OUTER_STREAM_URL);
    }

    #[test]
    fn test_plain_and_empty() {
        assert_eq!(song_url("", true), "");
        assert_eq!(song_url("", false), "");
        assert_eq!(
            song_url("https://example.com/a.mp3", false),
            "https://example.com/a.mp3"
        );
    }
}
