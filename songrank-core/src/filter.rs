use std::cmp::Ordering;

use songrank_state::{ScoreBucket, Song};

/// The active singer and score filters. `None` means "all".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SongFilter {
    pub singer: Option<String>,
    pub score: Option<ScoreBucket>,
}
impl SongFilter {
    pub fn is_empty(&self) -> bool {
        self.singer.is_none() && self.score.is_none()
    }

    pub fn matches(&self, song: &Song) -> bool {
        let singer_ok = self
            .singer
            .as_deref()
            .is_none_or(|singer| song.has_singer(singer));
        let score_ok = self
            .score
            .as_ref()
            .is_none_or(|bucket| bucket.contains(song.score));
        singer_ok && score_ok
    }

    /// Indices into `songs` of the matching songs, highest score first.
    ///
    /// The sort is stable, so equal scores keep file order. Songs without a
    /// numeric score go last.
    pub fn apply(&self, songs: &[Song]) -> Vec<usize> {
        let mut indices: Vec<usize> = songs
            .iter()
            .enumerate()
            .filter(|(_, song)| self.matches(song))
            .map(|(i, _)| i)
            .collect();
        indices.sort_by(|&a, &b| by_score_descending(songs[a].score, songs[b].score));
        indices
    }
}

fn by_score_descending(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn song(title: &str, singer: &str, score: f64) -> Song {
        Song {
            title: title.to_string(),
            singer: singer.to_string(),
            score,
            ..Song::default()
        }
    }

    fn titles(songs: &[Song], indices: &[usize]) -> Vec<String> {
        indices.iter().map(|&i| songs[i].title.clone()).collect()
    }

    #[test]
    fn test_no_filter_sorts_descending_and_stable() {
        let songs = [
            song("a", "X", 7.0),
            song("b", "X", 9.0),
            song("c", "X", 7.0),
            song("d", "X", 8.0),
        ];
        let indices = SongFilter::default().apply(&songs);
        assert_eq!(titles(&songs, &indices), ["b", "d", "a", "c"]);
    }

    #[test]
    fn test_nan_scores_sort_last() {
        let songs = [
            song("nan1", "X", f64::NAN),
            song("low", "X", 1.0),
            song("nan2", "X", f64::NAN),
            song("high", "X", 9.0),
        ];
        let indices = SongFilter::default().apply(&songs);
        assert_eq!(titles(&songs, &indices), ["high", "low", "nan1", "nan2"]);
    }

    #[test]
    fn test_singer_filter_matches_members() {
        let songs = [
            song("a", "G:M1|M2", 5.0),
            song("b", "M1", 6.0),
            song("c", "M3", 7.0),
            song("d", "M10", 8.0),
        ];
        let filter = SongFilter {
            singer: Some("M1".to_string()),
            score: None,
        };
        assert_eq!(titles(&songs, &filter.apply(&songs)), ["b", "a"]);

        let filter = SongFilter {
            singer: Some("G".to_string()),
            score: None,
        };
        assert_eq!(titles(&songs, &filter.apply(&songs)), ["a"]);
    }

    #[test]
    fn test_score_filter_combines_with_singer() {
        let songs = [
            song("a", "X", 9.5),
            song("b", "Y", 9.1),
            song("c", "X", 8.5),
            song("d", "X", f64::NAN),
        ];
        let filter = SongFilter {
            singer: Some("X".to_string()),
            score: Some(ScoreBucket::parse("9-10")),
        };
        // NaN scores are never excluded by a bucket.
        assert_eq!(titles(&songs, &filter.apply(&songs)), ["a", "d"]);
    }

    #[test]
    fn test_null_score_filters_as_zero() {
        let songs: Vec<Song> = serde_json::from_str(
            r#"[{"title":"null","score":null},{"title":"missing"},{"title":"seven","score":7.2}]"#,
        )
        .unwrap();
        let by_bucket = |label: &str| {
            let filter = SongFilter {
                singer: None,
                score: Some(ScoreBucket::parse(label)),
            };
            titles(&songs, &filter.apply(&songs))
        };
        assert_eq!(by_bucket("9-10"), ["missing"]);
        assert_eq!(by_bucket("7-8"), ["seven", "missing"]);
        assert_eq!(by_bucket("0-5"), ["null", "missing"]);
        assert_eq!(
            titles(&songs, &SongFilter::default().apply(&songs)),
            ["seven", "null", "missing"]
        );
    }

    #[test]
    fn test_result_is_subset_and_sorted() {
        let songs: Vec<Song> = (0..40)
            .map(|i| song(&i.to_string(), if i % 3 == 0 { "A" } else { "B" }, (i * 7 % 11) as f64))
            .collect();
        for bucket in ScoreBucket::presets() {
            let filter = SongFilter {
                singer: Some("A".to_string()),
                score: Some(bucket),
            };
            let indices = filter.apply(&songs);
            assert!(indices.iter().all(|&i| filter.matches(&songs[i])));
            assert!(
                indices
                    .windows(2)
                    .all(|w| songs[w[0]].score >= songs[w[1]].score)
            );
            let expected = songs.iter().filter(|s| filter.matches(s)).count();
            assert_eq!(indices.len(), expected);
        }
    }
}
