use std::collections::HashSet;

use crate::Song;

/// Splits a raw `singer` field into the names it mentions.
///
/// Two encodings exist in the data:
/// - `"A|B|C"`: a plain list of singers.
/// - `"Group:M1|M2"`: a group followed by its members. The group name comes
///   first, then the members.
///
/// Names are trimmed, empty names are dropped and duplicates keep their first
/// position.
pub fn extract_singers(raw: &str) -> Vec<String> {
    let mut names = Vec::new();
    match raw.split_once(':') {
        Some((group, members)) => {
            names.push(group.trim());
            names.extend(split_names(members));
        }
        None => names.extend(split_names(raw)),
    }

    let mut seen = HashSet::new();
    names
        .into_iter()
        .filter(|name| !name.is_empty() && seen.insert(*name))
        .map(str::to_string)
        .collect()
}

fn split_names(s: &str) -> impl Iterator<Item = &str> {
    s.split('|').map(str::trim).filter(|name| !name.is_empty())
}

/// The part of a raw `singer` field shown in listings: the group name for
/// `"Group:Members"` entries, the whole field otherwise.
pub fn primary_singer(raw: &str) -> &str {
    raw.split(':').next().unwrap_or_default()
}

/// Every singer mentioned across `songs`, without duplicates.
///
/// Sorted by UTF-16 code units so that the ordering matches the one the
/// data files were curated against.
pub fn distinct_singers<'a>(songs: impl IntoIterator<Item = &'a Song>) -> Vec<String> {
    let mut singers: Vec<String> = songs
        .into_iter()
        .flat_map(|song| extract_singers(&song.singer))
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    singers.sort_by(|a, b| a.encode_utf16().cmp(b.encode_utf16()));
    singers
}
