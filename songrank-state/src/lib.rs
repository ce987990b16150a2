//! Representations of songrank's records, along with the pure rules that
//! apply to a single record: singer extraction, URL resolution and score
//! buckets.
//!
//! Separated out to allow for use in other utilities.
#![deny(missing_docs)]

mod bucket;
pub use bucket::ScoreBucket;

mod number;
pub use number::parse_number;

mod singer;
pub use singer::{distinct_singers, extract_singers, primary_singer};

mod song;
pub use song::Song;

mod url;
pub use url::{OUTER_STREAM_URL, SONG_PAGE_URL, STREAM_ID_PREFIX, song_url};
