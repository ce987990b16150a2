//! The headless half of songrank: the song library, the filter and page
//! view over it, and the playback controller that drives an audio output.
//!
//! Everything the user sees is produced as a [`ViewSnapshot`] and handed to
//! a [`Renderer`], so the whole controller can be driven without a terminal.

pub mod clock;
pub mod output;
pub mod pagination;
pub mod timer;
pub mod util;

mod app_state;
pub use app_state::{AppStateError, Notice, NoticeLink, PlaybackState};

mod filter;
pub use filter::SongFilter;

mod library;
pub use library::{DataSource, Library, LoadError};

mod logic;
pub use logic::{Logic, LogicArgs, PlayerSettings, Progress};

mod render;
pub use render::{
    FilterView, NowPlaying, NullRenderer, RecordingRenderer, Renderer, SongRow, ViewSnapshot,
};

#[cfg(feature = "audio")]
mod playback_thread;
#[cfg(feature = "audio")]
pub use playback_thread::RodioOutput;

mod tokio_thread;
pub use tokio_thread::TokioThread;

pub use songrank_state;
