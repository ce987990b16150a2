use ratatui::layout::{Constraint, Direction, Layout, Rect};

// ── Main vertical layout ────────────────────────────────────────────────────

pub const NOW_PLAYING_HEIGHT: u16 = 2;
pub const SCRUB_BAR_HEIGHT: u16 = 1;
pub const FILTER_BAR_HEIGHT: u16 = 1;
pub const CONTENT_MIN_HEIGHT: u16 = 3;
pub const PAGE_BAR_HEIGHT: u16 = 1;
pub const HELP_BAR_HEIGHT: u16 = 1;

pub struct MainLayout {
    pub now_playing: Rect,
    pub scrub_bar: Rect,
    pub filters: Rect,
    pub content: Rect,
    pub pages: Rect,
    pub help_bar: Rect,
}

pub fn split_main(area: Rect) -> MainLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(NOW_PLAYING_HEIGHT),
            Constraint::Length(SCRUB_BAR_HEIGHT),
            Constraint::Length(FILTER_BAR_HEIGHT),
            Constraint::Min(CONTENT_MIN_HEIGHT),
            Constraint::Length(PAGE_BAR_HEIGHT),
            Constraint::Length(HELP_BAR_HEIGHT),
        ])
        .split(area);
    MainLayout {
        now_playing: chunks[0],
        scrub_bar: chunks[1],
        filters: chunks[2],
        content: chunks[3],
        pages: chunks[4],
        help_bar: chunks[5],
    }
}

// ── Filter bar ──────────────────────────────────────────────────────────────

pub struct FilterLayout {
    pub singer: Rect,
    pub score: Rect,
}

pub fn split_filters(area: Rect) -> FilterLayout {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Fill(1), Constraint::Fill(1)])
        .split(area);
    FilterLayout {
        singer: chunks[0],
        score: chunks[1],
    }
}

// ── Song table ──────────────────────────────────────────────────────────────

pub const RANK_WIDTH: u16 = 5;
pub const SCORE_WIDTH: u16 = 7;
pub const TABLE_HEADER_HEIGHT: u16 = 1;

pub struct SongColumns {
    pub rank: Rect,
    pub title: Rect,
    pub singer: Rect,
    pub score: Rect,
}

pub fn split_song_columns(row: Rect) -> SongColumns {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(RANK_WIDTH),
            Constraint::Fill(3),
            Constraint::Fill(2),
            Constraint::Length(SCORE_WIDTH),
        ])
        .split(row);
    SongColumns {
        rank: chunks[0],
        title: chunks[1],
        singer: chunks[2],
        score: chunks[3],
    }
}

/// The area inside the song table's border.
pub fn song_table_inner(content: Rect) -> Rect {
    Rect::new(
        content.x.saturating_add(1),
        content.y.saturating_add(1),
        content.width.saturating_sub(2),
        content.height.saturating_sub(2),
    )
}

/// The row on the current page under `(x, y)`, if any.
pub fn row_at(content: Rect, x: u16, y: u16) -> Option<usize> {
    let inner = song_table_inner(content);
    let first_row_y = inner.y + TABLE_HEADER_HEIGHT;
    if !contains(inner, x, y) || y < first_row_y {
        return None;
    }
    Some((y - first_row_y) as usize)
}

/// Whether `x` falls in the rank column, which doubles as the play cell.
pub fn is_play_cell(content: Rect, x: u16) -> bool {
    let inner = song_table_inner(content);
    x >= inner.x && x < inner.x + RANK_WIDTH.min(inner.width)
}

// ── Overlays ────────────────────────────────────────────────────────────────

pub const PICKER_WIDTH: u16 = 36;
pub const PICKER_MAX_HEIGHT: u16 = 18;
pub const NOTICE_WIDTH: u16 = 64;
pub const NOTICE_HEIGHT: u16 = 8;

/// A `width` x `height` rect centred in `area`, shrunk to fit.
pub fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

pub fn picker_rect(area: Rect, option_count: usize) -> Rect {
    // Options plus the border.
    let height = (option_count as u16).saturating_add(2).min(PICKER_MAX_HEIGHT);
    centered_rect(area, PICKER_WIDTH, height)
}

pub fn notice_rect(area: Rect) -> Rect {
    centered_rect(area, NOTICE_WIDTH, NOTICE_HEIGHT)
}

// ── Logs ────────────────────────────────────────────────────────────────────

pub const LOG_TARGET_WIDTH: usize = 24;
pub const LOG_TARGET_SUFFIX_LEN: usize = 21;

// ── Misc ────────────────────────────────────────────────────────────────────

pub const PAGE_SCROLL_SIZE: usize = 10;
pub const SEEK_STEP_SECS: i64 = 5;
pub const VOLUME_STEP: f32 = 0.05;

pub fn contains(rect: Rect, x: u16, y: u16) -> bool {
    x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
}
