pub(crate) mod filters;
pub(crate) mod layout;
pub(crate) mod logs;
pub(crate) mod notice;
pub(crate) mod now_playing;
pub(crate) mod pages;
pub(crate) mod songs;

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Gauge, Paragraph},
};
use songrank_core::ViewSnapshot;
use unicode_width::{UnicodeWidthChar as _, UnicodeWidthStr as _};

use crate::{
    app::{App, FocusedPanel},
    keys,
};

// ── Colours ─────────────────────────────────────────────────────────────────

pub const TEXT_COLOR: Color = Color::Gray;
pub const MUTED_COLOR: Color = Color::DarkGray;
pub const ACCENT_COLOR: Color = Color::Rgb(0xef, 0x5b, 0x7b);
pub const TOP3_COLOR: Color = Color::Rgb(0xf5, 0xc2, 0x42);
pub const HIGHLIGHT_BG: Color = Color::Rgb(0x30, 0x30, 0x3a);

/// Colour for a whole-number score band.
pub fn score_color(score_class: Option<i64>) -> Color {
    match score_class {
        Some(c) if c >= 9 => Color::Rgb(0x4c, 0xd9, 0x64),
        Some(8) => Color::Rgb(0x8b, 0xd4, 0x50),
        Some(7) => Color::Rgb(0xd4, 0xc8, 0x50),
        Some(6) => Color::Rgb(0xe8, 0x9c, 0x3c),
        Some(_) => Color::Rgb(0xe0, 0x5a, 0x47),
        None => MUTED_COLOR,
    }
}

/// Truncates `s` to `width` display columns, marking the cut with an
/// ellipsis, and pads it out to exactly `width`.
pub fn fit(s: &str, width: usize) -> String {
    if s.width() <= width {
        let padding = width - s.width();
        return format!("{s}{}", " ".repeat(padding));
    }
    if width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > width - 1 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('\u{2026}');
    used += 1;
    out.push_str(&" ".repeat(width.saturating_sub(used)));
    out
}

pub fn draw(frame: &mut Frame, app: &mut App) {
    let size = frame.area();
    let Some(view) = app.view.latest() else {
        return;
    };

    let main = layout::split_main(size);

    now_playing::draw(frame, &view, main.now_playing);
    draw_scrub_bar(frame, app, &view, main.scrub_bar);
    filters::draw_bar(frame, &view, main.filters);

    match app.focused_panel {
        FocusedPanel::Songs => {
            songs::draw(frame, app, &view, main.content);
            pages::draw(frame, &view, main.pages);
        }
        FocusedPanel::Logs => logs::draw(frame, &mut app.logs, main.content),
    }

    draw_help_bar(frame, app, &view, main.help_bar);

    if let Some(picker) = &app.picker {
        filters::draw_picker(frame, picker, size);
    }
    if let Some(notice) = &view.notice {
        notice::draw_notice(frame, notice, size);
    }
    if let Some(error) = view.error.as_ref().filter(|e| e.is_fatal()) {
        notice::draw_error(frame, error, size);
    }
}

fn draw_scrub_bar(frame: &mut Frame, app: &App, view: &ViewSnapshot, area: Rect) {
    let (label, ratio) = match &view.now_playing {
        Some(np) => (
            format!(" {} / {} ", np.position_text, np.duration_text),
            np.percent / 100.0,
        ),
        None => (" 0:00 / 0:00 ".to_string(), 0.0),
    };
    let label = format!("{label} vol {:3.0}% ", app.volume * 100.0);

    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(ACCENT_COLOR).bg(HIGHLIGHT_BG))
        .ratio(ratio.clamp(0.0, 1.0))
        .label(label);
    frame.render_widget(gauge, area);
}

/// Seeks to the clicked position on the scrub bar.
pub fn handle_scrub_click(app: &mut App, area: Rect, x: u16) {
    app.logic
        .seek_at(x as f64, area.x as f64, area.width as f64);
}

fn draw_help_bar(frame: &mut Frame, app: &App, view: &ViewSnapshot, area: Rect) {
    let help_actions: &[keys::Action] = if view.notice.is_some() {
        keys::NOTICE_HELP
    } else if app.picker.is_some() {
        keys::PICKER_HELP
    } else {
        match app.focused_panel {
            FocusedPanel::Songs => keys::SONGS_HELP,
            FocusedPanel::Logs => keys::LOGS_HELP,
        }
    };
    let is_playing = view
        .now_playing
        .as_ref()
        .is_some_and(|np| np.state.is_playing());

    let mut spans: Vec<Span> = vec![Span::raw(" ")];
    for action in help_actions {
        if let Some((key, label)) = action.help_label(is_playing) {
            spans.push(Span::styled(
                String::from(key),
                Style::default()
                    .fg(ACCENT_COLOR)
                    .add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::styled(
                format!(":{label} "),
                Style::default().fg(TEXT_COLOR),
            ));
        }
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
