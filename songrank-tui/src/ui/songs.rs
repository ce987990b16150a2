use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use songrank_core::{SongRow, ViewSnapshot};

use super::{
    ACCENT_COLOR, HIGHLIGHT_BG, MUTED_COLOR, TEXT_COLOR, TOP3_COLOR, fit, layout, score_color,
};
use crate::{app::App, keys::Action};

pub fn draw(frame: &mut Frame, app: &App, view: &ViewSnapshot, area: Rect) {
    let title = if view.has_loaded {
        format!(" Songs ({}) ", view.total_songs)
    } else {
        " Songs ".to_string()
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(MUTED_COLOR));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if !view.has_loaded {
        let loading = if view.error.is_some() {
            "Couldn't load songs"
        } else {
            "Loading songs\u{2026}"
        };
        frame.render_widget(
            Paragraph::new(loading).style(Style::default().fg(MUTED_COLOR)),
            inner,
        );
        return;
    }
    if view.no_results {
        frame.render_widget(
            Paragraph::new("No songs match these filters. Press r to reset them.")
                .style(Style::default().fg(MUTED_COLOR)),
            inner,
        );
        return;
    }

    let mut lines = vec![header_line(inner)];
    for (i, row) in view.rows.iter().enumerate() {
        let hovered = app.mouse_position.is_some_and(|(x, y)| {
            layout::row_at(area, x, y) == Some(i)
        });
        lines.push(row_line(row, inner, i == app.selected_row, hovered));
    }
    frame.render_widget(Paragraph::new(lines), inner);
}

fn header_line(inner: Rect) -> Line<'static> {
    let columns = layout::split_song_columns(inner);
    let style = Style::default().fg(MUTED_COLOR);
    Line::from(vec![
        Span::styled(fit("#", columns.rank.width as usize), style),
        Span::styled(fit("Title", columns.title.width as usize), style),
        Span::styled(fit("Singer", columns.singer.width as usize), style),
        Span::styled(fit("Score", columns.score.width as usize), style),
    ])
}

fn row_line(row: &SongRow, inner: Rect, selected: bool, hovered: bool) -> Line<'static> {
    let columns = layout::split_song_columns(inner);

    let rank_style = if row.is_top3 {
        Style::default().fg(TOP3_COLOR).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(MUTED_COLOR)
    };
    let mut title_style = Style::default().fg(if row.is_current {
        ACCENT_COLOR
    } else {
        TEXT_COLOR
    });
    if row.is_current {
        title_style = title_style.add_modifier(Modifier::BOLD);
    }
    if hovered {
        title_style = title_style.add_modifier(Modifier::UNDERLINED);
    }
    if !row.free {
        title_style = title_style.add_modifier(Modifier::ITALIC);
    }

    let score = if row.score.is_nan() {
        "-".to_string()
    } else {
        format!("{:.1}", row.score)
    };
    let marker = if row.is_current { "\u{266A}" } else { "" };

    let mut line = Line::from(vec![
        Span::styled(
            fit(&format!("{}{marker}", row.rank), columns.rank.width as usize),
            rank_style,
        ),
        Span::styled(fit(&row.title, columns.title.width as usize), title_style),
        Span::styled(
            fit(&row.singer, columns.singer.width as usize),
            Style::default().fg(TEXT_COLOR),
        ),
        Span::styled(
            fit(&score, columns.score.width as usize),
            Style::default().fg(score_color(row.score_class)),
        ),
    ]);
    if selected {
        line = line.style(Style::default().bg(HIGHLIGHT_BG));
    }
    line
}

pub fn handle_key(app: &mut App, action: Action) {
    let row_count = app.row_count();
    match action {
        Action::Quit => app.should_quit = true,
        Action::PlayPause => app.logic.toggle_current(),
        Action::Next => app.logic.next(),
        Action::Previous => app.logic.previous(),
        Action::NextPage => {
            app.logic.next_page();
            app.selected_row = 0;
        }
        Action::PreviousPage => {
            app.logic.previous_page();
            app.selected_row = 0;
        }
        Action::GotoPage(page) => {
            app.logic.goto_page(page);
            app.clamp_selection();
        }
        Action::SingerFilter => app.open_singer_picker(),
        Action::ScoreFilter => app.open_score_picker(),
        Action::ResetFilters => {
            app.logic.reset_filters();
            app.selected_row = 0;
        }
        Action::Details => app.show_details_selected(),
        Action::Logs => app.toggle_logs(),
        Action::SeekForward => app.seek_relative(layout::SEEK_STEP_SECS),
        Action::SeekBackward => app.seek_relative(-layout::SEEK_STEP_SECS),
        Action::VolumeUp => app.adjust_volume(layout::VOLUME_STEP),
        Action::VolumeDown => app.adjust_volume(-layout::VOLUME_STEP),
        Action::MoveUp => {
            if app.selected_row == 0 {
                // Walk onto the previous page's last row.
                if app.logic.current_page() > 1 {
                    app.logic.previous_page();
                    app.selected_row = app.row_count().saturating_sub(1);
                }
            } else {
                app.selected_row -= 1;
            }
        }
        Action::MoveDown => {
            if app.selected_row + 1 < row_count {
                app.selected_row += 1;
            } else if app.logic.current_page() < app.logic.total_pages() {
                app.logic.next_page();
                app.selected_row = 0;
            }
        }
        Action::GotoTop => {
            app.logic.goto_page(1);
            app.selected_row = 0;
        }
        Action::GotoBottom => {
            app.logic.goto_page(app.logic.total_pages());
            app.selected_row = app.row_count().saturating_sub(1);
        }
        Action::Select => app.play_selected(),
        Action::Back => app.logic.dismiss_notice(),
        Action::PageUp | Action::PageDown => {}
    }
}

/// Selects the clicked row, and plays it if the click landed on its rank.
pub fn handle_mouse_click(app: &mut App, area: Rect, x: u16, y: u16) {
    let Some(row) = layout::row_at(area, x, y) else {
        return;
    };
    if row >= app.row_count() {
        return;
    }
    app.selected_row = row;
    if layout::is_play_cell(area, x) {
        app.play_selected();
    }
}
