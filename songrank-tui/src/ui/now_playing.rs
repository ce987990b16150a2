use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};
use songrank_core::{AppStateError, PlaybackState, ViewSnapshot};

use super::{ACCENT_COLOR, MUTED_COLOR, TEXT_COLOR};

pub fn draw(frame: &mut Frame, view: &ViewSnapshot, area: Rect) {
    let Some(np) = &view.now_playing else {
        let lines = vec![
            Line::from(Span::styled(
                " Nothing playing",
                Style::default().fg(MUTED_COLOR),
            )),
            Line::from(Span::styled(
                " Pick a song and press enter",
                Style::default().fg(MUTED_COLOR),
            )),
        ];
        frame.render_widget(Paragraph::new(lines), area);
        return;
    };

    let state = if np.is_loading {
        "\u{2026}"
    } else {
        match np.state {
            PlaybackState::Playing(_) => "\u{25b6}",
            PlaybackState::Paused(_) => "\u{23f8}",
            PlaybackState::Idle => "\u{25a0}",
        }
    };

    let title = Line::from(vec![
        Span::styled(format!(" {state} "), Style::default().fg(ACCENT_COLOR)),
        Span::styled(
            np.title.clone(),
            Style::default()
                .fg(TEXT_COLOR)
                .add_modifier(Modifier::BOLD),
        ),
    ]);

    let mut second = vec![Span::styled(
        format!("   {}", np.singer),
        Style::default().fg(MUTED_COLOR),
    )];
    if let Some(error @ AppStateError::PlaybackFailed { .. }) = &view.error {
        second.push(Span::styled(
            format!("  {}: {}", error.display_name(), error.display_message()),
            Style::default().fg(ratatui::style::Color::Red),
        ));
    }

    frame.render_widget(Paragraph::new(vec![title, Line::from(second)]), area);
}
