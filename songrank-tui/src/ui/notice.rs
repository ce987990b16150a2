use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use songrank_core::{AppStateError, Notice};

use super::{ACCENT_COLOR, MUTED_COLOR, TEXT_COLOR, layout};

pub fn draw_notice(frame: &mut Frame, notice: &Notice, size: Rect) {
    let area = layout::notice_rect(size);
    frame.render_widget(Clear, area);

    let mut lines = vec![
        Line::from(Span::styled(
            notice.message.clone(),
            Style::default().fg(TEXT_COLOR),
        )),
        Line::default(),
    ];
    if let Some(link) = &notice.link {
        lines.push(Line::from(vec![
            Span::styled(format!("{}: ", link.label), Style::default().fg(MUTED_COLOR)),
            Span::styled(
                link.url.clone(),
                Style::default()
                    .fg(ACCENT_COLOR)
                    .add_modifier(Modifier::UNDERLINED),
            ),
        ]));
    }

    let block = Block::default()
        .title(format!(" {} ", notice.title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(ACCENT_COLOR));
    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false }),
        area,
    );
}

/// Covers everything; there's nothing to do but quit.
pub fn draw_error(frame: &mut Frame, error: &AppStateError, size: Rect) {
    let area = layout::notice_rect(size);
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(Span::styled(
            error.display_message(),
            Style::default().fg(TEXT_COLOR),
        )),
        Line::default(),
        Line::from(Span::styled(
            "Press q to quit.",
            Style::default().fg(MUTED_COLOR),
        )),
    ];
    let block = Block::default()
        .title(format!(" {} ", error.display_name()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));
    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false }),
        area,
    );
}
