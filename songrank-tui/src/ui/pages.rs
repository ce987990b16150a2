use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};
use songrank_core::{ViewSnapshot, pagination::PaginationView};
use unicode_width::UnicodeWidthStr as _;

use super::{ACCENT_COLOR, MUTED_COLOR, TEXT_COLOR};
use crate::app::App;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageTarget {
    Previous,
    Page(usize),
    Next,
}

/// One clickable label in the page bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageButton {
    pub label: String,
    pub target: PageTarget,
    pub enabled: bool,
    pub current: bool,
}

/// The page bar's buttons, left to right.
pub fn buttons(pagination: &PaginationView) -> Vec<PageButton> {
    let mut buttons = vec![PageButton {
        label: "\u{2039} Prev".to_string(),
        target: PageTarget::Previous,
        enabled: pagination.has_previous,
        current: false,
    }];
    buttons.extend(pagination.pages().map(|page| PageButton {
        label: page.to_string(),
        target: PageTarget::Page(page),
        enabled: true,
        current: page == pagination.current,
    }));
    buttons.push(PageButton {
        label: "Next \u{203a}".to_string(),
        target: PageTarget::Next,
        enabled: pagination.has_next,
        current: false,
    });
    buttons
}

/// Buttons start one column in and are separated by two spaces.
fn button_spans(buttons: &[PageButton]) -> Vec<(u16, u16)> {
    let mut x = 1;
    buttons
        .iter()
        .map(|button| {
            let start = x;
            let end = start + button.label.width() as u16;
            x = end + 2;
            (start, end)
        })
        .collect()
}

pub fn draw(frame: &mut Frame, view: &ViewSnapshot, area: Rect) {
    let Some(pagination) = &view.pagination else {
        return;
    };

    let mut spans = vec![Span::raw(" ")];
    for button in buttons(pagination) {
        let style = if button.current {
            Style::default()
                .fg(ACCENT_COLOR)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED)
        } else if button.enabled {
            Style::default().fg(TEXT_COLOR)
        } else {
            Style::default().fg(MUTED_COLOR)
        };
        spans.push(Span::styled(button.label, style));
        spans.push(Span::raw("  "));
    }
    spans.push(Span::styled(
        pagination.info.clone(),
        Style::default().fg(MUTED_COLOR),
    ));
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// The button under column `x` of the page bar at `area`.
pub fn button_at(pagination: &PaginationView, area: Rect, x: u16) -> Option<PageTarget> {
    let column = x.checked_sub(area.x)?;
    let buttons = buttons(pagination);
    button_spans(&buttons)
        .into_iter()
        .zip(buttons)
        .find(|((start, end), button)| button.enabled && column >= *start && column < *end)
        .map(|(_, button)| button.target)
}

pub fn handle_mouse_click(app: &mut App, area: Rect, x: u16) {
    let Some(pagination) = app.view.latest().and_then(|view| view.pagination) else {
        return;
    };
    match button_at(&pagination, area, x) {
        Some(PageTarget::Previous) => app.logic.previous_page(),
        Some(PageTarget::Next) => app.logic.next_page(),
        Some(PageTarget::Page(page)) => app.logic.goto_page(page),
        None => return,
    }
    app.selected_row = 0;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buttons_for_middle_page() {
        let pagination = PaginationView::new(2, 12).unwrap();
        let buttons = buttons(&pagination);
        let labels: Vec<_> = buttons.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, ["\u{2039} Prev", "1", "2", "3", "Next \u{203a}"]);
        assert!(buttons[2].current);
        assert!(buttons.iter().all(|b| b.enabled));
    }

    #[test]
    fn test_button_at_maps_columns() {
        let area = Rect::new(0, 20, 80, 1);
        let pagination = PaginationView::new(2, 12).unwrap();
        // " ‹ Prev  1  2  3  Next ›"
        assert_eq!(button_at(&pagination, area, 0), None);
        assert_eq!(button_at(&pagination, area, 1), Some(PageTarget::Previous));
        assert_eq!(button_at(&pagination, area, 6), Some(PageTarget::Previous));
        assert_eq!(button_at(&pagination, area, 7), None);
        assert_eq!(button_at(&pagination, area, 9), Some(PageTarget::Page(1)));
        assert_eq!(button_at(&pagination, area, 12), Some(PageTarget::Page(2)));
        assert_eq!(button_at(&pagination, area, 15), Some(PageTarget::Page(3)));
        assert_eq!(button_at(&pagination, area, 18), Some(PageTarget::Next));
    }

    #[test]
    fn test_disabled_buttons_ignore_clicks() {
        let area = Rect::new(0, 0, 80, 1);
        let pagination = PaginationView::new(1, 12).unwrap();
        assert_eq!(button_at(&pagination, area, 1), None);
        assert_eq!(button_at(&pagination, area, 9), Some(PageTarget::Page(1)));
    }
}
