use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
};
use songrank_core::{Logic, ViewSnapshot, songrank_state::ScoreBucket};

use super::{ACCENT_COLOR, HIGHLIGHT_BG, MUTED_COLOR, TEXT_COLOR, layout};
use crate::{app::App, keys::Action};

const ALL: &str = "All";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerKind {
    Singer,
    Score,
}

/// A dropdown for one of the filters. The first option is always "All".
#[derive(Debug, Clone, PartialEq)]
pub struct Picker {
    pub kind: PickerKind,
    pub options: Vec<String>,
    pub selected: usize,
}
impl Picker {
    pub fn singer(singers: &[String], current: Option<&str>) -> Self {
        Self::new(PickerKind::Singer, singers.iter().cloned(), current)
    }

    pub fn score(current: Option<&str>) -> Self {
        Self::new(
            PickerKind::Score,
            ScoreBucket::PRESETS.iter().map(|s| s.to_string()),
            current,
        )
    }

    fn new(kind: PickerKind, choices: impl Iterator<Item = String>, current: Option<&str>) -> Self {
        let options: Vec<String> = std::iter::once(ALL.to_string()).chain(choices).collect();
        let selected = current
            .and_then(|current| options.iter().skip(1).position(|o| o == current))
            .map_or(0, |i| i + 1);
        Self {
            kind,
            options,
            selected,
        }
    }

    pub fn title(&self) -> &'static str {
        match self.kind {
            PickerKind::Singer => " Singer ",
            PickerKind::Score => " Score ",
        }
    }

    /// The highlighted choice; `None` for "All".
    pub fn choice(&self) -> Option<&str> {
        (self.selected > 0)
            .then(|| self.options.get(self.selected))
            .flatten()
            .map(String::as_str)
    }

    pub fn apply(&self, logic: &mut Logic) {
        let choice = self.choice().map(str::to_string);
        match self.kind {
            PickerKind::Singer => logic.set_singer_filter(choice),
            PickerKind::Score => logic.set_score_filter(choice.as_deref().map(ScoreBucket::parse)),
        }
    }

    pub fn move_by(&mut self, delta: isize) {
        let last = self.options.len().saturating_sub(1);
        self.selected = self.selected.saturating_add_signed(delta).min(last);
    }
}

pub fn draw_bar(frame: &mut Frame, view: &ViewSnapshot, area: Rect) {
    let bar = layout::split_filters(area);
    let filter_line = |name: &str, value: Option<&str>| {
        let value_style = match value {
            Some(_) => Style::default().fg(ACCENT_COLOR).add_modifier(Modifier::BOLD),
            None => Style::default().fg(TEXT_COLOR),
        };
        Line::from(vec![
            Span::styled(format!(" {name}: "), Style::default().fg(MUTED_COLOR)),
            Span::styled(format!("[{} \u{25be}]", value.unwrap_or(ALL)), value_style),
        ])
    };
    frame.render_widget(
        Paragraph::new(filter_line("Singer", view.filters.singer.as_deref())),
        bar.singer,
    );
    frame.render_widget(
        Paragraph::new(filter_line("Score", view.filters.score.as_deref())),
        bar.score,
    );
}

pub fn draw_picker(frame: &mut Frame, picker: &Picker, size: Rect) {
    let area = layout::picker_rect(size, picker.options.len());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(picker.title())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(ACCENT_COLOR));
    let items: Vec<ListItem> = picker
        .options
        .iter()
        .map(|option| ListItem::new(option.as_str()).style(Style::default().fg(TEXT_COLOR)))
        .collect();
    let list = List::new(items).block(block).highlight_style(
        Style::default()
            .bg(HIGHLIGHT_BG)
            .fg(ACCENT_COLOR)
            .add_modifier(Modifier::BOLD),
    );

    let mut state = ListState::default();
    state.select(Some(picker.selected));
    frame.render_stateful_widget(list, area, &mut state);
}

pub fn handle_key(app: &mut App, action: Action) {
    let Some(picker) = &mut app.picker else {
        return;
    };
    match action {
        Action::MoveUp => picker.move_by(-1),
        Action::MoveDown => picker.move_by(1),
        Action::PageUp => picker.move_by(-(layout::PAGE_SCROLL_SIZE as isize)),
        Action::PageDown => picker.move_by(layout::PAGE_SCROLL_SIZE as isize),
        Action::GotoTop => picker.selected = 0,
        Action::GotoBottom => picker.move_by(isize::MAX),
        Action::Select => app.apply_picker(),
        Action::Back => app.picker = None,
        _ => {}
    }
}

/// Opens the picker for the clicked filter.
pub fn handle_bar_click(app: &mut App, area: Rect, x: u16, y: u16) {
    let bar = layout::split_filters(area);
    if layout::contains(bar.singer, x, y) {
        app.open_singer_picker();
    } else if layout::contains(bar.score, x, y) {
        app.open_score_picker();
    }
}

/// Picks the clicked option. Clicking outside the picker closes it.
pub fn handle_picker_click(app: &mut App, size: Rect, x: u16, y: u16) {
    let Some(picker) = &mut app.picker else {
        return;
    };
    let area = layout::picker_rect(size, picker.options.len());
    let inner = Rect::new(
        area.x + 1,
        area.y + 1,
        area.width.saturating_sub(2),
        area.height.saturating_sub(2),
    );
    if !layout::contains(area, x, y) {
        app.picker = None;
        return;
    }
    if !layout::contains(inner, x, y) {
        return;
    }

    // The list scrolls to keep the selection visible.
    let visible = inner.height as usize;
    let offset = (picker.selected + 1).saturating_sub(visible);
    let index = offset + (y - inner.y) as usize;
    if index < picker.options.len() {
        picker.selected = index;
        app.apply_picker();
    }
}
