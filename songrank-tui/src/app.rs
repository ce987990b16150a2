use std::{cell::RefCell, rc::Rc, time::Duration};

use songrank_core::{self as sc, Renderer, ViewSnapshot};

use crate::{
    config::Config,
    log_buffer::LogBuffer,
    ui::{filters::Picker, logs::LogsState},
};

/// Which panel the UI is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPanel {
    Songs,
    Logs,
}

/// The latest view handed over by the controller.
#[derive(Clone, Default)]
pub struct ViewCell(Rc<RefCell<ViewCellInner>>);
#[derive(Default)]
struct ViewCellInner {
    latest: Option<ViewSnapshot>,
    dirty: bool,
}
impl ViewCell {
    pub fn latest(&self) -> Option<ViewSnapshot> {
        self.0.borrow().latest.clone()
    }

    /// Whether a new view arrived since the last call.
    pub fn take_dirty(&self) -> bool {
        std::mem::take(&mut self.0.borrow_mut().dirty)
    }
}
impl Renderer for ViewCell {
    fn render(&mut self, view: &ViewSnapshot) {
        let mut inner = self.0.borrow_mut();
        inner.latest = Some(view.clone());
        inner.dirty = true;
    }
}

pub struct App {
    pub logic: sc::Logic,
    pub config: Config,
    pub view: ViewCell,

    pub focused_panel: FocusedPanel,
    pub picker: Option<Picker>,
    /// Highlighted row on the current page.
    pub selected_row: usize,
    pub volume: f32,
    pub should_quit: bool,
    pub needs_redraw: bool,
    pub mouse_position: Option<(u16, u16)>,

    pub logs: LogsState,
}

impl App {
    pub fn new(config: Config, logic: sc::Logic, view: ViewCell, log_buffer: LogBuffer) -> Self {
        let volume = config.player.volume;
        Self {
            logic,
            config,
            view,

            focused_panel: FocusedPanel::Songs,
            picker: None,
            selected_row: 0,
            volume,
            should_quit: false,
            needs_redraw: true,
            mouse_position: None,

            logs: LogsState::new(log_buffer),
        }
    }

    pub fn tick(&mut self) {
        self.logic.update();
        if self.view.take_dirty() {
            self.clamp_selection();
            self.needs_redraw = true;
        }
        // New log lines don't go through the view.
        if self.focused_panel == FocusedPanel::Logs {
            self.needs_redraw = true;
        }
    }

    pub fn row_count(&self) -> usize {
        self.view.latest().map_or(0, |view| view.rows.len())
    }

    pub fn clamp_selection(&mut self) {
        self.selected_row = self.selected_row.min(self.row_count().saturating_sub(1));
    }

    /// The play/details index of the highlighted row.
    pub fn selected_index(&self) -> Option<usize> {
        let view = self.view.latest()?;
        view.rows.get(self.selected_row).map(|row| row.index)
    }

    pub fn play_selected(&mut self) {
        if let Some(index) = self.selected_index() {
            self.logic.play_song(index);
        }
    }

    pub fn show_details_selected(&mut self) {
        if let Some(index) = self.selected_index() {
            self.logic.show_details(index);
        }
    }

    pub fn toggle_logs(&mut self) {
        if self.focused_panel == FocusedPanel::Logs {
            self.focused_panel = FocusedPanel::Songs;
        } else {
            self.focused_panel = FocusedPanel::Logs;
            self.logs.scroll_to_end();
        }
    }

    pub fn open_singer_picker(&mut self) {
        let current = self.logic.filter().singer.as_deref();
        self.picker = Some(Picker::singer(self.logic.singers(), current));
    }

    pub fn open_score_picker(&mut self) {
        let current = self.logic.filter().score.as_ref().map(|b| b.label());
        self.picker = Some(Picker::score(current));
    }

    /// Applies the picker's highlighted choice and closes it.
    pub fn apply_picker(&mut self) {
        let Some(picker) = self.picker.take() else {
            return;
        };
        picker.apply(&mut self.logic);
        self.selected_row = 0;
    }

    pub fn seek_relative(&mut self, seconds: i64) {
        let progress = self.logic.progress();
        let Some(duration) = progress.duration.filter(|d| !d.is_zero()) else {
            return;
        };
        let delta = Duration::from_secs(seconds.unsigned_abs());
        let target = if seconds > 0 {
            progress.position + delta
        } else {
            progress.position.saturating_sub(delta)
        };
        self.logic
            .seek_fraction(target.as_secs_f64() / duration.as_secs_f64());
    }

    pub fn adjust_volume(&mut self, delta: f32) {
        self.volume = (self.volume + delta).clamp(0.0, 1.0);
        self.logic.set_volume(self.volume);
    }

    pub fn save_state(&self) {
        let mut config = self.config.clone();
        config.player.volume = self.volume;
        config.last_filters = self.logic.filter().into();
        config.save();
    }
}
