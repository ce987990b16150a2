mod app;
mod config;
mod keys;
mod log_buffer;
mod ui;

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use app::{App, FocusedPanel, ViewCell};
use config::Config;
use keys::Action;
use log_buffer::{LogBuffer, LogBufferLayer};
use songrank_core::{
    self as sc,
    clock::SystemClock,
    output::{AudioOutput, SilentOutput},
};

use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, MouseButton, MouseEvent,
        MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::layout::Rect;
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing_subscriber::{layer::SubscriberExt as _, util::SubscriberInitExt as _};

fn main() -> anyhow::Result<()> {
    // Stdout belongs to the UI, so logs go to the logs panel and a file.
    let log_buffer = LogBuffer::new();

    let log_file = std::fs::File::create("songrank-tui.log")?;
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::sync::Mutex::new(log_file))
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(LogBufferLayer::new(log_buffer.clone()))
        .with(file_layer)
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("songrank=info")),
        )
        .init();

    let config = Config::load();

    let view = ViewCell::default();
    let mut logic = sc::Logic::new(sc::LogicArgs {
        source: Some(sc::DataSource::parse(&config.library.source)),
        output: build_output(&config),
        renderer: Box::new(view.clone()),
        clock: Arc::new(SystemClock),
        settings: config.player.settings(),
    })?;
    logic.set_volume(config.player.volume);
    logic.set_filter(config.last_filters.as_filter());

    let mut app = App::new(config, logic, view, log_buffer);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let tick_rate = Duration::from_millis(app.config.general.tick_rate_ms);
    let result = run_app(&mut terminal, &mut app, tick_rate);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    app.save_state();

    result
}

#[cfg(feature = "audio")]
fn build_output(config: &Config) -> Box<dyn AudioOutput> {
    match sc::RodioOutput::new(config.player.volume) {
        Ok(output) => Box::new(output),
        Err(e) => {
            tracing::warn!("Failed to start audio output, playing silently: {e}");
            Box::new(SilentOutput::new(Arc::new(SystemClock), None))
        }
    }
}

#[cfg(not(feature = "audio"))]
fn build_output(_config: &Config) -> Box<dyn AudioOutput> {
    tracing::info!("Built without the `audio` feature; playback is silent");
    Box::new(SilentOutput::new(Arc::new(SystemClock), None))
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut App,
    tick_rate: Duration,
) -> anyhow::Result<()> {
    let mut last_tick = Instant::now();

    loop {
        if app.needs_redraw {
            terminal.draw(|frame| ui::draw(frame, app))?;
            app.needs_redraw = false;
        }
        let term_size = terminal.size()?;
        let size = Rect::new(0, 0, term_size.width, term_size.height);

        let timeout = tick_rate.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            // Process the first event, then drain all remaining queued events.
            let process_event = |evt: Event, app: &mut App| match evt {
                Event::Key(key) if key.kind == event::KeyEventKind::Press => {
                    handle_key_event(app, &key);
                    app.needs_redraw = true;
                }
                Event::Mouse(mouse) => {
                    handle_mouse_event(app, &mouse, size);
                    app.needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    app.needs_redraw = true;
                }
                _ => {}
            };

            process_event(event::read()?, app);
            while event::poll(Duration::ZERO)? {
                process_event(event::read()?, app);
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.tick();
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key_event(app: &mut App, key: &event::KeyEvent) {
    let view = app.view.latest();

    // A failed load blocks everything but quitting.
    if view
        .as_ref()
        .and_then(|v| v.error.as_ref())
        .is_some_and(|e| e.is_fatal())
    {
        if keys::notice_action(key) == Action::Quit {
            app.should_quit = true;
        }
        return;
    }

    if view.as_ref().is_some_and(|v| v.notice.is_some()) {
        match keys::notice_action(key) {
            Action::Quit => app.should_quit = true,
            _ => app.logic.dismiss_notice(),
        }
        return;
    }

    if app.picker.is_some() {
        if let Some(action) = keys::picker_action(key) {
            ui::filters::handle_key(app, action);
        }
        return;
    }

    match app.focused_panel {
        FocusedPanel::Songs => {
            if let Some(action) = keys::songs_action(key) {
                ui::songs::handle_key(app, action);
            }
        }
        FocusedPanel::Logs => {
            if let Some(action) = keys::logs_action(key)
                && let Some(la) = ui::logs::handle_key(&mut app.logs, action)
            {
                match la {
                    ui::logs::LogsAction::ToggleLogs => app.toggle_logs(),
                    ui::logs::LogsAction::Quit => app.should_quit = true,
                }
            }
        }
    }
}

fn handle_mouse_event(app: &mut App, mouse: &MouseEvent, size: Rect) {
    let main = ui::layout::split_main(size);
    let x = mouse.column;
    let y = mouse.row;

    let view = app.view.latest();
    let blocked = view
        .as_ref()
        .and_then(|v| v.error.as_ref())
        .is_some_and(|e| e.is_fatal());
    if blocked {
        return;
    }
    let has_notice = view.as_ref().is_some_and(|v| v.notice.is_some());

    match mouse.kind {
        MouseEventKind::Moved => {
            app.mouse_position = Some((x, y));
        }
        MouseEventKind::Down(MouseButton::Left) => {
            app.mouse_position = Some((x, y));

            // --- Overlays (on top of everything) ---
            if has_notice {
                app.logic.dismiss_notice();
                return;
            }
            if app.picker.is_some() {
                ui::filters::handle_picker_click(app, size, x, y);
                return;
            }

            if ui::layout::contains(main.scrub_bar, x, y) {
                ui::handle_scrub_click(app, main.scrub_bar, x);
            } else if ui::layout::contains(main.filters, x, y) {
                ui::filters::handle_bar_click(app, main.filters, x, y);
            } else if app.focused_panel == FocusedPanel::Songs {
                if ui::layout::contains(main.content, x, y) {
                    ui::songs::handle_mouse_click(app, main.content, x, y);
                } else if ui::layout::contains(main.pages, x, y) {
                    ui::pages::handle_mouse_click(app, main.pages, x);
                }
            }
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            if !has_notice && app.picker.is_none() && ui::layout::contains(main.scrub_bar, x, y) {
                ui::handle_scrub_click(app, main.scrub_bar, x);
            }
        }
        MouseEventKind::ScrollUp => scroll(app, -1),
        MouseEventKind::ScrollDown => scroll(app, 1),
        _ => {}
    }
}

fn scroll(app: &mut App, direction: isize) {
    if let Some(picker) = &mut app.picker {
        picker.move_by(direction);
        return;
    }
    match app.focused_panel {
        FocusedPanel::Songs => {
            let action = if direction < 0 {
                Action::MoveUp
            } else {
                Action::MoveDown
            };
            ui::songs::handle_key(app, action);
        }
        FocusedPanel::Logs => app.logs.scroll_by(direction),
    }
}
