use crossterm::event::{KeyCode, KeyEvent};
use smol_str::{SmolStr, ToSmolStr};

/// Centrally defined key actions for the TUI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    PlayPause,
    Next,
    Previous,
    NextPage,
    PreviousPage,
    GotoPage(usize),
    SingerFilter,
    ScoreFilter,
    ResetFilters,
    Details,
    Logs,
    SeekForward,
    SeekBackward,
    VolumeUp,
    VolumeDown,
    MoveUp,
    MoveDown,
    PageUp,
    PageDown,
    GotoTop,
    GotoBottom,
    Select,
    Back,
}

// ── Key code constants ───────────────────────────────────────────

pub const KEY_QUIT: KeyCode = KeyCode::Char('q');
pub const KEY_PLAY_PAUSE: KeyCode = KeyCode::Char(' ');
pub const KEY_NEXT: KeyCode = KeyCode::Char('n');
pub const KEY_PREVIOUS: KeyCode = KeyCode::Char('p');
pub const KEY_NEXT_PAGE: KeyCode = KeyCode::Right;
pub const KEY_PREVIOUS_PAGE: KeyCode = KeyCode::Left;
pub const KEY_SINGER_FILTER: KeyCode = KeyCode::Char('s');
pub const KEY_SCORE_FILTER: KeyCode = KeyCode::Char('f');
pub const KEY_RESET_FILTERS: KeyCode = KeyCode::Char('r');
pub const KEY_DETAILS: KeyCode = KeyCode::Char('d');
pub const KEY_LOGS: KeyCode = KeyCode::Char('L');
pub const KEY_SEEK_BACK: KeyCode = KeyCode::Char('<');
pub const KEY_SEEK_BACK_ALT: KeyCode = KeyCode::Char(',');
pub const KEY_SEEK_FWD: KeyCode = KeyCode::Char('>');
pub const KEY_SEEK_FWD_ALT: KeyCode = KeyCode::Char('.');
pub const KEY_VOLUME_UP: KeyCode = KeyCode::Char('+');
pub const KEY_VOLUME_UP_ALT: KeyCode = KeyCode::Char('=');
pub const KEY_VOLUME_DOWN: KeyCode = KeyCode::Char('-');
pub const KEY_SELECT: KeyCode = KeyCode::Enter;
pub const KEY_BACK: KeyCode = KeyCode::Esc;
pub const KEY_UP: KeyCode = KeyCode::Up;
pub const KEY_DOWN: KeyCode = KeyCode::Down;
pub const KEY_PAGE_UP: KeyCode = KeyCode::PageUp;
pub const KEY_PAGE_DOWN: KeyCode = KeyCode::PageDown;
pub const KEY_GOTO_TOP: KeyCode = KeyCode::Home;
pub const KEY_GOTO_BOTTOM: KeyCode = KeyCode::End;

/// Actions shown in the help bar while browsing songs.
pub const SONGS_HELP: &[Action] = &[
    Action::Select,
    Action::PlayPause,
    Action::Next,
    Action::Previous,
    Action::PreviousPage,
    Action::NextPage,
    Action::SingerFilter,
    Action::ScoreFilter,
    Action::ResetFilters,
    Action::Details,
    Action::Logs,
    Action::Quit,
];
pub const PICKER_HELP: &[Action] = &[Action::Select, Action::Back];
pub const NOTICE_HELP: &[Action] = &[Action::Back, Action::Quit];
pub const LOGS_HELP: &[Action] = &[Action::Back, Action::Quit];

impl Action {
    /// Label shown in the help bar. Returns `None` for actions that
    /// shouldn't appear (navigation and the like).
    pub fn help_label(&self, is_playing: bool) -> Option<(SmolStr, SmolStr)> {
        let (key, desc): (KeyCode, SmolStr) = match self {
            Action::Quit => (KEY_QUIT, "quit".into()),
            Action::PlayPause => {
                let label = if is_playing { "pause" } else { "play" };
                (KEY_PLAY_PAUSE, label.into())
            }
            Action::Next => (KEY_NEXT, "next".into()),
            Action::Previous => (KEY_PREVIOUS, "prev".into()),
            Action::NextPage => (KEY_NEXT_PAGE, "page+".into()),
            Action::PreviousPage => (KEY_PREVIOUS_PAGE, "page-".into()),
            Action::SingerFilter => (KEY_SINGER_FILTER, "singer".into()),
            Action::ScoreFilter => (KEY_SCORE_FILTER, "score".into()),
            Action::ResetFilters => (KEY_RESET_FILTERS, "reset".into()),
            Action::Details => (KEY_DETAILS, "details".into()),
            Action::Logs => (KEY_LOGS, "logs".into()),
            Action::Select => (KEY_SELECT, "select".into()),
            Action::Back => (KEY_BACK, "close".into()),
            _ => return None,
        };
        Some((key_name(key), desc))
    }
}

fn key_name(key: KeyCode) -> SmolStr {
    match key {
        KeyCode::Char(' ') => "space".into(),
        // Case matters for letter keys.
        KeyCode::Char(c) => c.to_smolstr(),
        KeyCode::Left => "\u{2190}".into(),
        KeyCode::Right => "\u{2192}".into(),
        other => other.to_smolstr().to_lowercase().into(),
    }
}

/// Resolve a key event into an action while browsing songs.
pub fn songs_action(key: &KeyEvent) -> Option<Action> {
    match key.code {
        KEY_QUIT => Some(Action::Quit),
        KEY_PLAY_PAUSE => Some(Action::PlayPause),
        KEY_NEXT => Some(Action::Next),
        KEY_PREVIOUS => Some(Action::Previous),
        KEY_NEXT_PAGE => Some(Action::NextPage),
        KEY_PREVIOUS_PAGE => Some(Action::PreviousPage),
        KEY_SINGER_FILTER => Some(Action::SingerFilter),
        KEY_SCORE_FILTER => Some(Action::ScoreFilter),
        KEY_RESET_FILTERS => Some(Action::ResetFilters),
        KEY_DETAILS => Some(Action::Details),
        KEY_LOGS => Some(Action::Logs),
        KEY_SEEK_BACK | KEY_SEEK_BACK_ALT => Some(Action::SeekBackward),
        KEY_SEEK_FWD | KEY_SEEK_FWD_ALT => Some(Action::SeekForward),
        KEY_VOLUME_UP | KEY_VOLUME_UP_ALT => Some(Action::VolumeUp),
        KEY_VOLUME_DOWN => Some(Action::VolumeDown),
        KEY_UP => Some(Action::MoveUp),
        KEY_DOWN => Some(Action::MoveDown),
        KEY_PAGE_UP => Some(Action::PreviousPage),
        KEY_PAGE_DOWN => Some(Action::NextPage),
        KEY_GOTO_TOP => Some(Action::GotoTop),
        KEY_GOTO_BOTTOM => Some(Action::GotoBottom),
        KEY_SELECT => Some(Action::Select),
        KEY_BACK => Some(Action::Back),
        KeyCode::Char(c @ '1'..='9') => c.to_digit(10).map(|d| Action::GotoPage(d as usize)),
        _ => None,
    }
}

/// Resolve a key event into an action in a filter picker.
pub fn picker_action(key: &KeyEvent) -> Option<Action> {
    match key.code {
        KEY_BACK | KEY_QUIT => Some(Action::Back),
        KEY_SELECT => Some(Action::Select),
        KEY_UP => Some(Action::MoveUp),
        KEY_DOWN => Some(Action::MoveDown),
        KEY_PAGE_UP => Some(Action::PageUp),
        KEY_PAGE_DOWN => Some(Action::PageDown),
        KEY_GOTO_TOP => Some(Action::GotoTop),
        KEY_GOTO_BOTTOM => Some(Action::GotoBottom),
        _ => None,
    }
}

/// Resolve a key event into an action while a notice is shown. Anything
/// other than quit dismisses it.
pub fn notice_action(key: &KeyEvent) -> Action {
    match key.code {
        KEY_QUIT => Action::Quit,
        _ => Action::Back,
    }
}

/// Resolve a key event into an action in the logs panel.
pub fn logs_action(key: &KeyEvent) -> Option<Action> {
    match key.code {
        KEY_BACK | KEY_LOGS => Some(Action::Back),
        KEY_QUIT => Some(Action::Quit),
        KEY_UP => Some(Action::MoveUp),
        KEY_DOWN => Some(Action::MoveDown),
        KEY_PAGE_UP => Some(Action::PageUp),
        KEY_PAGE_DOWN => Some(Action::PageDown),
        KEY_GOTO_TOP => Some(Action::GotoTop),
        KEY_GOTO_BOTTOM => Some(Action::GotoBottom),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyModifiers;

    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_digits_go_to_pages() {
        assert_eq!(
            songs_action(&key(KeyCode::Char('3'))),
            Some(Action::GotoPage(3))
        );
        assert_eq!(
            songs_action(&key(KeyCode::Char('9'))),
            Some(Action::GotoPage(9))
        );
        assert_eq!(songs_action(&key(KeyCode::Char('0'))), None);
    }

    #[test]
    fn test_logs_key_is_case_sensitive() {
        assert_eq!(songs_action(&key(KeyCode::Char('L'))), Some(Action::Logs));
        assert_eq!(songs_action(&key(KeyCode::Char('l'))), None);
    }

    #[test]
    fn test_notice_swallows_keys() {
        assert_eq!(notice_action(&key(KeyCode::Char('n'))), Action::Back);
        assert_eq!(notice_action(&key(KEY_QUIT)), Action::Quit);
    }

    #[test]
    fn test_help_labels() {
        assert_eq!(
            Action::PlayPause.help_label(true),
            Some(("space".into(), "pause".into()))
        );
        assert_eq!(
            Action::Logs.help_label(false),
            Some(("L".into(), "logs".into()))
        );
        assert_eq!(Action::MoveUp.help_label(false), None);
    }
}
