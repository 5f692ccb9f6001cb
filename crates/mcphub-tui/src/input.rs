//! Key bindings.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Something the user asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    ToggleHub,
    NextTab,
    ShowServers,
    ShowLogs,
    SelectNext,
    SelectPrevious,
    ToggleServer,
    ToggleTools,
    RefreshServer,
    RestartHub,
    OpenConfig,
    OpenLogFile,
    CycleFilter,
    ToggleDebug,
    ClearLogs,
    EditPort,
    PortChar(char),
    PortBackspace,
    FinishPortEdit,
}

/// Map a key press to an action.
///
/// While the port field is being edited only digits, backspace and the
/// keys that end editing are recognised.
pub fn map_key(key: KeyEvent, editing_port: bool) -> Option<Action> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    if editing_port {
        return match key.code {
            KeyCode::Char(c) if c.is_ascii_digit() => Some(Action::PortChar(c)),
            KeyCode::Backspace => Some(Action::PortBackspace),
            KeyCode::Enter | KeyCode::Esc | KeyCode::Tab => Some(Action::FinishPortEdit),
            _ => None,
        };
    }

    let action = match key.code {
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Char('s') => Action::ToggleHub,
        KeyCode::Tab => Action::NextTab,
        KeyCode::Char('1') => Action::ShowServers,
        KeyCode::Char('2') => Action::ShowLogs,
        KeyCode::Down | KeyCode::Char('j') => Action::SelectNext,
        KeyCode::Up | KeyCode::Char('k') => Action::SelectPrevious,
        KeyCode::Char(' ' | 'e') => Action::ToggleServer,
        KeyCode::Enter => Action::ToggleTools,
        KeyCode::Char('r') => Action::RefreshServer,
        KeyCode::Char('R') => Action::RestartHub,
        KeyCode::Char('c') => Action::OpenConfig,
        KeyCode::Char('o') => Action::OpenLogFile,
        KeyCode::Char('f') => Action::CycleFilter,
        KeyCode::Char('d') => Action::ToggleDebug,
        KeyCode::Char('x') => Action::ClearLogs,
        KeyCode::Char('p') => Action::EditPort,
        _ => return None,
    };
    Some(action)
}

/// One-line key reference for the footer.
pub const KEY_HINTS: &str = "s start/stop  p port  tab view  j/k select  space enable  enter tools  r refresh  R restart  c config  o hub log  f filter  d debug  x clear  q quit";

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_global_bindings() {
        assert_eq!(map_key(press(KeyCode::Char('s')), false), Some(Action::ToggleHub));
        assert_eq!(map_key(press(KeyCode::Char('R')), false), Some(Action::RestartHub));
        assert_eq!(map_key(press(KeyCode::Char(' ')), false), Some(Action::ToggleServer));
        assert_eq!(map_key(press(KeyCode::Down), false), Some(Action::SelectNext));
        assert_eq!(map_key(press(KeyCode::Char('z')), false), None);
    }

    #[test]
    fn test_port_editing_only_accepts_digits() {
        assert_eq!(
            map_key(press(KeyCode::Char('7')), true),
            Some(Action::PortChar('7'))
        );
        assert_eq!(map_key(press(KeyCode::Char('q')), true), None);
        assert_eq!(
            map_key(press(KeyCode::Enter), true),
            Some(Action::FinishPortEdit)
        );
        // Outside editing, digits switch views.
        assert_eq!(map_key(press(KeyCode::Char('2')), false), Some(Action::ShowLogs));
    }

    #[test]
    fn test_ctrl_c_always_quits() {
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(map_key(key, true), Some(Action::Quit));
        assert_eq!(map_key(key, false), Some(Action::Quit));
    }

    #[test]
    fn test_key_release_is_ignored() {
        let mut key = press(KeyCode::Char('q'));
        key.kind = KeyEventKind::Release;
        assert_eq!(map_key(key, false), None);
    }
}
