//! Keyboard shortcuts

use std::fmt;
use std::str::FromStr;

/// A key press the kiosk reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEvent {
    Escape,
    Enter,
    /// A character key with the Alt modifier held
    Alt(char),
}

impl FromStr for KeyEvent {
    type Err = String;

    /// Parses "Escape", "Enter" and "Alt+<char>" (case-insensitive)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("escape") || s.eq_ignore_ascii_case("esc") {
            return Ok(KeyEvent::Escape);
        }
        if s.eq_ignore_ascii_case("enter") {
            return Ok(KeyEvent::Enter);
        }

        let lower = s.to_ascii_lowercase();
        if let Some(rest) = lower.strip_prefix("alt+") {
            let mut chars = rest.chars();
            if let (Some(c), None) = (chars.next(), chars.next()) {
                return Ok(KeyEvent::Alt(c));
            }
        }

        Err(format!("Unknown key: {}", s))
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyEvent::Escape => f.write_str("Escape"),
            KeyEvent::Enter => f.write_str("Enter"),
            KeyEvent::Alt(c) => write!(f, "Alt+{}", c.to_ascii_uppercase()),
        }
    }
}

/// Which input field has focus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    None,
    EmployeeId,
    Search,
}

/// What a key press asks the kiosk to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    CloseAll,
    Capture,
    OpenRegistration,
    LoadMyAttendance,
    Search,
}

impl Action {
    /// Map a key press in the given focus to an action
    pub fn for_key(key: KeyEvent, focus: Focus) -> Option<Action> {
        match (key, focus) {
            (KeyEvent::Escape, _) => Some(Action::CloseAll),
            (KeyEvent::Alt('a'), _) => Some(Action::Capture),
            (KeyEvent::Alt('r'), _) => Some(Action::OpenRegistration),
            (KeyEvent::Enter, Focus::EmployeeId) => Some(Action::LoadMyAttendance),
            (KeyEvent::Enter, Focus::Search) => Some(Action::Search),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keys() {
        assert_eq!("Escape".parse::<KeyEvent>(), Ok(KeyEvent::Escape));
        assert_eq!("enter".parse::<KeyEvent>(), Ok(KeyEvent::Enter));
        assert_eq!("Alt+A".parse::<KeyEvent>(), Ok(KeyEvent::Alt('a')));
        assert_eq!("alt+r".parse::<KeyEvent>(), Ok(KeyEvent::Alt('r')));
        assert!("Alt+".parse::<KeyEvent>().is_err());
        assert!("Ctrl+A".parse::<KeyEvent>().is_err());
    }

    #[test]
    fn test_display_round_trips() {
        assert_eq!(KeyEvent::Alt('a').to_string(), "Alt+A");
        assert_eq!("Alt+A".parse::<KeyEvent>().unwrap(), KeyEvent::Alt('a'));
    }

    #[test]
    fn test_action_mapping() {
        assert_eq!(Action::for_key(KeyEvent::Escape, Focus::Search), Some(Action::CloseAll));
        assert_eq!(Action::for_key(KeyEvent::Alt('a'), Focus::None), Some(Action::Capture));
        assert_eq!(
            Action::for_key(KeyEvent::Alt('r'), Focus::None),
            Some(Action::OpenRegistration)
        );
        assert_eq!(
            Action::for_key(KeyEvent::Enter, Focus::EmployeeId),
            Some(Action::LoadMyAttendance)
        );
        assert_eq!(Action::for_key(KeyEvent::Enter, Focus::Search), Some(Action::Search));
        assert_eq!(Action::for_key(KeyEvent::Enter, Focus::None), None);
        assert_eq!(Action::for_key(KeyEvent::Alt('x'), Focus::None), None);
    }
}
