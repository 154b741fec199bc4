use serde::{Deserialize, Serialize};
use strum::{Display as StrumDisplay, EnumString};

/// Keys that are sent by name rather than typed as text.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum NamedKey {
    #[strum(to_string = "backspace", serialize = "bs")]
    Backspace,
    #[strum(to_string = "enter", serialize = "return")]
    Enter,
    Up,
    Down,
    Left,
    Right,
}

impl NamedKey {
    /// X keysym name, understood by both xdotool and wtype.
    pub fn keysym(&self) -> &'static str {
        match self {
            NamedKey::Backspace => "BackSpace",
            NamedKey::Enter => "Return",
            NamedKey::Up => "Up",
            NamedKey::Down => "Down",
            NamedKey::Left => "Left",
            NamedKey::Right => "Right",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Keystroke {
    Text(String),
    Key(NamedKey),
}

impl Keystroke {
    pub fn text(s: impl Into<String>) -> Self {
        Keystroke::Text(s.into())
    }

    /// `count` backspaces, used to erase a partially typed word.
    pub fn erase(count: usize) -> impl Iterator<Item = Keystroke> {
        std::iter::repeat_n(Keystroke::Key(NamedKey::Backspace), count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_named_key_parsing() {
        let cases = vec![
            ("backspace", NamedKey::Backspace),
            ("BackSpace", NamedKey::Backspace),
            ("bs", NamedKey::Backspace),
            ("enter", NamedKey::Enter),
            ("Return", NamedKey::Enter),
            ("UP", NamedKey::Up),
            ("left", NamedKey::Left),
        ];

        for (input, expected) in cases {
            assert_eq!(NamedKey::from_str(input).unwrap(), expected);
        }
        assert!(NamedKey::from_str("escape").is_err());
    }

    #[test]
    fn test_keystroke_serialization() {
        let json = serde_json::to_string(&Keystroke::Key(NamedKey::Enter)).unwrap();
        assert_eq!(json, r#"{"key":"enter"}"#);

        let parsed: Keystroke = serde_json::from_str(r#"{"text":"hi"}"#).unwrap();
        assert_eq!(parsed, Keystroke::text("hi"));
    }

    #[test]
    fn test_erase_repeats_backspace() {
        let keys: Vec<_> = Keystroke::erase(3).collect();
        assert_eq!(keys.len(), 3);
        assert!(keys.iter().all(|k| *k == Keystroke::Key(NamedKey::Backspace)));
        assert_eq!(Keystroke::erase(0).count(), 0);
    }
}
