use std::fmt;
use std::str::FromStr;

/// Keys the scene reacts to. Hosts translate their native key codes into
/// these; anything unbound arrives as `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Digit1,
    Digit2,
    Digit3,
    Digit4,
    Up,
    Down,
    Left,
    Right,
    W,
    A,
    S,
    D,
    Space,
    LeftCtrl,
    RightCtrl,
    Equals,
    Minus,
    Escape,
    Other,
}

impl Key {
    const NAMED: [(Key, &'static str); 18] = [
        (Key::Digit1, "1"),
        (Key::Digit2, "2"),
        (Key::Digit3, "3"),
        (Key::Digit4, "4"),
        (Key::Up, "up"),
        (Key::Down, "down"),
        (Key::Left, "left"),
        (Key::Right, "right"),
        (Key::W, "w"),
        (Key::A, "a"),
        (Key::S, "s"),
        (Key::D, "d"),
        (Key::Space, "space"),
        (Key::LeftCtrl, "lctrl"),
        (Key::RightCtrl, "rctrl"),
        (Key::Equals, "="),
        (Key::Minus, "-"),
        (Key::Escape, "escape"),
    ];

    pub fn name(self) -> &'static str {
        Self::NAMED
            .iter()
            .find(|(k, _)| *k == self)
            .map(|(_, n)| *n)
            .unwrap_or("other")
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown key `{0}`")]
pub struct ParseKeyError(pub String);

impl FromStr for Key {
    type Err = ParseKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        let alias = match lower.as_str() {
            "plus" | "equals" => "=",
            "minus" => "-",
            "ctrl" => "lctrl",
            "esc" => "escape",
            other => other,
        };
        Self::NAMED
            .iter()
            .find(|(_, n)| *n == alias)
            .map(|(k, _)| *k)
            .ok_or_else(|| ParseKeyError(s.to_string()))
    }
}

/// Whether the key went down or came up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyState {
    Pressed,
    Released,
}

/// One keyboard event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyInput {
    pub key: Key,
    pub state: KeyState,
    /// Set for events generated by holding the key down.
    pub repeat: bool,
}

impl KeyInput {
    /// A fresh (non-repeat) key-down.
    pub fn pressed(key: Key) -> Self {
        Self {
            key,
            state: KeyState::Pressed,
            repeat: false,
        }
    }

    /// An auto-repeat key-down.
    pub fn repeated(key: Key) -> Self {
        Self {
            key,
            state: KeyState::Pressed,
            repeat: true,
        }
    }

    pub fn released(key: Key) -> Self {
        Self {
            key,
            state: KeyState::Released,
            repeat: false,
        }
    }
}
