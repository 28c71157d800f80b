use crate::Vec2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerKind {
    Mouse,
    Touch,
    Pen,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerButton {
    Primary,   // Left mouse, touch
    Secondary, // Right mouse
    Auxiliary, // Middle mouse / wheel
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool, // Cmd on Mac, Win key on Windows
}

#[derive(Clone, Debug)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub position: Vec2,
    /// Raw `buttons` bitmask as reported by the host: 0 none, 1 primary,
    /// 2 secondary, 4 auxiliary, 8/16 back/forward.
    pub buttons: u8,
    pub button: Option<PointerButton>,
    pub modifiers: Modifiers,
    /// 1 for a single press, 2 for the second press of a multi-click, ...
    /// 0 on events that are not presses.
    pub click_count: u32,
}

#[derive(Clone, Debug)]
pub struct WheelEvent {
    pub delta: Vec2,
    pub position: Vec2,
    pub modifiers: Modifiers,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Key {
    Character(char),
    Enter,
    Tab,
    Backspace,
    Delete,
    Escape,
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Home,
    End,
    PageUp,
    PageDown,
    Space,
    F(u8), // F1-F12
    Unidentified,
}

impl Key {
    /// Map a DOM `key` string to a [`Key`].
    pub fn parse(name: &str) -> Key {
        match name {
            "Enter" => Key::Enter,
            "Tab" => Key::Tab,
            "Backspace" => Key::Backspace,
            "Delete" => Key::Delete,
            "Escape" => Key::Escape,
            "ArrowLeft" => Key::ArrowLeft,
            "ArrowRight" => Key::ArrowRight,
            "ArrowUp" => Key::ArrowUp,
            "ArrowDown" => Key::ArrowDown,
            "Home" => Key::Home,
            "End" => Key::End,
            "PageUp" => Key::PageUp,
            "PageDown" => Key::PageDown,
            " " => Key::Space,
            _ => {
                if let Some(n) = name.strip_prefix('F').and_then(|s| s.parse::<u8>().ok()) {
                    if (1..=12).contains(&n) {
                        return Key::F(n);
                    }
                }
                let mut chars = name.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Key::Character(c),
                    _ => Key::Unidentified,
                }
            }
        }
    }
}

#[derive(Clone, Debug)]
pub struct KeyEvent {
    pub key: Key,
    pub modifiers: Modifiers,
    pub is_repeat: bool,
}

#[derive(Clone, Debug)]
pub struct TextInputEvent {
    pub text: String,
}
