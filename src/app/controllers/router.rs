use crate::app::domain::{Message, Skin};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    /// A printable character.
    Char(char),
    Enter,
    Backspace,
    Delete,
    /// Any other named key ("ArrowLeft", "F5", ...).
    Named(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyInput {
    pub key: Key,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
    pub shift: bool,
}

impl KeyInput {
    pub fn plain(key: Key) -> Self {
        Self {
            key,
            ctrl: false,
            alt: false,
            meta: false,
            shift: false,
        }
    }

    pub fn ctrl(key: Key) -> Self {
        Self { ctrl: true, ..Self::plain(key) }
    }

    fn has_modifier(&self) -> bool {
        self.ctrl || self.alt || self.meta || self.shift
    }
}

/// Map a key press to a message. Shortcuts work in every mode; reveal keys
/// are ignored while the text is being edited.
pub fn route_key(input: &KeyInput, edit_mode: bool) -> Option<Message> {
    if input.ctrl {
        if let Key::Char(c) = input.key {
            match c {
                'o' => return Some(Message::OpenImport),
                '1' => return Some(Message::SwitchSkin(Skin::Document)),
                '2' => return Some(Message::SwitchSkin(Skin::CodeEditor)),
                'r' => return Some(Message::Reset),
                'a' => return Some(Message::ShowAll),
                _ => {}
            }
        }
    }

    if edit_mode || input.has_modifier() {
        return None;
    }

    match input.key {
        Key::Char(_) | Key::Enter => Some(Message::Advance),
        Key::Backspace => Some(Message::Retreat),
        Key::Delete | Key::Named(_) => None,
    }
}
