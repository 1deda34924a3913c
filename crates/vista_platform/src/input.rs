//! Input event types for mouse, keyboard, and wheel

/// Input events
#[derive(Clone, Debug, PartialEq)]
pub enum InputEvent {
    /// Mouse event
    Mouse(MouseEvent),
    /// Keyboard event
    Keyboard(KeyboardEvent),
    /// Wheel event, in lines (positive `delta_y` scrolls away from the user)
    Scroll {
        /// Horizontal scroll delta
        delta_x: f32,
        /// Vertical scroll delta
        delta_y: f32,
    },
}

// ============================================================================
// Mouse Events
// ============================================================================

/// Mouse events, positions in physical pixels relative to the surface
#[derive(Clone, Debug, PartialEq)]
pub enum MouseEvent {
    /// Pointer moved
    Moved {
        /// X position
        x: f32,
        /// Y position
        y: f32,
    },
    /// Button pressed
    ButtonPressed {
        /// Which button was pressed
        button: MouseButton,
        /// X position when pressed
        x: f32,
        /// Y position when pressed
        y: f32,
    },
    /// Button released
    ButtonReleased {
        /// Which button was released
        button: MouseButton,
        /// X position when released
        x: f32,
        /// Y position when released
        y: f32,
    },
    /// Pointer entered the surface
    Entered,
    /// Pointer left the surface
    Left,
}

/// Mouse buttons
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Left mouse button
    Left,
    /// Right mouse button
    Right,
    /// Middle mouse button (wheel click)
    Middle,
    /// Any other button, by index
    Other(u16),
}

impl MouseButton {
    /// Map a DOM `MouseEvent.button` index
    pub fn from_dom(button: i16) -> Self {
        match button {
            0 => MouseButton::Left,
            1 => MouseButton::Middle,
            2 => MouseButton::Right,
            n => MouseButton::Other(n.max(0) as u16),
        }
    }
}

// ============================================================================
// Keyboard Events
// ============================================================================

/// Keyboard event
#[derive(Clone, Debug, PartialEq)]
pub struct KeyboardEvent {
    /// The key that changed state
    pub key: Key,
    /// Whether the key was pressed or released
    pub state: KeyState,
    /// Modifier keys held during this event
    pub modifiers: Modifiers,
}

/// Key press/release state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyState {
    /// Key was pressed
    Pressed,
    /// Key was released
    Released,
}

/// Modifier key state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    /// Shift key is held
    pub shift: bool,
    /// Control key is held
    pub ctrl: bool,
    /// Alt key is held (Option on macOS)
    pub alt: bool,
    /// Meta key is held (Command on macOS)
    pub meta: bool,
}

impl Modifiers {
    /// Check if no modifiers are held
    pub fn is_empty(&self) -> bool {
        !self.shift && !self.ctrl && !self.alt && !self.meta
    }
}

/// Keys the viewer distinguishes; printable keys arrive as [`Key::Char`]
/// (lowercased)
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// A printable character
    Char(char),
    Space,
    Enter,
    Escape,
    Tab,
    Backspace,
    Left,
    Right,
    Up,
    Down,
    /// Anything else
    Unknown,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` / winit logical key name
    pub fn from_name(name: &str) -> Self {
        match name {
            " " | "Space" => Key::Space,
            "Enter" => Key::Enter,
            "Escape" => Key::Escape,
            "Tab" => Key::Tab,
            "Backspace" => Key::Backspace,
            "ArrowLeft" => Key::Left,
            "ArrowRight" => Key::Right,
            "ArrowUp" => Key::Up,
            "ArrowDown" => Key::Down,
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Key::Char(c.to_ascii_lowercase()),
                    _ => Key::Unknown,
                }
            }
        }
    }

    /// Whether this is the given character key, case-insensitively
    pub fn is_char(&self, c: char) -> bool {
        matches!(self, Key::Char(k) if *k == c.to_ascii_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_from_name() {
        assert_eq!(Key::from_name("R"), Key::Char('r'));
        assert_eq!(Key::from_name(" "), Key::Space);
        assert_eq!(Key::from_name("ArrowUp"), Key::Up);
        assert_eq!(Key::from_name("Shift"), Key::Unknown);
        assert!(Key::from_name("n").is_char('N'));
    }

    #[test]
    fn test_dom_buttons() {
        assert_eq!(MouseButton::from_dom(0), MouseButton::Left);
        assert_eq!(MouseButton::from_dom(1), MouseButton::Middle);
        assert_eq!(MouseButton::from_dom(2), MouseButton::Right);
        assert_eq!(MouseButton::from_dom(4), MouseButton::Other(4));
    }

    #[test]
    fn test_modifiers_empty() {
        assert!(Modifiers::default().is_empty());
        let m = Modifiers {
            shift: true,
            ..Default::default()
        };
        assert!(!m.is_empty());
    }
}
