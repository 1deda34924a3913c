//! winit input to platform events

use vista_platform::{InputEvent, Key, KeyState, KeyboardEvent, Modifiers, MouseButton, MouseEvent};
use winit::event::{ElementState, MouseButton as WinitMouseButton, MouseScrollDelta};
use winit::keyboard::{Key as WinitKey, ModifiersState, NamedKey};

/// Trackpads report pixels; the camera zooms per line
const PIXELS_PER_LINE: f64 = 10.0;

fn mouse_button(button: WinitMouseButton) -> MouseButton {
    match button {
        WinitMouseButton::Left => MouseButton::Left,
        WinitMouseButton::Right => MouseButton::Right,
        WinitMouseButton::Middle => MouseButton::Middle,
        WinitMouseButton::Back => MouseButton::Other(3),
        WinitMouseButton::Forward => MouseButton::Other(4),
        WinitMouseButton::Other(n) => MouseButton::Other(n),
    }
}

fn modifiers(state: ModifiersState) -> Modifiers {
    Modifiers {
        shift: state.shift_key(),
        ctrl: state.control_key(),
        alt: state.alt_key(),
        meta: state.super_key(),
    }
}

/// Map a logical key; characters are lowercased
pub fn convert_key(key: &WinitKey) -> Key {
    match key {
        WinitKey::Character(c) => Key::from_name(c.as_str()),
        WinitKey::Named(NamedKey::Space) => Key::Space,
        WinitKey::Named(NamedKey::Enter) => Key::Enter,
        WinitKey::Named(NamedKey::Escape) => Key::Escape,
        WinitKey::Named(NamedKey::Tab) => Key::Tab,
        WinitKey::Named(NamedKey::Backspace) => Key::Backspace,
        WinitKey::Named(NamedKey::ArrowLeft) => Key::Left,
        WinitKey::Named(NamedKey::ArrowRight) => Key::Right,
        WinitKey::Named(NamedKey::ArrowUp) => Key::Up,
        WinitKey::Named(NamedKey::ArrowDown) => Key::Down,
        _ => Key::Unknown,
    }
}

pub fn convert_keyboard_event(key: &WinitKey, state: ElementState, mods: ModifiersState) -> InputEvent {
    InputEvent::Keyboard(KeyboardEvent {
        key: convert_key(key),
        state: if state.is_pressed() {
            KeyState::Pressed
        } else {
            KeyState::Released
        },
        modifiers: modifiers(mods),
    })
}

pub fn mouse_moved(x: f32, y: f32) -> InputEvent {
    InputEvent::Mouse(MouseEvent::Moved { x, y })
}

/// Press or release of `button` at the last known pointer position
pub fn mouse_input(state: ElementState, button: WinitMouseButton, x: f32, y: f32) -> InputEvent {
    let button = mouse_button(button);
    InputEvent::Mouse(match state {
        ElementState::Pressed => MouseEvent::ButtonPressed { button, x, y },
        ElementState::Released => MouseEvent::ButtonReleased { button, x, y },
    })
}

/// Wheel delta in lines
pub fn scroll_event(delta: MouseScrollDelta) -> InputEvent {
    let (delta_x, delta_y) = match delta {
        MouseScrollDelta::LineDelta(x, y) => (x, y),
        MouseScrollDelta::PixelDelta(pos) => (
            (pos.x / PIXELS_PER_LINE) as f32,
            (pos.y / PIXELS_PER_LINE) as f32,
        ),
    };
    InputEvent::Scroll { delta_x, delta_y }
}
