//! DOM input conversion (browser -> vista_platform)

use vista_platform::{InputEvent, Key, KeyState, KeyboardEvent, Modifiers};

/// `WheelEvent.deltaMode` values
pub const DOM_DELTA_PIXEL: u32 = 0;
pub const DOM_DELTA_LINE: u32 = 1;
pub const DOM_DELTA_PAGE: u32 = 2;

/// Pixels per scroll line for pixel-mode wheel events
const PIXELS_PER_LINE: f64 = 100.0;
/// Lines per page for page-mode wheel events
const LINES_PER_PAGE: f64 = 3.0;

/// Convert a DOM wheel delta to lines.
///
/// DOM deltas grow toward the user; platform deltas grow away from the user,
/// so the sign flips.
pub fn wheel_to_scroll(delta_x: f64, delta_y: f64, delta_mode: u32) -> InputEvent {
    let scale = match delta_mode {
        DOM_DELTA_LINE => 1.0,
        DOM_DELTA_PAGE => LINES_PER_PAGE,
        _ => 1.0 / PIXELS_PER_LINE,
    };
    InputEvent::Scroll {
        delta_x: (-delta_x * scale) as f32,
        delta_y: (-delta_y * scale) as f32,
    }
}

/// Convert a DOM keyboard event's fields
pub fn keyboard_event(key: &str, pressed: bool, modifiers: Modifiers) -> InputEvent {
    InputEvent::Keyboard(KeyboardEvent {
        key: Key::from_name(key),
        state: if pressed {
            KeyState::Pressed
        } else {
            KeyState::Released
        },
        modifiers,
    })
}

/// Map client (CSS pixel) coordinates to physical surface pixels
pub fn client_to_surface(
    client_x: f64,
    client_y: f64,
    rect_left: f64,
    rect_top: f64,
    device_pixel_ratio: f64,
) -> (f32, f32) {
    (
        ((client_x - rect_left) * device_pixel_ratio) as f32,
        ((client_y - rect_top) * device_pixel_ratio) as f32,
    )
}

/// Backing-store size of a canvas filling a `css_width × css_height` viewport
pub fn backing_size(css_width: f64, css_height: f64, device_pixel_ratio: f64) -> (u32, u32) {
    (
        (css_width * device_pixel_ratio).round().max(1.0) as u32,
        (css_height * device_pixel_ratio).round().max(1.0) as u32,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_wheel_flips_and_scales() {
        let event = wheel_to_scroll(0.0, 100.0, DOM_DELTA_PIXEL);
        assert_eq!(
            event,
            InputEvent::Scroll {
                delta_x: 0.0,
                delta_y: -1.0
            }
        );
    }

    #[test]
    fn test_line_and_page_wheel() {
        assert_eq!(
            wheel_to_scroll(0.0, -2.0, DOM_DELTA_LINE),
            InputEvent::Scroll {
                delta_x: 0.0,
                delta_y: 2.0
            }
        );
        assert_eq!(
            wheel_to_scroll(0.0, 1.0, DOM_DELTA_PAGE),
            InputEvent::Scroll {
                delta_x: 0.0,
                delta_y: -3.0
            }
        );
    }

    #[test]
    fn test_client_to_surface_applies_dpr() {
        let (x, y) = client_to_surface(110.0, 60.0, 10.0, 10.0, 2.0);
        assert_eq!((x, y), (200.0, 100.0));
    }

    #[test]
    fn test_backing_size_never_zero() {
        assert_eq!(backing_size(800.0, 600.0, 1.5), (1200, 900));
        assert_eq!(backing_size(0.0, 0.0, 1.0), (1, 1));
    }

    #[test]
    fn test_keyboard_event() {
        let event = keyboard_event("N", true, Modifiers::default());
        match event {
            InputEvent::Keyboard(kb) => {
                assert!(kb.key.is_char('n'));
                assert_eq!(kb.state, KeyState::Pressed);
            }
            other => panic!("unexpected event {other:?}"),
        }
    }
}
