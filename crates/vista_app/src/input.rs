//! Pointer and keyboard handling
//!
//! Mouse events accumulate into a [`CameraInput`] for the orbit controller;
//! a few keys map to viewer actions.

use vista_3d::controls::CameraInput;
use vista_3d::math::Vec2;
use vista_platform::{Cursor, InputEvent, Key, KeyState, KeyboardEvent, MouseButton, MouseEvent};

/// Viewer commands bound to keys
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewerAction {
    /// `R`: return the camera to its initial placement
    ResetCamera,
    /// `N`: crossfade the model to its next animation clip
    NextClip,
    /// `Space`: freeze or resume scene animation
    TogglePause,
}

impl ViewerAction {
    fn from_key(key: &Key) -> Option<Self> {
        match key {
            Key::Space => Some(ViewerAction::TogglePause),
            k if k.is_char('r') => Some(ViewerAction::ResetCamera),
            k if k.is_char('n') => Some(ViewerAction::NextClip),
            _ => None,
        }
    }
}

/// Input gathered between two frames
#[derive(Debug, Default)]
pub struct InputState {
    camera: CameraInput,
    pointer: Option<Vec2>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one platform event into the frame's input
    ///
    /// Returns the action a key press triggers, if any.
    pub fn handle(&mut self, event: &InputEvent) -> Option<ViewerAction> {
        match event {
            InputEvent::Mouse(mouse) => {
                self.handle_mouse(mouse);
                None
            }
            InputEvent::Scroll { delta_y, .. } => {
                self.camera.scroll_delta += delta_y;
                None
            }
            InputEvent::Keyboard(KeyboardEvent {
                key,
                state: KeyState::Pressed,
                ..
            }) => ViewerAction::from_key(key),
            InputEvent::Keyboard(_) => None,
        }
    }

    fn handle_mouse(&mut self, event: &MouseEvent) {
        match *event {
            MouseEvent::Moved { x, y } => {
                let position = Vec2::new(x, y);
                if let Some(last) = self.pointer {
                    self.camera.mouse_delta += position - last;
                }
                self.pointer = Some(position);
            }
            MouseEvent::ButtonPressed { button, x, y } => {
                self.pointer = Some(Vec2::new(x, y));
                self.set_button(button, true);
            }
            MouseEvent::ButtonReleased { button, .. } => self.set_button(button, false),
            // Re-entering should not register the jump as a drag
            MouseEvent::Entered | MouseEvent::Left => self.pointer = None,
        }
    }

    fn set_button(&mut self, button: MouseButton, pressed: bool) {
        match button {
            MouseButton::Left => self.camera.primary_pressed = pressed,
            MouseButton::Right => self.camera.secondary_pressed = pressed,
            MouseButton::Middle => self.camera.middle_pressed = pressed,
            MouseButton::Other(_) => {}
        }
    }

    /// Input for this frame's controller update
    pub fn camera(&self) -> &CameraInput {
        &self.camera
    }

    /// Cursor matching the drag in progress
    pub fn cursor(&self) -> Cursor {
        if self.camera.primary_pressed {
            Cursor::Grabbing
        } else if self.camera.secondary_pressed || self.camera.middle_pressed {
            Cursor::Move
        } else {
            Cursor::Grab
        }
    }

    /// Drop the frame's deltas; held buttons carry over
    pub fn end_frame(&mut self) {
        self.camera.end_frame();
    }

    /// Forget every held button, e.g. when focus is lost mid-drag
    pub fn release_all(&mut self) {
        self.camera = CameraInput::default();
        self.pointer = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vista_platform::Modifiers;

    fn mouse(event: MouseEvent) -> InputEvent {
        InputEvent::Mouse(event)
    }

    fn key(key: Key, state: KeyState) -> InputEvent {
        InputEvent::Keyboard(KeyboardEvent {
            key,
            state,
            modifiers: Modifiers::default(),
        })
    }

    #[test]
    fn test_drag_accumulates_delta() {
        let mut input = InputState::new();
        input.handle(&mouse(MouseEvent::ButtonPressed {
            button: MouseButton::Left,
            x: 10.0,
            y: 10.0,
        }));
        input.handle(&mouse(MouseEvent::Moved { x: 15.0, y: 12.0 }));
        input.handle(&mouse(MouseEvent::Moved { x: 20.0, y: 10.0 }));

        assert!(input.camera().primary_pressed);
        assert_eq!(input.camera().mouse_delta, Vec2::new(10.0, 0.0));
        assert_eq!(input.cursor(), Cursor::Grabbing);

        input.end_frame();
        assert_eq!(input.camera().mouse_delta, Vec2::ZERO);
        assert!(input.camera().primary_pressed);

        input.handle(&mouse(MouseEvent::ButtonReleased {
            button: MouseButton::Left,
            x: 20.0,
            y: 10.0,
        }));
        assert!(!input.camera().primary_pressed);
        assert_eq!(input.cursor(), Cursor::Grab);
    }

    #[test]
    fn test_reentry_does_not_jump() {
        let mut input = InputState::new();
        input.handle(&mouse(MouseEvent::Moved { x: 0.0, y: 0.0 }));
        input.handle(&mouse(MouseEvent::Left));
        input.handle(&mouse(MouseEvent::Entered));
        input.handle(&mouse(MouseEvent::Moved { x: 300.0, y: 300.0 }));
        assert_eq!(input.camera().mouse_delta, Vec2::ZERO);
    }

    #[test]
    fn test_buttons_and_scroll() {
        let mut input = InputState::new();
        input.handle(&mouse(MouseEvent::ButtonPressed {
            button: MouseButton::Right,
            x: 0.0,
            y: 0.0,
        }));
        input.handle(&InputEvent::Scroll {
            delta_x: 0.0,
            delta_y: 2.0,
        });
        input.handle(&InputEvent::Scroll {
            delta_x: 1.0,
            delta_y: -0.5,
        });
        assert!(input.camera().secondary_pressed);
        assert_eq!(input.camera().scroll_delta, 1.5);
        assert_eq!(input.cursor(), Cursor::Move);

        input.release_all();
        assert_eq!(*input.camera(), CameraInput::default());
    }

    #[test]
    fn test_key_actions() {
        let mut input = InputState::new();
        assert_eq!(
            input.handle(&key(Key::Char('r'), KeyState::Pressed)),
            Some(ViewerAction::ResetCamera)
        );
        assert_eq!(
            input.handle(&key(Key::Char('n'), KeyState::Pressed)),
            Some(ViewerAction::NextClip)
        );
        assert_eq!(
            input.handle(&key(Key::Space, KeyState::Pressed)),
            Some(ViewerAction::TogglePause)
        );
        assert_eq!(input.handle(&key(Key::Space, KeyState::Released)), None);
        assert_eq!(input.handle(&key(Key::Char('q'), KeyState::Pressed)), None);
    }
}
