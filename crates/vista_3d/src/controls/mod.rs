//! Camera controllers

mod orbit;

pub use orbit::OrbitController;

use glam::Vec2;

/// Camera input accumulated over one frame
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CameraInput {
    /// Mouse movement in physical pixels since the last frame
    pub mouse_delta: Vec2,
    /// Scroll in lines; positive scrolls away from the user (zoom in)
    pub scroll_delta: f32,
    /// Left button held
    pub primary_pressed: bool,
    /// Right button held
    pub secondary_pressed: bool,
    /// Middle button held
    pub middle_pressed: bool,
}

impl CameraInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear per-frame deltas, keeping button state
    pub fn end_frame(&mut self) {
        self.mouse_delta = Vec2::ZERO;
        self.scroll_delta = 0.0;
    }
}
