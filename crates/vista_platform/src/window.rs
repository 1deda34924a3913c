//! Window abstraction and configuration

/// Window configuration
#[derive(Clone, Debug, PartialEq)]
pub struct WindowConfig {
    /// Window title (document title on the web)
    pub title: String,
    /// Initial width in logical pixels; the web backend fills the viewport
    pub width: u32,
    /// Initial height in logical pixels
    pub height: u32,
    /// Whether the window can be resized
    pub resizable: bool,
    /// Whether the surface should allow a transparent background
    pub transparent: bool,
    /// Id of the canvas element hosting the surface (web only)
    pub canvas_id: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Vista".to_string(),
            width: 1280,
            height: 720,
            resizable: true,
            transparent: true,
            canvas_id: "vista-canvas".to_string(),
        }
    }
}

impl WindowConfig {
    /// Create a new window configuration with a title
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Set the window title
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the window size
    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set whether the window is resizable
    pub fn resizable(mut self, resizable: bool) -> Self {
        self.resizable = resizable;
        self
    }

    /// Set whether the surface is transparent
    pub fn transparent(mut self, transparent: bool) -> Self {
        self.transparent = transparent;
        self
    }

    /// Set the canvas element id
    pub fn canvas_id(mut self, id: impl Into<String>) -> Self {
        self.canvas_id = id.into();
        self
    }
}

/// Window abstraction trait
pub trait Window {
    /// Surface size in physical pixels
    fn size(&self) -> (u32, u32);

    /// Surface size in logical pixels
    fn logical_size(&self) -> (f32, f32);

    /// Display scale factor (DPI scaling)
    fn scale_factor(&self) -> f64;

    /// Set the window title
    fn set_title(&self, title: &str);

    /// Set the cursor icon
    fn set_cursor(&self, cursor: Cursor);

    /// Request another frame
    fn request_redraw(&self);

    /// Check if the window is focused
    fn is_focused(&self) -> bool;
}

/// Cursor icons used while interacting with the scene
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Cursor {
    /// Default arrow cursor
    #[default]
    Default,
    /// Open hand, hovering a draggable surface
    Grab,
    /// Closed hand, orbiting
    Grabbing,
    /// Move cursor, panning
    Move,
}

impl Cursor {
    /// CSS `cursor` value
    pub fn css_name(self) -> &'static str {
        match self {
            Cursor::Default => "default",
            Cursor::Grab => "grab",
            Cursor::Grabbing => "grabbing",
            Cursor::Move => "move",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = WindowConfig::new("Viewer")
            .size(640, 480)
            .resizable(false)
            .canvas_id("scene");
        assert_eq!(config.title, "Viewer");
        assert_eq!((config.width, config.height), (640, 480));
        assert!(!config.resizable);
        assert_eq!(config.canvas_id, "scene");
        assert!(config.transparent);
    }

    #[test]
    fn test_cursor_css() {
        assert_eq!(Cursor::Grabbing.css_name(), "grabbing");
        assert_eq!(Cursor::default().css_name(), "default");
    }
}
