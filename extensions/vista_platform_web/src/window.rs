//! Canvas-backed window

use std::cell::Cell;

use vista_platform::{Cursor, PlatformError, Window, WindowConfig};
use wasm_bindgen::JsCast;
use web_sys::HtmlCanvasElement;

use crate::input::backing_size;

/// The browser surface host: a canvas sized to the viewport
pub struct WebWindow {
    window: web_sys::Window,
    canvas: HtmlCanvasElement,
    focused: Cell<bool>,
}

impl WebWindow {
    /// Find the canvas with `config.canvas_id`, creating and appending it to
    /// `<body>` when the page has none
    pub fn attach(window: web_sys::Window, config: &WindowConfig) -> Result<Self, PlatformError> {
        let document = window
            .document()
            .ok_or_else(|| PlatformError::Unavailable("document".into()))?;
        document.set_title(&config.title);

        let canvas = match document.get_element_by_id(&config.canvas_id) {
            Some(element) => element
                .dyn_into::<HtmlCanvasElement>()
                .map_err(|_| {
                    PlatformError::WindowCreation(format!(
                        "element #{} is not a canvas",
                        config.canvas_id
                    ))
                })?,
            None => {
                let canvas = document
                    .create_element("canvas")
                    .map_err(|e| PlatformError::WindowCreation(format!("{e:?}")))?
                    .dyn_into::<HtmlCanvasElement>()
                    .map_err(|_| PlatformError::WindowCreation("canvas element".into()))?;
                canvas.set_id(&config.canvas_id);
                let body = document
                    .body()
                    .ok_or_else(|| PlatformError::Unavailable("document.body".into()))?;
                body.append_child(&canvas)
                    .map_err(|e| PlatformError::WindowCreation(format!("{e:?}")))?;
                tracing::debug!(id = %config.canvas_id, "created canvas");
                canvas
            }
        };

        // Keyboard events need a focusable canvas
        canvas.set_tab_index(0);
        let _ = canvas.style().set_property("display", "block");
        let _ = canvas.style().set_property("width", "100%");
        let _ = canvas.style().set_property("height", "100%");

        let web_window = Self {
            window,
            canvas,
            focused: Cell::new(true),
        };
        web_window.fit_to_viewport();
        Ok(web_window)
    }

    /// The canvas element, for creating a GPU surface
    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    /// The browser window
    pub fn dom_window(&self) -> &web_sys::Window {
        &self.window
    }

    /// Resize the backing store to the viewport size × devicePixelRatio.
    /// Returns the new physical size.
    pub fn fit_to_viewport(&self) -> (u32, u32) {
        let css_width = self
            .window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(1.0);
        let css_height = self
            .window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(1.0);
        let (width, height) = backing_size(css_width, css_height, self.window.device_pixel_ratio());
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        (width, height)
    }

    pub(crate) fn set_focused(&self, focused: bool) {
        self.focused.set(focused);
    }
}

impl Window for WebWindow {
    fn size(&self) -> (u32, u32) {
        (self.canvas.width(), self.canvas.height())
    }

    fn logical_size(&self) -> (f32, f32) {
        (
            self.canvas.client_width() as f32,
            self.canvas.client_height() as f32,
        )
    }

    fn scale_factor(&self) -> f64 {
        self.window.device_pixel_ratio()
    }

    fn set_title(&self, title: &str) {
        if let Some(document) = self.window.document() {
            document.set_title(title);
        }
    }

    fn set_cursor(&self, cursor: Cursor) {
        let _ = self.canvas.style().set_property("cursor", cursor.css_name());
    }

    fn request_redraw(&self) {
        // The animation frame loop redraws continuously
    }

    fn is_focused(&self) -> bool {
        self.focused.get()
    }
}
