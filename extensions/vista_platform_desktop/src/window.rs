//! Native window

use std::cell::Cell;
use std::sync::Arc;
use vista_platform::{Cursor, Window, WindowConfig};
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event_loop::ActiveEventLoop;
use winit::window::{CursorIcon, Window as WinitWindow, WindowAttributes};

/// A winit window hosting the viewer surface
pub struct DesktopWindow {
    window: Arc<WinitWindow>,
    focused: Cell<bool>,
}

impl DesktopWindow {
    pub fn new(event_loop: &ActiveEventLoop, config: &WindowConfig) -> Result<Self, winit::error::OsError> {
        let attrs = WindowAttributes::default()
            .with_title(config.title.as_str())
            .with_inner_size(LogicalSize::new(config.width, config.height))
            .with_resizable(config.resizable)
            .with_transparent(config.transparent);

        Ok(Self {
            window: Arc::new(event_loop.create_window(attrs)?),
            focused: Cell::new(true),
        })
    }

    /// Shared handle, usable as a `wgpu` surface target
    pub fn winit_window_arc(&self) -> Arc<WinitWindow> {
        Arc::clone(&self.window)
    }

    pub(crate) fn set_focused(&self, focused: bool) {
        self.focused.set(focused);
    }
}

fn cursor_icon(cursor: Cursor) -> CursorIcon {
    match cursor {
        Cursor::Default => CursorIcon::Default,
        Cursor::Grab => CursorIcon::Grab,
        Cursor::Grabbing => CursorIcon::Grabbing,
        Cursor::Move => CursorIcon::Move,
    }
}

impl Window for DesktopWindow {
    fn size(&self) -> (u32, u32) {
        let PhysicalSize { width, height } = self.window.inner_size();
        (width, height)
    }

    fn logical_size(&self) -> (f32, f32) {
        let size: LogicalSize<f32> = self.window.inner_size().to_logical(self.window.scale_factor());
        (size.width, size.height)
    }

    fn scale_factor(&self) -> f64 {
        self.window.scale_factor()
    }

    fn set_title(&self, title: &str) {
        self.window.set_title(title);
    }

    fn set_cursor(&self, cursor: Cursor) {
        self.window.set_cursor(cursor_icon(cursor));
    }

    fn request_redraw(&self) {
        self.window.request_redraw();
    }

    fn is_focused(&self) -> bool {
        self.focused.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_icons() {
        assert_eq!(cursor_icon(Cursor::Grabbing), CursorIcon::Grabbing);
        assert_eq!(cursor_icon(Cursor::Move), CursorIcon::Move);
    }
}
