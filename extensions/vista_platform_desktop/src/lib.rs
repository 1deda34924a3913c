//! Vista Desktop Platform
//!
//! Windowing and input for macOS, Windows, and Linux using winit.
//!
//! Implements the `vista_platform` traits. The event loop redraws
//! continuously: every `Frame` event requests the next one, so the viewer's
//! render loop runs once per display refresh.
//!
//! # Example
//!
//! ```ignore
//! use vista_platform::prelude::*;
//! use vista_platform_desktop::DesktopPlatform;
//!
//! fn main() -> Result<(), PlatformError> {
//!     let platform = DesktopPlatform::new()?;
//!     let event_loop = platform.create_event_loop(WindowConfig::default())?;
//!
//!     event_loop.run(|event, _window| {
//!         if let Event::Window(WindowEvent::CloseRequested) = event {
//!             return ControlFlow::Exit;
//!         }
//!         ControlFlow::Continue
//!     })
//! }
//! ```

pub mod event_loop;
pub mod input;
pub mod window;

pub use event_loop::DesktopEventLoop;
pub use window::DesktopWindow;

use vista_platform::{Platform, PlatformError, WindowConfig};

/// Desktop platform implementation
pub struct DesktopPlatform;

impl Platform for DesktopPlatform {
    type Window = DesktopWindow;
    type EventLoop = DesktopEventLoop;

    fn new() -> Result<Self, PlatformError> {
        Ok(Self)
    }

    fn create_event_loop(&self, config: WindowConfig) -> Result<Self::EventLoop, PlatformError> {
        DesktopEventLoop::new(config)
    }

    fn name(&self) -> &'static str {
        "desktop"
    }
}
