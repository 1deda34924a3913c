//! Vista Platform Abstraction Layer
//!
//! Platform-agnostic traits and types for hosting the scene viewer: a
//! rendering surface, input delivery, and a frame callback that fires once
//! per display refresh.
//!
//! # Architecture
//!
//! - [`Platform`] - creates the host and its event loop
//! - [`Window`] - the rendering surface host (native window or browser canvas)
//! - [`EventLoop`] - delivers [`Event`]s until the handler returns [`ControlFlow::Exit`]
//!
//! # Platform Implementations
//!
//! - `vista_platform_desktop` - macOS, Windows, Linux via winit
//! - `vista_platform_web` - browsers via a canvas and `requestAnimationFrame`
//!
//! # Example
//!
//! ```ignore
//! use vista_platform::*;
//! use vista_platform_desktop::DesktopPlatform;
//!
//! fn main() -> Result<(), PlatformError> {
//!     let platform = DesktopPlatform::new()?;
//!     let event_loop = platform.create_event_loop(WindowConfig::new("Vista"))?;
//!
//!     event_loop.run(|event, _window| {
//!         match event {
//!             Event::Frame => { /* update and draw */ }
//!             Event::Window(WindowEvent::CloseRequested) => return ControlFlow::Exit,
//!             _ => {}
//!         }
//!         ControlFlow::Continue
//!     })
//! }
//! ```

mod error;
mod event;
mod input;
mod platform;
mod window;

pub use error::{PlatformError, Result};
pub use event::{ControlFlow, Event, EventLoop, LifecycleEvent, WindowEvent};
pub use input::{InputEvent, Key, KeyState, KeyboardEvent, Modifiers, MouseButton, MouseEvent};
pub use platform::Platform;
pub use window::{Cursor, Window, WindowConfig};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{PlatformError, Result};
    pub use crate::event::{ControlFlow, Event, EventLoop, LifecycleEvent, WindowEvent};
    pub use crate::input::{
        InputEvent, Key, KeyState, KeyboardEvent, Modifiers, MouseButton, MouseEvent,
    };
    pub use crate::platform::Platform;
    pub use crate::window::{Cursor, Window, WindowConfig};
}
