//! Vista Web Platform
//!
//! Hosts the viewer inside a browser page. The surface is an
//! `HtmlCanvasElement`; DOM listeners translate pointer, wheel, keyboard and
//! resize events into `vista_platform` events, and a
//! `requestAnimationFrame` loop delivers one `Frame` per display refresh.
//!
//! The backend only exists on `wasm32`. The DOM-to-event conversions in
//! [`input`] are plain functions and compile everywhere.

pub mod input;

#[cfg(target_arch = "wasm32")]
mod event_loop;
#[cfg(target_arch = "wasm32")]
mod listener;
#[cfg(target_arch = "wasm32")]
mod window;

#[cfg(target_arch = "wasm32")]
pub use event_loop::WebEventLoop;
#[cfg(target_arch = "wasm32")]
pub use window::WebWindow;

#[cfg(target_arch = "wasm32")]
pub use platform::WebPlatform;

#[cfg(target_arch = "wasm32")]
mod platform {
    use crate::event_loop::WebEventLoop;
    use crate::window::WebWindow;
    use vista_platform::{Platform, PlatformError, WindowConfig};

    /// Browser platform implementation
    pub struct WebPlatform {
        window: web_sys::Window,
    }

    impl Platform for WebPlatform {
        type Window = WebWindow;
        type EventLoop = WebEventLoop;

        fn new() -> Result<Self, PlatformError> {
            let window =
                web_sys::window().ok_or_else(|| PlatformError::Unavailable("window".into()))?;
            Ok(Self { window })
        }

        fn create_event_loop(
            &self,
            config: WindowConfig,
        ) -> Result<Self::EventLoop, PlatformError> {
            let window = WebWindow::attach(self.window.clone(), &config)?;
            Ok(WebEventLoop::new(window))
        }

        fn name(&self) -> &'static str {
            "web"
        }
    }
}
