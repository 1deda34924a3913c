//! Platform trait

use crate::error::PlatformError;
use crate::event::EventLoop;
use crate::window::{Window, WindowConfig};

/// Platform abstraction trait
///
/// Implemented by each backend (desktop, web) to create the surface host and
/// the event loop that drives it.
pub trait Platform {
    /// The window type for this platform
    type Window: Window;
    /// The event loop type for this platform
    type EventLoop: EventLoop<Window = Self::Window>;

    /// Create a new platform instance
    fn new() -> Result<Self, PlatformError>
    where
        Self: Sized;

    /// Create an event loop whose window is built from `config`
    fn create_event_loop(&self, config: WindowConfig) -> Result<Self::EventLoop, PlatformError>;

    /// Platform name ("desktop", "web")
    fn name(&self) -> &'static str;
}
