//! Event loop and platform events

use crate::error::PlatformError;
use crate::input::InputEvent;
use crate::window::Window;

/// Event loop abstraction
///
/// Each backend drives the handler with events until it returns
/// [`ControlFlow::Exit`] or the host goes away.
pub trait EventLoop {
    /// The window type handed to the handler
    type Window: Window;

    /// Run the event loop
    ///
    /// On desktop this blocks until exit. In the browser it returns after
    /// scheduling the first animation frame; the handler keeps running from
    /// `requestAnimationFrame` callbacks.
    fn run<F>(self, handler: F) -> Result<(), PlatformError>
    where
        F: FnMut(Event, &Self::Window) -> ControlFlow + 'static;
}

/// Control flow after handling an event
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ControlFlow {
    /// Keep the loop running
    #[default]
    Continue,
    /// Stop the loop and cancel the pending frame
    Exit,
}

/// Platform events
#[derive(Clone, Debug)]
pub enum Event {
    /// Window or canvas event
    Window(WindowEvent),
    /// Mouse, keyboard, or wheel input
    Input(InputEvent),
    /// Host lifecycle
    Lifecycle(LifecycleEvent),
    /// Display refresh tick; update the scene and draw
    Frame,
}

/// Window events
#[derive(Clone, Debug, PartialEq)]
pub enum WindowEvent {
    /// Surface was resized; never delivered with a zero dimension
    Resized {
        /// New width in physical pixels
        width: u32,
        /// New height in physical pixels
        height: u32,
    },
    /// Close was requested (window close button, page unload)
    CloseRequested,
    /// Window gained or lost focus
    Focused(bool),
    /// Display scale factor changed
    ScaleFactorChanged {
        /// New scale factor
        scale_factor: f64,
    },
}

impl WindowEvent {
    /// Build a resize event, dropping degenerate sizes (minimized windows,
    /// hidden canvases)
    pub fn resized(width: u32, height: u32) -> Option<Self> {
        (width > 0 && height > 0).then_some(WindowEvent::Resized { width, height })
    }
}

/// Host lifecycle events
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// The surface is ready; create GPU resources
    Resumed,
    /// The surface is going away; release GPU resources
    Suspended,
}
