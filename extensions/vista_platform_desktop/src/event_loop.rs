//! winit-driven event loop

use crate::input;
use crate::window::DesktopWindow;
use vista_platform::{
    ControlFlow, Event, EventLoop, InputEvent, LifecycleEvent, MouseEvent, PlatformError, Window,
    WindowConfig, WindowEvent,
};
use winit::application::ApplicationHandler;
use winit::event::{StartCause, WindowEvent as WinitEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop as WinitEventLoop};
use winit::keyboard::ModifiersState;
use winit::window::WindowId;

/// Event loop for native windows
///
/// The window itself is created on the first `resumed` callback, as winit
/// requires.
pub struct DesktopEventLoop {
    inner: WinitEventLoop<()>,
    config: WindowConfig,
}

impl DesktopEventLoop {
    pub fn new(config: WindowConfig) -> Result<Self, PlatformError> {
        let inner = WinitEventLoop::new().map_err(|e| PlatformError::EventLoop(e.to_string()))?;
        Ok(Self { inner, config })
    }
}

impl EventLoop for DesktopEventLoop {
    type Window = DesktopWindow;

    fn run<F>(self, handler: F) -> Result<(), PlatformError>
    where
        F: FnMut(Event, &Self::Window) -> ControlFlow + 'static,
    {
        let mut host = Host {
            config: self.config,
            window: None,
            handler,
            translator: Translator::default(),
            exiting: false,
        };
        self.inner
            .run_app(&mut host)
            .map_err(|e| PlatformError::EventLoop(e.to_string()))
    }
}

/// Pointer and modifier state winit reports separately from the events
/// that need it
#[derive(Default)]
struct Translator {
    modifiers: ModifiersState,
    pointer: (f32, f32),
}

impl Translator {
    /// The platform event for a winit window event, if it maps to one
    fn translate(&mut self, event: WinitEvent) -> Option<Event> {
        let event = match event {
            WinitEvent::CloseRequested => Event::Window(WindowEvent::CloseRequested),
            WinitEvent::Resized(size) => Event::Window(WindowEvent::resized(size.width, size.height)?),
            WinitEvent::Focused(focused) => Event::Window(WindowEvent::Focused(focused)),
            WinitEvent::ScaleFactorChanged { scale_factor, .. } => {
                Event::Window(WindowEvent::ScaleFactorChanged { scale_factor })
            }
            WinitEvent::RedrawRequested => Event::Frame,
            WinitEvent::ModifiersChanged(mods) => {
                self.modifiers = mods.state();
                return None;
            }
            WinitEvent::KeyboardInput { event, .. } => Event::Input(input::convert_keyboard_event(
                &event.logical_key,
                event.state,
                self.modifiers,
            )),
            WinitEvent::CursorMoved { position, .. } => {
                self.pointer = (position.x as f32, position.y as f32);
                Event::Input(input::mouse_moved(self.pointer.0, self.pointer.1))
            }
            WinitEvent::MouseInput { state, button, .. } => {
                Event::Input(input::mouse_input(state, button, self.pointer.0, self.pointer.1))
            }
            WinitEvent::MouseWheel { delta, .. } => Event::Input(input::scroll_event(delta)),
            WinitEvent::CursorEntered { .. } => Event::Input(InputEvent::Mouse(MouseEvent::Entered)),
            WinitEvent::CursorLeft { .. } => Event::Input(InputEvent::Mouse(MouseEvent::Left)),
            _ => return None,
        };
        Some(event)
    }
}

struct Host<F> {
    config: WindowConfig,
    window: Option<DesktopWindow>,
    handler: F,
    translator: Translator,
    exiting: bool,
}

impl<F> Host<F>
where
    F: FnMut(Event, &DesktopWindow) -> ControlFlow,
{
    fn dispatch(&mut self, event: Event) {
        let Some(window) = &self.window else {
            return;
        };
        if let Event::Window(WindowEvent::Focused(focused)) = event {
            window.set_focused(focused);
        }
        let is_frame = matches!(event, Event::Frame);
        if (self.handler)(event, window) == ControlFlow::Exit {
            self.exiting = true;
        } else if is_frame {
            // Keep the render loop going at display rate
            window.request_redraw();
        }
    }
}

impl<F> ApplicationHandler for Host<F>
where
    F: FnMut(Event, &DesktopWindow) -> ControlFlow,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            match DesktopWindow::new(event_loop, &self.config) {
                Ok(window) => {
                    tracing::debug!(size = ?window.size(), "desktop window created");
                    self.window = Some(window);
                }
                Err(e) => {
                    tracing::error!("Failed to create window: {e}");
                    event_loop.exit();
                    return;
                }
            }
        }
        self.dispatch(Event::Lifecycle(LifecycleEvent::Resumed));
        if let Some(window) = &self.window {
            window.request_redraw();
        }
        if self.exiting {
            event_loop.exit();
        }
    }

    fn suspended(&mut self, _event_loop: &ActiveEventLoop) {
        self.dispatch(Event::Lifecycle(LifecycleEvent::Suspended));
    }

    fn new_events(&mut self, _event_loop: &ActiveEventLoop, cause: StartCause) {
        if matches!(cause, StartCause::WaitCancelled { .. } | StartCause::Poll) {
            if let Some(window) = &self.window {
                window.request_redraw();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WinitEvent) {
        if let Some(event) = self.translator.translate(event) {
            self.dispatch(event);
        }
        if self.exiting {
            event_loop.exit();
        }
    }
}
