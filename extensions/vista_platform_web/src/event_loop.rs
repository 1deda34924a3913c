//! `requestAnimationFrame` event loop

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use vista_platform::{
    ControlFlow, Event, EventLoop, InputEvent, LifecycleEvent, Modifiers, MouseButton, MouseEvent,
    PlatformError, WindowEvent,
};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

use crate::input::{client_to_surface, keyboard_event, wheel_to_scroll};
use crate::listener::Listener;
use crate::window::WebWindow;

type Queue = Rc<RefCell<VecDeque<Event>>>;
type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// Browser event loop
///
/// DOM listeners only queue events. Each animation frame drains the queue
/// into the handler, then delivers `Frame`, so the handler never runs
/// re-entrantly from inside a DOM callback.
pub struct WebEventLoop {
    window: WebWindow,
}

impl WebEventLoop {
    pub(crate) fn new(window: WebWindow) -> Self {
        Self { window }
    }

    /// The window, available before the loop starts so the GPU surface can
    /// be created first
    pub fn window(&self) -> &WebWindow {
        &self.window
    }
}

struct LoopState<F> {
    window: WebWindow,
    handler: F,
    queue: Queue,
    listeners: Vec<Listener>,
    frame_id: Option<i32>,
    exited: bool,
}

impl<F> LoopState<F>
where
    F: FnMut(Event, &WebWindow) -> ControlFlow + 'static,
{
    fn dispatch(&mut self, event: Event) {
        if self.exited {
            return;
        }
        if let Event::Window(WindowEvent::Focused(focused)) = event {
            self.window.set_focused(focused);
        }
        if (self.handler)(event, &self.window) == ControlFlow::Exit {
            self.exit();
        }
    }

    fn exit(&mut self) {
        self.exited = true;
        if let Some(id) = self.frame_id.take() {
            let _ = self.window.dom_window().cancel_animation_frame(id);
        }
        // Dropping the listeners unregisters them
        self.listeners.clear();
        tracing::info!("web event loop stopped");
    }
}

impl EventLoop for WebEventLoop {
    type Window = WebWindow;

    fn run<F>(self, handler: F) -> Result<(), PlatformError>
    where
        F: FnMut(Event, &Self::Window) -> ControlFlow + 'static,
    {
        let queue: Queue = Rc::new(RefCell::new(VecDeque::new()));
        let listeners = register_listeners(&self.window, &queue)?;
        let document = self
            .window
            .dom_window()
            .document()
            .ok_or_else(|| PlatformError::Unavailable("document".into()))?;

        let state = Rc::new(RefCell::new(LoopState {
            window: self.window,
            handler,
            queue,
            listeners,
            frame_id: None,
            exited: false,
        }));

        if document.ready_state() != "loading" {
            start(state);
        } else {
            let pending = Rc::new(RefCell::new(Some(state)));
            let ready = Listener::new(&document, "DOMContentLoaded", move |_| {
                if let Some(state) = pending.borrow_mut().take() {
                    start(state);
                }
            });
            // The page lives as long as the module; keep the one-shot listener
            std::mem::forget(ready);
        }
        Ok(())
    }
}

fn start<F>(state: Rc<RefCell<LoopState<F>>>)
where
    F: FnMut(Event, &WebWindow) -> ControlFlow + 'static,
{
    {
        let mut s = state.borrow_mut();
        s.dispatch(Event::Lifecycle(LifecycleEvent::Resumed));
        let (width, height) = s.window.fit_to_viewport();
        if let Some(resized) = WindowEvent::resized(width, height) {
            s.dispatch(Event::Window(resized));
        }
    }

    let callback: FrameCallback = Rc::new(RefCell::new(None));
    let next = Rc::clone(&callback);
    let loop_state = Rc::clone(&state);

    *callback.borrow_mut() = Some(Closure::new(move |_timestamp: f64| {
        let mut s = loop_state.borrow_mut();
        s.frame_id = None;

        let pending: Vec<Event> = s.queue.borrow_mut().drain(..).collect();
        for event in pending {
            s.dispatch(event);
        }
        s.dispatch(Event::Frame);

        if s.exited {
            // Break the closure's self-reference so it can be freed
            next.borrow_mut().take();
            return;
        }
        if let Some(cb) = next.borrow().as_ref() {
            s.frame_id = request_frame(s.window.dom_window(), cb);
        }
    }));

    let first = callback
        .borrow()
        .as_ref()
        .and_then(|cb| request_frame(state.borrow().window.dom_window(), cb));
    state.borrow_mut().frame_id = first;
    tracing::info!("web event loop started");
}

fn request_frame(window: &web_sys::Window, cb: &Closure<dyn FnMut(f64)>) -> Option<i32> {
    match window.request_animation_frame(cb.as_ref().unchecked_ref()) {
        Ok(id) => Some(id),
        Err(err) => {
            tracing::error!(?err, "requestAnimationFrame failed");
            None
        }
    }
}

fn register_listeners(window: &WebWindow, queue: &Queue) -> Result<Vec<Listener>, PlatformError> {
    let canvas = window.canvas().clone();
    let dom_window = window.dom_window().clone();
    let mut listeners = Vec::new();

    let position = {
        let canvas = canvas.clone();
        let dom_window = dom_window.clone();
        move |event: &web_sys::MouseEvent| {
            let rect = canvas.get_bounding_client_rect();
            client_to_surface(
                event.client_x() as f64,
                event.client_y() as f64,
                rect.left(),
                rect.top(),
                dom_window.device_pixel_ratio(),
            )
        }
    };

    let mut push = |target: &web_sys::EventTarget,
                    kind: &'static str,
                    convert: Box<dyn Fn(&web_sys::Event) -> Option<Event>>| {
        let queue = Rc::clone(queue);
        if let Some(listener) = Listener::new(target, kind, move |event| {
            if let Some(converted) = convert(&event) {
                queue.borrow_mut().push_back(converted);
            }
        }) {
            listeners.push(listener);
        }
    };

    let pos = position.clone();
    push(
        &canvas,
        "mousemove",
        Box::new(move |event| {
            let event = event.dyn_ref::<web_sys::MouseEvent>()?;
            let (x, y) = pos(event);
            Some(Event::Input(InputEvent::Mouse(MouseEvent::Moved { x, y })))
        }),
    );

    let pos = position.clone();
    push(
        &canvas,
        "mousedown",
        Box::new(move |event| {
            let event = event.dyn_ref::<web_sys::MouseEvent>()?;
            let (x, y) = pos(event);
            Some(Event::Input(InputEvent::Mouse(MouseEvent::ButtonPressed {
                button: MouseButton::from_dom(event.button()),
                x,
                y,
            })))
        }),
    );

    // Releases outside the canvas still end a drag
    let pos = position.clone();
    push(
        &dom_window,
        "mouseup",
        Box::new(move |event| {
            let event = event.dyn_ref::<web_sys::MouseEvent>()?;
            let (x, y) = pos(event);
            Some(Event::Input(InputEvent::Mouse(MouseEvent::ButtonReleased {
                button: MouseButton::from_dom(event.button()),
                x,
                y,
            })))
        }),
    );

    push(
        &canvas,
        "mouseenter",
        Box::new(|_| Some(Event::Input(InputEvent::Mouse(MouseEvent::Entered)))),
    );
    push(
        &canvas,
        "mouseleave",
        Box::new(|_| Some(Event::Input(InputEvent::Mouse(MouseEvent::Left)))),
    );

    push(
        &canvas,
        "wheel",
        Box::new(|event| {
            let wheel = event.dyn_ref::<web_sys::WheelEvent>()?;
            // Keep the page from scrolling under the viewer
            event.prevent_default();
            Some(Event::Input(wheel_to_scroll(
                wheel.delta_x(),
                wheel.delta_y(),
                wheel.delta_mode(),
            )))
        }),
    );

    // Right-drag pans; suppress the context menu
    push(
        &canvas,
        "contextmenu",
        Box::new(|event| {
            event.prevent_default();
            None
        }),
    );

    for (kind, pressed) in [("keydown", true), ("keyup", false)] {
        push(
            &canvas,
            kind,
            Box::new(move |event| {
                let key = event.dyn_ref::<web_sys::KeyboardEvent>()?;
                let modifiers = Modifiers {
                    shift: key.shift_key(),
                    ctrl: key.ctrl_key(),
                    alt: key.alt_key(),
                    meta: key.meta_key(),
                };
                Some(Event::Input(keyboard_event(&key.key(), pressed, modifiers)))
            }),
        );
    }

    push(
        &canvas,
        "focus",
        Box::new(|_| Some(Event::Window(WindowEvent::Focused(true)))),
    );
    push(
        &canvas,
        "blur",
        Box::new(|_| Some(Event::Window(WindowEvent::Focused(false)))),
    );

    {
        let canvas = canvas.clone();
        let dom_window = dom_window.clone();
        push(
            &dom_window.clone(),
            "resize",
            Box::new(move |_| {
                let css_width = dom_window.inner_width().ok()?.as_f64()?;
                let css_height = dom_window.inner_height().ok()?.as_f64()?;
                let (width, height) = crate::input::backing_size(
                    css_width,
                    css_height,
                    dom_window.device_pixel_ratio(),
                );
                canvas.set_width(width);
                canvas.set_height(height);
                WindowEvent::resized(width, height).map(Event::Window)
            }),
        );
    }

    push(
        &dom_window,
        "beforeunload",
        Box::new(|_| Some(Event::Window(WindowEvent::CloseRequested))),
    );

    if listeners.is_empty() {
        return Err(PlatformError::EventLoop(
            "no DOM listeners could be registered".into(),
        ));
    }
    Ok(listeners)
}
