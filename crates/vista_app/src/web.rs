//! Browser entry point
//!
//! ```js
//! import init, { run_web } from "./vista_app.js";
//! await init();
//! await run_web("vista-canvas", JSON.stringify({ render: { shadows: false } }));
//! ```

use std::sync::Once;

use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::prelude::*;
use vista_gpu::GpuContext;
use vista_platform::Platform;
use vista_platform_web::WebPlatform;
use wasm_bindgen::prelude::*;

use crate::config::ViewerConfig;
use crate::engine::Engine;
use crate::error::ViewerError;

/// Start the viewer on the canvas with id `canvas_id`
///
/// `config_json` holds a partial [`ViewerConfig`]; an empty string means the
/// stock scene. Resolves once the render loop is scheduled.
#[wasm_bindgen]
pub async fn run_web(canvas_id: String, config_json: String) -> Result<(), JsValue> {
    init_logging();
    start(canvas_id, &config_json).await.map_err(|e| JsValue::from_str(&e.to_string()))
}

async fn start(canvas_id: String, config_json: &str) -> Result<(), ViewerError> {
    let mut config = ViewerConfig::from_json(config_json)?;
    if !canvas_id.is_empty() {
        config.window.canvas_id = canvas_id;
    }

    let platform = WebPlatform::new()?;
    let event_loop = platform.create_event_loop(config.window_config())?;

    // Surface creation is async in the browser, so it happens before the
    // loop starts rather than on resume
    let window = event_loop.window();
    let (width, height) = window.fit_to_viewport();
    let target = wgpu::SurfaceTarget::Canvas(window.canvas().clone());
    let ctx = GpuContext::new(target, width, height, config.context_settings()).await?;

    let mut engine = Engine::new(config);
    engine.attach_gpu(ctx);
    engine.animate(event_loop, |_| {
        Err(ViewerError::Platform("the browser surface cannot be recreated".into()))
    })
}

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        console_error_panic_hook::set_once();
        let layer = tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .without_time()
            .with_writer(ConsoleWriter);
        let _ = tracing_subscriber::registry()
            .with(tracing_subscriber::EnvFilter::new("info,wgpu_core=warn,wgpu_hal=warn"))
            .with(layer)
            .try_init();
    });
}

/// Routes formatted log lines to `console.log`
#[derive(Clone, Copy)]
struct ConsoleWriter;

impl std::io::Write for ConsoleWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let line = String::from_utf8_lossy(buf);
        web_sys::console::log_1(&JsValue::from_str(line.trim_end()));
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for ConsoleWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        *self
    }
}
