//! Native window runner

use vista_gpu::GpuContext;
use vista_platform::{Platform, Window};
use vista_platform_desktop::{DesktopPlatform, DesktopWindow};

use crate::config::ViewerConfig;
use crate::engine::Engine;
use crate::error::Result;

/// Open a window and run the viewer until it is closed
pub fn run_desktop(config: ViewerConfig) -> Result<()> {
    let platform = DesktopPlatform::new()?;
    let event_loop = platform.create_event_loop(config.window_config())?;
    let settings = config.context_settings();
    tracing::info!(platform = platform.name(), "starting viewer");

    let engine = Engine::new(config);
    engine.animate(event_loop, move |window: &DesktopWindow| {
        let (width, height) = window.size();
        let ctx = GpuContext::new(window.winit_window_arc(), width, height, settings);
        Ok(pollster::block_on(ctx)?)
    })
}
