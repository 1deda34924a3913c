//! # Vista
//!
//! A 3D scene viewer. [`Engine`] builds a lit scene (a spinning cube over a
//! ground plane, a pivot group of a sphere and two procedural shader meshes
//! circling the orbit target, shadow-casting sun and spot lights), loads a
//! glTF model and an HDR environment in the background, and drives a
//! continuous render loop with orbit camera controls.
//!
//! # Example
//!
//! ```ignore
//! use vista_app::{run_desktop, ViewerConfig};
//!
//! fn main() -> vista_app::Result<()> {
//!     run_desktop(ViewerConfig::load("viewer.toml")?)
//! }
//! ```
//!
//! In the browser the `run_web(canvas_id, config_json)` export does the same
//! on a canvas.
//!
//! # Controls
//!
//! | Input | Action |
//! |---|---|
//! | Left drag | Orbit |
//! | Right / middle drag | Pan |
//! | Wheel | Zoom |
//! | `R` | Reset camera |
//! | `N` | Crossfade to the next animation clip |
//! | `Space` | Pause scene animation |

pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod input;
pub mod loading;
pub mod scene;

#[cfg(all(feature = "desktop", not(target_arch = "wasm32")))]
mod desktop;

#[cfg(target_arch = "wasm32")]
mod web;

pub use config::ViewerConfig;
pub use engine::{Engine, LoadedModel};
pub use error::{Result, ViewerError};
pub use input::ViewerAction;
pub use loading::{AssetEvent, AssetKind, AssetLoader};
pub use scene::SceneHandles;

#[cfg(all(feature = "desktop", not(target_arch = "wasm32")))]
pub use desktop::run_desktop;

#[cfg(target_arch = "wasm32")]
pub use web::run_web;
