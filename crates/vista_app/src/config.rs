//! Viewer configuration
//!
//! Stored as `viewer.toml`. Every field has a default, so a partial file (or
//! no file at all) yields the stock scene.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, ViewerError};

/// Complete viewer configuration
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub window: WindowSection,
    pub camera: CameraSection,
    pub controls: ControlsSection,
    pub lights: LightsSection,
    pub scene: SceneSection,
    pub model: ModelSection,
    pub environment: EnvironmentSection,
    pub render: RenderSection,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct WindowSection {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Canvas element hosting the viewer in the browser
    pub canvas_id: String,
}

impl Default for WindowSection {
    fn default() -> Self {
        Self {
            title: "Vista".to_string(),
            width: 1280,
            height: 720,
            canvas_id: "vista-canvas".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CameraSection {
    /// Vertical field of view in degrees
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    pub position: [f32; 3],
}

impl Default for CameraSection {
    fn default() -> Self {
        Self {
            fov: 75.0,
            near: 0.01,
            far: 100.0,
            position: [0.0, 0.0, 5.0],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ControlsSection {
    pub min_distance: f32,
    pub max_distance: f32,
    pub target: [f32; 3],
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    /// Fraction of the remaining motion kept each 60 Hz frame; 0 disables
    /// easing
    pub damping: f32,
}

impl Default for ControlsSection {
    fn default() -> Self {
        Self {
            min_distance: 5.0,
            max_distance: 10.0,
            target: [15.0, 0.0, 0.0],
            rotate_speed: 0.005,
            zoom_speed: 0.05,
            pan_speed: 0.001,
            damping: 0.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LightsSection {
    /// Ambient color as 0xRRGGBB
    pub ambient_color: u32,
    pub sun_color: u32,
    pub sun_intensity: f32,
    pub sun_position: [f32; 3],
    /// Grows each edge of the sun's shadow camera
    pub shadow_enlarge: f32,
    /// Circle the sun around the scene
    pub animate_sun: bool,
    pub sun_orbit_radius: f32,
    /// Radians per millisecond
    pub sun_orbit_speed: f32,
    pub spot_color: u32,
    pub spot_intensity: f32,
    pub spot_position: [f32; 3],
    /// Spot cone half-angle in radians
    pub spot_angle: f32,
    /// Draw the shadow camera and spot cone helpers
    pub helpers: bool,
}

impl Default for LightsSection {
    fn default() -> Self {
        Self {
            ambient_color: 0x404040,
            sun_color: 0xffffff,
            sun_intensity: 1.0,
            sun_position: [20.0, 20.0, 20.0],
            shadow_enlarge: 25.0,
            animate_sun: false,
            sun_orbit_radius: 20.0,
            sun_orbit_speed: 0.0005,
            spot_color: 0xffffff,
            spot_intensity: 1.0,
            spot_position: [-100.0, 100.0, 0.0],
            spot_angle: 0.2,
            helpers: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SceneSection {
    pub cube_color: u32,
    /// Radians per frame about x and y
    pub cube_spin: f32,
    pub ground_size: f32,
    /// Radians per frame about y
    pub pivot_spin: f32,
}

impl Default for SceneSection {
    fn default() -> Self {
        Self {
            cube_color: 0x00ff00,
            cube_spin: 0.01,
            ground_size: 60.0,
            pivot_spin: 0.005,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ModelSection {
    /// glTF/GLB file; `None` (an empty string on disk) skips model loading
    #[serde(with = "optional_path")]
    pub path: Option<PathBuf>,
    /// Add the model to the scene once loaded
    pub attach: bool,
    pub position: [f32; 3],
    pub scale: f32,
    /// Radians per frame about y
    pub spin: f32,
    /// Clip to start with; the first clip when unset or missing
    pub clip: Option<String>,
    /// Seconds to blend when switching clips
    pub crossfade: f32,
}

impl Default for ModelSection {
    fn default() -> Self {
        Self {
            path: Some(PathBuf::from("assets/frame.glb")),
            attach: true,
            position: [1.0, 1.0, 1.0],
            scale: 4.0,
            spin: 0.01,
            clip: None,
            crossfade: 0.5,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct EnvironmentSection {
    /// Equirectangular Radiance HDR file; empty on disk when unset
    #[serde(with = "optional_path")]
    pub path: Option<PathBuf>,
    /// Draw the environment behind the scene
    pub background: bool,
    /// Light lit materials with the environment's average radiance
    pub lighting: bool,
}

impl Default for EnvironmentSection {
    fn default() -> Self {
        Self {
            path: Some(PathBuf::from("assets/quarry_01_1k.hdr")),
            background: false,
            lighting: false,
        }
    }
}

/// Unset paths are written as `""`, since TOML has no null and an omitted
/// field would load back as the stock asset
mod optional_path {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::path::PathBuf;

    pub fn serialize<S: Serializer>(path: &Option<PathBuf>, serializer: S) -> Result<S::Ok, S::Error> {
        let text = path.as_ref().map(|p| p.to_string_lossy()).unwrap_or_default();
        serializer.serialize_str(&text)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<PathBuf>, D::Error> {
        let text = Option::<String>::deserialize(deserializer)?;
        Ok(text.filter(|t| !t.is_empty()).map(PathBuf::from))
    }
}

impl EnvironmentSection {
    /// The HDR is only fetched when something uses it
    pub fn is_used(&self) -> bool {
        self.path.is_some() && (self.background || self.lighting)
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RenderSection {
    pub shadows: bool,
    /// MSAA samples; 1 disables antialiasing
    pub msaa: u32,
    /// Transparent canvas composited over the page
    pub transparent: bool,
    pub vsync: bool,
    /// Linear RGBA the frame is cleared to
    pub clear_color: [f64; 4],
}

impl Default for RenderSection {
    fn default() -> Self {
        Self {
            shadows: true,
            msaa: 4,
            transparent: true,
            vsync: true,
            clear_color: [0.0, 0.0, 0.0, 0.0],
        }
    }
}

impl ViewerConfig {
    /// Load from a TOML file, falling back to defaults when it does not exist
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .map_err(|e| ViewerError::Config(format!("failed to read {}: {e}", path.display())))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| ViewerError::Config(e.to_string()))
    }

    /// Parse the JSON handed to the browser entry point; empty means defaults
    pub fn from_json(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(content).map_err(|e| ViewerError::Config(e.to_string()))
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| ViewerError::Config(e.to_string()))
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.to_toml()?)
            .map_err(|e| ViewerError::Config(format!("failed to write {}: {e}", path.display())))
    }

    /// Window settings for the platform layer
    pub fn window_config(&self) -> vista_platform::WindowConfig {
        vista_platform::WindowConfig::new(self.window.title.clone())
            .size(self.window.width, self.window.height)
            .transparent(self.render.transparent)
            .canvas_id(self.window.canvas_id.clone())
    }

    /// Surface settings for the GPU context
    pub fn context_settings(&self) -> vista_gpu::ContextSettings {
        vista_gpu::ContextSettings {
            sample_count: self.render.msaa.max(1),
            transparent: self.render.transparent,
            vsync: self.render.vsync,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_stock_scene() {
        let config = ViewerConfig::default();
        assert_eq!(config.camera.fov, 75.0);
        assert_eq!(config.camera.position, [0.0, 0.0, 5.0]);
        assert_eq!(config.controls.min_distance, 5.0);
        assert_eq!(config.controls.max_distance, 10.0);
        assert_eq!(config.controls.target, [15.0, 0.0, 0.0]);
        assert_eq!(config.lights.ambient_color, 0x404040);
        assert_eq!(config.lights.shadow_enlarge, 25.0);
        assert!(!config.lights.animate_sun);
        assert!(config.model.attach);
        assert_eq!(config.model.scale, 4.0);
        assert!(!config.environment.background);
        assert!(!config.environment.lighting);
        assert!(!config.environment.is_used());
    }

    #[test]
    fn test_partial_toml() {
        let config = ViewerConfig::from_toml(
            r#"
            [model]
            attach = false
            clip = "Walk"

            [environment]
            background = true

            [render]
            shadows = false
            "#,
        )
        .unwrap();
        assert!(!config.model.attach);
        assert_eq!(config.model.clip.as_deref(), Some("Walk"));
        assert_eq!(config.model.scale, 4.0);
        assert!(config.environment.is_used());
        assert!(!config.render.shadows);
        assert_eq!(config.window, WindowSection::default());
    }

    #[test]
    fn test_toml_round_trip_and_hex_colors() {
        let mut config = ViewerConfig::default();
        config.model.path = None;
        config.environment.path = None;
        let text = config.to_toml().unwrap();
        assert_eq!(ViewerConfig::from_toml(&text).unwrap(), config);

        let stock = ViewerConfig::default();
        let text = stock.to_toml().unwrap();
        assert_eq!(ViewerConfig::from_toml(&text).unwrap(), stock);

        let config = ViewerConfig::from_toml("[lights]\nambient_color = 0x202020\n").unwrap();
        assert_eq!(config.lights.ambient_color, 0x202020);
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = ViewerConfig::from_toml("[camera]\nfov = \"wide\"").unwrap_err();
        assert!(matches!(err, ViewerError::Config(_)));
    }

    #[test]
    fn test_json() {
        assert_eq!(ViewerConfig::from_json("  ").unwrap(), ViewerConfig::default());
        let config = ViewerConfig::from_json(r#"{"render": {"msaa": 1}, "lights": {"helpers": false}}"#).unwrap();
        assert_eq!(config.render.msaa, 1);
        assert!(!config.lights.helpers);
        assert!(config.render.shadows);

        let config = ViewerConfig::from_json(r#"{"model": {"path": ""}, "environment": {"path": null}}"#).unwrap();
        assert_eq!(config.model.path, None);
        assert_eq!(config.environment.path, None);
        assert!(!config.environment.is_used());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = ViewerConfig::load("/nonexistent/vista/viewer.toml").unwrap();
        assert_eq!(config, ViewerConfig::default());
    }

    #[test]
    fn test_platform_settings() {
        let mut config = ViewerConfig::default();
        config.render.msaa = 0;
        assert_eq!(config.context_settings().sample_count, 1);
        let window = config.window_config();
        assert_eq!((window.width, window.height), (1280, 720));
        assert_eq!(window.canvas_id, "vista-canvas");
    }
}
