//! Radiance HDR (`.hdr`) environment loader

use super::{read_with_progress, LoadError, Progress, Result};
use crate::materials::{Texture, TextureData};
use image::ImageFormat;
use std::path::Path;

/// How an environment image maps onto directions
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextureMapping {
    /// Longitude/latitude panorama, sampled by reflection direction
    #[default]
    EquirectangularReflection,
}

/// Decoded floating-point environment image
#[derive(Clone, Debug, PartialEq)]
pub struct HdrImage {
    pub width: u32,
    pub height: u32,
    /// Linear RGBA pixels, row-major from the top
    pub data: Vec<[f32; 4]>,
    pub mapping: TextureMapping,
}

impl HdrImage {
    /// Mean RGB over all pixels
    pub fn average_radiance(&self) -> [f32; 3] {
        if self.data.is_empty() {
            return [0.0; 3];
        }
        let sum = self.data.iter().fold([0.0f64; 3], |mut acc, p| {
            acc[0] += p[0] as f64;
            acc[1] += p[1] as f64;
            acc[2] += p[2] as f64;
            acc
        });
        let n = self.data.len() as f64;
        [(sum[0] / n) as f32, (sum[1] / n) as f32, (sum[2] / n) as f32]
    }

    pub fn to_texture(&self) -> Texture {
        Texture {
            width: self.width,
            height: self.height,
            data: TextureData::Rgba32F(self.data.clone()),
            srgb: false,
        }
    }
}

/// Loader for Radiance RGBE images
#[derive(Clone, Copy, Debug, Default)]
pub struct HdrLoader;

impl HdrLoader {
    pub fn load_path(&self, path: impl AsRef<Path>, progress: impl FnMut(Progress)) -> Result<HdrImage> {
        let bytes = read_with_progress(path, progress)?;
        self.load_slice(&bytes)
    }

    pub fn load_slice(&self, bytes: &[u8]) -> Result<HdrImage> {
        let image = image::load_from_memory_with_format(bytes, ImageFormat::Hdr)
            .map_err(|e| LoadError::Parse(e.to_string()))?
            .to_rgba32f();
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(LoadError::InvalidData("empty HDR image".into()));
        }
        let data = image
            .into_raw()
            .chunks_exact(4)
            .map(|p| [p[0], p[1], p[2], p[3]])
            .collect();

        tracing::debug!(width, height, "HDR environment loaded");
        Ok(HdrImage {
            width,
            height,
            data,
            mapping: TextureMapping::EquirectangularReflection,
        })
    }
}
