//! CPU-side texture data

/// Pixel storage of a [`Texture`]
#[derive(Clone, Debug, PartialEq)]
pub enum TextureData {
    /// 8-bit RGBA
    Rgba8(Vec<u8>),
    /// Linear float RGBA
    Rgba32F(Vec<[f32; 4]>),
}

/// An image ready for upload
#[derive(Clone, Debug, PartialEq)]
pub struct Texture {
    pub width: u32,
    pub height: u32,
    pub data: TextureData,
    /// 8-bit data is sRGB encoded (color maps)
    pub srgb: bool,
}

impl Texture {
    /// Texture from tightly packed RGBA8 pixels
    pub fn rgba8(width: u32, height: u32, pixels: Vec<u8>, srgb: bool) -> Option<Self> {
        if pixels.len() != (width as usize) * (height as usize) * 4 {
            return None;
        }
        Some(Self {
            width,
            height,
            data: TextureData::Rgba8(pixels),
            srgb,
        })
    }

    /// 1x1 texture of a single color
    pub fn solid(rgba: [u8; 4]) -> Self {
        Self {
            width: 1,
            height: 1,
            data: TextureData::Rgba8(rgba.to_vec()),
            srgb: true,
        }
    }

    pub fn byte_len(&self) -> usize {
        match &self.data {
            TextureData::Rgba8(p) => p.len(),
            TextureData::Rgba32F(p) => p.len() * 16,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgba8_checks_length() {
        assert!(Texture::rgba8(2, 2, vec![0; 16], true).is_some());
        assert!(Texture::rgba8(2, 2, vec![0; 15], true).is_none());
        assert_eq!(Texture::solid([255; 4]).byte_len(), 4);
    }
}
