//! Reading textures and shader sources from disk

use crate::error::RenderError;
use std::path::{Path, PathBuf};
use tessera_core::Color;

/// Decoded RGBA8 image, rows top to bottom.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageData {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl ImageData {
    /// Wrap raw RGBA8 bytes, checking the length matches the dimensions.
    pub fn from_rgba8(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, RenderError> {
        let expected = width as usize * height as usize * 4;
        if width == 0 || height == 0 || pixels.len() != expected {
            return Err(RenderError::InvalidInput(format!(
                "{}x{} image needs {} bytes, got {}",
                width,
                height,
                expected,
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Single-color image
    pub fn solid(width: u32, height: u32, color: Color) -> Self {
        let rgba = color.to_array().map(|c| (c * 255.0).clamp(0.0, 255.0) as u8);
        let pixels = rgba
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * 4)
            .collect();
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Texel at `(x, y)` as a color, if in bounds.
    pub fn texel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let px = &self.pixels[i..i + 4];
        Some(Color::rgba(
            px[0] as f32 / 255.0,
            px[1] as f32 / 255.0,
            px[2] as f32 / 255.0,
            px[3] as f32 / 255.0,
        ))
    }
}

/// Read and decode an image file (PNG or JPEG) into RGBA8.
pub fn load_image(path: &Path) -> Result<ImageData, RenderError> {
    let bytes = std::fs::read(path).map_err(|e| RenderError::io(path, e))?;
    let decoded = image::load_from_memory(&bytes).map_err(|e| RenderError::Decode {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(RenderError::Decode {
            path: path.to_path_buf(),
            message: "image has no pixels".to_string(),
        });
    }
    Ok(ImageData {
        width,
        height,
        pixels: rgba.into_raw(),
    })
}

/// Text of one shader stage together with where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSource {
    pub path: PathBuf,
    pub code: String,
}

/// Read a shader stage. An empty file is treated as a failed read.
pub fn read_shader_source(path: &Path) -> Result<ShaderSource, RenderError> {
    let code = std::fs::read_to_string(path).map_err(|e| RenderError::io(path, e))?;
    if code.trim().is_empty() {
        return Err(RenderError::EmptySource {
            path: path.to_path_buf(),
        });
    }
    Ok(ShaderSource {
        path: path.to_path_buf(),
        code,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rgba8_checks_length() {
        assert!(ImageData::from_rgba8(2, 2, vec![0; 16]).is_ok());
        assert!(ImageData::from_rgba8(2, 2, vec![0; 15]).is_err());
        assert!(ImageData::from_rgba8(0, 2, vec![]).is_err());
    }

    #[test]
    fn test_solid_texels() {
        let img = ImageData::solid(3, 2, Color::RED);
        assert_eq!(img.pixels.len(), 24);
        assert_eq!(img.texel(2, 1), Some(Color::RED));
        assert_eq!(img.texel(3, 0), None);
    }

    #[test]
    fn test_missing_files() {
        let missing = Path::new("/no/such/dir/texture.png");
        assert!(matches!(load_image(missing), Err(RenderError::Io { .. })));
        assert!(matches!(
            read_shader_source(missing),
            Err(RenderError::Io { .. })
        ));
    }
}
