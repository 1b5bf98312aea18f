//! CPU rasterizer backend
//!
//! Draws into an ARGB (`0xAARRGGBB`) back buffer with a scanline fill and
//! copies it to the front buffer on present. It needs no device, which makes
//! it the reference backend for headless runs and tests.

use super::{Backend, DrawCall};
use crate::error::BackendError;
use crate::loader::{ImageData, ShaderSource};
use crate::vertex::Vertex;
use std::convert::Infallible;
use tessera_core::{Color, NativeHandle, SurfaceTarget};

/// Largest width or height the rasterizer will allocate.
pub const MAX_SURFACE_DIMENSION: u32 = 16_384;

/// Texture kept in CPU memory as ARGB texels.
#[derive(Debug, Clone)]
pub struct SoftwareTexture {
    width: u32,
    height: u32,
    texels: Vec<u32>,
}

impl SoftwareTexture {
    fn from_image(image: &ImageData) -> Self {
        let texels = image
            .pixels
            .chunks_exact(4)
            .map(|px| {
                (px[3] as u32) << 24 | (px[0] as u32) << 16 | (px[1] as u32) << 8 | px[2] as u32
            })
            .collect();
        Self {
            width: image.width,
            height: image.height,
            texels,
        }
    }

    /// Nearest-neighbour sample, clamped to the edges.
    fn sample(&self, u: f32, v: f32) -> Color {
        let x = ((u * self.width as f32).floor() as i64).clamp(0, self.width as i64 - 1) as usize;
        let y = ((v * self.height as f32).floor() as i64).clamp(0, self.height as i64 - 1) as usize;
        Color::from_argb(self.texels[y * self.width as usize + x])
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

pub struct SoftwareBackend {
    handle: NativeHandle,
    width: u32,
    height: u32,
    back: Vec<u32>,
    front: Vec<u32>,
    frames_presented: u64,
    live_textures: usize,
}

impl SoftwareBackend {
    pub fn new() -> Self {
        Self {
            handle: NativeHandle::NULL,
            width: 0,
            height: 0,
            back: Vec::new(),
            front: Vec::new(),
            frames_presented: 0,
            live_textures: 0,
        }
    }

    fn allocate(&mut self, width: u32, height: u32) -> Result<(), BackendError> {
        if width == 0 || height == 0 {
            return Err(BackendError::SurfaceCreation(format!(
                "surface must be non-empty, got {}x{}",
                width, height
            )));
        }
        if width > MAX_SURFACE_DIMENSION || height > MAX_SURFACE_DIMENSION {
            return Err(BackendError::SurfaceCreation(format!(
                "{}x{} exceeds the {} pixel limit",
                width, height, MAX_SURFACE_DIMENSION
            )));
        }
        let len = width as usize * height as usize;
        self.back = vec![0; len];
        self.front = vec![0; len];
        self.width = width;
        self.height = height;
        Ok(())
    }

    fn release(&mut self) {
        self.back = Vec::new();
        self.front = Vec::new();
        self.width = 0;
        self.height = 0;
    }

    pub fn has_surface(&self) -> bool {
        !self.back.is_empty()
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn native_handle(&self) -> NativeHandle {
        self.handle
    }

    /// Pixels of the last presented frame
    pub fn front_buffer(&self) -> &[u32] {
        &self.front
    }

    /// Pixels of the frame being drawn
    pub fn back_buffer(&self) -> &[u32] {
        &self.back
    }

    /// Presented pixel at `(x, y)`
    pub fn pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.front.get((y * self.width + x) as usize).copied()
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    pub fn live_textures(&self) -> usize {
        self.live_textures
    }

    fn rasterize(&mut self, tri: &[Vertex], texture: Option<&SoftwareTexture>) {
        let (a, b, c) = (&tri[0], &tri[1], &tri[2]);
        let area = |p: [f32; 2], q: [f32; 2], r: [f32; 2]| {
            (q[0] - p[0]) * (r[1] - p[1]) - (q[1] - p[1]) * (r[0] - p[0])
        };
        let denom = area(a.position, b.position, c.position);
        if denom.abs() < f32::EPSILON {
            return;
        }

        let min_y = a.position[1].min(b.position[1]).min(c.position[1]);
        let max_y = a.position[1].max(b.position[1]).max(c.position[1]);
        let row_start = (min_y.floor().max(0.0)) as u32;
        let row_end = (max_y.ceil().min(self.height as f32)).max(0.0) as u32;
        let edges = [(a, b), (b, c), (c, a)];

        for y in row_start..row_end {
            let yc = y as f32 + 0.5;

            // Scanline crossings with each edge, half-open in y
            let mut left = f32::INFINITY;
            let mut right = f32::NEG_INFINITY;
            let mut crossings = 0;
            for (p, q) in edges {
                let (y0, y1) = (p.position[1], q.position[1]);
                if y0 == y1 || yc < y0.min(y1) || yc >= y0.max(y1) {
                    continue;
                }
                let t = (yc - y0) / (y1 - y0);
                let x = p.position[0] + t * (q.position[0] - p.position[0]);
                left = left.min(x);
                right = right.max(x);
                crossings += 1;
            }
            if crossings < 2 {
                continue;
            }

            let x_start = (left - 0.5).ceil().max(0.0) as u32;
            let x_end = ((right - 0.5).ceil().min(self.width as f32)).max(0.0) as u32;
            for x in x_start..x_end {
                let p = [x as f32 + 0.5, yc];
                let wa = area(p, b.position, c.position) / denom;
                let wb = area(a.position, p, c.position) / denom;
                let wc = 1.0 - wa - wb;

                let lerp = |i: usize| a.color[i] * wa + b.color[i] * wb + c.color[i] * wc;
                let mut color = Color::rgba(lerp(0), lerp(1), lerp(2), lerp(3));
                if let Some(tex) = texture {
                    let u = a.tex_coords[0] * wa + b.tex_coords[0] * wb + c.tex_coords[0] * wc;
                    let v = a.tex_coords[1] * wa + b.tex_coords[1] * wb + c.tex_coords[1] * wc;
                    color = color.modulate(&tex.sample(u, v));
                }

                let index = (y * self.width + x) as usize;
                self.back[index] = blend(color, self.back[index]);
            }
        }
    }
}

/// Source-over blend onto an ARGB pixel.
fn blend(src: Color, dst: u32) -> u32 {
    if src.a >= 1.0 {
        return src.to_argb();
    }
    let dst = Color::from_argb(dst);
    let a = src.a.clamp(0.0, 1.0);
    Color::rgba(
        src.r * a + dst.r * (1.0 - a),
        src.g * a + dst.g * (1.0 - a),
        src.b * a + dst.b * (1.0 - a),
        a + dst.a * (1.0 - a),
    )
    .to_argb()
}

impl Default for SoftwareBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for SoftwareBackend {
    type Texture = SoftwareTexture;
    /// Programmable shading is not available on the CPU path.
    type Shader = Infallible;

    fn name(&self) -> &'static str {
        "software"
    }

    fn create_surface(&mut self, target: SurfaceTarget) -> Result<(), BackendError> {
        self.release();
        self.allocate(target.width, target.height)?;
        self.handle = target.handle;
        Ok(())
    }

    fn destroy_surface(&mut self) {
        self.release();
        self.handle = NativeHandle::NULL;
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<(), BackendError> {
        self.release();
        self.allocate(width, height)
    }

    fn begin_frame(&mut self, clear: Color) -> Result<(), BackendError> {
        if !self.has_surface() {
            return Err(BackendError::Frame("no back buffer".to_string()));
        }
        self.back.fill(clear.to_argb());
        Ok(())
    }

    fn draw(&mut self, call: DrawCall<'_, SoftwareTexture, Infallible>) -> Result<(), BackendError> {
        if !self.has_surface() {
            return Err(BackendError::Frame("no back buffer".to_string()));
        }
        for tri in call.vertices.chunks_exact(3) {
            self.rasterize(tri, call.texture);
        }
        Ok(())
    }

    fn present(&mut self) -> Result<(), BackendError> {
        if !self.has_surface() {
            return Err(BackendError::Present("no back buffer".to_string()));
        }
        self.front.copy_from_slice(&self.back);
        self.frames_presented += 1;
        Ok(())
    }

    fn upload_texture(&mut self, image: &ImageData) -> Result<SoftwareTexture, BackendError> {
        if image.pixels.len() != image.width as usize * image.height as usize * 4 {
            return Err(BackendError::TextureUpload(
                "pixel data does not match dimensions".to_string(),
            ));
        }
        self.live_textures += 1;
        Ok(SoftwareTexture::from_image(image))
    }

    fn release_texture(&mut self, _texture: SoftwareTexture) {
        self.live_textures = self.live_textures.saturating_sub(1);
    }

    fn compile_shader_pair(
        &mut self,
        _vertex: &ShaderSource,
        _fragment: &ShaderSource,
    ) -> Result<Infallible, BackendError> {
        Err(BackendError::Unsupported("shader programs"))
    }

    fn release_shader(&mut self, shader: Infallible) {
        match shader {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tessellation;
    use tessera_core::Transform;

    fn backend(width: u32, height: u32) -> SoftwareBackend {
        let mut backend = SoftwareBackend::new();
        backend
            .create_surface(SurfaceTarget::offscreen(width, height))
            .unwrap();
        backend
    }

    fn draw(backend: &mut SoftwareBackend, vertices: &[Vertex], texture: Option<&SoftwareTexture>) {
        backend
            .draw(DrawCall {
                vertices,
                texture,
                shader: None,
            })
            .unwrap();
    }

    #[test]
    fn test_quad_covers_exact_pixels() {
        let mut b = backend(20, 20);
        b.begin_frame(Color::BLACK).unwrap();
        let quad = tessellation::quad(0.0, 0.0, 10.0, 10.0, &Transform::IDENTITY, Color::RED);
        draw(&mut b, &quad, None);
        b.present().unwrap();

        assert_eq!(b.pixel(0, 0), Some(0xffff_0000));
        assert_eq!(b.pixel(9, 9), Some(0xffff_0000));
        assert_eq!(b.pixel(10, 9), Some(0xff00_0000));
        assert_eq!(b.pixel(9, 10), Some(0xff00_0000));
        let red = b.front_buffer().iter().filter(|&&p| p == 0xffff_0000).count();
        assert_eq!(red, 100);
    }

    #[test]
    fn test_present_copies_back_to_front() {
        let mut b = backend(4, 4);
        b.begin_frame(Color::BLUE).unwrap();
        assert!(b.front_buffer().iter().all(|&p| p == 0));
        b.present().unwrap();
        assert!(b.front_buffer().iter().all(|&p| p == 0xff00_00ff));
        assert_eq!(b.frames_presented(), 1);
    }

    #[test]
    fn test_textured_quad_samples_nearest() {
        let mut b = backend(4, 4);
        // 2x1 texture: left red, right green
        let image = ImageData::from_rgba8(2, 1, vec![255, 0, 0, 255, 0, 255, 0, 255]).unwrap();
        let tex = b.upload_texture(&image).unwrap();

        b.begin_frame(Color::BLACK).unwrap();
        let quad = tessellation::quad(0.0, 0.0, 4.0, 4.0, &Transform::IDENTITY, Color::WHITE);
        draw(&mut b, &quad, Some(&tex));
        b.present().unwrap();

        assert_eq!(b.pixel(0, 2), Some(0xffff_0000));
        assert_eq!(b.pixel(3, 2), Some(0xff00_ff00));
    }

    #[test]
    fn test_half_transparent_blend() {
        let mut b = backend(2, 2);
        b.begin_frame(Color::BLACK).unwrap();
        let quad = tessellation::quad(
            0.0,
            0.0,
            2.0,
            2.0,
            &Transform::IDENTITY,
            Color::rgba(1.0, 1.0, 1.0, 0.5),
        );
        draw(&mut b, &quad, None);
        b.present().unwrap();

        let px = Color::from_argb(b.pixel(0, 0).unwrap());
        assert!((px.r - 0.5).abs() < 0.01);
        assert!((px.a - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_offscreen_geometry_is_clipped() {
        let mut b = backend(8, 8);
        b.begin_frame(Color::BLACK).unwrap();
        let quad = tessellation::quad(-20.0, -20.0, 100.0, 100.0, &Transform::IDENTITY, Color::GREEN);
        draw(&mut b, &quad, None);
        b.present().unwrap();
        assert!(b.front_buffer().iter().all(|&p| p == 0xff00_ff00));
    }

    #[test]
    fn test_resize_failure_leaves_no_surface() {
        let mut b = backend(8, 8);
        let err = b.resize(MAX_SURFACE_DIMENSION + 1, 8).unwrap_err();
        assert!(matches!(err, BackendError::SurfaceCreation(_)));
        assert!(!b.has_surface());
        assert!(b.begin_frame(Color::BLACK).is_err());

        b.resize(16, 4).unwrap();
        assert_eq!(b.size(), (16, 4));
        assert!(b.begin_frame(Color::BLACK).is_ok());
    }

    #[test]
    fn test_shaders_unsupported() {
        let mut b = backend(2, 2);
        let src = ShaderSource {
            path: "a.wgsl".into(),
            code: "fn main() {}".into(),
        };
        assert!(matches!(
            b.compile_shader_pair(&src, &src),
            Err(BackendError::Unsupported(_))
        ));
    }
}
