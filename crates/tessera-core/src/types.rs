//! Value types shared between the renderer and the platform layer

use glam::{Affine2, Vec2};
use serde::{Deserialize, Serialize};

/// RGBA color representation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    /// Create a new color from RGBA values (0.0 to 1.0)
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create a new color from RGB values (0.0 to 1.0), fully opaque
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn from_array(c: [f32; 4]) -> Self {
        Self::rgba(c[0], c[1], c[2], c[3])
    }

    /// Convert to array for GPU usage
    pub const fn to_array(&self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Pack into a `0xAARRGGBB` pixel, clamping each channel.
    pub fn to_argb(&self) -> u32 {
        let channel = |v: f32| (v * 255.0).clamp(0.0, 255.0).round() as u32;
        (channel(self.a) << 24) | (channel(self.r) << 16) | (channel(self.g) << 8) | channel(self.b)
    }

    /// Unpack a `0xAARRGGBB` pixel.
    pub fn from_argb(pixel: u32) -> Self {
        let channel = |shift: u32| ((pixel >> shift) & 0xff) as f32 / 255.0;
        Self::rgba(channel(16), channel(8), channel(0), channel(24))
    }

    /// Component-wise product, used to tint sampled texels.
    pub fn modulate(&self, other: &Color) -> Self {
        Self::rgba(
            self.r * other.r,
            self.g * other.g,
            self.b * other.b,
            self.a * other.a,
        )
    }

    /// Common colors
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    pub const RED: Self = Self::rgb(1.0, 0.0, 0.0);
    pub const GREEN: Self = Self::rgb(0.0, 1.0, 0.0);
    pub const BLUE: Self = Self::rgb(0.0, 0.0, 1.0);
    pub const TRANSPARENT: Self = Self::rgba(0.0, 0.0, 0.0, 0.0);
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl From<[f32; 4]> for Color {
    fn from(c: [f32; 4]) -> Self {
        Self::from_array(c)
    }
}

/// 2D model transform: scale, then rotate (degrees, counter-clockwise), then translate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub translate_x: f32,
    pub translate_y: f32,
    /// Rotation in degrees
    pub rotation: f32,
    pub scale: f32,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        translate_x: 0.0,
        translate_y: 0.0,
        rotation: 0.0,
        scale: 1.0,
    };

    pub const fn new(translate_x: f32, translate_y: f32, rotation: f32, scale: f32) -> Self {
        Self {
            translate_x,
            translate_y,
            rotation,
            scale,
        }
    }

    /// Affine matrix equivalent to `T * R * S`.
    pub fn to_affine(&self) -> Affine2 {
        Affine2::from_scale_angle_translation(
            Vec2::splat(self.scale),
            self.rotation.to_radians(),
            Vec2::new(self.translate_x, self.translate_y),
        )
    }

    /// Apply transform to a point
    pub fn apply(&self, x: f32, y: f32) -> Vec2 {
        self.to_affine().transform_point2(Vec2::new(x, y))
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Opaque identifier of a native window or drawable.
///
/// Zero never names a live native object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NativeHandle(pub u64);

impl NativeHandle {
    pub const NULL: NativeHandle = NativeHandle(0);

    pub const fn is_null(&self) -> bool {
        self.0 == 0
    }
}

impl std::fmt::Display for NativeHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "native#{}", self.0)
    }
}

/// What a renderer binds to: a native drawable and its pixel dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurfaceTarget {
    pub handle: NativeHandle,
    pub width: u32,
    pub height: u32,
}

impl SurfaceTarget {
    pub const fn new(handle: NativeHandle, width: u32, height: u32) -> Self {
        Self {
            handle,
            width,
            height,
        }
    }

    /// A target with no native window behind it, used for offscreen rendering.
    pub const fn offscreen(width: u32, height: u32) -> Self {
        Self::new(NativeHandle::NULL, width, height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn test_color_argb_packing() {
        assert_eq!(Color::WHITE.to_argb(), 0xffff_ffff);
        assert_eq!(Color::RED.to_argb(), 0xffff_0000);
        assert_eq!(Color::rgba(2.0, -1.0, 0.0, 1.0).to_argb(), 0xffff_0000);
        assert_eq!(Color::from_argb(0xff00_ff00), Color::GREEN);
    }

    #[test]
    fn test_transform_order() {
        // scale 2, rotate 90 degrees, translate (10, 0)
        let t = Transform::new(10.0, 0.0, 90.0, 2.0);
        assert!(approx(t.apply(1.0, 0.0), Vec2::new(10.0, 2.0)));
        assert!(approx(Transform::IDENTITY.apply(3.0, 4.0), Vec2::new(3.0, 4.0)));
    }

    #[test]
    fn test_offscreen_target() {
        let target = SurfaceTarget::offscreen(64, 32);
        assert!(target.handle.is_null());
        assert_eq!((target.width, target.height), (64, 32));
    }
}
