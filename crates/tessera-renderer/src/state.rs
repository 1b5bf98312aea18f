//! Per-renderer drawing state and lifecycle

use crate::resources::ResourceHandle;
use tessera_core::{Color, Transform};

/// Where a renderer is in its lifetime.
///
/// ```text
/// Uninitialized --initialize--> Initialized <--begin/end_frame--> FrameBegun
///                                    |                                 |
///                                    +-------------cleanup-------------+--> Destroyed
/// Destroyed --initialize--> Initialized
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Uninitialized,
    Initialized,
    FrameBegun,
    Destroyed,
}

impl Lifecycle {
    /// Initialized, with or without an open frame.
    pub fn is_live(&self) -> bool {
        matches!(self, Lifecycle::Initialized | Lifecycle::FrameBegun)
    }
}

/// Mutable state consulted by every draw call.
///
/// Draw calls read this at the moment they are issued; changing it later
/// never affects geometry already submitted.
#[derive(Debug, Clone, PartialEq)]
pub struct RendererState {
    pub clear_color: Color,
    pub draw_color: Color,
    pub transform: Transform,
    /// Last handle passed to `use_texture`, whether or not it resolved.
    pub current_texture: ResourceHandle,
    /// Last handle passed to `use_shader`, whether or not it resolved.
    pub current_shader: ResourceHandle,
    pub surface_width: u32,
    pub surface_height: u32,
}

impl RendererState {
    pub fn new(surface_width: u32, surface_height: u32) -> Self {
        Self {
            clear_color: Color::BLACK,
            draw_color: Color::WHITE,
            transform: Transform::IDENTITY,
            current_texture: ResourceHandle::NONE,
            current_shader: ResourceHandle::NONE,
            surface_width,
            surface_height,
        }
    }
}

impl Default for RendererState {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

/// Counters kept across frames
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub frames_presented: u64,
    pub draw_calls_this_frame: u32,
    pub vertices_this_frame: u32,
}
