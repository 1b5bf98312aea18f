//! Primitive tessellation into triangle lists
//!
//! All shapes come out as plain triangle lists (three vertices per triangle)
//! in surface pixel space, with the current model transform already applied.

use crate::error::RenderError;
use crate::vertex::Vertex;
use std::f32::consts::TAU;
use tessera_core::{Color, Transform};

/// Segment count used when a caller does not pick one.
pub const DEFAULT_CIRCLE_SEGMENTS: u32 = 32;

/// Largest accepted segment count. Finer circles gain nothing at pixel scale.
pub const MAX_CIRCLE_SEGMENTS: u32 = 4096;

fn emit(transform: &Transform, color: Color, x: f32, y: f32, uv: [f32; 2]) -> Vertex {
    let p = transform.apply(x, y);
    Vertex::new([p.x, p.y], uv, color)
}

/// Two triangles covering `x, y, width, height`, textured corner to corner.
pub fn quad(
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    transform: &Transform,
    color: Color,
) -> [Vertex; 6] {
    let tl = emit(transform, color, x, y, [0.0, 0.0]);
    let tr = emit(transform, color, x + width, y, [1.0, 0.0]);
    let br = emit(transform, color, x + width, y + height, [1.0, 1.0]);
    let bl = emit(transform, color, x, y + height, [0.0, 1.0]);
    [tl, tr, br, tl, br, bl]
}

pub fn triangle(points: [[f32; 2]; 3], transform: &Transform, color: Color) -> [Vertex; 3] {
    const UVS: [[f32; 2]; 3] = [[0.0, 0.0], [1.0, 0.0], [0.5, 1.0]];
    let mut out = [Vertex::new([0.0, 0.0], [0.0, 0.0], color); 3];
    for (i, p) in points.iter().enumerate() {
        out[i] = emit(transform, color, p[0], p[1], UVS[i]);
    }
    out
}

/// The `segments + 1` rim samples of a circle, at `angle = 2π·i/segments`
/// for `i` in `[0, segments]`. The last sample closes the loop on the first.
pub fn circle_rim(radius: f32, segments: u32) -> Result<Vec<(f32, f32)>, RenderError> {
    if segments == 0 {
        return Err(RenderError::InvalidInput(
            "circle needs at least one segment".to_string(),
        ));
    }
    if segments > MAX_CIRCLE_SEGMENTS {
        return Err(RenderError::InvalidInput(format!(
            "circle segments {} exceed the maximum of {}",
            segments, MAX_CIRCLE_SEGMENTS
        )));
    }
    Ok((0..=segments)
        .map(|i| {
            let angle = TAU * i as f32 / segments as f32;
            (radius * angle.cos(), radius * angle.sin())
        })
        .collect())
}

/// Triangle fan around the center, one triangle per segment.
pub fn circle(
    cx: f32,
    cy: f32,
    radius: f32,
    segments: u32,
    transform: &Transform,
    color: Color,
) -> Result<Vec<Vertex>, RenderError> {
    let rim = circle_rim(radius, segments)?;
    let uv = |dx: f32, dy: f32| {
        if radius == 0.0 {
            [0.5, 0.5]
        } else {
            [0.5 + 0.5 * dx / radius, 0.5 + 0.5 * dy / radius]
        }
    };

    let center = emit(transform, color, cx, cy, [0.5, 0.5]);
    let mut vertices = Vec::with_capacity(segments as usize * 3);
    for pair in rim.windows(2) {
        let (ax, ay) = pair[0];
        let (bx, by) = pair[1];
        vertices.push(center);
        vertices.push(emit(transform, color, cx + ax, cy + ay, uv(ax, ay)));
        vertices.push(emit(transform, color, cx + bx, cy + by, uv(bx, by)));
    }
    Ok(vertices)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_count_is_bounded() {
        let t = Transform::IDENTITY;
        let max = circle(0.0, 0.0, 1.0, MAX_CIRCLE_SEGMENTS, &t, Color::WHITE).unwrap();
        assert_eq!(max.len(), MAX_CIRCLE_SEGMENTS as usize * 3);
        for segments in [MAX_CIRCLE_SEGMENTS + 1, u32::MAX] {
            assert!(matches!(
                circle(0.0, 0.0, 1.0, segments, &t, Color::WHITE),
                Err(RenderError::InvalidInput(_))
            ));
        }
    }

    fn close(a: [f32; 2], b: [f32; 2]) -> bool {
        (a[0] - b[0]).abs() < 1e-3 && (a[1] - b[1]).abs() < 1e-3
    }

    #[test]
    fn test_quad_corners() {
        let v = quad(10.0, 20.0, 30.0, 40.0, &Transform::IDENTITY, Color::WHITE);
        assert_eq!(v[0].position, [10.0, 20.0]);
        assert_eq!(v[2].position, [40.0, 60.0]);
        assert_eq!(v[5].position, [10.0, 60.0]);
        assert_eq!(v[2].tex_coords, [1.0, 1.0]);
    }

    #[test]
    fn test_transform_is_applied() {
        let t = Transform::new(100.0, 50.0, 0.0, 2.0);
        let v = triangle([[0.0, 0.0], [10.0, 0.0], [0.0, 10.0]], &t, Color::RED);
        assert!(close(v[0].position, [100.0, 50.0]));
        assert!(close(v[1].position, [120.0, 50.0]));
        assert!(close(v[2].position, [100.0, 70.0]));
        assert_eq!(v[1].color, Color::RED.to_array());
    }

    #[test]
    fn test_circle_rim_sampling() {
        let rim = circle_rim(10.0, 4).unwrap();
        assert_eq!(rim.len(), 5);
        assert!(close([rim[0].0, rim[0].1], [10.0, 0.0]));
        assert!(close([rim[1].0, rim[1].1], [0.0, 10.0]));
        assert!(close([rim[4].0, rim[4].1], [rim[0].0, rim[0].1]));
    }

    #[test]
    fn test_circle_vertex_count_grows_with_segments() {
        let t = Transform::IDENTITY;
        let coarse = circle(0.0, 0.0, 5.0, 8, &t, Color::WHITE).unwrap();
        let fine = circle(0.0, 0.0, 5.0, 64, &t, Color::WHITE).unwrap();
        assert_eq!(coarse.len(), 24);
        assert_eq!(fine.len(), 192);
    }

    #[test]
    fn test_zero_segments_rejected() {
        let err = circle(0.0, 0.0, 5.0, 0, &Transform::IDENTITY, Color::WHITE).unwrap_err();
        assert!(matches!(err, RenderError::InvalidInput(_)));
    }

    #[test]
    fn test_zero_radius_is_degenerate_not_nan() {
        let v = circle(3.0, 4.0, 0.0, 6, &Transform::IDENTITY, Color::WHITE).unwrap();
        assert!(v.iter().all(|v| v.position == [3.0, 4.0]));
        assert!(v.iter().all(|v| v.tex_coords == [0.5, 0.5]));
    }
}
