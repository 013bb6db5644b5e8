use std::f32::consts::TAU;

use crate::renderer::instance::LineVertex;

/// Closed circle of `radius` in the XZ plane, as `segments + 1` vertices
/// (the last repeats the first).
pub fn orbit_loop(radius: f32, segments: u32) -> Vec<LineVertex> {
    let segments = segments.max(3);
    (0..=segments)
        .map(|i| {
            let a = if i == segments { 0.0 } else { i as f32 / segments as f32 * TAU };
            LineVertex {
                x: radius * a.cos(),
                y: 0.0,
                z: radius * a.sin(),
            }
        })
        .collect()
}
