use serde::Serialize;

/// Draw parameters for a point cloud.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PointStyle {
    pub size: f32,
    pub opacity: f32,
    pub size_attenuation: bool,
    /// Use per-vertex colours instead of a uniform white.
    pub vertex_colors: bool,
    pub depth_write: bool,
}

impl Default for PointStyle {
    fn default() -> Self {
        Self {
            size: 1.0,
            opacity: 1.0,
            size_attenuation: true,
            vertex_colors: false,
            depth_write: true,
        }
    }
}

/// Static scene node, built once and described to the host as JSON.
/// Offsets and counts index into the scene's shared point/line vertex buffers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SceneNode {
    /// Inside-out sphere carrying the galaxy image.
    Background {
        radius: f32,
        segments: u32,
        texture: Option<u32>,
        back_side: bool,
    },
    Points {
        name: String,
        offset: usize,
        count: usize,
        #[serde(flatten)]
        style: PointStyle,
    },
    /// Closed orbit loop in the XZ plane.
    Guide {
        radius: f32,
        offset: usize,
        count: usize,
        color: [f32; 3],
        opacity: f32,
    },
    AmbientLight {
        color: [f32; 3],
        intensity: f32,
    },
    PointLight {
        position: [f32; 3],
        color: [f32; 3],
        intensity: f32,
        range: f32,
    },
}
