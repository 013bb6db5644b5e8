//! Scene lighting: one ambient term plus persistent point lights.
//! Each frame the active lights are copied into the frame buffers.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use crate::components::mesh::Color;

/// A point light with position, colour, intensity and range.
///
/// Wire format (8 floats / 32 bytes):
/// `[x, y, z, r, g, b, intensity, range]`
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct PointLight {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub intensity: f32,
    /// Distance at which the light falls off to zero.
    pub range: f32,
}

impl PointLight {
    pub const FLOATS: usize = 8;

    pub fn new(position: Vec3, color: Color, intensity: f32, range: f32) -> Self {
        Self {
            x: position.x,
            y: position.y,
            z: position.z,
            r: color.r,
            g: color.g,
            b: color.b,
            intensity,
            range,
        }
    }

    pub fn position(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }
}

pub struct LightState {
    lights: Vec<PointLight>,
    ambient: Color,
    ambient_intensity: f32,
    max_lights: usize,
}

impl LightState {
    pub fn with_capacity(max_lights: usize) -> Self {
        Self {
            lights: Vec::with_capacity(max_lights),
            ambient: Color::WHITE,
            ambient_intensity: 1.0,
            max_lights,
        }
    }

    /// Add a point light. Lights beyond the capacity are dropped with a warning.
    pub fn add(&mut self, light: PointLight) {
        if self.lights.len() >= self.max_lights {
            log::warn!("light capacity {} reached; dropping light", self.max_lights);
            return;
        }
        self.lights.push(light);
    }

    pub fn clear(&mut self) {
        self.lights.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &PointLight> {
        self.lights.iter()
    }

    pub fn count(&self) -> usize {
        self.lights.len()
    }

    pub fn set_ambient(&mut self, color: Color, intensity: f32) {
        self.ambient = color;
        self.ambient_intensity = intensity;
    }

    pub fn ambient(&self) -> Color {
        self.ambient
    }

    pub fn ambient_intensity(&self) -> f32 {
        self.ambient_intensity
    }
}

impl Default for LightState {
    fn default() -> Self {
        Self::with_capacity(4)
    }
}
