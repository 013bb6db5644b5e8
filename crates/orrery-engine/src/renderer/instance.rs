use bytemuck::{Pod, Zeroable};

use crate::api::types::{HostEvent, ResourceHandle};
use crate::renderer::camera::CameraUniform;
use crate::systems::lighting::PointLight;

/// Per-instance body data written for the TypeScript renderer.
/// Must match the TypeScript protocol: 24 floats = 96 bytes stride.
///
/// One instance is written per primitive sphere, per material group of each
/// model sub-mesh, per glow halo and per ring.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct BodyInstance {
    /// Column-major model matrix.
    pub model: [f32; 16],
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub opacity: f32,
    /// Texture id, or -1.0 for untextured.
    pub texture: f32,
    /// One of the `KIND_*` constants.
    pub kind: f32,
    /// Resource handle of the owning body.
    pub handle: f32,
    /// `part * PART_STRIDE + group` for model parts (see `part_param`),
    /// inner/outer radius ratio for rings, else -1.
    pub param: f32,
}

impl BodyInstance {
    pub const FLOATS: usize = 24;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;

    pub const KIND_SPHERE: f32 = 0.0;
    pub const KIND_MODEL_PART: f32 = 1.0;
    pub const KIND_GLOW: f32 = 2.0;
    pub const KIND_RING: f32 = 3.0;

    /// Material groups per sub-mesh that `param` can address.
    pub const PART_STRIDE: u32 = 256;

    /// Encode a sub-mesh index and material group index into `param`.
    /// Exact in f32 for any realistic model.
    pub fn part_param(part: usize, group: usize) -> f32 {
        (part as u32 * Self::PART_STRIDE + group as u32) as f32
    }

    /// Inverse of `part_param`.
    pub fn decode_part_param(param: f32) -> (usize, usize) {
        let raw = param as u32;
        ((raw / Self::PART_STRIDE) as usize, (raw % Self::PART_STRIDE) as usize)
    }
}

/// Shooting-star trail vertex: position plus fade.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct TrailVertex {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub alpha: f32,
}

impl TrailVertex {
    pub const FLOATS: usize = 4;
}

/// Static point-cloud vertex: position plus colour.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct PointVertex {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl PointVertex {
    pub const FLOATS: usize = 6;

    pub fn new(position: glam::Vec3, color: [f32; 3]) -> Self {
        Self {
            x: position.x,
            y: position.y,
            z: position.z,
            r: color[0],
            g: color[1],
            b: color[2],
        }
    }
}

/// Static line-strip vertex.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct LineVertex {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl LineVertex {
    pub const FLOATS: usize = 3;
}

/// Everything the host reads after a tick. Rebuilt each frame.
pub struct FrameBuffers {
    /// Opaque and alpha-blended instances first; instances from
    /// `additive_split` on use additive blending (glow halos).
    pub bodies: Vec<BodyInstance>,
    pub additive_split: u32,
    pub trails: Vec<TrailVertex>,
    pub camera: CameraUniform,
    pub lights: Vec<PointLight>,
    pub events: Vec<HostEvent>,
    /// Handles released since the previous frame.
    pub released: Vec<u32>,
    max_bodies: usize,
    max_trail_vertices: usize,
    max_events: usize,
}

impl FrameBuffers {
    pub fn with_capacity(
        max_bodies: usize,
        max_trail_vertices: usize,
        max_events: usize,
        max_lights: usize,
    ) -> Self {
        Self {
            bodies: Vec::with_capacity(max_bodies),
            additive_split: 0,
            trails: Vec::with_capacity(max_trail_vertices),
            camera: CameraUniform::default(),
            lights: Vec::with_capacity(max_lights),
            events: Vec::with_capacity(max_events),
            released: Vec::new(),
            max_bodies,
            max_trail_vertices,
            max_events,
        }
    }

    pub fn clear(&mut self) {
        self.bodies.clear();
        self.additive_split = 0;
        self.trails.clear();
        self.lights.clear();
        self.events.clear();
        self.released.clear();
    }

    /// Push a body instance. Returns false once the capacity is reached.
    pub fn push_body(&mut self, instance: BodyInstance) -> bool {
        if self.bodies.len() >= self.max_bodies {
            return false;
        }
        self.bodies.push(instance);
        true
    }

    pub fn push_trail(&mut self, vertex: TrailVertex) -> bool {
        if self.trails.len() >= self.max_trail_vertices {
            return false;
        }
        self.trails.push(vertex);
        true
    }

    pub fn push_event(&mut self, event: HostEvent) -> bool {
        if self.events.len() >= self.max_events {
            return false;
        }
        self.events.push(event);
        true
    }

    pub fn push_released(&mut self, handle: ResourceHandle) {
        self.released.push(handle.0);
    }

    pub fn body_count(&self) -> u32 {
        self.bodies.len() as u32
    }

    pub fn trail_vertex_count(&self) -> u32 {
        self.trails.len() as u32
    }

    // -- Raw pointers for SharedArrayBuffer reads --

    pub fn bodies_ptr(&self) -> *const f32 {
        self.bodies.as_ptr() as *const f32
    }

    pub fn trails_ptr(&self) -> *const f32 {
        self.trails.as_ptr() as *const f32
    }

    pub fn camera_ptr(&self) -> *const f32 {
        &self.camera as *const CameraUniform as *const f32
    }

    pub fn lights_ptr(&self) -> *const f32 {
        self.lights.as_ptr() as *const f32
    }

    pub fn events_ptr(&self) -> *const f32 {
        self.events.as_ptr() as *const f32
    }

    pub fn released_ptr(&self) -> *const u32 {
        self.released.as_ptr()
    }
}
