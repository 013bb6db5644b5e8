use serde::Serialize;

use crate::api::types::{BodyId, TextureId};
use crate::components::body::CelestialBody;
use crate::components::node::{PointStyle, SceneNode};
use crate::renderer::instance::{LineVertex, PointVertex};

/// Scene storage: static nodes built once plus the live celestial bodies.
/// Bodies live in a flat Vec; the scene holds tens of them, not thousands.
pub struct Scene {
    nodes: Vec<SceneNode>,
    points: Vec<PointVertex>,
    lines: Vec<LineVertex>,
    bodies: Vec<CelestialBody>,
    next_body: u32,
}

#[derive(Serialize)]
struct SceneDescriptor<'a> {
    nodes: &'a [SceneNode],
    point_vertex_count: usize,
    line_vertex_count: usize,
}

impl Scene {
    pub fn new() -> Self {
        Self::with_capacity(16)
    }

    pub fn with_capacity(body_capacity: usize) -> Self {
        Self {
            nodes: Vec::new(),
            points: Vec::new(),
            lines: Vec::new(),
            bodies: Vec::with_capacity(body_capacity),
            next_body: 1,
        }
    }

    // -- Static nodes --

    pub fn add_node(&mut self, node: SceneNode) {
        self.nodes.push(node);
    }

    /// Append a point cloud. Its vertices land in the shared point buffer.
    pub fn add_points(&mut self, name: &str, vertices: Vec<PointVertex>, style: PointStyle) {
        let offset = self.points.len();
        let count = vertices.len();
        self.points.extend(vertices);
        self.nodes.push(SceneNode::Points {
            name: name.to_string(),
            offset,
            count,
            style,
        });
    }

    /// Append a line strip (orbit guide). Its vertices land in the shared line buffer.
    pub fn add_guide(&mut self, radius: f32, vertices: Vec<LineVertex>, color: [f32; 3], opacity: f32) {
        let offset = self.lines.len();
        let count = vertices.len();
        self.lines.extend(vertices);
        self.nodes.push(SceneNode::Guide {
            radius,
            offset,
            count,
            color,
            opacity,
        });
    }

    /// Attach a resolved texture to the background sphere, if there is one.
    pub fn set_background_texture(&mut self, texture: TextureId) -> bool {
        for node in &mut self.nodes {
            if let SceneNode::Background { texture: slot, .. } = node {
                *slot = Some(texture.0);
                return true;
            }
        }
        false
    }

    pub fn nodes(&self) -> &[SceneNode] {
        &self.nodes
    }

    pub fn point_vertices(&self) -> &[PointVertex] {
        &self.points
    }

    pub fn line_vertices(&self) -> &[LineVertex] {
        &self.lines
    }

    /// JSON descriptor of the static nodes, read once by the host.
    pub fn descriptor_json(&self) -> String {
        let descriptor = SceneDescriptor {
            nodes: &self.nodes,
            point_vertex_count: self.points.len(),
            line_vertex_count: self.lines.len(),
        };
        serde_json::to_string(&descriptor).unwrap_or_else(|e| {
            log::error!("scene descriptor serialization failed: {e}");
            String::from("{}")
        })
    }

    // -- Bodies --

    /// Generate the next unique body ID.
    pub fn next_body_id(&mut self) -> BodyId {
        let id = BodyId(self.next_body);
        self.next_body += 1;
        id
    }

    pub fn spawn(&mut self, body: CelestialBody) {
        self.bodies.push(body);
    }

    /// Remove a body by ID. Returns the removed body if found.
    pub fn despawn(&mut self, id: BodyId) -> Option<CelestialBody> {
        let idx = self.bodies.iter().position(|b| b.id == id)?;
        Some(self.bodies.remove(idx))
    }

    pub fn get(&self, id: BodyId) -> Option<&CelestialBody> {
        self.bodies.iter().find(|b| b.id == id)
    }

    pub fn get_mut(&mut self, id: BodyId) -> Option<&mut CelestialBody> {
        self.bodies.iter_mut().find(|b| b.id == id)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&CelestialBody> {
        self.bodies.iter().find(|b| b.name == name)
    }

    pub fn find_by_name_mut(&mut self, name: &str) -> Option<&mut CelestialBody> {
        self.bodies.iter_mut().find(|b| b.name == name)
    }

    pub fn bodies(&self) -> &[CelestialBody] {
        &self.bodies
    }

    pub fn iter(&self) -> impl Iterator<Item = &CelestialBody> {
        self.bodies.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut CelestialBody> {
        self.bodies.iter_mut()
    }

    /// Number of bodies in the scene.
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Drop every body and static node.
    pub fn clear(&mut self) {
        self.bodies.clear();
        self.nodes.clear();
        self.points.clear();
        self.lines.clear();
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}
