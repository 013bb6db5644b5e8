use glam::{Mat4, Quat, Vec3};

use crate::api::types::{BodyId, ResourceHandle, TextureId};
use crate::components::mesh::{BodyVisual, Color, HasChildren, SpinTarget};

/// What a body is in the system. There is exactly one primary star.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyRole {
    PrimaryStar,
    Planet,
}

/// Decorations that follow a body but are never pick targets.
#[derive(Debug, Clone, PartialEq)]
pub enum Attachment {
    /// Camera-facing additive sprite centred on the body.
    Glow {
        color: Color,
        size: f32,
        texture: Option<TextureId>,
    },
    /// Flat annulus around the body, tilted about X.
    Ring {
        inner: f32,
        outer: f32,
        tilt: f32,
        texture: TextureId,
        opacity: f32,
    },
}

/// A bounding sphere used for ray picking. `part` is `None` for a primitive body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickSphere {
    pub part: Option<usize>,
    pub center: Vec3,
    pub radius: f32,
}

/// A sun or planet in the scene.
#[derive(Debug, Clone)]
pub struct CelestialBody {
    pub id: BodyId,
    pub name: String,
    pub visual: BodyVisual,
    pub role: BodyRole,
    /// Circular orbit radius in the XZ plane. 0 means stationary at the origin.
    pub orbit_radius: f32,
    /// Current orbital angle in radians, kept in [0, 2π).
    pub angle: f32,
    /// Radians per frame.
    pub angular_speed: f32,
    /// Radians per frame.
    pub self_rotation_rate: f32,
    /// Accumulated self-rotation about the body's (tilted) Y axis.
    pub spin: f32,
    /// Tilt about Z in radians.
    pub axial_tilt: f32,
    pub position: Vec3,
    pub attachments: Vec<Attachment>,
    pub handle: ResourceHandle,
}

impl CelestialBody {
    pub fn new(
        id: BodyId,
        name: &str,
        visual: BodyVisual,
        role: BodyRole,
        handle: ResourceHandle,
    ) -> Self {
        Self {
            id,
            name: name.to_string(),
            visual,
            role,
            orbit_radius: 0.0,
            angle: 0.0,
            angular_speed: 0.0,
            self_rotation_rate: 0.0,
            spin: 0.0,
            axial_tilt: 0.0,
            position: Vec3::ZERO,
            attachments: Vec::new(),
            handle,
        }
    }

    /// Place the body on a circular orbit. The position follows immediately.
    pub fn with_orbit(mut self, radius: f32, angular_speed: f32, angle: f32) -> Self {
        self.orbit_radius = radius;
        self.angular_speed = angular_speed;
        self.angle = angle.rem_euclid(std::f32::consts::TAU);
        self.position = crate::systems::orbit::orbit_position(radius, self.angle);
        self
    }

    pub fn with_rotation(mut self, rate: f32) -> Self {
        self.self_rotation_rate = rate;
        self
    }

    pub fn with_tilt(mut self, radians: f32) -> Self {
        self.axial_tilt = radians;
        self
    }

    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    pub fn attach(&mut self, attachment: Attachment) {
        self.attachments.push(attachment);
    }

    pub fn has_ring(&self) -> bool {
        self.attachments
            .iter()
            .any(|a| matches!(a, Attachment::Ring { .. }))
    }

    /// Whether self-rotation turns the whole body (as opposed to each sub-mesh).
    pub fn spins_root(&self) -> bool {
        match &self.visual {
            BodyVisual::Primitive(_) => true,
            BodyVisual::Model(model) => model.spin_target == SpinTarget::Root,
        }
    }

    /// Tilt, then spin about the tilted axis.
    pub fn orientation(&self) -> Quat {
        Quat::from_rotation_z(self.axial_tilt) * Quat::from_rotation_y(self.spin)
    }

    /// Rigid transform of the body origin (no scale).
    pub fn transform(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.orientation(), self.position)
    }

    /// World-space bounding spheres: the sphere itself, or one per sub-mesh.
    pub fn pick_spheres(&self) -> Vec<PickSphere> {
        match &self.visual {
            BodyVisual::Primitive(sphere) => vec![PickSphere {
                part: None,
                center: self.position,
                radius: sphere.radius,
            }],
            BodyVisual::Model(model) => {
                let rotation = self.orientation();
                model
                    .children()
                    .iter()
                    .enumerate()
                    .map(|(i, part)| PickSphere {
                        part: Some(i),
                        center: self.position + rotation * part.center,
                        radius: part.radius,
                    })
                    .collect()
            }
        }
    }
}
