use glam::{Mat4, Quat, Vec3};

use crate::api::types::TextureId;
use crate::components::body::{Attachment, CelestialBody};
use crate::components::mesh::{BodyVisual, Material};
use crate::core::scene::Scene;
use crate::renderer::camera::PerspectiveCamera;
use crate::renderer::instance::{BodyInstance, FrameBuffers};
use crate::systems::lighting::LightState;
use crate::systems::shooting_stars::ShootingStarField;

fn instance(model: Mat4, material: &Material, kind: f32, body: &CelestialBody, param: f32) -> BodyInstance {
    BodyInstance {
        model: model.to_cols_array(),
        r: material.color.r,
        g: material.color.g,
        b: material.color.b,
        opacity: material.opacity,
        texture: TextureId::wire(material.texture),
        kind,
        handle: body.handle.0 as f32,
        param,
    }
}

/// Instances for the body itself: one sphere, or one per material group of
/// every model sub-mesh. A part with an empty slot still gets one instance.
fn body_instances(body: &CelestialBody, out: &mut Vec<BodyInstance>) {
    let transform = body.transform();
    match &body.visual {
        BodyVisual::Primitive(sphere) => {
            let model = transform * Mat4::from_scale(Vec3::splat(sphere.radius));
            out.push(instance(model, &sphere.material, BodyInstance::KIND_SPHERE, body, -1.0));
        }
        BodyVisual::Model(mesh) => {
            let default = Material::default();
            for (i, part) in mesh.parts.iter().enumerate() {
                let local = Mat4::from_scale_rotation_translation(
                    Vec3::splat(mesh.scale),
                    Quat::from_rotation_y(part.spin),
                    part.center,
                );
                let model = transform * local;
                let groups = part.materials.as_slice();
                if groups.is_empty() {
                    let param = BodyInstance::part_param(i, 0);
                    out.push(instance(model, &default, BodyInstance::KIND_MODEL_PART, body, param));
                }
                for (group, material) in groups.iter().enumerate() {
                    let param = BodyInstance::part_param(i, group);
                    out.push(instance(model, material, BodyInstance::KIND_MODEL_PART, body, param));
                }
            }
        }
    }
}

/// Rings are alpha-blended and go with the body pass; glows are additive and go last.
fn attachment_instances(body: &CelestialBody, blended: &mut Vec<BodyInstance>, additive: &mut Vec<BodyInstance>) {
    for attachment in &body.attachments {
        match attachment {
            Attachment::Ring { inner, outer, tilt, texture, opacity } => {
                let model = Mat4::from_scale_rotation_translation(
                    Vec3::splat(*outer),
                    Quat::from_rotation_x(*tilt),
                    body.position,
                );
                let material = Material {
                    texture: Some(*texture),
                    opacity: *opacity,
                    transparent: true,
                    ..Default::default()
                };
                let ratio = if *outer > 0.0 { inner / outer } else { 0.0 };
                blended.push(instance(model, &material, BodyInstance::KIND_RING, body, ratio));
            }
            Attachment::Glow { color, size, texture } => {
                let model = Mat4::from_scale_rotation_translation(
                    Vec3::new(*size, *size, 1.0),
                    Quat::IDENTITY,
                    body.position,
                );
                let material = Material {
                    color: *color,
                    texture: *texture,
                    transparent: true,
                    ..Default::default()
                };
                additive.push(instance(model, &material, BodyInstance::KIND_GLOW, body, -1.0));
            }
        }
    }
}

/// Build the per-frame buffers: body instances (blended first, additive after
/// `additive_split`), shooting-star trails, camera uniform and lights.
/// Events and released handles are appended separately by the context.
pub fn build_frame(
    scene: &Scene,
    stars: &ShootingStarField,
    camera: &PerspectiveCamera,
    lights: &LightState,
    frame: &mut FrameBuffers,
) {
    frame.bodies.clear();
    frame.trails.clear();
    frame.lights.clear();

    let mut blended = Vec::with_capacity(scene.len() * 2);
    let mut additive = Vec::with_capacity(scene.len());
    for body in scene.iter() {
        body_instances(body, &mut blended);
        attachment_instances(body, &mut blended, &mut additive);
    }

    for inst in blended {
        if !frame.push_body(inst) {
            break;
        }
    }
    frame.additive_split = frame.body_count();
    for inst in additive {
        if !frame.push_body(inst) {
            log::debug!("body instance capacity reached; dropping halos");
            break;
        }
    }

    stars.write_trails(frame);
    frame.camera = camera.uniform();
    frame.lights.extend(lights.iter().copied());
}
