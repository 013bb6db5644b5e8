use std::f32::consts::TAU;

use glam::Vec3;

use crate::api::config::SpinPolicy;
use crate::components::body::CelestialBody;
use crate::components::mesh::{BodyVisual, HasChildren, SpinTarget};

/// Position on a circular orbit of radius `r` in the XZ plane.
pub fn orbit_position(radius: f32, angle: f32) -> Vec3 {
    Vec3::new(radius * angle.cos(), 0.0, radius * angle.sin())
}

/// Advance one animation step for every body.
///
/// While `paused`, orbital angles hold still; self-rotation follows `policy`.
/// Bodies with a zero orbit radius never move.
pub fn advance_bodies<'a>(
    bodies: impl Iterator<Item = &'a mut CelestialBody>,
    paused: bool,
    policy: SpinPolicy,
) {
    let spin = !paused || policy == SpinPolicy::Continuous;
    for body in bodies {
        if !paused {
            advance_orbit(body);
        }
        if spin {
            advance_spin(body);
        }
    }
}

pub fn advance_orbit(body: &mut CelestialBody) {
    if body.orbit_radius == 0.0 {
        return;
    }
    body.angle = (body.angle + body.angular_speed).rem_euclid(TAU);
    body.position = orbit_position(body.orbit_radius, body.angle);
}

pub fn advance_spin(body: &mut CelestialBody) {
    let rate = body.self_rotation_rate;
    match &mut body.visual {
        BodyVisual::Model(model) if model.spin_target == SpinTarget::Children => {
            for part in model.children_mut() {
                part.spin = (part.spin + rate).rem_euclid(TAU);
            }
        }
        _ => body.spin = (body.spin + rate).rem_euclid(TAU),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{BodyId, ResourceHandle};
    use crate::components::body::BodyRole;
    use crate::components::mesh::{Material, MaterialSlot, ModelMesh, SphereMesh, SubMesh};

    fn body(radius: f32, speed: f32, angle: f32) -> CelestialBody {
        CelestialBody::new(
            BodyId(1),
            "b",
            BodyVisual::Primitive(SphereMesh::new(5.0, Material::default())),
            BodyRole::Planet,
            ResourceHandle(1),
        )
        .with_orbit(radius, speed, angle)
        .with_rotation(0.01)
    }

    fn angle_diff(a: f32, b: f32) -> f32 {
        let d = (a - b).rem_euclid(TAU);
        d.min(TAU - d)
    }

    #[test]
    fn stationary_body_stays_at_origin() {
        let mut bodies = vec![body(0.0, 0.5, 0.0)];
        for _ in 0..1000 {
            advance_bodies(bodies.iter_mut(), false, SpinPolicy::Continuous);
            assert_eq!(bodies[0].position, Vec3::ZERO);
        }
    }

    #[test]
    fn angle_after_n_steps_matches_closed_form() {
        let (r, s, a0) = (120.0, 0.00275, 1.3);
        let mut bodies = vec![body(r, s, a0)];
        let n = 5000;
        for _ in 0..n {
            advance_bodies(bodies.iter_mut(), false, SpinPolicy::Continuous);
        }
        let expected = (a0 + n as f32 * s).rem_euclid(TAU);
        let b = &bodies[0];
        assert!(
            angle_diff(b.angle, expected) < 1e-3,
            "angle {} expected {}",
            b.angle,
            expected
        );
        assert!((0.0..TAU).contains(&b.angle));
        let p = orbit_position(r, b.angle);
        assert!((b.position - p).length() < 1e-3);
        assert_eq!(b.position.y, 0.0);
    }

    #[test]
    fn paused_orbit_holds_and_spin_follows_policy() {
        let mut bodies = vec![body(90.0, 0.0035, 0.0)];
        let angle = bodies[0].angle;

        advance_bodies(bodies.iter_mut(), true, SpinPolicy::Continuous);
        assert_eq!(bodies[0].angle, angle);
        assert!(bodies[0].spin > 0.0);

        let spin = bodies[0].spin;
        advance_bodies(bodies.iter_mut(), true, SpinPolicy::FollowOrbit);
        assert_eq!(bodies[0].angle, angle);
        assert_eq!(bodies[0].spin, spin);

        advance_bodies(bodies.iter_mut(), false, SpinPolicy::FollowOrbit);
        assert!(bodies[0].angle > angle);
    }

    #[test]
    fn children_spin_target_rotates_parts_not_root() {
        let model = ModelMesh {
            parts: vec![SubMesh {
                name: "p".into(),
                center: Vec3::ZERO,
                radius: 1.0,
                materials: MaterialSlot::Single(Material::default()),
                spin: 0.0,
            }],
            scale: 0.0007,
            spin_target: SpinTarget::Children,
            mesh_url: String::new(),
        };
        let mut b = body(280.0, 0.000875, 0.0);
        b.visual = BodyVisual::Model(model);
        advance_spin(&mut b);
        assert_eq!(b.spin, 0.0);
        assert!((b.visual.children()[0].spin - 0.01).abs() < 1e-7);
    }
}
