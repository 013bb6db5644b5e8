use crate::api::types::BodyId;
use crate::components::body::CelestialBody;
use crate::core::math::Ray;

/// Nearest body under a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickHit {
    pub body: BodyId,
    /// Sub-mesh that was hit, for model bodies.
    pub part: Option<usize>,
    pub distance: f32,
}

/// Intersect the ray with every body's bounding spheres and return the
/// closest hit. Halos and rings are not pick targets.
pub fn pick<'a>(ray: &Ray, bodies: impl IntoIterator<Item = &'a CelestialBody>) -> Option<PickHit> {
    let mut best: Option<PickHit> = None;
    for body in bodies {
        for sphere in body.pick_spheres() {
            let Some(t) = ray.intersect_sphere(sphere.center, sphere.radius) else {
                continue;
            };
            if best.map_or(true, |b| t < b.distance) {
                best = Some(PickHit {
                    body: body.id,
                    part: sphere.part,
                    distance: t,
                });
            }
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::ResourceHandle;
    use crate::components::body::{Attachment, BodyRole};
    use crate::components::mesh::{BodyVisual, Color, Material, SphereMesh};
    use glam::Vec3;

    fn sphere(id: u32, x: f32, radius: f32) -> CelestialBody {
        let mut b = CelestialBody::new(
            BodyId(id),
            "s",
            BodyVisual::Primitive(SphereMesh::new(radius, Material::default())),
            BodyRole::Planet,
            ResourceHandle(id),
        );
        b.position = Vec3::new(x, 0.0, 0.0);
        b
    }

    #[test]
    fn nearest_hit_wins() {
        let bodies = vec![sphere(1, 0.0, 5.0), sphere(2, 50.0, 5.0)];
        let ray = Ray::new(Vec3::new(100.0, 0.0, 0.0), Vec3::NEG_X);
        let hit = pick(&ray, &bodies).unwrap();
        assert_eq!(hit.body, BodyId(2));
        assert!((hit.distance - 45.0).abs() < 1e-4);
        assert_eq!(hit.part, None);
    }

    #[test]
    fn miss_returns_none() {
        let bodies = vec![sphere(1, 0.0, 5.0)];
        let ray = Ray::new(Vec3::new(0.0, 50.0, 0.0), Vec3::X);
        assert!(pick(&ray, &bodies).is_none());
    }

    #[test]
    fn glow_halo_does_not_extend_pick_area() {
        let mut body = sphere(1, 0.0, 5.0);
        body.attach(Attachment::Glow { color: Color::WHITE, size: 120.0, texture: None });
        let ray = Ray::new(Vec3::new(0.0, 20.0, 100.0), Vec3::NEG_Z);
        assert!(pick(&ray, [&body]).is_none());
    }
}
