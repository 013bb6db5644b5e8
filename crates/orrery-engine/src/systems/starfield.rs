//! Procedural backdrop: a galactic band hugging the y = 0 plane and a
//! uniform shell of faint stars.

use std::f32::consts::TAU;

use glam::Vec3;

use crate::api::config::StarfieldConfig;
use crate::components::mesh::Color;
use crate::core::rng::Rng;
use crate::renderer::instance::PointVertex;

/// Band colours: white, pinks and purples near the plane, blues far from it.
pub const BAND_PALETTE: [Color; 6] = [
    Color::new(1.0, 1.0, 1.0),
    Color::new(1.0, 182.0 / 255.0, 1.0),
    Color::new(213.0 / 255.0, 128.0 / 255.0, 1.0),
    Color::new(162.0 / 255.0, 89.0 / 255.0, 1.0),
    Color::new(182.0 / 255.0, 182.0 / 255.0, 1.0),
    Color::new(224.0 / 255.0, 231.0 / 255.0, 1.0),
];

/// Height above the band plane for a uniform `u` in [0, 1): cubic falloff
/// packs most points near y = 0.
pub fn band_height(u: f32, peak: f32) -> f32 {
    let t = (u - 0.5) * 2.0;
    t * t * t * peak
}

/// Palette index range for a point at height `y`:
/// `[0, 3)` inside `inner`, `[2, 4)` inside `outer`, `[4, 6)` beyond.
pub fn band_stratum(y: f32, inner: f32, outer: f32) -> (u32, u32) {
    let h = y.abs();
    if h < inner {
        (0, 3)
    } else if h < outer {
        (2, 4)
    } else {
        (4, 6)
    }
}

pub fn galactic_band(config: &StarfieldConfig, palette: &[Color; 6], rng: &mut Rng) -> Vec<PointVertex> {
    let mut points = Vec::with_capacity(config.band_count);
    for _ in 0..config.band_count {
        let r = rng.range(config.band_radius_min, config.band_radius_max);
        let theta = rng.next_f32() * TAU;
        let y = band_height(rng.next_f32(), config.band_height);
        let (lo, hi) = band_stratum(y, config.band_inner, config.band_outer);
        let color = palette[rng.int_range(lo, hi) as usize];
        points.push(PointVertex::new(
            Vec3::new(theta.cos() * r, y, theta.sin() * r),
            color.to_array(),
        ));
    }
    points
}

/// White stars on a thick shell, uniform over the sphere (inverse-CDF on the polar angle).
pub fn shell(config: &StarfieldConfig, rng: &mut Rng) -> Vec<PointVertex> {
    let mut points = Vec::with_capacity(config.shell_count);
    for _ in 0..config.shell_count {
        let r = rng.range(config.shell_radius_min, config.shell_radius_max);
        let theta = rng.next_f32() * TAU;
        let phi = (2.0 * rng.next_f32() - 1.0).clamp(-1.0, 1.0).acos();
        let direction = Vec3::new(phi.sin() * theta.cos(), phi.sin() * theta.sin(), phi.cos());
        points.push(PointVertex::new(direction * r, Color::WHITE.to_array()));
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> StarfieldConfig {
        StarfieldConfig {
            band_count: 5_000,
            shell_count: 2_000,
            ..Default::default()
        }
    }

    #[test]
    fn band_height_is_cubic_and_bounded() {
        assert_eq!(band_height(0.5, 180.0), 0.0);
        assert!((band_height(0.0, 180.0) + 180.0).abs() < 1e-4);
        assert!((band_height(0.75, 180.0) - 22.5).abs() < 1e-4);
    }

    #[test]
    fn strata_boundaries() {
        assert_eq!(band_stratum(39.9, 40.0, 100.0), (0, 3));
        assert_eq!(band_stratum(-40.0, 40.0, 100.0), (2, 4));
        assert_eq!(band_stratum(99.0, 40.0, 100.0), (2, 4));
        assert_eq!(band_stratum(100.0, 40.0, 100.0), (4, 6));
    }

    #[test]
    fn band_points_respect_radius_height_and_palette() {
        let cfg = small_config();
        let points = galactic_band(&cfg, &BAND_PALETTE, &mut Rng::new(1));
        assert_eq!(points.len(), 5_000);
        let mut near_plane = 0;
        for p in &points {
            let planar = (p.x * p.x + p.z * p.z).sqrt();
            assert!(planar >= 900.0 - 1e-2 && planar <= 1300.0 + 1e-2, "radius {planar}");
            assert!(p.y.abs() <= 180.0 + 1e-3);
            let (lo, hi) = band_stratum(p.y, cfg.band_inner, cfg.band_outer);
            let allowed = &BAND_PALETTE[lo as usize..hi as usize];
            assert!(
                allowed.iter().any(|c| c.to_array() == [p.r, p.g, p.b]),
                "colour at y={} outside its stratum",
                p.y
            );
            if p.y.abs() < 40.0 {
                near_plane += 1;
            }
        }
        // P(|t|^3 * 180 < 40) = (40/180)^(1/3) ≈ 0.606
        assert!(near_plane > 2_700, "only {near_plane} points near the plane");
    }

    #[test]
    fn shell_points_lie_on_shell_and_cover_both_hemispheres() {
        let cfg = small_config();
        let points = shell(&cfg, &mut Rng::new(2));
        assert_eq!(points.len(), 2_000);
        let mut north = 0;
        for p in &points {
            let r = Vec3::new(p.x, p.y, p.z).length();
            assert!(r >= 900.0 - 1e-2 && r <= 1000.0 + 1e-2, "radius {r}");
            if p.z > 0.0 {
                north += 1;
            }
        }
        assert!((800..1200).contains(&north), "hemisphere split {north}");
    }
}
