use serde::Deserialize;

/// Whether self-rotation keeps advancing while orbital motion is paused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpinPolicy {
    /// Bodies keep spinning while the popup holds their orbits still.
    #[default]
    Continuous,
    /// Spin freezes together with orbital motion.
    FollowOrbit,
}

/// Perspective camera parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees.
    pub fov_y_deg: f32,
    pub near: f32,
    pub far: f32,
    /// Initial eye position. The camera always looks at the origin.
    pub position: [f32; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_y_deg: 60.0,
            near: 0.1,
            far: 2000.0,
            position: [0.0, 120.0, 400.0],
        }
    }
}

/// Damped orbit-control limits.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ControlsConfig {
    pub enable_damping: bool,
    /// Fraction of the pending rotation applied per update (0.05 = heavy damping).
    pub damping_factor: f32,
    pub enable_pan: bool,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Polar angle limits in radians, measured from +Y.
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,
    pub rotate_speed: f32,
    /// Scale applied per wheel notch (< 1.0).
    pub zoom_step: f32,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            enable_damping: true,
            damping_factor: 0.05,
            enable_pan: false,
            min_distance: 100.0,
            max_distance: 1200.0,
            min_polar_angle: 0.0,
            max_polar_angle: std::f32::consts::PI,
            rotate_speed: 1.0,
            zoom_step: 0.95,
        }
    }
}

/// Shooting-star spawn and motion parameters.
/// Time is measured in "units": the spawn timer advances `units_per_frame` per step.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ShootingStarConfig {
    pub units_per_frame: f32,
    /// Spawn threshold range `[min, max)` in units.
    pub interval_min: f32,
    pub interval_max: f32,
    /// Stars per spawn, inclusive range.
    pub min_per_spawn: u32,
    pub max_per_spawn: u32,
    /// Spawn shell radius range `[min, max)`.
    pub shell_min: f32,
    pub shell_max: f32,
    /// Total height spread around the y = 0 plane.
    pub height_spread: f32,
    /// Vertical direction component relative to the planar ones.
    pub vertical_bias: f32,
    /// Distance travelled per frame.
    pub step: f32,
    /// Trail segment length behind the head.
    pub trail_length: f32,
    /// Lifetime range `[min, max)` in frames, drawn continuously.
    pub max_age_min: f32,
    pub max_age_max: f32,
    pub trail_opacity: f32,
}

impl Default for ShootingStarConfig {
    fn default() -> Self {
        Self {
            units_per_frame: 16.0,
            interval_min: 600.0,
            interval_max: 1200.0,
            min_per_spawn: 1,
            max_per_spawn: 2,
            shell_min: 900.0,
            shell_max: 1300.0,
            height_spread: 60.0,
            vertical_bias: 0.1,
            step: 18.0,
            trail_length: 60.0,
            max_age_min: 60.0,
            max_age_max: 90.0,
            trail_opacity: 0.7,
        }
    }
}

/// Procedural backdrop parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StarfieldConfig {
    pub band_count: usize,
    pub band_radius_min: f32,
    pub band_radius_max: f32,
    /// Peak distance from the y = 0 plane (reached by the cubic falloff at |u| = 1).
    pub band_height: f32,
    /// |y| thresholds separating the three colour strata.
    pub band_inner: f32,
    pub band_outer: f32,
    pub shell_count: usize,
    pub shell_radius_min: f32,
    pub shell_radius_max: f32,
}

impl Default for StarfieldConfig {
    fn default() -> Self {
        Self {
            band_count: 60_000,
            band_radius_min: 900.0,
            band_radius_max: 1300.0,
            band_height: 180.0,
            band_inner: 40.0,
            band_outer: 100.0,
            shell_count: 2000,
            shell_radius_min: 900.0,
            shell_radius_max: 1000.0,
        }
    }
}

/// Configuration for the engine, provided by the simulation.
/// Deserializable so a host can override any subset from JSON.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Fixed timestep in seconds (default: 1/60).
    pub fixed_dt: f32,
    /// Initial render-surface size in CSS pixels.
    pub viewport_width: f32,
    pub viewport_height: f32,
    /// Maximum body instances per frame (bodies, model parts, halos, rings).
    pub max_body_instances: usize,
    /// Maximum trail vertices per frame (two per live shooting star).
    pub max_trail_vertices: usize,
    /// Maximum host events per frame.
    pub max_events: usize,
    /// Maximum point lights.
    pub max_lights: usize,
    /// Bounded wait for each asset request, in seconds of frame time. `None` waits forever.
    pub asset_timeout_secs: Option<f32>,
    pub spin_policy: SpinPolicy,
    /// Transition delay between a close request and the popup actually closing.
    pub popup_close_delay: f32,
    /// Offset from the click position to the popup anchor, in CSS pixels.
    pub popup_offset: [f32; 2],
    pub camera: CameraConfig,
    pub controls: ControlsConfig,
    pub shooting_stars: ShootingStarConfig,
    pub starfield: StarfieldConfig,
    /// RNG seed. The browser runner replaces it with a clock-derived seed.
    pub seed: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            viewport_width: 1280.0,
            viewport_height: 720.0,
            max_body_instances: 256,
            max_trail_vertices: 64,
            max_events: 64,
            max_lights: 4,
            asset_timeout_secs: Some(15.0),
            spin_policy: SpinPolicy::Continuous,
            popup_close_delay: 0.2,
            popup_offset: [20.0, -40.0],
            camera: CameraConfig::default(),
            controls: ControlsConfig::default(),
            shooting_stars: ShootingStarConfig::default(),
            starfield: StarfieldConfig::default(),
            seed: 42,
        }
    }
}

impl EngineConfig {
    /// Parse a config override. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_override_keeps_defaults() {
        let config = EngineConfig::from_json(
            r#"{ "spin_policy": "follow_orbit", "controls": { "max_distance": 900.0 } }"#,
        )
        .unwrap();
        assert_eq!(config.spin_policy, SpinPolicy::FollowOrbit);
        assert_eq!(config.controls.max_distance, 900.0);
        assert_eq!(config.controls.min_distance, 100.0);
        assert_eq!(config.shooting_stars.interval_min, 600.0);
        assert_eq!(config.asset_timeout_secs, Some(15.0));
    }

    #[test]
    fn timeout_can_be_disabled() {
        let config = EngineConfig::from_json(r#"{ "asset_timeout_secs": null }"#).unwrap();
        assert_eq!(config.asset_timeout_secs, None);
    }
}
