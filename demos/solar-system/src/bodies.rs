//! The default star system: one star and eight planets on circular orbits.
//!
//! Distances and sizes are scene units chosen for readability, not to scale.
//! Speeds are radians per frame.

/// Row of the body table.
pub struct BodyRow {
    pub name: &'static str,
    pub orbit: f32,
    pub size: f32,
    pub speed: f32,
    /// Axial tilt in degrees.
    pub tilt_deg: f32,
}

pub const STAR: &str = "sun";
pub const RINGED: &str = "saturn";

pub const BODIES: [BodyRow; 9] = [
    BodyRow { name: "sun", orbit: 0.0, size: 32.0, speed: 0.0, tilt_deg: 7.25 },
    BodyRow { name: "mercury", orbit: 60.0, size: 6.0, speed: 0.004375, tilt_deg: 0.03 },
    BodyRow { name: "venus", orbit: 90.0, size: 10.0, speed: 0.0035, tilt_deg: 177.4 },
    BodyRow { name: "earth", orbit: 120.0, size: 12.0, speed: 0.00275, tilt_deg: 23.4 },
    BodyRow { name: "mars", orbit: 150.0, size: 9.0, speed: 0.00225, tilt_deg: 25.2 },
    BodyRow { name: "jupiter", orbit: 190.0, size: 22.0, speed: 0.0015, tilt_deg: 3.1 },
    BodyRow { name: "saturn", orbit: 240.0, size: 18.0, speed: 0.001125, tilt_deg: 26.7 },
    BodyRow { name: "uranus", orbit: 280.0, size: 14.0, speed: 0.000875, tilt_deg: 97.8 },
    BodyRow { name: "neptune", orbit: 320.0, size: 13.0, speed: 0.000625, tilt_deg: 28.3 },
];

/// Star self-rotation, radians per frame.
pub const STAR_ROTATION: f32 = 0.002;
/// Planet self-rotation is drawn from `[PLANET_ROTATION_MIN, PLANET_ROTATION_MIN + PLANET_ROTATION_SPREAD)`.
pub const PLANET_ROTATION_MIN: f32 = 0.01;
pub const PLANET_ROTATION_SPREAD: f32 = 0.01;

// ── Decorations ──────────────────────────────────────────────────────

pub const STAR_GLOW_COLOR: u32 = 0xfff8b0;
pub const STAR_GLOW_SIZE: f32 = 120.0;
/// Planet halo diameter relative to the planet size.
pub const PLANET_GLOW_SCALE: f32 = 3.5;

/// Colour of the stand-in star when its model cannot be loaded.
pub const FALLBACK_STAR_COLOR: u32 = 0xffd700;

pub const RING_INNER_PAD: f32 = 2.0;
pub const RING_OUTER_PAD: f32 = 6.0;
pub const RING_TILT: f32 = std::f32::consts::PI / 2.2;
pub const RING_OPACITY: f32 = 0.7;
