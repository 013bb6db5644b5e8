use glam::Vec3;
use orrery_engine::systems::guides::orbit_loop;
use orrery_engine::systems::starfield::{galactic_band, shell, BAND_PALETTE};
use orrery_engine::{Color, EngineContext, LoadGroup, PointLight, PointStyle, SceneNode};

use crate::loader::Purpose;
use crate::manifest::SystemManifest;

const BACKGROUND_RADIUS: f32 = 1000.0;
const BACKGROUND_SEGMENTS: u32 = 64;

const AMBIENT_INTENSITY: f32 = 0.7;
const SUN_LIGHT_COLOR: u32 = 0xfff7ae;
const SUN_LIGHT_INTENSITY: f32 = 2.0;
const SUN_LIGHT_RANGE: f32 = 2000.0;

const GUIDE_COLOR: u32 = 0xe5e7ef;
const GUIDE_OPACITY: f32 = 0.13;
const GUIDE_SEGMENTS: u32 = 100;

/// Everything that does not move and does not depend on a body asset:
/// background, both star clouds, lights and orbit guides.
pub fn build_static(ctx: &mut EngineContext, manifest: &SystemManifest) {
    ctx.scene.add_node(SceneNode::Background {
        radius: BACKGROUND_RADIUS,
        segments: BACKGROUND_SEGMENTS,
        texture: None,
        back_side: true,
    });
    if let Some(url) = &manifest.background {
        ctx.request_texture(LoadGroup::Decoration, url, &Purpose::Background.tag());
    }

    let band = galactic_band(&ctx.config.starfield, &BAND_PALETTE, &mut ctx.rng);
    ctx.scene.add_points(
        "galactic_band",
        band,
        PointStyle {
            size: 5.0,
            opacity: 0.38,
            size_attenuation: true,
            vertex_colors: true,
            depth_write: false,
        },
    );
    let stars = shell(&ctx.config.starfield, &mut ctx.rng);
    ctx.scene.add_points(
        "star_shell",
        stars,
        PointStyle {
            size: 1.2,
            ..Default::default()
        },
    );

    ctx.lights.set_ambient(Color::WHITE, AMBIENT_INTENSITY);
    ctx.scene.add_node(SceneNode::AmbientLight {
        color: Color::WHITE.to_array(),
        intensity: AMBIENT_INTENSITY,
    });
    let sun_color = Color::from_hex(SUN_LIGHT_COLOR);
    ctx.lights.add(PointLight::new(Vec3::ZERO, sun_color, SUN_LIGHT_INTENSITY, SUN_LIGHT_RANGE));
    ctx.scene.add_node(SceneNode::PointLight {
        position: [0.0; 3],
        color: sun_color.to_array(),
        intensity: SUN_LIGHT_INTENSITY,
        range: SUN_LIGHT_RANGE,
    });

    let guide_color = Color::from_hex(GUIDE_COLOR).to_array();
    for body in manifest.bodies.iter().filter(|b| b.orbit_radius > 0.0) {
        let radius = body.orbit_radius;
        ctx.scene.add_guide(radius, orbit_loop(radius, GUIDE_SEGMENTS), guide_color, GUIDE_OPACITY);
    }
}
