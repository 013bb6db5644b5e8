use std::collections::HashSet;

use orrery_engine::{EngineConfig, FallbackTexture, ManifestError};
use serde::Deserialize;

use crate::bodies::{self, BODIES, RINGED, STAR};

const TEXTURE_BASE: &str = "https://www.solarsystemscope.com/textures/download";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleEntry {
    Star,
    #[default]
    Planet,
}

/// A body loaded from a model descriptor instead of built as a sphere.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ModelEntry {
    /// Model descriptor JSON.
    pub url: String,
    pub scale: f32,
    #[serde(default)]
    pub fallback_texture: Option<String>,
    #[serde(default)]
    pub fallback_policy: FallbackTexture,
    /// Spin each sub-mesh about its own centre instead of the whole model.
    #[serde(default)]
    pub spin_children: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BodyEntry {
    pub name: String,
    #[serde(default)]
    pub role: RoleEntry,
    #[serde(default)]
    pub orbit_radius: f32,
    pub size: f32,
    #[serde(default)]
    pub speed: f32,
    #[serde(default)]
    pub tilt_deg: f32,
    /// Surface texture for a primitive body.
    #[serde(default)]
    pub texture: Option<String>,
    #[serde(default)]
    pub model: Option<ModelEntry>,
    #[serde(default)]
    pub ring: bool,
}

/// Asset URLs and body table for the solar system. The host may replace it
/// before init; `config` overrides engine tunables.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SystemManifest {
    pub background: Option<String>,
    pub glow_sprite: Option<String>,
    pub ring_texture: Option<String>,
    pub bodies: Vec<BodyEntry>,
    pub config: Option<EngineConfig>,
}

fn surface_url(file: &str) -> String {
    format!("{TEXTURE_BASE}/2k_{file}.jpg")
}

fn default_model(name: &str) -> Option<ModelEntry> {
    let entry = match name {
        "sun" => ModelEntry {
            url: "/assets/sun/UnstableStar.model.json".into(),
            scale: 0.002,
            fallback_texture: Some("/assets/sun/suncyl1.jpg".into()),
            fallback_policy: FallbackTexture::Always,
            spin_children: false,
        },
        "jupiter" => ModelEntry {
            url: "/assets/jupiter/jupiter.model.json".into(),
            scale: 0.000001,
            fallback_texture: Some("/assets/jupiter/Uv1_jupiter1_diff.png".into()),
            fallback_policy: FallbackTexture::IfMissing,
            spin_children: false,
        },
        "uranus" => ModelEntry {
            url: "/assets/uranus/source/uranus.model.json".into(),
            scale: 0.0007,
            fallback_texture: Some("/assets/uranus/source/Uv1_uranus1_diff.png".into()),
            fallback_policy: FallbackTexture::IfMissing,
            spin_children: true,
        },
        _ => return None,
    };
    Some(entry)
}

fn default_texture(name: &str) -> Option<String> {
    let file = match name {
        "mercury" => "mercury",
        "venus" => "venus_surface",
        "earth" => "earth_daymap",
        "mars" => "mars",
        "jupiter" => "jupiter",
        "saturn" => "saturn",
        "uranus" => "uranus",
        "neptune" => "neptune",
        _ => return None,
    };
    Some(surface_url(file))
}

impl Default for SystemManifest {
    fn default() -> Self {
        let bodies = BODIES
            .iter()
            .map(|row| BodyEntry {
                name: row.name.to_string(),
                role: if row.name == STAR { RoleEntry::Star } else { RoleEntry::Planet },
                orbit_radius: row.orbit,
                size: row.size,
                speed: row.speed,
                tilt_deg: row.tilt_deg,
                texture: default_texture(row.name),
                model: default_model(row.name),
                ring: row.name == RINGED,
            })
            .collect();
        Self {
            background: Some(
                "https://cdn.jsdelivr.net/gh/johan/world.geo.json@master/images/eso0932a.jpg".into(),
            ),
            glow_sprite: Some("/assets/circle.png".into()),
            ring_texture: Some(format!("{TEXTURE_BASE}/2k_saturn_ring_alpha.png")),
            bodies,
            config: None,
        }
    }
}

impl SystemManifest {
    /// Parse and validate an override.
    pub fn from_json(json: &str) -> Result<Self, ManifestError> {
        let manifest: Self = serde_json::from_str(json)?;
        manifest.validate()?;
        Ok(manifest)
    }

    pub fn validate(&self) -> Result<(), ManifestError> {
        let stars = self.bodies.iter().filter(|b| b.role == RoleEntry::Star).count();
        if stars != 1 {
            return Err(ManifestError::Invalid(format!("expected exactly one star, found {stars}")));
        }
        let mut seen = HashSet::new();
        for body in &self.bodies {
            if !seen.insert(body.name.as_str()) {
                return Err(ManifestError::Invalid(format!("duplicate body {}", body.name)));
            }
            if body.size <= 0.0 || body.orbit_radius < 0.0 {
                return Err(ManifestError::Invalid(format!("{} has a non-positive size or negative orbit", body.name)));
            }
        }
        Ok(())
    }

    pub fn body(&self, name: &str) -> Option<&BodyEntry> {
        self.bodies.iter().find(|b| b.name == name)
    }

    pub fn engine_config(&self) -> EngineConfig {
        self.config.clone().unwrap_or_default()
    }

    /// Whether anything in the manifest wants a ring.
    pub fn wants_ring(&self) -> bool {
        self.ring_texture.is_some() && self.bodies.iter().any(|b| b.ring)
    }
}

impl BodyEntry {
    pub fn tilt(&self) -> f32 {
        self.tilt_deg.to_radians()
    }

    pub fn is_star(&self) -> bool {
        self.role == RoleEntry::Star
    }

    /// Radius used by the ring, based on the table size when the entry came from it.
    pub fn ring_radii(&self) -> (f32, f32) {
        (self.size + bodies::RING_INNER_PAD, self.size + bodies::RING_OUTER_PAD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_manifest_is_valid() {
        let manifest = SystemManifest::default();
        assert!(manifest.validate().is_ok());
        assert_eq!(manifest.bodies.len(), 9);
        assert!(manifest.body("sun").is_some_and(|s| s.is_star()));
        assert!(manifest.wants_ring());
    }

    #[test]
    fn distinguished_bodies_load_models() {
        let manifest = SystemManifest::default();
        let models: Vec<_> = manifest
            .bodies
            .iter()
            .filter(|b| b.model.is_some())
            .map(|b| b.name.as_str())
            .collect();
        assert_eq!(models, vec!["sun", "jupiter", "uranus"]);
        let sun = manifest.body("sun").and_then(|b| b.model.as_ref()).unwrap();
        assert_eq!(sun.fallback_policy, FallbackTexture::Always);
        let uranus = manifest.body("uranus").and_then(|b| b.model.as_ref()).unwrap();
        assert!(uranus.spin_children);
    }

    #[test]
    fn earth_uses_the_daymap() {
        let manifest = SystemManifest::default();
        let earth = manifest.body("earth").unwrap();
        assert_eq!(
            earth.texture.as_deref(),
            Some("https://www.solarsystemscope.com/textures/download/2k_earth_daymap.jpg")
        );
        assert!((earth.tilt() - 23.4f32.to_radians()).abs() < 1e-6);
    }

    #[test]
    fn override_with_config() {
        let json = r#"{
            "bodies": [
                { "name": "star", "role": "star", "size": 20 },
                { "name": "rock", "orbit_radius": 50, "size": 4, "speed": 0.01 }
            ],
            "config": { "popup_close_delay": 0.0 }
        }"#;
        let manifest = SystemManifest::from_json(json).unwrap();
        assert_eq!(manifest.bodies.len(), 2);
        assert_eq!(manifest.engine_config().popup_close_delay, 0.0);
        assert!(!manifest.wants_ring());
        assert!(manifest.background.is_some(), "unspecified fields keep defaults");
    }

    #[test]
    fn two_stars_are_rejected() {
        let json = r#"{ "bodies": [
            { "name": "a", "role": "star", "size": 1 },
            { "name": "b", "role": "star", "size": 1 }
        ] }"#;
        assert!(matches!(SystemManifest::from_json(json), Err(ManifestError::Invalid(_))));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(SystemManifest::from_json("{"), Err(ManifestError::Parse(_))));
    }
}
