//! Model descriptors: the JSON summary of a model file that the engine needs
//! for placement, picking and materials. The geometry itself stays with the
//! host, which loads `mesh_url` and draws each part with the instance matrix.
//!
//! Part geometry is expressed relative to the part's own centre.

use glam::Vec3;
use serde::Deserialize;

use crate::api::types::TextureId;
use crate::assets::error::AssetError;
use crate::components::mesh::{
    Color, HasMaterials, Material, MaterialSlot, ModelMesh, SpinTarget, SubMesh,
};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Bounds {
    pub min: [f32; 3],
    pub max: [f32; 3],
}

impl Bounds {
    pub fn center(&self) -> Vec3 {
        (Vec3::from_array(self.min) + Vec3::from_array(self.max)) * 0.5
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MaterialDescriptor {
    #[serde(default)]
    pub color: Option<String>,
    /// The model file embeds a texture for this material.
    #[serde(default)]
    pub map: bool,
    #[serde(default = "default_opacity")]
    pub opacity: f32,
    #[serde(default)]
    pub transparent: bool,
}

fn default_opacity() -> f32 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum MaterialSlotDescriptor {
    Single(MaterialDescriptor),
    Multi(Vec<MaterialDescriptor>),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PartDescriptor {
    #[serde(default)]
    pub name: String,
    /// Bounding-sphere centre in source units.
    pub center: [f32; 3],
    /// Bounding-sphere radius in source units.
    pub radius: f32,
    pub material: MaterialSlotDescriptor,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ModelDescriptor {
    #[serde(default)]
    pub name: String,
    pub mesh_url: String,
    pub bounds: Bounds,
    pub parts: Vec<PartDescriptor>,
}

impl ModelDescriptor {
    pub fn from_json(url: &str, json: &str) -> Result<Self, AssetError> {
        serde_json::from_str(json).map_err(|source| AssetError::Model {
            url: url.to_string(),
            source,
        })
    }
}

/// When a model's materials receive the configured fallback texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackTexture {
    /// Only materials with no map of their own.
    #[default]
    IfMissing,
    /// Every material, replacing embedded maps.
    Always,
}

fn material_from(desc: &MaterialDescriptor) -> Material {
    let color = desc
        .color
        .as_deref()
        .and_then(Color::parse)
        .unwrap_or_default();
    // Source transparency is dropped: bodies always render opaque.
    Material {
        color,
        embedded_map: desc.map,
        ..Default::default()
    }
}

/// Turn a descriptor into a placed model: materials made opaque, parts
/// re-centred on the bounds centre and scaled by `scale`.
pub fn normalise(
    descriptor: &ModelDescriptor,
    scale: f32,
    fallback: Option<TextureId>,
    policy: FallbackTexture,
    spin_target: SpinTarget,
) -> ModelMesh {
    let origin = descriptor.bounds.center();
    let parts = descriptor
        .parts
        .iter()
        .map(|part| SubMesh {
            name: part.name.clone(),
            center: (Vec3::from_array(part.center) - origin) * scale,
            radius: part.radius * scale,
            materials: match &part.material {
                MaterialSlotDescriptor::Single(m) => MaterialSlot::Single(material_from(m)),
                MaterialSlotDescriptor::Multi(ms) => {
                    MaterialSlot::Multi(ms.iter().map(material_from).collect())
                }
            },
            spin: 0.0,
        })
        .collect();

    let mut mesh = ModelMesh {
        parts,
        scale,
        spin_target,
        mesh_url: descriptor.mesh_url.clone(),
    };
    if let Some(texture) = fallback {
        apply_fallback(&mut mesh, texture, policy);
    }
    mesh
}

/// Assign `texture` to the model's materials according to `policy`.
/// Returns how many materials changed.
pub fn apply_fallback(mesh: &mut ModelMesh, texture: TextureId, policy: FallbackTexture) -> usize {
    let mut changed = 0;
    for material in mesh.materials_mut() {
        let take = match policy {
            FallbackTexture::Always => true,
            FallbackTexture::IfMissing => !material.has_map(),
        };
        if take {
            material.texture = Some(texture);
            changed += 1;
        }
    }
    changed
}
