use glam::Vec3;

use crate::api::types::TextureId;

/// Linear RGB color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const WHITE: Color = Color { r: 1.0, g: 1.0, b: 1.0 };

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Build from a 0xRRGGBB literal.
    pub fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as f32 / 255.0,
            g: ((hex >> 8) & 0xff) as f32 / 255.0,
            b: (hex & 0xff) as f32 / 255.0,
        }
    }

    /// Parse `#rrggbb` (leading `#` optional). Returns `None` on malformed input.
    pub fn parse(css: &str) -> Option<Self> {
        let digits = css.strip_prefix('#').unwrap_or(css);
        if digits.len() != 6 {
            return None;
        }
        u32::from_str_radix(digits, 16).ok().map(Self::from_hex)
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Surface material of a body or sub-mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub color: Color,
    pub texture: Option<TextureId>,
    pub opacity: f32,
    pub transparent: bool,
    /// Self-illumination strength (0.0 = lit only by scene lights).
    pub emissive: f32,
    /// The model file carries its own map for this material.
    pub embedded_map: bool,
}

impl Default for Material {
    /// Untextured, opaque white.
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            texture: None,
            opacity: 1.0,
            transparent: false,
            emissive: 0.0,
            embedded_map: false,
        }
    }
}

impl Material {
    /// Opaque white material sampling `texture` when one resolved.
    pub fn textured(texture: Option<TextureId>) -> Self {
        Self {
            texture,
            ..Default::default()
        }
    }

    pub fn colored(color: Color) -> Self {
        Self {
            color,
            ..Default::default()
        }
    }

    pub fn with_emissive(mut self, emissive: f32) -> Self {
        self.emissive = emissive;
        self
    }

    /// Whether any texture (resolved or embedded in the model) covers this material.
    pub fn has_map(&self) -> bool {
        self.texture.is_some() || self.embedded_map
    }
}

/// A sub-mesh carries either one material or one per geometry group.
#[derive(Debug, Clone, PartialEq)]
pub enum MaterialSlot {
    Single(Material),
    Multi(Vec<Material>),
}

impl MaterialSlot {
    pub fn as_slice(&self) -> &[Material] {
        match self {
            MaterialSlot::Single(m) => std::slice::from_ref(m),
            MaterialSlot::Multi(v) => v.as_slice(),
        }
    }

    pub fn as_mut_slice(&mut self) -> &mut [Material] {
        match self {
            MaterialSlot::Single(m) => std::slice::from_mut(m),
            MaterialSlot::Multi(v) => v.as_mut_slice(),
        }
    }
}

/// One renderable piece of a loaded model.
#[derive(Debug, Clone, PartialEq)]
pub struct SubMesh {
    pub name: String,
    /// Bounding-sphere centre relative to the body origin, after centring and scaling.
    pub center: Vec3,
    /// Bounding-sphere radius in world units.
    pub radius: f32,
    pub materials: MaterialSlot,
    /// Accumulated rotation about the part's own centre (radians).
    pub spin: f32,
}

/// A single UV sphere.
#[derive(Debug, Clone, PartialEq)]
pub struct SphereMesh {
    pub radius: f32,
    pub material: Material,
}

impl SphereMesh {
    pub fn new(radius: f32, material: Material) -> Self {
        Self { radius, material }
    }
}

/// Which node self-rotation is applied to on a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpinTarget {
    /// The whole model turns about the body origin.
    #[default]
    Root,
    /// Each sub-mesh turns about its own centre.
    Children,
}

/// A loaded model: several sub-meshes sharing one transform.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelMesh {
    pub parts: Vec<SubMesh>,
    /// Uniform scale applied to the source geometry.
    pub scale: f32,
    pub spin_target: SpinTarget,
    /// Geometry the host loads for this model.
    pub mesh_url: String,
}

/// The render object owned by a celestial body.
#[derive(Debug, Clone, PartialEq)]
pub enum BodyVisual {
    Primitive(SphereMesh),
    Model(ModelMesh),
}

/// Access to every material of a visual.
pub trait HasMaterials {
    fn materials(&self) -> Vec<&Material>;
    fn materials_mut(&mut self) -> Vec<&mut Material>;
}

/// Access to the sub-meshes of a visual (picking, per-part spin).
pub trait HasChildren {
    fn children(&self) -> &[SubMesh];
    fn children_mut(&mut self) -> &mut [SubMesh];
}

impl HasMaterials for SphereMesh {
    fn materials(&self) -> Vec<&Material> {
        vec![&self.material]
    }

    fn materials_mut(&mut self) -> Vec<&mut Material> {
        vec![&mut self.material]
    }
}

impl HasMaterials for ModelMesh {
    fn materials(&self) -> Vec<&Material> {
        self.parts.iter().flat_map(|p| p.materials.as_slice()).collect()
    }

    fn materials_mut(&mut self) -> Vec<&mut Material> {
        self.parts
            .iter_mut()
            .flat_map(|p| p.materials.as_mut_slice().iter_mut())
            .collect()
    }
}

impl HasChildren for ModelMesh {
    fn children(&self) -> &[SubMesh] {
        &self.parts
    }

    fn children_mut(&mut self) -> &mut [SubMesh] {
        &mut self.parts
    }
}

impl HasMaterials for BodyVisual {
    fn materials(&self) -> Vec<&Material> {
        match self {
            BodyVisual::Primitive(sphere) => sphere.materials(),
            BodyVisual::Model(model) => model.materials(),
        }
    }

    fn materials_mut(&mut self) -> Vec<&mut Material> {
        match self {
            BodyVisual::Primitive(sphere) => sphere.materials_mut(),
            BodyVisual::Model(model) => model.materials_mut(),
        }
    }
}

impl HasChildren for BodyVisual {
    /// A primitive sphere has no sub-meshes.
    fn children(&self) -> &[SubMesh] {
        match self {
            BodyVisual::Primitive(_) => &[],
            BodyVisual::Model(model) => model.children(),
        }
    }

    fn children_mut(&mut self) -> &mut [SubMesh] {
        match self {
            BodyVisual::Primitive(_) => &mut [],
            BodyVisual::Model(model) => model.children_mut(),
        }
    }
}

impl BodyVisual {
    pub fn is_model(&self) -> bool {
        matches!(self, BodyVisual::Model(_))
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            BodyVisual::Primitive(_) => "sphere",
            BodyVisual::Model(_) => "model",
        }
    }
}
