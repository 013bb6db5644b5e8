use bytemuck::{Pod, Zeroable};

/// Unique identifier for a celestial body in the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyId(pub u32);

/// Identifies a decoded texture held in the texture store.
/// Shares its numeric value with the asset request that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(pub u32);

impl TextureId {
    /// Wire value: the id as f32, or -1.0 for "no texture".
    pub fn wire(texture: Option<TextureId>) -> f32 {
        texture.map(|t| t.0 as f32).unwrap_or(-1.0)
    }
}

/// Handle to a render resource owned by the host (body mesh, trail line).
/// Allocated and released through `ResourceTable`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceHandle(pub u32);

/// An event communicated from Rust to TypeScript through the shared buffer.
/// Generic container: `kind` identifies the event, `a/b/c` carry payload.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct HostEvent {
    pub kind: f32,
    pub a: f32,
    pub b: f32,
    pub c: f32,
}

impl HostEvent {
    pub const FLOATS: usize = 4;

    /// Every loop-gating asset request settled; the animation loop is running.
    /// `a` = number of bodies in the scene.
    pub const LOOP_STARTED: f32 = 1.0;
    /// A texture finished decoding. `a` = texture id, `b` = width, `c` = height.
    pub const TEXTURE_READY: f32 = 2.0;
    /// The popup opened. `a` = body id, `b/c` = anchor position.
    pub const POPUP_OPENED: f32 = 3.0;
    /// The popup finished closing.
    pub const POPUP_CLOSED: f32 = 4.0;
    /// A body joined the scene. `a` = body id, `b` = resource handle.
    pub const BODY_SPAWNED: f32 = 5.0;

    pub fn new(kind: f32, a: f32, b: f32, c: f32) -> Self {
        Self { kind, a, b, c }
    }
}
