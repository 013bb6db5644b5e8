pub mod api;
pub mod core;
pub mod components;
pub mod systems;
pub mod renderer;
pub mod bridge;
pub mod input;
pub mod assets;

// Re-export key types at crate root for convenience
pub use api::app::{Simulation, EngineContext};
pub use api::config::{
    EngineConfig, SpinPolicy, CameraConfig, ControlsConfig, ShootingStarConfig, StarfieldConfig,
};
pub use api::types::{BodyId, TextureId, ResourceHandle, HostEvent};
pub use assets::error::{AssetError, DecodeError, ManifestError};
pub use assets::model::{ModelDescriptor, FallbackTexture};
pub use assets::texture::{DecodedTexture, TextureStore};
pub use assets::tracker::{
    AssetId, AssetKind, AssetOutcome, AssetPayload, AssetRequest, AssetTracker, LoadGroup,
    SettledAsset,
};
pub use components::body::{Attachment, BodyRole, CelestialBody};
pub use components::mesh::{
    BodyVisual, Color, HasChildren, HasMaterials, Material, MaterialSlot, ModelMesh, SphereMesh,
    SpinTarget, SubMesh,
};
pub use components::node::{PointStyle, SceneNode};
pub use core::math::{Ray, SurfaceRect};
pub use core::rng::Rng;
pub use core::scene::Scene;
pub use core::time::FrameClock;
pub use renderer::camera::{CameraUniform, PerspectiveCamera};
pub use renderer::controls::OrbitControls;
pub use renderer::instance::{BodyInstance, FrameBuffers, LineVertex, PointVertex, TrailVertex};
pub use renderer::resources::ResourceTable;
pub use input::queue::{InputEvent, InputQueue};
pub use bridge::protocol::ProtocolLayout;
pub use systems::lighting::{LightState, PointLight};
pub use systems::popup::PopupState;
pub use systems::shooting_stars::{ShootingStar, ShootingStarField};
