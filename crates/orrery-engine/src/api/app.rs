use glam::Vec2;
use serde::Serialize;

use crate::api::config::EngineConfig;
use crate::api::types::{BodyId, HostEvent};
use crate::assets::error::ManifestError;
use crate::assets::tracker::{
    AssetId, AssetKind, AssetOutcome, AssetPayload, AssetTracker, LoadGroup, SettledAsset,
};
use crate::assets::texture::TextureStore;
use crate::components::body::{BodyRole, CelestialBody};
use crate::components::mesh::{BodyVisual, HasChildren};
use crate::core::math::SurfaceRect;
use crate::core::rng::Rng;
use crate::core::scene::Scene;
use crate::input::queue::InputQueue;
use crate::renderer::camera::PerspectiveCamera;
use crate::renderer::controls::OrbitControls;
use crate::renderer::instance::FrameBuffers;
use crate::renderer::resources::ResourceTable;
use crate::systems::interaction::{InteractionResult, InteractionSystem};
use crate::systems::lighting::LightState;
use crate::systems::orbit::advance_bodies;
use crate::systems::popup::PopupState;
use crate::systems::render;
use crate::systems::shooting_stars::ShootingStarField;

/// The contract every visualisation fulfils.
pub trait Simulation {
    /// Return engine configuration. Called once, after any manifest override.
    fn config(&self) -> EngineConfig {
        EngineConfig::default()
    }

    /// Apply a host-supplied manifest before `build`. On error the built-in
    /// manifest stays in effect.
    fn load_manifest(&mut self, _json: &str) -> Result<(), ManifestError> {
        Ok(())
    }

    /// Construct the static scene and register asset requests.
    fn build(&mut self, ctx: &mut EngineContext);

    /// One asset request settled (loaded, failed or timed out).
    fn asset_settled(&mut self, ctx: &mut EngineContext, asset: SettledAsset);
}

/// Host-facing JSON view of one body.
#[derive(Debug, Serialize)]
struct BodyView<'a> {
    id: u32,
    name: &'a str,
    handle: u32,
    kind: &'static str,
    role: &'static str,
    parts: usize,
    mesh_url: Option<&'a str>,
}

/// Mutable access to engine state, passed to `Simulation` hooks.
pub struct EngineContext {
    pub config: EngineConfig,
    pub scene: Scene,
    pub camera: PerspectiveCamera,
    pub controls: OrbitControls,
    pub interaction: InteractionSystem,
    pub popup: PopupState,
    pub stars: ShootingStarField,
    pub lights: LightState,
    pub resources: ResourceTable,
    pub assets: AssetTracker,
    pub textures: TextureStore,
    pub rng: Rng,
    pub events: Vec<HostEvent>,
}

impl EngineContext {
    pub fn new(config: EngineConfig) -> Self {
        let mut rng = Rng::new(config.seed);
        let surface = SurfaceRect::new(0.0, 0.0, config.viewport_width, config.viewport_height);
        let mut camera = PerspectiveCamera::from_config(&config.camera, surface.aspect());
        let mut controls = OrbitControls::new(config.controls.clone(), &camera);
        controls.update(&mut camera);
        let stars = ShootingStarField::new(config.shooting_stars.clone(), &mut rng);
        Self {
            scene: Scene::new(),
            camera,
            controls,
            interaction: InteractionSystem::new(surface),
            popup: PopupState::new(config.popup_close_delay),
            stars,
            lights: LightState::with_capacity(config.max_lights),
            resources: ResourceTable::new(),
            assets: AssetTracker::new(config.asset_timeout_secs),
            textures: TextureStore::new(),
            rng,
            events: Vec::new(),
            config,
        }
    }

    /// Emit an event to be forwarded to the host.
    pub fn emit_event(&mut self, event: HostEvent) {
        self.events.push(event);
    }

    // -- Bodies --

    /// A new body with a fresh id and render handle. Not in the scene until `spawn`.
    pub fn new_body(&mut self, name: &str, visual: BodyVisual, role: BodyRole) -> CelestialBody {
        let id = self.scene.next_body_id();
        let handle = self.resources.allocate();
        CelestialBody::new(id, name, visual, role, handle)
    }

    pub fn spawn(&mut self, body: CelestialBody) -> BodyId {
        let id = body.id;
        log::info!("{} joined the scene as a {}", body.name, body.visual.kind_name());
        self.emit_event(HostEvent::new(
            HostEvent::BODY_SPAWNED,
            id.0 as f32,
            body.handle.0 as f32,
            0.0,
        ));
        self.scene.spawn(body);
        id
    }

    /// Remove a body and release its render handle.
    pub fn despawn(&mut self, id: BodyId) -> Option<CelestialBody> {
        let body = self.scene.despawn(id)?;
        self.resources.release(body.handle);
        if self.popup.body_id() == Some(id) && self.popup.request_close() {
            self.emit_event(HostEvent::new(HostEvent::POPUP_CLOSED, 0.0, 0.0, 0.0));
        }
        Some(body)
    }

    // -- Assets --

    pub fn request_texture(&mut self, group: LoadGroup, url: &str, purpose: &str) -> AssetId {
        self.assets.request(AssetKind::Texture, group, url, purpose)
    }

    pub fn request_model(&mut self, url: &str, purpose: &str) -> AssetId {
        self.assets.request(AssetKind::Model, LoadGroup::Model, url, purpose)
    }

    /// Move settled requests out of the tracker. Decoded textures go into the
    /// texture store (announced with `TEXTURE_READY`); failures are logged.
    pub fn settle_assets(&mut self) -> Vec<SettledAsset> {
        let mut settled = Vec::new();
        for (request, result) in self.assets.drain() {
            let outcome = match result {
                Ok(AssetPayload::Texture(texture)) => {
                    let id = request.id.texture_id();
                    self.emit_event(HostEvent::new(
                        HostEvent::TEXTURE_READY,
                        id.0 as f32,
                        texture.width as f32,
                        texture.height as f32,
                    ));
                    self.textures.insert(id, texture);
                    Ok(AssetOutcome::Texture(id))
                }
                Ok(AssetPayload::Model(descriptor)) => Ok(AssetOutcome::Model(descriptor)),
                Err(err) => {
                    log::warn!("{} ({}): {}", request.purpose, request.url, err);
                    Err(err)
                }
            };
            settled.push(SettledAsset { request, outcome });
        }
        settled
    }

    // -- Per-tick systems --

    /// Route pending input through interaction: picks open the popup,
    /// close requests start closing it.
    pub fn handle_input(&mut self, input: &InputQueue) {
        for event in input.iter() {
            let result = self.interaction.handle(
                event,
                &mut self.camera,
                &mut self.controls,
                &self.scene,
            );
            match result {
                InteractionResult::Picked { hit, client } => self.open_popup(hit.body, client),
                InteractionResult::CloseRequested => {
                    if self.popup.request_close() {
                        self.emit_event(HostEvent::new(HostEvent::POPUP_CLOSED, 0.0, 0.0, 0.0));
                    }
                }
                _ => {}
            }
        }
    }

    fn open_popup(&mut self, id: BodyId, client: Vec2) {
        let Some(body) = self.scene.get(id) else {
            return;
        };
        let anchor = client + Vec2::from_array(self.config.popup_offset);
        log::debug!("opening popup for {}", body.name);
        self.popup.open(id, &body.name, anchor);
        self.emit_event(HostEvent::new(HostEvent::POPUP_OPENED, id.0 as f32, anchor.x, anchor.y));
    }

    /// One animation step: orbits and spin, shooting stars, then the interface.
    pub fn step_frame(&mut self, dt: f32) {
        advance_bodies(self.scene.iter_mut(), self.popup.is_paused(), self.config.spin_policy);
        self.stars.tick(&mut self.rng, &mut self.resources);
        self.step_interface(dt);
    }

    /// Popup transition and camera damping. Runs every step whether or not
    /// the animation loop has started.
    pub fn step_interface(&mut self, dt: f32) {
        if self.popup.tick(dt) {
            self.emit_event(HostEvent::new(HostEvent::POPUP_CLOSED, 0.0, 0.0, 0.0));
        }
        self.controls.update(&mut self.camera);
    }

    /// Fill the frame buffers: the single render pass handed to the host.
    pub fn build_frame(&mut self, frame: &mut FrameBuffers) {
        frame.clear();
        render::build_frame(&self.scene, &self.stars, &self.camera, &self.lights, frame);
        for handle in self.resources.drain_released() {
            frame.push_released(handle);
        }
        for event in self.events.drain(..) {
            if !frame.push_event(event) {
                log::debug!("event capacity reached; dropping kind {}", event.kind);
            }
        }
    }

    pub fn bodies_json(&self) -> String {
        let views: Vec<BodyView> = self
            .scene
            .iter()
            .map(|body| {
                let (kind, parts, mesh_url) = match &body.visual {
                    BodyVisual::Primitive(_) => ("sphere", 1, None),
                    BodyVisual::Model(m) => ("model", m.children().len(), Some(m.mesh_url.as_str())),
                };
                BodyView {
                    id: body.id.0,
                    name: &body.name,
                    handle: body.handle.0,
                    kind,
                    role: match body.role {
                        BodyRole::PrimaryStar => "star",
                        BodyRole::Planet => "planet",
                    },
                    parts,
                    mesh_url,
                }
            })
            .collect();
        serde_json::to_string(&views).unwrap_or_else(|e| {
            log::error!("body descriptor serialization failed: {e}");
            String::from("[]")
        })
    }

    /// Release every render handle, drop bodies, textures and pending requests.
    /// Returns how many handles were released.
    pub fn teardown(&mut self) -> usize {
        let released = self.resources.live_count();
        self.stars.clear(&mut self.resources);
        self.resources.release_all();
        self.scene.clear();
        self.textures.clear();
        self.assets.clear();
        self.lights.clear();
        self.popup = PopupState::new(self.config.popup_close_delay);
        log::info!("scene torn down, {released} handles released");
        released
    }
}
