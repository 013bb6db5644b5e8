use std::collections::BTreeMap;
use std::f32::consts::TAU;

use orrery_engine::assets::model::{apply_fallback, normalise};
use orrery_engine::{
    AssetError, AssetOutcome, Attachment, BodyRole, BodyVisual, CelestialBody, Color, EngineConfig,
    EngineContext, LoadGroup, ManifestError, Material, ModelDescriptor, SettledAsset, Simulation,
    SphereMesh, SpinTarget, TextureId,
};

use crate::bodies::{
    FALLBACK_STAR_COLOR, PLANET_GLOW_SCALE, PLANET_ROTATION_MIN, PLANET_ROTATION_SPREAD,
    RING_OPACITY, RING_TILT, STAR_GLOW_COLOR, STAR_GLOW_SIZE, STAR_ROTATION,
};
use crate::builder::build_static;
use crate::loader::Purpose;
use crate::manifest::{BodyEntry, SystemManifest};

/// The portfolio solar system.
///
/// Primitive bodies are spawned together once their texture batch has
/// settled, so they appear in one frame. Model bodies appear as soon as their
/// own descriptor settles. Decorations (ring, background, fallback maps) are
/// patched in whenever they arrive.
pub struct SolarSystem {
    manifest: SystemManifest,
    /// Batch results by body name. `None` means the texture failed.
    textures: BTreeMap<String, Option<TextureId>>,
    glow: Option<TextureId>,
    ring: Option<TextureId>,
    fallbacks: BTreeMap<String, TextureId>,
    batch_pending: usize,
    batch_built: bool,
}

impl SolarSystem {
    pub fn new() -> Self {
        Self::with_manifest(SystemManifest::default())
    }

    pub fn with_manifest(manifest: SystemManifest) -> Self {
        Self {
            manifest,
            textures: BTreeMap::new(),
            glow: None,
            ring: None,
            fallbacks: BTreeMap::new(),
            batch_pending: 0,
            batch_built: false,
        }
    }

    fn batch_item_settled(&mut self, ctx: &mut EngineContext) {
        self.batch_pending = self.batch_pending.saturating_sub(1);
        self.maybe_finish_batch(ctx);
    }

    fn maybe_finish_batch(&mut self, ctx: &mut EngineContext) {
        if self.batch_built || self.batch_pending > 0 {
            return;
        }
        self.batch_built = true;
        for entry in self.manifest.bodies.iter().filter(|b| b.model.is_none()) {
            let texture = self.textures.get(&entry.name).copied().flatten();
            let visual = BodyVisual::Primitive(SphereMesh::new(entry.size, Material::textured(texture)));
            self.spawn_entry(ctx, entry, visual);
        }
        log::info!("texture batch settled; primitive bodies spawned");
        self.refresh_glows(ctx);
        self.attach_ring(ctx);
    }

    fn spawn_entry(&self, ctx: &mut EngineContext, entry: &BodyEntry, visual: BodyVisual) {
        let role = if entry.is_star() { BodyRole::PrimaryStar } else { BodyRole::Planet };
        let body = ctx.new_body(&entry.name, visual, role);
        let body = self.place(ctx, body, entry);
        ctx.spawn(body);
    }

    /// Orbit, spin, tilt and halo for a fresh body.
    fn place(&self, ctx: &mut EngineContext, body: CelestialBody, entry: &BodyEntry) -> CelestialBody {
        if entry.is_star() {
            return body
                .with_orbit(entry.orbit_radius, entry.speed, 0.0)
                .with_rotation(STAR_ROTATION)
                .with_tilt(entry.tilt())
                .with_attachment(Attachment::Glow {
                    color: Color::from_hex(STAR_GLOW_COLOR),
                    size: STAR_GLOW_SIZE,
                    texture: self.glow,
                });
        }
        let rate = PLANET_ROTATION_MIN + ctx.rng.next_f32() * PLANET_ROTATION_SPREAD;
        let angle = ctx.rng.next_f32() * TAU;
        let body = body
            .with_orbit(entry.orbit_radius, entry.speed, angle)
            .with_rotation(rate)
            .with_tilt(entry.tilt());
        // Only spheres get a halo.
        if body.visual.is_model() {
            return body;
        }
        body.with_attachment(Attachment::Glow {
            color: Color::WHITE,
            size: entry.size * PLANET_GLOW_SCALE,
            texture: self.glow,
        })
    }

    /// Give glows spawned before the sprite resolved their texture.
    fn refresh_glows(&self, ctx: &mut EngineContext) {
        let Some(sprite) = self.glow else {
            return;
        };
        for body in ctx.scene.iter_mut() {
            for attachment in &mut body.attachments {
                if let Attachment::Glow { texture: slot @ None, .. } = attachment {
                    *slot = Some(sprite);
                }
            }
        }
    }

    /// The ring needs both its texture and its body; whichever comes last attaches it.
    fn attach_ring(&self, ctx: &mut EngineContext) {
        let Some(texture) = self.ring else {
            return;
        };
        for entry in self.manifest.bodies.iter().filter(|b| b.ring) {
            let Some(body) = ctx.scene.find_by_name_mut(&entry.name) else {
                continue;
            };
            if body.has_ring() {
                continue;
            }
            let (inner, outer) = entry.ring_radii();
            body.attach(Attachment::Ring {
                inner,
                outer,
                tilt: RING_TILT,
                texture,
                opacity: RING_OPACITY,
            });
            log::debug!("ring attached to {}", entry.name);
        }
    }

    fn spawn_model(&self, ctx: &mut EngineContext, name: &str, descriptor: &ModelDescriptor) {
        let Some(entry) = self.manifest.body(name) else {
            log::warn!("model for unknown body {name}");
            return;
        };
        let Some(model) = &entry.model else {
            return;
        };
        if ctx.scene.find_by_name(name).is_some() {
            return;
        }
        let spin_target = if model.spin_children { SpinTarget::Children } else { SpinTarget::Root };
        let mesh = normalise(
            descriptor,
            model.scale,
            self.fallbacks.get(name).copied(),
            model.fallback_policy,
            spin_target,
        );
        self.spawn_entry(ctx, entry, BodyVisual::Model(mesh));
        self.refresh_glows(ctx);
        self.attach_ring(ctx);
    }

    /// A missing star is replaced by a plain gold sphere; a missing planet is left out.
    fn model_failed(&self, ctx: &mut EngineContext, name: &str, err: &AssetError) {
        let Some(entry) = self.manifest.body(name) else {
            return;
        };
        if !entry.is_star() {
            log::warn!("{name} omitted: {err}");
            return;
        }
        log::warn!("{name} model unavailable, using a plain sphere: {err}");
        let material = Material::colored(Color::from_hex(FALLBACK_STAR_COLOR)).with_emissive(1.0);
        self.spawn_entry(ctx, entry, BodyVisual::Primitive(SphereMesh::new(entry.size, material)));
        self.attach_ring(ctx);
    }

    /// A fallback map that arrived after its model.
    fn apply_late_fallback(&self, ctx: &mut EngineContext, name: &str, texture: TextureId) {
        let Some(policy) = self
            .manifest
            .body(name)
            .and_then(|b| b.model.as_ref())
            .map(|m| m.fallback_policy)
        else {
            return;
        };
        if let Some(body) = ctx.scene.find_by_name_mut(name) {
            if let BodyVisual::Model(mesh) = &mut body.visual {
                let changed = apply_fallback(mesh, texture, policy);
                log::debug!("fallback map applied to {changed} materials of {name}");
            }
        }
    }
}

impl Default for SolarSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Simulation for SolarSystem {
    fn config(&self) -> EngineConfig {
        self.manifest.engine_config()
    }

    fn load_manifest(&mut self, json: &str) -> Result<(), ManifestError> {
        self.manifest = SystemManifest::from_json(json)?;
        log::info!("manifest override with {} bodies", self.manifest.bodies.len());
        Ok(())
    }

    fn build(&mut self, ctx: &mut EngineContext) {
        build_static(ctx, &self.manifest);

        for entry in &self.manifest.bodies {
            if let Some(model) = &entry.model {
                ctx.request_model(&model.url, &Purpose::Model(entry.name.clone()).tag());
                if let Some(url) = &model.fallback_texture {
                    ctx.request_texture(
                        LoadGroup::Decoration,
                        url,
                        &Purpose::Fallback(entry.name.clone()).tag(),
                    );
                }
            } else if let Some(url) = &entry.texture {
                ctx.request_texture(LoadGroup::Batch, url, &Purpose::BodyTexture(entry.name.clone()).tag());
                self.batch_pending += 1;
            }
        }
        if let Some(url) = &self.manifest.glow_sprite {
            ctx.request_texture(LoadGroup::Batch, url, &Purpose::Glow.tag());
            self.batch_pending += 1;
        }
        if self.manifest.wants_ring() {
            if let Some(url) = &self.manifest.ring_texture {
                ctx.request_texture(LoadGroup::Decoration, url, &Purpose::Ring.tag());
            }
        }
        log::info!(
            "solar system built: {} bodies, {} batch textures",
            self.manifest.bodies.len(),
            self.batch_pending
        );
        self.maybe_finish_batch(ctx);
    }

    fn asset_settled(&mut self, ctx: &mut EngineContext, asset: SettledAsset) {
        let Some(purpose) = Purpose::parse(&asset.request.purpose) else {
            log::warn!("unrouted asset {}", asset.request.purpose);
            return;
        };
        let texture = match &asset.outcome {
            Ok(AssetOutcome::Texture(id)) => Some(*id),
            _ => None,
        };
        match purpose {
            Purpose::BodyTexture(name) => {
                self.textures.insert(name, texture);
                self.batch_item_settled(ctx);
            }
            Purpose::Glow => {
                self.glow = texture;
                self.batch_item_settled(ctx);
            }
            Purpose::Ring => {
                self.ring = texture;
                self.attach_ring(ctx);
            }
            Purpose::Background => {
                if let Some(id) = texture {
                    ctx.scene.set_background_texture(id);
                }
            }
            Purpose::Fallback(name) => {
                if let Some(id) = texture {
                    self.fallbacks.insert(name.clone(), id);
                    self.apply_late_fallback(ctx, &name, id);
                }
            }
            Purpose::Model(name) => match asset.outcome {
                Ok(AssetOutcome::Model(descriptor)) => self.spawn_model(ctx, &name, &descriptor),
                Ok(AssetOutcome::Texture(_)) => log::warn!("{name}: expected a model, got a texture"),
                Err(err) => self.model_failed(ctx, &name, &err),
            },
        }
    }
}
