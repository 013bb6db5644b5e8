use orrery_engine::bridge::protocol::{
    HEADER_ADDITIVE_SPLIT, HEADER_AMBIENT_INTENSITY, HEADER_BODY_COUNT, HEADER_EVENT_COUNT,
    HEADER_FLOATS, HEADER_FRAME_COUNTER, HEADER_LIGHT_COUNT, HEADER_LOOP_STATE,
    HEADER_POPUP_OPEN, HEADER_RELEASED_COUNT, HEADER_TRAIL_VERTEX_COUNT,
};
use orrery_engine::{
    EngineConfig, EngineContext, FrameBuffers, FrameClock, HostEvent, InputEvent, InputQueue,
    ProtocolLayout, Simulation, TextureId,
};

use crate::loader::AssetFetcher;

/// Lifecycle of the animation loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Waiting for loop-gating assets. Frames are still built.
    Loading,
    Running,
    /// Torn down; ticks are no-ops.
    Stopped,
}

impl LoopState {
    pub fn wire(self) -> u32 {
        match self {
            LoopState::Loading => 0,
            LoopState::Running => 1,
            LoopState::Stopped => 2,
        }
    }
}

/// Generic runner that wires a `Simulation` to the engine loop.
///
/// Each concrete app creates a `thread_local!` SceneRunner and exports free
/// functions via `#[wasm_bindgen]`, because wasm-bindgen cannot export
/// generic structs directly.
pub struct SceneRunner<S: Simulation, F: AssetFetcher> {
    sim: S,
    fetcher: F,
    ctx: EngineContext,
    input: InputQueue,
    frame: FrameBuffers,
    clock: FrameClock,
    layout: ProtocolLayout,
    header: [f32; HEADER_FLOATS],
    state: LoopState,
    frame_counter: u32,
    initialized: bool,
}

impl<S: Simulation, F: AssetFetcher> SceneRunner<S, F> {
    /// Apply an optional manifest override, then size everything from the
    /// simulation's config. `seed` replaces the configured RNG seed.
    pub fn new(mut sim: S, fetcher: F, manifest: Option<&str>, seed: Option<u64>) -> Self {
        if let Some(json) = manifest {
            if let Err(e) = sim.load_manifest(json) {
                log::error!("manifest override rejected, keeping built-in manifest: {e}");
            }
        }
        let mut config: EngineConfig = sim.config();
        if let Some(seed) = seed {
            config.seed = seed;
        }
        let layout = ProtocolLayout::from_config(&config);
        let frame = FrameBuffers::with_capacity(
            config.max_body_instances,
            config.max_trail_vertices,
            config.max_events,
            config.max_lights,
        );
        let clock = FrameClock::new(config.fixed_dt);
        let header = layout.initial_header();

        Self {
            sim,
            fetcher,
            ctx: EngineContext::new(config),
            input: InputQueue::new(),
            frame,
            clock,
            layout,
            header,
            state: LoopState::Loading,
            frame_counter: 0,
            initialized: false,
        }
    }

    /// Build the scene and send the first asset requests. Call once after construction.
    pub fn init(&mut self) {
        if self.initialized {
            log::warn!("scene already initialised; ignoring");
            return;
        }
        self.sim.build(&mut self.ctx);
        self.dispatch();
        self.initialized = true;
        log::info!(
            "scene built: {} bodies, {} asset requests pending",
            self.ctx.scene.len(),
            self.ctx.assets.pending_count()
        );
    }

    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    fn dispatch(&mut self) {
        let requests = self.ctx.assets.take_dispatch();
        if !requests.is_empty() {
            self.fetcher.dispatch(requests);
        }
    }

    /// One host frame: settle assets, maybe start the loop, handle input,
    /// run the fixed steps, then build the frame. Steps advance the popup and
    /// camera in every state; bodies and shooting stars only move once running.
    pub fn tick(&mut self, dt: f32) {
        if !self.initialized || self.state == LoopState::Stopped {
            return;
        }

        for (id, result) in self.fetcher.poll() {
            self.ctx.assets.settle(id, result);
        }
        self.ctx.assets.tick(dt);
        for asset in self.ctx.settle_assets() {
            self.sim.asset_settled(&mut self.ctx, asset);
        }
        self.dispatch();

        if self.state == LoopState::Loading && self.ctx.assets.gating_settled() {
            self.state = LoopState::Running;
            self.clock.reset();
            let bodies = self.ctx.scene.len() as f32;
            self.ctx.emit_event(HostEvent::new(HostEvent::LOOP_STARTED, bodies, 0.0, 0.0));
            log::info!("all gating assets settled; animation loop started");
        }

        self.ctx.handle_input(&self.input);

        let running = self.state == LoopState::Running;
        for _ in 0..self.clock.accumulate(dt) {
            if running {
                self.ctx.step_frame(self.clock.dt());
            } else {
                self.ctx.step_interface(self.clock.dt());
            }
        }

        self.input.drain();
        self.publish();
    }

    fn publish(&mut self) {
        self.ctx.build_frame(&mut self.frame);
        self.frame_counter = self.frame_counter.wrapping_add(1);

        let h = &mut self.header;
        h[HEADER_FRAME_COUNTER] = self.frame_counter as f32;
        h[HEADER_BODY_COUNT] = self.frame.body_count() as f32;
        h[HEADER_ADDITIVE_SPLIT] = self.frame.additive_split as f32;
        h[HEADER_TRAIL_VERTEX_COUNT] = self.frame.trail_vertex_count() as f32;
        h[HEADER_EVENT_COUNT] = self.frame.events.len() as f32;
        h[HEADER_LIGHT_COUNT] = self.frame.lights.len() as f32;
        h[HEADER_LOOP_STATE] = self.state.wire() as f32;
        h[HEADER_POPUP_OPEN] = if self.ctx.popup.is_open() { 1.0 } else { 0.0 };
        h[HEADER_AMBIENT_INTENSITY] = self.ctx.lights.ambient_intensity();
        h[HEADER_RELEASED_COUNT] = self.frame.released.len() as f32;
    }

    /// Stop the loop and release every render resource. The final frame
    /// reports the released handles; later ticks do nothing.
    pub fn teardown(&mut self) {
        if self.state == LoopState::Stopped {
            return;
        }
        self.ctx.teardown();
        self.state = LoopState::Stopped;
        self.input.drain();
        self.publish();
    }

    pub fn loop_state(&self) -> LoopState {
        self.state
    }

    pub fn context(&self) -> &EngineContext {
        &self.ctx
    }

    pub fn simulation(&self) -> &S {
        &self.sim
    }

    // ---- Pointer accessors for SharedArrayBuffer reads ----

    pub fn header_ptr(&self) -> *const f32 {
        self.header.as_ptr()
    }

    pub fn camera_ptr(&self) -> *const f32 {
        self.frame.camera_ptr()
    }

    pub fn bodies_ptr(&self) -> *const f32 {
        self.frame.bodies_ptr()
    }

    pub fn body_count(&self) -> u32 {
        self.frame.body_count()
    }

    pub fn additive_split(&self) -> u32 {
        self.frame.additive_split
    }

    pub fn trails_ptr(&self) -> *const f32 {
        self.frame.trails_ptr()
    }

    pub fn trail_vertex_count(&self) -> u32 {
        self.frame.trail_vertex_count()
    }

    pub fn lights_ptr(&self) -> *const f32 {
        self.frame.lights_ptr()
    }

    pub fn light_count(&self) -> u32 {
        self.frame.lights.len() as u32
    }

    pub fn events_ptr(&self) -> *const f32 {
        self.frame.events_ptr()
    }

    pub fn event_count(&self) -> u32 {
        self.frame.events.len() as u32
    }

    pub fn released_ptr(&self) -> *const u32 {
        self.frame.released_ptr()
    }

    pub fn released_count(&self) -> u32 {
        self.frame.released.len() as u32
    }

    // ---- Static geometry, read once after init ----

    pub fn points_ptr(&self) -> *const f32 {
        self.ctx.scene.point_vertices().as_ptr() as *const f32
    }

    pub fn point_vertex_count(&self) -> u32 {
        self.ctx.scene.point_vertices().len() as u32
    }

    pub fn lines_ptr(&self) -> *const f32 {
        self.ctx.scene.line_vertices().as_ptr() as *const f32
    }

    pub fn line_vertex_count(&self) -> u32 {
        self.ctx.scene.line_vertices().len() as u32
    }

    // ---- Textures ----

    pub fn texture_ptr(&self, id: u32) -> *const u8 {
        self.ctx.textures.pixels_ptr(TextureId(id))
    }

    pub fn texture_len(&self, id: u32) -> u32 {
        self.ctx.textures.pixels_len(TextureId(id)) as u32
    }

    pub fn texture_width(&self, id: u32) -> u32 {
        self.ctx.textures.get(TextureId(id)).map_or(0, |t| t.width)
    }

    pub fn texture_height(&self, id: u32) -> u32 {
        self.ctx.textures.get(TextureId(id)).map_or(0, |t| t.height)
    }

    // ---- JSON descriptors ----

    pub fn popup_json(&self) -> String {
        self.ctx.popup.to_json()
    }

    pub fn scene_json(&self) -> String {
        self.ctx.scene.descriptor_json()
    }

    pub fn bodies_json(&self) -> String {
        self.ctx.bodies_json()
    }

    // ---- Capacity accessors (read by TypeScript via wasm_bindgen exports) ----

    pub fn max_body_instances(&self) -> u32 {
        self.layout.max_body_instances as u32
    }

    pub fn max_trail_vertices(&self) -> u32 {
        self.layout.max_trail_vertices as u32
    }

    pub fn max_events(&self) -> u32 {
        self.layout.max_events as u32
    }

    pub fn max_lights(&self) -> u32 {
        self.layout.max_lights as u32
    }

    pub fn buffer_total_floats(&self) -> u32 {
        self.layout.buffer_total_floats as u32
    }

    pub fn ambient(&self) -> [f32; 4] {
        let c = self.ctx.lights.ambient();
        [c.r, c.g, c.b, self.ctx.lights.ambient_intensity()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::Fetched;
    use orrery_engine::{
        AssetError, AssetOutcome, AssetPayload, AssetRequest, BodyRole, BodyVisual,
        DecodedTexture, LoadGroup, ManifestError, Material, SettledAsset, SphereMesh,
    };

    /// Fetcher that records requests and replies only when told to.
    #[derive(Default)]
    struct ScriptedFetcher {
        requests: Vec<AssetRequest>,
        replies: Vec<Fetched>,
    }

    impl ScriptedFetcher {
        fn reply_all_ok(&mut self) {
            for r in self.requests.drain(..) {
                let payload = AssetPayload::Texture(DecodedTexture::solid(1, 1, [255; 4]));
                self.replies.push((r.id, Ok(payload)));
            }
        }
    }

    impl AssetFetcher for ScriptedFetcher {
        fn dispatch(&mut self, requests: Vec<AssetRequest>) {
            self.requests.extend(requests);
        }

        fn poll(&mut self) -> Vec<Fetched> {
            std::mem::take(&mut self.replies)
        }
    }

    /// Requests one batch texture, and spawns a planet once it settles.
    #[derive(Default)]
    struct OnePlanet {
        seed_override: Option<u64>,
        settled: Vec<bool>,
    }

    impl Simulation for OnePlanet {
        fn load_manifest(&mut self, json: &str) -> Result<(), ManifestError> {
            let seed: u64 = json
                .trim()
                .parse()
                .map_err(|_| ManifestError::Invalid(format!("not a seed: {json}")))?;
            self.seed_override = Some(seed);
            Ok(())
        }

        fn build(&mut self, ctx: &mut EngineContext) {
            ctx.request_texture(LoadGroup::Batch, "earth.jpg", "texture:earth");
        }

        fn asset_settled(&mut self, ctx: &mut EngineContext, asset: SettledAsset) {
            let texture = match asset.outcome {
                Ok(AssetOutcome::Texture(id)) => Some(id),
                _ => None,
            };
            self.settled.push(texture.is_some());
            let body = ctx
                .new_body(
                    "earth",
                    BodyVisual::Primitive(SphereMesh::new(12.0, Material::textured(texture))),
                    BodyRole::Planet,
                )
                .with_orbit(120.0, 0.01, 0.0);
            ctx.spawn(body);
        }
    }

    /// Spawns the star straight away, then waits on a model that never arrives.
    struct StarAwaitingModel;

    impl Simulation for StarAwaitingModel {
        fn build(&mut self, ctx: &mut EngineContext) {
            let sun = ctx.new_body(
                "sun",
                BodyVisual::Primitive(SphereMesh::new(32.0, Material::default())),
                BodyRole::PrimaryStar,
            );
            ctx.spawn(sun);
            ctx.request_model("/sun.model.json", "model:sun");
        }

        fn asset_settled(&mut self, _ctx: &mut EngineContext, _asset: SettledAsset) {}
    }

    fn runner() -> SceneRunner<OnePlanet, ScriptedFetcher> {
        let mut runner = SceneRunner::new(OnePlanet::default(), ScriptedFetcher::default(), None, Some(7));
        runner.init();
        runner
    }

    fn event_kinds<S: Simulation, F: AssetFetcher>(r: &SceneRunner<S, F>) -> Vec<f32> {
        let floats = unsafe {
            std::slice::from_raw_parts(r.events_ptr(), r.event_count() as usize * HostEvent::FLOATS)
        };
        floats.chunks(HostEvent::FLOATS).map(|e| e[0]).collect()
    }

    #[test]
    fn loop_waits_for_gating_assets() {
        let mut r = runner();
        assert_eq!(r.fetcher.requests.len(), 1);
        r.tick(1.0 / 60.0);
        assert_eq!(r.loop_state(), LoopState::Loading);
        assert_eq!(r.body_count(), 0);

        r.fetcher.reply_all_ok();
        r.tick(1.0 / 60.0);
        assert_eq!(r.loop_state(), LoopState::Running);
        assert_eq!(r.body_count(), 1);
        let kinds = event_kinds(&r);
        assert!(kinds.contains(&HostEvent::TEXTURE_READY));
        assert!(kinds.contains(&HostEvent::LOOP_STARTED));
    }

    #[test]
    fn loop_starts_exactly_once() {
        let mut r = runner();
        r.fetcher.reply_all_ok();
        let mut starts = 0;
        for _ in 0..30 {
            r.tick(1.0 / 60.0);
            starts += event_kinds(&r).iter().filter(|k| **k == HostEvent::LOOP_STARTED).count();
        }
        assert_eq!(starts, 1);
        let angle = r.context().scene.find_by_name("earth").map(|b| b.angle).unwrap_or(0.0);
        assert!(angle > 0.0);
    }

    #[test]
    fn timeout_degrades_and_starts_loop() {
        let mut r = runner();
        for _ in 0..(16 * 60) {
            r.tick(1.0 / 60.0);
            if r.loop_state() == LoopState::Running {
                break;
            }
        }
        assert_eq!(r.loop_state(), LoopState::Running);
        assert_eq!(r.simulation().settled, vec![false]);

        // The real reply arrives late and is ignored.
        let late = AssetPayload::Texture(DecodedTexture::solid(1, 1, [0; 4]));
        let id = r.fetcher.requests[0].id;
        r.fetcher.replies.push((id, Ok(late)));
        r.tick(1.0 / 60.0);
        assert_eq!(r.simulation().settled.len(), 1);
        assert_eq!(r.context().scene.len(), 1);
    }

    #[test]
    fn failed_fetch_still_settles() {
        let mut r = runner();
        let id = r.fetcher.requests[0].id;
        r.fetcher.replies.push((id, Err(AssetError::Status { url: "earth.jpg".into(), status: 404 })));
        r.tick(1.0 / 60.0);
        assert_eq!(r.loop_state(), LoopState::Running);
        assert_eq!(r.simulation().settled, vec![false]);
    }

    #[test]
    fn header_reflects_frame() {
        let mut r = runner();
        r.fetcher.reply_all_ok();
        r.tick(1.0 / 60.0);
        let header = unsafe { std::slice::from_raw_parts(r.header_ptr(), HEADER_FLOATS) };
        assert_eq!(header[HEADER_FRAME_COUNTER], 1.0);
        assert_eq!(header[HEADER_BODY_COUNT], 1.0);
        assert_eq!(header[HEADER_LOOP_STATE], LoopState::Running.wire() as f32);
        assert_eq!(
            header[orrery_engine::bridge::protocol::HEADER_PROTOCOL_VERSION],
            orrery_engine::bridge::protocol::PROTOCOL_VERSION
        );
    }

    #[test]
    fn teardown_stops_and_reports_released_handles() {
        let mut r = runner();
        r.fetcher.reply_all_ok();
        r.tick(1.0 / 60.0);
        r.teardown();
        assert_eq!(r.loop_state(), LoopState::Stopped);
        assert_eq!(r.released_count(), 1);
        assert_eq!(r.body_count(), 0);
        let counter = unsafe { *r.header_ptr().add(HEADER_FRAME_COUNTER) };
        r.tick(1.0 / 60.0);
        assert_eq!(unsafe { *r.header_ptr().add(HEADER_FRAME_COUNTER) }, counter);
    }

    #[test]
    fn popup_closes_while_still_loading() {
        let mut r = SceneRunner::new(StarAwaitingModel, ScriptedFetcher::default(), None, Some(7));
        r.init();
        r.tick(1.0 / 60.0);
        r.push_input(InputEvent::PointerDown { x: 640.0, y: 360.0 });
        r.push_input(InputEvent::PointerUp { x: 640.0, y: 360.0 });
        r.tick(1.0 / 60.0);
        assert_eq!(r.loop_state(), LoopState::Loading);
        assert!(r.context().popup.is_open());

        r.push_input(InputEvent::ClosePopup);
        let mut closed_events = 0;
        for _ in 0..120 {
            r.tick(1.0 / 60.0);
            closed_events += event_kinds(&r).iter().filter(|k| **k == HostEvent::POPUP_CLOSED).count();
        }
        assert_eq!(r.loop_state(), LoopState::Loading);
        assert!(!r.context().popup.is_open());
        assert_eq!(r.context().popup.active_body(), None);
        assert_eq!(closed_events, 1);
        let header = unsafe { std::slice::from_raw_parts(r.header_ptr(), HEADER_FLOATS) };
        assert_eq!(header[HEADER_POPUP_OPEN], 0.0);
    }

    #[test]
    fn bad_manifest_is_rejected_without_panicking() {
        let r = SceneRunner::new(OnePlanet::default(), ScriptedFetcher::default(), Some("{"), None);
        assert_eq!(r.simulation().seed_override, None);
        let r = SceneRunner::new(OnePlanet::default(), ScriptedFetcher::default(), Some("99"), None);
        assert_eq!(r.simulation().seed_override, Some(99));
    }
}
