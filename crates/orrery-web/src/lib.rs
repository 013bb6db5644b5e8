pub mod loader;
pub mod runner;

pub use loader::{AssetFetcher, BrowserFetcher};
pub use orrery_engine;
pub use runner::{LoopState, SceneRunner};

/// Seed for the scene RNG, taken from the browser clock.
pub fn clock_seed() -> u64 {
    js_sys::Date::now() as u64
}

/// Generate all `#[wasm_bindgen]` exports for a simulation.
///
/// Generates:
/// - `thread_local!` storage for the SceneRunner
/// - `with_runner()` helper function
/// - All wasm-bindgen exports (scene_init, scene_tick, input handlers, data accessors)
///
/// # Usage
///
/// ```ignore
/// use wasm_bindgen::prelude::*;
///
/// mod system;
/// use system::SolarSystem;
///
/// orrery_web::export_scene!(SolarSystem, "solar-system");
/// ```
///
/// # Arguments
///
/// - `$sim_type`: a type implementing `orrery_engine::Simulation` with a `new()` constructor
/// - `$scene_name`: a string literal used in log messages
#[macro_export]
macro_rules! export_scene {
    ($sim_type:ty, $scene_name:literal) => {
        use std::cell::RefCell;
        use $crate::orrery_engine::InputEvent;

        type Runner = $crate::SceneRunner<$sim_type, $crate::BrowserFetcher>;

        thread_local! {
            static RUNNER: RefCell<Option<Runner>> = RefCell::new(None);
        }

        fn with_runner<R>(f: impl FnOnce(&mut Runner) -> R) -> R {
            RUNNER.with(|cell| {
                let mut borrow = cell.borrow_mut();
                let runner = borrow.as_mut().expect("Scene not initialized. Call scene_init() first.");
                f(runner)
            })
        }

        /// Build the scene. `manifest_json` optionally overrides the built-in asset manifest.
        /// Calling it again tears the previous scene down first, so only one loop ever runs.
        #[wasm_bindgen]
        pub fn scene_init(manifest_json: Option<String>) {
            console_error_panic_hook::set_once();
            let _ = console_log::init_with_level(log::Level::Info);

            RUNNER.with(|cell| {
                if let Some(previous) = cell.borrow_mut().as_mut() {
                    log::warn!("{}: re-initialised; stopping previous loop", $scene_name);
                    previous.teardown();
                }
            });

            let sim = <$sim_type>::new();
            let runner = $crate::SceneRunner::new(
                sim,
                $crate::BrowserFetcher::new(),
                manifest_json.as_deref(),
                Some($crate::clock_seed()),
            );

            RUNNER.with(|cell| {
                *cell.borrow_mut() = Some(runner);
            });

            with_runner(|r| r.init());
            log::info!("{}: initialized", $scene_name);
        }

        #[wasm_bindgen]
        pub fn scene_tick(dt: f32) {
            with_runner(|r| r.tick(dt));
        }

        #[wasm_bindgen]
        pub fn scene_pointer_down(x: f32, y: f32) {
            with_runner(|r| r.push_input(InputEvent::PointerDown { x, y }));
        }

        #[wasm_bindgen]
        pub fn scene_pointer_move(x: f32, y: f32) {
            with_runner(|r| r.push_input(InputEvent::PointerMove { x, y }));
        }

        #[wasm_bindgen]
        pub fn scene_pointer_up(x: f32, y: f32) {
            with_runner(|r| r.push_input(InputEvent::PointerUp { x, y }));
        }

        #[wasm_bindgen]
        pub fn scene_wheel(delta: f32) {
            with_runner(|r| r.push_input(InputEvent::Wheel { delta }));
        }

        #[wasm_bindgen]
        pub fn scene_resize(left: f32, top: f32, width: f32, height: f32) {
            with_runner(|r| r.push_input(InputEvent::Resize { left, top, width, height }));
        }

        #[wasm_bindgen]
        pub fn scene_key_down(key_code: u32) {
            with_runner(|r| r.push_input(InputEvent::KeyDown { key_code }));
        }

        #[wasm_bindgen]
        pub fn scene_close_popup() {
            with_runner(|r| r.push_input(InputEvent::ClosePopup));
        }

        /// Stop the loop and release every render resource.
        #[wasm_bindgen]
        pub fn scene_destroy() {
            with_runner(|r| r.teardown());
            log::info!("{}: destroyed", $scene_name);
        }

        // ---- Per-frame data accessors ----

        #[wasm_bindgen]
        pub fn get_header_ptr() -> *const f32 {
            with_runner(|r| r.header_ptr())
        }

        #[wasm_bindgen]
        pub fn get_camera_ptr() -> *const f32 {
            with_runner(|r| r.camera_ptr())
        }

        #[wasm_bindgen]
        pub fn get_bodies_ptr() -> *const f32 {
            with_runner(|r| r.bodies_ptr())
        }

        #[wasm_bindgen]
        pub fn get_body_count() -> u32 {
            with_runner(|r| r.body_count())
        }

        #[wasm_bindgen]
        pub fn get_additive_split() -> u32 {
            with_runner(|r| r.additive_split())
        }

        #[wasm_bindgen]
        pub fn get_trails_ptr() -> *const f32 {
            with_runner(|r| r.trails_ptr())
        }

        #[wasm_bindgen]
        pub fn get_trail_vertex_count() -> u32 {
            with_runner(|r| r.trail_vertex_count())
        }

        #[wasm_bindgen]
        pub fn get_lights_ptr() -> *const f32 {
            with_runner(|r| r.lights_ptr())
        }

        #[wasm_bindgen]
        pub fn get_light_count() -> u32 {
            with_runner(|r| r.light_count())
        }

        #[wasm_bindgen]
        pub fn get_events_ptr() -> *const f32 {
            with_runner(|r| r.events_ptr())
        }

        #[wasm_bindgen]
        pub fn get_event_count() -> u32 {
            with_runner(|r| r.event_count())
        }

        #[wasm_bindgen]
        pub fn get_released_ptr() -> *const u32 {
            with_runner(|r| r.released_ptr())
        }

        #[wasm_bindgen]
        pub fn get_released_count() -> u32 {
            with_runner(|r| r.released_count())
        }

        #[wasm_bindgen]
        pub fn get_loop_state() -> u32 {
            with_runner(|r| r.loop_state().wire())
        }

        // ---- Static geometry ----

        #[wasm_bindgen]
        pub fn get_points_ptr() -> *const f32 {
            with_runner(|r| r.points_ptr())
        }

        #[wasm_bindgen]
        pub fn get_point_vertex_count() -> u32 {
            with_runner(|r| r.point_vertex_count())
        }

        #[wasm_bindgen]
        pub fn get_lines_ptr() -> *const f32 {
            with_runner(|r| r.lines_ptr())
        }

        #[wasm_bindgen]
        pub fn get_line_vertex_count() -> u32 {
            with_runner(|r| r.line_vertex_count())
        }

        // ---- Textures ----

        #[wasm_bindgen]
        pub fn get_texture_ptr(id: u32) -> *const u8 {
            with_runner(|r| r.texture_ptr(id))
        }

        #[wasm_bindgen]
        pub fn get_texture_len(id: u32) -> u32 {
            with_runner(|r| r.texture_len(id))
        }

        #[wasm_bindgen]
        pub fn get_texture_width(id: u32) -> u32 {
            with_runner(|r| r.texture_width(id))
        }

        #[wasm_bindgen]
        pub fn get_texture_height(id: u32) -> u32 {
            with_runner(|r| r.texture_height(id))
        }

        // ---- JSON descriptors ----

        #[wasm_bindgen]
        pub fn get_popup_json() -> String {
            with_runner(|r| r.popup_json())
        }

        #[wasm_bindgen]
        pub fn get_scene_json() -> String {
            with_runner(|r| r.scene_json())
        }

        #[wasm_bindgen]
        pub fn get_bodies_json() -> String {
            with_runner(|r| r.bodies_json())
        }

        // ---- Capacity accessors ----

        #[wasm_bindgen]
        pub fn get_max_body_instances() -> u32 {
            with_runner(|r| r.max_body_instances())
        }

        #[wasm_bindgen]
        pub fn get_max_trail_vertices() -> u32 {
            with_runner(|r| r.max_trail_vertices())
        }

        #[wasm_bindgen]
        pub fn get_max_events() -> u32 {
            with_runner(|r| r.max_events())
        }

        #[wasm_bindgen]
        pub fn get_max_lights() -> u32 {
            with_runner(|r| r.max_lights())
        }

        #[wasm_bindgen]
        pub fn get_buffer_total_floats() -> u32 {
            with_runner(|r| r.buffer_total_floats())
        }

        // ---- Lighting ----

        #[wasm_bindgen]
        pub fn get_ambient_r() -> f32 {
            with_runner(|r| r.ambient()[0])
        }

        #[wasm_bindgen]
        pub fn get_ambient_g() -> f32 {
            with_runner(|r| r.ambient()[1])
        }

        #[wasm_bindgen]
        pub fn get_ambient_b() -> f32 {
            with_runner(|r| r.ambient()[2])
        }

        #[wasm_bindgen]
        pub fn get_ambient_intensity() -> f32 {
            with_runner(|r| r.ambient()[3])
        }
    };
}
