use wasm_bindgen::prelude::*;

mod bodies;
mod builder;
mod loader;
mod manifest;
mod system;
use system::SolarSystem;

orrery_web::export_scene!(SolarSystem, "solar-system");
