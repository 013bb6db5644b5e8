pub mod math;
pub mod rng;
pub mod scene;
pub mod time;
