pub mod error;
pub mod model;
pub mod texture;
pub mod tracker;
