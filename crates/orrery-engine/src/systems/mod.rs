pub mod guides;
pub mod interaction;
pub mod lighting;
pub mod orbit;
pub mod picking;
pub mod popup;
pub mod render;
pub mod shooting_stars;
pub mod starfield;
