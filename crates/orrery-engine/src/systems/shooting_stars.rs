//! Shooting stars: short-lived streaks spawned on a randomised interval
//! somewhere on a shell around the system, each dragging a two-point trail.

use std::f32::consts::TAU;

use glam::Vec3;

use crate::api::config::ShootingStarConfig;
use crate::api::types::ResourceHandle;
use crate::core::rng::Rng;
use crate::renderer::instance::{FrameBuffers, TrailVertex};
use crate::renderer::resources::ResourceTable;

#[derive(Debug, Clone, PartialEq)]
pub struct ShootingStar {
    pub position: Vec3,
    /// Unit vector.
    pub direction: Vec3,
    /// Frames survived so far.
    pub age: u32,
    /// Removed on the first step where `age` exceeds this.
    pub max_age: f32,
    pub trail: ResourceHandle,
}

impl ShootingStar {
    /// Head and tail of the trail segment.
    pub fn trail_points(&self, length: f32) -> [Vec3; 2] {
        [self.position, self.position - self.direction * length]
    }
}

/// Pool of live shooting stars plus the spawn timer.
pub struct ShootingStarField {
    stars: Vec<ShootingStar>,
    /// Units elapsed since the last spawn.
    timer: f32,
    /// Threshold the timer must exceed to spawn, drawn from `[interval_min, interval_max)`.
    interval: f32,
    config: ShootingStarConfig,
}

impl ShootingStarField {
    pub fn new(config: ShootingStarConfig, rng: &mut Rng) -> Self {
        let interval = rng.range(config.interval_min, config.interval_max);
        Self {
            stars: Vec::new(),
            timer: 0.0,
            interval,
            config,
        }
    }

    /// One animation step: advance the timer (spawning when due), then move,
    /// age and cull every star. Culled stars release their trail handle.
    pub fn tick(&mut self, rng: &mut Rng, resources: &mut ResourceTable) {
        self.timer += self.config.units_per_frame;
        if self.timer > self.interval {
            let count = rng.int_range(self.config.min_per_spawn, self.config.max_per_spawn + 1);
            for _ in 0..count {
                let star = self.spawn(rng, resources);
                self.stars.push(star);
            }
            self.timer = 0.0;
            self.interval = rng.range(self.config.interval_min, self.config.interval_max);
        }

        let step = self.config.step;
        for star in &mut self.stars {
            star.position += star.direction * step;
            star.age += 1;
        }
        self.stars.retain(|star| {
            if star.age as f32 > star.max_age {
                resources.release(star.trail);
                false
            } else {
                true
            }
        });
    }

    fn spawn(&self, rng: &mut Rng, resources: &mut ResourceTable) -> ShootingStar {
        let cfg = &self.config;
        let theta = rng.next_f32() * TAU;
        let radius = rng.range(cfg.shell_min, cfg.shell_max);
        let position = Vec3::new(
            radius * theta.cos(),
            rng.centered(cfg.height_spread),
            radius * theta.sin(),
        );
        let direction = Vec3::new(
            rng.centered(2.0),
            rng.centered(2.0) * cfg.vertical_bias,
            rng.centered(2.0),
        )
        .try_normalize()
        .unwrap_or(Vec3::X);
        ShootingStar {
            position,
            direction,
            age: 0,
            max_age: rng.range(cfg.max_age_min, cfg.max_age_max),
            trail: resources.allocate(),
        }
    }

    /// Write two trail vertices per star: bright head, transparent tail.
    pub fn write_trails(&self, frame: &mut FrameBuffers) {
        let length = self.config.trail_length;
        let opacity = self.config.trail_opacity;
        for star in &self.stars {
            let [head, tail] = star.trail_points(length);
            let wrote = frame.push_trail(TrailVertex { x: head.x, y: head.y, z: head.z, alpha: opacity })
                && frame.push_trail(TrailVertex { x: tail.x, y: tail.y, z: tail.z, alpha: 0.0 });
            if !wrote {
                break;
            }
        }
    }

    /// Drop every star, releasing its trail.
    pub fn clear(&mut self, resources: &mut ResourceTable) {
        for star in self.stars.drain(..) {
            resources.release(star.trail);
        }
        self.timer = 0.0;
    }

    pub fn stars(&self) -> &[ShootingStar] {
        &self.stars
    }

    pub fn len(&self) -> usize {
        self.stars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }

    pub fn interval(&self) -> f32 {
        self.interval
    }

    pub fn timer(&self) -> f32 {
        self.timer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(seed: u64) -> (ShootingStarField, Rng, ResourceTable) {
        let mut rng = Rng::new(seed);
        let field = ShootingStarField::new(ShootingStarConfig::default(), &mut rng);
        (field, rng, ResourceTable::new())
    }

    #[test]
    fn interval_always_in_range() {
        let (mut field, mut rng, mut res) = field(3);
        let mut last = field.interval();
        let mut redraws = 0;
        for _ in 0..20_000 {
            field.tick(&mut rng, &mut res);
            let interval = field.interval();
            assert!((600.0..1200.0).contains(&interval), "interval {interval}");
            if field.timer() == 0.0 {
                redraws += 1;
            }
            last = interval;
        }
        assert!(redraws > 100, "expected many spawns, got {redraws}");
        assert!((600.0..1200.0).contains(&last));
    }

    #[test]
    fn first_spawn_waits_for_threshold() {
        let (mut field, mut rng, mut res) = field(11);
        let frames_needed = (field.interval() / 16.0).floor() as u32 + 1;
        for _ in 0..frames_needed - 1 {
            field.tick(&mut rng, &mut res);
            assert!(field.is_empty());
        }
        field.tick(&mut rng, &mut res);
        assert!((1..=2).contains(&field.len()), "spawned {}", field.len());
    }

    #[test]
    fn stars_age_by_one_and_die_after_max_age() {
        let (mut field, mut rng, mut res) = field(5);
        while field.is_empty() {
            field.tick(&mut rng, &mut res);
        }
        let tracked = field.stars()[0].clone();
        assert_eq!(tracked.age, 1);
        assert!((60.0..90.0).contains(&tracked.max_age));
        let mut age = tracked.age;
        loop {
            field.tick(&mut rng, &mut res);
            match field.stars().iter().find(|s| s.trail == tracked.trail) {
                Some(star) => {
                    assert_eq!(star.age, age + 1);
                    assert!(star.age as f32 <= star.max_age);
                    let moved = star.position - tracked.position;
                    assert!((moved.length() - 18.0 * (star.age - 1) as f32).abs() < 1e-2);
                    age = star.age;
                }
                None => {
                    assert_eq!(age, tracked.max_age.floor() as u32, "removed on first frame with age > max_age");
                    break;
                }
            }
        }
        assert!(!res.is_live(tracked.trail));
        assert!(!res.release(tracked.trail), "trail released at most once");
    }

    #[test]
    fn interval_and_lifetime_are_drawn_continuously() {
        let mut fractional_intervals = 0;
        let mut fractional_ages = 0;
        for seed in 0..32 {
            let (mut field, mut rng, mut res) = field(seed);
            if field.interval().fract() != 0.0 {
                fractional_intervals += 1;
            }
            while field.is_empty() {
                field.tick(&mut rng, &mut res);
            }
            fractional_ages += field.stars().iter().filter(|s| s.max_age.fract() != 0.0).count();
        }
        assert!(fractional_intervals > 16, "only {fractional_intervals} fractional intervals");
        assert!(fractional_ages > 16, "only {fractional_ages} fractional lifetimes");
    }

    #[test]
    fn spawn_geometry_matches_config() {
        let (mut field, mut rng, mut res) = field(21);
        for _ in 0..5_000 {
            field.tick(&mut rng, &mut res);
            for star in field.stars() {
                assert!((star.direction.length() - 1.0).abs() < 1e-4);
                if star.age == 1 {
                    let origin = star.position - star.direction * 18.0;
                    assert!(origin.y >= -30.0 && origin.y < 30.0, "height {}", origin.y);
                    let planar = (origin.x * origin.x + origin.z * origin.z).sqrt();
                    assert!(planar >= 900.0 - 1e-2 && planar < 1300.0 + 1e-2, "radius {planar}");
                }
            }
        }
    }

    #[test]
    fn trails_are_two_vertices_per_star() {
        let (mut field, mut rng, mut res) = field(8);
        while field.is_empty() {
            field.tick(&mut rng, &mut res);
        }
        let mut frame = FrameBuffers::with_capacity(0, 64, 0, 0);
        field.write_trails(&mut frame);
        assert_eq!(frame.trails.len(), field.len() * 2);
        let head = frame.trails[0];
        let tail = frame.trails[1];
        let dist = Vec3::new(head.x - tail.x, head.y - tail.y, head.z - tail.z).length();
        assert!((dist - 60.0).abs() < 1e-3);
        assert_eq!(tail.alpha, 0.0);
    }

    #[test]
    fn clear_releases_every_trail() {
        let (mut field, mut rng, mut res) = field(2);
        while field.is_empty() {
            field.tick(&mut rng, &mut res);
        }
        field.clear(&mut res);
        assert!(field.is_empty());
        assert_eq!(res.live_count(), 0);
    }
}
