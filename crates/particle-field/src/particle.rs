//! Particle state and per-frame motion

use glam::Vec2;
use rand::Rng;

use crate::{Bounds, FieldConfig};

/// A point-mass drifting across the surface, drawn as a disc
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    /// Position in surface units
    pub position: Vec2,
    /// Displacement applied once per frame
    pub velocity: Vec2,
    /// Disc radius for rendering
    pub radius: f32,
}

impl Particle {
    pub fn new(position: Vec2, velocity: Vec2, radius: f32) -> Self {
        Self {
            position,
            velocity,
            radius,
        }
    }

    /// Sample a particle uniformly inside `bounds` using the spawn ranges of `config`
    pub fn random<R: Rng>(rng: &mut R, bounds: Bounds, config: &FieldConfig) -> Self {
        let velocity = Vec2::new(
            symmetric(rng, config.max_speed),
            symmetric(rng, config.max_speed),
        );
        let radius = if config.max_radius > config.min_radius {
            rng.random_range(config.min_radius..config.max_radius)
        } else {
            config.min_radius
        };

        Self::new(random_position(rng, bounds), velocity, radius)
    }

    /// Finite position and velocity with a positive, finite radius
    pub fn is_valid(&self) -> bool {
        self.position.is_finite()
            && self.velocity.is_finite()
            && self.radius.is_finite()
            && self.radius > 0.0
    }

    /// Advance one frame, reflecting off the edges of `bounds`.
    ///
    /// A coordinate that crosses an edge is pinned to it and the matching
    /// velocity component is flipped to point back inside.
    pub fn step(&mut self, bounds: Bounds) {
        self.position += self.velocity;
        reflect(&mut self.position.x, &mut self.velocity.x, bounds.width);
        reflect(&mut self.position.y, &mut self.velocity.y, bounds.height);
    }

    pub fn clamp_into(&mut self, bounds: Bounds) {
        self.position = self.position.clamp(Vec2::ZERO, bounds.max());
    }
}

pub(crate) fn random_position<R: Rng>(rng: &mut R, bounds: Bounds) -> Vec2 {
    Vec2::new(
        rng.random_range(0.0..bounds.width),
        rng.random_range(0.0..bounds.height),
    )
}

fn symmetric<R: Rng>(rng: &mut R, max: f32) -> f32 {
    if max > 0.0 {
        rng.random_range(-max..max)
    } else {
        0.0
    }
}

fn reflect(position: &mut f32, velocity: &mut f32, extent: f32) {
    if *position < 0.0 {
        *position = 0.0;
        *velocity = velocity.abs();
    } else if *position > extent {
        *position = extent;
        *velocity = -velocity.abs();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_step_moves_by_velocity() {
        let bounds = Bounds::new(100.0, 100.0);
        let mut p = Particle::new(Vec2::new(50.0, 50.0), Vec2::new(0.25, -0.125), 2.0);
        p.step(bounds);
        assert_eq!(p.position, Vec2::new(50.25, 49.875));
        assert_eq!(p.velocity, Vec2::new(0.25, -0.125));
    }

    #[test]
    fn test_reflect_off_left_edge() {
        let bounds = Bounds::new(100.0, 100.0);
        let mut p = Particle::new(Vec2::new(0.0, 40.0), Vec2::new(-0.3, 0.0), 1.0);
        p.step(bounds);
        assert_eq!(p.velocity.x, 0.3);
        assert!(p.position.x >= 0.0);
        assert_eq!(p.position.y, 40.0);
    }

    #[test]
    fn test_reflect_off_far_edges() {
        let bounds = Bounds::new(10.0, 20.0);
        let mut p = Particle::new(Vec2::new(9.9, 19.9), Vec2::new(0.2, 0.2), 1.0);
        p.step(bounds);
        assert_eq!(p.position, Vec2::new(10.0, 20.0));
        assert_eq!(p.velocity, Vec2::new(-0.2, -0.2));
    }

    #[test]
    fn test_outside_after_shrink_heads_back_in() {
        // Already outside and moving outward: must turn around, not oscillate
        let bounds = Bounds::new(50.0, 50.0);
        let mut p = Particle::new(Vec2::new(80.0, 10.0), Vec2::new(0.1, 0.0), 1.0);
        p.step(bounds);
        assert_eq!(p.position.x, 50.0);
        assert!(p.velocity.x < 0.0);
        p.step(bounds);
        assert!(p.position.x < 50.0);
    }

    #[test]
    fn test_random_respects_ranges() {
        let mut rng = StdRng::seed_from_u64(7);
        let bounds = Bounds::new(320.0, 240.0);
        let config = FieldConfig::default();

        for _ in 0..500 {
            let p = Particle::random(&mut rng, bounds, &config);
            assert!(bounds.contains(p.position));
            assert!(p.velocity.x >= -0.25 && p.velocity.x < 0.25);
            assert!(p.velocity.y >= -0.25 && p.velocity.y < 0.25);
            assert!(p.radius >= 1.0 && p.radius < 3.0);
        }
    }

    #[test]
    fn test_random_with_collapsed_ranges() {
        let mut rng = StdRng::seed_from_u64(1);
        let config = FieldConfig {
            max_speed: 0.0,
            min_radius: 2.0,
            max_radius: 2.0,
            ..FieldConfig::default()
        };
        let p = Particle::random(&mut rng, Bounds::new(10.0, 10.0), &config);
        assert_eq!(p.velocity, Vec2::ZERO);
        assert_eq!(p.radius, 2.0);
    }

    #[test]
    fn test_is_valid() {
        assert!(Particle::new(Vec2::new(1.0, 2.0), Vec2::new(0.1, -0.1), 1.5).is_valid());
        assert!(!Particle::new(Vec2::new(f32::NAN, 2.0), Vec2::ZERO, 1.0).is_valid());
        assert!(!Particle::new(Vec2::ZERO, Vec2::new(f32::INFINITY, 0.0), 1.0).is_valid());
        assert!(!Particle::new(Vec2::ZERO, Vec2::ZERO, 0.0).is_valid());
        assert!(!Particle::new(Vec2::ZERO, Vec2::ZERO, f32::NAN).is_valid());
    }
}
