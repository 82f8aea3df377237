//! Particle field: owns the particles, advances them and finds connections
//!
//! The connection pass is a plain all-pairs scan. Particle counts are capped
//! by the device-class presets (at most 80), which keeps it well inside a
//! frame budget without a spatial index.

use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::particle::random_position;
use crate::{FieldConfig, FieldError, Particle, ResizePolicy, Tick};

/// Extent of the drawing surface, in the same units as particle positions
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// Inclusive on both edges
    pub fn contains(&self, point: Vec2) -> bool {
        (0.0..=self.width).contains(&point.x) && (0.0..=self.height).contains(&point.y)
    }

    pub fn max(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    fn validate(self) -> Result<Self, FieldError> {
        if self.is_valid() {
            Ok(self)
        } else {
            Err(FieldError::DegenerateBounds {
                width: self.width,
                height: self.height,
            })
        }
    }
}

/// A visible link between particles `a` and `b` (always `a < b`)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Connection {
    pub a: usize,
    pub b: usize,
    pub opacity: f32,
}

/// Line opacity for two particles `distance` apart.
///
/// Fades linearly from `max_opacity` at zero distance to nothing at
/// `threshold`; pairs at or beyond the threshold are not connected.
pub fn connection_opacity(distance: f32, threshold: f32, max_opacity: f32) -> Option<f32> {
    // Negated form so NaN distances are rejected too
    if !(distance < threshold) {
        return None;
    }
    let opacity = (1.0 - distance / threshold) * max_opacity;
    (opacity > 0.0).then_some(opacity)
}

pub struct ParticleField {
    particles: Vec<Particle>,
    bounds: Bounds,
    config: FieldConfig,
    // Only consulted by ResizePolicy::Reseed; frames never draw from it
    rng: StdRng,
}

impl ParticleField {
    /// Spawn `config.particle_count` particles inside `bounds`
    pub fn new(config: FieldConfig, bounds: Bounds) -> Result<Self, FieldError> {
        Self::with_rng(config, bounds, StdRng::from_rng(&mut rand::rng()))
    }

    /// Same as [`ParticleField::new`] with a reproducible generator
    pub fn with_seed(config: FieldConfig, bounds: Bounds, seed: u64) -> Result<Self, FieldError> {
        Self::with_rng(config, bounds, StdRng::seed_from_u64(seed))
    }

    pub fn with_rng(
        config: FieldConfig,
        bounds: Bounds,
        mut rng: StdRng,
    ) -> Result<Self, FieldError> {
        if config.particle_count == 0 {
            return Err(FieldError::EmptyField);
        }
        let bounds = bounds.validate()?;
        config.validate()?;

        let particles: Vec<Particle> = (0..config.particle_count)
            .map(|_| Particle::random(&mut rng, bounds, &config))
            .collect();

        log::info!(
            "✓ Initialized {} particles in {:.0}x{:.0} (connection distance {:.0}, connections {})",
            particles.len(),
            bounds.width,
            bounds.height,
            config.connection_distance,
            if config.draw_connections { "on" } else { "off" }
        );

        Ok(Self {
            particles,
            bounds,
            config,
            rng,
        })
    }

    /// Build a field from explicit particles; the count comes from `particles`.
    ///
    /// Particles may start outside `bounds` (they reflect back in), but
    /// their state must be finite and their radius positive.
    pub fn from_particles(
        mut config: FieldConfig,
        bounds: Bounds,
        particles: Vec<Particle>,
    ) -> Result<Self, FieldError> {
        if particles.is_empty() {
            return Err(FieldError::EmptyField);
        }
        let bounds = bounds.validate()?;
        config.validate()?;
        if let Some(index) = particles.iter().position(|p| !p.is_valid()) {
            return Err(FieldError::InvalidParticle { index });
        }
        config.particle_count = particles.len();

        Ok(Self {
            particles,
            bounds,
            config,
            rng: StdRng::seed_from_u64(0),
        })
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    /// Move every particle by its velocity, bouncing off the bounds
    pub fn advance_frame(&mut self) {
        let bounds = self.bounds;
        for particle in &mut self.particles {
            particle.step(bounds);
        }
    }

    pub fn connection_opacity_at(&self, distance: f32) -> Option<f32> {
        connection_opacity(
            distance,
            self.config.connection_distance,
            self.config.connection_opacity,
        )
    }

    /// Opacity of the line between particles `i` and `j`, if they are connected
    pub fn pair_opacity(&self, i: usize, j: usize) -> Option<f32> {
        if i == j {
            return None;
        }
        let a = self.particles.get(i)?;
        let b = self.particles.get(j)?;
        self.connection_opacity_at(a.position.distance(b.position))
    }

    /// Every connected unordered pair, in `(a, b)` order with `a < b`
    pub fn connections(&self) -> impl Iterator<Item = Connection> + '_ {
        let count = self.particles.len();
        (0..count).flat_map(move |a| {
            (a + 1..count).filter_map(move |b| {
                self.pair_opacity(a, b)
                    .map(|opacity| Connection { a, b, opacity })
            })
        })
    }

    /// Adopt new surface bounds, keeping the particle count.
    ///
    /// Invalid bounds (e.g. a minimized window) are rejected and the field is
    /// left untouched.
    pub fn resize(&mut self, bounds: Bounds) -> Result<(), FieldError> {
        let bounds = bounds.validate()?;
        self.bounds = bounds;

        let mut moved = 0;
        for particle in &mut self.particles {
            if bounds.contains(particle.position) {
                continue;
            }
            match self.config.resize_policy {
                ResizePolicy::Clamp => particle.clamp_into(bounds),
                ResizePolicy::Reseed => particle.position = random_position(&mut self.rng, bounds),
            }
            moved += 1;
        }

        log::debug!(
            "Field resized to {:.0}x{:.0} ({} particles relocated, {:?})",
            bounds.width,
            bounds.height,
            moved,
            self.config.resize_policy
        );
        Ok(())
    }
}

impl Tick for ParticleField {
    fn tick(&mut self) {
        self.advance_frame();
    }
}
