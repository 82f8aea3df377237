//! Field parameters and device-class presets

use crate::FieldError;

/// Viewports narrower than this (in logical pixels) are treated as constrained
pub const CONSTRAINED_VIEWPORT_WIDTH: f32 = 768.0;

/// Coarse capability class of the host viewport
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DeviceClass {
    /// Small or low-power viewport: fewer particles, no connection pass
    Constrained,
    /// Desktop-class viewport
    #[default]
    Full,
}

impl DeviceClass {
    pub fn from_viewport_width(width: f32) -> Self {
        if width < CONSTRAINED_VIEWPORT_WIDTH {
            DeviceClass::Constrained
        } else {
            DeviceClass::Full
        }
    }

    /// Whether the O(n²) connection pass is affordable
    pub fn draws_connections(self) -> bool {
        matches!(self, DeviceClass::Full)
    }
}

/// What happens to particles left outside the surface after a resize
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ResizePolicy {
    /// Pull stragglers onto the nearest edge
    #[default]
    Clamp,
    /// Re-sample stragglers uniformly inside the new bounds
    Reseed,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldConfig {
    /// Number of particles, fixed for the lifetime of the field
    pub particle_count: usize,
    /// Pairs closer than this are connected
    pub connection_distance: f32,
    /// Gate for the connection pass at render time
    pub draw_connections: bool,

    // Spawn ranges
    // Velocity components are sampled from [-max_speed, max_speed)
    pub max_speed: f32,
    pub min_radius: f32,
    pub max_radius: f32,

    // Appearance
    // Line alpha at distance zero; fades linearly to 0 at connection_distance
    pub connection_opacity: f32,
    pub particle_opacity: f32,

    pub resize_policy: ResizePolicy,
}

impl FieldConfig {
    pub fn for_device_class(class: DeviceClass) -> Self {
        let (particle_count, connection_distance) = match class {
            DeviceClass::Constrained => (30, 100.0),
            DeviceClass::Full => (80, 150.0),
        };

        Self {
            particle_count,
            connection_distance,
            draw_connections: class.draws_connections(),
            max_speed: 0.25,
            min_radius: 1.0,
            max_radius: 3.0,
            connection_opacity: 0.15,
            particle_opacity: 0.3,
            resize_policy: ResizePolicy::Clamp,
        }
    }

    pub fn with_particle_count(mut self, particle_count: usize) -> Self {
        self.particle_count = particle_count;
        self
    }

    pub fn with_connection_distance(mut self, connection_distance: f32) -> Self {
        self.connection_distance = connection_distance;
        self
    }

    pub fn with_resize_policy(mut self, resize_policy: ResizePolicy) -> Self {
        self.resize_policy = resize_policy;
        self
    }

    /// Check the spawn ranges before any particle is sampled from them.
    ///
    /// `max_speed` may be zero (a still field); radii must be positive and
    /// `max_radius` may not fall below `min_radius`.
    pub fn validate(&self) -> Result<(), FieldError> {
        let invalid = |name, value| Err(FieldError::InvalidSpawnRange { name, value });

        if !(self.max_speed.is_finite() && self.max_speed >= 0.0) {
            return invalid("max_speed", self.max_speed);
        }
        if !(self.min_radius.is_finite() && self.min_radius > 0.0) {
            return invalid("min_radius", self.min_radius);
        }
        if !(self.max_radius.is_finite() && self.max_radius >= self.min_radius) {
            return invalid("max_radius", self.max_radius);
        }
        Ok(())
    }
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self::for_device_class(DeviceClass::Full)
    }
}
