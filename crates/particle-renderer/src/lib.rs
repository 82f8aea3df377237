//! # Particle Renderer
//!
//! Turns a [`particle_field::ParticleField`] into pixels: theme palettes, a
//! backend-agnostic draw surface, tessellation and a wgpu backend.

pub mod backdrop;
pub mod color;
pub mod renderer;
pub mod surface;
pub mod tessellate;
pub mod theme;

pub use backdrop::*;
pub use color::*;
pub use renderer::*;
pub use surface::*;
pub use tessellate::*;
pub use theme::*;
