//! # Particle Field
//!
//! CPU simulation of the ambient background: a fixed set of drifting
//! particles that bounce off the surface edges, plus the pairwise
//! connection pass that links nearby particles.

pub mod config;
pub mod error;
pub mod field;
pub mod particle;
pub mod schedule;

pub use config::*;
pub use error::*;
pub use field::*;
pub use particle::*;
pub use schedule::*;
