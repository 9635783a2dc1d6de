//! Shared building blocks for the vigil crates: geometry, timestamp sources and lock aliases.

pub mod locks;
pub mod math;
pub mod random;

pub use math::{Aabb, Rotation};
