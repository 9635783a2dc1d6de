//! Geometry used by the combat and movement checks.
//!
//! - [`Aabb`] - axis-aligned boxes with point distance and segment interception
//! - [`Rotation`] - yaw/pitch pairs and the look vectors derived from them

mod aabb;
mod rotation;

pub use aabb::Aabb;
pub use rotation::Rotation;

/// Rounds `value` to `precision` decimal places. Used when reporting flag parameters.
#[must_use]
pub fn round(value: f64, precision: i32) -> f64 {
    let scale = 10f64.powi(precision);
    (value * scale).round() / scale
}
