//! Fundamental geometry types and angle helpers.

mod angle;
mod point;

pub use angle::{angle_within, lerp_angle, normalize_angle};
pub use point::Point2;
