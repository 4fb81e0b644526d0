/// Defines the `BBox` axis-aligned bounding-box type and the `BOUND_HUGE` sentinel.
pub mod bbox;
pub mod camera;
pub mod ray;
pub mod transform;

pub use transform::{AffineTransform, Transform};
