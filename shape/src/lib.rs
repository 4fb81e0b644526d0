mod hit;
mod simple;

use geometry::bbox::BBox;
use geometry::ray::Ray;
use math::hcm::Point3;

pub use hit::{Hit, MIN_DEPTH};
pub use simple::*;

/// Represents the characteristics of a shape: has a bounding box, can interact with a ray, and can
/// tell whether a point lies inside of it.
/// - See `simple.rs` for the basic shape implementations: `Sphere`, `Cuboid`, and `Plane`.
pub trait Shape: Send + Sync {
    fn summary(&self) -> String;
    fn bbox(&self) -> BBox;
    /// Returns the nearest intersection with a ray parameter greater than `MIN_DEPTH`.
    fn intersect(&self, r: &Ray) -> Option<Hit>;
    fn inside(&self, p: Point3) -> bool;
    /// Shapes that extend to infinity are never pruned by bounding boxes.
    fn is_infinite(&self) -> bool {
        false
    }
}
