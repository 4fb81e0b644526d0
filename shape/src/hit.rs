use geometry::ray::Ray;
use math::hcm::{Point3, Vec3};
use std::fmt::{Display, Formatter, Result};

/// Intersections with a ray parameter at or below this are treated as self-intersections and
/// discarded.
pub const MIN_DEPTH: f64 = 1e-9;

/// Contains geometric information on a ray-surface intersection:
///  - `depth`: t-value of the ray at the intersection,
///  - `pos`: position of intersection,
///  - `normal`: unit normal vector of the surface, facing against the ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub depth: f64,
    pub pos: Point3,
    pub normal: Vec3,
}

impl Hit {
    pub fn new(depth: f64, pos: Point3, normal: Vec3) -> Hit {
        Hit { depth, pos, normal }
    }

    /// Builds the hit at parameter `t` of the ray, orienting `normal` against the ray direction.
    pub fn on_ray(r: &Ray, t: f64, normal: Vec3) -> Hit {
        Hit::new(t, r.position_at(t), normal.hat().facing(r.dir))
    }
}

/// Returns `Some(t)` if `t` is beyond the self-intersection threshold.
pub(crate) fn valid_depth(t: f64) -> Option<f64> {
    (t > MIN_DEPTH && t.is_finite()).then(|| t)
}

impl Display for Hit {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(
            f,
            "pos = {}, t = {:.3}, normal = {}",
            self.pos, self.depth, self.normal
        )
    }
}
