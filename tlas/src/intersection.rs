use std::fmt::{Display, Formatter, Result};

use geometry::bbox::BOUND_HUGE;
use math::hcm::{Point3, Vec3};

use crate::bvh::ObjectRef;

/// Result record of a nearest-hit query. `object` is `None` until a leaf test succeeds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    pub depth: f64,
    pub point: Point3,
    pub normal: Vec3,
    pub object: Option<ObjectRef>,
}

impl Intersection {
    /// A record that any real hit is nearer than.
    pub fn none() -> Self {
        Intersection {
            depth: BOUND_HUGE,
            point: Point3::ORIGIN,
            normal: Vec3::ZERO,
            object: None,
        }
    }

    pub fn new(depth: f64, point: Point3, normal: Vec3) -> Self {
        Intersection {
            depth,
            point,
            normal,
            object: None,
        }
    }

    pub fn is_hit(&self) -> bool {
        self.object.is_some()
    }

    /// Returns the record if it hits something strictly closer than `max_depth`.
    pub fn within(self, max_depth: f64) -> Option<Self> {
        if self.is_hit() && self.depth < max_depth {
            Some(self)
        } else {
            None
        }
    }
}

impl Default for Intersection {
    fn default() -> Self {
        Self::none()
    }
}

impl Display for Intersection {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self.object {
            Some(object) => write!(
                f,
                "hit #{} at depth {:.4}, point = {}, normal = {}",
                object.0, self.depth, self.point, self.normal
            ),
            None => write!(f, "no hit"),
        }
    }
}
