use std::fmt::{Display, Formatter, Result};

use math::hcm::{Point3, Vec3};

/// Sentinel extent of an unbounded object. Box coordinates are kept within `±BOUND_HUGE / 2`, so
/// that adding or comparing two such coordinates never overflows to infinity.
pub const BOUND_HUGE: f64 = 2.0e10;

const HALF_BOUND_HUGE: f64 = BOUND_HUGE * 0.5;

/// 3D axis-aligned bounding box, stored as the lower-left corner plus a non-negative length on
/// each axis. Boundary checks are closed (`[min, max]`) on all axes.
/// - Build one from 2 corners with `from_min_max()`;
/// - Expand it by `union()` or `union_point()`; the empty box is the identity of `union()`;
/// - Check if it `contains()` a point or `encloses()` another box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BBox {
    lower_left: Point3,
    lengths: Vec3,
}

impl BBox {
    /// The empty box: lengths are negative on all axes, and it absorbs into any other box.
    pub fn empty() -> BBox {
        BBox {
            lower_left: Point3::new(HALF_BOUND_HUGE, HALF_BOUND_HUGE, HALF_BOUND_HUGE),
            lengths: Vec3::splat(-BOUND_HUGE),
        }
    }

    /// The box of an unbounded object.
    pub fn infinite() -> BBox {
        let corner = -HALF_BOUND_HUGE;
        BBox {
            lower_left: Point3::new(corner, corner, corner),
            lengths: Vec3::splat(BOUND_HUGE),
        }
    }

    /// Builds the box spanning `[min, max]`, clamped to `±BOUND_HUGE / 2` on every axis. No
    /// reordering happens: a `max` below `min` on some axis yields an inverted (empty) box.
    pub fn from_min_max(min: Point3, max: Point3) -> BBox {
        let mut lower_left = min;
        let mut lengths = Vec3::ZERO;
        for axis in 0..3 {
            let lo = min[axis].max(-HALF_BOUND_HUGE);
            let hi = max[axis].min(HALF_BOUND_HUGE);
            lower_left[axis] = lo;
            lengths[axis] = hi - lo;
        }
        BBox {
            lower_left,
            lengths,
        }
    }

    /// Builds the smallest box containing both points, regardless of their order.
    pub fn from_corners(p0: Point3, p1: Point3) -> BBox {
        BBox::empty().union_point(p0).union_point(p1)
    }

    pub fn lower_left(&self) -> Point3 {
        self.lower_left
    }
    pub fn lengths(&self) -> Vec3 {
        self.lengths
    }
    pub fn min(&self) -> Point3 {
        self.lower_left
    }
    pub fn max(&self) -> Point3 {
        self.lower_left + self.lengths
    }
    pub fn center(&self) -> Point3 {
        self.lower_left + self.lengths * 0.5
    }

    /// A box is empty if it is inverted on any axis, or if it has no extent on all three axes.
    pub fn is_empty(&self) -> bool {
        let Vec3 { x, y, z } = self.lengths;
        x < 0.0 || y < 0.0 || z < 0.0 || (x <= 0.0 && y <= 0.0 && z <= 0.0)
    }

    /// Returns true if the box reaches the clamped sentinel extent on some axis.
    pub fn is_unbounded(&self) -> bool {
        (0..3).any(|axis| {
            self.lower_left[axis] <= -HALF_BOUND_HUGE || self.max()[axis] >= HALF_BOUND_HUGE
        })
    }

    /// Computes the smallest box that contains both `self` and `other`. An empty box on either
    /// side returns the other box unchanged.
    pub fn union(self, other: BBox) -> BBox {
        if self.is_empty() {
            return other;
        }
        if other.is_empty() {
            return self;
        }
        let (min0, max0) = (self.min(), self.max());
        let (min1, max1) = (other.min(), other.max());
        let mut min = min0;
        let mut max = max0;
        for axis in 0..3 {
            min[axis] = min0[axis].min(min1[axis]);
            max[axis] = max0[axis].max(max1[axis]);
        }
        BBox::from_min_max(min, max)
    }

    pub fn union_point(self, p: Point3) -> BBox {
        if self.lengths.x < 0.0 || self.lengths.y < 0.0 || self.lengths.z < 0.0 {
            return BBox::from_min_max(p, p);
        }
        let (mut min, mut max) = (self.min(), self.max());
        for axis in 0..3 {
            min[axis] = min[axis].min(p[axis]);
            max[axis] = max[axis].max(p[axis]);
        }
        BBox::from_min_max(min, max)
    }

    /// Computes the surface area of the bounding box. Empty boxes have zero area.
    pub fn surface_area(&self) -> f64 {
        let Vec3 { x, y, z } = self.lengths;
        if x < 0.0 || y < 0.0 || z < 0.0 {
            return 0.0;
        }
        2.0 * (x * (y + z) + y * z)
    }

    pub fn all_corners(&self) -> [Point3; 8] {
        let mut res = [self.lower_left; 8];
        for (i, corner) in res.iter_mut().enumerate() {
            for axis in 0..3 {
                if i & (1 << axis) != 0 {
                    corner[axis] += self.lengths[axis];
                }
            }
        }
        res
    }

    /// Checks that `other` lies within `self` on all axes, allowing `tolerance` relative to the
    /// coordinate magnitude. Empty boxes are enclosed by everything.
    pub fn encloses(&self, other: BBox, tolerance: f64) -> bool {
        if other.is_empty() {
            return true;
        }
        let (min0, max0) = (self.min(), self.max());
        let (min1, max1) = (other.min(), other.max());
        for axis in 0..3 {
            let slack = |v: f64| tolerance * v.abs().max(1.0);
            if min1[axis] < min0[axis] - slack(min0[axis]) {
                return false;
            }
            if max1[axis] > max0[axis] + slack(max0[axis]) {
                return false;
            }
        }
        true
    }

    pub fn contains(&self, p: Point3) -> bool {
        let (min, max) = (self.min(), self.max());
        (0..3).all(|axis| min[axis] <= p[axis] && p[axis] <= max[axis])
    }
}

impl Display for BBox {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "box[{} -> {}]", self.min(), self.max())
    }
}

pub fn union(b0: BBox, b1: BBox) -> BBox {
    b0.union(b1)
}
