use std::ops::Mul;

use crate::bbox::BBox;
use crate::ray::Ray;
use math::hcm::{Mat3, Point3, Vec3};

/// Linear part plus translation, stored together with its inverse so that rays can be carried
/// into object space without a matrix inversion per ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineTransform {
    linear: Mat3,
    translation: Vec3,
    inv_linear: Mat3,
    inv_translation: Vec3,
}

pub trait Transform<T> {
    fn apply(&self, x: T) -> T;
}

impl AffineTransform {
    fn build(linear: Mat3, translation: Vec3, inv_linear: Mat3) -> Self {
        Self {
            linear,
            translation,
            inv_linear,
            inv_translation: -(inv_linear * translation),
        }
    }
    pub fn identity() -> Self {
        Self::build(Mat3::IDENTITY, Vec3::ZERO, Mat3::IDENTITY)
    }
    pub fn translater(t: Vec3) -> Self {
        Self::build(Mat3::IDENTITY, t, Mat3::IDENTITY)
    }
    pub fn rotater(axis: Vec3, radians: f64) -> Self {
        let rot = Mat3::rotater(axis, radians);
        Self::build(rot, Vec3::ZERO, rot.transpose())
    }
    /// Panics if any scale component is zero.
    pub fn scaler(scale: Vec3) -> Self {
        let Vec3 { x, y, z } = scale;
        assert!(x * y * z != 0.0, "singular scale {}", scale);
        Self::build(
            Mat3::nonuniform_scale(scale),
            Vec3::ZERO,
            Mat3::nonuniform_scale(Vec3::new(1.0 / x, 1.0 / y, 1.0 / z)),
        )
    }
    /// Builds a transform from an arbitrary linear part. Returns `None` if it's singular.
    pub fn from_linear(linear: Mat3, translation: Vec3) -> Option<Self> {
        let inv_linear = linear.try_inverse()?;
        Some(Self::build(linear, translation, inv_linear))
    }

    pub fn inverse(&self) -> Self {
        Self {
            linear: self.inv_linear,
            translation: self.inv_translation,
            inv_linear: self.linear,
            inv_translation: self.translation,
        }
    }

    pub fn is_identity(&self) -> bool {
        self.linear == Mat3::IDENTITY && self.translation == Vec3::ZERO
    }

    /// Applies Translate(t) onto the transform, and returns Translate(t) * self.
    pub fn translate(self, t: Vec3) -> Self {
        Self::translater(t) * self
    }
    pub fn rotate(self, axis: Vec3, radians: f64) -> Self {
        Self::rotater(axis, radians) * self
    }
    pub fn scale(self, s: Vec3) -> Self {
        Self::scaler(s) * self
    }

    /// Transforms a surface normal, which follows the inverse transpose of the linear part.
    pub fn apply_normal(&self, n: Vec3) -> Vec3 {
        self.inv_linear.transpose() * n
    }
}

impl Mul for AffineTransform {
    type Output = AffineTransform;
    fn mul(self, rhs: Self) -> Self::Output {
        // (A, a) * (B, b) = (AB, Ab + a); the inverse is (B^-1 A^-1, ...).
        Self::build(
            self.linear * rhs.linear,
            self.linear * rhs.translation + self.translation,
            rhs.inv_linear * self.inv_linear,
        )
    }
}

impl std::fmt::Display for AffineTransform {
    #[rustfmt::skip]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let m = &self.linear;
        let t = &self.translation;
        write!(
            f,
            "\n|{:5.2} {:5.2} {:5.2} {:5.2}\
             \n|{:5.2} {:5.2} {:5.2} {:5.2}\
             \n|{:5.2} {:5.2} {:5.2} {:5.2}\n",
            m.cols[0].x, m.cols[1].x, m.cols[2].x, t.x,
            m.cols[0].y, m.cols[1].y, m.cols[2].y, t.y,
            m.cols[0].z, m.cols[1].z, m.cols[2].z, t.z
        )
    }
}

// Transforms on:
// - Vec3
// - Point3
// - Ray
// - BBox
// -------------------------------------------------------------------------------------------------

impl Transform<Vec3> for AffineTransform {
    fn apply(&self, x: Vec3) -> Vec3 {
        self.linear * x
    }
}
impl Transform<Point3> for AffineTransform {
    fn apply(&self, p: Point3) -> Point3 {
        Point3::from(self.linear * Vec3::from(p) + self.translation)
    }
}
impl Transform<Ray> for AffineTransform {
    /// The direction isn't renormalized, so ray parameters `t` agree in both spaces.
    fn apply(&self, r: Ray) -> Ray {
        Ray::new(self.apply(r.origin), self.apply(r.dir))
    }
}
impl Transform<BBox> for AffineTransform {
    /// Bounds the 8 transformed corners. The result is clamped like any other box, so an
    /// unbounded box stays within `±BOUND_HUGE / 2` after a rotation.
    fn apply(&self, b: BBox) -> BBox {
        if b.is_empty() {
            return b;
        }
        b.all_corners()
            .iter()
            .fold(BBox::empty(), |res, corner| res.union_point(self.apply(*corner)))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::bbox::BOUND_HUGE;
    use math::assert_le;

    #[test]
    fn test_inverse() {
        let trans = AffineTransform::rotater(Vec3::new(0.6, 0.8, 0.0), 0.3)
            * AffineTransform::scaler(Vec3::new(2.0, 0.5, 1.5))
            * AffineTransform::translater(Vec3::new(0.3, 0.4, 0.6));
        let identity = trans.inverse() * trans;

        assert_le!(
            (identity.linear - Mat3::IDENTITY).frobenius_norm_squared(),
            1e-20
        );
        assert_le!(identity.translation.norm_squared(), 1e-20);
    }

    #[test]
    fn test_bbox_transform() {
        let trans = AffineTransform::rotater(Vec3::new(0.6, 0.8, 0.0), 0.3)
            .translate(Vec3::new(7.0, 8.0, -13.0));
        let bbox = BBox::from_min_max(Point3::new(-0.3, 0.4, 0.8), Point3::new(3.4, 2.3, 4.4));
        let t_bbox = trans.apply(bbox);

        for corner in bbox.all_corners().iter() {
            assert!(t_bbox.contains(trans.apply(*corner)));
        }
    }

    #[test]
    fn unbounded_box_stays_clamped() {
        let trans = AffineTransform::rotater(Vec3::Z, 0.7).scale(Vec3::new(3.0, 3.0, 3.0));
        let t_bbox = trans.apply(BBox::infinite());
        for axis in 0..3 {
            assert_le!(t_bbox.max()[axis], BOUND_HUGE * 0.5);
            assert_le!(-BOUND_HUGE * 0.5, t_bbox.min()[axis]);
            assert!((t_bbox.max()[axis] + t_bbox.max()[axis]).is_finite());
        }
    }
}
