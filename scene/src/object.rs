use std::sync::Arc;

use geometry::bbox::BBox;
use geometry::ray::Ray;
use geometry::{AffineTransform, Transform};
use math::hcm::Point3;
use shape::{Hit, Shape};

/// A shape placed in the world by an affine transform. The shape is shared, so many objects may
/// instance the same geometry.
#[derive(Clone)]
pub struct SceneObject {
    shape: Arc<dyn Shape>,
    transform: AffineTransform,
    inv_transform: AffineTransform,
    /// Objects with this flag are ignored by shadow rays.
    no_shadow: bool,
}

impl std::fmt::Debug for SceneObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SceneObject[{}, world bbox = {}]", self.shape.summary(), self.bbox())
    }
}

impl SceneObject {
    pub fn new(shape: Arc<dyn Shape>) -> Self {
        SceneObject {
            shape,
            transform: AffineTransform::identity(),
            inv_transform: AffineTransform::identity(),
            no_shadow: false,
        }
    }
    pub fn from_shape<S: Shape + 'static>(shape: S) -> Self {
        Self::new(Arc::new(shape))
    }
    pub fn with_transform(self, transform: AffineTransform) -> Self {
        SceneObject {
            inv_transform: transform.inverse(),
            transform,
            ..self
        }
    }
    pub fn with_no_shadow(self, no_shadow: bool) -> Self {
        SceneObject { no_shadow, ..self }
    }

    pub fn shape(&self) -> &Arc<dyn Shape> {
        &self.shape
    }
    pub fn transform(&self) -> &AffineTransform {
        &self.transform
    }
    pub fn casts_shadow(&self) -> bool {
        !self.no_shadow
    }
    pub fn is_infinite(&self) -> bool {
        self.shape.is_infinite()
    }

    /// World-space bounding box: the transformed shape box, clamped to the sentinel extent.
    pub fn bbox(&self) -> BBox {
        if self.is_infinite() {
            return BBox::infinite();
        }
        self.transform.apply(self.shape.bbox())
    }

    /// Intersects the object with a world-space ray. The ray isn't renormalized in object space,
    /// so the returned depth is the world-space ray parameter.
    pub fn intersect(&self, ray: &Ray) -> Option<Hit> {
        let local_ray = self.inv_transform.apply(*ray);
        let hit = self.shape.intersect(&local_ray)?;
        assert!(
            !hit.pos.has_nan(),
            "{} intersect ray {} has nan",
            self.shape.summary(),
            ray
        );
        let normal = self.transform.apply_normal(hit.normal).hat();
        Some(Hit::new(hit.depth, ray.position_at(hit.depth), normal))
    }

    pub fn inside(&self, p: Point3) -> bool {
        self.shape.inside(self.inv_transform.apply(p))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use math::hcm::{point3, Vec3};
    use shape::{Cuboid, Sphere};

    #[test]
    fn transformed_sphere_hit_in_world_space() {
        // Scaled by 2, then moved to z = 10.
        let transform =
            AffineTransform::scaler(Vec3::splat(2.0)).translate(Vec3::new(0.0, 0.0, 10.0));
        let object =
            SceneObject::from_shape(Sphere::from_raw((0.0, 0.0, 0.0), 1.0)).with_transform(transform);
        let hit = object
            .intersect(&Ray::new(point3(0.0, 0.0, 0.0), Vec3::Z))
            .unwrap();
        assert!((hit.depth - 8.0).abs() < 1e-9, "hit = {}", hit);
        assert!((hit.normal - -Vec3::Z).norm() < 1e-9);
        assert!(object.inside(point3(0.0, 1.5, 10.0)));
        assert!(!object.inside(point3(0.0, 2.5, 10.0)));

        let bbox = object.bbox();
        assert!((bbox.min() - point3(-2.0, -2.0, 8.0)).norm() < 1e-9, "{}", bbox);
        assert!((bbox.max() - point3(2.0, 2.0, 12.0)).norm() < 1e-9, "{}", bbox);
    }

    #[test]
    fn rotated_cuboid_bound_grows() {
        let cuboid = Cuboid::from_points(point3(-1.0, -1.0, -1.0), point3(1.0, 1.0, 1.0));
        let object = SceneObject::from_shape(cuboid)
            .with_transform(AffineTransform::rotater(Vec3::Y, std::f64::consts::FRAC_PI_4));
        let half = object.bbox().lengths()[0] * 0.5;
        assert!((half - 2.0f64.sqrt()).abs() < 1e-9);
        assert!(object.casts_shadow());
        assert!(!object.with_no_shadow(true).casts_shadow());
    }
}
