use geometry::bbox::BBox;
use math::float;
use math::hcm::{Point3, Vec3};

use crate::hit::valid_depth;
use crate::{Hit, Shape};
use geometry::ray::Ray;

#[derive(Debug, Clone, Copy)]
pub struct Sphere {
    center: Point3,
    radius: f64,
}

impl Sphere {
    pub fn new(center: Point3, radius: f64) -> Sphere {
        assert!(radius > 0.0, "sphere radius {} must be positive", radius);
        Sphere { center, radius }
    }
    pub fn from_raw(center: (f64, f64, f64), radius: f64) -> Sphere {
        let (x, y, z) = center;
        let has_nan = x.is_nan() || y.is_nan() || z.is_nan() || radius.is_nan();
        assert!(!has_nan);
        Self::new(Point3::new(x, y, z), radius)
    }
    pub fn center(&self) -> Point3 {
        self.center
    }
    pub fn radius(&self) -> f64 {
        self.radius
    }
}

/// Axis-aligned solid box. Its geometry coincides with its bounding box.
#[derive(Debug, Clone, Copy)]
pub struct Cuboid {
    min: Point3,
    max: Point3,
}

impl Cuboid {
    pub fn from_points(p0: Point3, p1: Point3) -> Self {
        let (xmin, xmax) = float::min_max(p0.x, p1.x);
        let (ymin, ymax) = float::min_max(p0.y, p1.y);
        let (zmin, zmax) = float::min_max(p0.z, p1.z);
        Self {
            min: Point3::new(xmin, ymin, zmin),
            max: Point3::new(xmax, ymax, zmax),
        }
    }
    pub fn min(&self) -> Point3 {
        self.min
    }
    pub fn max(&self) -> Point3 {
        self.max
    }
}

/// Infinite plane `normal . p = offset`. The half-space `normal . p <= offset` is its inside.
#[derive(Debug, Clone, Copy)]
pub struct Plane {
    normal: Vec3,
    offset: f64,
}

impl Plane {
    pub fn new(normal: Vec3, offset: f64) -> Self {
        Self {
            normal: normal.hat(),
            offset,
        }
    }
    pub fn normal(&self) -> Vec3 {
        self.normal
    }
}

// Implementation of the `Shape` trait for the shape implementations.

impl Shape for Sphere {
    fn summary(&self) -> String {
        format!("Sphere{{ {}, radius = {} }}", self.center, self.radius)
    }
    fn bbox(&self) -> BBox {
        let half_diagonal = Vec3::splat(self.radius);
        BBox::from_min_max(self.center - half_diagonal, self.center + half_diagonal)
    }
    fn intersect(&self, r: &Ray) -> Option<Hit> {
        // r = o + td
        // sphere: (p-c)(p-c) = radius^2
        // (td + o - c)^2 = radius^2
        // t^2 d^2 + (o-c)^2 + 2t d * (o-c) = radius^2
        let f = r.origin - self.center; // vector connecting the sphere center to ray origin.
        let a = r.dir.norm_squared();
        if a == 0.0 {
            return None;
        }
        let b_prime = -f.dot(r.dir);
        let delta = self.radius * self.radius - (f + b_prime / a * r.dir).norm_squared();
        if delta < 0.0 {
            return None;
        }
        let c = f.norm_squared() - self.radius * self.radius;
        let sign = if b_prime < 0.0 { -1.0 } else { 1.0 };
        let q = b_prime + sign * (delta * a).sqrt();
        let (t_low, t_high) = if q == 0.0 {
            (0.0, 0.0)
        } else {
            float::min_max(c / q, q / a)
        };
        // The lower root wins if it's in front of the ray; otherwise the ray starts inside.
        let ray_t = valid_depth(t_low).or_else(|| valid_depth(t_high))?;
        let pos = r.position_at(ray_t);
        Some(Hit::on_ray(r, ray_t, pos - self.center))
    }
    fn inside(&self, p: Point3) -> bool {
        p.squared_distance_to(self.center) <= self.radius * self.radius
    }
}

impl Shape for Cuboid {
    fn summary(&self) -> String {
        format!("Cuboid{{{} <-> {}}}", self.min, self.max)
    }
    fn bbox(&self) -> BBox {
        BBox::from_min_max(self.min, self.max)
    }

    fn intersect(&self, r: &Ray) -> Option<Hit> {
        let (mut t_enter, mut t_exit) = (-f64::INFINITY, f64::INFINITY);
        let (mut enter_axis, mut exit_axis) = (0, 0);

        for axis in 0..3 {
            if r.dir[axis] == 0.0 {
                if r.origin[axis] < self.min[axis] || r.origin[axis] > self.max[axis] {
                    return None;
                }
                continue;
            }
            let inv_dir = 1.0 / r.dir[axis];
            let t0 = (self.min[axis] - r.origin[axis]) * inv_dir;
            let t1 = (self.max[axis] - r.origin[axis]) * inv_dir;
            let (t0, t1) = float::min_max(t0, t1);
            // Shrinks [t_enter, t_exit] by intersecting it with [t0, t1].
            if t0 > t_enter {
                t_enter = t0;
                enter_axis = axis;
            }
            if t1 < t_exit {
                t_exit = t1;
                exit_axis = axis;
            }
            if t_exit < t_enter {
                return None;
            }
        }
        let (t, axis) = match (valid_depth(t_enter), valid_depth(t_exit)) {
            (Some(t), _) => (t, enter_axis),
            (None, Some(t)) => (t, exit_axis),
            (None, None) => return None,
        };
        let mut normal = Vec3::ZERO;
        normal[axis] = 1.0;
        Some(Hit::on_ray(r, t, normal))
    }
    fn inside(&self, p: Point3) -> bool {
        self.bbox().contains(p)
    }
}

impl Shape for Plane {
    fn summary(&self) -> String {
        format!("Plane{{normal = {}, offset = {}}}", self.normal, self.offset)
    }
    fn bbox(&self) -> BBox {
        BBox::infinite()
    }
    fn intersect(&self, r: &Ray) -> Option<Hit> {
        // Ray:    r = o + td
        // Plane:  p dot n = offset
        //         (o + td) dot n = offset  =>  t = (offset - o dot n) / (d dot n)
        let denom = r.dir.dot(self.normal);
        if denom == 0.0 {
            return None;
        }
        let t = (self.offset - Vec3::from(r.origin).dot(self.normal)) / denom;
        let t = valid_depth(t)?;
        Some(Hit::on_ray(r, t, self.normal))
    }
    fn inside(&self, p: Point3) -> bool {
        Vec3::from(p).dot(self.normal) <= self.offset
    }
    fn is_infinite(&self) -> bool {
        true
    }
}
