use crate::ray;
use math::hcm;

/// Left-handed coordinate system camera: x rightward, y upward, z forward.
pub struct Camera {
    center: hcm::Point3,
    a: hcm::Vec3,
    b: hcm::Vec3,
    c: hcm::Vec3,

    // Film image resolution.
    width: u32,
    height: u32,

    orientation: hcm::Mat3,
}

impl Camera {
    /// `fov_y` is the full vertical field of view, in radians.
    pub fn new(resolution: (u32, u32), fov_y: f64) -> Camera {
        let (width, height) = resolution;
        assert!(width > 0 && height > 0, "empty film {}x{}", width, height);
        let aspect_ratio = width as f64 / height as f64;
        let half_vertical = (fov_y * 0.5).tan();
        let half_horizontal = half_vertical * aspect_ratio;

        Camera {
            center: hcm::Point3::ORIGIN,
            a: hcm::Vec3::new(2.0 * half_horizontal / width as f64, 0.0, 0.0),
            b: hcm::Vec3::new(0.0, -2.0 * half_vertical / height as f64, 0.0),
            c: hcm::Vec3::new(-half_horizontal, half_vertical, 1.0),
            width,
            height,
            orientation: hcm::Mat3::IDENTITY,
        }
    }

    pub fn looking_at(self, from: hcm::Point3, target: hcm::Point3, up: hcm::Vec3) -> Self {
        let forward = (target - from).hat(); // new z-axis
        let right = (up.cross(forward)).hat(); // new x-axis, equals to cross(y, z)
        let up = forward.cross(right); // adjusted y-axis, equals to cross(z, x)

        Self {
            orientation: hcm::Mat3::from_cols(right, up, forward),
            center: from,
            ..self
        }
    }

    /// Shoots a ray through the center of the pixel at (`row`, `col`). Returns `None` if the
    /// pixel is outside the film.
    pub fn shoot_ray(&self, row: u32, col: u32) -> Option<ray::Ray> {
        if row >= self.height || col >= self.width {
            return None;
        }
        let x = col as f64 + 0.5;
        let y = row as f64 + 0.5;
        let dir = self.c + self.a * x + self.b * y;
        Some(ray::Ray::new(self.center, self.orientation * dir))
    }

    /// Returns resolution (width x height) of the camera film.
    pub fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

#[test]
fn center_pixel_looks_forward() {
    let camera = Camera::new((3, 3), std::f64::consts::FRAC_PI_2).looking_at(
        hcm::point3(0.0, 0.0, -5.0),
        hcm::Point3::ORIGIN,
        hcm::Vec3::Y,
    );
    let ray = camera.shoot_ray(1, 1).unwrap();
    assert!((ray.dir.hat() - hcm::Vec3::Z).norm() < 1e-12, "dir = {}", ray.dir);
    assert!(camera.shoot_ray(3, 0).is_none());
}
