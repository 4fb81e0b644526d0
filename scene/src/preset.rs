use geometry::camera::Camera;
use geometry::AffineTransform;
use itertools::iproduct;
use math::hcm::{Point3, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::{Scene, SceneObject, SceneOptions};
use shape::{Cuboid, Plane, Sphere};

/// Names accepted by `by_name()`.
pub const PRESET_NAMES: [&str; 3] = ["spheres", "boxes_on_line", "empty"];

/// Number of unit cubes in the `boxes_on_line` preset.
const NUM_BOXES: usize = 1000;

/// Builds the preset scene called `name`, with a camera of the given resolution.
pub fn by_name(
    name: &str, resolution: (u32, u32), options: SceneOptions,
) -> Result<Scene, String> {
    match name {
        "spheres" => Ok(spheres(resolution, options)),
        "boxes_on_line" => Ok(boxes_on_line(NUM_BOXES, resolution, options)),
        "empty" => Ok(empty(resolution, options)),
        _ => Err(format!(
            "unknown scene {}, expected one of {}",
            name,
            PRESET_NAMES.join(", ")
        )),
    }
}

// Functions that build the scenes: camera and collection of objects.
// ------------------------------------------------------------------------------------------------

/// Small random spheres and boxes scattered on a grid over an infinite ground plane, with 3 big
/// spheres in the middle. The glowing sphere above them casts no shadow.
pub fn spheres(resolution: (u32, u32), options: SceneOptions) -> Scene {
    let camera = Camera::new(resolution, 25f64.to_radians()).looking_at(
        Point3::new(13.0, 2.0, 3.0),
        Point3::ORIGIN,
        Vec3::Y,
    );

    let mut objects = vec![
        SceneObject::from_shape(Plane::new(Vec3::Y, 0.0)),
        SceneObject::from_shape(Sphere::from_raw((0.0, 1.0, 0.0), 1.0)),
        SceneObject::from_shape(Sphere::from_raw((-4.0, 1.0, 0.0), 1.0)),
        SceneObject::from_shape(Sphere::from_raw((4.0, 1.0, 0.0), 1.0)),
        SceneObject::from_shape(Sphere::from_raw((0.0, 6.0, 0.0), 0.5)).with_no_shadow(true),
    ];

    let mut rng = StdRng::seed_from_u64(0);
    for (a, b) in iproduct!(-11..11, -11..11) {
        let center = Point3::new(
            a as f64 + 0.9 * rng.gen::<f64>(),
            0.2,
            b as f64 + 0.9 * rng.gen::<f64>(),
        );
        if center.distance_to(Point3::new(4.0, 0.2, 0.0)) <= 0.9 {
            continue;
        }
        let object = if rng.gen_bool(0.8) {
            SceneObject::from_shape(Sphere::new(center, 0.2))
        } else {
            // A small cube spun around the vertical axis.
            let half = Vec3::splat(0.2);
            let cube = Cuboid::from_points(Point3::ORIGIN - half, Point3::ORIGIN + half);
            let angle = rng.gen_range(0.0..std::f64::consts::PI);
            let spin = AffineTransform::rotater(Vec3::Y, angle).translate(Vec3::from(center));
            SceneObject::from_shape(cube).with_transform(spin)
        };
        objects.push(object);
    }
    Scene::new(objects, camera, options)
}

/// `n` unit cubes along the X axis, one unit apart, seen from the side.
pub fn boxes_on_line(n: usize, resolution: (u32, u32), options: SceneOptions) -> Scene {
    let objects = (0..n)
        .map(|i| {
            let x = 2.0 * i as f64;
            let (p0, p1) = (Point3::new(x, 0.0, 0.0), Point3::new(x + 1.0, 1.0, 1.0));
            SceneObject::from_shape(Cuboid::from_points(p0, p1))
        })
        .collect::<Vec<_>>();
    let middle = n as f64;
    let camera = Camera::new(resolution, 30f64.to_radians()).looking_at(
        Point3::new(middle, 0.5, -3.0 * middle.max(1.0)),
        Point3::new(middle, 0.5, 0.5),
        Vec3::Y,
    );
    Scene::new(objects, camera, options)
}

pub fn empty(resolution: (u32, u32), options: SceneOptions) -> Scene {
    let camera = Camera::new(resolution, 45f64.to_radians());
    Scene::new(vec![], camera, options)
}
