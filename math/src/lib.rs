/// Defines useful functions for common float operations:
/// - `min_max()` to order a pair of numbers,
/// - `assert_le!()` to check that one quantity doesn't exceed another.
pub mod float;

/// Homogeneous-coordinate maths module.
/// - Types: 3D points and vectors, 3x3 matrices, all in `f64`.
/// - Functions `vec3()` and `point3()` as short-hand constructors.
pub mod hcm;
