// src/numerics/types/point.rs
// Point3 is an alias for Vector3.

use super::vector::Vector3;

/// Point3 is an alias to Vector3 to represent positions in space.
pub type Point3<T = f64> = Vector3<T>;
