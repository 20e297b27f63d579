// src/numerics/types/vector.rs
// Vector3 generic implementation with default precision f64.
// Uses the FloatingPoint trait from super::traits.

use core::ops::{Add, Mul, Neg, Sub};
use serde::{Deserialize, Serialize};

use super::traits::FloatingPoint;

/// Vector3 is a simple 3D vector type with template-able numeric type.
///
/// Positions in the shell traversal are measured from the scene origin, so
/// most of the helpers here are about length and direction.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Vector3<T: FloatingPoint = f64> {
    pub x: T,
    pub y: T,
    pub z: T,
}

// Serialized as a plain `[x, y, z]` triple so config files stay compact.
impl<T> Serialize for Vector3<T>
where
    T: FloatingPoint + Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        [self.x, self.y, self.z].serialize(serializer)
    }
}

impl<'de, T> Deserialize<'de> for Vector3<T>
where
    T: FloatingPoint + Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let [x, y, z] = <[T; 3]>::deserialize(deserializer)?;
        Ok(Vector3 { x, y, z })
    }
}

impl<T: FloatingPoint> Vector3<T> {
    pub fn new(x: T, y: T, z: T) -> Self {
        Self { x, y, z }
    }

    pub fn origin() -> Self {
        Self::new(T::zero(), T::zero(), T::zero())
    }

    pub fn dot(&self, other: &Self) -> T {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Return the squared length (avoids sqrt)
    pub fn length_squared(&self) -> T {
        self.dot(self)
    }

    pub fn length(&self) -> T {
        self.length_squared().sqrt()
    }

    pub fn distance_to(&self, other: &Self) -> T {
        (*self - *other).length()
    }

    /// Unit vector in the same direction, or `None` for the zero vector.
    pub fn normalized(&self) -> Option<Self> {
        let length = self.length();
        if length > T::zero() {
            Some(*self * (T::one() / length))
        } else {
            None
        }
    }

    /// Same direction, new length. The zero vector has no direction and is
    /// returned unchanged.
    pub fn with_length(&self, length: T) -> Self {
        match self.normalized() {
            Some(direction) => direction * length,
            None => *self,
        }
    }

    /// Rotate about the vertical (+Y) axis by `angle` radians.
    pub fn rotated_about_y(&self, angle: T) -> Self {
        let (sin, cos) = (angle.sin(), angle.cos());
        Self::new(
            self.x * cos + self.z * sin,
            self.y,
            -self.x * sin + self.z * cos,
        )
    }
}

impl<T: FloatingPoint> Add for Vector3<T> {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl<T: FloatingPoint> Sub for Vector3<T> {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

impl<T: FloatingPoint> Mul<T> for Vector3<T> {
    type Output = Self;

    fn mul(self, scalar: T) -> Self {
        Self::new(self.x * scalar, self.y * scalar, self.z * scalar)
    }
}

impl<T: FloatingPoint> Neg for Vector3<T> {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

impl<T: FloatingPoint> From<[T; 3]> for Vector3<T> {
    fn from(array: [T; 3]) -> Self {
        Self::new(array[0], array[1], array[2])
    }
}

impl<T: FloatingPoint> From<Vector3<T>> for [T; 3] {
    fn from(v: Vector3<T>) -> Self {
        [v.x, v.y, v.z]
    }
}
