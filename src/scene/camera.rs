//! Camera state consumed by the shell controller.

use crate::numerics::Vector3;

/// Perspective camera with the handful of properties the traversal reads.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Camera position in world space
    pub position: Vector3,

    /// Camera target/look-at point
    pub target: Vector3,

    /// Field of view in degrees
    pub fov: f64,

    /// Near clipping plane distance
    pub near: f64,

    /// Far clipping plane distance
    pub far: f64,
}

impl Camera {
    pub fn new() -> Self {
        Self {
            position: Vector3::new(0.0, 0.0, 5.0),
            target: Vector3::origin(),
            fov: 45.0,
            near: 0.01,
            far: 1000.0,
        }
    }

    pub fn with_position(mut self, position: Vector3) -> Self {
        self.position = position;
        self
    }

    pub fn with_near(mut self, near: f64) -> Self {
        self.near = near.max(0.0);
        self
    }

    pub fn with_fov(mut self, fov: f64) -> Self {
        self.fov = fov.clamp(1.0, 179.0);
        self
    }

    /// Distance from the scene origin to the camera.
    pub fn distance_from_origin(&self) -> f64 {
        self.position.length()
    }

    /// Distance from the scene origin to the near plane, measured along the radial direction.
    pub fn near_plane_distance(&self) -> f64 {
        self.distance_from_origin() - self.near
    }

    /// Move the camera to `distance` from the origin keeping its direction.
    ///
    /// The camera never passes through the origin: a negative or non-finite
    /// distance leaves it where it is.
    pub fn set_distance(&mut self, distance: f64) {
        if !(distance >= 0.0 && distance.is_finite()) {
            tracing::warn!("ignoring camera distance {distance}");
            return;
        }
        self.position = self.position.with_length(distance);
    }

    /// Move the camera outward (negative `delta` moves inward).
    pub fn advance_radially(&mut self, delta: f64) {
        let distance = self.distance_from_origin() + delta;
        self.set_distance(distance);
    }

    /// Orbit the camera about the vertical axis through the origin.
    pub fn orbit(&mut self, angle: f64) {
        self.position = self.position.rotated_about_y(angle);
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}
