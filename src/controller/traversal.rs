//! Shell geometry and the pure traversal arithmetic.

use crate::error::ConfigError;
use crate::numerics::{euclidean_modulo, floor_mod};

/// Two concentric shell radii. `outer > inner > 0`, both finite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShellGeometry {
    inner_radius: f64,
    outer_radius: f64,
}

impl ShellGeometry {
    pub fn new(inner_radius: f64, outer_radius: f64) -> Result<Self, ConfigError> {
        if !inner_radius.is_finite() || !outer_radius.is_finite() {
            return Err(ConfigError::ValidationError(format!(
                "shell radii must be finite, got inner {inner_radius} and outer {outer_radius}"
            )));
        }
        if inner_radius <= 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "inner radius must be positive, got {inner_radius}"
            )));
        }
        if outer_radius <= inner_radius {
            return Err(ConfigError::ValidationError(format!(
                "outer radius ({outer_radius}) must be greater than inner radius ({inner_radius})"
            )));
        }
        Ok(Self {
            inner_radius,
            outer_radius,
        })
    }

    pub fn inner_radius(&self) -> f64 {
        self.inner_radius
    }

    pub fn outer_radius(&self) -> f64 {
        self.outer_radius
    }

    pub fn gap(&self) -> f64 {
        self.outer_radius - self.inner_radius
    }

    /// Scale applied to the inner world so it fits inside the inner shell.
    pub fn inner_scale(&self) -> f64 {
        self.inner_radius / self.outer_radius
    }
}

/// Bring a distance from the inner surface back into `[0, gap]`.
///
/// Returns the wrapped distance and the signed number of shell boundaries
/// crossed (positive outward). Values already in range are returned as is.
pub fn wrap_distance(distance: f64, gap: f64) -> (f64, i64) {
    if !(distance > gap || distance < 0.0) {
        return (distance, 0);
    }
    let crossings = (distance / gap).floor() as i64;
    let wrapped = euclidean_modulo(distance, gap);
    // A tiny negative distance can round to exactly `gap` before the modulo
    // and come back as 0; it belongs at the far end of the lower level. An
    // exact negative multiple of `gap` really is 0.
    let wrapped = if wrapped == 0.0 && crossings < 0 && distance % gap != 0.0 {
        gap
    } else {
        wrapped
    };
    (wrapped, crossings)
}

/// `(inner_index, outer_index)` for a level over `count` worlds.
pub fn world_indices(level: i64, count: usize) -> (usize, usize) {
    let count = count.max(1) as i64;
    let inner = floor_mod(level - 1, count) as usize;
    let outer = floor_mod(level, count) as usize;
    (inner, outer)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_geometry_validation() {
        let geometry = ShellGeometry::new(1.0, 8.0).unwrap();
        assert_eq!(geometry.gap(), 7.0);
        assert_eq!(geometry.inner_scale(), 0.125);

        assert!(ShellGeometry::new(0.0, 8.0).is_err());
        assert!(ShellGeometry::new(-1.0, 8.0).is_err());
        assert!(ShellGeometry::new(2.0, 2.0).is_err());
        assert!(ShellGeometry::new(3.0, 2.0).is_err());
        assert!(ShellGeometry::new(1.0, f64::INFINITY).is_err());
        assert!(ShellGeometry::new(f64::NAN, 2.0).is_err());
    }

    #[test]
    fn test_in_range_distance_is_untouched() {
        for distance in [0.0, 0.5, 3.5, 7.0] {
            assert_eq!(wrap_distance(distance, 7.0), (distance, 0));
        }
    }

    #[test]
    fn test_single_crossings() {
        let (wrapped, crossings) = wrap_distance(7.5, 7.0);
        assert!((wrapped - 0.5).abs() < EPSILON);
        assert_eq!(crossings, 1);

        let (wrapped, crossings) = wrap_distance(-0.3, 7.0);
        assert!((wrapped - 6.7).abs() < EPSILON);
        assert_eq!(crossings, -1);
    }

    #[test]
    fn test_multiple_crossings() {
        let (wrapped, crossings) = wrap_distance(23.0, 7.0);
        assert!((wrapped - 2.0).abs() < EPSILON);
        assert_eq!(crossings, 3);

        let (wrapped, crossings) = wrap_distance(-15.0, 7.0);
        assert!((wrapped - 6.0).abs() < EPSILON);
        assert_eq!(crossings, -3);
    }

    #[test]
    fn test_tiny_negative_distance_lands_at_far_end() {
        let (wrapped, crossings) = wrap_distance(-1e-17, 7.0);
        assert_eq!(crossings, -1);
        assert_eq!(wrapped, 7.0);
    }

    #[test]
    fn test_exact_negative_multiples_land_on_inner_surface() {
        assert_eq!(wrap_distance(-7.0, 7.0), (0.0, -1));
        assert_eq!(wrap_distance(-14.0, 7.0), (0.0, -2));
        assert_eq!(wrap_distance(-3.0, 1.5), (0.0, -2));
    }

    #[test]
    fn test_indices_stay_in_range() {
        for count in 1..6usize {
            for level in -25..25i64 {
                let (inner, outer) = world_indices(level, count);
                assert!(inner < count);
                assert!(outer < count);
                if count >= 2 {
                    assert_ne!(inner, outer);
                    assert_eq!((inner + 1) % count, outer);
                } else {
                    assert_eq!(inner, outer);
                }
            }
        }
    }

    #[test]
    fn test_indices_for_negative_levels() {
        assert_eq!(world_indices(0, 4), (3, 0));
        assert_eq!(world_indices(1, 4), (0, 1));
        assert_eq!(world_indices(-1, 4), (2, 3));
        assert_eq!(world_indices(-5, 4), (2, 3));
    }
}
