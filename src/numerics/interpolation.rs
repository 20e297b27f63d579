//! Scalar helpers used by the traversal and the glass shell.
//!
//! `smoothstep` and `smootherstep` take `(x, min, max)` and return 0 below
//! `min`, 1 at or above `max`. Either edge may be the moving quantity: the
//! shell thinning keeps `x` fixed and feeds the camera distance as `max`.

/// Linear interpolation between two values
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Hermite ramp of `x` between `min` and `max`.
pub fn smoothstep(x: f64, min: f64, max: f64) -> f64 {
    if x <= min {
        return 0.0;
    }
    if x >= max {
        return 1.0;
    }
    let t = (x - min) / (max - min);
    t * t * (3.0 - 2.0 * t)
}

/// Quintic ramp of `x` between `min` and `max` (zero first and second derivative at the edges).
pub fn smootherstep(x: f64, min: f64, max: f64) -> f64 {
    if x <= min {
        return 0.0;
    }
    if x >= max {
        return 1.0;
    }
    let t = (x - min) / (max - min);
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

/// Modulo whose result has the sign of `modulus`, i.e. is in `[0, modulus)` for a positive modulus.
pub fn euclidean_modulo(value: f64, modulus: f64) -> f64 {
    ((value % modulus) + modulus) % modulus
}

/// Integer floor modulo, always in `[0, modulus)` for a positive modulus.
pub fn floor_mod(value: i64, modulus: i64) -> i64 {
    value.rem_euclid(modulus)
}
