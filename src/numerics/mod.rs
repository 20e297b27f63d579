// src/numerics/mod.rs
// Top-level numerics module. Exposes a `types` namespace and scalar helpers.

pub mod interpolation;

pub mod types {
    // The submodules live in src/numerics/types/*.rs
    pub mod point;
    pub mod traits;
    pub mod vector;
}

pub use interpolation::{euclidean_modulo, floor_mod, lerp, smootherstep, smoothstep};
pub use types::vector::Vector3;
