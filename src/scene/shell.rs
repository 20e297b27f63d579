//! The transmissive glass shell wrapped around the inner world.
//!
//! The shell is purely visual. Its thickness thins out as the camera reaches
//! the inner surface and its scale fades with the traversal parameter, so it
//! never pops when the controller wraps the camera between levels.

use serde::{Deserialize, Serialize};

use crate::numerics::{lerp, smootherstep, smoothstep};

/// Inner surface distance below which the shell is fully thinned.
pub const THINNING_DISTANCE: f64 = 0.2;

/// Physical material parameters of the shell mesh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransmissiveMaterial {
    pub roughness: f64,
    pub metalness: f64,
    pub transmission: f64,
    pub ior: f64,
    pub thickness: f64,
    pub env_map_intensity: f64,
    pub clearcoat: f64,
}

impl Default for TransmissiveMaterial {
    fn default() -> Self {
        Self {
            roughness: 0.0,
            metalness: 0.0,
            transmission: 1.0,
            ior: 1.341,
            thickness: 1.52,
            env_map_intensity: 1.2,
            clearcoat: 1.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GlassShell {
    pub material: TransmissiveMaterial,
    initial: TransmissiveMaterial,
    radius: f64,
    fade_band: f64,
    pub scale: f64,
    pub visible: bool,
}

impl GlassShell {
    /// `radius` is the inner shell radius; `fade_band` is the fraction of a
    /// traversal over which the shell scales in and out at each end.
    pub fn new(material: TransmissiveMaterial, radius: f64, fade_band: f64) -> Self {
        Self {
            initial: material.clone(),
            material,
            radius,
            fade_band,
            scale: radius,
            visible: true,
        }
    }

    pub fn initial_material(&self) -> &TransmissiveMaterial {
        &self.initial
    }

    /// Override the thickness the shell thins down from.
    pub fn set_initial_thickness(&mut self, thickness: f64) {
        self.initial.thickness = thickness.max(0.0);
    }

    /// Recompute thickness, scale and visibility for the camera's distance to the inner surface.
    pub fn update(&mut self, inner_surface_distance: f64, gap: f64) {
        let thinning = smoothstep(THINNING_DISTANCE, 0.0, inner_surface_distance);
        self.material.thickness = lerp(self.initial.thickness, 0.0, thinning);

        let camera_u = (inner_surface_distance / gap).clamp(0.0, 1.0);
        let edge = (1.0 - camera_u).min(camera_u);
        self.scale = self.radius * smootherstep(edge, 0.0, self.fade_band);

        self.visible = inner_surface_distance > 0.0;
    }
}
