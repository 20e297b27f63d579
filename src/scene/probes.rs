//! Grid of reference spheres for judging environment lighting.

use crate::numerics::types::point::Point3;
use crate::resources::Disposable;

/// Spacing between neighbouring probe spheres.
pub const PROBE_SPACING: f64 = 0.25;

/// Radius of each probe sphere.
pub const PROBE_RADIUS: f64 = 0.05;

#[derive(Debug, Clone, PartialEq)]
pub struct Probe {
    pub position: Point3,
    pub radius: f64,
    pub roughness: f64,
    pub metalness: f64,
    /// Grey level of the base colour.
    pub color: f64,
}

/// A `grid_size`³ cube of probes. Roughness varies along x, metalness along
/// y and grey level along z, each from 0 to 1.
#[derive(Debug, Clone)]
pub struct EnvironmentProbes {
    pub origin: Point3,
    probes: Vec<Probe>,
    disposed: bool,
}

impl EnvironmentProbes {
    pub fn new(grid_size: usize) -> Self {
        let grid_size = grid_size.max(1);
        let steps = (grid_size - 1).max(1) as f64;
        let centre = (grid_size - 1) as f64 / 2.0;

        let mut probes = Vec::with_capacity(grid_size.pow(3));
        for i in 0..grid_size {
            for j in 0..grid_size {
                for k in 0..grid_size {
                    let position = Point3::new(
                        (i as f64 - centre) * PROBE_SPACING,
                        (j as f64 - centre) * PROBE_SPACING,
                        (k as f64 - centre) * PROBE_SPACING,
                    );
                    probes.push(Probe {
                        position,
                        radius: PROBE_RADIUS,
                        roughness: i as f64 / steps,
                        metalness: j as f64 / steps,
                        color: k as f64 / steps,
                    });
                }
            }
        }

        Self {
            origin: Point3::origin(),
            probes,
            disposed: false,
        }
    }

    pub fn with_origin(mut self, origin: Point3) -> Self {
        self.origin = origin;
        self
    }

    pub fn probes(&self) -> &[Probe] {
        &self.probes
    }

    /// World-space position of a probe.
    pub fn world_position(&self, probe: &Probe) -> Point3 {
        self.origin + probe.position
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}

impl Default for EnvironmentProbes {
    fn default() -> Self {
        Self::new(3)
    }
}

impl Disposable for EnvironmentProbes {
    fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        self.probes.clear();
    }

    fn label(&self) -> &str {
        "environment probes"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_grid_layout() {
        let probes = EnvironmentProbes::default();
        assert_eq!(probes.probes().len(), 27);

        let first = &probes.probes()[0];
        assert_eq!(first.position, Point3::new(-0.25, -0.25, -0.25));
        assert_eq!((first.roughness, first.metalness, first.color), (0.0, 0.0, 0.0));

        let last = probes.probes().last().unwrap();
        assert_eq!(last.position, Point3::new(0.25, 0.25, 0.25));
        assert_eq!((last.roughness, last.metalness, last.color), (1.0, 1.0, 1.0));
    }

    #[test]
    fn test_single_probe_grid() {
        let probes = EnvironmentProbes::new(1);
        assert_eq!(probes.probes().len(), 1);
        assert_eq!(probes.probes()[0].position, Point3::origin());
        assert_eq!(probes.probes()[0].roughness, 0.0);
    }

    #[test]
    fn test_world_position_and_dispose() {
        let mut probes = EnvironmentProbes::new(2).with_origin(Point3::new(2.5, 0.0, 0.0));
        let p = probes.probes()[0].clone();
        assert_eq!(probes.world_position(&p), Point3::new(2.375, -0.125, -0.125));

        probes.dispose();
        probes.dispose();
        assert!(probes.is_disposed());
        assert!(probes.probes().is_empty());
    }
}
