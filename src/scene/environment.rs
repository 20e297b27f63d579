//! Cube environment maps.
//!
//! A map is either captured from a loaded splat world or projected from an
//! equirectangular HDR image. Each map gets a process-unique id; the
//! controller compares ids to decide whether the scene lighting needs a swap.

use std::f64::consts::PI;
use std::fmt;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use image::{Rgba, Rgba32FImage};

use crate::error::EnvironmentError;
use crate::numerics::Vector3;

static NEXT_ENVIRONMENT_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EnvironmentId(u64);

impl EnvironmentId {
    fn next() -> Self {
        Self(NEXT_ENVIRONMENT_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for EnvironmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "env#{}", self.0)
    }
}

/// Cube faces in the conventional +X, -X, +Y, -Y, +Z, -Z order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CubeFace {
    PositiveX,
    NegativeX,
    PositiveY,
    NegativeY,
    PositiveZ,
    NegativeZ,
}

impl CubeFace {
    pub const ALL: [CubeFace; 6] = [
        CubeFace::PositiveX,
        CubeFace::NegativeX,
        CubeFace::PositiveY,
        CubeFace::NegativeY,
        CubeFace::PositiveZ,
        CubeFace::NegativeZ,
    ];

    pub fn index(self) -> usize {
        match self {
            CubeFace::PositiveX => 0,
            CubeFace::NegativeX => 1,
            CubeFace::PositiveY => 2,
            CubeFace::NegativeY => 3,
            CubeFace::PositiveZ => 4,
            CubeFace::NegativeZ => 5,
        }
    }

    /// Direction through face coordinates `(s, t)` in `[-1, 1]`.
    pub fn direction(self, s: f64, t: f64) -> Vector3 {
        match self {
            CubeFace::PositiveX => Vector3::new(1.0, -t, -s),
            CubeFace::NegativeX => Vector3::new(-1.0, -t, s),
            CubeFace::PositiveY => Vector3::new(s, 1.0, t),
            CubeFace::NegativeY => Vector3::new(s, -1.0, -t),
            CubeFace::PositiveZ => Vector3::new(s, -t, 1.0),
            CubeFace::NegativeZ => Vector3::new(-s, -t, -1.0),
        }
    }
}

pub struct EnvironmentMap {
    id: EnvironmentId,
    face_size: u32,
    faces: [Rgba32FImage; 6],
}

impl EnvironmentMap {
    /// Build a map from six square faces of equal size.
    pub fn from_faces(faces: [Rgba32FImage; 6]) -> Result<Self, EnvironmentError> {
        let face_size = faces[0].width();
        if face_size == 0 {
            return Err(EnvironmentError::ZeroFaceSize);
        }
        if faces
            .iter()
            .any(|face| face.width() != face_size || face.height() != face_size)
        {
            return Err(EnvironmentError::MismatchedFaces);
        }
        Ok(Self {
            id: EnvironmentId::next(),
            face_size,
            faces,
        })
    }

    /// Uniformly coloured map, mostly useful for headless worlds and tests.
    pub fn solid(face_size: u32, color: [f32; 4]) -> Result<Self, EnvironmentError> {
        if face_size == 0 {
            return Err(EnvironmentError::ZeroFaceSize);
        }
        let faces = std::array::from_fn(|_| {
            Rgba32FImage::from_pixel(face_size, face_size, Rgba(color))
        });
        Self::from_faces(faces)
    }

    /// Project an equirectangular panorama onto the six cube faces (nearest sample).
    pub fn from_equirectangular(
        panorama: &Rgba32FImage,
        face_size: u32,
    ) -> Result<Self, EnvironmentError> {
        if face_size == 0 {
            return Err(EnvironmentError::ZeroFaceSize);
        }
        let (width, height) = panorama.dimensions();
        if width == 0 || height == 0 {
            return Err(EnvironmentError::EmptyImage);
        }

        let faces = CubeFace::ALL.map(|face| {
            Rgba32FImage::from_fn(face_size, face_size, |px, py| {
                let s = 2.0 * (px as f64 + 0.5) / face_size as f64 - 1.0;
                let t = 2.0 * (py as f64 + 0.5) / face_size as f64 - 1.0;
                let (u, v) = equirectangular_uv(face.direction(s, t));
                let sx = ((u * width as f64) as u32).min(width - 1);
                let sy = ((v * height as f64) as u32).min(height - 1);
                *panorama.get_pixel(sx, sy)
            })
        });
        Self::from_faces(faces)
    }

    pub fn id(&self) -> EnvironmentId {
        self.id
    }

    pub fn face_size(&self) -> u32 {
        self.face_size
    }

    pub fn face(&self, face: CubeFace) -> &Rgba32FImage {
        &self.faces[face.index()]
    }

    /// Mean colour over all faces.
    pub fn average_color(&self) -> [f32; 4] {
        let mut sum = [0.0f64; 4];
        let mut count = 0u64;
        for face in &self.faces {
            for pixel in face.pixels() {
                for (channel, value) in sum.iter_mut().zip(pixel.0.iter()) {
                    *channel += *value as f64;
                }
                count += 1;
            }
        }
        sum.map(|channel| (channel / count.max(1) as f64) as f32)
    }
}

impl fmt::Debug for EnvironmentMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvironmentMap")
            .field("id", &self.id)
            .field("face_size", &self.face_size)
            .finish()
    }
}

/// Longitude/latitude texture coordinates of a direction, both in `[0, 1]`.
fn equirectangular_uv(direction: Vector3) -> (f64, f64) {
    let direction = direction.normalized().unwrap_or(Vector3::new(0.0, 0.0, -1.0));
    let u = 0.5 + direction.z.atan2(direction.x) / (2.0 * PI);
    let v = direction.y.clamp(-1.0, 1.0).acos() / PI;
    (u.clamp(0.0, 1.0), v.clamp(0.0, 1.0))
}

/// Load an equirectangular image (typically `.hdr`) and project it onto a cube map.
pub fn load_environment(
    path: impl AsRef<Path>,
    face_size: u32,
) -> Result<EnvironmentMap, EnvironmentError> {
    let path = path.as_ref();
    let panorama = image::open(path)
        .map_err(|e| EnvironmentError::Open {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?
        .into_rgba32f();
    let map = EnvironmentMap::from_equirectangular(&panorama, face_size)?;
    tracing::info!("loaded environment {} from {}", map.id(), path.display());
    Ok(map)
}
