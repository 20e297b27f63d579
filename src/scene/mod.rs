//! splatshell::scene - camera, lighting and the transmissive shell
//!
//! Public submodules:
//! - camera (Camera)
//! - environment (EnvironmentMap, CubeFace, load_environment)
//! - lighting (LightingSink, SceneLighting)
//! - probes (EnvironmentProbes)
//! - shell (GlassShell, TransmissiveMaterial)

pub mod camera;
pub mod environment;
pub mod lighting;
pub mod probes;
pub mod shell;

pub use camera::Camera;
pub use environment::{load_environment, CubeFace, EnvironmentId, EnvironmentMap};
pub use lighting::{LightingSink, SceneLighting, CAPTURED_BACKGROUND_BLURRINESS};
pub use probes::{EnvironmentProbes, Probe};
pub use shell::{GlassShell, TransmissiveMaterial};
