//! TOML configuration.
//!
//! Every section has serde defaults so a partial file works. The defaults
//! describe the two-world transmission setup: inner shell radius 1, outer
//! radius 10.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ConfigError;
use crate::numerics::Vector3;
use crate::scene::TransmissiveMaterial;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldSource {
    /// Human readable name used in logs.
    #[serde(default)]
    pub label: String,
    pub source: String,
}

impl WorldSource {
    pub fn new(label: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            source: source.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraversalConfig {
    pub inner_radius: f64,
    pub outer_radius: f64,
    /// Fraction of a traversal over which the glass shell scales in and out.
    pub fade_band: f64,
}

impl Default for TraversalConfig {
    fn default() -> Self {
        Self {
            inner_radius: 1.0,
            outer_radius: 10.0,
            fade_band: 0.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: Vector3,
    pub near: f64,
    pub fov: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: Vector3::new(0.0, 0.0, 4.0),
            near: 0.01,
            fov: 45.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    pub enabled: bool,
    /// Outward speed in scene units per second.
    pub linear_speed: f64,
    /// Orbit speed in radians per second.
    pub angular_speed: f64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            linear_speed: 0.5,
            angular_speed: 0.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightingConfig {
    /// Probe grid edge length for the lighting demo.
    pub probe_grid: usize,
    pub probe_origin: Vector3,
    /// Equirectangular image applied before any world capture completes.
    pub fallback_environment: Option<PathBuf>,
    pub face_size: u32,
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            probe_grid: 3,
            probe_origin: Vector3::new(2.5, 0.0, 0.0),
            fallback_environment: None,
            face_size: 64,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    pub worlds: Vec<WorldSource>,
    pub traversal: TraversalConfig,
    pub camera: CameraConfig,
    pub animation: AnimationConfig,
    pub shell: TransmissiveMaterial,
    pub lighting: LightingConfig,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            worlds: vec![
                WorldSource::new(
                    "Chateau de Menthon",
                    "https://lumalabs.ai/capture/da82625c-9c8d-4d05-a9f7-3367ecab438c",
                ),
                WorldSource::new(
                    "Arosa Hornli",
                    "https://lumalabs.ai/capture/4da7cf32-865a-4515-8cb9-9dfc574c90c2",
                ),
            ],
            traversal: TraversalConfig::default(),
            camera: CameraConfig::default(),
            animation: AnimationConfig::default(),
            shell: TransmissiveMaterial::default(),
            lighting: LightingConfig::default(),
        }
    }
}

impl ShellConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: ShellConfig = toml::from_str(content)
            .map_err(|e| ConfigError::ParseError(format!("failed to parse TOML: {e}")))?;
        validate(&config)?;
        Ok(config)
    }

    /// Load and validate a config file. Unlike a missing section, an invalid
    /// value is an error: the traversal cannot run with a broken geometry.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path).map_err(|e| {
            ConfigError::ParseError(format!("failed to read {}: {e}", path.display()))
        })?;
        let config = Self::from_toml_str(&content)?;
        info!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self)
            .map_err(|e| ConfigError::ParseError(format!("failed to serialize config: {e}")))
    }
}

/// Run all validations, collecting every problem into one error.
pub fn validate(config: &ShellConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    if config.worlds.is_empty() {
        errors.push("worlds must list at least one source".into());
    }
    for (index, world) in config.worlds.iter().enumerate() {
        if world.source.trim().is_empty() {
            errors.push(format!("worlds[{index}].source must not be empty"));
        }
    }

    let traversal = &config.traversal;
    validate_positive(&mut errors, "traversal.inner_radius", traversal.inner_radius);
    validate_positive(&mut errors, "traversal.outer_radius", traversal.outer_radius);
    if traversal.outer_radius <= traversal.inner_radius {
        errors.push(format!(
            "traversal.outer_radius ({}) must be greater than traversal.inner_radius ({})",
            traversal.outer_radius, traversal.inner_radius
        ));
    }
    validate_range(&mut errors, "traversal.fade_band", traversal.fade_band, 0.0, 0.5);

    validate_range(&mut errors, "camera.near", config.camera.near, 0.0, f64::MAX);
    validate_range(&mut errors, "camera.fov", config.camera.fov, 1.0, 179.0);

    let animation = &config.animation;
    validate_range(&mut errors, "animation.linear_speed", animation.linear_speed, 0.0, f64::MAX);
    validate_range(&mut errors, "animation.angular_speed", animation.angular_speed, 0.0, f64::MAX);

    validate_range(&mut errors, "shell.thickness", config.shell.thickness, 0.0, 10.0);
    validate_range(&mut errors, "shell.ior", config.shell.ior, 0.0, 3.0);
    validate_range(&mut errors, "shell.transmission", config.shell.transmission, 0.0, 1.0);

    if config.lighting.face_size == 0 {
        errors.push("lighting.face_size must be at least 1".into());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

fn validate_positive(errors: &mut Vec<String>, name: &str, value: f64) {
    if !value.is_finite() || value <= 0.0 {
        errors.push(format!("{name} must be a positive finite number, got {value}"));
    }
}

fn validate_range(errors: &mut Vec<String>, name: &str, value: f64, min: f64, max: f64) {
    if !value.is_finite() || value < min || value > max {
        errors.push(format!("{name} must be between {min} and {max}, got {value}"));
    }
}
