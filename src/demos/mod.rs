//! Demos that can be mounted on a [`Stage`].
//!
//! Each demo builds its worlds through a caller supplied [`WorldFactory`], so
//! the same demo runs against a real splat renderer or the headless backend.

pub mod lighting;
pub mod transmission;

use std::fmt;
use std::sync::{Arc, Mutex};

use tracing::{info, warn};

use crate::config::{ShellConfig, WorldSource};
use crate::controller::ShellController;
use crate::error::ShellError;
use crate::scene::{load_environment, LightingSink};
use crate::stage::Stage;
use crate::world::SplatWorld;

pub use lighting::LightingDemo;

/// Creates the renderable for a configured world source.
pub type WorldFactory<'a> = dyn FnMut(&WorldSource) -> Box<dyn SplatWorld> + 'a;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemoKind {
    Transmission,
    SceneLighting,
}

impl DemoKind {
    pub const ALL: [DemoKind; 2] = [DemoKind::Transmission, DemoKind::SceneLighting];

    /// Parse a demo key. A leading `#` is accepted, as in a URL fragment.
    pub fn from_key(key: &str) -> Result<Self, ShellError> {
        let trimmed = key.trim();
        let trimmed = trimmed.strip_prefix('#').unwrap_or(trimmed);
        DemoKind::ALL
            .into_iter()
            .find(|kind| kind.key().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ShellError::UnknownDemo(key.to_string()))
    }

    pub fn key(self) -> &'static str {
        match self {
            DemoKind::Transmission => "transmission",
            DemoKind::SceneLighting => "scene-lighting",
        }
    }
}

impl fmt::Display for DemoKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Handle to the demo currently mounted on a stage.
pub enum MountedDemo {
    Transmission(Arc<Mutex<ShellController>>),
    SceneLighting(Arc<Mutex<LightingDemo>>),
}

impl MountedDemo {
    pub fn kind(&self) -> DemoKind {
        match self {
            MountedDemo::Transmission(_) => DemoKind::Transmission,
            MountedDemo::SceneLighting(_) => DemoKind::SceneLighting,
        }
    }
}

/// Tear down whatever `stage` is running and mount `kind` in its place.
pub fn mount(
    kind: DemoKind,
    stage: &mut Stage,
    config: &ShellConfig,
    factory: &mut WorldFactory<'_>,
) -> Result<MountedDemo, ShellError> {
    stage.teardown();
    apply_fallback_environment(stage, config);
    info!("mounting demo '{kind}'");
    match kind {
        DemoKind::Transmission => {
            transmission::mount(stage, config, factory).map(MountedDemo::Transmission)
        }
        DemoKind::SceneLighting => {
            lighting::mount(stage, config, factory).map(MountedDemo::SceneLighting)
        }
    }
}

/// Light the stage from the configured image until a world capture replaces it.
/// A missing or broken file only costs the initial lighting.
fn apply_fallback_environment(stage: &mut Stage, config: &ShellConfig) {
    let Some(path) = config.lighting.fallback_environment.as_deref() else {
        return;
    };
    match load_environment(path, config.lighting.face_size) {
        Ok(map) => stage.lighting.set_environment_lighting(Arc::new(map)),
        Err(e) => warn!("{e}; starting without fallback lighting"),
    }
}
