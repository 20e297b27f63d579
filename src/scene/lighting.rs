//! Scene-level environment lighting.

use std::sync::Arc;

use super::environment::{EnvironmentId, EnvironmentMap};

/// Blur applied to the background when it shows a captured world.
pub const CAPTURED_BACKGROUND_BLURRINESS: f32 = 0.5;

/// Receiver for environment lighting changes.
pub trait LightingSink {
    /// Use `map` as both image-based lighting and background.
    fn set_environment_lighting(&mut self, map: Arc<EnvironmentMap>);

    /// Id of the map currently applied, if any.
    fn applied_environment(&self) -> Option<EnvironmentId>;
}

#[derive(Debug, Clone, Default)]
pub struct SceneLighting {
    pub environment: Option<Arc<EnvironmentMap>>,
    pub background: Option<Arc<EnvironmentMap>>,
    pub background_blurriness: f32,
    swaps: u64,
}

impl SceneLighting {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of times the environment has been replaced.
    pub fn swap_count(&self) -> u64 {
        self.swaps
    }

    pub fn clear(&mut self) {
        self.environment = None;
        self.background = None;
        self.background_blurriness = 0.0;
    }
}

impl LightingSink for SceneLighting {
    fn set_environment_lighting(&mut self, map: Arc<EnvironmentMap>) {
        tracing::debug!("scene environment -> {}", map.id());
        self.background = Some(Arc::clone(&map));
        self.environment = Some(map);
        self.background_blurriness = CAPTURED_BACKGROUND_BLURRINESS;
        self.swaps += 1;
    }

    fn applied_environment(&self) -> Option<EnvironmentId> {
        self.environment.as_ref().map(|map| map.id())
    }
}
