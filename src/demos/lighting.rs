//! Scene lighting from a captured world.
//!
//! A single world is loaded and, once its environment capture lands, used as
//! the scene's lighting and blurred background. A grid of probe spheres and a
//! hovering mirror-finish prop show off the result.

use std::f64::consts::TAU;
use std::sync::{Arc, Mutex};

use tracing::info;

use super::WorldFactory;
use crate::config::ShellConfig;
use crate::error::{ConfigError, ShellError};
use crate::frame::{FrameCallback, FrameContext};
use crate::numerics::Vector3;
use crate::resources::Disposable;
use crate::scene::{Camera, EnvironmentProbes};
use crate::stage::Stage;
use crate::world::{RenderMode, World};

pub const LIGHTING_FOLDER: &str = "lighting";

/// Camera height the demo starts from.
const CAMERA_HEIGHT: f64 = 0.25;

/// Mirror-finish prop bobbing above the ground next to the probes.
#[derive(Debug, Clone, PartialEq)]
pub struct HoverProp {
    pub position: Vector3,
    /// Rotation about the vertical axis in radians, in `[0, 2π)`.
    pub rotation_y: f64,
    pub metalness: f64,
    pub roughness: f64,
}

impl HoverProp {
    const BASE_HEIGHT: f64 = 0.5;
    const BOB_AMPLITUDE: f64 = 0.05;
    const BOB_RATE: f64 = 0.25;

    pub fn new() -> Self {
        Self {
            position: Vector3::new(-0.8, Self::BASE_HEIGHT, 0.0),
            rotation_y: 0.0,
            metalness: 1.0,
            roughness: 0.0,
        }
    }

    /// Pose at `time` seconds, spinning at `spin_rate` radians per second.
    pub fn update(&mut self, time: f64, spin_rate: f64) {
        self.rotation_y = (time * spin_rate).rem_euclid(TAU);
        self.position.y = (time * Self::BOB_RATE).sin() * Self::BOB_AMPLITUDE + Self::BASE_HEIGHT;
    }
}

impl Default for HoverProp {
    fn default() -> Self {
        Self::new()
    }
}

pub struct LightingDemo {
    world: World,
    probes: EnvironmentProbes,
    prop: HoverProp,
    spin_rate: f64,
    time: f64,
    disposed: bool,
}

impl LightingDemo {
    pub fn new(world: World, probes: EnvironmentProbes) -> Self {
        Self {
            world,
            probes,
            prop: HoverProp::new(),
            spin_rate: 0.1,
            time: 0.0,
            disposed: false,
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn probes(&self) -> &EnvironmentProbes {
        &self.probes
    }

    pub fn prop(&self) -> &HoverProp {
        &self.prop
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}

impl FrameCallback for LightingDemo {
    fn on_before_render(&mut self, context: &mut FrameContext<'_>) {
        if self.disposed {
            return;
        }
        if let Some(rate) = context.panel.float(LIGHTING_FOLDER, "spin_rate") {
            self.spin_rate = rate;
        }
        self.time += context.elapsed_seconds();
        self.prop.update(self.time, self.spin_rate);

        self.world.poll_capture();
        if let Some(environment) = self.world.environment() {
            if context.lighting.applied_environment() != Some(environment.id()) {
                info!("lighting scene from captured '{}'", self.world.source());
                context.lighting.set_environment_lighting(Arc::clone(environment));
            }
        }
    }
}

impl Disposable for LightingDemo {
    fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        self.world.dispose();
        self.probes.dispose();
    }

    fn label(&self) -> &str {
        "lighting demo"
    }
}

pub fn mount(
    stage: &mut Stage,
    config: &ShellConfig,
    factory: &mut WorldFactory<'_>,
) -> Result<Arc<Mutex<LightingDemo>>, ShellError> {
    let source = config.worlds.first().ok_or_else(|| {
        ConfigError::ValidationError("lighting demo needs a world source".into())
    })?;

    let mut camera = Camera::new()
        .with_position(config.camera.position)
        .with_near(config.camera.near)
        .with_fov(config.camera.fov);
    camera.position.y = CAMERA_HEIGHT;
    stage.camera = camera;

    let mut world = World::new(factory(source));
    if let Err(e) = world.load() {
        world.dispose();
        return Err(e.into());
    }
    world.set_in_scene(true);
    world.set_render_mode(RenderMode::HighFidelity);
    if let Some(capture) = world.begin_capture() {
        stage.queue_captures(vec![capture]);
    }

    let probes = EnvironmentProbes::new(config.lighting.probe_grid)
        .with_origin(config.lighting.probe_origin);
    stage
        .panel_mut()
        .add_float(LIGHTING_FOLDER, "spin_rate", 0.1, 0.0, 1.0);

    let demo = Arc::new(Mutex::new(LightingDemo::new(world, probes)));
    stage.register(Box::new(Arc::clone(&demo)));
    stage.adopt(Box::new(Arc::clone(&demo)));
    Ok(demo)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorldSource;
    use crate::scene::{LightingSink, CAPTURED_BACKGROUND_BLURRINESS};
    use crate::world::{HeadlessSplatWorld, HeadlessState, SplatWorld};
    use std::time::Duration;

    fn headless(source: &WorldSource) -> Box<dyn SplatWorld> {
        Box::new(HeadlessSplatWorld::new(source.source.clone()))
    }

    #[test]
    fn test_capture_lights_scene() {
        let mut stage = Stage::default();
        let demo = mount(&mut stage, &ShellConfig::default(), &mut headless).unwrap();

        stage.render_frame(Duration::from_millis(16));
        assert!(stage.lighting.applied_environment().is_none());

        for capture in stage.take_pending_captures() {
            futures::executor::block_on(capture);
        }
        stage.render_frame(Duration::from_millis(16));
        stage.render_frame(Duration::from_millis(16));

        let demo = demo.lock().unwrap();
        let expected = demo.world().environment().map(|map| map.id());
        assert_eq!(stage.lighting.applied_environment(), expected);
        assert_eq!(stage.lighting.swap_count(), 1);
        assert_eq!(
            stage.lighting.background_blurriness,
            CAPTURED_BACKGROUND_BLURRINESS
        );
        assert_eq!(demo.probes().probes().len(), 27);
        assert_eq!(stage.camera.position.y, CAMERA_HEIGHT);
    }

    #[test]
    fn test_failed_load_is_reported() {
        let mut stage = Stage::default();
        let mut states: Vec<Arc<Mutex<HeadlessState>>> = Vec::new();
        let mut broken = |source: &WorldSource| -> Box<dyn SplatWorld> {
            let world = HeadlessSplatWorld::new(source.source.clone()).failing_load();
            states.push(world.state());
            Box::new(world)
        };
        let result = mount(&mut stage, &ShellConfig::default(), &mut broken);
        assert!(matches!(result, Err(ShellError::World(_))));

        // The half-built world is released before the error is returned.
        assert_eq!(states.len(), 1);
        assert_eq!(states[0].lock().unwrap().dispose_count, 1);
        assert_eq!(stage.callback_count(), 0);
        assert_eq!(stage.resource_count(), 0);
    }

    #[test]
    fn test_teardown_disposes_world_and_probes() {
        let mut stage = Stage::default();
        let demo = mount(&mut stage, &ShellConfig::default(), &mut headless).unwrap();
        stage.teardown();

        let demo = demo.lock().unwrap();
        assert!(demo.is_disposed());
        assert!(demo.world().is_disposed());
        assert!(demo.probes().is_disposed());
    }

    #[test]
    fn test_hover_prop_motion() {
        let mut prop = HoverProp::new();
        prop.update(0.0, 0.1);
        assert_eq!(prop.position.y, 0.5);
        assert_eq!(prop.rotation_y, 0.0);

        prop.update(100.0, 0.1);
        assert!((prop.rotation_y - (10.0 % TAU)).abs() < 1e-12);
        assert!(prop.position.y <= 0.55 && prop.position.y >= 0.45);
    }
}
