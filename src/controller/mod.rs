//! Radial shell visibility controller.
//!
//! Worlds are nested inside one another, separated by two concentric shells.
//! The camera flies radially between the inner and outer shell; whenever it
//! leaves that band its distance is wrapped back into it and `level` moves by
//! the number of boundaries crossed. Two worlds are active at any time:
//!
//! - the *inner* world, shrunk to fit inside the inner shell and seen only
//!   through the glass shell's transmission pass;
//! - the *outer* world, drawn at natural size, whose captured environment
//!   lights the scene.
//!
//! Because the world list is indexed modulo its length, a finite list
//! repeats forever in both directions.

pub mod traversal;

use futures::future::BoxFuture;
use tracing::{debug, info, warn};

use crate::config::{AnimationConfig, ShellConfig};
use crate::error::ConfigError;
use crate::frame::{FrameCallback, FrameContext};
use crate::panel::DebugPanel;
use crate::resources::Disposable;
use crate::scene::{Camera, GlassShell, LightingSink, TransmissiveMaterial};
use crate::world::{DrawSuppression, RenderMode, SplatWorld, World};

pub use traversal::{world_indices, wrap_distance, ShellGeometry};

/// Debug panel folder holding the traversal parameters.
pub const TRAVERSAL_FOLDER: &str = "traversal";
/// Debug panel folder holding the glass shell parameters.
pub const SHELL_FOLDER: &str = "shell";

const DEFAULT_FADE_BAND: f64 = 0.1;

/// Traversal state after a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraversalSnapshot {
    pub level: i64,
    pub inner_index: usize,
    pub outer_index: usize,
    pub inner_surface_distance: f64,
}

pub struct ShellController {
    worlds: Vec<World>,
    geometry: ShellGeometry,
    level: i64,
    inner_surface_distance: f64,
    shell: GlassShell,
    animation: AnimationConfig,
    disposed: bool,
}

impl ShellController {
    /// Build a controller over `worlds` and load each of them.
    ///
    /// A world that fails to load keeps its slot in the rotation; it just
    /// never contributes lighting.
    pub fn new(
        geometry: ShellGeometry,
        worlds: Vec<Box<dyn SplatWorld>>,
    ) -> Result<Self, ConfigError> {
        if worlds.is_empty() {
            return Err(ConfigError::ValidationError(
                "shell controller needs at least one world".into(),
            ));
        }

        let mut worlds: Vec<World> = worlds.into_iter().map(World::new).collect();
        for world in worlds.iter_mut() {
            match world.load() {
                Ok(()) => debug!("loaded world '{}'", world.source()),
                Err(e) => warn!("{e}; traversal continues without its lighting"),
            }
        }
        info!(
            "shell controller ready: {} worlds, inner radius {}, outer radius {}",
            worlds.len(),
            geometry.inner_radius(),
            geometry.outer_radius()
        );

        let shell = GlassShell::new(
            TransmissiveMaterial::default(),
            geometry.inner_radius(),
            DEFAULT_FADE_BAND,
        );
        Ok(Self {
            worlds,
            geometry,
            level: 0,
            inner_surface_distance: 0.0,
            shell,
            animation: AnimationConfig::default(),
            disposed: false,
        })
    }

    /// Build from a validated config. `worlds` must follow the config's world order.
    pub fn from_config(
        config: &ShellConfig,
        worlds: Vec<Box<dyn SplatWorld>>,
    ) -> Result<Self, ConfigError> {
        let geometry = ShellGeometry::new(
            config.traversal.inner_radius,
            config.traversal.outer_radius,
        )?;
        Ok(Self::new(geometry, worlds)?
            .with_shell(config.shell.clone(), config.traversal.fade_band)
            .with_animation(config.animation.clone()))
    }

    pub fn with_shell(mut self, material: TransmissiveMaterial, fade_band: f64) -> Self {
        self.shell = GlassShell::new(material, self.geometry.inner_radius(), fade_band);
        self
    }

    pub fn with_animation(mut self, animation: AnimationConfig) -> Self {
        self.animation = animation;
        self
    }

    /// Capture futures for every world that has not started one yet.
    /// The caller drives them; results are picked up on later frames.
    pub fn begin_captures(&mut self) -> Vec<BoxFuture<'static, ()>> {
        if self.disposed {
            return Vec::new();
        }
        self.worlds
            .iter_mut()
            .filter_map(World::begin_capture)
            .collect()
    }

    /// Add this controller's parameters to `panel`, seeded with the current settings.
    pub fn register_parameters(&self, panel: &mut DebugPanel) {
        panel.add_bool(TRAVERSAL_FOLDER, "animate", self.animation.enabled);
        panel.add_float(
            TRAVERSAL_FOLDER,
            "linear_speed",
            self.animation.linear_speed,
            0.0,
            5.0,
        );
        panel.add_float(
            TRAVERSAL_FOLDER,
            "angular_speed",
            self.animation.angular_speed,
            0.0,
            2.0,
        );
        panel.add_float(
            SHELL_FOLDER,
            "thickness",
            self.shell.initial_material().thickness,
            0.0,
            10.0,
        );
    }

    /// Pick up parameter edits. Parameters missing from the panel keep their values.
    pub fn sync_from_panel(&mut self, panel: &DebugPanel) {
        if let Some(enabled) = panel.bool(TRAVERSAL_FOLDER, "animate") {
            self.animation.enabled = enabled;
        }
        if let Some(speed) = panel.float(TRAVERSAL_FOLDER, "linear_speed") {
            self.animation.linear_speed = speed;
        }
        if let Some(speed) = panel.float(TRAVERSAL_FOLDER, "angular_speed") {
            self.animation.angular_speed = speed;
        }
        if let Some(thickness) = panel.float(SHELL_FOLDER, "thickness") {
            self.shell.set_initial_thickness(thickness);
        }
    }

    /// Run one frame of traversal: animate, wrap, then push state to every
    /// world, the scene lighting and the glass shell.
    pub fn step(&mut self, camera: &mut Camera, lighting: &mut dyn LightingSink, dt: f64) {
        if self.disposed {
            return;
        }

        if self.animation.enabled {
            camera.advance_radially(self.animation.linear_speed * dt);
            camera.orbit(self.animation.angular_speed * dt);
        }

        let near = camera.near;
        let inner_radius = self.geometry.inner_radius();
        let gap = self.geometry.gap();
        let distance = camera.near_plane_distance() - inner_radius;

        let (distance, crossings) = wrap_distance(distance, gap);
        if crossings != 0 {
            camera.set_distance(distance + inner_radius + near);
            self.level += crossings;
            if crossings.abs() > 1 {
                warn!(
                    "camera crossed {} shell boundaries in one frame; now at level {}",
                    crossings, self.level
                );
            } else {
                debug!("crossed shell boundary; level {}", self.level);
            }
        }
        self.inner_surface_distance = distance;

        for world in self.worlds.iter_mut() {
            world.poll_capture();
        }

        let (inner_index, outer_index) = world_indices(self.level, self.worlds.len());
        let inner_scale = self.geometry.inner_scale();
        for (index, world) in self.worlds.iter_mut().enumerate() {
            let is_inner = index == inner_index;
            let is_outer = index == outer_index;

            world.set_render_mode(if is_inner {
                RenderMode::HighFidelity
            } else {
                RenderMode::Lightweight
            });
            world.set_in_scene(is_inner || is_outer);
            world.set_draw_suppression(DrawSuppression::for_role(is_inner, is_outer));
            world.set_scale(if is_inner { inner_scale } else { 1.0 });

            if is_outer {
                if let Some(environment) = world.environment() {
                    if lighting.applied_environment() != Some(environment.id()) {
                        info!(
                            "lighting scene with {} from '{}'",
                            environment.id(),
                            world.source()
                        );
                        lighting.set_environment_lighting(environment.clone());
                    }
                }
            }
        }

        self.shell.update(distance, gap);
    }

    pub fn level(&self) -> i64 {
        self.level
    }

    pub fn inner_index(&self) -> usize {
        world_indices(self.level, self.worlds.len()).0
    }

    pub fn outer_index(&self) -> usize {
        world_indices(self.level, self.worlds.len()).1
    }

    /// Distance from the inner shell to the camera's near plane, as of the last frame.
    pub fn inner_surface_distance(&self) -> f64 {
        self.inner_surface_distance
    }

    pub fn snapshot(&self) -> TraversalSnapshot {
        let (inner_index, outer_index) = world_indices(self.level, self.worlds.len());
        TraversalSnapshot {
            level: self.level,
            inner_index,
            outer_index,
            inner_surface_distance: self.inner_surface_distance,
        }
    }

    pub fn geometry(&self) -> &ShellGeometry {
        &self.geometry
    }

    pub fn shell(&self) -> &GlassShell {
        &self.shell
    }

    pub fn animation(&self) -> &AnimationConfig {
        &self.animation
    }

    pub fn world(&self, index: usize) -> Option<&World> {
        self.worlds.get(index)
    }

    pub fn worlds(&self) -> &[World] {
        &self.worlds
    }

    pub fn world_count(&self) -> usize {
        self.worlds.len()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Release every world once. Later calls do nothing.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        for world in self.worlds.iter_mut() {
            world.dispose();
        }
        info!("shell controller disposed");
    }
}

impl FrameCallback for ShellController {
    fn on_before_render(&mut self, context: &mut FrameContext<'_>) {
        self.sync_from_panel(context.panel);
        let dt = context.elapsed_seconds();
        self.step(context.camera, context.lighting, dt);
    }
}

impl Disposable for ShellController {
    fn dispose(&mut self) {
        ShellController::dispose(self);
    }

    fn label(&self) -> &str {
        "shell controller"
    }
}
