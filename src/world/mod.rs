//! Splat worlds as seen by the shell controller.
//!
//! The actual splat renderer is external. It is reached through the
//! [`SplatWorld`] trait (scene membership, scale, shading path, per-target
//! draw suppression) and [`EnvironmentCapture`] for the asynchronous cube map
//! capture. [`World`] wraps one renderable together with its capture slot and
//! the last state pushed to it.

pub mod capture;
pub mod headless;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;
use futures::FutureExt;

use crate::error::WorldError;
use crate::scene::EnvironmentMap;
pub use capture::{CaptureOutcome, CaptureSlot, CaptureState, CaptureWriter};
pub use headless::{HeadlessSplatWorld, HeadlessState};

/// Shading path used for a world.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Full scene-shader integration; used for the world close to the camera.
    HighFidelity,
    /// Cheaper transparent path for the distant world.
    Lightweight,
}

/// Where a draw call is headed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderTarget {
    /// The visible canvas.
    Canvas,
    /// Offscreen target sampled by the transmissive shell.
    Transmission,
    /// Cube map capture of the world's own lighting.
    EnvironmentCapture,
}

/// Which render target a world must stay out of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawSuppression {
    None,
    /// Drawn only offscreen; seen on screen through the shell.
    Canvas,
    /// Drawn on the canvas but kept out of the shell's transmission pass.
    Transmission,
}

impl DrawSuppression {
    /// Suppression for a world's current role. A world that is both inner
    /// and outer (single-world traversal) is not suppressed anywhere.
    pub fn for_role(is_inner: bool, is_outer: bool) -> Self {
        match (is_inner, is_outer) {
            (true, false) => DrawSuppression::Canvas,
            (false, true) => DrawSuppression::Transmission,
            _ => DrawSuppression::None,
        }
    }

    /// Whether a draw into `target` goes ahead. Environment capture always does.
    pub fn allows(self, target: RenderTarget) -> bool {
        match (self, target) {
            (_, RenderTarget::EnvironmentCapture) => true,
            (DrawSuppression::Canvas, RenderTarget::Canvas) => false,
            (DrawSuppression::Transmission, RenderTarget::Transmission) => false,
            _ => true,
        }
    }
}

/// Asynchronous cube map capture of a loaded world.
#[async_trait]
pub trait EnvironmentCapture: Send + Sync {
    /// Capture the world's lighting. `Ok(None)` means nothing could be captured yet.
    async fn capture(&self) -> Result<Option<EnvironmentMap>, WorldError>;
}

/// A renderable splat world provided by the rendering backend.
pub trait SplatWorld: Send {
    /// Source identifier the world was created from.
    fn source(&self) -> &str;

    fn load(&mut self) -> Result<(), WorldError>;

    fn is_loaded(&self) -> bool;

    /// Release renderer resources.
    fn dispose(&mut self);

    /// Attach to or detach from the scene graph. Assets stay resident.
    fn set_in_scene(&mut self, in_scene: bool);

    fn set_scale(&mut self, scale: f64);

    fn set_render_mode(&mut self, mode: RenderMode);

    fn set_draw_suppression(&mut self, suppression: DrawSuppression);

    /// Handle used to run the environment capture off the frame loop.
    fn capture_handle(&self) -> Arc<dyn EnvironmentCapture>;
}

/// Controller-side record of one world.
pub struct World {
    renderable: Box<dyn SplatWorld>,
    environment: Option<Arc<EnvironmentMap>>,
    capture: CaptureSlot,
    in_scene: Option<bool>,
    scale: Option<f64>,
    render_mode: Option<RenderMode>,
    suppression: Option<DrawSuppression>,
    disposed: bool,
}

impl World {
    pub fn new(renderable: Box<dyn SplatWorld>) -> Self {
        Self {
            renderable,
            environment: None,
            capture: CaptureSlot::new(),
            in_scene: None,
            scale: None,
            render_mode: None,
            suppression: None,
            disposed: false,
        }
    }

    pub fn source(&self) -> &str {
        self.renderable.source()
    }

    pub fn load(&mut self) -> Result<(), WorldError> {
        self.renderable.load()
    }

    pub fn is_loaded(&self) -> bool {
        self.renderable.is_loaded()
    }

    /// Future that runs the capture and writes into this world's slot.
    /// `None` if a capture was already started or the world is disposed.
    pub fn begin_capture(&mut self) -> Option<BoxFuture<'static, ()>> {
        if self.disposed {
            return None;
        }
        let writer = self.capture.arm()?;
        let handle = self.renderable.capture_handle();
        let source = self.source().to_string();
        Some(
            async move {
                let outcome = handle.capture().await;
                if !writer.write(outcome) {
                    tracing::debug!("capture for '{source}' finished after release; dropped");
                }
            }
            .boxed(),
        )
    }

    /// Pick up a finished capture. Returns `true` on the frame a new map arrives.
    pub fn poll_capture(&mut self) -> bool {
        match self.capture.poll() {
            Some(Ok(Some(map))) => {
                tracing::info!("captured environment {} for '{}'", map.id(), self.source());
                self.environment = Some(Arc::new(map));
                true
            }
            Some(Ok(None)) => {
                tracing::warn!("environment capture for '{}' produced no map", self.source());
                false
            }
            Some(Err(e)) => {
                tracing::warn!("{e}");
                false
            }
            None => false,
        }
    }

    pub fn capture_state(&self) -> CaptureState {
        self.capture.state()
    }

    pub fn environment(&self) -> Option<&Arc<EnvironmentMap>> {
        self.environment.as_ref()
    }

    pub fn in_scene(&self) -> bool {
        self.in_scene.unwrap_or(false)
    }

    pub fn scale(&self) -> f64 {
        self.scale.unwrap_or(1.0)
    }

    pub fn render_mode(&self) -> Option<RenderMode> {
        self.render_mode
    }

    pub fn draw_suppression(&self) -> DrawSuppression {
        self.suppression.unwrap_or(DrawSuppression::None)
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    // The setters below only reach the renderable when the value changes.

    pub fn set_in_scene(&mut self, in_scene: bool) {
        if self.in_scene != Some(in_scene) {
            self.in_scene = Some(in_scene);
            self.renderable.set_in_scene(in_scene);
        }
    }

    pub fn set_scale(&mut self, scale: f64) {
        if self.scale != Some(scale) {
            self.scale = Some(scale);
            self.renderable.set_scale(scale);
        }
    }

    pub fn set_render_mode(&mut self, mode: RenderMode) {
        if self.render_mode != Some(mode) {
            self.render_mode = Some(mode);
            self.renderable.set_render_mode(mode);
        }
    }

    pub fn set_draw_suppression(&mut self, suppression: DrawSuppression) {
        if self.suppression != Some(suppression) {
            self.suppression = Some(suppression);
            self.renderable.set_draw_suppression(suppression);
        }
    }

    /// Release the renderable once and cancel any pending capture.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        self.capture.cancel();
        self.renderable.dispose();
        self.environment = None;
    }
}

impl fmt::Debug for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("World")
            .field("source", &self.source())
            .field("in_scene", &self.in_scene())
            .field("scale", &self.scale())
            .field("capture", &self.capture.state())
            .field("disposed", &self.disposed)
            .finish()
    }
}
