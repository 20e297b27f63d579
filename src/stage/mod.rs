//! Demo host.
//!
//! A [`Stage`] owns everything a demo draws with: the camera, the scene
//! lighting, the per-frame callbacks, the list of owned resources and the
//! debug panel. Demos are mounted onto a stage and torn down by it.

use std::time::Duration;

use futures::future::BoxFuture;
use tracing::{debug, info};

use crate::frame::{FrameCallback, FrameLoop};
use crate::panel::DebugPanel;
use crate::resources::{Disposable, ResourceOwner};
use crate::scene::{Camera, SceneLighting};

pub struct Stage {
    pub camera: Camera,
    pub lighting: SceneLighting,
    frame_loop: FrameLoop,
    resources: ResourceOwner,
    panel: DebugPanel,
    pending_captures: Vec<BoxFuture<'static, ()>>,
}

impl Stage {
    pub fn new(camera: Camera) -> Self {
        Self {
            camera,
            lighting: SceneLighting::new(),
            frame_loop: FrameLoop::new(),
            resources: ResourceOwner::new(),
            panel: DebugPanel::new(),
            pending_captures: Vec::new(),
        }
    }

    pub fn panel(&self) -> &DebugPanel {
        &self.panel
    }

    pub fn panel_mut(&mut self) -> &mut DebugPanel {
        &mut self.panel
    }

    /// Run `callback` before every frame, after the ones already registered.
    pub fn register(&mut self, callback: Box<dyn FrameCallback>) {
        self.frame_loop.register(callback);
    }

    /// Release `resource` on the next teardown.
    pub fn adopt(&mut self, resource: Box<dyn Disposable>) {
        self.resources.adopt(resource);
    }

    /// Hold capture futures until the driver takes them.
    pub fn queue_captures(&mut self, captures: Vec<BoxFuture<'static, ()>>) {
        self.pending_captures.extend(captures);
    }

    /// Capture futures queued by the mounted demo; the caller must drive them.
    pub fn take_pending_captures(&mut self) -> Vec<BoxFuture<'static, ()>> {
        std::mem::take(&mut self.pending_captures)
    }

    pub fn callback_count(&self) -> usize {
        self.frame_loop.len()
    }

    pub fn resource_count(&self) -> usize {
        self.resources.len()
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_loop.frame_count()
    }

    /// Run every frame callback once.
    pub fn render_frame(&mut self, elapsed: Duration) {
        self.frame_loop
            .run_frame(elapsed, &mut self.camera, &mut self.lighting, &self.panel);
    }

    /// Tear the mounted demo down: release its resources, drop its callbacks
    /// and replace the panel so the next demo starts clean.
    pub fn teardown(&mut self) {
        debug!(
            "tearing down stage: {} callbacks, {} resources",
            self.frame_loop.len(),
            self.resources.len()
        );
        self.resources.reset();
        self.frame_loop.clear();
        self.panel.destroy();
        self.panel = DebugPanel::new();
        self.pending_captures.clear();
        self.lighting.clear();
        info!("stage cleared");
    }
}

impl Default for Stage {
    fn default() -> Self {
        Self::new(Camera::default())
    }
}

impl Drop for Stage {
    fn drop(&mut self) {
        self.frame_loop.clear();
        self.resources.dispose_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{from_fn, FrameContext};
    use futures::FutureExt;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct Tracked {
        frames: u32,
        disposals: u32,
    }

    impl FrameCallback for Tracked {
        fn on_before_render(&mut self, _context: &mut FrameContext<'_>) {
            self.frames += 1;
        }
    }

    impl Disposable for Tracked {
        fn dispose(&mut self) {
            self.disposals += 1;
        }
    }

    #[test]
    fn test_render_frame_runs_callbacks() {
        let mut stage = Stage::default();
        let tracked = Arc::new(Mutex::new(Tracked::default()));
        stage.register(Box::new(Arc::clone(&tracked)));

        stage.render_frame(Duration::from_millis(16));
        stage.render_frame(Duration::from_millis(16));

        assert_eq!(tracked.lock().unwrap().frames, 2);
        assert_eq!(stage.frame_count(), 2);
    }

    #[test]
    fn test_teardown_releases_and_clears() {
        let mut stage = Stage::default();
        let tracked = Arc::new(Mutex::new(Tracked::default()));
        stage.register(Box::new(Arc::clone(&tracked)));
        stage.adopt(Box::new(Arc::clone(&tracked)));
        stage.panel_mut().add_bool("demo", "flag", true);
        stage.queue_captures(vec![async {}.boxed()]);

        stage.teardown();
        stage.teardown();
        stage.render_frame(Duration::from_millis(16));

        let tracked = tracked.lock().unwrap();
        assert_eq!(tracked.disposals, 1);
        assert_eq!(tracked.frames, 0);
        assert!(stage.panel().is_empty());
        assert_eq!(stage.callback_count(), 0);
        assert!(stage.take_pending_captures().is_empty());
    }

    #[test]
    fn test_stage_is_reusable_after_teardown() {
        let mut stage = Stage::default();
        stage.teardown();

        let tracked = Arc::new(Mutex::new(Tracked::default()));
        stage.adopt(Box::new(Arc::clone(&tracked)));
        stage.register(from_fn(|context: &mut FrameContext<'_>| {
            context.camera.advance_radially(1.0);
        }));
        let start = stage.camera.distance_from_origin();
        stage.render_frame(Duration::from_millis(16));
        assert!((stage.camera.distance_from_origin() - start - 1.0).abs() < 1e-12);

        drop(stage);
        assert_eq!(tracked.lock().unwrap().disposals, 1);
    }
}
