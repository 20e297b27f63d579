//! Per-frame update callbacks.
//!
//! The render loop driver owns a [`FrameLoop`] and calls
//! [`FrameLoop::run_frame`] once before each render. Callbacks run in
//! registration order and cannot change that order while a frame runs.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::panel::DebugPanel;
use crate::scene::{Camera, LightingSink};

/// Everything a callback may touch during one frame.
pub struct FrameContext<'a> {
    /// Time since the previous frame.
    pub elapsed: Duration,
    /// Index of the frame being prepared, starting at 0.
    pub frame_number: u64,
    pub camera: &'a mut Camera,
    pub lighting: &'a mut dyn LightingSink,
    pub panel: &'a DebugPanel,
}

impl FrameContext<'_> {
    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }
}

pub trait FrameCallback {
    fn on_before_render(&mut self, context: &mut FrameContext<'_>);
}

/// Wrap a closure as a callback.
pub fn from_fn<F>(callback: F) -> Box<dyn FrameCallback>
where
    F: FnMut(&mut FrameContext<'_>) + 'static,
{
    Box::new(FnCallback(callback))
}

struct FnCallback<F>(F);

impl<F> FrameCallback for FnCallback<F>
where
    F: FnMut(&mut FrameContext<'_>),
{
    fn on_before_render(&mut self, context: &mut FrameContext<'_>) {
        (self.0)(context)
    }
}

/// Shared handles run the inner callback. A poisoned lock skips the frame.
impl<T: FrameCallback> FrameCallback for Arc<Mutex<T>> {
    fn on_before_render(&mut self, context: &mut FrameContext<'_>) {
        match self.lock() {
            Ok(mut inner) => inner.on_before_render(context),
            Err(_) => tracing::error!("frame callback lock poisoned; skipping"),
        }
    }
}

#[derive(Default)]
pub struct FrameLoop {
    callbacks: Vec<Box<dyn FrameCallback>>,
    frames: u64,
}

impl FrameLoop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, callback: Box<dyn FrameCallback>) {
        self.callbacks.push(callback);
    }

    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }

    /// Frames run so far.
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    pub fn clear(&mut self) {
        self.callbacks.clear();
    }

    /// Invoke every callback once, in registration order.
    pub fn run_frame(
        &mut self,
        elapsed: Duration,
        camera: &mut Camera,
        lighting: &mut dyn LightingSink,
        panel: &DebugPanel,
    ) {
        let mut context = FrameContext {
            elapsed,
            frame_number: self.frames,
            camera,
            lighting,
            panel,
        };
        for callback in self.callbacks.iter_mut() {
            callback.on_before_render(&mut context);
        }
        self.frames += 1;
    }
}
