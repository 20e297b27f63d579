//! Explicit resource ownership.
//!
//! Everything a demo creates that holds renderer resources implements
//! [`Disposable`] and is pushed into the [`ResourceOwner`] of whoever created
//! it. Tear-down walks that list once; nothing is discovered by scene traversal.

use std::sync::{Arc, Mutex};

/// Capability for objects that hold releasable resources.
pub trait Disposable {
    /// Release resources. Implementations must tolerate repeated calls.
    fn dispose(&mut self);

    /// Short label used in logs.
    fn label(&self) -> &str {
        "resource"
    }
}

/// Shared handles dispose the inner value. A poisoned lock is still disposed.
impl<T: Disposable> Disposable for Arc<Mutex<T>> {
    fn dispose(&mut self) {
        match self.lock() {
            Ok(mut inner) => inner.dispose(),
            Err(poisoned) => poisoned.into_inner().dispose(),
        }
    }
}

/// Ordered list of owned resources, released exactly once.
#[derive(Default)]
pub struct ResourceOwner {
    resources: Vec<Box<dyn Disposable>>,
    disposed: bool,
}

impl ResourceOwner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of a resource. Adding to an already disposed owner
    /// releases the resource immediately.
    pub fn adopt(&mut self, mut resource: Box<dyn Disposable>) {
        if self.disposed {
            tracing::warn!("{} adopted after dispose; releasing", resource.label());
            resource.dispose();
            return;
        }
        self.resources.push(resource);
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Release every resource in adoption order. Later calls do nothing.
    pub fn dispose_all(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        for resource in self.resources.iter_mut() {
            tracing::debug!("disposing {}", resource.label());
            resource.dispose();
        }
        self.resources.clear();
    }

    /// Dispose and make the owner usable again for the next demo.
    pub fn reset(&mut self) {
        self.dispose_all();
        self.disposed = false;
    }
}

impl Drop for ResourceOwner {
    fn drop(&mut self) {
        self.dispose_all();
    }
}
