use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use crate::marker::descriptor::{MarkerIcon, MarkerOptions};
use crate::view::ScreenProjection;

/// Identifier the surface assigns to an attached marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkerHandle(u64);

impl MarkerHandle {
    /// Creates a handle. Only surfaces are expected to create handles.
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Numeric value of the handle.
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Map widget that displays markers.
///
/// All the methods are called from the owner context of the [`MarkerManager`](super::MarkerManager) the surface
/// is bound to.
pub trait MarkerSurface {
    /// Projection of the surface.
    type Projection: ScreenProjection;

    /// Current projection, or `None` if the surface cannot provide it yet (e.g. before the first layout).
    fn projection(&self) -> Option<Self::Projection>;
    /// Displays a marker.
    fn attach(&mut self, options: &MarkerOptions) -> MarkerHandle;
    /// Removes a previously attached marker.
    fn detach(&mut self, handle: MarkerHandle);
    /// Changes the icon of an attached marker.
    fn set_icon(&mut self, handle: MarkerHandle, icon: &MarkerIcon);
    /// Sets the listener the surface must notify every time its projection changes (zoom or pan).
    fn set_projection_listener(&mut self, listener: ProjectionListener);
}

/// Receives projection change notifications from a [`MarkerSurface`].
///
/// Notifying only queues a command for the manager, so it can be done from any thread and at any time, including
/// from inside of the surface methods.
#[derive(Clone)]
pub struct ProjectionListener {
    callback: Arc<dyn Fn(f64) + Send + Sync>,
}

impl ProjectionListener {
    pub(crate) fn new(callback: impl Fn(f64) + Send + Sync + 'static) -> Self {
        Self {
            callback: Arc::new(callback),
        }
    }

    /// Notifies the manager that the surface projection has changed.
    pub fn notify(&self, projection: &impl ScreenProjection) {
        (self.callback)(projection.zoom_level())
    }
}

impl Debug for ProjectionListener {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProjectionListener").finish_non_exhaustive()
    }
}
