//! Configuration of the [`MarkerManager`](crate::MarkerManager).

use serde::{Deserialize, Serialize};

use crate::error::FriendmapError;

/// Default size of a clustering cell in pixels.
pub const DEFAULT_CLUSTER_RADIUS: f64 = 64.0;
/// Default number of loaded marker images kept by a manager.
pub const DEFAULT_ICON_CACHE_CAPACITY: usize = 256;

/// Parameters of a [`MarkerManager`](crate::MarkerManager).
///
/// Can be deserialized from any `serde` format; missing fields take their default values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerManagerConfig {
    /// Size of the clustering grid cell in pixels. Locations closer than this on the screen are likely to be
    /// shown as a single marker.
    pub cluster_radius: f64,
    /// Number of loaded marker images remembered between recalculations.
    pub icon_cache_capacity: usize,
}

impl Default for MarkerManagerConfig {
    fn default() -> Self {
        Self {
            cluster_radius: DEFAULT_CLUSTER_RADIUS,
            icon_cache_capacity: DEFAULT_ICON_CACHE_CAPACITY,
        }
    }
}

impl MarkerManagerConfig {
    /// Checks that the configuration can be used.
    pub fn validate(&self) -> Result<(), FriendmapError> {
        if !(self.cluster_radius.is_finite() && self.cluster_radius > 0.0) {
            return Err(FriendmapError::InvalidConfiguration(format!(
                "cluster radius must be a positive number of pixels, got {}",
                self.cluster_radius
            )));
        }

        if self.icon_cache_capacity == 0 {
            return Err(FriendmapError::InvalidConfiguration(
                "icon cache capacity must not be zero".into(),
            ));
        }

        Ok(())
    }
}
