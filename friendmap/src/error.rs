//! Error types used by the crate.

use thiserror::Error;

/// Friendmap error type.
#[derive(Debug, Error)]
pub enum FriendmapError {
    /// Manager or clusterizer parameters are not usable.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    /// The surface cannot provide a projection yet (e.g. it was not laid out).
    #[error("map projection is not available")]
    ProjectionUnavailable,
    /// A coordinate has no representation in the current projection.
    #[error("location ({lat}, {lon}) cannot be projected onto the map")]
    UnprojectableLocation {
        /// Latitude of the location.
        lat: f64,
        /// Longitude of the location.
        lon: f64,
    },
    /// I/O error (network or file).
    #[error("failed to load data")]
    IO,
    /// Item not found.
    #[error("item not found")]
    NotFound,
    /// Image could not be loaded or has invalid content.
    #[error("failed to load image: {0}")]
    ImageLoad(String),
    /// Image decoding error.
    #[cfg(feature = "image")]
    #[error("image decode error: {0:?}")]
    ImageDecode(#[from] image::ImageError),
    /// Entity snapshot could not be written or read.
    #[error("invalid entity snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),
}

impl From<reqwest::Error> for FriendmapError {
    fn from(_value: reqwest::Error) -> Self {
        Self::IO
    }
}
