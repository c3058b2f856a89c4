//! Friendmap places geo-located entities (friends) on a map as markers and keeps the markers legible while the
//! map is zoomed.
//!
//! # Quick start
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use friendmap::{Friend, MarkerManagerBuilder, UrlImageLoader};
//! use friendmap::friendmap_types::latlon;
//! # use friendmap::marker::MarkerSurface;
//! # fn surface<S: MarkerSurface>() -> Arc<parking_lot::RwLock<S>> { unimplemented!() }
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), friendmap::error::FriendmapError> {
//! let mut manager = MarkerManagerBuilder::default()
//!     .with_cluster_radius(48.0)
//!     .build(UrlImageLoader::new()?)?;
//!
//! manager.bind_surface(surface());
//! manager.set_entities(vec![
//!     Friend::new("1", "Ann", latlon!(52.52, 13.40), "https://example.com/ann.png"),
//!     Friend::new("2", "Bob", latlon!(52.52, 13.40), "https://example.com/bob.png"),
//! ]);
//!
//! loop {
//!     manager.wait_for_updates().await;
//! }
//! # }
//! ```
//!
//! # Main components
//!
//! * [`group_entities`] merges entities with exactly the same coordinates into [`Location`]s.
//! * [`GridClusterizer`] splits the surface into square pixel cells and merges all locations in a cell into one
//!   [`Cluster`](cluster::Cluster).
//! * [`MarkerManager`] owns the entities and the markers. Every time the entities or the zoom level change it
//!   removes all markers from the [`MarkerSurface`](marker::MarkerSurface) and rebuilds them from the clusters.
//!   Markers with a single entity show the entity's image, which is loaded by an [`ImageLoader`] in background.
//!
//! The manager and its surface are owned by a single context (e.g. the UI thread). Background work and other
//! threads talk to the manager through a queue, see [`ManagerHandle`](marker::ManagerHandle) and [`Messenger`].

#![warn(clippy::unwrap_used)]
#![warn(missing_docs)]

pub(crate) mod async_runtime;
pub mod cluster;
pub mod config;
pub mod decoded_image;
pub mod entity;
pub mod error;
pub mod image_loader;
pub mod location;
pub mod marker;
mod messenger;
mod view;

#[cfg(test)]
pub(crate) mod tests;

pub use cluster::GridClusterizer;
pub use config::MarkerManagerConfig;
pub use entity::{Entity, Friend};
pub use image_loader::ImageLoader;
#[cfg(feature = "image")]
pub use image_loader::UrlImageLoader;
pub use location::{group_entities, Location};
pub use marker::{MarkerManager, MarkerManagerBuilder, RecalculationOutcome};
pub use messenger::{DummyMessenger, Messenger};
pub use view::{MapView, ScreenProjection};

// Reexport friendmap_types
pub use friendmap_types;
