//! Markers displayed on the map surface and the [`MarkerManager`] that keeps them in sync with the entities and
//! the map zoom.

mod command;
mod descriptor;
mod manager;
mod surface;

pub use command::ManagerHandle;
pub use descriptor::{MapMarker, MarkerIcon, MarkerId, MarkerKind, MarkerOptions};
pub use manager::{
    DeferReason, MarkerManager, MarkerManagerBuilder, RecalculationOutcome, RecalculationReport,
};
pub use surface::{MarkerHandle, MarkerSurface, ProjectionListener};
