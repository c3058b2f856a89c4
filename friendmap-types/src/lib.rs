//! Geometry primitives shared by the `friendmap` crates.
//!
//! Points on the surface of the Earth live in the [`geo`] module ([`geo::GeoPoint`],
//! [`geo::impls::GeoPoint2d`]), points in screen (pixel) or projected space live in [`cartesian`].
//! [`geo::Projection`] converts between the two.

pub mod cartesian;
pub mod geo;

pub use cartesian::{CartesianPoint2d, NewCartesianPoint2d, Point2d, Size};
