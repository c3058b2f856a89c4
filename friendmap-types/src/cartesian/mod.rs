//! Points in cartesian (projected or screen) coordinates.

mod impls;
mod size;
mod traits;

pub use impls::Point2d;
pub use size::Size;
pub use traits::cartesian_point::{CartesianPoint2d, NewCartesianPoint2d};
