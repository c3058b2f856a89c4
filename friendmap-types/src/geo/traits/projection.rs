/// Conversion of points from one coordinate space into another.
///
/// Both directions return `None` when the point has no representation in the target space, e.g. a pole in
/// Web Mercator.
pub trait Projection {
    /// Type of the source points.
    type InPoint;
    /// Type of the projected points.
    type OutPoint;

    /// Projects the input point into the output space.
    fn project(&self, input: &Self::InPoint) -> Option<Self::OutPoint>;
    /// Converts a projected point back into the input space.
    fn unproject(&self, input: &Self::OutPoint) -> Option<Self::InPoint>;
}
